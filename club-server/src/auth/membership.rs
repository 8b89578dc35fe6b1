//! Club role checks
//!
//! Authorization inside a club is data-driven: the caller's
//! `club_membership` row decides what they may do. Only ACTIVE members
//! vote, suggest or RSVP; only ACTIVE ADMIN/OWNER drive voting and
//! meeting transitions.

use sqlx::SqlitePool;

use shared::models::{ClubMembership, MembershipStatus};

use crate::db::repository::membership;
use crate::utils::{AppError, AppResult};

/// Require an ACTIVE membership in the club; returns the membership row.
pub async fn require_active_member(
    pool: &SqlitePool,
    club_id: i64,
    user_id: i64,
) -> AppResult<ClubMembership> {
    let m = membership::find(pool, club_id, user_id)
        .await?
        .ok_or_else(|| AppError::forbidden("Not a member of this club"))?;

    if m.status != MembershipStatus::Active {
        return Err(AppError::forbidden("Membership is not active"));
    }
    Ok(m)
}

/// Require an ACTIVE membership with ADMIN or OWNER role.
pub async fn require_club_admin(
    pool: &SqlitePool,
    club_id: i64,
    user_id: i64,
) -> AppResult<ClubMembership> {
    let m = require_active_member(pool, club_id, user_id).await?;
    if !m.role.is_admin() {
        return Err(AppError::forbidden(
            "Only club admins may perform this action",
        ));
    }
    Ok(m)
}
