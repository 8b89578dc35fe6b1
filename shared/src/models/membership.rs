//! Club Membership Model

use serde::{Deserialize, Serialize};

/// Member role within a club
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ClubRole {
    Member,
    Admin,
    Owner,
}

impl ClubRole {
    /// ADMIN and OWNER may drive voting/meeting transitions
    pub fn is_admin(self) -> bool {
        matches!(self, ClubRole::Admin | ClubRole::Owner)
    }
}

/// Membership status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum MembershipStatus {
    Active,
    Pending,
    Rejected,
    Left,
    Banned,
}

/// Club membership row (one per club+user)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ClubMembership {
    pub id: i64,
    pub club_id: i64,
    pub user_id: i64,
    pub role: ClubRole,
    pub status: MembershipStatus,
    pub created_at: i64,
    pub updated_at: i64,
}
