//! Club Membership Repository

use sqlx::SqlitePool;

use shared::models::{ClubMembership, ClubRole};

use super::{RepoError, RepoResult};

pub async fn find(
    pool: &SqlitePool,
    club_id: i64,
    user_id: i64,
) -> RepoResult<Option<ClubMembership>> {
    let m = sqlx::query_as::<_, ClubMembership>(
        "SELECT id, club_id, user_id, role, status, created_at, updated_at FROM club_membership WHERE club_id = ? AND user_id = ?",
    )
    .bind(club_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(m)
}

pub async fn find_active_by_club(pool: &SqlitePool, club_id: i64) -> RepoResult<Vec<ClubMembership>> {
    let rows = sqlx::query_as::<_, ClubMembership>(
        "SELECT id, club_id, user_id, role, status, created_at, updated_at FROM club_membership WHERE club_id = ? AND status = 'ACTIVE' ORDER BY created_at",
    )
    .bind(club_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn count_active(pool: &SqlitePool, club_id: i64) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM club_membership WHERE club_id = ? AND status = 'ACTIVE'",
    )
    .bind(club_id)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

/// Join a club.
///
/// A fresh join inserts an ACTIVE MEMBER row. A returning member (LEFT)
/// is reactivated. BANNED and REJECTED members stay out; an existing
/// ACTIVE/PENDING membership is a no-op conflict.
pub async fn join(pool: &SqlitePool, club_id: i64, user_id: i64) -> RepoResult<ClubMembership> {
    let now = shared::util::now_millis();

    match find(pool, club_id, user_id).await? {
        None => {
            let id = shared::util::snowflake_id();
            sqlx::query(
                "INSERT INTO club_membership (id, club_id, user_id, role, status, created_at, updated_at) VALUES (?, ?, ?, 'MEMBER', 'ACTIVE', ?, ?)",
            )
            .bind(id)
            .bind(club_id)
            .bind(user_id)
            .bind(now)
            .bind(now)
            .execute(pool)
            .await?;
        }
        Some(m) => match m.status {
            shared::models::MembershipStatus::Left => {
                sqlx::query(
                    "UPDATE club_membership SET status = 'ACTIVE', updated_at = ? WHERE id = ?",
                )
                .bind(now)
                .bind(m.id)
                .execute(pool)
                .await?;
            }
            shared::models::MembershipStatus::Banned
            | shared::models::MembershipStatus::Rejected => {
                return Err(RepoError::State("Cannot rejoin this club".into()));
            }
            _ => {
                return Err(RepoError::Duplicate("Already a member of this club".into()));
            }
        },
    }

    find(pool, club_id, user_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to join club".into()))
}

/// Leave a club. The owner cannot leave their own club.
pub async fn leave(pool: &SqlitePool, club_id: i64, user_id: i64) -> RepoResult<()> {
    let m = find(pool, club_id, user_id)
        .await?
        .ok_or_else(|| RepoError::NotFound("Not a member of this club".into()))?;

    if m.role == ClubRole::Owner {
        return Err(RepoError::State("The owner cannot leave their own club".into()));
    }
    if m.status != shared::models::MembershipStatus::Active {
        return Err(RepoError::State("Membership is not active".into()));
    }

    let now = shared::util::now_millis();
    sqlx::query("UPDATE club_membership SET status = 'LEFT', updated_at = ? WHERE id = ?")
        .bind(now)
        .bind(m.id)
        .execute(pool)
        .await?;
    Ok(())
}
