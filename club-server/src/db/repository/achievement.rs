//! Achievement Repository
//!
//! Award rows are guarded by UNIQUE(user_id, achievement_id): the insert
//! uses OR IGNORE, so a concurrent duplicate award resolves to a no-op
//! (at-least-once-safe idempotent awarding).

use sqlx::SqlitePool;

use shared::models::{Achievement, ProgressEntry, UserAchievement};

use super::RepoResult;

pub async fn find_active(pool: &SqlitePool) -> RepoResult<Vec<Achievement>> {
    let rows = sqlx::query_as::<_, Achievement>(
        "SELECT id, name, description, icon, criteria_type, threshold, timeframe, points, is_active, created_at, updated_at FROM achievement WHERE is_active = 1 ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Active achievements the user has not earned yet.
pub async fn find_unearned_active(
    pool: &SqlitePool,
    user_id: i64,
) -> RepoResult<Vec<Achievement>> {
    let rows = sqlx::query_as::<_, Achievement>(
        "SELECT a.id, a.name, a.description, a.icon, a.criteria_type, a.threshold, a.timeframe, a.points, a.is_active, a.created_at, a.updated_at \
         FROM achievement a \
         LEFT JOIN user_achievement ua ON ua.achievement_id = a.id AND ua.user_id = ? \
         WHERE a.is_active = 1 AND ua.id IS NULL ORDER BY a.id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_earned(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<UserAchievement>> {
    let rows = sqlx::query_as::<_, UserAchievement>(
        "SELECT id, user_id, achievement_id, name, points, earned_value, earned_at FROM user_achievement WHERE user_id = ? ORDER BY earned_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Award an achievement with a snapshot of its name/points and the counter
/// value that met the threshold. Returns false when the user already holds
/// it (the OR IGNORE path).
pub async fn award(
    pool: &SqlitePool,
    user_id: i64,
    achievement: &Achievement,
    earned_value: i64,
) -> RepoResult<bool> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();

    let rows = sqlx::query(
        "INSERT OR IGNORE INTO user_achievement (id, user_id, achievement_id, name, points, earned_value, earned_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(user_id)
    .bind(achievement.id)
    .bind(&achievement.name)
    .bind(achievement.points)
    .bind(earned_value)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(rows.rows_affected() > 0)
}

/// Upsert the progress counter for an unearned achievement.
pub async fn upsert_progress(
    pool: &SqlitePool,
    user_id: i64,
    achievement_id: i64,
    current_value: i64,
    target_value: i64,
) -> RepoResult<()> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();

    sqlx::query(
        "INSERT INTO achievement_progress (id, user_id, achievement_id, current_value, target_value, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6) \
         ON CONFLICT(user_id, achievement_id) DO UPDATE SET current_value = ?4, target_value = ?5, updated_at = ?6",
    )
    .bind(id)
    .bind(user_id)
    .bind(achievement_id)
    .bind(current_value)
    .bind(target_value)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

/// Progress entries for display: active, unearned achievements with their
/// stored counters (0 when no evaluation has run yet).
pub async fn find_progress_entries(
    pool: &SqlitePool,
    user_id: i64,
) -> RepoResult<Vec<ProgressEntry>> {
    let rows = sqlx::query_as::<_, ProgressEntry>(
        "SELECT a.id AS achievement_id, a.name, a.description, a.icon, a.points, \
                COALESCE(p.current_value, 0) AS current_value, \
                COALESCE(p.target_value, COALESCE(a.threshold, 1)) AS target_value \
         FROM achievement a \
         LEFT JOIN achievement_progress p ON p.achievement_id = a.id AND p.user_id = ?1 \
         LEFT JOIN user_achievement ua ON ua.achievement_id = a.id AND ua.user_id = ?1 \
         WHERE a.is_active = 1 AND ua.id IS NULL ORDER BY a.id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::test_pool;

    async fn achievement_by_id(pool: &SqlitePool, id: i64) -> Achievement {
        find_active(pool)
            .await
            .unwrap()
            .into_iter()
            .find(|a| a.id == id)
            .unwrap()
    }

    #[tokio::test]
    async fn award_is_idempotent() {
        let pool = test_pool().await;
        let first_chapter = achievement_by_id(&pool, 1).await;

        assert!(award(&pool, 1, &first_chapter, 1).await.unwrap());
        // Second award is swallowed by the unique constraint
        assert!(!award(&pool, 1, &first_chapter, 1).await.unwrap());

        let earned = find_earned(&pool, 1).await.unwrap();
        assert_eq!(earned.len(), 1);
        assert_eq!(earned[0].name, "First Chapter");
        assert_eq!(earned[0].points, 10);
    }

    #[tokio::test]
    async fn earned_achievements_leave_the_unearned_set() {
        let pool = test_pool().await;
        let all = find_unearned_active(&pool, 1).await.unwrap();
        assert_eq!(all.len(), 9);

        let first_chapter = achievement_by_id(&pool, 1).await;
        award(&pool, 1, &first_chapter, 1).await.unwrap();

        let rest = find_unearned_active(&pool, 1).await.unwrap();
        assert_eq!(rest.len(), 8);
        assert!(rest.iter().all(|a| a.id != 1));

        // ...and the progress view too
        let progress = find_progress_entries(&pool, 1).await.unwrap();
        assert!(progress.iter().all(|p| p.achievement_id != 1));
    }

    #[tokio::test]
    async fn progress_upsert_overwrites_counters() {
        let pool = test_pool().await;
        upsert_progress(&pool, 1, 2, 3, 10).await.unwrap();
        upsert_progress(&pool, 1, 2, 4, 10).await.unwrap();

        let progress = find_progress_entries(&pool, 1).await.unwrap();
        let bookworm = progress.iter().find(|p| p.achievement_id == 2).unwrap();
        assert_eq!(bookworm.current_value, 4);
        assert_eq!(bookworm.target_value, 10);
    }
}
