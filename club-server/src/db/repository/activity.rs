//! Activity counting queries for achievement criteria
//!
//! Each function counts one kind of user activity, optionally restricted
//! to a time window (`since` = Unix millis, None = all time). The window
//! itself is computed by the achievement engine from the criteria
//! timeframe; this module only runs the counts.

use sqlx::SqlitePool;

use super::RepoResult;

/// Finished shelf records (books_read)
pub async fn count_books_read(
    pool: &SqlitePool,
    user_id: i64,
    since: Option<i64>,
) -> RepoResult<i64> {
    let count: i64 = match since {
        Some(since) => {
            sqlx::query_scalar(
                "SELECT COUNT(*) FROM user_book WHERE user_id = ? AND status = 'FINISHED' AND finished_at >= ?",
            )
            .bind(user_id)
            .bind(since)
            .fetch_one(pool)
            .await?
        }
        None => {
            sqlx::query_scalar(
                "SELECT COUNT(*) FROM user_book WHERE user_id = ? AND status = 'FINISHED'",
            )
            .bind(user_id)
            .fetch_one(pool)
            .await?
        }
    };
    Ok(count)
}

/// Recommendations authored by the user (recommendations_sent)
pub async fn count_recommendations_sent(
    pool: &SqlitePool,
    user_id: i64,
    since: Option<i64>,
) -> RepoResult<i64> {
    let count: i64 = match since {
        Some(since) => {
            sqlx::query_scalar(
                "SELECT COUNT(*) FROM recommendation WHERE sender_id = ? AND created_at >= ?",
            )
            .bind(user_id)
            .bind(since)
            .fetch_one(pool)
            .await?
        }
        None => {
            sqlx::query_scalar("SELECT COUNT(*) FROM recommendation WHERE sender_id = ?")
                .bind(user_id)
                .fetch_one(pool)
                .await?
        }
    };
    Ok(count)
}

/// ACTIVE club memberships (clubs_joined)
pub async fn count_clubs_joined(
    pool: &SqlitePool,
    user_id: i64,
    since: Option<i64>,
) -> RepoResult<i64> {
    let count: i64 = match since {
        Some(since) => {
            sqlx::query_scalar(
                "SELECT COUNT(*) FROM club_membership WHERE user_id = ? AND status = 'ACTIVE' AND created_at >= ?",
            )
            .bind(user_id)
            .bind(since)
            .fetch_one(pool)
            .await?
        }
        None => {
            sqlx::query_scalar(
                "SELECT COUNT(*) FROM club_membership WHERE user_id = ? AND status = 'ACTIVE'",
            )
            .bind(user_id)
            .fetch_one(pool)
            .await?
        }
    };
    Ok(count)
}

/// Reviews written by the user (reviews_written)
pub async fn count_reviews_written(
    pool: &SqlitePool,
    user_id: i64,
    since: Option<i64>,
) -> RepoResult<i64> {
    let count: i64 = match since {
        Some(since) => {
            sqlx::query_scalar(
                "SELECT COUNT(*) FROM review WHERE user_id = ? AND created_at >= ?",
            )
            .bind(user_id)
            .bind(since)
            .fetch_one(pool)
            .await?
        }
        None => {
            sqlx::query_scalar("SELECT COUNT(*) FROM review WHERE user_id = ?")
                .bind(user_id)
                .fetch_one(pool)
                .await?
        }
    };
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::test_pool;

    #[tokio::test]
    async fn counts_respect_the_window() {
        let pool = test_pool().await;

        sqlx::query(
            "INSERT INTO user_book (id, user_id, book_id, status, finished_at, created_at, updated_at) VALUES \
             (1, 1, 101, 'FINISHED', 1000, 1000, 1000), \
             (2, 1, 102, 'FINISHED', 5000, 5000, 5000), \
             (3, 1, 103, 'READING', NULL, 5000, 5000)",
        )
        .execute(&pool)
        .await
        .unwrap();

        assert_eq!(count_books_read(&pool, 1, None).await.unwrap(), 2);
        assert_eq!(count_books_read(&pool, 1, Some(2000)).await.unwrap(), 1);
        assert_eq!(count_books_read(&pool, 2, None).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn active_memberships_only() {
        let pool = test_pool().await;

        sqlx::query(
            "INSERT INTO club (id, name, owner_id, voting_cycle_active, created_at, updated_at) VALUES (11, 'Short Reads', 1, 0, 0, 0)",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO club_membership (id, club_id, user_id, role, status, created_at, updated_at) VALUES \
             (1003, 11, 2, 'MEMBER', 'LEFT', 0, 0)",
        )
        .execute(&pool)
        .await
        .unwrap();

        // bob: ACTIVE in club 10, LEFT in club 11
        assert_eq!(count_clubs_joined(&pool, 2, None).await.unwrap(), 1);
    }
}
