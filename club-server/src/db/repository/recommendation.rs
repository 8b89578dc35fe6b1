//! Recommendation Repository

use sqlx::SqlitePool;

use shared::models::Recommendation;

use super::{RepoError, RepoResult};

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Recommendation>> {
    let rec = sqlx::query_as::<_, Recommendation>(
        "SELECT id, sender_id, recipient_id, book_id, message, created_at FROM recommendation WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(rec)
}

pub async fn find_received(pool: &SqlitePool, recipient_id: i64) -> RepoResult<Vec<Recommendation>> {
    let recs = sqlx::query_as::<_, Recommendation>(
        "SELECT id, sender_id, recipient_id, book_id, message, created_at FROM recommendation WHERE recipient_id = ? ORDER BY created_at DESC",
    )
    .bind(recipient_id)
    .fetch_all(pool)
    .await?;
    Ok(recs)
}

pub async fn create(
    pool: &SqlitePool,
    sender_id: i64,
    recipient_id: i64,
    book_id: i64,
    message: Option<&str>,
) -> RepoResult<Recommendation> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();

    sqlx::query(
        "INSERT INTO recommendation (id, sender_id, recipient_id, book_id, message, created_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(sender_id)
    .bind(recipient_id)
    .bind(book_id)
    .bind(message)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create recommendation".into()))
}
