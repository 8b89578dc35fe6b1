//! Review Repository

use sqlx::SqlitePool;

use shared::models::Review;

use super::{RepoError, RepoResult};

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Review>> {
    let review = sqlx::query_as::<_, Review>(
        "SELECT id, user_id, book_id, rating, content, created_at FROM review WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(review)
}

pub async fn find_by_book(pool: &SqlitePool, book_id: i64) -> RepoResult<Vec<Review>> {
    let reviews = sqlx::query_as::<_, Review>(
        "SELECT id, user_id, book_id, rating, content, created_at FROM review WHERE book_id = ? ORDER BY created_at DESC",
    )
    .bind(book_id)
    .fetch_all(pool)
    .await?;
    Ok(reviews)
}

pub async fn create(
    pool: &SqlitePool,
    user_id: i64,
    book_id: i64,
    rating: i32,
    content: &str,
) -> RepoResult<Review> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();

    sqlx::query(
        "INSERT INTO review (id, user_id, book_id, rating, content, created_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(user_id)
    .bind(book_id)
    .bind(rating)
    .bind(content)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create review".into()))
}
