//! Book & Shelf Repository

use sqlx::SqlitePool;

use shared::models::{Book, UserBook};

use super::{RepoError, RepoResult};

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Book>> {
    let book = sqlx::query_as::<_, Book>(
        "SELECT id, title, author, created_at FROM book WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(book)
}

pub async fn find_all(pool: &SqlitePool, limit: i32, offset: i32) -> RepoResult<Vec<Book>> {
    let books = sqlx::query_as::<_, Book>(
        "SELECT id, title, author, created_at FROM book ORDER BY created_at DESC LIMIT ? OFFSET ?",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(books)
}

pub async fn create(pool: &SqlitePool, title: &str, author: &str) -> RepoResult<Book> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();

    sqlx::query("INSERT INTO book (id, title, author, created_at) VALUES (?, ?, ?, ?)")
        .bind(id)
        .bind(title)
        .bind(author)
        .bind(now)
        .execute(pool)
        .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create book".into()))
}

pub async fn find_shelf_record(
    pool: &SqlitePool,
    user_id: i64,
    book_id: i64,
) -> RepoResult<Option<UserBook>> {
    let record = sqlx::query_as::<_, UserBook>(
        "SELECT id, user_id, book_id, status, finished_at, created_at, updated_at FROM user_book WHERE user_id = ? AND book_id = ?",
    )
    .bind(user_id)
    .bind(book_id)
    .fetch_optional(pool)
    .await?;
    Ok(record)
}

/// Mark a book finished on the user's shelf.
///
/// Upserts the shelf record: inserts a FINISHED row, or promotes an
/// existing row to FINISHED. `finished_at` is only stamped on the
/// transition — re-finishing an already-finished book keeps the original
/// timestamp and changes nothing.
pub async fn mark_finished(pool: &SqlitePool, user_id: i64, book_id: i64) -> RepoResult<UserBook> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();

    sqlx::query(
        "INSERT INTO user_book (id, user_id, book_id, status, finished_at, created_at, updated_at) \
         VALUES (?1, ?2, ?3, 'FINISHED', ?4, ?4, ?4) \
         ON CONFLICT(user_id, book_id) DO UPDATE SET \
             status = 'FINISHED', \
             finished_at = COALESCE(user_book.finished_at, ?4), \
             updated_at = ?4",
    )
    .bind(id)
    .bind(user_id)
    .bind(book_id)
    .bind(now)
    .execute(pool)
    .await?;

    find_shelf_record(pool, user_id, book_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to update shelf record".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::test_pool;
    use shared::models::ShelfStatus;

    #[tokio::test]
    async fn mark_finished_inserts_and_promotes() {
        let pool = test_pool().await;

        let first = mark_finished(&pool, 1, 101).await.unwrap();
        assert_eq!(first.status, ShelfStatus::Finished);
        let stamped = first.finished_at.unwrap();

        // Re-finishing keeps the original timestamp
        let again = mark_finished(&pool, 1, 101).await.unwrap();
        assert_eq!(again.finished_at.unwrap(), stamped);
    }
}
