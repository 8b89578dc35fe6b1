//! Repository Module
//!
//! Free async functions per table, taking `&SqlitePool` and returning
//! [`RepoResult`]. Handlers convert [`RepoError`] into `AppError` via `?`.

pub mod achievement;
pub mod activity;
pub mod book;
pub mod club;
pub mod club_book;
pub mod meeting;
pub mod membership;
pub mod recommendation;
pub mod review;
pub mod suggestion;
pub mod user;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// State precondition violated (e.g. voting already active)
    #[error("Invalid state: {0}")]
    State(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// True when the sqlx error is a UNIQUE constraint violation
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[cfg(test)]
pub(crate) mod test_support {
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;

    /// In-memory SQLite pool with the real schema and a small seed set.
    ///
    /// Single connection: every pooled connection would otherwise get its
    /// own private `:memory:` database.
    ///
    /// Seeds: users 1 (alice, owner of club 10), 2 (bob, ACTIVE member),
    /// 3 (carol, no membership); books 101-103.
    pub async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        sqlx::query("PRAGMA foreign_keys = ON;")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();

        sqlx::query(
            "INSERT INTO user (id, username, password_hash, display_name, is_active, created_at, updated_at) VALUES \
             (1, 'alice', 'hash', 'Alice', 1, 0, 0), \
             (2, 'bob', 'hash', 'Bob', 1, 0, 0), \
             (3, 'carol', 'hash', 'Carol', 1, 0, 0)",
        )
        .execute(&pool)
        .await
        .unwrap();

        sqlx::query(
            "INSERT INTO book (id, title, author, created_at) VALUES \
             (101, 'Dune', 'Frank Herbert', 0), \
             (102, 'Middlemarch', 'George Eliot', 0), \
             (103, 'Kindred', 'Octavia Butler', 0)",
        )
        .execute(&pool)
        .await
        .unwrap();

        sqlx::query(
            "INSERT INTO club (id, name, owner_id, voting_cycle_active, created_at, updated_at) VALUES \
             (10, 'Long Reads', 1, 0, 0, 0)",
        )
        .execute(&pool)
        .await
        .unwrap();

        sqlx::query(
            "INSERT INTO club_membership (id, club_id, user_id, role, status, created_at, updated_at) VALUES \
             (1001, 10, 1, 'OWNER', 'ACTIVE', 0, 0), \
             (1002, 10, 2, 'MEMBER', 'ACTIVE', 0, 0)",
        )
        .execute(&pool)
        .await
        .unwrap();

        pool
    }
}
