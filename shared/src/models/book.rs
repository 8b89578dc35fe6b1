//! Book & Shelf Models

use serde::{Deserialize, Serialize};

/// Book entity — a plain row; external metadata lookup is not our concern
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub created_at: i64,
}

/// Create book payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookCreate {
    pub title: String,
    pub author: String,
}

/// Shelf status for a user's personal book record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ShelfStatus {
    WantToRead,
    Reading,
    Finished,
}

/// Personal shelf record (one per user+book)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct UserBook {
    pub id: i64,
    pub user_id: i64,
    pub book_id: i64,
    pub status: ShelfStatus,
    /// Set when status becomes FINISHED; feeds books_read achievement counting
    pub finished_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}
