//! Club Book History Model

use serde::{Deserialize, Serialize};

/// Club book status — terminal in COMPLETED or ABANDONED
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ClubBookStatus {
    InProgress,
    Completed,
    Abandoned,
}

/// One club's reading period for one book
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ClubBook {
    pub id: i64,
    pub club_id: i64,
    pub book_id: i64,
    pub status: ClubBookStatus,
    pub started_at: i64,
    pub finished_at: Option<i64>,
    /// 1-5, only meaningful when COMPLETED
    pub rating: Option<i32>,
    pub discussion_notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Complete current book payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteBook {
    pub rating: i32,
    pub notes: String,
}

/// Abandon current book payload
///
/// `reason_code` is an opaque 1-10 vocabulary entry (10 = freeform "Other");
/// display text lives in the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbandonBook {
    pub reason_code: i32,
    pub notes: String,
}

/// Book outcome bundle attached to a DISCUSSION meeting completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookOutcome {
    pub status: ClubBookStatus,
    pub rating: Option<i32>,
    pub reason_code: Option<i32>,
    pub notes: String,
}
