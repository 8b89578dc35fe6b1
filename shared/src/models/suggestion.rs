//! Book Suggestion & Vote Models

use serde::{Deserialize, Serialize};

/// Book suggestion row (one per club+book)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct BookSuggestion {
    pub id: i64,
    pub club_id: i64,
    pub book_id: i64,
    pub suggested_by: i64,
    /// Set when the voting cycle ends; ties all carry the flag
    pub is_winner: bool,
    pub created_at: i64,
}

/// Create suggestion payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionCreate {
    pub book_id: i64,
}

/// Suggestion with derived vote count (for voting status views)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SuggestionWithVotes {
    pub id: i64,
    pub club_id: i64,
    pub book_id: i64,
    pub book_title: String,
    pub suggested_by: i64,
    pub is_winner: bool,
    pub vote_count: i64,
}

/// Select winner payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WinnerSelect {
    pub suggestion_id: i64,
}
