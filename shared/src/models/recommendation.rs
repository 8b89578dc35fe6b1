//! Recommendation Model

use serde::{Deserialize, Serialize};

/// Recommendation entity — one user recommending a book to another
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Recommendation {
    pub id: i64,
    pub sender_id: i64,
    pub recipient_id: i64,
    pub book_id: i64,
    pub message: Option<String>,
    pub created_at: i64,
}

/// Send recommendation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationCreate {
    pub recipient_id: i64,
    pub book_id: i64,
    pub message: Option<String>,
}
