//! Review Model

use serde::{Deserialize, Serialize};

/// Review entity (书评)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Review {
    pub id: i64,
    pub user_id: i64,
    pub book_id: i64,
    /// 1-5 stars
    pub rating: i32,
    pub content: String,
    pub created_at: i64,
}

/// Create review payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewCreate {
    pub book_id: i64,
    pub rating: i32,
    pub content: String,
}
