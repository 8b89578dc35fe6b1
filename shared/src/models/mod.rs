//! Data models
//!
//! Shared between club-server and frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), timestamps Unix millis.

pub mod achievement;
pub mod book;
pub mod club;
pub mod club_book;
pub mod meeting;
pub mod membership;
pub mod recommendation;
pub mod review;
pub mod suggestion;
pub mod user;

// Re-exports
pub use achievement::*;
pub use book::*;
pub use club::*;
pub use club_book::*;
pub use meeting::*;
pub use membership::*;
pub use recommendation::*;
pub use review::*;
pub use suggestion::*;
pub use user::*;
