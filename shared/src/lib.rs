//! Shared types for the club server and its clients.
//!
//! Data models live in [`models`]; DB row types derive `sqlx::FromRow`
//! behind the `db` feature so API clients can depend on this crate
//! without pulling in sqlx.

pub mod models;
pub mod util;
