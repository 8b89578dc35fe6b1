//! Achievement rule engine
//!
//! [`criteria`] parses the stored criteria into a closed rule enum;
//! [`engine`] counts activity, awards badges and maintains progress
//! counters. Engine failures are logged and swallowed — achievement
//! bookkeeping never blocks the user action that triggered it.

pub mod criteria;
pub mod engine;

pub use engine::{evaluate, get_user_achievements, ActivityKind};
