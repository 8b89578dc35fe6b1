//! Criteria parsing and timeframe windows
//!
//! The store keeps `criteria_type` as free text; this module parses it
//! into a closed enum. Unknown kinds become [`CriteriaKind::Unsupported`]
//! and evaluate to "not met" — fail-closed, visible, never an error.

use chrono_tz::Tz;

use crate::utils::time;

/// Supported counting rules, one evaluator per variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CriteriaKind {
    BooksRead,
    RecommendationsSent,
    ClubsJoined,
    ReviewsWritten,
    /// Anything the engine has no evaluator for; never met
    Unsupported(String),
}

impl CriteriaKind {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "books_read" => Self::BooksRead,
            "recommendations_sent" => Self::RecommendationsSent,
            "clubs_joined" => Self::ClubsJoined,
            "reviews_written" => Self::ReviewsWritten,
            other => Self::Unsupported(other.to_string()),
        }
    }
}

/// Counting window for a criteria
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeframe {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    AllTime,
}

impl Timeframe {
    /// Parse the stored timeframe; null or unknown text means all-time.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None => Self::AllTime,
            Some("daily") => Self::Daily,
            Some("weekly") => Self::Weekly,
            Some("monthly") => Self::Monthly,
            Some("yearly") => Self::Yearly,
            Some("all_time") => Self::AllTime,
            Some(other) => {
                tracing::warn!(timeframe = other, "Unknown timeframe, treating as all_time");
                Self::AllTime
            }
        }
    }

    /// Window start in Unix millis; None = unfiltered.
    ///
    /// daily = since local midnight, weekly = rolling 7 days, monthly =
    /// since the 1st, yearly = since Jan 1 — all in the business timezone.
    pub fn window_start(self, now_millis: i64, tz: Tz) -> Option<i64> {
        match self {
            Self::Daily => Some(time::local_day_start(now_millis, tz)),
            Self::Weekly => Some(time::rolling_days_start(now_millis, 7)),
            Self::Monthly => Some(time::local_month_start(now_millis, tz)),
            Self::Yearly => Some(time::local_year_start(now_millis, tz)),
            Self::AllTime => None,
        }
    }
}
