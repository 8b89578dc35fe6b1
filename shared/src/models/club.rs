//! Club Model (读书俱乐部)

use serde::{Deserialize, Serialize};

use super::{ClubRole, MembershipStatus, SuggestionWithVotes};

/// Club entity
///
/// Invariant: `voting_cycle_active` implies `voting_ends_at` is set and
/// `current_book_id` is null — voting only runs when no book is current.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Club {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: i64,
    /// The single book the club is actively reading (at most one)
    pub current_book_id: Option<i64>,
    pub voting_cycle_active: bool,
    pub voting_starts_at: Option<i64>,
    pub voting_ends_at: Option<i64>,
    pub voting_started_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create club payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClubCreate {
    pub name: String,
    pub description: Option<String>,
}

/// Club summary for list views
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ClubSummary {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: i64,
    pub current_book_id: Option<i64>,
    pub voting_cycle_active: bool,
    pub member_count: i64,
}

/// Club detail view — the club row plus the caller's membership
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClubDetail {
    #[serde(flatten)]
    pub club: Club,
    pub member_count: i64,
    pub my_role: Option<ClubRole>,
    pub my_status: Option<MembershipStatus>,
}

/// Start voting payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VotingStart {
    pub duration_days: i64,
    /// Optional explicit start time (millis); defaults to now
    pub starts_at: Option<i64>,
}

/// Where a club sits in the book-selection cycle
///
/// VOTING_EXPIRED is a pseudo-state: the cycle flag is still set but the
/// window has elapsed; the next read resolves it to WINNER_PENDING.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CyclePhase {
    NoBook,
    VotingActive,
    VotingExpired,
    WinnerPending,
    CurrentBookSet,
}

/// Voting status view — suggestions with live vote counts, winners after the cycle ends
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VotingStatus {
    pub phase: CyclePhase,
    pub voting_cycle_active: bool,
    pub voting_starts_at: Option<i64>,
    pub voting_ends_at: Option<i64>,
    pub suggestions: Vec<SuggestionWithVotes>,
    /// Suggestion IDs tied for the maximum vote count (all ties surfaced)
    pub winners: Vec<i64>,
}

/// Admin override payload — set current book directly, bypassing history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentBookOverride {
    pub book_id: i64,
}
