//! Book selection voting cycle
//!
//! [`cycle`] holds the pure state machine (phase derivation, lazy expiry
//! check, winner selection, input validation) — unit-testable without a
//! datastore. This module wires it to the repositories: every club read
//! boundary calls [`resolve_expired_cycle`] so a cycle whose window has
//! elapsed ends on the next read instead of sitting expired forever.

pub mod cycle;

use sqlx::SqlitePool;

use shared::models::{Club, SuggestionWithVotes};

use crate::db::repository::{club, suggestion};
use crate::utils::AppResult;

/// Lazy expiry transition, invoked wherever club state is read.
///
/// Returns the refreshed club row when the expired cycle was just ended,
/// or the club unchanged when no transition applies. Winners are marked
/// on the suggestion rows as a side effect.
pub async fn resolve_expired_cycle(pool: &SqlitePool, club: Club, now: i64) -> AppResult<Club> {
    if !cycle::is_expired(&club, now) {
        return Ok(club);
    }

    let suggestions = suggestion::find_with_votes(pool, club.id).await?;
    let winners = cycle::pick_winners(&suggestions);
    tracing::info!(
        club_id = club.id,
        winners = winners.len(),
        "Voting cycle expired, ending lazily"
    );

    let updated = club::end_voting(pool, club.id, &winners).await?;
    Ok(updated)
}

/// End the cycle explicitly (admin action). Same winner rules as lazy expiry.
pub async fn end_cycle(
    pool: &SqlitePool,
    club_id: i64,
) -> AppResult<(Club, Vec<SuggestionWithVotes>)> {
    let suggestions = suggestion::find_with_votes(pool, club_id).await?;
    let winners = cycle::pick_winners(&suggestions);

    let updated = club::end_voting(pool, club_id, &winners).await?;
    let suggestions = suggestion::find_with_votes(pool, club_id).await?;
    Ok((updated, suggestions))
}
