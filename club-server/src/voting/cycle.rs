//! Pure voting-cycle state machine
//!
//! NoBook → VotingActive → VotingExpired → WinnerPending →
//! CurrentBookSet → (completed/abandoned) → NoBook.
//!
//! Everything here is a pure function over the club row, the suggestion
//! list and a caller-supplied `now` — no datastore, no clock.

use shared::models::{Club, CyclePhase, SuggestionWithVotes};

/// Fixed "reason for not completing" vocabulary: codes 1-10, 10 = "Other".
/// The core treats the codes as opaque; display text is presentation-side.
pub const MIN_ABANDON_REASON: i32 = 1;
pub const MAX_ABANDON_REASON: i32 = 10;

/// Derive the club's cycle phase.
///
/// `has_pending_winners` = any suggestion still carries the winner flag
/// from the last ended cycle.
pub fn phase(club: &Club, has_pending_winners: bool, now: i64) -> CyclePhase {
    if club.current_book_id.is_some() {
        return CyclePhase::CurrentBookSet;
    }
    if club.voting_cycle_active {
        return if is_expired(club, now) {
            CyclePhase::VotingExpired
        } else {
            CyclePhase::VotingActive
        };
    }
    if has_pending_winners {
        return CyclePhase::WinnerPending;
    }
    CyclePhase::NoBook
}

/// True when the cycle flag is still set but the window has elapsed —
/// the lazy transition the read boundary must resolve.
pub fn is_expired(club: &Club, now: i64) -> bool {
    club.voting_cycle_active && club.voting_ends_at.is_some_and(|ends| ends <= now)
}

/// True while votes and suggestions are accepted: cycle active and `now`
/// inside [starts_at, ends_at).
pub fn window_open(club: &Club, now: i64) -> bool {
    if !club.voting_cycle_active {
        return false;
    }
    let started = club.voting_starts_at.is_none_or(|starts| starts <= now);
    let not_ended = club.voting_ends_at.is_some_and(|ends| now < ends);
    started && not_ended
}

/// All suggestions tied for the maximum vote count. Ties are preserved,
/// never arbitrarily broken; an empty slate has no winners.
pub fn pick_winners(suggestions: &[SuggestionWithVotes]) -> Vec<i64> {
    let Some(max) = suggestions.iter().map(|s| s.vote_count).max() else {
        return Vec::new();
    };
    suggestions
        .iter()
        .filter(|s| s.vote_count == max)
        .map(|s| s.id)
        .collect()
}

/// Book rating must be 1-5.
pub fn validate_rating(rating: i32) -> Result<(), String> {
    if !(1..=5).contains(&rating) {
        return Err(format!("rating must be between 1 and 5, got {rating}"));
    }
    Ok(())
}

/// Abandon reason must come from the fixed 1-10 vocabulary.
pub fn validate_reason_code(code: i32) -> Result<(), String> {
    if !(MIN_ABANDON_REASON..=MAX_ABANDON_REASON).contains(&code) {
        return Err(format!(
            "reason_code must be between {MIN_ABANDON_REASON} and {MAX_ABANDON_REASON}, got {code}"
        ));
    }
    Ok(())
}

/// Voting duration is whole days, at least one.
pub fn validate_duration_days(days: i64) -> Result<(), String> {
    if days < 1 {
        return Err(format!("duration_days must be at least 1, got {days}"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = 86_400_000;

    fn club(current_book: Option<i64>, active: bool, window: Option<(i64, i64)>) -> Club {
        Club {
            id: 10,
            name: "Long Reads".into(),
            description: None,
            owner_id: 1,
            current_book_id: current_book,
            voting_cycle_active: active,
            voting_starts_at: window.map(|(s, _)| s),
            voting_ends_at: window.map(|(_, e)| e),
            voting_started_by: active.then_some(1),
            created_at: 0,
            updated_at: 0,
        }
    }

    fn suggestion(id: i64, votes: i64) -> SuggestionWithVotes {
        SuggestionWithVotes {
            id,
            club_id: 10,
            book_id: id + 100,
            book_title: format!("Book {id}"),
            suggested_by: 1,
            is_winner: false,
            vote_count: votes,
        }
    }

    // ========== Phase derivation ==========

    #[test]
    fn phase_no_book() {
        assert_eq!(phase(&club(None, false, None), false, 1000), CyclePhase::NoBook);
    }

    #[test]
    fn phase_voting_active_inside_window() {
        let c = club(None, true, Some((0, 7 * DAY)));
        assert_eq!(phase(&c, false, DAY), CyclePhase::VotingActive);
    }

    #[test]
    fn phase_expired_after_window() {
        let c = club(None, true, Some((0, 7 * DAY)));
        assert_eq!(phase(&c, false, 8 * DAY), CyclePhase::VotingExpired);
    }

    #[test]
    fn phase_winner_pending_after_cycle_end() {
        let c = club(None, false, None);
        assert_eq!(phase(&c, true, 1000), CyclePhase::WinnerPending);
    }

    #[test]
    fn phase_current_book_wins_over_everything() {
        let c = club(Some(101), false, None);
        assert_eq!(phase(&c, true, 1000), CyclePhase::CurrentBookSet);
    }

    // ========== Lazy expiry ==========

    #[test]
    fn expiry_only_when_flag_set_and_window_elapsed() {
        let c = club(None, true, Some((0, 7 * DAY)));
        assert!(!is_expired(&c, 7 * DAY - 1));
        assert!(is_expired(&c, 7 * DAY));
        assert!(is_expired(&c, 8 * DAY));

        let inactive = club(None, false, Some((0, 7 * DAY)));
        assert!(!is_expired(&inactive, 8 * DAY));
    }

    #[test]
    fn window_respects_future_start() {
        let c = club(None, true, Some((2 * DAY, 9 * DAY)));
        assert!(!window_open(&c, DAY)); // not started yet
        assert!(window_open(&c, 3 * DAY));
        assert!(!window_open(&c, 9 * DAY)); // ended (exclusive)
    }

    // ========== Winner selection ==========

    #[test]
    fn winners_preserve_ties() {
        // (A,5) (B,5) (C,3) → {A,B}, C excluded
        let s = vec![suggestion(1, 5), suggestion(2, 5), suggestion(3, 3)];
        assert_eq!(pick_winners(&s), vec![1, 2]);
    }

    #[test]
    fn single_winner() {
        let s = vec![suggestion(1, 2), suggestion(2, 7)];
        assert_eq!(pick_winners(&s), vec![2]);
    }

    #[test]
    fn empty_slate_has_no_winners() {
        assert!(pick_winners(&[]).is_empty());
    }

    #[test]
    fn all_zero_votes_all_tie() {
        let s = vec![suggestion(1, 0), suggestion(2, 0)];
        assert_eq!(pick_winners(&s), vec![1, 2]);
    }

    // ========== Validation ==========

    #[test]
    fn rating_bounds() {
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(5).is_ok());
        assert!(validate_rating(6).is_err());
    }

    #[test]
    fn reason_code_bounds() {
        assert!(validate_reason_code(0).is_err());
        assert!(validate_reason_code(1).is_ok());
        assert!(validate_reason_code(10).is_ok());
        assert!(validate_reason_code(11).is_err());
    }

    #[test]
    fn duration_at_least_one_day() {
        assert!(validate_duration_days(0).is_err());
        assert!(validate_duration_days(1).is_ok());
        assert!(validate_duration_days(30).is_ok());
    }
}
