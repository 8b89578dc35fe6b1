//! Pure attendance seeding
//!
//! At completion time every attendee gets an "actually attended" mark.
//! Marks are pre-seeded from the RSVP and the admin may override any of
//! them; an override for a member with no attendee row is also honored.

use shared::models::{AttendanceMark, MeetingAttendee, RsvpStatus};

/// RSVP-derived default: ATTENDING/MAYBE count as attended, the rest do not.
pub fn default_attended(rsvp: RsvpStatus) -> bool {
    matches!(rsvp, RsvpStatus::Attending | RsvpStatus::Maybe)
}

/// Resolve the final attendance list: one mark per attendee, RSVP default
/// unless the admin supplied an explicit mark. Overrides for users without
/// an attendee row are appended.
pub fn seed_attendance(
    attendees: &[MeetingAttendee],
    overrides: &[AttendanceMark],
) -> Vec<AttendanceMark> {
    let mut marks: Vec<AttendanceMark> = attendees
        .iter()
        .map(|a| AttendanceMark {
            user_id: a.user_id,
            attended: overrides
                .iter()
                .find(|o| o.user_id == a.user_id)
                .map(|o| o.attended)
                .unwrap_or_else(|| default_attended(a.rsvp_status)),
        })
        .collect();

    for o in overrides {
        if !attendees.iter().any(|a| a.user_id == o.user_id) {
            marks.push(AttendanceMark {
                user_id: o.user_id,
                attended: o.attended,
            });
        }
    }

    marks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attendee(user_id: i64, rsvp: RsvpStatus) -> MeetingAttendee {
        MeetingAttendee {
            id: user_id * 10,
            meeting_id: 1,
            user_id,
            rsvp_status: rsvp,
            actually_attended: None,
            marked_at: None,
        }
    }

    fn mark(user_id: i64, attended: bool) -> AttendanceMark {
        AttendanceMark { user_id, attended }
    }

    #[test]
    fn rsvp_defaults() {
        assert!(default_attended(RsvpStatus::Attending));
        assert!(default_attended(RsvpStatus::Maybe));
        assert!(!default_attended(RsvpStatus::NotAttending));
        assert!(!default_attended(RsvpStatus::NotResponded));
    }

    #[test]
    fn seeding_uses_rsvp_defaults() {
        let attendees = vec![
            attendee(1, RsvpStatus::Attending),
            attendee(2, RsvpStatus::NotResponded),
            attendee(3, RsvpStatus::Maybe),
        ];
        let marks = seed_attendance(&attendees, &[]);
        assert_eq!(marks.len(), 3);
        assert!(marks[0].attended);
        assert!(!marks[1].attended);
        assert!(marks[2].attended);
    }

    #[test]
    fn admin_override_beats_the_default() {
        // RSVP'd ATTENDING but marked absent, and vice versa
        let attendees = vec![
            attendee(1, RsvpStatus::Attending),
            attendee(2, RsvpStatus::NotAttending),
        ];
        let overrides = vec![mark(1, false), mark(2, true)];
        let marks = seed_attendance(&attendees, &overrides);
        assert!(!marks[0].attended);
        assert!(marks[1].attended);
    }

    #[test]
    fn override_for_unlisted_user_is_appended() {
        let attendees = vec![attendee(1, RsvpStatus::Attending)];
        let overrides = vec![mark(9, true)];
        let marks = seed_attendance(&attendees, &overrides);
        assert_eq!(marks.len(), 2);
        assert_eq!(marks[1].user_id, 9);
        assert!(marks[1].attended);
    }

    #[test]
    fn empty_everything_is_empty() {
        assert!(seed_attendance(&[], &[]).is_empty());
    }
}
