//! Meeting lifecycle
//!
//! Meetings move SCHEDULED → COMPLETED | CANCELLED; [`attendance`] holds
//! the pure RSVP-to-attendance seeding used at completion time.

pub mod attendance;
