//! Club Meeting Models

use serde::{Deserialize, Serialize};

/// Meeting type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum MeetingType {
    Discussion,
    BookSelection,
    AuthorQa,
    Social,
    Other,
}

/// Meeting status — SCHEDULED until completed or cancelled (both terminal)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum MeetingStatus {
    Scheduled,
    Completed,
    Cancelled,
}

/// RSVP status — a member's self-reported intent, distinct from recorded attendance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum RsvpStatus {
    NotResponded,
    Attending,
    NotAttending,
    Maybe,
}

/// Club meeting entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ClubMeeting {
    pub id: i64,
    pub club_id: i64,
    pub title: String,
    pub description: Option<String>,
    /// Scheduled date/time (Unix millis)
    pub meeting_date: i64,
    pub location: Option<String>,
    pub meeting_type: MeetingType,
    pub status: MeetingStatus,
    pub book_id: Option<i64>,
    pub meeting_notes: Option<String>,
    pub completed_at: Option<i64>,
    pub created_by: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create meeting payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingCreate {
    pub title: String,
    pub description: Option<String>,
    pub meeting_date: i64,
    pub location: Option<String>,
    pub meeting_type: MeetingType,
    pub book_id: Option<i64>,
}

/// Update meeting payload (only while SCHEDULED)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub meeting_date: Option<i64>,
    pub location: Option<String>,
    pub meeting_type: Option<MeetingType>,
    pub book_id: Option<i64>,
}

/// Meeting attendee row (one per meeting+user)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MeetingAttendee {
    pub id: i64,
    pub meeting_id: i64,
    pub user_id: i64,
    pub rsvp_status: RsvpStatus,
    /// Set only at meeting completion (admin-recorded actual attendance)
    pub actually_attended: Option<bool>,
    pub marked_at: Option<i64>,
}

/// RSVP payload (self-service)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RsvpRequest {
    pub status: RsvpStatus,
}

/// Per-attendee attendance mark supplied at completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceMark {
    pub user_id: i64,
    pub attended: bool,
}

/// Complete meeting payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteMeeting {
    /// Explicit admin marks; attendees not listed fall back to RSVP-derived defaults
    #[serde(default)]
    pub attendance: Vec<AttendanceMark>,
    pub notes: String,
    /// Only valid for DISCUSSION meetings on the club's current book
    pub book_outcome: Option<super::BookOutcome>,
}

/// Meeting detail view with attendees
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingDetail {
    #[serde(flatten)]
    pub meeting: ClubMeeting,
    pub attendees: Vec<MeetingAttendee>,
}
