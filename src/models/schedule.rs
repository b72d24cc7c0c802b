//! Materialized schedule (output) models.
//!
//! The materializer hands these to an external persistence
//! collaborator. `ExamRecord` is one persistable row per section;
//! `UnscheduledSection` documents every section it could not place and
//! why.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::section::{ProctorId, RoomId, SectionId};
use super::timeslot::SlotMin;

/// One persistable exam booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamRecord {
    /// Owning program.
    pub program_id: String,
    /// Parent course.
    pub course_id: String,
    /// Section identifier.
    pub section_id: SectionId,
    /// Named sub-sections covered by this booking.
    pub section_names: Vec<String>,
    /// Booked room.
    pub room_id: RoomId,
    /// Exam date.
    pub date: NaiveDate,
    /// Absolute start timestamp.
    pub start: NaiveDateTime,
    /// Absolute end timestamp (start + configured duration).
    pub end: NaiveDateTime,
    /// Exam length in minutes.
    pub duration_min: SlotMin,
    /// Academic year label.
    pub academic_year: String,
    /// Semester / term label.
    pub semester: String,
    /// Exam category (e.g. "Midterm", "Finals").
    pub exam_category: String,
    /// Label of the exam period the date fell into.
    pub exam_period: String,
    /// College display name.
    pub college_name: String,
    /// Building display name of the booked room.
    pub building_name: String,
    /// Primary assigned proctor.
    pub proctor_id: Option<ProctorId>,
    /// Best-effort per-sub-section proctor list, aligned with
    /// `section_names`. `None` entries need manual assignment.
    pub proctor_ids: Vec<Option<ProctorId>>,
    /// Post-exam check-in, filled after the fact by attendance tracking.
    pub proctor_time_in: Option<NaiveDateTime>,
    /// Post-exam check-out, filled after the fact by attendance tracking.
    pub proctor_time_out: Option<NaiveDateTime>,
}

/// A section the materializer could not place, with the reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnscheduledSection {
    /// Section identifier.
    pub section_id: SectionId,
    /// Parent course.
    pub course_id: String,
    /// Named sub-sections.
    pub section_names: Vec<String>,
    /// Short human-readable reason.
    pub reason: String,
}

/// Result of materializing the best candidate: accepted bookings plus
/// the unscheduled report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleOutcome {
    /// Conflict-free bookings ready to persist.
    pub scheduled: Vec<ExamRecord>,
    /// Sections that could not be placed, with reasons.
    pub unscheduled: Vec<UnscheduledSection>,
}

impl ScheduleOutcome {
    /// Creates an empty outcome.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether nothing was scheduled despite sections being requested.
    ///
    /// Callers must treat this as a failure, not an empty success.
    pub fn is_failure(&self) -> bool {
        self.scheduled.is_empty() && !self.unscheduled.is_empty()
    }

    /// Whether every requested section was placed.
    pub fn is_complete(&self) -> bool {
        self.unscheduled.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_states() {
        let mut o = ScheduleOutcome::new();
        assert!(!o.is_failure());
        assert!(o.is_complete());

        o.unscheduled.push(UnscheduledSection {
            section_id: 1,
            course_id: "CS101".into(),
            section_names: vec!["A".into()],
            reason: "no room assigned".into(),
        });
        assert!(o.is_failure());
        assert!(!o.is_complete());
    }
}
