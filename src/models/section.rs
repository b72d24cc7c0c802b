//! Exam-scheduling input models.
//!
//! These types are supplied fully loaded by an external data-access
//! collaborator before optimization starts and are never mutated by the
//! optimizer. Room capacity is already applied upstream: a section's
//! `candidate_rooms` list contains only rooms that fit it.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::timeslot::DayPeriod;

/// Section identifier (one exam sitting; may cover several named
/// sub-sections sharing one room and slot).
pub type SectionId = i64;

/// Room identifier.
pub type RoomId = String;

/// Proctor (user) identifier.
pub type ProctorId = i64;

/// A course section needing an exam.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Unique section identifier.
    pub id: SectionId,
    /// Parent course identifier.
    pub course_id: String,
    /// Owning program identifier.
    pub program_id: String,
    /// Named sub-sections sitting this exam together (at least one).
    pub section_names: Vec<String>,
    /// Whether this is a night-class offering.
    pub is_night_class: bool,
    /// Candidate rooms, pre-filtered for capacity upstream.
    pub candidate_rooms: Vec<RoomId>,
    /// Declared instructor ids, aligned with `section_names` where known.
    pub instructor_ids: Vec<ProctorId>,
    /// Enrolled head count (informational; capacity is pre-applied).
    pub enrolled: u32,
}

impl Section {
    /// Creates a section with the minimum required identity fields.
    pub fn new(
        id: SectionId,
        course_id: impl Into<String>,
        program_id: impl Into<String>,
        section_name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            course_id: course_id.into(),
            program_id: program_id.into(),
            section_names: vec![section_name.into()],
            is_night_class: false,
            candidate_rooms: Vec::new(),
            instructor_ids: Vec::new(),
            enrolled: 0,
        }
    }

    /// Marks the section as a night class.
    pub fn night_class(mut self, night: bool) -> Self {
        self.is_night_class = night;
        self
    }

    /// Sets the candidate room list.
    pub fn with_rooms(mut self, rooms: Vec<RoomId>) -> Self {
        self.candidate_rooms = rooms;
        self
    }

    /// Sets the instructor id list.
    pub fn with_instructors(mut self, instructors: Vec<ProctorId>) -> Self {
        self.instructor_ids = instructors;
        self
    }

    /// Adds a further named sub-section to this sitting.
    pub fn with_extra_name(mut self, name: impl Into<String>) -> Self {
        self.section_names.push(name.into());
        self
    }

    /// Sets the enrolled head count.
    pub fn with_enrolled(mut self, enrolled: u32) -> Self {
        self.enrolled = enrolled;
        self
    }

    /// Primary declared instructor, if any.
    pub fn primary_instructor(&self) -> Option<ProctorId> {
        self.instructor_ids.first().copied()
    }
}

/// An approved exam-period window with its display label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamPeriod {
    /// Period identifier.
    pub id: String,
    /// First day of the window (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the window (inclusive).
    pub end_date: NaiveDate,
    /// Human-readable label carried onto output records.
    pub label: String,
}

impl ExamPeriod {
    /// Creates a period window.
    pub fn new(
        id: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            start_date,
            end_date,
            label: label.into(),
        }
    }

    /// Whether a date falls inside this window (inclusive on both ends).
    #[inline]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

/// One proctor's declared availability: free on each listed date during
/// each listed day period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityRecord {
    /// Declaring proctor.
    pub proctor_id: ProctorId,
    /// Dates the declaration covers.
    pub dates: Vec<NaiveDate>,
    /// Day periods free on each of those dates.
    pub periods: Vec<DayPeriod>,
}

impl AvailabilityRecord {
    /// Creates an availability record.
    pub fn new(proctor_id: ProctorId, dates: Vec<NaiveDate>, periods: Vec<DayPeriod>) -> Self {
        Self {
            proctor_id,
            dates,
            periods,
        }
    }
}

/// External reference tables resolved read-only during scoring and
/// materialization. Missing links resolve to `"unknown"` rather than
/// failing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefTables {
    /// program id → department id.
    pub program_department: HashMap<String, String>,
    /// department id → college id.
    pub department_college: HashMap<String, String>,
    /// college id → display name.
    pub college_names: HashMap<String, String>,
    /// room id → building display name.
    pub room_building: HashMap<RoomId, String>,
}

impl RefTables {
    /// Creates empty tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Department of a program, `"unknown"` if unmapped.
    pub fn department_of(&self, program_id: &str) -> &str {
        self.program_department
            .get(program_id)
            .map(String::as_str)
            .unwrap_or("unknown")
    }

    /// College of a program (via its department), `"unknown"` if unmapped.
    pub fn college_of(&self, program_id: &str) -> &str {
        self.department_college
            .get(self.department_of(program_id))
            .map(String::as_str)
            .unwrap_or("unknown")
    }

    /// Display name of a college id, falling back to the id itself.
    pub fn college_name<'a>(&'a self, college_id: &'a str) -> &'a str {
        self.college_names
            .get(college_id)
            .map(String::as_str)
            .unwrap_or(college_id)
    }

    /// Building name for a room, `"unknown"` if unmapped.
    pub fn building_of(&self, room_id: &str) -> &str {
        self.room_building
            .get(room_id)
            .map(String::as_str)
            .unwrap_or("unknown")
    }
}
