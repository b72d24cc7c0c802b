//! Exam-timetabling domain models.
//!
//! Inputs (`Section`, `ExamPeriod`, `AvailabilityRecord`, `RefTables`)
//! are supplied read-only by an external data-access collaborator;
//! outputs (`ExamRecord`, `UnscheduledSection`, `ScheduleOutcome`) are
//! handed to an external persistence collaborator. Time-slot math lives
//! in [`timeslot`].

mod schedule;
mod section;
pub mod timeslot;

pub use schedule::{ExamRecord, ScheduleOutcome, UnscheduledSection};
pub use section::{
    AvailabilityRecord, ExamPeriod, ProctorId, RefTables, RoomId, Section, SectionId,
};
pub use timeslot::{
    fmt_slot, is_grid_slot, slot_grid, valid_slots, DayPeriod, ExamDuration, SlotMin,
    DAY_END_CUTOFF_MIN, FIRST_SLOT_MIN, LAST_SLOT_MIN, SLOT_STEP_MIN,
};
