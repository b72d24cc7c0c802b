//! Candidate timetable representation.
//!
//! A candidate is a fixed-length gene vector positionally aligned with
//! the problem's section order: gene `i` always describes the section
//! at index `i`, in every candidate of the run. Crossover therefore
//! mixes assignments for the same section and can never duplicate or
//! drop a section by construction.

use chrono::NaiveDate;

use crate::models::{ProctorId, RoomId, SectionId, SlotMin};

/// Fitness value of a candidate that has not been scored yet.
pub const UNEVALUATED: i64 = i64::MIN;

/// One section's assignment inside a candidate timetable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gene {
    /// Section this gene describes. Redundant with the gene's position
    /// but kept for diagnostics and scoring.
    pub section_id: SectionId,
    /// Assigned exam date.
    pub date: NaiveDate,
    /// Assigned start slot, minutes since midnight.
    pub slot_min: SlotMin,
    /// Assigned room; `None` means the generator found no free room.
    pub room_id: Option<RoomId>,
    /// Assigned proctor; `None` means no proctor could be found.
    pub proctor_id: Option<ProctorId>,
}

/// A complete candidate timetable with its cached fitness.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Genes, positionally aligned with the problem's section order.
    pub genes: Vec<Gene>,
    /// Cached fitness; [`UNEVALUATED`] until scored.
    pub fitness: i64,
}

impl Candidate {
    /// Wraps a gene vector as an unscored candidate.
    pub fn new(genes: Vec<Gene>) -> Self {
        Self {
            genes,
            fitness: UNEVALUATED,
        }
    }
}
