//! Per-(date, resource) occupancy ledger.
//!
//! Tracks occupied `[start, end)` minute ranges per resource per day.
//! Two independent instances exist per pass: one keyed by room id, one
//! by proctor id.
//!
//! This is deliberately a dumb ledger: `reserve` appends without
//! validation so callers can make speculative reservations and undo
//! them with `release` (the swap-based proctor repair depends on this).
//! Enforcement is the caller's job via `is_free`.
//!
//! # Overlap Semantics
//! Ranges are half-open: `[a, b)` and `[b, c)` touch but do not
//! conflict.

use std::collections::HashMap;
use std::hash::Hash;

use chrono::NaiveDate;

use crate::models::SlotMin;

/// An occupied `[start, end)` minute range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinuteRange {
    /// Start minute (inclusive).
    pub start: SlotMin,
    /// End minute (exclusive).
    pub end: SlotMin,
}

impl MinuteRange {
    /// Creates a range.
    pub fn new(start: SlotMin, end: SlotMin) -> Self {
        Self { start, end }
    }

    /// Whether two half-open ranges overlap.
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Occupancy ledger for one resource class, keyed by (date, resource).
#[derive(Debug, Clone)]
pub struct OccupancyTracker<R> {
    entries: HashMap<(NaiveDate, R), Vec<MinuteRange>>,
}

impl<R: Eq + Hash + Clone> OccupancyTracker<R> {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Whether no stored range for (date, resource) overlaps `[start, end)`.
    pub fn is_free(&self, resource: &R, date: NaiveDate, start: SlotMin, end: SlotMin) -> bool {
        self.overlap_count(resource, date, start, end) == 0
    }

    /// Number of stored ranges overlapping `[start, end)`.
    pub fn overlap_count(
        &self,
        resource: &R,
        date: NaiveDate,
        start: SlotMin,
        end: SlotMin,
    ) -> usize {
        let probe = MinuteRange::new(start, end);
        self.ranges(resource, date)
            .iter()
            .filter(|r| r.overlaps(&probe))
            .count()
    }

    /// Appends a range unconditionally. Overlap checking is the
    /// caller's responsibility.
    pub fn reserve(&mut self, resource: R, date: NaiveDate, start: SlotMin, end: SlotMin) {
        self.entries
            .entry((date, resource))
            .or_default()
            .push(MinuteRange::new(start, end));
    }

    /// Removes one previously stored exact range. Returns whether a
    /// matching range was found.
    pub fn release(&mut self, resource: &R, date: NaiveDate, start: SlotMin, end: SlotMin) -> bool {
        let target = MinuteRange::new(start, end);
        if let Some(ranges) = self.entries.get_mut(&(date, resource.clone())) {
            if let Some(pos) = ranges.iter().position(|r| *r == target) {
                ranges.swap_remove(pos);
                return true;
            }
        }
        false
    }

    /// Stored ranges for (date, resource); empty slice if none.
    pub fn ranges(&self, resource: &R, date: NaiveDate) -> &[MinuteRange] {
        self.entries
            .get(&(date, resource.clone()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl<R: Eq + Hash + Clone> Default for OccupancyTracker<R> {
    fn default() -> Self {
        Self::new()
    }
}
