//! Proctor availability lookup.
//!
//! Declared availability arrives as flat records (proctor, dates,
//! day periods). The index pre-expands them into a `(date, period)`
//! keyed map so the hot per-gene lookup during generation and mutation
//! is a single hash probe.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::models::{AvailabilityRecord, DayPeriod, ProctorId, SlotMin};

/// Pre-expanded proctor availability keyed by (date, day period).
#[derive(Debug, Clone, Default)]
pub struct AvailabilityIndex {
    by_date_period: HashMap<(NaiveDate, DayPeriod), Vec<ProctorId>>,
}

impl AvailabilityIndex {
    /// Builds the index from declared availability records.
    ///
    /// Each record contributes its proctor to every (date, period) pair
    /// in the cross product of its lists. Duplicate declarations
    /// collapse to one entry; each bucket is sorted by proctor id.
    pub fn from_records(records: &[AvailabilityRecord]) -> Self {
        let mut by_date_period: HashMap<(NaiveDate, DayPeriod), Vec<ProctorId>> = HashMap::new();
        for rec in records {
            for &date in &rec.dates {
                for &period in &rec.periods {
                    by_date_period
                        .entry((date, period))
                        .or_default()
                        .push(rec.proctor_id);
                }
            }
        }
        for bucket in by_date_period.values_mut() {
            bucket.sort_unstable();
            bucket.dedup();
        }
        Self { by_date_period }
    }

    /// Proctors declared available on `date` during the day period the
    /// start slot falls in. Empty for slots outside all period bands.
    pub fn available_proctors(&self, date: NaiveDate, slot_min: SlotMin) -> &[ProctorId] {
        DayPeriod::of_start(slot_min)
            .and_then(|period| self.by_date_period.get(&(date, period)))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether a proctor declared availability for (date, slot period).
    pub fn is_available(&self, proctor_id: ProctorId, date: NaiveDate, slot_min: SlotMin) -> bool {
        self.available_proctors(date, slot_min)
            .binary_search(&proctor_id)
            .is_ok()
    }

    /// Whether any proctor declared availability anywhere.
    pub fn is_empty(&self) -> bool {
        self.by_date_period.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AvailabilityRecord;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    #[test]
    fn test_cross_product_expansion() {
        let idx = AvailabilityIndex::from_records(&[AvailabilityRecord::new(
            5,
            vec![d(10), d(11)],
            vec![DayPeriod::Morning, DayPeriod::Evening],
        )]);

        assert_eq!(idx.available_proctors(d(10), 8 * 60), &[5]);
        assert_eq!(idx.available_proctors(d(11), 19 * 60), &[5]);
        // Afternoon was not declared.
        assert!(idx.available_proctors(d(10), 14 * 60).is_empty());
        // Undeclared date.
        assert!(idx.available_proctors(d(12), 8 * 60).is_empty());
    }

    #[test]
    fn test_duplicate_declarations_collapse() {
        let rec = AvailabilityRecord::new(5, vec![d(10)], vec![DayPeriod::Morning]);
        let idx = AvailabilityIndex::from_records(&[rec.clone(), rec]);
        assert_eq!(idx.available_proctors(d(10), 9 * 60), &[5]);
    }

    #[test]
    fn test_buckets_sorted_by_id() {
        let idx = AvailabilityIndex::from_records(&[
            AvailabilityRecord::new(9, vec![d(10)], vec![DayPeriod::Afternoon]),
            AvailabilityRecord::new(3, vec![d(10)], vec![DayPeriod::Afternoon]),
        ]);
        assert_eq!(idx.available_proctors(d(10), 13 * 60), &[3, 9]);
        assert!(idx.is_available(3, d(10), 13 * 60));
        assert!(!idx.is_available(3, d(10), 9 * 60));
    }

    #[test]
    fn test_repeated_lookup_is_stable() {
        let idx = AvailabilityIndex::from_records(&[
            AvailabilityRecord::new(5, vec![d(10)], vec![DayPeriod::Morning]),
            AvailabilityRecord::new(2, vec![d(10)], vec![DayPeriod::Morning]),
        ]);
        let first = idx.available_proctors(d(10), 8 * 60).to_vec();
        for _ in 0..3 {
            assert_eq!(idx.available_proctors(d(10), 8 * 60), first);
        }
    }

    #[test]
    fn test_slot_outside_bands_has_no_proctors() {
        let idx = AvailabilityIndex::from_records(&[AvailabilityRecord::new(
            5,
            vec![d(10)],
            vec![DayPeriod::Morning, DayPeriod::Afternoon, DayPeriod::Evening],
        )]);
        assert!(idx.available_proctors(d(10), 21 * 60).is_empty());
        assert!(idx.available_proctors(d(10), 6 * 60).is_empty());
    }
}
