//! Problem instance assembled from loaded inputs.
//!
//! `ExamProblem` bundles everything the optimizer reads: the sections
//! to place (in a fixed positional order), the approved exam dates, the
//! availability index, and the reference tables. All candidate
//! timetables in a run share one instance.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::availability::AvailabilityIndex;
use crate::models::{
    valid_slots, AvailabilityRecord, ExamDuration, ExamPeriod, RefTables, Section, SectionId,
    SlotMin,
};

/// Grouping key: sections of one course with matching night status sit
/// their exam together on one date and slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    /// Parent course.
    pub course_id: String,
    /// Night-class flag.
    pub night: bool,
}

/// Run-level display labels stamped onto every output record.
#[derive(Debug, Clone, Default)]
pub struct RunLabels {
    /// Academic year (e.g. "2024-2025").
    pub academic_year: String,
    /// Semester / term.
    pub semester: String,
    /// Exam category (e.g. "Midterm", "Finals").
    pub exam_category: String,
}

/// Immutable scheduling problem shared by all candidates in a run.
#[derive(Debug, Clone)]
pub struct ExamProblem {
    sections: Vec<Section>,
    dates: Vec<NaiveDate>,
    periods: Vec<ExamPeriod>,
    availability: AvailabilityIndex,
    tables: RefTables,
    duration_min: SlotMin,
    labels: RunLabels,
}

impl ExamProblem {
    /// Assembles a problem instance.
    ///
    /// Sections are sorted by id so every candidate's gene at index `i`
    /// refers to the same section. Dates are sorted and deduplicated.
    pub fn new(
        mut sections: Vec<Section>,
        mut dates: Vec<NaiveDate>,
        periods: Vec<ExamPeriod>,
        availability_records: &[AvailabilityRecord],
        tables: RefTables,
        duration: ExamDuration,
    ) -> Self {
        sections.sort_by_key(|s| s.id);
        dates.sort_unstable();
        dates.dedup();
        Self {
            sections,
            dates,
            periods,
            availability: AvailabilityIndex::from_records(availability_records),
            tables,
            duration_min: duration.total_minutes(),
            labels: RunLabels::default(),
        }
    }

    /// Sets the display labels stamped onto output records.
    pub fn with_labels(mut self, labels: RunLabels) -> Self {
        self.labels = labels;
        self
    }

    /// Drops the listed sections from the run entirely.
    pub fn with_excluded(mut self, excluded: &[SectionId]) -> Self {
        let excluded: HashSet<SectionId> = excluded.iter().copied().collect();
        self.sections.retain(|s| !excluded.contains(&s.id));
        self
    }

    /// Sections in fixed positional order (sorted by id).
    #[inline]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Section at a gene position.
    #[inline]
    pub fn section(&self, idx: usize) -> &Section {
        &self.sections[idx]
    }

    /// Approved exam dates, sorted and deduplicated.
    #[inline]
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Approved exam-period windows.
    #[inline]
    pub fn periods(&self) -> &[ExamPeriod] {
        &self.periods
    }

    /// Availability index.
    #[inline]
    pub fn availability(&self) -> &AvailabilityIndex {
        &self.availability
    }

    /// Reference tables.
    #[inline]
    pub fn tables(&self) -> &RefTables {
        &self.tables
    }

    /// Configured exam length in minutes.
    #[inline]
    pub fn duration_min(&self) -> SlotMin {
        self.duration_min
    }

    /// Run-level display labels.
    #[inline]
    pub fn labels(&self) -> &RunLabels {
        &self.labels
    }

    /// Grouping key of a section.
    pub fn group_key(&self, section: &Section) -> GroupKey {
        GroupKey {
            course_id: section.course_id.clone(),
            night: section.is_night_class,
        }
    }

    /// Valid start slots for a section under the configured duration.
    pub fn valid_slots_for(&self, section: &Section) -> Vec<SlotMin> {
        valid_slots(section.is_night_class, self.duration_min)
    }

    /// The exam-period window containing a date, if any.
    pub fn period_for(&self, date: NaiveDate) -> Option<&ExamPeriod> {
        self.periods.iter().find(|p| p.contains(date))
    }

    /// Department of a section's program.
    pub fn department_of(&self, section: &Section) -> &str {
        self.tables.department_of(&section.program_id)
    }

    /// College of a section's program.
    pub fn college_of(&self, section: &Section) -> &str {
        self.tables.college_of(&section.program_id)
    }

    /// Year level of a section: the first ASCII digit found in its
    /// primary name, or `"Unknown"`.
    pub fn year_level(section: &Section) -> String {
        section
            .section_names
            .first()
            .and_then(|name| name.chars().find(char::is_ascii_digit))
            .map(|c| c.to_string())
            .unwrap_or_else(|| "Unknown".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DayPeriod;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    fn small_problem() -> ExamProblem {
        let sections = vec![
            Section::new(3, "CS101", "BSCS", "BSCS-1A"),
            Section::new(1, "CS101", "BSCS", "BSCS-1B"),
            Section::new(2, "MATH201", "BSCS", "BSCS-2A"),
        ];
        let avail = vec![AvailabilityRecord::new(
            7,
            vec![d(10)],
            vec![DayPeriod::Morning],
        )];
        ExamProblem::new(
            sections,
            vec![d(11), d(10), d(10)],
            vec![ExamPeriod::new("P1", d(9), d(13), "Finals Week")],
            &avail,
            RefTables::new(),
            ExamDuration::new(1, 0),
        )
    }

    #[test]
    fn test_sections_sorted_by_id() {
        let p = small_problem();
        let ids: Vec<_> = p.sections().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_dates_sorted_deduped() {
        let p = small_problem();
        assert_eq!(p.dates(), &[d(10), d(11)]);
    }

    #[test]
    fn test_excluded_sections_dropped() {
        let p = small_problem().with_excluded(&[2]);
        let ids: Vec<_> = p.sections().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_group_key_splits_on_night_flag() {
        let p = small_problem();
        let day = Section::new(10, "CS101", "BSCS", "A");
        let night = Section::new(11, "CS101", "BSCS", "B").night_class(true);
        assert_ne!(p.group_key(&day), p.group_key(&night));
        assert_eq!(p.group_key(&day), p.group_key(&p.sections()[0]));
    }

    #[test]
    fn test_year_level_extraction() {
        let s = Section::new(1, "CS101", "BSCS", "BSCS-3A");
        assert_eq!(ExamProblem::year_level(&s), "3");
        let no_digit = Section::new(2, "CS101", "BSCS", "IRREG");
        assert_eq!(ExamProblem::year_level(&no_digit), "Unknown");
    }

    #[test]
    fn test_period_lookup() {
        let p = small_problem();
        assert_eq!(p.period_for(d(10)).map(|w| w.label.as_str()), Some("Finals Week"));
        assert!(p.period_for(d(20)).is_none());
    }
}
