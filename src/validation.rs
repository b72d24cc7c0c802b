//! Pre-flight input validation.
//!
//! Structural problems that doom the whole run are caught before any
//! search effort is spent. All findings are collected and returned
//! together so the caller can surface every problem at once instead of
//! fixing them one re-run at a time.

use std::fmt;

use crate::models::{slot_grid, valid_slots};
use crate::problem::ExamProblem;

/// Category of a pre-flight finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// No approved exam dates were supplied.
    NoExamDates,
    /// No proctor declared availability for any date and slot in play.
    NoProctorAvailability,
    /// The configured duration fits no evening slot, so night classes
    /// cannot be scheduled at all.
    NightDurationUnschedulable,
    /// A night class's instructor declared no evening availability on
    /// any approved date.
    NightInstructorUnavailable,
}

/// One pre-flight finding.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Finding category.
    pub kind: ValidationErrorKind,
    /// Human-readable detail.
    pub message: String,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

/// Checks a problem instance for conditions no amount of searching can
/// recover from. Returns every finding, not just the first.
pub fn validate(problem: &ExamProblem) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if problem.dates().is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoExamDates,
            "no approved exam dates were supplied",
        ));
    }

    let any_availability = problem.dates().iter().any(|&date| {
        slot_grid()
            .into_iter()
            .any(|slot| !problem.availability().available_proctors(date, slot).is_empty())
    });
    if !problem.dates().is_empty() && !problem.sections().is_empty() && !any_availability {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoProctorAvailability,
            "no proctor declared availability on any approved date",
        ));
    }

    let night_sections: Vec<_> = problem
        .sections()
        .iter()
        .filter(|s| s.is_night_class)
        .collect();
    if !night_sections.is_empty() {
        let evening_slots = valid_slots(true, problem.duration_min());
        if evening_slots.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::NightDurationUnschedulable,
                format!(
                    "a {}-minute exam fits no evening slot before the daily cutoff",
                    problem.duration_min()
                ),
            ));
        } else {
            for section in night_sections {
                let Some(instructor) = section.primary_instructor() else {
                    continue;
                };
                let reachable = problem.dates().iter().any(|&date| {
                    evening_slots
                        .iter()
                        .any(|&slot| problem.availability().is_available(instructor, date, slot))
                });
                if !reachable {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::NightInstructorUnavailable,
                        format!(
                            "instructor {} of night class {} has no evening availability \
                             on any approved date",
                            instructor, section.course_id
                        ),
                    ));
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AvailabilityRecord, DayPeriod, ExamDuration, ExamPeriod, RefTables, Section,
    };
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    fn build(
        sections: Vec<Section>,
        dates: Vec<NaiveDate>,
        avail: Vec<AvailabilityRecord>,
        duration: ExamDuration,
    ) -> ExamProblem {
        ExamProblem::new(
            sections,
            dates,
            vec![ExamPeriod::new("P1", d(9), d(13), "Finals")],
            &avail,
            RefTables::new(),
            duration,
        )
    }

    #[test]
    fn test_valid_problem_passes() {
        let p = build(
            vec![Section::new(1, "CS101", "BSCS", "BSCS-1A")],
            vec![d(10)],
            vec![AvailabilityRecord::new(7, vec![d(10)], vec![DayPeriod::Morning])],
            ExamDuration::new(1, 0),
        );
        assert!(validate(&p).is_ok());
    }

    #[test]
    fn test_missing_dates_reported_without_cascade() {
        let p = build(
            vec![Section::new(1, "CS101", "BSCS", "BSCS-1A")],
            Vec::new(),
            Vec::new(),
            ExamDuration::new(1, 0),
        );
        let errors = validate(&p).unwrap_err();
        // Empty dates alone explain the missing availability, so only
        // the date finding fires.
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::NoExamDates);
    }

    #[test]
    fn test_no_availability_reported() {
        let p = build(
            vec![Section::new(1, "CS101", "BSCS", "BSCS-1A")],
            vec![d(10)],
            Vec::new(),
            ExamDuration::new(1, 0),
        );
        let errors = validate(&p).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::NoProctorAvailability);
    }

    #[test]
    fn test_night_duration_unschedulable() {
        // 3.5 hours: the latest evening start 20:30 would need to end
        // 24:00, and even 18:00 ends 21:30; no evening slot fits.
        let p = build(
            vec![Section::new(1, "CS900", "BSCS", "BSCS-4A").night_class(true)],
            vec![d(10)],
            vec![AvailabilityRecord::new(
                7,
                vec![d(10)],
                vec![DayPeriod::Evening],
            )],
            ExamDuration::new(3, 30),
        );
        let errors = validate(&p).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::NightDurationUnschedulable));
    }

    #[test]
    fn test_night_instructor_without_evening_availability() {
        let p = build(
            vec![Section::new(1, "CS900", "BSCS", "BSCS-4A")
                .night_class(true)
                .with_instructors(vec![9])],
            vec![d(10)],
            vec![
                AvailabilityRecord::new(7, vec![d(10)], vec![DayPeriod::Evening]),
                // Instructor 9 is only free mornings.
                AvailabilityRecord::new(9, vec![d(10)], vec![DayPeriod::Morning]),
            ],
            ExamDuration::new(1, 0),
        );
        let errors = validate(&p).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::NightInstructorUnavailable);
        assert!(errors[0].message.contains("CS900"));
    }
}
