//! Exam timetabling by evolutionary search.
//!
//! Given course sections, approved exam dates, candidate rooms, and
//! declared proctor availability, the crate searches for a timetable
//! that places every section on a date and half-hour slot with a room
//! and a proctor, then strictly re-validates the winner into
//! persistable records.
//!
//! # Pipeline
//!
//! 1. [`validation::validate`] rejects inputs no search can satisfy.
//! 2. [`ga::EvolutionDriver`] seeds a population of candidate
//!    timetables and evolves them under a penalty-based fitness.
//! 3. [`materializer::materialize`] replays the best candidate through
//!    fresh conflict ledgers and demotes anything still conflicting to
//!    an unscheduled report.
//!
//! [`synthesize`] runs the whole pipeline.
//!
//! ```
//! use chrono::NaiveDate;
//! use exam_timetabler::models::{
//!     AvailabilityRecord, DayPeriod, ExamDuration, ExamPeriod, RefTables, Section,
//! };
//! use exam_timetabler::{synthesize, ExamProblem, GaConfig};
//! use rand::rngs::SmallRng;
//! use rand::SeedableRng;
//!
//! let date = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
//! let problem = ExamProblem::new(
//!     vec![Section::new(1, "CS101", "BSCS", "BSCS-1A").with_rooms(vec!["R1".into()])],
//!     vec![date],
//!     vec![ExamPeriod::new("P1", date, date, "Finals Week")],
//!     &[AvailabilityRecord::new(7, vec![date], vec![DayPeriod::Morning])],
//!     RefTables::new(),
//!     ExamDuration::new(1, 0),
//! );
//!
//! let mut rng = SmallRng::seed_from_u64(42);
//! let outcome = synthesize(&problem, GaConfig::default(), &mut rng).unwrap();
//! assert!(outcome.is_complete());
//! ```

pub mod availability;
pub mod ga;
pub mod materializer;
pub mod models;
pub mod problem;
pub mod tracker;
pub mod validation;

use rand::Rng;
use thiserror::Error;
use tracing::info;

pub use availability::AvailabilityIndex;
pub use ga::{Candidate, EvolutionDriver, GaConfig, Progress};
pub use materializer::materialize;
pub use models::ScheduleOutcome;
pub use problem::{ExamProblem, GroupKey, RunLabels};
pub use tracker::{MinuteRange, OccupancyTracker};
pub use validation::{ValidationError, ValidationErrorKind};

/// Failure of a whole scheduling run.
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// Pre-flight validation found conditions the search cannot fix.
    /// All findings are carried so callers can report them together.
    #[error("infeasible scheduling input ({} finding(s))", .0.len())]
    Infeasible(Vec<ValidationError>),
}

/// Runs the full pipeline: validation, evolutionary search, and strict
/// materialization of the best timetable found.
pub fn synthesize<R: Rng>(
    problem: &ExamProblem,
    config: GaConfig,
    rng: &mut R,
) -> Result<ScheduleOutcome, SynthesisError> {
    validation::validate(problem).map_err(SynthesisError::Infeasible)?;
    if problem.sections().is_empty() {
        return Ok(ScheduleOutcome::new());
    }

    let mut driver = EvolutionDriver::new(problem, config, rng);
    let best = driver.run(rng);
    info!(
        fitness = best.fitness,
        sections = problem.sections().len(),
        "materializing best timetable"
    );
    Ok(materialize(problem, &best))
}
