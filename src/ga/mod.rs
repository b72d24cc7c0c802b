//! Evolutionary timetable search.
//!
//! Candidates are fixed-length gene vectors positionally aligned with
//! the problem's section order. Seeding builds near-feasible timetables
//! against conflict ledgers, scoring charges signed penalties for every
//! remaining violation, and the driver evolves the population with
//! tournament selection, uniform crossover, elitism, and group-aware
//! mutation.

mod chromosome;
mod driver;
mod fitness;
mod generator;

pub use chromosome::{Candidate, Gene, UNEVALUATED};
pub use driver::{EvolutionDriver, GaConfig, Progress};
pub use fitness::FitnessEvaluator;
pub use generator::CandidateGenerator;
