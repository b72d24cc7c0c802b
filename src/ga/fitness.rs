//! Candidate scoring.
//!
//! Fitness starts at zero and accumulates signed penalties and rewards
//! while walking the gene vector in order. Room occupancy is replayed
//! into a fresh ledger per evaluation; proctor occupancy is tracked
//! locally because the same-department gap checks need the reserving
//! section's department alongside each range.
//!
//! Walk order matters for the pairwise checks: each gene is compared
//! against the reservations made by earlier genes only, so a colliding
//! pair is charged exactly once.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use crate::models::{ProctorId, SectionId, SlotMin};
use crate::problem::{ExamProblem, GroupKey};
use crate::tracker::{MinuteRange, OccupancyTracker};

use super::chromosome::Candidate;

/// Penalty per repeated occurrence of a section id.
pub const PENALTY_DUPLICATE_SECTION: i64 = -10_000;
/// Penalty per gene whose course group spans more than one date.
pub const PENALTY_GROUP_SPLIT_DATE: i64 = -25_000;
/// Penalty per gene whose course group uses a second slot on one date.
pub const PENALTY_GROUP_SPLIT_SLOT: i64 = -15_000;
/// Penalty per overlapping exam pair within one student cohort.
pub const PENALTY_COHORT_OVERLAP: i64 = -5_000;
/// Penalty per gene mixing year levels of one college in one slot.
pub const PENALTY_COLLEGE_YEAR_MIX: i64 = -8_000;
/// Penalty for a gene with no room assigned.
pub const PENALTY_NO_ROOM: i64 = -8_000;
/// Penalty per overlapping booking in the same room.
pub const PENALTY_ROOM_OVERLAP: i64 = -20_000;
/// Penalty for a gene with no proctor assigned.
pub const PENALTY_NO_PROCTOR: i64 = -6_000;
/// Penalty per overlapping assignment of one proctor.
pub const PENALTY_PROCTOR_OVERLAP: i64 = -30_000;
/// Penalty for zero-gap back-to-back exams within one department.
pub const PENALTY_DEPT_BACK_TO_BACK: i64 = -12_000;
/// Per-minute penalty scale for short same-department gaps.
pub const PENALTY_DEPT_SHORT_GAP_PER_MIN: i64 = -100;
/// Reward for a gene with both a room and a proctor.
pub const REWARD_FULLY_STAFFED: i64 = 1_000;

/// Scores candidates against one shared problem instance.
pub struct FitnessEvaluator<'a> {
    problem: &'a ExamProblem,
}

impl<'a> FitnessEvaluator<'a> {
    /// Creates an evaluator over a problem instance.
    pub fn new(problem: &'a ExamProblem) -> Self {
        Self { problem }
    }

    /// Scores a candidate. Higher is better; zero means no penalties
    /// and no rewards fired.
    pub fn score(&self, candidate: &Candidate) -> i64 {
        let duration = self.problem.duration_min();
        let mut score: i64 = 0;

        let mut seen_sections: HashSet<SectionId> = HashSet::new();
        let mut group_dates: HashMap<GroupKey, HashSet<NaiveDate>> = HashMap::new();
        let mut group_slot: HashMap<(GroupKey, NaiveDate), SlotMin> = HashMap::new();
        // (date, year level, program) → occupied ranges of that cohort.
        let mut cohort_ranges: HashMap<(NaiveDate, String, String), Vec<MinuteRange>> =
            HashMap::new();
        // (date, slot, college) → year levels starting there.
        let mut college_years: HashMap<(NaiveDate, SlotMin, String), HashSet<String>> =
            HashMap::new();
        let mut rooms: OccupancyTracker<String> = OccupancyTracker::new();
        // (date, proctor) → ranges with the reserving department.
        let mut proctors: HashMap<(NaiveDate, ProctorId), Vec<(MinuteRange, String)>> =
            HashMap::new();

        for (idx, gene) in candidate.genes.iter().enumerate() {
            let section = self.problem.section(idx);
            let start = gene.slot_min;
            let end = start + duration;
            let range = MinuteRange::new(start, end);

            if !seen_sections.insert(gene.section_id) {
                score += PENALTY_DUPLICATE_SECTION;
            }

            // Course-group cohesion: one date, one slot per group.
            let key = self.problem.group_key(section);
            let dates = group_dates.entry(key.clone()).or_default();
            dates.insert(gene.date);
            if dates.len() > 1 {
                score += PENALTY_GROUP_SPLIT_DATE;
            }
            let first_slot = group_slot
                .entry((key, gene.date))
                .or_insert(gene.slot_min);
            if *first_slot != gene.slot_min {
                score += PENALTY_GROUP_SPLIT_SLOT;
            }

            // Students of one (year level, program) cohort cannot sit
            // two exams at once.
            let year = ExamProblem::year_level(section);
            let cohort = cohort_ranges
                .entry((gene.date, year.clone(), section.program_id.clone()))
                .or_default();
            let collisions = cohort.iter().filter(|r| r.overlaps(&range)).count();
            score += PENALTY_COHORT_OVERLAP * collisions as i64;
            cohort.push(range);

            // One college keeps each slot to a single year level.
            let college = self.problem.college_of(section).to_string();
            let years = college_years
                .entry((gene.date, gene.slot_min, college))
                .or_default();
            years.insert(year);
            if years.len() > 1 {
                score += PENALTY_COLLEGE_YEAR_MIX;
            }

            match &gene.room_id {
                Some(room) => {
                    let clashes = rooms.overlap_count(room, gene.date, start, end);
                    score += PENALTY_ROOM_OVERLAP * clashes as i64;
                    rooms.reserve(room.clone(), gene.date, start, end);
                }
                None => score += PENALTY_NO_ROOM,
            }

            let dept = self.problem.department_of(section).to_string();
            match gene.proctor_id {
                Some(proctor) => {
                    let assigned = proctors.entry((gene.date, proctor)).or_default();
                    for (existing, existing_dept) in assigned.iter() {
                        if existing.overlaps(&range) {
                            score += PENALTY_PROCTOR_OVERLAP;
                        } else if *existing_dept == dept && existing.end <= start {
                            // Same-department proctors need a recovery
                            // gap of at least one exam length.
                            let gap = (start - existing.end) as i64;
                            if gap == 0 {
                                score += PENALTY_DEPT_BACK_TO_BACK;
                            } else if gap < duration as i64 {
                                score += PENALTY_DEPT_SHORT_GAP_PER_MIN * (duration as i64 - gap);
                            }
                        }
                    }
                    assigned.push((range, dept));
                }
                None => score += PENALTY_NO_PROCTOR,
            }

            if gene.room_id.is_some() && gene.proctor_id.is_some() {
                score += REWARD_FULLY_STAFFED;
            }
        }

        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AvailabilityRecord, DayPeriod, ExamDuration, ExamPeriod, RefTables, Section,
    };

    use super::super::chromosome::Gene;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    fn problem(sections: Vec<Section>) -> ExamProblem {
        let avail = vec![AvailabilityRecord::new(
            7,
            vec![d(10)],
            vec![DayPeriod::Morning, DayPeriod::Afternoon],
        )];
        ExamProblem::new(
            sections,
            vec![d(10), d(11)],
            vec![ExamPeriod::new("P1", d(9), d(13), "Finals")],
            &avail,
            RefTables::new(),
            ExamDuration::new(1, 0),
        )
    }

    fn gene(section_id: i64, date: NaiveDate, slot: SlotMin) -> Gene {
        Gene {
            section_id,
            date,
            slot_min: slot,
            room_id: Some(format!("R{section_id}")),
            proctor_id: Some(100 + section_id),
        }
    }

    #[test]
    fn test_clean_candidate_earns_staffing_reward() {
        // Same date and slot for the whole course group, distinct rooms,
        // proctors, and programs, so only the staffing reward fires.
        let p = problem(vec![
            Section::new(1, "CS101", "BSCS", "BSCS-1A"),
            Section::new(2, "CS101", "BSIT", "BSIT-1B"),
        ]);
        let c = Candidate::new(vec![gene(1, d(10), 8 * 60), gene(2, d(10), 8 * 60)]);
        assert_eq!(FitnessEvaluator::new(&p).score(&c), 2 * REWARD_FULLY_STAFFED);
    }

    #[test]
    fn test_group_split_date_penalized() {
        let p = problem(vec![
            Section::new(1, "CS101", "BSCS", "BSCS-1A"),
            Section::new(2, "CS101", "BSIT", "BSIT-1B"),
        ]);
        let split = Candidate::new(vec![gene(1, d(10), 8 * 60), gene(2, d(11), 8 * 60)]);
        let together = Candidate::new(vec![gene(1, d(10), 8 * 60), gene(2, d(10), 8 * 60)]);
        let eval = FitnessEvaluator::new(&p);
        assert_eq!(eval.score(&split), eval.score(&together) + PENALTY_GROUP_SPLIT_DATE);
    }

    #[test]
    fn test_group_split_slot_penalized() {
        let p = problem(vec![
            Section::new(1, "CS101", "BSCS", "BSCS-1A"),
            Section::new(2, "CS101", "BSIT", "BSIT-1B"),
        ]);
        let eval = FitnessEvaluator::new(&p);
        let together = Candidate::new(vec![gene(1, d(10), 8 * 60), gene(2, d(10), 8 * 60)]);
        // Non-overlapping second slot so only the split penalty fires.
        let split = Candidate::new(vec![gene(1, d(10), 8 * 60), gene(2, d(10), 10 * 60)]);
        assert_eq!(eval.score(&split), eval.score(&together) + PENALTY_GROUP_SPLIT_SLOT);
    }

    #[test]
    fn test_cohort_overlap_penalized() {
        let p = problem(vec![
            Section::new(1, "CS101", "BSCS", "BSCS-1A"),
            Section::new(2, "MATH201", "BSCS", "BSCS-1B"),
        ]);
        let eval = FitnessEvaluator::new(&p);
        // Different courses, same (year, program) cohort, overlapping
        // windows on the same date.
        let clash = Candidate::new(vec![gene(1, d(10), 8 * 60), gene(2, d(10), 8 * 60 + 30)]);
        let apart = Candidate::new(vec![gene(1, d(10), 8 * 60), gene(2, d(10), 10 * 60)]);
        assert_eq!(eval.score(&clash), eval.score(&apart) + PENALTY_COHORT_OVERLAP);
    }

    #[test]
    fn test_missing_room_and_proctor_penalized() {
        let p = problem(vec![Section::new(1, "CS101", "BSCS", "BSCS-1A")]);
        let eval = FitnessEvaluator::new(&p);
        let mut g = gene(1, d(10), 8 * 60);
        g.room_id = None;
        g.proctor_id = None;
        let c = Candidate::new(vec![g]);
        assert_eq!(eval.score(&c), PENALTY_NO_ROOM + PENALTY_NO_PROCTOR);
    }

    #[test]
    fn test_room_overlap_penalized_per_pair() {
        let p = problem(vec![
            Section::new(1, "CS101", "BSCS", "BSCS-1A"),
            Section::new(2, "CS101", "BSIT", "BSIT-1B"),
        ]);
        let eval = FitnessEvaluator::new(&p);
        let mut a = gene(1, d(10), 8 * 60);
        let mut b = gene(2, d(10), 8 * 60);
        a.room_id = Some("R1".into());
        b.room_id = Some("R1".into());
        let clash = Candidate::new(vec![a.clone(), b]);
        let mut b2 = gene(2, d(10), 8 * 60);
        b2.room_id = Some("R2".into());
        let clean = Candidate::new(vec![a, b2]);
        assert_eq!(eval.score(&clash), eval.score(&clean) + PENALTY_ROOM_OVERLAP);
    }

    #[test]
    fn test_proctor_overlap_dominates() {
        let p = problem(vec![
            Section::new(1, "CS101", "BSCS", "BSCS-1A"),
            Section::new(2, "CS101", "BSIT", "BSIT-1B"),
        ]);
        let eval = FitnessEvaluator::new(&p);
        let mut a = gene(1, d(10), 8 * 60);
        let mut b = gene(2, d(10), 8 * 60);
        a.proctor_id = Some(7);
        b.proctor_id = Some(7);
        let clash = Candidate::new(vec![a, b]);
        let clean = Candidate::new(vec![gene(1, d(10), 8 * 60), gene(2, d(10), 8 * 60)]);
        assert_eq!(eval.score(&clash), eval.score(&clean) + PENALTY_PROCTOR_OVERLAP);
    }

    #[test]
    fn test_same_department_back_to_back() {
        let mut tables = RefTables::new();
        tables.program_department.insert("BSCS".into(), "DCS".into());
        let sections = vec![
            Section::new(1, "CS101", "BSCS", "BSCS-1A"),
            Section::new(2, "MATH201", "BSCS", "BSCS-2B"),
        ];
        let p = ExamProblem::new(
            sections,
            vec![d(10)],
            vec![ExamPeriod::new("P1", d(9), d(13), "Finals")],
            &[],
            tables,
            ExamDuration::new(1, 0),
        );
        let eval = FitnessEvaluator::new(&p);
        let mut a = gene(1, d(10), 8 * 60);
        let mut b = gene(2, d(10), 9 * 60); // starts exactly when a ends
        a.proctor_id = Some(7);
        b.proctor_id = Some(7);
        let back_to_back = Candidate::new(vec![a.clone(), b]);
        let mut b2 = gene(2, d(10), 11 * 60); // full recovery gap
        b2.proctor_id = Some(7);
        let rested = Candidate::new(vec![a, b2]);
        assert_eq!(
            eval.score(&back_to_back),
            eval.score(&rested) + PENALTY_DEPT_BACK_TO_BACK
        );
    }

    #[test]
    fn test_same_department_short_gap_scales() {
        let mut tables = RefTables::new();
        tables.program_department.insert("BSCS".into(), "DCS".into());
        let sections = vec![
            Section::new(1, "CS101", "BSCS", "BSCS-1A"),
            Section::new(2, "MATH201", "BSCS", "BSCS-2B"),
        ];
        let p = ExamProblem::new(
            sections,
            vec![d(10)],
            vec![ExamPeriod::new("P1", d(9), d(13), "Finals")],
            &[],
            tables,
            ExamDuration::new(1, 0),
        );
        let eval = FitnessEvaluator::new(&p);
        let mut a = gene(1, d(10), 8 * 60);
        a.proctor_id = Some(7);
        // 30-minute gap against a 60-minute exam: 30 short minutes.
        let mut b = gene(2, d(10), 9 * 60 + 30);
        b.proctor_id = Some(7);
        let short = Candidate::new(vec![a.clone(), b]);
        let mut b2 = gene(2, d(10), 10 * 60);
        b2.proctor_id = Some(7);
        let rested = Candidate::new(vec![a, b2]);
        assert_eq!(
            eval.score(&short),
            eval.score(&rested) + PENALTY_DEPT_SHORT_GAP_PER_MIN * 30
        );
    }

    #[test]
    fn test_duplicate_section_id_penalized() {
        let p = problem(vec![
            Section::new(1, "CS101", "BSCS", "BSCS-1A"),
            Section::new(2, "CS101", "BSIT", "BSIT-1B"),
        ]);
        let eval = FitnessEvaluator::new(&p);
        let mut dup = gene(2, d(10), 8 * 60);
        dup.section_id = 1;
        let c = Candidate::new(vec![gene(1, d(10), 8 * 60), dup]);
        let clean = Candidate::new(vec![gene(1, d(10), 8 * 60), gene(2, d(10), 8 * 60)]);
        assert_eq!(eval.score(&c), eval.score(&clean) + PENALTY_DUPLICATE_SECTION);
    }
}
