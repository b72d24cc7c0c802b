//! Seeding of initial candidates.
//!
//! The generator builds one candidate at a time against fresh room and
//! proctor ledgers, so the seed population starts close to feasible and
//! the evolutionary search refines rather than rescues. Sections of one
//! course group are placed together: one date, one slot, rooms and
//! proctors assigned per section.
//!
//! Course dates are drawn from a run-level cache shared by every
//! candidate, which keeps a course on the same date across the whole
//! population and lets crossover mix candidates without splitting
//! course groups across dates.

use std::collections::HashMap;

use chrono::NaiveDate;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;

use crate::models::{ProctorId, Section, SlotMin};
use crate::problem::ExamProblem;
use crate::tracker::{MinuteRange, OccupancyTracker};

use super::chromosome::{Candidate, Gene};

/// How many random slot draws to spend per course group before giving
/// up on the feasibility probe, as a multiple of the valid-slot count.
const SLOT_PROBE_FACTOR: usize = 3;

/// A proctor reservation made while seeding, with the gene that owns
/// it. Swap repair rewrites owners when it relocates a reservation.
struct OwnedReservation {
    gene_idx: usize,
    proctor: ProctorId,
    date: NaiveDate,
    range: MinuteRange,
}

/// Seeds candidates for one problem instance.
pub struct CandidateGenerator<'a> {
    problem: &'a ExamProblem,
}

impl<'a> CandidateGenerator<'a> {
    /// Creates a generator over a problem instance.
    pub fn new(problem: &'a ExamProblem) -> Self {
        Self { problem }
    }

    /// Course groups as (first-seen order) lists of gene positions.
    pub fn course_groups(&self) -> Vec<Vec<usize>> {
        let mut order: Vec<Vec<usize>> = Vec::new();
        let mut by_key: HashMap<crate::problem::GroupKey, usize> = HashMap::new();
        for (idx, section) in self.problem.sections().iter().enumerate() {
            let key = self.problem.group_key(section);
            match by_key.get(&key) {
                Some(&pos) => order[pos].push(idx),
                None => {
                    by_key.insert(key, order.len());
                    order.push(vec![idx]);
                }
            }
        }
        order
    }

    /// Builds one seed candidate.
    ///
    /// `course_dates` is the run-level course → date cache; a course
    /// missing from it gets a random approved date which is then
    /// recorded for every later candidate.
    pub fn generate<R: Rng>(
        &self,
        course_dates: &mut HashMap<String, NaiveDate>,
        rng: &mut R,
    ) -> Candidate {
        let duration = self.problem.duration_min();
        let mut rooms: OccupancyTracker<String> = OccupancyTracker::new();
        let mut proctors: OccupancyTracker<ProctorId> = OccupancyTracker::new();
        let mut assigned: Vec<OwnedReservation> = Vec::new();
        let mut genes: Vec<Option<Gene>> = Vec::new();
        genes.resize_with(self.problem.sections().len(), || None);

        for group in self.course_groups() {
            let lead = self.problem.section(group[0]);
            let date = self.course_date(lead, course_dates, rng);
            let slot = self.pick_group_slot(&group, date, duration, &rooms, rng);

            for &idx in &group {
                let section = self.problem.section(idx);
                let start = slot;
                let end = start + duration;

                let room_id = self.pick_room(section, date, start, end, &rooms, rng);
                if let Some(room) = &room_id {
                    rooms.reserve(room.clone(), date, start, end);
                }

                let proctor_id = self.pick_proctor(
                    section,
                    date,
                    start,
                    end,
                    &mut proctors,
                    &mut assigned,
                    &mut genes,
                    rng,
                );
                if let Some(proctor) = proctor_id {
                    proctors.reserve(proctor, date, start, end);
                    assigned.push(OwnedReservation {
                        gene_idx: idx,
                        proctor,
                        date,
                        range: MinuteRange::new(start, end),
                    });
                }

                genes[idx] = Some(Gene {
                    section_id: section.id,
                    date,
                    slot_min: slot,
                    room_id,
                    proctor_id,
                });
            }
        }

        Candidate::new(genes.into_iter().flatten().collect())
    }

    /// Date for a course group, drawn once per run and cached.
    fn course_date<R: Rng>(
        &self,
        lead: &Section,
        course_dates: &mut HashMap<String, NaiveDate>,
        rng: &mut R,
    ) -> NaiveDate {
        if let Some(&date) = course_dates.get(&lead.course_id) {
            return date;
        }
        let date = self
            .problem
            .dates()
            .choose(rng)
            .copied()
            .unwrap_or_default();
        course_dates.insert(lead.course_id.clone(), date);
        date
    }

    /// Draws random slots until every section in the group can find a
    /// free candidate room, falling back to a plain random slot.
    ///
    /// The probe checks feasibility only; rooms are reserved later per
    /// section, so two probed sections may still contend for one room.
    fn pick_group_slot<R: Rng>(
        &self,
        group: &[usize],
        date: NaiveDate,
        duration: SlotMin,
        rooms: &OccupancyTracker<String>,
        rng: &mut R,
    ) -> SlotMin {
        let lead = self.problem.section(group[0]);
        let slots = self.problem.valid_slots_for(lead);
        if slots.is_empty() {
            return crate::models::FIRST_SLOT_MIN;
        }

        for _ in 0..slots.len() * SLOT_PROBE_FACTOR {
            let slot = slots[rng.random_range(0..slots.len())];
            let all_fit = group.iter().all(|&idx| {
                let section = self.problem.section(idx);
                section
                    .candidate_rooms
                    .iter()
                    .any(|room| rooms.is_free(room, date, slot, slot + duration))
            });
            if all_fit {
                return slot;
            }
        }
        slots[rng.random_range(0..slots.len())]
    }

    /// First free candidate room in declared order, else a random
    /// candidate, else nothing.
    fn pick_room<R: Rng>(
        &self,
        section: &Section,
        date: NaiveDate,
        start: SlotMin,
        end: SlotMin,
        rooms: &OccupancyTracker<String>,
        rng: &mut R,
    ) -> Option<String> {
        section
            .candidate_rooms
            .iter()
            .find(|room| rooms.is_free(*room, date, start, end))
            .cloned()
            .or_else(|| section.candidate_rooms.choose(rng).cloned())
    }

    /// Proctor selection chain, in priority order: the night-class
    /// instructor, any free available proctor, the declared or an
    /// alternate instructor, and finally a swap repair that relocates
    /// one conflicting reservation to free a proctor up.
    #[allow(clippy::too_many_arguments)]
    fn pick_proctor<R: Rng>(
        &self,
        section: &Section,
        date: NaiveDate,
        start: SlotMin,
        end: SlotMin,
        proctors: &mut OccupancyTracker<ProctorId>,
        assigned: &mut Vec<OwnedReservation>,
        genes: &mut [Option<Gene>],
        rng: &mut R,
    ) -> Option<ProctorId> {
        let available = self.problem.availability().available_proctors(date, start);

        if section.is_night_class {
            if let Some(instructor) = section.primary_instructor() {
                if available.contains(&instructor) && proctors.is_free(&instructor, date, start, end)
                {
                    return Some(instructor);
                }
            }
        }

        let mut pool: Vec<ProctorId> = available.to_vec();
        pool.shuffle(rng);
        if let Some(&free) = pool
            .iter()
            .find(|&&p| proctors.is_free(&p, date, start, end))
        {
            return Some(free);
        }

        for &instructor in &section.instructor_ids {
            if proctors.is_free(&instructor, date, start, end) {
                return Some(instructor);
            }
        }

        self.repair_by_swap(available, date, start, end, proctors, assigned, genes)
    }

    /// Single-level repair: find an available proctor whose only
    /// conflict with our window can be relocated to another free
    /// available proctor, move that reservation over (rewriting its
    /// owning gene), and take the freed proctor.
    fn repair_by_swap(
        &self,
        available: &[ProctorId],
        date: NaiveDate,
        start: SlotMin,
        end: SlotMin,
        proctors: &mut OccupancyTracker<ProctorId>,
        assigned: &mut [OwnedReservation],
        genes: &mut [Option<Gene>],
    ) -> Option<ProctorId> {
        let probe = MinuteRange::new(start, end);
        for &p in available {
            let conflicts: Vec<MinuteRange> = proctors
                .ranges(&p, date)
                .iter()
                .copied()
                .filter(|r| r.overlaps(&probe))
                .collect();
            let [conflict] = conflicts[..] else {
                continue;
            };

            for &q in available {
                if q == p || !proctors.is_free(&q, date, conflict.start, conflict.end) {
                    continue;
                }
                proctors.release(&p, date, conflict.start, conflict.end);
                proctors.reserve(q, date, conflict.start, conflict.end);
                if let Some(owner) = assigned
                    .iter_mut()
                    .find(|o| o.proctor == p && o.date == date && o.range == conflict)
                {
                    owner.proctor = q;
                    if let Some(gene) = genes[owner.gene_idx].as_mut() {
                        gene.proctor_id = Some(q);
                    }
                }
                return Some(p);
            }
        }
        None
    }
}
