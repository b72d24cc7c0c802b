//! Evolutionary search loop.
//!
//! A steady generational scheme: the elite carry over unchanged, the
//! rest of the next population comes from tournament-selected parents
//! recombined gene-by-gene and mutated. The best candidate ever seen is
//! tracked separately so a lucky early timetable is never lost to
//! later drift.
//!
//! `step` advances one generation, so callers needing a cooperative
//! loop (progress reporting, cancellation) can drive the search
//! themselves; `run` drives it to completion with a checkpoint callback
//! every few generations.

use std::collections::HashMap;

use chrono::NaiveDate;
use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::{debug, info};

use crate::models::ProctorId;
use crate::problem::ExamProblem;

use super::chromosome::{Candidate, Gene, UNEVALUATED};
use super::fitness::FitnessEvaluator;
use super::generator::CandidateGenerator;

/// Tournament size for parent selection.
const TOURNAMENT_SIZE: usize = 3;

/// Extra gate on whole-group date mutations; date moves are the most
/// disruptive mutation so they fire less often than their kind is drawn.
const DATE_MUTATION_GATE: f64 = 0.3;

/// Search parameters.
#[derive(Debug, Clone)]
pub struct GaConfig {
    /// Candidates per generation.
    pub population_size: usize,
    /// Generations to run.
    pub generations: usize,
    /// Per-gene mutation probability.
    pub mutation_rate: f64,
    /// Top candidates cloned unchanged into the next generation.
    pub elite_count: usize,
    /// Checkpoint callback cadence, in generations.
    pub checkpoint_every: usize,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 100,
            mutation_rate: 0.25,
            elite_count: 5,
            checkpoint_every: 10,
        }
    }
}

/// Progress snapshot handed to the checkpoint callback.
#[derive(Debug, Clone, Copy)]
pub struct Progress {
    /// Generations completed so far.
    pub generation: usize,
    /// Total generations configured.
    pub total_generations: usize,
    /// Fitness of the best candidate seen so far.
    pub best_fitness: i64,
}

/// Drives the evolutionary search over one problem instance.
pub struct EvolutionDriver<'a> {
    problem: &'a ExamProblem,
    config: GaConfig,
    generator: CandidateGenerator<'a>,
    evaluator: FitnessEvaluator<'a>,
    population: Vec<Candidate>,
    generation: usize,
    best: Candidate,
}

impl<'a> EvolutionDriver<'a> {
    /// Seeds and scores the initial population.
    pub fn new<R: Rng>(problem: &'a ExamProblem, config: GaConfig, rng: &mut R) -> Self {
        let generator = CandidateGenerator::new(problem);
        let evaluator = FitnessEvaluator::new(problem);
        let mut course_dates = HashMap::new();

        let mut population: Vec<Candidate> = (0..config.population_size)
            .map(|_| generator.generate(&mut course_dates, rng))
            .collect();
        for candidate in &mut population {
            candidate.fitness = evaluator.score(candidate);
        }
        population.sort_by(|a, b| b.fitness.cmp(&a.fitness));

        let best = population
            .first()
            .cloned()
            .unwrap_or_else(|| Candidate::new(Vec::new()));
        debug!(seed_best = best.fitness, "population seeded");

        Self {
            problem,
            config,
            generator,
            evaluator,
            population,
            generation: 0,
            best,
        }
    }

    /// Generations completed so far.
    #[inline]
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Best candidate seen across all generations.
    #[inline]
    pub fn best(&self) -> &Candidate {
        &self.best
    }

    /// Current population, sorted best-first.
    #[inline]
    pub fn population(&self) -> &[Candidate] {
        &self.population
    }

    /// Current progress snapshot.
    pub fn progress(&self) -> Progress {
        Progress {
            generation: self.generation,
            total_generations: self.config.generations,
            best_fitness: self.best.fitness,
        }
    }

    /// Advances one generation. Returns `false` once the configured
    /// generation count is exhausted.
    pub fn step<R: Rng>(&mut self, rng: &mut R) -> bool {
        if self.generation >= self.config.generations {
            return false;
        }

        // Population is kept sorted best-first between steps.
        let elite = self.config.elite_count.min(self.population.len());
        let mut next: Vec<Candidate> = self.population[..elite].to_vec();

        while next.len() < self.config.population_size {
            let parent_a = self.tournament(rng);
            let parent_b = self.tournament(rng);
            let (mut child_a, mut child_b) = self.crossover(parent_a, parent_b, rng);
            self.mutate(&mut child_a, rng);
            child_a.fitness = self.evaluator.score(&child_a);
            next.push(child_a);
            if next.len() < self.config.population_size {
                self.mutate(&mut child_b, rng);
                child_b.fitness = self.evaluator.score(&child_b);
                next.push(child_b);
            }
        }

        next.sort_by(|a, b| b.fitness.cmp(&a.fitness));
        if let Some(top) = next.first() {
            if top.fitness > self.best.fitness {
                self.best = top.clone();
            }
        }
        self.population = next;
        self.generation += 1;
        debug!(
            generation = self.generation,
            best = self.best.fitness,
            "generation complete"
        );
        true
    }

    /// Runs the remaining generations to completion.
    pub fn run<R: Rng>(&mut self, rng: &mut R) -> Candidate {
        self.run_with_checkpoint(rng, |_| {})
    }

    /// Runs to completion, invoking `checkpoint` every
    /// [`GaConfig::checkpoint_every`] generations.
    pub fn run_with_checkpoint<R, F>(&mut self, rng: &mut R, mut checkpoint: F) -> Candidate
    where
        R: Rng,
        F: FnMut(Progress),
    {
        let cadence = self.config.checkpoint_every.max(1);
        while self.step(rng) {
            if self.generation % cadence == 0 {
                let progress = self.progress();
                info!(
                    generation = progress.generation,
                    total = progress.total_generations,
                    best = progress.best_fitness,
                    "search checkpoint"
                );
                checkpoint(progress);
            }
        }
        info!(best = self.best.fitness, "search finished");
        self.best.clone()
    }

    /// Tournament of [`TOURNAMENT_SIZE`]: the first drawn candidate
    /// wins ties, so selection pressure only replaces on strictly
    /// better fitness.
    fn tournament<R: Rng>(&self, rng: &mut R) -> &Candidate {
        let mut winner = &self.population[rng.random_range(0..self.population.len())];
        for _ in 1..TOURNAMENT_SIZE {
            let challenger = &self.population[rng.random_range(0..self.population.len())];
            if challenger.fitness > winner.fitness {
                winner = challenger;
            }
        }
        winner
    }

    /// Uniform crossover: each gene position flips a fair coin on
    /// whether the parents swap there, producing two complementary
    /// children. Positional alignment keeps every section present
    /// exactly once in each child.
    fn crossover<R: Rng>(
        &self,
        a: &Candidate,
        b: &Candidate,
        rng: &mut R,
    ) -> (Candidate, Candidate) {
        let mut genes_a = Vec::with_capacity(a.genes.len());
        let mut genes_b = Vec::with_capacity(b.genes.len());
        for (ga, gb) in a.genes.iter().zip(&b.genes) {
            if rng.random_bool(0.5) {
                genes_a.push(gb.clone());
                genes_b.push(ga.clone());
            } else {
                genes_a.push(ga.clone());
                genes_b.push(gb.clone());
            }
        }
        (Candidate::new(genes_a), Candidate::new(genes_b))
    }

    /// Mutation pass. Date and slot mutations move the whole course
    /// group together and re-pick proctors for every moved gene; room
    /// and proctor mutations touch the drawn gene only.
    fn mutate<R: Rng>(&self, candidate: &mut Candidate, rng: &mut R) {
        let groups = self.generator.course_groups();
        let mut group_of = vec![0usize; candidate.genes.len()];
        for (gi, group) in groups.iter().enumerate() {
            for &idx in group {
                group_of[idx] = gi;
            }
        }

        for idx in 0..candidate.genes.len() {
            if !rng.random_bool(self.config.mutation_rate) {
                continue;
            }
            let section = self.problem.section(idx);
            match rng.random_range(0..4u8) {
                0 => {
                    if rng.random_bool(DATE_MUTATION_GATE) {
                        if let Some(&date) = self.problem.dates().choose(rng) {
                            for &sib in &groups[group_of[idx]] {
                                candidate.genes[sib].date = date;
                                let slot = candidate.genes[sib].slot_min;
                                candidate.genes[sib].proctor_id = self.mutation_proctor(
                                    self.problem.section(sib),
                                    date,
                                    slot,
                                    rng,
                                );
                            }
                        }
                    }
                }
                1 => {
                    if let Some(&slot) = self.problem.valid_slots_for(section).choose(rng) {
                        for &sib in &groups[group_of[idx]] {
                            candidate.genes[sib].slot_min = slot;
                            let date = candidate.genes[sib].date;
                            candidate.genes[sib].proctor_id = self.mutation_proctor(
                                self.problem.section(sib),
                                date,
                                slot,
                                rng,
                            );
                        }
                    }
                }
                2 => {
                    if let Some(room) = section.candidate_rooms.choose(rng) {
                        candidate.genes[idx].room_id = Some(room.clone());
                    }
                }
                _ => {
                    let Gene { date, slot_min, .. } = candidate.genes[idx];
                    candidate.genes[idx].proctor_id =
                        self.mutation_proctor(section, date, slot_min, rng);
                }
            }
        }
        candidate.fitness = UNEVALUATED;
    }

    /// Proctor re-pick used by mutation: the night-class instructor
    /// when declared available, else a random available proctor.
    /// Conflicts introduced here are left for scoring to punish.
    fn mutation_proctor<R: Rng>(
        &self,
        section: &crate::models::Section,
        date: NaiveDate,
        slot_min: i32,
        rng: &mut R,
    ) -> Option<ProctorId> {
        let available = self.problem.availability().available_proctors(date, slot_min);
        if section.is_night_class {
            if let Some(instructor) = section.primary_instructor() {
                if available.contains(&instructor) {
                    return Some(instructor);
                }
            }
        }
        available.choose(rng).copied()
    }
}
