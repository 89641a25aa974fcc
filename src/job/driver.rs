//! Population driver: the generational loop of one timetabling job.
//!
//! # Algorithm
//!
//! 1. Seed the population (random, or one resumed chromosome plus random).
//! 2. Each generation: rank by fitness, copy the elites, then fill the rest
//!    with offspring built from roulette-selected parents by optional
//!    crossover and optional mutation.
//! 3. Stop once the first valid chromosome has been followed by the
//!    configured run-down generations (`Converged`), when the budget is
//!    spent with nothing valid (`Exhausted`), or on cancellation (`Stopped`).
//!
//! # Concurrency
//!
//! Offspring are independent: each reads two ranked parents and owns its
//! output slot, so they are built on the rayon pool. Every offspring gets
//! its own `SmallRng` seeded from the driver's RNG, which makes a seeded
//! run reproducible regardless of thread interleaving. Generations are a
//! barrier: the next one starts only after every offspring is finished.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, info};

use super::JobConfig;
use crate::error::TimetableError;
use crate::ga::{Chromosome, GeneticOperators, RouletteWheel, TimetableProblem, rank};
use crate::models::{Placement, Schedule};
use crate::sink::{Progress, ResultSink};

/// Driver lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Initializing,
    Running,
    Converged,
    Exhausted,
    Stopped,
    Terminated,
}

/// How a job ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    /// A valid timetable was found and the run-down completed.
    Converged,
    /// The budget ran out with no valid timetable.
    Exhausted,
    /// Cancelled at a generation boundary.
    Stopped,
}

impl From<JobOutcome> for JobState {
    fn from(outcome: JobOutcome) -> Self {
        match outcome {
            JobOutcome::Converged => JobState::Converged,
            JobOutcome::Exhausted => JobState::Exhausted,
            JobOutcome::Stopped => JobState::Stopped,
        }
    }
}

/// Final result of a job.
#[derive(Debug, Clone, PartialEq)]
pub struct JobReport {
    pub outcome: JobOutcome,
    /// Index of the last generation evaluated.
    pub generations: usize,
    /// Generation the first valid chromosome appeared in.
    pub first_valid_generation: Option<usize>,
    /// Best timetable found.
    pub schedule: Schedule,
}

impl JobReport {
    /// Whether the reported timetable violates no hard constraint.
    pub fn is_valid(&self) -> bool {
        self.schedule.is_valid
    }
}

/// Cooperative cancellation flag, checked between generations.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the job to stop at the next generation boundary.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Evolves a population for one job.
///
/// # Example
/// ```
/// use u_timetable::ga::TimetableProblem;
/// use u_timetable::job::{JobConfig, JobDriver, JobOutcome};
/// use u_timetable::models::{Module, Timeslot, TimetableUniverse, Venue};
/// use u_timetable::sink::LogSink;
///
/// let universe = TimetableUniverse::new(
///     vec![Module::new(1, 10).with_enrolled(20), Module::new(2, 11).with_enrolled(20)],
///     vec![Venue::new(100, 30), Venue::new(101, 30)],
///     vec![Timeslot::new(1000, 0, 9), Timeslot::new(1001, 0, 10)],
/// );
/// let config = JobConfig::default()
///     .with_generations(50)
///     .with_population_size(20)
///     .with_seed(42);
/// let problem = TimetableProblem::new(universe, config.weights).unwrap();
/// let report = JobDriver::new(&problem, config, &LogSink).unwrap().run();
/// assert_eq!(report.outcome, JobOutcome::Converged);
/// assert!(report.is_valid());
/// ```
pub struct JobDriver<'u, S: ResultSink + ?Sized> {
    problem: &'u TimetableProblem,
    config: JobConfig,
    operators: GeneticOperators,
    sink: &'u S,
    cancel: CancellationToken,
    generation: Arc<AtomicUsize>,
    state: JobState,
    rng: SmallRng,
}

impl<'u, S: ResultSink + ?Sized> JobDriver<'u, S> {
    /// Creates a driver; rejects invalid configuration before initialising.
    pub fn new(
        problem: &'u TimetableProblem,
        config: JobConfig,
        sink: &'u S,
    ) -> Result<Self, TimetableError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        Ok(Self {
            problem,
            operators: config.operators(),
            config,
            sink,
            cancel: CancellationToken::new(),
            generation: Arc::new(AtomicUsize::new(0)),
            state: JobState::Initializing,
            rng,
        })
    }

    /// Uses an externally held cancellation token.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Publishes the current generation through `counter`.
    ///
    /// The driver is the only writer.
    pub fn with_generation_counter(mut self, counter: Arc<AtomicUsize>) -> Self {
        self.generation = counter;
        self
    }

    /// Current lifecycle state.
    pub fn state(&self) -> JobState {
        self.state
    }

    /// Runs a fresh job from a random population.
    pub fn run(mut self) -> JobReport {
        self.evolve(None)
    }

    /// Runs a job seeded with an existing schedule.
    ///
    /// The remaining `population_size - 1` chromosomes are random so the
    /// search is not locked into the seed's neighbourhood. An empty
    /// schedule is treated as a fresh job.
    pub fn resume(mut self, placements: &[Placement]) -> Result<JobReport, TimetableError> {
        if placements.is_empty() {
            info!("existing schedule has no placements; starting a fresh job");
            return Ok(self.evolve(None));
        }
        let genes = self.problem.resolve_placements(placements, &mut self.rng)?;
        let seed = Chromosome::from_genes(self.problem, genes);
        Ok(self.evolve(Some(seed)))
    }

    fn evolve(&mut self, seed: Option<Chromosome<'u>>) -> JobReport {
        self.transition(JobState::Initializing);
        info!(
            modules = self.problem.chromosome_len(),
            population = self.config.population_size,
            generations = self.config.generations,
            resumed = seed.is_some(),
            "starting timetable job"
        );

        if self.problem.chromosome_len() == 0 {
            return self.finish(JobOutcome::Converged, 0, Some(0), Schedule::empty());
        }

        let mut population = self.initial_population(seed);
        self.transition(JobState::Running);

        let run_down = self.config.run_down_generations();
        let report_every = self.config.report_interval();
        let mut first_valid: Option<usize> = None;
        let mut best: Option<Chromosome<'u>> = None;
        let mut generation = 0;

        let outcome = loop {
            rank(&mut population);
            self.generation.store(generation, Ordering::Release);

            let leader = &population[0];
            let (best_fitness, best_valid) = (leader.fitness(), leader.is_valid());
            if best.as_ref().is_none_or(|b| best_fitness > b.fitness()) {
                best = Some(leader.clone());
            }
            if first_valid.is_none() && population.iter().any(Chromosome::is_valid) {
                info!(generation, run_down, "first valid timetable found");
                first_valid = Some(generation);
            }

            debug!(generation, best_fitness, best_valid, "generation ranked");
            if generation % report_every == 0 {
                self.sink.report_progress(Progress {
                    generation,
                    best_fitness,
                    is_valid: best_valid,
                });
            }

            match first_valid {
                Some(first) if generation >= first + run_down => break JobOutcome::Converged,
                None if generation >= self.config.generations => break JobOutcome::Exhausted,
                _ => {}
            }
            if self.cancel.is_cancelled() {
                info!(generation, "cancellation requested");
                break JobOutcome::Stopped;
            }

            population = self.next_generation(&population);
            generation += 1;
        };

        // Valid chromosomes always outrank invalid ones, so best-so-far wins.
        let winner = best.unwrap_or_else(|| population[0].clone());
        let schedule = winner.to_schedule();
        drop(population);
        self.finish(outcome, generation, first_valid, schedule)
    }

    fn initial_population(&mut self, seed: Option<Chromosome<'u>>) -> Vec<Chromosome<'u>> {
        let randoms = self.config.population_size - usize::from(seed.is_some());
        let seeds: Vec<u64> = (0..randoms).map(|_| self.rng.random()).collect();
        let problem = self.problem;
        let build = |s: u64| Chromosome::random(problem, &mut SmallRng::seed_from_u64(s));

        let mut population: Vec<Chromosome<'u>> = if self.config.parallel {
            seeds.into_par_iter().map(build).collect()
        } else {
            seeds.into_iter().map(build).collect()
        };
        if let Some(seed) = seed {
            population.insert(0, seed);
        }
        population
    }

    /// Builds generation k+1 from ranked generation k.
    fn next_generation(&mut self, ranked: &[Chromosome<'u>]) -> Vec<Chromosome<'u>> {
        let elites = self.config.elite_survivors.min(ranked.len());
        let offspring = self.config.population_size - elites;
        let wheel = RouletteWheel::new(ranked);
        let seeds: Vec<u64> = (0..offspring).map(|_| self.rng.random()).collect();

        let problem = self.problem;
        let operators = &self.operators;
        let crossover_p = self.config.crossover_probability;
        let mutate_p = self.config.mutate_probability;
        let breed = |s: u64| {
            let mut rng = SmallRng::seed_from_u64(s);
            breed_one(problem, operators, ranked, &wheel, crossover_p, mutate_p, &mut rng)
        };

        let mut next = Vec::with_capacity(self.config.population_size);
        next.extend(ranked[..elites].iter().cloned());
        if self.config.parallel {
            next.par_extend(seeds.into_par_iter().map(breed));
        } else {
            next.extend(seeds.into_iter().map(breed));
        }
        next
    }

    fn finish(
        &mut self,
        outcome: JobOutcome,
        generations: usize,
        first_valid_generation: Option<usize>,
        schedule: Schedule,
    ) -> JobReport {
        self.transition(outcome.into());
        info!(
            ?outcome,
            generations,
            fitness = schedule.fitness,
            valid = schedule.is_valid,
            "timetable job finished"
        );
        self.sink.report_completion(&schedule);
        self.transition(JobState::Terminated);
        JobReport {
            outcome,
            generations,
            first_valid_generation,
            schedule,
        }
    }

    fn transition(&mut self, next: JobState) {
        if self.state != next {
            debug!(from = ?self.state, to = ?next, "job state");
            self.state = next;
        }
    }
}

/// One offspring: roulette-select two parents, cross with probability
/// `crossover_p` (else copy the first), then mutate with probability `mutate_p`.
fn breed_one<'u, R: Rng>(
    problem: &'u TimetableProblem,
    operators: &GeneticOperators,
    ranked: &[Chromosome<'u>],
    wheel: &RouletteWheel,
    crossover_p: f64,
    mutate_p: f64,
    rng: &mut R,
) -> Chromosome<'u> {
    let first = wheel.spin(rng).unwrap_or(0);
    let second = wheel.spin(rng).unwrap_or(0);

    let mut child = ranked[first].clone();
    if rng.random_bool(crossover_p) {
        operators.crossover(&mut child, &ranked[second], problem, rng);
    }
    if rng.random_bool(mutate_p) {
        child = operators.mutate(&child, problem, rng);
    }
    child
}
