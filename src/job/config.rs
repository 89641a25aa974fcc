//! Job configuration.
//!
//! All tunables of one timetabling run. Construct with `Default` and the
//! `with_*` builders, or deserialize (missing fields take defaults).

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::ga::{CrossoverType, FitnessWeights, GeneticOperators};

/// Configuration for one timetabling job.
///
/// # Example
/// ```
/// use u_timetable::job::JobConfig;
///
/// let config = JobConfig::default()
///     .with_generations(200)
///     .with_population_size(40)
///     .with_elite_survivors(2)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    /// Generations to search for a valid timetable.
    pub generations: usize,
    /// Chromosomes per generation.
    pub population_size: usize,
    /// Chance an offspring is produced by crossover rather than copying.
    pub crossover_probability: f64,
    /// Chance an offspring is mutated.
    pub mutate_probability: f64,
    /// Upper bound on genes changed per mutation.
    pub mutate_genes_max: usize,
    /// Top chromosomes copied unchanged into the next generation.
    pub elite_survivors: usize,
    /// Extra generations after first validity, as a fraction of `generations`.
    pub run_down_proportion: f64,
    /// Progress cadence, as a fraction of `generations`.
    pub report_rate: f64,
    /// Crossover strategy.
    pub crossover_type: CrossoverType,
    /// Hard/soft constraint weighting.
    pub weights: FitnessWeights,
    /// RNG seed. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Build offspring on the rayon pool.
    pub parallel: bool,
    /// Dedicated worker pool size. `None` uses the global pool.
    pub worker_threads: Option<usize>,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            generations: 1000,
            population_size: 100,
            crossover_probability: 0.6,
            mutate_probability: 0.9,
            mutate_genes_max: 3,
            elite_survivors: 2,
            run_down_proportion: 0.1,
            report_rate: 0.05,
            crossover_type: CrossoverType::default(),
            weights: FitnessWeights::default(),
            seed: None,
            parallel: true,
            worker_threads: None,
        }
    }
}

impl JobConfig {
    pub fn with_generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    pub fn with_population_size(mut self, population_size: usize) -> Self {
        self.population_size = population_size;
        self
    }

    pub fn with_crossover_probability(mut self, p: f64) -> Self {
        self.crossover_probability = p;
        self
    }

    pub fn with_mutate_probability(mut self, p: f64) -> Self {
        self.mutate_probability = p;
        self
    }

    pub fn with_mutate_genes_max(mut self, max: usize) -> Self {
        self.mutate_genes_max = max;
        self
    }

    pub fn with_elite_survivors(mut self, elites: usize) -> Self {
        self.elite_survivors = elites;
        self
    }

    pub fn with_run_down_proportion(mut self, proportion: f64) -> Self {
        self.run_down_proportion = proportion;
        self
    }

    pub fn with_report_rate(mut self, rate: f64) -> Self {
        self.report_rate = rate;
        self
    }

    pub fn with_crossover_type(mut self, crossover_type: CrossoverType) -> Self {
        self.crossover_type = crossover_type;
        self
    }

    pub fn with_weights(mut self, weights: FitnessWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = Some(threads);
        self
    }

    /// Checks every rule; the first broken one is returned.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.generations == 0 {
            return Err(ConfigError::ZeroGenerations);
        }
        if self.population_size == 0 {
            return Err(ConfigError::ZeroPopulation);
        }
        if self.population_size < self.elite_survivors + 1 {
            return Err(ConfigError::TooFewForElites {
                population_size: self.population_size,
                elite_survivors: self.elite_survivors,
            });
        }
        check_probability("crossover probability", self.crossover_probability)?;
        check_probability("mutate probability", self.mutate_probability)?;
        check_probability("run-down proportion", self.run_down_proportion)?;
        if !(self.report_rate > 0.0 && self.report_rate <= 1.0) {
            return Err(ConfigError::InvalidReportRate(self.report_rate));
        }
        if self.mutate_genes_max == 0 {
            return Err(ConfigError::ZeroMutateGenes);
        }
        if self.worker_threads == Some(0) {
            return Err(ConfigError::ZeroWorkerThreads);
        }
        self.weights.validate()
    }

    /// Extra generations to run after the first valid chromosome appears.
    pub fn run_down_generations(&self) -> usize {
        (self.run_down_proportion * self.generations as f64) as usize
    }

    /// Generations between progress reports (at least 1).
    pub fn report_interval(&self) -> usize {
        ((self.report_rate * self.generations as f64) as usize).max(1)
    }

    /// Operators described by this configuration.
    pub fn operators(&self) -> GeneticOperators {
        GeneticOperators {
            crossover_type: self.crossover_type,
            mutate_genes_max: self.mutate_genes_max,
        }
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ProbabilityOutOfRange { name, value })
    }
}
