//! Error types.
//!
//! Only conditions that stop a job from starting (or from running at all)
//! are errors. A job that ends without a valid timetable is a normal
//! outcome, reported through [`JobOutcome::Exhausted`](crate::job::JobOutcome).

use crate::provider::JobId;
use crate::validation::ValidationError;

/// Top-level error for timetabling jobs.
#[derive(Debug, thiserror::Error)]
pub enum TimetableError {
    /// The job configuration was rejected before initialisation.
    #[error("invalid job configuration: {0}")]
    Configuration(#[from] ConfigError),
    /// The universe or existing schedule is inconsistent.
    #[error("data integrity check failed with {} issue(s)", .0.len())]
    DataIntegrity(Vec<ValidationError>),
    /// The data provider does not know this job.
    #[error("no scheduling context found for job {0}")]
    NotFound(JobId),
    /// The bounded worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    WorkerPool(String),
    /// The dedicated job thread could not be spawned.
    #[error("failed to spawn job thread: {0}")]
    Spawn(#[from] std::io::Error),
    /// The dedicated job thread panicked.
    #[error("job thread panicked")]
    JobPanicked,
}

impl From<Vec<ValidationError>> for TimetableError {
    fn from(errors: Vec<ValidationError>) -> Self {
        TimetableError::DataIntegrity(errors)
    }
}

/// Job configuration validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("generation budget must be positive")]
    ZeroGenerations,
    #[error("population size must be positive")]
    ZeroPopulation,
    #[error("population size {population_size} must exceed elite survivors {elite_survivors}")]
    TooFewForElites {
        population_size: usize,
        elite_survivors: usize,
    },
    #[error("{name} must be within [0, 1], got {value}")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },
    #[error("report rate must be within (0, 1], got {0}")]
    InvalidReportRate(f64),
    #[error("at least one gene must be mutated per mutation")]
    ZeroMutateGenes,
    #[error("hard constraint unit must be positive, got {0}")]
    NonPositiveHardUnit(i64),
    #[error("soft constraint slots must be positive, got {0}")]
    NonPositiveSoftSlots(i64),
    #[error("fitness for {modules} modules at hard unit {hard_constraint_unit} overflows i64")]
    FitnessOverflow {
        modules: usize,
        hard_constraint_unit: i64,
    },
    #[error("worker thread count must be positive")]
    ZeroWorkerThreads,
}
