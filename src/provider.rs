//! Data provider boundary.
//!
//! A provider resolves a job id into the scheduling universe and, when the
//! job modifies an existing timetable, the current placements. Persistence
//! lives behind this trait; the core never talks to storage directly.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::TimetableError;
use crate::models::{Module, Placement, Timeslot, TimetableUniverse, Venue};

/// Scheduling job identifier.
pub type JobId = u64;

/// Everything a job needs at start.
#[derive(Debug, Clone)]
pub struct JobData {
    /// Immutable scheduling facts.
    pub universe: TimetableUniverse,
    /// Existing placements when modifying a timetable, else `None`.
    pub existing: Option<Vec<Placement>>,
}

/// Supplies job data by id.
pub trait DataProvider: Send + Sync {
    /// Loads the universe (and existing schedule, if any) for `job_id`.
    ///
    /// Fails with [`TimetableError::NotFound`] for unknown ids.
    fn load(&self, job_id: JobId) -> Result<JobData, TimetableError>;
}

/// Serializable job data, as stored by [`InMemoryProvider`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimetableDataset {
    pub modules: Vec<Module>,
    pub venues: Vec<Venue>,
    pub timeslots: Vec<Timeslot>,
    #[serde(default)]
    pub existing: Option<Vec<Placement>>,
}

impl TimetableDataset {
    /// Creates a dataset for a fresh timetable.
    pub fn new(modules: Vec<Module>, venues: Vec<Venue>, timeslots: Vec<Timeslot>) -> Self {
        Self {
            modules,
            venues,
            timeslots,
            existing: None,
        }
    }

    /// Sets the existing placements to resume from.
    pub fn with_existing(mut self, placements: Vec<Placement>) -> Self {
        self.existing = Some(placements);
        self
    }

    /// Indexes the dataset into job data.
    pub fn into_job_data(self) -> JobData {
        JobData {
            universe: TimetableUniverse::new(self.modules, self.venues, self.timeslots),
            existing: self.existing,
        }
    }
}

/// Provider backed by datasets held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    datasets: HashMap<JobId, TimetableDataset>,
}

impl InMemoryProvider {
    /// Creates an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a dataset under `job_id`.
    pub fn with_dataset(mut self, job_id: JobId, dataset: TimetableDataset) -> Self {
        self.insert(job_id, dataset);
        self
    }

    /// Registers or replaces a dataset.
    pub fn insert(&mut self, job_id: JobId, dataset: TimetableDataset) {
        self.datasets.insert(job_id, dataset);
    }
}

impl DataProvider for InMemoryProvider {
    fn load(&self, job_id: JobId) -> Result<JobData, TimetableError> {
        self.datasets
            .get(&job_id)
            .cloned()
            .map(TimetableDataset::into_job_data)
            .ok_or(TimetableError::NotFound(job_id))
    }
}
