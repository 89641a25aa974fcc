//! Job runner: wires a data provider and result sink to a [`JobDriver`].
//!
//! Everything that can reject a job (configuration, unknown job id, data
//! integrity, worker pool construction) happens on the caller's thread, so
//! [`JobRunner::start`] either fails immediately or returns a handle to a
//! job that is already evolving on its own thread.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{info, warn};

use super::{CancellationToken, JobConfig, JobDriver, JobReport};
use crate::error::TimetableError;
use crate::ga::TimetableProblem;
use crate::models::Placement;
use crate::provider::{DataProvider, JobId};
use crate::sink::ResultSink;
use crate::validation::validate_placements;

/// Entry points for running a timetabling job.
#[derive(Debug, Clone, Copy, Default)]
pub struct JobRunner;

impl JobRunner {
    /// Runs a job to completion on the calling thread.
    pub fn run<S: ResultSink + ?Sized>(
        provider: &dyn DataProvider,
        sink: &S,
        job_id: JobId,
        config: JobConfig,
    ) -> Result<JobReport, TimetableError> {
        let job = PreparedJob::load(provider, job_id, &config)?;
        job.execute(
            config,
            sink,
            CancellationToken::new(),
            Arc::new(AtomicUsize::new(0)),
        )
    }

    /// Validates and loads the job, then runs it on a dedicated thread.
    ///
    /// # Example
    /// ```
    /// use std::sync::Arc;
    /// use u_timetable::job::{JobConfig, JobRunner};
    /// use u_timetable::models::{Module, Timeslot, Venue};
    /// use u_timetable::provider::{InMemoryProvider, TimetableDataset};
    /// use u_timetable::sink::LogSink;
    ///
    /// let dataset = TimetableDataset::new(
    ///     vec![Module::new(1, 10).with_enrolled(20)],
    ///     vec![Venue::new(100, 30)],
    ///     vec![Timeslot::new(1000, 0, 9)],
    /// );
    /// let provider = Arc::new(InMemoryProvider::new().with_dataset(7, dataset));
    /// let config = JobConfig::default().with_generations(20).with_population_size(8).with_seed(42);
    ///
    /// let handle = JobRunner::start(provider, Arc::new(LogSink), 7, config).unwrap();
    /// let report = handle.join().unwrap();
    /// assert!(report.is_valid());
    /// ```
    pub fn start(
        provider: Arc<dyn DataProvider>,
        sink: Arc<dyn ResultSink>,
        job_id: JobId,
        config: JobConfig,
    ) -> Result<JobHandle, TimetableError> {
        let job = PreparedJob::load(provider.as_ref(), job_id, &config)?;

        let cancel = CancellationToken::new();
        let generation = Arc::new(AtomicUsize::new(0));
        let thread = {
            let cancel = cancel.clone();
            let generation = Arc::clone(&generation);
            thread::Builder::new()
                .name(format!("timetable-job-{job_id}"))
                .spawn(move || job.execute(config, sink.as_ref(), cancel, generation))?
        };
        info!(job_id, "timetable job started");

        Ok(JobHandle {
            job_id,
            cancel,
            generation,
            thread,
        })
    }
}

/// Control handle for a job running on its own thread.
#[derive(Debug)]
pub struct JobHandle {
    job_id: JobId,
    cancel: CancellationToken,
    generation: Arc<AtomicUsize>,
    thread: JoinHandle<Result<JobReport, TimetableError>>,
}

impl JobHandle {
    pub fn job_id(&self) -> JobId {
        self.job_id
    }

    /// Requests a cooperative stop at the next generation boundary.
    ///
    /// The best chromosome found so far is still reported.
    pub fn stop(&self) {
        info!(job_id = self.job_id, "stop requested");
        self.cancel.cancel();
    }

    /// Generation the driver is currently on.
    pub fn current_generation(&self) -> usize {
        self.generation.load(Ordering::Acquire)
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Waits for the job and returns its report.
    pub fn join(self) -> Result<JobReport, TimetableError> {
        self.thread
            .join()
            .map_err(|_| TimetableError::JobPanicked)?
    }
}

/// A job whose data has been loaded and checked.
struct PreparedJob {
    problem: TimetableProblem,
    existing: Option<Vec<Placement>>,
    pool: Option<ThreadPool>,
}

impl PreparedJob {
    fn load(
        provider: &dyn DataProvider,
        job_id: JobId,
        config: &JobConfig,
    ) -> Result<Self, TimetableError> {
        config.validate()?;
        let data = provider.load(job_id)?;
        let problem = TimetableProblem::new(data.universe, config.weights)?;

        let existing = match data.existing {
            Some(placements) if placements.is_empty() => {
                warn!(job_id, "existing schedule is empty; starting a fresh job");
                None
            }
            existing => existing,
        };
        if let Some(placements) = &existing {
            validate_placements(problem.universe(), placements)?;
        }

        let pool = config.worker_threads.map(build_pool).transpose()?;
        Ok(Self {
            problem,
            existing,
            pool,
        })
    }

    fn execute<S: ResultSink + ?Sized>(
        self,
        config: JobConfig,
        sink: &S,
        cancel: CancellationToken,
        generation: Arc<AtomicUsize>,
    ) -> Result<JobReport, TimetableError> {
        let Self {
            problem,
            existing,
            pool,
        } = self;
        let run = || {
            let driver = JobDriver::new(&problem, config, sink)?
                .with_cancellation(cancel)
                .with_generation_counter(generation);
            match existing.as_deref() {
                Some(placements) => driver.resume(placements),
                None => Ok(driver.run()),
            }
        };
        match pool {
            Some(pool) => pool.install(run),
            None => run(),
        }
    }
}

fn build_pool(threads: usize) -> Result<ThreadPool, TimetableError> {
    ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("timetable-worker-{i}"))
        .build()
        .map_err(|e| TimetableError::WorkerPool(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Module, Timeslot, Venue};
    use crate::provider::{InMemoryProvider, TimetableDataset};
    use crate::sink::{ChannelSink, SinkEvent};

    fn dataset() -> TimetableDataset {
        TimetableDataset::new(
            (0..4).map(|i| Module::new(i, i).with_enrolled(20)).collect(),
            vec![Venue::new(100, 30), Venue::new(101, 30)],
            vec![Timeslot::new(1000, 0, 9), Timeslot::new(1001, 0, 10)],
        )
    }

    fn config() -> JobConfig {
        JobConfig::default()
            .with_generations(30)
            .with_population_size(12)
            .with_seed(42)
    }

    #[test]
    fn test_run_synchronously() {
        let provider = InMemoryProvider::new().with_dataset(1, dataset());
        let (sink, rx) = ChannelSink::new();
        let report = JobRunner::run(&provider, &sink, 1, config()).unwrap();
        assert_eq!(report.schedule.placements.len(), 4);
        assert!(rx.try_iter().any(|e| matches!(e, SinkEvent::Completed(_))));
    }

    #[test]
    fn test_unknown_job_is_not_found() {
        let provider = InMemoryProvider::new();
        let (sink, _rx) = ChannelSink::new();
        assert!(matches!(
            JobRunner::run(&provider, &sink, 9, config()),
            Err(TimetableError::NotFound(9))
        ));
    }

    #[test]
    fn test_dedicated_pool() {
        let provider = InMemoryProvider::new().with_dataset(1, dataset());
        let (sink, _rx) = ChannelSink::new();
        let report = JobRunner::run(&provider, &sink, 1, config().with_worker_threads(2)).unwrap();
        assert_eq!(report.schedule.placements.len(), 4);
    }

    #[test]
    fn test_empty_existing_runs_fresh() {
        let provider =
            InMemoryProvider::new().with_dataset(1, dataset().with_existing(Vec::new()));
        let (sink, _rx) = ChannelSink::new();
        let report = JobRunner::run(&provider, &sink, 1, config()).unwrap();
        assert_eq!(report.schedule.placements.len(), 4);
    }

    #[test]
    fn test_start_and_join() {
        let provider = Arc::new(InMemoryProvider::new().with_dataset(3, dataset()));
        let (sink, rx) = ChannelSink::new();
        let handle = JobRunner::start(provider, Arc::new(sink), 3, config()).unwrap();
        assert_eq!(handle.job_id(), 3);

        let report = handle.join().unwrap();
        let completions = rx
            .try_iter()
            .filter(|e| matches!(e, SinkEvent::Completed(_)))
            .count();
        assert_eq!(completions, 1);
        assert_eq!(report.schedule.placements.len(), 4);
    }
}
