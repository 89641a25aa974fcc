//! Timetabling jobs: configuration, the evolution driver and the runner.
//!
//! # State machine
//!
//! ```text
//! Initializing -> Running -> Converged | Exhausted | Stopped -> Terminated
//! ```
//!
//! `Converged` requires a valid chromosome plus the run-down generations;
//! `Exhausted` means the budget ran out with none; `Stopped` is cooperative
//! cancellation. Every terminal path reports the best chromosome once.

mod config;
mod driver;
mod runner;

pub use config::JobConfig;
pub use driver::{CancellationToken, JobDriver, JobOutcome, JobReport, JobState};
pub use runner::{JobHandle, JobRunner};
