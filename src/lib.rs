//! University timetabling with a genetic algorithm.
//!
//! Places every course module into one (venue, timeslot) pair so that no
//! two modules share a venue, a lecturer or a course at the same time, and
//! every module sits in a venue of the right kind and size. Among valid
//! timetables, departments' building preferences and lecturers' timeslot
//! preferences are maximised.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Module`, `Venue`, `Timeslot`,
//!   `TimetableUniverse`, and the id-level `Schedule` a job produces
//! - **`ga`**: Encoding (`Gene`, `Chromosome`), fitness, crossover and
//!   mutation operators, roulette selection
//! - **`job`**: `JobConfig`, the generational `JobDriver` state machine, and
//!   `JobRunner` for running a job on its own thread
//! - **`provider`** / **`sink`**: Where job data comes from and where
//!   progress and results go
//! - **`validation`**: Input integrity checks (duplicate IDs, dangling
//!   references in an existing schedule)
//! - **`kpi`**: Reporting metrics for a finished timetable
//!
//! # Fitness
//!
//! Hard constraints are weighted so heavily that any valid timetable
//! outscores every invalid one; soft preferences only order timetables
//! within the same hard-constraint class.
//!
//! # References
//!
//! - Burke & Petrovic (2002), "Recent research directions in automated timetabling"
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization, and Machine Learning"

pub mod error;
pub mod ga;
pub mod job;
pub mod kpi;
pub mod models;
pub mod provider;
pub mod sink;
pub mod validation;

pub use error::{ConfigError, TimetableError};
pub use job::{JobConfig, JobOutcome, JobReport, JobRunner};
