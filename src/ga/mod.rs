//! GA-based timetable optimization.
//!
//! # Encoding
//!
//! A [`Chromosome`] is a vector of [`Gene`]s, one per module, index-aligned
//! to the universe's module order. Each gene borrows its module, venue and
//! timeslot from the [`TimetableProblem`], so copying genes between parents
//! is a shallow copy.
//!
//! # Submodules
//!
//! - [`fitness`]: Hard/soft constraint scoring and its tunable weights
//! - [`operators`]: Runtime-selectable crossover and mutation
//! - [`selection`]: Roulette wheel parent selection

mod chromosome;
pub mod fitness;
mod gene;
pub mod operators;
mod problem;
pub mod selection;

pub use chromosome::{Chromosome, rank};
pub use fitness::{FitnessBreakdown, FitnessWeights};
pub use gene::Gene;
pub use operators::{CrossoverType, GeneticOperators};
pub use problem::TimetableProblem;
pub use selection::RouletteWheel;
