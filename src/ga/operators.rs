//! Configurable genetic operators for timetabling.
//!
//! Provides runtime-selectable crossover via [`GeneticOperators`].
//!
//! # Usage
//!
//! ```
//! use u_timetable::ga::operators::{CrossoverType, GeneticOperators};
//!
//! let ops = GeneticOperators::default();
//! assert_eq!(ops.crossover_type, CrossoverType::TwoRange);
//! assert_eq!(ops.mutate_genes_max, 1);
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{Chromosome, TimetableProblem};

/// Crossover strategy for timetable chromosomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossoverType {
    /// Donor prefix up to one random point.
    SinglePoint,
    /// One random contiguous donor range.
    ContiguousRange,
    /// Two random contiguous donor ranges.
    #[default]
    TwoRange,
}

/// Runtime-selectable genetic operators.
///
/// # Example
///
/// ```
/// use u_timetable::ga::operators::{CrossoverType, GeneticOperators};
///
/// let ops = GeneticOperators {
///     crossover_type: CrossoverType::SinglePoint,
///     mutate_genes_max: 3,
/// };
/// ```
#[derive(Debug, Clone)]
pub struct GeneticOperators {
    /// Crossover strategy.
    pub crossover_type: CrossoverType,
    /// Upper bound on genes changed per mutation.
    pub mutate_genes_max: usize,
}

impl Default for GeneticOperators {
    fn default() -> Self {
        Self {
            crossover_type: CrossoverType::default(),
            mutate_genes_max: 1,
        }
    }
}

impl GeneticOperators {
    /// Crosses `donor` into `child` in place using the configured strategy.
    pub fn crossover<'u, R: Rng>(
        &self,
        child: &mut Chromosome<'u>,
        donor: &Chromosome<'u>,
        problem: &'u TimetableProblem,
        rng: &mut R,
    ) {
        match self.crossover_type {
            CrossoverType::SinglePoint => child.crossover_single_point(donor, problem, rng),
            CrossoverType::ContiguousRange => child.crossover_contiguous_range(donor, problem, rng),
            CrossoverType::TwoRange => child.crossover_two_range(donor, problem, rng),
        }
    }

    /// Returns a mutated copy of `chromosome`.
    pub fn mutate<'u, R: Rng>(
        &self,
        chromosome: &Chromosome<'u>,
        problem: &'u TimetableProblem,
        rng: &mut R,
    ) -> Chromosome<'u> {
        chromosome.mutate(problem, self.mutate_genes_max, rng)
    }
}
