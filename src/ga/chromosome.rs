//! Timetable chromosome: one gene per module, index-aligned to the universe.
//!
//! # Encoding
//!
//! Position `i` holds the placement of the universe's `i`-th module, so
//! crossover is a plain positional copy between two parents and can never
//! drop or duplicate a module.
//!
//! # Fitness cache
//!
//! Fitness and validity are computed on construction and after every
//! operator. Fields are private so no caller can leave the cache stale;
//! cloning copies the cache as-is because the genes are identical.

use rand::Rng;

use super::fitness::{self, FitnessBreakdown};
use super::{Gene, TimetableProblem};
use crate::models::{Schedule, Violation};

/// One candidate timetable.
///
/// Higher fitness = better schedule (maximisation convention).
#[derive(Debug, Clone)]
pub struct Chromosome<'u> {
    genes: Vec<Gene<'u>>,
    breakdown: FitnessBreakdown,
}

impl<'u> Chromosome<'u> {
    /// Creates a chromosome with every module randomly placed.
    pub fn random<R: Rng>(problem: &'u TimetableProblem, rng: &mut R) -> Self {
        Self::from_genes(problem, problem.random_genes(rng))
    }

    /// Creates a chromosome from a caller-supplied, module-ordered gene sequence.
    ///
    /// Used when resuming from an existing schedule.
    pub fn from_genes(problem: &'u TimetableProblem, genes: Vec<Gene<'u>>) -> Self {
        debug_assert_eq!(genes.len(), problem.chromosome_len());
        let breakdown = fitness::evaluate(&genes, problem.weights());
        Self { genes, breakdown }
    }

    /// Cached fitness.
    #[inline]
    pub fn fitness(&self) -> i64 {
        self.breakdown.total()
    }

    /// `true` iff no hard constraint is violated.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.breakdown.is_valid()
    }

    /// Number of hard-constraint violations.
    #[inline]
    pub fn hard_violations(&self) -> usize {
        self.breakdown.hard_violations()
    }

    /// Per-term fitness.
    pub fn breakdown(&self) -> &FitnessBreakdown {
        &self.breakdown
    }

    pub fn genes(&self) -> &[Gene<'u>] {
        &self.genes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Single-point crossover: takes the donor's genes at `0..=point`,
    /// with `point` uniform in `[0, n)`.
    pub fn crossover_single_point<R: Rng>(
        &mut self,
        donor: &Chromosome<'u>,
        problem: &'u TimetableProblem,
        rng: &mut R,
    ) {
        let n = self.genes.len();
        if n == 0 {
            return;
        }
        let point = rng.random_range(0..n);
        self.copy_range(donor, 0, point + 1);
        self.refresh(problem);
    }

    /// Contiguous-range crossover: takes the donor's genes at `start..end`,
    /// with `start` uniform in `[0, n)` and `end` uniform in `[0, n - start)`.
    ///
    /// `end` is an absolute index, so ranges with `end <= start` copy
    /// nothing and the chromosome passes through unchanged.
    pub fn crossover_contiguous_range<R: Rng>(
        &mut self,
        donor: &Chromosome<'u>,
        problem: &'u TimetableProblem,
        rng: &mut R,
    ) {
        let n = self.genes.len();
        if n == 0 {
            return;
        }
        let start = rng.random_range(0..n);
        let end = rng.random_range(0..n - start);
        self.crossover_range(donor, start, end, problem);
    }

    /// Two-range crossover: four uniform points in `[0, n)`, sorted,
    /// delimit two donor ranges `p0..p1` and `p2..p3`.
    pub fn crossover_two_range<R: Rng>(
        &mut self,
        donor: &Chromosome<'u>,
        problem: &'u TimetableProblem,
        rng: &mut R,
    ) {
        let n = self.genes.len();
        if n == 0 {
            return;
        }
        let mut points = [0usize; 4];
        for p in &mut points {
            *p = rng.random_range(0..n);
        }
        points.sort_unstable();
        self.crossover_ranges(donor, &[(points[0], points[1]), (points[2], points[3])], problem);
    }

    /// Takes the donor's genes over `start..end`; empty if `end <= start`.
    pub fn crossover_range(
        &mut self,
        donor: &Chromosome<'u>,
        start: usize,
        end: usize,
        problem: &'u TimetableProblem,
    ) {
        self.crossover_ranges(donor, &[(start, end)], problem);
    }

    /// Takes the donor's genes over every `start..end` in `ranges`, then
    /// recomputes fitness once.
    pub fn crossover_ranges(
        &mut self,
        donor: &Chromosome<'u>,
        ranges: &[(usize, usize)],
        problem: &'u TimetableProblem,
    ) {
        for &(start, end) in ranges {
            self.copy_range(donor, start, end);
        }
        self.refresh(problem);
    }

    /// Returns a mutated copy; `self` is untouched.
    ///
    /// Mutates between 1 and `mutate_genes_max` genes (positions may repeat).
    /// A gene already in a suitable venue keeps it half of the time and
    /// only moves timeslot; otherwise it is re-placed entirely. Fitness is
    /// recomputed once for the whole batch.
    pub fn mutate<R: Rng>(
        &self,
        problem: &'u TimetableProblem,
        mutate_genes_max: usize,
        rng: &mut R,
    ) -> Chromosome<'u> {
        let mut mutant = self.clone();
        mutant.mutate_in_place(problem, mutate_genes_max, rng);
        mutant
    }

    fn mutate_in_place<R: Rng>(
        &mut self,
        problem: &'u TimetableProblem,
        mutate_genes_max: usize,
        rng: &mut R,
    ) {
        let n = self.genes.len();
        if n == 0 {
            return;
        }
        let universe = problem.universe();
        let count = rng.random_range(1..=mutate_genes_max.max(1));
        for _ in 0..count {
            let gene = &mut self.genes[rng.random_range(0..n)];
            if gene.is_in_valid_venue() && rng.random_bool(0.5) {
                gene.timeslot = universe.random_timeslot(rng);
            } else {
                *gene = Gene::random(gene.module, universe, rng);
            }
        }
        self.refresh(problem);
    }

    /// Every hard-constraint violation, venue checks first, then overlaps.
    pub fn violations(&self) -> Vec<Violation> {
        let mut violations = Vec::new();
        for g in &self.genes {
            if let Some(kind) = g.venue_violation() {
                violations.push(Violation::venue(
                    kind,
                    g.module.id,
                    format!(
                        "module {} ({} students, lab={}) in venue {} ({} seats, lab={})",
                        g.module.id,
                        g.module.enrolled,
                        g.module.is_lab,
                        g.venue.id,
                        g.venue.capacity,
                        g.venue.is_lab
                    ),
                ));
            }
        }
        for (i, a) in self.genes.iter().enumerate() {
            for b in &self.genes[i + 1..] {
                if let Some(kind) = a.conflict_kind(b) {
                    violations.push(Violation::overlap(
                        kind,
                        a.module.id,
                        b.module.id,
                        format!(
                            "modules {} and {} overlap at timeslot {}",
                            a.module.id, b.module.id, a.timeslot.id
                        ),
                    ));
                }
            }
        }
        violations
    }

    /// Id-level schedule, detached from the universe.
    pub fn to_schedule(&self) -> Schedule {
        Schedule {
            placements: self.genes.iter().map(Gene::placement).collect(),
            violations: self.violations(),
            fitness: self.fitness(),
            is_valid: self.is_valid(),
        }
    }

    fn copy_range(&mut self, donor: &Chromosome<'u>, start: usize, end: usize) {
        let end = end.min(self.genes.len()).min(donor.genes.len());
        if start < end {
            self.genes[start..end].copy_from_slice(&donor.genes[start..end]);
        }
    }

    fn refresh(&mut self, problem: &'u TimetableProblem) {
        self.breakdown = fitness::evaluate(&self.genes, problem.weights());
    }
}

/// Sorts by fitness, best first.
pub fn rank(population: &mut [Chromosome<'_>]) {
    population.sort_by(|a, b| b.fitness().cmp(&a.fitness()));
}
