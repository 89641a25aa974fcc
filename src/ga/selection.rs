//! Fitness-proportional (roulette wheel) parent selection.
//!
//! When every fitness is positive the weight is the fitness itself, so
//! selection odds are exactly proportional. Fitness can drop to zero or
//! below when conflicts outnumber genes; only then are weights shifted to
//! `w_i = f_i - min(f) + 1` so every chromosome keeps a non-zero chance.

use rand::Rng;

use super::Chromosome;

/// Cumulative selection weights over one generation.
#[derive(Debug, Clone)]
pub struct RouletteWheel {
    cumulative: Vec<u64>,
}

impl RouletteWheel {
    /// Builds the wheel for `population`, in its current order.
    pub fn new(population: &[Chromosome<'_>]) -> Self {
        Self::from_fitness(population.iter().map(Chromosome::fitness))
    }

    /// Builds the wheel from raw fitness values, in order.
    pub fn from_fitness<I>(fitness: I) -> Self
    where
        I: IntoIterator<Item = i64>,
        I::IntoIter: Clone,
    {
        let fitness = fitness.into_iter();
        let min = fitness.clone().min().unwrap_or(0);
        let weight = |f: i64| -> u64 {
            if min > 0 {
                f.unsigned_abs()
            } else {
                f.abs_diff(min).saturating_add(1)
            }
        };

        let mut total: u64 = 0;
        let cumulative = fitness
            .map(|f| {
                total = total.saturating_add(weight(f));
                total
            })
            .collect();
        Self { cumulative }
    }

    /// Number of slots on the wheel.
    pub fn len(&self) -> usize {
        self.cumulative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cumulative.is_empty()
    }

    /// Index of the selected chromosome, or `None` for an empty wheel.
    pub fn spin<R: Rng>(&self, rng: &mut R) -> Option<usize> {
        let total = *self.cumulative.last()?;
        let ticket = rng.random_range(0..total);
        Some(self.cumulative.partition_point(|&c| c <= ticket))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::{FitnessWeights, Gene, TimetableProblem};
    use crate::models::{Module, Timeslot, TimetableUniverse, Venue};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn problem() -> TimetableProblem {
        let universe = TimetableUniverse::new(
            vec![Module::new(1, 1).with_enrolled(10), Module::new(2, 2).with_enrolled(10)],
            vec![Venue::new(100, 20), Venue::new(101, 5)],
            vec![Timeslot::new(1000, 0, 9), Timeslot::new(1001, 0, 10)],
        );
        TimetableProblem::new(universe, FitnessWeights::default()).unwrap()
    }

    #[test]
    fn test_empty_wheel() {
        let wheel = RouletteWheel::new(&[]);
        let mut rng = SmallRng::seed_from_u64(42);
        assert!(wheel.is_empty());
        assert_eq!(wheel.spin(&mut rng), None);
    }

    #[test]
    fn test_spin_stays_in_bounds() {
        let p = problem();
        let mut rng = SmallRng::seed_from_u64(42);
        let pop: Vec<_> = (0..10).map(|_| Chromosome::random(&p, &mut rng)).collect();
        let wheel = RouletteWheel::new(&pop);
        assert_eq!(wheel.len(), 10);
        for _ in 0..1000 {
            let i = wheel.spin(&mut rng).unwrap();
            assert!(i < 10);
        }
    }

    #[test]
    fn test_positive_fitness_uses_raw_weights() {
        let wheel = RouletteWheel::from_fitness([4500, 1200]);
        assert_eq!(wheel.cumulative, vec![4500, 5700]);
    }

    #[test]
    fn test_non_positive_fitness_is_shifted() {
        let wheel = RouletteWheel::from_fitness([-5, 0, 10]);
        // Weights 1, 6, 16.
        assert_eq!(wheel.cumulative, vec![1, 7, 23]);

        let zero = RouletteWheel::from_fitness([0, 0]);
        assert_eq!(zero.cumulative, vec![1, 2]);
    }

    #[test]
    fn test_selection_is_fitness_proportional() {
        let p = problem();
        let u = p.universe();
        let big = u.venue_by_id(100).unwrap();
        let small = u.venue_by_id(101).unwrap();
        let t0 = u.timeslot_by_id(1000).unwrap();
        let t1 = u.timeslot_by_id(1001).unwrap();

        // Valid: separate timeslots, big venue.
        let good = Chromosome::from_genes(
            &p,
            vec![Gene::new(u.module_at(0), big, t0), Gene::new(u.module_at(1), big, t1)],
        );
        // Clash plus two undersized venues.
        let bad = Chromosome::from_genes(
            &p,
            vec![Gene::new(u.module_at(0), small, t0), Gene::new(u.module_at(1), small, t0)],
        );
        // 4000 hard + 250 building + 62 timeslot; 1000 hard + the same soft.
        assert_eq!(good.fitness(), 4312);
        assert_eq!(bad.fitness(), 1312);

        let wheel = RouletteWheel::new(&[good, bad]);
        let mut rng = SmallRng::seed_from_u64(42);
        let mut hits = [0usize; 2];
        for _ in 0..10_000 {
            hits[wheel.spin(&mut rng).unwrap()] += 1;
        }
        // Expected share 4312 / 5624 ≈ 0.767.
        assert!((7400..7950).contains(&hits[0]), "good picked {} times", hits[0]);
        assert!(hits[1] > 0);
    }
}
