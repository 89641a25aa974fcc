//! Timetabling GA problem definition.
//!
//! Bundles the universe with the fitness weighting every chromosome of a
//! job is scored under. Chromosomes borrow from the problem, so it must
//! outlive the population.

use rand::Rng;
use tracing::warn;

use super::{FitnessWeights, Gene};
use crate::error::TimetableError;
use crate::models::{Placement, TimetableUniverse};
use crate::validation::{validate_placements, validate_universe};

/// The immutable context a timetabling GA runs in.
///
/// # Example
/// ```
/// use u_timetable::ga::{FitnessWeights, TimetableProblem};
/// use u_timetable::models::{Module, Timeslot, TimetableUniverse, Venue};
///
/// let universe = TimetableUniverse::new(
///     vec![Module::new(1, 10).with_enrolled(30)],
///     vec![Venue::new(100, 40)],
///     vec![Timeslot::new(1000, 0, 9)],
/// );
/// let problem = TimetableProblem::new(universe, FitnessWeights::default()).unwrap();
/// assert_eq!(problem.chromosome_len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct TimetableProblem {
    universe: TimetableUniverse,
    weights: FitnessWeights,
}

impl TimetableProblem {
    /// Creates a problem after validating the universe and the weights.
    pub fn new(universe: TimetableUniverse, weights: FitnessWeights) -> Result<Self, TimetableError> {
        validate_universe(&universe)?;
        weights.validate()?;
        weights.check_capacity(universe.module_count())?;
        Ok(Self { universe, weights })
    }

    pub fn universe(&self) -> &TimetableUniverse {
        &self.universe
    }

    pub fn weights(&self) -> &FitnessWeights {
        &self.weights
    }

    /// Number of genes per chromosome.
    #[inline]
    pub fn chromosome_len(&self) -> usize {
        self.universe.module_count()
    }

    /// One random gene per module, in module order.
    pub fn random_genes<R: Rng>(&self, rng: &mut R) -> Vec<Gene<'_>> {
        self.universe
            .modules()
            .iter()
            .map(|m| Gene::random(m, &self.universe, rng))
            .collect()
    }

    /// Resolves an existing schedule into a module-ordered gene sequence.
    ///
    /// Placements may arrive in any order. Modules with no placement get a
    /// random one so the sequence always covers every module.
    pub fn resolve_placements<R: Rng>(
        &self,
        placements: &[Placement],
        rng: &mut R,
    ) -> Result<Vec<Gene<'_>>, TimetableError> {
        validate_placements(&self.universe, placements)?;

        let mut slots: Vec<Option<Gene<'_>>> = vec![None; self.chromosome_len()];
        for p in placements {
            // Validated above.
            let (Some(pos), Some(venue), Some(timeslot)) = (
                self.universe.module_position(p.module_id),
                self.universe.venue_by_id(p.venue_id),
                self.universe.timeslot_by_id(p.timeslot_id),
            ) else {
                continue;
            };
            slots[pos] = Some(Gene::new(self.universe.module_at(pos), venue, timeslot));
        }

        let missing = slots.iter().filter(|s| s.is_none()).count();
        if missing > 0 {
            warn!(
                missing,
                modules = self.chromosome_len(),
                "existing schedule does not place every module; seeding the rest randomly"
            );
        }

        Ok(slots
            .into_iter()
            .enumerate()
            .map(|(i, slot)| {
                slot.unwrap_or_else(|| Gene::random(self.universe.module_at(i), &self.universe, rng))
            })
            .collect())
    }
}
