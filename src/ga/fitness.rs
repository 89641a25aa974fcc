//! Fitness function for timetable chromosomes.
//!
//! # Scoring
//!
//! With `n` genes and a hard constraint unit `H`:
//!
//! | Term | Start | Adjustment |
//! |------|-------|-----------|
//! | overlap | `n·H` | `−H` per conflicting gene pair |
//! | venue | `n·H` | `−H` per gene in an unsuitable venue |
//! | building | 0 | `+⌊s · deptAvg / 20⌋` per gene |
//! | timeslot | 0 | `+⌊0.25 · s · lecturerPref / 20⌋` per gene |
//!
//! where the soft unit `s = H / (slots · n)` (integer division). With the
//! default two soft slots and preferences on the `[0, 20]` scale the soft
//! terms sum to at most `0.625·H`, so one extra hard violation always
//! outweighs any soft gain. Raising `H` relative to `slots · n` shrinks
//! the soft signal; lowering `slots` below 2 breaks the ordering.
//!
//! Fitness is `i64`: the largest value is `2·n·H` plus the soft budget,
//! the smallest overlap term `n·H − n(n−1)/2·H`.
//!
//! # Complexity
//! Conflicts are only possible within one timeslot, so genes are bucketed
//! by timeslot and compared pairwise inside each bucket. Worst case (every
//! gene in one slot) is still O(n²).

use serde::{Deserialize, Serialize};

use super::Gene;
use crate::error::ConfigError;
use crate::models::{MAX_PREFERENCE, TimeslotId};

/// Weight of one violated hard constraint.
pub const DEFAULT_HARD_CONSTRAINT_UNIT: i64 = 1000;

/// Number of soft constraints the soft budget is divided between.
pub const DEFAULT_SOFT_CONSTRAINT_SLOTS: i64 = 2;

/// Weight applied to the lecturer timeslot preference term.
const TIMESLOT_PREFERENCE_WEIGHT: f64 = 0.25;

/// Tunable weighting between hard and soft constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessWeights {
    /// Fitness lost per violated hard constraint (`H`).
    pub hard_constraint_unit: i64,
    /// Divides `H` between soft constraints and genes.
    pub soft_constraint_slots: i64,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            hard_constraint_unit: DEFAULT_HARD_CONSTRAINT_UNIT,
            soft_constraint_slots: DEFAULT_SOFT_CONSTRAINT_SLOTS,
        }
    }
}

impl FitnessWeights {
    /// Sets the hard constraint unit.
    pub fn with_hard_constraint_unit(mut self, unit: i64) -> Self {
        self.hard_constraint_unit = unit;
        self
    }

    /// Sets the number of soft constraint slots.
    pub fn with_soft_constraint_slots(mut self, slots: i64) -> Self {
        self.soft_constraint_slots = slots;
        self
    }

    /// Checks the weights are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hard_constraint_unit <= 0 {
            return Err(ConfigError::NonPositiveHardUnit(self.hard_constraint_unit));
        }
        if self.soft_constraint_slots <= 0 {
            return Err(ConfigError::NonPositiveSoftSlots(self.soft_constraint_slots));
        }
        Ok(())
    }

    /// Checks that every fitness term of an `n`-gene chromosome fits in `i64`.
    ///
    /// The top is two full hard terms plus a soft budget below one more
    /// hard unit; the bottom is every gene pair conflicting, `n(n-1)/2 · H`.
    pub fn check_capacity(&self, modules: usize) -> Result<(), ConfigError> {
        let overflow = ConfigError::FitnessOverflow {
            modules,
            hard_constraint_unit: self.hard_constraint_unit,
        };
        let n = i64::try_from(modules).map_err(|_| overflow.clone())?;
        let hard = self.hard_constraint_unit;
        let ceiling = n
            .checked_mul(2)
            .and_then(|v| v.checked_mul(hard))
            .and_then(|v| v.checked_add(hard));
        let worst_overlap = n
            .checked_mul(n.saturating_sub(1))
            .map(|pairs| pairs / 2)
            .and_then(|pairs| pairs.checked_mul(hard))
            .and_then(|penalty| n.checked_mul(hard)?.checked_sub(penalty));
        match (ceiling, worst_overlap) {
            (Some(_), Some(_)) => Ok(()),
            _ => Err(overflow),
        }
    }

    /// Soft unit `s = H / (slots · n)`; zero for an empty chromosome.
    pub fn soft_unit(&self, genes: usize) -> i64 {
        let divisor = self.soft_constraint_slots.saturating_mul(genes as i64);
        if divisor <= 0 {
            0
        } else {
            self.hard_constraint_unit / divisor
        }
    }
}

/// Per-term fitness of one gene sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FitnessBreakdown {
    /// Overlap term (`n·H` minus conflicts).
    pub overlap: i64,
    /// Venue term (`n·H` minus unsuitable venues).
    pub venue: i64,
    /// Department building preference term.
    pub building: i64,
    /// Lecturer timeslot preference term.
    pub timeslot: i64,
    /// Number of conflicting gene pairs.
    pub conflicts: usize,
    /// Number of genes in unsuitable venues.
    pub invalid_venues: usize,
}

impl FitnessBreakdown {
    /// Total fitness (higher = better).
    #[inline]
    pub fn total(&self) -> i64 {
        self.overlap + self.venue + self.building + self.timeslot
    }

    /// Number of hard-constraint violations.
    #[inline]
    pub fn hard_violations(&self) -> usize {
        self.conflicts + self.invalid_venues
    }

    /// `true` iff no hard constraint is violated.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.hard_violations() == 0
    }
}

/// Evaluates a gene sequence.
pub fn evaluate(genes: &[Gene<'_>], weights: &FitnessWeights) -> FitnessBreakdown {
    let n = genes.len() as i64;
    let hard = weights.hard_constraint_unit;
    let soft = weights.soft_unit(genes.len()) as f64;
    let max_pref = f64::from(MAX_PREFERENCE);

    let mut breakdown = FitnessBreakdown {
        overlap: n.saturating_mul(hard),
        venue: n.saturating_mul(hard),
        ..FitnessBreakdown::default()
    };

    for gene in genes {
        if !gene.is_in_valid_venue() {
            breakdown.venue -= hard;
            breakdown.invalid_venues += 1;
        }
        // Truncated per gene.
        breakdown.building += (soft * gene.department_building_preference_average() / max_pref) as i64;
        breakdown.timeslot += (TIMESLOT_PREFERENCE_WEIGHT
            * soft
            * f64::from(gene.lecturer_timeslot_preference())
            / max_pref) as i64;
    }

    let conflicts = count_conflicts(genes);
    // Bounded by `check_capacity`; saturate rather than wrap if bypassed.
    let penalty = i64::try_from(conflicts)
        .unwrap_or(i64::MAX)
        .saturating_mul(hard);
    breakdown.overlap = breakdown.overlap.saturating_sub(penalty);
    breakdown.conflicts = conflicts;

    breakdown
}

/// Counts conflicting unordered pairs, bucketing genes by timeslot.
pub fn count_conflicts(genes: &[Gene<'_>]) -> usize {
    let mut order: Vec<(TimeslotId, usize)> = genes
        .iter()
        .enumerate()
        .map(|(i, g)| (g.timeslot.id, i))
        .collect();
    order.sort_unstable();

    let mut conflicts = 0;
    for bucket in order.chunk_by(|a, b| a.0 == b.0) {
        for (k, &(_, i)) in bucket.iter().enumerate() {
            for &(_, j) in &bucket[k + 1..] {
                if genes[i].conflicts_with(&genes[j]) {
                    conflicts += 1;
                }
            }
        }
    }
    conflicts
}
