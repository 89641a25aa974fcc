//! A gene: one module's tentative (venue, timeslot) placement.
//!
//! Genes borrow their module, venue and timeslot from the universe, so
//! they are `Copy` and cheap to shuffle between chromosomes. The shared
//! lifetime keeps every gene of a chromosome tied to one universe.

use rand::Rng;
use tracing::warn;

use crate::models::{
    Module, Placement, Timeslot, TimetableUniverse, Venue, ViolationType, MAX_PREFERENCE,
};

/// One module's placement within a chromosome.
#[derive(Debug, Clone, Copy)]
pub struct Gene<'u> {
    pub module: &'u Module,
    pub venue: &'u Venue,
    pub timeslot: &'u Timeslot,
}

impl<'u> Gene<'u> {
    /// Creates a gene from explicit parts.
    pub fn new(module: &'u Module, venue: &'u Venue, timeslot: &'u Timeslot) -> Self {
        Self {
            module,
            venue,
            timeslot,
        }
    }

    /// Places `module` into a uniformly random venue and timeslot.
    pub fn random<R: Rng>(module: &'u Module, universe: &'u TimetableUniverse, rng: &mut R) -> Self {
        Self {
            module,
            venue: universe.random_venue(rng),
            timeslot: universe.random_timeslot(rng),
        }
    }

    /// Whether the two placements cannot both stand.
    ///
    /// Genes only conflict when they share a timeslot, and then only if
    /// they also share a venue, a lecturer, or an offering course. A gene
    /// always conflicts with itself.
    pub fn conflicts_with(&self, other: &Gene<'u>) -> bool {
        std::ptr::eq(self, other) || self.conflict_kind(other).is_some()
    }

    /// First overlap rule the pair breaks, if any.
    ///
    /// Rules are tried in order venue, lecturer, course; the course check
    /// is the most expensive and runs last.
    pub fn conflict_kind(&self, other: &Gene<'u>) -> Option<ViolationType> {
        if self.timeslot.id != other.timeslot.id {
            return None;
        }
        if self.venue.id == other.venue.id {
            Some(ViolationType::VenueClash)
        } else if self.module.taught_by_same_lecturer(other.module) {
            Some(ViolationType::LecturerClash)
        } else if self.module.offered_by_same_course(other.module) {
            Some(ViolationType::CourseClash)
        } else {
            None
        }
    }

    /// Whether the venue suits the module: matching lab flag and enough seats.
    #[inline]
    pub fn is_in_valid_venue(&self) -> bool {
        self.venue_violation().is_none()
    }

    /// The venue rule this gene breaks, if any.
    pub fn venue_violation(&self) -> Option<ViolationType> {
        if self.module.is_lab != self.venue.is_lab {
            Some(ViolationType::LabMismatch)
        } else if self.venue.capacity < self.module.enrolled {
            Some(ViolationType::CapacityExceeded)
        } else {
            None
        }
    }

    /// Mean preference of the module's departments for the venue's building.
    ///
    /// Unscored departments count as neutral; a module with no departments
    /// is neutral as well. Nominally in `[0, 20]`.
    pub fn department_building_preference_average(&self) -> f64 {
        let avg = self.module.building_preference_average(self.venue);
        if avg > f64::from(MAX_PREFERENCE) {
            warn!(
                module_id = self.module.id,
                venue_id = self.venue.id,
                avg,
                "department building preference average above scale"
            );
        }
        avg
    }

    /// The lecturer's preference for this timeslot.
    #[inline]
    pub fn lecturer_timeslot_preference(&self) -> i32 {
        self.timeslot.lecturer_preference(self.module.lecturer_id)
    }

    /// Id-level rendering of this gene.
    pub fn placement(&self) -> Placement {
        Placement::new(self.module.id, self.venue.id, self.timeslot.id)
    }
}
