//! Schedule (solution) model.
//!
//! A schedule is the id-level rendering of a chromosome: one placement
//! per module plus the hard-constraint violations it still contains.
//! This is what crosses the boundary to the result sink; it holds no
//! references into the universe.

use serde::{Deserialize, Serialize};

use super::{ModuleId, TimeslotId, VenueId};

/// A complete timetable (solution to a timetabling job).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// One placement per module, in universe module order.
    pub placements: Vec<Placement>,
    /// Hard-constraint violations present in this schedule.
    pub violations: Vec<Violation>,
    /// Fitness of the originating chromosome (higher = better).
    pub fitness: i64,
    /// `true` iff there are no hard-constraint violations.
    pub is_valid: bool,
}

/// A module placed into a venue at a timeslot.
///
/// Also the shape in which an existing (partial) schedule is supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    pub module_id: ModuleId,
    pub venue_id: VenueId,
    pub timeslot_id: TimeslotId,
}

/// A hard-constraint violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Modules involved: one for venue violations, two for overlaps.
    pub module_ids: Vec<ModuleId>,
    /// Human-readable description.
    pub message: String,
}

/// Classification of hard-constraint violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationType {
    /// Lab module in a lecture venue, or the reverse.
    LabMismatch,
    /// Enrolment exceeds the venue's seats.
    CapacityExceeded,
    /// Two modules in the same venue at the same time.
    VenueClash,
    /// One lecturer teaching two modules at the same time.
    LecturerClash,
    /// Two modules of one course at the same time.
    CourseClash,
}

impl ViolationType {
    /// Whether this violation comes from a pairwise overlap check.
    pub fn is_overlap(self) -> bool {
        matches!(
            self,
            ViolationType::VenueClash | ViolationType::LecturerClash | ViolationType::CourseClash
        )
    }
}

impl Placement {
    /// Creates a new placement.
    pub fn new(module_id: ModuleId, venue_id: VenueId, timeslot_id: TimeslotId) -> Self {
        Self {
            module_id,
            venue_id,
            timeslot_id,
        }
    }
}

impl Violation {
    /// Creates a violation for a single module's venue.
    pub fn venue(
        violation_type: ViolationType,
        module_id: ModuleId,
        message: impl Into<String>,
    ) -> Self {
        Self {
            violation_type,
            module_ids: vec![module_id],
            message: message.into(),
        }
    }

    /// Creates an overlap violation between two modules.
    pub fn overlap(
        violation_type: ViolationType,
        first: ModuleId,
        second: ModuleId,
        message: impl Into<String>,
    ) -> Self {
        Self {
            violation_type,
            module_ids: vec![first, second],
            message: message.into(),
        }
    }
}

impl Schedule {
    /// The trivially valid schedule of an empty universe.
    pub fn empty() -> Self {
        Self {
            is_valid: true,
            ..Self::default()
        }
    }

    /// Number of placements.
    pub fn placement_count(&self) -> usize {
        self.placements.len()
    }

    /// Placement of a module, if scheduled.
    pub fn placement_for(&self, module_id: ModuleId) -> Option<&Placement> {
        self.placements.iter().find(|p| p.module_id == module_id)
    }

    /// Placements sharing a timeslot.
    pub fn placements_at(&self, timeslot_id: TimeslotId) -> Vec<&Placement> {
        self.placements
            .iter()
            .filter(|p| p.timeslot_id == timeslot_id)
            .collect()
    }

    /// Violations of one type.
    pub fn violations_of(&self, violation_type: ViolationType) -> Vec<&Violation> {
        self.violations
            .iter()
            .filter(|v| v.violation_type == violation_type)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Schedule {
        Schedule {
            placements: vec![
                Placement::new(1, 100, 1000),
                Placement::new(2, 100, 1000),
                Placement::new(3, 101, 1001),
            ],
            violations: vec![Violation::overlap(
                ViolationType::VenueClash,
                1,
                2,
                "modules 1 and 2 share venue 100 at timeslot 1000",
            )],
            fitness: 5000,
            is_valid: false,
        }
    }

    #[test]
    fn test_queries() {
        let s = sample();
        assert_eq!(s.placement_count(), 3);
        assert_eq!(s.placement_for(3).map(|p| p.venue_id), Some(101));
        assert!(s.placement_for(9).is_none());
        assert_eq!(s.placements_at(1000).len(), 2);
        assert_eq!(s.violations_of(ViolationType::VenueClash).len(), 1);
        assert!(s.violations_of(ViolationType::LabMismatch).is_empty());
    }

    #[test]
    fn test_empty_is_valid() {
        let s = Schedule::empty();
        assert!(s.is_valid);
        assert_eq!(s.fitness, 0);
        assert!(s.placements.is_empty());
    }

    #[test]
    fn test_violation_type_classes() {
        assert!(ViolationType::CourseClash.is_overlap());
        assert!(!ViolationType::CapacityExceeded.is_overlap());
    }

    #[test]
    fn test_serde_shape() {
        let s = sample();
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["placements"][0]["module_id"], 1);
        assert_eq!(json["violations"][0]["violation_type"], "VenueClash");
        let back: Schedule = serde_json::from_value(json).unwrap();
        assert_eq!(back, s);
    }
}
