//! Venue model.
//!
//! Venues are the rooms modules are taught in: lecture halls and labs.
//! Each venue has a seating capacity and inherits the preference scores
//! departments have given to its building.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{DepartmentId, VenueId, NEUTRAL_PREFERENCE};

/// A room a module can be placed in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Venue {
    /// Unique venue identifier.
    pub id: VenueId,
    /// Human-readable name (diagnostics only).
    #[serde(default)]
    pub name: String,
    /// Whether this is a lab. Lecture venues are `false`.
    #[serde(default)]
    pub is_lab: bool,
    /// Seats available for students.
    pub capacity: u32,
    /// Building location. Carried for future proximity scoring; not scored.
    #[serde(default)]
    pub location: Location,
    /// Department → preference score for this venue's building.
    #[serde(default)]
    pub department_scores: HashMap<DepartmentId, i32>,
}

/// Planar building coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub x: f64,
    pub y: f64,
}

impl Venue {
    /// Creates a lecture venue with the given capacity.
    pub fn new(id: VenueId, capacity: u32) -> Self {
        Self {
            id,
            name: String::new(),
            is_lab: false,
            capacity,
            location: Location::default(),
            department_scores: HashMap::new(),
        }
    }

    /// Creates a lab venue with the given capacity.
    pub fn lab(id: VenueId, capacity: u32) -> Self {
        Self::new(id, capacity).with_lab(true)
    }

    /// Sets the venue name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the lab flag.
    pub fn with_lab(mut self, is_lab: bool) -> Self {
        self.is_lab = is_lab;
        self
    }

    /// Sets the building location.
    pub fn with_location(mut self, x: f64, y: f64) -> Self {
        self.location = Location { x, y };
        self
    }

    /// Records a department's preference score for this venue's building.
    pub fn with_department_score(mut self, department_id: DepartmentId, score: i32) -> Self {
        self.department_scores.insert(department_id, score);
        self
    }

    /// Preference score of `department_id` for this building.
    ///
    /// Departments that never scored the building count as neutral (10).
    #[inline]
    pub fn department_score(&self, department_id: DepartmentId) -> i32 {
        self.department_scores
            .get(&department_id)
            .copied()
            .unwrap_or(NEUTRAL_PREFERENCE)
    }
}
