//! Timeslot model.
//!
//! A timeslot is one teachable hour of the week. Lecturers may rank
//! timeslots; unranked slots are neutral.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{LecturerId, TimeslotId, NEUTRAL_PREFERENCE};

/// One teachable hour in the weekly grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeslot {
    /// Unique timeslot identifier.
    pub id: TimeslotId,
    /// Day of week, 0 = Monday.
    pub day: u8,
    /// Starting hour (24h clock).
    pub hour: u8,
    /// Lecturer → preference score for teaching in this slot.
    #[serde(default)]
    pub lecturer_preferences: HashMap<LecturerId, i32>,
}

impl Timeslot {
    /// Creates a timeslot with no recorded preferences.
    pub fn new(id: TimeslotId, day: u8, hour: u8) -> Self {
        Self {
            id,
            day,
            hour,
            lecturer_preferences: HashMap::new(),
        }
    }

    /// Records a lecturer's preference for this slot.
    pub fn with_lecturer_preference(mut self, lecturer_id: LecturerId, score: i32) -> Self {
        self.lecturer_preferences.insert(lecturer_id, score);
        self
    }

    /// Preference of `lecturer_id` for this slot (neutral 10 if unranked).
    #[inline]
    pub fn lecturer_preference(&self, lecturer_id: LecturerId) -> i32 {
        self.lecturer_preferences
            .get(&lecturer_id)
            .copied()
            .unwrap_or(NEUTRAL_PREFERENCE)
    }
}
