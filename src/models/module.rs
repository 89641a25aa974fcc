//! Course module model.
//!
//! A module is the unit being timetabled: one class that must be placed
//! into exactly one (venue, timeslot) pair. Modules may be offered by
//! several courses at once; their enrolment is the sum across all of them.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{CourseId, DepartmentId, LecturerId, ModuleId, Venue, NEUTRAL_PREFERENCE};

/// A course module to be placed into the timetable.
///
/// Immutable once loaded into a [`TimetableUniverse`](super::TimetableUniverse).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    /// Unique module identifier.
    pub id: ModuleId,
    /// Human-readable name (diagnostics only).
    #[serde(default)]
    pub name: String,
    /// Students enrolled, summed across every offering course.
    pub enrolled: u32,
    /// Whether this module must be taught in a lab venue.
    #[serde(default)]
    pub is_lab: bool,
    /// Owning lecturer.
    pub lecturer_id: LecturerId,
    /// Courses offering this module.
    #[serde(default)]
    pub course_ids: HashSet<CourseId>,
    /// Departments offering this module through one of their courses.
    #[serde(default)]
    pub department_ids: HashSet<DepartmentId>,
}

impl Module {
    /// Creates a lecture module with no enrolment and no offering courses.
    pub fn new(id: ModuleId, lecturer_id: LecturerId) -> Self {
        Self {
            id,
            name: String::new(),
            enrolled: 0,
            is_lab: false,
            lecturer_id,
            course_ids: HashSet::new(),
            department_ids: HashSet::new(),
        }
    }

    /// Sets the module name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the total enrolment directly.
    pub fn with_enrolled(mut self, enrolled: u32) -> Self {
        self.enrolled = enrolled;
        self
    }

    /// Marks the module as a lab component.
    pub fn with_lab(mut self, is_lab: bool) -> Self {
        self.is_lab = is_lab;
        self
    }

    /// Adds an offering course without touching enrolment.
    pub fn with_course(mut self, course_id: CourseId) -> Self {
        self.course_ids.insert(course_id);
        self
    }

    /// Adds an offering department without touching enrolment.
    pub fn with_department(mut self, department_id: DepartmentId) -> Self {
        self.department_ids.insert(department_id);
        self
    }

    /// Records that `course_id` (owned by `department_id`) offers this module
    /// to `enrolled` students. Enrolment accumulates across courses.
    pub fn offered_by(
        mut self,
        course_id: CourseId,
        department_id: DepartmentId,
        enrolled: u32,
    ) -> Self {
        if self.course_ids.insert(course_id) {
            self.enrolled = self.enrolled.saturating_add(enrolled);
        }
        self.department_ids.insert(department_id);
        self
    }

    /// Mean preference of this module's departments for `venue`'s building.
    ///
    /// Unscored departments count as neutral; a module with no departments
    /// is neutral as well. Scores are summed as `i64`, so malformed inputs
    /// cannot overflow.
    pub fn building_preference_average(&self, venue: &Venue) -> f64 {
        if self.department_ids.is_empty() {
            return f64::from(NEUTRAL_PREFERENCE);
        }
        let sum: i64 = self
            .department_ids
            .iter()
            .map(|&d| i64::from(venue.department_score(d)))
            .sum();
        sum as f64 / self.department_ids.len() as f64
    }

    /// Whether both modules are taught by the same lecturer.
    #[inline]
    pub fn taught_by_same_lecturer(&self, other: &Module) -> bool {
        self.lecturer_id == other.lecturer_id
    }

    /// Whether at least one course offers both modules.
    pub fn offered_by_same_course(&self, other: &Module) -> bool {
        let (small, large) = if self.course_ids.len() <= other.course_ids.len() {
            (&self.course_ids, &other.course_ids)
        } else {
            (&other.course_ids, &self.course_ids)
        };
        small.iter().any(|c| large.contains(c))
    }
}
