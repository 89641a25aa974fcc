//! Timetabling domain models.
//!
//! Provides the immutable facts a timetabling job is solved over, and the
//! id-level schedule it produces.
//!
//! # Domain Mappings
//!
//! | u-timetable | University | Conference | Clinic |
//! |-------------|------------|------------|--------|
//! | Module | Class / Lab | Session | Appointment block |
//! | Venue | Lecture hall / Lab | Room | Consulting room |
//! | Timeslot | Teaching hour | Slot | Shift hour |
//! | Schedule | Timetable | Programme | Roster |

mod module;
mod schedule;
mod timeslot;
mod universe;
mod venue;

pub use module::Module;
pub use schedule::{Placement, Schedule, Violation, ViolationType};
pub use timeslot::Timeslot;
pub use universe::TimetableUniverse;
pub use venue::{Location, Venue};

/// Module identifier.
pub type ModuleId = u64;
/// Venue identifier.
pub type VenueId = u64;
/// Timeslot identifier.
pub type TimeslotId = u64;
/// Lecturer identifier.
pub type LecturerId = u64;
/// Course identifier.
pub type CourseId = u64;
/// Department identifier.
pub type DepartmentId = u64;

/// Score used when no preference was recorded: the midpoint of the scale.
pub const NEUTRAL_PREFERENCE: i32 = 10;

/// Top of the preference scale. Scores above it indicate malformed input.
pub const MAX_PREFERENCE: i32 = 20;
