//! Input validation for timetabling jobs.
//!
//! Checks structural integrity of the universe and of any existing
//! schedule before a job starts. Detects:
//! - Duplicate IDs
//! - Modules with nowhere to go (no venues or no timeslots)
//! - Existing placements referencing unknown modules, venues, timeslots
//! - A module placed more than once
//!
//! Every issue found is reported, not just the first.

use std::collections::HashSet;

use crate::models::{Placement, TimetableUniverse};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities of the same kind share an ID.
    DuplicateId,
    /// There are modules to place but no venues.
    NoVenues,
    /// There are modules to place but no timeslots.
    NoTimeslots,
    /// A placement references a module not in the universe.
    UnknownModule,
    /// A placement references a venue not in the universe.
    UnknownVenue,
    /// A placement references a timeslot not in the universe.
    UnknownTimeslot,
    /// The same module appears in more than one placement.
    DuplicatePlacement,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a freshly loaded universe.
///
/// Checks:
/// 1. No duplicate module, venue or timeslot IDs
/// 2. If any module exists, at least one venue and one timeslot exist
///
/// An empty universe is valid: the job converges trivially.
pub fn validate_universe(universe: &TimetableUniverse) -> ValidationResult {
    let mut errors = Vec::new();

    check_unique(
        universe.modules().iter().map(|m| m.id),
        "module",
        &mut errors,
    );
    check_unique(universe.venues().iter().map(|v| v.id), "venue", &mut errors);
    check_unique(
        universe.timeslots().iter().map(|t| t.id),
        "timeslot",
        &mut errors,
    );

    if universe.module_count() > 0 {
        if universe.venues().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::NoVenues,
                format!("{} modules to place but no venues", universe.module_count()),
            ));
        }
        if universe.timeslots().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::NoTimeslots,
                format!(
                    "{} modules to place but no timeslots",
                    universe.module_count()
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates an existing schedule against the universe it will resume in.
///
/// Checks:
/// 1. Every module, venue and timeslot ID resolves
/// 2. No module is placed twice
///
/// Modules without a placement are not an error; they are seeded randomly.
pub fn validate_placements(universe: &TimetableUniverse, placements: &[Placement]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut placed = HashSet::new();

    for p in placements {
        if universe.module_by_id(p.module_id).is_none() {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownModule,
                format!("Placement references unknown module {}", p.module_id),
            ));
        } else if !placed.insert(p.module_id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicatePlacement,
                format!("Module {} is placed more than once", p.module_id),
            ));
        }
        if universe.venue_by_id(p.venue_id).is_none() {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownVenue,
                format!(
                    "Placement of module {} references unknown venue {}",
                    p.module_id, p.venue_id
                ),
            ));
        }
        if universe.timeslot_by_id(p.timeslot_id).is_none() {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownTimeslot,
                format!(
                    "Placement of module {} references unknown timeslot {}",
                    p.module_id, p.timeslot_id
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_unique(
    ids: impl Iterator<Item = u64>,
    entity: &str,
    errors: &mut Vec<ValidationError>,
) {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate {entity} ID: {id}"),
            ));
        }
    }
}
