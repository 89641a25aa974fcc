//! The scheduling universe: every module, venue and timeslot of one job.
//!
//! Built once from the data provider and read-only for the lifetime of
//! the job, so it is shared by reference across all worker threads.

use std::collections::HashMap;

use rand::Rng;

use super::{Module, ModuleId, Timeslot, TimeslotId, Venue, VenueId};

/// Immutable facts needed for constraint checking.
///
/// Module order is significant: chromosomes are index-aligned to it.
#[derive(Debug, Clone, Default)]
pub struct TimetableUniverse {
    modules: Vec<Module>,
    venues: Vec<Venue>,
    timeslots: Vec<Timeslot>,
    module_index: HashMap<ModuleId, usize>,
    venue_index: HashMap<VenueId, usize>,
    timeslot_index: HashMap<TimeslotId, usize>,
}

impl TimetableUniverse {
    /// Creates a universe and indexes it by id.
    ///
    /// Duplicate ids are not rejected here; see
    /// [`validate_universe`](crate::validation::validate_universe).
    pub fn new(modules: Vec<Module>, venues: Vec<Venue>, timeslots: Vec<Timeslot>) -> Self {
        let module_index = modules.iter().enumerate().map(|(i, m)| (m.id, i)).collect();
        let venue_index = venues.iter().enumerate().map(|(i, v)| (v.id, i)).collect();
        let timeslot_index = timeslots.iter().enumerate().map(|(i, t)| (t.id, i)).collect();
        Self {
            modules,
            venues,
            timeslots,
            module_index,
            venue_index,
            timeslot_index,
        }
    }

    /// Modules in chromosome order.
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn venues(&self) -> &[Venue] {
        &self.venues
    }

    pub fn timeslots(&self) -> &[Timeslot] {
        &self.timeslots
    }

    /// Number of modules, i.e. the chromosome length.
    #[inline]
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Module at chromosome position `index`.
    #[inline]
    pub fn module_at(&self, index: usize) -> &Module {
        &self.modules[index]
    }

    /// Chromosome position of a module id.
    pub fn module_position(&self, id: ModuleId) -> Option<usize> {
        self.module_index.get(&id).copied()
    }

    pub fn module_by_id(&self, id: ModuleId) -> Option<&Module> {
        self.module_index.get(&id).map(|&i| &self.modules[i])
    }

    pub fn venue_by_id(&self, id: VenueId) -> Option<&Venue> {
        self.venue_index.get(&id).map(|&i| &self.venues[i])
    }

    pub fn timeslot_by_id(&self, id: TimeslotId) -> Option<&Timeslot> {
        self.timeslot_index.get(&id).map(|&i| &self.timeslots[i])
    }

    /// Uniformly random venue.
    ///
    /// # Panics
    /// If the universe has no venues. [`TimetableProblem`](crate::ga::TimetableProblem)
    /// rejects such universes whenever there are modules to place.
    pub fn random_venue<R: Rng>(&self, rng: &mut R) -> &Venue {
        &self.venues[rng.random_range(0..self.venues.len())]
    }

    /// Uniformly random timeslot.
    ///
    /// # Panics
    /// If the universe has no timeslots (see [`random_venue`](Self::random_venue)).
    pub fn random_timeslot<R: Rng>(&self, rng: &mut R) -> &Timeslot {
        &self.timeslots[rng.random_range(0..self.timeslots.len())]
    }
}
