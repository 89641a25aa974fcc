//! Timetable quality metrics (KPIs).
//!
//! Computes reporting indicators from a finished schedule and the universe
//! it was built in. None of these feed back into fitness.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Hard violations | Violations listed on the schedule |
//! | Avg building preference | Mean department score of each placement's venue (0..=20) |
//! | Avg timeslot preference | Mean lecturer score of each placement's timeslot (0..=20) |
//! | Avg seat utilisation | Mean of enrolled / capacity |
//! | Venues used | Distinct venues with at least one placement |
//! | Timeslots used | Distinct timeslots with at least one placement |

use std::collections::{HashMap, HashSet};

use crate::models::{Schedule, TimetableUniverse, VenueId};

/// Timetable performance indicators.
#[derive(Debug, Clone, PartialEq)]
pub struct TimetableKpi {
    /// Hard-constraint violations in the schedule.
    pub hard_violations: usize,
    /// Mean department-building preference over placements.
    pub avg_building_preference: f64,
    /// Mean lecturer-timeslot preference over placements.
    pub avg_timeslot_preference: f64,
    /// Mean seat utilisation over placements in venues with capacity.
    pub avg_utilization: f64,
    /// Per-venue mean seat utilisation.
    pub utilization_by_venue: HashMap<VenueId, f64>,
    /// Distinct venues in use.
    pub venues_used: usize,
    /// Distinct timeslots in use.
    pub timeslots_used: usize,
}

impl TimetableKpi {
    /// Computes KPIs for `schedule`.
    ///
    /// Placements whose ids do not resolve in `universe` are skipped.
    pub fn calculate(schedule: &Schedule, universe: &TimetableUniverse) -> Self {
        let mut building_sum = 0.0;
        let mut timeslot_sum = 0.0;
        let mut counted = 0usize;
        let mut utilization_sum = 0.0;
        let mut utilization_count = 0usize;
        let mut by_venue: HashMap<VenueId, (f64, usize)> = HashMap::new();
        let mut venues = HashSet::new();
        let mut timeslots = HashSet::new();

        for p in &schedule.placements {
            let (Some(module), Some(venue), Some(timeslot)) = (
                universe.module_by_id(p.module_id),
                universe.venue_by_id(p.venue_id),
                universe.timeslot_by_id(p.timeslot_id),
            ) else {
                continue;
            };
            counted += 1;
            venues.insert(venue.id);
            timeslots.insert(timeslot.id);

            building_sum += module.building_preference_average(venue);
            timeslot_sum += f64::from(timeslot.lecturer_preference(module.lecturer_id));

            if venue.capacity > 0 {
                let ratio = f64::from(module.enrolled) / f64::from(venue.capacity);
                utilization_sum += ratio;
                utilization_count += 1;
                let entry = by_venue.entry(venue.id).or_insert((0.0, 0));
                entry.0 += ratio;
                entry.1 += 1;
            }
        }

        let mean = |sum: f64, n: usize| if n == 0 { 0.0 } else { sum / n as f64 };

        Self {
            hard_violations: schedule.violations.len(),
            avg_building_preference: mean(building_sum, counted),
            avg_timeslot_preference: mean(timeslot_sum, counted),
            avg_utilization: mean(utilization_sum, utilization_count),
            utilization_by_venue: by_venue
                .into_iter()
                .map(|(id, (sum, n))| (id, mean(sum, n)))
                .collect(),
            venues_used: venues.len(),
            timeslots_used: timeslots.len(),
        }
    }

    /// Whether the schedule is valid and meets a minimum mean utilisation.
    pub fn meets_thresholds(&self, min_utilization: f64) -> bool {
        self.hard_violations == 0 && self.avg_utilization >= min_utilization
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Module, Placement, Timeslot, Venue, Violation, ViolationType};

    fn universe() -> TimetableUniverse {
        TimetableUniverse::new(
            vec![
                Module::new(1, 10).with_enrolled(20).with_department(5),
                Module::new(2, 11).with_enrolled(30),
            ],
            vec![
                Venue::new(100, 40).with_department_score(5, 16),
                Venue::new(101, 30),
            ],
            vec![
                Timeslot::new(1000, 0, 9).with_lecturer_preference(10, 4),
                Timeslot::new(1001, 0, 10),
            ],
        )
    }

    fn schedule(placements: Vec<Placement>) -> Schedule {
        Schedule {
            placements,
            violations: Vec::new(),
            fitness: 0,
            is_valid: true,
        }
    }

    #[test]
    fn test_kpi_basic() {
        let s = schedule(vec![Placement::new(1, 100, 1000), Placement::new(2, 101, 1001)]);
        let kpi = TimetableKpi::calculate(&s, &universe());

        assert_eq!(kpi.hard_violations, 0);
        // (16 + neutral 10) / 2
        assert!((kpi.avg_building_preference - 13.0).abs() < 1e-10);
        // (4 + neutral 10) / 2
        assert!((kpi.avg_timeslot_preference - 7.0).abs() < 1e-10);
        // (20/40 + 30/30) / 2
        assert!((kpi.avg_utilization - 0.75).abs() < 1e-10);
        assert!((kpi.utilization_by_venue[&100] - 0.5).abs() < 1e-10);
        assert_eq!(kpi.venues_used, 2);
        assert_eq!(kpi.timeslots_used, 2);
        assert!(kpi.meets_thresholds(0.7));
        assert!(!kpi.meets_thresholds(0.8));
    }

    #[test]
    fn test_kpi_shared_venue() {
        let s = schedule(vec![Placement::new(1, 100, 1000), Placement::new(2, 100, 1001)]);
        let kpi = TimetableKpi::calculate(&s, &universe());
        assert_eq!(kpi.venues_used, 1);
        assert_eq!(kpi.timeslots_used, 2);
        // (20/40 + 30/40) / 2
        assert!((kpi.utilization_by_venue[&100] - 0.625).abs() < 1e-10);
    }

    #[test]
    fn test_kpi_counts_violations() {
        let mut s = schedule(vec![Placement::new(1, 100, 1000), Placement::new(2, 100, 1000)]);
        s.violations.push(Violation::overlap(
            ViolationType::VenueClash,
            1,
            2,
            "modules 1 and 2 share venue 100",
        ));
        s.is_valid = false;
        let kpi = TimetableKpi::calculate(&s, &universe());
        assert_eq!(kpi.hard_violations, 1);
        assert!(!kpi.meets_thresholds(0.0));
    }

    #[test]
    fn test_kpi_extreme_department_scores() {
        let u = TimetableUniverse::new(
            vec![Module::new(1, 10)
                .with_enrolled(20)
                .with_department(5)
                .with_department(6)],
            vec![Venue::new(100, 40)
                .with_department_score(5, i32::MAX)
                .with_department_score(6, i32::MAX)],
            vec![Timeslot::new(1000, 0, 9)],
        );
        let kpi = TimetableKpi::calculate(&schedule(vec![Placement::new(1, 100, 1000)]), &u);
        assert_eq!(kpi.avg_building_preference, f64::from(i32::MAX));
    }

    #[test]
    fn test_kpi_empty_and_unknown() {
        let empty = TimetableKpi::calculate(&Schedule::empty(), &universe());
        assert_eq!(empty.venues_used, 0);
        assert_eq!(empty.avg_utilization, 0.0);

        let unknown = schedule(vec![Placement::new(99, 100, 1000)]);
        let kpi = TimetableKpi::calculate(&unknown, &universe());
        assert_eq!(kpi.venues_used, 0);
        assert_eq!(kpi.avg_building_preference, 0.0);
    }
}
