//! End-to-end job scenarios through the provider/runner/sink boundary.

use std::sync::Arc;

use u_timetable::job::{JobConfig, JobOutcome, JobRunner};
use u_timetable::models::{Module, Placement, Timeslot, Venue};
use u_timetable::provider::{InMemoryProvider, TimetableDataset};
use u_timetable::sink::{ChannelSink, Progress, SinkEvent};
use u_timetable::validation::ValidationErrorKind;
use u_timetable::TimetableError;

fn config() -> JobConfig {
    JobConfig::default()
        .with_generations(40)
        .with_population_size(20)
        .with_elite_survivors(2)
        .with_seed(42)
}

fn provider(dataset: TimetableDataset) -> InMemoryProvider {
    InMemoryProvider::new().with_dataset(1, dataset)
}

fn progress(events: &[SinkEvent]) -> Vec<Progress> {
    events
        .iter()
        .filter_map(|e| match e {
            SinkEvent::Progress(p) => Some(*p),
            SinkEvent::Completed(_) => None,
        })
        .collect()
}

fn completions(events: &[SinkEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, SinkEvent::Completed(_)))
        .count()
}

/// Distinct lecturers and courses, one venue, one timeslot per module.
fn separable() -> TimetableDataset {
    TimetableDataset::new(
        vec![
            Module::new(1, 10).offered_by(100, 1, 25),
            Module::new(2, 11).offered_by(101, 2, 30),
            Module::new(3, 12).offered_by(102, 3, 15),
        ],
        vec![Venue::new(500, 40)],
        vec![
            Timeslot::new(1000, 0, 9),
            Timeslot::new(1001, 0, 10),
            Timeslot::new(1002, 0, 11),
        ],
    )
}

#[test]
fn test_single_module_converges_after_run_down() {
    let dataset = TimetableDataset::new(
        vec![Module::new(1, 10).with_enrolled(20)],
        vec![Venue::new(100, 30)],
        vec![Timeslot::new(1000, 0, 9)],
    );
    let (sink, rx) = ChannelSink::new();
    let report = JobRunner::run(&provider(dataset), &sink, 1, config()).unwrap();

    assert_eq!(report.outcome, JobOutcome::Converged);
    assert_eq!(report.first_valid_generation, Some(0));
    assert_eq!(report.generations, config().run_down_generations());
    assert!(report.is_valid());
    assert_eq!(report.schedule.placements, vec![Placement::new(1, 100, 1000)]);

    let events: Vec<_> = rx.try_iter().collect();
    assert_eq!(completions(&events), 1);
}

#[test]
fn test_separable_universe_converges() {
    let (sink, _rx) = ChannelSink::new();
    let report = JobRunner::run(&provider(separable()), &sink, 1, config()).unwrap();

    assert_eq!(report.outcome, JobOutcome::Converged);
    assert!(report.is_valid());
    assert!(report.schedule.violations.is_empty());
    let first = report.first_valid_generation.unwrap();
    assert_eq!(report.generations, first + config().run_down_generations());

    let mut slots: Vec<_> = report
        .schedule
        .placements
        .iter()
        .map(|p| p.timeslot_id)
        .collect();
    slots.sort_unstable();
    assert_eq!(slots, vec![1000, 1001, 1002]);
}

#[test]
fn test_shared_lecturer_single_timeslot_exhausts() {
    let dataset = TimetableDataset::new(
        (1..=3).map(|i| Module::new(i, 10).with_enrolled(10)).collect(),
        vec![Venue::new(100, 30), Venue::new(101, 30), Venue::new(102, 30)],
        vec![Timeslot::new(1000, 0, 9)],
    );
    let (sink, rx) = ChannelSink::new();
    let report = JobRunner::run(&provider(dataset), &sink, 1, config()).unwrap();

    assert_eq!(report.outcome, JobOutcome::Exhausted);
    assert_eq!(report.generations, config().generations);
    assert_eq!(report.first_valid_generation, None);
    assert!(!report.is_valid());
    assert!(!report.schedule.violations.is_empty());

    let events: Vec<_> = rx.try_iter().collect();
    assert_eq!(completions(&events), 1);
    assert!(progress(&events).iter().all(|p| !p.is_valid));
}

#[test]
fn test_shared_venue_single_timeslot_exhausts() {
    let dataset = TimetableDataset::new(
        (1..=3).map(|i| Module::new(i, i).with_enrolled(10)).collect(),
        vec![Venue::new(100, 30)],
        vec![Timeslot::new(1000, 0, 9)],
    );
    let (sink, _rx) = ChannelSink::new();
    let report = JobRunner::run(&provider(dataset), &sink, 1, config()).unwrap();

    assert_eq!(report.outcome, JobOutcome::Exhausted);
    assert!(!report.is_valid());
}

#[test]
fn test_empty_universe_converges_immediately() {
    let (sink, rx) = ChannelSink::new();
    let dataset = TimetableDataset::new(Vec::new(), Vec::new(), Vec::new());
    let report = JobRunner::run(&provider(dataset), &sink, 1, config()).unwrap();

    assert_eq!(report.outcome, JobOutcome::Converged);
    assert_eq!(report.generations, 0);
    assert!(report.schedule.placements.is_empty());
    assert_eq!(report.schedule.fitness, 0);
    assert!(report.is_valid());

    let events: Vec<_> = rx.try_iter().collect();
    assert_eq!(events.len(), 1);
    assert_eq!(completions(&events), 1);
}

#[test]
fn test_elitism_keeps_leader_fitness_monotonic() {
    let dataset = TimetableDataset::new(
        (1..=8)
            .map(|i| Module::new(i, i % 3).with_enrolled(20 + i as u32))
            .collect(),
        vec![Venue::new(100, 25), Venue::new(101, 40)],
        (0..4).map(|h| Timeslot::new(1000 + h, 0, 9 + h as u8)).collect(),
    );
    let config = config()
        .with_report_rate(0.025)
        .with_elite_survivors(1)
        .with_run_down_proportion(1.0);
    let (sink, rx) = ChannelSink::new();
    JobRunner::run(&provider(dataset), &sink, 1, config).unwrap();

    let events: Vec<_> = rx.try_iter().collect();
    let reports = progress(&events);
    assert!(reports.len() > 1);
    for pair in reports.windows(2) {
        assert_eq!(pair[1].generation, pair[0].generation + 1);
        assert!(pair[1].best_fitness >= pair[0].best_fitness);
    }
}

#[test]
fn test_resume_from_valid_schedule() {
    // Listed out of module order on purpose.
    let existing = vec![
        Placement::new(3, 500, 1002),
        Placement::new(1, 500, 1000),
        Placement::new(2, 500, 1001),
    ];
    let (sink, _rx) = ChannelSink::new();
    let report = JobRunner::run(
        &provider(separable().with_existing(existing)),
        &sink,
        1,
        config(),
    )
    .unwrap();

    assert_eq!(report.outcome, JobOutcome::Converged);
    assert_eq!(report.first_valid_generation, Some(0));
    assert_eq!(report.generations, config().run_down_generations());
    assert!(report.is_valid());
}

#[test]
fn test_resume_with_missing_placement() {
    let existing = vec![Placement::new(1, 500, 1000)];
    let (sink, _rx) = ChannelSink::new();
    let report = JobRunner::run(
        &provider(separable().with_existing(existing)),
        &sink,
        1,
        config(),
    )
    .unwrap();
    assert_eq!(report.schedule.placements.len(), 3);
}

#[test]
fn test_dangling_existing_placement_rejected_before_start() {
    let existing = vec![
        Placement::new(1, 500, 1000),
        Placement::new(2, 999, 1001),
        Placement::new(7, 500, 1002),
    ];
    let provider = Arc::new(provider(separable().with_existing(existing)));
    let (sink, rx) = ChannelSink::new();

    let err = JobRunner::start(provider, Arc::new(sink), 1, config()).unwrap_err();
    match err {
        TimetableError::DataIntegrity(errors) => {
            let kinds: Vec<_> = errors.iter().map(|e| e.kind).collect();
            assert!(kinds.contains(&ValidationErrorKind::UnknownVenue));
            assert!(kinds.contains(&ValidationErrorKind::UnknownModule));
        }
        other => panic!("expected data integrity error, got {other:?}"),
    }
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_invalid_config_rejected_before_start() {
    let provider = Arc::new(provider(separable()));
    let (sink, rx) = ChannelSink::new();
    let config = config().with_population_size(2).with_elite_survivors(2);

    let err = JobRunner::start(provider, Arc::new(sink), 1, config).unwrap_err();
    assert!(matches!(err, TimetableError::Configuration(_)));
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_unknown_job_not_found() {
    let provider = Arc::new(provider(separable()));
    let (sink, _rx) = ChannelSink::new();
    let err = JobRunner::start(provider, Arc::new(sink), 2, config()).unwrap_err();
    assert!(matches!(err, TimetableError::NotFound(2)));
}

#[test]
fn test_stop_reports_best_so_far() {
    let dataset = TimetableDataset::new(
        (1..=4).map(|i| Module::new(i, 10).with_enrolled(10)).collect(),
        vec![Venue::new(100, 30)],
        vec![Timeslot::new(1000, 0, 9)],
    );
    let provider = Arc::new(provider(dataset));
    let (sink, rx) = ChannelSink::new();
    let config = config().with_generations(100_000_000);

    let handle = JobRunner::start(provider, Arc::new(sink), 1, config).unwrap();
    handle.stop();
    let before_join = handle.current_generation();
    let report = handle.join().unwrap();

    assert_eq!(report.outcome, JobOutcome::Stopped);
    assert!(report.generations >= before_join);
    assert!(!report.is_valid());
    assert_eq!(report.schedule.placements.len(), 4);

    let events: Vec<_> = rx.try_iter().collect();
    assert_eq!(completions(&events), 1);
    assert!(matches!(events.last(), Some(SinkEvent::Completed(_))));
}
