//! Result sink boundary.
//!
//! The driver reports progress at a fixed cadence and the final schedule
//! exactly once. Sinks must hand off without blocking the evolution loop;
//! transport (websocket, database, ...) belongs to the implementor.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use tracing::{debug, info};

use crate::models::Schedule;

/// Progress snapshot for one generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Generation index (0 = initial population).
    pub generation: usize,
    /// Fitness of the generation's top-ranked chromosome.
    pub best_fitness: i64,
    /// Whether that chromosome is valid.
    pub is_valid: bool,
}

/// Receives progress and the final schedule.
pub trait ResultSink: Send + Sync {
    /// Called at most once per generation. Must not block.
    fn report_progress(&self, progress: Progress);

    /// Called exactly once when the job terminates.
    fn report_completion(&self, schedule: &Schedule);
}

impl<S: ResultSink + ?Sized> ResultSink for Arc<S> {
    fn report_progress(&self, progress: Progress) {
        (**self).report_progress(progress);
    }

    fn report_completion(&self, schedule: &Schedule) {
        (**self).report_completion(schedule);
    }
}

/// Event forwarded by [`ChannelSink`].
#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    Progress(Progress),
    Completed(Schedule),
}

/// Unbounded channel handoff; sending never blocks.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: Sender<SinkEvent>,
}

impl ChannelSink {
    /// Creates a sink and the receiver its events arrive on.
    pub fn new() -> (Self, Receiver<SinkEvent>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }

    fn send(&self, event: SinkEvent) {
        if self.tx.send(event).is_err() {
            debug!("result receiver dropped; discarding event");
        }
    }
}

impl ResultSink for ChannelSink {
    fn report_progress(&self, progress: Progress) {
        self.send(SinkEvent::Progress(progress));
    }

    fn report_completion(&self, schedule: &Schedule) {
        self.send(SinkEvent::Completed(schedule.clone()));
    }
}

/// Writes progress and completion to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl ResultSink for LogSink {
    fn report_progress(&self, progress: Progress) {
        info!(
            generation = progress.generation,
            best_fitness = progress.best_fitness,
            valid = progress.is_valid,
            "timetable job progress"
        );
    }

    fn report_completion(&self, schedule: &Schedule) {
        info!(
            placements = schedule.placements.len(),
            fitness = schedule.fitness,
            valid = schedule.is_valid,
            violations = schedule.violations.len(),
            "timetable job complete"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_sink_forwards_in_order() {
        let (sink, rx) = ChannelSink::new();
        let p = Progress {
            generation: 3,
            best_fitness: 1200,
            is_valid: false,
        };
        sink.report_progress(p);
        sink.report_completion(&Schedule::empty());

        assert_eq!(rx.recv().unwrap(), SinkEvent::Progress(p));
        assert_eq!(rx.recv().unwrap(), SinkEvent::Completed(Schedule::empty()));
    }

    #[test]
    fn test_channel_sink_survives_dropped_receiver() {
        let (sink, rx) = ChannelSink::new();
        drop(rx);
        sink.report_completion(&Schedule::empty());
    }

    #[test]
    fn test_arc_sink_delegates() {
        let (sink, rx) = ChannelSink::new();
        let shared: Arc<dyn ResultSink> = Arc::new(sink);
        shared.report_completion(&Schedule::empty());
        assert!(matches!(rx.recv().unwrap(), SinkEvent::Completed(_)));
    }
}
