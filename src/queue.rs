//! Deferred command queue
//!
//! Calls are recorded in order and applied only when [`CommandQueue::run`]
//! drains the queue. Commands are applied strictly FIFO; the first failure
//! stops the run, keeps everything applied before it, and discards the rest.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use scenic_core::SceneError;
use thiserror::Error;

use crate::command::Command;
use crate::executor::Executor;

/// A command that failed during a run
#[derive(Debug, Error)]
#[error("Command #{position} {command} failed ({}): {source}", .source.kind_name())]
pub struct RunError {
    /// Zero-based position of the failing command in the drained queue
    pub position: usize,
    /// The failing command
    pub command: Command,
    /// Number of commands discarded after the failure
    pub skipped: usize,
    /// Why it failed
    #[source]
    pub source: SceneError,
}

impl RunError {
    /// Error kind of the failing command
    pub fn kind(&self) -> &'static str {
        self.source.kind_name()
    }
}

/// Summary of a successful run
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunReport {
    /// Commands applied
    pub applied: usize,
    /// Renders performed during this run
    pub renders: usize,
    /// Wall time of the run
    pub elapsed: Duration,
}

/// Ordered list of pending commands
#[derive(Debug, Clone, Default)]
pub struct CommandQueue {
    commands: VecDeque<Command>,
}

impl CommandQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command
    pub fn push(&mut self, command: Command) {
        self.commands.push_back(command);
    }

    /// Number of pending commands
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check if no commands are pending
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Pending commands in submission order
    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    /// Drop all pending commands without applying them
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Apply every pending command to `executor`, in order
    ///
    /// The queue is empty afterwards whether the run succeeds or not.
    /// Running an empty queue does nothing and returns a zero report.
    pub fn run(&mut self, executor: &mut Executor) -> Result<RunReport, RunError> {
        if self.commands.is_empty() {
            return Ok(RunReport::default());
        }

        let start = Instant::now();
        let renders_before = executor.render_count();
        let total = self.commands.len();
        log::info!("Running {} command(s)", total);

        let mut position = 0;
        while let Some(command) = self.commands.pop_front() {
            if let Err(source) = executor.apply(&command) {
                let skipped = self.commands.len();
                self.commands.clear();
                log::error!("Command #{} {} failed: {}", position, command, source);
                return Err(RunError {
                    position,
                    command,
                    skipped,
                    source,
                });
            }
            position += 1;
        }

        let report = RunReport {
            applied: total,
            renders: executor.render_count() - renders_before,
            elapsed: start.elapsed(),
        };
        log::info!("Applied {} command(s) in {:.2?}", report.applied, report.elapsed);
        Ok(report)
    }
}

impl Extend<Command> for CommandQueue {
    fn extend<I: IntoIterator<Item = Command>>(&mut self, iter: I) {
        self.commands.extend(iter);
    }
}

impl FromIterator<Command> for CommandQueue {
    fn from_iter<I: IntoIterator<Item = Command>>(iter: I) -> Self {
        Self {
            commands: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_camera(id: &str) -> Command {
        Command::NewCamera {
            id: id.to_string(),
            type_name: "PerspectiveCamera".to_string(),
        }
    }

    #[test]
    fn test_empty_run_is_noop() {
        let mut queue = CommandQueue::new();
        let mut executor = Executor::default();
        let report = queue.run(&mut executor).unwrap();
        assert_eq!(report, RunReport::default());
        assert!(executor.registry().is_empty());
    }

    #[test]
    fn test_nothing_applied_before_run() {
        let mut queue = CommandQueue::new();
        let mut executor = Executor::default();
        queue.push(new_camera("cam1"));
        assert_eq!(queue.len(), 1);
        assert!(executor.registry().is_empty());

        let report = queue.run(&mut executor).unwrap();
        assert_eq!(report.applied, 1);
        assert!(queue.is_empty());
        assert!(executor.registry().contains("cam1"));
    }

    #[test]
    fn test_failure_keeps_prior_effects_and_discards_rest() {
        let mut queue: CommandQueue = vec![
            new_camera("cam1"),
            new_camera("cam1"),
            new_camera("cam2"),
            new_camera("cam3"),
        ]
        .into_iter()
        .collect();
        let mut executor = Executor::default();

        let err = queue.run(&mut executor).unwrap_err();
        assert_eq!(err.position, 1);
        assert_eq!(err.skipped, 2);
        assert_eq!(err.kind(), "DuplicateId");
        assert_eq!(err.command, new_camera("cam1"));
        assert!(err.to_string().starts_with("Command #1 NewCamera(\"cam1\""));

        assert!(queue.is_empty());
        assert!(executor.registry().contains("cam1"));
        assert!(!executor.registry().contains("cam2"));

        // A second run has nothing left to do
        assert_eq!(queue.run(&mut executor).unwrap().applied, 0);
    }
}
