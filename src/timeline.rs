//! Execution timeline recording for the scheduling simulator.
//!
//! Every stretch of CPU time handed to a process is recorded as a `Slice`
//! with its start tick and duration. The driving UI replays the finished
//! timeline for visualization; nothing here paces or animates.

use crate::types::{ProcessId, Ticks};

/// A single contiguous stretch of CPU time given to one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slice {
    pub process: ProcessId,
    /// Tick at which the slice starts.
    pub start: Ticks,
    /// Number of ticks executed in this slice.
    pub duration: Ticks,
}

/// A complete execution timeline, slices in execution order.
///
/// Adjacent slices of the same process are not merged: under Round Robin a
/// process that gets consecutive turns still shows one slice per turn.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    slices: Vec<Slice>,
}

impl Timeline {
    pub(crate) fn new() -> Self {
        Timeline { slices: Vec::new() }
    }

    pub(crate) fn record(&mut self, process: ProcessId, start: Ticks, duration: Ticks) {
        debug_assert!(duration > 0, "empty slice recorded for {process}");
        self.slices.push(Slice {
            process,
            start,
            duration,
        });
    }

    /// All slices in execution order.
    pub fn slices(&self) -> &[Slice] {
        &self.slices
    }

    /// Total ticks executed by a process across all its slices.
    pub fn runtime_of(&self, process: ProcessId) -> Ticks {
        self.slices
            .iter()
            .filter(|s| s.process == process)
            .map(|s| s.duration)
            .sum()
    }

    /// Number of slices a process received.
    pub fn slice_count(&self, process: ProcessId) -> usize {
        self.slices.iter().filter(|s| s.process == process).count()
    }

    /// Longest single slice a process received, or 0 if it never ran.
    pub fn longest_slice_of(&self, process: ProcessId) -> Ticks {
        self.slices
            .iter()
            .filter(|s| s.process == process)
            .map(|s| s.duration)
            .max()
            .unwrap_or(0)
    }

    /// Tick at which the last slice ends (total makespan).
    pub fn span(&self) -> Ticks {
        self.slices
            .iter()
            .map(|s| s.start + s.duration)
            .max()
            .unwrap_or(0)
    }

    /// Pretty-print the timeline for debugging.
    pub fn dump(&self) {
        for slice in &self.slices {
            eprintln!(
                "[{:>6}..{:>6}] {}",
                slice.start,
                slice.start + slice.duration,
                slice.process
            );
        }
    }
}
