//! Process model for the scheduling simulator.
//!
//! `ProcessSpec` is what the caller supplies; `ProcessReport` is what the
//! simulator hands back. Timing metrics are always derived, never input.

use serde::{Deserialize, Serialize};

use crate::types::{ProcessId, Ticks};

/// Definition of a process for scenario creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessSpec {
    pub id: ProcessId,
    /// When the process becomes runnable (simulated ticks).
    pub arrival: Ticks,
    /// Total CPU ticks the process needs to run to completion.
    pub burst: Ticks,
}

impl ProcessSpec {
    pub fn new(id: ProcessId, arrival: Ticks, burst: Ticks) -> Self {
        ProcessSpec { id, arrival, burst }
    }
}

/// Per-process timing metrics computed by a simulation run.
///
/// `turnaround = completion - arrival` and `waiting = turnaround - burst`
/// hold for every report the simulator produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessReport {
    pub id: ProcessId,
    pub arrival: Ticks,
    pub burst: Ticks,
    /// Tick at which the process finished its last slice.
    pub completion: Ticks,
    /// Total time from arrival to completion.
    pub turnaround: Ticks,
    /// Time spent ready but not executing.
    pub waiting: Ticks,
}
