//! Efficiency scoring layered on raw simulation output.
//!
//! Scores are a presentation policy, not a simulation result: they take
//! the simulator's metrics and map them onto a 0-100 scale for the host
//! to display. Nothing here feeds back into the algorithms.

use crate::types::MemSize;

/// Ideal average waiting time a scheduling run is judged against.
const TARGET_AVG_WAITING: f64 = 5.0;

/// Score a scheduling run from its average waiting time: 100 at or below
/// the target, minus 10 points per tick of excess, floored at 0.
pub fn scheduling_score(avg_waiting: f64) -> u32 {
    let efficiency = 100.0 - (avg_waiting - TARGET_AVG_WAITING) * 10.0;
    efficiency.clamp(0.0, 100.0).round() as u32
}

/// Score a memory allocation pass from its internal fragmentation as a
/// percentage of total memory: 2 points lost per percent wasted.
pub fn memory_score(internal_fragmentation: MemSize, total_memory: MemSize) -> u32 {
    // No memory means no waste: full marks, not a divide-by-zero penalty.
    if total_memory == 0 {
        return 100;
    }
    let frag_percent = internal_fragmentation as f64 / total_memory as f64 * 100.0;
    (100.0 - frag_percent * 2.0).clamp(0.0, 100.0).round() as u32
}

/// Score a deadlock exercise: full marks for keeping the system safe,
/// partial credit for detecting and recovering.
pub fn deadlock_score(prevented: bool) -> u32 {
    if prevented {
        100
    } else {
        70
    }
}
