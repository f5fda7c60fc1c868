//! Contiguous memory allocation under First-Fit, Best-Fit, and Worst-Fit.
//!
//! Blocks are fixed-size and single-occupancy: a block holds at most one
//! process and an occupied block never returns to the candidate pool. A
//! request that fits nowhere is a soft outcome (`None` assignment), never
//! an error; callers report it alongside the fragmentation totals.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{BlockId, MemSize, ProcessId};

/// A fixed-size region of memory available for placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryBlock {
    pub id: BlockId,
    pub size: MemSize,
}

/// A process asking for memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemRequest {
    pub id: ProcessId,
    pub size: MemSize,
}

/// Block selection policy among the free blocks large enough to fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementPolicy {
    /// First candidate in block-list order. List order is significant and
    /// is never sorted.
    FirstFit,
    /// Smallest candidate; ties go to the earlier block in list order.
    BestFit,
    /// Largest candidate; ties go to the earlier block in list order.
    WorstFit,
}

/// Where one request ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub process: ProcessId,
    /// The block chosen, or `None` if no free block was large enough.
    pub block: Option<BlockId>,
    /// Wasted space inside the chosen block (block size minus request size).
    pub waste: MemSize,
}

/// Complete result of one allocation pass.
#[derive(Debug, Clone)]
pub struct AllocationOutcome {
    /// One assignment per request, in request order.
    pub assignments: Vec<Assignment>,
    /// Total wasted space inside occupied blocks.
    pub internal_fragmentation: MemSize,
    /// Total size of blocks still free after the pass.
    pub free_space: MemSize,
}

impl AllocationOutcome {
    /// Number of requests that received a block.
    pub fn placed(&self) -> usize {
        self.assignments.iter().filter(|a| a.block.is_some()).count()
    }

    /// The block assigned to a process, if any.
    pub fn block_of(&self, process: ProcessId) -> Option<BlockId> {
        self.assignments
            .iter()
            .find(|a| a.process == process)
            .and_then(|a| a.block)
    }
}

/// Place each request into a block under `policy`.
///
/// Requests are processed in caller order; each assigned block leaves the
/// candidate pool for the remaining requests. There is no preemption and
/// no re-allocation.
pub fn allocate(
    blocks: &[MemoryBlock],
    requests: &[MemRequest],
    policy: PlacementPolicy,
) -> AllocationOutcome {
    let mut free = vec![true; blocks.len()];
    let mut assignments = Vec::with_capacity(requests.len());
    let mut internal_fragmentation: MemSize = 0;

    for request in requests {
        let chosen = select_block(blocks, &free, request.size, policy);
        match chosen {
            Some(idx) => {
                free[idx] = false;
                let waste = blocks[idx].size - request.size;
                internal_fragmentation += waste;
                assignments.push(Assignment {
                    process: request.id,
                    block: Some(blocks[idx].id),
                    waste,
                });
            }
            None => {
                debug!(process = %request.id, size = request.size, "no block fits; request left unplaced");
                assignments.push(Assignment {
                    process: request.id,
                    block: None,
                    waste: 0,
                });
            }
        }
    }

    let free_space = blocks
        .iter()
        .zip(&free)
        .filter(|(_, f)| **f)
        .map(|(b, _)| b.size)
        .sum();

    AllocationOutcome {
        assignments,
        internal_fragmentation,
        free_space,
    }
}

/// Index of the block `policy` picks for a request of `size`, scanning the
/// candidate set (free and large enough) in list order so that strict
/// comparisons give first-wins tiebreaking.
fn select_block(
    blocks: &[MemoryBlock],
    free: &[bool],
    size: MemSize,
    policy: PlacementPolicy,
) -> Option<usize> {
    let mut chosen: Option<usize> = None;
    for (idx, block) in blocks.iter().enumerate() {
        if !free[idx] || block.size < size {
            continue;
        }
        match policy {
            PlacementPolicy::FirstFit => return Some(idx),
            PlacementPolicy::BestFit => {
                if chosen.map_or(true, |c| block.size < blocks[c].size) {
                    chosen = Some(idx);
                }
            }
            PlacementPolicy::WorstFit => {
                if chosen.map_or(true, |c| block.size > blocks[c].size) {
                    chosen = Some(idx);
                }
            }
        }
    }
    chosen
}
