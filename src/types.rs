//! Newtype wrappers and type aliases for domain concepts.
//!
//! Newtypes for identifiers (processes, memory blocks, resources) prevent
//! silent type confusion between the three simulators. Type aliases for
//! plain quantities (ticks, memory sizes) provide self-documenting code
//! without the boilerplate of implementing arithmetic traits.

use serde::{Deserialize, Serialize};

/// Process identifier within one simulation scenario.
///
/// Displayed as `P1`, `P2`, ... to match classroom convention (scenario
/// generators number from 1, but any u32 is valid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProcessId(pub u32);

/// Memory block identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(pub u32);

/// Resource identifier in a resource-allocation graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceId(pub u32);

/// Simulated time in scheduler ticks.
pub type Ticks = u64;

/// Memory quantity in megabytes.
pub type MemSize = u64;

impl std::fmt::Display for ProcessId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "P{}", self.0)
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "B{}", self.0)
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "R{}", self.0)
    }
}
