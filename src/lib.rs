//! oslab_sim - Deterministic simulation engine for OS-concepts mini-labs.
//!
//! Three independent, stateless simulators, each a pure function of its
//! inputs. A host UI supplies scenarios and animates the precomputed
//! results; nothing here renders, paces, or persists.
//!
//! # Architecture
//!
//! - **Scheduling**: FCFS, SJF, and Round Robin over a fixed process set,
//!   producing an execution timeline and per-process timing metrics
//! - **Memory**: first/best/worst-fit placement of a request queue into
//!   fixed blocks, with internal-fragmentation accounting
//! - **Deadlock**: cycle detection and victim-based resolution on a
//!   single-instance resource-allocation graph
//! - **Scenarios**: fixed classroom setups and seed-reproducible random
//!   generation, JSON-loadable
//! - **Scores**: 0-100 efficiency grading layered on raw results
//!
//! # Usage
//!
//! ```rust
//! use oslab_sim::{schedule, Algorithm, SchedScenario};
//!
//! let scenario = SchedScenario::textbook();
//! let outcome = schedule(&scenario.processes, Algorithm::RoundRobin { quantum: 2 }).unwrap();
//! assert_eq!(outcome.timeline.span(), 16);
//! ```

pub mod error;
pub mod memory;
pub mod process;
pub mod rag;
pub mod scenario;
pub mod sched;
pub mod score;
pub mod timeline;
pub mod types;

// Re-export the main public types for convenience.
pub use error::{Result, SimError};
pub use memory::{allocate, AllocationOutcome, Assignment, MemRequest, MemoryBlock, PlacementPolicy};
pub use process::{ProcessReport, ProcessSpec};
pub use rag::{Rag, RagNode, VictimPolicy};
pub use scenario::{DeadlockScenario, MemoryScenario, SchedScenario, DEFAULT_SEED};
pub use sched::{schedule, Algorithm, SchedOutcome};
pub use score::{deadlock_score, memory_score, scheduling_score};
pub use timeline::{Slice, Timeline};
pub use types::{BlockId, MemSize, ProcessId, ResourceId, Ticks};
