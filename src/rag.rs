//! Resource-allocation graph and deadlock detection.
//!
//! The graph is bipartite and directed: an allocation edge points from a
//! resource to the process holding it, a request edge from a blocked
//! process to the resource it wants. Resources are single-instance, so a
//! cycle is both necessary and sufficient for deadlock and detection
//! reduces to finding one.
//!
//! Resolution is a manual, caller-chosen break of the cycle: the analyzer
//! releases one victim's edges and the caller re-runs detection to confirm.
//! Which process to sacrifice is policy, not something the graph decides.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::error::{Result, SimError};
use crate::types::{ProcessId, ResourceId};

/// A node in the resource-allocation graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RagNode {
    Process(ProcessId),
    Resource(ResourceId),
}

impl std::fmt::Display for RagNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RagNode::Process(p) => write!(f, "{p}"),
            RagNode::Resource(r) => write!(f, "{r}"),
        }
    }
}

/// How to choose the process whose edges get released when resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VictimPolicy {
    /// The caller names the victim outright.
    Process(ProcessId),
    /// The last process node on the detected cycle.
    LastInCycle,
}

/// A single-instance resource-allocation graph.
///
/// Nodes must be registered before edges can reference them; an edge to an
/// unknown node or one that would violate the single-instance invariants
/// fails with [`SimError::GraphConsistency`].
#[derive(Debug, Clone, Default)]
pub struct Rag {
    processes: BTreeSet<ProcessId>,
    resources: BTreeSet<ResourceId>,
    /// Resource -> holding process. At most one holder per resource.
    allocations: BTreeMap<ResourceId, ProcessId>,
    /// Process -> requested resource. At most one outstanding request.
    requests: BTreeMap<ProcessId, ResourceId>,
}

impl Rag {
    pub fn new() -> Self {
        Rag::default()
    }

    pub fn add_process(&mut self, process: ProcessId) {
        self.processes.insert(process);
    }

    pub fn add_resource(&mut self, resource: ResourceId) {
        self.resources.insert(resource);
    }

    pub fn holder_of(&self, resource: ResourceId) -> Option<ProcessId> {
        self.allocations.get(&resource).copied()
    }

    pub fn request_of(&self, process: ProcessId) -> Option<ResourceId> {
        self.requests.get(&process).copied()
    }

    /// Record that `process` currently holds `resource`.
    pub fn allocate(&mut self, resource: ResourceId, process: ProcessId) -> Result<()> {
        self.check_process(process)?;
        self.check_resource(resource)?;
        if let Some(holder) = self.allocations.get(&resource) {
            return Err(SimError::GraphConsistency(format!(
                "{resource} is already held by {holder}"
            )));
        }
        self.allocations.insert(resource, process);
        Ok(())
    }

    /// Record that `process` is blocked waiting for `resource`.
    pub fn request(&mut self, process: ProcessId, resource: ResourceId) -> Result<()> {
        self.check_process(process)?;
        self.check_resource(resource)?;
        if let Some(wanted) = self.requests.get(&process) {
            return Err(SimError::GraphConsistency(format!(
                "{process} already has an outstanding request for {wanted}"
            )));
        }
        self.requests.insert(process, resource);
        Ok(())
    }

    /// Whether the graph contains a cycle (circular wait).
    ///
    /// Pure and idempotent; short-circuits on the first cycle found.
    pub fn detect_cycle(&self) -> bool {
        self.find_cycle().is_some()
    }

    /// The first cycle found, as the nodes along it in edge order, or
    /// `None` if the graph is acyclic.
    ///
    /// Every node has at most one outgoing edge (a process requests one
    /// resource, a resource has one holder), so the DFS degenerates to a
    /// chain walk: the positions recorded along the current chain are the
    /// recursion stack, and revisiting one of them is the back-edge.
    pub fn find_cycle(&self) -> Option<Vec<RagNode>> {
        let mut visited: BTreeSet<RagNode> = BTreeSet::new();

        let roots = self
            .processes
            .iter()
            .map(|&p| RagNode::Process(p))
            .chain(self.resources.iter().map(|&r| RagNode::Resource(r)));

        for root in roots {
            if visited.contains(&root) {
                continue;
            }

            let mut chain: Vec<RagNode> = Vec::new();
            let mut on_chain: BTreeMap<RagNode, usize> = BTreeMap::new();
            let mut node = root;
            loop {
                if let Some(&pos) = on_chain.get(&node) {
                    let cycle = chain[pos..].to_vec();
                    debug!(len = cycle.len(), "cycle found in resource-allocation graph");
                    return Some(cycle);
                }
                if visited.contains(&node) {
                    // Joins a chain already proven acyclic.
                    break;
                }
                visited.insert(node);
                on_chain.insert(node, chain.len());
                chain.push(node);

                node = match self.successor(node) {
                    Some(next) => next,
                    None => break,
                };
            }
        }

        None
    }

    /// Release everything `victim` holds and clear its outstanding request.
    ///
    /// This breaks a circular wait through `victim`; callers re-run
    /// [`Rag::detect_cycle`] afterward to confirm.
    pub fn resolve(&mut self, victim: ProcessId) -> Result<()> {
        self.check_process(victim)?;
        self.allocations.retain(|_, holder| *holder != victim);
        self.requests.remove(&victim);
        debug!(victim = %victim, "released victim's allocations and request");
        Ok(())
    }

    /// Choose a victim under `policy`, or `None` when the graph has no
    /// cycle and nothing needs breaking.
    pub fn pick_victim(&self, policy: VictimPolicy) -> Option<ProcessId> {
        match policy {
            VictimPolicy::Process(p) => Some(p),
            VictimPolicy::LastInCycle => {
                let cycle = self.find_cycle()?;
                cycle.iter().rev().find_map(|node| match node {
                    RagNode::Process(p) => Some(*p),
                    RagNode::Resource(_) => None,
                })
            }
        }
    }

    fn successor(&self, node: RagNode) -> Option<RagNode> {
        match node {
            RagNode::Process(p) => self.requests.get(&p).map(|&r| RagNode::Resource(r)),
            RagNode::Resource(r) => self.allocations.get(&r).map(|&p| RagNode::Process(p)),
        }
    }

    fn check_process(&self, process: ProcessId) -> Result<()> {
        if !self.processes.contains(&process) {
            return Err(SimError::GraphConsistency(format!(
                "unknown process {process}"
            )));
        }
        Ok(())
    }

    fn check_resource(&self, resource: ResourceId) -> Result<()> {
        if !self.resources.contains(&resource) {
            return Err(SimError::GraphConsistency(format!(
                "unknown resource {resource}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring() -> Rag {
        // P1 holds R1 wants R2, P2 holds R2 wants R3, P3 holds R3 wants R1.
        let mut rag = Rag::new();
        for i in 1..=3 {
            rag.add_process(ProcessId(i));
            rag.add_resource(ResourceId(i));
        }
        for i in 1..=3u32 {
            rag.allocate(ResourceId(i), ProcessId(i)).unwrap();
            rag.request(ProcessId(i), ResourceId(i % 3 + 1)).unwrap();
        }
        rag
    }

    #[test]
    fn three_way_ring_is_a_deadlock() {
        assert!(ring().detect_cycle());
    }

    #[test]
    fn breaking_one_request_edge_clears_the_ring() {
        let mut rag = Rag::new();
        for i in 1..=3 {
            rag.add_process(ProcessId(i));
            rag.add_resource(ResourceId(i));
        }
        for i in 1..=3u32 {
            rag.allocate(ResourceId(i), ProcessId(i)).unwrap();
        }
        // Only two of the three request edges: no circular wait.
        rag.request(ProcessId(1), ResourceId(2)).unwrap();
        rag.request(ProcessId(2), ResourceId(3)).unwrap();
        assert!(!rag.detect_cycle());
    }

    #[test]
    fn detection_is_idempotent() {
        let rag = ring();
        assert_eq!(rag.detect_cycle(), rag.detect_cycle());
    }

    #[test]
    fn cycle_alternates_processes_and_resources() {
        let cycle = ring().find_cycle().unwrap();
        assert_eq!(cycle.len(), 6);
        for pair in cycle.windows(2) {
            match (pair[0], pair[1]) {
                (RagNode::Process(_), RagNode::Resource(_)) => {}
                (RagNode::Resource(_), RagNode::Process(_)) => {}
                other => panic!("consecutive same-kind nodes in cycle: {other:?}"),
            }
        }
    }

    #[test]
    fn resolving_the_chosen_victim_clears_the_deadlock() {
        let mut rag = ring();
        let victim = rag.pick_victim(VictimPolicy::LastInCycle).unwrap();
        rag.resolve(victim).unwrap();
        assert!(!rag.detect_cycle());
        assert_eq!(rag.request_of(victim), None);
    }

    #[test]
    fn edges_to_unknown_nodes_are_rejected() {
        let mut rag = Rag::new();
        rag.add_process(ProcessId(1));
        let err = rag.allocate(ResourceId(9), ProcessId(1)).unwrap_err();
        assert!(matches!(err, SimError::GraphConsistency(_)));
        let err = rag.request(ProcessId(2), ResourceId(9)).unwrap_err();
        assert!(matches!(err, SimError::GraphConsistency(_)));
    }

    #[test]
    fn double_allocation_of_a_resource_is_rejected() {
        let mut rag = Rag::new();
        rag.add_process(ProcessId(1));
        rag.add_process(ProcessId(2));
        rag.add_resource(ResourceId(1));
        rag.allocate(ResourceId(1), ProcessId(1)).unwrap();
        let err = rag.allocate(ResourceId(1), ProcessId(2)).unwrap_err();
        assert!(matches!(err, SimError::GraphConsistency(_)));
    }

    #[test]
    fn idle_process_outside_the_ring_does_not_matter() {
        let mut rag = ring();
        rag.add_process(ProcessId(4));
        assert!(rag.detect_cycle());
    }
}
