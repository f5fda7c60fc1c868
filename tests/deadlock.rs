use oslab_sim::{
    DeadlockScenario, ProcessId, Rag, RagNode, ResourceId, SimError, VictimPolicy,
};

fn three_ring() -> Rag {
    // Allocation {R1->P1, R2->P2, R3->P3}, requests {P1->R2, P2->R3, P3->R1}.
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

/// A three-way circular wait is a deadlock; the same graph with one
/// request edge removed is not.
#[test]
fn ring_deadlocks_and_broken_ring_does_not() {
    assert!(three_ring().detect_cycle());

    let mut rag = Rag::new();
    for i in 1..=3 {
        rag.add_process(ProcessId(i));
        rag.add_resource(ResourceId(i));
    }
    for i in 1..=3u32 {
        rag.allocate(ResourceId(i), ProcessId(i)).unwrap();
    }
    rag.request(ProcessId(1), ResourceId(2)).unwrap();
    rag.request(ProcessId(2), ResourceId(3)).unwrap();
    // P3 requests nothing: the wait chain has an end.
    assert!(!rag.detect_cycle());
}

/// Detection is a pure query: repeated calls on an unmodified graph agree.
#[test]
fn detection_is_idempotent() {
    let rag = three_ring();
    let first = rag.detect_cycle();
    let second = rag.detect_cycle();
    assert_eq!(first, second);
    assert!(first);
}

/// The default ring scenario builds, deadlocks, and resolves by releasing
/// the last process on the cycle; a re-run confirms the system is safe.
#[test]
fn ring_scenario_resolves_via_last_in_cycle_victim() {
    let mut rag = DeadlockScenario::ring().build().unwrap();
    assert!(rag.detect_cycle());

    let victim = rag.pick_victim(VictimPolicy::LastInCycle).unwrap();
    assert_eq!(victim, ProcessId(3));
    rag.resolve(victim).unwrap();

    assert!(!rag.detect_cycle());
    assert_eq!(rag.request_of(victim), None);
    assert_eq!(rag.holder_of(ResourceId(3)), None);
    // The other two allocations survive the release.
    assert_eq!(rag.holder_of(ResourceId(1)), Some(ProcessId(1)));
    assert_eq!(rag.holder_of(ResourceId(2)), Some(ProcessId(2)));
}

/// A caller-named victim works the same as the automatic policy.
#[test]
fn caller_chosen_victim_breaks_the_cycle() {
    let mut rag = three_ring();
    let victim = rag.pick_victim(VictimPolicy::Process(ProcessId(1))).unwrap();
    rag.resolve(victim).unwrap();
    assert!(!rag.detect_cycle());
}

/// The reported cycle names the waiting chain in edge order, alternating
/// process and resource nodes.
#[test]
fn reported_cycle_walks_the_ring() {
    let cycle = three_ring().find_cycle().unwrap();
    assert_eq!(cycle.len(), 6);
    assert!(cycle.contains(&RagNode::Process(ProcessId(1))));
    assert!(cycle.contains(&RagNode::Resource(ResourceId(1))));
}

/// Malformed scenarios (edges naming unknown nodes) fail to build with a
/// graph-consistency error.
#[test]
fn malformed_scenario_fails_with_graph_error() {
    let mut scenario = DeadlockScenario::ring();
    scenario.allocations.push((ResourceId(7), ProcessId(1)));
    let err = scenario.build().unwrap_err();
    assert!(matches!(err, SimError::GraphConsistency(_)));
}
