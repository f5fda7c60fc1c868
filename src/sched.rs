//! CPU scheduling simulator: FCFS, SJF, and Round Robin.
//!
//! One call computes the complete execution timeline and per-process timing
//! metrics for a fixed set of processes. The computation is pure and eager;
//! any step-by-step reveal happens in the caller after the fact.

use std::collections::VecDeque;

use tracing::debug;

use crate::error::{Result, SimError};
use crate::process::{ProcessReport, ProcessSpec};
use crate::timeline::Timeline;
use crate::types::Ticks;

/// Scheduling discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// First-Come-First-Served: strict arrival order, non-preemptive.
    Fcfs,
    /// Shortest-Job-First: always the shortest available burst, non-preemptive.
    Sjf,
    /// Round Robin with a fixed time quantum.
    RoundRobin { quantum: Ticks },
}

/// Complete result of one scheduling run.
#[derive(Debug, Clone)]
pub struct SchedOutcome {
    /// Slices in execution order, for visualization.
    pub timeline: Timeline,
    /// One report per input process, in input order.
    pub processes: Vec<ProcessReport>,
    pub avg_waiting: f64,
    pub avg_turnaround: f64,
}

/// Run `algorithm` over `specs` and return the timeline and metrics.
///
/// Fails with [`SimError::InvalidInput`] on an empty process list, a zero
/// burst time, a zero Round Robin quantum, or a duplicate process id. The
/// algorithms themselves are total for valid input.
pub fn schedule(specs: &[ProcessSpec], algorithm: Algorithm) -> Result<SchedOutcome> {
    validate(specs, algorithm)?;

    let mut timeline = Timeline::new();
    let completions = match algorithm {
        Algorithm::Fcfs => fcfs(specs, &mut timeline),
        Algorithm::Sjf => sjf(specs, &mut timeline),
        Algorithm::RoundRobin { quantum } => round_robin(specs, quantum, &mut timeline),
    };

    let processes: Vec<ProcessReport> = specs
        .iter()
        .zip(completions)
        .map(|(p, completion)| {
            let turnaround = completion - p.arrival;
            ProcessReport {
                id: p.id,
                arrival: p.arrival,
                burst: p.burst,
                completion,
                turnaround,
                waiting: turnaround - p.burst,
            }
        })
        .collect();

    let n = processes.len() as f64;
    let avg_waiting = processes.iter().map(|p| p.waiting as f64).sum::<f64>() / n;
    let avg_turnaround = processes.iter().map(|p| p.turnaround as f64).sum::<f64>() / n;
    debug!(
        ?algorithm,
        avg_waiting, avg_turnaround, "scheduling run complete"
    );

    Ok(SchedOutcome {
        timeline,
        processes,
        avg_waiting,
        avg_turnaround,
    })
}

fn validate(specs: &[ProcessSpec], algorithm: Algorithm) -> Result<()> {
    if specs.is_empty() {
        return Err(SimError::InvalidInput("process list is empty".into()));
    }
    for p in specs {
        if p.burst == 0 {
            return Err(SimError::InvalidInput(format!(
                "{} has zero burst time",
                p.id
            )));
        }
    }
    let mut seen = std::collections::HashSet::new();
    for p in specs {
        if !seen.insert(p.id) {
            return Err(SimError::InvalidInput(format!("duplicate process id {}", p.id)));
        }
    }
    if let Algorithm::RoundRobin { quantum } = algorithm {
        if quantum == 0 {
            return Err(SimError::InvalidInput("time quantum must be positive".into()));
        }
    }
    Ok(())
}

/// Stable sort of input indices by arrival time: ties keep input order.
fn arrival_order(specs: &[ProcessSpec]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..specs.len()).collect();
    order.sort_by_key(|&i| specs[i].arrival);
    order
}

/// First-Come-First-Served. The clock never rewinds; if it is behind the
/// next process's arrival the CPU idles and the clock jumps forward.
fn fcfs(specs: &[ProcessSpec], timeline: &mut Timeline) -> Vec<Ticks> {
    let mut completion = vec![0; specs.len()];
    let mut clock: Ticks = 0;

    for i in arrival_order(specs) {
        let p = &specs[i];
        if clock < p.arrival {
            clock = p.arrival;
        }
        timeline.record(p.id, clock, p.burst);
        clock += p.burst;
        completion[i] = clock;
    }

    completion
}

/// Shortest-Job-First, non-preemptive. At each decision point the candidate
/// set is every arrived, uncompleted process; the minimum burst wins, with
/// ties broken by earliest arrival and then input order. An empty candidate
/// set advances the clock one tick.
fn sjf(specs: &[ProcessSpec], timeline: &mut Timeline) -> Vec<Ticks> {
    let n = specs.len();
    let mut completion = vec![0; n];
    let mut done = vec![false; n];
    let mut remaining = n;
    let mut clock: Ticks = 0;

    while remaining > 0 {
        // Scanning in input order with a strict comparison makes input
        // order the final tiebreaker.
        let mut pick: Option<usize> = None;
        for i in 0..n {
            if done[i] || specs[i].arrival > clock {
                continue;
            }
            pick = match pick {
                None => Some(i),
                Some(j) if (specs[i].burst, specs[i].arrival) < (specs[j].burst, specs[j].arrival) => {
                    Some(i)
                }
                keep => keep,
            };
        }

        match pick {
            None => clock += 1,
            Some(i) => {
                let p = &specs[i];
                timeline.record(p.id, clock, p.burst);
                clock += p.burst;
                completion[i] = clock;
                done[i] = true;
                remaining -= 1;
            }
        }
    }

    completion
}

/// Round Robin. Processes rotate in a circular queue seeded in arrival
/// order (ties by input order) and execute `min(quantum, remaining)` per
/// turn. When no queued process has arrived yet, the clock jumps to the
/// earliest queued arrival rather than spinning with time frozen.
fn round_robin(specs: &[ProcessSpec], quantum: Ticks, timeline: &mut Timeline) -> Vec<Ticks> {
    let n = specs.len();
    let mut completion = vec![0; n];
    let mut remaining: Vec<Ticks> = specs.iter().map(|p| p.burst).collect();
    let mut queue: VecDeque<usize> = arrival_order(specs).into();

    let mut clock: Ticks = 0;
    // Backstop against nontermination: consecutive dequeues that execute
    // nothing are bounded by one full rotation of the queue.
    let guard = (n * 10) as u64;
    let mut idle_spins = 0u64;

    while let Some(i) = queue.pop_front() {
        if specs[i].arrival > clock {
            if !queue.iter().any(|&j| specs[j].arrival <= clock) {
                // CPU is idle: jump to the earliest arrival still queued.
                let next = queue
                    .iter()
                    .map(|&j| specs[j].arrival)
                    .chain(std::iter::once(specs[i].arrival))
                    .min()
                    .unwrap();
                clock = next;
            }
            if specs[i].arrival > clock {
                // Someone else arrived first; forfeit this turn.
                idle_spins += 1;
                debug_assert!(idle_spins <= guard, "round robin spun {idle_spins} turns without running anything");
                queue.push_back(i);
                continue;
            }
        }

        idle_spins = 0;
        let run = quantum.min(remaining[i]);
        timeline.record(specs[i].id, clock, run);
        clock += run;
        remaining[i] -= run;
        if remaining[i] > 0 {
            queue.push_back(i);
        } else {
            completion[i] = clock;
        }
    }

    completion
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProcessId;

    fn spec(id: u32, arrival: Ticks, burst: Ticks) -> ProcessSpec {
        ProcessSpec::new(ProcessId(id), arrival, burst)
    }

    #[test]
    fn empty_process_list_is_rejected() {
        let err = schedule(&[], Algorithm::Fcfs).unwrap_err();
        assert!(matches!(err, SimError::InvalidInput(_)));
    }

    #[test]
    fn zero_burst_is_rejected() {
        let err = schedule(&[spec(1, 0, 0)], Algorithm::Fcfs).unwrap_err();
        assert!(matches!(err, SimError::InvalidInput(_)));
    }

    #[test]
    fn zero_quantum_is_rejected() {
        let err = schedule(&[spec(1, 0, 3)], Algorithm::RoundRobin { quantum: 0 }).unwrap_err();
        assert!(matches!(err, SimError::InvalidInput(_)));
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let err = schedule(&[spec(1, 0, 3), spec(1, 1, 2)], Algorithm::Fcfs).unwrap_err();
        assert!(matches!(err, SimError::InvalidInput(_)));
    }

    #[test]
    fn fcfs_idles_over_arrival_gaps() {
        // Nothing arrives until tick 4; the clock must jump, not rewind.
        let out = schedule(&[spec(1, 4, 2), spec(2, 5, 1)], Algorithm::Fcfs).unwrap();
        let slices = out.timeline.slices();
        assert_eq!(slices[0].start, 4);
        assert_eq!(out.processes[0].waiting, 0);
        assert_eq!(out.processes[1].completion, 7);
        assert_eq!(out.processes[1].waiting, 1);
    }

    #[test]
    fn fcfs_breaks_arrival_ties_by_input_order() {
        let out = schedule(
            &[spec(3, 0, 2), spec(1, 0, 2), spec(2, 0, 2)],
            Algorithm::Fcfs,
        )
        .unwrap();
        let order: Vec<u32> = out.timeline.slices().iter().map(|s| s.process.0).collect();
        assert_eq!(order, vec![3, 1, 2]);
    }

    #[test]
    fn sjf_picks_shortest_available_first() {
        let out = schedule(
            &[spec(1, 0, 8), spec(2, 0, 3), spec(3, 0, 5)],
            Algorithm::Sjf,
        )
        .unwrap();
        let order: Vec<u32> = out.timeline.slices().iter().map(|s| s.process.0).collect();
        assert_eq!(order, vec![2, 3, 1]);
    }

    #[test]
    fn sjf_ignores_shorter_jobs_that_have_not_arrived() {
        // P2 is shorter but arrives after P1 already started the decision.
        let out = schedule(&[spec(1, 0, 10), spec(2, 1, 1)], Algorithm::Sjf).unwrap();
        let order: Vec<u32> = out.timeline.slices().iter().map(|s| s.process.0).collect();
        assert_eq!(order, vec![1, 2]);
        assert_eq!(out.processes[1].completion, 11);
    }

    #[test]
    fn sjf_idles_one_tick_when_nothing_arrived() {
        let out = schedule(&[spec(1, 3, 2)], Algorithm::Sjf).unwrap();
        assert_eq!(out.timeline.slices()[0].start, 3);
        assert_eq!(out.processes[0].waiting, 0);
    }

    #[test]
    fn round_robin_slices_never_exceed_quantum() {
        let out = schedule(
            &[spec(1, 0, 7), spec(2, 0, 4)],
            Algorithm::RoundRobin { quantum: 3 },
        )
        .unwrap();
        for slice in out.timeline.slices() {
            assert!(slice.duration <= 3);
        }
        assert_eq!(out.timeline.runtime_of(ProcessId(1)), 7);
        assert_eq!(out.timeline.runtime_of(ProcessId(2)), 4);
    }

    #[test]
    fn round_robin_jumps_clock_over_idle_gap() {
        // Sole process arrives at tick 10; time must advance to it.
        let out = schedule(&[spec(1, 10, 2)], Algorithm::RoundRobin { quantum: 2 }).unwrap();
        assert_eq!(out.timeline.slices()[0].start, 10);
        assert_eq!(out.processes[0].completion, 12);
        assert_eq!(out.processes[0].waiting, 0);
    }

    #[test]
    fn round_robin_runs_a_late_arrival_after_early_ones() {
        let out = schedule(
            &[spec(1, 0, 4), spec(2, 6, 2)],
            Algorithm::RoundRobin { quantum: 2 },
        )
        .unwrap();
        // P1 runs 0..2; P2 hasn't arrived at tick 2, so P1 keeps rotating
        // back in until tick 4, then the clock jumps to P2's arrival.
        assert_eq!(out.timeline.runtime_of(ProcessId(1)), 4);
        assert_eq!(out.processes[1].completion, 8);
    }

    #[test]
    fn waiting_time_is_turnaround_minus_burst() {
        let specs = [spec(1, 0, 5), spec(2, 2, 3), spec(3, 4, 1)];
        for algo in [
            Algorithm::Fcfs,
            Algorithm::Sjf,
            Algorithm::RoundRobin { quantum: 2 },
        ] {
            let out = schedule(&specs, algo).unwrap();
            for report in &out.processes {
                assert_eq!(report.waiting, report.turnaround - report.burst);
                assert_eq!(report.turnaround, report.completion - report.arrival);
            }
            assert!(out.avg_waiting >= 0.0);
        }
    }
}
