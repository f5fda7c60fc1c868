//! oslab — Run OS-concepts lab simulations from the command line.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use oslab_sim::{
    allocate, deadlock_score, memory_score, schedule, scheduling_score, Algorithm,
    DeadlockScenario, MemoryScenario, PlacementPolicy, ProcessId, SchedScenario, VictimPolicy,
    DEFAULT_SEED,
};

/// Run OS-concepts lab simulations: CPU scheduling, memory allocation,
/// and deadlock detection.
#[derive(Parser)]
#[command(name = "oslab")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a CPU scheduling simulation.
    Sched {
        #[arg(short, long, value_enum, default_value = "fcfs")]
        algorithm: AlgorithmArg,

        /// Time quantum for round robin (ticks).
        #[arg(short, long, default_value_t = 2)]
        quantum: u64,

        /// JSON scenario file; defaults to the textbook process set.
        #[arg(long, value_name = "PATH")]
        scenario: Option<PathBuf>,

        /// Generate a random scenario instead of the fixed default.
        #[arg(long, conflicts_with = "scenario")]
        random: bool,

        /// PRNG seed for --random.
        #[arg(long, env = "OSLAB_SEED", default_value_t = DEFAULT_SEED)]
        seed: u64,

        /// Print the execution timeline to stderr.
        #[arg(long)]
        dump_timeline: bool,
    },
    /// Run a memory allocation pass.
    Memory {
        #[arg(short, long, value_enum, default_value = "first-fit")]
        policy: PolicyArg,

        /// JSON scenario file; defaults to the classroom block layout.
        #[arg(long, value_name = "PATH")]
        scenario: Option<PathBuf>,

        /// Generate a random scenario instead of the fixed default.
        #[arg(long, conflicts_with = "scenario")]
        random: bool,

        /// PRNG seed for --random.
        #[arg(long, env = "OSLAB_SEED", default_value_t = DEFAULT_SEED)]
        seed: u64,
    },
    /// Analyze a resource-allocation graph for deadlock.
    Deadlock {
        /// JSON scenario file; defaults to the three-way circular wait.
        #[arg(long, value_name = "PATH")]
        scenario: Option<PathBuf>,

        /// On deadlock, release this process's resources to break the cycle.
        #[arg(long, value_name = "PID", conflicts_with = "auto_resolve")]
        resolve: Option<u32>,

        /// On deadlock, release the last process on the cycle.
        #[arg(long)]
        auto_resolve: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AlgorithmArg {
    Fcfs,
    Sjf,
    Rr,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    FirstFit,
    BestFit,
    WorstFit,
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    if let Err(e) = run(&cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Command::Sched {
            algorithm,
            quantum,
            scenario,
            random,
            seed,
            dump_timeline,
        } => run_sched(*algorithm, *quantum, scenario.as_deref(), *random, *seed, *dump_timeline),
        Command::Memory {
            policy,
            scenario,
            random,
            seed,
        } => run_memory(*policy, scenario.as_deref(), *random, *seed),
        Command::Deadlock {
            scenario,
            resolve,
            auto_resolve,
        } => run_deadlock(scenario.as_deref(), *resolve, *auto_resolve),
    }
}

fn run_sched(
    algorithm: AlgorithmArg,
    quantum: u64,
    scenario: Option<&Path>,
    random: bool,
    seed: u64,
    dump_timeline: bool,
) -> Result<()> {
    let scenario = match scenario {
        Some(path) => SchedScenario::from_json(&read(path)?)
            .with_context(|| format!("failed to parse {}", path.display()))?,
        None if random => SchedScenario::random(seed),
        None => SchedScenario::textbook(),
    };

    let algorithm = match algorithm {
        AlgorithmArg::Fcfs => Algorithm::Fcfs,
        AlgorithmArg::Sjf => Algorithm::Sjf,
        AlgorithmArg::Rr => Algorithm::RoundRobin { quantum },
    };

    let outcome = schedule(&scenario.processes, algorithm)?;
    if dump_timeline {
        outcome.timeline.dump();
    }

    println!("algorithm:            {algorithm:?}");
    for report in &outcome.processes {
        println!(
            "{}: arrival={} burst={} completion={} turnaround={} waiting={}",
            report.id, report.arrival, report.burst, report.completion, report.turnaround,
            report.waiting
        );
    }
    println!("avg waiting time:     {:.2}", outcome.avg_waiting);
    println!("avg turnaround time:  {:.2}", outcome.avg_turnaround);
    println!("efficiency score:     {}/100", scheduling_score(outcome.avg_waiting));
    Ok(())
}

fn run_memory(policy: PolicyArg, scenario: Option<&Path>, random: bool, seed: u64) -> Result<()> {
    let scenario = match scenario {
        Some(path) => MemoryScenario::from_json(&read(path)?)
            .with_context(|| format!("failed to parse {}", path.display()))?,
        None if random => MemoryScenario::random(seed),
        None => MemoryScenario::classroom(),
    };

    let policy = match policy {
        PolicyArg::FirstFit => PlacementPolicy::FirstFit,
        PolicyArg::BestFit => PlacementPolicy::BestFit,
        PolicyArg::WorstFit => PlacementPolicy::WorstFit,
    };

    let outcome = allocate(&scenario.blocks, &scenario.requests, policy);
    println!("strategy:             {policy:?}");
    for assignment in &outcome.assignments {
        match assignment.block {
            Some(block) => println!(
                "{} -> {} (waste {} MB)",
                assignment.process, block, assignment.waste
            ),
            None => println!("{} -> unallocated (insufficient space)", assignment.process),
        }
    }
    println!(
        "placed:               {}/{}",
        outcome.placed(),
        scenario.requests.len()
    );
    println!("internal frag:        {} MB", outcome.internal_fragmentation);
    println!("free space:           {} MB", outcome.free_space);
    println!(
        "efficiency score:     {}/100",
        memory_score(outcome.internal_fragmentation, scenario.total_memory())
    );
    Ok(())
}

fn run_deadlock(scenario: Option<&Path>, resolve: Option<u32>, auto_resolve: bool) -> Result<()> {
    let scenario = match scenario {
        Some(path) => DeadlockScenario::from_json(&read(path)?)
            .with_context(|| format!("failed to parse {}", path.display()))?,
        None => DeadlockScenario::ring(),
    };

    let mut rag = scenario.build()?;
    match rag.find_cycle() {
        None => {
            println!("no deadlock: system is safe");
            println!("score:                {}/100", deadlock_score(true));
        }
        Some(cycle) => {
            let path: Vec<String> = cycle.iter().map(|n| n.to_string()).collect();
            println!("DEADLOCK: circular wait {}", path.join(" -> "));

            let policy = if auto_resolve {
                Some(VictimPolicy::LastInCycle)
            } else {
                resolve.map(|pid| VictimPolicy::Process(ProcessId(pid)))
            };

            if let Some(policy) = policy {
                let victim = rag
                    .pick_victim(policy)
                    .context("no victim process on the cycle")?;
                rag.resolve(victim)?;
                if rag.detect_cycle() {
                    bail!("releasing {victim} did not break the cycle");
                }
                println!("resolved: released {victim}'s resources");
                println!("score:                {}/100", deadlock_score(false));
            } else {
                println!("rerun with --auto-resolve or --resolve <PID> to break the cycle");
            }
        }
    }
    Ok(())
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
