//! campus: run a campus_mobility scenario on a synthetic walkway grid.
//!
//! Students commute in, sit classes, drift off to smoke breaks and meet up
//! in groups at social tables, all on a jittered lattice of campus paths.
//!
//! ```text
//! cargo run --release -p campus -- --out output/campus.csv
//! RUST_LOG=debug cargo run -p campus -- --days 1
//! ```

mod network;

use std::collections::BTreeMap;
use std::fs::File;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cm_activity::ActivityKind;
use cm_core::{AgentId, Coord, SimRng, Tick};
use cm_day::DayState;
use cm_sim::{AgentStep, CsvSnapshotObserver, Mover, ScenarioConfig, SimBuilder, SimObserver};

use network::{CampusLayout, build_campus};

// ── Constants ─────────────────────────────────────────────────────────────────

const DEFAULT_SCENARIO: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/campus.toml");
const SECS_PER_DAY:     u64  = 86_400;
/// Offset of the network stream from the master seed.
const NETWORK_STREAM:   u64  = 0xCA_4905;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(version, about = "Campus mobility on a synthetic walkway grid")]
struct Args {
    /// Scenario TOML.
    #[arg(long, default_value = DEFAULT_SCENARIO)]
    scenario: PathBuf,

    /// Write position snapshots here as CSV.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Override the scenario's master seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Override the run length, in simulated days.
    #[arg(long)]
    days: Option<u64>,

    /// Campus lattice columns.
    #[arg(long, default_value_t = 12)]
    cols: usize,

    /// Campus lattice rows.
    #[arg(long, default_value_t = 8)]
    rows: usize,

    /// Distance between neighbouring junctions, in metres.
    #[arg(long, default_value_t = 60.0)]
    spacing: f64,
}

// ── Observer wrapper ─────────────────────────────────────────────────────────

/// Counts arrivals per activity and forwards everything to the CSV writer.
struct TallyObserver {
    csv:        Option<CsvSnapshotObserver<File>>,
    last_state: Vec<Option<DayState>>,
    arrivals:   BTreeMap<ActivityKind, u64>,
    stuck:      u64,
    snapshots:  u64,
}

impl TallyObserver {
    fn new(csv: Option<CsvSnapshotObserver<File>>, agents: usize) -> Self {
        Self { csv, last_state: vec![None; agents], arrivals: BTreeMap::new(), stuck: 0, snapshots: 0 }
    }
}

impl SimObserver for TallyObserver {
    fn on_step(&mut self, tick: Tick, step: &AgentStep) {
        let Some(state) = step.state else { return };
        let last = &mut self.last_state[step.agent.index()];
        if let DayState::In(kind) = state {
            if *last != Some(state) {
                *self.arrivals.entry(kind).or_default() += 1;
            }
        }
        *last = Some(state);
        if let Some(csv) = &mut self.csv {
            csv.on_step(tick, step);
        }
    }

    fn on_stuck(&mut self, tick: Tick, agent: AgentId, at: Coord) {
        self.stuck += 1;
        if let Some(csv) = &mut self.csv {
            csv.on_stuck(tick, agent, at);
        }
    }

    fn on_snapshot(&mut self, tick: Tick, positions: &[Coord]) {
        self.snapshots += 1;
        if let Some(csv) = &mut self.csv {
            csv.on_snapshot(tick, positions);
        }
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        if let Some(csv) = &mut self.csv {
            csv.on_sim_end(final_tick);
        }
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    let args = Args::parse();

    // 1. Scenario, with command-line overrides.
    let mut scenario = ScenarioConfig::from_file(&args.scenario)
        .with_context(|| format!("loading scenario {}", args.scenario.display()))?;
    if let Some(seed) = args.seed {
        scenario.sim.seed = seed;
    }
    if let Some(days) = args.days {
        let ticks_per_day = SECS_PER_DAY / u64::from(scenario.sim.tick_duration_secs.max(1));
        scenario.sim.total_ticks = days * ticks_per_day;
    }

    // 2. Campus network.
    let layout = CampusLayout { cols: args.cols, rows: args.rows, spacing_m: args.spacing, ..Default::default() };
    let mut rng = SimRng::new(scenario.sim.seed).child(NETWORK_STREAM);
    let map = build_campus(layout, &mut rng);
    info!(nodes = map.node_count(), edges = map.edge_count(), "campus network built");

    // 3. Sim.
    let mut sim = SimBuilder::new(scenario, map).build().context("building simulation")?;

    // 4. Output.
    let csv = match &args.out {
        Some(path) => {
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
            }
            Some(CsvSnapshotObserver::create(path)?)
        }
        None => None,
    };
    let mut obs = TallyObserver::new(csv, sim.agent_count());

    // 5. Run.
    let t0 = Instant::now();
    sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.csv.as_mut().and_then(CsvSnapshotObserver::take_error) {
        warn!(error = %e, "snapshot output incomplete");
    }

    // 6. Summary.
    println!();
    println!("Simulation complete in {:.3} s ({})", elapsed.as_secs_f64(), sim.clock);
    println!("  agents     : {}", sim.agent_count());
    println!("  steps      : {}", sim.summary.steps);
    println!("  walked     : {:.1} km", sim.summary.distance_m / 1_000.0);
    println!("  stuck      : {}", obs.stuck);
    println!("  snapshots  : {}", obs.snapshots);
    println!();

    println!("{:<14} {:>10} {:>10}", "Activity", "Arrivals", "Current");
    println!("{}", "-".repeat(36));
    let mut now_in: BTreeMap<ActivityKind, usize> = BTreeMap::new();
    for mover in &sim.movers {
        let Mover::Day(orch) = mover else { continue };
        if let DayState::In(kind) | DayState::To(kind) = orch.state() {
            *now_in.entry(kind).or_default() += 1;
        }
    }
    for kind in ActivityKind::ALL {
        println!(
            "{:<14} {:>10} {:>10}",
            kind.to_string(),
            obs.arrivals.get(&kind).copied().unwrap_or(0),
            now_in.get(&kind).copied().unwrap_or(0),
        );
    }

    Ok(())
}
