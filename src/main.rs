use std::time::Duration;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use ringroad::{
    default_lanes, velocity_at, DiagramKind, DiagramParams, Lane, Simulation, SimulationState,
    DEFAULT_LANE_COUNT,
};

#[derive(Parser)]
#[command(name = "ringroad")]
#[command(about = "Drives vehicles around ring roads under a fundamental diagram")]
struct Cli {
    /// The fundamental diagram: triangle, greenshields or drake
    #[arg(long, default_value = "triangle")]
    diagram: DiagramKind,

    /// Number of animation frames to simulate
    #[arg(long, default_value = "600")]
    frames: u32,

    /// Wall time per frame in milliseconds
    #[arg(long, default_value = "16")]
    frame_ms: u64,

    /// Number of lanes, with densities spread up to the jam density
    #[arg(long, default_value_t = DEFAULT_LANE_COUNT)]
    lanes: usize,

    /// Standard deviation of the initial displacement from even spacing,
    /// as a fraction of the spacing
    #[arg(long, default_value = "0")]
    jitter: f64,

    /// Seed for the initial displacements
    #[arg(long, default_value = "0")]
    seed: u64,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(err) = run(&cli) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> ringroad::Result<()> {
    let params = DiagramParams::DEFAULT;
    let lanes = seed_lanes(&params, cli)?;
    let mut sim = Simulation::with_state(params, SimulationState::new(cli.diagram, lanes))?;
    sim.set_playing(true);

    println!(
        "Simulating {} frames of {} ms under the {} diagram...",
        cli.frames, cli.frame_ms, cli.diagram
    );
    let frame = Duration::from_millis(cli.frame_ms);
    for _ in 0..cli.frames {
        sim.frame(frame);
    }
    log::info!("{} ticks advanced the vehicles", sim.frame_count());

    let state = sim.state();
    let domain = params.density_domain();
    println!(" density  occupancy  velocity  expected      flow  ordered");
    for lane in state.lanes() {
        let stats = lane.measure(state.kind(), &params);
        println!(
            "{:8.4} {:9.1}% {:9.3} {:9.3} {:9.4}  {}",
            stats.density,
            100.0 * domain.inv_lerp(stats.density),
            stats.velocity,
            velocity_at(state.kind(), &params, stats.density),
            stats.flow,
            lane.is_cyclically_ordered(),
        );
    }
    Ok(())
}

fn seed_lanes(params: &DiagramParams, cli: &Cli) -> ringroad::Result<Vec<Lane>> {
    let even = default_lanes(params, cli.lanes);
    if cli.jitter <= 0.0 {
        return Ok(even);
    }
    let mut rng = StdRng::seed_from_u64(cli.seed);
    even.iter()
        .map(|lane| Lane::jittered(lane.offset(), lane.len(), params.total, cli.jitter, &mut rng))
        .collect()
}
