//! A ring road simulation of the fundamental diagrams of traffic flow.
//!
//! Each lane is a closed loop seeded at its own density. Every vehicle drives
//! at the speed the active [DiagramKind] assigns to the density it sees ahead,
//! so a set of lanes traces out the velocity-density and flow-density curves.

pub use diagram::{
    capacity, critical_density, flow_at, sample_curve, velocity_at, CurvePoint, DiagramKind,
    CURVE_SAMPLES,
};
pub use error::{ConfigError, Result, UnknownDiagram};
pub use integrator::{advance, wrap_position};
pub use lane::{default_lanes, Lane, LaneStats, DEFAULT_LANE_COUNT};
pub use params::DiagramParams;
pub use simulation::{FrameClock, Simulation, DEFAULT_MAX_DT, DEFAULT_TIME_SCALE_MS};
pub use state::{Command, SimulationState};
pub use util::Interval;

mod diagram;
mod error;
mod integrator;
mod lane;
mod params;
mod simulation;
mod state;
mod util;
