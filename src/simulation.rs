use crate::error::{ConfigError, Result};
use crate::params::DiagramParams;
use crate::state::{Command, SimulationState};
use crate::DiagramKind;
use std::time::Duration;

/// The default number of milliseconds of wall time per unit of simulation time.
pub const DEFAULT_TIME_SCALE_MS: f64 = 1000.0;

/// The default upper bound on a single time step.
/// Larger steps let fast vehicles jump past slow ones.
pub const DEFAULT_MAX_DT: f64 = 0.05;

/// Converts elapsed wall time between frames into a bounded time step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameClock {
    /// Wall time in ms per unit of simulation time.
    time_scale_ms: f64,
    /// The largest time step ever produced.
    max_dt: f64,
}

impl FrameClock {
    /// Creates a frame clock.
    pub fn new(time_scale_ms: f64, max_dt: f64) -> Result<Self> {
        for (name, value) in [("time_scale_ms", time_scale_ms), ("max_dt", max_dt)] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        Ok(Self {
            time_scale_ms,
            max_dt,
        })
    }

    /// Gets the upper bound on time steps.
    pub fn max_dt(&self) -> f64 {
        self.max_dt
    }

    /// Computes the time step for a frame that took `elapsed` wall time.
    pub fn dt(&self, elapsed: Duration) -> f64 {
        let ms = elapsed.as_secs_f64() * 1000.0;
        f64::min(ms / self.time_scale_ms, self.max_dt)
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            time_scale_ms: DEFAULT_TIME_SCALE_MS,
            max_dt: DEFAULT_MAX_DT,
        }
    }
}

/// A ring road traffic simulation.
///
/// Owns the parameters and the current snapshot, and turns frame timings and
/// control commands into new snapshots.
#[derive(Clone, Debug)]
pub struct Simulation {
    /// The fundamental diagram constants.
    params: DiagramParams,
    /// Converts frame timings into time steps.
    clock: FrameClock,
    /// The current snapshot.
    state: SimulationState,
    /// The number of ticks applied while playing.
    frame: usize,
}

impl Simulation {
    /// Creates a paused simulation with the default lane layout.
    pub fn new(params: DiagramParams) -> Result<Self> {
        params.validate()?;
        let state = SimulationState::with_default_lanes(DiagramKind::default(), &params);
        Ok(Self::from_parts(params, state))
    }

    /// Creates a simulation from an explicitly seeded snapshot.
    pub fn with_state(params: DiagramParams, state: SimulationState) -> Result<Self> {
        params.validate()?;
        Ok(Self::from_parts(params, state))
    }

    fn from_parts(params: DiagramParams, state: SimulationState) -> Self {
        log::debug!(
            "simulation: {} lanes, {} vehicles, loop length {}",
            state.lanes().len(),
            state.lanes().iter().map(|lane| lane.len()).sum::<usize>(),
            params.total
        );
        Self {
            params,
            clock: FrameClock::default(),
            state,
            frame: 0,
        }
    }

    /// Replaces the frame clock.
    pub fn set_clock(&mut self, clock: FrameClock) {
        self.clock = clock;
    }

    /// Gets the fundamental diagram constants.
    pub fn params(&self) -> &DiagramParams {
        &self.params
    }

    /// Gets the current snapshot.
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Gets the number of ticks applied while playing, whether or not any
    /// vehicle moved. Ignored ticks (paused, or a non-positive `dt`) are not counted.
    pub fn frame_count(&self) -> usize {
        self.frame
    }

    /// Applies a command to the current snapshot and returns the new one.
    pub fn dispatch(&mut self, command: Command) -> &SimulationState {
        let next = self.state.apply(&self.params, command);
        if !next.shares_lanes(&self.state) {
            self.frame += 1;
        }
        self.state = next;
        &self.state
    }

    /// Handles an animation frame that took `elapsed` wall time.
    /// Paused simulations ignore frames.
    pub fn frame(&mut self, elapsed: Duration) -> &SimulationState {
        if !self.state.playing() {
            return &self.state;
        }
        let dt = self.clock.dt(elapsed);
        self.dispatch(Command::Tick(dt))
    }

    /// Advances the simulation by `dt`, if it is playing.
    pub fn step(&mut self, dt: f64) -> &SimulationState {
        self.dispatch(Command::Tick(dt))
    }

    /// Starts or pauses the simulation.
    pub fn set_playing(&mut self, playing: bool) {
        self.dispatch(Command::SetPlaying(playing));
    }

    /// Switches the active fundamental diagram.
    pub fn set_kind(&mut self, kind: DiagramKind) {
        self.dispatch(Command::SetKind(kind));
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Lane;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn clock_scales_and_clamps() {
        let clock = FrameClock::default();
        assert_approx_eq!(clock.dt(Duration::from_millis(16)), 0.016);
        assert_eq!(clock.dt(Duration::from_millis(500)), DEFAULT_MAX_DT);
        assert_eq!(clock.dt(Duration::ZERO), 0.0);

        let slow = FrameClock::new(100.0, 0.2).unwrap();
        assert_approx_eq!(slow.dt(Duration::from_millis(10)), 0.1);
        assert_eq!(slow.max_dt(), 0.2);
    }

    #[test]
    fn clock_rejects_bad_config() {
        assert!(matches!(
            FrameClock::new(0.0, 0.05),
            Err(ConfigError::NonPositive { name: "time_scale_ms", .. })
        ));
        assert!(FrameClock::new(1000.0, f64::NAN).is_err());
    }

    #[test]
    fn new_validates_params() {
        let params = DiagramParams {
            k0: 0.3,
            ..DiagramParams::DEFAULT
        };
        assert!(Simulation::new(params).is_err());
        assert!(Simulation::new(DiagramParams::DEFAULT).is_ok());
    }

    #[test]
    fn frames_only_count_while_playing() {
        let mut sim = Simulation::new(DiagramParams::DEFAULT).unwrap();
        let start = sim.state().clone();
        sim.frame(Duration::from_millis(16));
        assert_eq!(sim.state(), &start);
        assert_eq!(sim.frame_count(), 0);

        sim.set_playing(true);
        for _ in 0..10 {
            sim.frame(Duration::from_millis(16));
        }
        assert_eq!(sim.frame_count(), 10);
        assert_ne!(sim.state().lanes(), start.lanes());
    }

    #[test]
    fn jammed_ticks_still_count() {
        let params = DiagramParams::DEFAULT;
        let lane = Lane::with_density(params.kj, params.total);
        let state = SimulationState::new(DiagramKind::Triangle, vec![lane]);
        let mut sim = Simulation::with_state(params, state).unwrap();
        let start = sim.state().lanes().to_vec();

        sim.set_playing(true);
        for _ in 0..5 {
            sim.step(0.05);
        }
        sim.step(0.0);
        sim.step(-0.05);

        assert_eq!(sim.frame_count(), 5);
        assert_eq!(sim.state().lanes(), &start[..]);
    }

    #[test]
    fn switching_diagram_keeps_positions() {
        let mut sim = Simulation::new(DiagramParams::DEFAULT).unwrap();
        sim.set_playing(true);
        sim.step(0.05);
        let lanes = sim.state().lanes().to_vec();
        sim.set_kind(DiagramKind::Greenshields);
        assert_eq!(sim.state().kind(), DiagramKind::Greenshields);
        assert_eq!(sim.state().lanes(), &lanes[..]);
    }
}
