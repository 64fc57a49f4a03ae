use crate::diagram::DiagramKind;
use crate::integrator::advance;
use crate::lane::{default_lanes, Lane, DEFAULT_LANE_COUNT};
use crate::params::DiagramParams;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// An immutable snapshot of the simulation.
///
/// Every transition returns a new snapshot. Lanes are shared between
/// snapshots until a tick replaces them, so toggling playback or switching
/// diagrams is cheap.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimulationState {
    /// The active fundamental diagram.
    kind: DiagramKind,
    /// Whether ticks advance the vehicles.
    playing: bool,
    /// The ring roads being simulated.
    lanes: Rc<[Lane]>,
}

/// A control command, as issued by a UI or timer.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Command {
    /// Advance time by the given amount.
    Tick(f64),
    /// Start or pause the simulation.
    SetPlaying(bool),
    /// Flip between playing and paused.
    TogglePlaying,
    /// Switch the active fundamental diagram.
    SetKind(DiagramKind),
}

impl SimulationState {
    /// Creates a paused simulation over the given lanes.
    pub fn new(kind: DiagramKind, lanes: Vec<Lane>) -> Self {
        if lanes.is_empty() {
            log::warn!("simulation created without any lanes");
        }
        Self {
            kind,
            playing: false,
            lanes: lanes.into(),
        }
    }

    /// Creates a paused simulation with the default lane layout.
    pub fn with_default_lanes(kind: DiagramKind, params: &DiagramParams) -> Self {
        Self::new(kind, default_lanes(params, DEFAULT_LANE_COUNT))
    }

    /// Gets the active fundamental diagram.
    pub fn kind(&self) -> DiagramKind {
        self.kind
    }

    /// Whether the simulation is playing.
    pub fn playing(&self) -> bool {
        self.playing
    }

    /// Gets the lanes.
    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    /// Returns true if both snapshots hold the very same lanes.
    pub(crate) fn shares_lanes(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.lanes, &other.lanes)
    }

    /// Returns a snapshot with playback started or paused.
    pub fn set_playing(&self, playing: bool) -> Self {
        log::debug!("playing: {} -> {}", self.playing, playing);
        Self {
            playing,
            ..self.clone()
        }
    }

    /// Returns a snapshot using a different fundamental diagram.
    /// Vehicles stay where they are.
    pub fn set_kind(&self, kind: DiagramKind) -> Self {
        log::debug!("fundamental diagram: {} -> {}", self.kind, kind);
        Self {
            kind,
            ..self.clone()
        }
    }

    /// Returns a snapshot advanced by `dt`.
    ///
    /// Nothing changes while paused, or if `dt` is zero, negative or NaN.
    pub fn tick(&self, params: &DiagramParams, dt: f64) -> Self {
        if !self.playing || self.lanes.is_empty() {
            return self.clone();
        }
        if !(dt > 0.0) {
            if dt != 0.0 {
                log::warn!("ignoring tick with invalid time step {dt}");
            }
            return self.clone();
        }
        Self {
            lanes: advance(&self.lanes, self.kind, params, dt).into(),
            ..self.clone()
        }
    }

    /// Applies a command, returning the resulting snapshot.
    pub fn apply(&self, params: &DiagramParams, command: Command) -> Self {
        match command {
            Command::Tick(dt) => self.tick(params, dt),
            Command::SetPlaying(playing) => self.set_playing(playing),
            Command::TogglePlaying => self.set_playing(!self.playing),
            Command::SetKind(kind) => self.set_kind(kind),
        }
    }

    /// Serializes the snapshot for a renderer.
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!(self)
    }
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::with_default_lanes(DiagramKind::default(), &DiagramParams::DEFAULT)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const PARAMS: DiagramParams = DiagramParams::DEFAULT;

    fn playing() -> SimulationState {
        SimulationState::default().set_playing(true)
    }

    #[test]
    fn default_state() {
        let state = SimulationState::default();
        assert_eq!(state.kind(), DiagramKind::Triangle);
        assert!(!state.playing());
        assert_eq!(state.lanes().len(), DEFAULT_LANE_COUNT);
    }

    #[test]
    fn zero_tick_is_identity() {
        let state = playing();
        assert_eq!(state.tick(&PARAMS, 0.0), state);
    }

    #[test]
    fn invalid_ticks_are_ignored() {
        let state = playing();
        assert_eq!(state.tick(&PARAMS, -0.01), state);
        assert_eq!(state.tick(&PARAMS, f64::NAN), state);
    }

    #[test]
    fn paused_state_does_not_move() {
        let state = SimulationState::default();
        let mut next = state.clone();
        for _ in 0..50 {
            next = next.tick(&PARAMS, 0.05);
        }
        assert_eq!(next.lanes(), state.lanes());
    }

    #[test]
    fn tick_moves_free_flowing_lanes() {
        let state = playing();
        let next = state.tick(&PARAMS, 0.05);
        assert_ne!(next.lanes()[0], state.lanes()[0]);
        assert_eq!(next.kind(), state.kind());
        assert!(next.playing());
    }

    #[test]
    fn set_playing_only_changes_flag() {
        let state = SimulationState::default();
        let next = state.set_playing(true);
        assert!(next.playing());
        assert_eq!(next.kind(), state.kind());
        assert!(next.shares_lanes(&state));
    }

    #[test]
    fn set_kind_keeps_vehicles() {
        let state = playing().tick(&PARAMS, 0.05);
        let next = state.set_kind(DiagramKind::Drake);
        assert_eq!(next.kind(), DiagramKind::Drake);
        assert_eq!(next.lanes(), state.lanes());
        assert!(next.playing());
    }

    #[test]
    fn empty_lane_set_ticks_harmlessly() {
        let state = SimulationState::new(DiagramKind::Greenshields, vec![]).set_playing(true);
        assert_eq!(state.tick(&PARAMS, 0.05), state);
    }

    #[test]
    fn commands_dispatch() {
        let state = SimulationState::default();
        let state = state.apply(&PARAMS, Command::TogglePlaying);
        assert!(state.playing());
        let state = state.apply(&PARAMS, Command::SetKind(DiagramKind::Greenshields));
        assert_eq!(state.kind(), DiagramKind::Greenshields);
        let moved = state.apply(&PARAMS, Command::Tick(0.02));
        assert_eq!(moved, state.tick(&PARAMS, 0.02));
        let paused = moved.apply(&PARAMS, Command::SetPlaying(false));
        assert!(!paused.playing());
        assert_eq!(paused.apply(&PARAMS, Command::Tick(0.02)), paused);
    }
}
