use crate::diagram::{velocity_at, DiagramKind};
use crate::error::{ConfigError, Result};
use crate::integrator::wrap_position;
use crate::params::DiagramParams;
use itertools::Itertools;
use rand::Rng;
use rand_distr::{Distribution, Normal};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The number of lanes in the default layout.
pub const DEFAULT_LANE_COUNT: usize = 9;

/// The furthest a jittered vehicle may stray from its even slot,
/// as a fraction of the even spacing.
const MAX_JITTER: f64 = 0.45;

/// A ring road carrying a fixed set of vehicles.
///
/// Vehicle `i + 1` (modulo the vehicle count) is always the vehicle directly
/// ahead of vehicle `i`. Vehicles keep their index when they wrap around the
/// loop, so the stored positions are a rotation of a sorted sequence.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Lane {
    /// Lateral placement of the lane, in density units.
    offset: f64,
    /// The positions of the vehicles around the loop.
    positions: Vec<f64>,
}

/// Aggregate measurements of a lane, comparable with a fundamental diagram.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LaneStats {
    /// Vehicles per unit length.
    pub density: f64,
    /// Mean vehicle velocity.
    pub velocity: f64,
    /// Density times mean velocity.
    pub flow: f64,
}

impl Lane {
    /// Creates a lane from explicit vehicle positions, which are wrapped onto
    /// the loop and sorted.
    pub fn new(offset: f64, positions: impl IntoIterator<Item = f64>, total: f64) -> Self {
        let positions = positions
            .into_iter()
            .map(|pos| wrap_position(pos, total))
            .sorted_by(f64::total_cmp)
            .collect();
        Self { offset, positions }
    }

    /// Creates a lane of `count` evenly spaced vehicles, the first at zero.
    pub fn uniform(offset: f64, count: usize, total: f64) -> Self {
        let spacing = total / count.max(1) as f64;
        let positions = (0..count).map(|i| i as f64 * spacing).collect();
        Self { offset, positions }
    }

    /// Creates an evenly spaced lane as close as possible to the given density.
    /// The lane's offset is the density actually achieved.
    pub fn with_density(density: f64, total: f64) -> Self {
        let count = (density.max(0.0) * total).round() as usize;
        Self::uniform(count as f64 / total, count, total)
    }

    /// Creates a lane of `count` vehicles, each displaced from its even slot by
    /// a normally distributed amount.
    ///
    /// # Parameters
    /// * `stddev` - The standard deviation of the displacement, as a fraction of the even spacing.
    pub fn jittered<R: Rng + ?Sized>(
        offset: f64,
        count: usize,
        total: f64,
        stddev: f64,
        rng: &mut R,
    ) -> Result<Self> {
        if !(stddev >= 0.0 && stddev.is_finite()) {
            return Err(ConfigError::InvalidJitter(stddev));
        }
        let distr = Normal::new(0.0, stddev).map_err(|_| ConfigError::InvalidJitter(stddev))?;
        let spacing = total / count.max(1) as f64;
        let positions = (0..count).map(|i| {
            let shift = distr.sample(&mut *rng).clamp(-MAX_JITTER, MAX_JITTER);
            (i as f64 + shift) * spacing
        });
        Ok(Self::new(offset, positions, total))
    }

    /// Gets the lateral offset of the lane.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Gets the positions of the vehicles, in loop order.
    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    /// The number of vehicles on the lane.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns true if there are no vehicles on the lane.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Returns a lane with the same offset and vehicle order but new positions.
    pub(crate) fn with_positions(&self, positions: Vec<f64>) -> Self {
        debug_assert_eq!(positions.len(), self.positions.len());
        Self {
            offset: self.offset,
            positions,
        }
    }

    /// Computes the distance from a vehicle to the one ahead of it.
    /// A lone vehicle is a whole loop behind itself.
    ///
    /// # Panics
    /// If `idx` is not the index of a vehicle on the lane.
    pub fn spacing_ahead(&self, idx: usize, total: f64) -> f64 {
        let count = self.positions.len();
        let pos = self.positions[idx];
        if count == 1 {
            return total;
        }
        let next = self.positions[(idx + 1) % count];
        (next - pos).rem_euclid(total)
    }

    /// Computes the density seen by a vehicle: one vehicle per spacing.
    ///
    /// # Panics
    /// If `idx` is not the index of a vehicle on the lane.
    pub fn local_density(&self, idx: usize, total: f64) -> f64 {
        1.0 / self.spacing_ahead(idx, total)
    }

    /// Computes the velocity of every vehicle on the lane.
    pub fn velocities(&self, kind: DiagramKind, params: &DiagramParams) -> Vec<f64> {
        (0..self.len())
            .map(|idx| velocity_at(kind, params, self.local_density(idx, params.total)))
            .collect()
    }

    /// Measures the lane's density, mean velocity and flow.
    pub fn measure(&self, kind: DiagramKind, params: &DiagramParams) -> LaneStats {
        let density = self.len() as f64 / params.total;
        let velocity = if self.is_empty() {
            0.0
        } else {
            self.velocities(kind, params).iter().sum::<f64>() / self.len() as f64
        };
        LaneStats {
            density,
            velocity,
            flow: density * velocity,
        }
    }

    /// Returns true if no vehicle has passed the one ahead of it, i.e. the
    /// positions read cyclically step back past zero exactly once.
    pub fn is_cyclically_ordered(&self) -> bool {
        if self.len() < 2 {
            return true;
        }
        let mut turns = 0;
        let mut prev = self.positions[self.len() - 1];
        for &pos in &self.positions {
            if pos < prev {
                turns += 1;
            }
            prev = pos;
        }
        // Coincident vehicles everywhere count as ordered too.
        turns == 1 || (turns == 0 && self.positions.iter().all_equal())
    }
}

/// Lays out `count` evenly spaced lanes, with densities rising in equal
/// steps up to the jam density.
pub fn default_lanes(params: &DiagramParams, count: usize) -> Vec<Lane> {
    (1..=count)
        .map(|i| Lane::with_density(params.kj * i as f64 / count as f64, params.total))
        .collect()
}
