use crate::error::{ConfigError, Result};
use crate::util::Interval;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Relative tolerance when checking that `q0 == vf * k0`.
const CAPACITY_TOLERANCE: f64 = 1e-9;

/// The constants shared by every fundamental diagram, and the ring road geometry.
///
/// These are fixed configuration. The renderer reads the same values to draw
/// the reference curves and to label `k0`, `kj`, `q0` and `vf`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DiagramParams {
    /// Free-flow speed.
    pub vf: f64,
    /// Jam density, at which the velocity reaches zero.
    pub kj: f64,
    /// Critical density, at which the triangular flow peaks.
    pub k0: f64,
    /// Maximum flow of the triangular diagram.
    pub q0: f64,
    /// Vehicle length, for rendering.
    pub car_length: f64,
    /// Vehicle width, for rendering.
    pub car_width: f64,
    /// Road width, for rendering.
    pub road_width: f64,
    /// The circumference of each ring road.
    pub total: f64,
}

impl DiagramParams {
    pub const DEFAULT: Self = Self {
        vf: 15.0,
        kj: 0.2,
        k0: 0.05,
        q0: 0.75,
        car_length: 4.0,
        car_width: 2.0,
        road_width: 3.0,
        total: 200.0,
    };

    /// Creates parameters with the given speed and densities, deriving `q0`
    /// and keeping the default geometry.
    pub fn new(vf: f64, kj: f64, k0: f64) -> Result<Self> {
        let params = Self {
            vf,
            kj,
            k0,
            q0: vf * k0,
            ..Self::DEFAULT
        };
        params.validate()?;
        Ok(params)
    }

    /// Returns a copy of these parameters with a different loop length.
    pub fn with_total(self, total: f64) -> Result<Self> {
        let params = Self { total, ..self };
        params.validate()?;
        Ok(params)
    }

    /// Checks the invariants `vf > 0`, `0 < k0 < kj`, `q0 = vf * k0`,
    /// and that the geometry is positive.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("vf", self.vf),
            ("kj", self.kj),
            ("k0", self.k0),
            ("q0", self.q0),
            ("car_length", self.car_length),
            ("car_width", self.car_width),
            ("road_width", self.road_width),
            ("total", self.total),
        ];
        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }

        if self.k0 >= self.kj {
            return Err(ConfigError::CriticalDensity {
                k0: self.k0,
                kj: self.kj,
            });
        }

        let expected = self.vf * self.k0;
        if (self.q0 - expected).abs() > CAPACITY_TOLERANCE * expected {
            return Err(ConfigError::InconsistentCapacity {
                q0: self.q0,
                expected,
            });
        }

        Ok(())
    }

    /// The range of densities over which the diagrams are defined, `[0, kj]`.
    pub fn density_domain(&self) -> Interval {
        Interval::new(0.0, self.kj)
    }
}

impl Default for DiagramParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}
