//! The fundamental diagrams of traffic flow.
//!
//! Each diagram maps a density in `[0, kj]` to a velocity. All of them give
//! `vf` at zero density, exactly zero at the jam density, and never increase
//! in between, which is what keeps vehicles on a ring road from passing each
//! other.

use crate::error::UnknownDiagram;
use crate::params::DiagramParams;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The number of points used to plot a diagram.
pub const CURVE_SAMPLES: usize = 70;

/// A velocity-density relationship.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DiagramKind {
    /// Constant free-flow speed up to `k0`, then flow falling linearly to zero at `kj`.
    #[default]
    Triangle,
    /// Velocity falling linearly from `vf` to zero at `kj`.
    Greenshields,
    /// A Gaussian decay in velocity, shifted so it reaches zero at `kj`.
    ///
    /// Its flow peaks just below `k0`, at about `vf * k0 * e^(-1/2)` rather
    /// than `q0`. Use [capacity] for the value to label.
    Drake,
}

/// A point on a fundamental diagram.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CurvePoint {
    pub density: f64,
    pub velocity: f64,
    pub flow: f64,
}

impl DiagramKind {
    /// All the diagrams, in the order they are offered to the user.
    pub const ALL: [DiagramKind; 3] = [
        DiagramKind::Triangle,
        DiagramKind::Greenshields,
        DiagramKind::Drake,
    ];

    /// Gets the display name of the diagram.
    pub fn name(&self) -> &'static str {
        match self {
            DiagramKind::Triangle => "Triangle",
            DiagramKind::Greenshields => "Greenshields",
            DiagramKind::Drake => "Drake",
        }
    }
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DiagramKind {
    type Err = UnknownDiagram;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DiagramKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownDiagram(s.trim().to_string()))
    }
}

/// Computes the velocity of traffic at the given density.
///
/// Densities outside `[0, kj]` are clamped, so floating point drift in the
/// integrator can never produce a negative or excessive speed. A NaN density
/// is treated as a jam.
pub fn velocity_at(kind: DiagramKind, params: &DiagramParams, density: f64) -> f64 {
    let k = params.density_domain().clamp(density);
    let DiagramParams { vf, kj, k0, q0, .. } = *params;

    // Hit the end points exactly, whatever rounding the formulas below do.
    if k <= 0.0 {
        return vf;
    }
    if k >= kj {
        return 0.0;
    }

    match kind {
        DiagramKind::Greenshields => vf * (1.0 - k / kj),
        DiagramKind::Triangle => {
            if k <= k0 {
                vf
            } else {
                f64::min(vf, q0 * (kj - k) / ((kj - k0) * k))
            }
        }
        DiagramKind::Drake => {
            let gauss = |k: f64| (-0.5 * (k / k0).powi(2)).exp();
            let floor = gauss(kj);
            vf * (gauss(k) - floor) / (1.0 - floor)
        }
    }
}

/// Computes the flow (density times velocity) at the given density.
pub fn flow_at(kind: DiagramKind, params: &DiagramParams, density: f64) -> f64 {
    let k = params.density_domain().clamp(density);
    k * velocity_at(kind, params, k)
}

/// The density at which the diagram's flow is labelled as peaking.
pub fn critical_density(kind: DiagramKind, params: &DiagramParams) -> f64 {
    match kind {
        DiagramKind::Greenshields => 0.5 * params.kj,
        DiagramKind::Triangle | DiagramKind::Drake => params.k0,
    }
}

/// The flow at the critical density.
pub fn capacity(kind: DiagramKind, params: &DiagramParams) -> f64 {
    flow_at(kind, params, critical_density(kind, params))
}

/// Samples the diagram at `samples` evenly spaced densities from zero to `kj`.
pub fn sample_curve(kind: DiagramKind, params: &DiagramParams, samples: usize) -> Vec<CurvePoint> {
    params
        .density_domain()
        .linspace(samples)
        .map(|density| {
            let velocity = velocity_at(kind, params, density);
            CurvePoint {
                density,
                velocity,
                flow: density * velocity,
            }
        })
        .collect()
}
