//! Explicit Euler integration of vehicle positions around the ring.

use crate::diagram::DiagramKind;
use crate::lane::Lane;
use crate::params::DiagramParams;

/// Maps a position onto the loop `[0, total)`.
pub fn wrap_position(pos: f64, total: f64) -> f64 {
    let pos = pos.rem_euclid(total);
    // rem_euclid of a tiny negative number can round up to `total`.
    if pos >= total {
        0.0
    } else {
        pos
    }
}

/// Advances every vehicle on every lane by `dt`.
///
/// Velocities are all taken from the lanes as they are before the step, so the
/// order in which vehicles are visited has no effect. The caller must keep `dt`
/// non-negative and small (around 0.05 for the default parameters); a large
/// step can carry a vehicle past the one ahead of it, and ordering is not
/// repaired here.
pub fn advance(lanes: &[Lane], kind: DiagramKind, params: &DiagramParams, dt: f64) -> Vec<Lane> {
    lanes
        .iter()
        .map(|lane| advance_lane(lane, kind, params, dt))
        .collect()
}

fn advance_lane(lane: &Lane, kind: DiagramKind, params: &DiagramParams, dt: f64) -> Lane {
    let positions = lane
        .positions()
        .iter()
        .zip(lane.velocities(kind, params))
        .map(|(pos, vel)| wrap_position(pos + vel * dt, params.total))
        .collect();
    lane.with_positions(positions)
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn wrap() {
        assert_eq!(wrap_position(10.0, 200.0), 10.0);
        assert_approx_eq!(wrap_position(200.04, 200.0), 0.04);
        assert_eq!(wrap_position(200.0, 200.0), 0.0);
        assert_approx_eq!(wrap_position(-1.0, 200.0), 199.0);
        assert_eq!(wrap_position(-1e-20, 200.0), 0.0);
    }

    #[test]
    fn vehicle_crosses_end_of_loop() {
        // A lone vehicle is always in free flow.
        let params = DiagramParams::new(5.0, 0.2, 0.05).unwrap();
        let lane = Lane::new(0.0, [params.total - 0.01], params.total);
        let lanes = advance(&[lane], DiagramKind::Triangle, &params, 0.01);
        let pos = lanes[0].positions()[0];
        assert_approx_eq!(pos, 0.04);
        assert!(pos < params.total);
    }

    #[test]
    fn zero_step_leaves_positions() {
        let params = DiagramParams::DEFAULT;
        let lanes = vec![Lane::with_density(0.07, params.total)];
        let next = advance(&lanes, DiagramKind::Drake, &params, 0.0);
        assert_eq!(next, lanes);
    }

    #[test]
    fn jammed_lane_does_not_move() {
        let params = DiagramParams::DEFAULT;
        let lanes = vec![Lane::with_density(params.kj, params.total)];
        for kind in DiagramKind::ALL {
            let next = advance(&lanes, kind, &params, 0.05);
            assert_eq!(next, lanes, "{kind}");
        }
    }

    #[test]
    fn update_ignores_visiting_order() {
        // Vehicle 0 is about to close on vehicle 1. If vehicle 1 moved first,
        // vehicle 0 would see a larger gap and a higher speed.
        let params = DiagramParams::DEFAULT;
        let lane = Lane::new(0.0, [0.0, 6.0, 100.0], params.total);
        let before = lane.velocities(DiagramKind::Greenshields, &params);
        let next = advance(&[lane], DiagramKind::Greenshields, &params, 0.05);
        assert_approx_eq!(next[0].positions()[0], before[0] * 0.05);
        assert_approx_eq!(next[0].positions()[1], 6.0 + before[1] * 0.05);
    }
}
