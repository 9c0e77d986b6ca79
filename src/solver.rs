//! Trajectory solver for the driven, damped Duffing oscillator.
//!
//! A solve builds a uniform time grid with `dt_per_period` samples per
//! driving period, integrates the model over it with RK4, and drops the
//! transient. The returned `Solution` keeps time and state index-aligned and
//! knows the stride that samples it once per driving period.

use std::mem;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use crate::error::{DuffingError, Result};
use crate::integrate::integrate_on_grid;
use crate::model::{energy, DuffingParams};

/// Everything one solve needs.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolveParams {
    /// total simulated time
    pub tmax:           f64,
    /// grid samples per driving period
    pub dt_per_period:  usize,
    /// leading time span to discard
    pub t_trans:        f64,
    pub x0:             f64,
    pub v0:             f64,
    pub drive:          DuffingParams,
    /// RK4 steps per grid interval
    #[serde(default = "default_substeps")]
    pub substeps:       usize
}

fn default_substeps() -> usize {
    1
}

/// Largest grid a single solve may allocate states for.
pub const MAX_GRID_LEN: usize = isize::MAX as usize / mem::size_of::<Vector2<f64>>();

impl SolveParams {
    pub fn new(tmax: f64, dt_per_period: usize, t_trans: f64, x0: f64, v0: f64, drive: DuffingParams) -> SolveParams {
        SolveParams {
            tmax:           tmax,
            dt_per_period:  dt_per_period,
            t_trans:        t_trans,
            x0:             x0,
            v0:             v0,
            drive:          drive,
            substeps:       default_substeps()
        }
    }

    pub fn with_substeps(mut self, substeps: usize) -> SolveParams {
        self.substeps = substeps;
        self
    }

    pub fn with_drive(mut self, drive: DuffingParams) -> SolveParams {
        self.drive = drive;
        self
    }

    /// Grid spacing, one driving period divided into `dt_per_period` samples.
    pub fn dt(&self) -> f64 {
        self.drive.period() / self.dt_per_period as f64
    }

    /// Reject anything that would turn into an arithmetic fault or an empty
    /// trajectory later on.
    pub fn validate(&self) -> Result<()> {
        let invalid = |name, value, reason| Err(DuffingError::InvalidParameter { name, value, reason });
        let p = &self.drive;

        if !p.omega.is_finite() || p.omega <= 0.0 {
            return invalid("omega", p.omega, "driving frequency must be finite and > 0");
        }
        if self.dt_per_period < 2 {
            return invalid("dt_per_period", self.dt_per_period as f64, "need at least 2 samples per period");
        }
        if !self.tmax.is_finite() || self.tmax <= 0.0 {
            return invalid("tmax", self.tmax, "must be finite and > 0");
        }
        let len = (self.tmax / self.dt()).ceil();
        if !len.is_finite() || len > MAX_GRID_LEN as f64 {
            return invalid("tmax", self.tmax, "time grid too large");
        }
        if !self.t_trans.is_finite() || self.t_trans < 0.0 {
            return invalid("t_trans", self.t_trans, "must be finite and >= 0");
        }
        if self.t_trans >= self.tmax {
            return invalid("t_trans", self.t_trans, "transient must end before tmax");
        }
        if self.substeps == 0 {
            return invalid("substeps", 0.0, "must be >= 1");
        }
        for &(name, value) in &[("x0", self.x0), ("v0", self.v0), ("gamma", p.gamma), ("delta", p.delta)] {
            if !value.is_finite() {
                return invalid(name, value, "must be finite");
            }
        }

        if p.gamma < 0.0 {
            log::warn!("negative driving amplitude gamma = {}", p.gamma);
        }
        if p.delta < 0.0 {
            log::warn!("negative damping delta = {}, the oscillator will gain energy", p.delta);
        }
        Ok(())
    }
}

/// The steady-state part of a trajectory.
#[derive(Clone, Debug)]
pub struct Solution {
    /// sample times, all `>= t_trans`
    pub t:              Vec<f64>,
    /// `(x, ẋ)` at each time in `t`
    pub states:         Vec<Vector2<f64>>,
    pub dt:             f64,
    /// grid points per driving period
    pub poincare_step:  usize
}

impl Solution {
    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    pub fn positions(&self) -> Vec<f64> {
        self.states.iter().map(|s| s.x).collect()
    }

    pub fn velocities(&self) -> Vec<f64> {
        self.states.iter().map(|s| s.y).collect()
    }

    pub fn energies(&self) -> Vec<f64> {
        self.states.iter().map(|&s| energy(s)).collect()
    }

    /// One state per driving period, starting with the first retained sample.
    pub fn poincare_section(&self) -> Vec<Vector2<f64>> {
        self.states.iter().step_by(self.poincare_step).cloned().collect()
    }

    /// Times belonging to `poincare_section`.
    pub fn poincare_times(&self) -> Vec<f64> {
        self.t.iter().step_by(self.poincare_step).cloned().collect()
    }

    /// `(min, max)` corners over all states, or `None` for an empty solution.
    pub fn bounds(&self) -> Option<(Vector2<f64>, Vector2<f64>)> {
        let mut states = self.states.iter();
        let first = *states.next()?;
        Some(states.fold((first, first), |(lo, hi), s| (lo.inf(s), hi.sup(s))))
    }
}

/// Uniform grid `i·dt` on `[0, tmax)`.
pub fn time_grid(tmax: f64, dt: f64) -> Vec<f64> {
    let n = (tmax / dt).ceil() as usize;
    (0 .. n).map(|i| i as f64 * dt).collect()
}

/// Index of the first grid time at or after `t_trans`.
pub fn transient_cutoff(t: &[f64], t_trans: f64) -> usize {
    t.partition_point(|&ti| ti < t_trans)
}

/// Integrate the oscillator over the whole grid and drop the transient.
pub fn solve(params: &SolveParams) -> Result<Solution> {
    params.validate()?;

    let dt = params.dt();
    let poincare_step = params.dt_per_period;
    let t = time_grid(params.tmax, dt);

    let idx = transient_cutoff(&t, params.t_trans);
    if idx >= t.len() {
        return Err(DuffingError::InvalidParameter {
            name: "t_trans",
            value: params.t_trans,
            reason: "no grid point left after the transient"
        });
    }
    log::debug!(
        "solving {:?}: {} grid points, dt = {:.6}, dropping {} transient points",
        params.drive, t.len(), dt, idx
    );

    let states = integrate_on_grid(
        params.drive.vector_field(),
        Vector2::new(params.x0, params.v0),
        dt,
        t.len(),
        params.substeps
    )?;

    Ok(Solution {
        t:              t[idx ..].to_vec(),
        states:         states[idx ..].to_vec(),
        dt:             dt,
        poincare_step:  poincare_step
    })
}

/// Positional form of `solve` with a single RK4 step per grid interval.
pub fn solve_duffing(
    tmax: f64, dt_per_period: usize, t_trans: f64,
    x0: f64, v0: f64,
    gamma: f64, delta: f64, omega: f64
) -> Result<Solution> {
    solve(&SolveParams::new(tmax, dt_per_period, t_trans, x0, v0, DuffingParams::new(gamma, delta, omega)))
}

#[test]
fn test_time_grid_half_open() {
    let t = time_grid(1.0, 0.25);
    assert_eq!(t, vec![0.0, 0.25, 0.5, 0.75]);

    let t = time_grid(1.1, 0.25);
    assert_eq!(t.len(), 5);
    assert_eq!(t[4], 1.0);
}

#[test]
fn test_transient_cutoff() {
    let t = time_grid(10.0, 1.0);
    assert_eq!(transient_cutoff(&t, 0.0), 0);
    assert_eq!(transient_cutoff(&t, 3.0), 3);
    assert_eq!(transient_cutoff(&t, 3.5), 4);
    assert_eq!(transient_cutoff(&t, 9.5), 10);
}

#[test]
fn test_rejects_transient_past_last_sample() {
    // grid is 0, 3, 6, 9 for tmax = 10; nothing is left after 9.5
    let p = SolveParams::new(10.0, 2, 9.5, 0.0, 0.0, DuffingParams::new(0.0, 0.0, std::f64::consts::PI / 3.0));
    assert!((p.dt() - 3.0).abs() < 1e-12);
    match solve(&p) {
        Err(DuffingError::InvalidParameter { name: "t_trans", .. }) => (),
        other => panic!("unexpected {:?}", other)
    }
}

#[test]
fn test_rejects_oversized_grid() {
    let p = SolveParams::new(1e22, 100, 0.0, 0.0, 0.0, DuffingParams::default());
    match p.validate() {
        Err(DuffingError::InvalidParameter { name: "tmax", reason, .. }) => assert_eq!(reason, "time grid too large"),
        other => panic!("unexpected {:?}", other)
    }
}

#[test]
fn test_bounds() {
    let s = Solution {
        t:              vec![0.0, 1.0, 2.0],
        states:         vec![Vector2::new(0.5, -1.0), Vector2::new(-2.0, 3.0), Vector2::new(1.0, 0.0)],
        dt:             1.0,
        poincare_step:  2
    };
    let (lo, hi) = s.bounds().unwrap();
    assert_eq!(lo, Vector2::new(-2.0, -1.0));
    assert_eq!(hi, Vector2::new(1.0, 3.0));
    assert_eq!(s.poincare_section(), vec![Vector2::new(0.5, -1.0), Vector2::new(1.0, 0.0)]);
    assert_eq!(s.poincare_times(), vec![0.0, 2.0]);
}
