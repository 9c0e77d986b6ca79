use std::ops::{Mul, Add};
use nalgebra::Vector2;
use crate::error::{DuffingError, Result};

/// Classical fourth-order Runge-Kutta with a fixed step.
/// Every call to `next` advances one step and yields the new state.
pub struct Integration<N, F> {
    f:  F,
    t0: f64,
    k:  u64,
    y:  N,
    h:  f64
}
impl<N, F> Integration<N, F> {
    pub fn new(t0: f64, dt: f64, s0: N, f: F) -> Integration<N, F> {
        Integration {
            f:  f,
            t0: t0,
            k:  0,
            y:  s0,
            h:  dt
        }
    }

    /// Time of the current state. Computed from the step count so that long
    /// runs land on `t0 + k·h` without accumulated rounding.
    #[inline]
    pub fn t(&self) -> f64 {
        self.t0 + self.k as f64 * self.h
    }
}
impl<N: Copy, F> Integration<N, F> {
    #[inline]
    pub fn state(&self) -> N {
        self.y
    }
}
impl<N, F> Iterator for Integration<N, F> where
    N: Mul<f64, Output=N> + Add<Output=N> + Copy,
    F: Fn(f64, N) -> N {
    type Item = N;
    fn next(&mut self) -> Option<N> {
        let f = &self.f;
        let t = self.t();
        let h = self.h;
        let h_half = h / 2.0;
        let h_third = h / 3.0;
        let h_sixth = h / 6.0;

        let y = self.y;
        let k1 = f(t, y);
        let k2 = f(t + h_half, y + k1 * h_half);
        let k3 = f(t + h_half, y + k2 * h_half);
        let k4 = f(t + h, y + k3 * h);

        self.y = y + (k1 + k4) * h_sixth + (k2 + k3) * h_third;
        self.k += 1;

        Some(self.y)
    }
}

/// Anything the grid integrator can check for blow-up.
pub trait Finite {
    fn is_finite(&self) -> bool;
}
impl Finite for f64 {
    fn is_finite(&self) -> bool {
        f64::is_finite(*self)
    }
}
impl Finite for Vector2<f64> {
    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Integrate `f` from `y0` at t = 0 and sample it on the grid `i·dt`,
/// `i = 0 .. len`. Each grid interval is covered by `substeps` RK4 steps.
///
/// Stops at the first sample that is not finite; no partial trajectory is
/// returned in that case.
pub fn integrate_on_grid<N, F>(f: F, y0: N, dt: f64, len: usize, substeps: usize) -> Result<Vec<N>>
    where N: Mul<f64, Output=N> + Add<Output=N> + Copy + Finite,
          F: Fn(f64, N) -> N
{
    if substeps == 0 {
        return Err(DuffingError::InvalidParameter {
            name: "substeps",
            value: 0.0,
            reason: "at least one integration step per grid interval is required"
        });
    }

    let mut out = Vec::with_capacity(len);
    if len == 0 {
        return Ok(out);
    }
    out.push(y0);

    let mut integration = Integration::new(0.0, dt / substeps as f64, y0, f);
    for index in 1 .. len {
        let mut y = integration.state();
        for next in integration.by_ref().take(substeps) {
            y = next;
        }
        if !y.is_finite() {
            return Err(DuffingError::IntegrationFailed { index, t: index as f64 * dt });
        }
        out.push(y);
    }
    Ok(out)
}

#[test]
fn test_rk4_exponential_decay() {
    // y' = -y, y(0) = 1
    let h = 0.01;
    let mut it = Integration::new(0.0, h, 1.0f64, |_t: f64, y: f64| -y);
    let y = it.by_ref().nth(99).unwrap();
    assert!((y - (-1.0f64).exp()).abs() < 1e-10);
    assert!((it.t() - 1.0).abs() < 1e-12);
}

#[test]
fn test_rk4_fourth_order() {
    let err = |n: usize| {
        let h = 1.0 / n as f64;
        let y = Integration::new(0.0, h, 1.0f64, |_t: f64, y: f64| -y).nth(n - 1).unwrap();
        (y - (-1.0f64).exp()).abs()
    };
    // halving h should cut the error by ~16
    let ratio = err(10) / err(20);
    assert!(ratio > 14.0 && ratio < 18.0, "ratio = {}", ratio);
}

#[test]
fn test_rk4_time_dependent() {
    // y' = cos(t), y(0) = 0 => y = sin(t)
    let y = Integration::new(0.0, 1e-2, 0.0f64, |t: f64, _y: f64| t.cos()).nth(299).unwrap();
    assert!((y - 3.0f64.sin()).abs() < 1e-10);
}

#[test]
fn test_grid_samples_and_substeps() {
    let f = |_t: f64, y: Vector2<f64>| Vector2::new(y.y, -y.x);
    let coarse = integrate_on_grid(f, Vector2::new(1.0, 0.0), 0.1, 11, 1).unwrap();
    let fine = integrate_on_grid(f, Vector2::new(1.0, 0.0), 0.1, 11, 8).unwrap();
    assert_eq!(coarse.len(), 11);
    assert_eq!(fine.len(), 11);
    assert_eq!(coarse[0], Vector2::new(1.0, 0.0));
    let exact = 1.0f64.cos();
    assert!((fine[10].x - exact).abs() < (coarse[10].x - exact).abs());
    assert!((fine[10].x - exact).abs() < 1e-9);
}

#[test]
fn test_grid_reports_blow_up() {
    // y' = y² escapes to infinity at t = 1
    let res = integrate_on_grid(|_t: f64, y: f64| y * y, 1.0, 0.25, 100, 1);
    match res {
        Err(DuffingError::IntegrationFailed { index, .. }) => assert!(index > 3),
        other => panic!("expected failure, got {:?}", other)
    }
}
