use std::f64::consts::PI;
use std::ops::Range;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Double-well potential V(x) = x²/2 · (x²/2 - 1).
#[inline]
pub fn potential(x: f64) -> f64 {
    0.5 * x * x * (0.5 * x * x - 1.0)
}

/// dV/dx. Must stay the exact derivative of `potential`.
#[inline]
pub fn dvdx(x: f64) -> f64 {
    x * x * x - x
}

/// Total mechanical energy of a `(x, ẋ)` state.
#[inline]
pub fn energy(s: Vector2<f64>) -> f64 {
    0.5 * s.y * s.y + potential(s.x)
}

/// Driving amplitude, damping and driving angular frequency.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DuffingParams {
    pub gamma:  f64,
    pub delta:  f64,
    pub omega:  f64
}

impl DuffingParams {
    pub fn new(gamma: f64, delta: f64, omega: f64) -> DuffingParams {
        DuffingParams {
            gamma:  gamma,
            delta:  delta,
            omega:  omega
        }
    }

    /// One period of the external drive, 2π/ω.
    pub fn period(&self) -> f64 {
        2.0 * PI / self.omega
    }

    /// The state-space vector field, in the `(t, state)` argument order the
    /// integrator calls it with.
    pub fn vector_field(self) -> impl Fn(f64, Vector2<f64>) -> Vector2<f64> {
        move |t, s| derivative(s, t, &self)
    }
}

impl Default for DuffingParams {
    fn default() -> DuffingParams {
        DuffingParams {
            gamma:  0.08,
            delta:  0.02,
            omega:  0.28
        }
    }
}

/// Time derivative of `(x, ẋ)`: restoring force from the potential, linear
/// damping and a cosine drive.
#[inline]
pub fn derivative(s: Vector2<f64>, t: f64, p: &DuffingParams) -> Vector2<f64> {
    Vector2::new(
        s.y,
        -dvdx(s.x) - p.delta * s.y + p.gamma * (p.omega * t).cos()
    )
}

/// `n` evenly spaced samples of V over `range`, both ends included.
pub fn potential_curve(range: Range<f64>, n: usize) -> Vec<(f64, f64)> {
    match n {
        0 => vec![],
        1 => vec![(range.start, potential(range.start))],
        _ => {
            let step = (range.end - range.start) / (n - 1) as f64;
            (0 .. n).map(|i| {
                let x = range.start + i as f64 * step;
                (x, potential(x))
            }).collect()
        }
    }
}

#[test]
fn test_potential_wells() {
    assert_eq!(potential(0.0), 0.0);
    assert_eq!(potential(1.0), -0.25);
    assert_eq!(potential(-1.0), -0.25);
    assert_eq!(dvdx(1.0), 0.0);
    assert_eq!(dvdx(-1.0), 0.0);
    assert_eq!(dvdx(0.0), 0.0);
}

#[test]
fn test_dvdx_matches_potential() {
    let h = 1e-5;
    for i in -30 .. 31 {
        let x = i as f64 * 0.1;
        let numeric = (potential(x + h) - potential(x - h)) / (2.0 * h);
        assert!((numeric - dvdx(x)).abs() < 1e-8, "x = {}", x);
    }
}

#[test]
fn test_derivative_terms() {
    let p = DuffingParams::new(0.5, 0.25, 2.0);
    // at rest in a well only the drive acts
    let d = derivative(Vector2::new(1.0, 0.0), 0.0, &p);
    assert_eq!(d, Vector2::new(0.0, 0.5));

    // half a drive period later the drive has flipped sign
    let d = derivative(Vector2::new(1.0, 0.0), p.period() / 2.0, &p);
    assert!((d.y + 0.5).abs() < 1e-12);

    let d = derivative(Vector2::new(0.0, 2.0), PI / 4.0, &p);
    assert_eq!(d.x, 2.0);
    assert!((d.y + 0.5).abs() < 1e-12);
}

#[test]
fn test_potential_curve() {
    let curve = potential_curve(-1.5 .. 1.5, 100);
    assert_eq!(curve.len(), 100);
    assert_eq!(curve[0].0, -1.5);
    assert!((curve[99].0 - 1.5).abs() < 1e-12);
    assert!(curve.iter().all(|&(x, v)| v == potential(x)));
}
