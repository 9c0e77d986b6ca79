//! Property-based tests for the model and the solver grid.

use duffing::model::{dvdx, potential};
use duffing::solve_duffing;
use proptest::prelude::*;

proptest! {
    /// V is even.
    #[test]
    fn potential_is_even(x in -1e3f64..1e3) {
        prop_assert_eq!(potential(x), potential(-x));
    }

    /// dV/dx is odd.
    #[test]
    fn force_is_odd(x in -1e3f64..1e3) {
        prop_assert_eq!(dvdx(-x), -dvdx(x));
    }

    /// Away from the wells, moving outwards raises the potential.
    #[test]
    fn potential_grows_outside_wells(x in 1.0f64..50.0, dx in 0.01f64..1.0) {
        prop_assert!(potential(x + dx) > potential(x));
        prop_assert!(dvdx(x + dx) > 0.0);
    }

    /// Time and state stay aligned, the spacing is dt, and the transient cut
    /// is tight.
    #[test]
    fn grid_and_transient(
        omega in 0.5f64..3.0,
        dt_per_period in 10usize..200,
        tmax in 10.0f64..50.0,
        frac in 0.0f64..0.75,
    ) {
        let t_trans = frac * tmax;
        let s = solve_duffing(tmax, dt_per_period, t_trans, 0.1, 0.0, 0.1, 0.1, omega).unwrap();

        prop_assert_eq!(s.t.len(), s.states.len());
        prop_assert_eq!(s.poincare_step, dt_per_period);
        prop_assert!((s.dt - 2.0 * std::f64::consts::PI / omega / dt_per_period as f64).abs() < 1e-12);
        prop_assert!(s.t[0] >= t_trans);
        prop_assert!(s.t[0] - t_trans < s.dt + 1e-12);
        prop_assert!(*s.t.last().unwrap() < tmax);
        if s.len() > 1 {
            prop_assert!((s.t[1] - s.t[0] - s.dt).abs() < 1e-9);
        }
    }
}
