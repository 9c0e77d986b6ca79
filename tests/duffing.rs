use approx::{assert_abs_diff_eq, assert_relative_eq};
use duffing::model::{energy, DuffingParams};
use duffing::{solve, solve_duffing, DuffingError, SolveParams};

fn assert_invalid(res: duffing::Result<duffing::Solution>, expected: &str) {
    match res {
        Err(DuffingError::InvalidParameter { name, .. }) => assert_eq!(name, expected),
        other => panic!("expected {} to be rejected, got {:?}", expected, other.map(|s| s.len()))
    }
}

#[test]
fn test_reference_scenario() {
    let s = solve_duffing(100.0, 100, 10.0, 0.0, 0.0, 0.08, 0.02, 0.28).unwrap();

    assert_abs_diff_eq!(s.dt, 0.2244, epsilon = 1e-4);
    assert_eq!(s.poincare_step, 100);
    assert!(s.t[0] >= 10.0 && s.t[0] < 10.0 + s.dt, "t[0] = {}", s.t[0]);
    assert_eq!(s.t.len(), s.states.len());
    // 446 grid points on [0, 100), 45 of them before t = 10
    assert_eq!(s.len(), 446 - 45);
}

#[test]
fn test_grid_consistency() {
    let s = solve_duffing(50.0, 64, 0.0, 0.3, 0.0, 0.2, 0.1, 1.3).unwrap();
    assert_eq!(s.t.len(), s.states.len());
    assert_eq!(s.t[0], 0.0);
    assert_relative_eq!(s.t[1] - s.t[0], s.dt, max_relative = 1e-12);
    assert!(s.t.windows(2).all(|w| w[1] > w[0]));
    assert!(*s.t.last().unwrap() < 50.0);
}

#[test]
fn test_transient_slicing() {
    for &t_trans in &[0.0, 0.5, 3.0, 7.3, 19.5] {
        let s = solve_duffing(20.0, 50, t_trans, 1.0, 0.0, 0.3, 0.2, 1.0).unwrap();
        assert!(s.t[0] >= t_trans);
        assert!(s.t[0] - t_trans < s.dt + 1e-12, "t_trans = {}: t[0] = {}", t_trans, s.t[0]);
    }
}

#[test]
fn test_transient_keeps_trajectory() {
    // the cut only drops leading points, the rest is the same trajectory
    let full = solve_duffing(40.0, 40, 0.0, 0.5, 0.0, 0.3, 0.15, 1.2).unwrap();
    let cut = solve_duffing(40.0, 40, 12.0, 0.5, 0.0, 0.3, 0.15, 1.2).unwrap();
    let offset = full.len() - cut.len();
    assert_eq!(full.t[offset], cut.t[0]);
    assert_eq!(full.states[offset ..], cut.states[..]);
}

#[test]
fn test_energy_conserved_without_drive_and_damping() {
    let s = solve_duffing(300.0, 100, 0.0, 1.2, 0.0, 0.0, 0.0, 1.0).unwrap();
    let e0 = energy(s.states[0]);
    let drift = s.energies().iter()
        .map(|e| ((e - e0) / e0).abs())
        .fold(0.0, f64::max);
    assert!(drift < 1e-3, "relative energy drift {}", drift);
}

#[test]
fn test_energy_decays_with_damping() {
    let s = solve_duffing(200.0, 100, 0.0, 1.4, 0.0, 0.0, 0.2, 1.0).unwrap();
    let e = s.energies();
    assert!(e.last().unwrap() < &e[0]);
    // settles into a well bottom
    assert_abs_diff_eq!(*e.last().unwrap(), -0.25, epsilon = 1e-3);
}

#[test]
fn test_resting_at_unstable_equilibrium() {
    let s = solve_duffing(100.0, 50, 0.0, 0.0, 0.0, 0.0, 0.3, 1.0).unwrap();
    assert!(s.states.iter().all(|x| x.x.abs() < 1e-12 && x.y.abs() < 1e-12));
}

#[test]
fn test_state_columns() {
    let s = solve_duffing(50.0, 40, 5.0, 1.0, 0.0, 0.3, 0.15, 1.2).unwrap();
    let (x, v) = (s.positions(), s.velocities());
    assert_eq!(x.len(), s.len());
    assert_eq!(v.len(), s.len());
    for (i, state) in s.states.iter().enumerate() {
        assert_eq!(x[i], state.x);
        assert_eq!(v[i], state.y);
    }
}

#[test]
fn test_poincare_stride() {
    let dt_per_period = 37;
    let s = solve_duffing(200.0, dt_per_period, 15.0, 0.0, 0.0, 0.3, 0.15, 1.1).unwrap();
    assert_eq!(s.poincare_step, dt_per_period);

    let period = DuffingParams::new(0.3, 0.15, 1.1).period();
    let times = s.poincare_times();
    let section = s.poincare_section();
    assert_eq!(times.len(), section.len());
    assert_eq!(section.len(), (s.len() + dt_per_period - 1) / dt_per_period);
    for w in times.windows(2) {
        assert_relative_eq!(w[1] - w[0], period, max_relative = 1e-9);
    }
    assert_eq!(section[1], s.states[dt_per_period]);
}

#[test]
fn test_substeps_converge() {
    let drive = DuffingParams::new(0.3, 0.2, 1.2);
    let p = SolveParams::new(20.0, 20, 0.0, 0.5, 0.0, drive);
    let coarse = solve(&p).unwrap();
    let fine = solve(&p.with_substeps(16)).unwrap();
    assert_eq!(coarse.len(), fine.len());
    assert_eq!(coarse.t, fine.t);
    let reference = solve(&p.with_substeps(64)).unwrap();
    let err = |s: &duffing::Solution| (s.states.last().unwrap() - reference.states.last().unwrap()).norm();
    assert!(err(&fine) < err(&coarse));
}

#[test]
fn test_invalid_parameters_rejected() {
    assert_invalid(solve_duffing(100.0, 100, 10.0, 0.0, 0.0, 0.1, 0.1, 0.0), "omega");
    assert_invalid(solve_duffing(100.0, 100, 10.0, 0.0, 0.0, 0.1, 0.1, -1.0), "omega");
    assert_invalid(solve_duffing(100.0, 100, 10.0, 0.0, 0.0, 0.1, 0.1, f64::NAN), "omega");
    assert_invalid(solve_duffing(100.0, 0, 10.0, 0.0, 0.0, 0.1, 0.1, 1.0), "dt_per_period");
    assert_invalid(solve_duffing(100.0, 1, 10.0, 0.0, 0.0, 0.1, 0.1, 1.0), "dt_per_period");
    assert_invalid(solve_duffing(0.0, 100, 0.0, 0.0, 0.0, 0.1, 0.1, 1.0), "tmax");
    assert_invalid(solve_duffing(f64::INFINITY, 100, 0.0, 0.0, 0.0, 0.1, 0.1, 1.0), "tmax");
    assert_invalid(solve_duffing(1e22, 100, 0.0, 0.0, 0.0, 0.08, 0.02, 0.28), "tmax");
    assert_invalid(solve_duffing(f64::MAX, 100, 0.0, 0.0, 0.0, 0.08, 0.02, 0.28), "tmax");
    assert_invalid(solve_duffing(100.0, 100, 100.0, 0.0, 0.0, 0.1, 0.1, 1.0), "t_trans");
    assert_invalid(solve_duffing(100.0, 100, 150.0, 0.0, 0.0, 0.1, 0.1, 1.0), "t_trans");
    assert_invalid(solve_duffing(100.0, 100, -1.0, 0.0, 0.0, 0.1, 0.1, 1.0), "t_trans");
    assert_invalid(solve_duffing(100.0, 100, 10.0, f64::NAN, 0.0, 0.1, 0.1, 1.0), "x0");
    assert_invalid(solve_duffing(100.0, 100, 10.0, 0.0, 0.0, f64::INFINITY, 0.1, 1.0), "gamma");

    let p = SolveParams::new(100.0, 100, 10.0, 0.0, 0.0, DuffingParams::default()).with_substeps(0);
    assert_invalid(solve(&p), "substeps");
}

#[test]
fn test_negative_damping_is_allowed() {
    assert!(solve_duffing(10.0, 20, 0.0, 0.5, 0.0, 0.1, -0.01, 1.0).is_ok());
}

#[test]
fn test_blow_up_is_reported() {
    // far too stiff for the grid: RK4 diverges instead of returning garbage
    match solve_duffing(100.0, 100, 0.0, 1e3, 0.0, 0.0, 0.0, 1.0) {
        Err(DuffingError::IntegrationFailed { index, t }) => {
            assert!(index > 0);
            assert!(t > 0.0);
        },
        other => panic!("expected an integration failure, got {:?}", other.map(|s| s.len()))
    }
}
