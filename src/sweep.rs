use rayon::prelude::*;
use crate::error::Result;
use crate::model::DuffingParams;
use crate::solver::{solve, SolveParams, Solution};

/// One drive tuple and what solving it produced.
#[derive(Debug)]
pub struct Run {
    pub drive:      DuffingParams,
    pub solution:   Result<Solution>
}

/// Solve `base` once for each drive in `drives`.
/// Runs are independent and execute in parallel; the output keeps the input
/// order and a failed run does not affect the others.
pub fn sweep(base: &SolveParams, drives: &[DuffingParams]) -> Vec<Run> {
    drives.par_iter()
        .map(|&drive| {
            let solution = solve(&base.with_drive(drive));
            if let Err(ref e) = solution {
                log::warn!("run {:?} failed: {}", drive, e);
            }
            Run { drive, solution }
        })
        .collect()
}

#[test]
fn test_sweep_keeps_order_and_isolates_failures() {
    let base = SolveParams::new(60.0, 20, 5.0, 0.5, 0.0, DuffingParams::default());
    let drives = [
        DuffingParams::new(0.1, 0.1, 1.0),
        DuffingParams::new(0.1, 0.1, 0.0),
        DuffingParams::new(0.2, 0.05, 1.2)
    ];
    let runs = sweep(&base, &drives);
    assert_eq!(runs.len(), 3);
    for (run, drive) in runs.iter().zip(drives.iter()) {
        assert_eq!(run.drive, *drive);
    }
    assert!(runs[0].solution.is_ok());
    assert!(runs[1].solution.is_err());
    assert!(runs[2].solution.is_ok());
}
