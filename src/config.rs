use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::error::{DuffingError, Result};
use crate::model::DuffingParams;
use crate::render::RenderConfig;
use crate::solver::SolveParams;

/// A batch of solves sharing the same grid and initial condition.
/// Maps 1:1 to the JSON config file; every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub tmax:           f64,
    pub t_trans:        f64,
    pub dt_per_period:  usize,
    pub x0:             f64,
    pub v0:             f64,
    pub substeps:       usize,
    /// one solve per entry
    pub runs:           Vec<DuffingParams>,
    pub output:         OutputConfig,
    pub render:         RenderConfig
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir:            PathBuf,
    /// also write the continuous phase-space trajectory
    pub phase_portrait: bool,
    /// also write V(x) once per invocation
    pub potential_curve: bool
}

impl Default for OutputConfig {
    fn default() -> OutputConfig {
        OutputConfig {
            dir:            PathBuf::from("."),
            phase_portrait: false,
            potential_curve: false
        }
    }
}

impl Default for RunConfig {
    fn default() -> RunConfig {
        RunConfig {
            tmax:           18000.0,
            t_trans:        300.0,
            dt_per_period:  100,
            x0:             0.0,
            v0:             0.0,
            substeps:       4,
            runs:           vec![DuffingParams::default()],
            output:         OutputConfig::default(),
            render:         RenderConfig::default()
        }
    }
}

impl RunConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<RunConfig> {
        let contents = std::fs::read_to_string(path)?;
        RunConfig::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<RunConfig> {
        let config: RunConfig = serde_json::from_str(json)?;
        if config.runs.is_empty() {
            return Err(DuffingError::Config("no runs configured".into()));
        }
        Ok(config)
    }

    /// Solve parameters shared by all runs; the drive is the first run's.
    pub fn solve_params(&self) -> SolveParams {
        SolveParams::new(
            self.tmax,
            self.dt_per_period,
            self.t_trans,
            self.x0,
            self.v0,
            self.runs.first().cloned().unwrap_or_default()
        ).with_substeps(self.substeps)
    }
}

#[test]
fn test_defaults_fill_missing_fields() {
    let config = RunConfig::from_json(r#"{
        "tmax": 500.0,
        "runs": [
            { "gamma": 0.3, "delta": 0.1, "omega": 1.2 },
            { "gamma": 0.5, "delta": 0.1, "omega": 1.2 }
        ]
    }"#).unwrap();

    assert_eq!(config.tmax, 500.0);
    assert_eq!(config.t_trans, 300.0);
    assert_eq!(config.dt_per_period, 100);
    assert_eq!(config.runs.len(), 2);
    assert_eq!(config.runs[1].gamma, 0.5);
    assert_eq!(config.render, RenderConfig::default());

    let p = config.solve_params();
    assert_eq!(p.substeps, 4);
    assert_eq!(p.drive, config.runs[0]);
}

#[test]
fn test_empty_run_list_rejected() {
    match RunConfig::from_json(r#"{ "runs": [] }"#) {
        Err(DuffingError::Config(_)) => (),
        other => panic!("unexpected {:?}", other)
    }
}

#[test]
fn test_from_file() {
    let path = std::env::temp_dir().join("duffing-config-test.json");
    std::fs::write(&path, r#"{
        "t_trans": 50.0,
        "runs": [{ "gamma": 0.3, "delta": 0.2, "omega": 1.2 }],
        "output": { "dir": "out", "potential_curve": true }
    }"#).unwrap();

    let config = RunConfig::from_file(&path).unwrap();
    assert_eq!(config.t_trans, 50.0);
    assert_eq!(config.runs, vec![DuffingParams::new(0.3, 0.2, 1.2)]);
    assert_eq!(config.output.dir, PathBuf::from("out"));
    assert!(config.output.potential_curve);
    assert!(!config.output.phase_portrait);
}

#[test]
fn test_missing_file_is_io_error() {
    let path = std::env::temp_dir().join("duffing-config-does-not-exist.json");
    match RunConfig::from_file(&path) {
        Err(DuffingError::Io(_)) => (),
        other => panic!("unexpected {:?}", other)
    }
}

#[test]
fn test_malformed_json_rejected() {
    match RunConfig::from_json(r#"{ "tmax": 100.0, "runs": [ "#) {
        Err(DuffingError::Json(_)) => (),
        other => panic!("unexpected {:?}", other)
    }
    match RunConfig::from_json(r#"{ "tmax": "long" }"#) {
        Err(DuffingError::Json(_)) => (),
        other => panic!("unexpected {:?}", other)
    }
}

#[test]
fn test_json_roundtrip() {
    let config = RunConfig::default();
    let json = serde_json::to_string_pretty(&config).unwrap();
    assert_eq!(RunConfig::from_json(&json).unwrap(), config);
}
