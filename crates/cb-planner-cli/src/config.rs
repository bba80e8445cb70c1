//! Optional TOML batch-planning config (SPEC_FULL.md §4): CLI flags take
//! precedence over whatever a `--config` file supplies.

use std::path::PathBuf;

use serde::Deserialize;

/// Mirrors `PlanArgs`, but every field is optional so a config file can
/// supply a subset and let flags fill in the rest.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlanConfig {
    pub vehicle_radius: Option<f64>,
    pub sensor_radius: Option<f64>,
    pub mode: Option<String>,
    pub polygon: Option<Vec<[f64; 2]>>,
    pub sweep: Option<[f64; 2]>,
    pub flow: Option<[f64; 2]>,
    pub nominal_speed: Option<f64>,
    pub ingress: Option<[f64; 2]>,
    pub output: Option<PathBuf>,
}

impl PlanConfig {
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let body = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&body)?)
    }
}
