//! The `plan` subcommand: build an area and a planner from CLI/config
//! input, run the pipeline, and report or save the resulting path.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;

use cb_planner_core::flow::ConstantFlowField;
use cb_planner_core::geometry::{Point, PolygonArea};
use cb_planner_core::heuristic::EuclideanDistance;
use cb_planner_core::layout::{OrientedBoustrophedon, SpiralLayout, StreamlineLayout};
use cb_planner_core::linking::SimpleLinker;
use cb_planner_core::planner::CoveragePlanner;
use cb_planner_core::refinement::{AlternatingDirections, MaximizeFlowAlignment};
use cb_planner_core::sequencing::Greedy;
use cb_planner_core::CoveragePath;

use crate::config::PlanConfig;

#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    /// Vehicle turning radius.
    #[arg(long)]
    pub vehicle_radius: Option<f64>,

    /// Sensor footprint radius.
    #[arg(long)]
    pub sensor_radius: Option<f64>,

    /// Planning strategy to use.
    #[arg(long, value_enum)]
    pub mode: Option<PlannerMode>,

    /// Area polygon as `x,y;x,y;x,y` (closing vertex implied).
    #[arg(long, value_parser = parse_polygon)]
    pub polygon: Option<Vec<[f64; 2]>>,

    /// Sweep direction for lawnmower-family modes, as `x,y`.
    #[arg(long, value_parser = parse_point)]
    pub sweep: Option<[f64; 2]>,

    /// Uniform flow vector for flow-aware modes, as `x,y`.
    #[arg(long, value_parser = parse_point)]
    pub flow: Option<[f64; 2]>,

    /// Nominal vehicle speed used by flow-aware cost functions.
    #[arg(long)]
    pub nominal_speed: Option<f64>,

    /// Preferred ingress point into the area, as `x,y`.
    #[arg(long, value_parser = parse_point)]
    pub ingress: Option<[f64; 2]>,

    /// Write the resulting path as GeoJSON to this file.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Load defaults from a TOML config file; CLI flags override it.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum PlannerMode {
    #[default]
    Lawnmower,
    DriftingLawnmower,
    EnergyEfficient,
    Spiral,
    Streamline,
}

fn parse_point(s: &str) -> Result<[f64; 2], String> {
    let (x, y) = s.split_once(',').ok_or_else(|| format!("expected `x,y`, got `{s}`"))?;
    let x: f64 = x.trim().parse().map_err(|_| format!("invalid x coordinate in `{s}`"))?;
    let y: f64 = y.trim().parse().map_err(|_| format!("invalid y coordinate in `{s}`"))?;
    Ok([x, y])
}

fn parse_polygon(s: &str) -> Result<Vec<[f64; 2]>, String> {
    s.split(';').map(parse_point).collect()
}

/// Fully-resolved plan request: every field has a concrete value, CLI
/// flags having overridden whatever a `--config` file supplied.
struct ResolvedPlan {
    vehicle_radius: f64,
    sensor_radius: f64,
    mode: PlannerMode,
    polygon: Vec<[f64; 2]>,
    sweep: [f64; 2],
    flow: [f64; 2],
    nominal_speed: f64,
    ingress: Option<[f64; 2]>,
    output: Option<PathBuf>,
}

impl ResolvedPlan {
    fn resolve(args: &PlanArgs) -> Result<Self> {
        let config = match &args.config {
            Some(path) => PlanConfig::load(path).with_context(|| format!("failed to read config file {}", path.display()))?,
            None => PlanConfig::default(),
        };

        let mode = match args.mode.or_else(|| config.mode.as_deref().and_then(mode_from_str)) {
            Some(m) => m,
            None => PlannerMode::default(),
        };

        Ok(Self {
            vehicle_radius: args.vehicle_radius.or(config.vehicle_radius).context("--vehicle-radius is required (flag or config file)")?,
            sensor_radius: args.sensor_radius.or(config.sensor_radius).context("--sensor-radius is required (flag or config file)")?,
            mode,
            polygon: args.polygon.clone().or(config.polygon).context("--polygon is required (flag or config file)")?,
            sweep: args.sweep.unwrap_or(config.sweep.unwrap_or([0.0, 1.0])),
            flow: args.flow.unwrap_or(config.flow.unwrap_or([0.0, 0.0])),
            nominal_speed: args.nominal_speed.or(config.nominal_speed).unwrap_or(0.5),
            ingress: args.ingress.or(config.ingress),
            output: args.output.clone().or(config.output),
        })
    }
}

fn mode_from_str(s: &str) -> Option<PlannerMode> {
    match s {
        "lawnmower" => Some(PlannerMode::Lawnmower),
        "drifting-lawnmower" | "drifting_lawnmower" => Some(PlannerMode::DriftingLawnmower),
        "energy-efficient" | "energy_efficient" => Some(PlannerMode::EnergyEfficient),
        "spiral" => Some(PlannerMode::Spiral),
        "streamline" => Some(PlannerMode::Streamline),
        _ => None,
    }
}

#[derive(Debug, Serialize)]
pub struct PlanSummary {
    pub mode: String,
    pub point_count: usize,
    pub length: f64,
    pub saved_to: Option<String>,
}

pub fn handle_plan_command(args: &PlanArgs) -> Result<PlanSummary> {
    let resolved = ResolvedPlan::resolve(args)?;

    if resolved.polygon.len() < 3 {
        bail!("a polygon needs at least 3 vertices, got {}", resolved.polygon.len());
    }
    let vertices: Vec<Point> = resolved.polygon.iter().map(|[x, y]| Point::new(*x, *y)).collect();
    let area = PolygonArea::new(vertices);
    let ingress = resolved.ingress.map(|[x, y]| Point::new(x, y));
    let sweep = Point::new(resolved.sweep[0], resolved.sweep[1]);
    let flow = ConstantFlowField::new(resolved.flow[0], resolved.flow[1]);

    let path = match resolved.mode {
        PlannerMode::Lawnmower => CoveragePlanner::lawnmower(resolved.vehicle_radius, resolved.sensor_radius, sweep).plan(&area, ingress),
        PlannerMode::DriftingLawnmower => {
            CoveragePlanner::drifting_lawnmower(resolved.vehicle_radius, resolved.sensor_radius, sweep, flow).plan(&area, ingress)
        }
        PlannerMode::EnergyEfficient => CoveragePlanner::new(
            resolved.vehicle_radius,
            resolved.sensor_radius,
            OrientedBoustrophedon::new(sweep),
            Greedy::new(EuclideanDistance),
            SimpleLinker::new(),
        )
        .with_refinement(MaximizeFlowAlignment::with_params(flow, resolved.nominal_speed, 0.01))
        .plan(&area, ingress),
        PlannerMode::Spiral => CoveragePlanner::new(resolved.vehicle_radius, resolved.sensor_radius, SpiralLayout::new(), Greedy::new(EuclideanDistance), SimpleLinker::new())
            .with_refinement(AlternatingDirections::new())
            .plan(&area, ingress),
        PlannerMode::Streamline => {
            CoveragePlanner::new(resolved.vehicle_radius, resolved.sensor_radius, StreamlineLayout::new(), Greedy::new(EuclideanDistance), SimpleLinker::new())
                .with_refinement(AlternatingDirections::new())
                .plan(&area, ingress)
        }
    };

    let saved_to = save_path(&path, resolved.output.as_deref())?;

    Ok(PlanSummary {
        mode: format!("{:?}", resolved.mode),
        point_count: path.coords().len(),
        length: path.length(),
        saved_to,
    })
}

fn save_path(path: &CoveragePath, output: Option<&std::path::Path>) -> Result<Option<String>> {
    match output {
        None => Ok(None),
        Some(out) => {
            path.save(out).with_context(|| format!("failed to save path to {}", out.display()))?;
            Ok(Some(out.display().to_string()))
        }
    }
}
