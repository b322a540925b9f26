use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::axis::AxisKind;

#[derive(Debug, Parser)]
#[command(
    name = "image-meta",
    version,
    about = "Calibrated axes and axis-attached metadata for N-dimensional images"
)]
pub(super) struct Cli {
    #[command(subcommand)]
    pub(super) command: Commands,
}

#[derive(Debug, Subcommand)]
pub(super) enum Commands {
    /// Prints the axes, metadata subsets and varying entries of a space descriptor.
    Describe { config: PathBuf },
    /// Converts raw positions along one axis to calibrated values.
    Calibrate {
        config: PathBuf,
        #[arg(long)]
        axis: usize,
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<f64>,
    },
    /// Converts calibrated values along one axis back to raw positions.
    Raw {
        config: PathBuf,
        #[arg(long)]
        axis: usize,
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<f64>,
    },
    /// Applies a transform recipe to a described space and prints the run report.
    Run {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        recipe: PathBuf,
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

#[derive(Debug, Serialize)]
pub(super) struct AxisValues<V> {
    pub(super) axis: usize,
    pub(super) kind: AxisKind,
    pub(super) unit: Option<String>,
    pub(super) equation: String,
    pub(super) values: Vec<V>,
}

#[derive(Debug, Serialize)]
pub(super) struct CalibratedValue {
    pub(super) raw: f64,
    pub(super) calibrated: f64,
}

#[derive(Debug, Serialize)]
pub(super) struct RawValue {
    pub(super) calibrated: f64,
    pub(super) raw: Option<f64>,
    pub(super) error: Option<String>,
}
