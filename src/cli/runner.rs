use std::path::Path;

use clap::Parser;
use serde::Serialize;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::axis::CalibratedAxis;
use crate::config::load_descriptor;
use crate::model::{AnnotatedSpace, CalibratedSpace};
use crate::recipe::{load_recipe, run_recipe, save_report};

use super::types::{AxisValues, CalibratedValue, Cli, Commands, RawValue};

pub fn run_cli() -> Result<(), String> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Commands::Describe { config } => {
            let summary = load_descriptor(&config)
                .and_then(|descriptor| descriptor.summarize())
                .map_err(|error| error.to_string())?;
            print_json(&summary)?;
        }
        Commands::Calibrate {
            config,
            axis,
            values,
        } => {
            let space = load_space(&config)?;
            let calibrated = space.axis(axis).map_err(|error| error.to_string())?;
            let values = values
                .iter()
                .map(|raw| CalibratedValue {
                    raw: *raw,
                    calibrated: calibrated.calibrated_value(*raw),
                })
                .collect();
            print_json(&axis_values(axis, calibrated, values))?;
        }
        Commands::Raw {
            config,
            axis,
            values,
        } => {
            let space = load_space(&config)?;
            let calibrated = space.axis(axis).map_err(|error| error.to_string())?;
            let values = values
                .iter()
                .map(|value| match calibrated.raw_value(*value) {
                    Ok(raw) => RawValue {
                        calibrated: *value,
                        raw: Some(raw),
                        error: None,
                    },
                    Err(error) => {
                        warn!(axis, value, %error, "value has no raw position");
                        RawValue {
                            calibrated: *value,
                            raw: None,
                            error: Some(error.to_string()),
                        }
                    }
                })
                .collect();
            print_json(&axis_values(axis, calibrated, values))?;
        }
        Commands::Run {
            config,
            recipe,
            report,
        } => {
            let space = load_space(&config)?;
            let recipe = load_recipe(&recipe).map_err(|error| error.to_string())?;
            let (_, run_report) =
                run_recipe(&recipe, &space).map_err(|error| error.to_string())?;
            if let Some(report_path) = report {
                save_report(report_path, &run_report).map_err(|error| error.to_string())?;
            }
            print_json(&run_report)?;
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // fails only when a global subscriber is already set
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_space(path: &Path) -> Result<CalibratedSpace, String> {
    load_descriptor(path)
        .and_then(|descriptor| descriptor.build())
        .map_err(|error| error.to_string())
}

fn axis_values<V>(index: usize, axis: &CalibratedAxis, values: Vec<V>) -> AxisValues<V> {
    AxisValues {
        axis: index,
        kind: axis.kind,
        unit: axis.unit.clone(),
        equation: axis.particular_equation(),
        values,
    }
}

fn print_json<S: Serialize>(value: &S) -> Result<(), String> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).map_err(|error| error.to_string())?
    );
    Ok(())
}
