use serde::{Deserialize, Serialize};

use super::{AxisKind, Calibration, Result};

/// One dimension of an annotated space: its kind, unit and calibration.
///
/// Axes are plain values. Moving an axis to another dimension index clones it,
/// so the two spaces never share calibration state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CalibratedAxis {
    pub kind: AxisKind,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub calibration: Calibration,
}

impl CalibratedAxis {
    pub fn new(kind: AxisKind) -> Self {
        Self {
            kind,
            unit: None,
            calibration: Calibration::Identity,
        }
    }

    pub fn linear(kind: AxisKind, unit: impl Into<String>, origin: f64, scale: f64) -> Self {
        Self {
            kind,
            unit: Some(unit.into()),
            calibration: Calibration::linear(origin, scale),
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_calibration(mut self, calibration: Calibration) -> Self {
        self.calibration = calibration;
        self
    }

    pub fn calibrated_value(&self, raw: f64) -> f64 {
        self.calibration.calibrated_value(raw)
    }

    pub fn raw_value(&self, calibrated: f64) -> Result<f64> {
        self.calibration.raw_value(calibrated)
    }

    pub fn average_scale(&self, raw1: f64, raw2: f64) -> f64 {
        self.calibration.average_scale(raw1, raw2)
    }

    pub fn general_equation(&self) -> &'static str {
        self.calibration.general_equation()
    }

    pub fn particular_equation(&self) -> String {
        self.calibration.particular_equation()
    }
}
