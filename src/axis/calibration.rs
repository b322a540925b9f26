use serde::{Deserialize, Serialize};

use super::{AxisError, EnumeratedTable, Result, TableOrder};

const SLOPE_STEP: f64 = 1e-6;

/// Equation mapping a raw axis position to a calibrated value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "equation", rename_all = "snake_case")]
pub enum Calibration {
    /// `y = x`
    #[default]
    Identity,
    /// `y = a + b*x`
    Linear { a: f64, b: f64 },
    /// `y = a + b*x^c`
    Power { a: f64, b: f64, c: f64 },
    /// `y = a + b*exp(c + d*x)`
    Exponential { a: f64, b: f64, c: f64, d: f64 },
    /// `y = a*(1 - exp(-b*x)) + c`
    ExponentialRecovery { a: f64, b: f64, c: f64 },
    /// `y = a + b*ln(c + d*x)`
    LogLinear { a: f64, b: f64, c: f64, d: f64 },
    /// `y = a + (b - a)*exp(-(x - c)^2 / (2*d^2))`
    Gaussian { a: f64, b: f64, c: f64, d: f64 },
    /// `y = d + (a - d)/(1 + (x/c)^b)`
    Rodbard { a: f64, b: f64, c: f64, d: f64 },
    /// `y = a*((x - b)/(c - x))^(1/d)`
    InverseRodbard { a: f64, b: f64, c: f64, d: f64 },
    /// Piecewise-linear lookup into an explicit value table.
    Enumerated { values: EnumeratedTable },
}

impl Calibration {
    pub fn linear(origin: f64, scale: f64) -> Self {
        Calibration::Linear {
            a: origin,
            b: scale,
        }
    }

    pub fn enumerated(values: Vec<f64>) -> Result<Self> {
        Ok(Calibration::Enumerated {
            values: EnumeratedTable::new(values)?,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Calibration::Identity => "identity",
            Calibration::Linear { .. } => "linear",
            Calibration::Power { .. } => "power",
            Calibration::Exponential { .. } => "exponential",
            Calibration::ExponentialRecovery { .. } => "exponential_recovery",
            Calibration::LogLinear { .. } => "log_linear",
            Calibration::Gaussian { .. } => "gaussian",
            Calibration::Rodbard { .. } => "rodbard",
            Calibration::InverseRodbard { .. } => "inverse_rodbard",
            Calibration::Enumerated { .. } => "enumerated",
        }
    }

    pub fn is_invertible(&self) -> bool {
        match self {
            Calibration::Gaussian { .. } => false,
            Calibration::Enumerated { values } => values.order() != TableOrder::Unordered,
            _ => true,
        }
    }

    pub fn calibrated_value(&self, raw: f64) -> f64 {
        let x = raw;
        match *self {
            Calibration::Identity => x,
            Calibration::Linear { a, b } => a + b * x,
            Calibration::Power { a, b, c } => a + b * x.powf(c),
            Calibration::Exponential { a, b, c, d } => a + b * (c + d * x).exp(),
            Calibration::ExponentialRecovery { a, b, c } => a * (1.0 - (-b * x).exp()) + c,
            Calibration::LogLinear { a, b, c, d } => a + b * (c + d * x).ln(),
            Calibration::Gaussian { a, b, c, d } => {
                let offset = x - c;
                a + (b - a) * (-(offset * offset) / (2.0 * d * d)).exp()
            }
            Calibration::Rodbard { a, b, c, d } => d + (a - d) / (1.0 + (x / c).powf(b)),
            Calibration::InverseRodbard { a, b, c, d } => a * ((x - b) / (c - x)).powf(1.0 / d),
            Calibration::Enumerated { ref values } => values.calibrated_value(x),
        }
    }

    pub fn raw_value(&self, calibrated: f64) -> Result<f64> {
        let y = calibrated;
        let raw = match *self {
            Calibration::Identity => y,
            Calibration::Linear { a, b } => (y - a) / b,
            Calibration::Power { a, b, c } => ((y - a) / b).powf(1.0 / c),
            Calibration::Exponential { a, b, c, d } => (((y - a) / b).ln() - c) / d,
            Calibration::ExponentialRecovery { a, b, c } => -(1.0 - (y - c) / a).ln() / b,
            Calibration::LogLinear { a, b, c, d } => (((y - a) / b).exp() - c) / d,
            Calibration::Gaussian { .. } => {
                return Err(AxisError::NotInvertible {
                    equation: self.name(),
                });
            }
            Calibration::Rodbard { a, b, c, d } => c * ((a - y) / (y - d)).powf(1.0 / b),
            Calibration::InverseRodbard { a, b, c, d } => {
                let ratio = (y / a).powf(d);
                (b + ratio * c) / (1.0 + ratio)
            }
            Calibration::Enumerated { ref values } => return values.raw_value(y),
        };
        if raw.is_finite() {
            Ok(raw)
        } else {
            Err(AxisError::OutOfDomain { value: calibrated })
        }
    }

    /// Mean calibrated units per raw unit between two raw positions.
    ///
    /// When both positions coincide this is the local slope, estimated by a
    /// central difference.
    pub fn average_scale(&self, raw1: f64, raw2: f64) -> f64 {
        match *self {
            Calibration::Identity => 1.0,
            Calibration::Linear { b, .. } => b,
            _ if raw1 == raw2 => {
                let step = SLOPE_STEP * raw1.abs().max(1.0);
                (self.calibrated_value(raw1 + step) - self.calibrated_value(raw1 - step))
                    / (2.0 * step)
            }
            _ => (self.calibrated_value(raw2) - self.calibrated_value(raw1)) / (raw2 - raw1),
        }
    }

    pub fn general_equation(&self) -> &'static str {
        match self {
            Calibration::Identity => "y = x",
            Calibration::Linear { .. } => "y = a + b*x",
            Calibration::Power { .. } => "y = a + b*x^c",
            Calibration::Exponential { .. } => "y = a + b*exp(c + d*x)",
            Calibration::ExponentialRecovery { .. } => "y = a*(1 - exp(-b*x)) + c",
            Calibration::LogLinear { .. } => "y = a + b*ln(c + d*x)",
            Calibration::Gaussian { .. } => "y = a + (b - a)*exp(-(x - c)^2 / (2*d^2))",
            Calibration::Rodbard { .. } => "y = d + (a - d)/(1 + (x/c)^b)",
            Calibration::InverseRodbard { .. } => "y = a*((x - b)/(c - x))^(1/d)",
            Calibration::Enumerated { .. } => "y = table[x]",
        }
    }

    pub fn particular_equation(&self) -> String {
        match self {
            Calibration::Identity => "y = x".to_string(),
            Calibration::Linear { a, b } => format!("y = {a} + {b}*x"),
            Calibration::Power { a, b, c } => format!("y = {a} + {b}*x^{c}"),
            Calibration::Exponential { a, b, c, d } => format!("y = {a} + {b}*exp({c} + {d}*x)"),
            Calibration::ExponentialRecovery { a, b, c } => {
                format!("y = {a}*(1 - exp(-{b}*x)) + {c}")
            }
            Calibration::LogLinear { a, b, c, d } => format!("y = {a} + {b}*ln({c} + {d}*x)"),
            Calibration::Gaussian { a, b, c, d } => {
                format!("y = {a} + ({b} - {a})*exp(-(x - {c})^2 / (2*{d}^2))")
            }
            Calibration::Rodbard { a, b, c, d } => {
                format!("y = {d} + ({a} - {d})/(1 + (x/{c})^{b})")
            }
            Calibration::InverseRodbard { a, b, c, d } => {
                format!("y = {a}*((x - {b})/({c} - x))^(1/{d})")
            }
            Calibration::Enumerated { values } => {
                format!("y = table[x] over {} entries", values.len())
            }
        }
    }
}
