use serde::{Deserialize, Serialize};

use super::{AxisError, Result};

/// Ordering of an [`EnumeratedTable`], classified once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableOrder {
    Increasing,
    Decreasing,
    Unordered,
}

/// Piecewise-linear calibration backed by an explicit value table.
///
/// Raw index `i` maps to `values[i]`. Fractional indices interpolate between
/// the bracketing entries, and indices outside `[0, len - 1]` extrapolate with
/// the slope of the two nearest boundary entries. Forward evaluation works for
/// any table; the inverse needs a strictly monotonic one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct EnumeratedTable {
    values: Vec<f64>,
    order: TableOrder,
}

impl EnumeratedTable {
    pub fn new(values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(AxisError::EmptyTable);
        }
        if let Some(index) = values.iter().position(|value| !value.is_finite()) {
            return Err(AxisError::NonFiniteTable { index });
        }
        let order = classify(&values);
        Ok(Self { values, order })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn order(&self) -> TableOrder {
        self.order
    }

    pub fn calibrated_value(&self, raw: f64) -> f64 {
        let values = &self.values;
        let count = values.len();
        if count == 1 {
            return values[0];
        }
        let last = (count - 1) as f64;
        if raw < 0.0 {
            let slope = values[1] - values[0];
            return slope * raw + values[0];
        }
        if raw > last {
            let slope = values[count - 1] - values[count - 2];
            return slope * (raw - last) + values[count - 1];
        }
        let floor = raw.floor();
        let index = floor as usize;
        let fraction = raw - floor;
        if fraction == 0.0 {
            return values[index];
        }
        values[index] + (values[index + 1] - values[index]) * fraction
    }

    pub fn raw_value(&self, calibrated: f64) -> Result<f64> {
        let sign = match self.order {
            TableOrder::Increasing => 1.0,
            TableOrder::Decreasing => -1.0,
            TableOrder::Unordered => return Err(AxisError::NonMonotonicTable),
        };
        let values = &self.values;
        let count = values.len();
        if count == 1 {
            return if calibrated == values[0] {
                Ok(0.0)
            } else {
                Err(AxisError::OutOfDomain { value: calibrated })
            };
        }
        if !calibrated.is_finite() {
            return Err(AxisError::OutOfDomain { value: calibrated });
        }

        // Work on an increasing view of the table so one search handles both orders.
        let at = |index: usize| sign * values[index];
        let target = sign * calibrated;
        let last = count - 1;

        if target < at(0) {
            return Ok((target - at(0)) / (at(1) - at(0)));
        }
        if target > at(last) {
            return Ok(last as f64 + (target - at(last)) / (at(last) - at(last - 1)));
        }
        let (mut lower, mut upper) = (0, last);
        while upper - lower > 1 {
            let middle = (lower + upper) / 2;
            if at(middle) <= target {
                lower = middle;
            } else {
                upper = middle;
            }
        }
        if at(upper) == target {
            return Ok(upper as f64);
        }
        Ok(lower as f64 + (target - at(lower)) / (at(upper) - at(lower)))
    }
}

impl TryFrom<Vec<f64>> for EnumeratedTable {
    type Error = AxisError;

    fn try_from(values: Vec<f64>) -> Result<Self> {
        Self::new(values)
    }
}

impl From<EnumeratedTable> for Vec<f64> {
    fn from(table: EnumeratedTable) -> Self {
        table.values
    }
}

fn classify(values: &[f64]) -> TableOrder {
    if values.len() < 2 {
        return TableOrder::Increasing;
    }
    if values.windows(2).all(|pair| pair[0] < pair[1]) {
        TableOrder::Increasing
    } else if values.windows(2).all(|pair| pair[0] > pair[1]) {
        TableOrder::Decreasing
    } else {
        TableOrder::Unordered
    }
}
