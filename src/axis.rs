mod calibrated;
mod calibration;
mod enumerated;
mod error;
mod kind;


pub use calibrated::CalibratedAxis;
pub use calibration::Calibration;
pub use enumerated::{EnumeratedTable, TableOrder};
pub use error::{AxisError, Result};
pub use kind::{AxisKind, default_axis_for_index};
