use thiserror::Error;

pub type Result<T> = std::result::Result<T, AxisError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AxisError {
    #[error("enumerated calibration table must contain at least one value")]
    EmptyTable,

    #[error("enumerated calibration table has a non-finite value at index {index}")]
    NonFiniteTable { index: usize },

    #[error("calibration `{equation}` has no inverse")]
    NotInvertible { equation: &'static str },

    #[error("enumerated calibration table is not strictly monotonic and cannot be inverted")]
    NonMonotonicTable,

    #[error("calibrated value {value} is outside the invertible domain")]
    OutOfDomain { value: f64 },
}
