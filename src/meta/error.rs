use thiserror::Error;

pub type Result<T> = std::result::Result<T, MetaError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetaError {
    #[error("axis mask has length {actual} but the space has {expected} dimensions")]
    MaskLengthMismatch { expected: usize, actual: usize },

    #[error("axis {axis} is out of range for a {dims}-dimensional space")]
    AxisOutOfRange { axis: usize, dims: usize },

    #[error("axis {axis} is listed more than once")]
    DuplicateAxis { axis: usize },

    #[error("lookup has {actual} dimensions but the item varies with {expected} axes")]
    LookupDimensionMismatch { expected: usize, actual: usize },

    #[error("position {position:?} lies outside the lookup domain")]
    OutOfBounds { position: Vec<i64> },

    #[error("translating axis {axis} by {offset} overflows")]
    TranslationOverflow { axis: usize, offset: i64 },

    #[error("varying metadata `{name}` holds a different value type")]
    TypeMismatch { name: String },
}
