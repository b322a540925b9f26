use thiserror::Error;

use crate::axis::AxisError;
use crate::meta::MetaError;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(
        "dimensionality mismatch: data has {data_ndim} dimensions but the space has {space_ndim}"
    )]
    DimensionalityMismatch { data_ndim: usize, space_ndim: usize },

    #[error(
        "dimension size mismatch at axis {axis}: data size {data_size} != space extent {space_size}"
    )]
    DimensionSizeMismatch {
        axis: usize,
        data_size: usize,
        space_size: usize,
    },

    #[error("axis {axis} out of range for a {dims}-dimensional space")]
    AxisOutOfRange { axis: usize, dims: usize },

    #[error("position {position} out of range for axis {axis} of size {size}")]
    PositionOutOfRange {
        axis: usize,
        position: usize,
        size: usize,
    },

    #[error("invalid dimension size 0 at axis {axis}")]
    ZeroSizedDimension { axis: usize },

    #[error(transparent)]
    Axis(#[from] AxisError),

    #[error(transparent)]
    Meta(#[from] MetaError),
}
