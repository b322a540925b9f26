use ndarray::parallel::prelude::*;
use ndarray::{ArrayD, Axis};
use rayon::slice::ParallelSlice;

use crate::axis::CalibratedAxis;
use crate::meta::DetachedEntry;

use super::{AnnotatedSpace, CalibratedSpace, CoreError, Result};

const MIN_MAX_CHUNK: usize = 1 << 16;

/// Pixel data together with its calibrated axes and metadata.
///
/// Every transform moves the data and the metadata together, so a varying
/// item indexed by a data position keeps describing the same sample.
#[derive(Debug, Clone)]
pub struct Dataset<T> {
    pub data: ArrayD<T>,
    space: CalibratedSpace,
}

impl<T> Dataset<T> {
    /// Pairs `data` with `space`, whose extents are then taken from the data.
    pub fn new(data: ArrayD<T>, space: CalibratedSpace) -> Result<Self> {
        validate_shape(data.shape(), &space)?;
        let space = space.with_extents(data.shape().iter().copied().map(Some).collect())?;
        Ok(Self { data, space })
    }

    pub fn from_data(data: ArrayD<T>) -> Self {
        let extents = data
            .shape()
            .iter()
            .map(|size| (*size > 0).then_some(*size))
            .collect();
        let space = CalibratedSpace::with_dimensions(data.ndim())
            .with_extents(extents)
            .unwrap_or_else(|_| CalibratedSpace::with_dimensions(data.ndim()));
        Self { data, space }
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    pub fn space(&self) -> &CalibratedSpace {
        &self.space
    }

    pub fn space_mut(&mut self) -> &mut CalibratedSpace {
        &mut self.space
    }

    pub fn into_parts(self) -> (ArrayD<T>, CalibratedSpace) {
        (self.data, self.space)
    }

    pub fn validate(&self) -> Result<()> {
        validate_shape(self.data.shape(), &self.space)
    }

    fn check_axis(&self, axis: usize) -> Result<()> {
        if axis >= self.ndim() {
            return Err(CoreError::AxisOutOfRange {
                axis,
                dims: self.ndim(),
            });
        }
        Ok(())
    }
}

impl<T: Clone> Dataset<T> {
    /// Quarter turn from `from_axis` towards `to_axis`.
    ///
    /// The new `from_axis` runs backwards along the old `to_axis`; the space
    /// carries the data's extents, so its metadata is offset to match.
    pub fn rotate(&self, from_axis: usize, to_axis: usize) -> Result<(Self, Vec<DetachedEntry>)> {
        self.check_axis(from_axis)?;
        self.check_axis(to_axis)?;
        if from_axis == to_axis {
            return Ok((self.clone(), Vec::new()));
        }
        let (space, detached) = self.space.rotate(from_axis, to_axis)?;

        let mut view = self.data.view();
        view.swap_axes(from_axis, to_axis);
        view.invert_axis(Axis(from_axis));
        let data = view.as_standard_layout().into_owned();
        Ok((Self { data, space }, detached))
    }

    pub fn permute(&self, from_axis: usize, to_axis: usize) -> Result<(Self, Vec<DetachedEntry>)> {
        self.check_axis(from_axis)?;
        self.check_axis(to_axis)?;
        let (space, detached) = self.space.permute(from_axis, to_axis)?;
        let mut view = self.data.view();
        view.swap_axes(from_axis, to_axis);
        let data = view.as_standard_layout().into_owned();
        Ok((Self { data, space }, detached))
    }

    /// Drops `axis`, keeping the plane at `position`.
    pub fn hyper_slice(&self, axis: usize, position: usize) -> Result<(Self, Vec<DetachedEntry>)> {
        self.check_axis(axis)?;
        let size = self.data.len_of(Axis(axis));
        if position >= size {
            return Err(CoreError::PositionOutOfRange {
                axis,
                position,
                size,
            });
        }
        let (space, detached) = self.space.hyper_slice(axis, position)?;
        let data = self.data.index_axis(Axis(axis), position).to_owned();
        Ok((Self { data, space }, detached))
    }
}

impl<T> Dataset<T>
where
    T: Copy + PartialOrd + Send + Sync,
{
    pub fn min_max(&self) -> Option<(T, T)> {
        match self.data.as_slice_memory_order() {
            Some(values) => values
                .par_chunks(MIN_MAX_CHUNK)
                .map(|chunk| chunk.iter().copied().fold(None, include))
                .reduce(|| None, merge),
            None => self
                .data
                .par_iter()
                .fold(|| None, |acc, value| include(acc, *value))
                .reduce(|| None, merge),
        }
    }
}

pub type DatasetF32 = Dataset<f32>;

impl<T> AnnotatedSpace for Dataset<T> {
    fn num_dimensions(&self) -> usize {
        self.space.num_dimensions()
    }

    fn axis(&self, dimension: usize) -> Result<&CalibratedAxis> {
        self.space.axis(dimension)
    }

    fn set_axis(&mut self, axis: CalibratedAxis, dimension: usize) -> Result<()> {
        self.space.set_axis(axis, dimension)
    }

    fn axes(&self) -> Vec<&CalibratedAxis> {
        self.space.axes()
    }
}

fn validate_shape(shape: &[usize], space: &CalibratedSpace) -> Result<()> {
    if shape.len() != space.num_dimensions() {
        return Err(CoreError::DimensionalityMismatch {
            data_ndim: shape.len(),
            space_ndim: space.num_dimensions(),
        });
    }
    if let Some(axis) = shape.iter().position(|size| *size == 0) {
        return Err(CoreError::ZeroSizedDimension { axis });
    }
    for (axis, (data_size, extent)) in shape.iter().zip(space.extents()).enumerate() {
        if let Some(space_size) = *extent {
            if space_size != *data_size {
                return Err(CoreError::DimensionSizeMismatch {
                    axis,
                    data_size: *data_size,
                    space_size,
                });
            }
        }
    }
    Ok(())
}

fn include<T: Copy + PartialOrd>(acc: Option<(T, T)>, value: T) -> Option<(T, T)> {
    match acc {
        None => Some((value, value)),
        Some((min, max)) => Some((
            if value < min { value } else { min },
            if value > max { value } else { max },
        )),
    }
}

fn merge<T: Copy + PartialOrd>(left: Option<(T, T)>, right: Option<(T, T)>) -> Option<(T, T)> {
    match (left, right) {
        (Some((left_min, left_max)), Some((right_min, right_max))) => Some((
            if right_min < left_min { right_min } else { left_min },
            if right_max > left_max { right_max } else { left_max },
        )),
        (Some(bounds), None) | (None, Some(bounds)) => Some(bounds),
        (None, None) => None,
    }
}
