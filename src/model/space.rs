use crate::axis::{AxisKind, CalibratedAxis, default_axis_for_index};
use crate::meta::{DetachedEntry, MetaSpace, MixedTransform};

use super::{CoreError, Result};

/// A space whose dimensions each carry a [`CalibratedAxis`].
pub trait AnnotatedSpace {
    fn num_dimensions(&self) -> usize;

    fn axis(&self, dimension: usize) -> Result<&CalibratedAxis>;

    fn set_axis(&mut self, axis: CalibratedAxis, dimension: usize) -> Result<()>;

    fn axes(&self) -> Vec<&CalibratedAxis> {
        (0..self.num_dimensions())
            .filter_map(|dimension| self.axis(dimension).ok())
            .collect()
    }

    /// First dimension whose axis has the given kind.
    fn axis_index(&self, kind: AxisKind) -> Option<usize> {
        self.axes().iter().position(|axis| axis.kind == kind)
    }

    /// Calibrates every coordinate of a raw position.
    fn calibrated_position(&self, raw: &[f64]) -> Result<Vec<f64>> {
        if raw.len() != self.num_dimensions() {
            return Err(CoreError::DimensionalityMismatch {
                data_ndim: raw.len(),
                space_ndim: self.num_dimensions(),
            });
        }
        raw.iter()
            .enumerate()
            .map(|(dimension, value)| Ok(self.axis(dimension)?.calibrated_value(*value)))
            .collect()
    }
}

/// Axes plus metadata, with no pixel data attached.
///
/// Each dimension may also record its extent. A rotation needs the extent of
/// its destination axis to keep positions non-negative, and a hyper-slice
/// checks its position against it.
#[derive(Debug, Clone)]
pub struct CalibratedSpace {
    axes: Vec<CalibratedAxis>,
    extents: Vec<Option<usize>>,
    meta: MetaSpace,
}

impl CalibratedSpace {
    pub fn new(axes: Vec<CalibratedAxis>) -> Self {
        let meta = MetaSpace::new(axes.len());
        let extents = vec![None; axes.len()];
        Self {
            axes,
            extents,
            meta,
        }
    }

    /// Uncalibrated axes in the conventional dimension order.
    pub fn with_dimensions(dims: usize) -> Self {
        Self::new(
            (0..dims)
                .map(|index| CalibratedAxis::new(default_axis_for_index(index)))
                .collect(),
        )
    }

    pub fn from_parts(axes: Vec<CalibratedAxis>, meta: MetaSpace) -> Result<Self> {
        if meta.num_dimensions() != axes.len() {
            return Err(CoreError::DimensionalityMismatch {
                data_ndim: meta.num_dimensions(),
                space_ndim: axes.len(),
            });
        }
        let extents = vec![None; axes.len()];
        Ok(Self {
            axes,
            extents,
            meta,
        })
    }

    /// Records the extent of every dimension; `None` leaves one unknown.
    pub fn with_extents(mut self, extents: Vec<Option<usize>>) -> Result<Self> {
        if extents.len() != self.axes.len() {
            return Err(CoreError::DimensionalityMismatch {
                data_ndim: extents.len(),
                space_ndim: self.axes.len(),
            });
        }
        if let Some(axis) = extents.iter().position(|extent| *extent == Some(0)) {
            return Err(CoreError::ZeroSizedDimension { axis });
        }
        self.extents = extents;
        Ok(self)
    }

    pub fn extent(&self, dimension: usize) -> Result<Option<usize>> {
        self.extents
            .get(dimension)
            .copied()
            .ok_or(CoreError::AxisOutOfRange {
                axis: dimension,
                dims: self.extents.len(),
            })
    }

    pub fn extents(&self) -> &[Option<usize>] {
        &self.extents
    }

    pub fn meta(&self) -> &MetaSpace {
        &self.meta
    }

    pub fn meta_mut(&mut self) -> &mut MetaSpace {
        &mut self.meta
    }

    /// Views this space through `transform`.
    ///
    /// Each resulting dimension takes a copy of the axis and extent of the
    /// target dimension that reads it; a dimension nothing reads gets an
    /// uncalibrated `Unknown` axis of unknown extent.
    pub fn transform(&self, transform: &MixedTransform) -> Result<(Self, Vec<DetachedEntry>)> {
        let moved = self.meta.transform(transform)?;
        let readers = (0..transform.source_dims())
            .map(|dimension| {
                transform
                    .targets()
                    .iter()
                    .position(|target| target.component_index() == Some(dimension))
            })
            .collect::<Vec<_>>();
        let axes = readers
            .iter()
            .map(|reader| match reader {
                Some(source) => self.axes[*source].clone(),
                None => CalibratedAxis::new(AxisKind::Unknown),
            })
            .collect();
        let extents = readers
            .iter()
            .map(|reader| reader.and_then(|source| self.extents.get(source).copied().flatten()))
            .collect();
        Ok((
            Self {
                axes,
                extents,
                meta: moved.space,
            },
            moved.detached,
        ))
    }

    /// Quarter turn from `from_axis` towards `to_axis`.
    ///
    /// When the extent of `to_axis` is known the result is offset by it, so
    /// the rotated space is indexed from zero like rotated pixel data.
    pub fn rotate(&self, from_axis: usize, to_axis: usize) -> Result<(Self, Vec<DetachedEntry>)> {
        let mut transform = MixedTransform::rotation(self.axes.len(), from_axis, to_axis)?;
        if from_axis != to_axis {
            if let Some(extent) = self.extents[to_axis] {
                transform = transform.translated(to_axis, last_index(extent))?;
            }
        }
        self.transform(&transform)
    }

    pub fn permute(&self, from_axis: usize, to_axis: usize) -> Result<(Self, Vec<DetachedEntry>)> {
        self.transform(&MixedTransform::permutation(
            self.axes.len(),
            from_axis,
            to_axis,
        )?)
    }

    /// Drops `axis`, keeping the plane at `position`.
    pub fn hyper_slice(&self, axis: usize, position: usize) -> Result<(Self, Vec<DetachedEntry>)> {
        if let Some(size) = self.extent(axis)? {
            if position >= size {
                return Err(CoreError::PositionOutOfRange {
                    axis,
                    position,
                    size,
                });
            }
        }
        let fixed = i64::try_from(position).map_err(|_| CoreError::PositionOutOfRange {
            axis,
            position,
            size: i64::MAX as usize,
        })?;
        self.transform(&MixedTransform::hyper_slice(self.axes.len(), axis, fixed)?)
    }
}

fn last_index(extent: usize) -> i64 {
    i64::try_from(extent).map_or(i64::MAX, |extent| extent - 1)
}

impl AnnotatedSpace for CalibratedSpace {
    fn num_dimensions(&self) -> usize {
        self.axes.len()
    }

    fn axis(&self, dimension: usize) -> Result<&CalibratedAxis> {
        self.axes.get(dimension).ok_or(CoreError::AxisOutOfRange {
            axis: dimension,
            dims: self.axes.len(),
        })
    }

    fn set_axis(&mut self, axis: CalibratedAxis, dimension: usize) -> Result<()> {
        let dims = self.axes.len();
        let slot = self
            .axes
            .get_mut(dimension)
            .ok_or(CoreError::AxisOutOfRange {
                axis: dimension,
                dims,
            })?;
        *slot = axis;
        Ok(())
    }

    fn axes(&self) -> Vec<&CalibratedAxis> {
        self.axes.iter().collect()
    }
}
