use serde::{Deserialize, Serialize};

use super::{MetaError, Result};

/// Where a target axis takes its coordinate from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisSource {
    /// The axis is dropped from the view and pinned at its translation.
    Fixed,
    /// The axis follows view axis `index`, optionally mirrored.
    Component { index: usize, inverted: bool },
}

/// Mapping for one axis of the target space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetAxis {
    pub translation: i64,
    pub source: AxisSource,
}

impl TargetAxis {
    pub fn component(index: usize) -> Self {
        Self {
            translation: 0,
            source: AxisSource::Component {
                index,
                inverted: false,
            },
        }
    }

    pub fn inverted(index: usize) -> Self {
        Self {
            translation: 0,
            source: AxisSource::Component {
                index,
                inverted: true,
            },
        }
    }

    pub fn fixed(position: i64) -> Self {
        Self {
            translation: position,
            source: AxisSource::Fixed,
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self.source, AxisSource::Fixed)
    }

    pub fn component_index(&self) -> Option<usize> {
        match self.source {
            AxisSource::Fixed => None,
            AxisSource::Component { index, .. } => Some(index),
        }
    }
}

/// Mixed affine, permutation and slicing transform between two integer spaces.
///
/// A transform views an `m`-dimensional target space through an
/// `n`-dimensional source space: a source (view) position `v` reads the target
/// position `t` with
///
/// ```text
/// t[d] = translation[d]                      if axis d is fixed
/// t[d] = translation[d] + v[component[d]]    otherwise
/// t[d] = translation[d] - v[component[d]]    if axis d is inverted
/// ```
///
/// Metadata attached to target axes therefore moves to the source axes named
/// by the component mapping, and disappears with fixed axes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixedTransform {
    source_dims: usize,
    targets: Vec<TargetAxis>,
}

impl MixedTransform {
    pub fn new(source_dims: usize, targets: Vec<TargetAxis>) -> Result<Self> {
        for target in &targets {
            if let Some(index) = target.component_index() {
                if index >= source_dims {
                    return Err(MetaError::AxisOutOfRange {
                        axis: index,
                        dims: source_dims,
                    });
                }
            }
        }
        Ok(Self {
            source_dims,
            targets,
        })
    }

    /// Builds a transform whose component indices are known to be in range.
    pub(crate) fn from_parts(source_dims: usize, targets: Vec<TargetAxis>) -> Self {
        debug_assert!(
            targets
                .iter()
                .filter_map(TargetAxis::component_index)
                .all(|index| index < source_dims)
        );
        Self {
            source_dims,
            targets,
        }
    }

    pub fn identity(dims: usize) -> Self {
        Self {
            source_dims: dims,
            targets: (0..dims).map(TargetAxis::component).collect(),
        }
    }

    /// Quarter turn from `from_axis` towards `to_axis`: the view's `from_axis`
    /// runs backwards along the target's `to_axis`.
    pub fn rotation(dims: usize, from_axis: usize, to_axis: usize) -> Result<Self> {
        check_axis(from_axis, dims)?;
        check_axis(to_axis, dims)?;
        let mut transform = Self::identity(dims);
        if from_axis != to_axis {
            transform.targets[to_axis] = TargetAxis::inverted(from_axis);
            transform.targets[from_axis] = TargetAxis::component(to_axis);
        }
        Ok(transform)
    }

    pub fn permutation(dims: usize, from_axis: usize, to_axis: usize) -> Result<Self> {
        check_axis(from_axis, dims)?;
        check_axis(to_axis, dims)?;
        let mut transform = Self::identity(dims);
        transform.targets.swap(from_axis, to_axis);
        Ok(transform)
    }

    /// Drops `axis` from a `dims`-dimensional space by pinning it at `position`.
    pub fn hyper_slice(dims: usize, axis: usize, position: i64) -> Result<Self> {
        check_axis(axis, dims)?;
        let targets = (0..dims)
            .map(|d| match d.cmp(&axis) {
                std::cmp::Ordering::Less => TargetAxis::component(d),
                std::cmp::Ordering::Equal => TargetAxis::fixed(position),
                std::cmp::Ordering::Greater => TargetAxis::component(d - 1),
            })
            .collect();
        Ok(Self {
            source_dims: dims - 1,
            targets,
        })
    }

    pub fn translated(mut self, axis: usize, offset: i64) -> Result<Self> {
        let dims = self.targets.len();
        let target = self
            .targets
            .get_mut(axis)
            .ok_or(MetaError::AxisOutOfRange { axis, dims })?;
        target.translation = target
            .translation
            .checked_add(offset)
            .ok_or(MetaError::TranslationOverflow { axis, offset })?;
        Ok(self)
    }

    pub fn source_dims(&self) -> usize {
        self.source_dims
    }

    pub fn target_dims(&self) -> usize {
        self.targets.len()
    }

    pub fn targets(&self) -> &[TargetAxis] {
        &self.targets
    }

    pub fn is_identity(&self) -> bool {
        self.source_dims == self.targets.len()
            && self
                .targets
                .iter()
                .enumerate()
                .all(|(d, target)| *target == TargetAxis::component(d))
    }

    /// Maps a source (view) position onto the target space.
    ///
    /// A position whose image does not fit in `i64` is out of bounds.
    pub fn apply(&self, source: &[i64]) -> Result<Vec<i64>> {
        if source.len() != self.source_dims {
            return Err(MetaError::MaskLengthMismatch {
                expected: self.source_dims,
                actual: source.len(),
            });
        }
        self.targets
            .iter()
            .map(|target| match target.source {
                AxisSource::Fixed => Some(target.translation),
                AxisSource::Component { index, inverted } => {
                    if inverted {
                        target.translation.checked_sub(source[index])
                    } else {
                        target.translation.checked_add(source[index])
                    }
                }
            })
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| MetaError::OutOfBounds {
                position: source.to_vec(),
            })
    }

    /// Re-expresses a target-space mask over the source axes.
    pub fn remap_flags(&self, flags: &[bool]) -> Result<Vec<bool>> {
        super::mask::check_length(flags, self.target_dims())?;
        let mut remapped = vec![false; self.source_dims];
        for (target, _) in self.targets.iter().zip(flags).filter(|(_, flag)| **flag) {
            if let Some(index) = target.component_index() {
                remapped[index] = true;
            }
        }
        Ok(remapped)
    }
}

fn check_axis(axis: usize, dims: usize) -> Result<()> {
    if axis >= dims {
        return Err(MetaError::AxisOutOfRange { axis, dims });
    }
    Ok(())
}
