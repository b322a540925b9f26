use std::collections::{BTreeMap, BTreeSet};

use ndarray::{ArrayD, IxDyn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::axis::CalibratedAxis;
use crate::meta::{ArrayLookup, MetaItem, VaryingItem, axes_to_flags};
use crate::model::CalibratedSpace;

use super::{ConfigError, Result, SpaceSummary};

/// Serialized form of a [`CalibratedSpace`]: its axes, the metadata objects
/// attached to axis subsets, and numeric tables that vary along some axes.
///
/// Extents not given in `shape` are taken from the varying tables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpaceDescriptor {
    pub name: Option<String>,
    pub axes: Vec<CalibratedAxis>,
    #[serde(default)]
    pub shape: Option<Vec<usize>>,
    #[serde(default)]
    pub metadata: Vec<SubsetDescriptor>,
    #[serde(default)]
    pub varying: Vec<VaryingDescriptor>,
}

/// Objects attached to one subset of axes; an empty subset is global.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubsetDescriptor {
    #[serde(default)]
    pub axes: Vec<usize>,
    #[serde(default)]
    pub values: BTreeMap<String, Value>,
}

/// A row-major `f64` table indexed by the coordinates of `varies_with`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VaryingDescriptor {
    pub name: String,
    pub varies_with: Vec<usize>,
    #[serde(default)]
    pub attached_to: Option<Vec<usize>>,
    pub shape: Vec<usize>,
    pub values: Vec<f64>,
}

impl SpaceDescriptor {
    pub fn validate(&self) -> Result<()> {
        if self.axes.is_empty() {
            return Err(ConfigError::Invalid(
                "space must declare at least one axis".to_string(),
            ));
        }
        if let Some(shape) = &self.shape {
            if shape.len() != self.axes.len() {
                return Err(ConfigError::Invalid(format!(
                    "shape has {} entries for {} axes",
                    shape.len(),
                    self.axes.len()
                )));
            }
            if shape.contains(&0) {
                return Err(ConfigError::Invalid(
                    "shape must not contain zero-sized axes".to_string(),
                ));
            }
        }
        let mut names = BTreeSet::new();
        for entry in &self.varying {
            if entry.name.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "varying entry has an empty name".to_string(),
                ));
            }
            if !names.insert(entry.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "varying entry `{}` is declared twice",
                    entry.name
                )));
            }
            entry.validate()?;
        }
        Ok(())
    }

    pub fn build(&self) -> Result<CalibratedSpace> {
        self.validate()?;
        let dims = self.axes.len();
        let mut space = CalibratedSpace::new(self.axes.clone()).with_extents(self.extents()?)?;

        for subset in &self.metadata {
            let objects = space.meta_mut().item_mut(&subset.axes)?;
            for (key, value) in &subset.values {
                objects.insert(key.clone(), value.clone());
            }
        }

        for entry in &self.varying {
            let item = entry.to_item(dims)?;
            debug!(
                entry = %entry.name,
                varies_with = ?entry.varies_with,
                "loaded varying table"
            );
            space.meta_mut().insert_varying(entry.name.clone(), item)?;
        }
        Ok(space)
    }

    /// Declared extents, completed from the varying tables.
    fn extents(&self) -> Result<Vec<Option<usize>>> {
        let mut extents: Vec<Option<usize>> = match &self.shape {
            Some(shape) => shape.iter().copied().map(Some).collect(),
            None => vec![None; self.axes.len()],
        };
        for entry in &self.varying {
            for (axis, size) in entry.varies_with.iter().zip(&entry.shape) {
                let slot = extents.get_mut(*axis).ok_or_else(|| {
                    ConfigError::Invalid(format!(
                        "varying entry `{}` varies with axis {axis} of a {}-dimensional space",
                        entry.name,
                        self.axes.len()
                    ))
                })?;
                match *slot {
                    Some(known) if known != *size => {
                        return Err(ConfigError::Invalid(format!(
                            "varying entry `{}` has {size} values along axis {axis}, \
                             which has extent {known}",
                            entry.name
                        )));
                    }
                    _ => *slot = Some(*size),
                }
            }
        }
        Ok(extents)
    }

    pub fn summarize(&self) -> Result<SpaceSummary> {
        let space = self.build()?;
        Ok(SpaceSummary::from_space(self.name.clone(), &space))
    }
}

impl VaryingDescriptor {
    fn validate(&self) -> Result<()> {
        if self.varies_with.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(ConfigError::Invalid(format!(
                "varying entry `{}` must list `varies_with` axes in ascending order",
                self.name
            )));
        }
        if self.shape.len() != self.varies_with.len() {
            return Err(ConfigError::Invalid(format!(
                "varying entry `{}` has a {}-dimensional shape for {} varying axes",
                self.name,
                self.shape.len(),
                self.varies_with.len()
            )));
        }
        let expected = self.shape.iter().product::<usize>();
        if expected != self.values.len() {
            return Err(ConfigError::Invalid(format!(
                "varying entry `{}` expects {expected} values but has {}",
                self.name,
                self.values.len()
            )));
        }
        Ok(())
    }

    fn to_item(&self, dims: usize) -> Result<MetaItem<f64>> {
        let table = ArrayD::from_shape_vec(IxDyn(&self.shape), self.values.clone())
            .map_err(|error| ConfigError::Invalid(format!("{}: {error}", self.name)))?;
        let mut item = VaryingItem::from_lookup(
            ArrayLookup::new(table),
            axes_to_flags(&self.varies_with, dims)?,
        )?;
        if let Some(attached) = &self.attached_to {
            item = item.with_attachment(axes_to_flags(attached, dims)?)?;
        }
        Ok(item.into())
    }
}
