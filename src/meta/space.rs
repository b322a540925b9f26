use std::any::{Any, type_name};
use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use super::mask::{axes_to_flags, flags_to_axes};
use super::views::{self, Outcome};
use super::{MetaError, MetaItem, MetaObjects, MixedTransform, Result, SimpleItem};

/// Serializable description of one stored item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemSummary {
    pub variant: &'static str,
    pub value_type: &'static str,
    pub attached_to: Option<Vec<usize>>,
    pub varies_with: Option<Vec<usize>>,
}

/// An entry removed because the axes it was attached to no longer exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DetachedEntry {
    Subset { axes: Vec<usize> },
    Varying { name: String },
}

impl fmt::Display for DetachedEntry {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetachedEntry::Subset { axes } => write!(formatter, "objects on axes {axes:?}"),
            DetachedEntry::Varying { name } => write!(formatter, "varying `{name}`"),
        }
    }
}

/// A transformed space together with the entries the transform dropped.
#[derive(Debug, Clone)]
pub struct TransformedMeta {
    pub space: MetaSpace,
    pub detached: Vec<DetachedEntry>,
}

trait ErasedItem: Send + Sync {
    fn transform(&self, transform: &MixedTransform) -> Result<Outcome<Box<dyn ErasedItem>>>;
    fn summary(&self) -> ItemSummary;
    fn clone_box(&self) -> Box<dyn ErasedItem>;
    fn as_any(&self) -> &dyn Any;
}

impl<T> ErasedItem for MetaItem<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn transform(&self, transform: &MixedTransform) -> Result<Outcome<Box<dyn ErasedItem>>> {
        Ok(views::mixed_transform(self, transform)?
            .map(|item| Box::new(item) as Box<dyn ErasedItem>))
    }

    fn summary(&self) -> ItemSummary {
        let (variant, varies_with) = match self {
            MetaItem::Simple(_) => ("simple", None),
            MetaItem::Varying(item) => ("varying", Some(flags_to_axes(item.varies_with()))),
        };
        ItemSummary {
            variant,
            value_type: type_name::<T>(),
            attached_to: self.attached_to().map(flags_to_axes),
            varies_with,
        }
    }

    fn clone_box(&self) -> Box<dyn ErasedItem> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Metadata for an N-dimensional space.
///
/// Each subset of axes touched so far owns one [`MetaObjects`] bag, stored as
/// a [`SimpleItem`] attached to exactly those axes (the empty subset holds
/// global metadata). Position-dependent values live beside them as named
/// [`MetaItem`]s of any value type.
pub struct MetaSpace {
    dims: usize,
    subsets: BTreeMap<Vec<usize>, SimpleItem<MetaObjects>>,
    varying: BTreeMap<String, Box<dyn ErasedItem>>,
}

impl MetaSpace {
    pub fn new(dims: usize) -> Self {
        Self {
            dims,
            subsets: BTreeMap::new(),
            varying: BTreeMap::new(),
        }
    }

    pub fn num_dimensions(&self) -> usize {
        self.dims
    }

    pub fn item(&self, axes: &[usize]) -> Result<Option<&SimpleItem<MetaObjects>>> {
        let key = self.subset_key(axes)?;
        Ok(self.subsets.get(&key))
    }

    /// Objects attached to `axes`, created empty on first access.
    pub fn item_mut(&mut self, axes: &[usize]) -> Result<&mut MetaObjects> {
        let key = self.subset_key(axes)?;
        let dims = self.dims;
        let item = self
            .subsets
            .entry(key)
            .or_insert_with_key(|key| subset_item(MetaObjects::new(), key, dims));
        Ok(item.value_mut())
    }

    pub fn global(&self) -> Option<&MetaObjects> {
        self.subsets.get(&Vec::new()).map(SimpleItem::value)
    }

    pub fn global_mut(&mut self) -> &mut MetaObjects {
        self.subsets
            .entry(Vec::new())
            .or_insert_with(|| SimpleItem::global(MetaObjects::new()))
            .value_mut()
    }

    pub fn subsets(&self) -> impl Iterator<Item = (&[usize], &SimpleItem<MetaObjects>)> {
        self.subsets.iter().map(|(axes, item)| (axes.as_slice(), item))
    }

    pub fn insert_varying<T>(
        &mut self,
        name: impl Into<String>,
        item: impl Into<MetaItem<T>>,
    ) -> Result<()>
    where
        T: Clone + Send + Sync + 'static,
    {
        let item = item.into();
        if let Some(actual) = item.num_dimensions() {
            if actual != self.dims {
                return Err(MetaError::MaskLengthMismatch {
                    expected: self.dims,
                    actual,
                });
            }
        }
        self.varying.insert(name.into(), Box::new(item));
        Ok(())
    }

    pub fn varying<T: 'static>(&self, name: &str) -> Result<Option<&MetaItem<T>>> {
        let Some(item) = self.varying.get(name) else {
            return Ok(None);
        };
        item.as_any()
            .downcast_ref::<MetaItem<T>>()
            .map(Some)
            .ok_or_else(|| MetaError::TypeMismatch {
                name: name.to_string(),
            })
    }

    pub fn remove_varying(&mut self, name: &str) -> bool {
        self.varying.remove(name).is_some()
    }

    pub fn varying_names(&self) -> impl Iterator<Item = &str> {
        self.varying.keys().map(String::as_str)
    }

    pub fn varying_summaries(&self) -> BTreeMap<String, ItemSummary> {
        self.varying
            .iter()
            .map(|(name, item)| (name.clone(), item.summary()))
            .collect()
    }

    /// Re-expresses every entry in the source space of `transform`.
    ///
    /// Entries whose attachment disappears are dropped and reported. When two
    /// subsets land on the same axes their objects are merged; for a key held
    /// by both, the subset that sorts first keeps its value.
    pub fn transform(&self, transform: &MixedTransform) -> Result<TransformedMeta> {
        if transform.target_dims() != self.dims {
            return Err(MetaError::MaskLengthMismatch {
                expected: self.dims,
                actual: transform.target_dims(),
            });
        }

        let mut detached = Vec::new();
        let mut subsets: BTreeMap<Vec<usize>, SimpleItem<MetaObjects>> = BTreeMap::new();
        for (axes, item) in &self.subsets {
            let Some(moved) = views::transform_simple(item, transform)?.into_item() else {
                let entry = DetachedEntry::Subset { axes: axes.clone() };
                debug!(%entry, "metadata detached by transform");
                detached.push(entry);
                continue;
            };
            let key = moved.attached_to().map(flags_to_axes).unwrap_or_default();
            match subsets.get_mut(&key) {
                Some(existing) => {
                    let conflicts = existing.value_mut().merge_missing(moved.into_value());
                    if !conflicts.is_empty() {
                        warn!(
                            ?axes,
                            merged_into = ?key,
                            ?conflicts,
                            "metadata keys collided; kept earlier values"
                        );
                    }
                }
                None => {
                    subsets.insert(key, moved);
                }
            }
        }

        let mut varying = BTreeMap::new();
        for (name, item) in &self.varying {
            match item.transform(transform)?.into_item() {
                Some(moved) => {
                    varying.insert(name.clone(), moved);
                }
                None => {
                    let entry = DetachedEntry::Varying { name: name.clone() };
                    debug!(%entry, "metadata detached by transform");
                    detached.push(entry);
                }
            }
        }

        Ok(TransformedMeta {
            space: MetaSpace {
                dims: transform.source_dims(),
                subsets,
                varying,
            },
            detached,
        })
    }

    pub fn rotated(&self, from_axis: usize, to_axis: usize) -> Result<TransformedMeta> {
        self.transform(&MixedTransform::rotation(self.dims, from_axis, to_axis)?)
    }

    pub fn permuted(&self, from_axis: usize, to_axis: usize) -> Result<TransformedMeta> {
        self.transform(&MixedTransform::permutation(self.dims, from_axis, to_axis)?)
    }

    pub fn hyper_sliced(&self, axis: usize, position: i64) -> Result<TransformedMeta> {
        self.transform(&MixedTransform::hyper_slice(self.dims, axis, position)?)
    }

    fn subset_key(&self, axes: &[usize]) -> Result<Vec<usize>> {
        Ok(flags_to_axes(&axes_to_flags(axes, self.dims)?))
    }
}

fn subset_item(objects: MetaObjects, axes: &[usize], dims: usize) -> SimpleItem<MetaObjects> {
    if axes.is_empty() {
        return SimpleItem::global(objects);
    }
    let mut flags = vec![false; dims];
    for &axis in axes {
        flags[axis] = true;
    }
    SimpleItem::attached(objects, flags)
}

impl Clone for MetaSpace {
    fn clone(&self) -> Self {
        Self {
            dims: self.dims,
            subsets: self.subsets.clone(),
            varying: self
                .varying
                .iter()
                .map(|(name, item)| (name.clone(), item.clone_box()))
                .collect(),
        }
    }
}

impl fmt::Debug for MetaSpace {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("MetaSpace")
            .field("dims", &self.dims)
            .field("subsets", &self.subsets)
            .field("varying", &self.varying_summaries())
            .finish()
    }
}
