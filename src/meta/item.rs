use std::fmt;
use std::sync::Arc;

use super::mask::{check_length, count_set};
use super::{Lookup, MetaError, Result, SharedLookup};

/// A single value, optionally attached to a subset of axes.
///
/// Without an attachment mask the item is global: it belongs to the whole
/// space and survives every transform unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleItem<T> {
    value: T,
    attached_to: Option<Vec<bool>>,
}

impl<T> SimpleItem<T> {
    pub fn global(value: T) -> Self {
        Self {
            value,
            attached_to: None,
        }
    }

    pub fn attached(value: T, attached_to: Vec<bool>) -> Self {
        Self {
            value,
            attached_to: Some(attached_to),
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub(crate) fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn attached_to(&self) -> Option<&[bool]> {
        self.attached_to.as_deref()
    }

    pub fn is_global(&self) -> bool {
        self.attached_to.is_none()
    }
}

/// A position-dependent value.
///
/// `varies_with` selects the axes, in ascending order, whose coordinates index
/// the backing lookup. `attached_to` is independent of it and only records
/// which axes own the item.
#[derive(Clone)]
pub struct VaryingItem<T> {
    lookup: SharedLookup<T>,
    varies_with: Vec<bool>,
    attached_to: Option<Vec<bool>>,
}

impl<T> VaryingItem<T> {
    pub fn new(
        lookup: SharedLookup<T>,
        varies_with: Vec<bool>,
        attached_to: Option<Vec<bool>>,
    ) -> Result<Self> {
        let expected = count_set(&varies_with);
        if lookup.num_dimensions() != expected {
            return Err(MetaError::LookupDimensionMismatch {
                expected,
                actual: lookup.num_dimensions(),
            });
        }
        if let Some(attached) = &attached_to {
            check_length(attached, varies_with.len())?;
        }
        Ok(Self {
            lookup,
            varies_with,
            attached_to,
        })
    }

    pub fn from_lookup<L>(lookup: L, varies_with: Vec<bool>) -> Result<Self>
    where
        L: Lookup<T> + 'static,
    {
        Self::new(Arc::new(lookup), varies_with, None)
    }

    pub fn with_attachment(mut self, attached_to: Vec<bool>) -> Result<Self> {
        check_length(&attached_to, self.varies_with.len())?;
        self.attached_to = Some(attached_to);
        Ok(self)
    }

    pub fn lookup(&self) -> &SharedLookup<T> {
        &self.lookup
    }

    pub fn varies_with(&self) -> &[bool] {
        &self.varies_with
    }

    pub fn attached_to(&self) -> Option<&[bool]> {
        self.attached_to.as_deref()
    }

    pub fn get_at(&self, position: &[i64]) -> Result<T> {
        if position.len() != self.varies_with.len() {
            return Err(MetaError::MaskLengthMismatch {
                expected: self.varies_with.len(),
                actual: position.len(),
            });
        }
        let local = position
            .iter()
            .zip(&self.varies_with)
            .filter_map(|(coordinate, varies)| varies.then_some(*coordinate))
            .collect::<Vec<_>>();
        self.lookup.get(&local).ok_or_else(|| MetaError::OutOfBounds {
            position: position.to_vec(),
        })
    }
}

impl<T> fmt::Debug for VaryingItem<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("VaryingItem")
            .field("lookup_dims", &self.lookup.num_dimensions())
            .field("varies_with", &self.varies_with)
            .field("attached_to", &self.attached_to)
            .finish()
    }
}

/// Metadata attached to an N-dimensional space.
#[derive(Debug, Clone)]
pub enum MetaItem<T> {
    Simple(SimpleItem<T>),
    Varying(VaryingItem<T>),
}

impl<T: Clone> MetaItem<T> {
    pub fn get_at(&self, position: &[i64]) -> Result<T> {
        match self {
            MetaItem::Simple(item) => Ok(item.value.clone()),
            MetaItem::Varying(item) => item.get_at(position),
        }
    }
}

impl<T> MetaItem<T> {
    /// Dimensionality of the space the item's masks describe, or `None` for
    /// a global simple item.
    pub fn num_dimensions(&self) -> Option<usize> {
        match self {
            MetaItem::Simple(item) => item.attached_to.as_ref().map(Vec::len),
            MetaItem::Varying(item) => Some(item.varies_with.len()),
        }
    }

    pub fn attached_to(&self) -> Option<&[bool]> {
        match self {
            MetaItem::Simple(item) => item.attached_to(),
            MetaItem::Varying(item) => item.attached_to(),
        }
    }

    pub fn as_simple(&self) -> Option<&SimpleItem<T>> {
        match self {
            MetaItem::Simple(item) => Some(item),
            MetaItem::Varying(_) => None,
        }
    }

    pub fn as_varying(&self) -> Option<&VaryingItem<T>> {
        match self {
            MetaItem::Simple(_) => None,
            MetaItem::Varying(item) => Some(item),
        }
    }
}

impl<T> From<SimpleItem<T>> for MetaItem<T> {
    fn from(item: SimpleItem<T>) -> Self {
        MetaItem::Simple(item)
    }
}

impl<T> From<VaryingItem<T>> for MetaItem<T> {
    fn from(item: VaryingItem<T>) -> Self {
        MetaItem::Varying(item)
    }
}
