use std::sync::Arc;

use super::mask::count_set;
use super::{
    AxisSource, MetaError, MetaItem, MixedTransform, Result, SharedLookup, SimpleItem, TargetAxis,
    TransformedLookup, VaryingItem,
};

/// Result of moving a metadata item through a transform.
#[derive(Debug, Clone)]
pub enum Outcome<I> {
    /// The transform cannot affect the item; it is returned as is.
    Unchanged(I),
    /// A new item re-expressed in the transformed space.
    Transformed(I),
    /// Every axis the item was attached to has been removed.
    Detached,
}

impl<I> Outcome<I> {
    pub fn item(&self) -> Option<&I> {
        match self {
            Outcome::Unchanged(item) | Outcome::Transformed(item) => Some(item),
            Outcome::Detached => None,
        }
    }

    pub fn into_item(self) -> Option<I> {
        match self {
            Outcome::Unchanged(item) | Outcome::Transformed(item) => Some(item),
            Outcome::Detached => None,
        }
    }

    pub fn is_detached(&self) -> bool {
        matches!(self, Outcome::Detached)
    }

    pub fn map<J>(self, f: impl FnOnce(I) -> J) -> Outcome<J> {
        match self {
            Outcome::Unchanged(item) => Outcome::Unchanged(f(item)),
            Outcome::Transformed(item) => Outcome::Transformed(f(item)),
            Outcome::Detached => Outcome::Detached,
        }
    }
}

pub type ItemOutcome<T> = Outcome<MetaItem<T>>;

/// Rotates `from_axis` onto `to_axis`, mirroring the axis that moves.
pub fn rotate<T>(item: &MetaItem<T>, from_axis: usize, to_axis: usize) -> Result<ItemOutcome<T>>
where
    T: Clone + 'static,
{
    if from_axis == to_axis {
        return Ok(Outcome::Unchanged(item.clone()));
    }
    let Some(dims) = item.num_dimensions() else {
        return Ok(Outcome::Unchanged(item.clone()));
    };
    mixed_transform(item, &MixedTransform::rotation(dims, from_axis, to_axis)?)
}

/// Swaps `from_axis` and `to_axis`.
pub fn permute<T>(item: &MetaItem<T>, from_axis: usize, to_axis: usize) -> Result<ItemOutcome<T>>
where
    T: Clone + 'static,
{
    if from_axis == to_axis {
        return Ok(Outcome::Unchanged(item.clone()));
    }
    let Some(dims) = item.num_dimensions() else {
        return Ok(Outcome::Unchanged(item.clone()));
    };
    mixed_transform(item, &MixedTransform::permutation(dims, from_axis, to_axis)?)
}

/// Removes `axis` by fixing it at `position`.
pub fn hyper_slice<T>(item: &MetaItem<T>, axis: usize, position: i64) -> Result<ItemOutcome<T>>
where
    T: Clone + 'static,
{
    let Some(dims) = item.num_dimensions() else {
        return Ok(Outcome::Unchanged(item.clone()));
    };
    mixed_transform(item, &MixedTransform::hyper_slice(dims, axis, position)?)
}

/// Re-expresses `item` in the source space of `transform`.
///
/// The item's masks are indexed by the transform's target axes and must have
/// exactly `transform.target_dims()` entries.
pub fn mixed_transform<T>(
    item: &MetaItem<T>,
    transform: &MixedTransform,
) -> Result<ItemOutcome<T>>
where
    T: Clone + 'static,
{
    match item {
        MetaItem::Simple(simple) => {
            Ok(transform_simple(simple, transform)?.map(MetaItem::Simple))
        }
        MetaItem::Varying(varying) => transform_varying(varying, transform),
    }
}

/// Moves a simple item's attachment mask into the source space of `transform`.
pub fn transform_simple<T: Clone>(
    item: &SimpleItem<T>,
    transform: &MixedTransform,
) -> Result<Outcome<SimpleItem<T>>> {
    let Some(attached) = item.attached_to() else {
        return Ok(Outcome::Unchanged(item.clone()));
    };
    let attached = transform.remap_flags(attached)?;
    if !attached.contains(&true) {
        return Ok(Outcome::Detached);
    }
    Ok(Outcome::Transformed(SimpleItem::attached(
        item.value().clone(),
        attached,
    )))
}

fn transform_varying<T>(
    item: &VaryingItem<T>,
    transform: &MixedTransform,
) -> Result<ItemOutcome<T>>
where
    T: Clone + 'static,
{
    let attached = item
        .attached_to()
        .map(|attached| transform.remap_flags(attached))
        .transpose()?;
    if attached
        .as_ref()
        .is_some_and(|attached| !attached.contains(&true))
    {
        return Ok(Outcome::Detached);
    }

    let varies_with = transform.remap_flags(item.varies_with())?;
    let local = local_transform(item.varies_with(), &varies_with, transform);

    if count_set(&varies_with) == 0 {
        // Every variation axis is pinned; the lookup collapses to one value.
        let position = local.apply(&[])?;
        let value = item
            .lookup()
            .get(&position)
            .ok_or(MetaError::OutOfBounds { position })?;
        let simple = match attached {
            Some(attached) => SimpleItem::attached(value, attached),
            None => SimpleItem::global(value),
        };
        return Ok(Outcome::Transformed(MetaItem::Simple(simple)));
    }

    let lookup: SharedLookup<T> = if local.is_identity() {
        Arc::clone(item.lookup())
    } else {
        Arc::new(TransformedLookup::new(Arc::clone(item.lookup()), local))
    };
    let varying = VaryingItem::new(lookup, varies_with, attached)?;
    Ok(Outcome::Transformed(MetaItem::Varying(varying)))
}

/// Restricts `transform` to the axes an item varies with, producing the
/// mapping from the new lookup's coordinates to the old lookup's coordinates.
fn local_transform(
    old_varies: &[bool],
    new_varies: &[bool],
    transform: &MixedTransform,
) -> MixedTransform {
    let mut rank = vec![0; new_varies.len()];
    let mut next = 0;
    for (axis, varies) in new_varies.iter().enumerate() {
        if *varies {
            rank[axis] = next;
            next += 1;
        }
    }

    let targets = transform
        .targets()
        .iter()
        .zip(old_varies)
        .filter(|(_, varies)| **varies)
        .map(|(target, _)| TargetAxis {
            translation: target.translation,
            source: match target.source {
                AxisSource::Fixed => AxisSource::Fixed,
                AxisSource::Component { index, inverted } => AxisSource::Component {
                    index: rank[index],
                    inverted,
                },
            },
        })
        .collect();

    MixedTransform::from_parts(next, targets)
}
