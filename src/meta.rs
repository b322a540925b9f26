mod error;
mod item;
mod lookup;
mod mask;
mod objects;
mod space;
mod transform;
mod views;

#[cfg(test)]
mod tests;

pub use error::{MetaError, Result};
pub use item::{MetaItem, SimpleItem, VaryingItem};
pub use lookup::{ArrayLookup, FnLookup, Lookup, SharedLookup, TransformedLookup};
pub use mask::{axes_to_flags, flags_to_axes};
pub use objects::MetaObjects;
pub use space::{DetachedEntry, ItemSummary, MetaSpace, TransformedMeta};
pub use transform::{AxisSource, MixedTransform, TargetAxis};
pub use views::{
    ItemOutcome, Outcome, hyper_slice, mixed_transform, permute, rotate, transform_simple,
};
