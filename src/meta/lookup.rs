use std::fmt;
use std::sync::Arc;

use ndarray::{ArrayD, IxDyn};

use super::MixedTransform;

/// Position-indexed store backing a varying metadata item.
///
/// `get` returns `None` for positions outside the lookup's domain or with the
/// wrong number of coordinates.
pub trait Lookup<T>: Send + Sync {
    fn num_dimensions(&self) -> usize;
    fn get(&self, position: &[i64]) -> Option<T>;
}

pub type SharedLookup<T> = Arc<dyn Lookup<T>>;

/// Dense lookup over an ndarray, indexed from the origin.
#[derive(Debug, Clone)]
pub struct ArrayLookup<T> {
    data: ArrayD<T>,
}

impl<T> ArrayLookup<T> {
    pub fn new(data: ArrayD<T>) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &ArrayD<T> {
        &self.data
    }
}

impl<T: Clone + Send + Sync> Lookup<T> for ArrayLookup<T> {
    fn num_dimensions(&self) -> usize {
        self.data.ndim()
    }

    fn get(&self, position: &[i64]) -> Option<T> {
        if position.len() != self.data.ndim() {
            return None;
        }
        let index = position
            .iter()
            .map(|coordinate| usize::try_from(*coordinate).ok())
            .collect::<Option<Vec<_>>>()?;
        self.data.get(IxDyn(&index)).cloned()
    }
}

/// Procedural lookup computed by a closure.
pub struct FnLookup<F> {
    dims: usize,
    function: F,
}

impl<F> FnLookup<F> {
    pub fn new(dims: usize, function: F) -> Self {
        Self { dims, function }
    }
}

impl<F> fmt::Debug for FnLookup<F> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("FnLookup")
            .field("dims", &self.dims)
            .finish()
    }
}

impl<T, F> Lookup<T> for FnLookup<F>
where
    F: Fn(&[i64]) -> Option<T> + Send + Sync,
{
    fn num_dimensions(&self) -> usize {
        self.dims
    }

    fn get(&self, position: &[i64]) -> Option<T> {
        if position.len() != self.dims {
            return None;
        }
        (self.function)(position)
    }
}

/// A lookup read through a [`MixedTransform`]: positions are given in the
/// transform's source space and resolved in the wrapped lookup.
pub struct TransformedLookup<T> {
    source: SharedLookup<T>,
    transform: MixedTransform,
}

impl<T> TransformedLookup<T> {
    pub fn new(source: SharedLookup<T>, transform: MixedTransform) -> Self {
        Self { source, transform }
    }

    pub fn transform(&self) -> &MixedTransform {
        &self.transform
    }
}

impl<T> fmt::Debug for TransformedLookup<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("TransformedLookup")
            .field("source_dims", &self.source.num_dimensions())
            .field("transform", &self.transform)
            .finish()
    }
}

impl<T> Lookup<T> for TransformedLookup<T> {
    fn num_dimensions(&self) -> usize {
        self.transform.source_dims()
    }

    fn get(&self, position: &[i64]) -> Option<T> {
        let target = self.transform.apply(position).ok()?;
        self.source.get(&target)
    }
}
