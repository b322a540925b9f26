mod dataset;
mod error;
mod space;


pub use dataset::{Dataset, DatasetF32};
pub use error::{CoreError, Result};
pub use space::{AnnotatedSpace, CalibratedSpace};
