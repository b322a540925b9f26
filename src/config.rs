mod descriptor;
mod error;
mod io;
mod summary;


pub use descriptor::{SpaceDescriptor, SubsetDescriptor, VaryingDescriptor};
pub use error::{ConfigError, Result};
pub(crate) use io::is_yaml;
pub use io::{load_descriptor, save_descriptor};
pub use summary::{AxisSummary, SpaceSummary, SubsetSummary};
