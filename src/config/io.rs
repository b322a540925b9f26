use std::fs;
use std::path::Path;

use super::{Result, SpaceDescriptor};

pub fn load_descriptor(path: impl AsRef<Path>) -> Result<SpaceDescriptor> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)?;
    let descriptor = if is_yaml(path) {
        serde_yaml::from_str::<SpaceDescriptor>(&raw)?
    } else {
        serde_json::from_str::<SpaceDescriptor>(&raw)?
    };
    descriptor.validate()?;
    Ok(descriptor)
}

pub fn save_descriptor(path: impl AsRef<Path>, descriptor: &SpaceDescriptor) -> Result<()> {
    let path = path.as_ref();
    let serialized = if is_yaml(path) {
        serde_yaml::to_string(descriptor)?
    } else {
        serde_json::to_string_pretty(descriptor)?
    };
    fs::write(path, serialized)?;
    Ok(())
}

/// Whether `path` names a YAML file; anything else is read and written as JSON.
pub(crate) fn is_yaml(path: &Path) -> bool {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    matches!(extension.as_str(), "yaml" | "yml")
}
