use std::fs;
use std::path::Path;

use crate::config::is_yaml;

use super::{RecipeReport, Result, TransformRecipe};

pub fn load_recipe(path: impl AsRef<Path>) -> Result<TransformRecipe> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)?;
    let recipe = if is_yaml(path) {
        serde_yaml::from_str::<TransformRecipe>(&raw)?
    } else {
        serde_json::from_str::<TransformRecipe>(&raw)?
    };
    recipe.validate()?;
    Ok(recipe)
}

pub fn save_report(path: impl AsRef<Path>, report: &RecipeReport) -> Result<()> {
    let path = path.as_ref();
    let serialized = if is_yaml(path) {
        serde_yaml::to_string(report)?
    } else {
        serde_json::to_string_pretty(report)?
    };
    fs::write(path, serialized)?;
    Ok(())
}
