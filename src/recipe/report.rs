use serde::Serialize;

use crate::config::SpaceSummary;
use crate::meta::DetachedEntry;

use super::TransformStep;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    #[serde(flatten)]
    pub step: TransformStep,
    pub dims_before: usize,
    pub dims_after: usize,
    pub detached: Vec<DetachedEntry>,
    pub duration_us: u128,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeReport {
    pub recipe_name: Option<String>,
    pub steps: Vec<StepReport>,
    pub output: SpaceSummary,
}
