use serde::{Deserialize, Serialize};

use super::{RecipeError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransformRecipe {
    pub name: Option<String>,
    #[serde(default)]
    pub steps: Vec<TransformStep>,
}

/// One axis operation applied to a whole space.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TransformStep {
    Rotate { from: usize, to: usize },
    Permute { from: usize, to: usize },
    HyperSlice { axis: usize, position: usize },
}

impl TransformStep {
    pub fn label(&self) -> &'static str {
        match self {
            TransformStep::Rotate { .. } => "rotate",
            TransformStep::Permute { .. } => "permute",
            TransformStep::HyperSlice { .. } => "hyper_slice",
        }
    }

    /// Dimensionality after applying the step to a `dims`-dimensional space.
    pub fn output_dims(&self, dims: usize) -> usize {
        match self {
            TransformStep::HyperSlice { .. } => dims.saturating_sub(1),
            _ => dims,
        }
    }

    fn axes(&self) -> Vec<usize> {
        match *self {
            TransformStep::Rotate { from, to } | TransformStep::Permute { from, to } => {
                vec![from, to]
            }
            TransformStep::HyperSlice { axis, .. } => vec![axis],
        }
    }
}

impl TransformRecipe {
    pub fn validate(&self) -> Result<()> {
        if self.steps.is_empty() {
            return Err(RecipeError::Parse(
                "recipe must include at least one step".to_string(),
            ));
        }
        Ok(())
    }

    /// Checks every step's axes against the dimensionality it will see.
    pub fn validate_for(&self, dims: usize) -> Result<()> {
        self.validate()?;
        let mut dims = dims;
        for (index, step) in self.steps.iter().enumerate() {
            if let Some(axis) = step.axes().into_iter().find(|axis| *axis >= dims) {
                return Err(RecipeError::Parse(format!(
                    "step {index} (`{}`) uses axis {axis} of a {dims}-dimensional space",
                    step.label()
                )));
            }
            dims = step.output_dims(dims);
        }
        Ok(())
    }
}
