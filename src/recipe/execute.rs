use std::time::Instant;

use tracing::{debug, info};

use crate::config::SpaceSummary;
use crate::meta::DetachedEntry;
use crate::model::{self, AnnotatedSpace, CalibratedSpace, Dataset};

use super::{RecipeReport, Result, StepReport, TransformRecipe, TransformStep};

/// Anything a recipe can be run against.
pub trait RecipeTarget: AnnotatedSpace + Clone + Sized {
    fn apply_step(&self, step: &TransformStep) -> model::Result<(Self, Vec<DetachedEntry>)>;

    fn calibrated_space(&self) -> &CalibratedSpace;
}

impl RecipeTarget for CalibratedSpace {
    fn apply_step(&self, step: &TransformStep) -> model::Result<(Self, Vec<DetachedEntry>)> {
        match *step {
            TransformStep::Rotate { from, to } => self.rotate(from, to),
            TransformStep::Permute { from, to } => self.permute(from, to),
            TransformStep::HyperSlice { axis, position } => self.hyper_slice(axis, position),
        }
    }

    fn calibrated_space(&self) -> &CalibratedSpace {
        self
    }
}

impl<T: Clone> RecipeTarget for Dataset<T> {
    fn apply_step(&self, step: &TransformStep) -> model::Result<(Self, Vec<DetachedEntry>)> {
        match *step {
            TransformStep::Rotate { from, to } => self.rotate(from, to),
            TransformStep::Permute { from, to } => self.permute(from, to),
            TransformStep::HyperSlice { axis, position } => self.hyper_slice(axis, position),
        }
    }

    fn calibrated_space(&self) -> &CalibratedSpace {
        self.space()
    }
}

pub fn run_recipe<S: RecipeTarget>(
    recipe: &TransformRecipe,
    target: &S,
) -> Result<(S, RecipeReport)> {
    recipe.validate_for(target.num_dimensions())?;

    let mut current = target.clone();
    let mut steps = Vec::with_capacity(recipe.steps.len());

    for (index, step) in recipe.steps.iter().enumerate() {
        let started = Instant::now();
        let dims_before = current.num_dimensions();
        let (next, detached) = current.apply_step(step)?;
        let duration_us = started.elapsed().as_micros();
        debug!(
            step = index,
            op = step.label(),
            detached = detached.len(),
            "applied transform step"
        );
        steps.push(StepReport {
            step: *step,
            dims_before,
            dims_after: next.num_dimensions(),
            detached,
            duration_us,
        });
        current = next;
    }

    info!(
        recipe = recipe.name.as_deref().unwrap_or("unnamed"),
        steps = steps.len(),
        dims = current.num_dimensions(),
        "recipe finished"
    );
    let report = RecipeReport {
        recipe_name: recipe.name.clone(),
        steps,
        output: SpaceSummary::from_space(recipe.name.clone(), current.calibrated_space()),
    };
    Ok((current, report))
}
