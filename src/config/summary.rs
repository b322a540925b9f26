use std::collections::BTreeMap;

use serde::Serialize;

use crate::axis::AxisKind;
use crate::meta::{ItemSummary, MetaObjects};
use crate::model::{AnnotatedSpace, CalibratedSpace};

/// Printable view of a space, as reported by `describe` and recipe runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpaceSummary {
    pub name: Option<String>,
    pub dims: usize,
    pub axes: Vec<AxisSummary>,
    pub subsets: Vec<SubsetSummary>,
    pub varying: BTreeMap<String, ItemSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisSummary {
    pub index: usize,
    pub kind: AxisKind,
    pub unit: Option<String>,
    pub extent: Option<usize>,
    pub calibration: &'static str,
    pub general_equation: &'static str,
    pub particular_equation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubsetSummary {
    pub axes: Vec<usize>,
    pub values: MetaObjects,
}

impl SpaceSummary {
    pub fn from_space(name: Option<String>, space: &CalibratedSpace) -> Self {
        let axes = space
            .axes()
            .into_iter()
            .enumerate()
            .map(|(index, axis)| AxisSummary {
                index,
                kind: axis.kind,
                unit: axis.unit.clone(),
                extent: space.extents().get(index).copied().flatten(),
                calibration: axis.calibration.name(),
                general_equation: axis.general_equation(),
                particular_equation: axis.particular_equation(),
            })
            .collect();
        let subsets = space
            .meta()
            .subsets()
            .map(|(axes, item)| SubsetSummary {
                axes: axes.to_vec(),
                values: item.value().clone(),
            })
            .collect();
        Self {
            name,
            dims: space.num_dimensions(),
            axes,
            subsets,
            varying: space.meta().varying_summaries(),
        }
    }
}
