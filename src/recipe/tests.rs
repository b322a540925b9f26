use std::fs;

use ndarray::{Array, IxDyn};
use serde_json::{Value, json};
use tempfile::tempdir;

use super::{
    RecipeError, TransformRecipe, TransformStep, load_recipe, run_recipe, save_report,
};
use crate::axis::{AxisKind, CalibratedAxis};
use crate::meta::{ArrayLookup, DetachedEntry, MetaItem, VaryingItem};
use crate::model::{AnnotatedSpace, CalibratedSpace, Dataset};

const FLIP_YAML: &str = r#"
name: flip
steps:
  - op: rotate
    from: 0
    to: 1
  - op: hyper_slice
    axis: 1
    position: 2
"#;

fn test_space() -> CalibratedSpace {
    let mut space = CalibratedSpace::new(vec![
        CalibratedAxis::linear(AxisKind::Y, "um", 0.0, 0.5),
        CalibratedAxis::linear(AxisKind::X, "um", 0.0, 0.5),
        CalibratedAxis::new(AxisKind::Z),
    ]);
    let meta = space.meta_mut();
    meta.global_mut().insert("title", "stack");
    meta.item_mut(&[2]).expect("z").insert("focus", "auto");
    space
}

fn flip_and_slice() -> TransformRecipe {
    TransformRecipe {
        name: Some("flip".to_string()),
        steps: vec![
            TransformStep::Rotate { from: 0, to: 1 },
            TransformStep::HyperSlice {
                axis: 2,
                position: 0,
            },
            TransformStep::Permute { from: 0, to: 1 },
        ],
    }
}

#[test]
fn recipe_steps_execute_in_order() {
    let (space, report) = run_recipe(&flip_and_slice(), &test_space()).expect("recipe");
    assert_eq!(report.steps.len(), 3);
    let dims = report
        .steps
        .iter()
        .map(|step| (step.dims_before, step.dims_after))
        .collect::<Vec<_>>();
    assert_eq!(dims, vec![(3, 3), (3, 2), (2, 2)]);
    assert!(report.steps[0].detached.is_empty());
    assert_eq!(
        report.steps[1].detached,
        vec![DetachedEntry::Subset { axes: vec![2] }]
    );

    let kinds = space.axes().iter().map(|axis| axis.kind).collect::<Vec<_>>();
    assert_eq!(kinds, vec![AxisKind::Y, AxisKind::X]);
    assert_eq!(report.output.dims, 2);
    assert_eq!(report.output.subsets.len(), 1);
    assert_eq!(
        space.meta().global().and_then(|objects| objects.get("title")),
        Some(&json!("stack"))
    );
}

#[test]
fn recipe_moves_dataset_pixels_like_direct_calls() {
    let data = Array::from_shape_vec(IxDyn(&[2, 3, 4]), (0..24).collect::<Vec<u16>>())
        .expect("shape");
    let dataset = Dataset::from_data(data);
    let recipe = TransformRecipe {
        name: None,
        steps: vec![
            TransformStep::Rotate { from: 0, to: 1 },
            TransformStep::HyperSlice {
                axis: 2,
                position: 3,
            },
        ],
    };
    let (result, report) = run_recipe(&recipe, &dataset).expect("recipe");

    let (rotated, _) = dataset.rotate(0, 1).expect("rotate");
    let (expected, _) = rotated.hyper_slice(2, 3).expect("slice");
    assert_eq!(result.shape(), &[3, 2]);
    assert_eq!(result.data, expected.data);
    assert_eq!(report.recipe_name, None);
    assert_eq!(result.min_max(), Some((3, 23)));
}

fn with_column_times(space: &mut CalibratedSpace) {
    let times: MetaItem<f64> = VaryingItem::from_lookup(
        ArrayLookup::new(Array::from(vec![1.0, 2.0, 3.0]).into_dyn()),
        vec![false, true],
    )
    .expect("varying")
    .into();
    space.meta_mut().insert_varying("time", times).expect("insert");
}

#[test]
fn sized_space_follows_a_dataset_through_rotation() {
    let recipe = TransformRecipe {
        name: None,
        steps: vec![
            TransformStep::Rotate { from: 0, to: 1 },
            TransformStep::HyperSlice {
                axis: 0,
                position: 1,
            },
        ],
    };
    let mut space = CalibratedSpace::with_dimensions(2)
        .with_extents(vec![Some(2), Some(3)])
        .expect("extents");
    with_column_times(&mut space);
    let mut dataset = Dataset::from_data(Array::<f32, _>::zeros(IxDyn(&[2, 3])));
    with_column_times(dataset.space_mut());

    let (sliced_space, _) = run_recipe(&recipe, &space).expect("space recipe");
    let (sliced_data, _) = run_recipe(&recipe, &dataset).expect("dataset recipe");
    let time_at = |space: &CalibratedSpace| {
        space
            .meta()
            .varying::<f64>("time")
            .expect("type")
            .expect("present")
            .get_at(&[0])
            .expect("time")
    };
    assert_eq!(time_at(&sliced_space), 2.0);
    assert_eq!(time_at(sliced_data.space()), 2.0);
    assert_eq!(sliced_space.extents(), &[Some(2)][..]);
}

#[test]
fn sized_space_rejects_positions_past_the_extent() {
    let recipe = TransformRecipe {
        name: None,
        steps: vec![TransformStep::HyperSlice {
            axis: 1,
            position: 3,
        }],
    };
    let space = CalibratedSpace::with_dimensions(2)
        .with_extents(vec![None, Some(3)])
        .expect("extents");
    assert!(matches!(
        run_recipe(&recipe, &space),
        Err(RecipeError::Core(_))
    ));
}

#[test]
fn axes_are_checked_against_the_shrinking_space() {
    let recipe = TransformRecipe {
        name: None,
        steps: vec![
            TransformStep::HyperSlice {
                axis: 0,
                position: 0,
            },
            TransformStep::Rotate { from: 0, to: 1 },
        ],
    };
    let space = CalibratedSpace::with_dimensions(2);
    assert!(matches!(
        run_recipe(&recipe, &space),
        Err(RecipeError::Parse(_))
    ));
    assert!(recipe.validate_for(3).is_ok());
}

#[test]
fn empty_recipe_is_rejected() {
    let recipe = TransformRecipe {
        name: None,
        steps: vec![],
    };
    assert!(matches!(recipe.validate(), Err(RecipeError::Parse(_))));
}

#[test]
fn out_of_range_positions_fail_the_step() {
    let recipe = TransformRecipe {
        name: None,
        steps: vec![TransformStep::HyperSlice {
            axis: 0,
            position: 5,
        }],
    };
    let dataset = Dataset::from_data(Array::<f32, _>::zeros(IxDyn(&[2, 2])));
    assert!(matches!(
        run_recipe(&recipe, &dataset),
        Err(RecipeError::Core(_))
    ));
}

#[test]
fn yaml_recipe_loads() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("flip.yaml");
    fs::write(&path, FLIP_YAML).expect("write");
    let recipe = load_recipe(&path).expect("load");
    assert_eq!(recipe.name.as_deref(), Some("flip"));
    assert_eq!(
        recipe.steps,
        vec![
            TransformStep::Rotate { from: 0, to: 1 },
            TransformStep::HyperSlice {
                axis: 1,
                position: 2,
            },
        ]
    );
}

#[test]
fn negative_positions_do_not_parse() {
    let raw = r#"{"steps": [{"op": "hyper_slice", "axis": 0, "position": -1}]}"#;
    assert!(serde_json::from_str::<TransformRecipe>(raw).is_err());
}

#[test]
fn report_is_written_with_flattened_steps() {
    let dir = tempdir().expect("tempdir");
    let (_, report) = run_recipe(&flip_and_slice(), &test_space()).expect("recipe");

    let json_path = dir.path().join("report.json");
    save_report(&json_path, &report).expect("save json");
    let value: Value =
        serde_json::from_str(&fs::read_to_string(&json_path).expect("read")).expect("parse");
    assert_eq!(value["recipe_name"], json!("flip"));
    assert_eq!(value["steps"][1]["op"], json!("hyper_slice"));
    assert_eq!(value["steps"][1]["axis"], json!(2));
    assert_eq!(
        value["steps"][1]["detached"],
        json!([{"kind": "subset", "axes": [2]}])
    );

    let yaml_path = dir.path().join("report.yaml");
    save_report(&yaml_path, &report).expect("save yaml");
    let yaml = fs::read_to_string(&yaml_path).expect("read");
    assert!(yaml.contains("op: rotate"));
}
