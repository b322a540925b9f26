use std::sync::Arc;

use ndarray::{ArrayD, IxDyn};
use serde_json::json;

use super::{
    ArrayLookup, DetachedEntry, FnLookup, MetaError, MetaItem, MetaSpace, MixedTransform,
    Outcome, SimpleItem, VaryingItem, axes_to_flags, flags_to_axes, hyper_slice, mixed_transform,
    permute, rotate,
};

fn array_lookup(shape: &[usize], values: Vec<f64>) -> ArrayLookup<f64> {
    ArrayLookup::new(ArrayD::from_shape_vec(IxDyn(shape), values).expect("shape"))
}

/// Varies with axes 0 and 1 of a 2-D space; value = 100 * p0 + p1.
fn plane_item() -> MetaItem<i64> {
    let lookup = FnLookup::new(2, |position: &[i64]| Some(position[0] * 100 + position[1]));
    VaryingItem::from_lookup(lookup, vec![true, true])
        .expect("varying")
        .into()
}

fn transformed<T>(outcome: Outcome<MetaItem<T>>) -> MetaItem<T> {
    match outcome {
        Outcome::Transformed(item) => item,
        Outcome::Unchanged(_) => panic!("expected a transformed item, got an unchanged one"),
        Outcome::Detached => panic!("expected a transformed item, got a detached one"),
    }
}

#[test]
fn masks_and_axis_lists_convert_losslessly() {
    let masks = [
        vec![],
        vec![false],
        vec![true, false, true],
        vec![false, false, true, true],
        vec![true, true, true],
    ];
    for mask in masks {
        let axes = flags_to_axes(&mask);
        assert_eq!(axes_to_flags(&axes, mask.len()).expect("flags"), mask);
    }
    let axes = vec![0, 2, 3];
    assert_eq!(flags_to_axes(&axes_to_flags(&axes, 5).expect("flags")), axes);
}

#[test]
fn axis_lists_are_validated() {
    assert_eq!(
        axes_to_flags(&[0, 3], 3),
        Err(MetaError::AxisOutOfRange { axis: 3, dims: 3 })
    );
    assert_eq!(
        axes_to_flags(&[1, 1], 3),
        Err(MetaError::DuplicateAxis { axis: 1 })
    );
}

#[test]
fn same_axis_rotation_and_permutation_are_no_ops() {
    let varying = plane_item();
    for axis in 0..2 {
        for outcome in [
            rotate(&varying, axis, axis).expect("rotate"),
            permute(&varying, axis, axis).expect("permute"),
        ] {
            let Outcome::Unchanged(MetaItem::Varying(item)) = outcome else {
                panic!("expected the unchanged varying item");
            };
            let original = varying.as_varying().expect("varying");
            assert!(Arc::ptr_eq(item.lookup(), original.lookup()));
        }
    }

    let simple: MetaItem<&str> = SimpleItem::attached("um", vec![true, false]).into();
    let outcome = rotate(&simple, 1, 1).expect("rotate");
    assert!(matches!(outcome, Outcome::Unchanged(_)));
}

#[test]
fn rotating_twice_restores_simple_attachment() {
    let item: MetaItem<&str> = SimpleItem::attached("lut", vec![true, false, false]).into();
    let once = transformed(rotate(&item, 0, 1).expect("rotate"));
    assert_eq!(once.attached_to(), Some(&[false, true, false][..]));
    let twice = transformed(rotate(&once, 0, 1).expect("rotate"));
    assert_eq!(twice.attached_to(), item.attached_to());
    assert_eq!(twice.get_at(&[0, 0, 0]).expect("value"), "lut");
}

#[test]
fn permutation_moves_attachment() {
    let item: MetaItem<u8> = SimpleItem::attached(7, vec![true, false, false]).into();
    let moved = transformed(permute(&item, 0, 2).expect("permute"));
    assert_eq!(moved.attached_to(), Some(&[false, false, true][..]));
}

#[test]
fn rotation_reads_the_mirrored_axis() {
    let rotated = transformed(rotate(&plane_item(), 0, 1).expect("rotate"));
    // view (a, b) reads the original at (b, -a)
    assert_eq!(rotated.get_at(&[3, 5]).expect("value"), 500 - 3);
    assert_eq!(rotated.get_at(&[0, 2]).expect("value"), 200);
}

#[test]
fn permutation_swaps_lookup_coordinates() {
    let permuted = transformed(permute(&plane_item(), 0, 1).expect("permute"));
    assert_eq!(permuted.get_at(&[3, 5]).expect("value"), 503);
    assert_eq!(permuted.get_at(&[1, 4]).expect("value"), 401);
}

#[test]
fn slicing_the_only_variation_axis_collapses_to_a_simple_item() {
    let item: MetaItem<f64> = VaryingItem::from_lookup(
        array_lookup(&[3], vec![10.0, 20.0, 30.0]),
        vec![false, true, false],
    )
    .expect("varying")
    .into();
    let sliced = transformed(hyper_slice(&item, 1, 2).expect("slice"));
    let MetaItem::Simple(simple) = &sliced else {
        panic!("expected a simple item");
    };
    assert!(simple.is_global());
    assert_eq!(*simple.value(), 30.0);
    assert_eq!(
        sliced.get_at(&[0, 0]).expect("value"),
        item.get_at(&[0, 2, 0]).expect("value")
    );
}

#[test]
fn slicing_keeps_remaining_variation_axes() {
    let values = (0..3)
        .flat_map(|row| (0..4).map(move |column| f64::from(10 * row + column)))
        .collect();
    let item: MetaItem<f64> =
        VaryingItem::from_lookup(array_lookup(&[3, 4], values), vec![true, true, false])
            .expect("varying")
            .into();
    let sliced = transformed(hyper_slice(&item, 0, 2).expect("slice"));
    let varying = sliced.as_varying().expect("still varying");
    assert_eq!(varying.varies_with(), &[true, false]);
    assert_eq!(varying.lookup().num_dimensions(), 1);
    for column in 0..4 {
        assert_eq!(
            sliced.get_at(&[column, 9]).expect("value"),
            20.0 + column as f64
        );
    }
}

#[test]
fn slicing_outside_the_lookup_reports_the_position() {
    let item: MetaItem<f64> =
        VaryingItem::from_lookup(array_lookup(&[3], vec![1.0, 2.0, 3.0]), vec![true])
            .expect("varying")
            .into();
    let error = hyper_slice(&item, 0, 7).expect_err("out of bounds");
    assert_eq!(error, MetaError::OutOfBounds { position: vec![7] });
}

#[test]
fn global_items_survive_every_transform() {
    let item: MetaItem<String> = SimpleItem::global("whole image".to_string()).into();
    let steps = [
        rotate(&item, 0, 1),
        permute(&item, 2, 0),
        hyper_slice(&item, 4, 3),
        mixed_transform(&item, &MixedTransform::hyper_slice(3, 1, 0).expect("slice")),
    ];
    for outcome in steps {
        let Outcome::Unchanged(MetaItem::Simple(simple)) = outcome.expect("transform") else {
            panic!("global item must be unchanged");
        };
        assert!(simple.is_global());
        assert_eq!(simple.value(), "whole image");
    }
}

#[test]
fn removing_every_attached_axis_detaches() {
    let simple: MetaItem<&str> = SimpleItem::attached("z info", vec![false, true]).into();
    assert!(hyper_slice(&simple, 1, 0).expect("slice").is_detached());

    let varying: MetaItem<f64> =
        VaryingItem::from_lookup(array_lookup(&[2], vec![1.0, 2.0]), vec![true, false])
            .expect("varying")
            .with_attachment(vec![false, true])
            .expect("attachment")
            .into();
    assert!(hyper_slice(&varying, 1, 0).expect("slice").is_detached());
}

#[test]
fn extreme_positions_are_out_of_bounds() {
    let rotated = transformed(rotate(&plane_item(), 0, 1).expect("rotate"));
    assert_eq!(
        rotated.get_at(&[i64::MIN, 0]).expect_err("overflow"),
        MetaError::OutOfBounds {
            position: vec![i64::MIN, 0]
        }
    );

    let shifted = MixedTransform::identity(1).translated(0, 5).expect("translate");
    assert!(shifted.apply(&[i64::MAX]).is_err());
    assert_eq!(
        MixedTransform::identity(1)
            .translated(0, i64::MAX)
            .and_then(|transform| transform.translated(0, 1)),
        Err(MetaError::TranslationOverflow { axis: 0, offset: 1 })
    );
}

#[test]
fn translation_offsets_the_lookup() {
    let lookup = FnLookup::new(1, |position: &[i64]| Some(position[0] * 2));
    let item: MetaItem<i64> = VaryingItem::from_lookup(lookup, vec![true])
        .expect("varying")
        .into();
    let shifted = MixedTransform::identity(1).translated(0, 5).expect("translate");
    let moved = transformed(mixed_transform(&item, &shifted).expect("transform"));
    assert_eq!(moved.get_at(&[1]).expect("value"), 12);
}

#[test]
fn mask_length_must_match_the_transform() {
    let item: MetaItem<u8> = SimpleItem::attached(1, vec![true, false]).into();
    let error = mixed_transform(&item, &MixedTransform::identity(3)).expect_err("mismatch");
    assert_eq!(
        error,
        MetaError::MaskLengthMismatch {
            expected: 3,
            actual: 2
        }
    );
}

#[test]
fn varying_item_checks_lookup_dimensionality() {
    let error = VaryingItem::from_lookup(array_lookup(&[2], vec![0.0, 1.0]), vec![true, true])
        .expect_err("mismatch");
    assert_eq!(
        error,
        MetaError::LookupDimensionMismatch {
            expected: 2,
            actual: 1
        }
    );
    let error = VaryingItem::from_lookup(array_lookup(&[2], vec![0.0, 1.0]), vec![true, false])
        .expect("varying")
        .with_attachment(vec![true])
        .expect_err("mismatch");
    assert!(matches!(error, MetaError::MaskLengthMismatch { .. }));
}

#[test]
fn space_drops_detached_subsets_on_slice() {
    let mut space = MetaSpace::new(3);
    space.global_mut().insert("title", "embryo");
    space.item_mut(&[0]).expect("x").insert("unit", "um");
    space.item_mut(&[2]).expect("channel").insert("name", "DAPI");
    space
        .item_mut(&[2, 0])
        .expect("plane")
        .insert("lut", json!([0, 255]));

    let sliced = space.hyper_sliced(2, 0).expect("slice");
    assert_eq!(
        sliced.detached,
        vec![DetachedEntry::Subset { axes: vec![2] }]
    );
    let space = sliced.space;
    assert_eq!(space.num_dimensions(), 2);
    assert_eq!(
        space.global().and_then(|objects| objects.get("title")),
        Some(&json!("embryo"))
    );
    let x = space.item(&[0]).expect("key").expect("objects on x");
    assert_eq!(x.value().get("unit"), Some(&json!("um")));
    assert_eq!(x.value().get("lut"), Some(&json!([0, 255])));
    assert_eq!(x.attached_to(), Some(&[true, false][..]));
}

#[test]
fn space_merges_colliding_subsets_keeping_earlier_values() {
    let mut space = MetaSpace::new(3);
    space.item_mut(&[0, 1]).expect("plane").insert("name", "a");
    let x = space.item_mut(&[0]).expect("x");
    x.insert("name", "b");
    x.insert("only", 1);

    let space = space.hyper_sliced(1, 0).expect("slice").space;
    let merged = space.item(&[0]).expect("key").expect("merged");
    assert_eq!(merged.value().get("name"), Some(&json!("b")));
    assert_eq!(merged.value().get("only"), Some(&json!(1)));
    assert_eq!(space.subsets().count(), 1);
}

#[test]
fn space_permutation_moves_subsets() {
    let mut space = MetaSpace::new(3);
    space.item_mut(&[0]).expect("y").insert("unit", "um");
    let permuted = space.permuted(0, 2).expect("permute").space;
    assert!(permuted.item(&[0]).expect("key").is_none());
    let moved = permuted.item(&[2]).expect("key").expect("moved");
    assert_eq!(moved.value().get("unit"), Some(&json!("um")));
}

#[test]
fn space_transforms_varying_items_by_type() {
    let mut space = MetaSpace::new(2);
    space
        .insert_varying("stage", plane_item())
        .expect("insert");
    let rotated = space.rotated(0, 1).expect("rotate").space;
    let stage = rotated
        .varying::<i64>("stage")
        .expect("type")
        .expect("present");
    assert_eq!(stage.get_at(&[3, 5]).expect("value"), 497);
    assert_eq!(
        rotated.varying::<f64>("stage").expect_err("wrong type"),
        MetaError::TypeMismatch {
            name: "stage".to_string()
        }
    );
    assert!(rotated.varying::<i64>("missing").expect("type").is_none());
}

#[test]
fn space_slices_varying_items_down_to_constants() {
    let mut space = MetaSpace::new(2);
    let timestamps: MetaItem<f64> = VaryingItem::from_lookup(
        array_lookup(&[4], vec![0.0, 0.5, 1.0, 1.5]),
        vec![false, true],
    )
    .expect("varying")
    .into();
    space.insert_varying("time", timestamps).expect("insert");

    let sliced = space.hyper_sliced(1, 3).expect("slice");
    assert!(sliced.detached.is_empty());
    let time = sliced
        .space
        .varying::<f64>("time")
        .expect("type")
        .expect("present");
    assert_eq!(time.get_at(&[0]).expect("value"), 1.5);
    let summaries = sliced.space.varying_summaries();
    assert_eq!(summaries["time"].variant, "simple");
}

#[test]
fn space_rejects_mismatched_items_and_transforms() {
    let mut space = MetaSpace::new(3);
    let error = space
        .insert_varying("plane", plane_item())
        .expect_err("mismatch");
    assert!(matches!(error, MetaError::MaskLengthMismatch { .. }));
    assert!(space.transform(&MixedTransform::identity(2)).is_err());
    assert!(space.item_mut(&[5]).is_err());
}
