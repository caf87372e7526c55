#![allow(dead_code)]

use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};
use remo::annotation::Annotation;

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Labels that survive every supported format (non-empty, no `;`).
pub fn arb_label() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 _-]{0,11}"
}

/// Labels including the ones CSV cannot carry: empty and `;`-joined.
pub fn arb_any_label() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => arb_label(),
        1 => Just(String::new()),
        1 => "[a-z]{1,4};[a-z]{0,4}",
    ]
}

pub fn arb_filename() -> impl Strategy<Value = Option<String>> {
    prop::option::of("[a-z0-9_]{1,12}\\.(jpg|png)")
}

/// Mostly pixel-scale values, with the full `i64` range mixed in.
pub fn arb_coordinate() -> impl Strategy<Value = i64> {
    prop_oneof![
        6 => -2_000i64..4_000,
        2 => any::<i64>(),
        1 => prop::sample::select(vec![i64::MIN, i64::MIN + 1, -1, 0, i64::MAX]),
    ]
}

/// Even-length, non-empty flat coordinate lists.
pub fn arb_segment_coordinates(max_points: usize) -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec((arb_coordinate(), arb_coordinate()), 1..=max_points)
        .prop_map(|points| points.into_iter().flat_map(|(x, y)| [x, y]).collect())
}

/// Any valid annotation: classification, detection or segmentation.
pub fn arb_annotation() -> BoxedStrategy<Annotation> {
    let base = (arb_filename(), prop::collection::vec(arb_label(), 0..4))
        .prop_map(|(filename, classes)| Annotation::from_parts(filename, classes, None))
        .boxed();

    prop_oneof![
        base.clone(),
        (base.clone(), prop::array::uniform4(arb_coordinate())).prop_map(|(ann, bbox)| {
            ann.with_bbox(&bbox).expect("four values always form a bbox")
        }),
        (base, arb_segment_coordinates(12)).prop_map(|(ann, coords)| {
            ann.with_segment(&coords)
                .expect("generated coordinates are even and non-empty")
        }),
    ]
    .boxed()
}

pub fn arb_batch(max_len: usize) -> impl Strategy<Value = Vec<Annotation>> {
    prop::collection::vec(arb_annotation(), 0..=max_len)
}
