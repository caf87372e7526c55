use proptest::prelude::*;
use remo::annotation::io_csv::{from_csv_str, to_csv_string};
use remo::annotation::io_json::{from_json_str, to_json_string};
use remo::annotation::Annotation;
use remo::RemoError;

mod proptest_helpers;

proptest! {
    #![proptest_config(proptest_helpers::proptest_config())]

    #[test]
    fn json_roundtrip_is_lossless(batch in proptest_helpers::arb_batch(20)) {
        let json = to_json_string(&batch).expect("serialize json");
        let restored = from_json_str(&json).expect("parse json");

        prop_assert_eq!(batch, restored);
    }

    #[test]
    fn csv_roundtrip_is_lossless(batch in proptest_helpers::arb_batch(20)) {
        let csv = to_csv_string(&batch).expect("serialize csv");
        let restored = from_csv_str(&csv).expect("parse csv");

        prop_assert_eq!(batch, restored);
    }

    #[test]
    fn csv_writer_keeps_or_rejects_labels(
        classes in prop::collection::vec(proptest_helpers::arb_any_label(), 0..4)
    ) {
        let batch = vec![Annotation::new("img.png", classes.clone())];
        let unrepresentable =
            classes == [""] || classes.iter().any(|label| label.contains(';'));

        match to_csv_string(&batch) {
            Ok(csv) => {
                prop_assert!(!unrepresentable);
                prop_assert_eq!(from_csv_str(&csv).expect("parse csv"), batch);
            }
            Err(RemoError::CsvInvalid { .. }) => prop_assert!(unrepresentable),
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }

    #[test]
    fn json_keeps_any_label(
        classes in prop::collection::vec(proptest_helpers::arb_any_label(), 0..4)
    ) {
        let batch = vec![Annotation::new("img.png", classes)];
        let restored = from_json_str(&to_json_string(&batch).unwrap()).unwrap();
        prop_assert_eq!(restored, batch);
    }

    #[test]
    fn json_to_csv_to_json_is_stable(batch in proptest_helpers::arb_batch(20)) {
        let via_csv = from_csv_str(&to_csv_string(&batch).unwrap()).unwrap();
        let first = to_json_string(&batch).unwrap();
        let second = to_json_string(&via_csv).unwrap();

        prop_assert_eq!(first, second);
    }
}
