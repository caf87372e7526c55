//! Fuzz target for segment construction from flat coordinate lists.

#![no_main]

use libfuzzer_sys::fuzz_target;
use remo::annotation::Annotation;

fuzz_target!(|coords: Vec<i64>| {
    let mut annotation = Annotation::new("fuzz.png", "label");
    match annotation.set_segment(&coords) {
        Ok(()) => {
            let segment = annotation.segment().expect("segment was just set");
            assert_eq!(segment.coordinates(), coords);
        }
        Err(_) => {
            assert!(coords.is_empty() || coords.len() % 2 == 1);
            assert!(annotation.segment().is_none());
        }
    }
});
