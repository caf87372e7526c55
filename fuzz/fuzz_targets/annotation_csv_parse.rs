//! Fuzz target for annotation CSV parsing.
//!
//! Every row that parses is rebuilt through the model setters, so this
//! also exercises bbox and segment validation on arbitrary input.

#![no_main]

use libfuzzer_sys::fuzz_target;
use remo::annotation::io_csv::from_csv_slice;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let _ = from_csv_slice(data);
});
