//! JSON serialization of annotation records.
//!
//! An annotation file is a JSON array of records in the shape the remote
//! service expects:
//!
//! ```json
//! [
//!   {"filename": "a.png", "task": "image_classification", "classes": ["Dog"]},
//!   {"filename": "b.png", "task": "object_detection", "classes": ["Cat"],
//!    "bbox": {"xmin": 1, "ymin": 2, "xmax": 30, "ymax": 40}},
//!   {"filename": "c.png", "task": "instance_segmentation", "classes": ["Dog"],
//!    "segment": {"points": [{"x": 1, "y": 2}, {"x": 3, "y": 4}]}}
//! ]
//! ```
//!
//! Records are parsed in two steps: the JSON structure first, then each
//! record through the model setters. Model failures are reported with the
//! index of the offending record.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use super::model::Annotation;
use super::record::AnnotationRecord;
use crate::error::RemoError;

/// Reads annotation records from a JSON file.
///
/// # Errors
/// Returns an error if the file cannot be read, is not a JSON array of
/// records, or a record violates the model (wrong bbox arity, odd segment
/// length, unrecognized object, ...).
pub fn read_annotations_json(path: &Path) -> Result<Vec<Annotation>, RemoError> {
    let file = File::open(path).map_err(RemoError::Io)?;
    let reader = BufReader::new(file);

    let records: Vec<AnnotationRecord> =
        serde_json::from_reader(reader).map_err(|source| RemoError::JsonParse {
            path: path.to_path_buf(),
            source,
        })?;

    let annotations = records_to_annotations(records, path)?;
    tracing::debug!(path = %path.display(), count = annotations.len(), "read annotation JSON");
    Ok(annotations)
}

/// Writes annotation records to a JSON file.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_annotations_json(path: &Path, annotations: &[Annotation]) -> Result<(), RemoError> {
    let file = File::create(path).map_err(RemoError::Io)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, annotations).map_err(|source| RemoError::JsonWrite {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), count = annotations.len(), "wrote annotation JSON");
    Ok(())
}

/// Reads annotation records from a JSON string.
///
/// Useful for testing without file I/O.
pub fn from_json_str(json: &str) -> Result<Vec<Annotation>, RemoError> {
    from_json_slice(json.as_bytes())
}

/// Reads annotation records from JSON bytes.
///
/// Useful for fuzzing and processing raw bytes without requiring UTF-8 upfront.
pub fn from_json_slice(bytes: &[u8]) -> Result<Vec<Annotation>, RemoError> {
    let dummy_path = Path::new("<bytes>");
    let records: Vec<AnnotationRecord> =
        serde_json::from_slice(bytes).map_err(|source| RemoError::JsonParse {
            path: dummy_path.to_path_buf(),
            source,
        })?;

    records_to_annotations(records, dummy_path)
}

/// Writes annotation records to a pretty-printed JSON string.
///
/// Useful for testing without file I/O.
pub fn to_json_string(annotations: &[Annotation]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(annotations)
}

fn records_to_annotations(
    records: Vec<AnnotationRecord>,
    path: &Path,
) -> Result<Vec<Annotation>, RemoError> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            Annotation::try_from(record).map_err(|source| RemoError::InvalidRecord {
                path: path.to_path_buf(),
                index,
                source,
            })
        })
        .collect()
}
