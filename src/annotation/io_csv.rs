//! Flat CSV reader and writer for annotation records.
//!
//! # Format Reference
//!
//! One row per annotation with the columns:
//! - `file_name`: image file name (empty when the record has none)
//! - `task`: `image_classification`, `object_detection` or
//!   `instance_segmentation`
//! - `classes`: labels joined with `;`
//! - `coordinates`: space-separated integers; empty for classification,
//!   `xmin ymin xmax ymax` for detection, `x0 y0 x1 y1 ...` for segmentation
//!
//! ```text
//! file_name,task,classes,coordinates
//! a.png,image_classification,Dog;Animal,
//! b.png,object_detection,Cat,1 2 30 40
//! c.png,instance_segmentation,Dog,1 2 3 4 5 6
//! ```
//!
//! # Format Limitations
//!
//! CSV cannot represent:
//! - Labels containing `;` (the writer rejects them)
//! - The difference between no file name and an empty file name
//! - A single empty-string label (the writer rejects it)
//!
//! Rows are rebuilt through the model setters, so coordinate counts are
//! checked exactly as they are for in-memory construction.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::model::Annotation;
use super::{AnnotationObject, Classes, Task};
use crate::error::RemoError;

const CLASS_SEPARATOR: char = ';';

// ============================================================================
// CSV Schema Type (internal to this module)
// ============================================================================

/// A single row in the annotation CSV format.
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    file_name: String,
    task: String,
    classes: String,
    coordinates: String,
}

// ============================================================================
// Public API
// ============================================================================

/// Reads annotation records from a CSV file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed, or if a row's
/// coordinates do not fit its task.
///
/// # Example
/// ```no_run
/// use std::path::Path;
/// use remo::annotation::io_csv::read_annotations_csv;
///
/// let annotations = read_annotations_csv(Path::new("annotations.csv"))?;
/// # Ok::<(), remo::RemoError>(())
/// ```
pub fn read_annotations_csv(path: &Path) -> Result<Vec<Annotation>, RemoError> {
    let file = File::open(path).map_err(RemoError::Io)?;
    let annotations = read_rows(BufReader::new(file), path)?;
    tracing::debug!(path = %path.display(), count = annotations.len(), "read annotation CSV");
    Ok(annotations)
}

/// Writes annotation records to a CSV file, in input order.
///
/// # Errors
/// Returns an error if the file cannot be written, a label contains `;`, or
/// a record's only label is empty.
pub fn write_annotations_csv(path: &Path, annotations: &[Annotation]) -> Result<(), RemoError> {
    let rows = annotations_to_rows(annotations, path)?;

    let file = File::create(path).map_err(RemoError::Io)?;
    let mut csv_writer = csv::Writer::from_writer(BufWriter::new(file));
    for row in rows {
        csv_writer
            .serialize(&row)
            .map_err(|source| RemoError::CsvWrite {
                path: path.to_path_buf(),
                source,
            })?;
    }

    csv_writer
        .into_inner()
        .map_err(|e| RemoError::Io(e.into_error()))?
        .flush()
        .map_err(RemoError::Io)?;

    tracing::debug!(path = %path.display(), count = annotations.len(), "wrote annotation CSV");
    Ok(())
}

/// Reads annotation records from a CSV string.
///
/// Useful for testing without file I/O.
pub fn from_csv_str(csv_str: &str) -> Result<Vec<Annotation>, RemoError> {
    from_csv_slice(csv_str.as_bytes())
}

/// Reads annotation records from CSV bytes.
///
/// Useful for fuzzing and processing raw bytes without requiring UTF-8 upfront.
pub fn from_csv_slice(bytes: &[u8]) -> Result<Vec<Annotation>, RemoError> {
    read_rows(bytes, Path::new("<bytes>"))
}

/// Writes annotation records to a CSV string.
///
/// Useful for testing without file I/O.
pub fn to_csv_string(annotations: &[Annotation]) -> Result<String, RemoError> {
    let dummy_path = Path::new("<string>");
    let rows = annotations_to_rows(annotations, dummy_path)?;

    let mut csv_writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        csv_writer
            .serialize(&row)
            .map_err(|source| RemoError::CsvWrite {
                path: dummy_path.to_path_buf(),
                source,
            })?;
    }

    let bytes = csv_writer
        .into_inner()
        .map_err(|e| RemoError::Io(e.into_error()))?;

    String::from_utf8(bytes).map_err(|e| RemoError::CsvInvalid {
        path: dummy_path.to_path_buf(),
        message: format!("Invalid UTF-8 in output: {}", e),
    })
}

// ============================================================================
// Conversion: CSV -> Annotation
// ============================================================================

fn read_rows<R: std::io::Read>(reader: R, path: &Path) -> Result<Vec<Annotation>, RemoError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut annotations = Vec::new();

    for (idx, result) in csv_reader.deserialize().enumerate() {
        let row: CsvRow = result.map_err(|source| RemoError::CsvParse {
            path: path.to_path_buf(),
            source,
        })?;
        let annotation = row_to_annotation(row).map_err(|message| RemoError::CsvInvalid {
            path: path.to_path_buf(),
            message: format!("row {}: {}", idx + 1, message),
        })?;
        annotations.push(annotation);
    }

    Ok(annotations)
}

fn row_to_annotation(row: CsvRow) -> Result<Annotation, String> {
    let task: Task = row.task.trim().parse().map_err(|e| format!("{}", e))?;

    let coordinates = row
        .coordinates
        .split_whitespace()
        .map(|token| {
            token
                .parse::<i64>()
                .map_err(|_| format!("invalid coordinate '{}'", token))
        })
        .collect::<Result<Vec<i64>, String>>()?;

    let filename = (!row.file_name.is_empty()).then_some(row.file_name);
    let classes: Classes = if row.classes.is_empty() {
        Classes::new()
    } else {
        row.classes
            .split(CLASS_SEPARATOR)
            .map(String::from)
            .collect()
    };

    let mut annotation = Annotation::from_parts(filename, classes, None);
    match task {
        Task::ImageClassification if !coordinates.is_empty() => {
            return Err(format!(
                "image_classification takes no coordinates (got {})",
                coordinates.len()
            ));
        }
        Task::ImageClassification => {}
        Task::ObjectDetection => annotation.set_bbox(&coordinates).map_err(|e| e.to_string())?,
        Task::InstanceSegmentation => annotation
            .set_segment(&coordinates)
            .map_err(|e| e.to_string())?,
    }

    Ok(annotation)
}

// ============================================================================
// Conversion: Annotation -> CSV
// ============================================================================

fn annotations_to_rows(annotations: &[Annotation], path: &Path) -> Result<Vec<CsvRow>, RemoError> {
    annotations
        .iter()
        .enumerate()
        .map(|(idx, annotation)| {
            if let Some(label) = annotation
                .classes
                .iter()
                .find(|label| label.contains(CLASS_SEPARATOR))
            {
                return Err(RemoError::CsvInvalid {
                    path: path.to_path_buf(),
                    message: format!(
                        "annotation {}: label '{}' contains '{}'",
                        idx, label, CLASS_SEPARATOR
                    ),
                });
            }
            // A lone empty label joins to an empty cell, which reads back as no labels.
            if annotation.classes.len() == 1 && annotation.classes[0].is_empty() {
                return Err(RemoError::CsvInvalid {
                    path: path.to_path_buf(),
                    message: format!(
                        "annotation {}: a single empty label cannot be written to CSV",
                        idx
                    ),
                });
            }

            let coordinates: Vec<i64> = match annotation.object() {
                None => Vec::new(),
                Some(AnnotationObject::BoundingBox(bbox)) => bbox.to_array().to_vec(),
                Some(AnnotationObject::Segment(segment)) => segment.coordinates(),
            };

            Ok(CsvRow {
                file_name: annotation.filename.clone().unwrap_or_default(),
                task: annotation.task().to_string(),
                classes: annotation.classes.join(";"),
                coordinates: coordinates
                    .iter()
                    .map(i64::to_string)
                    .collect::<Vec<_>>()
                    .join(" "),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "file_name,task,classes,coordinates
a.png,image_classification,Dog;Animal,
b.png,object_detection,Cat,1 2 30 40
c.png,instance_segmentation,Dog,1 2 3 4 5 6
";

    #[test]
    fn test_parse_sample() {
        let annotations = from_csv_str(SAMPLE).unwrap();
        assert_eq!(annotations.len(), 3);

        assert_eq!(annotations[0].task(), Task::ImageClassification);
        assert_eq!(&*annotations[0].classes, &["Dog".to_string(), "Animal".to_string()]);

        assert_eq!(annotations[1].bbox().unwrap().to_array(), [1, 2, 30, 40]);
        assert_eq!(annotations[2].segment().unwrap().len(), 3);
    }

    #[test]
    fn test_write_matches_sample() {
        let annotations = from_csv_str(SAMPLE).unwrap();
        let written = to_csv_string(&annotations).unwrap();
        assert_eq!(written, SAMPLE);
    }

    #[test]
    fn test_empty_fields() {
        let csv = "file_name,task,classes,coordinates\n,image_classification,,\n";
        let annotations = from_csv_str(csv).unwrap();
        assert!(annotations[0].filename.is_none());
        assert!(annotations[0].classes.is_empty());
    }

    #[test]
    fn test_wrong_bbox_arity_names_row() {
        let csv = "file_name,task,classes,coordinates
a.png,image_classification,Dog,
b.png,object_detection,Cat,1 2 3
";
        match from_csv_str(csv) {
            Err(RemoError::CsvInvalid { message, .. }) => {
                assert!(message.starts_with("row 2:"), "message: {}", message);
                assert!(message.contains("Bounding box expects 4 values"));
            }
            other => panic!("expected CsvInvalid, got {:?}", other),
        }
    }

    #[test]
    fn test_odd_segment_and_bad_tokens() {
        let odd = "file_name,task,classes,coordinates\na.png,instance_segmentation,Dog,1 2 3\n";
        assert!(matches!(
            from_csv_str(odd),
            Err(RemoError::CsvInvalid { .. })
        ));

        let bad = "file_name,task,classes,coordinates\na.png,object_detection,Dog,1 2 x 4\n";
        match from_csv_str(bad) {
            Err(RemoError::CsvInvalid { message, .. }) => {
                assert!(message.contains("invalid coordinate 'x'"))
            }
            other => panic!("expected CsvInvalid, got {:?}", other),
        }
    }

    #[test]
    fn test_classification_rejects_coordinates() {
        let csv = "file_name,task,classes,coordinates\na.png,image_classification,Dog,1 2\n";
        assert!(matches!(
            from_csv_str(csv),
            Err(RemoError::CsvInvalid { .. })
        ));
    }

    #[test]
    fn test_unknown_task() {
        let csv = "file_name,task,classes,coordinates\na.png,keypoints,Dog,\n";
        match from_csv_str(csv) {
            Err(RemoError::CsvInvalid { message, .. }) => assert!(message.contains("keypoints")),
            other => panic!("expected CsvInvalid, got {:?}", other),
        }
    }

    #[test]
    fn test_writer_rejects_separator_in_label() {
        let annotations = vec![Annotation::new("a.png", "Dog;Cat")];
        assert!(matches!(
            to_csv_string(&annotations),
            Err(RemoError::CsvInvalid { .. })
        ));
    }

    #[test]
    fn test_writer_rejects_lone_empty_label() {
        let annotations = vec![Annotation::new("a.png", "")];
        match to_csv_string(&annotations) {
            Err(RemoError::CsvInvalid { message, .. }) => {
                assert!(message.starts_with("annotation 0:"), "message: {}", message)
            }
            other => panic!("expected CsvInvalid, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_label_among_others_survives() {
        let annotations = vec![Annotation::new("a.png", ["", "Dog"])];
        let csv = to_csv_string(&annotations).unwrap();
        assert_eq!(from_csv_str(&csv).unwrap(), annotations);
    }
}
