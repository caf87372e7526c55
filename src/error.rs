use std::path::PathBuf;
use thiserror::Error;

use crate::validation::ValidationReport;

/// Errors raised by the annotation model itself.
///
/// These come from the setters and constructors on
/// [`Annotation`](crate::annotation::Annotation) and are always raised
/// before any field is touched, so the value is unchanged on failure.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AnnotationError {
    #[error("Expected object type BoundingBox or Segment, found {found}")]
    TypeMismatch { found: String },

    #[error("Bounding box expects 4 values: xmin, ymin, xmax, ymax (got {found})")]
    BoundingBoxArity { found: usize },

    #[error("Segment coordinates cannot be an empty list")]
    EmptySegment,

    #[error(
        "Segment coordinates need to be an even number of elements indicating (x,y) coordinates of each point (got {found})"
    )]
    OddSegment { found: usize },

    #[error("Annotation carries more than one geometry (bbox, segment, object)")]
    ConflictingGeometry,

    #[error("Declared task '{declared}' does not match geometry task '{derived}'")]
    TaskMismatch { declared: String, derived: String },

    #[error("Unknown task '{0}' (expected image_classification, object_detection or instance_segmentation)")]
    UnknownTask(String),
}

/// The main error type for remo operations.
#[derive(Debug, Error)]
pub enum RemoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Annotation(#[from] AnnotationError),

    #[error("Failed to parse annotation JSON from {path}: {source}")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write annotation JSON to {path}: {source}")]
    JsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid annotation record {index} in {path}: {source}")]
    InvalidRecord {
        path: PathBuf,
        index: usize,
        #[source]
        source: AnnotationError,
    },

    #[error("Failed to parse annotation CSV from {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to write annotation CSV to {path}: {source}")]
    CsvWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid annotation CSV {path}: {message}")]
    CsvInvalid { path: PathBuf, message: String },

    #[error("Validation failed with {error_count} error(s) and {warning_count} warning(s)")]
    ValidationFailed {
        error_count: usize,
        warning_count: usize,
        report: ValidationReport,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}
