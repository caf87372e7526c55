//! Batch validation for annotation records.
//!
//! The model only enforces coordinate counts. This module checks what it
//! deliberately leaves alone:
//! - Record completeness (file names, labels)
//! - Geometric sanity (box ordering, degenerate boxes and polygons)
//! - Batch shape (duplicate records, mixed tasks)

mod report;

pub use report::{IssueCode, IssueContext, Severity, ValidationIssue, ValidationReport};

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::annotation::{Annotation, AnnotationObject, BoundingBox, Segment, Task};

/// Options for validation behavior.
#[derive(Clone, Debug, Default)]
pub struct ValidateOptions {
    /// If true, treat warnings as errors.
    pub strict: bool,
}

/// Validates a batch of annotations and returns a report of all issues found.
///
/// This function checks:
/// - Every record names its image and carries non-empty, distinct labels
/// - Bounding boxes are ordered, non-degenerate and non-negative
/// - Polygons have at least three points and enclose some area
/// - No record is repeated and the batch targets a single task
pub fn validate_annotations(
    annotations: &[Annotation],
    _opts: &ValidateOptions,
) -> ValidationReport {
    let mut report = ValidationReport::new();

    let mut seen: HashMap<&Annotation, usize> = HashMap::new();
    for (index, annotation) in annotations.iter().enumerate() {
        let context = IssueContext::Annotation {
            index,
            filename: annotation.filename.clone(),
        };

        if let Some(first) = seen.get(annotation) {
            report.add(ValidationIssue::warning(
                IssueCode::DuplicateRecord,
                format!("Same record as annotation {}", first),
                context.clone(),
            ));
        } else {
            seen.insert(annotation, index);
        }

        validate_record(annotation, &context, &mut report);

        match annotation.object() {
            Some(AnnotationObject::BoundingBox(bbox)) => {
                validate_bbox(bbox, &context, &mut report)
            }
            Some(AnnotationObject::Segment(segment)) => {
                validate_segment(segment, &context, &mut report)
            }
            None => {}
        }
    }

    let tasks: BTreeSet<Task> = annotations.iter().map(Annotation::task).collect();
    if tasks.len() > 1 {
        let names: Vec<&str> = tasks.iter().map(Task::as_str).collect();
        report.add(ValidationIssue::warning(
            IssueCode::MixedTasks,
            format!(
                "Batch mixes {} tasks ({}); uploads take one task at a time",
                tasks.len(),
                names.join(", ")
            ),
            IssueContext::Batch,
        ));
    }

    report
}

/// Validates file name and labels of one record.
fn validate_record(annotation: &Annotation, context: &IssueContext, report: &mut ValidationReport) {
    match annotation.filename.as_deref() {
        None => report.add(ValidationIssue::warning(
            IssueCode::MissingFileName,
            "No image file name",
            context.clone(),
        )),
        Some("") => report.add(ValidationIssue::error(
            IssueCode::EmptyFileName,
            "Empty image file name",
            context.clone(),
        )),
        Some(_) => {}
    }

    if annotation.classes.is_empty() {
        report.add(ValidationIssue::warning(
            IssueCode::NoClasses,
            "No class labels",
            context.clone(),
        ));
    }

    let mut labels: HashSet<&str> = HashSet::new();
    for label in &annotation.classes {
        if label.is_empty() {
            report.add(ValidationIssue::error(
                IssueCode::EmptyClassLabel,
                "Empty class label",
                context.clone(),
            ));
        } else if !labels.insert(label.as_str()) {
            report.add(ValidationIssue::warning(
                IssueCode::DuplicateClassLabel,
                format!("Label '{}' appears more than once", label),
                context.clone(),
            ));
        }
    }
}

fn validate_bbox(bbox: &BoundingBox, context: &IssueContext, report: &mut ValidationReport) {
    if !bbox.is_ordered() {
        report.add(ValidationIssue::error(
            IssueCode::InvalidBBoxOrdering,
            format!(
                "Invalid ordering: min ({}, {}) should be <= max ({}, {})",
                bbox.xmin(),
                bbox.ymin(),
                bbox.xmax(),
                bbox.ymax()
            ),
            context.clone(),
        ));
    } else if bbox.area() == 0 {
        report.add(ValidationIssue::warning(
            IssueCode::DegenerateBBox,
            format!("Zero area: {}x{}", bbox.width(), bbox.height()),
            context.clone(),
        ));
    }

    if bbox.to_array().iter().any(|&v| v < 0) {
        report.add(ValidationIssue::warning(
            IssueCode::NegativeCoordinate,
            format!(
                "Bounding box ({}, {}, {}, {}) has negative coordinates",
                bbox.xmin(),
                bbox.ymin(),
                bbox.xmax(),
                bbox.ymax()
            ),
            context.clone(),
        ));
    }
}

fn validate_segment(segment: &Segment, context: &IssueContext, report: &mut ValidationReport) {
    if segment.len() < 3 {
        report.add(ValidationIssue::warning(
            IssueCode::DegeneratePolygon,
            format!("Polygon has {} point(s), need at least 3", segment.len()),
            context.clone(),
        ));
    } else if segment.area() == 0.0 {
        report.add(ValidationIssue::warning(
            IssueCode::ZeroAreaPolygon,
            format!("Polygon of {} points encloses no area", segment.len()),
            context.clone(),
        ));
    }

    if segment.points().iter().any(|p| p.x < 0 || p.y < 0) {
        report.add(ValidationIssue::warning(
            IssueCode::NegativeCoordinate,
            "Polygon has negative coordinates",
            context.clone(),
        ));
    }
}
