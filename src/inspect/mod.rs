//! Annotation batch inspection and statistics.
//!
//! This module analyzes a batch of annotation records and produces a
//! structured report with summary counts, per-task counts, a class label
//! histogram and geometry metrics.

mod report;

pub use report::{GeometryStats, InspectReport, LabelCount, LabelsSection, SummarySection, TaskCount};

use std::collections::{HashMap, HashSet};

use crate::annotation::{group_by_task, Annotation, AnnotationObject, Task};

/// Options for batch inspection.
#[derive(Clone, Debug)]
pub struct InspectOptions {
    /// Number of top labels to show in the histogram.
    pub top_labels: usize,
    /// Width of histogram bars (in characters).
    pub bar_width: usize,
}

impl Default for InspectOptions {
    fn default() -> Self {
        Self {
            top_labels: 10,
            bar_width: 20,
        }
    }
}

/// Inspect a batch of annotations and produce a detailed report.
pub fn inspect_annotations(annotations: &[Annotation], opts: &InspectOptions) -> InspectReport {
    InspectReport {
        summary: compute_summary(annotations),
        tasks: compute_tasks(annotations),
        labels: compute_labels(annotations, opts.top_labels),
        geometry: compute_geometry(annotations),
        bar_width: opts.bar_width,
    }
}

fn compute_summary(annotations: &[Annotation]) -> SummarySection {
    let images: HashSet<&str> = annotations
        .iter()
        .filter_map(|ann| ann.filename.as_deref())
        .collect();
    let classes: HashSet<&str> = annotations
        .iter()
        .flat_map(|ann| ann.classes.iter().map(String::as_str))
        .collect();

    SummarySection {
        annotations: annotations.len(),
        images: images.len(),
        unnamed: annotations
            .iter()
            .filter(|ann| ann.filename.is_none())
            .count(),
        distinct_classes: classes.len(),
        unlabeled: annotations
            .iter()
            .filter(|ann| ann.classes.is_empty())
            .count(),
    }
}

fn compute_tasks(annotations: &[Annotation]) -> Vec<TaskCount> {
    let groups = group_by_task(annotations);
    Task::ALL
        .into_iter()
        .map(|task| TaskCount {
            task,
            count: groups.get(&task).map_or(0, Vec::len),
        })
        .collect()
}

/// Compute label distribution histogram.
fn compute_labels(annotations: &[Annotation], top_n: usize) -> LabelsSection {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for label in annotations.iter().flat_map(|ann| ann.classes.iter()) {
        *counts.entry(label.as_str()).or_insert(0) += 1;
    }

    // Sort by count descending, then by name ascending for deterministic output
    let mut sorted: Vec<(&str, usize)> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let total_distinct = sorted.len();
    let total_labels = sorted.iter().map(|(_, count)| count).sum();

    let other_count = sorted.iter().skip(top_n).map(|(_, count)| count).sum();
    let entries = sorted
        .into_iter()
        .take(top_n)
        .map(|(label, count)| LabelCount {
            label: label.to_string(),
            count,
        })
        .collect();

    LabelsSection {
        top_n,
        total_distinct,
        total_labels,
        entries,
        other_count,
    }
}

/// Compute bounding box and polygon statistics.
fn compute_geometry(annotations: &[Annotation]) -> GeometryStats {
    let mut stats = GeometryStats::default();
    let mut total_points = 0usize;

    for ann in annotations {
        match ann.object() {
            Some(AnnotationObject::BoundingBox(bbox)) => {
                stats.bboxes += 1;
                if !bbox.is_ordered() {
                    continue;
                }
                stats.ordered_bboxes += 1;
                if bbox.area() == 0 {
                    stats.degenerate_bboxes += 1;
                }

                let (width, height) = (bbox.width(), bbox.height());
                stats.min_width = Some(stats.min_width.map_or(width, |m| m.min(width)));
                stats.max_width = Some(stats.max_width.map_or(width, |m| m.max(width)));
                stats.min_height = Some(stats.min_height.map_or(height, |m| m.min(height)));
                stats.max_height = Some(stats.max_height.map_or(height, |m| m.max(height)));
            }
            Some(AnnotationObject::Segment(segment)) => {
                stats.segments += 1;
                let n = segment.len();
                total_points += n;
                if n < 3 {
                    stats.degenerate_segments += 1;
                }
                stats.min_points = Some(stats.min_points.map_or(n, |m| m.min(n)));
                stats.max_points = Some(stats.max_points.map_or(n, |m| m.max(n)));
            }
            None => {}
        }
    }

    if stats.segments > 0 {
        stats.mean_points = Some(total_points as f64 / stats.segments as f64);
    }

    stats
}
