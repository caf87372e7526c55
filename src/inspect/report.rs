//! Inspect report types and terminal formatting.

use std::fmt;

use serde::Serialize;

use crate::annotation::Task;

/// The result of inspecting a batch of annotations.
#[derive(Clone, Debug, Serialize)]
pub struct InspectReport {
    /// Summary counts for the batch.
    pub summary: SummarySection,
    /// Record counts per task, in routing order.
    pub tasks: Vec<TaskCount>,
    /// Label distribution histogram.
    pub labels: LabelsSection,
    /// Bounding box and polygon statistics.
    pub geometry: GeometryStats,
    /// Display options for formatting.
    #[serde(skip)]
    pub(crate) bar_width: usize,
}

/// Summary counts for the batch.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SummarySection {
    /// Total number of records.
    pub annotations: usize,
    /// Number of distinct image file names.
    pub images: usize,
    /// Records without a file name.
    pub unnamed: usize,
    /// Number of distinct class labels.
    pub distinct_classes: usize,
    /// Records without any class label.
    pub unlabeled: usize,
}

/// Number of records serving one task.
#[derive(Clone, Debug, Serialize)]
pub struct TaskCount {
    pub task: Task,
    pub count: usize,
}

/// Label distribution section.
#[derive(Clone, Debug, Serialize)]
pub struct LabelsSection {
    /// How many top labels to show.
    pub top_n: usize,
    /// Total distinct labels in the batch.
    pub total_distinct: usize,
    /// Total label occurrences counted.
    pub total_labels: usize,
    /// Top label entries (sorted by count descending).
    pub entries: Vec<LabelCount>,
    /// Sum of counts for labels not in the top N.
    pub other_count: usize,
}

/// A single label with its occurrence count.
#[derive(Clone, Debug, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

/// Geometry statistics.
///
/// Width and height ranges cover properly ordered boxes only.
#[derive(Clone, Debug, Default, Serialize)]
pub struct GeometryStats {
    /// Records carrying a bounding box.
    pub bboxes: usize,
    /// Boxes with min <= max on both axes.
    pub ordered_bboxes: usize,
    /// Ordered boxes with zero area.
    pub degenerate_bboxes: usize,
    pub min_width: Option<i128>,
    pub max_width: Option<i128>,
    pub min_height: Option<i128>,
    pub max_height: Option<i128>,
    /// Records carrying a polygon.
    pub segments: usize,
    /// Polygons with fewer than three points.
    pub degenerate_segments: usize,
    pub min_points: Option<usize>,
    pub max_points: Option<usize>,
    pub mean_points: Option<f64>,
}

const RULE_WIDTH: usize = 59;

impl fmt::Display for InspectReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "╭─────────────────────────────────────────────────────────────╮")?;
        writeln!(f, "│              Annotation Inspection Report                   │")?;
        writeln!(f, "╰─────────────────────────────────────────────────────────────╯")?;
        writeln!(f)?;

        self.fmt_summary(f)?;
        writeln!(f)?;

        self.fmt_tasks(f)?;
        writeln!(f)?;

        self.fmt_labels(f)?;
        writeln!(f)?;

        self.fmt_geometry(f)?;

        Ok(())
    }
}

impl InspectReport {
    fn fmt_summary(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.summary;

        section_header(f, "Summary")?;
        writeln!(f, "│   Annotations:   {:>8}", format_number(s.annotations))?;
        writeln!(f, "│   Images:        {:>8}", format_number(s.images))?;
        writeln!(f, "│   Classes:       {:>8}", format_number(s.distinct_classes))?;
        if s.unnamed > 0 {
            writeln!(f, "│   Unnamed:       {:>8}", format_number(s.unnamed))?;
        }
        if s.unlabeled > 0 {
            writeln!(f, "│   Unlabeled:     {:>8}", format_number(s.unlabeled))?;
        }
        section_footer(f)
    }

    fn fmt_tasks(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        section_header(f, "Tasks")?;
        for entry in &self.tasks {
            writeln!(
                f,
                "│   {:<22} {:>8}  ({:>6})",
                entry.task.as_str(),
                format_number(entry.count),
                fmt_percent(entry.count, self.summary.annotations)
            )?;
        }
        section_footer(f)
    }

    fn fmt_labels(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let l = &self.labels;

        let header = if l.total_distinct > l.top_n {
            format!("Labels (top {} of {})", l.top_n, l.total_distinct)
        } else {
            format!("Labels ({})", l.total_distinct)
        };
        section_header(f, &header)?;

        if l.entries.is_empty() {
            writeln!(f, "│   No labels found.")?;
        } else {
            let max_count = l.entries.iter().map(|e| e.count).max().unwrap_or(1);

            for entry in &l.entries {
                writeln!(
                    f,
                    "│   {:<16} {:>7} {:>6}  {}",
                    truncate_label(&entry.label, 16),
                    format_number(entry.count),
                    fmt_percent(entry.count, l.total_labels),
                    render_bar(entry.count, max_count, self.bar_width)
                )?;
            }

            if l.other_count > 0 {
                writeln!(
                    f,
                    "│   {:<16} {:>7} {:>6}  {}",
                    "(other)",
                    format_number(l.other_count),
                    fmt_percent(l.other_count, l.total_labels),
                    render_bar(l.other_count, max_count, self.bar_width)
                )?;
            }
        }
        section_footer(f)
    }

    fn fmt_geometry(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let g = &self.geometry;

        section_header(f, "Geometry")?;

        if g.bboxes == 0 && g.segments == 0 {
            writeln!(f, "│   No geometry found.")?;
            return section_footer(f);
        }

        if g.bboxes > 0 {
            writeln!(f, "│   Bounding boxes: {:>8}", format_number(g.bboxes))?;
            if let (Some(min_w), Some(max_w), Some(min_h), Some(max_h)) =
                (g.min_width, g.max_width, g.min_height, g.max_height)
            {
                writeln!(f, "│     Width  (px):  min {:>8}    max {:>8}", min_w, max_w)?;
                writeln!(f, "│     Height (px):  min {:>8}    max {:>8}", min_h, max_h)?;
            }
            writeln!(
                f,
                "│     ✓ Properly ordered: {:>7} / {:>7}  ({:>6})",
                format_number(g.ordered_bboxes),
                format_number(g.bboxes),
                fmt_percent(g.ordered_bboxes, g.bboxes)
            )?;
            if g.degenerate_bboxes > 0 {
                writeln!(
                    f,
                    "│     ⚠ Zero area:        {:>7} / {:>7}",
                    format_number(g.degenerate_bboxes),
                    format_number(g.bboxes)
                )?;
            }
        }

        if g.segments > 0 {
            writeln!(f, "│   Polygons:       {:>8}", format_number(g.segments))?;
            if let (Some(min), Some(max), Some(mean)) = (g.min_points, g.max_points, g.mean_points)
            {
                writeln!(
                    f,
                    "│     Points:       min {:>8}    max {:>8}    mean {:.1}",
                    min, max, mean
                )?;
            }
            if g.degenerate_segments > 0 {
                writeln!(
                    f,
                    "│     ⚠ Under 3 points:   {:>7} / {:>7}",
                    format_number(g.degenerate_segments),
                    format_number(g.segments)
                )?;
            }
        }

        section_footer(f)
    }
}

fn section_header(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    let fill = RULE_WIDTH.saturating_sub(title.chars().count() + 3);
    writeln!(f, "┌─ {} {}┐", title, "─".repeat(fill))?;
    writeln!(f, "│")
}

fn section_footer(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "│")?;
    writeln!(f, "└{}┘", "─".repeat(RULE_WIDTH))
}

/// Format a number with thousands separators.
fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format a percentage, handling zero denominators.
fn fmt_percent(numerator: usize, denominator: usize) -> String {
    if denominator == 0 {
        "n/a".to_string()
    } else {
        format!("{:.1}%", (numerator as f64 / denominator as f64) * 100.0)
    }
}

/// Render a horizontal bar using Unicode block characters.
fn render_bar(count: usize, max_count: usize, width: usize) -> String {
    if max_count == 0 || width == 0 {
        return String::new();
    }

    let filled = ((count * width) / max_count).min(width);
    "█".repeat(filled) + &"░".repeat(width - filled)
}

/// Truncate a label to `max_len` characters.
fn truncate_label(label: &str, max_len: usize) -> String {
    if label.chars().count() <= max_len {
        label.to_string()
    } else {
        let kept: String = label.chars().take(max_len - 1).collect();
        format!("{}…", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(123), "123");
        assert_eq!(format_number(1234), "1,234");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_fmt_percent() {
        assert_eq!(fmt_percent(0, 0), "n/a");
        assert_eq!(fmt_percent(1, 2), "50.0%");
        assert_eq!(fmt_percent(1, 3), "33.3%");
    }

    #[test]
    fn test_render_bar() {
        assert_eq!(render_bar(5, 10, 10), "█████░░░░░");
        assert_eq!(render_bar(10, 10, 10), "██████████");
        assert_eq!(render_bar(0, 10, 10), "░░░░░░░░░░");
    }

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("short", 10), "short");
        assert_eq!(truncate_label("verylonglabel", 10), "verylongl…");
        assert_eq!(truncate_label("ééééééééééé", 4), "ééé…");
    }
}
