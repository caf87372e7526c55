//! Validation report types for structured error reporting.
//!
//! This module provides rich, structured validation results that can be
//! displayed to users, written to files, or processed programmatically.

use std::fmt;

use serde::Serialize;

/// The result of validating a batch of annotations.
///
/// Contains all issues found during validation, categorized by severity.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ValidationReport {
    /// All issues found during validation.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Creates a new empty report.
    pub fn new() -> Self {
        Self { issues: Vec::new() }
    }

    /// Adds an issue to the report.
    pub fn add(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    /// Returns the number of errors in the report.
    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    /// Returns the number of warnings in the report.
    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    /// Returns true if there are no errors.
    pub fn is_ok(&self) -> bool {
        self.error_count() == 0
    }

    /// Returns true if there are no issues at all.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Renders the report as the JSON document printed by `remo validate --output json`.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        #[derive(Serialize)]
        struct JsonReport<'a> {
            error_count: usize,
            warning_count: usize,
            issues: &'a [ValidationIssue],
        }

        serde_json::to_string_pretty(&JsonReport {
            error_count: self.error_count(),
            warning_count: self.warning_count(),
            issues: &self.issues,
        })
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.issues.is_empty() {
            return writeln!(f, "Validation passed: no issues found");
        }

        writeln!(
            f,
            "Validation completed with {} error(s) and {} warning(s):",
            self.error_count(),
            self.warning_count()
        )?;
        writeln!(f)?;

        for issue in &self.issues {
            writeln!(f, "  {}", issue)?;
        }

        Ok(())
    }
}

/// A single validation issue (error or warning).
#[derive(Clone, Debug, Serialize)]
pub struct ValidationIssue {
    /// The severity of the issue.
    pub severity: Severity,

    /// A stable code for the issue type.
    pub code: IssueCode,

    /// A human-readable description of the issue.
    pub message: String,

    /// Context about where the issue occurred.
    pub context: IssueContext,
}

impl ValidationIssue {
    pub fn new(
        severity: Severity,
        code: IssueCode,
        message: impl Into<String>,
        context: IssueContext,
    ) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            context,
        }
    }

    pub fn error(code: IssueCode, message: impl Into<String>, context: IssueContext) -> Self {
        Self::new(Severity::Error, code, message, context)
    }

    pub fn warning(code: IssueCode, message: impl Into<String>, context: IssueContext) -> Self {
        Self::new(Severity::Warning, code, message, context)
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN ",
        };
        write!(
            f,
            "[{}] {:?} in {}: {}",
            severity, self.code, self.context, self.message
        )
    }
}

/// The severity of a validation issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Accepted by the model but likely to surprise the remote service.
    Warning,
    /// Data the remote service would reject or misroute.
    Error,
}

/// A stable code identifying the type of validation issue.
///
/// These codes can be used for filtering, ignoring specific issues,
/// or programmatic handling of validation results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum IssueCode {
    // Record issues
    /// A record has no image file name.
    MissingFileName,
    /// A record has an empty image file name.
    EmptyFileName,
    /// A record carries no class labels.
    NoClasses,
    /// A class label is the empty string.
    EmptyClassLabel,
    /// The same label appears twice on one record.
    DuplicateClassLabel,
    /// The same record appears more than once in the batch.
    DuplicateRecord,

    // Bounding box issues
    /// A bounding box has min > max on some axis.
    InvalidBBoxOrdering,
    /// An ordered bounding box has zero area.
    DegenerateBBox,
    /// A coordinate is negative.
    NegativeCoordinate,

    // Segment issues
    /// A polygon has fewer than three points.
    DegeneratePolygon,
    /// A polygon of three or more points encloses no area.
    ZeroAreaPolygon,

    // Batch issues
    /// The batch mixes several tasks and must be split before upload.
    MixedTasks,
}

/// Context about where a validation issue occurred.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum IssueContext {
    /// Issue with the batch as a whole.
    Batch,
    /// Issue with the record at `index`, optionally naming its image.
    Annotation {
        index: usize,
        filename: Option<String>,
    },
}

impl fmt::Display for IssueContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueContext::Batch => write!(f, "batch"),
            IssueContext::Annotation {
                index,
                filename: Some(name),
            } => write!(f, "annotation {} ({})", index, name),
            IssueContext::Annotation {
                index,
                filename: None,
            } => write!(f, "annotation {}", index),
        }
    }
}
