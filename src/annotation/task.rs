//! Task tags used by the remote service to route annotation records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AnnotationError;

/// The downstream ML task an annotation record serves.
///
/// Derived from the geometry an [`Annotation`](super::Annotation) carries;
/// never stored independently.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    /// Classes only, attached to the whole image.
    ImageClassification,
    /// Classes attached to a bounding box.
    ObjectDetection,
    /// Classes attached to a polygon.
    InstanceSegmentation,
}

impl Task {
    /// All task tags, in routing order.
    pub const ALL: [Task; 3] = [
        Task::ImageClassification,
        Task::ObjectDetection,
        Task::InstanceSegmentation,
    ];

    /// Returns the wire tag for this task.
    pub fn as_str(&self) -> &'static str {
        match self {
            Task::ImageClassification => "image_classification",
            Task::ObjectDetection => "object_detection",
            Task::InstanceSegmentation => "instance_segmentation",
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Task {
    type Err = AnnotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Task::ALL
            .into_iter()
            .find(|task| task.as_str() == s)
            .ok_or_else(|| AnnotationError::UnknownTask(s.to_string()))
    }
}
