//! The annotation record model.
//!
//! An [`Annotation`] is one labeling record for one image: an optional
//! filename, an ordered list of class labels and at most one geometric
//! object. The object is a sum type, so "both a box and a polygon" is
//! unrepresentable, and the task tag is a `match` over it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use super::bbox::BoundingBox;
use super::classes::Classes;
use super::record::{
    bbox_from_value, segment_from_value, type_mismatch, AnnotationRecord, AnnotationRecordRef,
};
use super::segment::Segment;
use super::task::Task;
use crate::error::AnnotationError;

/// The geometry attached to an annotation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AnnotationObject {
    BoundingBox(BoundingBox),
    Segment(Segment),
}

impl AnnotationObject {
    /// Returns the fixed task tag of this variant.
    pub fn task(&self) -> Task {
        match self {
            AnnotationObject::BoundingBox(_) => BoundingBox::TASK,
            AnnotationObject::Segment(_) => Segment::TASK,
        }
    }
}

impl From<BoundingBox> for AnnotationObject {
    fn from(bbox: BoundingBox) -> Self {
        AnnotationObject::BoundingBox(bbox)
    }
}

impl From<Segment> for AnnotationObject {
    fn from(segment: Segment) -> Self {
        AnnotationObject::Segment(segment)
    }
}

impl TryFrom<&Value> for AnnotationObject {
    type Error = AnnotationError;

    /// Classifies an untyped value as a bounding box (`xmin`, `ymin`,
    /// `xmax`, `ymax`) or a segment (`points`).
    ///
    /// # Errors
    /// Returns [`AnnotationError::TypeMismatch`] for anything else.
    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) if map.contains_key("points") => {
                segment_from_value(value).map(AnnotationObject::Segment)
            }
            Value::Object(map)
                if ["xmin", "ymin", "xmax", "ymax"]
                    .iter()
                    .all(|key| map.contains_key(*key)) =>
            {
                bbox_from_value(value).map(AnnotationObject::BoundingBox)
            }
            other => Err(type_mismatch(other)),
        }
    }
}

impl TryFrom<Value> for AnnotationObject {
    type Error = AnnotationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        AnnotationObject::try_from(&value)
    }
}

/// One labeling record for one image.
///
/// # Example
///
/// ```
/// use remo::annotation::{Annotation, Task};
///
/// let mut annotation = Annotation::new("image.png", "Dog");
/// assert_eq!(annotation.task(), Task::ImageClassification);
///
/// annotation.set_bbox(&[1, 23, 3, 2])?;
/// assert_eq!(annotation.task(), Task::ObjectDetection);
///
/// annotation.set_segment(&[1, 23, 3, 2, 1, 2, 1, 2])?;
/// assert_eq!(annotation.task(), Task::InstanceSegmentation);
/// assert!(annotation.bbox().is_none());
/// # Ok::<(), remo::AnnotationError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "AnnotationRecord")]
pub struct Annotation {
    /// File name of the image this record refers to.
    pub filename: Option<String>,

    /// Labels for the whole image, or for the object when one is set.
    pub classes: Classes,

    object: Option<AnnotationObject>,
}

impl Annotation {
    /// Creates a classification record for `filename`.
    ///
    /// `classes` accepts a single label or a list of labels.
    pub fn new(filename: impl Into<String>, classes: impl Into<Classes>) -> Self {
        Self {
            filename: Some(filename.into()),
            classes: classes.into(),
            object: None,
        }
    }

    /// Creates a record from all of its parts.
    pub fn from_parts(
        filename: Option<String>,
        classes: impl Into<Classes>,
        object: Option<AnnotationObject>,
    ) -> Self {
        Self {
            filename,
            classes: classes.into(),
            object,
        }
    }

    /// Creates a record whose object is given as an untyped value.
    ///
    /// The object is checked before anything else is built.
    ///
    /// # Errors
    /// Returns [`AnnotationError::TypeMismatch`] if `object` is neither a
    /// bounding box nor a segment.
    pub fn try_from_parts(
        filename: Option<String>,
        classes: impl Into<Classes>,
        object: Option<&Value>,
    ) -> Result<Self, AnnotationError> {
        let object = object.map(AnnotationObject::try_from).transpose()?;
        Ok(Self::from_parts(filename, classes, object))
    }

    /// Sets the object, consuming and returning the record.
    pub fn with_object(mut self, object: impl Into<AnnotationObject>) -> Self {
        self.object = Some(object.into());
        self
    }

    /// Sets the object from an untyped value, consuming and returning the
    /// record.
    ///
    /// # Errors
    /// Returns [`AnnotationError::TypeMismatch`] if `object` is neither a
    /// bounding box nor a segment.
    pub fn try_with_object(mut self, object: &Value) -> Result<Self, AnnotationError> {
        self.object = Some(AnnotationObject::try_from(object)?);
        Ok(self)
    }

    /// Returns the task this record serves.
    pub fn task(&self) -> Task {
        self.object
            .as_ref()
            .map_or(Task::ImageClassification, AnnotationObject::task)
    }

    pub fn object(&self) -> Option<&AnnotationObject> {
        self.object.as_ref()
    }

    /// Replaces the object with an already built one.
    pub fn set_object(&mut self, object: impl Into<AnnotationObject>) {
        self.object = Some(object.into());
    }

    /// Returns the bounding box, if that is the current object.
    pub fn bbox(&self) -> Option<&BoundingBox> {
        match &self.object {
            Some(AnnotationObject::BoundingBox(bbox)) => Some(bbox),
            _ => None,
        }
    }

    /// Replaces the object with a bounding box `[xmin, ymin, xmax, ymax]`.
    ///
    /// Any previous object, including a segment, is discarded.
    ///
    /// # Errors
    /// Returns [`AnnotationError::BoundingBoxArity`] unless exactly four
    /// values are given; the record is left unchanged.
    pub fn set_bbox(&mut self, values: &[i64]) -> Result<(), AnnotationError> {
        let bbox = BoundingBox::try_from(values)?;
        self.object = Some(AnnotationObject::BoundingBox(bbox));
        Ok(())
    }

    /// Consuming form of [`set_bbox`](Self::set_bbox).
    pub fn with_bbox(mut self, values: &[i64]) -> Result<Self, AnnotationError> {
        self.set_bbox(values)?;
        Ok(self)
    }

    /// Returns the segment, if that is the current object.
    pub fn segment(&self) -> Option<&Segment> {
        match &self.object {
            Some(AnnotationObject::Segment(segment)) => Some(segment),
            _ => None,
        }
    }

    /// Replaces the object with a polygon from `[x0, y0, x1, y1, ...]`.
    ///
    /// # Errors
    /// Returns [`AnnotationError::EmptySegment`] or
    /// [`AnnotationError::OddSegment`]; the record is left unchanged.
    pub fn set_segment(&mut self, coordinates: &[i64]) -> Result<(), AnnotationError> {
        let segment = Segment::try_from(coordinates)?;
        self.object = Some(AnnotationObject::Segment(segment));
        Ok(())
    }

    /// Consuming form of [`set_segment`](Self::set_segment).
    pub fn with_segment(mut self, coordinates: &[i64]) -> Result<Self, AnnotationError> {
        self.set_segment(coordinates)?;
        Ok(self)
    }
}

impl Serialize for Annotation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        AnnotationRecordRef::from(self).serialize(serializer)
    }
}

/// Partitions records by task, keeping input order within each task.
///
/// The remote service takes one annotation task per upload, so a mixed
/// batch has to be split before it is sent.
pub fn group_by_task(annotations: &[Annotation]) -> BTreeMap<Task, Vec<&Annotation>> {
    let mut groups: BTreeMap<Task, Vec<&Annotation>> = BTreeMap::new();
    for annotation in annotations {
        groups.entry(annotation.task()).or_default().push(annotation);
    }
    groups
}
