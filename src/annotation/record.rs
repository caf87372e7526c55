//! Wire shape of a single annotation record.
//!
//! Serialization writes `filename`, `task`, `classes` and, depending on the
//! object, a `bbox` or a `segment` key. Deserialization is more lenient
//! about how geometry is spelled but every shape goes through the same
//! setters as in-memory construction, so the model invariants hold for
//! parsed records too.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::bbox::BoundingBox;
use super::classes::Classes;
use super::model::{Annotation, AnnotationObject};
use super::segment::{Point, Segment};
use super::task::Task;
use crate::error::AnnotationError;

/// Borrowed view written for every annotation.
#[derive(Serialize)]
pub struct AnnotationRecordRef<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    filename: Option<&'a str>,
    task: Task,
    classes: &'a Classes,
    #[serde(skip_serializing_if = "Option::is_none")]
    bbox: Option<&'a BoundingBox>,
    #[serde(skip_serializing_if = "Option::is_none")]
    segment: Option<&'a Segment>,
}

impl<'a> From<&'a Annotation> for AnnotationRecordRef<'a> {
    fn from(annotation: &'a Annotation) -> Self {
        Self {
            filename: annotation.filename.as_deref(),
            task: annotation.task(),
            classes: &annotation.classes,
            bbox: annotation.bbox(),
            segment: annotation.segment(),
        }
    }
}

/// Owned record as read from JSON, before model validation.
///
/// `bbox` accepts `[xmin, ymin, xmax, ymax]` or the named-field object,
/// `segment` accepts a flat coordinate list or `{"points": [...]}`, and
/// `object` accepts either object form.
#[derive(Debug, Deserialize)]
pub struct AnnotationRecord {
    #[serde(default)]
    filename: Option<String>,
    #[serde(default)]
    task: Option<String>,
    #[serde(default)]
    classes: Classes,
    #[serde(default)]
    bbox: Option<Value>,
    #[serde(default)]
    segment: Option<Value>,
    #[serde(default)]
    object: Option<Value>,
}

impl TryFrom<AnnotationRecord> for Annotation {
    type Error = AnnotationError;

    fn try_from(record: AnnotationRecord) -> Result<Self, Self::Error> {
        let AnnotationRecord {
            filename,
            task,
            classes,
            bbox,
            segment,
            object,
        } = record;

        let object = match (bbox, segment, object) {
            (None, None, None) => None,
            (Some(bbox), None, None) => Some(AnnotationObject::BoundingBox(bbox_from_value(&bbox)?)),
            (None, Some(segment), None) => {
                Some(AnnotationObject::Segment(segment_from_value(&segment)?))
            }
            (None, None, Some(object)) => Some(AnnotationObject::try_from(&object)?),
            _ => return Err(AnnotationError::ConflictingGeometry),
        };

        let annotation = Annotation::from_parts(filename, classes, object);

        if let Some(declared) = task {
            let declared: Task = declared.parse()?;
            let derived = annotation.task();
            if declared != derived {
                return Err(AnnotationError::TaskMismatch {
                    declared: declared.to_string(),
                    derived: derived.to_string(),
                });
            }
        }

        Ok(annotation)
    }
}

const BBOX_FIELDS: [&str; 4] = ["xmin", "ymin", "xmax", "ymax"];

/// Builds a bounding box from a 4-element array or a named-field object.
pub(crate) fn bbox_from_value(value: &Value) -> Result<BoundingBox, AnnotationError> {
    match value {
        Value::Array(items) => BoundingBox::try_from(integers(items)?.as_slice()),
        Value::Object(map) => {
            let mut values = [0i64; 4];
            for (slot, key) in values.iter_mut().zip(BBOX_FIELDS) {
                let field = map.get(key).ok_or_else(|| type_mismatch(value))?;
                *slot = coordinate(field).map_err(|found| AnnotationError::TypeMismatch {
                    found: format!("{} for '{}'", found, key),
                })?;
            }
            Ok(BoundingBox::from(values))
        }
        other => Err(type_mismatch(other)),
    }
}

/// Builds a segment from a flat coordinate array or a `points` object.
pub(crate) fn segment_from_value(value: &Value) -> Result<Segment, AnnotationError> {
    match value {
        Value::Array(items) => Segment::try_from(integers(items)?.as_slice()),
        Value::Object(map) => {
            let points = map.get("points").ok_or_else(|| type_mismatch(value))?;
            let points = Vec::<Point>::deserialize(points).map_err(|_| type_mismatch(points))?;
            Segment::from_points(points)
        }
        other => Err(type_mismatch(other)),
    }
}

fn integers(items: &[Value]) -> Result<Vec<i64>, AnnotationError> {
    items
        .iter()
        .map(|item| coordinate(item).map_err(|found| AnnotationError::TypeMismatch { found }))
        .collect()
}

/// Reads one coordinate, describing the value on failure.
fn coordinate(item: &Value) -> Result<i64, String> {
    match item {
        Value::Number(n) => n.as_i64().ok_or_else(|| {
            if n.is_f64() {
                format!("non-integer coordinate {}", n)
            } else {
                format!("coordinate {} out of range", n)
            }
        }),
        other => Err(format!("non-integer coordinate {}", other)),
    }
}

pub(crate) fn type_mismatch(value: &Value) -> AnnotationError {
    let found = match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {}", b),
        Value::Number(n) => format!("number {}", n),
        Value::String(s) => format!("string {:?}", s),
        Value::Array(items) => format!("array of {} element(s)", items.len()),
        Value::Object(_) => "object without bounding box or segment fields".to_string(),
    };
    AnnotationError::TypeMismatch { found }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> Result<Annotation, AnnotationError> {
        let record: AnnotationRecord = serde_json::from_value(value).unwrap();
        Annotation::try_from(record)
    }

    #[test]
    fn test_bbox_array_goes_through_setter() {
        let annotation = parse(json!({"filename": "a.png", "classes": "Dog", "bbox": [1, 2, 3, 4]}))
            .unwrap();
        assert_eq!(annotation.bbox().unwrap().to_array(), [1, 2, 3, 4]);

        assert_eq!(
            parse(json!({"bbox": [1, 2, 3]})),
            Err(AnnotationError::BoundingBoxArity { found: 3 })
        );
    }

    #[test]
    fn test_segment_shapes() {
        let flat = parse(json!({"segment": [1, 2, 3, 4]})).unwrap();
        let nested =
            parse(json!({"segment": {"points": [{"x": 1, "y": 2}, {"x": 3, "y": 4}]}})).unwrap();
        assert_eq!(flat, nested);

        assert_eq!(
            parse(json!({"segment": []})),
            Err(AnnotationError::EmptySegment)
        );
        assert_eq!(
            parse(json!({"segment": {"points": []}})),
            Err(AnnotationError::EmptySegment)
        );
        assert_eq!(
            parse(json!({"segment": [1, 2, 3]})),
            Err(AnnotationError::OddSegment { found: 3 })
        );
    }

    #[test]
    fn test_object_type_mismatch() {
        assert_eq!(
            parse(json!({"object": 42})),
            Err(AnnotationError::TypeMismatch {
                found: "number 42".into()
            })
        );
        assert!(matches!(
            parse(json!({"bbox": [1.5, 2, 3, 4]})),
            Err(AnnotationError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_coordinate_errors_name_the_value() {
        let too_big: Value = serde_json::from_str(
            r#"{"bbox": [10000000000000000000, 0, 1, 1]}"#,
        )
        .unwrap();
        assert_eq!(
            parse(too_big),
            Err(AnnotationError::TypeMismatch {
                found: "coordinate 10000000000000000000 out of range".into()
            })
        );

        assert_eq!(
            parse(json!({"bbox": {"xmin": 1.5, "ymin": 2, "xmax": 3, "ymax": 4}})),
            Err(AnnotationError::TypeMismatch {
                found: "non-integer coordinate 1.5 for 'xmin'".into()
            })
        );
        assert_eq!(
            parse(json!({"bbox": {"xmin": 1, "ymin": "2", "xmax": 3, "ymax": 4}})),
            Err(AnnotationError::TypeMismatch {
                found: "non-integer coordinate \"2\" for 'ymin'".into()
            })
        );
        assert_eq!(
            parse(json!({"bbox": {"xmin": 1, "ymin": 2}})),
            Err(AnnotationError::TypeMismatch {
                found: "object without bounding box or segment fields".into()
            })
        );
    }

    #[test]
    fn test_null_object_is_absent() {
        let annotation = parse(json!({"classes": ["Dog"], "object": null})).unwrap();
        assert_eq!(annotation.task(), Task::ImageClassification);
    }

    #[test]
    fn test_conflicting_geometry() {
        assert_eq!(
            parse(json!({"bbox": [1, 2, 3, 4], "segment": [1, 2]})),
            Err(AnnotationError::ConflictingGeometry)
        );
    }

    #[test]
    fn test_declared_task_must_match() {
        assert!(parse(json!({"task": "object_detection", "bbox": [1, 2, 3, 4]})).is_ok());
        assert_eq!(
            parse(json!({"task": "object_detection", "classes": "Dog"})),
            Err(AnnotationError::TaskMismatch {
                declared: "object_detection".into(),
                derived: "image_classification".into(),
            })
        );
        assert_eq!(
            parse(json!({"task": "keypoints"})),
            Err(AnnotationError::UnknownTask("keypoints".into()))
        );
    }

    #[test]
    fn test_written_shape() {
        let annotation = Annotation::new("img.png", "Dog")
            .with_bbox(&[1, 23, 3, 2])
            .unwrap();
        let value = serde_json::to_value(&annotation).unwrap();
        assert_eq!(
            value,
            json!({
                "filename": "img.png",
                "task": "object_detection",
                "classes": ["Dog"],
                "bbox": {"xmin": 1, "ymin": 23, "xmax": 3, "ymax": 2}
            })
        );

        let bare = serde_json::to_value(Annotation::default()).unwrap();
        assert_eq!(bare, json!({"task": "image_classification", "classes": []}));
    }
}
