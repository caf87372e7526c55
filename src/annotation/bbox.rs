//! Axis-aligned bounding boxes in pixel coordinates.

use serde::Serialize;

use super::task::Task;
use crate::error::AnnotationError;

/// An axis-aligned bounding box (xmin, ymin, xmax, ymax) in pixels.
///
/// Note: this type does NOT enforce that min <= max. Malformed boxes can be
/// represented so that [`validation`](crate::validation) reports them
/// instead of rejecting them at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct BoundingBox {
    xmin: i64,
    ymin: i64,
    xmax: i64,
    ymax: i64,
}

impl BoundingBox {
    /// The task every bounding box annotation serves.
    pub const TASK: Task = Task::ObjectDetection;

    #[inline]
    pub(crate) fn from_xyxy(xmin: i64, ymin: i64, xmax: i64, ymax: i64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    #[inline]
    pub fn xmin(&self) -> i64 {
        self.xmin
    }

    #[inline]
    pub fn ymin(&self) -> i64 {
        self.ymin
    }

    #[inline]
    pub fn xmax(&self) -> i64 {
        self.xmax
    }

    #[inline]
    pub fn ymax(&self) -> i64 {
        self.ymax
    }

    /// Returns the width. Negative if the box is malformed (xmax < xmin).
    ///
    /// Widened to `i128` so any pair of `i64` coordinates fits.
    #[inline]
    pub fn width(&self) -> i128 {
        i128::from(self.xmax) - i128::from(self.xmin)
    }

    /// Returns the height. Negative if the box is malformed (ymax < ymin).
    #[inline]
    pub fn height(&self) -> i128 {
        i128::from(self.ymax) - i128::from(self.ymin)
    }

    /// Returns the area. May be zero or negative for malformed boxes.
    ///
    /// Saturates at the `i128` bounds; zero only when a side is zero.
    #[inline]
    pub fn area(&self) -> i128 {
        self.width().saturating_mul(self.height())
    }

    /// Returns true if min <= max on both axes.
    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.xmin <= self.xmax && self.ymin <= self.ymax
    }

    /// Returns the coordinates as `[xmin, ymin, xmax, ymax]`.
    #[inline]
    pub fn to_array(&self) -> [i64; 4] {
        [self.xmin, self.ymin, self.xmax, self.ymax]
    }
}

impl TryFrom<&[i64]> for BoundingBox {
    type Error = AnnotationError;

    /// Builds a box from exactly four values `[xmin, ymin, xmax, ymax]`.
    fn try_from(values: &[i64]) -> Result<Self, Self::Error> {
        match *values {
            [xmin, ymin, xmax, ymax] => Ok(Self::from_xyxy(xmin, ymin, xmax, ymax)),
            _ => Err(AnnotationError::BoundingBoxArity {
                found: values.len(),
            }),
        }
    }
}

impl From<[i64; 4]> for BoundingBox {
    fn from([xmin, ymin, xmax, ymax]: [i64; 4]) -> Self {
        Self::from_xyxy(xmin, ymin, xmax, ymax)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_from_slice() {
        let bbox = BoundingBox::try_from(&[1i64, 23, 3, 2][..]).unwrap();
        assert_eq!(bbox.xmin(), 1);
        assert_eq!(bbox.ymin(), 23);
        assert_eq!(bbox.xmax(), 3);
        assert_eq!(bbox.ymax(), 2);
    }

    #[test]
    fn test_bbox_wrong_arity() {
        let cases: [&[i64]; 3] = [&[1, 2, 3], &[1, 2, 3, 4, 5], &[]];
        for values in cases {
            assert_eq!(
                BoundingBox::try_from(values),
                Err(AnnotationError::BoundingBoxArity {
                    found: values.len()
                })
            );
        }
    }

    #[test]
    fn test_bbox_dimensions() {
        let bbox = BoundingBox::from([10, 20, 100, 80]);
        assert_eq!(bbox.width(), 90);
        assert_eq!(bbox.height(), 60);
        assert_eq!(bbox.area(), 5400);
        assert!(bbox.is_ordered());
    }

    #[test]
    fn test_bbox_dimensions_at_extremes() {
        let bbox = BoundingBox::from([i64::MIN, 0, i64::MAX, 1]);
        assert_eq!(bbox.width(), i128::from(u64::MAX));
        assert_eq!(bbox.area(), i128::from(u64::MAX));

        let bbox = BoundingBox::from([i64::MIN, i64::MIN, i64::MAX, i64::MAX]);
        assert_eq!(bbox.area(), i128::MAX);

        let flat = BoundingBox::from([i64::MIN, 7, i64::MAX, 7]);
        assert_eq!(flat.area(), 0);
    }

    #[test]
    fn test_bbox_unordered_is_representable() {
        let bbox = BoundingBox::from([1, 23, 3, 2]);
        assert!(!bbox.is_ordered());
        assert_eq!(bbox.height(), -21);
    }

    #[test]
    fn test_bbox_serializes_named_fields() {
        let json = serde_json::to_string(&BoundingBox::from([1, 2, 3, 4])).unwrap();
        assert_eq!(json, r#"{"xmin":1,"ymin":2,"xmax":3,"ymax":4}"#);
    }
}
