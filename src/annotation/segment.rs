//! Polygon segments built from flat coordinate lists.

use serde::{Deserialize, Serialize};

use super::task::Task;
use crate::error::AnnotationError;

/// A polygon vertex in pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    #[inline]
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// A polygon, stored as an ordered list of points.
///
/// Always holds at least one point. Like [`BoundingBox`](super::BoundingBox),
/// no geometric sanity beyond that is enforced here: a one- or two-point
/// "polygon" is representable and left to validation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Segment {
    points: Vec<Point>,
}

impl Segment {
    /// The task every segment annotation serves.
    pub const TASK: Task = Task::InstanceSegmentation;

    /// Builds a segment from already paired points.
    ///
    /// # Errors
    /// Returns [`AnnotationError::EmptySegment`] if `points` is empty.
    pub fn from_points(points: Vec<Point>) -> Result<Self, AnnotationError> {
        if points.is_empty() {
            return Err(AnnotationError::EmptySegment);
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a constructed segment.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Flattens back to `[x0, y0, x1, y1, ...]`.
    pub fn coordinates(&self) -> Vec<i64> {
        self.points.iter().flat_map(|p| [p.x, p.y]).collect()
    }

    /// Polygon area by the shoelace formula. Zero for fewer than three points.
    ///
    /// Summed exactly in `i128`; only sums past that range are approximated
    /// in `f64`, so the result is zero exactly when the polygon is flat.
    pub fn area(&self) -> f64 {
        if self.points.len() < 3 {
            return 0.0;
        }
        let edges = || self.points.iter().zip(self.points.iter().cycle().skip(1));
        let exact = edges().try_fold(0i128, |acc, (a, b)| {
            let cross = (i128::from(a.x) * i128::from(b.y))
                .checked_sub(i128::from(b.x) * i128::from(a.y))?;
            acc.checked_add(cross)
        });
        let twice = match exact {
            Some(sum) => sum as f64,
            None => edges()
                .map(|(a, b)| a.x as f64 * b.y as f64 - b.x as f64 * a.y as f64)
                .sum(),
        };
        twice.abs() / 2.0
    }
}

impl TryFrom<&[i64]> for Segment {
    type Error = AnnotationError;

    /// Pairs consecutive values of `[x0, y0, x1, y1, ...]` into points.
    fn try_from(coordinates: &[i64]) -> Result<Self, Self::Error> {
        if coordinates.is_empty() {
            return Err(AnnotationError::EmptySegment);
        }
        if coordinates.len() % 2 == 1 {
            return Err(AnnotationError::OddSegment {
                found: coordinates.len(),
            });
        }

        let points = coordinates
            .chunks_exact(2)
            .map(|pair| Point::new(pair[0], pair[1]))
            .collect();
        Ok(Self { points })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs_consecutive_values() {
        let segment = Segment::try_from(&[1i64, 23, 3, 2, 1, 2, 1, 2][..]).unwrap();
        assert_eq!(
            segment.points(),
            &[
                Point::new(1, 23),
                Point::new(3, 2),
                Point::new(1, 2),
                Point::new(1, 2)
            ]
        );
        assert_eq!(segment.coordinates(), vec![1, 23, 3, 2, 1, 2, 1, 2]);
    }

    #[test]
    fn test_empty_is_rejected() {
        assert_eq!(
            Segment::try_from(&[0i64; 0][..]),
            Err(AnnotationError::EmptySegment)
        );
        assert_eq!(
            Segment::from_points(Vec::new()),
            Err(AnnotationError::EmptySegment)
        );
    }

    #[test]
    fn test_odd_length_is_rejected() {
        assert_eq!(
            Segment::try_from(&[1i64, 2, 3][..]),
            Err(AnnotationError::OddSegment { found: 3 })
        );
    }

    #[test]
    fn test_area() {
        let square = Segment::try_from(&[0i64, 0, 10, 0, 10, 10, 0, 10][..]).unwrap();
        assert_eq!(square.area(), 100.0);

        let line = Segment::try_from(&[0i64, 0, 5, 5][..]).unwrap();
        assert_eq!(line.area(), 0.0);
    }

    #[test]
    fn test_area_with_large_coordinates() {
        let big = 5_000_000_000i64;
        let triangle = Segment::try_from(&[0, 0, big, 0, big, big][..]).unwrap();
        assert_eq!(triangle.area(), 1.25e19);

        let diagonal =
            Segment::try_from(&[i64::MIN, i64::MIN, 0, 0, i64::MAX, i64::MAX][..]).unwrap();
        assert_eq!(diagonal.area(), 0.0);

        let (lo, hi) = (i64::MIN, i64::MAX);
        let huge = Segment::try_from(&[lo, lo, hi, lo, hi, hi, lo, hi][..]).unwrap();
        assert!(huge.area() > 1e38);
    }

    #[test]
    fn test_serializes_points() {
        let segment = Segment::try_from(&[1i64, 2][..]).unwrap();
        let json = serde_json::to_string(&segment).unwrap();
        assert_eq!(json, r#"{"points":[{"x":1,"y":2}]}"#);
    }
}
