//! Annotation records for the remo image management service.
//!
//! An annotation is one labeling record for one image. It carries class
//! labels and at most one geometric object, and its task tag is derived
//! from that object:
//!
//! | object        | task                    |
//! |---------------|-------------------------|
//! | none          | `image_classification`  |
//! | [`BoundingBox`] | `object_detection`    |
//! | [`Segment`]   | `instance_segmentation` |
//!
//! # Design Principles
//!
//! 1. **Sum-typed geometry**: [`AnnotationObject`] is an enum, so an
//!    annotation can never hold a box and a polygon at once.
//!
//! 2. **Validate, then assign**: every setter builds the new object first
//!    and only swaps it in on success, so a failed call leaves the record
//!    untouched.
//!
//! 3. **Permissive geometry**: only coordinate counts are enforced.
//!    Unordered boxes and polygons with fewer than three points are
//!    representable; [`validation`](crate::validation) reports them.
//!
//! # Example
//!
//! ```
//! use remo::annotation::{Annotation, Point, Task};
//!
//! let mut annotation = Annotation::new("image.png", "Dog");
//! annotation.set_segment(&[1, 23, 3, 2, 1, 2, 1, 2])?;
//!
//! let segment = annotation.segment().unwrap();
//! assert_eq!(segment.points()[0], Point::new(1, 23));
//! assert_eq!(annotation.task(), Task::InstanceSegmentation);
//! # Ok::<(), remo::AnnotationError>(())
//! ```

mod bbox;
mod classes;
pub mod io_csv;
pub mod io_json;
mod model;
mod record;
mod segment;
mod task;

// Re-export core types for convenient access
pub use bbox::BoundingBox;
pub use classes::Classes;
pub use model::{group_by_task, Annotation, AnnotationObject};
pub use segment::{Point, Segment};
pub use task::Task;
