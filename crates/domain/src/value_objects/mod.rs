//! Value Objects - Immutable, identity-less geographic primitives

mod bounding_box;
mod point;

pub use bounding_box::BoundingBox;
pub use point::Point;
