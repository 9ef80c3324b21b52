//! Data model for layers and committed spatial objects.
//!
//! These types double as the wire format: the layer snapshot returned by the
//! load call deserializes straight into [`Layer`] and [`SpatialObject`].

pub mod layer;
pub mod object;

pub use layer::{Layer, LayerId};
pub use object::{Draft, ObjectId, ObjectProperties, ShapeKind, SpatialObject};
