//! Annotation core for georeferenced raster maps.
//!
//! The crate turns pointer and keyboard events into committed spatial
//! objects (markers, polylines, polygons, rectangles, circles, text labels)
//! organized into named layers. Rendering and persistence stay behind the
//! [`viewport::ViewportAdapter`] and [`store::ObjectStore`] contracts so a
//! host UI can plug in any map widget and backend.

pub mod config;
pub mod error;
pub mod geometry;
pub mod input;
pub mod map;
pub mod session;
pub mod store;
pub mod viewport;

pub use config::Config;
pub use error::EditorError;
