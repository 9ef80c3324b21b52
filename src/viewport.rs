//! Rendering adapter contract for the hosting map widget.
//!
//! The core never draws. It hands provisional and committed shapes to this
//! adapter and asks it for coordinate translation and hit metrics; any map
//! widget that can render the shape kinds satisfies the contract.

use crate::geometry::{GeoBounds, LatLng};
use crate::input::{ProvisionalShape, ScreenPoint};
use crate::map::SpatialObject;

/// Opaque reference to a rendered artifact, provisional or committed.
///
/// Handles are never reused while alive; no two shapes share one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RenderHandle(pub u64);

/// Contract between the drawing session and the map widget.
///
/// Methods take `&self` because the adapter is shared between the controller
/// (provisional shapes) and the session (committed objects); implementations
/// carry their own interior mutability.
pub trait ViewportAdapter: Send + Sync {
    /// Draws a provisional (uncommitted) shape, returning its handle.
    ///
    /// In-progress shapes are re-rendered by drawing the new candidate and
    /// then releasing the previous handle; whether provisional shapes look
    /// different from committed ones is the adapter's choice.
    fn render_provisional(&self, shape: &ProvisionalShape) -> RenderHandle;

    /// Draws a committed object, returning its handle.
    fn commit_render(&self, object: &SpatialObject) -> RenderHandle;

    /// Removes a previously rendered artifact. Unknown handles are ignored.
    fn remove_render(&self, handle: RenderHandle);

    /// Translates raw pointer coordinates into map space.
    fn screen_to_map(&self, point: ScreenPoint) -> LatLng;

    /// Whether the rendered extent of `object` contains `position`.
    ///
    /// The default is an axis-aligned bounds test over the object's
    /// coordinates; adapters with richer rendered extents can override it.
    fn contains_point(&self, object: &SpatialObject, position: LatLng) -> bool {
        GeoBounds::from_points(&object.coordinates).is_some_and(|b| b.contains(position))
    }

    /// Distance between two map coordinates, in map units.
    fn distance_between(&self, a: LatLng, b: LatLng) -> f64 {
        a.distance_to(b)
    }
}
