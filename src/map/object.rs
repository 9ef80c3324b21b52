//! Committed spatial objects and pre-commit drafts.

use super::layer::LayerId;
use crate::geometry::{GeoBounds, LatLng};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Store-assigned object identifier. Absent until an object is committed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub u64);

/// Geometric kind of an annotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Single-point marker pin
    Marker,
    /// Open path through two or more points
    Polyline,
    /// Closed area through three or more points
    Polygon,
    /// Axis-aligned box stored as two opposite corners
    Rectangle,
    /// Center point plus a radius property
    Circle,
    /// Single-point text label
    Text,
}

impl ShapeKind {
    /// Minimum number of coordinates a finished geometry must carry.
    pub const fn min_points(self) -> usize {
        match self {
            Self::Marker | Self::Circle | Self::Text => 1,
            Self::Polyline | Self::Rectangle => 2,
            Self::Polygon => 3,
        }
    }

    /// Kinds hit-tested by distance to their anchor rather than by bounds.
    pub const fn is_point_like(self) -> bool {
        matches!(self, Self::Marker | Self::Circle | Self::Text)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Marker => "marker",
            Self::Polyline => "polyline",
            Self::Polygon => "polygon",
            Self::Rectangle => "rectangle",
            Self::Circle => "circle",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Free-form properties attached to an object.
///
/// `color`, `label`, and `radius` are the fields the editor itself reads and
/// writes; anything else the backend sends survives round-trips in `extra`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectProperties {
    /// Stroke/fill color as a hex string, e.g. `#ff0000`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Display label (text tool content)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Circle radius in map units
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    /// Backend-defined properties passed through untouched
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// A geometry produced by the builder before the store has assigned an id.
#[derive(Clone, Debug, PartialEq)]
pub struct Draft {
    pub kind: ShapeKind,
    pub coordinates: Vec<LatLng>,
    pub properties: ObjectProperties,
}

impl Draft {
    /// Promotes the draft into a committed object once the store has
    /// assigned an id and the session a layer.
    pub fn into_object(self, id: ObjectId, layer_id: LayerId) -> SpatialObject {
        SpatialObject {
            id,
            kind: self.kind,
            coordinates: self.coordinates,
            layer_id,
            properties: self.properties,
            created_at: None,
        }
    }
}

/// A committed annotation.
///
/// Immutable once committed: the session never mutates stored objects,
/// only removes them locally or re-fetches the snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpatialObject {
    pub id: ObjectId,
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    /// Ordered coordinates: exactly 1 for point-like kinds, 2 corners for
    /// rectangles, ≥2 for polylines, ≥3 for polygons.
    pub coordinates: Vec<LatLng>,
    pub layer_id: LayerId,
    #[serde(default)]
    pub properties: ObjectProperties,
    /// Server-side creation time, when the backend reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl SpatialObject {
    /// Axis-aligned bounds of the coordinates, if any.
    pub fn bounds(&self) -> Option<GeoBounds> {
        GeoBounds::from_points(&self.coordinates)
    }
}
