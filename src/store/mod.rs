//! Persistence collaborator contract and wire types.
//!
//! The core issues exactly two calls against the backend: load the layer
//! snapshot for a map and save one finished object. Transport (HTTP,
//! in-process, ...) is the embedder's concern; [`MemoryStore`] covers tests
//! and backend-less embedding.

mod memory;

pub use memory::MemoryStore;

use crate::geometry::LatLng;
use crate::map::{Draft, Layer, LayerId, ObjectId, ObjectProperties, ShapeKind};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the persistence collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend answered but refused the object (`success: false`).
    #[error("store rejected the object")]
    Rejected,

    /// The backend could not be reached.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The backend answered with a payload the core cannot use.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The payload failed to decode.
    #[error("malformed payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Layer snapshot returned by the load call.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MapSnapshot {
    pub layers: Vec<Layer>,
}

/// Body of the save call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaveObjectRequest {
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    pub coordinates: Vec<LatLng>,
    pub layer_id: LayerId,
    #[serde(default)]
    pub properties: ObjectProperties,
}

impl SaveObjectRequest {
    /// Builds the request for a finished draft targeting `layer_id`.
    pub fn from_draft(draft: &Draft, layer_id: LayerId) -> Self {
        Self {
            kind: draft.kind,
            coordinates: draft.coordinates.clone(),
            layer_id,
            properties: draft.properties.clone(),
        }
    }
}

/// Response of the save call.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveObjectResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<ObjectId>,
}

/// Abstraction over the backend persistence calls.
///
/// Implementations can be mocked in tests; the session only ever holds a
/// trait object.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetches the layer snapshot for a map.
    async fn load_map(&self, map_object_id: u64) -> Result<MapSnapshot, StoreError>;

    /// Persists one finished object, returning its assigned id.
    async fn save_object(&self, request: SaveObjectRequest)
    -> Result<SaveObjectResponse, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::LatLng;

    #[test]
    fn save_request_matches_backend_shape() {
        let draft = Draft {
            kind: ShapeKind::Polyline,
            coordinates: vec![LatLng::new(10.0, 20.0), LatLng::new(30.0, 40.0)],
            properties: ObjectProperties {
                color: Some("#ff0000".to_string()),
                ..ObjectProperties::default()
            },
        };
        let request = SaveObjectRequest::from_draft(&draft, LayerId(5));
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "type": "polyline",
                "coordinates": [[10.0, 20.0], [30.0, 40.0]],
                "layer_id": 5,
                "properties": {"color": "#ff0000"}
            })
        );
    }

    #[test]
    fn save_response_tolerates_missing_id() {
        let response: SaveObjectResponse =
            serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert!(!response.success);
        assert!(response.object_id.is_none());

        let ok: SaveObjectResponse =
            serde_json::from_str(r#"{"success": true, "object_id": 42}"#).unwrap();
        assert_eq!(ok.object_id, Some(ObjectId(42)));
    }

    #[test]
    fn snapshot_deserializes_nested_layers() {
        let json = r##"{
            "layers": [{
                "id": 1,
                "name": "Attack routes",
                "color": "#ff0000",
                "objects": [{
                    "id": 3,
                    "type": "marker",
                    "coordinates": [[5.0, 5.0]],
                    "layer_id": 1,
                    "properties": {}
                }]
            }]
        }"##;
        let snapshot: MapSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.layers.len(), 1);
        assert_eq!(snapshot.layers[0].objects[0].id, ObjectId(3));
    }
}
