//! In-process store for tests and backend-less embedding.

use super::{MapSnapshot, ObjectStore, SaveObjectRequest, SaveObjectResponse, StoreError};
use crate::map::{Layer, ObjectId, SpatialObject};
use async_trait::async_trait;
use log::debug;
use std::sync::Mutex;

/// [`ObjectStore`] backed by an in-memory snapshot.
///
/// Saved objects are folded back into the snapshot, so a later `load_map`
/// returns them the way a real backend would. The store serves a single map
/// and ignores the map identifier.
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

struct Inner {
    snapshot: MapSnapshot,
    next_id: u64,
    saved: Vec<SaveObjectRequest>,
    fail_next_load: bool,
    reject_next_save: bool,
}

impl MemoryStore {
    pub fn new(snapshot: MapSnapshot) -> Self {
        Self {
            inner: Mutex::new(Inner {
                snapshot,
                next_id: 1,
                saved: Vec::new(),
                fail_next_load: false,
                reject_next_save: false,
            }),
        }
    }

    /// Store seeded with empty layers.
    pub fn with_layers(layers: Vec<Layer>) -> Self {
        Self::new(MapSnapshot { layers })
    }

    /// Makes the next `load_map` fail with a transport error.
    pub fn fail_next_load(&self) {
        self.lock().fail_next_load = true;
    }

    /// Makes the next `save_object` answer `success: false`.
    pub fn reject_next_save(&self) {
        self.lock().reject_next_save = true;
    }

    /// Requests received by `save_object`, in arrival order.
    pub fn saved_requests(&self) -> Vec<SaveObjectRequest> {
        self.lock().saved.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("memory store mutex poisoned")
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn load_map(&self, map_object_id: u64) -> Result<MapSnapshot, StoreError> {
        let mut inner = self.lock();
        if inner.fail_next_load {
            inner.fail_next_load = false;
            return Err(StoreError::Transport("simulated outage".to_string()));
        }
        debug!("memory store serving snapshot for map {map_object_id}");
        Ok(inner.snapshot.clone())
    }

    async fn save_object(
        &self,
        request: SaveObjectRequest,
    ) -> Result<SaveObjectResponse, StoreError> {
        let mut inner = self.lock();
        inner.saved.push(request.clone());

        if inner.reject_next_save {
            inner.reject_next_save = false;
            return Ok(SaveObjectResponse {
                success: false,
                object_id: None,
            });
        }

        let id = ObjectId(inner.next_id);
        inner.next_id += 1;

        let object = SpatialObject {
            id,
            kind: request.kind,
            coordinates: request.coordinates,
            layer_id: request.layer_id,
            properties: request.properties,
            created_at: Some(chrono::Utc::now()),
        };
        if let Some(layer) = inner
            .snapshot
            .layers
            .iter_mut()
            .find(|layer| layer.id == object.layer_id)
        {
            layer.objects.push(object);
        }

        Ok(SaveObjectResponse {
            success: true,
            object_id: Some(id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::LatLng;
    use crate::map::{LayerId, ObjectProperties, ShapeKind};

    fn marker_request(layer: LayerId) -> SaveObjectRequest {
        SaveObjectRequest {
            kind: ShapeKind::Marker,
            coordinates: vec![LatLng::new(1.0, 2.0)],
            layer_id: layer,
            properties: ObjectProperties::default(),
        }
    }

    #[tokio::test]
    async fn saved_objects_appear_in_later_loads() {
        let store = MemoryStore::with_layers(vec![Layer::new(LayerId(1), "base", "#ff0000")]);

        let response = store.save_object(marker_request(LayerId(1))).await.unwrap();
        assert!(response.success);
        let id = response.object_id.unwrap();

        let snapshot = store.load_map(9).await.unwrap();
        assert_eq!(snapshot.layers[0].objects.len(), 1);
        assert_eq!(snapshot.layers[0].objects[0].id, id);
    }

    #[tokio::test]
    async fn rejection_affects_only_the_next_save() {
        let store = MemoryStore::with_layers(vec![Layer::new(LayerId(1), "base", "#ff0000")]);
        store.reject_next_save();

        let rejected = store.save_object(marker_request(LayerId(1))).await.unwrap();
        assert!(!rejected.success);
        assert!(rejected.object_id.is_none());

        let accepted = store.save_object(marker_request(LayerId(1))).await.unwrap();
        assert!(accepted.success);
        assert_eq!(store.saved_requests().len(), 2);
    }

    #[tokio::test]
    async fn load_failure_is_one_shot() {
        let store = MemoryStore::with_layers(vec![]);
        store.fail_next_load();
        assert!(store.load_map(1).await.is_err());
        assert!(store.load_map(1).await.is_ok());
    }
}
