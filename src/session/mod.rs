//! Session state: loaded layers, active selection, and commit mediation.
//!
//! [`SessionModel`] owns the layer snapshot for one editor instance and
//! mediates between finished drafts and the persistence collaborator. Only
//! the committed side of the world lives here; in-progress geometry belongs
//! to the input module.

use crate::config::Config;
use crate::error::EditorError;
use crate::geometry::LatLng;
use crate::map::{Draft, Layer, LayerId, ObjectId, SpatialObject};
use crate::store::{ObjectStore, SaveObjectRequest, StoreError};
use crate::viewport::{RenderHandle, ViewportAdapter};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::Arc;

#[cfg(test)]
mod tests;

/// Committed-state model for one drawing session.
pub struct SessionModel {
    layers: Vec<Layer>,
    active_layer: Option<LayerId>,
    store: Arc<dyn ObjectStore>,
    viewport: Arc<dyn ViewportAdapter>,
    /// Render handles for committed objects currently shown.
    rendered: HashMap<ObjectId, RenderHandle>,
    map_object_id: u64,
    eraser_radius: f64,
}

impl SessionModel {
    pub fn new(
        config: &Config,
        store: Arc<dyn ObjectStore>,
        viewport: Arc<dyn ViewportAdapter>,
    ) -> Self {
        Self {
            layers: Vec::new(),
            active_layer: None,
            store,
            viewport,
            rendered: HashMap::new(),
            map_object_id: config.map.object_id,
            eraser_radius: config.eraser.radius_threshold,
        }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn active_layer(&self) -> Option<&Layer> {
        let id = self.active_layer?;
        self.layers.iter().find(|layer| layer.id == id)
    }

    pub fn active_layer_id(&self) -> Option<LayerId> {
        self.active_layer
    }

    /// Fetches the layer snapshot for the configured map.
    ///
    /// The first layer becomes active, matching the layer list UI. On
    /// failure the session keeps an empty layer list and does not retry.
    pub async fn load_layers(&mut self) -> Result<(), EditorError> {
        let snapshot = match self.store.load_map(self.map_object_id).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!("layer fetch for map {} failed: {err}", self.map_object_id);
                self.layers.clear();
                self.active_layer = None;
                self.clear_rendered();
                return Err(EditorError::LoadFailed(err));
            }
        };

        self.clear_rendered();
        self.layers = snapshot.layers;
        self.active_layer = None;
        info!(
            "loaded {} layers for map {}",
            self.layers.len(),
            self.map_object_id
        );
        if let Some(first) = self.layers.first().map(|layer| layer.id) {
            self.select_layer(first);
        }
        Ok(())
    }

    /// Switches the visible layer and re-renders its committed objects.
    ///
    /// Objects on other layers are hidden: visibility is single-layer, not a
    /// missing toggle. Unknown ids are ignored with a warning.
    pub fn select_layer(&mut self, id: LayerId) {
        let Some(index) = self.layers.iter().position(|layer| layer.id == id) else {
            warn!("ignoring selection of unknown layer {}", id.0);
            return;
        };
        self.active_layer = Some(id);
        self.clear_rendered();

        let layer = &self.layers[index];
        debug!("layer {} ({}) selected", id.0, layer.name);
        let viewport = &self.viewport;
        let handles: Vec<(ObjectId, RenderHandle)> = layer
            .objects
            .iter()
            .map(|object| (object.id, viewport.commit_render(object)))
            .collect();
        self.rendered.extend(handles);
    }

    /// Validates, persists, and records a finished draft.
    ///
    /// The target layer is captured on entry, in the same event-loop turn
    /// that finished the draw, so a save resolving after the operator
    /// switches layers still lands in the captured layer. A failed save
    /// leaves layer state untouched; nothing is inserted optimistically.
    pub async fn commit(&mut self, draft: Draft) -> Result<SpatialObject, EditorError> {
        let layer_id = self.active_layer.ok_or(EditorError::NoActiveLayer)?;

        let mut draft = draft;
        if draft.properties.color.is_none() {
            draft.properties.color = self
                .layers
                .iter()
                .find(|layer| layer.id == layer_id)
                .map(|layer| layer.color.clone());
        }

        let request = SaveObjectRequest::from_draft(&draft, layer_id);
        let response = self
            .store
            .save_object(request)
            .await
            .map_err(EditorError::SaveFailed)?;
        let object_id = match (response.success, response.object_id) {
            (true, Some(id)) => id,
            _ => return Err(EditorError::SaveFailed(StoreError::Rejected)),
        };

        let object = draft.into_object(object_id, layer_id);
        if let Some(layer) = self.layers.iter_mut().find(|layer| layer.id == layer_id) {
            layer.objects.push(object.clone());
        } else {
            warn!(
                "committed object {} targets layer {} missing from the snapshot",
                object_id.0, layer_id.0
            );
        }

        // Only render when the captured layer is still the visible one.
        if self.active_layer == Some(layer_id) {
            let handle = self.viewport.commit_render(&object);
            self.rendered.insert(object.id, handle);
        }

        info!(
            "committed {} {} to layer {}",
            object.kind, object_id.0, layer_id.0
        );
        Ok(object)
    }

    /// Removes a committed object from local state and rendering.
    ///
    /// Removal is local to the session: the store contract has no delete
    /// call, so a reload restores server state. Returns whether an object
    /// was removed.
    pub fn remove_object(&mut self, id: ObjectId) -> bool {
        let mut removed = false;
        for layer in &mut self.layers {
            if let Some(index) = layer.objects.iter().position(|object| object.id == id) {
                layer.objects.remove(index);
                removed = true;
                break;
            }
        }
        if removed {
            if let Some(handle) = self.rendered.remove(&id) {
                self.viewport.remove_render(handle);
            }
            debug!("removed object {}", id.0);
        }
        removed
    }

    /// Removes the most recently committed object on the active layer.
    pub fn remove_last(&mut self) -> Option<ObjectId> {
        let id = self.active_layer()?.objects.last()?.id;
        self.remove_object(id).then_some(id)
    }

    /// Finds the topmost committed object under `position` on the active
    /// layer.
    ///
    /// The scan runs most-recent-first so overlapping candidates resolve to
    /// the last-drawn object, matching render order. Point-like shapes use
    /// the configured eraser distance threshold; everything else uses the
    /// adapter's bounds test.
    pub fn find_object_at(&self, position: LatLng) -> Option<ObjectId> {
        let layer = self.active_layer()?;
        layer
            .objects
            .iter()
            .rev()
            .find(|object| {
                if object.kind.is_point_like() {
                    object.coordinates.first().is_some_and(|&anchor| {
                        self.viewport.distance_between(anchor, position) <= self.eraser_radius
                    })
                } else {
                    self.viewport.contains_point(object, position)
                }
            })
            .map(|object| object.id)
    }

    fn clear_rendered(&mut self) {
        for (_, handle) in self.rendered.drain() {
            self.viewport.remove_render(handle);
        }
    }
}
