use super::SessionModel;
use crate::config::Config;
use crate::error::EditorError;
use crate::geometry::LatLng;
use crate::input::ProvisionalShape;
use crate::input::ScreenPoint;
use crate::map::{Draft, Layer, LayerId, ObjectProperties, ShapeKind, SpatialObject};
use crate::store::{MapSnapshot, MemoryStore};
use crate::viewport::{RenderHandle, ViewportAdapter};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Viewport fake tracking which committed renders are currently live.
#[derive(Default)]
struct TrackingViewport {
    next_handle: AtomicU64,
    live: Mutex<HashSet<u64>>,
}

impl TrackingViewport {
    fn live_count(&self) -> usize {
        self.live.lock().unwrap().len()
    }
}

impl ViewportAdapter for TrackingViewport {
    fn render_provisional(&self, _shape: &ProvisionalShape) -> RenderHandle {
        RenderHandle(self.next_handle.fetch_add(1, Ordering::SeqCst))
    }

    fn commit_render(&self, _object: &SpatialObject) -> RenderHandle {
        let handle = self.next_handle.fetch_add(1, Ordering::SeqCst);
        self.live.lock().unwrap().insert(handle);
        RenderHandle(handle)
    }

    fn remove_render(&self, handle: RenderHandle) {
        self.live.lock().unwrap().remove(&handle.0);
    }

    fn screen_to_map(&self, point: ScreenPoint) -> LatLng {
        LatLng::new(point.x, point.y)
    }
}

fn draft(kind: ShapeKind, coordinates: Vec<LatLng>) -> Draft {
    Draft {
        kind,
        coordinates,
        properties: ObjectProperties::default(),
    }
}

async fn loaded_session(
    layers: Vec<Layer>,
) -> (SessionModel, Arc<MemoryStore>, Arc<TrackingViewport>) {
    let store = Arc::new(MemoryStore::new(MapSnapshot { layers }));
    let viewport = Arc::new(TrackingViewport::default());
    let mut session = SessionModel::new(&Config::default(), store.clone(), viewport.clone());
    session.load_layers().await.unwrap();
    (session, store, viewport)
}

#[tokio::test]
async fn commit_without_layer_fails() {
    let (mut session, store, _viewport) = loaded_session(vec![]).await;
    assert!(session.active_layer_id().is_none());

    let err = session
        .commit(draft(ShapeKind::Marker, vec![LatLng::new(1.0, 1.0)]))
        .await
        .unwrap_err();
    assert!(matches!(err, EditorError::NoActiveLayer));
    assert!(store.saved_requests().is_empty());
}

#[tokio::test]
async fn commit_inherits_the_layer_color() {
    let (mut session, store, _viewport) =
        loaded_session(vec![Layer::new(LayerId(1), "routes", "#0000ff")]).await;

    let object = session
        .commit(draft(ShapeKind::Marker, vec![LatLng::new(2.0, 3.0)]))
        .await
        .unwrap();
    assert_eq!(object.properties.color.as_deref(), Some("#0000ff"));
    assert_eq!(
        store.saved_requests()[0].properties.color.as_deref(),
        Some("#0000ff")
    );
}

#[tokio::test]
async fn explicit_draft_color_wins_over_layer_color() {
    let (mut session, _store, _viewport) =
        loaded_session(vec![Layer::new(LayerId(1), "routes", "#0000ff")]).await;

    let mut d = draft(ShapeKind::Marker, vec![LatLng::new(2.0, 3.0)]);
    d.properties.color = Some("#00ff00".to_string());
    let object = session.commit(d).await.unwrap();
    assert_eq!(object.properties.color.as_deref(), Some("#00ff00"));
}

#[tokio::test]
async fn first_layer_becomes_active_after_load() {
    let (session, _store, _viewport) = loaded_session(vec![
        Layer::new(LayerId(4), "first", "#ff0000"),
        Layer::new(LayerId(9), "second", "#00ff00"),
    ])
    .await;
    assert_eq!(session.active_layer_id(), Some(LayerId(4)));
}

#[tokio::test]
async fn load_failure_leaves_an_empty_session() {
    let store = Arc::new(MemoryStore::with_layers(vec![Layer::new(
        LayerId(1),
        "base",
        "#ff0000",
    )]));
    store.fail_next_load();
    let viewport = Arc::new(TrackingViewport::default());
    let mut session = SessionModel::new(&Config::default(), store, viewport);

    let err = session.load_layers().await.unwrap_err();
    assert!(matches!(err, EditorError::LoadFailed(_)));
    assert!(session.layers().is_empty());
    assert!(session.active_layer_id().is_none());
}

#[tokio::test]
async fn selecting_a_layer_shows_only_its_objects() {
    let (mut session, _store, viewport) = loaded_session(vec![
        Layer::new(LayerId(1), "first", "#ff0000"),
        Layer::new(LayerId(2), "second", "#00ff00"),
    ])
    .await;

    session
        .commit(draft(ShapeKind::Marker, vec![LatLng::new(1.0, 1.0)]))
        .await
        .unwrap();
    session
        .commit(draft(ShapeKind::Marker, vec![LatLng::new(2.0, 2.0)]))
        .await
        .unwrap();
    assert_eq!(viewport.live_count(), 2);

    // Switching hides the first layer's objects; the second layer is empty.
    session.select_layer(LayerId(2));
    assert_eq!(viewport.live_count(), 0);

    session.select_layer(LayerId(1));
    assert_eq!(viewport.live_count(), 2);
}

#[tokio::test]
async fn selecting_an_unknown_layer_is_ignored() {
    let (mut session, _store, _viewport) =
        loaded_session(vec![Layer::new(LayerId(1), "base", "#ff0000")]).await;
    session.select_layer(LayerId(42));
    assert_eq!(session.active_layer_id(), Some(LayerId(1)));
}

#[tokio::test]
async fn eraser_query_prefers_the_most_recent_object() {
    let (mut session, _store, _viewport) =
        loaded_session(vec![Layer::new(LayerId(1), "base", "#ff0000")]).await;

    let rectangle = session
        .commit(draft(
            ShapeKind::Rectangle,
            vec![LatLng::new(0.0, 0.0), LatLng::new(10.0, 10.0)],
        ))
        .await
        .unwrap();
    let marker = session
        .commit(draft(ShapeKind::Marker, vec![LatLng::new(5.0, 5.0)]))
        .await
        .unwrap();

    // The probe point is inside the rectangle and within threshold of the
    // marker; the marker was drawn later, so it wins.
    let hit = session.find_object_at(LatLng::new(5.0, 6.0)).unwrap();
    assert_eq!(hit, marker.id);

    assert!(session.remove_object(marker.id));
    let hit = session.find_object_at(LatLng::new(5.0, 6.0)).unwrap();
    assert_eq!(hit, rectangle.id);
}

#[tokio::test]
async fn point_like_hits_respect_the_distance_threshold() {
    let (mut session, _store, _viewport) =
        loaded_session(vec![Layer::new(LayerId(1), "base", "#ff0000")]).await;

    session
        .commit(draft(ShapeKind::Circle, vec![LatLng::new(50.0, 50.0)]))
        .await
        .unwrap();

    // Default threshold is 20 map units.
    assert!(session.find_object_at(LatLng::new(50.0, 69.0)).is_some());
    assert!(session.find_object_at(LatLng::new(50.0, 71.0)).is_none());
}

#[tokio::test]
async fn remove_last_pops_the_newest_object() {
    let (mut session, _store, viewport) =
        loaded_session(vec![Layer::new(LayerId(1), "base", "#ff0000")]).await;

    let first = session
        .commit(draft(ShapeKind::Marker, vec![LatLng::new(1.0, 1.0)]))
        .await
        .unwrap();
    let second = session
        .commit(draft(ShapeKind::Marker, vec![LatLng::new(2.0, 2.0)]))
        .await
        .unwrap();

    assert_eq!(session.remove_last(), Some(second.id));
    assert_eq!(viewport.live_count(), 1);
    assert_eq!(session.active_layer().unwrap().objects[0].id, first.id);

    assert_eq!(session.remove_last(), Some(first.id));
    assert_eq!(session.remove_last(), None);
}
