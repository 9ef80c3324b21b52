//! Tool selection state machine and input event routing.

use super::builder::{GeometryBuilder, ProvisionalShape};
use super::events::{Key, PointerEvent, PointerPhase};
use super::tool::{InputChannels, Tool};
use crate::error::EditorError;
use crate::geometry::LatLng;
use crate::map::{Draft, ShapeKind, SpatialObject};
use crate::session::SessionModel;
use crate::viewport::{RenderHandle, ViewportAdapter};
use log::{debug, info, warn};
use std::sync::Arc;

/// Style applied to drafts as they finish.
#[derive(Clone, Debug)]
pub struct DrawStyle {
    /// Current stroke color (hex). `None` falls back to the active layer's
    /// color at commit time.
    pub color: Option<String>,
    /// Content stamped by the text tool.
    pub text_content: String,
    /// Radius given to circles, in map units.
    pub circle_radius: f64,
}

impl Default for DrawStyle {
    fn default() -> Self {
        Self {
            color: None,
            text_content: String::new(),
            circle_radius: 50.0,
        }
    }
}

/// Routes pointer and key events to the builder and session according to
/// the active tool's binding table.
///
/// Exactly one controller owns the drawing session of an editor instance;
/// the session state resets on every tool switch, successful commit, or
/// explicit cancel.
pub struct ToolController {
    active_tool: Tool,
    bindings: InputChannels,
    builder: GeometryBuilder,
    style: DrawStyle,
    viewport: Arc<dyn ViewportAdapter>,
    /// Handle of the currently rendered provisional shape, if any.
    provisional: Option<RenderHandle>,
    /// Draft whose commit failed, retained for retry or discard.
    pending_commit: Option<Draft>,
}

impl ToolController {
    /// Creates a controller with the marker tool active.
    pub fn new(viewport: Arc<dyn ViewportAdapter>, style: DrawStyle) -> Self {
        let tool = Tool::Marker;
        Self {
            active_tool: tool,
            bindings: tool.input_channels(),
            builder: GeometryBuilder::new(tool),
            style,
            viewport,
            provisional: None,
            pending_commit: None,
        }
    }

    pub fn active_tool(&self) -> Tool {
        self.active_tool
    }

    /// Channels currently bound, per the active tool's table entry.
    pub fn bindings(&self) -> InputChannels {
        self.bindings
    }

    /// Points of the draw in progress, in input order.
    pub fn pending_points(&self) -> &[LatLng] {
        self.builder.pending_points()
    }

    /// Whether a failed commit is waiting for retry or discard.
    pub fn has_pending_commit(&self) -> bool {
        self.pending_commit.is_some()
    }

    pub fn set_color(&mut self, color: impl Into<String>) {
        self.style.color = Some(color.into());
    }

    /// Sets the content the text tool will stamp on its next click.
    pub fn set_text_content(&mut self, content: impl Into<String>) {
        self.style.text_content = content.into();
    }

    /// Switches the active tool.
    ///
    /// Unbinds the previous tool's channels, discards any draw in progress
    /// (including a retained failed draft), and binds the new tool's channel
    /// set in one transition. Re-selecting the current tool resets the same
    /// way, so selecting a tool twice is equivalent to selecting it once.
    pub fn select_tool(&mut self, tool: Tool) {
        debug!("tool transition {} -> {}", self.active_tool, tool);
        self.release_provisional();
        self.pending_commit = None;
        self.builder.cancel();
        self.builder.begin(tool);
        self.active_tool = tool;
        self.bindings = tool.input_channels();
    }

    /// Routes a pointer event according to the active binding table.
    ///
    /// Events on unbound channels are ignored. Returns the committed object
    /// when the event completed a shape.
    pub async fn dispatch_pointer(
        &mut self,
        event: PointerEvent,
        session: &mut SessionModel,
    ) -> Result<Option<SpatialObject>, EditorError> {
        let bound = match event.phase {
            PointerPhase::Down => self.bindings.pointer_down,
            PointerPhase::Move => self.bindings.pointer_move,
            PointerPhase::Up => self.bindings.pointer_up,
        };
        if !bound {
            return Ok(None);
        }

        let position = self.viewport.screen_to_map(event.position);

        // A fresh draw supersedes a draft whose save failed; its provisional
        // rendering is replaced as the new shape renders.
        if event.phase == PointerPhase::Down
            && self.active_tool != Tool::Eraser
            && !self.builder.in_progress()
            && self.pending_commit.take().is_some()
        {
            debug!("discarding failed draft superseded by a new draw");
        }

        match (event.phase, self.active_tool) {
            (PointerPhase::Down, Tool::Eraser) => {
                if let Some(id) = session.find_object_at(position) {
                    info!("eraser removing object {}", id.0);
                    session.remove_object(id);
                }
                Ok(None)
            }
            (PointerPhase::Down, tool) if tool.completes_on_click() => {
                self.builder.add_point(position);
                let mut draft = self.builder.finish()?;
                self.apply_style(&mut draft);
                // Render before committing: a click shape shows up even when
                // no layer is selected yet.
                self.show_draft(&draft);
                self.commit_draft(draft, session).await.map(Some)
            }
            (PointerPhase::Down, Tool::Polyline | Tool::Polygon) => {
                self.builder.add_point(position);
                self.refresh_provisional();
                Ok(None)
            }
            (PointerPhase::Down, Tool::Rectangle) => {
                // Anchor corner; repeated presses without a release are
                // ignored rather than committing a degenerate box.
                if !self.builder.in_progress() {
                    self.builder.add_point(position);
                    self.refresh_provisional();
                }
                Ok(None)
            }
            (PointerPhase::Move, Tool::Rectangle) => {
                if self.builder.in_progress() {
                    self.builder.sample_cursor(position);
                    self.refresh_provisional();
                }
                Ok(None)
            }
            (PointerPhase::Up, Tool::Rectangle) => {
                if !self.builder.in_progress() {
                    return Ok(None);
                }
                self.builder.add_point(position);
                let mut draft = self.builder.finish()?;
                self.apply_style(&mut draft);
                self.show_draft(&draft);
                self.commit_draft(draft, session).await.map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Handles keyboard input for the draw in progress.
    ///
    /// `Enter` finishes a multi-point draw and commits it (or retries a
    /// retained failed draft); `Escape` cancels. Keys are ignored when the
    /// active tool binds no keyboard channel or nothing is pending.
    pub async fn dispatch_key(
        &mut self,
        key: Key,
        session: &mut SessionModel,
    ) -> Result<Option<SpatialObject>, EditorError> {
        if !self.bindings.keyboard {
            return Ok(None);
        }
        match key {
            Key::Enter => {
                // A draw in progress owns Enter; a retained failed draft is
                // only retried while nothing else is being drawn.
                if !self.builder.in_progress() {
                    return match self.pending_commit.take() {
                        Some(draft) => self.commit_draft(draft, session).await.map(Some),
                        None => Ok(None),
                    };
                }
                let mut draft = self.builder.finish()?;
                self.apply_style(&mut draft);
                self.commit_draft(draft, session).await.map(Some)
            }
            Key::Escape => {
                self.cancel_draw();
                Ok(None)
            }
            Key::Other => Ok(None),
        }
    }

    /// Re-submits the draft from the last failed commit, if one is retained.
    pub async fn retry_commit(
        &mut self,
        session: &mut SessionModel,
    ) -> Result<Option<SpatialObject>, EditorError> {
        match self.pending_commit.take() {
            Some(draft) => self.commit_draft(draft, session).await.map(Some),
            None => Ok(None),
        }
    }

    /// Discards the draw in progress and any retained failed draft, and
    /// releases the provisional rendering. Idempotent.
    pub fn cancel_draw(&mut self) {
        self.release_provisional();
        self.pending_commit = None;
        self.builder.cancel();
        self.builder.begin(self.active_tool);
    }

    async fn commit_draft(
        &mut self,
        draft: Draft,
        session: &mut SessionModel,
    ) -> Result<SpatialObject, EditorError> {
        match session.commit(draft.clone()).await {
            Ok(object) => {
                self.pending_commit = None;
                self.release_provisional();
                self.builder.begin(self.active_tool);
                Ok(object)
            }
            Err(err) => {
                // The draft and its provisional rendering stay until the
                // operator retries or discards.
                warn!("commit failed, retaining draft for retry: {err}");
                self.pending_commit = Some(draft);
                Err(err)
            }
        }
    }

    fn apply_style(&self, draft: &mut Draft) {
        if draft.properties.color.is_none() {
            draft.properties.color = self.style.color.clone();
        }
        match draft.kind {
            ShapeKind::Circle => {
                draft.properties.radius.get_or_insert(self.style.circle_radius);
            }
            ShapeKind::Text => {
                draft
                    .properties
                    .label
                    .get_or_insert_with(|| self.style.text_content.clone());
            }
            _ => {}
        }
    }

    /// Re-renders the builder's candidate: draw the new shape, then release
    /// the previous handle.
    fn refresh_provisional(&mut self) {
        let next = self
            .builder
            .peek()
            .map(|shape| self.viewport.render_provisional(&shape));
        let previous = std::mem::replace(&mut self.provisional, next);
        if let Some(handle) = previous {
            self.viewport.remove_render(handle);
        }
    }

    /// Renders a finished draft provisionally, replacing the current handle.
    fn show_draft(&mut self, draft: &Draft) {
        let shape = ProvisionalShape {
            kind: draft.kind,
            points: draft.coordinates.clone(),
        };
        let next = Some(self.viewport.render_provisional(&shape));
        let previous = std::mem::replace(&mut self.provisional, next);
        if let Some(handle) = previous {
            self.viewport.remove_render(handle);
        }
    }

    fn release_provisional(&mut self) {
        if let Some(handle) = self.provisional.take() {
            self.viewport.remove_render(handle);
        }
    }
}
