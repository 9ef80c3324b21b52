//! Accumulates raw input points into a candidate shape for the active tool.

use super::tool::Tool;
use crate::error::EditorError;
use crate::geometry::LatLng;
use crate::map::{Draft, ObjectProperties, ShapeKind};
use log::debug;

/// Outcome of feeding a committed point to the builder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointOutcome {
    /// The shape needs more input before it can finish.
    InProgress,
    /// The tool's completion rule is satisfied; the caller should `finish`.
    Complete,
}

/// Candidate geometry for provisional rendering.
///
/// For an anchored rectangle the second point is the latest pointer-move
/// sample, so the provisional box tracks the drag.
#[derive(Clone, Debug, PartialEq)]
pub struct ProvisionalShape {
    pub kind: ShapeKind,
    pub points: Vec<LatLng>,
}

/// Pure accumulation state for the in-progress draw. No I/O.
///
/// Consecutive duplicate points are accepted as-is; a zero-length segment is
/// a legitimate very short stroke, and snapping is out of scope.
#[derive(Debug)]
pub struct GeometryBuilder {
    tool: Tool,
    points: Vec<LatLng>,
    /// Latest pointer-move sample while dragging a rectangle; never a
    /// committed point.
    cursor: Option<LatLng>,
}

impl GeometryBuilder {
    pub fn new(tool: Tool) -> Self {
        Self {
            tool,
            points: Vec::new(),
            cursor: None,
        }
    }

    /// Starts a fresh draw for `tool`, discarding any unfinished one.
    /// Safe to call at any time.
    pub fn begin(&mut self, tool: Tool) {
        if !self.points.is_empty() {
            debug!(
                "discarding unfinished {} draw with {} points",
                self.tool,
                self.points.len()
            );
        }
        self.tool = tool;
        self.points.clear();
        self.cursor = None;
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Points committed so far, in input order.
    pub fn pending_points(&self) -> &[LatLng] {
        &self.points
    }

    /// Whether a draw has accumulated any input.
    pub fn in_progress(&self) -> bool {
        !self.points.is_empty()
    }

    /// Records a committed input point.
    pub fn add_point(&mut self, p: LatLng) -> PointOutcome {
        self.points.push(p);
        debug!(
            "{}: point {} at ({:.1}, {:.1})",
            self.tool,
            self.points.len(),
            p.lat,
            p.lng
        );
        if self.tool.completes_on_click()
            || (self.tool == Tool::Rectangle && self.points.len() >= 2)
        {
            PointOutcome::Complete
        } else {
            PointOutcome::InProgress
        }
    }

    /// Records a pointer-move sample for drag tools.
    ///
    /// Only an anchored rectangle consumes samples; they update the
    /// provisional box without committing a corner.
    pub fn sample_cursor(&mut self, p: LatLng) {
        if self.tool == Tool::Rectangle && !self.points.is_empty() {
            self.cursor = Some(p);
        }
    }

    /// Current candidate geometry, or `None` when nothing has accumulated.
    pub fn peek(&self) -> Option<ProvisionalShape> {
        let kind = self.tool.shape_kind()?;
        if self.points.is_empty() {
            return None;
        }
        let mut points = self.points.clone();
        if kind == ShapeKind::Rectangle && points.len() == 1 {
            if let Some(cursor) = self.cursor {
                points.push(cursor);
            }
        }
        Some(ProvisionalShape { kind, points })
    }

    /// Validates the accumulated geometry and takes it as a draft.
    ///
    /// On `InsufficientPoints` the accumulated points are left untouched and
    /// the draw stays open for more input.
    pub fn finish(&mut self) -> Result<Draft, EditorError> {
        let got = self.points.len();
        let (kind, needed) = match self.tool.shape_kind() {
            Some(kind) => (kind, kind.min_points()),
            // The eraser never accumulates points; finishing it is always
            // an empty draw.
            None => {
                return Err(EditorError::InsufficientPoints {
                    tool: self.tool,
                    needed: 1,
                    got,
                });
            }
        };
        if got < needed {
            return Err(EditorError::InsufficientPoints {
                tool: self.tool,
                needed,
                got,
            });
        }

        let coordinates = std::mem::take(&mut self.points);
        self.cursor = None;
        debug!("finished {} with {} points", self.tool, coordinates.len());
        Ok(Draft {
            kind,
            coordinates,
            properties: ObjectProperties::default(),
        })
    }

    /// Discards pending points and samples. Idempotent.
    pub fn cancel(&mut self) {
        self.points.clear();
        self.cursor = None;
    }
}
