//! Drawing tool selection and per-tool input wiring.

use crate::map::ShapeKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The active interaction mode, determining how input points are interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Single click places a marker pin
    Marker,
    /// Clicks append path points; Enter finishes
    Polyline,
    /// Clicks append area points; Enter finishes
    Polygon,
    /// Press anchors a corner, drag previews the box, release finishes
    Rectangle,
    /// Single click places a circle with the configured radius
    Circle,
    /// Single click places a text label with the current content
    Text,
    /// Click removes the topmost committed object under the pointer
    Eraser,
}

/// Input channels a tool listens on while active.
///
/// One entry of the tool transition table: `select_tool` swaps the whole set
/// atomically, replacing ad hoc attach/detach of individual handlers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputChannels {
    pub pointer_down: bool,
    pub pointer_move: bool,
    pub pointer_up: bool,
    pub keyboard: bool,
}

impl Tool {
    /// Shape kind this tool produces, or `None` for the eraser.
    pub const fn shape_kind(self) -> Option<ShapeKind> {
        match self {
            Self::Marker => Some(ShapeKind::Marker),
            Self::Polyline => Some(ShapeKind::Polyline),
            Self::Polygon => Some(ShapeKind::Polygon),
            Self::Rectangle => Some(ShapeKind::Rectangle),
            Self::Circle => Some(ShapeKind::Circle),
            Self::Text => Some(ShapeKind::Text),
            Self::Eraser => None,
        }
    }

    /// True when a single committed point completes the shape immediately.
    pub const fn completes_on_click(self) -> bool {
        matches!(self, Self::Marker | Self::Circle | Self::Text)
    }

    /// Binding table: the channels bound while this tool is active.
    ///
    /// Click tools and the eraser need only pointer-down. Multi-point tools
    /// add the keyboard for Enter/Escape; the rectangle is drag-driven and
    /// listens on move/up as well.
    pub const fn input_channels(self) -> InputChannels {
        match self {
            Self::Marker | Self::Circle | Self::Text | Self::Eraser => InputChannels {
                pointer_down: true,
                pointer_move: false,
                pointer_up: false,
                keyboard: false,
            },
            Self::Polyline | Self::Polygon => InputChannels {
                pointer_down: true,
                pointer_move: false,
                pointer_up: false,
                keyboard: true,
            },
            Self::Rectangle => InputChannels {
                pointer_down: true,
                pointer_move: true,
                pointer_up: true,
                keyboard: true,
            },
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Marker => "marker",
            Self::Polyline => "polyline",
            Self::Polygon => "polygon",
            Self::Rectangle => "rectangle",
            Self::Circle => "circle",
            Self::Text => "text",
            Self::Eraser => "eraser",
        }
    }

    /// All selectable tools, in toolbar order.
    pub const ALL: [Tool; 7] = [
        Tool::Marker,
        Tool::Polyline,
        Tool::Polygon,
        Tool::Rectangle,
        Tool::Circle,
        Tool::Text,
        Tool::Eraser,
    ];
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
