//! Input event types decoupled from any windowing or DOM source.
//!
//! Hosts map their native pointer/keyboard events to these values; handlers
//! receive positions and identifiers explicitly instead of inspecting the
//! originating event object.

/// Raw pointer position before viewport translation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Phase of a pointer gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerPhase {
    /// Button press
    Down,
    /// Motion sample while the pointer is over the map
    Move,
    /// Button release
    Up,
}

/// A pointer event forwarded by the host UI.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub position: ScreenPoint,
}

impl PointerEvent {
    pub fn down(x: f64, y: f64) -> Self {
        Self {
            phase: PointerPhase::Down,
            position: ScreenPoint::new(x, y),
        }
    }

    pub fn moved(x: f64, y: f64) -> Self {
        Self {
            phase: PointerPhase::Move,
            position: ScreenPoint::new(x, y),
        }
    }

    pub fn up(x: f64, y: f64) -> Self {
        Self {
            phase: PointerPhase::Up,
            position: ScreenPoint::new(x, y),
        }
    }
}

/// Keys the drawing session reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// Finishes the in-progress multi-point draw and commits it
    Enter,
    /// Cancels the in-progress draw
    Escape,
    /// Any other key; ignored by the session
    Other,
}
