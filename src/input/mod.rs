//! Input handling and the drawing-session state machine.
//!
//! This module translates host pointer and keyboard events into drawing
//! actions: [`GeometryBuilder`] accumulates candidate geometry for the
//! active tool, and [`ToolController`] routes events according to the
//! tool's input-channel binding table.

pub mod builder;
pub mod controller;
pub mod events;
pub mod tool;

pub use builder::{GeometryBuilder, PointOutcome, ProvisionalShape};
pub use controller::{DrawStyle, ToolController};
pub use events::{Key, PointerEvent, PointerPhase, ScreenPoint};
pub use tool::{InputChannels, Tool};
