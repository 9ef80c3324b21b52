//! Error types surfaced at the editor boundary.

use crate::input::Tool;
use crate::store::StoreError;
use thiserror::Error;

/// Errors the drawing session can surface to the operator.
///
/// None of these are fatal to the process; every variant leaves the session
/// in a state the operator can recover from.
#[derive(Debug, Error)]
pub enum EditorError {
    /// `finish` was attempted with too few accumulated points. The draw
    /// stays open so more points can be added.
    #[error("{tool} needs at least {needed} points, have {got}")]
    InsufficientPoints {
        tool: Tool,
        needed: usize,
        got: usize,
    },

    /// A commit was attempted with no layer selected. The draft is retained;
    /// the operator must select a layer and retry.
    #[error("no active layer selected")]
    NoActiveLayer,

    /// The initial layer fetch failed. The session proceeds with an empty
    /// layer list and does not retry automatically.
    #[error("failed to load map data: {0}")]
    LoadFailed(#[source] StoreError),

    /// Persistence rejected the object or was unreachable. The provisional
    /// shape and draft are retained locally for retry or discard.
    #[error("failed to save object: {0}")]
    SaveFailed(#[source] StoreError),
}
