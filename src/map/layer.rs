//! Named layers grouping committed objects.

use super::object::SpatialObject;
use serde::{Deserialize, Serialize};

/// Server-assigned layer identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(pub u64);

/// Named, colored grouping of committed spatial objects.
///
/// Layers are created server-side and arrive as an immutable snapshot when
/// a session opens. `objects` grows only through successful commits and
/// shrinks only through local removal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    /// Layer color as a hex string; drafts without an explicit color
    /// inherit it at commit time.
    pub color: String,
    #[serde(default)]
    pub objects: Vec<SpatialObject>,
}

impl Layer {
    pub fn new(id: LayerId, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            color: color.into(),
            objects: Vec::new(),
        }
    }
}
