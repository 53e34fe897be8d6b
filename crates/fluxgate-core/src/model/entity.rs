// ── Known-entity type ──
//
// The entity list (nodes or admins) is owned by the panel; the pipeline
// only reads it. The key matches the id strings used in raw usage
// responses, and the color index feeds the deterministic palette.

use serde::{Deserialize, Serialize};

/// One chartable entity: a proxy node or an admin account.
///
/// `key` is the panel-assigned id rendered as a string, exactly as it
/// appears as a map key in raw usage responses. `color_index` is the
/// entity's position in the list it came from and stays stable for the
/// lifetime of that list, so series keep their colors across refreshes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub key: String,
    pub name: String,
    pub color_index: usize,
}

impl Entity {
    pub fn new(key: impl Into<String>, name: impl Into<String>, color_index: usize) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            color_index,
        }
    }
}
