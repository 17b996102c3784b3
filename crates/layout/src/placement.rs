use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::grid::GridPos;

/// Identifier of a placement. Issued by the store that owns the editing
/// session and never handed out twice.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Encode, Decode,
)]
#[serde(transparent)]
pub struct PlacementId(pub u64);

impl std::fmt::Display for PlacementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An independent occupancy plane. Placements on different layers never
/// collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Encode, Decode)]
#[serde(transparent)]
pub struct Layer(pub String);

impl Layer {
    pub const DEFAULT_NAME: &'static str = "objects";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Layer {
    fn default() -> Self {
        Self(Self::DEFAULT_NAME.to_string())
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One object placed on a location's grid, anchored at its top-left cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub id: PlacementId,
    pub object_key: String,
    pub grid_x: i32,
    pub grid_y: i32,
    pub layer: Layer,
}

impl Placement {
    pub fn anchor(&self) -> GridPos {
        GridPos::new(self.grid_x, self.grid_y)
    }
}
