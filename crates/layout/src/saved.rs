//! The persisted layout shape: a location key plus its placement records.

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::location::Location;
use crate::placement::{Layer, Placement};

/// One persisted placement. The id is informational; loading issues fresh
/// ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRecord {
    pub id: u64,
    pub object_key: String,
    pub grid_x: i32,
    pub grid_y: i32,
    pub layer: Layer,
}

impl From<&Placement> for LayoutRecord {
    fn from(p: &Placement) -> Self {
        Self {
            id: p.id.0,
            object_key: p.object_key.clone(),
            grid_x: p.grid_x,
            grid_y: p.grid_y,
            layer: p.layer.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
#[serde(rename_all = "camelCase")]
pub struct SavedLayout {
    pub location_key: String,
    pub placements: Vec<LayoutRecord>,
}

impl SavedLayout {
    pub fn capture(location: &Location) -> Self {
        Self {
            location_key: location.key.clone(),
            placements: location.placements().iter().map(LayoutRecord::from).collect(),
        }
    }

    /// `(objectKey, gridX, gridY, layer)` tuples, sorted, for order-independent
    /// comparison.
    pub fn logical_set(&self) -> Vec<(String, i32, i32, Layer)> {
        let mut set: Vec<_> = self
            .placements
            .iter()
            .map(|r| (r.object_key.clone(), r.grid_x, r.grid_y, r.layer.clone()))
            .collect();
        set.sort();
        set
    }
}
