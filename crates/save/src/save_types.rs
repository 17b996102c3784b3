// ---------------------------------------------------------------------------
// Save structs and version constants
// ---------------------------------------------------------------------------

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use layout::SavedLayout;

/// Current payload version.
/// v1 = one `SavedLayout` per touched location
pub const CURRENT_SAVE_VERSION: u32 = 1;

/// Everything written to a `.tgl` file after the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct SaveFile {
    pub version: u32,
    pub layouts: Vec<SavedLayout>,
}

impl SaveFile {
    pub fn new(layouts: Vec<SavedLayout>) -> Self {
        Self {
            version: CURRENT_SAVE_VERSION,
            layouts,
        }
    }

    pub fn placement_count(&self) -> usize {
        self.layouts.iter().map(|l| l.placements.len()).sum()
    }

    pub fn encode(&self) -> Vec<u8> {
        bitcode::encode(self)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, bitcode::Error> {
        bitcode::decode(bytes)
    }
}
