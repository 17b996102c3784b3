//! Tile-grid placement editing core.
//!
//! Validation and collision rules, the placement store, the drag session and
//! the Bevy wiring that connects them to a front end through events.

pub mod catalog;
pub mod collision;
pub mod config;
pub mod drag;
pub mod editor;
pub mod events;
pub mod grid;
pub mod interaction;
pub mod loading;
pub mod location;
pub mod notifier;
pub mod placement;
pub mod plugin;
pub mod preview;
pub mod saved;
pub mod store;

#[cfg(test)]
mod integration_tests;
#[cfg(test)]
pub mod test_harness;

pub use catalog::{DefinitionLookup, ObjectCatalog, ObjectDefinition};
pub use collision::{validate_placement, PlacementCandidate, ReasonCode, ValidationResult};
pub use config::{EditorConfig, TILE_SIZE};
pub use drag::{DragOutcome, DragSession, DragState};
pub use editor::EditorSession;
pub use grid::{pixel_to_grid, GridPos, Rect};
pub use location::{Location, LocationBounds, LocationRegistry};
pub use notifier::{CursorCue, DragPreview, PlacementChange, RenderNotifier};
pub use placement::{Layer, Placement, PlacementId};
pub use plugin::{LayoutPlugin, LayoutSet};
pub use saved::{LayoutRecord, SavedLayout};
pub use store::{PlacementStore, RestoreCount};
