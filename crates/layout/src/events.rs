//! Bevy events in and out of the editing core.
//!
//! Front ends send the request events; the core answers with the render
//! events (committed changes, drag ghost, cursor) and [`EditFeedback`] for
//! anything worth telling the user.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::collision::ReasonCode;
use crate::grid::GridPos;
use crate::notifier::{CursorCue, DragPreview, PlacementChange, RenderNotifier};
use crate::placement::{Layer, PlacementId};

// =============================================================================
// Requests
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

/// Primary-button pointer activity in location pixel space (origin at the
/// top-left corner of the map, y growing downward).
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub position: Vec2,
}

impl PointerEvent {
    pub fn down(position: Vec2) -> Self {
        Self { phase: PointerPhase::Down, position }
    }

    pub fn moved(position: Vec2) -> Self {
        Self { phase: PointerPhase::Move, position }
    }

    pub fn up(position: Vec2) -> Self {
        Self { phase: PointerPhase::Up, position }
    }
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct PlaceObjectEvent {
    pub object_key: String,
    pub cell: GridPos,
    pub layer: Layer,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct RemoveObjectEvent {
    pub cell: GridPos,
    pub layer: Layer,
}

#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct SwitchLocationEvent {
    pub key: String,
}

/// Drop the armed drag, if any.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct DeselectEvent;

/// Restrict drag hit-testing to one layer (`None` for all layers).
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct ActiveLayerEvent(pub Option<Layer>);

// =============================================================================
// Render signals
// =============================================================================

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementsChanged(pub PlacementChange);

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewChanged(pub Option<DragPreview>);

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorChanged(pub CursorCue);

/// [`RenderNotifier`] that forwards every signal as a Bevy event.
#[derive(SystemParam)]
pub struct RenderEvents<'w> {
    changed: EventWriter<'w, PlacementsChanged>,
    preview: EventWriter<'w, PreviewChanged>,
    cursor: EventWriter<'w, CursorChanged>,
}

impl RenderNotifier for RenderEvents<'_> {
    fn placements_changed(&mut self, change: PlacementChange) {
        self.changed.send(PlacementsChanged(change));
    }

    fn preview_changed(&mut self, preview: Option<DragPreview>) {
        self.preview.send(PreviewChanged(preview));
    }

    fn cursor_changed(&mut self, cue: CursorCue) {
        self.cursor.send(CursorChanged(cue));
    }
}

// =============================================================================
// Feedback
// =============================================================================

/// Outcome of a request, for status lines and logs.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub enum EditFeedback {
    Placed { placement_id: PlacementId, object_key: String },
    Removed { cell: GridPos },
    NothingToRemove { cell: GridPos },
    Moved { placement_id: PlacementId, cell: GridPos },
    Rejected(ReasonCode),
    LocationOpened { key: String, name: String },
    /// A switch request arrived while another switch was loading.
    SwitchIgnored { key: String },
    LoadFailed(String),
    Saved { path: String },
    SaveFailed(String),
    /// `skipped` counts saved records that failed validation.
    Restored { placements: usize, skipped: usize },
}

impl std::fmt::Display for EditFeedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditFeedback::Placed { object_key, .. } => write!(f, "Placed {object_key}"),
            EditFeedback::Removed { cell } => write!(f, "Removed object at {}, {}", cell.x, cell.y),
            EditFeedback::NothingToRemove { cell } => write!(f, "Nothing to remove at {}, {}", cell.x, cell.y),
            EditFeedback::Moved { cell, .. } => write!(f, "Moved to {}, {}", cell.x, cell.y),
            EditFeedback::Rejected(reason) => write!(f, "{reason}"),
            EditFeedback::LocationOpened { name, key } if name.is_empty() => write!(f, "Opened {key}"),
            EditFeedback::LocationOpened { name, .. } => write!(f, "Opened {name}"),
            EditFeedback::SwitchIgnored { key } => write!(f, "Still loading; {key} not opened"),
            EditFeedback::LoadFailed(message) => write!(f, "Load failed: {message}"),
            EditFeedback::Saved { path } => write!(f, "Saved to {path}"),
            EditFeedback::SaveFailed(message) => write!(f, "Save failed: {message}"),
            EditFeedback::Restored { placements, skipped: 0 } => write!(f, "Loaded {placements} placements"),
            EditFeedback::Restored { placements, skipped } => {
                write!(f, "Loaded {placements} placements, skipped {skipped} invalid")
            }
        }
    }
}

impl EditFeedback {
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            EditFeedback::Rejected(_)
                | EditFeedback::SwitchIgnored { .. }
                | EditFeedback::LoadFailed(_)
                | EditFeedback::SaveFailed(_)
        )
    }
}
