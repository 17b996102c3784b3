use bevy::prelude::*;

use layout::{GridPos, Layer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Resource)]
pub enum ActiveTool {
    /// Grab and drag existing placements.
    #[default]
    Move,
    /// Place the palette selection on click.
    Place,
    Remove,
}

impl ActiveTool {
    pub const ALL: [ActiveTool; 3] = [ActiveTool::Move, ActiveTool::Place, ActiveTool::Remove];

    pub fn label(self) -> &'static str {
        match self {
            ActiveTool::Move => "Move",
            ActiveTool::Place => "Place",
            ActiveTool::Remove => "Remove",
        }
    }

    pub fn next(self) -> Self {
        match self {
            ActiveTool::Move => ActiveTool::Place,
            ActiveTool::Place => ActiveTool::Remove,
            ActiveTool::Remove => ActiveTool::Move,
        }
    }
}

/// Object key picked in the palette.
#[derive(Resource, Default, Debug, Clone, PartialEq, Eq)]
pub struct SelectedObject(pub Option<String>);

/// Layer edits are restricted to. `None` means every layer for grabbing and
/// the object's default layer for placing.
#[derive(Resource, Default, Debug, Clone, PartialEq, Eq)]
pub struct ActiveLayer(pub Option<Layer>);

/// Where the mouse is, in location pixels and grid cells.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq)]
pub struct CursorGridPos {
    pub location_pos: Vec2,
    pub cell: GridPos,
    /// The cursor is over the window.
    pub on_screen: bool,
    /// The cell is inside the current location.
    pub in_bounds: bool,
}

/// Left-button state as seen by the drag forwarding.
#[derive(Resource, Default, Debug)]
pub struct PointerTracker {
    pub pressed: bool,
    pub last_pos: Option<Vec2>,
}

/// Status message shown briefly on screen
#[derive(Resource, Default)]
pub struct StatusMessage {
    pub text: String,
    pub timer: f32,
    pub is_error: bool,
}

impl StatusMessage {
    pub fn set(&mut self, text: impl Into<String>, is_error: bool) {
        self.text = text.into();
        self.timer = 3.0;
        self.is_error = is_error;
    }

    pub fn active(&self) -> bool {
        self.timer > 0.0
    }
}
