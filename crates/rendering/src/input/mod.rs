//! Map input for the editor.
//!
//! Split into sub-modules by concern:
//! - `types`: Resource types and enums (ActiveTool, CursorGridPos, etc.)
//! - `cursor`: Cursor position tracking, status tick, core feedback
//! - `placement`: Layer and location selection helpers
//! - `tool_handler`: Left-button dispatch to the editing core
//! - `keyboard`: Tool, layer and location shortcuts, escape key

mod cursor;
mod keyboard;
mod placement;
mod tool_handler;
mod types;


pub use types::{ActiveLayer, ActiveTool, CursorGridPos, PointerTracker, SelectedObject, StatusMessage};

pub use cursor::{show_edit_feedback, tick_status_message, update_cursor_grid_pos};

pub use tool_handler::handle_tool_input;

pub use placement::known_layers;
pub(crate) use placement::placement_layer;

pub use keyboard::{cycle_active_layer, cycle_location, handle_escape_key, keyboard_tool_switch};
