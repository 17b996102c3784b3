use bevy::prelude::*;
use bevy_egui::EguiPlugin;

use layout::LayoutSet;

pub mod camera;
pub mod cursor_icon;
pub mod egui_input_guard;
pub mod input;
pub mod keybindings;
pub mod placement_render;

use camera::CameraDrag;
use input::{ActiveLayer, ActiveTool, CursorGridPos, PointerTracker, SelectedObject, StatusMessage};
use keybindings::KeyBindings;
use placement_render::{GhostState, PlacementShapes};

/// Map view and map input for the editor. Requires `layout::LayoutPlugin`.
pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<EguiPlugin>() {
            app.add_plugins(EguiPlugin);
        }

        app.init_resource::<CameraDrag>()
            .init_resource::<CursorGridPos>()
            .init_resource::<ActiveTool>()
            .init_resource::<SelectedObject>()
            .init_resource::<ActiveLayer>()
            .init_resource::<PointerTracker>()
            .init_resource::<StatusMessage>()
            .init_resource::<KeyBindings>()
            .init_resource::<PlacementShapes>()
            .init_resource::<GhostState>()
            .add_systems(Startup, camera::setup_camera)
            .add_systems(
                Update,
                (
                    camera::camera_pan_keyboard,
                    camera::camera_pan_drag,
                    camera::camera_zoom,
                ),
            )
            // Requests go out before the core runs this frame.
            .add_systems(
                Update,
                (
                    input::update_cursor_grid_pos,
                    (
                        input::handle_tool_input,
                        input::keyboard_tool_switch,
                        input::handle_escape_key,
                        input::cycle_active_layer,
                        input::cycle_location,
                    ),
                )
                    .chain()
                    .before(LayoutSet::Load),
            )
            // Render events are read after the core has published them.
            .add_systems(
                Update,
                (
                    camera::center_on_location,
                    input::show_edit_feedback,
                    input::tick_status_message,
                    cursor_icon::apply_cursor_cue,
                    (
                        placement_render::rebuild_placement_shapes,
                        placement_render::track_drag_ghost,
                    ),
                    (
                        placement_render::draw_location,
                        placement_render::draw_drag_ghost,
                        placement_render::draw_hover,
                    ),
                )
                    .chain()
                    .after(LayoutSet::Collect),
            );
    }
}
