use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use layout::events::EditFeedback;
use layout::{pixel_to_grid, EditorSession};

use crate::camera::world_to_location;

use super::types::{CursorGridPos, StatusMessage};

pub fn update_cursor_grid_pos(
    windows: Query<&Window, With<PrimaryWindow>>,
    camera_q: Query<(&Camera, &GlobalTransform), With<Camera2d>>,
    session: Res<EditorSession>,
    mut cursor: ResMut<CursorGridPos>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    let Ok((camera, cam_transform)) = camera_q.get_single() else {
        return;
    };

    let world = window
        .cursor_position()
        .and_then(|screen_pos| camera.viewport_to_world_2d(cam_transform, screen_pos).ok());
    let Some(world) = world else {
        cursor.on_screen = false;
        cursor.in_bounds = false;
        return;
    };

    cursor.location_pos = world_to_location(world);
    cursor.cell = pixel_to_grid(cursor.location_pos, session.tile_size());
    cursor.on_screen = true;
    cursor.in_bounds = session
        .current()
        .is_some_and(|location| location.grid_rect().contains(cursor.cell));
}

pub fn tick_status_message(time: Res<Time>, mut status: ResMut<StatusMessage>) {
    if status.timer > 0.0 {
        status.timer -= time.delta_secs();
    }
}

/// Surface core feedback (rejections, loads, saves) in the status line.
pub fn show_edit_feedback(mut feedback: EventReader<EditFeedback>, mut status: ResMut<StatusMessage>) {
    for item in feedback.read() {
        status.set(item.to_string(), item.is_error());
    }
}
