use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy_egui::EguiContexts;

use layout::events::PlacementsChanged;
use layout::EditorSession;

use crate::egui_input_guard::{egui_wants_keyboard, egui_wants_pointer};
use crate::keybindings::KeyBindings;

const PAN_SPEED: f32 = 600.0;
const ZOOM_SPEED: f32 = 0.1;
const MIN_SCALE: f32 = 0.25;
const MAX_SCALE: f32 = 4.0;

/// Location pixels have y growing downward; Bevy world space has y up.
pub fn location_to_world(pixel: Vec2) -> Vec2 {
    Vec2::new(pixel.x, -pixel.y)
}

pub fn world_to_location(world: Vec2) -> Vec2 {
    Vec2::new(world.x, -world.y)
}

#[derive(Resource, Default)]
pub struct CameraDrag {
    pub dragging: bool,
    pub last_pos: Vec2,
}

pub fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

/// Center the view on a location when a different one is opened.
pub fn center_on_location(
    mut changes: EventReader<PlacementsChanged>,
    session: Res<EditorSession>,
    mut shown: Local<Option<String>>,
    mut query: Query<&mut Transform, With<Camera2d>>,
) {
    if changes.is_empty() {
        return;
    }
    changes.clear();

    let Some(location) = session.current() else {
        return;
    };
    if shown.as_deref() == Some(location.key.as_str()) {
        return;
    }
    *shown = Some(location.key.clone());

    let Ok(mut transform) = query.get_single_mut() else {
        return;
    };
    let center = location_to_world(location.pixel_size(session.tile_size()) / 2.0);
    transform.translation.x = center.x;
    transform.translation.y = center.y;
}

/// WASD/Arrow keys: pan, scaled by zoom.
pub fn camera_pan_keyboard(
    keys: Res<ButtonInput<KeyCode>>,
    bindings: Res<KeyBindings>,
    mut contexts: EguiContexts,
    time: Res<Time>,
    mut query: Query<(&mut Transform, &OrthographicProjection), With<Camera2d>>,
) {
    if egui_wants_keyboard(&mut contexts) {
        return;
    }
    let mut dir = Vec2::ZERO;
    if bindings.pan_up.pressed(&keys) || keys.pressed(KeyCode::ArrowUp) {
        dir.y += 1.0;
    }
    if bindings.pan_down.pressed(&keys) || keys.pressed(KeyCode::ArrowDown) {
        dir.y -= 1.0;
    }
    if bindings.pan_left.pressed(&keys) || keys.pressed(KeyCode::ArrowLeft) {
        dir.x -= 1.0;
    }
    if bindings.pan_right.pressed(&keys) || keys.pressed(KeyCode::ArrowRight) {
        dir.x += 1.0;
    }
    if dir == Vec2::ZERO {
        return;
    }

    let Ok((mut transform, projection)) = query.get_single_mut() else {
        return;
    };
    let delta = dir.normalize() * PAN_SPEED * projection.scale * time.delta_secs();
    transform.translation += delta.extend(0.0);
}

/// Middle or right mouse drag: pan.
pub fn camera_pan_drag(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window>,
    mut drag: ResMut<CameraDrag>,
    mut query: Query<(&mut Transform, &OrthographicProjection), With<Camera2d>>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    let pan_buttons = [MouseButton::Middle, MouseButton::Right];

    if buttons.any_just_pressed(pan_buttons) {
        if let Some(pos) = window.cursor_position() {
            drag.dragging = true;
            drag.last_pos = pos;
        }
    }
    if !buttons.any_pressed(pan_buttons) {
        drag.dragging = false;
    }
    if !drag.dragging {
        return;
    }

    let Some(pos) = window.cursor_position() else {
        return;
    };
    let Ok((mut transform, projection)) = query.get_single_mut() else {
        return;
    };
    // Screen y grows downward, world y upward.
    let delta = pos - drag.last_pos;
    transform.translation.x -= delta.x * projection.scale;
    transform.translation.y += delta.y * projection.scale;
    drag.last_pos = pos;
}

/// Scroll wheel: zoom.
pub fn camera_zoom(
    mut scroll_evts: EventReader<MouseWheel>,
    mut contexts: EguiContexts,
    mut query: Query<&mut OrthographicProjection, With<Camera2d>>,
) {
    // The palette scrolls itself.
    if egui_wants_pointer(&mut contexts) {
        scroll_evts.clear();
        return;
    }
    let Ok(mut projection) = query.get_single_mut() else {
        scroll_evts.clear();
        return;
    };
    for evt in scroll_evts.read() {
        let dy = match evt.unit {
            MouseScrollUnit::Line => evt.y,
            MouseScrollUnit::Pixel => evt.y / 100.0,
        };
        let factor = 1.0 - dy * ZOOM_SPEED;
        projection.scale = (projection.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
    }
}
