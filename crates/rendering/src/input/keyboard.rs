use bevy::prelude::*;
use bevy_egui::EguiContexts;

use layout::events::{ActiveLayerEvent, DeselectEvent, SwitchLocationEvent};
use layout::loading::{CatalogHandle, LocationsHandle};
use layout::EditorSession;

use crate::egui_input_guard::egui_wants_keyboard;
use crate::keybindings::KeyBindings;

use super::placement::{known_layers, neighbour_location, next_layer};
use super::types::{ActiveLayer, ActiveTool, PointerTracker, StatusMessage};

// ---------------------------------------------------------------------------
// Tools
// ---------------------------------------------------------------------------

/// M/P/X pick a tool directly, Tab cycles through them.
pub fn keyboard_tool_switch(
    keys: Res<ButtonInput<KeyCode>>,
    bindings: Res<KeyBindings>,
    mut contexts: EguiContexts,
    mut tool: ResMut<ActiveTool>,
) {
    if egui_wants_keyboard(&mut contexts) {
        return;
    }
    let picked = if bindings.tool_move.just_pressed(&keys) {
        ActiveTool::Move
    } else if bindings.tool_place.just_pressed(&keys) {
        ActiveTool::Place
    } else if bindings.tool_remove.just_pressed(&keys) {
        ActiveTool::Remove
    } else if bindings.cycle_tool.just_pressed(&keys) {
        tool.next()
    } else {
        return;
    };
    if *tool != picked {
        *tool = picked;
    }
}

// ---------------------------------------------------------------------------
// Escape
// ---------------------------------------------------------------------------

/// Drop whatever is held. The core ignores the deselect when nothing is
/// armed, so this is safe to send unconditionally.
pub fn handle_escape_key(
    keys: Res<ButtonInput<KeyCode>>,
    bindings: Res<KeyBindings>,
    mut tracker: ResMut<PointerTracker>,
    mut deselect: EventWriter<DeselectEvent>,
    session: Res<EditorSession>,
    mut status: ResMut<StatusMessage>,
) {
    if !bindings.deselect.just_pressed(&keys) {
        return;
    }
    if session.drag().is_armed() {
        status.set("Drag cancelled", false);
    }
    tracker.pressed = false;
    tracker.last_pos = None;
    deselect.send(DeselectEvent);
}

// ---------------------------------------------------------------------------
// Layers
// ---------------------------------------------------------------------------

pub fn cycle_active_layer(
    keys: Res<ButtonInput<KeyCode>>,
    bindings: Res<KeyBindings>,
    mut contexts: EguiContexts,
    catalog: Res<CatalogHandle>,
    mut active_layer: ResMut<ActiveLayer>,
    mut layer_events: EventWriter<ActiveLayerEvent>,
    mut status: ResMut<StatusMessage>,
) {
    if egui_wants_keyboard(&mut contexts) || !bindings.cycle_layer.just_pressed(&keys) {
        return;
    }
    let layers = known_layers(catalog.0.iter());
    let next = next_layer(active_layer.0.as_ref(), &layers);
    match &next {
        Some(layer) => status.set(format!("Editing layer: {layer}"), false),
        None => status.set("Editing all layers", false),
    }
    active_layer.0.clone_from(&next);
    layer_events.send(ActiveLayerEvent(next));
}

// ---------------------------------------------------------------------------
// Locations
// ---------------------------------------------------------------------------

/// `[` and `]` step through the manifest, wrapping at either end.
pub fn cycle_location(
    keys: Res<ButtonInput<KeyCode>>,
    bindings: Res<KeyBindings>,
    mut contexts: EguiContexts,
    locations: Res<LocationsHandle>,
    session: Res<EditorSession>,
    mut switches: EventWriter<SwitchLocationEvent>,
) {
    if egui_wants_keyboard(&mut contexts) {
        return;
    }
    let step = if bindings.previous_location.just_pressed(&keys) {
        -1
    } else if bindings.next_location.just_pressed(&keys) {
        1
    } else {
        return;
    };

    let keys: Vec<&str> = locations.0.keys().collect();
    let Some(key) = neighbour_location(&keys, session.current_key(), step) else {
        return;
    };
    if session.current_key() != Some(key.as_str()) {
        switches.send(SwitchLocationEvent { key });
    }
}
