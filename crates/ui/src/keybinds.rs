use bevy::prelude::*;
use bevy_egui::EguiContexts;

use rendering::keybindings::KeyBindings;
use save::{LoadLayoutEvent, SaveLayoutEvent};

/// Ctrl+S saves and Ctrl+O loads the layout file.
/// Skipped when egui wants keyboard input (e.g. the palette search).
pub fn save_load_keybinds(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut contexts: EguiContexts,
    bindings: Res<KeyBindings>,
    mut save_events: EventWriter<SaveLayoutEvent>,
    mut load_events: EventWriter<LoadLayoutEvent>,
) {
    if contexts.ctx_mut().wants_keyboard_input() {
        return;
    }

    if bindings.save.just_pressed(&keyboard) {
        save_events.send(SaveLayoutEvent);
    }
    if bindings.load.just_pressed(&keyboard) {
        load_events.send(LoadLayoutEvent);
    }
}
