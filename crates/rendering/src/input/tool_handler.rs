//! Main tool input dispatch system.

use bevy::prelude::*;
use bevy_egui::EguiContexts;

use layout::events::{PlaceObjectEvent, PointerEvent, RemoveObjectEvent};
use layout::loading::CatalogHandle;
use layout::DefinitionLookup;

use crate::egui_input_guard::egui_wants_pointer;

use super::placement::placement_layer;
use super::types::{ActiveLayer, ActiveTool, CursorGridPos, PointerTracker, SelectedObject, StatusMessage};

pub(crate) fn press(tracker: &mut PointerTracker, pos: Vec2) -> PointerEvent {
    tracker.pressed = true;
    tracker.last_pos = Some(pos);
    PointerEvent::down(pos)
}

/// Event to forward while the button is believed held.
///
/// A press seen in this state means the release never arrived (focus loss,
/// a release over another window). It goes to the core as a new `Down`, which
/// cancels the stale drag instead of letting the next release commit it.
pub(crate) fn held_pointer_event(
    tracker: &mut PointerTracker,
    just_pressed: bool,
    just_released: bool,
    on_screen: bool,
    pos: Vec2,
) -> Option<PointerEvent> {
    if just_pressed {
        return Some(press(tracker, pos));
    }
    if just_released {
        tracker.pressed = false;
        tracker.last_pos = None;
        return Some(PointerEvent::up(pos));
    }
    if on_screen && tracker.last_pos != Some(pos) {
        tracker.last_pos = Some(pos);
        return Some(PointerEvent::moved(pos));
    }
    None
}

/// Forward the left button to the core according to the active tool.
///
/// With the Move tool a press, every cursor movement while held and the
/// release become `PointerEvent`s. A release is forwarded even over the UI
/// so a drag never stays armed behind a panel.
#[allow(clippy::too_many_arguments)]
pub fn handle_tool_input(
    buttons: Res<ButtonInput<MouseButton>>,
    mut contexts: EguiContexts,
    cursor: Res<CursorGridPos>,
    tool: Res<ActiveTool>,
    selected: Res<SelectedObject>,
    active_layer: Res<ActiveLayer>,
    catalog: Res<CatalogHandle>,
    mut tracker: ResMut<PointerTracker>,
    mut status: ResMut<StatusMessage>,
    mut writers: (
        EventWriter<PointerEvent>,
        EventWriter<PlaceObjectEvent>,
        EventWriter<RemoveObjectEvent>,
    ),
) {
    let (pointer, places, removes) = &mut writers;
    let pos = cursor.location_pos;

    if tracker.pressed {
        let event = held_pointer_event(
            &mut tracker,
            buttons.just_pressed(MouseButton::Left),
            buttons.just_released(MouseButton::Left),
            cursor.on_screen,
            pos,
        );
        if let Some(event) = event {
            pointer.send(event);
        }
        return;
    }

    // Prevent click-through: skip world actions when egui is handling pointer input.
    if egui_wants_pointer(&mut contexts) {
        return;
    }
    if !cursor.on_screen || !buttons.just_pressed(MouseButton::Left) {
        return;
    }

    match *tool {
        ActiveTool::Move => {
            pointer.send(press(&mut tracker, pos));
        }
        ActiveTool::Place => {
            let Some(object_key) = selected.0.clone() else {
                status.set("Pick an object in the palette first", true);
                return;
            };
            let layer = placement_layer(active_layer.0.as_ref(), catalog.0.definition(&object_key));
            places.send(PlaceObjectEvent {
                object_key,
                cell: cursor.cell,
                layer,
            });
        }
        ActiveTool::Remove => {
            let layer = active_layer.0.clone().unwrap_or_default();
            removes.send(RemoveObjectEvent {
                cell: cursor.cell,
                layer,
            });
        }
    }
}
