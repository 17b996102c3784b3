//! Window cursor driven by the core's cursor cues.

use bevy::prelude::*;
use bevy::window::{PrimaryWindow, SystemCursorIcon};
use bevy::winit::cursor::CursorIcon;

use layout::events::CursorChanged;
use layout::CursorCue;

pub fn cursor_icon_for(cue: CursorCue) -> CursorIcon {
    match cue {
        CursorCue::Default => SystemCursorIcon::Default.into(),
        CursorCue::Grabbing => SystemCursorIcon::Grabbing.into(),
    }
}

pub fn apply_cursor_cue(
    mut cues: EventReader<CursorChanged>,
    windows: Query<Entity, With<PrimaryWindow>>,
    mut commands: Commands,
) {
    let Some(CursorChanged(cue)) = cues.read().last() else {
        return;
    };
    let Ok(window) = windows.get_single() else {
        return;
    };
    commands.entity(window).insert(cursor_icon_for(*cue));
}
