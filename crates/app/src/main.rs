use bevy::prelude::*;
use bevy::window::PresentMode;
use bevy::winit::{UpdateMode, WinitSettings};

use layout::EditorConfig;

fn main() {
    let config = EditorConfig::from_env();

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Tile Grid Editor".to_string(),
                resolution: (1280.0, 720.0).into(),
                present_mode: PresentMode::AutoVsync,
                ..default()
            }),
            ..default()
        }))
        // Redraw on input; background loads are still polled every 16 ms.
        .insert_resource(WinitSettings {
            focused_mode: UpdateMode::reactive_low_power(std::time::Duration::from_millis(16)),
            unfocused_mode: UpdateMode::reactive_low_power(std::time::Duration::from_millis(250)),
        })
        .insert_resource(config)
        .add_plugins((
            layout::LayoutPlugin,
            rendering::RenderingPlugin,
            save::SavePlugin,
            ui::UiPlugin,
        ))
        .run();
}
