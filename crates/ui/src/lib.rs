use bevy::prelude::*;
use bevy_egui::EguiPlugin;

use layout::LayoutSet;

pub mod help_overlay;
pub mod keybinds;
pub mod palette;
pub mod theme;
pub mod toolbar;

/// Editor panels. Requires `RenderingPlugin` and `SavePlugin`.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<EguiPlugin>() {
            app.add_plugins(EguiPlugin);
        }

        app.init_resource::<palette::PaletteState>()
            .init_resource::<help_overlay::HelpOverlayOpen>()
            .add_systems(Startup, theme::apply_editor_theme)
            // Panels are laid out in this order: top bar, status bar, palette.
            .add_systems(
                Update,
                (
                    toolbar::toolbar_ui,
                    toolbar::status_bar_ui,
                    palette::palette_ui,
                    help_overlay::help_overlay_ui,
                )
                    .chain()
                    .before(LayoutSet::Load),
            )
            .add_systems(
                Update,
                (
                    keybinds::save_load_keybinds,
                    help_overlay::toggle_help_overlay,
                )
                    .before(LayoutSet::Load),
            );
    }
}
