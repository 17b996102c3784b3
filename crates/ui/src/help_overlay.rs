//! Shortcut help window listing every key binding grouped by category.
//!
//! Toggled with F1 (the `toggle_help` binding) or the toolbar's `?` button,
//! closed again with the same key, Escape or the Close button.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use rendering::keybindings::{BindableAction, KeyBindings};

/// Whether the help window is currently visible.
#[derive(Resource, Default)]
pub struct HelpOverlayOpen(pub bool);

/// `(category, [(action label, key label)])` in display order.
pub fn help_sections(bindings: &KeyBindings) -> Vec<(&'static str, Vec<(&'static str, String)>)> {
    let mut sections: Vec<(&'static str, Vec<(&'static str, String)>)> = Vec::new();
    for action in BindableAction::ALL {
        let row = (action.label(), bindings.get(action).display_label());
        match sections.last_mut() {
            Some((category, rows)) if *category == action.category() => rows.push(row),
            _ => sections.push((action.category(), vec![row])),
        }
    }
    sections
}

pub fn toggle_help_overlay(
    keys: Res<ButtonInput<KeyCode>>,
    bindings: Res<KeyBindings>,
    mut open: ResMut<HelpOverlayOpen>,
) {
    if bindings.toggle_help.just_pressed(&keys) {
        open.0 = !open.0;
    } else if open.0 && bindings.deselect.just_pressed(&keys) {
        open.0 = false;
    }
}

pub fn help_overlay_ui(
    mut contexts: EguiContexts,
    mut open: ResMut<HelpOverlayOpen>,
    bindings: Res<KeyBindings>,
) {
    if !open.0 {
        return;
    }

    let mut should_close = false;

    egui::Window::new("Keyboard Shortcuts")
        .collapsible(false)
        .resizable(false)
        .default_width(320.0)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .show(contexts.ctx_mut(), |ui| {
            ui.spacing_mut().item_spacing.y = 2.0;
            ui.colored_label(egui::Color32::from_gray(160), "Press F1 or Escape to close.");
            ui.add_space(6.0);

            for (category, rows) in help_sections(&bindings) {
                ui.heading(category);
                ui.separator();
                for (label, key) in rows {
                    ui.horizontal(|ui| {
                        ui.colored_label(egui::Color32::from_gray(220), label);
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.colored_label(
                                egui::Color32::from_rgb(230, 190, 110),
                                egui::RichText::new(key).monospace(),
                            );
                        });
                    });
                }
                ui.add_space(6.0);
            }

            ui.colored_label(
                egui::Color32::from_gray(160),
                "Arrow keys also pan. Drag with the middle or right button, scroll to zoom.",
            );
            ui.add_space(4.0);
            if ui.button("Close").clicked() {
                should_close = true;
            }
        });

    if should_close {
        open.0 = false;
    }
}
