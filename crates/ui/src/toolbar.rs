use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use layout::events::{ActiveLayerEvent, SwitchLocationEvent};
use layout::loading::{CatalogHandle, LocationsHandle};
use layout::location::LocationSummary;
use layout::{EditorSession, Layer};
use rendering::input::{known_layers, ActiveLayer, ActiveTool, CursorGridPos, SelectedObject, StatusMessage};
use save::{ExportLayoutEvent, LoadLayoutEvent, SaveLayoutEvent};

use crate::help_overlay::HelpOverlayOpen;

const ALL_LAYERS: &str = "All layers";

fn summary_name(summary: &LocationSummary) -> &str {
    if summary.name.is_empty() {
        &summary.key
    } else {
        &summary.name
    }
}

/// Text of the location picker: the pending switch while one is loading,
/// otherwise the open location.
pub fn location_label(summaries: &[LocationSummary], current: Option<&str>, switching: Option<&str>) -> String {
    let name_of = |key: &str| {
        summaries
            .iter()
            .find(|s| s.key == key)
            .map_or_else(|| key.to_string(), |s| summary_name(s).to_string())
    };
    match (switching, current) {
        (Some(key), _) => format!("Loading {}...", name_of(key)),
        (None, Some(key)) => name_of(key),
        (None, None) => "No location".to_string(),
    }
}

/// Status bar cell readout.
pub fn cursor_label(cursor: &CursorGridPos) -> String {
    if cursor.on_screen && cursor.in_bounds {
        format!("Cell {}, {}", cursor.cell.x, cursor.cell.y)
    } else {
        "Cell -".to_string()
    }
}

pub fn layer_label(layer: Option<&Layer>) -> &str {
    layer.map_or(ALL_LAYERS, Layer::as_str)
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
pub fn toolbar_ui(
    mut contexts: EguiContexts,
    mut tool: ResMut<ActiveTool>,
    mut active_layer: ResMut<ActiveLayer>,
    data: (Res<EditorSession>, Res<LocationsHandle>, Res<CatalogHandle>),
    mut requests: (EventWriter<SwitchLocationEvent>, EventWriter<ActiveLayerEvent>),
    mut files: (
        EventWriter<SaveLayoutEvent>,
        EventWriter<LoadLayoutEvent>,
        EventWriter<ExportLayoutEvent>,
    ),
    mut help: ResMut<HelpOverlayOpen>,
    status: Res<StatusMessage>,
) {
    let (session, locations, catalog) = data;
    let summaries = locations.0.available();
    let current = session.current_key();
    let switching = session.switch_in_flight();

    egui::TopBottomPanel::top("editor_toolbar")
        .exact_height(36.0)
        .show(contexts.ctx_mut(), |ui| {
            ui.horizontal_centered(|ui| {
                ui.spacing_mut().item_spacing.x = 10.0;

                // Location picker
                egui::ComboBox::from_id_salt("location_picker")
                    .selected_text(location_label(&summaries, current, switching))
                    .width(180.0)
                    .show_ui(ui, |ui| {
                        for summary in &summaries {
                            let is_open = current == Some(summary.key.as_str());
                            let text = format!(
                                "{}  {}x{}",
                                summary_name(summary),
                                summary.grid_width,
                                summary.grid_height
                            );
                            if ui.selectable_label(is_open, text).clicked() && !is_open {
                                requests.0.send(SwitchLocationEvent {
                                    key: summary.key.clone(),
                                });
                            }
                        }
                    });
                if switching.is_some() {
                    ui.spinner();
                }

                ui.separator();

                for candidate in ActiveTool::ALL {
                    if ui
                        .selectable_label(*tool == candidate, candidate.label())
                        .clicked()
                    {
                        *tool = candidate;
                    }
                }

                ui.separator();

                // Layer filter
                let mut picked: Option<Option<Layer>> = None;
                egui::ComboBox::from_id_salt("layer_picker")
                    .selected_text(layer_label(active_layer.0.as_ref()))
                    .show_ui(ui, |ui| {
                        if ui.selectable_label(active_layer.0.is_none(), ALL_LAYERS).clicked() {
                            picked = Some(None);
                        }
                        for layer in known_layers(catalog.0.iter()) {
                            let is_active = active_layer.0.as_ref() == Some(&layer);
                            if ui.selectable_label(is_active, layer.as_str()).clicked() {
                                picked = Some(Some(layer));
                            }
                        }
                    });
                if let Some(layer) = picked.filter(|layer| *layer != active_layer.0) {
                    active_layer.0 = layer.clone();
                    requests.1.send(ActiveLayerEvent(layer));
                }

                ui.separator();

                if ui.button("Save").on_hover_text("Ctrl+S").clicked() {
                    files.0.send(SaveLayoutEvent);
                }
                if ui.button("Load").on_hover_text("Ctrl+O").clicked() {
                    files.1.send(LoadLayoutEvent);
                }
                if ui
                    .add_enabled(current.is_some(), egui::Button::new("Export JSON"))
                    .clicked()
                {
                    files.2.send(ExportLayoutEvent);
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.selectable_label(help.0, "?").on_hover_text("Shortcuts (F1)").clicked() {
                        help.0 = !help.0;
                    }
                });
            });
        });

    // ---- Floating toast for status messages ----
    if status.active() {
        let color = if status.is_error {
            egui::Color32::from_rgb(220, 60, 50)
        } else {
            egui::Color32::from_rgb(120, 200, 90)
        };
        egui::Area::new(egui::Id::new("status_toast"))
            .anchor(egui::Align2::CENTER_TOP, egui::vec2(0.0, 44.0))
            .show(contexts.ctx_mut(), |ui| {
                egui::Frame::popup(ui.style())
                    .fill(egui::Color32::from_rgba_premultiplied(30, 28, 24, 220))
                    .show(ui, |ui| {
                        ui.colored_label(color, &status.text);
                    });
            });
    }
}

// ---------------------------------------------------------------------------
// Bottom status bar
// ---------------------------------------------------------------------------

pub fn status_bar_ui(
    mut contexts: EguiContexts,
    session: Res<EditorSession>,
    cursor: Res<CursorGridPos>,
    active_layer: Res<ActiveLayer>,
    selected: Res<SelectedObject>,
    tool: Res<ActiveTool>,
) {
    egui::TopBottomPanel::bottom("status_bar")
        .exact_height(24.0)
        .show(contexts.ctx_mut(), |ui| {
            ui.horizontal_centered(|ui| {
                ui.spacing_mut().item_spacing.x = 12.0;
                match session.current() {
                    Some(location) => {
                        let name = if location.name.is_empty() { &location.key } else { &location.name };
                        ui.label(format!(
                            "{}  {}x{}  {} placed",
                            name,
                            location.grid_width,
                            location.grid_height,
                            location.placements().len()
                        ));
                    }
                    None => {
                        ui.weak("No location open");
                    }
                }
                ui.separator();
                ui.label(cursor_label(&cursor));
                ui.separator();
                ui.label(format!("Layer: {}", layer_label(active_layer.0.as_ref())));
                if *tool == ActiveTool::Place {
                    ui.separator();
                    ui.label(format!(
                        "Placing: {}",
                        selected.0.as_deref().unwrap_or("nothing selected")
                    ));
                }
                if session.drag().is_armed() {
                    ui.separator();
                    ui.colored_label(egui::Color32::from_rgb(230, 190, 110), "Holding object");
                }
            });
        });
}
