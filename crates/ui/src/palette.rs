//! Object palette: category tabs, a name search and the object list.
//!
//! Picking an entry selects it for the Place tool. Wallpaper entries are
//! listed but disabled since they are applied to a location, not placed.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use layout::config::{OBJECT_CATEGORY_FILES, WALLPAPER_CATEGORY};
use layout::loading::CatalogHandle;
use layout::ObjectCatalog;
use rendering::input::{ActiveTool, SelectedObject};

#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct PaletteState {
    pub category: String,
    pub search: String,
}

impl Default for PaletteState {
    fn default() -> Self {
        Self {
            category: OBJECT_CATEGORY_FILES[0].to_string(),
            search: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteEntry {
    pub key: String,
    pub name: String,
    pub footprint: (u32, u32),
    pub placeable: bool,
}

impl PaletteEntry {
    pub fn label(&self) -> String {
        let name = if self.name.is_empty() { &self.key } else { &self.name };
        match self.footprint {
            (1, 1) => name.clone(),
            (w, h) => format!("{name}  {w}x{h}"),
        }
    }
}

/// "machines" -> "Machines".
pub fn category_label(category: &str) -> String {
    let mut chars = category.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn palette_entries(catalog: &ObjectCatalog, category: &str, search: &str) -> Vec<PaletteEntry> {
    catalog
        .search(category, search)
        .into_iter()
        .map(|def| PaletteEntry {
            key: def.key.clone(),
            name: def.name.clone(),
            footprint: def.footprint(),
            placeable: def.category != WALLPAPER_CATEGORY,
        })
        .collect()
}

pub fn palette_ui(
    mut contexts: EguiContexts,
    mut state: ResMut<PaletteState>,
    catalog: Res<CatalogHandle>,
    mut selected: ResMut<SelectedObject>,
    mut tool: ResMut<ActiveTool>,
) {
    egui::SidePanel::left("object_palette")
        .default_width(220.0)
        .resizable(true)
        .show(contexts.ctx_mut(), |ui| {
            ui.heading("Objects");

            ui.horizontal_wrapped(|ui| {
                for category in OBJECT_CATEGORY_FILES {
                    let is_open = state.category == category;
                    if ui.selectable_label(is_open, category_label(category)).clicked() && !is_open {
                        state.category = category.to_string();
                    }
                }
            });
            ui.separator();

            ui.horizontal(|ui| {
                ui.label("Search");
                ui.text_edit_singleline(&mut state.search);
                if !state.search.is_empty() && ui.small_button("x").clicked() {
                    state.search.clear();
                }
            });
            ui.separator();

            let entries = palette_entries(&catalog.0, &state.category, &state.search);
            if entries.is_empty() {
                ui.weak(if catalog.0.is_empty() { "No objects loaded" } else { "No matches" });
                return;
            }

            egui::ScrollArea::vertical().show(ui, |ui| {
                for entry in &entries {
                    let is_selected = selected.0.as_deref() == Some(entry.key.as_str());
                    let response = ui
                        .add_enabled(entry.placeable, egui::SelectableLabel::new(is_selected, entry.label()))
                        .on_disabled_hover_text("Wallpaper is applied to a location, not placed");
                    if response.clicked() {
                        selected.0 = Some(entry.key.clone());
                        *tool = ActiveTool::Place;
                    }
                    response.on_hover_text(entry.key.as_str());
                }
            });
        });
}
