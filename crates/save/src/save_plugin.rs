use std::path::{Path, PathBuf};

use bevy::prelude::*;

use layout::events::{EditFeedback, RenderEvents};
use layout::loading::{CatalogHandle, LocationsHandle};
use layout::{EditorConfig, EditorSession, LayoutSet, RestoreCount, SavedLayout};

use crate::atomic_write::atomic_write;
use crate::json_export::{export_json, export_path, import_json};
use crate::save_codec::{read_save_file, write_save_file};
use crate::save_error::SaveError;
use crate::save_types::SaveFile;

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Write every touched location to the configured save file.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct SaveLayoutEvent;

/// Replace placements with the contents of the configured save file.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct LoadLayoutEvent;

/// Write the open location as JSON next to the save file.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ExportLayoutEvent;

/// Read one location's layout from a JSON file.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct ImportLayoutEvent {
    pub path: PathBuf,
}

/// Whether `.tgl` payloads are lz4-compressed on write.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressSaves(pub bool);

impl Default for CompressSaves {
    fn default() -> Self {
        Self(true)
    }
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

/// Save, load, export and import for the editing core. Requires
/// `layout::LayoutPlugin`.
pub struct SavePlugin;

impl Plugin for SavePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<SaveLayoutEvent>()
            .add_event::<LoadLayoutEvent>()
            .add_event::<ExportLayoutEvent>()
            .add_event::<ImportLayoutEvent>()
            .init_resource::<CompressSaves>();

        // Synchronous file I/O; one request of each kind per frame.
        app.add_systems(
            Update,
            (
                detect_save_event,
                detect_export_event,
                detect_load_event,
                detect_import_event,
            )
                .chain()
                .in_set(LayoutSet::Edit),
        );
    }
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

fn report_failure(feedback: &mut EventWriter<EditFeedback>, failure: EditFeedback) {
    error!("{failure}");
    feedback.send(failure);
}

/// Consume all pending events of one kind, reporting whether any arrived.
fn drain<E: Event>(events: &mut EventReader<E>) -> bool {
    let any = !events.is_empty();
    events.clear();
    any
}

fn save_layouts(path: &Path, layouts: Vec<SavedLayout>, compress: bool) -> Result<usize, SaveError> {
    if layouts.is_empty() {
        return Err(SaveError::NoData);
    }
    let save = SaveFile::new(layouts);
    write_save_file(path, &save, compress)?;
    Ok(save.placement_count())
}

fn detect_save_event(
    mut events: EventReader<SaveLayoutEvent>,
    session: Res<EditorSession>,
    config: Res<EditorConfig>,
    compress: Res<CompressSaves>,
    mut feedback: EventWriter<EditFeedback>,
) {
    if !drain(&mut events) {
        return;
    }
    let path = PathBuf::from(&config.save_path);
    match save_layouts(&path, session.saved_layouts(), compress.0) {
        Ok(count) => {
            info!("Saved {} placements to {}", count, path.display());
            feedback.send(EditFeedback::Saved {
                path: config.save_path.clone(),
            });
        }
        Err(e) => report_failure(&mut feedback, EditFeedback::SaveFailed(e.to_string())),
    }
}

fn detect_export_event(
    mut events: EventReader<ExportLayoutEvent>,
    session: Res<EditorSession>,
    config: Res<EditorConfig>,
    mut feedback: EventWriter<EditFeedback>,
) {
    if !drain(&mut events) {
        return;
    }
    let Some(location) = session.current() else {
        report_failure(&mut feedback, EditFeedback::SaveFailed(SaveError::NoData.to_string()));
        return;
    };

    let path = export_path(Path::new(&config.save_path), &location.key);
    let result = export_json(&SavedLayout::capture(location))
        .and_then(|json| atomic_write(&path, json.as_bytes()).map_err(SaveError::from));
    match result {
        Ok(()) => {
            info!("Exported {} to {}", location.key, path.display());
            feedback.send(EditFeedback::Saved {
                path: path.display().to_string(),
            });
        }
        Err(e) => report_failure(&mut feedback, EditFeedback::SaveFailed(e.to_string())),
    }
}

fn restored(count: RestoreCount) -> EditFeedback {
    if count.skipped > 0 {
        warn!("{} saved placements failed validation and were skipped", count.skipped);
    }
    EditFeedback::Restored {
        placements: count.restored,
        skipped: count.skipped,
    }
}

fn detect_load_event(
    mut events: EventReader<LoadLayoutEvent>,
    mut session: ResMut<EditorSession>,
    config: Res<EditorConfig>,
    data: (Res<LocationsHandle>, Res<CatalogHandle>),
    mut render: RenderEvents,
    mut feedback: EventWriter<EditFeedback>,
) {
    if !drain(&mut events) {
        return;
    }
    match read_save_file(Path::new(&config.save_path)) {
        Ok(save) => {
            let (locations, catalog) = data;
            let count = session.replace_layouts(save.layouts, &locations.0, &*catalog.0, &mut render);
            feedback.send(restored(count));
        }
        Err(e) => report_failure(&mut feedback, EditFeedback::LoadFailed(e.to_string())),
    }
}

fn detect_import_event(
    mut events: EventReader<ImportLayoutEvent>,
    mut session: ResMut<EditorSession>,
    data: (Res<LocationsHandle>, Res<CatalogHandle>),
    mut render: RenderEvents,
    mut feedback: EventWriter<EditFeedback>,
) {
    // Only the newest import is applied; earlier ones would be overwritten.
    let Some(request) = events.read().last().cloned() else {
        return;
    };
    let result = std::fs::read_to_string(&request.path)
        .map_err(SaveError::from)
        .and_then(|json| import_json(&json));
    match result {
        Ok(layout) => {
            info!("Importing {} from {}", layout.location_key, request.path.display());
            let (locations, catalog) = data;
            let count = session.merge_layouts([layout], &locations.0, &*catalog.0, &mut render);
            feedback.send(restored(count));
        }
        Err(e) => report_failure(&mut feedback, EditFeedback::LoadFailed(e.to_string())),
    }
}
