//! Startup data load and location switching on the task pools.
//!
//! The catalog and the location registry are read once on the `IoTaskPool`
//! and then shared behind `Arc`s. A location switch runs as its own task so
//! the single in-flight guard in [`EditorSession`] covers the whole load.

use std::path::PathBuf;
use std::sync::Arc;

use bevy::prelude::*;
use bevy::tasks::{block_on, IoTaskPool, Task};

use crate::catalog::{CatalogError, ObjectCatalog};
use crate::config::EditorConfig;
use crate::editor::EditorSession;
use crate::events::{EditFeedback, RenderEvents, SwitchLocationEvent};
use crate::location::{LocationBounds, LocationError, LocationRegistry};

/// The object catalog, loaded once and shared read-only.
#[derive(Resource, Debug, Clone, Default)]
pub struct CatalogHandle(pub Arc<ObjectCatalog>);

#[derive(Resource, Debug, Clone, Default)]
pub struct LocationsHandle(pub Arc<LocationRegistry>);

/// Insert before `LayoutPlugin` to skip reading data from disk; the caller
/// then provides `CatalogHandle` and `LocationsHandle` itself.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct SkipDataLoad;

#[derive(Resource, Default)]
pub struct DataLoadTasks {
    catalog: Option<Task<Result<ObjectCatalog, CatalogError>>>,
    locations: Option<Task<Result<LocationRegistry, LocationError>>>,
}

impl DataLoadTasks {
    pub fn is_loading(&self) -> bool {
        self.catalog.is_some() || self.locations.is_some()
    }
}

#[derive(Resource, Default)]
pub struct PendingSwitch {
    task: Option<Task<Result<LocationBounds, LocationError>>>,
}

impl PendingSwitch {
    pub fn is_pending(&self) -> bool {
        self.task.is_some()
    }
}

pub fn start_data_load(
    config: Res<EditorConfig>,
    skip: Option<Res<SkipDataLoad>>,
    mut tasks: ResMut<DataLoadTasks>,
) {
    if skip.is_some() {
        return;
    }
    let pool = IoTaskPool::get();

    let objects_dir = config.objects_dir();
    tasks.catalog = Some(pool.spawn(async move { ObjectCatalog::load_from_dir(&objects_dir) }));

    let data_dir = PathBuf::from(&config.data_dir);
    tasks.locations = Some(pool.spawn(async move { LocationRegistry::load_from_dir(&data_dir) }));
    info!("Loading editor data from {}", config.data_dir);
}

/// Install finished loads. Once the registry is in, open the configured
/// start location (or the first one in the manifest).
pub fn collect_data_load(
    config: Res<EditorConfig>,
    mut tasks: ResMut<DataLoadTasks>,
    mut catalog: ResMut<CatalogHandle>,
    mut locations: ResMut<LocationsHandle>,
    mut switches: EventWriter<SwitchLocationEvent>,
    mut feedback: EventWriter<EditFeedback>,
    mut exit: EventWriter<AppExit>,
) {
    if let Some(task) = tasks.catalog.as_mut() {
        if let Some(result) = block_on(futures_lite::future::poll_once(task)) {
            tasks.catalog = None;
            match result {
                Ok(loaded) => catalog.0 = Arc::new(loaded),
                Err(e) => {
                    // Without a catalog every placement is MissingDefinition,
                    // but the editor still opens.
                    error!("Failed to load object catalog: {}", e);
                    feedback.send(EditFeedback::LoadFailed(e.to_string()));
                }
            }
        }
    }

    let Some(task) = tasks.locations.as_mut() else {
        return;
    };
    let Some(result) = block_on(futures_lite::future::poll_once(task)) else {
        return;
    };
    tasks.locations = None;

    let registry = match result {
        Ok(registry) => registry,
        Err(e) => {
            error!("Failed to load locations: {}", e);
            feedback.send(EditFeedback::LoadFailed(e.to_string()));
            exit.send(AppExit::error());
            return;
        }
    };

    match start_location(&config, &registry) {
        Some(key) => {
            switches.send(SwitchLocationEvent { key });
        }
        None => warn!("No locations listed in the manifest"),
    }
    locations.0 = Arc::new(registry);
}

fn start_location(config: &EditorConfig, registry: &LocationRegistry) -> Option<String> {
    if let Some(key) = &config.start_location {
        if registry.get(key).is_ok() {
            return Some(key.clone());
        }
        warn!("Start location {} not found, opening the first location", key);
    }
    registry.first_key().map(str::to_string)
}

pub fn handle_switch_requests(
    mut requests: EventReader<SwitchLocationEvent>,
    mut session: ResMut<EditorSession>,
    locations: Res<LocationsHandle>,
    mut pending: ResMut<PendingSwitch>,
    mut render: RenderEvents,
    mut feedback: EventWriter<EditFeedback>,
) {
    for request in requests.read() {
        if !session.request_location_switch(&request.key, &mut render) {
            feedback.send(EditFeedback::SwitchIgnored {
                key: request.key.clone(),
            });
            continue;
        }
        let registry = Arc::clone(&locations.0);
        let key = request.key.clone();
        pending.task = Some(IoTaskPool::get().spawn(async move { registry.get(&key).cloned() }));
    }
}

pub fn collect_location_switch(
    mut pending: ResMut<PendingSwitch>,
    mut session: ResMut<EditorSession>,
    mut render: RenderEvents,
    mut feedback: EventWriter<EditFeedback>,
) {
    let Some(task) = pending.task.as_mut() else {
        return;
    };
    let Some(result) = block_on(futures_lite::future::poll_once(task)) else {
        return;
    };
    pending.task = None;

    match result {
        Ok(bounds) => {
            let key = bounds.key.clone();
            let name = bounds.name.clone();
            if session.complete_location_switch(bounds, &mut render) {
                feedback.send(EditFeedback::LocationOpened { key, name });
            }
        }
        Err(e) => {
            error!("Location switch failed: {}", e);
            session.abort_location_switch();
            feedback.send(EditFeedback::LoadFailed(e.to_string()));
        }
    }
}
