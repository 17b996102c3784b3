//! # TestEditor: headless harness for the editing core
//!
//! Wraps a `bevy::app::App` running `LayoutPlugin` under `MinimalPlugins`,
//! with the fixture catalog and in-memory locations instead of files on
//! disk. Every event the core sends is recorded for assertions.

mod fixtures;

pub use fixtures::{fixture_catalog, TestLocation};

use std::sync::Arc;

use bevy::app::App;
use bevy::prelude::*;

use crate::editor::EditorSession;
use crate::events::{
    CursorChanged, EditFeedback, PlaceObjectEvent, PlacementsChanged, PointerEvent, PreviewChanged,
    SwitchLocationEvent,
};
use crate::grid::{GridPos, Rect};
use crate::interaction::PreviewTasks;
use crate::loading::{CatalogHandle, LocationsHandle, PendingSwitch, SkipDataLoad};
use crate::location::{LocationBounds, LocationRegistry};
use crate::notifier::{CursorCue, DragPreview, PlacementChange};
use crate::placement::Layer;
use crate::plugin::{LayoutPlugin, LayoutSet};

/// Upper bound on frames spent waiting for background tasks.
const MAX_SETTLE_FRAMES: usize = 200;

/// Everything the core told the front end, in order.
#[derive(Resource, Default, Debug)]
pub struct Recorded {
    pub feedback: Vec<EditFeedback>,
    pub changes: Vec<PlacementChange>,
    pub previews: Vec<Option<DragPreview>>,
    pub cursors: Vec<CursorCue>,
}

fn record_events(
    mut recorded: ResMut<Recorded>,
    mut feedback: EventReader<EditFeedback>,
    mut changes: EventReader<PlacementsChanged>,
    mut previews: EventReader<PreviewChanged>,
    mut cursors: EventReader<CursorChanged>,
) {
    recorded.feedback.extend(feedback.read().cloned());
    recorded.changes.extend(changes.read().map(|e| e.0));
    recorded.previews.extend(previews.read().map(|e| e.0));
    recorded.cursors.extend(cursors.read().map(|e| e.0));
}

/// `farm`: 20x20 outdoors with the top row blocked. `cellar`: 8x8 indoors.
pub fn default_locations() -> Vec<LocationBounds> {
    vec![
        TestLocation::new(20, 20)
            .key("farm")
            .blocked(Rect::new(0, 0, 20, 1))
            .build()
            .bounds(),
        TestLocation::new(8, 8).key("cellar").indoors().build().bounds(),
    ]
}

pub struct TestEditor {
    app: App,
}

impl Default for TestEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEditor {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// Editor with the default locations and no location open yet.
    pub fn new() -> Self {
        Self::with_locations(default_locations())
    }

    pub fn with_locations(locations: Vec<LocationBounds>) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);

        // Provide the data before LayoutPlugin so nothing is read from disk.
        app.insert_resource(SkipDataLoad);
        app.insert_resource(CatalogHandle(Arc::new(fixture_catalog())));
        app.insert_resource(LocationsHandle(Arc::new(LocationRegistry::from_bounds(locations))));
        app.add_plugins(LayoutPlugin);

        app.init_resource::<Recorded>();
        app.add_systems(Update, record_events.after(LayoutSet::Collect));

        app.update();
        Self { app }
    }

    /// Editor with `key` already open.
    pub fn opened(key: &str) -> Self {
        let mut editor = Self::new();
        editor.open(key);
        editor
    }

    // -----------------------------------------------------------------------
    // Driving
    // -----------------------------------------------------------------------

    pub fn send<E: Event>(&mut self, event: E) -> &mut Self {
        self.app.world_mut().send_event(event);
        self
    }

    pub fn update(&mut self) -> &mut Self {
        self.app.update();
        self
    }

    /// Run frames until no switch or preview task is outstanding.
    pub fn settle(&mut self) -> &mut Self {
        for _ in 0..MAX_SETTLE_FRAMES {
            self.app.update();
            if !self.busy() {
                return self;
            }
            std::thread::yield_now();
        }
        panic!("background tasks did not finish within {MAX_SETTLE_FRAMES} frames");
    }

    fn busy(&self) -> bool {
        let world = self.app.world();
        world.resource::<PendingSwitch>().is_pending() || !world.resource::<PreviewTasks>().is_empty()
    }

    pub fn open(&mut self, key: &str) -> &mut Self {
        self.send(SwitchLocationEvent { key: key.to_string() }).settle()
    }

    pub fn place(&mut self, object_key: &str, x: i32, y: i32) -> &mut Self {
        self.send(PlaceObjectEvent {
            object_key: object_key.to_string(),
            cell: GridPos::new(x, y),
            layer: Layer::default(),
        })
        .update()
    }

    pub fn pointer(&mut self, event: PointerEvent) -> &mut Self {
        self.send(event).settle()
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn session(&self) -> &EditorSession {
        self.app.world().resource::<EditorSession>()
    }

    pub fn recorded(&self) -> &Recorded {
        self.app.world().resource::<Recorded>()
    }

    pub fn last_feedback(&self) -> Option<&EditFeedback> {
        self.recorded().feedback.last()
    }

    pub fn placement_count(&self) -> usize {
        self.session().current().map_or(0, |l| l.placements().len())
    }
}
