use bevy::prelude::*;

use crate::config::EditorConfig;
use crate::editor::EditorSession;
use crate::events::{
    ActiveLayerEvent, CursorChanged, DeselectEvent, EditFeedback, PlaceObjectEvent, PlacementsChanged,
    PointerEvent, PreviewChanged, RemoveObjectEvent, SwitchLocationEvent,
};
use crate::interaction::{collect_previews, handle_edit_requests, handle_pointer_events, PreviewTasks};
use crate::loading::{
    collect_data_load, collect_location_switch, handle_switch_requests, start_data_load, CatalogHandle,
    DataLoadTasks, LocationsHandle, PendingSwitch,
};

/// Ordering of the editing core within `Update`. Front ends send their
/// requests before `LayoutSet::Load` and read render events after
/// `LayoutSet::Collect`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum LayoutSet {
    Load,
    Edit,
    Collect,
}

pub struct LayoutPlugin;

impl Plugin for LayoutPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EditorConfig>();
        let tile_size = app.world().resource::<EditorConfig>().tile_size;

        app.insert_resource(EditorSession::new(tile_size))
            .init_resource::<CatalogHandle>()
            .init_resource::<LocationsHandle>()
            .init_resource::<DataLoadTasks>()
            .init_resource::<PendingSwitch>()
            .init_resource::<PreviewTasks>()
            .add_event::<PointerEvent>()
            .add_event::<PlaceObjectEvent>()
            .add_event::<RemoveObjectEvent>()
            .add_event::<SwitchLocationEvent>()
            .add_event::<DeselectEvent>()
            .add_event::<ActiveLayerEvent>()
            .add_event::<PlacementsChanged>()
            .add_event::<PreviewChanged>()
            .add_event::<CursorChanged>()
            .add_event::<EditFeedback>()
            .configure_sets(
                Update,
                (LayoutSet::Load, LayoutSet::Edit, LayoutSet::Collect).chain(),
            )
            .add_systems(Startup, start_data_load)
            .add_systems(
                Update,
                (collect_data_load, handle_switch_requests, collect_location_switch)
                    .chain()
                    .in_set(LayoutSet::Load),
            )
            .add_systems(
                Update,
                (handle_edit_requests, handle_pointer_events)
                    .chain()
                    .in_set(LayoutSet::Edit),
            )
            .add_systems(Update, collect_previews.in_set(LayoutSet::Collect));
    }
}
