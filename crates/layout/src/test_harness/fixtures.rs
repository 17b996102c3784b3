//! Fixture catalog and a location builder for unit tests.

use crate::catalog::ObjectCatalog;
use crate::catalog::ObjectDefinition;
use crate::grid::Rect;
use crate::location::{Location, LocationBounds};
use crate::placement::{Layer, Placement, PlacementId};

fn definition(key: &str, category: &str, width: u32, height: u32) -> ObjectDefinition {
    ObjectDefinition {
        key: key.to_string(),
        name: key.replace('_', " "),
        category: category.to_string(),
        footprint_width: width,
        footprint_height: height,
        placeable_indoors: true,
        default_layer: Layer::default(),
        sprite: None,
    }
}

/// A small catalog covering every validation path:
///
/// | key | footprint | notes |
/// |---|---|---|
/// | `barrel` | 1x1 | |
/// | `shed` | 2x2 | |
/// | `barn` | 4x3 | not placeable indoors |
/// | `striped_wallpaper` | 1x1 | wallpaper category |
/// | `rug` | 1x1 | default layer `floor` |
pub fn fixture_catalog() -> ObjectCatalog {
    ObjectCatalog::from_definitions([
        definition("barrel", "decor", 1, 1),
        definition("shed", "buildings", 2, 2),
        ObjectDefinition {
            placeable_indoors: false,
            ..definition("barn", "buildings", 4, 3)
        },
        definition("striped_wallpaper", "wallpaper", 1, 1),
        ObjectDefinition {
            default_layer: Layer::new("floor"),
            ..definition("rug", "decor", 1, 1)
        },
    ])
}

/// Fluent builder for a [`Location`] with preset placements.
///
/// Placements added here bypass validation, so tests can set up states the
/// store would refuse.
pub struct TestLocation {
    bounds: LocationBounds,
    placements: Vec<Placement>,
}

impl TestLocation {
    /// An outdoor `width` x `height` location keyed `test`.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            bounds: LocationBounds {
                key: "test".to_string(),
                name: "Test".to_string(),
                grid_width: width,
                grid_height: height,
                indoors: false,
                blocked_areas: Vec::new(),
            },
            placements: Vec::new(),
        }
    }

    pub fn key(mut self, key: &str) -> Self {
        self.bounds.key = key.to_string();
        self
    }

    pub fn indoors(mut self) -> Self {
        self.bounds.indoors = true;
        self
    }

    pub fn blocked(mut self, area: Rect) -> Self {
        self.bounds.blocked_areas.push(area);
        self
    }

    pub fn with_placement(self, id: u64, object_key: &str, x: i32, y: i32) -> Self {
        self.with_placement_on(id, object_key, x, y, Layer::DEFAULT_NAME)
    }

    pub fn with_placement_on(mut self, id: u64, object_key: &str, x: i32, y: i32, layer: &str) -> Self {
        self.placements.push(Placement {
            id: PlacementId(id),
            object_key: object_key.to_string(),
            grid_x: x,
            grid_y: y,
            layer: Layer::new(layer),
        });
        self
    }

    pub fn build(self) -> Location {
        let mut location = Location::from_bounds(self.bounds);
        location.placements = self.placements;
        location
    }
}
