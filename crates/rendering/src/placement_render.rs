//! Gizmo drawing of the open location: map outline and grid, blocked
//! terrain, committed placements, the drag ghost and the hover footprint.
//!
//! Committed shapes are rebuilt only when the core reports a change; the
//! ghost follows `PreviewChanged`. Everything is redrawn every frame since
//! gizmos are immediate-mode.

use bevy::prelude::*;

use layout::collision::{footprint_at, placement_rect};
use layout::events::{PlacementsChanged, PreviewChanged};
use layout::loading::CatalogHandle;
use layout::{
    validate_placement, DefinitionLookup, DragPreview, EditorSession, Layer, Location, PlacementCandidate,
    PlacementId, Rect,
};

use crate::camera::location_to_world;
use crate::input::{placement_layer, ActiveLayer, ActiveTool, CursorGridPos, SelectedObject};

const GRID_COLOR: Color = Color::srgba(1.0, 1.0, 1.0, 0.08);
const OUTLINE_COLOR: Color = Color::srgba(1.0, 1.0, 1.0, 0.6);
const BLOCKED_COLOR: Color = Color::srgba(0.45, 0.3, 0.25, 0.9);
const VALID_COLOR: Color = Color::srgba(0.2, 0.9, 0.3, 0.9);
const INVALID_COLOR: Color = Color::srgba(0.95, 0.2, 0.2, 0.9);
const HOVER_COLOR: Color = Color::srgba(1.0, 1.0, 1.0, 0.35);

/// A rectangle in world space, ready for gizmos.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawnRect {
    pub center: Vec2,
    pub size: Vec2,
    pub color: Color,
}

impl DrawnRect {
    pub fn from_cells(rect: &Rect, tile_size: f32, color: Color) -> Self {
        let (center, size) = rect.pixel_center_and_size(tile_size);
        Self {
            center: location_to_world(center),
            size,
            color,
        }
    }

    fn outline(&self, gizmos: &mut Gizmos) {
        gizmos.rect_2d(self.center, self.size, self.color);
    }

    /// Outline plus diagonals, for a filled look.
    fn crossed(&self, gizmos: &mut Gizmos) {
        let half = self.size * 0.5;
        let (tl, br) = (self.center + Vec2::new(-half.x, half.y), self.center + Vec2::new(half.x, -half.y));
        let (tr, bl) = (self.center + half, self.center - half);
        self.outline(gizmos);
        gizmos.line_2d(tl, br, self.color);
        gizmos.line_2d(tr, bl, self.color);
    }
}

/// Fill color for a layer. The default layer is warm, other layers get a
/// stable hue from their name.
pub fn layer_color(layer: &Layer) -> Color {
    match layer.as_str() {
        Layer::DEFAULT_NAME => Color::srgb(0.85, 0.7, 0.45),
        "floor" => Color::srgb(0.45, 0.6, 0.85),
        other => {
            let hue = other.bytes().fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(u32::from(b))) % 360;
            Color::hsl(hue as f32, 0.55, 0.6)
        }
    }
}

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// Committed geometry of the current location in world space.
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct PlacementShapes {
    pub map: Option<DrawnRect>,
    pub cells: UVec2,
    pub blocked: Vec<DrawnRect>,
    pub placements: Vec<(PlacementId, DrawnRect)>,
}

impl PlacementShapes {
    pub fn build<C: DefinitionLookup + ?Sized>(location: &Location, catalog: &C, tile_size: f32) -> Self {
        Self {
            map: Some(DrawnRect::from_cells(&location.grid_rect(), tile_size, OUTLINE_COLOR)),
            cells: UVec2::new(location.grid_width, location.grid_height),
            blocked: location
                .blocked_areas
                .iter()
                .map(|rect| DrawnRect::from_cells(rect, tile_size, BLOCKED_COLOR))
                .collect(),
            placements: location
                .placements()
                .iter()
                .map(|p| {
                    let rect = placement_rect(p, catalog);
                    (p.id, DrawnRect::from_cells(&rect, tile_size, layer_color(&p.layer)))
                })
                .collect(),
        }
    }
}

/// The drag ghost as last published by the core.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct GhostState(pub Option<DragPreview>);

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

pub fn rebuild_placement_shapes(
    mut changes: EventReader<PlacementsChanged>,
    session: Res<EditorSession>,
    catalog: Res<CatalogHandle>,
    mut shapes: ResMut<PlacementShapes>,
) {
    if changes.is_empty() {
        return;
    }
    changes.clear();
    *shapes = match session.current() {
        Some(location) => PlacementShapes::build(location, &*catalog.0, session.tile_size()),
        None => PlacementShapes::default(),
    };
}

pub fn track_drag_ghost(mut previews: EventReader<PreviewChanged>, mut ghost: ResMut<GhostState>) {
    if let Some(PreviewChanged(latest)) = previews.read().last() {
        ghost.0 = *latest;
    }
}

pub fn draw_location(shapes: Res<PlacementShapes>, mut gizmos: Gizmos) {
    let Some(map) = shapes.map else {
        return;
    };
    let spacing = map.size / shapes.cells.max(UVec2::ONE).as_vec2();
    gizmos.grid_2d(map.center, shapes.cells, spacing, GRID_COLOR);
    map.outline(&mut gizmos);

    for blocked in &shapes.blocked {
        blocked.crossed(&mut gizmos);
    }
    for (_, rect) in &shapes.placements {
        rect.outline(&mut gizmos);
    }
}

/// Ghost footprint of the held placement at its candidate cell, green when
/// the drop would be accepted and red otherwise.
pub fn draw_drag_ghost(
    ghost: Res<GhostState>,
    session: Res<EditorSession>,
    catalog: Res<CatalogHandle>,
    mut gizmos: Gizmos,
) {
    let Some(preview) = ghost.0 else {
        return;
    };
    let Some(placement) = session.current().and_then(|l| l.placement(preview.placement_id)) else {
        return;
    };
    let footprint = footprint_at(catalog.0.definition(&placement.object_key), preview.cell);
    let color = if preview.is_valid() { VALID_COLOR } else { INVALID_COLOR };
    DrawnRect::from_cells(&footprint, session.tile_size(), color).crossed(&mut gizmos);
}

/// Hovered cell, or with the Place tool the selected object's footprint
/// colored by whether a click would place it.
#[allow(clippy::too_many_arguments)]
pub fn draw_hover(
    cursor: Res<CursorGridPos>,
    tool: Res<ActiveTool>,
    selected: Res<SelectedObject>,
    active_layer: Res<ActiveLayer>,
    session: Res<EditorSession>,
    catalog: Res<CatalogHandle>,
    ghost: Res<GhostState>,
    mut gizmos: Gizmos,
) {
    if !cursor.on_screen || ghost.0.is_some() {
        return;
    }
    let Some(location) = session.current() else {
        return;
    };
    let tile_size = session.tile_size();

    let placing = match (*tool, selected.0.as_deref()) {
        (ActiveTool::Place, Some(key)) => Some(key),
        _ => None,
    };
    let Some(object_key) = placing else {
        if cursor.in_bounds {
            let cell = Rect::new(cursor.cell.x, cursor.cell.y, 1, 1);
            DrawnRect::from_cells(&cell, tile_size, HOVER_COLOR).outline(&mut gizmos);
        }
        return;
    };

    let definition = catalog.0.definition(object_key);
    let layer = placement_layer(active_layer.0.as_ref(), definition);
    let candidate = PlacementCandidate::new(object_key, cursor.cell, &layer);
    let valid = validate_placement(&candidate, location, &*catalog.0, None).is_valid();
    let color = if valid { VALID_COLOR } else { INVALID_COLOR };
    DrawnRect::from_cells(&footprint_at(definition, cursor.cell), tile_size, color).outline(&mut gizmos);
}
