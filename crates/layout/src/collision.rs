//! Placement validation: decides whether an object may occupy a footprint.
//!
//! Checks run in a fixed order and the first failure wins:
//!
//! 1. the object key resolves to a definition
//! 2. the category is allowed on this placement path (no wallpaper)
//! 3. no footprint cell lies in a blocked terrain rectangle
//! 4. no footprint cell is occupied by another placement on the same layer
//! 5. indoor locations only accept indoor-placeable objects
//! 6. the footprint lies inside the location's grid
//!
//! Cost is footprint area × (blocked areas + placements), which is fine at
//! editor scale.

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::catalog::{DefinitionLookup, ObjectDefinition};
use crate::config::WALLPAPER_CATEGORY;
use crate::grid::{GridPos, Rect};
use crate::location::Location;
use crate::placement::{Layer, Placement, PlacementId};

/// Why a placement was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
pub enum ReasonCode {
    MissingDefinition,
    CategoryRestricted,
    BlockedTerrain,
    Overlap,
    IndoorRestriction,
    OutOfBounds,
    NoCurrentLocation,
    UnknownPlacement,
}

impl ReasonCode {
    /// Short user-facing explanation.
    pub fn message(self) -> &'static str {
        match self {
            ReasonCode::MissingDefinition => "Object definition not found",
            ReasonCode::CategoryRestricted => "Wallpaper placement coming soon",
            ReasonCode::BlockedTerrain => "Placement blocked by terrain",
            ReasonCode::Overlap => "Placement overlaps existing object",
            ReasonCode::IndoorRestriction => "Object cannot be placed indoors",
            ReasonCode::OutOfBounds => "Placement extends outside the map",
            ReasonCode::NoCurrentLocation => "No current location",
            ReasonCode::UnknownPlacement => "Placement no longer exists",
        }
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub enum ValidationResult {
    Valid,
    Invalid(ReasonCode),
}

impl ValidationResult {
    pub fn is_valid(self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn reason(self) -> Option<ReasonCode> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid(reason) => Some(reason),
        }
    }

    pub fn into_result(self) -> Result<(), ReasonCode> {
        match self {
            ValidationResult::Valid => Ok(()),
            ValidationResult::Invalid(reason) => Err(reason),
        }
    }
}

/// The occupancy being asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementCandidate<'a> {
    pub object_key: &'a str,
    pub grid_x: i32,
    pub grid_y: i32,
    pub layer: &'a Layer,
}

impl<'a> PlacementCandidate<'a> {
    pub fn new(object_key: &'a str, anchor: GridPos, layer: &'a Layer) -> Self {
        Self {
            object_key,
            grid_x: anchor.x,
            grid_y: anchor.y,
            layer,
        }
    }

    /// The candidate's own placement moved to another cell.
    pub fn for_placement(placement: &'a Placement, anchor: GridPos) -> Self {
        Self::new(&placement.object_key, anchor, &placement.layer)
    }

    pub fn anchor(&self) -> GridPos {
        GridPos::new(self.grid_x, self.grid_y)
    }
}

// ---------------------------------------------------------------------------
// Footprints
// ---------------------------------------------------------------------------

/// Footprint of an object anchored at `anchor`; 1×1 when the definition is
/// unknown.
pub fn footprint_at(definition: Option<&ObjectDefinition>, anchor: GridPos) -> Rect {
    let (width, height) = definition.map_or((1, 1), ObjectDefinition::footprint);
    Rect::new(anchor.x, anchor.y, width, height)
}

/// Cells currently occupied by `placement`.
pub fn placement_rect<C: DefinitionLookup + ?Sized>(placement: &Placement, catalog: &C) -> Rect {
    footprint_at(catalog.definition(&placement.object_key), placement.anchor())
}

// ---------------------------------------------------------------------------
// Individual checks
// ---------------------------------------------------------------------------

/// True when any cell of `footprint` lies inside any blocked rectangle.
pub fn is_in_blocked_area(footprint: &Rect, blocked_areas: &[Rect]) -> bool {
    footprint
        .cells()
        .any(|cell| blocked_areas.iter().any(|blocked| blocked.contains(cell)))
}

/// First placement on `layer` (other than `exclude`) sharing a cell with
/// `footprint`.
pub fn first_overlap<C: DefinitionLookup + ?Sized>(
    footprint: &Rect,
    placements: &[Placement],
    layer: &Layer,
    exclude: Option<PlacementId>,
    catalog: &C,
) -> Option<PlacementId> {
    placements
        .iter()
        .filter(|existing| existing.layer == *layer && Some(existing.id) != exclude)
        .find(|existing| footprint.shares_cell_with(&placement_rect(existing, catalog)))
        .map(|existing| existing.id)
}

/// Location-level rules that do not depend on geometry.
pub fn check_placement_rules(definition: &ObjectDefinition, location: &Location) -> ValidationResult {
    if location.indoors && !definition.placeable_indoors {
        return ValidationResult::Invalid(ReasonCode::IndoorRestriction);
    }
    ValidationResult::Valid
}

fn within_grid(footprint: &Rect, location: &Location) -> bool {
    let grid = location.grid_rect();
    footprint.cells().all(|cell| grid.contains(cell))
}

// ---------------------------------------------------------------------------
// Composite
// ---------------------------------------------------------------------------

/// Decide whether `candidate` may occupy its footprint in `location`.
///
/// `exclude` is the id of a placement being moved, so it does not collide
/// with itself.
pub fn validate_placement<C: DefinitionLookup + ?Sized>(
    candidate: &PlacementCandidate<'_>,
    location: &Location,
    catalog: &C,
    exclude: Option<PlacementId>,
) -> ValidationResult {
    let Some(definition) = catalog.definition(candidate.object_key) else {
        return ValidationResult::Invalid(ReasonCode::MissingDefinition);
    };

    if definition.category == WALLPAPER_CATEGORY {
        return ValidationResult::Invalid(ReasonCode::CategoryRestricted);
    }

    let footprint = footprint_at(Some(definition), candidate.anchor());

    if is_in_blocked_area(&footprint, &location.blocked_areas) {
        return ValidationResult::Invalid(ReasonCode::BlockedTerrain);
    }

    if first_overlap(&footprint, location.placements(), candidate.layer, exclude, catalog).is_some() {
        return ValidationResult::Invalid(ReasonCode::Overlap);
    }

    let rules = check_placement_rules(definition, location);
    if !rules.is_valid() {
        return rules;
    }

    if !within_grid(&footprint, location) {
        return ValidationResult::Invalid(ReasonCode::OutOfBounds);
    }

    ValidationResult::Valid
}
