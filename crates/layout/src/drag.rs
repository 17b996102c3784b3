//! Drag interaction state machine.
//!
//! Two states only: `Idle` and `Armed`. Arming captures the pixel offset
//! from the pointer to the grabbed placement's anchor corner; every later
//! candidate cell is `floor((pointer - offset) / tile)`, so the object keeps
//! its position relative to the grab point instead of snapping its corner to
//! the pointer. Moves only preview; the single commit happens on release.

use bevy::prelude::*;

use crate::catalog::DefinitionLookup;
use crate::collision::{validate_placement, PlacementCandidate, ReasonCode, ValidationResult};
use crate::config::TILE_SIZE;
use crate::grid::{pixel_to_grid, GridPos};
use crate::location::Location;
use crate::notifier::{CursorCue, DragPreview, RenderNotifier};
use crate::placement::{Layer, PlacementId};
use crate::preview::{PreviewGate, PreviewTicket};
use crate::store::PlacementStore;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArmedDrag {
    pub placement_id: PlacementId,
    /// Pointer position minus the anchor cell's pixel origin, fixed for the
    /// whole drag.
    pub pointer_offset: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Armed(ArmedDrag),
}

/// What a pointer event did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// Nothing to do (no placement under the pointer, or not dragging).
    Ignored,
    Started(PlacementId),
    /// A press while armed dropped the previous drag and grabbed nothing.
    Cancelled(PlacementId),
    Committed { placement_id: PlacementId, cell: GridPos },
    /// The drop was refused; the placement stays where it was.
    Rejected { placement_id: PlacementId, reason: ReasonCode },
}

/// A preview validation that has been issued but not yet published.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewRequest {
    pub ticket: PreviewTicket,
    pub placement_id: PlacementId,
    pub cell: GridPos,
}

#[derive(Debug, Clone)]
pub struct DragSession {
    tile_size: f32,
    active_layer: Option<Layer>,
    state: DragState,
    gate: PreviewGate,
    preview: Option<DragPreview>,
}

impl Default for DragSession {
    fn default() -> Self {
        Self::new(TILE_SIZE)
    }
}

impl DragSession {
    pub fn new(tile_size: f32) -> Self {
        Self {
            tile_size,
            active_layer: None,
            state: DragState::Idle,
            gate: PreviewGate::default(),
            preview: None,
        }
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, DragState::Armed(_))
    }

    pub fn preview(&self) -> Option<DragPreview> {
        self.preview
    }

    /// Restrict grabbing to one layer. `None` grabs from any layer.
    pub fn set_active_layer(&mut self, layer: Option<Layer>) {
        self.active_layer = layer;
    }

    pub fn active_layer(&self) -> Option<&Layer> {
        self.active_layer.as_ref()
    }

    /// Cell the held placement would be anchored at for this pointer
    /// position.
    pub fn candidate_cell(&self, pointer: Vec2) -> Option<GridPos> {
        match self.state {
            DragState::Armed(drag) => Some(pixel_to_grid(pointer - drag.pointer_offset, self.tile_size)),
            DragState::Idle => None,
        }
    }

    pub fn pointer_down<C: DefinitionLookup + ?Sized, N: RenderNotifier + ?Sized>(
        &mut self,
        pointer: Vec2,
        location: &Location,
        catalog: &C,
        notifier: &mut N,
    ) -> DragOutcome {
        // A press while armed means the release was lost: drop the old drag
        // without committing, then treat this press as a fresh one.
        let dropped = self.cancel(notifier);
        if let Some(id) = dropped {
            debug!("Drag of {} cancelled by a new press", id);
        }

        let cell = pixel_to_grid(pointer, self.tile_size);
        let Some(placement) =
            PlacementStore::placement_at(location, catalog, cell, self.active_layer.as_ref())
        else {
            return dropped.map_or(DragOutcome::Ignored, DragOutcome::Cancelled);
        };

        let pointer_offset = pointer - placement.anchor().pixel_origin(self.tile_size);
        self.state = DragState::Armed(ArmedDrag {
            placement_id: placement.id,
            pointer_offset,
        });
        info!("Started dragging placement {}", placement.id);
        notifier.cursor_changed(CursorCue::Grabbing);
        DragOutcome::Started(placement.id)
    }

    /// Issue a ticket for the candidate under `pointer`. The caller validates
    /// (possibly asynchronously) and hands the result to
    /// [`DragSession::finish_preview`].
    pub fn begin_preview(&mut self, pointer: Vec2) -> Option<PreviewRequest> {
        let DragState::Armed(drag) = self.state else {
            return None;
        };
        Some(PreviewRequest {
            ticket: self.gate.issue(),
            placement_id: drag.placement_id,
            cell: pixel_to_grid(pointer - drag.pointer_offset, self.tile_size),
        })
    }

    /// Publish a finished preview validation unless a newer one is already
    /// on screen or the drag it belongs to is over.
    pub fn finish_preview<N: RenderNotifier + ?Sized>(
        &mut self,
        request: PreviewRequest,
        result: ValidationResult,
        notifier: &mut N,
    ) -> bool {
        let DragState::Armed(drag) = self.state else {
            return false;
        };
        if drag.placement_id != request.placement_id || !self.gate.accept(request.ticket) {
            return false;
        }
        let preview = DragPreview {
            placement_id: request.placement_id,
            cell: request.cell,
            reason: result.reason(),
        };
        self.preview = Some(preview);
        notifier.preview_changed(Some(preview));
        true
    }

    /// Synchronous pointer move: validate the candidate now and publish it.
    /// Never mutates the location.
    pub fn pointer_move<C: DefinitionLookup + ?Sized, N: RenderNotifier + ?Sized>(
        &mut self,
        pointer: Vec2,
        location: &Location,
        catalog: &C,
        notifier: &mut N,
    ) -> Option<DragPreview> {
        let request = self.begin_preview(pointer)?;
        let result = validate_held(request, location, catalog);
        self.finish_preview(request, result, notifier);
        self.preview
    }

    /// Release: commit the move through the store and return to `Idle`
    /// whatever the store decides.
    pub fn pointer_up<C: DefinitionLookup + ?Sized, N: RenderNotifier + ?Sized>(
        &mut self,
        pointer: Vec2,
        location: &mut Location,
        store: &mut PlacementStore,
        catalog: &C,
        notifier: &mut N,
    ) -> DragOutcome {
        let DragState::Armed(drag) = self.state else {
            return DragOutcome::Ignored;
        };
        let cell = pixel_to_grid(pointer - drag.pointer_offset, self.tile_size);
        debug!("Dropped {} at grid [{}, {}]", drag.placement_id, cell.x, cell.y);

        let result = store.move_placement(location, catalog, notifier, drag.placement_id, cell);
        self.reset(notifier);

        match result {
            Ok(()) => DragOutcome::Committed {
                placement_id: drag.placement_id,
                cell,
            },
            Err(reason) => DragOutcome::Rejected {
                placement_id: drag.placement_id,
                reason,
            },
        }
    }

    /// Abandon an armed drag without touching the store. Returns the id
    /// that was held, if any.
    pub fn cancel<N: RenderNotifier + ?Sized>(&mut self, notifier: &mut N) -> Option<PlacementId> {
        let DragState::Armed(drag) = self.state else {
            return None;
        };
        self.reset(notifier);
        Some(drag.placement_id)
    }

    fn reset<N: RenderNotifier + ?Sized>(&mut self, notifier: &mut N) {
        self.state = DragState::Idle;
        self.gate.invalidate();
        self.preview = None;
        notifier.preview_changed(None);
        notifier.cursor_changed(CursorCue::Default);
    }
}

/// Validate the held placement at the requested cell.
pub fn validate_held<C: DefinitionLookup + ?Sized>(
    request: PreviewRequest,
    location: &Location,
    catalog: &C,
) -> ValidationResult {
    match location.placement(request.placement_id) {
        Some(placement) => validate_placement(
            &PlacementCandidate::for_placement(placement, request.cell),
            location,
            catalog,
            Some(request.placement_id),
        ),
        None => ValidationResult::Invalid(ReasonCode::UnknownPlacement),
    }
}
