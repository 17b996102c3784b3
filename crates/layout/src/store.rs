//! The only writer of a location's placement list.
//!
//! Every insert and move goes through the validator first; a rejection
//! leaves the location untouched and hands the reason back to the caller.
//! Successful mutations fire a committed signal on the notifier.

use bevy::prelude::*;

use crate::catalog::DefinitionLookup;
use crate::collision::{placement_rect, validate_placement, PlacementCandidate, ReasonCode};
use crate::grid::GridPos;
use crate::location::Location;
use crate::notifier::{PlacementChange, RenderNotifier};
use crate::placement::{Layer, Placement, PlacementId};
use crate::saved::LayoutRecord;

/// Outcome of restoring persisted records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreCount {
    pub restored: usize,
    pub skipped: usize,
}

impl std::ops::AddAssign for RestoreCount {
    fn add_assign(&mut self, other: Self) {
        self.restored += other.restored;
        self.skipped += other.skipped;
    }
}

#[derive(Debug, Default)]
pub struct PlacementStore {
    /// Last id handed out. Never rewinds, so ids stay unique for the whole
    /// editing session.
    last_id: u64,
}

impl PlacementStore {
    fn next_id(&mut self) -> PlacementId {
        self.last_id += 1;
        PlacementId(self.last_id)
    }

    /// Validate and append a new placement.
    pub fn place<C: DefinitionLookup + ?Sized, N: RenderNotifier + ?Sized>(
        &mut self,
        location: &mut Location,
        catalog: &C,
        notifier: &mut N,
        object_key: &str,
        anchor: GridPos,
        layer: &Layer,
    ) -> Result<PlacementId, ReasonCode> {
        let candidate = PlacementCandidate::new(object_key, anchor, layer);
        if let Err(reason) = validate_placement(&candidate, location, catalog, None).into_result() {
            debug!("Placement invalid: {} ({} at {}, {})", reason, object_key, anchor.x, anchor.y);
            return Err(reason);
        }

        let id = self.next_id();
        location.placements.push(Placement {
            id,
            object_key: object_key.to_string(),
            grid_x: anchor.x,
            grid_y: anchor.y,
            layer: layer.clone(),
        });
        info!("Placed object: {} {} at {}, {}", object_key, id, anchor.x, anchor.y);
        notifier.placements_changed(PlacementChange::Placed(id));
        Ok(id)
    }

    /// Remove the placement anchored exactly at `anchor` on `layer`.
    /// Returns whether anything was removed.
    pub fn remove<N: RenderNotifier + ?Sized>(
        &mut self,
        location: &mut Location,
        notifier: &mut N,
        anchor: GridPos,
        layer: &Layer,
    ) -> bool {
        let Some(index) = location
            .placements
            .iter()
            .position(|p| p.anchor() == anchor && p.layer == *layer)
        else {
            return false;
        };

        let removed = location.placements.remove(index);
        info!("Removed object {} at {}, {}", removed.id, anchor.x, anchor.y);
        notifier.placements_changed(PlacementChange::Removed(removed.id));
        true
    }

    /// Move an existing placement to a new anchor, keeping its object and
    /// layer. The placement never collides with itself.
    pub fn move_placement<C: DefinitionLookup + ?Sized, N: RenderNotifier + ?Sized>(
        &mut self,
        location: &mut Location,
        catalog: &C,
        notifier: &mut N,
        id: PlacementId,
        anchor: GridPos,
    ) -> Result<(), ReasonCode> {
        let Some(placement) = location.placement(id) else {
            return Err(ReasonCode::UnknownPlacement);
        };

        let candidate = PlacementCandidate::for_placement(placement, anchor);
        validate_placement(&candidate, location, catalog, Some(id))
            .into_result()
            .inspect_err(|reason| debug!("Move of {} to {}, {} rejected: {}", id, anchor.x, anchor.y, reason))?;

        if let Some(placement) = location.placements.iter_mut().find(|p| p.id == id) {
            placement.grid_x = anchor.x;
            placement.grid_y = anchor.y;
        }
        info!("Moved placement {} to {}, {}", id, anchor.x, anchor.y);
        notifier.placements_changed(PlacementChange::Moved(id));
        Ok(())
    }

    /// Drop every placement in the location. Returns how many were removed.
    pub fn clear<N: RenderNotifier + ?Sized>(&mut self, location: &mut Location, notifier: &mut N) -> usize {
        let removed = location.placements.len();
        location.placements.clear();
        if removed > 0 {
            debug!("Cleared {} placements from {}", removed, location.key);
            notifier.placements_changed(PlacementChange::Reloaded);
        }
        removed
    }

    /// Replace the location's placements with persisted records, issuing
    /// fresh ids. Each record is validated against the records restored
    /// before it; rejected records are skipped.
    pub fn restore<C: DefinitionLookup + ?Sized, N: RenderNotifier + ?Sized>(
        &mut self,
        location: &mut Location,
        catalog: &C,
        notifier: &mut N,
        records: impl IntoIterator<Item = LayoutRecord>,
    ) -> RestoreCount {
        location.placements.clear();
        let mut count = RestoreCount::default();
        for record in records {
            let anchor = GridPos::new(record.grid_x, record.grid_y);
            let candidate = PlacementCandidate::new(&record.object_key, anchor, &record.layer);
            if let Err(reason) = validate_placement(&candidate, location, catalog, None).into_result() {
                warn!(
                    "Saved placement skipped in {}: {} at {}, {} ({})",
                    location.key, record.object_key, anchor.x, anchor.y, reason
                );
                count.skipped += 1;
                continue;
            }
            let id = self.next_id();
            location.placements.push(Placement {
                id,
                object_key: record.object_key,
                grid_x: record.grid_x,
                grid_y: record.grid_y,
                layer: record.layer,
            });
            count.restored += 1;
        }
        debug!(
            "Restored {} placements into {} ({} skipped)",
            count.restored, location.key, count.skipped
        );
        notifier.placements_changed(PlacementChange::Reloaded);
        count
    }

    /// Topmost placement whose footprint covers `cell`. With a layer, only
    /// that layer is searched.
    pub fn placement_at<'a, C: DefinitionLookup + ?Sized>(
        location: &'a Location,
        catalog: &C,
        cell: GridPos,
        layer: Option<&Layer>,
    ) -> Option<&'a Placement> {
        location
            .placements()
            .iter()
            .rev()
            .filter(|p| layer.map_or(true, |l| p.layer == *l))
            .find(|p| placement_rect(p, catalog).contains(cell))
    }
}
