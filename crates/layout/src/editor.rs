//! The editing session: the current location, the placement store, the drag
//! session and the location-switch guard, kept together as one value.
//!
//! Locations switched away from are parked with their edits, so returning to
//! one shows what was placed there rather than the pristine file.

use std::collections::BTreeMap;
use std::sync::Arc;

use bevy::prelude::*;

use crate::catalog::DefinitionLookup;
use crate::collision::{ReasonCode, ValidationResult};
use crate::config::TILE_SIZE;
use crate::drag::{DragOutcome, DragSession, PreviewRequest};
use crate::grid::GridPos;
use crate::location::{Location, LocationBounds, LocationRegistry};
use crate::notifier::{DragPreview, PlacementChange, RenderNotifier, SignalBuffer};
use crate::placement::{Layer, PlacementId};
use crate::saved::SavedLayout;
use crate::store::{PlacementStore, RestoreCount};

#[derive(Resource, Debug)]
pub struct EditorSession {
    current: Option<Location>,
    parked: BTreeMap<String, Location>,
    store: PlacementStore,
    drag: DragSession,
    /// Target key of the switch being loaded, if any.
    switching_to: Option<String>,
    /// Shared read-only copy of `current` for background validation. Dropped
    /// on every mutation.
    snapshot: Option<Arc<Location>>,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(TILE_SIZE)
    }
}

impl EditorSession {
    pub fn new(tile_size: f32) -> Self {
        Self {
            current: None,
            parked: BTreeMap::new(),
            store: PlacementStore::default(),
            drag: DragSession::new(tile_size),
            switching_to: None,
            snapshot: None,
        }
    }

    pub fn current(&self) -> Option<&Location> {
        self.current.as_ref()
    }

    pub fn current_key(&self) -> Option<&str> {
        self.current.as_ref().map(|l| l.key.as_str())
    }

    pub fn drag(&self) -> &DragSession {
        &self.drag
    }

    pub fn tile_size(&self) -> f32 {
        self.drag.tile_size()
    }

    pub fn set_active_layer(&mut self, layer: Option<Layer>) {
        self.drag.set_active_layer(layer);
    }

    /// `Arc` view of the current location, rebuilt lazily after mutations.
    pub fn snapshot(&mut self) -> Option<Arc<Location>> {
        if self.snapshot.is_none() {
            self.snapshot = self.current.clone().map(Arc::new);
        }
        self.snapshot.clone()
    }

    // -----------------------------------------------------------------------
    // Placement operations
    // -----------------------------------------------------------------------

    pub fn place<C: DefinitionLookup + ?Sized, N: RenderNotifier + ?Sized>(
        &mut self,
        catalog: &C,
        notifier: &mut N,
        object_key: &str,
        anchor: GridPos,
        layer: &Layer,
    ) -> Result<PlacementId, ReasonCode> {
        let location = self.current.as_mut().ok_or(ReasonCode::NoCurrentLocation)?;
        self.snapshot = None;
        self.store.place(location, catalog, notifier, object_key, anchor, layer)
    }

    pub fn remove<N: RenderNotifier + ?Sized>(
        &mut self,
        notifier: &mut N,
        anchor: GridPos,
        layer: &Layer,
    ) -> Result<bool, ReasonCode> {
        let location = self.current.as_mut().ok_or(ReasonCode::NoCurrentLocation)?;
        self.snapshot = None;
        Ok(self.store.remove(location, notifier, anchor, layer))
    }

    pub fn move_placement<C: DefinitionLookup + ?Sized, N: RenderNotifier + ?Sized>(
        &mut self,
        catalog: &C,
        notifier: &mut N,
        id: PlacementId,
        anchor: GridPos,
    ) -> Result<(), ReasonCode> {
        let location = self.current.as_mut().ok_or(ReasonCode::NoCurrentLocation)?;
        self.snapshot = None;
        self.store.move_placement(location, catalog, notifier, id, anchor)
    }

    // -----------------------------------------------------------------------
    // Pointer input
    // -----------------------------------------------------------------------

    pub fn pointer_down<C: DefinitionLookup + ?Sized, N: RenderNotifier + ?Sized>(
        &mut self,
        pointer: Vec2,
        catalog: &C,
        notifier: &mut N,
    ) -> DragOutcome {
        let Some(location) = self.current.as_ref() else {
            return DragOutcome::Ignored;
        };
        self.drag.pointer_down(pointer, location, catalog, notifier)
    }

    pub fn pointer_move<C: DefinitionLookup + ?Sized, N: RenderNotifier + ?Sized>(
        &mut self,
        pointer: Vec2,
        catalog: &C,
        notifier: &mut N,
    ) -> Option<DragPreview> {
        let location = self.current.as_ref()?;
        self.drag.pointer_move(pointer, location, catalog, notifier)
    }

    pub fn pointer_up<C: DefinitionLookup + ?Sized, N: RenderNotifier + ?Sized>(
        &mut self,
        pointer: Vec2,
        catalog: &C,
        notifier: &mut N,
    ) -> DragOutcome {
        if !self.drag.is_armed() {
            return DragOutcome::Ignored;
        }
        let Some(location) = self.current.as_mut() else {
            self.drag.cancel(notifier);
            return DragOutcome::Ignored;
        };
        self.snapshot = None;
        self.drag.pointer_up(pointer, location, &mut self.store, catalog, notifier)
    }

    /// Start a background preview; see [`DragSession::begin_preview`].
    pub fn begin_preview(&mut self, pointer: Vec2) -> Option<PreviewRequest> {
        self.current.as_ref()?;
        self.drag.begin_preview(pointer)
    }

    pub fn finish_preview<N: RenderNotifier + ?Sized>(
        &mut self,
        request: PreviewRequest,
        result: ValidationResult,
        notifier: &mut N,
    ) -> bool {
        self.drag.finish_preview(request, result, notifier)
    }

    /// Drop any armed drag without committing it.
    pub fn deselect<N: RenderNotifier + ?Sized>(&mut self, notifier: &mut N) -> Option<PlacementId> {
        let dropped = self.drag.cancel(notifier);
        if let Some(id) = dropped {
            debug!("Deselected {}", id);
        }
        dropped
    }

    // -----------------------------------------------------------------------
    // Location switching
    // -----------------------------------------------------------------------

    pub fn switch_in_flight(&self) -> Option<&str> {
        self.switching_to.as_deref()
    }

    /// Begin switching to `key`. Returns false, changing nothing, while
    /// another switch is still loading.
    pub fn request_location_switch<N: RenderNotifier + ?Sized>(&mut self, key: &str, notifier: &mut N) -> bool {
        if let Some(pending) = &self.switching_to {
            debug!("Switch to {} ignored: {} is still loading", key, pending);
            return false;
        }
        self.deselect(notifier);
        self.switching_to = Some(key.to_string());
        info!("Switching location to {}", key);
        true
    }

    /// Finish the pending switch with freshly loaded bounds. A location
    /// visited earlier this session comes back with its edits; its stored
    /// bounds are kept.
    pub fn complete_location_switch<N: RenderNotifier + ?Sized>(
        &mut self,
        bounds: LocationBounds,
        notifier: &mut N,
    ) -> bool {
        match self.switching_to.as_deref() {
            Some(pending) if pending == bounds.key => {}
            pending => {
                warn!("Loaded location {} does not match pending switch {:?}", bounds.key, pending);
                return false;
            }
        }
        self.switching_to = None;
        // A drag may have been armed on the old location while loading.
        self.drag.cancel(notifier);

        if let Some(previous) = self.current.take() {
            self.parked.insert(previous.key.clone(), previous);
        }
        let next = self
            .parked
            .remove(&bounds.key)
            .unwrap_or_else(|| Location::from_bounds(bounds));
        info!("Location loaded: {} ({} placements)", next.key, next.placements().len());
        self.current = Some(next);
        self.snapshot = None;
        notifier.placements_changed(PlacementChange::Reloaded);
        true
    }

    /// Give up on the pending switch, staying on the current location.
    pub fn abort_location_switch(&mut self) -> Option<String> {
        self.switching_to.take()
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// The persisted shape of every location touched this session, ordered
    /// by key.
    pub fn saved_layouts(&self) -> Vec<SavedLayout> {
        let mut layouts: Vec<_> = self
            .current
            .iter()
            .chain(self.parked.values())
            .map(SavedLayout::capture)
            .collect();
        layouts.sort_by(|a, b| a.location_key.cmp(&b.location_key));
        layouts
    }

    /// Load a whole save: every location it names gets exactly the saved
    /// placements, and touched locations it does not name are cleared.
    pub fn replace_layouts<C: DefinitionLookup + ?Sized, N: RenderNotifier + ?Sized>(
        &mut self,
        layouts: impl IntoIterator<Item = SavedLayout>,
        registry: &LocationRegistry,
        catalog: &C,
        notifier: &mut N,
    ) -> RestoreCount {
        let layouts: Vec<SavedLayout> = layouts.into_iter().collect();
        let named = |key: &str| layouts.iter().any(|l| l.location_key == key);

        if let Some(location) = self.current.as_mut().filter(|l| !named(&l.key)) {
            self.store.clear(location, notifier);
        }
        for location in self.parked.values_mut().filter(|l| !named(&l.key)) {
            // Parked locations are not on screen.
            self.store.clear(location, &mut SignalBuffer::default());
        }

        self.merge_layouts(layouts, registry, catalog, notifier)
    }

    /// Restore the given layouts, leaving other locations as they are.
    /// Layouts for locations not visited yet are parked using bounds from
    /// `registry`; unknown keys are skipped.
    pub fn merge_layouts<C: DefinitionLookup + ?Sized, N: RenderNotifier + ?Sized>(
        &mut self,
        layouts: impl IntoIterator<Item = SavedLayout>,
        registry: &LocationRegistry,
        catalog: &C,
        notifier: &mut N,
    ) -> RestoreCount {
        self.deselect(notifier);
        self.snapshot = None;

        let mut count = RestoreCount::default();
        for layout in layouts {
            if self.current_key() == Some(layout.location_key.as_str()) {
                if let Some(location) = self.current.as_mut() {
                    count += self.store.restore(location, catalog, notifier, layout.placements);
                }
                continue;
            }

            if !self.parked.contains_key(&layout.location_key) {
                match registry.get(&layout.location_key) {
                    Ok(bounds) => {
                        self.parked
                            .insert(layout.location_key.clone(), Location::from_bounds(bounds.clone()));
                    }
                    Err(e) => {
                        warn!("Saved layout skipped: {}", e);
                        continue;
                    }
                }
            }
            if let Some(location) = self.parked.get_mut(&layout.location_key) {
                // Parked locations are not on screen.
                count += self.store.restore(location, catalog, &mut SignalBuffer::default(), layout.placements);
            }
        }
        info!("Restored {} placements, skipped {}", count.restored, count.skipped);
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifier::{CursorCue, RenderSignal};
    use crate::saved::LayoutRecord;
    use crate::test_harness::{fixture_catalog, TestLocation};

    fn farm() -> LocationBounds {
        TestLocation::new(20, 20).key("farm").build().bounds()
    }

    fn cellar() -> LocationBounds {
        TestLocation::new(8, 8).key("cellar").indoors().build().bounds()
    }

    fn session_on(bounds: LocationBounds) -> (EditorSession, SignalBuffer) {
        let mut session = EditorSession::default();
        let mut signals = SignalBuffer::default();
        assert!(session.request_location_switch(&bounds.key, &mut signals));
        assert!(session.complete_location_switch(bounds, &mut signals));
        signals.drain();
        (session, signals)
    }

    #[test]
    fn test_operations_without_location() {
        let mut session = EditorSession::default();
        let mut signals = SignalBuffer::default();
        let layer = Layer::default();
        let catalog = fixture_catalog();

        assert_eq!(
            session.place(&catalog, &mut signals, "barrel", GridPos::new(1, 1), &layer),
            Err(ReasonCode::NoCurrentLocation)
        );
        assert_eq!(
            session.remove(&mut signals, GridPos::new(1, 1), &layer),
            Err(ReasonCode::NoCurrentLocation)
        );
        assert_eq!(
            session.move_placement(&catalog, &mut signals, PlacementId(1), GridPos::new(1, 1)),
            Err(ReasonCode::NoCurrentLocation)
        );
        assert_eq!(session.pointer_down(Vec2::ZERO, &catalog, &mut signals), DragOutcome::Ignored);
        assert!(signals.is_empty());
    }

    #[test]
    fn test_switch_ignored_while_in_flight() {
        let mut session = EditorSession::default();
        let mut signals = SignalBuffer::default();

        assert!(session.request_location_switch("farm", &mut signals));
        assert!(!session.request_location_switch("cellar", &mut signals));
        assert_eq!(session.switch_in_flight(), Some("farm"));

        // Bounds for the ignored request do not complete the pending one.
        assert!(!session.complete_location_switch(cellar(), &mut signals));
        assert!(session.complete_location_switch(farm(), &mut signals));
        assert_eq!(session.current_key(), Some("farm"));
        assert_eq!(session.switch_in_flight(), None);
    }

    #[test]
    fn test_abort_keeps_current_location() {
        let (mut session, mut signals) = session_on(farm());
        assert!(session.request_location_switch("cellar", &mut signals));
        assert_eq!(session.abort_location_switch(), Some("cellar".to_string()));
        assert_eq!(session.current_key(), Some("farm"));
        assert!(session.request_location_switch("cellar", &mut signals));
    }

    #[test]
    fn test_switch_cancels_armed_drag() {
        let (mut session, mut signals) = session_on(farm());
        let catalog = fixture_catalog();
        let id = session
            .place(&catalog, &mut signals, "barrel", GridPos::new(3, 3), &Layer::default())
            .unwrap();

        assert_eq!(
            session.pointer_down(Vec2::new(100.0, 100.0), &catalog, &mut signals),
            DragOutcome::Started(id)
        );
        assert!(session.request_location_switch("cellar", &mut signals));
        assert!(!session.drag().is_armed());
        assert_eq!(signals.last_cursor(), Some(CursorCue::Default));
        assert_eq!(signals.last_preview(), Some(None));

        // The lost release lands after the switch started.
        assert_eq!(
            session.pointer_up(Vec2::new(200.0, 200.0), &catalog, &mut signals),
            DragOutcome::Ignored
        );
        assert_eq!(session.current().unwrap().placement(id).unwrap().anchor(), GridPos::new(3, 3));
    }

    #[test]
    fn test_returning_to_a_location_keeps_edits() {
        let (mut session, mut signals) = session_on(farm());
        let catalog = fixture_catalog();
        session
            .place(&catalog, &mut signals, "barrel", GridPos::new(3, 3), &Layer::default())
            .unwrap();

        session.request_location_switch("cellar", &mut signals);
        session.complete_location_switch(cellar(), &mut signals);
        assert!(session.current().unwrap().placements().is_empty());

        session.request_location_switch("farm", &mut signals);
        session.complete_location_switch(farm(), &mut signals);
        assert_eq!(session.current().unwrap().placements().len(), 1);
        assert!(signals
            .signals()
            .contains(&RenderSignal::Changed(PlacementChange::Reloaded)));
    }

    #[test]
    fn test_ids_unique_across_locations() {
        let (mut session, mut signals) = session_on(farm());
        let catalog = fixture_catalog();
        let layer = Layer::default();
        let first = session
            .place(&catalog, &mut signals, "barrel", GridPos::new(1, 1), &layer)
            .unwrap();
        session.request_location_switch("cellar", &mut signals);
        session.complete_location_switch(cellar(), &mut signals);
        let second = session
            .place(&catalog, &mut signals, "barrel", GridPos::new(1, 1), &layer)
            .unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_indoor_rule_follows_current_location() {
        let (mut session, mut signals) = session_on(cellar());
        let result = session.place(&fixture_catalog(), &mut signals, "barn", GridPos::new(0, 0), &Layer::default());
        assert_eq!(result, Err(ReasonCode::IndoorRestriction));
    }

    #[test]
    fn test_deselect_cancels_drag() {
        let (mut session, mut signals) = session_on(farm());
        let catalog = fixture_catalog();
        let id = session
            .place(&catalog, &mut signals, "shed", GridPos::new(2, 2), &Layer::default())
            .unwrap();
        session.pointer_down(Vec2::new(70.0, 70.0), &catalog, &mut signals);
        assert_eq!(session.deselect(&mut signals), Some(id));
        assert_eq!(session.deselect(&mut signals), None);
    }

    #[test]
    fn test_snapshot_tracks_mutations() {
        let (mut session, mut signals) = session_on(farm());
        let before = session.snapshot().unwrap();
        assert!(Arc::ptr_eq(&before, &session.snapshot().unwrap()));

        session
            .place(&fixture_catalog(), &mut signals, "barrel", GridPos::new(0, 0), &Layer::default())
            .unwrap();
        let after = session.snapshot().unwrap();
        assert!(before.placements().is_empty());
        assert_eq!(after.placements().len(), 1);
    }

    #[test]
    fn test_saved_layouts_round_trip_through_restore() {
        let (mut session, mut signals) = session_on(farm());
        let catalog = fixture_catalog();
        let layer = Layer::default();
        session.place(&catalog, &mut signals, "barn", GridPos::new(2, 2), &layer).unwrap();
        session.place(&catalog, &mut signals, "barrel", GridPos::new(9, 9), &layer).unwrap();
        session.request_location_switch("cellar", &mut signals);
        session.complete_location_switch(cellar(), &mut signals);
        session.place(&catalog, &mut signals, "barrel", GridPos::new(1, 1), &layer).unwrap();

        let saved = session.saved_layouts();
        let keys: Vec<_> = saved.iter().map(|l| l.location_key.as_str()).collect();
        assert_eq!(keys, vec!["cellar", "farm"]);

        let registry = LocationRegistry::from_bounds([farm(), cellar()]);
        let (mut fresh, mut fresh_signals) = session_on(cellar());
        let count = fresh.replace_layouts(saved.clone(), &registry, &catalog, &mut fresh_signals);
        assert_eq!(count, RestoreCount { restored: 3, skipped: 0 });

        let reloaded = fresh.saved_layouts();
        for (a, b) in saved.iter().zip(&reloaded) {
            assert_eq!(a.location_key, b.location_key);
            assert_eq!(a.logical_set(), b.logical_set());
        }
    }

    #[test]
    fn test_restore_skips_unknown_locations() {
        let (mut session, mut signals) = session_on(farm());
        let layout = SavedLayout {
            location_key: "atlantis".into(),
            placements: vec![LayoutRecord {
                id: 1,
                object_key: "barrel".into(),
                grid_x: 0,
                grid_y: 0,
                layer: Layer::default(),
            }],
        };
        let registry = LocationRegistry::from_bounds([farm()]);
        let count = session.merge_layouts([layout], &registry, &fixture_catalog(), &mut signals);
        assert_eq!(count, RestoreCount::default());
        assert_eq!(session.saved_layouts().len(), 1);
    }

    #[test]
    fn test_replace_clears_locations_missing_from_the_save() {
        let (mut session, mut signals) = session_on(farm());
        let catalog = fixture_catalog();
        let layer = Layer::default();
        session.place(&catalog, &mut signals, "barrel", GridPos::new(3, 3), &layer).unwrap();
        let farm_only = session.saved_layouts();

        session.request_location_switch("cellar", &mut signals);
        session.complete_location_switch(cellar(), &mut signals);
        session.place(&catalog, &mut signals, "barrel", GridPos::new(1, 1), &layer).unwrap();
        signals.drain();

        let registry = LocationRegistry::from_bounds([farm(), cellar()]);
        let count = session.replace_layouts(farm_only, &registry, &catalog, &mut signals);

        assert_eq!(count, RestoreCount { restored: 1, skipped: 0 });
        assert!(session.current().unwrap().placements().is_empty());
        assert!(signals.signals().contains(&RenderSignal::Changed(PlacementChange::Reloaded)));
        let saved = session.saved_layouts();
        let farm = saved.iter().find(|l| l.location_key == "farm").unwrap();
        assert_eq!(farm.placements.len(), 1);
    }

    #[test]
    fn test_merge_keeps_locations_missing_from_the_import() {
        let (mut session, mut signals) = session_on(farm());
        let catalog = fixture_catalog();
        let layer = Layer::default();
        session.place(&catalog, &mut signals, "barrel", GridPos::new(3, 3), &layer).unwrap();
        let farm_only = session.saved_layouts();

        session.request_location_switch("cellar", &mut signals);
        session.complete_location_switch(cellar(), &mut signals);
        session.place(&catalog, &mut signals, "barrel", GridPos::new(1, 1), &layer).unwrap();

        let registry = LocationRegistry::from_bounds([farm(), cellar()]);
        session.merge_layouts(farm_only, &registry, &catalog, &mut signals);

        assert_eq!(session.current().unwrap().placements().len(), 1);
    }

    #[test]
    fn test_restore_reports_skipped_records() {
        let (mut session, mut signals) = session_on(farm());
        let record = |key: &str, x: i32, y: i32| LayoutRecord {
            id: 1,
            object_key: key.into(),
            grid_x: x,
            grid_y: y,
            layer: Layer::default(),
        };
        let layout = SavedLayout {
            location_key: "farm".into(),
            placements: vec![record("barn", 2, 2), record("barrel", 3, 3), record("unicorn", 9, 9)],
        };
        let registry = LocationRegistry::from_bounds([farm()]);

        let count = session.merge_layouts([layout], &registry, &fixture_catalog(), &mut signals);

        assert_eq!(count, RestoreCount { restored: 1, skipped: 2 });
        assert_eq!(session.current().unwrap().placements().len(), 1);
    }
}
