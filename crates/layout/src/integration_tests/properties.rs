use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::catalog::ObjectCatalog;
use crate::collision::placement_rect;
use crate::grid::{GridPos, Rect};
use crate::location::Location;
use crate::notifier::SignalBuffer;
use crate::placement::{Layer, PlacementId};
use crate::saved::SavedLayout;
use crate::store::PlacementStore;
use crate::test_harness::{fixture_catalog, TestLocation};

const OBJECTS: [&str; 4] = ["barrel", "shed", "barn", "rug"];
const STEPS: usize = 400;

fn yard() -> Location {
    TestLocation::new(16, 12)
        .blocked(Rect::new(0, 0, 16, 1))
        .blocked(Rect::new(6, 4, 2, 5))
        .build()
}

fn random_layer(rng: &mut ChaCha8Rng) -> Layer {
    if rng.gen_bool(0.8) {
        Layer::default()
    } else {
        Layer::new("floor")
    }
}

fn random_cell(rng: &mut ChaCha8Rng) -> GridPos {
    GridPos::new(rng.gen_range(-2..18), rng.gen_range(-2..14))
}

/// No two placements on one layer share a cell, none touches blocked
/// terrain and every footprint is inside the map.
fn assert_layout_invariants(location: &Location, catalog: &ObjectCatalog) {
    let placements = location.placements();
    let map = location.grid_rect();
    for (i, a) in placements.iter().enumerate() {
        let rect = placement_rect(a, catalog);
        for cell in rect.cells() {
            assert!(map.contains(cell), "{} leaves the map at {cell:?}", a.id);
            assert!(
                location.blocked_areas.iter().all(|b| !b.contains(cell)),
                "{} sits on blocked cell {cell:?}",
                a.id
            );
        }
        for b in &placements[i + 1..] {
            if a.layer == b.layer {
                assert!(
                    !rect.shares_cell_with(&placement_rect(b, catalog)),
                    "{} overlaps {}",
                    a.id,
                    b.id
                );
            }
        }
    }
}

#[test]
fn random_edits_never_break_layout_invariants() {
    let catalog = fixture_catalog();
    for seed in 0..8u64 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut location = yard();
        let mut store = PlacementStore::default();
        let mut signals = SignalBuffer::default();

        for _ in 0..STEPS {
            match rng.gen_range(0..3) {
                0 => {
                    let key = OBJECTS[rng.gen_range(0..OBJECTS.len())];
                    let layer = random_layer(&mut rng);
                    let _ = store.place(&mut location, &catalog, &mut signals, key, random_cell(&mut rng), &layer);
                }
                1 if !location.placements().is_empty() => {
                    let index = rng.gen_range(0..location.placements().len());
                    let id = location.placements()[index].id;
                    let _ = store.move_placement(&mut location, &catalog, &mut signals, id, random_cell(&mut rng));
                }
                _ => {
                    let layer = random_layer(&mut rng);
                    store.remove(&mut location, &mut signals, random_cell(&mut rng), &layer);
                }
            }
            assert_layout_invariants(&location, &catalog);
        }
    }
}

#[test]
fn rejected_moves_leave_the_location_unchanged() {
    let catalog = fixture_catalog();
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut location = yard();
    let mut store = PlacementStore::default();
    let mut signals = SignalBuffer::default();

    for _ in 0..40 {
        let key = OBJECTS[rng.gen_range(0..OBJECTS.len())];
        let _ = store.place(&mut location, &catalog, &mut signals, key, random_cell(&mut rng), &Layer::default());
    }
    assert!(!location.placements().is_empty());

    let mut rejections = 0;
    for _ in 0..STEPS {
        let index = rng.gen_range(0..location.placements().len());
        let id = location.placements()[index].id;
        let before = location.clone();
        let committed = signals.committed_count();
        if store
            .move_placement(&mut location, &catalog, &mut signals, id, random_cell(&mut rng))
            .is_err()
        {
            rejections += 1;
            assert_eq!(location, before);
            assert_eq!(signals.committed_count(), committed);
        }
    }
    assert!(rejections > 0);
}

#[test]
fn remove_is_idempotent() {
    let catalog = fixture_catalog();
    let mut location = yard();
    let mut store = PlacementStore::default();
    let mut signals = SignalBuffer::default();
    let layer = Layer::default();

    store.place(&mut location, &catalog, &mut signals, "shed", GridPos::new(2, 2), &layer).unwrap();
    store.place(&mut location, &catalog, &mut signals, "barrel", GridPos::new(10, 2), &layer).unwrap();

    assert!(store.remove(&mut location, &mut signals, GridPos::new(2, 2), &layer));
    let after_first = location.clone();
    assert!(!store.remove(&mut location, &mut signals, GridPos::new(2, 2), &layer));
    assert_eq!(location, after_first);
    assert_eq!(location.placements().len(), 1);
}

#[test]
fn blocked_cells_reject_every_footprint_touching_them() {
    let catalog = fixture_catalog();
    let mut store = PlacementStore::default();
    let mut signals = SignalBuffer::default();
    let layer = Layer::default();

    // The 2x5 block at (6, 4) is reachable by a barn anchored anywhere in
    // x 3..8, y 2..9.
    for x in 3..8 {
        for y in 2..9 {
            let mut location = yard();
            let result = store.place(&mut location, &catalog, &mut signals, "barn", GridPos::new(x, y), &layer);
            assert_eq!(result, Err(crate::collision::ReasonCode::BlockedTerrain), "barn at ({x}, {y})");
        }
    }
}

#[test]
fn saved_layout_round_trips_through_json() {
    let catalog = fixture_catalog();
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let mut location = yard();
    let mut store = PlacementStore::default();
    let mut signals = SignalBuffer::default();
    for _ in 0..60 {
        let key = OBJECTS[rng.gen_range(0..OBJECTS.len())];
        let layer = random_layer(&mut rng);
        let _ = store.place(&mut location, &catalog, &mut signals, key, random_cell(&mut rng), &layer);
    }

    let saved = SavedLayout::capture(&location);
    let json = serde_json::to_string(&saved).unwrap();
    assert!(json.contains("\"locationKey\""));
    assert!(json.contains("\"objectKey\""));
    let parsed: SavedLayout = serde_json::from_str(&json).unwrap();

    let mut reloaded = yard();
    let mut fresh_store = PlacementStore::default();
    let count = fresh_store.restore(&mut reloaded, &catalog, &mut signals, parsed.placements);
    assert_eq!(count.skipped, 0);

    assert_eq!(SavedLayout::capture(&reloaded).logical_set(), saved.logical_set());
    let ids: Vec<PlacementId> = reloaded.placements().iter().map(|p| p.id).collect();
    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), ids.len());
}
