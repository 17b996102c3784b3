use bevy::prelude::*;

use crate::collision::ReasonCode;
use crate::events::{DeselectEvent, EditFeedback, PointerEvent, RemoveObjectEvent, SwitchLocationEvent};
use crate::grid::GridPos;
use crate::notifier::{CursorCue, PlacementChange};
use crate::placement::{Layer, PlacementId};
use crate::test_harness::TestEditor;

// ===========================================================================
// Locations
// ===========================================================================

#[test]
fn nothing_is_open_before_the_first_switch() {
    let mut editor = TestEditor::new();
    editor.place("barrel", 3, 3);
    assert_eq!(editor.session().current_key(), None);
    assert_eq!(editor.last_feedback(), Some(&EditFeedback::Rejected(ReasonCode::NoCurrentLocation)));
}

#[test]
fn opening_a_location_reports_and_reloads() {
    let editor = TestEditor::opened("farm");
    assert_eq!(editor.session().current_key(), Some("farm"));
    assert_eq!(
        editor.last_feedback(),
        Some(&EditFeedback::LocationOpened {
            key: "farm".into(),
            name: "Test".into(),
        })
    );
    assert_eq!(editor.recorded().changes, vec![PlacementChange::Reloaded]);
}

#[test]
fn second_switch_while_loading_is_ignored() {
    let mut editor = TestEditor::new();
    editor
        .send(SwitchLocationEvent { key: "cellar".into() })
        .send(SwitchLocationEvent { key: "farm".into() })
        .settle();

    assert_eq!(editor.session().current_key(), Some("cellar"));
    assert!(editor
        .recorded()
        .feedback
        .contains(&EditFeedback::SwitchIgnored { key: "farm".into() }));
}

#[test]
fn unknown_location_aborts_the_switch() {
    let mut editor = TestEditor::opened("farm");
    editor.open("attic");
    assert_eq!(editor.session().current_key(), Some("farm"));
    assert_eq!(editor.session().switch_in_flight(), None);
    assert!(matches!(editor.last_feedback(), Some(EditFeedback::LoadFailed(_))));

    // The guard is released, so the next switch goes through.
    editor.open("cellar");
    assert_eq!(editor.session().current_key(), Some("cellar"));
}

// ===========================================================================
// Placing and removing
// ===========================================================================

#[test]
fn place_and_remove_through_events() {
    let mut editor = TestEditor::opened("farm");
    editor.place("shed", 4, 4);
    assert!(matches!(
        editor.last_feedback(),
        Some(EditFeedback::Placed { object_key, .. }) if object_key == "shed"
    ));
    assert_eq!(editor.placement_count(), 1);

    let remove = RemoveObjectEvent {
        cell: GridPos::new(4, 4),
        layer: Layer::default(),
    };
    editor.send(remove.clone()).update();
    assert_eq!(editor.last_feedback(), Some(&EditFeedback::Removed { cell: GridPos::new(4, 4) }));
    editor.send(remove).update();
    assert_eq!(
        editor.last_feedback(),
        Some(&EditFeedback::NothingToRemove { cell: GridPos::new(4, 4) })
    );
    assert_eq!(editor.placement_count(), 0);
}

#[test]
fn rejections_come_back_as_feedback() {
    let mut editor = TestEditor::opened("farm");
    editor.place("barrel", 5, 0);
    assert_eq!(editor.last_feedback(), Some(&EditFeedback::Rejected(ReasonCode::BlockedTerrain)));
    editor.place("striped_wallpaper", 5, 5);
    assert_eq!(editor.last_feedback(), Some(&EditFeedback::Rejected(ReasonCode::CategoryRestricted)));

    editor.open("cellar").place("barn", 1, 1);
    assert_eq!(editor.last_feedback(), Some(&EditFeedback::Rejected(ReasonCode::IndoorRestriction)));
    assert_eq!(editor.placement_count(), 0);
}

// ===========================================================================
// Dragging
// ===========================================================================

#[test]
fn drag_keeps_grab_offset_and_commits_on_release() {
    let mut editor = TestEditor::opened("farm");
    editor.place("barrel", 3, 3);

    editor.pointer(PointerEvent::down(Vec2::new(110.0, 100.0)));
    assert!(editor.session().drag().is_armed());

    editor.pointer(PointerEvent::moved(Vec2::new(133.0, 132.0)));
    let preview = editor.session().drag().preview().unwrap();
    assert_eq!(preview.cell, GridPos::new(3, 4));
    assert!(preview.is_valid());
    // Previewing never commits.
    assert_eq!(
        editor.session().current().unwrap().placements()[0].anchor(),
        GridPos::new(3, 3)
    );

    editor.pointer(PointerEvent::up(Vec2::new(133.0, 132.0)));
    assert_eq!(
        editor.last_feedback(),
        Some(&EditFeedback::Moved {
            placement_id: PlacementId(1),
            cell: GridPos::new(3, 4),
        })
    );
    assert_eq!(editor.recorded().cursors, vec![CursorCue::Grabbing, CursorCue::Default]);
    assert_eq!(editor.recorded().previews.last(), Some(&None));
}

#[test]
fn rejected_drop_snaps_back() {
    let mut editor = TestEditor::opened("farm");
    editor.place("barrel", 3, 3).place("barrel", 5, 3);

    editor
        .pointer(PointerEvent::down(Vec2::new(100.0, 100.0)))
        .pointer(PointerEvent::moved(Vec2::new(164.0, 100.0)));
    assert_eq!(editor.session().drag().preview().unwrap().reason, Some(ReasonCode::Overlap));

    editor.pointer(PointerEvent::up(Vec2::new(164.0, 100.0)));
    assert_eq!(editor.last_feedback(), Some(&EditFeedback::Rejected(ReasonCode::Overlap)));
    let location = editor.session().current().unwrap();
    assert_eq!(location.placement(PlacementId(1)).unwrap().anchor(), GridPos::new(3, 3));
    assert!(!editor.session().drag().is_armed());
}

#[test]
fn newest_preview_wins_when_moves_arrive_together() {
    let mut editor = TestEditor::opened("farm");
    editor.place("barrel", 3, 3);
    editor.pointer(PointerEvent::down(Vec2::new(100.0, 100.0)));

    editor
        .send(PointerEvent::moved(Vec2::new(164.0, 100.0)))
        .send(PointerEvent::moved(Vec2::new(196.0, 164.0)))
        .settle();

    assert_eq!(editor.session().drag().preview().unwrap().cell, GridPos::new(6, 5));
}

#[test]
fn switching_location_cancels_an_armed_drag() {
    let mut editor = TestEditor::opened("farm");
    editor.place("barrel", 3, 3);
    editor.pointer(PointerEvent::down(Vec2::new(100.0, 100.0)));

    editor.open("cellar");
    assert!(!editor.session().drag().is_armed());

    // A release arriving after the switch commits nothing.
    editor.pointer(PointerEvent::up(Vec2::new(200.0, 200.0)));
    editor.open("farm");
    let location = editor.session().current().unwrap();
    assert_eq!(location.placements()[0].anchor(), GridPos::new(3, 3));
}

#[test]
fn deselect_drops_the_drag() {
    let mut editor = TestEditor::opened("farm");
    editor.place("barrel", 3, 3);
    editor.pointer(PointerEvent::down(Vec2::new(100.0, 100.0)));
    editor.send(DeselectEvent).update();
    assert!(!editor.session().drag().is_armed());
    assert_eq!(editor.recorded().cursors.last(), Some(&CursorCue::Default));
}
