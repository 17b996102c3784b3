//! Systems that feed requests into the [`EditorSession`].
//!
//! Pointer moves are validated on the `AsyncComputeTaskPool` against a
//! shared snapshot of the location; results are collected every frame and
//! only shown if no newer preview has been shown already.

use std::sync::Arc;

use bevy::prelude::*;
use bevy::tasks::{block_on, AsyncComputeTaskPool, Task};

use crate::collision::ValidationResult;
use crate::drag::{validate_held, DragOutcome, PreviewRequest};
use crate::editor::EditorSession;
use crate::events::{
    ActiveLayerEvent, DeselectEvent, EditFeedback, PlaceObjectEvent, PointerEvent, PointerPhase,
    RemoveObjectEvent, RenderEvents,
};
use crate::loading::CatalogHandle;

/// Preview validations still running.
#[derive(Resource, Default)]
pub struct PreviewTasks(Vec<(PreviewRequest, Task<ValidationResult>)>);

impl PreviewTasks {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn report(outcome: DragOutcome, feedback: &mut EventWriter<EditFeedback>) {
    match outcome {
        DragOutcome::Committed { placement_id, cell } => {
            feedback.send(EditFeedback::Moved { placement_id, cell });
        }
        DragOutcome::Rejected { reason, .. } => {
            feedback.send(EditFeedback::Rejected(reason));
        }
        DragOutcome::Ignored | DragOutcome::Started(_) | DragOutcome::Cancelled(_) => {}
    }
}

pub fn handle_edit_requests(
    mut places: EventReader<PlaceObjectEvent>,
    mut removes: EventReader<RemoveObjectEvent>,
    mut deselects: EventReader<DeselectEvent>,
    mut layers: EventReader<ActiveLayerEvent>,
    mut session: ResMut<EditorSession>,
    catalog: Res<CatalogHandle>,
    mut render: RenderEvents,
    mut feedback: EventWriter<EditFeedback>,
) {
    for ActiveLayerEvent(layer) in layers.read() {
        session.set_active_layer(layer.clone());
    }

    if !deselects.is_empty() {
        deselects.clear();
        session.deselect(&mut render);
    }

    for request in places.read() {
        match session.place(&*catalog.0, &mut render, &request.object_key, request.cell, &request.layer) {
            Ok(placement_id) => {
                feedback.send(EditFeedback::Placed {
                    placement_id,
                    object_key: request.object_key.clone(),
                });
            }
            Err(reason) => {
                feedback.send(EditFeedback::Rejected(reason));
            }
        }
    }

    for request in removes.read() {
        let cell = request.cell;
        match session.remove(&mut render, cell, &request.layer) {
            Ok(true) => {
                feedback.send(EditFeedback::Removed { cell });
            }
            Ok(false) => {
                feedback.send(EditFeedback::NothingToRemove { cell });
            }
            Err(reason) => {
                feedback.send(EditFeedback::Rejected(reason));
            }
        }
    }
}

pub fn handle_pointer_events(
    mut pointer: EventReader<PointerEvent>,
    mut session: ResMut<EditorSession>,
    catalog: Res<CatalogHandle>,
    mut previews: ResMut<PreviewTasks>,
    mut render: RenderEvents,
    mut feedback: EventWriter<EditFeedback>,
) {
    for event in pointer.read() {
        match event.phase {
            PointerPhase::Down => {
                let outcome = session.pointer_down(event.position, &*catalog.0, &mut render);
                report(outcome, &mut feedback);
            }
            PointerPhase::Move => {
                let Some(request) = session.begin_preview(event.position) else {
                    continue;
                };
                let Some(location) = session.snapshot() else {
                    continue;
                };
                let catalog = Arc::clone(&catalog.0);
                let task = AsyncComputeTaskPool::get()
                    .spawn(async move { validate_held(request, &location, &*catalog) });
                previews.0.push((request, task));
            }
            PointerPhase::Up => {
                let outcome = session.pointer_up(event.position, &*catalog.0, &mut render);
                // Outstanding previews belong to the drag that just ended.
                previews.0.clear();
                report(outcome, &mut feedback);
            }
        }
    }
}

pub fn collect_previews(
    mut previews: ResMut<PreviewTasks>,
    mut session: ResMut<EditorSession>,
    mut render: RenderEvents,
) {
    previews.0.retain_mut(|(request, task)| {
        match block_on(futures_lite::future::poll_once(task)) {
            Some(result) => {
                if !session.finish_preview(*request, result, &mut render) {
                    trace!("Dropped stale preview for {:?}", request.cell);
                }
                false
            }
            None => true,
        }
    });
}
