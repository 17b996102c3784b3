//! One-way signals from the editing core to whatever draws it.
//!
//! The core never talks to a UI toolkit directly; callers pass a
//! [`RenderNotifier`] into every mutating operation.

use crate::collision::ReasonCode;
use crate::grid::GridPos;
use crate::placement::PlacementId;

/// Why the committed placement set changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementChange {
    Placed(PlacementId),
    Removed(PlacementId),
    Moved(PlacementId),
    /// Bulk replacement (load, location switch).
    Reloaded,
}

/// Live ghost for an in-progress drag. Never implies a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragPreview {
    pub placement_id: PlacementId,
    pub cell: GridPos,
    pub reason: Option<ReasonCode>,
}

impl DragPreview {
    pub fn is_valid(&self) -> bool {
        self.reason.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorCue {
    #[default]
    Default,
    Grabbing,
}

pub trait RenderNotifier {
    /// Committed placements changed; redraw them.
    fn placements_changed(&mut self, change: PlacementChange);

    /// High-frequency ghost update. `None` clears the ghost.
    fn preview_changed(&mut self, preview: Option<DragPreview>);

    fn cursor_changed(&mut self, cue: CursorCue);
}

/// Everything a notifier can be told, as a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderSignal {
    Changed(PlacementChange),
    Preview(Option<DragPreview>),
    Cursor(CursorCue),
}

/// Notifier that records signals until someone drains them.
#[derive(Debug, Clone, Default)]
pub struct SignalBuffer {
    signals: Vec<RenderSignal>,
}

impl SignalBuffer {
    pub fn drain(&mut self) -> std::vec::Drain<'_, RenderSignal> {
        self.signals.drain(..)
    }

    pub fn signals(&self) -> &[RenderSignal] {
        &self.signals
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    pub fn committed_count(&self) -> usize {
        self.signals
            .iter()
            .filter(|s| matches!(s, RenderSignal::Changed(_)))
            .count()
    }

    pub fn last_preview(&self) -> Option<Option<DragPreview>> {
        self.signals.iter().rev().find_map(|s| match s {
            RenderSignal::Preview(p) => Some(*p),
            _ => None,
        })
    }

    pub fn last_cursor(&self) -> Option<CursorCue> {
        self.signals.iter().rev().find_map(|s| match s {
            RenderSignal::Cursor(c) => Some(*c),
            _ => None,
        })
    }
}

impl RenderNotifier for SignalBuffer {
    fn placements_changed(&mut self, change: PlacementChange) {
        self.signals.push(RenderSignal::Changed(change));
    }

    fn preview_changed(&mut self, preview: Option<DragPreview>) {
        self.signals.push(RenderSignal::Preview(preview));
    }

    fn cursor_changed(&mut self, cue: CursorCue) {
        self.signals.push(RenderSignal::Cursor(cue));
    }
}
