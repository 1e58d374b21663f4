//! Drag-and-drop gesture state for the tag tree.
//!
//! ```text
//! IDLE --press--> IDLE(pressed) --travel >= activation--> DRAGGING
//! DRAGGING --drop on row--> COMMITTING --settle--> IDLE
//! DRAGGING --cancel / drop outside / drop on self--> IDLE
//! ```
//!
//! Drop targets are resolved on the flattened row sequence: the pointer only
//! picks the nearest visible row, never a geometric region inside it.

use crate::defaults::DRAG_ACTIVATION_DISTANCE;
use crate::models::TagId;
use crate::tree::TreeNode;

/// Pointer position in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Current phase of a drag gesture.
#[derive(Debug, Clone, PartialEq)]
pub enum DragState {
    /// No gesture, or a press that has not travelled far enough yet.
    Idle { pressed: Option<(TagId, Point)> },
    /// Dragging `active_id`; `over_id` is the row under the pointer.
    Dragging {
        active_id: TagId,
        over_id: Option<TagId>,
    },
    /// Drop accepted, waiting for the store to answer.
    Committing { active_id: TagId, target_id: TagId },
}

impl Default for DragState {
    fn default() -> Self {
        Self::Idle { pressed: None }
    }
}

/// A completed drop: place `active_id` under `target_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropIntent {
    pub active_id: TagId,
    pub target_id: TagId,
}

/// One drag gesture over the tree.
#[derive(Debug, Clone)]
pub struct DragGesture {
    state: DragState,
    activation_distance: f64,
}

impl Default for DragGesture {
    fn default() -> Self {
        Self::new(DRAG_ACTIVATION_DISTANCE)
    }
}

impl DragGesture {
    pub fn new(activation_distance: f64) -> Self {
        Self {
            state: DragState::default(),
            activation_distance,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, DragState::Idle { .. })
    }

    /// Tag being dragged or committed, if any.
    pub fn active_id(&self) -> Option<&TagId> {
        match &self.state {
            DragState::Dragging { active_id, .. } | DragState::Committing { active_id, .. } => {
                Some(active_id)
            }
            DragState::Idle { .. } => None,
        }
    }

    /// Row highlighted as the drop candidate.
    pub fn over_id(&self) -> Option<&TagId> {
        match &self.state {
            DragState::Dragging { over_id, .. } => over_id.as_ref(),
            _ => None,
        }
    }

    /// Pointer pressed on a row. Ignored unless idle.
    pub fn press(&mut self, id: TagId, at: Point) {
        if let DragState::Idle { pressed } = &mut self.state {
            *pressed = Some((id, at));
        }
    }

    /// Pointer moved. Activates the drag once travel reaches the activation
    /// distance and keeps `over_id` current while dragging.
    pub fn pointer_move(&mut self, at: Point, over: Option<TagId>) {
        let activation = self.activation_distance;
        match &mut self.state {
            DragState::Idle {
                pressed: Some((id, origin)),
            } if origin.distance_to(at) >= activation => {
                let active_id = id.clone();
                self.state = DragState::Dragging {
                    active_id,
                    over_id: over,
                };
            }
            DragState::Dragging { over_id, .. } => *over_id = over,
            _ => {}
        }
    }

    /// Pointer released. Returns the move to commit, if the drop landed on
    /// another row; otherwise the gesture goes straight back to idle.
    pub fn drop_here(&mut self) -> Option<DropIntent> {
        match std::mem::take(&mut self.state) {
            DragState::Dragging {
                active_id,
                over_id: Some(target_id),
            } if active_id != target_id => {
                self.state = DragState::Committing {
                    active_id: active_id.clone(),
                    target_id: target_id.clone(),
                };
                Some(DropIntent {
                    active_id,
                    target_id,
                })
            }
            DragState::Committing {
                active_id,
                target_id,
            } => {
                self.state = DragState::Committing {
                    active_id,
                    target_id,
                };
                None
            }
            _ => None,
        }
    }

    /// Escape pressed. A commit already in flight is not affected.
    pub fn cancel(&mut self) {
        if !matches!(self.state, DragState::Committing { .. }) {
            self.state = DragState::default();
        }
    }

    /// The commit finished, successfully or not.
    pub fn settle(&mut self) {
        self.state = DragState::default();
    }
}

/// Index of the visible row nearest to a pointer at `pointer_y`.
pub fn nearest_row(pointer_y: f64, row_height: f64, row_count: usize) -> Option<usize> {
    if row_count == 0 || row_height <= 0.0 || !pointer_y.is_finite() {
        return None;
    }
    let row = (pointer_y / row_height).floor();
    if row < 0.0 {
        return Some(0);
    }
    Some((row as usize).min(row_count - 1))
}

/// Tag id of the row at `index` in the flattened sequence.
pub fn resolve_drop_target<'a>(rows: &[&TreeNode<'a>], index: usize) -> Option<&'a TagId> {
    rows.get(index).map(|node| node.id())
}
