//! Turns a drop into a committed move.

use tracing::{debug, info, instrument};

use resmap_core::{DragGesture, Error, MoveRejection, Result, TagId};

use crate::store::TagStore;

/// Result of a move attempt that did not fail remotely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The backend accepted the move and the store was re-listed.
    Applied,
    /// The target already is the parent. Nothing was sent.
    Unchanged,
    /// Refused by the move rules. Nothing was sent.
    Rejected(MoveRejection),
}

/// Validate and commit moving `dragged` under `target`.
///
/// Remote failures come back as `Err` with the store untouched.
#[instrument(
    skip(store),
    fields(subsystem = "client", component = "applier", op = "commit_move")
)]
pub async fn commit_move(
    store: &mut TagStore,
    dragged: &TagId,
    target: &TagId,
) -> Result<MoveOutcome> {
    {
        let index = store.index();
        let tag = index
            .get(dragged)
            .ok_or_else(|| Error::TagNotFound(dragged.clone()))?;
        if !index.contains(target) {
            return Err(Error::TagNotFound(target.clone()));
        }

        if let Err(reason) = index.validate_move(dragged, target, store.max_depth()) {
            debug!(rejection = reason.code(), "Move rejected");
            return Ok(MoveOutcome::Rejected(reason));
        }

        if tag.parent_id.as_ref() == Some(target) {
            debug!("Target is already the parent");
            return Ok(MoveOutcome::Unchanged);
        }
    }

    if store.reparent(dragged, Some(target)).await? {
        info!("Move applied");
        Ok(MoveOutcome::Applied)
    } else {
        Err(Error::Remote(format!(
            "move of {} under {} was not applied",
            dragged, target
        )))
    }
}

/// Release the pointer: commit the pending drop, if any, then return the
/// gesture to idle whatever the commit's result.
pub async fn finish_drag(
    gesture: &mut DragGesture,
    store: &mut TagStore,
) -> Result<Option<MoveOutcome>> {
    let intent = match gesture.drop_here() {
        Some(intent) => intent,
        None => return Ok(None),
    };

    let outcome = commit_move(store, &intent.active_id, &intent.target_id).await;
    gesture.settle();
    outcome.map(Some)
}
