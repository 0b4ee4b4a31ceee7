//! Manual-order primitives for the drag-to-reorder view.
//!
//! These are pure list operations; [`crate::board::TaskBoard`] maps drag
//! indices onto the displayed sequence, applies the plan to the cache, and
//! issues the reconciliation write.

use serde::Serialize;

use crate::model::TaskId;

/// One entry of a bulk reorder write: a task and its new sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderAssignment {
    pub id: TaskId,
    pub order: i64,
}

/// Remove the element at `from` and reinsert it at `to`. Elements between the
/// two indices shift by one toward the vacated slot.
///
/// Both indices must be in bounds.
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    let item = items.remove(from);
    items.insert(to, item);
}

/// Plan a reorder of the displayed sequence: move `from` to `to`, then assign
/// a dense 0-based `order` to every displayed element — not only the moved
/// one, since all tasks sharing the view must stay mutually consistent.
/// Tasks outside the displayed sequence are not part of the plan.
///
/// Returns `None` when `from == to`: no cache mutation, no write.
pub fn plan_reorder(visible: &[TaskId], from: usize, to: usize) -> Option<Vec<OrderAssignment>> {
    if from == to {
        return None;
    }
    let mut ids: Vec<TaskId> = visible.to_vec();
    array_move(&mut ids, from, to);
    Some(
        ids.into_iter()
            .enumerate()
            .map(|(position, id)| OrderAssignment {
                id,
                order: position as i64,
            })
            .collect(),
    )
}
