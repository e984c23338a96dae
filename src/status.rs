//! Derived warning state for tasks.
//!
//! Pure evaluation of overdue and time-frame-mismatch flags from a task's
//! due date, its frame, and the current calendar day. Called fresh on every
//! render - "today" moves, so results are never cached.

use crate::models::Task;
use chrono::NaiveDate;

/// Warning flags derived for a single task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusFlags {
    /// Due date is strictly before today
    pub overdue: bool,
    /// The task's frame implies more lead time than its due date allows
    pub mismatch: bool,
}

/// Evaluate warning flags for `task` as of `today`.
///
/// Tasks with no due date, and completed tasks, never warn. The comparison
/// is date-only; due time is ignored. A mismatch fires when the due date is
/// today or later but closer than the frame's minimum lead time - e.g. a
/// task due today filed under "next week". An already-overdue date never
/// counts as a mismatch on its own.
pub fn check(task: &Task, today: NaiveDate) -> StatusFlags {
    let Some(due) = task.due_date else {
        return StatusFlags::default();
    };
    if task.completed {
        return StatusFlags::default();
    }

    let overdue = due < today;

    let days_diff = (due - today).num_days();
    let mismatch = days_diff >= 0 && days_diff < task.time_frame.min_lead_days();

    StatusFlags { overdue, mismatch }
}
