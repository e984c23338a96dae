//! The in-memory ordering model.
//!
//! `Board` holds the canonical ordered sequence of tasks, grouped by time
//! frame and sorted by `(frame, rank)`. The sort is stable: rank collisions
//! are legal (cross-frame moves never renumber the destination) and resolve
//! to the prior relative order rather than being compacted away.

use crate::models::{Task, TimeFrame};
use crate::{Error, Result};

/// Ordered container for the tasks currently on the board.
#[derive(Debug, Default)]
pub struct Board {
    tasks: Vec<Task>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole board with a fresh fetch from the store.
    ///
    /// This is the reconciliation entry point: any speculative local state
    /// is discarded in favor of `tasks`.
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.resort();
    }

    /// Number of tasks on the board.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// All tasks in display order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Look up a task by id.
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Tasks in the given frame, in display order.
    pub fn tasks_in(&self, frame: TimeFrame) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| t.time_frame == frame)
            .collect()
    }

    /// Insert a task, or replace it if a task with the same id exists.
    pub fn upsert(&mut self, task: Task) {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(slot) => *slot = task,
            None => self.tasks.push(task),
        }
        self.resort();
    }

    /// Remove a task, returning its snapshot if it was present.
    pub fn remove(&mut self, id: &str) -> Option<Task> {
        let idx = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(idx))
    }

    /// Reassign ranks within `frame` from an explicit ordering.
    ///
    /// `ordered_ids` must be a full permutation of the frame's current
    /// members; each task's rank becomes its 0-based index in the list.
    /// An id outside the frame rejects the whole reorder without touching
    /// any rank.
    pub fn reorder_within(&mut self, frame: TimeFrame, ordered_ids: &[&str]) -> Result<()> {
        let member_count = self.tasks.iter().filter(|t| t.time_frame == frame).count();
        for id in ordered_ids {
            let in_frame = self
                .tasks
                .iter()
                .any(|t| t.id == *id && t.time_frame == frame);
            if !in_frame {
                return Err(Error::UnknownMember {
                    id: id.to_string(),
                    frame: frame.label().to_string(),
                });
            }
        }
        if ordered_ids.len() != member_count {
            return Err(Error::InvalidInput(format!(
                "reorder must list every task in the {} bucket ({} given, {} present)",
                frame.label(),
                ordered_ids.len(),
                member_count
            )));
        }

        for (rank, id) in ordered_ids.iter().enumerate() {
            if let Some(task) = self.tasks.iter_mut().find(|t| t.id == *id) {
                task.rank = rank as i64;
            }
        }
        self.resort();
        Ok(())
    }

    /// Move a task into `frame`, placed before `before_id` or appended.
    ///
    /// The new rank is the 0-based index of `before_id` in the destination
    /// as it stands right now, or the destination's size when appending.
    /// Other tasks in the destination keep their ranks; the stable resort
    /// settles any collision. Returns the assigned rank.
    pub fn move_to_frame(
        &mut self,
        id: &str,
        frame: TimeFrame,
        before_id: Option<&str>,
    ) -> Result<i64> {
        if self.get(id).is_none() {
            return Err(Error::NotFound(id.to_string()));
        }

        let dest: Vec<&str> = self
            .tasks
            .iter()
            .filter(|t| t.time_frame == frame && t.id != id)
            .map(|t| t.id.as_str())
            .collect();

        let rank = match before_id {
            Some(target) => dest
                .iter()
                .position(|d| *d == target)
                .map(|i| i as i64)
                .unwrap_or(dest.len() as i64),
            None => dest.len() as i64,
        };

        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
            task.time_frame = frame;
            task.rank = rank;
        }

        self.resort();
        Ok(rank)
    }

    /// Re-sort the display order by `(frame, rank)`.
    ///
    /// `sort_by_key` is stable, which is what gives rank ties their
    /// prior-relative-order semantics.
    fn resort(&mut self) {
        self.tasks.sort_by_key(|t| (t.time_frame, t.rank));
    }
}
