//! Persistence layer for Corkboard data.
//!
//! The engine talks to a row-oriented store through the `TaskStore` trait:
//! per-row create/read/update/delete plus filtered queries, each call
//! independently atomic, with no transactional guarantees across calls.
//! The store assigns task identity and timestamps on insert.
//!
//! `SqliteStore` is the bundled local backend used by the `cork` CLI.

pub mod sqlite;

pub use sqlite::SqliteStore;

use crate::models::{Task, TaskDraft, TimeFrame};
use crate::Result;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Query filter for `TaskStore::fetch_tasks`.
#[derive(Debug, Clone)]
pub struct TaskFilter {
    /// Owning team (always required)
    pub team_id: String,
    /// Filter by completion flag
    pub completed: Option<bool>,
    /// Filter by project reference
    pub project_id: Option<String>,
}

impl TaskFilter {
    /// The board's working set: a team's open tasks.
    pub fn open_tasks(team_id: impl Into<String>) -> Self {
        Self {
            team_id: team_id.into(),
            completed: Some(false),
            project_id: None,
        }
    }
}

/// Partial update for a single task row.
///
/// `None` leaves a field untouched. Nullable columns use a nested option:
/// `Some(None)` clears the value, `Some(Some(v))` sets it.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub name: Option<String>,
    pub memo: Option<String>,
    pub time_frame: Option<TimeFrame>,
    pub rank: Option<i64>,
    pub important: Option<bool>,
    pub pinned: Option<bool>,
    pub completed: Option<bool>,
    pub completed_at: Option<Option<DateTime<Utc>>>,
    pub due_date: Option<Option<NaiveDate>>,
    pub due_time: Option<Option<NaiveTime>>,
    pub project_id: Option<Option<String>>,
    pub assignees: Option<Vec<String>>,
}

impl TaskPatch {
    /// A rank-only update, as issued per task in a same-frame reorder.
    pub fn rank(rank: i64) -> Self {
        Self {
            rank: Some(rank),
            ..Self::default()
        }
    }

    /// Frame plus rank, as issued by a cross-frame move.
    pub fn placement(frame: TimeFrame, rank: i64) -> Self {
        Self {
            time_frame: Some(frame),
            rank: Some(rank),
            ..Self::default()
        }
    }

    /// Completion flag together with its timestamp.
    pub fn completion(completed: bool, completed_at: Option<DateTime<Utc>>) -> Self {
        Self {
            completed: Some(completed),
            completed_at: Some(completed_at),
            ..Self::default()
        }
    }

    /// True when no field is set.
    pub fn is_noop(&self) -> bool {
        self.name.is_none()
            && self.memo.is_none()
            && self.time_frame.is_none()
            && self.rank.is_none()
            && self.important.is_none()
            && self.pinned.is_none()
            && self.completed.is_none()
            && self.completed_at.is_none()
            && self.due_date.is_none()
            && self.due_time.is_none()
            && self.project_id.is_none()
            && self.assignees.is_none()
    }
}

/// Trait for persistence backends holding task rows.
pub trait TaskStore {
    /// Fetch all tasks matching the filter, ordered by rank.
    fn fetch_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>>;

    /// Insert a new task row; identity and timestamps are generated here.
    fn insert_task(&mut self, draft: &TaskDraft) -> Result<Task>;

    /// Apply a partial update to one row.
    fn update_task(&mut self, id: &str, patch: &TaskPatch) -> Result<()>;

    /// Delete one row.
    fn delete_task(&mut self, id: &str) -> Result<()>;
}
