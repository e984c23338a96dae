//! Data models for Corkboard entities.
//!
//! This module defines the core data structures:
//! - `TimeFrame` - The five fixed time-frame buckets tasks are filed under
//! - `Task` - A work item with rank ordering, flags, and assignees
//! - `TaskDraft` - Fields for creating a task (identity assigned by the store)

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed, ordered set of time-frame buckets.
///
/// Every task belongs to exactly one frame at any instant. The variant
/// order is the display order of the board sections.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TimeFrame {
    #[default]
    Today,
    Tomorrow,
    ThisWeek,
    NextWeek,
    LaterMonth,
}

impl TimeFrame {
    /// All frames in board display order.
    pub const ALL: [TimeFrame; 5] = [
        TimeFrame::Today,
        TimeFrame::Tomorrow,
        TimeFrame::ThisWeek,
        TimeFrame::NextWeek,
        TimeFrame::LaterMonth,
    ];

    /// Minimum lead time (in calendar days) a frame implies.
    ///
    /// A task whose due date allows less lead time than its frame implies
    /// is flagged as mismatched by `status::check`.
    pub fn min_lead_days(&self) -> i64 {
        match self {
            TimeFrame::Today => 0,
            TimeFrame::Tomorrow => 1,
            TimeFrame::ThisWeek => 3,
            TimeFrame::NextWeek => 5,
            TimeFrame::LaterMonth => 10,
        }
    }

    /// Human-readable frame label.
    pub fn label(&self) -> &'static str {
        match self {
            TimeFrame::Today => "Today",
            TimeFrame::Tomorrow => "Tomorrow",
            TimeFrame::ThisWeek => "This week",
            TimeFrame::NextWeek => "Next week",
            TimeFrame::LaterMonth => "Later",
        }
    }
}

impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for TimeFrame {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "today" => Ok(TimeFrame::Today),
            "tomorrow" => Ok(TimeFrame::Tomorrow),
            "this_week" | "this-week" | "week" => Ok(TimeFrame::ThisWeek),
            "next_week" | "next-week" | "next" => Ok(TimeFrame::NextWeek),
            "later_month" | "later-month" | "later" => Ok(TimeFrame::LaterMonth),
            other => Err(format!(
                "unknown time frame '{other}' (expected today, tomorrow, this_week, next_week, or later_month)"
            )),
        }
    }
}

/// A task on the board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier, assigned by the persistence store on insert
    pub id: String,

    /// Owning team
    pub team_id: String,

    /// Display name
    pub name: String,

    /// Free-text memo
    #[serde(default)]
    pub memo: String,

    /// Optional calendar due date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    /// Optional clock due time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_time: Option<NaiveTime>,

    /// Time-frame bucket this task is filed under
    #[serde(default)]
    pub time_frame: TimeFrame,

    /// Importance flag (starred)
    #[serde(default)]
    pub important: bool,

    /// Pinned flag
    #[serde(default)]
    pub pinned: bool,

    /// Completion flag
    #[serde(default)]
    pub completed: bool,

    /// Completion timestamp, set when `completed` flips to true
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    /// Optional project this task belongs to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    /// Assigned member ids. Order is preserved on the wire but carries no
    /// meaning for equality.
    #[serde(default)]
    pub assignees: Vec<String>,

    /// Sort position within the frame. Unique-enough, not globally unique,
    /// and never compacted; display order breaks ties stably.
    #[serde(default)]
    pub rank: i64,

    /// Creation timestamp, assigned by the store
    pub created_at: DateTime<Utc>,

    /// Last update timestamp, assigned by the store
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a task. Identity and timestamps are assigned by the
/// persistence store on insert.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskDraft {
    pub team_id: String,
    pub name: String,
    #[serde(default)]
    pub memo: String,
    pub due_date: Option<NaiveDate>,
    pub due_time: Option<NaiveTime>,
    #[serde(default)]
    pub time_frame: TimeFrame,
    #[serde(default)]
    pub important: bool,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub project_id: Option<String>,
    #[serde(default)]
    pub assignees: Vec<String>,
    #[serde(default)]
    pub rank: i64,
}

impl TaskDraft {
    /// Create a minimal draft for the given team and name.
    pub fn new(team_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            team_id: team_id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Draft that restores a deleted task from its snapshot.
    ///
    /// Everything but identity and timestamps is carried over; the store
    /// assigns those anew on insert, so the restored task gets a new id.
    pub fn from_snapshot(task: &Task) -> Self {
        Self {
            team_id: task.team_id.clone(),
            name: task.name.clone(),
            memo: task.memo.clone(),
            due_date: task.due_date,
            due_time: task.due_time,
            time_frame: task.time_frame,
            important: task.important,
            pinned: task.pinned,
            completed: task.completed,
            completed_at: task.completed_at,
            project_id: task.project_id.clone(),
            assignees: task.assignees.clone(),
            rank: task.rank,
        }
    }
}
