//! SQLite-backed task store.
//!
//! Rows live in a single `tasks` table. Timestamps are stored as RFC 3339
//! text, dates and times as ISO strings, the frame as its snake_case serde
//! name, and assignees as a JSON array in a text column.

use crate::models::{Task, TaskDraft, TimeFrame};
use crate::store::{TaskFilter, TaskPatch, TaskStore};
use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use uuid::Uuid;

/// Local persistence backend over a SQLite database file.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open or create the database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used by tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self { conn })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS tasks (
                id TEXT PRIMARY KEY,
                team_id TEXT NOT NULL,
                name TEXT NOT NULL,
                memo TEXT NOT NULL DEFAULT '',
                due_date TEXT,
                due_time TEXT,
                time_frame TEXT NOT NULL DEFAULT 'today',
                important INTEGER NOT NULL DEFAULT 0,
                pinned INTEGER NOT NULL DEFAULT 0,
                completed INTEGER NOT NULL DEFAULT 0,
                completed_at TEXT,
                project_id TEXT,
                assignees TEXT NOT NULL DEFAULT '[]',
                sort_order INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_tasks_team
                ON tasks(team_id, completed);
            "#,
        )?;
        Ok(())
    }

    /// Fetch one row by id.
    pub fn get_task(&self, id: &str) -> Result<Task> {
        let mut stmt = self.conn.prepare(
            "SELECT id, team_id, name, memo, due_date, due_time, time_frame,
                    important, pinned, completed, completed_at, project_id,
                    assignees, sort_order, created_at, updated_at
             FROM tasks WHERE id = ?1",
        )?;
        let mut rows = stmt.query_map([id], read_row)?;
        match rows.next() {
            Some(raw) => raw?.into_task(),
            None => Err(Error::NotFound(id.to_string())),
        }
    }
}

impl TaskStore for SqliteStore {
    fn fetch_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        let mut sql = String::from(
            "SELECT id, team_id, name, memo, due_date, due_time, time_frame,
                    important, pinned, completed, completed_at, project_id,
                    assignees, sort_order, created_at, updated_at
             FROM tasks WHERE team_id = ?",
        );
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(filter.team_id.clone())];

        if let Some(completed) = filter.completed {
            sql.push_str(" AND completed = ?");
            params_vec.push(Box::new(completed));
        }
        if let Some(project) = &filter.project_id {
            sql.push_str(" AND project_id = ?");
            params_vec.push(Box::new(project.clone()));
        }

        sql.push_str(" ORDER BY sort_order ASC");

        let params_refs: Vec<&dyn rusqlite::ToSql> =
            params_vec.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let raws = stmt.query_map(params_refs.as_slice(), read_row)?;

        let mut tasks = Vec::new();
        for raw in raws {
            tasks.push(raw?.into_task()?);
        }
        Ok(tasks)
    }

    fn insert_task(&mut self, draft: &TaskDraft) -> Result<Task> {
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4().to_string(),
            team_id: draft.team_id.clone(),
            name: draft.name.clone(),
            memo: draft.memo.clone(),
            due_date: draft.due_date,
            due_time: draft.due_time,
            time_frame: draft.time_frame,
            important: draft.important,
            pinned: draft.pinned,
            completed: draft.completed,
            completed_at: draft.completed_at,
            project_id: draft.project_id.clone(),
            assignees: draft.assignees.clone(),
            rank: draft.rank,
            created_at: now,
            updated_at: now,
        };

        self.conn.execute(
            r#"
            INSERT INTO tasks
            (id, team_id, name, memo, due_date, due_time, time_frame, important,
             pinned, completed, completed_at, project_id, assignees, sort_order,
             created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
            "#,
            params![
                task.id,
                task.team_id,
                task.name,
                task.memo,
                task.due_date.map(|d| d.to_string()),
                task.due_time.map(|t| t.format("%H:%M:%S").to_string()),
                frame_to_str(task.time_frame)?,
                task.important,
                task.pinned,
                task.completed,
                task.completed_at.map(|t| t.to_rfc3339()),
                task.project_id,
                serde_json::to_string(&task.assignees)?,
                task.rank,
                task.created_at.to_rfc3339(),
                task.updated_at.to_rfc3339(),
            ],
        )?;

        Ok(task)
    }

    fn update_task(&mut self, id: &str, patch: &TaskPatch) -> Result<()> {
        if patch.is_noop() {
            return Ok(());
        }

        let mut sets: Vec<&str> = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(name) = &patch.name {
            sets.push("name = ?");
            params_vec.push(Box::new(name.clone()));
        }
        if let Some(memo) = &patch.memo {
            sets.push("memo = ?");
            params_vec.push(Box::new(memo.clone()));
        }
        if let Some(frame) = patch.time_frame {
            sets.push("time_frame = ?");
            params_vec.push(Box::new(frame_to_str(frame)?));
        }
        if let Some(rank) = patch.rank {
            sets.push("sort_order = ?");
            params_vec.push(Box::new(rank));
        }
        if let Some(important) = patch.important {
            sets.push("important = ?");
            params_vec.push(Box::new(important));
        }
        if let Some(pinned) = patch.pinned {
            sets.push("pinned = ?");
            params_vec.push(Box::new(pinned));
        }
        if let Some(completed) = patch.completed {
            sets.push("completed = ?");
            params_vec.push(Box::new(completed));
        }
        if let Some(completed_at) = &patch.completed_at {
            sets.push("completed_at = ?");
            params_vec.push(Box::new(completed_at.map(|t| t.to_rfc3339())));
        }
        if let Some(due_date) = &patch.due_date {
            sets.push("due_date = ?");
            params_vec.push(Box::new(due_date.map(|d| d.to_string())));
        }
        if let Some(due_time) = &patch.due_time {
            sets.push("due_time = ?");
            params_vec.push(Box::new(
                due_time.map(|t| t.format("%H:%M:%S").to_string()),
            ));
        }
        if let Some(project_id) = &patch.project_id {
            sets.push("project_id = ?");
            params_vec.push(Box::new(project_id.clone()));
        }
        if let Some(assignees) = &patch.assignees {
            sets.push("assignees = ?");
            params_vec.push(Box::new(serde_json::to_string(assignees)?));
        }

        sets.push("updated_at = ?");
        params_vec.push(Box::new(Utc::now().to_rfc3339()));

        params_vec.push(Box::new(id.to_string()));

        let sql = format!("UPDATE tasks SET {} WHERE id = ?", sets.join(", "));
        let params_refs: Vec<&dyn rusqlite::ToSql> =
            params_vec.iter().map(|p| p.as_ref()).collect();

        let changed = self.conn.execute(&sql, params_refs.as_slice())?;
        if changed == 0 {
            return Err(Error::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn delete_task(&mut self, id: &str) -> Result<()> {
        let changed = self.conn.execute("DELETE FROM tasks WHERE id = ?1", [id])?;
        if changed == 0 {
            return Err(Error::NotFound(id.to_string()));
        }
        Ok(())
    }
}

/// Intermediate row with column-level types only, converted after the
/// rusqlite mapping step so parse failures surface as crate errors.
struct RawRow {
    id: String,
    team_id: String,
    name: String,
    memo: String,
    due_date: Option<String>,
    due_time: Option<String>,
    time_frame: String,
    important: bool,
    pinned: bool,
    completed: bool,
    completed_at: Option<String>,
    project_id: Option<String>,
    assignees: String,
    rank: i64,
    created_at: String,
    updated_at: String,
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
    Ok(RawRow {
        id: row.get(0)?,
        team_id: row.get(1)?,
        name: row.get(2)?,
        memo: row.get(3)?,
        due_date: row.get(4)?,
        due_time: row.get(5)?,
        time_frame: row.get(6)?,
        important: row.get(7)?,
        pinned: row.get(8)?,
        completed: row.get(9)?,
        completed_at: row.get(10)?,
        project_id: row.get(11)?,
        assignees: row.get(12)?,
        rank: row.get(13)?,
        created_at: row.get(14)?,
        updated_at: row.get(15)?,
    })
}

impl RawRow {
    fn into_task(self) -> Result<Task> {
        Ok(Task {
            id: self.id,
            team_id: self.team_id,
            name: self.name,
            memo: self.memo,
            due_date: self.due_date.map(|s| parse_date(&s)).transpose()?,
            due_time: self.due_time.map(|s| parse_time(&s)).transpose()?,
            time_frame: frame_from_str(&self.time_frame)?,
            important: self.important,
            pinned: self.pinned,
            completed: self.completed,
            completed_at: self
                .completed_at
                .map(|s| parse_timestamp(&s))
                .transpose()?,
            project_id: self.project_id,
            assignees: serde_json::from_str(&self.assignees)?,
            rank: self.rank,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

fn frame_to_str(frame: TimeFrame) -> Result<String> {
    Ok(serde_json::to_string(&frame)?.trim_matches('"').to_string())
}

fn frame_from_str(s: &str) -> Result<TimeFrame> {
    serde_json::from_str(&format!("\"{s}\""))
        .map_err(|_| Error::InvalidInput(format!("unknown time frame: {s}")))
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    s.parse()
        .map_err(|_| Error::InvalidInput(format!("bad date: {s}")))
}

fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .map_err(|_| Error::InvalidInput(format!("bad time: {s}")))
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| Error::InvalidInput(format!("bad timestamp: {s}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskDraft;

    fn draft(name: &str) -> TaskDraft {
        TaskDraft::new("team-1", name)
    }

    #[test]
    fn test_insert_assigns_identity_and_timestamps() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let task = store.insert_task(&draft("first")).unwrap();
        assert!(!task.id.is_empty());

        let fetched = store.get_task(&task.id).unwrap();
        assert_eq!(fetched.name, "first");
        assert_eq!(fetched.team_id, "team-1");
    }

    #[test]
    fn test_fetch_filters_by_completion_and_project() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let mut open = draft("open");
        open.project_id = Some("p-1".to_string());
        store.insert_task(&open).unwrap();

        let mut done = draft("done");
        done.completed = true;
        store.insert_task(&done).unwrap();

        let fetched = store
            .fetch_tasks(&TaskFilter::open_tasks("team-1"))
            .unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].name, "open");

        let by_project = store
            .fetch_tasks(&TaskFilter {
                team_id: "team-1".to_string(),
                completed: None,
                project_id: Some("p-1".to_string()),
            })
            .unwrap();
        assert_eq!(by_project.len(), 1);
        assert_eq!(by_project[0].name, "open");
    }

    #[test]
    fn test_fetch_orders_by_rank() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        for (name, rank) in [("late", 5), ("early", 1), ("mid", 3)] {
            let mut d = draft(name);
            d.rank = rank;
            store.insert_task(&d).unwrap();
        }

        let tasks = store
            .fetch_tasks(&TaskFilter::open_tasks("team-1"))
            .unwrap();
        let names: Vec<&str> = tasks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["early", "mid", "late"]);
    }

    #[test]
    fn test_patch_updates_only_named_fields() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let mut d = draft("task");
        d.memo = "keep me".to_string();
        let task = store.insert_task(&d).unwrap();

        store
            .update_task(&task.id, &TaskPatch::placement(TimeFrame::NextWeek, 7))
            .unwrap();

        let fetched = store.get_task(&task.id).unwrap();
        assert_eq!(fetched.time_frame, TimeFrame::NextWeek);
        assert_eq!(fetched.rank, 7);
        assert_eq!(fetched.memo, "keep me");
    }

    #[test]
    fn test_patch_can_clear_nullable_fields() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let mut d = draft("task");
        d.due_date = NaiveDate::from_ymd_opt(2024, 6, 1);
        let task = store.insert_task(&d).unwrap();

        let patch = TaskPatch {
            due_date: Some(None),
            ..TaskPatch::default()
        };
        store.update_task(&task.id, &patch).unwrap();
        assert!(store.get_task(&task.id).unwrap().due_date.is_none());
    }

    #[test]
    fn test_update_missing_row_is_not_found() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let err = store.update_task("ghost", &TaskPatch::rank(1)).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_delete_missing_row_is_not_found() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        assert!(matches!(
            store.delete_task("ghost"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_round_trips_dates_and_assignees() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let mut d = draft("task");
        d.due_date = NaiveDate::from_ymd_opt(2024, 6, 1);
        d.due_time = NaiveTime::from_hms_opt(17, 0, 0);
        d.assignees = vec!["m-1".to_string(), "m-2".to_string()];
        let task = store.insert_task(&d).unwrap();

        let fetched = store.get_task(&task.id).unwrap();
        assert_eq!(fetched.due_date, d.due_date);
        assert_eq!(fetched.due_time, d.due_time);
        assert_eq!(fetched.assignees, d.assignees);
    }
}
