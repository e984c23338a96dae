//! Command implementations for the Corkboard CLI.
//!
//! Each command opens a board session against the SQLite store in the data
//! directory, applies one engine operation, and returns a result that can
//! be serialized to JSON or formatted for humans. The undo ledger is
//! persisted to `undo.json` between invocations so that `cork undo` works
//! across processes.

use crate::engine::BoardEngine;
use crate::models::{TaskDraft, TimeFrame};
use crate::status::StatusFlags;
use crate::store::{SqliteStore, TaskPatch};
use crate::undo::UndoEntry;
use crate::{Error, Result};
use chrono::{Local, NaiveDate, NaiveTime};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output: Serialize {
    /// Format for human-readable output.
    fn human(&self) -> String;
}

// === Session plumbing ===

const DB_FILE: &str = "cork.db";
const UNDO_FILE: &str = "undo.json";

fn open_engine(data_dir: &Path, team: &str) -> Result<BoardEngine<SqliteStore>> {
    let store = SqliteStore::open(&data_dir.join(DB_FILE))?;
    let mut engine = BoardEngine::open(store, team, false)?;

    let undo_path = data_dir.join(UNDO_FILE);
    if undo_path.exists() {
        let raw = fs::read_to_string(&undo_path)?;
        let entries: Vec<UndoEntry> = serde_json::from_str(&raw)?;
        engine.restore_undo(entries);
    }
    Ok(engine)
}

fn save_undo(data_dir: &Path, engine: &BoardEngine<SqliteStore>) -> Result<()> {
    let raw = serde_json::to_string(&engine.undo_snapshot())?;
    fs::write(data_dir.join(UNDO_FILE), raw)?;
    Ok(())
}

/// Resolve a user-supplied id or unique prefix to a full task id.
fn resolve_id(engine: &BoardEngine<SqliteStore>, prefix: &str) -> Result<String> {
    if engine.board().get(prefix).is_some() {
        return Ok(prefix.to_string());
    }

    let matches: Vec<&str> = engine
        .board()
        .tasks()
        .iter()
        .filter(|t| t.id.starts_with(prefix))
        .map(|t| t.id.as_str())
        .collect();

    match matches.len() {
        0 => Err(Error::NotFound(prefix.to_string())),
        1 => Ok(matches[0].to_string()),
        n => Err(Error::InvalidInput(format!(
            "id prefix '{prefix}' is ambiguous ({n} matches)"
        ))),
    }
}

fn parse_due_time(raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|_| Error::InvalidInput(format!("invalid time '{raw}' (expected HH:MM)")))
}

fn short_id(id: &str) -> &str {
    &id[..id.len().min(8)]
}

// === Outputs ===

/// A single card as it appears in a board listing.
#[derive(Debug, Serialize)]
pub struct CardLine {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_time: Option<NaiveTime>,
    pub important: bool,
    pub pinned: bool,
    pub overdue: bool,
    pub mismatch: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub assignees: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct FrameSection {
    pub frame: TimeFrame,
    pub label: String,
    pub tasks: Vec<CardLine>,
}

/// The whole board, grouped by frame in display order.
#[derive(Debug, Serialize)]
pub struct BoardOutput {
    pub frames: Vec<FrameSection>,
}

impl Output for BoardOutput {
    fn human(&self) -> String {
        let mut out = String::new();
        for section in &self.frames {
            out.push_str(&format!("{}\n", section.label));
            if section.tasks.is_empty() {
                out.push_str("  (empty)\n");
                continue;
            }
            for card in &section.tasks {
                let status = if card.overdue {
                    '!'
                } else if card.mismatch {
                    '~'
                } else {
                    ' '
                };
                let mut line = format!("  {} {}  {}", status, short_id(&card.id), card.name);
                if card.important {
                    line.push_str(" *");
                }
                if card.pinned {
                    line.push_str(" [pin]");
                }
                if let Some(due) = card.due_date {
                    match card.due_time {
                        Some(at) => line.push_str(&format!("  (due {} {})", due, at.format("%H:%M"))),
                        None => line.push_str(&format!("  (due {due})")),
                    }
                }
                for member in &card.assignees {
                    line.push_str(&format!(" @{member}"));
                }
                out.push_str(&line);
                out.push('\n');
            }
        }
        out
    }
}

/// Acknowledgement of a single-task mutation.
#[derive(Debug, Serialize)]
pub struct AckOutput {
    pub action: String,
    pub id: String,
    pub name: String,
}

impl AckOutput {
    fn new(action: &str, id: &str, name: &str) -> Self {
        Self {
            action: action.to_string(),
            id: id.to_string(),
            name: name.to_string(),
        }
    }
}

impl Output for AckOutput {
    fn human(&self) -> String {
        format!("{} {} ({})", self.action, self.name, short_id(&self.id))
    }
}

/// Result of `cork undo`.
#[derive(Debug, Serialize)]
pub struct UndoOutput {
    /// What was undone, if anything
    #[serde(skip_serializing_if = "Option::is_none")]
    pub undone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Output for UndoOutput {
    fn human(&self) -> String {
        match (&self.undone, &self.name) {
            (Some(action), Some(name)) => format!("undid {action} of {name}"),
            _ => "nothing to undo".to_string(),
        }
    }
}

// === Commands ===

#[allow(clippy::too_many_arguments)]
pub fn add(
    data_dir: &Path,
    team: &str,
    name: &str,
    frame: TimeFrame,
    memo: Option<String>,
    due: Option<NaiveDate>,
    at: Option<String>,
    project: Option<String>,
    important: bool,
    pin: bool,
    assignees: Vec<String>,
) -> Result<AckOutput> {
    let mut engine = open_engine(data_dir, team)?;

    let mut draft = TaskDraft::new(team, name);
    draft.time_frame = frame;
    draft.memo = memo.unwrap_or_default();
    draft.due_date = due;
    draft.due_time = at.as_deref().map(parse_due_time).transpose()?;
    draft.project_id = project;
    draft.important = important;
    draft.pinned = pin;
    draft.assignees = assignees;

    let task = engine.create_task(draft)?;
    Ok(AckOutput::new("added", &task.id, &task.name))
}

pub fn list(data_dir: &Path, team: &str, project: Option<String>) -> Result<BoardOutput> {
    let mut engine = open_engine(data_dir, team)?;
    engine.set_project_filter(project)?;

    let today = Local::now().date_naive();
    let frames = engine
        .view(today)
        .into_iter()
        .map(|section| FrameSection {
            frame: section.frame,
            label: section.frame.label().to_string(),
            tasks: section
                .tasks
                .into_iter()
                .map(|view| {
                    let StatusFlags { overdue, mismatch } = view.flags;
                    let t = view.task;
                    CardLine {
                        id: t.id,
                        name: t.name,
                        memo: (!t.memo.is_empty()).then_some(t.memo),
                        due_date: t.due_date,
                        due_time: t.due_time,
                        important: t.important,
                        pinned: t.pinned,
                        overdue,
                        mismatch,
                        project_id: t.project_id,
                        assignees: t.assignees,
                    }
                })
                .collect(),
        })
        .collect();

    Ok(BoardOutput { frames })
}

pub fn move_card(
    data_dir: &Path,
    team: &str,
    id: &str,
    frame: Option<TimeFrame>,
    before: Option<String>,
) -> Result<AckOutput> {
    let mut engine = open_engine(data_dir, team)?;
    let id = resolve_id(&engine, id)?;

    match (frame, before) {
        (_, Some(before)) => {
            let target = resolve_id(&engine, &before)?;
            engine.drag_start(&id);
            engine.drop_on_card(&target)?;
        }
        (Some(frame), None) => {
            engine.drag_start(&id);
            engine.drop_on_zone(frame)?;
        }
        (None, None) => {
            return Err(Error::InvalidInput(
                "specify --frame, --before, or both".to_string(),
            ));
        }
    }

    let task = engine
        .board()
        .get(&id)
        .ok_or_else(|| Error::NotFound(id.clone()))?;
    Ok(AckOutput::new("moved", &task.id, &task.name))
}

pub fn done(data_dir: &Path, team: &str, id: &str) -> Result<AckOutput> {
    let mut engine = open_engine(data_dir, team)?;
    let id = resolve_id(&engine, id)?;
    let name = engine
        .board()
        .get(&id)
        .map(|t| t.name.clone())
        .ok_or_else(|| Error::NotFound(id.clone()))?;

    engine.toggle_complete(&id)?;
    save_undo(data_dir, &engine)?;
    Ok(AckOutput::new("completed", &id, &name))
}

pub fn star(data_dir: &Path, team: &str, id: &str) -> Result<AckOutput> {
    let mut engine = open_engine(data_dir, team)?;
    let id = resolve_id(&engine, id)?;
    engine.toggle_important(&id)?;

    let task = engine
        .board()
        .get(&id)
        .ok_or_else(|| Error::NotFound(id.clone()))?;
    let action = if task.important { "starred" } else { "unstarred" };
    Ok(AckOutput::new(action, &task.id, &task.name))
}

pub fn pin(data_dir: &Path, team: &str, id: &str) -> Result<AckOutput> {
    let mut engine = open_engine(data_dir, team)?;
    let id = resolve_id(&engine, id)?;
    engine.toggle_pinned(&id)?;

    let task = engine
        .board()
        .get(&id)
        .ok_or_else(|| Error::NotFound(id.clone()))?;
    let action = if task.pinned { "pinned" } else { "unpinned" };
    Ok(AckOutput::new(action, &task.id, &task.name))
}

pub fn rm(data_dir: &Path, team: &str, id: &str) -> Result<AckOutput> {
    let mut engine = open_engine(data_dir, team)?;
    let id = resolve_id(&engine, id)?;
    let name = engine
        .board()
        .get(&id)
        .map(|t| t.name.clone())
        .ok_or_else(|| Error::NotFound(id.clone()))?;

    engine.delete_task(&id)?;
    save_undo(data_dir, &engine)?;
    Ok(AckOutput::new("deleted", &id, &name))
}

pub fn undo(data_dir: &Path, team: &str) -> Result<UndoOutput> {
    let mut engine = open_engine(data_dir, team)?;

    let output = match engine.undo_last() {
        Ok(entry) => {
            let action = match &entry {
                UndoEntry::CompleteToggle { .. } => "completion",
                UndoEntry::Delete { .. } => "deletion",
            };
            UndoOutput {
                undone: Some(action.to_string()),
                name: Some(entry.task().name.clone()),
            }
        }
        // an empty ledger is a notice, not a failure
        Err(Error::UndoEmpty) => UndoOutput {
            undone: None,
            name: None,
        },
        Err(e) => return Err(e),
    };

    save_undo(data_dir, &engine)?;
    Ok(output)
}

#[allow(clippy::too_many_arguments)]
pub fn edit(
    data_dir: &Path,
    team: &str,
    id: &str,
    name: Option<String>,
    memo: Option<String>,
    due: Option<NaiveDate>,
    clear_due: bool,
    at: Option<String>,
    frame: Option<TimeFrame>,
    project: Option<String>,
    clear_project: bool,
    assignees: Vec<String>,
) -> Result<AckOutput> {
    let mut engine = open_engine(data_dir, team)?;
    let id = resolve_id(&engine, id)?;

    let mut patch = TaskPatch {
        name,
        memo,
        time_frame: frame,
        ..TaskPatch::default()
    };
    if clear_due {
        patch.due_date = Some(None);
        patch.due_time = Some(None);
    } else if let Some(due) = due {
        patch.due_date = Some(Some(due));
    }
    if let Some(raw) = at {
        patch.due_time = Some(Some(parse_due_time(&raw)?));
    }
    if clear_project {
        patch.project_id = Some(None);
    } else if let Some(project) = project {
        patch.project_id = Some(Some(project));
    }
    if !assignees.is_empty() {
        patch.assignees = Some(assignees);
    }

    if patch.is_noop() {
        return Err(Error::InvalidInput("nothing to edit".to_string()));
    }

    engine.update_task(&id, &patch)?;

    let task = engine
        .board()
        .get(&id)
        .ok_or_else(|| Error::NotFound(id.clone()))?;
    Ok(AckOutput::new("edited", &task.id, &task.name))
}
