//! The board engine: single owner of all mutable board state.
//!
//! `BoardEngine` holds the ordering model, the undo ledger, the gesture
//! sessions, and the persistence store handle. Every mutation is routed
//! through its methods; there is no ambient state. Mutations apply to the
//! in-memory board first (optimistic), then hit the store, and any detected
//! persistence failure is recovered by one reconciliation refetch that
//! replaces the board wholesale - reconciliation always wins over partial
//! batch success and stale in-flight results.

use chrono::{NaiveDate, Utc};

use crate::board::Board;
use crate::gesture::{DragState, DropIntent, SwipeAction, SwipeTracker};
use crate::models::{Task, TaskDraft, TimeFrame};
use crate::status::{self, StatusFlags};
use crate::store::{TaskFilter, TaskPatch, TaskStore};
use crate::undo::{UndoEntry, UndoLedger};
use crate::{Error, Result};

/// One task plus its freshly derived warning flags, ready to draw.
#[derive(Debug, Clone)]
pub struct TaskView {
    pub task: Task,
    pub flags: StatusFlags,
}

/// One frame section of the rendered board.
#[derive(Debug, Clone)]
pub struct FrameView {
    pub frame: TimeFrame,
    pub tasks: Vec<TaskView>,
}

/// The task-board session object.
///
/// Constructed at board-open with an initial fetch, dropped at board-close.
pub struct BoardEngine<S: TaskStore> {
    store: S,
    team_id: String,
    project_filter: Option<String>,
    touch_primary: bool,
    board: Board,
    undo: UndoLedger,
    drag: DragState,
    swipe: SwipeTracker,
}

impl<S: TaskStore> BoardEngine<S> {
    /// Open a board session for a team, fetching its open tasks.
    ///
    /// `touch_primary` selects the active gesture modality: swipe handlers
    /// are live when set, pointer-drag handlers otherwise.
    pub fn open(store: S, team_id: impl Into<String>, touch_primary: bool) -> Result<Self> {
        let mut engine = Self {
            store,
            team_id: team_id.into(),
            project_filter: None,
            touch_primary,
            board: Board::new(),
            undo: UndoLedger::new(),
            drag: DragState::default(),
            swipe: SwipeTracker::new(),
        };
        engine.refresh()?;
        Ok(engine)
    }

    /// Refetch the authoritative task set and replace the board wholesale.
    ///
    /// This is the single reconciliation primitive: every detected
    /// persistence failure funnels here, discarding speculative local
    /// state.
    pub fn refresh(&mut self) -> Result<()> {
        let mut filter = TaskFilter::open_tasks(&self.team_id);
        filter.project_id = self.project_filter.clone();
        let tasks = self.store.fetch_tasks(&filter)?;
        self.board.replace_all(tasks);
        Ok(())
    }

    /// Restrict the board to one project (or clear the restriction).
    pub fn set_project_filter(&mut self, project_id: Option<String>) -> Result<()> {
        self.project_filter = project_id;
        self.refresh()
    }

    /// The current ordering model (read-only).
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Number of undoable actions currently recorded.
    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    /// The undo ledger's entries oldest-first, for persisting across
    /// sessions.
    pub fn undo_snapshot(&self) -> Vec<UndoEntry> {
        self.undo.snapshot()
    }

    /// Replace the undo ledger with a persisted snapshot.
    pub fn restore_undo(&mut self, entries: Vec<UndoEntry>) {
        self.undo = UndoLedger::from_snapshot(entries);
    }

    /// The task currently being dragged, if any.
    pub fn dragged_task(&self) -> Option<&str> {
        self.drag.dragged()
    }

    /// The card currently highlighted as a drop target, if any.
    pub fn highlighted_task(&self) -> Option<&str> {
        self.drag.highlighted()
    }

    /// The task with an open swipe affordance, if any.
    pub fn open_swipe(&self) -> Option<&str> {
        self.swipe.open_task().map(|(id, _)| id)
    }

    /// Freshly recomputed per-frame listing with warning flags.
    ///
    /// Computed from scratch on every call; `today` moves, so nothing here
    /// is cacheable.
    pub fn view(&self, today: NaiveDate) -> Vec<FrameView> {
        TimeFrame::ALL
            .iter()
            .map(|&frame| FrameView {
                frame,
                tasks: self
                    .board
                    .tasks_in(frame)
                    .into_iter()
                    .map(|task| TaskView {
                        task: task.clone(),
                        flags: status::check(task, today),
                    })
                    .collect(),
            })
            .collect()
    }

    // === Task CRUD ===

    /// Create a task from a draft. The name must be non-empty; validation
    /// failures reject before any store call. New tasks rank after
    /// everything currently on the board.
    pub fn create_task(&mut self, mut draft: TaskDraft) -> Result<Task> {
        if draft.name.trim().is_empty() {
            return Err(Error::InvalidInput("task name must not be empty".into()));
        }
        draft.team_id = self.team_id.clone();
        draft.rank = self.board.len() as i64;
        if draft.project_id.is_none() {
            draft.project_id = self.project_filter.clone();
        }

        let task = self.store.insert_task(&draft)?;
        self.refresh()?;
        Ok(task)
    }

    /// Apply an edit to one task. On store failure the board is restored
    /// from source of truth before the error propagates.
    pub fn update_task(&mut self, id: &str, patch: &TaskPatch) -> Result<()> {
        if let Some(name) = &patch.name {
            if name.trim().is_empty() {
                return Err(Error::InvalidInput("task name must not be empty".into()));
            }
        }
        match self.store.update_task(id, patch) {
            Ok(()) => self.refresh(),
            Err(err) => {
                self.refresh()?;
                Err(err)
            }
        }
    }

    /// Flip a task's completion flag, recording an undo snapshot of the
    /// pre-toggle state.
    pub fn toggle_complete(&mut self, id: &str) -> Result<()> {
        let snapshot = self
            .board
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        self.undo.record(UndoEntry::CompleteToggle {
            task: snapshot.clone(),
        });

        let now_completed = !snapshot.completed;
        let patch = TaskPatch::completion(now_completed, now_completed.then(Utc::now));
        match self.store.update_task(id, &patch) {
            Ok(()) => self.refresh(),
            Err(err) => {
                self.refresh()?;
                Err(err)
            }
        }
    }

    /// Flip the importance flag. Optimistic and not undoable.
    pub fn toggle_important(&mut self, id: &str) -> Result<()> {
        let mut updated = self
            .board
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        let flipped = !updated.important;
        updated.important = flipped;
        self.board.upsert(updated);

        let patch = TaskPatch {
            important: Some(flipped),
            ..TaskPatch::default()
        };
        if let Err(err) = self.store.update_task(id, &patch) {
            self.refresh()?;
            return Err(err);
        }
        Ok(())
    }

    /// Flip the pinned flag. Optimistic and not undoable.
    pub fn toggle_pinned(&mut self, id: &str) -> Result<()> {
        let mut updated = self
            .board
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        let flipped = !updated.pinned;
        updated.pinned = flipped;
        self.board.upsert(updated);

        let patch = TaskPatch {
            pinned: Some(flipped),
            ..TaskPatch::default()
        };
        if let Err(err) = self.store.update_task(id, &patch) {
            self.refresh()?;
            return Err(err);
        }
        Ok(())
    }

    /// Delete a task. The store row goes first; only a successful delete
    /// records the undo snapshot and drops the task from the board.
    pub fn delete_task(&mut self, id: &str) -> Result<()> {
        let snapshot = self
            .board
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        self.store.delete_task(id)?;

        self.undo.record(UndoEntry::Delete { task: snapshot });
        self.board.remove(id);
        Ok(())
    }

    // === Pointer drag ===

    /// Drag started over a task card.
    pub fn drag_start(&mut self, id: &str) {
        if self.board.get(id).is_some() {
            self.drag.start(id);
        }
    }

    /// Pointer entered another card while dragging.
    pub fn drag_enter(&mut self, target_id: &str) {
        self.drag.enter(target_id);
    }

    /// Pointer left the highlighted card.
    pub fn drag_leave(&mut self) {
        self.drag.leave();
    }

    /// Drag ended without a valid drop. No persistence call is issued.
    pub fn drag_cancel(&mut self) {
        self.drag.cancel();
    }

    /// Drop the dragged task onto another card. Same-frame drops reorder;
    /// cross-frame drops move the task before the target.
    pub fn drop_on_card(&mut self, target_id: &str) -> Result<()> {
        let Some(DropIntent::OnCard { task_id, target_id }) = self.drag.drop_on_card(target_id)
        else {
            return Ok(());
        };

        let (source_frame, target_frame) = {
            let Some(dragged) = self.board.get(&task_id) else {
                return Ok(());
            };
            let Some(target) = self.board.get(&target_id) else {
                return Ok(());
            };
            (dragged.time_frame, target.time_frame)
        };

        if source_frame == target_frame {
            self.reorder_same_frame(source_frame, &task_id, &target_id)
        } else {
            self.move_task(&task_id, target_frame, Some(&target_id))
        }
    }

    /// Drop the dragged task onto a frame's empty area: append to the end
    /// of that frame. Dropping into the task's own frame is a no-op (the
    /// card-level drop already covers in-frame reordering).
    pub fn drop_on_zone(&mut self, frame: TimeFrame) -> Result<()> {
        let Some(DropIntent::OnZone { task_id, frame }) = self.drag.drop_on_zone(frame) else {
            return Ok(());
        };

        let Some(dragged) = self.board.get(&task_id) else {
            return Ok(());
        };
        if dragged.time_frame == frame {
            return Ok(());
        }

        self.move_task(&task_id, frame, None)
    }

    /// Same-frame reorder: reinsert the dragged id immediately before the
    /// target, reassign 0-based ranks, then issue one rank-only update per
    /// frame member. Any failure in the batch triggers one reconciliation
    /// fetch. A drop that changes nothing issues zero store calls.
    fn reorder_same_frame(&mut self, frame: TimeFrame, dragged_id: &str, target_id: &str) -> Result<()> {
        let mut ids: Vec<String> = self
            .board
            .tasks_in(frame)
            .iter()
            .map(|t| t.id.clone())
            .collect();
        let before = ids.clone();

        let Some(from) = ids.iter().position(|id| id == dragged_id) else {
            return Ok(());
        };
        ids.remove(from);
        let to = ids
            .iter()
            .position(|id| id == target_id)
            .unwrap_or(ids.len());
        ids.insert(to, dragged_id.to_string());

        if ids == before {
            return Ok(());
        }

        let id_refs: Vec<&str> = ids.iter().map(|s| s.as_str()).collect();
        self.board.reorder_within(frame, &id_refs)?;

        // fire the batch; failures are detected in aggregate
        let mut batch_failed = false;
        for (rank, id) in ids.iter().enumerate() {
            if self
                .store
                .update_task(id, &TaskPatch::rank(rank as i64))
                .is_err()
            {
                batch_failed = true;
            }
        }
        if batch_failed {
            self.refresh()?;
        }
        Ok(())
    }

    /// Cross-frame move: apply to the board, then issue a single update
    /// carrying both the new frame and the new rank. Failure triggers
    /// reconciliation.
    fn move_task(&mut self, id: &str, frame: TimeFrame, before_id: Option<&str>) -> Result<()> {
        let rank = self.board.move_to_frame(id, frame, before_id)?;

        if self
            .store
            .update_task(id, &TaskPatch::placement(frame, rank))
            .is_err()
        {
            self.refresh()?;
        }
        Ok(())
    }

    // === Touch swipe ===

    /// Touch landed on a card. Only live in touch-primary mode. Opening a
    /// new swipe closes any other task's open affordance.
    pub fn touch_start(&mut self, id: &str, x: f64) {
        if !self.touch_primary {
            return;
        }
        self.swipe.touch_start(id, x);
    }

    /// Touch moved.
    pub fn touch_move(&mut self, x: f64) {
        if !self.touch_primary {
            return;
        }
        self.swipe.touch_move(x);
    }

    /// Touch lifted; may reveal a complete/delete affordance.
    pub fn touch_end(&mut self) {
        if !self.touch_primary {
            return;
        }
        self.swipe.touch_end();
    }

    /// Tap on the revealed affordance. Returns the action for the caller
    /// to confirm (delete) or perform directly via `swipe_complete` /
    /// `swipe_delete`. Closes the swipe.
    pub fn tap_affordance(&mut self) -> Option<SwipeAction> {
        self.swipe.tap_affordance()
    }

    /// Tap on the card body while a swipe is open: just close it.
    pub fn tap_elsewhere(&mut self) {
        self.swipe.tap_elsewhere();
    }

    /// Complete a task from its swipe affordance, with an undo record.
    /// Unlike the checkbox toggle this always marks the task completed.
    pub fn swipe_complete(&mut self, id: &str) -> Result<()> {
        let snapshot = self
            .board
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        self.undo.record(UndoEntry::CompleteToggle {
            task: snapshot,
        });

        let patch = TaskPatch::completion(true, Some(Utc::now()));
        let result = match self.store.update_task(id, &patch) {
            Ok(()) => self.refresh(),
            Err(err) => {
                self.refresh()?;
                Err(err)
            }
        };
        self.swipe.close();
        result
    }

    /// Delete a task from its swipe affordance, with an undo record.
    /// Callers confirm with the user before invoking this.
    pub fn swipe_delete(&mut self, id: &str) -> Result<()> {
        let result = self.delete_task(id);
        self.swipe.close();
        result
    }

    // === Undo ===

    /// Replay the most recent undoable action. Each invocation consumes
    /// exactly one ledger entry; an empty ledger surfaces `UndoEmpty`,
    /// which callers treat as a notice rather than a failure.
    ///
    /// A completion toggle is reversed by persisting the snapshot's flag
    /// and timestamp verbatim. A deletion is reversed by inserting a new
    /// row from the snapshot - the store assigns a fresh id, so the old
    /// identity does not survive.
    pub fn undo_last(&mut self) -> Result<UndoEntry> {
        let entry = self.undo.pop()?;

        match &entry {
            UndoEntry::CompleteToggle { task } => {
                let patch = TaskPatch::completion(task.completed, task.completed_at);
                self.store.update_task(&task.id, &patch)?;
            }
            UndoEntry::Delete { task } => {
                self.store.insert_task(&TaskDraft::from_snapshot(task))?;
            }
        }

        self.refresh()?;
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Store wrapper that counts update calls and can fail them on demand.
    struct FlakyStore {
        inner: SqliteStore,
        fail_updates: Rc<Cell<bool>>,
        update_calls: Rc<Cell<usize>>,
    }

    impl FlakyStore {
        fn new() -> (Self, Rc<Cell<bool>>, Rc<Cell<usize>>) {
            let fail_updates = Rc::new(Cell::new(false));
            let update_calls = Rc::new(Cell::new(0));
            let store = Self {
                inner: SqliteStore::open_in_memory().unwrap(),
                fail_updates: fail_updates.clone(),
                update_calls: update_calls.clone(),
            };
            (store, fail_updates, update_calls)
        }
    }

    impl TaskStore for FlakyStore {
        fn fetch_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
            self.inner.fetch_tasks(filter)
        }

        fn insert_task(&mut self, draft: &TaskDraft) -> Result<Task> {
            self.inner.insert_task(draft)
        }

        fn update_task(&mut self, id: &str, patch: &TaskPatch) -> Result<()> {
            self.update_calls.set(self.update_calls.get() + 1);
            if self.fail_updates.get() {
                return Err(Error::InvalidInput("injected update failure".into()));
            }
            self.inner.update_task(id, patch)
        }

        fn delete_task(&mut self, id: &str) -> Result<()> {
            self.inner.delete_task(id)
        }
    }

    fn seeded_engine(
        seed: &[(&str, TimeFrame)],
    ) -> (
        BoardEngine<FlakyStore>,
        Vec<String>,
        Rc<Cell<bool>>,
        Rc<Cell<usize>>,
    ) {
        let (mut store, fail, calls) = FlakyStore::new();
        let mut ids = Vec::new();
        let mut next_rank = std::collections::HashMap::new();
        for (name, frame) in seed {
            let rank = next_rank.entry(*frame).or_insert(0i64);
            let mut draft = TaskDraft::new("team", *name);
            draft.time_frame = *frame;
            draft.rank = *rank;
            *rank += 1;
            ids.push(store.insert_task(&draft).unwrap().id);
        }
        let engine = BoardEngine::open(store, "team", false).unwrap();
        (engine, ids, fail, calls)
    }

    fn names_in(engine: &BoardEngine<FlakyStore>, frame: TimeFrame) -> Vec<String> {
        engine
            .board()
            .tasks_in(frame)
            .iter()
            .map(|t| t.name.clone())
            .collect()
    }

    #[test]
    fn test_create_rejects_blank_name_before_any_store_call() {
        let (mut engine, _, _, _) = seeded_engine(&[]);
        let err = engine.create_task(TaskDraft::new("team", "   ")).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(engine.board().is_empty());
    }

    #[test]
    fn test_create_ranks_after_existing_tasks() {
        let (mut engine, _, _, _) = seeded_engine(&[
            ("a", TimeFrame::Today),
            ("b", TimeFrame::Tomorrow),
        ]);
        let task = engine.create_task(TaskDraft::new("team", "c")).unwrap();
        assert_eq!(task.rank, 2);
        assert_eq!(engine.board().len(), 3);
    }

    #[test]
    fn test_drop_on_card_reorders_within_frame() {
        let (mut engine, ids, _, calls) = seeded_engine(&[
            ("a", TimeFrame::Today),
            ("b", TimeFrame::Today),
            ("c", TimeFrame::Today),
        ]);

        engine.drag_start(&ids[1]);
        engine.drop_on_card(&ids[0]).unwrap();

        assert_eq!(names_in(&engine, TimeFrame::Today), vec!["b", "a", "c"]);
        // one rank update per frame member
        assert_eq!(calls.get(), 3);

        // persisted: survives a reconciliation fetch
        engine.refresh().unwrap();
        assert_eq!(names_in(&engine, TimeFrame::Today), vec!["b", "a", "c"]);
        let ranks: Vec<i64> = engine
            .board()
            .tasks_in(TimeFrame::Today)
            .iter()
            .map(|t| t.rank)
            .collect();
        assert_eq!(ranks, vec![0, 1, 2]);
    }

    #[test]
    fn test_self_drop_issues_no_store_calls() {
        let (mut engine, ids, _, calls) = seeded_engine(&[("a", TimeFrame::Today)]);
        engine.drag_start(&ids[0]);
        engine.drop_on_card(&ids[0]).unwrap();
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_unchanged_order_issues_no_store_calls() {
        // dropping "a" onto its own successor reinserts it at the same index
        let (mut engine, ids, _, calls) = seeded_engine(&[
            ("a", TimeFrame::Today),
            ("b", TimeFrame::Today),
        ]);
        engine.drag_start(&ids[0]);
        engine.drop_on_card(&ids[1]).unwrap();
        assert_eq!(names_in(&engine, TimeFrame::Today), vec!["a", "b"]);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_drop_on_card_across_frames_lands_before_target() {
        let (mut engine, ids, _, calls) = seeded_engine(&[
            ("a", TimeFrame::Today),
            ("x", TimeFrame::NextWeek),
            ("y", TimeFrame::NextWeek),
        ]);

        engine.drag_start(&ids[0]);
        engine.drop_on_card(&ids[2]).unwrap();

        assert_eq!(names_in(&engine, TimeFrame::NextWeek), vec!["x", "a", "y"]);
        assert!(names_in(&engine, TimeFrame::Today).is_empty());
        // a single placement update for the moved task only
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_zone_drop_appends_to_destination() {
        let (mut engine, ids, _, _) = seeded_engine(&[
            ("a", TimeFrame::Today),
            ("x", TimeFrame::NextWeek),
        ]);

        engine.drag_start(&ids[0]);
        engine.drop_on_zone(TimeFrame::NextWeek).unwrap();

        assert_eq!(names_in(&engine, TimeFrame::NextWeek), vec!["x", "a"]);
    }

    #[test]
    fn test_zone_drop_into_own_frame_is_noop() {
        let (mut engine, ids, _, calls) = seeded_engine(&[
            ("a", TimeFrame::Today),
            ("b", TimeFrame::Today),
        ]);

        engine.drag_start(&ids[1]);
        engine.drop_on_zone(TimeFrame::Today).unwrap();

        assert_eq!(names_in(&engine, TimeFrame::Today), vec!["a", "b"]);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_failed_reorder_batch_reconciles_from_store() {
        let (mut engine, ids, fail, _) = seeded_engine(&[
            ("a", TimeFrame::Today),
            ("b", TimeFrame::Today),
            ("c", TimeFrame::Today),
        ]);

        fail.set(true);
        engine.drag_start(&ids[1]);
        engine.drop_on_card(&ids[0]).unwrap();
        fail.set(false);

        // nothing persisted, so the corrective refetch restores the
        // original order
        assert_eq!(names_in(&engine, TimeFrame::Today), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_failed_move_reconciles_from_store() {
        let (mut engine, ids, fail, _) = seeded_engine(&[
            ("a", TimeFrame::Today),
            ("x", TimeFrame::NextWeek),
        ]);

        fail.set(true);
        engine.drag_start(&ids[0]);
        engine.drop_on_zone(TimeFrame::NextWeek).unwrap();
        fail.set(false);

        assert_eq!(names_in(&engine, TimeFrame::Today), vec!["a"]);
        assert_eq!(names_in(&engine, TimeFrame::NextWeek), vec!["x"]);
    }

    #[test]
    fn test_toggle_complete_drops_task_from_open_board() {
        let (mut engine, ids, _, _) = seeded_engine(&[("a", TimeFrame::Today)]);

        engine.toggle_complete(&ids[0]).unwrap();

        assert!(engine.board().is_empty());
        assert_eq!(engine.undo_len(), 1);
    }

    #[test]
    fn test_undo_of_complete_restores_prior_state() {
        let (mut engine, ids, _, _) = seeded_engine(&[("a", TimeFrame::Today)]);

        engine.toggle_complete(&ids[0]).unwrap();
        let entry = engine.undo_last().unwrap();

        assert!(matches!(entry, UndoEntry::CompleteToggle { .. }));
        assert_eq!(names_in(&engine, TimeFrame::Today), vec!["a"]);
        assert!(!engine.board().get(&ids[0]).unwrap().completed);
    }

    #[test]
    fn test_undo_of_delete_restores_under_a_new_id() {
        let (mut engine, ids, _, _) = seeded_engine(&[("a", TimeFrame::ThisWeek)]);

        engine.delete_task(&ids[0]).unwrap();
        assert!(engine.board().is_empty());

        engine.undo_last().unwrap();

        let restored = &engine.board().tasks_in(TimeFrame::ThisWeek)[0];
        assert_eq!(restored.name, "a");
        assert_ne!(restored.id, ids[0]);
    }

    #[test]
    fn test_undo_on_empty_ledger() {
        let (mut engine, _, _, _) = seeded_engine(&[]);
        assert!(matches!(engine.undo_last(), Err(Error::UndoEmpty)));
    }

    #[test]
    fn test_each_undo_consumes_one_entry() {
        let (mut engine, ids, _, _) = seeded_engine(&[
            ("a", TimeFrame::Today),
            ("b", TimeFrame::Today),
        ]);

        engine.toggle_complete(&ids[0]).unwrap();
        engine.toggle_complete(&ids[1]).unwrap();
        assert_eq!(engine.undo_len(), 2);

        engine.undo_last().unwrap();
        assert_eq!(engine.undo_len(), 1);
        engine.undo_last().unwrap();
        assert_eq!(engine.undo_len(), 0);
    }

    #[test]
    fn test_failed_update_reconciles_then_propagates() {
        let (mut engine, ids, fail, _) = seeded_engine(&[("a", TimeFrame::Today)]);

        fail.set(true);
        let patch = TaskPatch {
            name: Some("renamed".to_string()),
            ..TaskPatch::default()
        };
        let err = engine.update_task(&ids[0], &patch).unwrap_err();
        fail.set(false);

        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(names_in(&engine, TimeFrame::Today), vec!["a"]);
    }

    #[test]
    fn test_toggle_important_is_optimistic_and_not_undoable() {
        let (mut engine, ids, _, _) = seeded_engine(&[("a", TimeFrame::Today)]);

        engine.toggle_important(&ids[0]).unwrap();

        assert!(engine.board().get(&ids[0]).unwrap().important);
        assert_eq!(engine.undo_len(), 0);
    }

    #[test]
    fn test_swipe_complete_via_affordance() {
        let (mut store, _, _) = FlakyStore::new();
        let id = store.insert_task(&TaskDraft::new("team", "a")).unwrap().id;
        let mut engine = BoardEngine::open(store, "team", true).unwrap();

        engine.touch_start(&id, 100.0);
        engine.touch_move(180.0);
        engine.touch_end();
        assert_eq!(engine.open_swipe(), Some(id.as_str()));

        let action = engine.tap_affordance().unwrap();
        assert_eq!(action, SwipeAction::Complete { task_id: id.clone() });

        engine.swipe_complete(&id).unwrap();
        assert!(engine.board().is_empty());
        assert_eq!(engine.undo_len(), 1);
        assert!(engine.open_swipe().is_none());
    }

    #[test]
    fn test_touch_events_ignored_outside_touch_mode() {
        let (mut engine, ids, _, _) = seeded_engine(&[("a", TimeFrame::Today)]);

        engine.touch_start(&ids[0], 100.0);
        engine.touch_move(180.0);
        engine.touch_end();

        assert!(engine.open_swipe().is_none());
        assert!(engine.tap_affordance().is_none());
    }

    #[test]
    fn test_view_groups_by_frame_in_display_order() {
        let (engine, _, _, _) = seeded_engine(&[
            ("later", TimeFrame::LaterMonth),
            ("now", TimeFrame::Today),
        ]);

        let view = engine.view(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(view.len(), 5);
        assert_eq!(view[0].frame, TimeFrame::Today);
        assert_eq!(view[0].tasks[0].task.name, "now");
        assert_eq!(view[4].frame, TimeFrame::LaterMonth);
        assert_eq!(view[4].tasks[0].task.name, "later");
        assert!(view[1].tasks.is_empty());
    }
}
