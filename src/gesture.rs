//! Gesture state machines for the two input modalities.
//!
//! The presentation layer dispatches raw pointer or touch events into these
//! machines and re-renders from the resulting state. Neither machine
//! mutates the board; drops and affordance taps surface as intents that the
//! engine turns into reorder, move, complete, or delete operations.
//!
//! Pointer drag is used in the default rendering mode; horizontal swipe is
//! used in touch-primary (installed-app) mode. The mode flag is supplied
//! externally.

use crate::models::TimeFrame;

/// Horizontal displacement below this is treated as tap jitter.
pub const SWIPE_JITTER_PX: f64 = 10.0;

/// Net displacement required to open a swipe affordance.
pub const SWIPE_OPEN_PX: f64 = 50.0;

// === Pointer drag ===

/// State of the single pointer-drag session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        /// Task being dragged
        task_id: String,
        /// The one card currently highlighted as a drop target, if any
        over: Option<String>,
    },
}

/// A committed drop, ready for the reorder/move engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropIntent {
    /// Dropped onto another card
    OnCard { task_id: String, target_id: String },
    /// Dropped onto a frame's empty area
    OnZone { task_id: String, frame: TimeFrame },
}

impl DragState {
    /// Begin dragging a card. Any previous session is discarded.
    pub fn start(&mut self, task_id: &str) {
        *self = DragState::Dragging {
            task_id: task_id.to_string(),
            over: None,
        };
    }

    /// Pointer entered a card. At most one card is highlighted at a time;
    /// entering a new target clears the previous highlight. Hovering the
    /// dragged card itself highlights nothing.
    pub fn enter(&mut self, target_id: &str) {
        if let DragState::Dragging { task_id, over } = self {
            if target_id == task_id {
                *over = None;
            } else {
                *over = Some(target_id.to_string());
            }
        }
    }

    /// Pointer left the highlighted card.
    pub fn leave(&mut self) {
        if let DragState::Dragging { over, .. } = self {
            *over = None;
        }
    }

    /// Drop onto a card. Returns the intent unless the session is idle or
    /// the drop targets the dragged card itself (a no-op). The session
    /// always ends and all highlight state clears.
    pub fn drop_on_card(&mut self, target_id: &str) -> Option<DropIntent> {
        let state = std::mem::take(self);
        match state {
            DragState::Dragging { task_id, .. } if task_id != target_id => {
                Some(DropIntent::OnCard {
                    task_id,
                    target_id: target_id.to_string(),
                })
            }
            _ => None,
        }
    }

    /// Drop onto a frame's empty area. The session always ends.
    pub fn drop_on_zone(&mut self, frame: TimeFrame) -> Option<DropIntent> {
        let state = std::mem::take(self);
        match state {
            DragState::Dragging { task_id, .. } => Some(DropIntent::OnZone { task_id, frame }),
            DragState::Idle => None,
        }
    }

    /// Drag ended without a drop. Clears the session and all highlights;
    /// no intent is produced.
    pub fn cancel(&mut self) {
        *self = DragState::Idle;
    }

    /// The task currently being dragged, if any.
    pub fn dragged(&self) -> Option<&str> {
        match self {
            DragState::Dragging { task_id, .. } => Some(task_id),
            DragState::Idle => None,
        }
    }

    /// The card currently highlighted as a drop target, if any.
    pub fn highlighted(&self) -> Option<&str> {
        match self {
            DragState::Dragging { over, .. } => over.as_deref(),
            DragState::Idle => None,
        }
    }
}

// === Touch swipe ===

/// Which affordance an open swipe reveals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    /// Rightward swipe, reveals "complete"
    Right,
    /// Leftward swipe, reveals "delete"
    Left,
}

/// The action behind a revealed affordance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwipeAction {
    Complete { task_id: String },
    Delete { task_id: String },
}

#[derive(Debug, Clone, Default, PartialEq)]
enum SwipePhase {
    #[default]
    Closed,
    Tracking {
        task_id: String,
        start_x: f64,
        current_x: f64,
        /// Set once displacement exceeds the jitter threshold, suppressing
        /// accidental tap-through
        intentional: bool,
    },
    Open {
        task_id: String,
        direction: SwipeDirection,
    },
}

/// Tracker for the single swipe session.
///
/// At most one task is in an open swiped state at a time; opening a new
/// swipe forcibly closes the previous one.
#[derive(Debug, Clone, Default)]
pub struct SwipeTracker {
    phase: SwipePhase,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Touch landed on a card.
    pub fn touch_start(&mut self, task_id: &str, x: f64) {
        self.phase = SwipePhase::Tracking {
            task_id: task_id.to_string(),
            start_x: x,
            current_x: x,
            intentional: false,
        };
    }

    /// Touch moved horizontally.
    pub fn touch_move(&mut self, x: f64) {
        if let SwipePhase::Tracking {
            start_x,
            current_x,
            intentional,
            ..
        } = &mut self.phase
        {
            *current_x = x;
            if (*current_x - *start_x).abs() > SWIPE_JITTER_PX {
                *intentional = true;
            }
        }
    }

    /// Touch lifted. Opens an affordance when the gesture was intentional
    /// and the net displacement clears the threshold; otherwise the session
    /// closes with no visual change.
    pub fn touch_end(&mut self) {
        let SwipePhase::Tracking {
            task_id,
            start_x,
            current_x,
            intentional,
        } = std::mem::take(&mut self.phase)
        else {
            return;
        };

        if !intentional {
            return;
        }

        let diff = current_x - start_x;
        if diff > SWIPE_OPEN_PX {
            self.phase = SwipePhase::Open {
                task_id,
                direction: SwipeDirection::Right,
            };
        } else if diff < -SWIPE_OPEN_PX {
            self.phase = SwipePhase::Open {
                task_id,
                direction: SwipeDirection::Left,
            };
        }
    }

    /// Tap on the revealed affordance. Returns the action to perform and
    /// closes the session.
    pub fn tap_affordance(&mut self) -> Option<SwipeAction> {
        let SwipePhase::Open { task_id, direction } = std::mem::take(&mut self.phase) else {
            return None;
        };
        Some(match direction {
            SwipeDirection::Right => SwipeAction::Complete { task_id },
            SwipeDirection::Left => SwipeAction::Delete { task_id },
        })
    }

    /// Tap anywhere else on an open card. Closes without action.
    pub fn tap_elsewhere(&mut self) {
        self.close();
    }

    /// Close any open or tracking session.
    pub fn close(&mut self) {
        self.phase = SwipePhase::Closed;
    }

    /// The task whose affordance is currently revealed, if any.
    pub fn open_task(&self) -> Option<(&str, SwipeDirection)> {
        match &self.phase {
            SwipePhase::Open { task_id, direction } => Some((task_id.as_str(), *direction)),
            _ => None,
        }
    }
}
