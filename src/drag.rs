//! Drag-and-drop state machine.
//!
//! ```text
//! Idle ──start──▶ Dragging(card) ──over──▶ Hovering(column, index)
//!  ▲                   │                      │  ▲      │
//!  │                   │                      └──over───┘
//!  └──drop / cancel────┴──────────────────────────────────┘
//! ```
//!
//! The board is never touched while a drag is in flight. Hovering only
//! records where the card would land; [`DragSession::preview`] derives the
//! column order to show from that. The move is applied by the controller on
//! drop, so a cancelled drag cannot leave anything behind.

use crate::board::Board;
use crate::error::BoardError;
use crate::task::{Status, TaskId};

// ── Geometry ───────────────────────────────────────────────────

/// Vertical extent of one rendered card, as measured by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct CardBox {
    pub id: TaskId,
    pub top: f64,
    pub height: f64,
}

impl CardBox {
    pub fn new(id: impl Into<String>, top: f64, height: f64) -> Self {
        CardBox { id: TaskId::new(id), top, height }
    }

    pub fn midpoint(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// Pick the card the dragged one should be inserted before.
///
/// Among the boxes other than `dragged`, this is the one whose midpoint is the
/// smallest value still greater than `pointer_y`. `None` means the end of the
/// column.
pub fn insert_before<'a>(boxes: &'a [CardBox], dragged: &TaskId, pointer_y: f64) -> Option<&'a TaskId> {
    boxes
        .iter()
        .filter(|b| &b.id != dragged)
        .filter(|b| b.midpoint() > pointer_y)
        .min_by(|a, b| a.midpoint().total_cmp(&b.midpoint()))
        .map(|b| &b.id)
}

/// Insertion index within `column` for a pointer at `pointer_y`, counting
/// only the cards other than the dragged one.
///
/// A box the board does not know in that column (stale geometry) resolves to
/// the end of the column.
pub fn insertion_index(board: &Board, column: Status, boxes: &[CardBox], dragged: &TaskId, pointer_y: f64) -> usize {
    let others: Vec<&TaskId> = board
        .column(column)
        .map(|c| c.cards.iter().filter(|id| *id != dragged).collect())
        .unwrap_or_default();

    insert_before(boxes, dragged, pointer_y)
        .and_then(|target| others.iter().position(|id| *id == target))
        .unwrap_or(others.len())
}

// ── State ──────────────────────────────────────────────────────

/// Where the dragged card was when the gesture started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Origin {
    pub column: Status,
    pub index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        card: TaskId,
        origin: Origin,
    },
    Hovering {
        card: TaskId,
        origin: Origin,
        column: Status,
        index: usize,
    },
}

/// Where a drop should land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTarget {
    pub card: TaskId,
    pub column: Status,
    pub index: usize,
}

/// The single active drag of a board.
#[derive(Debug, Default)]
pub struct DragSession {
    state: DragState,
}

impl DragSession {
    pub fn new() -> Self {
        DragSession::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == DragState::Idle
    }

    /// Card being dragged, if any.
    pub fn card(&self) -> Option<&TaskId> {
        match &self.state {
            DragState::Idle => None,
            DragState::Dragging { card, .. } | DragState::Hovering { card, .. } => Some(card),
        }
    }

    /// `Idle → Dragging`. Only reachable from idle.
    pub fn start(&mut self, board: &Board, card: &TaskId) -> Result<Origin, BoardError> {
        if let Some(active) = self.card() {
            return Err(BoardError::DragInProgress(active.clone()));
        }
        let (column, index) = board
            .locate(card)
            .ok_or_else(|| BoardError::TaskNotFound(card.clone()))?;
        let origin = Origin { column, index };
        self.state = DragState::Dragging { card: card.clone(), origin };
        Ok(origin)
    }

    /// `Dragging|Hovering → Hovering`, recomputing the insertion index.
    /// Returns the column previously hovered, if it differs from this one.
    pub fn hover(
        &mut self,
        board: &Board,
        column: Status,
        boxes: &[CardBox],
        pointer_y: f64,
    ) -> Result<Option<Status>, BoardError> {
        if !board.has_column(column) {
            return Err(BoardError::ColumnNotFound(column));
        }
        let (card, origin, previous) = match &self.state {
            DragState::Idle => return Err(BoardError::NoActiveDrag),
            DragState::Dragging { card, origin } => (card.clone(), *origin, None),
            DragState::Hovering { card, origin, column: prev, .. } => {
                (card.clone(), *origin, Some(*prev).filter(|p| *p != column))
            }
        };
        let index = insertion_index(board, column, boxes, &card, pointer_y);
        self.state = DragState::Hovering { card, origin, column, index };
        Ok(previous)
    }

    /// Finish the gesture over `column`, or cancel it when `column` is `None`.
    ///
    /// Dropping on the hovered column lands at the previewed index; dropping
    /// on a column never hovered lands at its end.
    pub fn finish(&mut self, board: &Board, column: Option<Status>) -> Result<Option<DropTarget>, BoardError> {
        let state = std::mem::take(&mut self.state);
        let target = match (state, column) {
            (DragState::Idle, _) => return Err(BoardError::NoActiveDrag),
            (_, None) => None,
            (_, Some(column)) if !board.has_column(column) => None,
            (DragState::Hovering { card, column: hovered, index, .. }, Some(column)) if hovered == column => {
                Some(DropTarget { card, column, index })
            }
            (DragState::Dragging { card, .. } | DragState::Hovering { card, .. }, Some(column)) => {
                let index = board
                    .column(column)
                    .map(|c| c.cards.iter().filter(|id| **id != card).count())
                    .unwrap_or(0);
                Some(DropTarget { card, column, index })
            }
        };
        Ok(target)
    }

    /// Abandon the gesture. A no-op when idle.
    pub fn cancel(&mut self) -> Option<TaskId> {
        let card = self.card().cloned();
        self.state = DragState::Idle;
        card
    }

    /// Column order to display for `column` while the drag is in flight.
    pub fn preview(&self, board: &Board, column: Status) -> Vec<TaskId> {
        let mut cards: Vec<TaskId> = board.column(column).map(|c| c.cards.clone()).unwrap_or_default();
        if let DragState::Hovering { card, column: hovered, index, .. } = &self.state {
            cards.retain(|id| id != card);
            if *hovered == column {
                let at = (*index).min(cards.len());
                cards.insert(at, card.clone());
            }
        }
        cards
    }
}

// ── Tests ──────────────────────────────────────────────────────
