//! The in-memory board: columns in layout order, each holding an ordered
//! list of task ids, plus the task records themselves.
//!
//! All mutations go through methods that keep a task's `status` and the
//! column holding it in agreement. Nothing here talks to the backend.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::error::BoardError;
use crate::task::{Status, Task, TaskId};
use crate::wire::TaskRecord;

// ── Layout ─────────────────────────────────────────────────────

/// Which column set a board shows. The two flows share all code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardLayout {
    #[default]
    General,
    Operational,
}

impl BoardLayout {
    pub fn columns(self) -> &'static [Status] {
        match self {
            BoardLayout::General => &[Status::Todo, Status::Doing, Status::Done],
            BoardLayout::Operational => &[
                Status::Briefing,
                Status::Copy,
                Status::Design,
                Status::InternalApproval,
                Status::ClientApproval,
                Status::Scheduling,
                Status::Published,
            ],
        }
    }

    /// Column that receives newly created tasks.
    pub fn default_column(self) -> Status {
        self.columns()[0]
    }

    /// Value of the `kanban_type` form field.
    pub fn as_str(self) -> &'static str {
        match self {
            BoardLayout::General => "general",
            BoardLayout::Operational => "operational",
        }
    }
}

// ── Column ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub id: Status,
    pub cards: Vec<TaskId>,
    /// Client-local; never persisted.
    pub visible: bool,
}

impl Column {
    fn new(id: Status) -> Self {
        Column { id, cards: Vec::new(), visible: true }
    }

    pub fn position(&self, task: &TaskId) -> Option<usize> {
        self.cards.iter().position(|c| c == task)
    }
}

// ── Moves ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    /// The task landed in a different column.
    StatusChange,
    /// Same column, different position.
    Reorder,
    /// Same column, same position.
    Unchanged,
}

/// What a finalized move did, with everything needed to persist it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub task: TaskId,
    pub from: Status,
    pub to: Status,
    pub index: usize,
    pub kind: MoveKind,
    /// Full destination column after the move.
    pub order: Vec<TaskId>,
}

// ── Board ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    layout: BoardLayout,
    columns: Vec<Column>,
    tasks: HashMap<TaskId, Task>,
}

impl Board {
    pub fn new(layout: BoardLayout) -> Self {
        Board {
            layout,
            columns: layout.columns().iter().map(|&s| Column::new(s)).collect(),
            tasks: HashMap::new(),
        }
    }

    /// Build a board from the snapshot embedded in the page.
    ///
    /// Accepts `{ "todo": [task, ...], ... }` or `[task, ...]`. Each task goes
    /// to the column named by its own `status` (in the mapping form a task
    /// without one inherits its key). Tasks that fail to parse, name a column
    /// this layout does not have, or repeat an id already placed are dropped.
    pub fn from_snapshot(layout: BoardLayout, snapshot: &Value) -> Self {
        let mut board = Board::new(layout);

        match snapshot {
            Value::Array(items) => {
                for item in items {
                    board.admit(item, None);
                }
            }
            Value::Object(columns) => {
                for (key, items) in columns {
                    let Value::Array(items) = items else {
                        debug!(column = %key, "snapshot column is not a list, skipped");
                        continue;
                    };
                    for item in items {
                        board.admit(item, Some(key));
                    }
                }
            }
            other => {
                warn!(kind = value_kind(other), "snapshot is neither a mapping nor a list");
            }
        }

        board
    }

    /// Parse and normalize a JSON snapshot.
    pub fn from_json(layout: BoardLayout, json: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(json)?;
        Ok(Board::from_snapshot(layout, &value))
    }

    fn admit(&mut self, item: &Value, inherited: Option<&str>) {
        let record = match serde_json::from_value::<TaskRecord>(item.clone()) {
            Ok(record) => record,
            Err(e) => {
                debug!(error = %e, "snapshot task unreadable, dropped");
                return;
            }
        };
        let task = match record.into_task(inherited) {
            Ok(task) => task,
            Err(e) => {
                debug!(error = %e, "snapshot task has no usable status, dropped");
                return;
            }
        };
        if self.tasks.contains_key(&task.id) {
            debug!(task = %task.id, "duplicate task in snapshot, dropped");
            return;
        }
        if let Err(e) = self.push(task) {
            debug!(error = %e, "snapshot task not on this board, dropped");
        }
    }

    /// Append a task to the end of the column matching its status.
    pub fn push(&mut self, task: Task) -> Result<(), BoardError> {
        let column = self.column_mut(task.status)?;
        column.cards.push(task.id.clone());
        self.tasks.insert(task.id.clone(), task);
        Ok(())
    }

    /// Remove a task from the board entirely.
    pub fn remove(&mut self, id: &TaskId) -> Result<Task, BoardError> {
        let task = self.tasks.remove(id).ok_or_else(|| BoardError::TaskNotFound(id.clone()))?;
        if let Some(column) = self.columns.iter_mut().find(|c| c.id == task.status) {
            column.cards.retain(|c| c != id);
        }
        Ok(task)
    }

    /// Move a task to `to` at `index`, where `index` counts the destination
    /// cards other than the moved one and is clamped to the end. Status and
    /// column membership change together.
    pub fn move_task(&mut self, id: &TaskId, to: Status, index: usize) -> Result<MoveOutcome, BoardError> {
        let (from, from_index) = self.locate(id).ok_or_else(|| BoardError::TaskNotFound(id.clone()))?;
        if !self.has_column(to) {
            return Err(BoardError::ColumnNotFound(to));
        }

        self.column_mut(from)?.cards.remove(from_index);
        let dest = self.column_mut(to)?;
        let index = index.min(dest.cards.len());
        dest.cards.insert(index, id.clone());
        let order = dest.cards.clone();

        if let Some(task) = self.tasks.get_mut(id) {
            task.status = to;
        }

        let kind = if from != to {
            MoveKind::StatusChange
        } else if from_index != index {
            MoveKind::Reorder
        } else {
            MoveKind::Unchanged
        };

        Ok(MoveOutcome { task: id.clone(), from, to, index, kind, order })
    }

    /// Column and position currently holding a task.
    pub fn locate(&self, id: &TaskId) -> Option<(Status, usize)> {
        let status = self.tasks.get(id)?.status;
        let column = self.columns.iter().find(|c| c.id == status)?;
        Some((status, column.position(id)?))
    }

    pub fn toggle_visibility(&mut self, id: Status) -> Result<bool, BoardError> {
        let column = self.column_mut(id)?;
        column.visible = !column.visible;
        Ok(column.visible)
    }

    /// Card count per column, in layout order.
    pub fn counts(&self) -> Vec<(Status, usize)> {
        self.columns.iter().map(|c| (c.id, c.cards.len())).collect()
    }

    pub fn layout(&self) -> BoardLayout {
        self.layout
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, id: Status) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn has_column(&self, id: Status) -> bool {
        self.column(id).is_some()
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.get(id)
    }

    /// Tasks of a column in display order.
    pub fn tasks_in(&self, id: Status) -> Vec<&Task> {
        self.column(id)
            .map(|c| c.cards.iter().filter_map(|t| self.tasks.get(t)).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn column_mut(&mut self, id: Status) -> Result<&mut Column, BoardError> {
        self.columns
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(BoardError::ColumnNotFound(id))
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ── Tests ──────────────────────────────────────────────────────
