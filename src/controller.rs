//! One controller per board on the page.
//!
//! The controller owns the [`Board`] and the active [`DragSession`] and is the
//! only thing that mutates them. Every host interaction arrives through
//! [`BoardController::handle`]. Moves are applied locally first and persisted
//! on a spawned task; a failed save is logged and alerted but never rolled
//! back.

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::api::BoardApi;
use crate::board::{Board, MoveKind, MoveOutcome};
use crate::drag::{CardBox, DragSession, DragState};
use crate::error::{ApiError, BoardError, ControllerError};
use crate::render::render_card;
use crate::task::{NewTask, Status, TaskDetails, TaskId};
use crate::view::BoardView;
use crate::wire::UpdateTaskRequest;

// ── Events ─────────────────────────────────────────────────────

/// Everything the host can report about user interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardEvent {
    DragStart { card: TaskId },
    /// Pointer over a column, with the geometry of the cards it shows.
    DragOver {
        column: Status,
        pointer_y: f64,
        boxes: Vec<CardBox>,
    },
    /// Released over `column`, or outside every column when `None`.
    Drop { column: Option<Status> },
    /// Gesture ended. Cancels the drag unless a drop already finished it.
    DragEnd,
    Click { card: TaskId, on_delete_control: bool },
    ToggleColumn(Status),
}

/// What a click on a card means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Delete,
    OpenDetails,
}

impl Action {
    pub fn for_click(on_delete_control: bool) -> Self {
        if on_delete_control {
            Action::Delete
        } else {
            Action::OpenDetails
        }
    }
}

// ── Controller ─────────────────────────────────────────────────

pub struct BoardController {
    board: Board,
    drag: DragSession,
    api: Arc<dyn BoardApi>,
    view: Arc<dyn BoardView>,
    persist_reorders: bool,
    pending: Vec<JoinHandle<()>>,
}

impl BoardController {
    pub fn new(board: Board, api: Arc<dyn BoardApi>, view: Arc<dyn BoardView>) -> Self {
        BoardController {
            board,
            drag: DragSession::new(),
            api,
            view,
            persist_reorders: true,
            pending: Vec::new(),
        }
    }

    /// Whether drops that only reorder a column are saved.
    pub fn with_persist_reorders(mut self, persist: bool) -> Self {
        self.persist_reorders = persist;
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn drag(&self) -> &DragSession {
        &self.drag
    }

    /// Single entry point for host events.
    pub async fn handle(&mut self, event: BoardEvent) -> Result<(), ControllerError> {
        match event {
            BoardEvent::DragStart { card } => self.drag_start(&card)?,
            BoardEvent::DragOver { column, pointer_y, boxes } => self.drag_over(column, &boxes, pointer_y)?,
            BoardEvent::Drop { column } => self.drop_on(column)?,
            BoardEvent::DragEnd => self.drag_end(),
            BoardEvent::Click { card, on_delete_control } => match Action::for_click(on_delete_control) {
                Action::Delete => {
                    self.delete_task(&card).await?;
                }
                Action::OpenDetails => {
                    self.open_details(&card).await?;
                }
            },
            BoardEvent::ToggleColumn(column) => {
                let visible = self.board.toggle_visibility(column)?;
                self.view.set_column_visible(column, visible);
            }
        }
        Ok(())
    }

    // ── Rendering ──────────────────────────────────────────────

    /// Push every column and the count badges to the view.
    pub fn render_all(&self) {
        for column in self.board.layout().columns() {
            self.render_column(*column);
        }
        self.render_counts();
    }

    fn render_column(&self, column: Status) {
        let cards: Vec<(TaskId, String)> = self
            .drag
            .preview(&self.board, column)
            .into_iter()
            .filter_map(|id| {
                let markup = render_card(self.board.task(&id)?);
                Some((id, markup))
            })
            .collect();
        self.view.render_column(column, &cards);
    }

    fn render_counts(&self) {
        self.view.render_counts(&self.board.counts());
    }

    // ── Drag and drop ──────────────────────────────────────────

    fn drag_start(&mut self, card: &TaskId) -> Result<(), BoardError> {
        let origin = self.drag.start(&self.board, card)?;
        debug!(task = %card, column = %origin.column, index = origin.index, "drag started");
        self.view.set_dragging(card, true);
        Ok(())
    }

    fn drag_over(&mut self, column: Status, boxes: &[CardBox], pointer_y: f64) -> Result<(), BoardError> {
        let left = self.drag.hover(&self.board, column, boxes, pointer_y)?;
        if let Some(left) = left {
            self.render_column(left);
        }
        if let Some((origin, _)) = self.drag.card().and_then(|c| self.board.locate(c)) {
            if origin != column && Some(origin) != left {
                self.render_column(origin);
            }
        }
        self.render_column(column);
        Ok(())
    }

    fn drop_on(&mut self, column: Option<Status>) -> Result<(), ControllerError> {
        let card = self.drag.card().cloned().ok_or(BoardError::NoActiveDrag)?;
        let hovered = match self.drag.state() {
            DragState::Hovering { column, .. } => Some(*column),
            _ => None,
        };
        let target = self.drag.finish(&self.board, column)?;
        self.view.set_dragging(&card, false);

        match target {
            Some(target) => {
                let outcome = self.move_task(&target.card, target.column, target.index)?;
                // The preview may still show the card in a column it only passed over.
                if let Some(hovered) = hovered.filter(|h| *h != outcome.from && *h != outcome.to) {
                    self.render_column(hovered);
                }
            }
            None => {
                debug!(task = %card, "drop outside the board, drag cancelled");
                self.render_all();
            }
        }
        Ok(())
    }

    fn drag_end(&mut self) {
        if let Some(card) = self.drag.cancel() {
            debug!(task = %card, "drag ended without a drop");
            self.view.set_dragging(&card, false);
            self.render_all();
        }
    }

    /// Apply a move to the board, refresh the view and schedule the save.
    /// Must run inside a tokio runtime.
    pub fn move_task(&mut self, card: &TaskId, to: Status, index: usize) -> Result<MoveOutcome, BoardError> {
        let outcome = self.board.move_task(card, to, index)?;
        self.render_column(outcome.from);
        if outcome.to != outcome.from {
            self.render_column(outcome.to);
        }
        self.render_counts();
        self.persist(&outcome);
        Ok(outcome)
    }

    fn persist(&mut self, outcome: &MoveOutcome) {
        let save = match outcome.kind {
            MoveKind::StatusChange => true,
            MoveKind::Reorder => self.persist_reorders,
            MoveKind::Unchanged => false,
        };
        if !save {
            debug!(task = %outcome.task, kind = ?outcome.kind, "move not persisted");
            return;
        }

        let request = UpdateTaskRequest {
            task_id: outcome.task.clone(),
            new_status: outcome.to,
            new_order_list: outcome.order.clone(),
        };
        let api = Arc::clone(&self.api);
        let view = Arc::clone(&self.view);

        self.pending.retain(|handle| !handle.is_finished());
        self.pending.push(tokio::spawn(async move {
            match api.update_task(&request).await {
                Ok(()) => info!(task = %request.task_id, status = %request.new_status, "move saved"),
                Err(e) => {
                    error!(task = %request.task_id, error = %e, "failed to save move");
                    view.alert(&format!("Could not save the move: {e}"));
                }
            }
        }));
    }

    /// Wait for every save spawned so far. Hosts that exit right after a
    /// move call this; the interactive path never does.
    pub async fn settle(&mut self) {
        for handle in self.pending.drain(..) {
            if let Err(e) = handle.await {
                warn!(error = %e, "save task did not complete");
            }
        }
    }

    // ── Backend operations ─────────────────────────────────────

    /// Create a task and append the backend's copy to its column, or to the
    /// layout's first column when its status is not on this board.
    pub async fn create_task(&mut self, new: &NewTask) -> Result<TaskId, ControllerError> {
        let layout = self.board.layout();
        let mut record = match self.api.create_task(new, layout).await {
            Ok(record) => record,
            Err(e) => {
                error!(error = %e, "failed to create task");
                self.view.alert(&format!("Could not create the task: {e}"));
                return Err(e.into());
            }
        };

        let on_board = record
            .status
            .as_deref()
            .and_then(|s| s.parse::<Status>().ok())
            .is_some_and(|s| self.board.has_column(s));
        if !on_board {
            record.status = None;
        }

        let task = record
            .into_task(Some(layout.default_column().as_str()))
            .map_err(|e| ApiError::Server { status: 200, message: e.to_string() })?;
        let id = task.id.clone();
        let column = task.status;
        self.board.push(task)?;

        info!(task = %id, column = %column, "task created");
        self.render_column(column);
        self.render_counts();
        Ok(id)
    }

    /// Delete after confirmation. `Ok(false)` when the user declined.
    pub async fn delete_task(&mut self, card: &TaskId) -> Result<bool, ControllerError> {
        let title = self
            .board
            .task(card)
            .map(|t| t.title.clone())
            .ok_or_else(|| BoardError::TaskNotFound(card.clone()))?;

        if !self.view.confirm(&format!("Delete \"{title}\"?")) {
            debug!(task = %card, "delete declined");
            return Ok(false);
        }

        if let Err(e) = self.api.delete_task(card).await {
            error!(task = %card, error = %e, "failed to delete task");
            self.view.alert(&format!("Could not delete the task: {e}"));
            return Err(e.into());
        }

        let task = self.board.remove(card)?;
        info!(task = %card, "task deleted");
        self.render_column(task.status);
        self.render_counts();
        Ok(true)
    }

    /// Fetch and show a task's details. Never touches the board.
    pub async fn open_details(&self, card: &TaskId) -> Result<TaskDetails, ControllerError> {
        match self.api.task_details(card).await {
            Ok(details) => {
                self.view.show_details(&details);
                Ok(details)
            }
            Err(e) => {
                error!(task = %card, error = %e, "failed to load task details");
                self.view.alert(&format!("Could not load the task: {e}"));
                Err(e.into())
            }
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardLayout;
    use crate::wire::TaskRecord;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Column(Status, Vec<String>),
        Counts(Vec<(Status, usize)>),
        Dragging(String, bool),
        Visible(Status, bool),
        Details(String),
        Alert(String),
    }

    struct RecordingView {
        calls: Mutex<Vec<Call>>,
        confirm: bool,
    }

    impl RecordingView {
        fn new(confirm: bool) -> Arc<Self> {
            Arc::new(RecordingView { calls: Mutex::new(Vec::new()), confirm })
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn alerts(&self) -> usize {
            self.calls().iter().filter(|c| matches!(c, Call::Alert(_))).count()
        }

        fn last_counts(&self) -> Option<Vec<(Status, usize)>> {
            self.calls().into_iter().rev().find_map(|c| match c {
                Call::Counts(counts) => Some(counts),
                _ => None,
            })
        }

        fn last_column(&self, column: Status) -> Option<Vec<String>> {
            self.calls().into_iter().rev().find_map(|c| match c {
                Call::Column(id, cards) if id == column => Some(cards),
                _ => None,
            })
        }
    }

    impl BoardView for RecordingView {
        fn render_column(&self, column: Status, cards: &[(TaskId, String)]) {
            let ids = cards.iter().map(|(id, _)| id.to_string()).collect();
            self.calls.lock().unwrap().push(Call::Column(column, ids));
        }
        fn render_counts(&self, counts: &[(Status, usize)]) {
            self.calls.lock().unwrap().push(Call::Counts(counts.to_vec()));
        }
        fn set_dragging(&self, card: &TaskId, dragging: bool) {
            self.calls.lock().unwrap().push(Call::Dragging(card.to_string(), dragging));
        }
        fn set_column_visible(&self, column: Status, visible: bool) {
            self.calls.lock().unwrap().push(Call::Visible(column, visible));
        }
        fn show_details(&self, details: &TaskDetails) {
            self.calls.lock().unwrap().push(Call::Details(details.title.clone()));
        }
        fn alert(&self, message: &str) {
            self.calls.lock().unwrap().push(Call::Alert(message.to_string()));
        }
        fn confirm(&self, _prompt: &str) -> bool {
            self.confirm
        }
    }

    #[derive(Default)]
    struct FakeApi {
        updates: Mutex<Vec<UpdateTaskRequest>>,
        deletes: Mutex<Vec<TaskId>>,
        fail: bool,
        created: Option<serde_json::Value>,
    }

    impl FakeApi {
        fn failure() -> ApiError {
            ApiError::Server { status: 500, message: "unexpected status 500".into() }
        }
    }

    #[async_trait]
    impl BoardApi for FakeApi {
        async fn update_task(&self, request: &UpdateTaskRequest) -> Result<(), ApiError> {
            self.updates.lock().unwrap().push(request.clone());
            if self.fail { Err(Self::failure()) } else { Ok(()) }
        }

        async fn create_task(&self, _task: &NewTask, _layout: BoardLayout) -> Result<TaskRecord, ApiError> {
            match (&self.created, self.fail) {
                (Some(value), false) => Ok(serde_json::from_value(value.clone()).unwrap()),
                _ => Err(Self::failure()),
            }
        }

        async fn delete_task(&self, id: &TaskId) -> Result<(), ApiError> {
            self.deletes.lock().unwrap().push(id.clone());
            if self.fail { Err(Self::failure()) } else { Ok(()) }
        }

        async fn task_details(&self, id: &TaskId) -> Result<TaskDetails, ApiError> {
            if self.fail {
                return Err(Self::failure());
            }
            Ok(TaskDetails { id: Some(id.clone()), title: format!("Task {id}"), ..Default::default() })
        }
    }

    fn board() -> Board {
        Board::from_snapshot(
            BoardLayout::General,
            &json!({
                "todo":  [{ "id": 1, "title": "A" }, { "id": 2, "title": "B" }, { "id": 3, "title": "C" }],
                "doing": [{ "id": 4, "title": "D" }],
                "done":  []
            }),
        )
    }

    fn controller(api: FakeApi, view: &Arc<RecordingView>) -> (BoardController, Arc<FakeApi>) {
        let api = Arc::new(api);
        let ctl = BoardController::new(board(), api.clone(), view.clone());
        (ctl, api)
    }

    fn id(s: &str) -> TaskId {
        TaskId::new(s)
    }

    fn stacked(ids: &[&str]) -> Vec<CardBox> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| CardBox::new(*id, 50.0 + 100.0 * i as f64, 100.0))
            .collect()
    }

    #[tokio::test]
    async fn drop_across_columns_persists_destination_order() {
        let view = RecordingView::new(true);
        let (mut ctl, api) = controller(FakeApi::default(), &view);

        ctl.handle(BoardEvent::DragStart { card: id("2") }).await.unwrap();
        ctl.handle(BoardEvent::DragOver { column: Status::Doing, pointer_y: 10.0, boxes: stacked(&["4"]) })
            .await
            .unwrap();
        ctl.handle(BoardEvent::Drop { column: Some(Status::Doing) }).await.unwrap();
        ctl.handle(BoardEvent::DragEnd).await.unwrap();
        ctl.settle().await;

        assert_eq!(ctl.board().task(&id("2")).unwrap().status, Status::Doing);
        assert_eq!(
            *api.updates.lock().unwrap(),
            vec![UpdateTaskRequest { task_id: id("2"), new_status: Status::Doing, new_order_list: vec![id("2"), id("4")] }]
        );
        assert_eq!(
            view.last_counts(),
            Some(vec![(Status::Todo, 2), (Status::Doing, 2), (Status::Done, 0)])
        );
        assert!(ctl.drag().is_idle());
        assert_eq!(view.alerts(), 0);
    }

    #[tokio::test]
    async fn hover_previews_without_mutating_board() {
        let view = RecordingView::new(true);
        let (mut ctl, _) = controller(FakeApi::default(), &view);
        let before = ctl.board().clone();

        ctl.handle(BoardEvent::DragStart { card: id("4") }).await.unwrap();
        ctl.handle(BoardEvent::DragOver { column: Status::Todo, pointer_y: 150.0, boxes: stacked(&["1", "2", "3"]) })
            .await
            .unwrap();

        assert_eq!(view.last_column(Status::Todo), Some(vec!["1".into(), "4".into(), "2".into(), "3".into()]));
        assert_eq!(view.last_column(Status::Doing), Some(vec![]));
        assert_eq!(*ctl.board(), before);
    }

    #[tokio::test]
    async fn cancelled_drag_leaves_board_identical() {
        let view = RecordingView::new(true);
        let (mut ctl, api) = controller(FakeApi::default(), &view);
        let before = ctl.board().clone();

        ctl.handle(BoardEvent::DragStart { card: id("1") }).await.unwrap();
        ctl.handle(BoardEvent::DragOver { column: Status::Done, pointer_y: 0.0, boxes: vec![] })
            .await
            .unwrap();
        ctl.handle(BoardEvent::Drop { column: None }).await.unwrap();
        ctl.settle().await;

        assert_eq!(*ctl.board(), before);
        assert!(api.updates.lock().unwrap().is_empty());
        assert_eq!(view.last_column(Status::Todo), Some(vec!["1".into(), "2".into(), "3".into()]));
        assert!(view.calls().contains(&Call::Dragging("1".into(), false)));
    }

    #[tokio::test]
    async fn drop_elsewhere_clears_hovered_column() {
        let view = RecordingView::new(true);
        let (mut ctl, _) = controller(FakeApi::default(), &view);

        ctl.handle(BoardEvent::DragStart { card: id("1") }).await.unwrap();
        ctl.handle(BoardEvent::DragOver { column: Status::Doing, pointer_y: 500.0, boxes: stacked(&["4"]) })
            .await
            .unwrap();
        assert_eq!(view.last_column(Status::Doing), Some(vec!["4".into(), "1".into()]));

        ctl.handle(BoardEvent::Drop { column: Some(Status::Done) }).await.unwrap();
        ctl.settle().await;

        assert_eq!(view.last_column(Status::Doing), Some(vec!["4".into()]));
        assert_eq!(view.last_column(Status::Done), Some(vec!["1".into()]));
        assert_eq!(view.last_column(Status::Todo), Some(vec!["2".into(), "3".into()]));
        assert_eq!(ctl.board().task(&id("1")).unwrap().status, Status::Done);
    }

    #[tokio::test]
    async fn drag_end_without_drop_cancels() {
        let view = RecordingView::new(true);
        let (mut ctl, api) = controller(FakeApi::default(), &view);
        let before = ctl.board().clone();

        ctl.handle(BoardEvent::DragStart { card: id("3") }).await.unwrap();
        ctl.handle(BoardEvent::DragEnd).await.unwrap();

        assert!(ctl.drag().is_idle());
        assert_eq!(*ctl.board(), before);
        assert!(api.updates.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn second_drag_start_is_rejected() {
        let view = RecordingView::new(true);
        let (mut ctl, _) = controller(FakeApi::default(), &view);
        ctl.handle(BoardEvent::DragStart { card: id("1") }).await.unwrap();
        let err = ctl.handle(BoardEvent::DragStart { card: id("2") }).await.unwrap_err();
        assert_eq!(err, ControllerError::Board(BoardError::DragInProgress(id("1"))));
        assert_eq!(ctl.drag().card(), Some(&id("1")));
    }

    #[tokio::test]
    async fn reorder_persistence_follows_setting() {
        let view = RecordingView::new(true);
        let (ctl, api) = controller(FakeApi::default(), &view);
        let mut ctl = ctl.with_persist_reorders(false);

        let outcome = ctl.move_task(&id("1"), Status::Todo, 2).unwrap();
        ctl.settle().await;
        assert_eq!(outcome.kind, MoveKind::Reorder);
        assert!(api.updates.lock().unwrap().is_empty());

        let mut ctl = ctl.with_persist_reorders(true);
        ctl.move_task(&id("1"), Status::Todo, 0).unwrap();
        ctl.settle().await;
        assert_eq!(api.updates.lock().unwrap()[0].new_order_list, vec![id("1"), id("2"), id("3")]);
    }

    #[tokio::test]
    async fn unchanged_drop_is_not_persisted() {
        let view = RecordingView::new(true);
        let (mut ctl, api) = controller(FakeApi::default(), &view);
        let outcome = ctl.move_task(&id("2"), Status::Todo, 1).unwrap();
        ctl.settle().await;
        assert_eq!(outcome.kind, MoveKind::Unchanged);
        assert!(api.updates.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_save_alerts_and_keeps_local_move() {
        let view = RecordingView::new(true);
        let (mut ctl, _) = controller(FakeApi { fail: true, ..Default::default() }, &view);

        ctl.move_task(&id("1"), Status::Done, 0).unwrap();
        ctl.settle().await;

        assert_eq!(ctl.board().task(&id("1")).unwrap().status, Status::Done);
        assert_eq!(view.alerts(), 1);
    }

    #[tokio::test]
    async fn delete_success_removes_card_and_updates_counts() {
        let view = RecordingView::new(true);
        let (mut ctl, api) = controller(FakeApi::default(), &view);

        ctl.handle(BoardEvent::Click { card: id("2"), on_delete_control: true }).await.unwrap();

        assert!(ctl.board().task(&id("2")).is_none());
        assert_eq!(*api.deletes.lock().unwrap(), vec![id("2")]);
        assert_eq!(
            view.last_counts(),
            Some(vec![(Status::Todo, 2), (Status::Doing, 1), (Status::Done, 0)])
        );
    }

    #[tokio::test]
    async fn delete_failure_keeps_card() {
        let view = RecordingView::new(true);
        let (mut ctl, _) = controller(FakeApi { fail: true, ..Default::default() }, &view);

        let err = ctl.delete_task(&id("2")).await.unwrap_err();
        assert!(matches!(err, ControllerError::Api(ApiError::Server { status: 500, .. })));
        assert!(ctl.board().task(&id("2")).is_some());
        assert_eq!(view.alerts(), 1);
        assert_eq!(view.last_counts(), None);
    }

    #[tokio::test]
    async fn declined_delete_sends_nothing() {
        let view = RecordingView::new(false);
        let (mut ctl, api) = controller(FakeApi::default(), &view);
        assert_eq!(ctl.delete_task(&id("1")).await, Ok(false));
        assert!(api.deletes.lock().unwrap().is_empty());
        assert_eq!(ctl.board().len(), 4);
    }

    #[tokio::test]
    async fn click_on_card_body_opens_details() {
        let view = RecordingView::new(true);
        let (mut ctl, _) = controller(FakeApi::default(), &view);
        let before = ctl.board().clone();

        ctl.handle(BoardEvent::Click { card: id("3"), on_delete_control: false }).await.unwrap();

        assert!(view.calls().contains(&Call::Details("Task 3".into())));
        assert_eq!(*ctl.board(), before);
    }

    #[tokio::test]
    async fn created_task_lands_in_its_column() {
        let view = RecordingView::new(true);
        let api = FakeApi {
            created: Some(json!({ "id": 9, "title": "New", "status": "doing" })),
            ..Default::default()
        };
        let (mut ctl, _) = controller(api, &view);

        let id9 = ctl.create_task(&NewTask { title: "New".into(), ..Default::default() }).await.unwrap();

        assert_eq!(id9, id("9"));
        assert_eq!(view.last_column(Status::Doing), Some(vec!["4".into(), "9".into()]));
        assert_eq!(
            view.last_counts(),
            Some(vec![(Status::Todo, 3), (Status::Doing, 2), (Status::Done, 0)])
        );
    }

    #[tokio::test]
    async fn created_task_with_foreign_status_goes_to_default_column() {
        let view = RecordingView::new(true);
        let api = FakeApi {
            created: Some(json!({ "id": 10, "title": "Brief", "status": "briefing" })),
            ..Default::default()
        };
        let (mut ctl, _) = controller(api, &view);

        ctl.create_task(&NewTask { title: "Brief".into(), ..Default::default() }).await.unwrap();
        assert_eq!(ctl.board().task(&id("10")).unwrap().status, Status::Todo);
    }

    #[tokio::test]
    async fn failed_create_alerts() {
        let view = RecordingView::new(true);
        let (mut ctl, _) = controller(FakeApi::default(), &view);
        assert!(ctl.create_task(&NewTask::default()).await.is_err());
        assert_eq!(view.alerts(), 1);
        assert_eq!(ctl.board().len(), 4);
    }

    #[tokio::test]
    async fn toggle_column_reports_visibility() {
        let view = RecordingView::new(true);
        let (mut ctl, _) = controller(FakeApi::default(), &view);
        ctl.handle(BoardEvent::ToggleColumn(Status::Done)).await.unwrap();
        ctl.handle(BoardEvent::ToggleColumn(Status::Done)).await.unwrap();
        assert_eq!(
            view.calls(),
            vec![Call::Visible(Status::Done, false), Call::Visible(Status::Done, true)]
        );
    }

    #[test]
    fn click_dispatch_table() {
        assert_eq!(Action::for_click(true), Action::Delete);
        assert_eq!(Action::for_click(false), Action::OpenDetails);
    }
}
