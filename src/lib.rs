//---------------------------------------
pub mod task;
pub mod board;
pub mod drag;
pub mod render;

pub use task::{NewTask, Priority, Status, Task, TaskDetails, TaskId};
pub use board::{Board, BoardLayout, MoveKind, MoveOutcome};
//---------------------------------------

//---------------------------------------
pub mod controller;
pub mod view;

pub use controller::{Action, BoardController, BoardEvent};
pub use view::BoardView;
//---------------------------------------

//---------------------------------------
pub mod upload;

pub use upload::{UploadFields, UploadFile, UploadJob, UploadObserver, UploadPipeline, UploadSummary};
//---------------------------------------

//---------------------------------------
pub mod api;
pub mod wire;

pub use api::{BoardApi, HttpBackend, MediaApi};
//---------------------------------------

//---------------------------------------
pub mod error;
pub mod settings;

pub use error::{ApiError, BoardError, ControllerError, SettingsError, UploadError};
pub use settings::Settings;
//---------------------------------------
