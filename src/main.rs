use clap::{Parser, Subcommand};
use std::error::Error;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use agency_board::drag::CardBox;
use agency_board::render::render_details;
use agency_board::upload::{FileLog, Progress};
use agency_board::{
    Board, BoardController, BoardEvent, BoardView, HttpBackend, Settings, Status, TaskDetails, TaskId, UploadFields,
    UploadFile, UploadJob, UploadObserver, UploadPipeline, UploadSummary,
};

/// Operator tool for the agency kanban board and media uploads.
///
/// Backend address and anti-forgery token come from settings.json and can be
/// overridden with AGENCY_BOARD_BASE_URL and AGENCY_BOARD_CSRF_TOKEN.
#[derive(Parser, Debug)]
#[command(name = "agency-board", version)]
struct Cli {
    /// Settings file
    #[arg(long, global = true, default_value = agency_board::settings::SETTINGS_FILENAME)]
    settings: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Normalize a board snapshot and print counts and card markup
    Show { snapshot: PathBuf },

    /// Drag a card to a column and save the move
    Move {
        snapshot: PathBuf,
        task: String,
        column: Status,
        /// Position among the column's other cards; defaults to the end
        #[arg(long)]
        index: Option<usize>,
    },

    /// Print a task's details
    Details { task: String },

    /// Upload files one by one
    Upload {
        /// Client that owns the files
        #[arg(long)]
        owner: String,
        #[arg(long)]
        folder: Option<String>,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::load_from(&cli.settings)?;
    info!(base_url = %settings.base_url, layout = settings.layout.as_str(), "settings loaded");

    match cli.command {
        Commands::Show { snapshot } => {
            let board = load_board(&settings, &snapshot).await?;
            let view = Arc::new(ConsoleView::default());
            let backend = Arc::new(HttpBackend::new(&settings)?);
            BoardController::new(board, backend, view).render_all();
        }

        Commands::Move { snapshot, task, column, index } => {
            let board = load_board(&settings, &snapshot).await?;
            let view = Arc::new(ConsoleView::default());
            let backend = Arc::new(HttpBackend::new(&settings)?);
            let mut controller =
                BoardController::new(board, backend, view.clone()).with_persist_reorders(settings.persist_reorders);

            let card = TaskId::new(task);
            for event in drag_gesture(controller.board(), &card, column, index) {
                controller.handle(event).await?;
            }
            controller.settle().await;

            if view.alerts() > 0 {
                return Err("move was not saved".into());
            }
        }

        Commands::Details { task } => {
            let view = Arc::new(ConsoleView::default());
            let backend = Arc::new(HttpBackend::new(&settings)?);
            BoardController::new(Board::new(settings.layout), backend, view)
                .open_details(&TaskId::new(task))
                .await?;
        }

        Commands::Upload { owner, folder, files } => {
            let mut queued = Vec::with_capacity(files.len());
            for path in &files {
                queued.push(UploadFile::read(path).await?);
            }
            let fields = UploadFields { owner_id: owner, folder_id: folder, csrf_token: settings.csrf_token.clone() };
            let mut job = UploadJob::new(queued, fields)?;

            let backend = HttpBackend::new(&settings)?;
            let summary = UploadPipeline::new(&backend)
                .with_pace(Duration::from_millis(settings.upload.pace_ms))
                .run(&mut job, &mut ConsoleProgress)
                .await;

            if summary.error_count > 0 {
                return Err(format!("{} of {} uploads failed", summary.error_count, job.len()).into());
            }
        }
    }

    Ok(())
}

async fn load_board(settings: &Settings, path: &Path) -> Result<Board, Box<dyn Error>> {
    let json = tokio::fs::read_to_string(path).await?;
    let board = Board::from_json(settings.layout, &json)?;
    info!(tasks = board.len(), "board loaded");
    Ok(board)
}

/// The events a pointer would produce dragging `card` into `column` so it
/// lands at `index`. Cards are laid out 100 units tall in board order.
fn drag_gesture(board: &Board, card: &TaskId, column: Status, index: Option<usize>) -> Vec<BoardEvent> {
    let others: Vec<&TaskId> = board
        .column(column)
        .map(|c| c.cards.iter().filter(|id| *id != card).collect())
        .unwrap_or_default();
    let boxes = others
        .iter()
        .enumerate()
        .map(|(i, id)| CardBox { id: (*id).clone(), top: i as f64 * 100.0, height: 100.0 })
        .collect();
    let slot = index.unwrap_or(others.len()).min(others.len());

    vec![
        BoardEvent::DragStart { card: card.clone() },
        BoardEvent::DragOver { column, pointer_y: slot as f64 * 100.0, boxes },
        BoardEvent::Drop { column: Some(column) },
        BoardEvent::DragEnd,
    ]
}

// ── Console host ───────────────────────────────────────────────

#[derive(Default)]
struct ConsoleView {
    alerts: AtomicUsize,
}

impl ConsoleView {
    fn alerts(&self) -> usize {
        self.alerts.load(Ordering::SeqCst)
    }
}

impl BoardView for ConsoleView {
    fn render_column(&self, column: Status, cards: &[(TaskId, String)]) {
        println!("── {} ({}) ──", column.label(), cards.len());
        for (_, markup) in cards {
            println!("{markup}");
        }
    }

    fn render_counts(&self, counts: &[(Status, usize)]) {
        let line: Vec<String> = counts.iter().map(|(s, n)| format!("{}: {n}", s.label())).collect();
        println!("{}", line.join(" | "));
    }

    fn set_dragging(&self, _card: &TaskId, _dragging: bool) {}

    fn set_column_visible(&self, column: Status, visible: bool) {
        println!("{} {}", column.label(), if visible { "shown" } else { "hidden" });
    }

    fn show_details(&self, details: &TaskDetails) {
        print!("{}", render_details(details));
    }

    fn alert(&self, message: &str) {
        self.alerts.fetch_add(1, Ordering::SeqCst);
        eprintln!("error: {message}");
    }

    fn confirm(&self, prompt: &str) -> bool {
        print!("{prompt} [y/N] ");
        let _ = std::io::stdout().flush();
        let mut answer = String::new();
        std::io::stdin().read_line(&mut answer).is_ok() && answer.trim().eq_ignore_ascii_case("y")
    }
}

struct ConsoleProgress;

impl UploadObserver for ConsoleProgress {
    fn on_file_done(&mut self, log: &FileLog) {
        println!("{}", log.line());
    }

    fn on_progress(&mut self, progress: Progress) {
        println!("[{:>3}%] {}/{}", progress.percent, progress.completed, progress.total);
    }

    fn on_complete(&mut self, summary: &UploadSummary) {
        println!(
            "{}: {} uploaded, {} failed",
            summary.title(),
            summary.success_count,
            summary.error_count
        );
    }
}
