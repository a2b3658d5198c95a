//! What the controller needs from the host page.
//!
//! The view is shared with spawned save tasks, so it must be `Send + Sync`
//! and every method takes `&self`.

use crate::task::{Status, TaskDetails, TaskId};

pub trait BoardView: Send + Sync {
    /// Replace the cards shown in a column with `cards`, in order. Each entry
    /// is the id and its rendered markup.
    fn render_column(&self, column: Status, cards: &[(TaskId, String)]);

    /// Count badge per column, in layout order.
    fn render_counts(&self, counts: &[(Status, usize)]);

    /// Mark or unmark a card as the one being dragged.
    fn set_dragging(&self, card: &TaskId, dragging: bool);

    fn set_column_visible(&self, column: Status, visible: bool);

    fn show_details(&self, details: &TaskDetails);

    /// User-visible error message.
    fn alert(&self, message: &str);

    /// Blocking yes/no question.
    fn confirm(&self, prompt: &str) -> bool;
}
