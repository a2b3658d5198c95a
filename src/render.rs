//! Card markup.
//!
//! Rendering is a pure function of the task: same task, same markup, and the
//! task is only borrowed. Hosts insert the markup into the column container.

use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write;

use crate::task::{Priority, Task, TaskDetails};

pub fn render_card(task: &Task) -> String {
    let id = encode_double_quoted_attribute(task.id.as_str());
    let priority = task.priority.as_str();

    let mut tags = String::new();
    for tag in &task.tags {
        let _ = write!(tags, r#"<span class="context-tag">{}</span>"#, encode_text(tag));
    }

    let post_marker = if task.linked_post.is_some() {
        r#"<i data-feather="image" class="linked-post"></i>"#
    } else {
        ""
    };

    let assignee_title = encode_double_quoted_attribute(task.assignee.as_deref().unwrap_or("Unassigned")).into_owned();
    let project = task
        .project_name
        .as_deref()
        .map(|p| format!(r#"<span class="project-tag">{}</span>"#, encode_text(p)))
        .unwrap_or_default();

    format!(
        concat!(
            r#"<div class="kanban-card" draggable="true" data-id="{id}" data-priority="{priority}">"#,
            r#"<div class="card-header">"#,
            r#"<span class="priority-pill {pill}"><i data-feather="flag"></i> {label}</span>"#,
            r#"<div class="card-actions">"#,
            r#"<button type="button" class="btn-delete-task" data-id="{id}" title="Delete">"#,
            r#"<i data-feather="trash-2"></i></button>"#,
            r#"</div></div>"#,
            r#"<h4 class="kanban-card-title">{title}</h4>"#,
            r#"<div class="card-footer">"#,
            r#"{project}<div class="tags-container">{tags}</div>{post_marker}"#,
            r#"<div class="card-assignee-avatar" title="{assignee_title}">{initials}</div>"#,
            r#"</div></div>"#,
        ),
        id = id,
        priority = priority,
        pill = pill_class(task.priority),
        label = task.priority.label(),
        title = encode_text(&task.title),
        project = project,
        tags = tags,
        post_marker = post_marker,
        assignee_title = assignee_title,
        initials = encode_text(&task.initials()),
    )
}

fn pill_class(priority: Priority) -> &'static str {
    match priority {
        Priority::Low => "priority-low",
        Priority::Medium => "priority-medium",
        Priority::High => "priority-high",
    }
}

/// Plain-text rendering of the details panel, for terminals and logs.
pub fn render_details(details: &TaskDetails) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", details.title);
    let _ = writeln!(out, "  Status:      {}", details.status_display.as_deref().unwrap_or(&details.status));
    let _ = writeln!(out, "  Priority:    {}", details.priority.label());
    let _ = writeln!(out, "  Project:     {}", details.project_name.as_deref().unwrap_or("No project"));
    let _ = writeln!(out, "  Assigned to: {}", details.assignee().unwrap_or("Nobody"));
    if let Some(created) = &details.created_at {
        let _ = writeln!(out, "  Created:     {created}");
    }
    let _ = writeln!(out, "  {}", details.description.as_deref().unwrap_or("No description."));
    out
}

// ── Tests ──────────────────────────────────────────────────────
