use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Identifiers ────────────────────────────────────────────────

/// Opaque task identifier.
///
/// The backend sends ids as JSON numbers or strings depending on the
/// endpoint. Both are accepted and kept as text; the id is never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        TaskId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId(s.to_string())
    }
}

impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Int(n) => TaskId(n.to_string()),
            RawId::Text(s) => TaskId(s),
        })
    }
}

// ── Status ─────────────────────────────────────────────────────

/// Every column identifier either board flow can use.
///
/// General flow:     Todo → Doing → Done
/// Operational flow: Briefing → Copy → Design → InternalApproval
///                   → ClientApproval → Scheduling → Published
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Todo,
    Doing,
    Done,
    Briefing,
    Copy,
    Design,
    InternalApproval,
    ClientApproval,
    Scheduling,
    Published,
}

impl Status {
    pub const ALL: [Status; 10] = [
        Status::Todo,
        Status::Doing,
        Status::Done,
        Status::Briefing,
        Status::Copy,
        Status::Design,
        Status::InternalApproval,
        Status::ClientApproval,
        Status::Scheduling,
        Status::Published,
    ];

    /// Wire identifier, also used as the column's DOM id suffix.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Todo => "todo",
            Status::Doing => "doing",
            Status::Done => "done",
            Status::Briefing => "briefing",
            Status::Copy => "copy",
            Status::Design => "design",
            Status::InternalApproval => "internal_approval",
            Status::ClientApproval => "client_approval",
            Status::Scheduling => "scheduling",
            Status::Published => "published",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Status::Todo => "To do",
            Status::Doing => "In progress",
            Status::Done => "Done",
            Status::Briefing => "Briefing",
            Status::Copy => "Copy",
            Status::Design => "Design",
            Status::InternalApproval => "Internal approval",
            Status::ClientApproval => "Client approval",
            Status::Scheduling => "Scheduling",
            Status::Published => "Published",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown status '{}'", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for Status {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

// ── Priority ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

// Older tasks carry no priority or a value outside the three levels; both
// read as Low.
impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(match raw.as_deref() {
            Some("high") => Priority::High,
            Some("medium") => Priority::Medium,
            _ => Priority::Low,
        })
    }
}

// ── Task ───────────────────────────────────────────────────────

/// A card on the board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub status: Status,
    pub priority: Priority,
    /// Display name of the assignee.
    pub assignee: Option<String>,
    /// Initials precomputed by the backend, when it sends them.
    pub assignee_initials: Option<String>,
    pub tags: Vec<String>,
    /// Linked social post, if the task was created from one.
    pub linked_post: Option<TaskId>,
    pub project_name: Option<String>,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>, status: Status) -> Self {
        Task {
            id: TaskId::new(id),
            title: title.into(),
            description: None,
            status,
            priority: Priority::default(),
            assignee: None,
            assignee_initials: None,
            tags: Vec::new(),
            linked_post: None,
            project_name: None,
        }
    }

    /// Avatar text: backend initials, else the first two characters of the
    /// assignee name, else `--`.
    pub fn initials(&self) -> String {
        if let Some(initials) = self.assignee_initials.as_deref().filter(|s| !s.is_empty()) {
            return initials.to_uppercase();
        }
        match self.assignee.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(name) => name.chars().take(2).collect::<String>().to_uppercase(),
            None => "--".to_string(),
        }
    }
}

/// Field values for a task that does not exist yet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    /// Backend user id of the assignee.
    pub assigned_to: Option<String>,
    pub project: Option<String>,
    pub tags: Vec<String>,
}

/// Read-only detail view of a task, as returned by the details endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TaskDetails {
    pub id: Option<TaskId>,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub status_display: Option<String>,
    pub priority: Priority,
    pub project_name: Option<String>,
    pub assigned_to: Option<String>,
    pub assigned_to_username: Option<String>,
    pub created_at: Option<String>,
    pub social_post_id: Option<TaskId>,
}

impl TaskDetails {
    /// Assignee display name, whichever key the backend used.
    pub fn assignee(&self) -> Option<&str> {
        self.assigned_to_username.as_deref().or(self.assigned_to.as_deref())
    }
}

// ── Tests ──────────────────────────────────────────────────────
