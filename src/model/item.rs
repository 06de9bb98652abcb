// File: ./src/model/item.rs
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;
use uuid::Uuid;

pub const UNTITLED_TASK: &str = "Untitled Task";

// --- PRIORITY ---

/// Ordinal urgency class. P1 is the most urgent, P3 is what you get when nothing is said.
#[derive(
    Debug,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    EnumIter,
)]
pub enum Priority {
    P1,
    P2,
    #[default]
    P3,
    P4,
}

impl Priority {
    /// Parses a bare marker such as `P2` or `p2`. Anything else is rejected.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.to_ascii_uppercase().as_str() {
            "P1" => Some(Self::P1),
            "P2" => Some(Self::P2),
            "P3" => Some(Self::P3),
            "P4" => Some(Self::P4),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::P1 => "P1",
            Self::P2 => "P2",
            Self::P3 => "P3",
            Self::P4 => "P4",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::P1 => "Critical",
            Self::P2 => "High",
            Self::P3 => "Medium",
            Self::P4 => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// --- PARSED TASK ---

/// Structured result of parsing free text. Has no identity until it becomes a `Task`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedTask {
    pub name: String,
    pub assignee: Option<String>,
    pub due_date: Option<NaiveDateTime>,
    pub priority: Priority,
}

impl Default for ParsedTask {
    fn default() -> Self {
        Self {
            name: UNTITLED_TASK.to_string(),
            assignee: None,
            due_date: None,
            priority: Priority::default(),
        }
    }
}

// --- TASK ---

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub name: String,
    pub assignee: Option<String>,
    pub due_date: Option<NaiveDateTime>,
    pub priority: Priority,
    pub completed: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A partial edit. `None` leaves the field alone; the nested options on
/// `assignee` and `due_date` allow clearing them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub name: Option<String>,
    pub assignee: Option<Option<String>>,
    pub due_date: Option<Option<NaiveDateTime>>,
    pub priority: Option<Priority>,
    pub completed: Option<bool>,
}

impl Task {
    pub fn from_parsed(parsed: ParsedTask, now: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: parsed.name,
            assignee: parsed.assignee,
            due_date: parsed.due_date,
            priority: parsed.priority,
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_patch(&mut self, patch: TaskPatch, now: NaiveDateTime) {
        if let Some(name) = patch.name {
            let trimmed = name.trim();
            self.name = if trimmed.is_empty() {
                UNTITLED_TASK.to_string()
            } else {
                trimmed.to_string()
            };
        }
        if let Some(assignee) = patch.assignee {
            // Edit forms hand us "" for a cleared field
            self.assignee = assignee
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty());
        }
        if let Some(due) = patch.due_date {
            self.due_date = due;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        self.updated_at = now;
    }

    pub fn toggle_completed(&mut self, now: NaiveDateTime) {
        self.completed = !self.completed;
        self.updated_at = now;
    }
}
