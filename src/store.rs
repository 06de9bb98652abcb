// File: src/store.rs
//! In-memory task list used by front ends: create, edit, toggle, delete, plus the
//! search / filter / sort view and the summary counters.
//! Every date judgement goes through `model::calendar`.
use crate::model::calendar::{DueStatus, due_status, is_due_today, is_due_tomorrow};
use crate::model::{ParsedTask, Task, TaskPatch};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use strum::EnumIter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumIter)]
pub enum SortKey {
    #[default]
    Created,
    DueDate,
    Priority,
    Name,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Created => write!(f, "Created"),
            SortKey::DueDate => write!(f, "Due Date"),
            SortKey::Priority => write!(f, "Priority"),
            SortKey::Name => write!(f, "Name"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
    Overdue,
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => write!(f, "All"),
            StatusFilter::Active => write!(f, "Active"),
            StatusFilter::Completed => write!(f, "Completed"),
            StatusFilter::Overdue => write!(f, "Overdue"),
        }
    }
}

pub struct FilterOptions<'a> {
    pub search_term: &'a str,
    pub status: StatusFilter,
    pub sort: SortKey,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub overdue: usize,
    pub due_today: usize,
    pub due_tomorrow: usize,
}

impl TaskStats {
    /// Whole-number percentage, 0 for an empty list.
    pub fn completion_rate(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed as f64 / self.total as f64) * 100.0).round() as u32
    }
}

#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    /// Newest first.
    pub tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn create(&mut self, parsed: ParsedTask, now: NaiveDateTime) -> Task {
        let task = Task::from_parsed(parsed, now);
        log::debug!("Created task {} '{}'", task.id, task.name);
        self.tasks.insert(0, task.clone());
        task
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub fn update(&mut self, id: &str, patch: TaskPatch, now: NaiveDateTime) -> Option<Task> {
        let task = self.get_mut(id)?;
        task.apply_patch(patch, now);
        Some(task.clone())
    }

    pub fn toggle(&mut self, id: &str, now: NaiveDateTime) -> Option<Task> {
        let task = self.get_mut(id)?;
        task.toggle_completed(now);
        Some(task.clone())
    }

    pub fn delete(&mut self, id: &str) -> Option<Task> {
        let idx = self.tasks.iter().position(|t| t.id == id)?;
        let task = self.tasks.remove(idx);
        log::debug!("Deleted task {} '{}'", task.id, task.name);
        Some(task)
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    /// Search, status filter, then a stable sort.
    pub fn filter(&self, options: &FilterOptions, now: NaiveDateTime) -> Vec<Task> {
        let search_lower = options.search_term.trim().to_lowercase();

        let mut out: Vec<Task> = self
            .tasks
            .iter()
            .filter(|t| search_lower.is_empty() || matches_search_term(t, &search_lower))
            .filter(|t| match options.status {
                StatusFilter::All => true,
                StatusFilter::Active => !t.completed,
                StatusFilter::Completed => t.completed,
                StatusFilter::Overdue => is_flagged_overdue(t, now),
            })
            .cloned()
            .collect();

        out.sort_by(|a, b| compare_tasks(a, b, options.sort));
        out
    }

    pub fn stats(&self, now: NaiveDateTime) -> TaskStats {
        TaskStats {
            total: self.tasks.len(),
            completed: self.tasks.iter().filter(|t| t.completed).count(),
            overdue: self.tasks.iter().filter(|t| is_flagged_overdue(t, now)).count(),
            due_today: self.count_open(|due| is_due_today(due, now)),
            due_tomorrow: self.count_open(|due| is_due_tomorrow(due, now)),
        }
    }

    fn count_open(&self, pred: impl Fn(NaiveDateTime) -> bool) -> usize {
        self.tasks.iter().filter(|t| is_open_and(t, &pred)).count()
    }
}

/// Same badge logic a task card shows; completed tasks never count.
fn is_flagged_overdue(task: &Task, now: NaiveDateTime) -> bool {
    task.due_date
        .is_some_and(|due| due_status(due, now, task.completed) == DueStatus::Overdue)
}

fn is_open_and(task: &Task, pred: impl Fn(NaiveDateTime) -> bool) -> bool {
    !task.completed && task.due_date.is_some_and(pred)
}

/// `term` must already be lowercase.
fn matches_search_term(task: &Task, term: &str) -> bool {
    task.name.to_lowercase().contains(term)
        || task
            .assignee
            .as_ref()
            .is_some_and(|a| a.to_lowercase().contains(term))
        || task.priority.label().to_lowercase().contains(term)
}

fn compare_tasks(a: &Task, b: &Task, key: SortKey) -> Ordering {
    match key {
        SortKey::DueDate => match (a.due_date, b.due_date) {
            (Some(d1), Some(d2)) => d1.cmp(&d2),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        SortKey::Priority => a.priority.cmp(&b.priority),
        SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortKey::Created => b.created_at.cmp(&a.created_at),
    }
}
