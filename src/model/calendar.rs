// Due-date classification shared by every consumer that needs "overdue" or "today".
// Callers pass `now`; nothing here reads the clock.
use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DueStatus {
    Overdue,
    Today,
    Tomorrow,
    Upcoming,
}

pub fn is_overdue(due: NaiveDateTime, now: NaiveDateTime) -> bool {
    due < now
}

pub fn is_due_today(due: NaiveDateTime, now: NaiveDateTime) -> bool {
    due.date() == now.date()
}

pub fn is_due_tomorrow(due: NaiveDateTime, now: NaiveDateTime) -> bool {
    now.date().succ_opt() == Some(due.date())
}

/// "Today", "Tomorrow", "Jun 20", or "Jun 20, 2025" when the year differs from `now`'s.
pub fn format_due_date(due: NaiveDateTime, now: NaiveDateTime) -> String {
    if is_due_today(due, now) {
        "Today".to_string()
    } else if is_due_tomorrow(due, now) {
        "Tomorrow".to_string()
    } else if due.year() == now.year() {
        due.format("%b %-d").to_string()
    } else {
        due.format("%b %-d, %Y").to_string()
    }
}

/// Badge for a task card. Completed tasks are never reported as overdue.
pub fn due_status(due: NaiveDateTime, now: NaiveDateTime, completed: bool) -> DueStatus {
    if !completed && is_overdue(due, now) {
        DueStatus::Overdue
    } else if is_due_today(due, now) {
        DueStatus::Today
    } else if is_due_tomorrow(due, now) {
        DueStatus::Tomorrow
    } else {
        DueStatus::Upcoming
    }
}
