// File: ./src/model/mod.rs
pub mod calendar;
pub mod item;
pub mod parser;
pub mod span;

pub use calendar::{
    DueStatus, due_status, format_due_date, is_due_today, is_due_tomorrow, is_overdue,
};
pub use item::{ParsedTask, Priority, Task, TaskPatch, UNTITLED_TASK};
pub use parser::parse;
pub use span::{Match, Span};
