// File: ./src/client/mod.rs
pub mod core;
pub mod middleware;
pub mod schema;

pub use crate::client::core::{AiClient, AiParseError};
