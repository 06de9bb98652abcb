// File: src/controller.rs
//! Entry point front ends use to turn typed text into a `ParsedTask`.
//! The AI path is optional; any failure there falls back to the rule-based parser,
//! so callers always get a usable result.
use crate::client::AiClient;
use crate::config::Config;
use crate::model::{ParsedTask, parse};
use chrono::NaiveDateTime;

/// Builds an AI client when the config asks for one and can support it.
pub fn ai_client_from_config(config: &Config) -> Option<AiClient> {
    if !config.use_ai {
        return None;
    }
    match AiClient::new(config) {
        Ok(client) => Some(client),
        Err(e) => {
            log::warn!("AI parsing enabled but unavailable ({}); using rule-based parser", e);
            None
        }
    }
}

pub async fn smart_parse(text: &str, now: NaiveDateTime, ai: Option<&AiClient>) -> ParsedTask {
    if let Some(client) = ai {
        match client.parse_with_ai(text, now).await {
            Ok(parsed) => {
                log::debug!("AI parsed '{}' -> {:?}", text, parsed);
                return parsed;
            }
            Err(e) => {
                log::warn!("{}; falling back to rule-based parsing", e);
            }
        }
    }
    parse(text, now)
}
