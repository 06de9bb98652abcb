// Request and response shapes for the generative-language API, and the validation
// that turns a model reply into a `ParsedTask`.
use crate::client::core::AiParseError;
use crate::model::parser::end_of_day;
use crate::model::{ParsedTask, Priority, UNTITLED_TASK};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::{Value, json};

pub fn build_prompt(input: &str, now: NaiveDateTime) -> String {
    format!(
        r#"Parse the following natural language task input and extract structured information. Return ONLY valid JSON with this exact structure:

{{
  "name": "main task description",
  "assignee": "person name or null",
  "dueDate": "ISO date string or null",
  "priority": "P1, P2, P3, or P4"
}}

Rules:
- Extract the main action/objective as the task name
- Find person names (usually after "assign", "@", or before "by")
- Parse dates intelligently (today, tomorrow, next Friday, June 20th, etc.)
- The current local date and time is {now}
- When a date has no time of day, use 23:59:59 on that date
- Extract priority levels P1-P4 (default to P3 if not specified)
- P1 = Critical/Urgent, P2 = High, P3 = Medium, P4 = Low
- Return null for missing fields (except priority which defaults to P3)

Input: {input}

JSON:"#,
        now = now.format("%Y-%m-%dT%H:%M:%S (%A)"),
        // JSON-quoting keeps stray quotes in the input from breaking the prompt.
        input = Value::String(input.to_string()),
    )
}

pub fn build_request_body(input: &str, now: NaiveDateTime) -> Value {
    json!({
        "contents": [{
            "parts": [{ "text": build_prompt(input, now) }]
        }],
        "generationConfig": {
            "temperature": 0.1,
            "topK": 1,
            "topP": 1,
            "maxOutputTokens": 200,
        }
    })
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Pulls `candidates[0].content.parts[0].text` out of a raw response body.
pub fn extract_candidate_text(body: &[u8]) -> Result<String, AiParseError> {
    let response: GenerateResponse = serde_json::from_slice(body)
        .map_err(|e| AiParseError::new(format!("Response is not valid JSON: {}", e)))?;
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AiParseError::from("No response text from AI service"))
}

/// The outermost `{ ... }` in free text (models like to wrap JSON in prose or fences).
pub fn find_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AiTaskResponse {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    /// Anything that is not one of the four labels falls back to P3.
    #[serde(default)]
    pub priority: Option<Value>,
}

impl AiTaskResponse {
    pub fn into_parsed(self) -> Result<ParsedTask, AiParseError> {
        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| UNTITLED_TASK.to_string());

        let assignee = self
            .assignee
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty() && !a.eq_ignore_ascii_case("null"));

        let due_date = match self.due_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(s) if s.eq_ignore_ascii_case("null") => None,
            Some(s) => Some(
                parse_ai_due_date(s)
                    .ok_or_else(|| AiParseError::new(format!("Unrecognised dueDate '{}'", s)))?,
            ),
        };

        let priority = self
            .priority
            .as_ref()
            .and_then(Value::as_str)
            .and_then(|p| Priority::from_label(p.trim()))
            .unwrap_or_default();

        Ok(ParsedTask {
            name,
            assignee,
            due_date,
            priority,
        })
    }
}

/// RFC 3339 (converted to local wall-clock time), a naive ISO date-time, or a bare
/// date (end of day).
pub fn parse_ai_due_date(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().map(end_of_day)
}

/// Full validation of the model's text reply.
pub fn parsed_task_from_text(text: &str) -> Result<ParsedTask, AiParseError> {
    let object = find_json_object(text)
        .ok_or_else(|| AiParseError::from("No valid JSON found in response"))?;
    let raw: AiTaskResponse = serde_json::from_str(object)
        .map_err(|e| AiParseError::new(format!("Response does not match schema: {}", e)))?;
    raw.into_parsed()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_input_and_reference_date() {
        let now = NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let prompt = build_prompt("Call \"Bob\" tomorrow", now);
        assert!(prompt.contains(r#"Input: "Call \"Bob\" tomorrow""#));
        assert!(prompt.contains("2024-06-15T10:00:00 (Saturday)"));

        let body = build_request_body("x", now);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 200);
        assert!(body["contents"][0]["parts"][0]["text"].is_string());
    }

    #[test]
    fn candidate_text_extraction() {
        let body = br#"{"candidates":[{"content":{"parts":[{"text":"hello"}]}}]}"#;
        assert_eq!(extract_candidate_text(body).unwrap(), "hello");
        assert!(extract_candidate_text(br#"{"candidates":[]}"#).is_err());
        assert!(extract_candidate_text(b"<html>").is_err());
    }

    #[test]
    fn json_object_inside_fences() {
        let text = "```json\n{\"name\": \"x\"}\n```";
        assert_eq!(find_json_object(text), Some("{\"name\": \"x\"}"));
        assert_eq!(find_json_object("} nope {"), None);
    }

    #[test]
    fn due_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 6, 20)
            .unwrap()
            .and_hms_opt(17, 0, 0)
            .unwrap();
        assert_eq!(parse_ai_due_date("2024-06-20T17:00:00"), Some(expected));
        assert_eq!(parse_ai_due_date("2024-06-20T17:00"), Some(expected));
        assert_eq!(parse_ai_due_date("2024-06-20T17:00:00.000"), Some(expected));
        assert_eq!(
            parse_ai_due_date("2024-06-20"),
            NaiveDate::from_ymd_opt(2024, 6, 20)
                .unwrap()
                .and_hms_opt(23, 59, 59)
        );
        assert!(parse_ai_due_date("2024-06-20T17:00:00Z").is_some());
        assert_eq!(parse_ai_due_date("next friday"), None);
    }

    #[test]
    fn priority_outside_enum_defaults() {
        let t = parsed_task_from_text(r#"{"name":"a","priority":"urgent"}"#).unwrap();
        assert_eq!(t.priority, Priority::P3);
        let t = parsed_task_from_text(r#"{"name":"a","priority":1}"#).unwrap();
        assert_eq!(t.priority, Priority::P3);
        let t = parsed_task_from_text(r#"{"name":"a","priority":"P1"}"#).unwrap();
        assert_eq!(t.priority, Priority::P1);
    }

    #[test]
    fn schema_violations_are_failures() {
        assert!(parsed_task_from_text(r#"{"name": 42}"#).is_err());
        assert!(parsed_task_from_text(r#"{"name":"a","dueDate":"soon"}"#).is_err());
        assert!(parsed_task_from_text("I could not parse that").is_err());
        assert!(parsed_task_from_text("{not json}").is_err());
    }

    #[test]
    fn blanks_and_nulls_become_defaults() {
        let t = parsed_task_from_text(
            r#"{"name":"  ","assignee":"null","dueDate":null,"priority":null}"#,
        )
        .unwrap();
        assert_eq!(t, ParsedTask::default());
    }
}
