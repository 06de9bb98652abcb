// File: ./src/cli.rs
//! Shared command-line interface logic: argument handling, help and output.
use crate::model::{ParsedTask, Priority, format_due_date};
use crate::store::SortKey;
use anyhow::{Result, anyhow};
use chrono::NaiveDateTime;
use std::path::PathBuf;
use strum::IntoEnumIterator;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Parse {
        text: String,
        use_ai: bool,
        now: Option<NaiveDateTime>,
        json: bool,
    },
    Config,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub root: Option<PathBuf>,
    pub command: Command,
}

/// `args` excludes the binary name.
pub fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut root = None;
    let mut rest = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-r" | "--root" => {
                let path = iter
                    .next()
                    .ok_or_else(|| anyhow!("{} needs a path", arg))?;
                root = Some(PathBuf::from(path));
            }
            _ => rest.push(arg.clone()),
        }
    }

    let command = match rest.first().map(String::as_str) {
        None | Some("-h") | Some("--help") | Some("help") => Command::Help,
        Some("config") => Command::Config,
        Some("parse") => {
            let mut words = Vec::new();
            let mut use_ai = false;
            let mut json = false;
            let mut now = None;
            let mut iter = rest[1..].iter();
            while let Some(arg) = iter.next() {
                match arg.as_str() {
                    "--ai" => use_ai = true,
                    "--json" => json = true,
                    "--now" => {
                        let raw = iter.next().ok_or_else(|| anyhow!("--now needs a value"))?;
                        now = Some(parse_now(raw)?);
                    }
                    _ => words.push(arg.clone()),
                }
            }
            Command::Parse {
                text: words.join(" "),
                use_ai,
                now,
                json,
            }
        }
        Some(other) => return Err(anyhow!("Unknown command '{}'. Try --help.", other)),
    };

    Ok(CliArgs { root, command })
}

fn parse_now(raw: &str) -> Result<NaiveDateTime> {
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| anyhow!("Invalid --now '{}', expected YYYY-MM-DDTHH:MM", raw))
}

/// Human-readable card for a parsed task.
pub fn render_parsed(parsed: &ParsedTask, now: NaiveDateTime) -> String {
    let mut out = format!("Name:     {}\n", parsed.name);
    out.push_str(&format!(
        "Assignee: {}\n",
        parsed.assignee.as_deref().unwrap_or("-")
    ));
    match parsed.due_date {
        Some(due) => out.push_str(&format!(
            "Due:      {} ({})\n",
            format_due_date(due, now),
            due.format("%Y-%m-%d %H:%M:%S")
        )),
        None => out.push_str("Due:      -\n"),
    }
    out.push_str(&format!(
        "Priority: {} ({})",
        parsed.priority,
        parsed.priority.description()
    ));
    out
}

/// Accepted `default_sort` values, spelled the way the config file stores them.
fn sort_key_choices() -> String {
    SortKey::iter()
        .map(|k| format!("\"{:?}\"", k))
        .collect::<Vec<_>>()
        .join(" | ")
}

pub fn print_help(binary_name: &str) {
    println!(
        "Quicktask v{} - natural-language task parser",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!(
        "    {} parse <text...> [--ai] [--json] [--now <YYYY-MM-DDTHH:MM>]",
        binary_name
    );
    println!("    {} config", binary_name);
    println!("    {} --help", binary_name);
    println!();
    println!("OPTIONS:");
    println!("    -r, --root <path>     Use a different directory for config and logs.");
    println!("    --ai                  Try the AI service first, even if use_ai is off.");
    println!("                          Needs api_key in the config.");
    println!("    --json                Print the parsed task as JSON.");
    println!("    --now <datetime>      Resolve relative dates against this moment.");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("INPUT SYNTAX:");
    for p in Priority::iter() {
        println!("    {}                    Priority: {}", p, p.description());
    }
    println!("    today, tomorrow       Relative day (also: in 3 days, in two weeks)");
    println!("    friday, next friday   Next occurrence of that weekday");
    println!("    20th June, June 20    Calendar day, optional year");
    println!("                          (past dates without a year roll to next year)");
    println!("    11pm, 5:30pm, 14:00   Time of day (defaults to 23:59:59 when omitted)");
    println!("    @name, assign Name    Assignee (also: 'Name by <date>')");
    println!();
    println!("CONFIG (see `{} config` for the file path):", binary_name);
    println!("    use_ai = true|false, api_key, ai_endpoint, ai_timeout_secs (0 = none)");
    println!("    hide_completed = true|false");
    println!("    default_sort = {}", sort_key_choices());
    println!();
    println!("EXAMPLES:");
    println!("    {} parse Finish landing page Aman by 11pm 20th June", binary_name);
    println!("    {} parse Call client Rajeev tomorrow 5pm", binary_name);
    println!("    {} parse Review budget P1 Sarah by Friday 2pm --json", binary_name);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn args(s: &[&str]) -> Vec<String> {
        s.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn parse_command_collects_words_and_flags() {
        let cli = parse_args(&args(&[
            "--root", "/tmp/qt", "parse", "Call", "Bob", "--json", "tomorrow", "--now",
            "2024-06-15T10:00",
        ]))
        .unwrap();
        assert_eq!(cli.root, Some(PathBuf::from("/tmp/qt")));
        assert_eq!(
            cli.command,
            Command::Parse {
                text: "Call Bob tomorrow".to_string(),
                use_ai: false,
                now: NaiveDate::from_ymd_opt(2024, 6, 15)
                    .unwrap()
                    .and_hms_opt(10, 0, 0),
                json: true,
            }
        );
    }

    #[test]
    fn empty_args_mean_help_and_unknown_commands_fail() {
        assert_eq!(parse_args(&[]).unwrap().command, Command::Help);
        assert!(parse_args(&args(&["frobnicate"])).is_err());
        assert!(parse_args(&args(&["parse", "x", "--now", "noon"])).is_err());
        assert!(parse_args(&args(&["--root"])).is_err());
    }

    #[test]
    fn sort_choices_match_config_spelling() {
        let choices = sort_key_choices();
        assert_eq!(choices, r#""Created" | "DueDate" | "Priority" | "Name""#);
        for key in SortKey::iter() {
            let line = format!("default_sort = \"{:?}\"", key);
            let cfg: crate::config::Config = toml::from_str(&line).unwrap();
            assert_eq!(cfg.default_sort, key);
        }
    }

    #[test]
    fn render_shows_defaults() {
        let now = NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let out = render_parsed(&ParsedTask::default(), now);
        assert!(out.contains("Name:     Untitled Task"));
        assert!(out.contains("Assignee: -"));
        assert!(out.contains("Priority: P3 (Medium)"));
    }
}
