use chrono::{NaiveDate, NaiveDateTime};
use quicktask::model::{ParsedTask, Priority, UNTITLED_TASK, parse};

fn dt(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, s)
        .unwrap()
}

// Saturday
fn now() -> NaiveDateTime {
    dt(2024, 6, 15, 10, 0, 0)
}

#[test]
fn test_empty_input_is_all_defaults() {
    assert_eq!(parse("", now()), ParsedTask::default());
    let t = parse("   ,, by  ", now());
    assert_eq!(t.name, UNTITLED_TASK);
    assert_eq!(t.priority, Priority::P3);
    assert!(t.assignee.is_none());
    assert!(t.due_date.is_none());
}

#[test]
fn test_parse_is_total_on_odd_inputs() {
    let inputs = [
        "P1",
        "@",
        "@@@",
        "by by by",
        "tomorrow",
        "11pm",
        "31st June",
        "in 3",
        "Réunion demain 14:00 P2",
        "🚀 launch 🚀",
        "12:99 25:00 13pm",
        "assign",
        "for",
    ];
    for input in inputs {
        let t = parse(input, now());
        assert!(!t.name.trim().is_empty(), "empty name for {:?}", input);
    }
    assert_eq!(parse("P1", now()).name, UNTITLED_TASK);
    assert_eq!(parse("P1", now()).priority, Priority::P1);
}

#[test]
fn test_priority_marker() {
    let t = parse("task P2", now());
    assert_eq!(t.priority, Priority::P2);
    assert_eq!(t.name, "task");

    assert_eq!(parse("task", now()).priority, Priority::P3);
    assert_eq!(parse("fix login p1", now()).priority, Priority::P1);
}

#[test]
fn test_first_priority_marker_wins() {
    let t = parse("P3 fix P1 login", now());
    assert_eq!(t.priority, Priority::P3);
    // Only the winning marker is claimed.
    assert_eq!(t.name, "fix P1 login");
}

#[test]
fn test_tomorrow_with_time() {
    let t = parse("call client tomorrow 5pm", now());
    assert_eq!(t.due_date, Some(dt(2024, 6, 16, 17, 0, 0)));
    assert_eq!(t.name, "call client");
    assert!(t.assignee.is_none());
}

#[test]
fn test_date_without_time_is_end_of_day() {
    let t = parse("review by 20th June", dt(2024, 1, 1, 0, 0, 0));
    assert_eq!(t.due_date, Some(dt(2024, 6, 20, 23, 59, 59)));
    assert_eq!(t.name, "review");
}

#[test]
fn test_weekday_is_not_an_assignee() {
    let t = parse("finish report by Friday", now());
    assert!(t.assignee.is_none());
    assert_eq!(t.due_date, Some(dt(2024, 6, 21, 23, 59, 59)));
    assert_eq!(t.name, "finish report");
}

#[test]
fn test_month_is_not_an_assignee() {
    let t = parse("Plan offsite June 20", now());
    assert!(t.assignee.is_none());
    assert_eq!(t.name, "Plan offsite");
}

#[test]
fn test_priority_weekday_and_assignee_together() {
    let t = parse("Review budget P1 Sarah by Friday 2pm", now());
    assert_eq!(t.priority, Priority::P1);
    assert_eq!(t.assignee.as_deref(), Some("Sarah"));
    assert_eq!(t.due_date, Some(dt(2024, 6, 21, 14, 0, 0)));
    assert_eq!(t.name, "Review budget");
    assert!(!t.name.contains("P1"));
}

#[test]
fn test_landing_page_example() {
    let t = parse("Finish landing page Aman by 11pm 20th June", now());
    assert_eq!(t.name, "Finish landing page");
    assert_eq!(t.assignee.as_deref(), Some("Aman"));
    assert_eq!(t.due_date, Some(dt(2024, 6, 20, 23, 0, 0)));
    assert_eq!(t.priority, Priority::P3);
}

#[test]
fn test_name_directly_before_date() {
    let t = parse("Call client Rajeev tomorrow 5pm", now());
    assert_eq!(t.name, "Call client");
    assert_eq!(t.assignee.as_deref(), Some("Rajeev"));
    assert_eq!(t.due_date, Some(dt(2024, 6, 16, 17, 0, 0)));
}

#[test]
fn test_at_mention_beats_other_heuristics() {
    let t = parse("Ship release notes for Dana @priya p2 today", now());
    assert_eq!(t.assignee.as_deref(), Some("priya"));
    assert_eq!(t.priority, Priority::P2);
    assert_eq!(t.due_date, Some(dt(2024, 6, 15, 23, 59, 59)));
    assert_eq!(t.name, "Ship release notes for Dana");
}

#[test]
fn test_assign_marker() {
    let t = parse("assign to Marco: update docs next Monday", now());
    assert_eq!(t.assignee.as_deref(), Some("Marco"));
    assert_eq!(t.due_date, Some(dt(2024, 6, 17, 23, 59, 59)));
    assert_eq!(t.name, "update docs");

    let t = parse("prepare slides for Nadia", now());
    assert_eq!(t.assignee.as_deref(), Some("Nadia"));
    assert_eq!(t.name, "prepare slides");
}

#[test]
fn test_lowercase_words_before_dates_are_not_names() {
    let t = parse("buy gifts for mom by Sunday", now());
    assert!(t.assignee.is_none());
    assert_eq!(t.name, "buy gifts for mom");
    assert_eq!(t.due_date, Some(dt(2024, 6, 16, 23, 59, 59)));
}

#[test]
fn test_first_word_is_never_the_assignee() {
    let t = parse("Review tomorrow", now());
    assert!(t.assignee.is_none());
    assert_eq!(t.name, "Review");
}

#[test]
fn test_parse_is_deterministic() {
    let input = "Finish landing page Aman by 11pm 20th June P2";
    assert_eq!(parse(input, now()), parse(input, now()));
}

#[test]
fn test_bare_assign_verb_is_not_a_marker() {
    let t = parse("Assign tasks to team by Friday", now());
    assert!(t.assignee.is_none());
    assert_eq!(t.name, "Assign tasks to team");
    assert_eq!(t.due_date, Some(dt(2024, 6, 21, 23, 59, 59)));

    let t = parse("assign Priya the budget review", now());
    assert_eq!(t.assignee.as_deref(), Some("Priya"));
    assert_eq!(t.name, "the budget review");

    let t = parse("update wiki assigned to dev", now());
    assert_eq!(t.assignee.as_deref(), Some("dev"));
    assert_eq!(t.name, "update wiki");
}

#[test]
fn test_trailing_with_is_trimmed() {
    let t = parse("Lunch with Sam 12:30", now());
    assert_eq!(t.assignee.as_deref(), Some("Sam"));
    assert_eq!(t.due_date, Some(dt(2024, 6, 15, 12, 30, 0)));
    assert_eq!(t.name, "Lunch");
}
