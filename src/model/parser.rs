// File: src/model/parser.rs
//! Rule-based natural-language task parser.
//!
//! `parse` runs the extractors in a fixed order over a working copy of the input:
//! priority, then due date, then assignee. Each one blanks out what it claimed so
//! `P1` can't become a name and `Friday` can't become an assignee. Whatever is
//! left over, minus dangling connectives, is the title.
//!
//! Nothing in here reads the system clock. `now` is always passed in.
use crate::model::item::{ParsedTask, Priority, UNTITLED_TASK};
use crate::model::span::{Match, Span, WorkingText, Word, words};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

/// Words that glue phrases together and never belong at the edge of a title.
const CONNECTIVES: &[&str] = &[
    "by", "for", "with", "assign", "assignee", "assigned", "to", "at", "on", "due", "before",
];

/// Marker verbs that stay at the start of a title when they didn't take a name.
const ASSIGN_MARKERS: &[&str] = &["assign", "assigned", "assignee"];

/// Connectives that get claimed together with a date or time phrase that follows them.
const DATE_LEADS: &[&str] = &["at", "by", "on", "due", "before"];

const RELATIVE_WORDS: &[&str] = &["today", "tomorrow", "tonight"];

pub fn parse(text: &str, now: NaiveDateTime) -> ParsedTask {
    let mut work = WorkingText::new(text);

    // 1. Priority
    let priority = match extract_priority(work.as_str()) {
        Some(m) => {
            work.claim_all(&m.spans);
            m.value
        }
        None => Priority::default(),
    };

    // 2. Due date
    let mut date_spans = Vec::new();
    let due_date = extract_due_date(work.as_str(), now).map(|m| {
        work.claim_all(&m.spans);
        date_spans = m.spans;
        m.value
    });

    // 3. Assignee
    let assignee = extract_assignee(work.as_str(), &date_spans).map(|m| {
        work.claim_all(&m.spans);
        m.value
    });

    // 4. Title
    let name = clean_title(&work.remainder());

    log::debug!(
        "parsed '{}' -> name='{}' assignee={:?} due={:?} priority={}",
        text,
        name,
        assignee,
        due_date,
        priority
    );

    ParsedTask {
        name,
        assignee,
        due_date,
        priority,
    }
}

// --- PRIORITY ---

/// Finds the first `P1`..`P4` marker (any case, whole word). Position decides ties.
pub fn extract_priority(text: &str) -> Option<Match<Priority>> {
    words(text)
        .into_iter()
        .find_map(|w| Priority::from_label(w.text).map(|p| Match::single(w.span(), p)))
}

// --- DUE DATE ---

/// Finds a day phrase and a time-of-day phrase and resolves them against `now`.
///
/// Day phrases are tried by category (relative words, then weekdays, then absolute
/// day/month), first hit by position inside a category. A day without a time lands
/// on 23:59:59; a time without a day lands on `now`'s day.
pub fn extract_due_date(text: &str, now: NaiveDateTime) -> Option<Match<NaiveDateTime>> {
    let ws = words(text);
    let today = now.date();

    let day = find_relative_day(&ws, today)
        .or_else(|| find_weekday(&ws, today))
        .or_else(|| find_absolute_day(&ws, today));

    let taken = day.as_ref().map(|(_, first, last)| (*first, *last));
    let time = find_time(&ws, taken);

    let mut spans = Vec::new();
    let when = match (day, time) {
        (Some((date, d_first, d_last)), Some((t, t_first, t_last))) => {
            spans.push(phrase_span(&ws, d_first, d_last, Some((t_first, t_last))));
            spans.push(phrase_span(&ws, t_first, t_last, Some((d_first, d_last))));
            date.and_time(t)
        }
        (Some((date, first, last)), None) => {
            spans.push(phrase_span(&ws, first, last, None));
            end_of_day(date)
        }
        (None, Some((t, first, last))) => {
            spans.push(phrase_span(&ws, first, last, None));
            today.and_time(t)
        }
        (None, None) => return None,
    };

    Some(Match::merged(when, spans, text))
}

pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN))
}

/// Span of words `first..=last`, widened to a leading connective unless that
/// word belongs to the other phrase.
fn phrase_span(ws: &[Word], first: usize, last: usize, other: Option<(usize, usize)>) -> Span {
    let mut start = ws[first].start;
    if first > 0 {
        let prev = first - 1;
        let in_other = other.is_some_and(|(a, b)| prev >= a && prev <= b);
        if !in_other && DATE_LEADS.contains(&ws[prev].lower().as_str()) {
            start = ws[prev].start;
        }
    }
    Span::new(start, ws[last].end)
}

type DayHit = (NaiveDate, usize, usize);

fn find_relative_day(ws: &[Word], today: NaiveDate) -> Option<DayHit> {
    for (i, w) in ws.iter().enumerate() {
        match w.lower().as_str() {
            "today" | "tonight" => return Some((today, i, i)),
            "tomorrow" => {
                if let Some(date) = today.succ_opt() {
                    return Some((date, i, i));
                }
            }
            "in" if i + 2 < ws.len() => {
                if let Some(amount) = parse_english_number(ws[i + 1].text)
                    && let Some(days) = unit_in_days(&ws[i + 2].lower())
                    && let Some(date) =
                        today.checked_add_signed(Duration::days(amount as i64 * days))
                {
                    return Some((date, i, i + 2));
                }
            }
            _ => {}
        }
    }
    None
}

fn find_weekday(ws: &[Word], today: NaiveDate) -> Option<DayHit> {
    for (i, w) in ws.iter().enumerate() {
        if let Some(target) = parse_weekday(&w.lower()) {
            let first = if i > 0 && matches!(ws[i - 1].lower().as_str(), "this" | "next") {
                i - 1
            } else {
                i
            };
            // Past the end of the calendar there is no next occurrence.
            return next_weekday(today, target).map(|date| (date, first, i));
        }
    }
    None
}

fn find_absolute_day(ws: &[Word], today: NaiveDate) -> Option<DayHit> {
    for i in 0..ws.len() {
        if let Ok(date) = NaiveDate::parse_from_str(ws[i].text, "%Y-%m-%d") {
            return Some((date, i, i));
        }

        // "20th June", "20 of June"
        if let Some(day) = parse_day_number(ws[i].text)
            && !is_meridiem_at(ws, i + 1)
        {
            let month_idx = if ws.get(i + 1).is_some_and(|w| w.lower() == "of") {
                i + 2
            } else {
                i + 1
            };
            if let Some(month) = ws.get(month_idx).and_then(|w| parse_month(&w.lower()))
                && let Some(hit) = resolve_day_month(ws, today, day, month, i, month_idx)
            {
                return Some(hit);
            }
        }

        // "June 20", "June 20th"; "Jun 5 pm" is a time
        if let Some(month) = parse_month(&ws[i].lower())
            && let Some(day) = ws.get(i + 1).and_then(|w| parse_day_number(w.text))
            && !is_meridiem_at(ws, i + 2)
            && let Some(hit) = resolve_day_month(ws, today, day, month, i, i + 1)
        {
            return Some(hit);
        }
    }
    None
}

/// Builds the date for a matched day/month pair, consuming a trailing year if
/// there is one. Without a year, dates already behind `today` roll into next year.
fn resolve_day_month(
    ws: &[Word],
    today: NaiveDate,
    day: u32,
    month: u32,
    first: usize,
    last: usize,
) -> Option<DayHit> {
    if let Some(year) = ws.get(last + 1).and_then(|w| parse_year(w.text)) {
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        return Some((date, first, last + 1));
    }

    let date = NaiveDate::from_ymd_opt(today.year(), month, day)?;
    if date < today {
        // Feb 29 has no counterpart in a non-leap year; keep it as is.
        let rolled = NaiveDate::from_ymd_opt(today.year() + 1, month, day).unwrap_or(date);
        return Some((rolled, first, last));
    }
    Some((date, first, last))
}

fn is_meridiem_at(ws: &[Word], idx: usize) -> bool {
    ws.get(idx)
        .is_some_and(|w| matches!(w.lower().as_str(), "am" | "pm"))
}

fn find_time(ws: &[Word], taken: Option<(usize, usize)>) -> Option<(NaiveTime, usize, usize)> {
    let is_taken = |i: usize| taken.is_some_and(|(a, b)| i >= a && i <= b);
    for i in 0..ws.len() {
        if is_taken(i) {
            continue;
        }
        if let Some(t) = parse_time_string(ws[i].text) {
            return Some((t, i, i));
        }
        // "11 pm", "5:30 am"
        if i + 1 < ws.len() && !is_taken(i + 1) {
            if is_meridiem_at(ws, i + 1)
                && let Some(t) = parse_time_string(&format!("{}{}", ws[i].text, ws[i + 1].lower()))
            {
                return Some((t, i, i + 1));
            }
        }
    }
    None
}

// --- DATE PARSING HELPERS ---

pub(crate) fn parse_time_string(s: &str) -> Option<NaiveTime> {
    let lower = s.to_lowercase();

    // Helper for 12h
    let parse_12h = |s: &str, is_pm: bool| -> Option<NaiveTime> {
        let (h, m) = if let Some((h_str, m_str)) = s.split_once(':') {
            if m_str.len() != 2 {
                return None;
            }
            (h_str.parse::<u32>().ok()?, m_str.parse::<u32>().ok()?)
        } else {
            (s.parse::<u32>().ok()?, 0)
        };
        if !(1..=12).contains(&h) || m > 59 {
            return None;
        }
        let h_24 = if h == 12 {
            if is_pm { 12 } else { 0 }
        } else if is_pm {
            h + 12
        } else {
            h
        };
        NaiveTime::from_hms_opt(h_24, m, 0)
    };

    if let Some(stripped) = lower.strip_suffix("am") {
        return parse_12h(stripped, false);
    }
    if let Some(stripped) = lower.strip_suffix("pm") {
        return parse_12h(stripped, true);
    }

    if let Some((h_str, m_str)) = lower.split_once(':') {
        if h_str.is_empty() || h_str.len() > 2 || m_str.len() != 2 {
            return None;
        }
        let h = h_str.parse::<u32>().ok()?;
        let m = m_str.parse::<u32>().ok()?;
        return NaiveTime::from_hms_opt(h, m, 0);
    }

    None
}

fn parse_weekday(s: &str) -> Option<Weekday> {
    match s {
        "mon" | "monday" => Some(Weekday::Mon),
        "tue" | "tues" | "tuesday" => Some(Weekday::Tue),
        "wed" | "wednesday" => Some(Weekday::Wed),
        "thu" | "thur" | "thurs" | "thursday" => Some(Weekday::Thu),
        "fri" | "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

fn parse_month(s: &str) -> Option<u32> {
    match s {
        "jan" | "january" => Some(1),
        "feb" | "february" => Some(2),
        "mar" | "march" => Some(3),
        "apr" | "april" => Some(4),
        "may" => Some(5),
        "jun" | "june" => Some(6),
        "jul" | "july" => Some(7),
        "aug" | "august" => Some(8),
        "sep" | "sept" | "september" => Some(9),
        "oct" | "october" => Some(10),
        "nov" | "november" => Some(11),
        "dec" | "december" => Some(12),
        _ => None,
    }
}

/// `20`, `20th`, `1st`, `22nd`, `3rd` -> day of month.
fn parse_day_number(s: &str) -> Option<u32> {
    let lower = s.to_lowercase();
    let digits = ["st", "nd", "rd", "th"]
        .iter()
        .find_map(|suffix| lower.strip_suffix(suffix))
        .unwrap_or(&lower);
    if digits.is_empty() || digits.len() > 2 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let day = digits.parse::<u32>().ok()?;
    (1..=31).contains(&day).then_some(day)
}

fn parse_year(s: &str) -> Option<i32> {
    if s.len() != 4 || !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    s.parse::<i32>().ok().filter(|y| *y >= 1970)
}

fn parse_english_number(s: &str) -> Option<u32> {
    match s.to_lowercase().as_str() {
        "a" | "one" => Some(1),
        "two" => Some(2),
        "three" => Some(3),
        "four" => Some(4),
        "five" => Some(5),
        "six" => Some(6),
        "seven" => Some(7),
        "eight" => Some(8),
        "nine" => Some(9),
        "ten" => Some(10),
        "eleven" => Some(11),
        "twelve" => Some(12),
        _ => s.parse::<u32>().ok().filter(|n| *n <= 3650),
    }
}

fn unit_in_days(s: &str) -> Option<i64> {
    match s {
        "day" | "days" => Some(1),
        "week" | "weeks" => Some(7),
        _ => None,
    }
}

/// Nearest occurrence of `target` strictly after `from`.
fn next_weekday(from: NaiveDate, target: Weekday) -> Option<NaiveDate> {
    let mut d = from.succ_opt()?;
    while d.weekday() != target {
        d = d.succ_opt()?;
    }
    Some(d)
}

// --- ASSIGNEE ---

/// Finds a person name in `text`. `anchors` are the spans the date extractor
/// claimed; a Capitalized word sitting right before one of them is a candidate.
///
/// Precedence: `@name`, then a name after `assign`/`assignee`/`for`, then the
/// word before a date phrase.
pub fn extract_assignee(text: &str, anchors: &[Span]) -> Option<Match<String>> {
    let ws = words(text);
    find_at_mention(&ws)
        .or_else(|| find_after_marker(&ws))
        .or_else(|| find_before_anchor(text, &ws, anchors))
}

fn find_at_mention(ws: &[Word]) -> Option<Match<String>> {
    ws.iter().find_map(|w| {
        let name = w.text.strip_prefix('@')?;
        is_name_candidate(name).then(|| Match::single(w.span(), name.to_string()))
    })
}

fn find_after_marker(ws: &[Word]) -> Option<Match<String>> {
    for (i, w) in ws.iter().enumerate() {
        let lower = w.lower();
        let (name_idx, needs_capital) = match lower.as_str() {
            // "assign to x" and "assignee x" are explicit; a bare "assign x" is
            // usually the verb of the task unless x is a Name.
            "assign" | "assigned" if ws.get(i + 1).is_some_and(|n| n.lower() == "to") => {
                (i + 2, false)
            }
            "assign" | "assigned" => (i + 1, true),
            "assignee" => (i + 1, false),
            "for" => (i + 1, true),
            _ => continue,
        };
        let Some(name) = ws.get(name_idx) else {
            continue;
        };
        if needs_capital && !name.is_capitalized() {
            continue;
        }
        if is_name_candidate(name.text) {
            return Some(Match::single(
                Span::new(w.start, name.end),
                name.text.to_string(),
            ));
        }
    }
    None
}

fn find_before_anchor(text: &str, ws: &[Word], anchors: &[Span]) -> Option<Match<String>> {
    let mut sorted = anchors.to_vec();
    sorted.sort();
    for anchor in sorted {
        let Some(last) = ws.iter().rposition(|w| w.end <= anchor.start) else {
            continue;
        };
        // "Aman by 11pm": step over the "by" if the date phrase didn't take it
        let idx = if ws[last].lower() == "by" {
            match last.checked_sub(1) {
                Some(i) => i,
                None => continue,
            }
        } else {
            last
        };
        // The first word is usually a capitalized verb, not a person.
        if idx == 0 {
            continue;
        }
        let candidate = &ws[idx];
        let gap = &text[candidate.end..anchor.start];
        let only_glue = gap
            .split(|c: char| c.is_whitespace() || c == ',')
            .all(|g| g.is_empty() || g.eq_ignore_ascii_case("by"));
        if only_glue && candidate.is_capitalized() && is_name_candidate(candidate.text) {
            return Some(Match::single(
                Span::new(candidate.start, ws[last].end),
                candidate.text.to_string(),
            ));
        }
    }
    None
}

/// A bare word that could be somebody's name: letters only (plus `-` and `'`),
/// and not a calendar word, a connective or a priority marker.
fn is_name_candidate(s: &str) -> bool {
    let Some(first) = s.chars().next() else {
        return false;
    };
    if !first.is_alphabetic() || !s.chars().all(|c| c.is_alphabetic() || c == '-' || c == '\'') {
        return false;
    }
    let lower = s.to_lowercase();
    !(parse_weekday(&lower).is_some()
        || parse_month(&lower).is_some()
        || RELATIVE_WORDS.contains(&lower.as_str())
        || CONNECTIVES.contains(&lower.as_str())
        || matches!(lower.as_str(), "this" | "next" | "in" | "the" | "me")
        || Priority::from_label(&lower).is_some())
}

// --- TITLE ---

/// Trims leftover connectives and punctuation from both ends of what is left.
/// Falls back to the placeholder title when nothing remains.
pub fn clean_title(remainder: &str) -> String {
    let bare = |word: &str| word.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase();
    let is_filler = |word: &str| {
        let core = bare(word);
        core.is_empty() || CONNECTIVES.contains(&core.as_str())
    };

    let mut parts: Vec<&str> = remainder.split_whitespace().collect();
    while parts
        .first()
        .is_some_and(|w| is_filler(*w) && !ASSIGN_MARKERS.contains(&bare(*w).as_str()))
    {
        parts.remove(0);
    }
    while parts.last().is_some_and(|w| is_filler(*w)) {
        parts.pop();
    }

    let joined = parts.join(" ");
    let title = joined.trim_matches(|c: char| matches!(c, ',' | ';' | ':' | '-' | '.' | ' '));
    if title.is_empty() {
        UNTITLED_TASK.to_string()
    } else {
        title.to_string()
    }
}
