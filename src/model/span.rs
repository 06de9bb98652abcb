// Span bookkeeping shared by the extractors.
//
// Every offset is a byte offset into the ORIGINAL input. Claimed spans are blanked
// out of a working copy with the same number of spaces, so offsets never shift while
// the pipeline runs and every extractor can be tested on its own.

/// Half-open byte range `[start, end)` in the original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }
}

/// What an extractor found, plus every span it consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match<T> {
    pub value: T,
    pub spans: Vec<Span>,
}

impl<T> Match<T> {
    pub fn single(span: Span, value: T) -> Self {
        Self {
            value,
            spans: vec![span],
        }
    }

    /// Sorts the spans and fuses those that touch or are separated only by whitespace.
    pub fn merged(value: T, mut spans: Vec<Span>, text: &str) -> Self {
        spans.retain(|s| !s.is_empty());
        spans.sort();
        let mut out: Vec<Span> = Vec::with_capacity(spans.len());
        for span in spans {
            if let Some(last) = out.last_mut()
                && span.start >= last.end
                && text[last.end..span.start].trim().is_empty()
            {
                last.end = last.end.max(span.end);
                continue;
            }
            if let Some(last) = out.last_mut()
                && span.start < last.end
            {
                last.end = last.end.max(span.end);
                continue;
            }
            out.push(span);
        }
        Self { value, spans: out }
    }
}

/// A whitespace-delimited word with its surrounding punctuation trimmed off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Word<'a> {
    pub start: usize,
    pub end: usize,
    pub text: &'a str,
}

impl<'a> Word<'a> {
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    pub fn lower(&self) -> String {
        self.text.to_lowercase()
    }

    pub fn is_capitalized(&self) -> bool {
        self.text.chars().next().is_some_and(|c| c.is_uppercase())
    }
}

fn is_edge_punctuation(c: char) -> bool {
    matches!(
        c,
        ',' | '.' | ';' | ':' | '!' | '?' | '(' | ')' | '[' | ']' | '"' | '\''
    )
}

/// Splits `text` into words. Punctuation at either end of a whitespace run is left
/// out of the word's span; runs made only of punctuation are skipped.
pub fn words(text: &str) -> Vec<Word<'_>> {
    let mut out = Vec::new();
    let mut run_start: Option<usize> = None;

    let mut push_run = |start: usize, end: usize| {
        let raw = &text[start..end];
        let leading = raw.len() - raw.trim_start_matches(is_edge_punctuation).len();
        let trimmed = raw.trim_start_matches(is_edge_punctuation);
        let core = trimmed.trim_end_matches(is_edge_punctuation);
        if !core.is_empty() {
            let s = start + leading;
            out.push(Word {
                start: s,
                end: s + core.len(),
                text: core,
            });
        }
    };

    for (idx, c) in text.char_indices() {
        if c.is_whitespace() {
            if let Some(start) = run_start.take() {
                push_run(start, idx);
            }
        } else if run_start.is_none() {
            run_start = Some(idx);
        }
    }
    if let Some(start) = run_start {
        push_run(start, text.len());
    }
    out
}

/// A copy of the input with claimed spans blanked out.
#[derive(Debug, Clone)]
pub struct WorkingText {
    working: String,
}

impl WorkingText {
    pub fn new(text: &str) -> Self {
        Self {
            working: text.to_string(),
        }
    }

    /// Text still available to later extractors, same length as the input.
    pub fn as_str(&self) -> &str {
        &self.working
    }

    pub fn claim(&mut self, span: Span) {
        if span.is_empty() || span.end > self.working.len() {
            return;
        }
        let blank = " ".repeat(span.end - span.start);
        self.working.replace_range(span.start..span.end, &blank);
    }

    pub fn claim_all(&mut self, spans: &[Span]) {
        for span in spans {
            self.claim(*span);
        }
    }

    /// Unclaimed text with whitespace collapsed.
    pub fn remainder(&self) -> String {
        self.working.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_trim_punctuation_but_keep_offsets() {
        let text = "Call Bob, (today) P1.";
        let ws = words(text);
        let texts: Vec<&str> = ws.iter().map(|w| w.text).collect();
        assert_eq!(texts, vec!["Call", "Bob", "today", "P1"]);
        assert_eq!(ws[1].span().slice(text), "Bob");
        assert_eq!(ws[2].span().slice(text), "today");
    }

    #[test]
    fn words_keep_at_sign_and_inner_colons() {
        let ws = words("ping @sarah at 5:30pm -- ok");
        let texts: Vec<&str> = ws.iter().map(|w| w.text).collect();
        assert_eq!(texts, vec!["ping", "@sarah", "at", "5:30pm", "--", "ok"]);
    }

    #[test]
    fn claiming_preserves_offsets_for_later_spans() {
        let text = "Fix bug P1 tomorrow";
        let mut work = WorkingText::new(text);
        work.claim(Span::new(8, 10));
        assert_eq!(work.as_str().len(), text.len());
        assert_eq!(Span::new(11, 19).slice(work.as_str()), "tomorrow");
        work.claim(Span::new(11, 19));
        assert_eq!(work.remainder(), "Fix bug");
    }

    #[test]
    fn claiming_non_ascii_text_keeps_valid_utf8() {
        let text = "Réviser café demain";
        let mut work = WorkingText::new(text);
        let ws = words(text);
        work.claim(ws[1].span());
        assert_eq!(work.remainder(), "Réviser demain");
    }

    #[test]
    fn merged_fuses_adjacent_spans() {
        let text = "by 11pm 20th June";
        let m = Match::merged((), vec![Span::new(8, 17), Span::new(0, 7)], text);
        assert_eq!(m.spans, vec![Span::new(0, 17)]);

        let m = Match::merged((), vec![Span::new(0, 2), Span::new(5, 7)], "ab x cd");
        assert_eq!(m.spans.len(), 2);
    }
}
