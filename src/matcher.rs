use regex::{NoExpand, Regex, RegexBuilder};

use crate::error::SearchError;

/// Characters of context kept on each side of a match.
pub const SIDE_CHARS: usize = 15;

/// A literal occurrence of the search term. `start` and `end` count
/// characters, not bytes, from the beginning of the searched text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSpan {
    pub text: String,
    pub start: usize,
    pub end: usize,
    byte_start: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnippetMode {
    /// Short trailing context for autocomplete style results.
    Live,
    Full,
}

impl SnippetMode {
    fn tail(self) -> usize {
        match self {
            SnippetMode::Live => SIDE_CHARS,
            SnippetMode::Full => SIDE_CHARS * 9,
        }
    }
}

/// A search term compiled once per request.
#[derive(Debug, Clone)]
pub struct TermMatcher {
    term: String,
    term_chars: usize,
    finder: Option<Regex>,
    highlighter: Option<Regex>,
}

impl TermMatcher {
    pub fn new(term: &str, case_sensitive: bool) -> Result<Self, SearchError> {
        if term.is_empty() {
            return Ok(Self {
                term: String::new(),
                term_chars: 0,
                finder: None,
                highlighter: None,
            });
        }

        let escaped = regex::escape(term);
        let finder = RegexBuilder::new(&escaped)
            .case_insensitive(!case_sensitive)
            .build()?;
        // Highlighting ignores case even for case-sensitive searches.
        let highlighter = RegexBuilder::new(&escaped).case_insensitive(true).build()?;

        Ok(Self {
            term: term.to_string(),
            term_chars: term.chars().count(),
            finder: Some(finder),
            highlighter: Some(highlighter),
        })
    }

    pub fn find(&self, text: &str) -> Vec<MatchSpan> {
        let Some(finder) = &self.finder else {
            return Vec::new();
        };

        let mut chars_before = 0;
        let mut scanned_to = 0;
        finder
            .find_iter(text)
            .map(|m| {
                chars_before += text[scanned_to..m.start()].chars().count();
                let start = chars_before;
                let len = m.as_str().chars().count();
                chars_before += len;
                scanned_to = m.end();

                MatchSpan {
                    text: m.as_str().to_string(),
                    start,
                    end: start + len,
                    byte_start: m.start(),
                }
            })
            .collect()
    }

    /// Cuts the context window around `span` and marks the term inside it.
    ///
    /// The window opens up to [`SIDE_CHARS`] characters before the match and
    /// closes `term + SIDE_CHARS + tail` characters after the match start.
    pub fn snippet(&self, text: &str, span: &MatchSpan, mode: SnippetMode) -> String {
        let at = span.byte_start;
        let from = text[..at]
            .char_indices()
            .rev()
            .take(SIDE_CHARS)
            .last()
            .map(|(i, _)| i)
            .unwrap_or(at);

        let budget = self.term_chars + SIDE_CHARS + mode.tail();
        let to = text[at..]
            .char_indices()
            .nth(budget)
            .map(|(i, _)| at + i)
            .unwrap_or(text.len());

        self.highlight(&text[from..to])
    }

    /// Replaces every case-insensitive occurrence of the term with the term as
    /// typed, wrapped in a highlight span. The document's own casing is lost.
    pub fn highlight(&self, snippet: &str) -> String {
        match &self.highlighter {
            Some(re) => {
                let marked = format!("<span class=\"search\">{}</span>", self.term);
                re.replace_all(snippet, NoExpand(&marked)).into_owned()
            }
            None => snippet.to_string(),
        }
    }
}

/// All non-overlapping literal occurrences of `term` in `text`.
pub fn find_in_text(text: &str, term: &str, case_sensitive: bool) -> Vec<MatchSpan> {
    match TermMatcher::new(term, case_sensitive) {
        Ok(matcher) => matcher.find(text),
        Err(e) => {
            tracing::warn!("Search term '{}' rejected: {}", term, e);
            Vec::new()
        }
    }
}
