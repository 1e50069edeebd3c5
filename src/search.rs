//! Forward and backward text search over a line store.
//!
//! Searches walk the store with a [`Cursor`](line_store::Cursor) one line at
//! a time, the same way a reader scrolls. Each line is tab-expanded before
//! matching, so reported columns are byte offsets into the expanded text.

use crate::text::{expand_tabs, floor_char_boundary};
use line_store::{LineStore, StoreResult};
use regex::{Regex, RegexBuilder};

const CASE_INSENSITIVE_FLAG: &str = "(?i)";

/// A match: line index and the `[start, end)` byte range in the
/// tab-expanded line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub line: usize,
    pub start: usize,
    pub end: usize,
}

/// A compiled search pattern.
#[derive(Debug, Clone)]
pub struct SearchPattern {
    text: String,
    regex: Regex,
    spaces_per_tab: usize,
}

impl SearchPattern {
    /// Compile `text`.
    ///
    /// In regex mode `(?i)` is prepended when ignoring case, unless the
    /// pattern already starts with it. In plain mode `text` is matched
    /// literally.
    pub fn new(text: &str, regex: bool, ignore_case: bool) -> Result<Self, regex::Error> {
        let compiled = if regex {
            let pattern = if ignore_case && !text.starts_with(CASE_INSENSITIVE_FLAG) {
                format!("{}{}", CASE_INSENSITIVE_FLAG, text)
            } else {
                text.to_string()
            };
            Regex::new(&pattern)?
        } else {
            RegexBuilder::new(&regex::escape(text))
                .case_insensitive(ignore_case)
                .build()?
        };

        Ok(Self {
            text: text.to_string(),
            regex: compiled,
            spaces_per_tab: 4,
        })
    }

    /// Columns a tab expands to before matching.
    pub fn spaces_per_tab(mut self, n: usize) -> Self {
        self.spaces_per_tab = n;
        self
    }

    /// The search text as entered.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Find the first match at or after (`line`, `column`).
    ///
    /// `column` only applies to the first line searched.
    pub fn find_next(&self, store: &LineStore, line: usize, column: usize) -> StoreResult<Option<Match>> {
        let mut cursor = store.cursor();
        if !cursor.set_position(line as isize, false) {
            return Ok(None);
        }

        let mut offset = column;
        loop {
            let text = cursor.get_line()?;
            let text = expand_tabs(&text, self.spaces_per_tab);

            if offset < text.len() {
                let from = floor_char_boundary(&text, offset);
                if let Some(m) = self.regex.find_at(&text, from) {
                    return Ok(Some(Match {
                        line: cursor.current_index() as usize,
                        start: m.start(),
                        end: m.end(),
                    }));
                }
            }

            offset = 0;
            if !cursor.increment() {
                return Ok(None);
            }
        }
    }

    /// Find the last match at or before `line`, scanning backward.
    ///
    /// On the first line only the text before byte `limit` is searched; the
    /// whole line is searched when `limit` is `None`.
    pub fn find_previous(
        &self,
        store: &LineStore,
        line: usize,
        limit: Option<usize>,
    ) -> StoreResult<Option<Match>> {
        let mut cursor = store.cursor();
        if !cursor.set_position(line as isize, false) {
            return Ok(None);
        }

        let mut limit = limit;
        loop {
            let text = cursor.get_line()?;
            let text = expand_tabs(&text, self.spaces_per_tab);
            let text = match limit.take() {
                Some(limit) => &text[..floor_char_boundary(&text, limit)],
                None => &text[..],
            };

            if let Some(m) = self.regex.find_iter(text).last() {
                return Ok(Some(Match {
                    line: cursor.current_index() as usize,
                    start: m.start(),
                    end: m.end(),
                }));
            }

            if !cursor.decrement() {
                return Ok(None);
            }
        }
    }
}
