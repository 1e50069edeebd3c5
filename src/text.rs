//! Text helpers shared by ingestion, search and rendering.

use std::borrow::Cow;
use std::path::Path;

/// Remove overstrike sequences: each backspace deletes the character before
/// it. Backspaces at the start of the line are dropped.
pub fn remove_backspaces(s: &str) -> Cow<'_, str> {
    if !s.contains('\u{8}') {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        if c == '\u{8}' {
            result.pop();
        } else {
            result.push(c);
        }
    }
    Cow::Owned(result)
}

/// Width in columns, counting each char as one and each tab as `tab`.
pub fn expanded_width(s: &str, tab: usize) -> usize {
    let (chars, tabs) = s
        .chars()
        .fold((0, 0), |(n, t), c| (n + 1, t + usize::from(c == '\t')));
    chars - tabs + tabs * tab
}

/// Replace every tab with `tab` spaces.
pub fn expand_tabs(s: &str, tab: usize) -> Cow<'_, str> {
    if s.contains('\t') {
        Cow::Owned(s.replace('\t', &" ".repeat(tab)))
    } else {
        Cow::Borrowed(s)
    }
}

/// Chars `[start, end)` of `s`. Out-of-range bounds are clamped.
pub fn substr(s: &str, start: usize, end: usize) -> &str {
    if start >= end {
        return "";
    }
    let from = char_to_byte(s, start);
    let to = char_to_byte(s, end);
    &s[from..to]
}

/// Chars from `start` to the end of `s`.
pub fn substr_from(s: &str, start: usize) -> &str {
    &s[char_to_byte(s, start)..]
}

/// Byte offset of char `index`, or `s.len()` past the end.
fn char_to_byte(s: &str, index: usize) -> usize {
    s.char_indices().nth(index).map_or(s.len(), |(i, _)| i)
}

/// Largest char boundary in `s` not greater than `index`.
pub fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Program name from `argv[0]`: the file name without its extension.
pub fn program_name(argv0: &str) -> String {
    let base = Path::new(argv0)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| argv0.to_string());
    match base.rfind('.') {
        Some(i) if i > 0 => base[..i].to_string(),
        _ => base,
    }
}

/// Join positional words into one file name. `None` reads stdin.
pub fn compose_file_name<S: AsRef<str>>(words: &[S]) -> Option<String> {
    if words.is_empty() {
        return None;
    }
    let name = words
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ");
    Some(name)
}
