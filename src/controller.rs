//! Viewport controller.
//!
//! The [`Controller`] keeps the visible window over the store (`left`,
//! `top`, `width`, `height`) and the search state, and applies [`Action`]s to
//! them. Output goes through the [`Display`] trait so the same controller can
//! drive a terminal UI or the plain writer used by the `m` binary.

use crate::error::PagerResult;
use crate::search::{Match, SearchPattern};
use crate::text::{expand_tabs, substr};
use line_store::LineStore;
use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Title shown when reading standard input.
pub const STDIN_TITLE: &str = "<<stdin>>";

/// A user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    Top,
    Bottom,
    /// Shift the text one column to the left (`left` grows).
    ScrollLeft,
    /// Shift the text one column to the right (`left` shrinks).
    ScrollRight,
    Home,
    End,
    FindNext,
    FindPrevious,
    GotoLine,
    FlipNumbers,
    /// Show or hide the ruler.
    FlipRuler,
    /// Move the ruler one row up. Ignored while hidden.
    MoveRulerUp,
    /// Move the ruler one row down. Ignored while hidden.
    MoveRulerDown,
    Reset,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Quit => "quit",
            Action::ScrollUp => "scroll up",
            Action::ScrollDown => "scroll down",
            Action::PageUp => "page up",
            Action::PageDown => "page down",
            Action::Top => "top",
            Action::Bottom => "bottom",
            Action::ScrollLeft => "scroll left",
            Action::ScrollRight => "scroll right",
            Action::Home => "home",
            Action::End => "end",
            Action::FindNext => "find next",
            Action::FindPrevious => "find previous",
            Action::GotoLine => "go to line",
            Action::FlipNumbers => "flip numbers",
            Action::FlipRuler => "flip ruler",
            Action::MoveRulerUp => "move ruler up",
            Action::MoveRulerDown => "move ruler down",
            Action::Reset => "reset",
        };
        f.write_str(name)
    }
}

/// Output seam between the controller and whatever draws the screen.
pub trait Display {
    /// Highlight line `line`, or clear the highlight.
    fn show_line(&mut self, line: Option<usize>);

    /// Highlight a search match, or clear the highlight.
    fn show_search_result(&mut self, found: Option<Match>);

    /// Show the ruler at viewport row `row`, or hide it.
    fn show_ruler(&mut self, row: Option<usize>);

    /// Show a status message.
    fn message(&mut self, text: &str);

    /// Draw one viewport row. `number` is the 1-based line number when
    /// numbers are shown.
    fn draw_row(&mut self, row: usize, number: Option<usize>, text: &str) -> io::Result<()>;

    /// Finish a frame of output.
    fn refresh(&mut self) -> io::Result<()>;
}

/// The visible window, in columns and lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub left: usize,
    pub top: usize,
    pub width: usize,
    pub height: usize,
}

pub struct Controller {
    store: Arc<LineStore>,
    title: Option<String>,
    file_name: Option<PathBuf>,
    spaces_per_tab: usize,
    max_width: usize,
    left: usize,
    top: usize,
    width: usize,
    height: usize,
    pattern: Option<SearchPattern>,
    search_last_row: isize,
    search_last_col: isize,
    pointed_line: Option<usize>,
    numbers: bool,
    ruler_shown: bool,
    ruler_row: usize,
    quit: bool,
}

impl Controller {
    pub fn new(store: Arc<LineStore>, width: usize, height: usize) -> Self {
        Self {
            store,
            title: None,
            file_name: None,
            spaces_per_tab: 4,
            max_width: 0,
            left: 0,
            top: 0,
            width: width.max(1),
            height: height.max(1),
            pattern: None,
            search_last_row: -1,
            search_last_col: -1,
            pointed_line: None,
            numbers: false,
            ruler_shown: false,
            ruler_row: 0,
            quit: false,
        }
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    pub fn with_file_name(mut self, file_name: Option<PathBuf>) -> Self {
        self.file_name = file_name;
        self
    }

    pub fn spaces_per_tab(mut self, n: usize) -> Self {
        self.spaces_per_tab = n;
        self
    }

    /// Widest line in columns, used to bound horizontal scrolling.
    pub fn set_max_width(&mut self, width: usize) {
        self.max_width = width;
    }

    /// Set the search text. Resets the search position.
    pub fn set_search(&mut self, text: &str, regex: bool, ignore_case: bool) -> PagerResult<()> {
        let pattern = SearchPattern::new(text, regex, ignore_case)?.spaces_per_tab(self.spaces_per_tab);
        self.pattern = Some(pattern);
        self.search_last_row = -1;
        self.search_last_col = -1;
        Ok(())
    }

    /// Set the 1-based line for the next [`Action::GotoLine`].
    pub fn set_pointed_line(&mut self, line: usize) {
        self.pointed_line = Some(line);
    }

    pub fn viewport(&self) -> Viewport {
        Viewport {
            left: self.left,
            top: self.top,
            width: self.width,
            height: self.height,
        }
    }

    pub fn numbers_shown(&self) -> bool {
        self.numbers
    }

    /// Viewport row of the ruler, when shown.
    pub fn ruler(&self) -> Option<usize> {
        self.ruler_shown.then_some(self.ruler_row)
    }

    pub fn is_quit(&self) -> bool {
        self.quit
    }

    /// Title for the status bar.
    pub fn title(&self) -> String {
        let home = std::env::var_os("HOME").map(PathBuf::from);
        file_title(
            self.title.as_deref(),
            self.file_name.as_deref(),
            home.as_deref(),
        )
    }

    /// Apply `action`, then clamp the viewport to the data.
    pub fn do_action(&mut self, action: Action, display: &mut dyn Display) -> PagerResult<()> {
        let lines = self.store.len() as isize;
        let width = self.width as isize;
        let height = self.height as isize;
        let mut left = self.left as isize;
        let mut top = self.top as isize;

        tracing::trace!(%action, left, top, "action");

        match action {
            Action::Reset => {
                self.pointed_line = None;
                self.numbers = false;
                self.ruler_shown = false;
                display.show_line(None);
                display.show_ruler(None);
                display.show_search_result(None);
            }
            Action::ScrollUp => top -= 1,
            Action::ScrollDown => top += 1,
            Action::Top => top = 0,
            Action::Bottom => top = lines - height,
            Action::Home => left = 0,
            Action::End => left = self.max_width as isize - width + 1,
            Action::PageUp => top -= height,
            Action::PageDown => top += height,
            Action::ScrollLeft => left += 1,
            Action::ScrollRight => left -= 1,
            Action::FlipNumbers => self.numbers = !self.numbers,
            Action::FlipRuler => {
                self.ruler_shown = !self.ruler_shown;
                display.show_ruler(self.ruler());
            }
            Action::MoveRulerUp => {
                if self.ruler_shown {
                    self.ruler_row = self.ruler_row.saturating_sub(1);
                    display.show_ruler(self.ruler());
                }
            }
            Action::MoveRulerDown => {
                if self.ruler_shown {
                    self.ruler_row = (self.ruler_row + 1).min(self.height);
                    display.show_ruler(self.ruler());
                }
            }
            Action::FindNext => {
                let Some(pattern) = &self.pattern else {
                    display.message("No search text");
                    return Ok(());
                };
                if self.search_last_row < 0 {
                    self.search_last_row = top;
                }
                if self.search_last_col < 0 {
                    self.search_last_col = left;
                }

                let found = pattern.find_next(
                    &self.store,
                    self.search_last_row as usize,
                    self.search_last_col as usize,
                )?;
                display.show_search_result(found);
                match found {
                    Some(m) => {
                        self.search_last_row = m.line as isize;
                        self.search_last_col = m.end as isize;
                        (left, top) = found_position(left, top, width, height, m);
                        display.message(&format!(
                            "Found at: {}:{} \"{}\"",
                            m.line + 1,
                            m.start + 1,
                            pattern.text()
                        ));
                    }
                    None => {
                        display.message(&format!("Cannot find: \"{}\"", pattern.text()));
                        self.search_last_row = 0;
                        self.search_last_col = 0;
                    }
                }
            }
            Action::FindPrevious => {
                let Some(pattern) = &self.pattern else {
                    display.message("No search text");
                    return Ok(());
                };
                if self.search_last_row < 0 {
                    self.search_last_row = lines - 1;
                    self.search_last_col = -1;
                } else {
                    self.search_last_col -= 1;
                }

                let limit = (self.search_last_col > 0).then_some(self.search_last_col as usize);
                let found = if self.search_last_row < 0 {
                    None
                } else {
                    pattern.find_previous(&self.store, self.search_last_row as usize, limit)?
                };
                display.show_search_result(found);
                match found {
                    Some(m) => {
                        self.search_last_row = m.line as isize;
                        self.search_last_col = m.end as isize;
                        (left, top) = found_position(left, top, width, height, m);
                        display.message(&format!(
                            "Previous at: {}:{} \"{}\"",
                            m.line + 1,
                            m.start + 1,
                            pattern.text()
                        ));
                    }
                    None => {
                        display.message(&format!(
                            "Cannot find previous: \"{}\"",
                            pattern.text()
                        ));
                        self.search_last_row = lines - 1;
                        self.search_last_col = -1;
                    }
                }
            }
            Action::GotoLine => match self.pointed_line.take() {
                Some(line) if line > 0 => {
                    if line as isize > lines {
                        display.message(&format!("Wrong line number: {}", line));
                    } else {
                        let index = line - 1;
                        top = index as isize - height / 3;
                        display.show_line(Some(index));
                        display.message(&format!("Line #{}", line));
                    }
                }
                _ => display.message("No line number given"),
            },
            Action::Quit => {
                self.quit = true;
                return Ok(());
            }
        }

        self.display_at(left, top);
        Ok(())
    }

    /// Move the window to (`left`, `top`), clamped so it stays over the
    /// data.
    pub fn display_at(&mut self, left: isize, top: isize) {
        let lines = self.store.len() as isize;
        let width = self.width as isize;
        let height = self.height as isize;
        let mut left = left;
        let mut top = top;

        if top >= lines - height {
            top = lines - height;
        }
        if top < 0 {
            top = 0;
        }
        if left > self.max_width as isize - width + 1 {
            left = self.max_width as isize - width + 1;
        }
        if left < 0 {
            left = 0;
        }

        self.left = left as usize;
        self.top = top as usize;
    }

    /// Draw the viewport rows.
    pub fn render(&self, display: &mut dyn Display) -> PagerResult<()> {
        let mut cursor = self.store.cursor();
        if cursor.set_position(self.top as isize, false) {
            for row in 0..self.height {
                let text = cursor.get_line()?;
                let text = expand_tabs(&text, self.spaces_per_tab);
                let visible = substr(&text, self.left, self.left + self.width);
                let number = self.numbers.then(|| cursor.current_index() as usize + 1);
                display.draw_row(row, number, visible)?;
                if !cursor.increment() {
                    break;
                }
            }
        }
        display.refresh()?;
        Ok(())
    }

    /// Draw every line, unclipped.
    pub fn render_all(&self, display: &mut dyn Display) -> PagerResult<()> {
        let mut cursor = self.store.cursor();
        if cursor.rewind() {
            let mut row = 0;
            loop {
                let text = cursor.get_line()?;
                let number = self.numbers.then(|| cursor.current_index() as usize + 1);
                display.draw_row(row, number, &expand_tabs(&text, self.spaces_per_tab))?;
                row += 1;
                if !cursor.increment() {
                    break;
                }
            }
        }
        display.refresh()?;
        Ok(())
    }
}

/// Bring a match into view: off-screen lines land one third down the
/// screen, and `left` moves just enough to show `[start, end)`.
fn found_position(left: isize, top: isize, width: isize, height: isize, m: Match) -> (isize, isize) {
    let (line, start, end) = (m.line as isize, m.start as isize, m.end as isize);
    let mut left = left;
    let mut top = top;

    if line < top || line >= top + height {
        top = line - height / 3;
    }
    if end >= left + width {
        left = end - width;
    }
    if start < left {
        left = start;
    }

    (left.max(0), top.max(0))
}

fn file_title(title: Option<&str>, file_name: Option<&Path>, home: Option<&Path>) -> String {
    if let Some(title) = title {
        return title.to_string();
    }
    let Some(file_name) = file_name else {
        return STDIN_TITLE.to_string();
    };
    if let Some(rest) = home.and_then(|h| file_name.strip_prefix(h).ok()) {
        return Path::new("~").join(rest).display().to_string();
    }
    file_name.display().to_string()
}

/// Writes rows as plain lines to any writer.
pub struct PlainDisplay<W: Write> {
    out: W,
    number_width: usize,
    highlighted_line: Option<usize>,
    ruler: Option<usize>,
    found: Option<Match>,
    messages: Vec<String>,
}

impl<W: Write> PlainDisplay<W> {
    /// `total_lines` sets the zero-padded width of line numbers.
    pub fn new(out: W, total_lines: usize) -> Self {
        Self {
            out,
            number_width: total_lines.max(1).to_string().len(),
            highlighted_line: None,
            ruler: None,
            found: None,
            messages: Vec::new(),
        }
    }

    pub fn highlighted_line(&self) -> Option<usize> {
        self.highlighted_line
    }

    pub fn ruler(&self) -> Option<usize> {
        self.ruler
    }

    pub fn found(&self) -> Option<Match> {
        self.found
    }

    /// Messages shown so far, oldest first.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Display for PlainDisplay<W> {
    fn show_line(&mut self, line: Option<usize>) {
        self.highlighted_line = line;
    }

    fn show_search_result(&mut self, found: Option<Match>) {
        self.found = found;
    }

    fn show_ruler(&mut self, row: Option<usize>) {
        self.ruler = row;
    }

    fn message(&mut self, text: &str) {
        tracing::debug!(message = text, "status");
        self.messages.push(text.to_string());
    }

    fn draw_row(&mut self, _row: usize, number: Option<usize>, text: &str) -> io::Result<()> {
        match number {
            Some(n) => writeln!(self.out, "{:0width$} {}", n, text, width = self.number_width),
            None => writeln!(self.out, "{}", text),
        }
    }

    fn refresh(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(n: usize) -> Arc<LineStore> {
        let store = LineStore::with_limits(128, 512);
        for i in 0..n {
            store.append(&format!("line {} here", i)).unwrap();
        }
        Arc::new(store)
    }

    fn display() -> PlainDisplay<Vec<u8>> {
        PlainDisplay::new(Vec::new(), 100)
    }

    fn output(display: PlainDisplay<Vec<u8>>) -> String {
        String::from_utf8(display.into_inner()).unwrap()
    }

    #[test]
    fn test_scroll_clamps_top() {
        let mut ctl = Controller::new(store_with(100), 40, 10);
        let mut d = display();

        ctl.do_action(Action::ScrollUp, &mut d).unwrap();
        assert_eq!(ctl.viewport().top, 0);

        ctl.do_action(Action::PageDown, &mut d).unwrap();
        assert_eq!(ctl.viewport().top, 10);
        ctl.do_action(Action::ScrollDown, &mut d).unwrap();
        assert_eq!(ctl.viewport().top, 11);

        ctl.do_action(Action::Bottom, &mut d).unwrap();
        assert_eq!(ctl.viewport().top, 90);
        ctl.do_action(Action::PageDown, &mut d).unwrap();
        assert_eq!(ctl.viewport().top, 90);

        ctl.do_action(Action::Top, &mut d).unwrap();
        assert_eq!(ctl.viewport().top, 0);
    }

    #[test]
    fn test_short_data_keeps_top_at_zero() {
        let mut ctl = Controller::new(store_with(3), 40, 10);
        let mut d = display();
        ctl.do_action(Action::Bottom, &mut d).unwrap();
        assert_eq!(ctl.viewport().top, 0);
    }

    #[test]
    fn test_horizontal_clamp() {
        let mut ctl = Controller::new(store_with(5), 10, 5);
        ctl.set_max_width(25);
        let mut d = display();

        ctl.do_action(Action::ScrollRight, &mut d).unwrap();
        assert_eq!(ctl.viewport().left, 0);

        ctl.do_action(Action::End, &mut d).unwrap();
        assert_eq!(ctl.viewport().left, 16);
        ctl.do_action(Action::ScrollLeft, &mut d).unwrap();
        assert_eq!(ctl.viewport().left, 16);

        ctl.do_action(Action::Home, &mut d).unwrap();
        assert_eq!(ctl.viewport().left, 0);
        ctl.do_action(Action::ScrollLeft, &mut d).unwrap();
        assert_eq!(ctl.viewport().left, 1);
    }

    #[test]
    fn test_display_at_clamps() {
        let mut ctl = Controller::new(store_with(50), 10, 10);
        ctl.set_max_width(30);
        ctl.display_at(5, 20);
        assert_eq!((ctl.viewport().left, ctl.viewport().top), (5, 20));
        ctl.display_at(100, 100);
        assert_eq!((ctl.viewport().left, ctl.viewport().top), (21, 40));
        ctl.display_at(-4, -4);
        assert_eq!((ctl.viewport().left, ctl.viewport().top), (0, 0));
    }

    #[test]
    fn test_goto_line() {
        let mut ctl = Controller::new(store_with(100), 40, 9);
        let mut d = display();

        ctl.set_pointed_line(50);
        ctl.do_action(Action::GotoLine, &mut d).unwrap();
        assert_eq!(ctl.viewport().top, 46);
        assert_eq!(d.highlighted_line(), Some(49));
        assert_eq!(d.messages().last().unwrap(), "Line #50");

        ctl.set_pointed_line(101);
        ctl.do_action(Action::GotoLine, &mut d).unwrap();
        assert_eq!(d.messages().last().unwrap(), "Wrong line number: 101");
        assert_eq!(ctl.viewport().top, 46);

        ctl.do_action(Action::GotoLine, &mut d).unwrap();
        assert_eq!(d.messages().last().unwrap(), "No line number given");
    }

    #[test]
    fn test_find_next_brings_match_into_view() {
        let mut ctl = Controller::new(store_with(100), 40, 9);
        let mut d = display();
        ctl.set_search("line 70 ", false, false).unwrap();

        ctl.do_action(Action::FindNext, &mut d).unwrap();
        assert_eq!(
            d.found(),
            Some(Match {
                line: 70,
                start: 0,
                end: 8
            })
        );
        assert_eq!(ctl.viewport().top, 67);
        assert_eq!(d.messages().last().unwrap(), "Found at: 71:1 \"line 70 \"");

        ctl.do_action(Action::FindNext, &mut d).unwrap();
        assert_eq!(d.found(), None);
        assert_eq!(d.messages().last().unwrap(), "Cannot find: \"line 70 \"");

        // The search wrapped to the start.
        ctl.do_action(Action::FindNext, &mut d).unwrap();
        assert_eq!(d.found().map(|m| m.line), Some(70));
    }

    #[test]
    fn test_find_previous_from_end() {
        let mut ctl = Controller::new(store_with(30), 40, 5);
        let mut d = display();
        ctl.set_search("here", false, false).unwrap();

        ctl.do_action(Action::FindPrevious, &mut d).unwrap();
        assert_eq!(d.found().map(|m| m.line), Some(29));
        ctl.do_action(Action::FindPrevious, &mut d).unwrap();
        assert_eq!(d.found().map(|m| m.line), Some(28));
        assert_eq!(d.messages().last().unwrap(), "Previous at: 29:9 \"here\"");
    }

    #[test]
    fn test_find_without_pattern() {
        let mut ctl = Controller::new(store_with(3), 40, 5);
        let mut d = display();
        ctl.do_action(Action::FindNext, &mut d).unwrap();
        assert_eq!(d.messages(), &["No search text".to_string()]);
    }

    #[test]
    fn test_invalid_search_pattern() {
        let mut ctl = Controller::new(store_with(3), 40, 5);
        assert!(ctl.set_search("(", true, false).is_err());
    }

    #[test]
    fn test_flip_numbers_and_reset() {
        let mut ctl = Controller::new(store_with(3), 40, 5);
        let mut d = display();
        ctl.do_action(Action::FlipNumbers, &mut d).unwrap();
        assert!(ctl.numbers_shown());
        ctl.do_action(Action::Reset, &mut d).unwrap();
        assert!(!ctl.numbers_shown());
        assert_eq!(d.found(), None);
    }

    #[test]
    fn test_ruler_moves_only_when_shown() {
        let mut ctl = Controller::new(store_with(20), 40, 3);
        let mut d = display();

        ctl.do_action(Action::MoveRulerDown, &mut d).unwrap();
        assert_eq!(ctl.ruler(), None);
        assert_eq!(d.ruler(), None);

        ctl.do_action(Action::FlipRuler, &mut d).unwrap();
        assert_eq!(ctl.ruler(), Some(0));
        assert_eq!(d.ruler(), Some(0));

        ctl.do_action(Action::MoveRulerUp, &mut d).unwrap();
        assert_eq!(ctl.ruler(), Some(0));

        for _ in 0..5 {
            ctl.do_action(Action::MoveRulerDown, &mut d).unwrap();
        }
        // Clamped to the viewport height.
        assert_eq!(ctl.ruler(), Some(3));
        assert_eq!(d.ruler(), Some(3));

        ctl.do_action(Action::MoveRulerUp, &mut d).unwrap();
        assert_eq!(ctl.ruler(), Some(2));
    }

    #[test]
    fn test_ruler_keeps_row_while_hidden() {
        let mut ctl = Controller::new(store_with(20), 40, 5);
        let mut d = display();
        ctl.do_action(Action::FlipRuler, &mut d).unwrap();
        ctl.do_action(Action::MoveRulerDown, &mut d).unwrap();
        ctl.do_action(Action::MoveRulerDown, &mut d).unwrap();

        ctl.do_action(Action::FlipRuler, &mut d).unwrap();
        assert_eq!(d.ruler(), None);
        ctl.do_action(Action::MoveRulerUp, &mut d).unwrap();
        ctl.do_action(Action::FlipRuler, &mut d).unwrap();
        assert_eq!(ctl.ruler(), Some(2));
    }

    #[test]
    fn test_reset_hides_ruler() {
        let mut ctl = Controller::new(store_with(20), 40, 5);
        let mut d = display();
        ctl.do_action(Action::FlipRuler, &mut d).unwrap();
        ctl.do_action(Action::MoveRulerDown, &mut d).unwrap();
        assert_eq!(d.ruler(), Some(1));

        ctl.do_action(Action::Reset, &mut d).unwrap();
        assert_eq!(ctl.ruler(), None);
        assert_eq!(d.ruler(), None);
    }

    #[test]
    fn test_quit() {
        let mut ctl = Controller::new(store_with(3), 40, 5);
        let mut d = display();
        assert!(!ctl.is_quit());
        ctl.do_action(Action::Quit, &mut d).unwrap();
        assert!(ctl.is_quit());
    }

    #[test]
    fn test_render_viewport() {
        let mut ctl = Controller::new(store_with(20), 6, 3);
        ctl.set_max_width(20);
        let mut d = display();
        ctl.do_action(Action::PageDown, &mut d).unwrap();
        ctl.do_action(Action::ScrollLeft, &mut d).unwrap();
        ctl.do_action(Action::FlipNumbers, &mut d).unwrap();

        let mut d = PlainDisplay::new(Vec::new(), 20);
        ctl.render(&mut d).unwrap();
        assert_eq!(output(d), "04 ine 3 \n05 ine 4 \n06 ine 5 \n");
    }

    #[test]
    fn test_render_stops_at_end() {
        let ctl = Controller::new(store_with(2), 80, 10);
        let mut d = display();
        ctl.render(&mut d).unwrap();
        assert_eq!(output(d), "line 0 here\nline 1 here\n");
    }

    #[test]
    fn test_render_all_expands_tabs() {
        let store = Arc::new(LineStore::default());
        store.append("a\tb").unwrap();
        store.append("c").unwrap();
        let ctl = Controller::new(store, 1, 1).spaces_per_tab(2);
        let mut d = display();
        ctl.render_all(&mut d).unwrap();
        assert_eq!(output(d), "a  b\nc\n");
    }

    #[test]
    fn test_render_empty_store() {
        let ctl = Controller::new(Arc::new(LineStore::default()), 80, 10);
        let mut d = display();
        ctl.render(&mut d).unwrap();
        ctl.render_all(&mut d).unwrap();
        assert_eq!(output(d), "");
    }

    #[test]
    fn test_found_position() {
        let m = |line, start, end| Match { line, start, end };
        // Visible already.
        assert_eq!(found_position(0, 0, 80, 24, m(5, 10, 15)), (0, 0));
        // Below the screen.
        assert_eq!(found_position(0, 0, 80, 24, m(100, 10, 15)), (0, 92));
        // Past the right edge.
        assert_eq!(found_position(0, 0, 20, 24, m(1, 30, 35)), (15, 0));
        // Left of the window.
        assert_eq!(found_position(40, 0, 20, 24, m(1, 5, 8)), (5, 0));
    }

    #[test]
    fn test_file_title() {
        assert_eq!(file_title(Some("Logs"), None, None), "Logs");
        assert_eq!(file_title(None, None, None), STDIN_TITLE);
        assert_eq!(
            file_title(
                None,
                Some(Path::new("/home/user/notes.txt")),
                Some(Path::new("/home/user"))
            ),
            "~/notes.txt"
        );
        assert_eq!(
            file_title(None, Some(Path::new("/var/log/syslog")), Some(Path::new("/home/user"))),
            "/var/log/syslog"
        );
    }

    #[test]
    fn test_action_display() {
        assert_eq!(Action::GotoLine.to_string(), "go to line");
        assert_eq!(Action::FindPrevious.to_string(), "find previous");
        assert_eq!(Action::MoveRulerDown.to_string(), "move ruler down");
    }
}
