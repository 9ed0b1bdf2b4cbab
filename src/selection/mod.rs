// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! [`SelectionMachine`]: content-coordinate (logical-line, offset) selection with
//! single/double/triple-click semantics, drag extension, and edge-based auto-scroll.
//! It observes content through the read-only [`ContentSource`] interface rather than
//! owning a [`crate::viewport::ViewportState`]/[`crate::history::ScrollbackHistory`]
//! reference directly, so it can be driven from the input-forwarder thread under its
//! own lock without ever acquiring the parser lock.

mod autoscroll;
mod click;
mod prompt_boundary;

pub use autoscroll::{AutoScrollTicker, EdgeDirection, AUTO_SCROLL_HZ};
pub use click::{ClickDetector, ClickType};
pub use prompt_boundary::{HeuristicPromptBoundary, PromptBoundaryStrategy};

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
    }
}

/// Read-only view of content [`SelectionMachine`] needs: line text (trailing blanks
/// trimmed, except the current uncommitted line which keeps them so cursor-past-EOL
/// clicks stay meaningful) and the OSC-133 input-start column for a line, if tracked.
///
/// `-1` denotes the current uncommitted line — implementors must resolve it against
/// live viewport content, not history.
pub trait ContentSource {
    fn line_text(&self, logical_line: i64) -> String;
    fn line_len(&self, logical_line: i64) -> usize { self.line_text(logical_line).chars().count() }
    fn prompt_input_start(&self, logical_line: i64) -> Option<usize>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    Idle,
    Dragging,
    MultiClickHeld,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionText {
    pub mime: &'static str,
    pub bytes: Vec<u8>,
    pub ok: bool,
}

impl SelectionText {
    fn empty() -> Self {
        Self {
            mime: "text/plain",
            bytes: Vec::new(),
            ok: false,
        }
    }
}

pub struct SelectionMachine {
    state: SelectionState,
    anchor_line: i64,
    anchor_offset: usize,
    current_line: i64,
    current_offset: usize,
    rendered: bool,
    boundary: Box<dyn PromptBoundaryStrategy + Send>,
}

impl SelectionMachine {
    #[must_use]
    pub fn new() -> Self { Self::with_boundary_strategy(Box::new(HeuristicPromptBoundary)) }

    #[must_use]
    pub fn with_boundary_strategy(boundary: Box<dyn PromptBoundaryStrategy + Send>) -> Self {
        Self {
            state: SelectionState::Idle,
            anchor_line: -1,
            anchor_offset: 0,
            current_line: -1,
            current_offset: 0,
            rendered: false,
            boundary,
        }
    }

    #[must_use]
    pub fn state(&self) -> SelectionState { self.state }

    #[must_use]
    pub fn is_rendered(&self) -> bool { self.rendered }

    /// Begins a new selection gesture.
    pub fn start(
        &mut self,
        source: &dyn ContentSource,
        logical_line: i64,
        char_offset: usize,
        click_type: ClickType,
        modifiers: Modifiers,
    ) {
        match click_type {
            ClickType::Single => {
                self.anchor_line = logical_line;
                self.anchor_offset = char_offset;
                self.current_line = logical_line;
                self.current_offset = char_offset;
                self.state = SelectionState::Dragging;
                self.rendered = true;
            }
            ClickType::Double => {
                let (start, end) = word_bounds(&source.line_text(logical_line), char_offset);
                self.anchor_line = logical_line;
                self.current_line = logical_line;
                self.anchor_offset = start;
                self.current_offset = end;
                self.state = SelectionState::MultiClickHeld;
                self.rendered = true;
            }
            ClickType::Triple => {
                let text = source.line_text(logical_line);
                let line_len = text.chars().count();
                let skip = if modifiers.contains(Modifiers::SHIFT) {
                    0
                } else {
                    source.prompt_input_start(logical_line).unwrap_or_else(|| self.boundary.boundary_col(&text))
                };
                self.anchor_line = logical_line;
                self.current_line = logical_line;
                self.anchor_offset = skip.min(line_len);
                self.current_offset = line_len;
                self.state = SelectionState::MultiClickHeld;
                self.rendered = true;
            }
        }
    }

    /// Extends the active drag; a no-op outside [`SelectionState::Dragging`].
    pub fn update(&mut self, logical_line: i64, char_offset: usize) {
        if self.state == SelectionState::Dragging {
            self.current_line = logical_line;
            self.current_offset = char_offset;
        }
    }

    /// Ends the gesture, returning extracted text. Multi-click selections stay
    /// rendered; a plain single-click drag transitions to `Idle`.
    pub fn finish(&mut self, source: &dyn ContentSource) -> SelectionText {
        if self.state == SelectionState::Idle {
            return SelectionText::empty();
        }
        let text = self.extract_text(source);
        match self.state {
            SelectionState::MultiClickHeld => self.state = SelectionState::Finished,
            SelectionState::Dragging => {
                if self.anchor_line == self.current_line && self.anchor_offset == self.current_offset {
                    self.state = SelectionState::Idle;
                    self.rendered = false;
                } else {
                    self.state = SelectionState::Finished;
                }
            }
            _ => {}
        }
        if text.is_empty() {
            return SelectionText::empty();
        }
        SelectionText {
            mime: "text/plain",
            bytes: text.into_bytes(),
            ok: true,
        }
    }

    /// Clears both the rendered range and active state.
    pub fn cancel(&mut self) {
        self.state = SelectionState::Idle;
        self.rendered = false;
    }

    /// Normalised `(start_line, start_offset, end_line, end_offset)` with start ≤ end
    /// under (line, offset) lexicographic order. `None` when nothing is
    /// active/rendered.
    #[must_use]
    pub fn range(&self) -> Option<(i64, usize, i64, usize)> {
        if !self.rendered {
            return None;
        }
        let a = (self.anchor_line, self.anchor_offset);
        let c = (self.current_line, self.current_offset);
        let (start, end) = if a <= c { (a, c) } else { (c, a) };
        Some((start.0, start.1, end.0, end.1))
    }

    /// Extracts the selected text: each logical line's cells `[start..end)` (full line
    /// for interior lines), trailing spaces trimmed per line, joined with `\n`.
    #[must_use]
    pub fn extract_text(&self, source: &dyn ContentSource) -> String {
        let Some((start_line, start_off, end_line, end_off)) = self.range() else {
            return String::new();
        };
        if start_line == end_line {
            let text = source.line_text(start_line);
            let chars: Vec<char> = text.chars().collect();
            let end = end_off.min(chars.len());
            let start = start_off.min(end);
            return chars[start..end].iter().collect::<String>().trim_end().to_string();
        }

        let mut out = Vec::new();
        let mut line = start_line;
        loop {
            let text = source.line_text(line);
            let chars: Vec<char> = text.chars().collect();
            let slice: String = if line == start_line {
                chars[start_off.min(chars.len())..].iter().collect()
            } else if line == end_line {
                chars[..end_off.min(chars.len())].iter().collect()
            } else {
                chars.iter().collect()
            };
            out.push(slice.trim_end().to_string());
            if line == end_line {
                break;
            }
            line += 1;
        }
        out.join("\n")
    }
}

impl Default for SelectionMachine {
    fn default() -> Self { Self::new() }
}

const fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'
}

/// Expands `offset` into the maximal run of word characters around it. Empty
/// (start == end == offset) if the pointer lands on a non-word character.
fn word_bounds(text: &str, offset: usize) -> (usize, usize) {
    let chars: Vec<char> = text.chars().collect();
    if offset >= chars.len() || !is_word_char(chars[offset]) {
        return (offset, offset);
    }
    let mut start = offset;
    while start > 0 && is_word_char(chars[start - 1]) {
        start -= 1;
    }
    let mut end = offset + 1;
    while end < chars.len() && is_word_char(chars[end]) {
        end += 1;
    }
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeSource {
        lines: Vec<&'static str>,
        prompt: Option<(i64, usize)>,
    }

    impl ContentSource for FakeSource {
        fn line_text(&self, logical_line: i64) -> String {
            self.lines.get(usize::try_from(logical_line.max(0)).unwrap_or(0)).unwrap_or(&"").to_string()
        }

        fn prompt_input_start(&self, logical_line: i64) -> Option<usize> {
            self.prompt.and_then(|(l, c)| (l == logical_line).then_some(c))
        }
    }

    #[test]
    fn double_click_expands_word() {
        let source = FakeSource { lines: vec!["hello world"], prompt: None };
        let mut sel = SelectionMachine::new();
        sel.start(&source, 0, 7, ClickType::Double, Modifiers::empty());
        assert_eq!(sel.range(), Some((0, 6, 0, 11)));
    }

    #[test]
    fn double_click_on_non_word_char_is_empty() {
        let source = FakeSource { lines: vec!["hello world"], prompt: None };
        let mut sel = SelectionMachine::new();
        sel.start(&source, 0, 5, ClickType::Double, Modifiers::empty());
        assert_eq!(sel.range(), Some((0, 5, 0, 5)));
    }

    #[test]
    fn triple_click_skips_prompt_unless_shift() {
        let source = FakeSource { lines: vec!["$ cargo build"], prompt: Some((5, 2)) };
        let mut sel = SelectionMachine::new();
        sel.start(&source, 5, 20, ClickType::Triple, Modifiers::empty());
        assert_eq!(sel.range(), Some((5, 2, 5, 13)));

        sel.start(&source, 5, 20, ClickType::Triple, Modifiers::SHIFT);
        assert_eq!(sel.range(), Some((5, 0, 5, 13)));
    }

    #[test]
    fn range_normalises_reversed_drag() {
        let source = FakeSource { lines: vec!["hello world"], prompt: None };
        let mut sel = SelectionMachine::new();
        sel.start(&source, 2, 8, ClickType::Single, Modifiers::empty());
        sel.update(1, 3);
        assert_eq!(sel.range(), Some((1, 3, 2, 8)));
    }

    #[test]
    fn cancel_clears_rendered_state() {
        let source = FakeSource { lines: vec!["hi"], prompt: None };
        let mut sel = SelectionMachine::new();
        sel.start(&source, 0, 0, ClickType::Single, Modifiers::empty());
        sel.cancel();
        assert_eq!(sel.range(), None);
        assert_eq!(sel.state(), SelectionState::Idle);
    }

    #[test]
    fn finish_is_idempotent_when_idle() {
        let source = FakeSource { lines: vec!["hi"], prompt: None };
        let mut sel = SelectionMachine::new();
        assert_eq!(sel.finish(&source), SelectionText::empty());
    }

    #[test]
    fn multiline_extraction_trims_trailing_spaces_per_line() {
        let source = FakeSource { lines: vec!["hello   ", "world"], prompt: None };
        let mut sel = SelectionMachine::new();
        sel.start(&source, 0, 0, ClickType::Single, Modifiers::empty());
        sel.update(1, 5);
        assert_eq!(sel.extract_text(&source), "hello\nworld");
    }
}
