//! Document model - the shared text buffer seen by both views
//!
//! Text lives in a single rope. A line the author ended as a paragraph carries
//! a trailing [`PARAGRAPH_END`] sentinel inside the rope; outside this module
//! lines are only handed out as tagged [`Line`] values, so neither the codecs
//! nor the layout code ever see the sentinel.

use ropey::Rope;
use std::ops::Range;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};

use super::history::ChangeRecord;

/// In-buffer paragraph-end marker (private use code point, never persisted)
pub const PARAGRAPH_END: char = '\u{E000}';

/// Line terminator used when the document is written out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }

    /// Line ending of the host platform
    pub fn platform() -> Self {
        if cfg!(target_os = "windows") {
            LineEnding::CrLf
        } else {
            LineEnding::Lf
        }
    }
}

/// One line of the document, without its line break
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    /// The author ended a paragraph here
    pub paragraph_end: bool,
}

impl Line {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            paragraph_end: false,
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            paragraph_end: true,
        }
    }

    /// Length in characters, excluding the paragraph marker
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Split a raw buffer line (no line break) into text and paragraph flag
    fn from_raw(raw: &str) -> Self {
        match raw.strip_suffix(PARAGRAPH_END) {
            Some(text) => Self::paragraph(text),
            None => Self::new(raw),
        }
    }

    fn push_raw(&self, out: &mut String) {
        out.push_str(&self.text);
        if self.paragraph_end {
            out.push(PARAGRAPH_END);
        }
    }
}

/// Notification sent to subscribers after every buffer mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextChange {
    /// `removed` chars at `start` were replaced by `inserted` chars
    Replaced {
        start: usize,
        removed: usize,
        inserted: usize,
    },
    /// The whole buffer was swapped out (file load)
    Reset,
}

/// Document state - the text buffer and associated file metadata
#[derive(Debug)]
pub struct Document {
    buffer: Rope,
    /// Path to the file on disk (None for new/unsaved files)
    pub file_path: Option<PathBuf>,
    /// Line terminator detected on load, used when saving
    pub line_ending: LineEnding,
    /// Incremented on each mutation
    pub revision: u64,
    subscribers: Vec<Sender<TextChange>>,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self::with_text("")
    }

    /// Create a document from raw buffer text (`\n` separated, sentinels inline)
    pub fn with_text(text: &str) -> Self {
        Self {
            buffer: Rope::from_str(text),
            file_path: None,
            line_ending: LineEnding::platform(),
            revision: 0,
            subscribers: Vec::new(),
        }
    }

    /// Build a document from tagged lines
    pub fn from_lines(lines: &[Line], line_ending: LineEnding) -> Self {
        let mut doc = Self::with_text(&join_raw(lines));
        doc.line_ending = line_ending;
        doc
    }

    /// Register a view (or any observer) for change notifications
    ///
    /// Dropping the receiver unsubscribes on the next mutation.
    pub fn subscribe(&mut self) -> Receiver<TextChange> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    fn publish(&mut self, change: TextChange) {
        self.revision = self.revision.wrapping_add(1);
        self.subscribers.retain(|tx| tx.send(change).is_ok());
    }

    /// Replace the whole content with another document's, keeping subscribers
    pub fn replace_content(&mut self, other: Document) {
        self.buffer = other.buffer;
        self.file_path = other.file_path;
        self.line_ending = other.line_ending;
        self.publish(TextChange::Reset);
    }

    /// Get the number of lines in the document (always >= 1)
    pub fn line_count(&self) -> usize {
        self.buffer.len_lines()
    }

    /// Total length in characters, paragraph markers included
    pub fn len_chars(&self) -> usize {
        self.buffer.len_chars()
    }

    /// Get a line by index
    pub fn line(&self, line_idx: usize) -> Option<Line> {
        self.raw_line(line_idx).map(|raw| Line::from_raw(&raw))
    }

    /// All lines, in order
    pub fn lines(&self) -> impl Iterator<Item = Line> + '_ {
        (0..self.line_count()).filter_map(|i| self.line(i))
    }

    /// Visible length of a line (excluding paragraph marker and newline)
    pub fn line_length(&self, line_idx: usize) -> usize {
        self.line(line_idx).map(|l| l.len()).unwrap_or(0)
    }

    pub fn is_paragraph_end(&self, line_idx: usize) -> bool {
        self.line(line_idx).is_some_and(|l| l.paragraph_end)
    }

    /// Raw line content (paragraph marker included, newline excluded)
    fn raw_line(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.buffer.len_lines() {
            return None;
        }
        let mut s = self.buffer.line(line_idx).to_string();
        if s.ends_with('\n') {
            s.pop();
        }
        Some(s)
    }

    /// Raw length of a line: paragraph marker included, newline excluded
    fn raw_line_length(&self, line_idx: usize) -> usize {
        let line = self.buffer.line(line_idx);
        let len = line.len_chars();
        if len > 0 && line.char(len - 1) == '\n' {
            len - 1
        } else {
            len
        }
    }

    /// Offset of the first character of a line
    pub fn line_to_char(&self, line_idx: usize) -> usize {
        if line_idx >= self.buffer.len_lines() {
            return self.buffer.len_chars();
        }
        self.buffer.line_to_char(line_idx)
    }

    /// Line containing a character offset
    pub fn char_to_line(&self, offset: usize) -> usize {
        self.buffer.char_to_line(offset.min(self.buffer.len_chars()))
    }

    /// Offset just past the visible text of a line (before any paragraph marker)
    pub fn line_text_end(&self, line_idx: usize) -> usize {
        self.line_to_char(line_idx) + self.line_length(line_idx)
    }

    /// Convert a (line, column) position to a buffer offset
    pub fn cursor_to_offset(&self, line: usize, column: usize) -> usize {
        if line >= self.buffer.len_lines() {
            return self.buffer.len_chars();
        }
        self.line_to_char(line) + column.min(self.line_length(line))
    }

    /// Convert a buffer offset to (line, column) position
    pub fn offset_to_cursor(&self, offset: usize) -> (usize, usize) {
        let clamped = offset.min(self.buffer.len_chars());
        let line = self.buffer.char_to_line(clamped);
        (line, clamped - self.buffer.line_to_char(line))
    }

    /// Clamp a caret offset so it never sits past a line's paragraph marker
    pub fn clamp_caret(&self, offset: usize) -> usize {
        let (line, _) = self.offset_to_cursor(offset);
        offset.min(self.line_text_end(line))
    }

    /// Text between two offsets, paragraph markers included
    pub fn slice(&self, range: Range<usize>) -> String {
        let end = range.end.min(self.buffer.len_chars());
        let start = range.start.min(end);
        self.buffer.slice(start..end).to_string()
    }

    /// Raw buffer text, paragraph markers included
    pub fn raw_text(&self) -> String {
        self.buffer.to_string()
    }

    /// Buffer text with paragraph markers removed
    pub fn plain_text(&self) -> String {
        self.buffer.chars().filter(|&c| c != PARAGRAPH_END).collect()
    }

    /// Replace `length` chars at `start` with `text`
    ///
    /// Returns the record that undoes this edit: applying it replaces the
    /// inserted range with the removed text.
    pub fn replace(&mut self, start: usize, length: usize, text: &str) -> ChangeRecord {
        let total = self.buffer.len_chars();
        let start = start.min(total);
        let end = (start + length).min(total);
        let removed = self.buffer.slice(start..end).to_string();
        if end > start {
            self.buffer.remove(start..end);
        }
        if !text.is_empty() {
            self.buffer.insert(start, text);
        }
        let inserted = text.chars().count();
        tracing::trace!(start, removed = end - start, inserted, "buffer replace");
        self.publish(TextChange::Replaced {
            start,
            removed: end - start,
            inserted,
        });
        ChangeRecord {
            start,
            length: inserted,
            replaced_text: removed,
        }
    }

    /// Replace a run of whole lines with tagged lines, as one range-replace
    pub fn replace_lines(&mut self, lines: Range<usize>, replacement: &[Line]) -> ChangeRecord {
        let start = self.line_to_char(lines.start);
        let last = lines.end.saturating_sub(1).max(lines.start);
        let end = self.line_to_char(last) + self.raw_line_length(last);
        self.replace(start, end - start, &join_raw(replacement))
    }

    /// Set or clear the paragraph marker on a line
    ///
    /// Returns None when the line is empty or already in the requested state.
    pub fn set_paragraph_end(&mut self, line_idx: usize, on: bool) -> Option<ChangeRecord> {
        let line = self.line(line_idx)?;
        if line.is_empty() || line.paragraph_end == on {
            return None;
        }
        let at = self.line_text_end(line_idx);
        Some(if on {
            self.replace(at, 0, &PARAGRAPH_END.to_string())
        } else {
            self.replace(at, 1, "")
        })
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Join tagged lines into raw buffer text
pub(crate) fn join_raw(lines: &[Line]) -> String {
    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        line.push_raw(&mut out);
    }
    out
}
