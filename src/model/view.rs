//! Per-view state for the braille and ASCII panes
//!
//! Both views observe the same [`Document`] through its change channel; text is
//! never copied into a view.

use std::sync::mpsc::Receiver;

use serde::{Deserialize, Serialize};

use super::document::{Document, Line, TextChange};
use crate::chord::braille_glyph;
use crate::sync::{CaretCues, TextViewport};

/// Which of the two panes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    Braille,
    Ascii,
}

impl ViewKind {
    pub fn other(self) -> Self {
        match self {
            ViewKind::Braille => ViewKind::Ascii,
            ViewKind::Ascii => ViewKind::Braille,
        }
    }

    /// How a stored character is shown in this pane
    pub fn display_char(self, ch: char) -> char {
        match self {
            ViewKind::Braille => braille_glyph(ch),
            ViewKind::Ascii => ch,
        }
    }

    pub fn render_line(self, line: &Line) -> String {
        line.text.chars().map(|c| self.display_char(c)).collect()
    }
}

/// Font selection for a pane
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSpec {
    pub name: String,
    /// Point size
    pub size: u32,
}

impl FontSpec {
    pub fn new(name: impl Into<String>, size: u32) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }

    /// Line height in pixels at 96 dpi
    pub fn line_height(&self) -> i32 {
        ((self.size as i32 * 4) / 3).max(1)
    }

    pub fn default_for(kind: ViewKind) -> Self {
        match kind {
            ViewKind::Braille => Self::new("BrailleZephyr_6s", 18),
            ViewKind::Ascii => Self::new("Monospace", 18),
        }
    }
}

/// Default visible area height in pixels until the host reports a size
pub const DEFAULT_CLIENT_HEIGHT: i32 = 600;

/// State of one pane
#[derive(Debug)]
pub struct ViewState {
    pub kind: ViewKind,
    caret: usize,
    pub visible: bool,
    /// None = host default font
    pub font: Option<FontSpec>,
    pub viewport: TextViewport,
    pub cues: CaretCues,
    changes: Receiver<TextChange>,
}

impl ViewState {
    /// Create a pane observing `doc`
    pub fn new(kind: ViewKind, doc: &mut Document) -> Self {
        let font = FontSpec::default_for(kind);
        let mut viewport = TextViewport::new(font.line_height(), DEFAULT_CLIENT_HEIGHT);
        viewport.set_line_count(doc.line_count());
        Self {
            kind,
            caret: 0,
            visible: true,
            font: Some(font),
            viewport,
            cues: CaretCues::default(),
            changes: doc.subscribe(),
        }
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn top_line(&self) -> usize {
        self.viewport.top_line()
    }

    /// Move the caret, clamped inside the document and before any paragraph mark
    pub fn set_caret(&mut self, doc: &Document, offset: usize) {
        self.caret = doc.clamp_caret(offset);
    }

    /// Caret as (line, column)
    pub fn caret_position(&self, doc: &Document) -> (usize, usize) {
        doc.offset_to_cursor(self.caret)
    }

    pub fn set_font(&mut self, font: Option<FontSpec>) {
        let height = font
            .as_ref()
            .unwrap_or(&FontSpec::default_for(self.kind))
            .line_height();
        self.viewport.set_line_height(height);
        self.font = font;
    }

    /// Apply pending document notifications to the caret and viewport
    ///
    /// Returns true if any notification was received.
    pub fn sync_with(&mut self, doc: &Document) -> bool {
        let mut received = false;
        while let Ok(change) = self.changes.try_recv() {
            received = true;
            match change {
                TextChange::Replaced {
                    start,
                    removed,
                    inserted,
                } => {
                    if self.caret > start {
                        self.caret = if self.caret >= start + removed {
                            self.caret - removed + inserted
                        } else {
                            start
                        };
                    }
                }
                TextChange::Reset => {
                    self.caret = 0;
                    self.cues.reset();
                    self.viewport.set_top_line(0);
                }
            }
        }
        if received {
            self.viewport.set_line_count(doc.line_count());
            self.caret = doc.clamp_caret(self.caret);
        }
        received
    }
}
