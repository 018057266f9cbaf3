//! Message types for the Elm-style architecture
//!
//! All state changes flow through these message types.

use std::path::PathBuf;

use crate::bell::BellKind;
use crate::input::KeyEvent;
use crate::model::{FontSpec, ViewKind};

/// Direction for caret movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Caret, focus and raw key messages
#[derive(Debug, Clone)]
pub enum EditorMsg {
    /// Raw key event delivered to a pane
    Key { view: ViewKind, event: KeyEvent },
    /// A pane gained keyboard focus
    Focus(ViewKind),
    /// Move the active caret one step
    MoveCaret(Direction),
    /// Move the active caret to the start of its line (Home)
    MoveCaretLineStart,
    /// Move the active caret to the end of its visible text (End)
    MoveCaretLineEnd,
    /// Place a pane's caret (mouse click)
    SetCaret {
        view: ViewKind,
        line: usize,
        column: usize,
    },
    /// Scroll a pane by whole lines (positive = down)
    Scroll { view: ViewKind, lines: i32 },
}

/// Document-modifying messages
#[derive(Debug, Clone)]
pub enum DocumentMsg {
    /// Insert a character at the active caret
    InsertChar(char),
    /// Split the line at the active caret (Enter)
    InsertNewline,
    /// Set or clear the paragraph end of the caret line (Shift+Enter)
    ToggleParagraphEnd,
    /// Delete character before caret (Backspace)
    DeleteBackward,
    /// Delete character after caret (Delete)
    DeleteForward,
    Undo,
    Redo,
    /// Reflow overlong lines from the caret line on
    RewrapFromCaret,
}

/// Geometry and page settings
#[derive(Debug, Clone)]
pub enum LayoutMsg {
    /// The host finished laying out and painting a pane
    Painted(ViewKind),
    /// A pane's visible area changed height (pixels)
    Resize { view: ViewKind, height: i32 },
    SetLinesPerPage(usize),
    SetCharsPerLine(usize),
    /// Line bell column (None = off)
    SetLineMarginBell(Option<usize>),
    /// Page bell line (None = off)
    SetPageMarginBell(Option<usize>),
    SetViewVisible { view: ViewKind, visible: bool },
    SetFont {
        view: ViewKind,
        font: Option<FontSpec>,
    },
}

/// File and resource messages
#[derive(Debug, Clone)]
pub enum AppMsg {
    NewFile,
    OpenFile(PathBuf),
    SaveFile,
    SaveFileAs(PathBuf),
    LoadBellSound { kind: BellKind, path: PathBuf },
}

/// Top-level message type
#[derive(Debug, Clone)]
pub enum Msg {
    Editor(EditorMsg),
    Document(DocumentMsg),
    Layout(LayoutMsg),
    App(AppMsg),
}
