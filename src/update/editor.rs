//! Caret movement, focus and raw key handling

use crate::commands::Cmd;
use crate::input::{KeyCode, KeyEvent};
use crate::messages::{Direction, DocumentMsg, EditorMsg};
use crate::model::{EditorModel, ViewKind};

use super::document::update_document;

/// Handle editor messages (keys, caret movement, focus)
pub fn update_editor(model: &mut EditorModel, msg: EditorMsg) -> Option<Cmd> {
    match msg {
        EditorMsg::Key { view, event } => handle_key(model, view, event),

        EditorMsg::Focus(view) => {
            if model.active == view {
                return None;
            }
            model.active = view;
            model.decoder_mut(view.other()).reset();
            Some(Cmd::Redraw)
        }

        EditorMsg::MoveCaret(direction) => move_caret(model, direction),

        EditorMsg::MoveCaretLineStart => {
            let (line, _) = model.caret_position();
            let target = model.document.line_to_char(line);
            model.move_caret_to(model.active, target)
        }

        EditorMsg::MoveCaretLineEnd => {
            let (line, _) = model.caret_position();
            let target = model.document.line_text_end(line);
            model.move_caret_to(model.active, target)
        }

        EditorMsg::SetCaret { view, line, column } => {
            model.active = view;
            let target = model.document.cursor_to_offset(line, column);
            model.move_caret_to(view, target)
        }

        EditorMsg::Scroll { view, lines } => {
            let viewport = &mut model.view_mut(view).viewport;
            let top = viewport.top_line() as i64 + i64::from(lines);
            viewport.set_top_line(top.max(0) as usize);
            Some(Cmd::Redraw)
        }
    }
}

/// Route a key event through the pane's chord decoder
fn handle_key(model: &mut EditorModel, view: ViewKind, event: KeyEvent) -> Option<Cmd> {
    if event.pressed && model.active != view {
        model.active = view;
    }

    if !event.pressed {
        let decoder = model.decoder_mut(view);
        let committed = match event.code {
            KeyCode::Char(ch) => decoder.key_released(ch),
            _ => decoder.other_key_released(),
        };
        return committed.and_then(|cell| {
            model.active = view;
            model.insert_at_caret(&cell.to_string())
        });
    }

    match event.code {
        KeyCode::Char(ch) => {
            let decoder = model.decoder_mut(view);
            let is_dot = decoder.key_pressed(ch);
            if is_dot || decoder.suppresses(ch) {
                return None;
            }
            update_document(model, DocumentMsg::InsertChar(ch))
        }
        KeyCode::Enter if event.shift => update_document(model, DocumentMsg::ToggleParagraphEnd),
        KeyCode::Enter => update_document(model, DocumentMsg::InsertNewline),
        KeyCode::Backspace => update_document(model, DocumentMsg::DeleteBackward),
        KeyCode::Delete => update_document(model, DocumentMsg::DeleteForward),
        KeyCode::Left => move_caret(model, Direction::Left),
        KeyCode::Right => move_caret(model, Direction::Right),
        KeyCode::Up => move_caret(model, Direction::Up),
        KeyCode::Down => move_caret(model, Direction::Down),
        KeyCode::Home => update_editor(model, EditorMsg::MoveCaretLineStart),
        KeyCode::End => update_editor(model, EditorMsg::MoveCaretLineEnd),
    }
}

/// Step the active caret; line boundaries are crossed at visible line ends
fn move_caret(model: &mut EditorModel, direction: Direction) -> Option<Cmd> {
    let doc = &model.document;
    let (line, column) = model.caret_position();
    let last_line = doc.line_count() - 1;

    let (line, column) = match direction {
        Direction::Left if column > 0 => (line, column - 1),
        Direction::Left if line > 0 => (line - 1, doc.line_length(line - 1)),
        Direction::Right if column < doc.line_length(line) => (line, column + 1),
        Direction::Right if line < last_line => (line + 1, 0),
        Direction::Up if line > 0 => (line - 1, column),
        Direction::Down if line < last_line => (line + 1, column),
        _ => return None,
    };

    let target = doc.cursor_to_offset(line, column);
    model.move_caret_to(model.active, target)
}
