//! Document update functions for text editing and undo/redo

use crate::bell::BellKind;
use crate::commands::Cmd;
use crate::messages::DocumentMsg;
use crate::model::EditorModel;

/// Handle document messages (text editing, undo/redo)
pub fn update_document(model: &mut EditorModel, msg: DocumentMsg) -> Option<Cmd> {
    match msg {
        DocumentMsg::InsertChar(ch) => model.insert_at_caret(&ch.to_string()),

        DocumentMsg::InsertNewline => {
            let (line, column) = model.caret_position();
            let metrics = model.metrics;
            let active = model.active;
            let page_bell = model.view_mut(active).cues.observe_enter(line, &metrics)
                && model.page_margin_bell().is_some();

            // A paragraph mark stays with the line it ends
            let cmd = if model.document.is_paragraph_end(line)
                && column == model.document.line_length(line)
            {
                let at = model.document.line_text_end(line) + 1;
                model.edit(at, 0, "\n");
                model.move_caret_to(active, at + 1)
            } else {
                model.insert_at_caret("\n")
            };
            if page_bell {
                Some(Cmd::batch(vec![
                    cmd.unwrap_or_default(),
                    Cmd::Ring(BellKind::Page),
                ]))
            } else {
                cmd
            }
        }

        DocumentMsg::ToggleParagraphEnd => {
            let (line, _) = model.caret_position();
            let on = !model.document.is_paragraph_end(line);
            let record = model.document.set_paragraph_end(line, on)?;
            model.log.record(record);
            model.drain_views();
            tracing::debug!(line, on, "paragraph end toggled");
            Some(Cmd::Redraw)
        }

        DocumentMsg::DeleteBackward => {
            let caret = model.caret();
            if caret == 0 {
                return None;
            }
            let (line, column) = model.caret_position();
            // At a line start the join also drops the upper line's paragraph mark
            let start = if column == 0 {
                model.document.line_text_end(line - 1)
            } else {
                caret - 1
            };
            model.edit(start, caret - start, "");
            model.move_caret_to(model.active, start)
        }

        DocumentMsg::DeleteForward => {
            let caret = model.caret();
            let (line, _) = model.caret_position();
            let end = if caret < model.document.line_text_end(line) {
                caret + 1
            } else if line + 1 < model.document.line_count() {
                model.document.line_to_char(line + 1)
            } else {
                return None;
            };
            model.edit(caret, end - caret, "");
            model.caret_moved(model.active)
        }

        DocumentMsg::Undo => model.undo(),

        DocumentMsg::Redo => model.redo(),

        DocumentMsg::RewrapFromCaret => {
            if model.rewrap_from_caret() {
                Some(Cmd::Redraw)
            } else {
                None
            }
        }
    }
}
