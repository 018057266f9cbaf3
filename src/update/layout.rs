//! Pane geometry, paint notifications and page settings

use crate::commands::Cmd;
use crate::messages::LayoutMsg;
use crate::model::EditorModel;

/// Handle layout messages
pub fn update_layout(model: &mut EditorModel, msg: LayoutMsg) -> Option<Cmd> {
    match msg {
        LayoutMsg::Painted(view) => {
            let changed = model.layout_settled();
            if changed {
                tracing::trace!(?view, "layout settled, panes scrolled");
            }
            changed.then_some(Cmd::Redraw)
        }

        LayoutMsg::Resize { view, height } => {
            model.view_mut(view).viewport.resize(height);
            Some(Cmd::Redraw)
        }

        LayoutMsg::SetLinesPerPage(value) => model.set_lines_per_page(value).then_some(Cmd::Redraw),

        LayoutMsg::SetCharsPerLine(value) => model.set_chars_per_line(value).then_some(Cmd::Redraw),

        LayoutMsg::SetLineMarginBell(value) => {
            model.set_line_margin_bell(value);
            None
        }

        LayoutMsg::SetPageMarginBell(value) => {
            model.set_page_margin_bell(value);
            None
        }

        LayoutMsg::SetViewVisible { view, visible } => {
            model.set_view_visible(view, visible);
            Some(Cmd::Redraw)
        }

        LayoutMsg::SetFont { view, font } => {
            model.set_font(view, font);
            Some(Cmd::Redraw)
        }
    }
}
