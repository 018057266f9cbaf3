//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions.

mod app;
mod document;
mod editor;
mod layout;

use crate::commands::Cmd;
use crate::messages::Msg;
use crate::model::EditorModel;

#[cfg(debug_assertions)]
use crate::tracing::CaretSnapshot;
#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

pub use app::update_app;
pub use document::update_document;
pub use editor::update_editor;
pub use layout::update_layout;

/// Main update function - dispatches to sub-handlers
///
/// In debug builds, this wraps with tracing instrumentation.
#[inline]
pub fn update(model: &mut EditorModel, msg: Msg) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    {
        update_traced(model, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(model, msg)
    }
}

/// Run a message and perform its command; returns true if a redraw is needed
pub fn dispatch(model: &mut EditorModel, msg: Msg) -> bool {
    match update(model, msg) {
        Some(cmd) => model.perform(cmd),
        None => false,
    }
}

fn update_inner(model: &mut EditorModel, msg: Msg) -> Option<Cmd> {
    match msg {
        Msg::Editor(m) => update_editor(model, m),
        Msg::Document(m) => update_document(model, m),
        Msg::Layout(m) => update_layout(model, m),
        Msg::App(m) => update_app(model, m),
    }
}

/// Traced update wrapper (debug builds only)
///
/// Logs caret changes across both panes and checks model invariants.
#[cfg(debug_assertions)]
fn update_traced(model: &mut EditorModel, msg: Msg) -> Option<Cmd> {
    use crate::messages::LayoutMsg;

    // Paint notifications arrive every frame
    let is_noisy = matches!(&msg, Msg::Layout(LayoutMsg::Painted(_)));

    let msg_name = msg_type_name(&msg);
    let _span = if is_noisy {
        None
    } else {
        Some(span!(Level::DEBUG, "update", msg = %msg_name).entered())
    };

    let before = CaretSnapshot::from_model(model);
    if !is_noisy {
        debug!(target: "message", msg = %msg_name, "processing");
    }

    let result = update_inner(model, msg);

    if let Some(diff) = before.diff(&CaretSnapshot::from_model(model)) {
        debug!(target: "caret", %diff, "state changed");
    }
    model.assert_invariants_with_context(&msg_name);

    result
}

#[cfg(debug_assertions)]
fn msg_type_name(msg: &Msg) -> String {
    match msg {
        Msg::Editor(m) => format!("Editor::{:?}", m),
        Msg::Document(m) => format!("Document::{:?}", m),
        Msg::Layout(m) => format!("Layout::{:?}", m),
        Msg::App(m) => format!("App::{:?}", m),
    }
}
