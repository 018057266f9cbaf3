//! App message handlers (file operations, bell sounds)

use std::fmt::Display;

use crate::commands::Cmd;
use crate::messages::AppMsg;
use crate::model::EditorModel;

/// Handle app messages (file operations, bell sounds)
pub fn update_app(model: &mut EditorModel, msg: AppMsg) -> Option<Cmd> {
    match msg {
        AppMsg::NewFile => {
            model.new_file();
            model.last_error = None;
            Some(Cmd::Redraw)
        }

        AppMsg::OpenFile(path) => match model.open_file(&path) {
            Ok(()) => {
                model.last_error = None;
                Some(Cmd::Redraw)
            }
            Err(e) => report(model, "open", &path.display(), e),
        },

        AppMsg::SaveFile => match model.save_file() {
            Ok(()) => {
                model.last_error = None;
                Some(Cmd::Redraw)
            }
            Err(e) => report(model, "save", &"document", e),
        },

        AppMsg::SaveFileAs(path) => {
            let shown = path.display().to_string();
            match model.save_file_as(path) {
                Ok(()) => {
                    model.last_error = None;
                    Some(Cmd::Redraw)
                }
                Err(e) => report(model, "save", &shown, e),
            }
        }

        AppMsg::LoadBellSound { kind, path } => match model.load_bell_sound(kind, &path) {
            Ok(()) => None,
            Err(e) => report(model, "load bell sound", &path.display(), e),
        },
    }
}

fn report(
    model: &mut EditorModel,
    action: &str,
    target: &dyn Display,
    err: impl Display,
) -> Option<Cmd> {
    tracing::warn!("Failed to {} {}: {}", action, target, err);
    model.last_error = Some(format!("Unable to {action} {target}: {err}"));
    Some(Cmd::Redraw)
}
