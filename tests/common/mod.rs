//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use brf_edit::bell::{BellKind, BellPlayer, ClipId, MarginBells};
use brf_edit::codec::FileFormat;
use brf_edit::error::BellError;
use brf_edit::input::{KeyCode, KeyEvent};
use brf_edit::messages::{EditorMsg, Msg};
use brf_edit::model::{EditorModel, ViewKind};
use brf_edit::update::{dispatch, update};
use brf_edit::Cmd;

/// Create a model holding BRF text, caret at the start of the braille pane
pub fn test_model(text: &str) -> EditorModel {
    let mut model = EditorModel::new();
    model
        .load_from(FileFormat::Brf, text.as_bytes())
        .expect("BRF decoding never fails");
    model
}

/// Same as [`test_model`] with the braille caret at (line, column)
pub fn test_model_at(text: &str, line: usize, column: usize) -> EditorModel {
    let mut model = test_model(text);
    let offset = model.document.cursor_to_offset(line, column);
    model.move_caret_to(ViewKind::Braille, offset);
    model
}

/// Visible text of every line
pub fn lines(model: &EditorModel) -> Vec<String> {
    model.document.lines().map(|l| l.text).collect()
}

/// Document text with paragraph ends shown as `¶`
pub fn marked_text(model: &EditorModel) -> String {
    model
        .document
        .lines()
        .map(|l| {
            if l.paragraph_end {
                format!("{}¶", l.text)
            } else {
                l.text
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn key(view: ViewKind, event: KeyEvent) -> Msg {
    Msg::Editor(EditorMsg::Key { view, event })
}

/// Press every key of a chord, then release them in the same order
pub fn chord(model: &mut EditorModel, keys: &str) -> Vec<Cmd> {
    let mut cmds = Vec::new();
    for ch in keys.chars() {
        cmds.extend(update(
            model,
            key(ViewKind::Braille, KeyEvent::press(KeyCode::Char(ch))),
        ));
    }
    for ch in keys.chars() {
        cmds.extend(update(
            model,
            key(ViewKind::Braille, KeyEvent::release(KeyCode::Char(ch))),
        ));
    }
    cmds
}

/// Type a whole word as chords, one space-separated chord per cell
pub fn chords(model: &mut EditorModel, cells: &str) {
    for cell in cells.split(' ') {
        chord(model, cell);
    }
}

/// Press and release a non-character key in the braille pane
pub fn tap(model: &mut EditorModel, code: KeyCode) -> bool {
    let pressed = dispatch(model, key(ViewKind::Braille, KeyEvent::press(code)));
    dispatch(model, key(ViewKind::Braille, KeyEvent::release(code))) | pressed
}

/// What the fake player saw
#[derive(Debug, Default)]
pub struct PlayerLog {
    pub loaded: Vec<String>,
    pub played: Vec<ClipId>,
    pub released: Vec<ClipId>,
    /// Clips reported as still sounding
    pub playing: Vec<ClipId>,
}

/// Bell player that accepts any path ending in `.wav`
#[derive(Debug, Clone, Default)]
pub struct FakePlayer {
    pub log: Rc<RefCell<PlayerLog>>,
}

impl BellPlayer for FakePlayer {
    fn load(&mut self, path: &Path) -> Result<ClipId, BellError> {
        let name = path.display().to_string();
        if !name.ends_with(".wav") {
            return Err(BellError::UnsupportedFormat(name));
        }
        let mut log = self.log.borrow_mut();
        log.loaded.push(name);
        Ok(ClipId(log.loaded.len() as u32))
    }

    fn play(&mut self, clip: ClipId) {
        self.log.borrow_mut().played.push(clip);
    }

    fn is_playing(&self, clip: ClipId) -> bool {
        self.log.borrow().playing.contains(&clip)
    }

    fn release(&mut self, clip: ClipId) {
        self.log.borrow_mut().released.push(clip);
    }
}

/// Model with a fake player and both bell sounds loaded
pub fn model_with_bells(text: &str) -> (EditorModel, Rc<RefCell<PlayerLog>>) {
    let player = FakePlayer::default();
    let log = Rc::clone(&player.log);
    let mut model = EditorModel::with_bells(MarginBells::new(Box::new(player)));
    model
        .load_from(FileFormat::Brf, text.as_bytes())
        .expect("BRF decoding never fails");
    model
        .load_bell_sound(BellKind::Line, Path::new("line.wav"))
        .expect("fake load");
    model
        .load_bell_sound(BellKind::Page, Path::new("page.wav"))
        .expect("fake load");
    (model, log)
}
