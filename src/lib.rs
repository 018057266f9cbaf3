//! brf-edit - document and input engine for a dual-view braille editor
//!
//! One line-oriented document is shown as braille glyphs and as ASCII
//! braille, typed into with a six-key chord keyboard, and stored as BRF or
//! BZY. All state changes flow through [`update::update`] in the Elm
//! architecture style.

pub mod bell;
pub mod chord;
pub mod cli;
pub mod codec;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod error;
pub mod input;
pub mod layout;
pub mod messages;
pub mod model;
pub mod sync;
pub mod tracing;
pub mod update;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::EditorConfig;
pub use error::{BellError, CodecError};
pub use messages::Msg;
pub use model::{Document, EditorModel};
