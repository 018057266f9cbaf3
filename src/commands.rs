//! Command types for the Elm-style architecture
//!
//! Commands represent side effects that should be performed after an update.

use crate::bell::BellKind;

/// Side effects requested by [`crate::update::update`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// Request a redraw of both panes
    Redraw,
    /// Sound a margin bell (skipped while it is still playing)
    Ring(BellKind),
    /// Execute multiple commands
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Create a batch of commands, collapsing trivial batches
    pub fn batch(mut cmds: Vec<Cmd>) -> Self {
        cmds.retain(|c| *c != Cmd::None);
        match cmds.len() {
            0 => Cmd::None,
            1 => cmds.remove(0),
            _ => Cmd::Batch(cmds),
        }
    }

    /// Check if this command requires a redraw
    pub fn needs_redraw(&self) -> bool {
        match self {
            Cmd::None => false,
            Cmd::Redraw => true,
            Cmd::Ring(_) => false,
            Cmd::Batch(cmds) => cmds.iter().any(|c| c.needs_redraw()),
        }
    }

    /// Bells requested by this command, in order
    pub fn bells(&self) -> Vec<BellKind> {
        match self {
            Cmd::Ring(kind) => vec![*kind],
            Cmd::Batch(cmds) => cmds.iter().flat_map(|c| c.bells()).collect(),
            _ => Vec::new(),
        }
    }
}
