//! Change log (undo/redo) for the shared document
//!
//! Every record is a range-replace: applying it to the document yields the
//! record that undoes it. Undo and redo both work by applying a record and
//! recording its inverse back into the log at the same position.

use super::document::Document;

/// A reversible edit: replace `length` chars at `start` with `replaced_text`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    /// Char offset of the edited range
    pub start: usize,
    /// Length of the range currently occupying `start..start + length`
    pub length: usize,
    /// Text that was there before the edit
    pub replaced_text: String,
}

impl ChangeRecord {
    /// Apply the record, returning the record that reverts it
    pub fn apply(&self, doc: &mut Document) -> ChangeRecord {
        doc.replace(self.start, self.length, &self.replaced_text)
    }

    /// Caret position after this record has been applied
    pub fn caret_after(&self) -> usize {
        self.start + self.replaced_text.chars().count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Replay {
    Undo,
    Redo,
}

/// Ordered edit records with an undo boundary and a saved marker
#[derive(Debug, Clone)]
pub struct ChangeLog {
    records: Vec<ChangeRecord>,
    /// Number of edits currently applied
    change_index: usize,
    /// `change_index` at the last save; None once that state is unreachable
    save_index: Option<usize>,
    replay: Option<Replay>,
    max_size: usize,
}

impl Default for ChangeLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeLog {
    /// Create a new change log with default max size
    pub fn new() -> Self {
        Self::with_max_size(10_000)
    }

    /// Create a new change log with specified max size
    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            records: Vec::new(),
            change_index: 0,
            save_index: Some(0),
            replay: None,
            max_size: max_size.max(1),
        }
    }

    /// Record the inverse of an edit that was just applied to the document
    pub fn record(&mut self, record: ChangeRecord) {
        match self.replay.take() {
            Some(Replay::Undo) => {
                self.records.insert(self.change_index, record);
            }
            Some(Replay::Redo) => {
                self.records.insert(self.change_index, record);
                self.change_index += 1;
            }
            None => {
                self.records.truncate(self.change_index);
                if self.save_index.is_some_and(|s| s > self.change_index) {
                    self.save_index = None;
                }
                self.records.push(record);
                self.change_index += 1;

                // Trim if exceeded max size
                while self.records.len() > self.max_size {
                    self.records.remove(0);
                    self.change_index -= 1;
                    self.save_index = match self.save_index {
                        Some(0) | None => None,
                        Some(s) => Some(s - 1),
                    };
                }
            }
        }
    }

    /// Undo the most recent applied edit
    ///
    /// Returns the caret offset at the end of the restored text, or None at
    /// the start of history.
    pub fn undo(&mut self, doc: &mut Document) -> Option<usize> {
        if self.change_index == 0 {
            return None;
        }
        self.change_index -= 1;
        let edit = self.records.remove(self.change_index);
        self.replay = Some(Replay::Undo);
        let inverse = edit.apply(doc);
        self.record(inverse);
        tracing::debug!(index = self.change_index, "undo");
        Some(edit.caret_after())
    }

    /// Reapply the next undone edit
    pub fn redo(&mut self, doc: &mut Document) -> Option<usize> {
        if self.change_index == self.records.len() {
            return None;
        }
        let edit = self.records.remove(self.change_index);
        self.replay = Some(Replay::Redo);
        let inverse = edit.apply(doc);
        self.record(inverse);
        tracing::debug!(index = self.change_index, "redo");
        Some(edit.caret_after())
    }

    pub fn can_undo(&self) -> bool {
        self.change_index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.change_index < self.records.len()
    }

    pub fn is_modified(&self) -> bool {
        self.save_index != Some(self.change_index)
    }

    pub fn mark_saved(&mut self) {
        self.save_index = Some(self.change_index);
    }

    /// Reset to an empty, unmodified log (after a load)
    pub fn clear(&mut self) {
        self.records.clear();
        self.change_index = 0;
        self.save_index = Some(0);
        self.replay = None;
    }

    /// Drop all history but keep the document marked modified
    pub fn forget(&mut self) {
        self.clear();
        self.save_index = None;
    }

    /// Number of records (applied and undone)
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn change_index(&self) -> usize {
        self.change_index
    }
}
