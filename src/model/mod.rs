//! Editor model - the complete state of the braille editor
//!
//! One [`Document`] shown through two panes (braille and ASCII), a change log,
//! page metrics, margin bells and the pending companion-scroll request.

pub mod document;
pub mod history;
pub mod view;

pub use document::{Document, Line, LineEnding, TextChange, PARAGRAPH_END};
pub use history::{ChangeLog, ChangeRecord};
pub use view::{FontSpec, ViewKind, ViewState};

use std::path::{Path, PathBuf};

use crate::bell::{BellKind, MarginBells};
use crate::chord::ChordDecoder;
use crate::codec::{self, FileFormat};
use crate::commands::Cmd;
use crate::error::{BellError, CodecError};
use crate::layout::{self, PageMetrics};
use crate::sync::{self, DeferredSync};

/// Companion scroll to run once layout settles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncRequest {
    pub source: ViewKind,
    pub target: ViewKind,
}

/// What closing the document requires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseGuard {
    /// Nothing unsaved
    Proceed,
    /// Unsaved changes; ask before discarding
    ConfirmDiscard,
}

/// The complete editor model
#[derive(Debug)]
pub struct EditorModel {
    pub document: Document,
    pub log: ChangeLog,
    pub metrics: PageMetrics,
    pub braille: ViewState,
    pub ascii: ViewState,
    pub braille_decoder: ChordDecoder,
    pub ascii_decoder: ChordDecoder,
    /// Pane with keyboard focus
    pub active: ViewKind,
    pub bells: MarginBells,
    pub pending_sync: DeferredSync<SyncRequest>,
    /// Last failure reported to the user
    pub last_error: Option<String>,
}

impl Default for EditorModel {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorModel {
    /// Empty document, default metrics, headless bell player
    pub fn new() -> Self {
        Self::with_bells(MarginBells::default())
    }

    pub fn with_bells(bells: MarginBells) -> Self {
        let mut document = Document::new();
        let braille = ViewState::new(ViewKind::Braille, &mut document);
        let ascii = ViewState::new(ViewKind::Ascii, &mut document);
        Self {
            document,
            log: ChangeLog::new(),
            metrics: PageMetrics::default(),
            braille,
            ascii,
            braille_decoder: ChordDecoder::braille(),
            ascii_decoder: ChordDecoder::view_only(),
            active: ViewKind::Braille,
            bells,
            pending_sync: DeferredSync::default(),
            last_error: None,
        }
    }

    // ========================================================================
    // Views
    // ========================================================================

    pub fn view(&self, kind: ViewKind) -> &ViewState {
        match kind {
            ViewKind::Braille => &self.braille,
            ViewKind::Ascii => &self.ascii,
        }
    }

    pub fn view_mut(&mut self, kind: ViewKind) -> &mut ViewState {
        match kind {
            ViewKind::Braille => &mut self.braille,
            ViewKind::Ascii => &mut self.ascii,
        }
    }

    /// The pane for `source` and its companion, both mutable
    fn view_pair_mut(&mut self, source: ViewKind) -> (&mut ViewState, &mut ViewState) {
        match source {
            ViewKind::Braille => (&mut self.braille, &mut self.ascii),
            ViewKind::Ascii => (&mut self.ascii, &mut self.braille),
        }
    }

    pub fn decoder_mut(&mut self, kind: ViewKind) -> &mut ChordDecoder {
        match kind {
            ViewKind::Braille => &mut self.braille_decoder,
            ViewKind::Ascii => &mut self.ascii_decoder,
        }
    }

    pub fn active_view(&self) -> &ViewState {
        self.view(self.active)
    }

    /// Caret offset in the active pane
    pub fn caret(&self) -> usize {
        self.active_view().caret()
    }

    /// Caret (line, column) in the active pane
    pub fn caret_position(&self) -> (usize, usize) {
        self.active_view().caret_position(&self.document)
    }

    /// Deliver pending document notifications to both panes
    pub fn drain_views(&mut self) {
        self.braille.sync_with(&self.document);
        self.ascii.sync_with(&self.document);
    }

    // ========================================================================
    // Editing
    // ========================================================================

    /// Replace a range and record the edit for undo
    pub fn edit(&mut self, start: usize, length: usize, text: &str) {
        let inverse = self.document.replace(start, length, text);
        self.log.record(inverse);
        self.drain_views();
    }

    /// Insert text at the active caret and move the caret past it
    pub fn insert_at_caret(&mut self, text: &str) -> Option<Cmd> {
        let kind = self.active;
        let caret = self.caret();
        self.edit(caret, 0, text);
        let target = caret + text.chars().count();
        self.move_caret_to(kind, target)
    }

    /// Move a pane's caret and react to the movement
    pub fn move_caret_to(&mut self, kind: ViewKind, offset: usize) -> Option<Cmd> {
        self.place_caret(kind, offset);
        self.caret_moved(kind)
    }

    /// Set a pane's caret without any movement side effects
    fn place_caret(&mut self, kind: ViewKind, offset: usize) {
        let view = match kind {
            ViewKind::Braille => &mut self.braille,
            ViewKind::Ascii => &mut self.ascii,
        };
        view.set_caret(&self.document, offset);
    }

    /// Margin bell and companion scroll after a caret change in `kind`
    pub fn caret_moved(&mut self, kind: ViewKind) -> Option<Cmd> {
        let line_bell = self.line_margin_bell();
        let is_active = kind == self.active;
        let doc = &self.document;
        let view = match kind {
            ViewKind::Braille => &mut self.braille,
            ViewKind::Ascii => &mut self.ascii,
        };
        let caret = view.caret();
        let line = doc.char_to_line(caret);
        let step = view.cues.observe(caret, line, doc.line_to_char(line));

        let mut cmds = vec![Cmd::Redraw];
        if step.rings_line_bell(line_bell) {
            cmds.push(Cmd::Ring(BellKind::Line));
        }
        if step.line_changed && is_active {
            view.viewport.request_reveal(line);
            self.request_sync(kind);
        }
        Some(Cmd::batch(cmds))
    }

    /// Center the active caret line in its pane
    pub fn center_caret(&mut self) {
        let (line, _) = self.caret_position();
        let view = self.view_mut(self.active);
        let half = view.viewport.visible_lines() / 2;
        view.viewport.set_top_line(line.saturating_sub(half));
    }

    pub fn undo(&mut self) -> Option<Cmd> {
        let caret = self.log.undo(&mut self.document)?;
        self.after_replay(caret)
    }

    pub fn redo(&mut self) -> Option<Cmd> {
        let caret = self.log.redo(&mut self.document)?;
        self.after_replay(caret)
    }

    fn after_replay(&mut self, caret: usize) -> Option<Cmd> {
        self.drain_views();
        let kind = self.active;
        self.place_caret(kind, caret);
        self.center_caret();
        self.caret_moved(kind)
    }

    /// Rewrap from the active caret line; history is discarded if anything moved
    pub fn rewrap_from_caret(&mut self) -> bool {
        let (line, _) = self.caret_position();
        let changed = layout::rewrap_from_line(&mut self.document, &self.metrics, line);
        if changed {
            self.log.forget();
            self.drain_views();
        }
        changed
    }

    // ========================================================================
    // Dual-view sync
    // ========================================================================

    /// Align the companion of `source` now, or once layout settles
    pub fn request_sync(&mut self, source: ViewKind) {
        let request = SyncRequest {
            source,
            target: source.other(),
        };
        let view = self.view(source);
        let line = self.document.char_to_line(view.caret());
        if !view.viewport.is_settled() || sync::needs_layout(&view.viewport, line) {
            if let Some(dropped) = self.pending_sync.schedule(request) {
                tracing::trace!(?dropped, "replaced pending view sync");
            }
        } else {
            self.pending_sync.cancel();
            self.run_sync(request);
        }
    }

    fn run_sync(&mut self, request: SyncRequest) {
        let line = self
            .document
            .char_to_line(self.view(request.source).caret());
        let (source, target) = self.view_pair_mut(request.source);
        let plan = sync::plan_companion_scroll(&source.viewport, &target.viewport, line);
        plan.apply(&mut source.viewport, &mut target.viewport);
        tracing::trace!(?request, ?plan, line, "views aligned");
    }

    /// Layout settled: apply pending reveals and run any deferred sync
    pub fn layout_settled(&mut self) -> bool {
        let moved = self.braille.viewport.settle() | self.ascii.viewport.settle();
        match self.pending_sync.take() {
            Some(request) => {
                self.run_sync(request);
                true
            }
            None => moved,
        }
    }

    // ========================================================================
    // Settings surface
    // ========================================================================

    pub fn lines_per_page(&self) -> usize {
        self.metrics.lines_per_page()
    }

    pub fn set_lines_per_page(&mut self, value: usize) -> bool {
        self.metrics.set_lines_per_page(value)
    }

    pub fn chars_per_line(&self) -> usize {
        self.metrics.chars_per_line()
    }

    pub fn set_chars_per_line(&mut self, value: usize) -> bool {
        self.metrics.set_chars_per_line(value)
    }

    /// Line bell column, or None when disabled or no sound is loaded
    pub fn line_margin_bell(&self) -> Option<usize> {
        self.metrics
            .line_margin_bell
            .filter(|_| self.bells.is_loaded(BellKind::Line))
    }

    /// Ignored while no line bell sound is loaded
    pub fn set_line_margin_bell(&mut self, value: Option<usize>) {
        if self.bells.is_loaded(BellKind::Line) {
            self.metrics.line_margin_bell = value;
        }
    }

    pub fn page_margin_bell(&self) -> Option<usize> {
        self.metrics
            .page_margin_bell
            .filter(|_| self.bells.is_loaded(BellKind::Page))
    }

    pub fn set_page_margin_bell(&mut self, value: Option<usize>) {
        if self.bells.is_loaded(BellKind::Page) {
            self.metrics.page_margin_bell = value;
        }
    }

    pub fn load_bell_sound(&mut self, kind: BellKind, path: &Path) -> Result<(), BellError> {
        self.bells.load(kind, path)
    }

    pub fn set_view_visible(&mut self, kind: ViewKind, visible: bool) {
        self.view_mut(kind).visible = visible;
    }

    pub fn set_font(&mut self, kind: ViewKind, font: Option<FontSpec>) {
        self.view_mut(kind).set_font(font);
    }

    /// Panic with context if a caret sits past a paragraph mark or the log
    /// points beyond its records
    #[cfg(debug_assertions)]
    pub fn assert_invariants_with_context(&self, context: &str) {
        for view in [&self.braille, &self.ascii] {
            let caret = view.caret();
            let clamped = self.document.clamp_caret(caret);
            assert_eq!(
                caret, clamped,
                "[{}] {:?} caret {} not on a valid position (expected {})",
                context, view.kind, caret, clamped
            );
        }
        assert!(
            self.log.change_index() <= self.log.len(),
            "[{}] change index {} beyond {} records",
            context,
            self.log.change_index(),
            self.log.len()
        );
    }

    // ========================================================================
    // Side effects
    // ========================================================================

    /// Execute the effects of a command; returns true if a redraw is needed
    pub fn perform(&mut self, cmd: Cmd) -> bool {
        match cmd {
            Cmd::None => false,
            Cmd::Redraw => true,
            Cmd::Ring(kind) => {
                self.bells.ring(kind);
                false
            }
            Cmd::Batch(cmds) => cmds
                .into_iter()
                .fold(false, |redraw, c| self.perform(c) | redraw),
        }
    }

    // ========================================================================
    // Files
    // ========================================================================

    pub fn file_path(&self) -> Option<&Path> {
        self.document.file_path.as_deref()
    }

    pub fn is_modified(&self) -> bool {
        self.log.is_modified()
    }

    pub fn close_guard(&self) -> CloseGuard {
        if self.is_modified() {
            CloseGuard::ConfirmDiscard
        } else {
            CloseGuard::Proceed
        }
    }

    /// Swap in a freshly decoded document and reset editing state
    fn install(&mut self, document: Document) {
        self.document.replace_content(document);
        self.log.clear();
        self.pending_sync.cancel();
        for kind in [ViewKind::Braille, ViewKind::Ascii] {
            self.decoder_mut(kind).reset();
        }
        self.drain_views();
    }

    /// Start an empty, unnamed document
    pub fn new_file(&mut self) {
        let mut document = Document::new();
        document.line_ending = self.document.line_ending;
        self.install(document);
    }

    /// Load a file; on failure the current document is left untouched
    pub fn open_file(&mut self, path: &Path) -> Result<(), CodecError> {
        let decoded = codec::read_file(path)?;
        decoded.apply_metrics(&mut self.metrics);
        self.install(decoded.document);
        Ok(())
    }

    /// Load from any reader in the given format
    pub fn load_from<R: std::io::Read>(
        &mut self,
        format: FileFormat,
        reader: R,
    ) -> Result<(), CodecError> {
        let decoded = format.read(reader)?;
        decoded.apply_metrics(&mut self.metrics);
        self.install(decoded.document);
        Ok(())
    }

    /// Save to the document's current path
    pub fn save_file(&mut self) -> Result<(), CodecError> {
        let path = self
            .document
            .file_path
            .clone()
            .ok_or(CodecError::NoFilePath)?;
        codec::write_file(&path, &self.document, &self.metrics)?;
        self.log.mark_saved();
        Ok(())
    }

    /// Save under a new path, which becomes the document's path
    pub fn save_file_as(&mut self, path: PathBuf) -> Result<(), CodecError> {
        codec::write_file(&path, &self.document, &self.metrics)?;
        self.document.file_path = Some(path);
        self.log.mark_saved();
        Ok(())
    }

    /// Write to any writer in the given format and mark the document saved
    pub fn save_to<W: std::io::Write>(
        &mut self,
        format: FileFormat,
        writer: W,
    ) -> Result<(), CodecError> {
        format.write(writer, &self.document, &self.metrics)?;
        self.log.mark_saved();
        Ok(())
    }
}
