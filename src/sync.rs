//! Dual-view scroll synchronization
//!
//! The braille and ASCII views show the same lines, possibly with different
//! fonts and therefore different line heights. When the caret changes line in
//! the active view, the companion is scrolled so the same line sits at the same
//! vertical pixel. If that is impossible (companion would scroll before its
//! first line, clip the caret line, or run past its last line) the source view
//! is shifted instead.

use crate::layout::PageMetrics;

/// Pixel geometry of one scrollable view
pub trait ViewGeometry {
    /// Height of one line in pixels
    fn line_height(&self) -> i32;
    /// Height of the visible area in pixels
    fn client_height(&self) -> i32;
    /// Top of `line` relative to the top of the visible area
    fn line_pixel(&self, line: usize) -> i32;
    /// Scroll offset in pixels from the top of the content
    fn top_pixel(&self) -> i32;
    fn set_top_pixel(&mut self, top: i32);
    fn line_count(&self) -> usize;
}

/// Scroll offsets that align the companion view with the source view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollPlan {
    pub companion_top: i32,
    /// New source offset when the source had to move to make alignment possible
    pub source_top: Option<i32>,
}

impl ScrollPlan {
    pub fn apply<S, C>(&self, source: &mut S, companion: &mut C)
    where
        S: ViewGeometry + ?Sized,
        C: ViewGeometry + ?Sized,
    {
        if let Some(top) = self.source_top {
            source.set_top_pixel(top);
        }
        companion.set_top_pixel(self.companion_top);
    }
}

/// Compute the companion scroll offset for the caret on `line` in `source`
pub fn plan_companion_scroll<S, C>(source: &S, companion: &C, line: usize) -> ScrollPlan
where
    S: ViewGeometry + ?Sized,
    C: ViewGeometry + ?Sized,
{
    let line_height = companion.line_height();
    let source_line_pixel = source.line_pixel(line);
    let client_height = companion.client_height();

    let mut companion_top = line as i32 * line_height - source_line_pixel;
    let line_below = client_height - (source_line_pixel + line_height);
    let lines_below = companion.line_count() as i32 - line as i32;
    let bottom_gap = client_height - (source_line_pixel + lines_below * line_height);

    let shift = if companion_top < 0 {
        // Companion would scroll before its first line
        let shift = companion_top;
        companion_top = 0;
        Some(shift)
    } else if line_below < 0 {
        // Caret line would be clipped at the bottom of the companion
        companion_top -= line_below;
        Some(line_below)
    } else if bottom_gap > 0 {
        // Companion would scroll past its last line
        companion_top -= bottom_gap;
        Some(bottom_gap)
    } else {
        None
    };

    ScrollPlan {
        companion_top,
        source_top: shift.map(|s| source.top_pixel() - s),
    }
}

/// True if the caret line is not fully laid out in the visible area yet
pub fn needs_layout<S: ViewGeometry + ?Sized>(source: &S, line: usize) -> bool {
    let pixel = source.line_pixel(line);
    pixel < 0 || pixel + source.line_height() > source.client_height()
}

/// Uniform-height line viewport
///
/// Scroll requests made while the caret moves are only applied when layout
/// settles, the way a toolkit applies "show caret" on its next paint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextViewport {
    line_height: i32,
    client_height: i32,
    top_pixel: i32,
    line_count: usize,
    pending_reveal: Option<usize>,
}

impl TextViewport {
    pub fn new(line_height: i32, client_height: i32) -> Self {
        Self {
            line_height: line_height.max(1),
            client_height: client_height.max(0),
            top_pixel: 0,
            line_count: 1,
            pending_reveal: None,
        }
    }

    pub fn set_line_height(&mut self, height: i32) {
        self.line_height = height.max(1);
    }

    pub fn resize(&mut self, client_height: i32) {
        self.client_height = client_height.max(0);
    }

    pub fn set_line_count(&mut self, count: usize) {
        self.line_count = count.max(1);
    }

    /// Number of lines that fit fully in the visible area
    pub fn visible_lines(&self) -> usize {
        (self.client_height / self.line_height).max(0) as usize
    }

    /// First (partially) visible line
    pub fn top_line(&self) -> usize {
        (self.top_pixel / self.line_height).max(0) as usize
    }

    pub fn set_top_line(&mut self, line: usize) {
        self.set_top_pixel(line as i32 * self.line_height);
    }

    fn max_top_pixel(&self) -> i32 {
        (self.line_count as i32 * self.line_height - self.client_height).max(0)
    }

    /// Ask for `line` to be scrolled into view on the next settle
    pub fn request_reveal(&mut self, line: usize) {
        self.pending_reveal = Some(line);
    }

    pub fn is_settled(&self) -> bool {
        self.pending_reveal.is_none()
    }

    /// Apply a pending reveal; returns true if the scroll offset changed
    pub fn settle(&mut self) -> bool {
        let Some(line) = self.pending_reveal.take() else {
            return false;
        };
        let before = self.top_pixel;
        let line_top = line as i32 * self.line_height;
        if line_top < self.top_pixel {
            self.set_top_pixel(line_top);
        } else if line_top + self.line_height > self.top_pixel + self.client_height {
            self.set_top_pixel(line_top + self.line_height - self.client_height);
        }
        self.top_pixel != before
    }
}

impl ViewGeometry for TextViewport {
    fn line_height(&self) -> i32 {
        self.line_height
    }

    fn client_height(&self) -> i32 {
        self.client_height
    }

    fn line_pixel(&self, line: usize) -> i32 {
        line as i32 * self.line_height - self.top_pixel
    }

    fn top_pixel(&self) -> i32 {
        self.top_pixel
    }

    fn set_top_pixel(&mut self, top: i32) {
        self.top_pixel = top.clamp(0, self.max_top_pixel());
    }

    fn line_count(&self) -> usize {
        self.line_count
    }
}

/// Single-slot deferred task: scheduling replaces whatever was pending
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredSync<T> {
    slot: Option<T>,
}

impl<T> Default for DeferredSync<T> {
    fn default() -> Self {
        Self { slot: None }
    }
}

impl<T> DeferredSync<T> {
    /// Store a request, returning the one it cancelled
    pub fn schedule(&mut self, request: T) -> Option<T> {
        self.slot.replace(request)
    }

    /// Take the pending request for execution
    pub fn take(&mut self) -> Option<T> {
        self.slot.take()
    }

    pub fn cancel(&mut self) {
        self.slot = None;
    }

    pub fn pending(&self) -> Option<&T> {
        self.slot.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.slot.is_some()
    }
}

/// One caret movement as seen by [`CaretCues`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaretStep {
    pub line: usize,
    pub column: usize,
    /// Caret advanced by exactly one character
    pub stepped_forward: bool,
    pub line_changed: bool,
}

impl CaretStep {
    /// Typing across the line-bell column rings it
    pub fn rings_line_bell(&self, bell: Option<usize>) -> bool {
        self.stepped_forward && bell.is_some_and(|b| b > 0 && self.column == b)
    }
}

/// Per-view caret history for scroll sync and margin bells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaretCues {
    prev_offset: usize,
    prev_line: usize,
    prev_enter_line: usize,
}

impl CaretCues {
    /// Record a caret position and report how it moved
    pub fn observe(&mut self, offset: usize, line: usize, line_start: usize) -> CaretStep {
        let step = CaretStep {
            line,
            column: offset.saturating_sub(line_start),
            stepped_forward: offset == self.prev_offset + 1,
            line_changed: line != self.prev_line,
        };
        self.prev_offset = offset;
        self.prev_line = line;
        step
    }

    /// Record an Enter typed on `line`; true if it should ring the page bell
    pub fn observe_enter(&mut self, line: usize, metrics: &PageMetrics) -> bool {
        let consecutive = line == self.prev_enter_line + 1;
        self.prev_enter_line = line;
        consecutive
            && metrics
                .page_margin_bell
                .is_some_and(|bell| line % metrics.lines_per_page() + 2 == bell)
    }

    /// Forget history (document replaced)
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
