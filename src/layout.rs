//! Page metrics, render decorations and paragraph rewrap

use std::ops::Range;

use crate::model::document::{Document, Line};

/// Default lines per braille page
pub const DEFAULT_LINES_PER_PAGE: usize = 25;
/// Default cells per braille line
pub const DEFAULT_CHARS_PER_LINE: usize = 40;
pub const DEFAULT_LINE_MARGIN_BELL: usize = 33;
pub const DEFAULT_PAGE_MARGIN_BELL: usize = 25;

/// Page geometry and margin bell positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMetrics {
    lines_per_page: usize,
    chars_per_line: usize,
    /// Column that rings the line bell (None = disabled)
    pub line_margin_bell: Option<usize>,
    /// Line within a page that rings the page bell (None = disabled)
    pub page_margin_bell: Option<usize>,
}

impl Default for PageMetrics {
    fn default() -> Self {
        Self {
            lines_per_page: DEFAULT_LINES_PER_PAGE,
            chars_per_line: DEFAULT_CHARS_PER_LINE,
            line_margin_bell: Some(DEFAULT_LINE_MARGIN_BELL),
            page_margin_bell: Some(DEFAULT_PAGE_MARGIN_BELL),
        }
    }
}

impl PageMetrics {
    /// Metrics with the given geometry; zero values fall back to the defaults
    pub fn new(lines_per_page: usize, chars_per_line: usize) -> Self {
        let mut metrics = Self::default();
        metrics.lines_per_page = if lines_per_page > 0 {
            lines_per_page
        } else {
            DEFAULT_LINES_PER_PAGE
        };
        metrics.chars_per_line = if chars_per_line > 0 {
            chars_per_line
        } else {
            DEFAULT_CHARS_PER_LINE
        };
        metrics
    }

    pub fn lines_per_page(&self) -> usize {
        self.lines_per_page
    }

    pub fn chars_per_line(&self) -> usize {
        self.chars_per_line
    }

    /// Take the page size stored in a file. Bell positions are left as they
    /// are; zero or missing values keep the current size.
    pub fn adopt_page_size(
        &mut self,
        lines_per_page: Option<usize>,
        chars_per_line: Option<usize>,
    ) {
        if let Some(lpp) = lines_per_page.filter(|&v| v > 0) {
            self.lines_per_page = lpp;
        }
        if let Some(cpl) = chars_per_line.filter(|&v| v > 0) {
            self.chars_per_line = cpl;
        }
    }

    /// Change the page length, keeping the page bell the same distance from
    /// the end of the page
    ///
    /// Returns false (and changes nothing) for zero.
    pub fn set_lines_per_page(&mut self, value: usize) -> bool {
        if value == 0 {
            return false;
        }
        self.page_margin_bell = self
            .page_margin_bell
            .map(|bell| shift_keeping_distance(bell, self.lines_per_page, value));
        self.lines_per_page = value;
        true
    }

    /// Change the line length, keeping the line bell the same distance from
    /// the right margin
    pub fn set_chars_per_line(&mut self, value: usize) -> bool {
        if value == 0 {
            return false;
        }
        self.line_margin_bell = self
            .line_margin_bell
            .map(|bell| shift_keeping_distance(bell, self.chars_per_line, value));
        self.chars_per_line = value;
        true
    }

    /// Line `line` starts a new page
    pub fn is_first_line_on_page(&self, line: usize) -> bool {
        line % self.lines_per_page == 0
    }

    /// Page number (0-based) holding a line
    pub fn page_of_line(&self, line: usize) -> usize {
        line / self.lines_per_page
    }

    /// Number of pages needed for `line_count` lines
    pub fn page_count(&self, line_count: usize) -> usize {
        line_count.div_ceil(self.lines_per_page).max(1)
    }

    /// Column where the right margin guide is drawn
    pub fn right_margin_column(&self) -> usize {
        self.chars_per_line
    }

    /// Render hints for a run of visible lines
    pub fn decorations(&self, doc: &Document, lines: Range<usize>) -> Vec<LineDecoration> {
        let end = lines.end.min(doc.line_count());
        (lines.start..end)
            .map(|line| LineDecoration {
                line,
                page_separator: line > 0 && self.is_first_line_on_page(line),
                paragraph_end: doc.is_paragraph_end(line),
            })
            .collect()
    }
}

fn shift_keeping_distance(bell: usize, old_limit: usize, new_limit: usize) -> usize {
    let distance = old_limit.saturating_sub(bell);
    new_limit.saturating_sub(distance)
}

/// What to draw around one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineDecoration {
    pub line: usize,
    /// A page separator is drawn above this line
    pub page_separator: bool,
    /// The line carries a paragraph-end mark
    pub paragraph_end: bool,
}

/// Where to split an overlong line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WrapPoint {
    /// End of the segment kept on the line
    head_end: usize,
    /// Start of the segment moved to the next line
    tail_start: usize,
}

/// Find a word boundary to split `chars` at, or None when the line cannot be
/// wrapped without leaving a uselessly short first segment
fn find_wrap_point(chars: &[char], cpl: usize) -> Option<WrapPoint> {
    let half = cpl / 2;
    let quarter = cpl / 4;

    let tail_start = if chars[cpl] != ' ' {
        let mut at = cpl;
        while at > half && chars[at] != ' ' {
            at -= 1;
        }
        if at == half {
            return None;
        }
        at + 1
    } else {
        let mut at = cpl;
        while at < chars.len() && chars[at] == ' ' {
            at += 1;
        }
        if at == chars.len() {
            return None;
        }
        at
    };

    let mut end = tail_start - 1;
    while end > quarter && chars[end] == ' ' {
        end -= 1;
    }
    if end == quarter {
        return None;
    }

    Some(WrapPoint {
        head_end: end + 1,
        tail_start,
    })
}

/// Reflow lines longer than `chars_per_line`, starting at `start_line`
///
/// Overflow from a line that is not a paragraph end is merged into the
/// following line. The pass stops at the first short paragraph-terminated
/// line. Returns true if the document changed.
pub fn rewrap_from_line(doc: &mut Document, metrics: &PageMetrics, start_line: usize) -> bool {
    let cpl = metrics.chars_per_line();
    let mut changed = false;
    let mut i = start_line;

    while i < doc.line_count() {
        let Some(line) = doc.line(i) else {
            break;
        };
        if line.is_empty() {
            if line.paragraph_end {
                break;
            }
            i += 1;
            continue;
        }

        let chars: Vec<char> = line.text.chars().collect();
        if chars.len() <= cpl {
            if line.paragraph_end {
                break;
            }
            i += 1;
            continue;
        }

        let Some(wrap) = find_wrap_point(&chars, cpl) else {
            tracing::trace!(line = i, "rewrap: no usable wrap point");
            i += 1;
            continue;
        };

        let head: String = chars[..wrap.head_end].iter().collect();
        let mut tail = Line {
            text: chars[wrap.tail_start..].iter().collect(),
            paragraph_end: line.paragraph_end,
        };
        let mut replaced = i..i + 1;
        if !line.paragraph_end {
            if let Some(next) = doc.line(i + 1) {
                tail.text.push(' ');
                tail.text.push_str(&next.text);
                tail.paragraph_end = next.paragraph_end;
                replaced = i..i + 2;
            }
        }

        doc.replace_lines(replaced, &[Line::new(head), tail]);
        changed = true;
        i += 1;
    }

    if changed {
        tracing::debug!(start_line, chars_per_line = cpl, "rewrapped");
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::document::LineEnding;

    fn doc_of(lines: &[Line]) -> Document {
        Document::from_lines(lines, LineEnding::Lf)
    }

    fn texts(doc: &Document) -> Vec<String> {
        doc.lines().map(|l| l.text).collect()
    }

    // ========================================================================
    // PageMetrics
    // ========================================================================

    #[test]
    fn test_defaults() {
        let m = PageMetrics::default();
        assert_eq!(m.lines_per_page(), 25);
        assert_eq!(m.chars_per_line(), 40);
        assert_eq!(m.line_margin_bell, Some(33));
        assert_eq!(m.page_margin_bell, Some(25));
    }

    #[test]
    fn test_first_line_on_page() {
        let m = PageMetrics::new(25, 40);
        assert!(m.is_first_line_on_page(0));
        assert!(!m.is_first_line_on_page(24));
        assert!(m.is_first_line_on_page(25));
        assert_eq!(m.page_of_line(49), 1);
        assert_eq!(m.page_count(51), 3);
        assert_eq!(m.page_count(0), 1);
    }

    #[test]
    fn test_zero_metrics_rejected() {
        let mut m = PageMetrics::default();
        assert!(!m.set_lines_per_page(0));
        assert!(!m.set_chars_per_line(0));
        assert_eq!(m, PageMetrics::default());
    }

    #[test]
    fn test_line_bell_follows_margin() {
        let mut m = PageMetrics::default();
        assert!(m.set_chars_per_line(32));
        assert_eq!(m.line_margin_bell, Some(25));
        m.set_chars_per_line(5);
        assert_eq!(m.line_margin_bell, Some(0));
    }

    #[test]
    fn test_page_bell_follows_page_end() {
        let mut m = PageMetrics::default();
        m.page_margin_bell = Some(20);
        m.set_lines_per_page(30);
        assert_eq!(m.page_margin_bell, Some(25));
        m.page_margin_bell = None;
        m.set_lines_per_page(10);
        assert_eq!(m.page_margin_bell, None);
    }

    #[test]
    fn test_decorations() {
        let m = PageMetrics::new(2, 40);
        let doc = doc_of(&[
            Line::new("a"),
            Line::paragraph("b"),
            Line::new("c"),
            Line::new("d"),
        ]);
        let decos = m.decorations(&doc, 0..10);
        assert_eq!(decos.len(), 4);
        assert!(!decos[0].page_separator);
        assert!(decos[1].paragraph_end);
        assert!(decos[2].page_separator);
        assert!(!decos[3].page_separator);
        assert_eq!(m.right_margin_column(), 40);
    }

    // ========================================================================
    // Rewrap
    // ========================================================================

    #[test]
    fn test_rewrap_42_chars_space_at_38() {
        let mut text = "x".repeat(38);
        text.push(' ');
        text.push_str("yyy");
        assert_eq!(text.chars().count(), 42);

        let mut doc = doc_of(&[Line::new(text), Line::paragraph("next line")]);
        assert!(rewrap_from_line(&mut doc, &PageMetrics::new(25, 40), 0));
        assert_eq!(texts(&doc), vec!["x".repeat(38), "yyy next line".to_string()]);
        assert!(doc.is_paragraph_end(1));
    }

    #[test]
    fn test_rewrap_space_at_margin_skips_spaces() {
        let text = format!("{}   tail", "a".repeat(10));
        let mut doc = doc_of(&[Line::paragraph(text)]);
        assert!(rewrap_from_line(&mut doc, &PageMetrics::new(25, 10), 0));
        assert_eq!(texts(&doc), vec!["a".repeat(10), "tail".to_string()]);
        assert!(!doc.is_paragraph_end(0));
        assert!(doc.is_paragraph_end(1));
    }

    #[test]
    fn test_rewrap_cascades_through_paragraph() {
        let mut doc = doc_of(&[
            Line::new("one two three four"),
            Line::new("five six"),
            Line::paragraph("seven"),
            Line::new("untouched because the paragraph ended"),
        ]);
        assert!(rewrap_from_line(&mut doc, &PageMetrics::new(25, 10), 0));
        let out = texts(&doc);
        assert_eq!(
            out,
            vec![
                "one two",
                "three four",
                "five six",
                "seven",
                "untouched because the paragraph ended"
            ]
        );
        for line in doc.lines().take(4) {
            assert!(line.len() <= 10);
        }
        assert!(doc.is_paragraph_end(3));
    }

    #[test]
    fn test_rewrap_skips_unbreakable_line() {
        let long = "z".repeat(30);
        let mut doc = doc_of(&[Line::new(long.clone())]);
        assert!(!rewrap_from_line(&mut doc, &PageMetrics::new(25, 10), 0));
        assert_eq!(texts(&doc), vec![long]);
    }

    #[test]
    fn test_rewrap_no_space_past_half_mark() {
        let text = format!("a {}", "b".repeat(20));
        let mut doc = doc_of(&[Line::new(text.clone())]);
        assert!(!rewrap_from_line(&mut doc, &PageMetrics::new(25, 8), 0));
        assert_eq!(texts(&doc), vec![text]);
    }

    #[test]
    fn test_rewrap_skips_trailing_spaces_only() {
        let text = format!("{}{}", "a".repeat(10), " ".repeat(5));
        let mut doc = doc_of(&[Line::new(text.clone())]);
        assert!(!rewrap_from_line(&mut doc, &PageMetrics::new(25, 10), 0));
        assert_eq!(texts(&doc), vec![text]);
    }

    #[test]
    fn test_rewrap_short_head_rejected() {
        // Preceding word ends before the quarter mark
        let text = format!("a{}{}", " ".repeat(6), "b".repeat(10));
        let mut doc = doc_of(&[Line::new(text.clone())]);
        assert!(!rewrap_from_line(&mut doc, &PageMetrics::new(25, 8), 0));
        assert_eq!(texts(&doc), vec![text]);
    }

    #[test]
    fn test_rewrap_stops_at_short_paragraph() {
        let mut doc = doc_of(&[
            Line::paragraph("short"),
            Line::new("this one is far too long to fit"),
        ]);
        assert!(!rewrap_from_line(&mut doc, &PageMetrics::new(25, 10), 0));
        assert_eq!(doc.line_count(), 2);
    }

    #[test]
    fn test_rewrap_skips_empty_lines() {
        let mut doc = doc_of(&[Line::new(""), Line::paragraph("aaaa bbbb cccc")]);
        assert!(rewrap_from_line(&mut doc, &PageMetrics::new(25, 10), 0));
        assert_eq!(texts(&doc), vec!["", "aaaa bbbb", "cccc"]);
    }

    #[test]
    fn test_rewrap_stops_at_empty_paragraph_end() {
        let mut doc = doc_of(&[Line::paragraph(""), Line::new("aaaa bbbb cccc dddd")]);
        assert!(!rewrap_from_line(&mut doc, &PageMetrics::new(25, 10), 0));
        assert_eq!(texts(&doc), vec!["", "aaaa bbbb cccc dddd"]);
        assert!(doc.is_paragraph_end(0));
    }

    #[test]
    fn test_rewrap_from_later_line() {
        let long = "aaaa bbbb cccc";
        let mut doc = doc_of(&[Line::new(long), Line::paragraph(long)]);
        rewrap_from_line(&mut doc, &PageMetrics::new(25, 10), 1);
        assert_eq!(texts(&doc), vec![long, "aaaa bbbb", "cccc"]);
    }

    #[test]
    fn test_rewrap_is_idempotent() {
        let mut doc = doc_of(&[
            Line::new("the quick brown fox jumps over the lazy dog and keeps running"),
            Line::new("across the wide green field"),
            Line::paragraph("until sunset"),
            Line::new(""),
            Line::paragraph("a second paragraph that is rather long as well"),
        ]);
        let metrics = PageMetrics::new(25, 16);
        rewrap_from_line(&mut doc, &metrics, 0);
        let once = doc.raw_text();
        assert!(!rewrap_from_line(&mut doc, &metrics, 0));
        assert_eq!(doc.raw_text(), once);
    }
}
