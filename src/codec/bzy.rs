//! BZY: native format with a two-line settings header
//!
//! ```text
//! Chars Per Line:  40
//! Lines Per Page:  25
//! first line of text
//! end of a paragraph¶
//! ```

use super::{detect_crlf, latin1_to_string, push_latin1, Decoded};
use crate::error::CodecError;
use crate::layout::PageMetrics;
use crate::model::document::{Document, Line, LineEnding};

const CHARS_PER_LINE_LABEL: &str = "Chars Per Line:  ";
const LINES_PER_PAGE_LABEL: &str = "Lines Per Page:  ";
/// Pilcrow byte marking a paragraph end on disk
const PARAGRAPH_MARK: char = '\u{b6}';

fn parse_header(raw: Option<&str>, label: &str, line: usize) -> Result<usize, CodecError> {
    let malformed = || CodecError::MalformedHeader {
        line,
        content: raw.unwrap_or_default().to_string(),
    };
    let value = raw
        .and_then(|l| l.strip_prefix(label))
        .ok_or_else(malformed)?;
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(malformed()),
    }
}

/// Decode BZY bytes; a bad header fails the whole load
pub fn decode(bytes: &[u8]) -> Result<Decoded, CodecError> {
    let line_ending = if detect_crlf(bytes) {
        LineEnding::CrLf
    } else {
        LineEnding::Lf
    };
    let text = latin1_to_string(bytes);

    let mut raw_lines: Vec<&str> = text
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .collect();
    // A terminated last line does not start another one
    if text.ends_with('\n') {
        raw_lines.pop();
    }
    let mut raw_lines = raw_lines.into_iter();

    let chars_per_line = parse_header(raw_lines.next(), CHARS_PER_LINE_LABEL, 1)?;
    let lines_per_page = parse_header(raw_lines.next(), LINES_PER_PAGE_LABEL, 2)?;

    let mut lines: Vec<Line> = raw_lines
        .map(|raw| match raw.strip_suffix(PARAGRAPH_MARK) {
            Some(body) => Line::paragraph(body),
            None => Line::new(raw),
        })
        .collect();
    if lines.is_empty() {
        lines.push(Line::default());
    }

    tracing::debug!(
        chars_per_line,
        lines_per_page,
        lines = lines.len(),
        "decoded BZY"
    );

    Ok(Decoded {
        document: Document::from_lines(&lines, line_ending),
        lines_per_page: Some(lines_per_page),
        chars_per_line: Some(chars_per_line),
    })
}

/// Encode a document as BZY; every line is terminated
pub fn encode(doc: &Document, metrics: &PageMetrics) -> Result<Vec<u8>, CodecError> {
    let eol = doc.line_ending.as_str();
    let mut out = Vec::with_capacity(doc.len_chars() + 64);
    out.extend_from_slice(
        format!(
            "{CHARS_PER_LINE_LABEL}{}{eol}{LINES_PER_PAGE_LABEL}{}{eol}",
            metrics.chars_per_line(),
            metrics.lines_per_page()
        )
        .as_bytes(),
    );
    for (i, line) in doc.lines().enumerate() {
        push_latin1(&mut out, &line.text, i)?;
        if line.paragraph_end {
            out.push(PARAGRAPH_MARK as u8);
        }
        out.extend_from_slice(eol.as_bytes());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_header_and_paragraphs() {
        let decoded = decode(b"Chars Per Line:  32\nLines Per Page:  20\nfirst\nsecond\xB6\n").unwrap();
        assert_eq!(decoded.chars_per_line, Some(32));
        assert_eq!(decoded.lines_per_page, Some(20));
        let lines: Vec<Line> = decoded.document.lines().collect();
        assert_eq!(lines, vec![Line::new("first"), Line::paragraph("second")]);
    }

    #[test]
    fn test_decode_header_only() {
        let decoded = decode(b"Chars Per Line:  40\nLines Per Page:  25\n").unwrap();
        assert_eq!(decoded.document.line_count(), 1);
        assert_eq!(decoded.document.line_length(0), 0);
    }

    #[test]
    fn test_decode_crlf() {
        let decoded = decode(b"Chars Per Line:  40\r\nLines Per Page:  25\r\nab\xB6\r\ncd\r\n").unwrap();
        assert_eq!(decoded.document.line_ending, LineEnding::CrLf);
        let lines: Vec<Line> = decoded.document.lines().collect();
        assert_eq!(lines, vec![Line::paragraph("ab"), Line::new("cd")]);
    }

    #[test]
    fn test_malformed_value_fails() {
        let err = decode(b"Chars Per Line:  forty\nLines Per Page:  25\n").unwrap_err();
        assert!(matches!(err, CodecError::MalformedHeader { line: 1, .. }));
    }

    #[test]
    fn test_wrong_label_fails() {
        let err = decode(b"Chars Per Line:  40\nPages:  25\n").unwrap_err();
        assert!(
            matches!(err, CodecError::MalformedHeader { line: 2, ref content } if content == "Pages:  25")
        );
    }

    #[test]
    fn test_missing_header_fails() {
        let err = decode(b"").unwrap_err();
        assert!(matches!(err, CodecError::MalformedHeader { line: 1, .. }));
    }

    #[test]
    fn test_zero_metric_fails() {
        assert!(decode(b"Chars Per Line:  0\nLines Per Page:  25\n").is_err());
    }

    #[test]
    fn test_encode() {
        let doc = Document::from_lines(
            &[Line::new("a"), Line::paragraph("b"), Line::new("")],
            LineEnding::Lf,
        );
        let bytes = encode(&doc, &PageMetrics::new(25, 40)).unwrap();
        assert_eq!(
            bytes,
            b"Chars Per Line:  40\nLines Per Page:  25\na\nb\xB6\n\n".to_vec()
        );
    }

    #[test]
    fn test_round_trip_is_exact() {
        let lines = vec![
            Line::new("one"),
            Line::paragraph("two"),
            Line::new(""),
            Line::paragraph("three \u{e9}"),
            Line::new(""),
        ];
        let doc = Document::from_lines(&lines, LineEnding::CrLf);
        let metrics = PageMetrics::new(18, 30);
        let decoded = decode(&encode(&doc, &metrics).unwrap()).unwrap();
        assert_eq!(decoded.document.lines().collect::<Vec<_>>(), lines);
        assert_eq!(decoded.chars_per_line, Some(30));
        assert_eq!(decoded.lines_per_page, Some(18));
        assert_eq!(decoded.document.line_ending, LineEnding::CrLf);
    }
}
