//! BRF: plain braille ASCII, form feed before the first line of each page

use super::{detect_crlf, latin1_to_string, plain_lines, push_latin1, Decoded, DETECT_CHUNK};
use crate::error::CodecError;
use crate::layout::PageMetrics;
use crate::model::document::{Document, LineEnding};

const FORM_FEED: u8 = 0x0C;

/// Decode BRF bytes
///
/// The page length is taken from the number of line feeds before the first
/// form feed in the leading chunk. Form feeds are stripped only when one was
/// found there.
pub fn decode(bytes: &[u8]) -> Decoded {
    let line_ending = if detect_crlf(bytes) {
        LineEnding::CrLf
    } else {
        LineEnding::Lf
    };

    let chunk = &bytes[..bytes.len().min(DETECT_CHUNK)];
    let first_ff = chunk.iter().position(|&b| b == FORM_FEED);
    let lines_per_page = first_ff
        .map(|at| chunk[..at].iter().filter(|&&b| b == b'\n').count())
        .filter(|&n| n > 0);

    let text = if first_ff.is_some() {
        let kept: Vec<u8> = bytes.iter().copied().filter(|&b| b != FORM_FEED).collect();
        latin1_to_string(&kept)
    } else {
        latin1_to_string(bytes)
    };
    let text = text.replace("\r\n", "\n");

    tracing::debug!(
        ?line_ending,
        ?lines_per_page,
        stripped_form_feeds = first_ff.is_some(),
        "decoded BRF"
    );

    Decoded {
        document: Document::from_lines(&plain_lines(&text), line_ending),
        lines_per_page,
        chars_per_line: None,
    }
}

/// Encode a document as BRF; paragraph ends are not stored
pub fn encode(doc: &Document, metrics: &PageMetrics) -> Result<Vec<u8>, CodecError> {
    let eol = doc.line_ending.as_str().as_bytes();
    let mut out = Vec::with_capacity(doc.len_chars() + doc.line_count() * 2);
    for (i, line) in doc.lines().enumerate() {
        if i > 0 {
            out.extend_from_slice(eol);
            if metrics.is_first_line_on_page(i) {
                out.push(FORM_FEED);
            }
        }
        push_latin1(&mut out, &line.text, i)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::document::Line;

    fn texts(doc: &Document) -> Vec<String> {
        doc.lines().map(|l| l.text).collect()
    }

    #[test]
    fn test_decode_counts_lines_before_form_feed() {
        let decoded = decode(b"abc\ndef\n\x0cghi\n");
        assert_eq!(decoded.lines_per_page, Some(2));
        assert_eq!(texts(&decoded.document), vec!["abc", "def", "ghi", ""]);
        assert_eq!(decoded.document.line_ending, LineEnding::Lf);
    }

    #[test]
    fn test_decode_form_feed_inside_line() {
        let decoded = decode(b"abc\ndef\x0cghi\n");
        assert_eq!(decoded.lines_per_page, Some(1));
        assert_eq!(texts(&decoded.document), vec!["abc", "defghi", ""]);
    }

    #[test]
    fn test_decode_without_form_feed_keeps_everything() {
        let decoded = decode(b"abc\ndef");
        assert_eq!(decoded.lines_per_page, None);
        assert_eq!(texts(&decoded.document), vec!["abc", "def"]);
    }

    #[test]
    fn test_decode_leading_form_feed_gives_no_page_length() {
        let decoded = decode(b"\x0cabc\ndef");
        assert_eq!(decoded.lines_per_page, None);
        assert_eq!(texts(&decoded.document), vec!["abc", "def"]);
    }

    #[test]
    fn test_decode_form_feed_past_first_chunk_is_kept() {
        let mut bytes = vec![b'a'; DETECT_CHUNK];
        bytes.extend_from_slice(b"\n\x0cb");
        let decoded = decode(&bytes);
        assert_eq!(decoded.lines_per_page, None);
        assert_eq!(decoded.document.line(1).map(|l| l.text), Some("\u{c}b".to_string()));
    }

    #[test]
    fn test_decode_crlf() {
        let decoded = decode(b"ab\r\ncd\r\n\x0cef");
        assert_eq!(decoded.document.line_ending, LineEnding::CrLf);
        assert_eq!(decoded.lines_per_page, Some(2));
        assert_eq!(texts(&decoded.document), vec!["ab", "cd", "ef"]);
    }

    #[test]
    fn test_decode_high_bytes() {
        let decoded = decode(&[b'a', 0xE9, b'\n', 0xFF]);
        assert_eq!(texts(&decoded.document), vec!["a\u{e9}", "\u{ff}"]);
    }

    #[test]
    fn test_encode_emits_page_breaks() {
        let doc = Document::from_lines(
            &[Line::new("a"), Line::paragraph("b"), Line::new("c"), Line::new("")],
            LineEnding::Lf,
        );
        let bytes = encode(&doc, &PageMetrics::new(2, 40)).unwrap();
        assert_eq!(bytes, b"a\nb\n\x0cc\n");
    }

    #[test]
    fn test_encode_crlf() {
        let doc = Document::from_lines(&[Line::new("a"), Line::new("b")], LineEnding::CrLf);
        let bytes = encode(&doc, &PageMetrics::new(1, 40)).unwrap();
        assert_eq!(bytes, b"a\r\n\x0cb");
    }

    #[test]
    fn test_encode_rejects_wide_chars() {
        let doc = Document::from_lines(&[Line::new("ok"), Line::new("\u{2801}")], LineEnding::Lf);
        let err = encode(&doc, &PageMetrics::default()).unwrap_err();
        assert!(matches!(err, CodecError::Unencodable { line: 2, .. }));
    }

    #[test]
    fn test_round_trip_keeps_lines_and_page_length() {
        let lines: Vec<Line> = (0..7).map(|i| Line::new(format!("line {i}"))).collect();
        let doc = Document::from_lines(&lines, LineEnding::Lf);
        let bytes = encode(&doc, &PageMetrics::new(3, 40)).unwrap();
        let decoded = decode(&bytes);
        assert_eq!(decoded.lines_per_page, Some(3));
        assert_eq!(decoded.document.lines().collect::<Vec<_>>(), lines);
    }
}
