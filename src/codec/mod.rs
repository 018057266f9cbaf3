//! On-disk formats: BRF (braille ready file) and BZY (native, with settings)
//!
//! Both formats store one byte per character (ISO-8859-1). Decoding never
//! touches a live document: it builds a fresh one that the caller swaps in.

pub mod brf;
pub mod bzy;

use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use crate::error::CodecError;
use crate::layout::PageMetrics;
use crate::model::document::{Document, Line};

/// Size of the leading chunk inspected for page-length detection
pub const DETECT_CHUNK: usize = 64 * 1024;

/// Supported file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Brf,
    Bzy,
}

impl FileFormat {
    /// Pick a format from a path's extension: `.bzy` is native, anything else BRF
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("bzy") => FileFormat::Bzy,
            _ => FileFormat::Brf,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            FileFormat::Brf => "brf",
            FileFormat::Bzy => "bzy",
        }
    }

    /// Decode raw file bytes
    pub fn decode(self, bytes: &[u8]) -> Result<Decoded, CodecError> {
        match self {
            FileFormat::Brf => Ok(brf::decode(bytes)),
            FileFormat::Bzy => bzy::decode(bytes),
        }
    }

    /// Encode a document into file bytes
    pub fn encode(self, doc: &Document, metrics: &PageMetrics) -> Result<Vec<u8>, CodecError> {
        match self {
            FileFormat::Brf => brf::encode(doc, metrics),
            FileFormat::Bzy => bzy::encode(doc, metrics),
        }
    }

    pub fn read<R: Read>(self, mut reader: R) -> Result<Decoded, CodecError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.decode(&bytes)
    }

    /// Encode fully, then write; nothing is written if encoding fails
    pub fn write<W: Write>(
        self,
        mut writer: W,
        doc: &Document,
        metrics: &PageMetrics,
    ) -> Result<(), CodecError> {
        let bytes = self.encode(doc, metrics)?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }
}

/// A freshly decoded document plus any settings the file carried
#[derive(Debug)]
pub struct Decoded {
    pub document: Document,
    /// Page length found in the file, if any
    pub lines_per_page: Option<usize>,
    /// Line length found in the file, if any
    pub chars_per_line: Option<usize>,
}

impl Decoded {
    /// Apply the file's page size on top of `metrics`; bells are untouched
    pub fn apply_metrics(&self, metrics: &mut PageMetrics) {
        metrics.adopt_page_size(self.lines_per_page, self.chars_per_line);
    }
}

/// Read and decode a file, picking the format from its extension
pub fn read_file(path: &Path) -> Result<Decoded, CodecError> {
    let bytes = fs::read(path).map_err(|e| CodecError::from_open(e, path))?;
    let mut decoded = FileFormat::from_path(path).decode(&bytes)?;
    decoded.document.file_path = Some(path.to_path_buf());
    tracing::info!(path = %path.display(), bytes = bytes.len(), "loaded document");
    Ok(decoded)
}

/// Encode and write a file, picking the format from its extension
pub fn write_file(path: &Path, doc: &Document, metrics: &PageMetrics) -> Result<(), CodecError> {
    let bytes = FileFormat::from_path(path).encode(doc, metrics)?;
    fs::write(path, &bytes)?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "saved document");
    Ok(())
}

/// Map bytes to chars one to one
pub(crate) fn latin1_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Append a line's text as single bytes
pub(crate) fn push_latin1(out: &mut Vec<u8>, text: &str, line: usize) -> Result<(), CodecError> {
    for ch in text.chars() {
        let code = u32::from(ch);
        if code > 0xFF {
            return Err(CodecError::Unencodable { line: line + 1, ch });
        }
        out.push(code as u8);
    }
    Ok(())
}

/// True if a `\r` comes before the first `\n` (or the end of input)
pub(crate) fn detect_crlf(bytes: &[u8]) -> bool {
    bytes
        .iter()
        .take_while(|&&b| b != b'\n')
        .any(|&b| b == b'\r')
}

/// Split buffer text (already `\n`-normalized) into plain lines
pub(crate) fn plain_lines(text: &str) -> Vec<Line> {
    text.split('\n').map(Line::new).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use crate::layout::{DEFAULT_LINE_MARGIN_BELL, DEFAULT_PAGE_MARGIN_BELL};

    #[test]
    fn test_format_from_path() {
        assert_eq!(FileFormat::from_path(&PathBuf::from("a.bzy")), FileFormat::Bzy);
        assert_eq!(FileFormat::from_path(&PathBuf::from("a.BZY")), FileFormat::Bzy);
        assert_eq!(FileFormat::from_path(&PathBuf::from("a.brf")), FileFormat::Brf);
        assert_eq!(FileFormat::from_path(&PathBuf::from("noext")), FileFormat::Brf);
    }

    #[test]
    fn test_latin1_maps_bytes_to_chars() {
        assert_eq!(latin1_to_string(&[0x41, 0xB6, 0xFF]), "A\u{b6}\u{ff}");
    }

    #[test]
    fn test_push_latin1_rejects_wide_chars() {
        let mut out = Vec::new();
        let err = push_latin1(&mut out, "ab\u{2800}", 4).unwrap_err();
        assert!(matches!(err, CodecError::Unencodable { line: 5, ch: '\u{2800}' }));
    }

    #[test]
    fn test_detect_crlf() {
        assert!(detect_crlf(b"abc\r\ndef"));
        assert!(!detect_crlf(b"abc\ndef\r\n"));
        assert!(!detect_crlf(b"abc"));
    }

    #[test]
    fn test_decoded_apply_metrics() {
        let decoded = Decoded {
            document: Document::new(),
            lines_per_page: Some(10),
            chars_per_line: None,
        };
        let mut metrics = PageMetrics::default();
        decoded.apply_metrics(&mut metrics);
        assert_eq!(metrics.lines_per_page(), 10);
        assert_eq!(metrics.chars_per_line(), 40);
    }

    #[test]
    fn test_apply_metrics_leaves_bells_alone() {
        let decoded = Decoded {
            document: Document::new(),
            lines_per_page: Some(20),
            chars_per_line: Some(32),
        };
        let mut metrics = PageMetrics::default();
        decoded.apply_metrics(&mut metrics);
        assert_eq!(metrics.chars_per_line(), 32);
        assert_eq!(metrics.line_margin_bell, Some(DEFAULT_LINE_MARGIN_BELL));
        assert_eq!(metrics.page_margin_bell, Some(DEFAULT_PAGE_MARGIN_BELL));
    }
}
