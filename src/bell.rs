//! Margin bells: short sounds played when typing reaches a configured column
//! or line
//!
//! Audio output is a collaborator behind [`BellPlayer`]; the engine only
//! decides when to ring.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::error::BellError;

/// Handle to a loaded sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClipId(pub u32);

/// Sound output collaborator
pub trait BellPlayer {
    fn load(&mut self, path: &Path) -> Result<ClipId, BellError>;
    /// Start a clip from the beginning
    fn play(&mut self, clip: ClipId);
    fn is_playing(&self, clip: ClipId) -> bool;
    fn release(&mut self, clip: ClipId);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BellKind {
    /// Caret reached the line bell column
    Line,
    /// Enter pressed near the end of a page
    Page,
}

#[derive(Debug, Clone)]
struct BellSlot {
    clip: ClipId,
    path: PathBuf,
}

/// The two bell slots and the player that sounds them
pub struct MarginBells {
    player: Box<dyn BellPlayer>,
    line: Option<BellSlot>,
    page: Option<BellSlot>,
}

impl fmt::Debug for MarginBells {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarginBells")
            .field("line", &self.line)
            .field("page", &self.page)
            .finish_non_exhaustive()
    }
}

impl Default for MarginBells {
    fn default() -> Self {
        Self::new(Box::new(ProbeBellPlayer::new()))
    }
}

impl MarginBells {
    pub fn new(player: Box<dyn BellPlayer>) -> Self {
        Self {
            player,
            line: None,
            page: None,
        }
    }

    fn slot(&self, kind: BellKind) -> &Option<BellSlot> {
        match kind {
            BellKind::Line => &self.line,
            BellKind::Page => &self.page,
        }
    }

    fn slot_mut(&mut self, kind: BellKind) -> &mut Option<BellSlot> {
        match kind {
            BellKind::Line => &mut self.line,
            BellKind::Page => &mut self.page,
        }
    }

    /// Load a new sound for a bell
    ///
    /// The new clip is loaded before the old one is released, so a failed
    /// load leaves the previous sound in place.
    pub fn load(&mut self, kind: BellKind, path: &Path) -> Result<(), BellError> {
        let clip = match self.player.load(path) {
            Ok(clip) => clip,
            Err(err) => {
                tracing::warn!(?kind, path = %path.display(), "bell sound not loaded: {err}");
                return Err(err);
            }
        };
        let previous = self.slot_mut(kind).replace(BellSlot {
            clip,
            path: path.to_path_buf(),
        });
        if let Some(old) = previous {
            self.player.release(old.clip);
        }
        tracing::debug!(?kind, path = %path.display(), "bell sound loaded");
        Ok(())
    }

    /// Remove a bell's sound, disabling it
    pub fn unload(&mut self, kind: BellKind) {
        if let Some(old) = self.slot_mut(kind).take() {
            self.player.release(old.clip);
        }
    }

    pub fn is_loaded(&self, kind: BellKind) -> bool {
        self.slot(kind).is_some()
    }

    pub fn sound_path(&self, kind: BellKind) -> Option<&Path> {
        self.slot(kind).as_ref().map(|s| s.path.as_path())
    }

    /// Play a bell unless it has no sound or is still sounding
    pub fn ring(&mut self, kind: BellKind) -> bool {
        let Some(clip) = self.slot(kind).as_ref().map(|s| s.clip) else {
            return false;
        };
        if self.player.is_playing(clip) {
            return false;
        }
        self.player.play(clip);
        true
    }
}

#[derive(Debug)]
struct ProbeClip {
    path: PathBuf,
    duration: Duration,
    started: Option<Instant>,
}

/// Headless player: validates WAVE files and logs plays instead of sounding
#[derive(Debug, Default)]
pub struct ProbeBellPlayer {
    clips: HashMap<ClipId, ProbeClip>,
    next_id: u32,
}

/// Canonical WAVE header size
const WAVE_HEADER_LEN: usize = 44;

impl ProbeBellPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clip length estimated from a RIFF/WAVE header
    fn probe_wave(bytes: &[u8]) -> Result<Duration, BellError> {
        if bytes.len() < WAVE_HEADER_LEN || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
            return Err(BellError::UnsupportedFormat(
                "not a RIFF/WAVE file".to_string(),
            ));
        }
        let byte_rate = u32::from_le_bytes([bytes[28], bytes[29], bytes[30], bytes[31]]);
        if byte_rate == 0 {
            return Err(BellError::UnsupportedFormat("zero byte rate".to_string()));
        }
        let data_len = (bytes.len() - WAVE_HEADER_LEN) as f64;
        Ok(Duration::from_secs_f64(data_len / f64::from(byte_rate)))
    }
}

impl BellPlayer for ProbeBellPlayer {
    fn load(&mut self, path: &Path) -> Result<ClipId, BellError> {
        let bytes = fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => BellError::NotFound(path.to_path_buf()),
            _ => BellError::Io(e),
        })?;
        let duration = Self::probe_wave(&bytes)?;
        let id = ClipId(self.next_id);
        self.next_id += 1;
        self.clips.insert(
            id,
            ProbeClip {
                path: path.to_path_buf(),
                duration,
                started: None,
            },
        );
        Ok(id)
    }

    fn play(&mut self, clip: ClipId) {
        if let Some(c) = self.clips.get_mut(&clip) {
            tracing::info!(path = %c.path.display(), duration_ms = c.duration.as_millis() as u64, "bell");
            c.started = Some(Instant::now());
        }
    }

    fn is_playing(&self, clip: ClipId) -> bool {
        self.clips
            .get(&clip)
            .and_then(|c| c.started.map(|t| t.elapsed() < c.duration))
            .unwrap_or(false)
    }

    fn release(&mut self, clip: ClipId) {
        self.clips.remove(&clip);
    }
}

/// Build a minimal 8-bit mono PCM WAVE image
pub fn wave_bytes(byte_rate: u32, data_len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(WAVE_HEADER_LEN + data_len);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&((36 + data_len) as u32).to_le_bytes());
    out.extend_from_slice(b"WAVEfmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&1u16.to_le_bytes()); // mono
    out.extend_from_slice(&byte_rate.to_le_bytes()); // sample rate, 8-bit mono
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&8u16.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&(data_len as u32).to_le_bytes());
    out.resize(WAVE_HEADER_LEN + data_len, 0x80);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Default)]
    struct Log {
        loaded: Vec<PathBuf>,
        played: Vec<ClipId>,
        released: Vec<ClipId>,
        playing: bool,
    }

    struct FakePlayer(Rc<RefCell<Log>>);

    impl BellPlayer for FakePlayer {
        fn load(&mut self, path: &Path) -> Result<ClipId, BellError> {
            if path.to_string_lossy().contains("bad") {
                return Err(BellError::UnsupportedFormat("fake".to_string()));
            }
            let mut log = self.0.borrow_mut();
            log.loaded.push(path.to_path_buf());
            Ok(ClipId(log.loaded.len() as u32))
        }
        fn play(&mut self, clip: ClipId) {
            self.0.borrow_mut().played.push(clip);
        }
        fn is_playing(&self, _clip: ClipId) -> bool {
            self.0.borrow().playing
        }
        fn release(&mut self, clip: ClipId) {
            self.0.borrow_mut().released.push(clip);
        }
    }

    fn bells() -> (MarginBells, Rc<RefCell<Log>>) {
        let log = Rc::new(RefCell::new(Log::default()));
        (MarginBells::new(Box::new(FakePlayer(log.clone()))), log)
    }

    #[test]
    fn test_ring_without_sound_is_silent() {
        let (mut bells, log) = bells();
        assert!(!bells.ring(BellKind::Line));
        assert!(log.borrow().played.is_empty());
    }

    #[test]
    fn test_reload_releases_old_clip_after_loading_new() {
        let (mut bells, log) = bells();
        bells.load(BellKind::Line, Path::new("one.wav")).unwrap();
        bells.load(BellKind::Line, Path::new("two.wav")).unwrap();
        assert_eq!(log.borrow().released, vec![ClipId(1)]);
        assert_eq!(bells.sound_path(BellKind::Line), Some(Path::new("two.wav")));
    }

    #[test]
    fn test_failed_load_keeps_previous_clip() {
        let (mut bells, log) = bells();
        bells.load(BellKind::Page, Path::new("good.wav")).unwrap();
        let err = bells.load(BellKind::Page, Path::new("bad.wav"));
        assert!(matches!(err, Err(BellError::UnsupportedFormat(_))));
        assert!(log.borrow().released.is_empty());
        assert_eq!(bells.sound_path(BellKind::Page), Some(Path::new("good.wav")));
        assert!(bells.ring(BellKind::Page));
    }

    #[test]
    fn test_ring_is_debounced_while_playing() {
        let (mut bells, log) = bells();
        bells.load(BellKind::Line, Path::new("one.wav")).unwrap();
        log.borrow_mut().playing = true;
        assert!(!bells.ring(BellKind::Line));
        log.borrow_mut().playing = false;
        assert!(bells.ring(BellKind::Line));
        assert_eq!(log.borrow().played, vec![ClipId(1)]);
    }

    #[test]
    fn test_unload_disables_bell() {
        let (mut bells, _log) = bells();
        bells.load(BellKind::Line, Path::new("one.wav")).unwrap();
        bells.unload(BellKind::Line);
        assert!(!bells.is_loaded(BellKind::Line));
        assert!(!bells.ring(BellKind::Line));
    }

    #[test]
    fn test_probe_player_reads_wave() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bell.wav");
        // One second of audio at 8000 bytes/s
        fs::write(&path, wave_bytes(8000, 8000)).unwrap();

        let mut player = ProbeBellPlayer::new();
        let clip = player.load(&path).unwrap();
        assert!(!player.is_playing(clip));
        player.play(clip);
        assert!(player.is_playing(clip));
        player.release(clip);
        assert!(!player.is_playing(clip));
    }

    #[test]
    fn test_probe_player_rejects_non_wave() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bell.wav");
        fs::write(&path, b"definitely not a wave file at all, no sir, not one bit").unwrap();
        let mut player = ProbeBellPlayer::new();
        assert!(matches!(
            player.load(&path),
            Err(BellError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            player.load(&dir.path().join("missing.wav")),
            Err(BellError::NotFound(_))
        ));
    }
}
