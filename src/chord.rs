//! Six-key chorded braille entry
//!
//! Each of the six dot keys sets one bit of a braille cell. Keys may be pressed
//! and released with arbitrary overlap; the cell is committed once every held
//! key has been released, and the accumulated pattern is looked up in the
//! ASCII-braille alphabet.

use std::fmt;

use serde::{Deserialize, Serialize};

/// ASCII-braille alphabet indexed by dot pattern (dot 1 = bit 0 … dot 6 = bit 5)
///
/// Index 0 is a placeholder: a commit always carries a non-zero pattern.
pub const ASCII_BRAILLE: &[u8; 64] =
    b" A1B'K2L@CIF/MSP\"E3H9O6R^DJG>NTQ,*5<-U8V.%[$+X!&;:4\\0Z7(_?W]#Y)=";

/// All six dots
pub const ALL_DOTS: u8 = 0b0011_1111;

/// Character for a 6-bit dot pattern
#[inline]
pub fn cell_char(pattern: u8) -> char {
    ASCII_BRAILLE[(pattern & ALL_DOTS) as usize] as char
}

/// Dot pattern for an alphabet character (case-insensitive for letters)
pub fn cell_pattern(ch: char) -> Option<u8> {
    let upper = ch.to_ascii_uppercase();
    ASCII_BRAILLE
        .iter()
        .position(|&b| b as char == upper)
        .map(|i| i as u8)
}

/// Unicode braille glyph for an alphabet character; other characters pass through
pub fn braille_glyph(ch: char) -> char {
    match cell_pattern(ch) {
        Some(pattern) => char::from_u32(0x2800 + u32::from(pattern)).unwrap_or(ch),
        None => ch,
    }
}

/// Characters the braille view owns in braille entry mode
#[inline]
pub fn is_printable_ascii(ch: char) -> bool {
    ch > ' ' && ch < '\u{7f}'
}

/// How key releases are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReleaseMode {
    /// Each release clears the bit of the released dot
    PerKey,
    /// Any release clears every held dot; for hosts that do not deliver
    /// individual key-up events reliably
    ResetOnAnyRelease,
}

impl ReleaseMode {
    /// Windows drops key-up events for chorded keys, everything else is per key
    pub fn platform_default() -> Self {
        if cfg!(target_os = "windows") {
            ReleaseMode::ResetOnAnyRelease
        } else {
            ReleaseMode::PerKey
        }
    }
}

impl Default for ReleaseMode {
    fn default() -> Self {
        Self::platform_default()
    }
}

/// What a view does with keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryMode {
    /// Dot keys build cells; printable keys never insert directly
    Braille,
    /// Companion view: printable keys are suppressed and nothing is committed
    ViewOnly,
}

/// Keys bound to dots 1 through 6
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DotKeyMap([char; 6]);

impl DotKeyMap {
    pub const fn new(keys: [char; 6]) -> Self {
        Self(keys)
    }

    /// Bit for the dot bound to `key`
    pub fn dot_bit(&self, key: char) -> Option<u8> {
        self.0.iter().position(|&k| k == key).map(|i| 1u8 << i)
    }

    pub fn keys(&self) -> [char; 6] {
        self.0
    }
}

impl Default for DotKeyMap {
    fn default() -> Self {
        Self(['f', 'd', 's', 'j', 'k', 'l'])
    }
}

impl TryFrom<String> for DotKeyMap {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let chars: Vec<char> = value.chars().collect();
        let keys: [char; 6] = chars
            .as_slice()
            .try_into()
            .map_err(|_| format!("expected 6 dot keys, got {:?}", value))?;
        for (i, k) in keys.iter().enumerate() {
            if keys[..i].contains(k) {
                return Err(format!("dot key {:?} bound twice", k));
            }
        }
        Ok(Self(keys))
    }
}

impl From<DotKeyMap> for String {
    fn from(map: DotKeyMap) -> Self {
        map.0.iter().collect()
    }
}

impl fmt::Display for DotKeyMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for k in self.0 {
            write!(f, "{}", k)?;
        }
        Ok(())
    }
}

/// Chord accumulation state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChordState {
    #[default]
    Idle,
    Accumulating {
        /// Dots currently held down
        held: u8,
        /// Every dot pressed since the chord started
        pattern: u8,
    },
}

impl ChordState {
    fn press(self, bit: u8) -> Self {
        match self {
            ChordState::Idle => ChordState::Accumulating {
                held: bit,
                pattern: bit,
            },
            ChordState::Accumulating { held, pattern } => ChordState::Accumulating {
                held: held | bit,
                pattern: pattern | bit,
            },
        }
    }

    /// Release `bits`; returns the new state and the committed pattern, if any
    fn release(self, bits: u8) -> (Self, Option<u8>) {
        match self {
            ChordState::Idle => (ChordState::Idle, None),
            ChordState::Accumulating { held, pattern } => {
                let held = held & !bits;
                if held == 0 {
                    (ChordState::Idle, (pattern != 0).then_some(pattern))
                } else {
                    (ChordState::Accumulating { held, pattern }, None)
                }
            }
        }
    }
}

/// Turns dot key events into committed braille cells
#[derive(Debug, Clone)]
pub struct ChordDecoder {
    state: ChordState,
    keys: DotKeyMap,
    entry: EntryMode,
    release: ReleaseMode,
}

impl ChordDecoder {
    pub fn new(entry: EntryMode, keys: DotKeyMap, release: ReleaseMode) -> Self {
        Self {
            state: ChordState::Idle,
            keys,
            entry,
            release,
        }
    }

    /// Braille entry decoder with the default key map and platform release mode
    pub fn braille() -> Self {
        Self::new(EntryMode::Braille, DotKeyMap::default(), ReleaseMode::default())
    }

    /// Companion-view decoder
    pub fn view_only() -> Self {
        Self::new(EntryMode::ViewOnly, DotKeyMap::default(), ReleaseMode::default())
    }

    pub fn state(&self) -> ChordState {
        self.state
    }

    pub fn entry_mode(&self) -> EntryMode {
        self.entry
    }

    pub fn release_mode(&self) -> ReleaseMode {
        self.release
    }

    pub fn set_release_mode(&mut self, release: ReleaseMode) {
        self.release = release;
    }

    pub fn key_map(&self) -> DotKeyMap {
        self.keys
    }

    /// Rebinding the dots abandons any chord in progress
    pub fn set_key_map(&mut self, keys: DotKeyMap) {
        self.keys = keys;
        self.state = ChordState::Idle;
    }

    /// Handle a key press. Returns true if the key is a dot key.
    pub fn key_pressed(&mut self, key: char) -> bool {
        if self.entry == EntryMode::ViewOnly {
            return false;
        }
        let Some(bit) = self.keys.dot_bit(key) else {
            return false;
        };
        self.state = self.state.press(bit);
        tracing::trace!(target: "chord", state = ?self.state, key = %key, "dot pressed");
        true
    }

    /// Handle a key release, returning the committed cell character
    pub fn key_released(&mut self, key: char) -> Option<char> {
        if self.entry == EntryMode::ViewOnly {
            return None;
        }
        let bits = match self.release {
            ReleaseMode::ResetOnAnyRelease => ALL_DOTS,
            ReleaseMode::PerKey => self.keys.dot_bit(key)?,
        };
        self.release_bits(bits)
    }

    /// Handle the release of a key that carries no character (Enter, arrows)
    ///
    /// Only matters when releases cannot be attributed to individual keys.
    pub fn other_key_released(&mut self) -> Option<char> {
        if self.entry == EntryMode::ViewOnly || self.release != ReleaseMode::ResetOnAnyRelease {
            return None;
        }
        self.release_bits(ALL_DOTS)
    }

    fn release_bits(&mut self, bits: u8) -> Option<char> {
        let (state, committed) = self.state.release(bits);
        self.state = state;
        committed.map(|pattern| {
            let ch = cell_char(pattern);
            tracing::debug!(target: "chord", pattern, ch = %ch, "cell committed");
            ch
        })
    }

    /// Whether a typed character must be kept out of normal text insertion
    pub fn suppresses(&self, ch: char) -> bool {
        is_printable_ascii(ch)
    }

    pub fn reset(&mut self) {
        self.state = ChordState::Idle;
    }
}
