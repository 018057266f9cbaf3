//! Editor configuration persistence
//!
//! Stores user preferences in `~/.config/brf-edit/config.yaml`

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::bell::BellKind;
use crate::chord::{DotKeyMap, ReleaseMode};
use crate::layout::{
    DEFAULT_CHARS_PER_LINE, DEFAULT_LINES_PER_PAGE, DEFAULT_LINE_MARGIN_BELL,
    DEFAULT_PAGE_MARGIN_BELL,
};
use crate::model::{EditorModel, FontSpec, ViewKind};

/// Editor configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub lines_per_page: usize,
    pub chars_per_line: usize,
    /// Column that rings the line bell (null = off)
    pub line_margin_bell: Option<usize>,
    /// Page line that rings the page bell (null = off)
    pub page_margin_bell: Option<usize>,
    pub line_bell_sound: Option<PathBuf>,
    pub page_bell_sound: Option<PathBuf>,
    pub braille_visible: bool,
    pub ascii_visible: bool,
    pub braille_font: Option<FontSpec>,
    pub ascii_font: Option<FontSpec>,
    /// Keys for dots 1-6, e.g. "fdsjkl"
    pub dot_keys: DotKeyMap,
    /// Overrides the platform's key release handling
    pub release_mode: Option<ReleaseMode>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            lines_per_page: DEFAULT_LINES_PER_PAGE,
            chars_per_line: DEFAULT_CHARS_PER_LINE,
            line_margin_bell: Some(DEFAULT_LINE_MARGIN_BELL),
            page_margin_bell: Some(DEFAULT_PAGE_MARGIN_BELL),
            line_bell_sound: None,
            page_bell_sound: None,
            braille_visible: true,
            ascii_visible: true,
            braille_font: Some(FontSpec::default_for(ViewKind::Braille)),
            ascii_font: Some(FontSpec::default_for(ViewKind::Ascii)),
            dot_keys: DotKeyMap::default(),
            release_mode: None,
        }
    }
}

impl EditorConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        Self::load_from(&path).unwrap_or_else(|e| {
            tracing::warn!("{}", e);
            Self::default()
        })
    }

    /// Read and parse a config file
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
        let config = serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse config at {}: {}", path.display(), e))?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to disk
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Push these settings into a model
    ///
    /// A bell sound that fails to load is skipped with a warning.
    pub fn apply_to(&self, model: &mut EditorModel) {
        model.set_lines_per_page(self.lines_per_page);
        model.set_chars_per_line(self.chars_per_line);

        for (kind, sound) in [
            (BellKind::Line, &self.line_bell_sound),
            (BellKind::Page, &self.page_bell_sound),
        ] {
            if let Some(path) = sound {
                if let Err(e) = model.load_bell_sound(kind, path) {
                    tracing::warn!("Failed to load {:?} bell {}: {}", kind, path.display(), e);
                }
            }
        }
        // Stored as-is; the model only reports them while a sound is loaded
        model.metrics.line_margin_bell = self.line_margin_bell;
        model.metrics.page_margin_bell = self.page_margin_bell;

        model.set_view_visible(ViewKind::Braille, self.braille_visible);
        model.set_view_visible(ViewKind::Ascii, self.ascii_visible);
        model.set_font(ViewKind::Braille, self.braille_font.clone());
        model.set_font(ViewKind::Ascii, self.ascii_font.clone());

        let decoder = model.decoder_mut(ViewKind::Braille);
        decoder.set_key_map(self.dot_keys);
        if let Some(mode) = self.release_mode {
            decoder.set_release_mode(mode);
        }
    }

    /// Read the current settings back out of a model
    pub fn capture(model: &EditorModel) -> Self {
        let decoder = &model.braille_decoder;
        let release_mode = Some(decoder.release_mode())
            .filter(|mode| *mode != ReleaseMode::platform_default());
        Self {
            lines_per_page: model.lines_per_page(),
            chars_per_line: model.chars_per_line(),
            line_margin_bell: model.metrics.line_margin_bell,
            page_margin_bell: model.metrics.page_margin_bell,
            line_bell_sound: model.bells.sound_path(BellKind::Line).map(Path::to_path_buf),
            page_bell_sound: model.bells.sound_path(BellKind::Page).map(Path::to_path_buf),
            braille_visible: model.braille.visible,
            ascii_visible: model.ascii.visible,
            braille_font: model.braille.font.clone(),
            ascii_font: model.ascii.font.clone(),
            dot_keys: decoder.key_map(),
            release_mode,
        }
    }
}
