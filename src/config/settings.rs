//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone` so
//! they can be round-tripped through `config/settings.toml` and passed into
//! each component explicitly — nothing reads configuration from ambient
//! process state.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::captions::DEFAULT_WORDS_PER_BLOCK;
use crate::tts::{Voice, DEFAULT_CHUNK_LIMIT};

/// Workspace-relative settings file, like the rest of the working layout.
const SETTINGS_FILE: &str = "config/settings.toml";

// ---------------------------------------------------------------------------
// SttConfig
// ---------------------------------------------------------------------------

/// Settings for the Whisper STT engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SttConfig {
    /// GGML model file stem under the models dir (e.g. `"ggml-base.en"`).
    pub model: String,
    /// Speech language as an ISO-639-1 code, or `"auto"` for detection.
    pub language: String,
    /// Sample rate the recognition model requires, in Hz.
    pub sample_rate: u32,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            model: "ggml-base.en".into(),
            language: "en".into(),
            sample_rate: 16_000,
        }
    }
}

// ---------------------------------------------------------------------------
// CaptionConfig
// ---------------------------------------------------------------------------

/// Settings for subtitle generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionConfig {
    /// Number of words per subtitle block.
    pub words_per_block: usize,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            words_per_block: DEFAULT_WORDS_PER_BLOCK,
        }
    }
}

// ---------------------------------------------------------------------------
// TtsConfig
// ---------------------------------------------------------------------------

/// Settings for narration synthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TtsConfig {
    /// JSON file holding the ordered endpoint list.
    pub endpoints_file: PathBuf,
    /// Voice used for narration.
    pub voice: Voice,
    /// Maximum chunk length in bytes handed to one endpoint request.
    pub chunk_limit: usize,
    /// Per-request timeout in seconds; `None` leaves requests without a
    /// deadline of their own.
    pub timeout_secs: Option<u64>,
    /// Text file read for narration synthesis (skipped when absent).
    pub narration_file: PathBuf,
    /// Destination for the assembled narration audio.
    pub output_file: PathBuf,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            endpoints_file: "config/endpoints.json".into(),
            voice: Voice::UkMale1,
            chunk_limit: DEFAULT_CHUNK_LIMIT,
            timeout_secs: None,
            narration_file: "narration.txt".into(),
            output_file: "output.mp3".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// PathsConfig
// ---------------------------------------------------------------------------

/// Working-directory layout.  All paths are workspace-relative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Input videos are scanned from here.
    pub video_dir: PathBuf,
    /// Extracted WAV files land here.
    pub audio_dir: PathBuf,
    /// Transcription JSON and subtitle files land here.
    pub transcript_dir: PathBuf,
    /// GGML model files live here.
    pub models_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            video_dir: "Video".into(),
            audio_dir: "audio".into(),
            transcript_dir: "stt".into(),
            models_dir: "models".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `config/settings.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// STT engine settings.
    pub stt: SttConfig,
    /// Subtitle generation settings.
    pub captions: CaptionConfig,
    /// Narration synthesis settings.
    pub tts: TtsConfig,
    /// Working-directory layout.
    pub paths: PathsConfig,
}

impl AppConfig {
    /// Load configuration from `config/settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet,
    /// so callers never need to special-case a missing file.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(SETTINGS_FILE))
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save to an explicit path, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Full path of the GGML model file.
    pub fn model_path(&self) -> PathBuf {
        self.paths.models_dir.join(format!("{}.bin", self.stt.model))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// A default `AppConfig` survives a TOML round trip without data loss.
    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(original, loaded);
    }

    /// `load_from` on a non-existent path returns `Default` without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.stt.model, "ggml-base.en");
        assert_eq!(cfg.stt.language, "en");
        assert_eq!(cfg.stt.sample_rate, 16_000);
        assert_eq!(cfg.captions.words_per_block, 6);
        assert_eq!(cfg.tts.voice, Voice::UkMale1);
        assert_eq!(cfg.tts.chunk_limit, 300);
        assert!(cfg.tts.timeout_secs.is_none());
        assert_eq!(cfg.paths.video_dir, PathBuf::from("Video"));
        assert_eq!(cfg.model_path(), PathBuf::from("models/ggml-base.en.bin"));
    }

    /// Modified non-default values survive a round trip.
    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.stt.model = "ggml-large-v3".into();
        cfg.stt.language = "auto".into();
        cfg.captions.words_per_block = 4;
        cfg.tts.voice = Voice::UsFemale1;
        cfg.tts.chunk_limit = 200;
        cfg.tts.timeout_secs = Some(30);
        cfg.paths.video_dir = "clips".into();

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded, cfg);
        assert_eq!(loaded.tts.voice, Voice::UsFemale1);
    }

    /// The voice field is stored as its wire id in TOML.
    #[test]
    fn voice_is_stored_as_wire_id() {
        let toml = toml::to_string_pretty(&AppConfig::default()).unwrap();
        assert!(toml.contains("voice = \"en_uk_001\""), "toml was:\n{toml}");
    }
}
