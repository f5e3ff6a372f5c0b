//! Configuration module.
//!
//! Provides [`AppConfig`] (top-level settings), sub-configs for each
//! subsystem, and TOML persistence via `AppConfig::load` / `save_to`.  The
//! synthesis endpoint list lives separately as JSON — see
//! [`crate::tts::load_endpoints`].

pub mod settings;

pub use settings::{AppConfig, CaptionConfig, PathsConfig, SttConfig, TtsConfig};
