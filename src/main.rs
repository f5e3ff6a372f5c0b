//! Application entry point — autoshorts.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Build the media collaborators (ffmpeg / ffprobe).
//! 4. Load the Whisper model and run the caption pipeline over the video
//!    directory (skipped with a warning when the model file is absent).
//! 5. If a narration text file exists, synthesize it through the configured
//!    endpoints and write the assembled audio.

use std::sync::Arc;

use anyhow::Context;

use autoshorts::{
    config::AppConfig,
    media::{DurationProbe, FfmpegTranscoder, FfprobeDurationProbe, Transcoder},
    pipeline::CaptionPipeline,
    stt::{RecognitionEngine, TranscribeParams, WhisperEngine},
    tts::{load_endpoints, HttpChunkFetcher, SynthesisDispatcher},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("autoshorts starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Media collaborators
    let transcoder: Arc<dyn Transcoder> = Arc::new(FfmpegTranscoder);
    let probe: Arc<dyn DurationProbe> = Arc::new(FfprobeDurationProbe);

    // 4. Caption pipeline (blocking work → spawn_blocking so the runtime
    //    stays responsive)
    let model_path = config.model_path();
    let params = TranscribeParams {
        language: config.stt.language.clone(),
        ..TranscribeParams::default()
    };

    match WhisperEngine::load(&model_path, params) {
        Ok(engine) => {
            log::info!("whisper model loaded: {}", model_path.display());
            let engine: Arc<dyn RecognitionEngine> = Arc::new(engine);
            let pipeline = CaptionPipeline::new(
                engine,
                Arc::clone(&transcoder),
                Arc::clone(&probe),
                config.clone(),
            );

            tokio::task::spawn_blocking(move || pipeline.process_all())
                .await
                .context("caption pipeline task failed")??;
        }
        Err(e) => {
            log::warn!(
                "could not load Whisper model ({}): {e} — skipping transcription",
                model_path.display()
            );
        }
    }

    // 5. Narration synthesis
    let narration = match std::fs::read_to_string(&config.tts.narration_file) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::info!(
                "no narration file at {} — skipping synthesis",
                config.tts.narration_file.display()
            );
            return Ok(());
        }
        Err(e) => {
            return Err(e).with_context(|| {
                format!(
                    "failed to read narration file {}",
                    config.tts.narration_file.display()
                )
            });
        }
    };

    let text = narration.trim();
    if text.is_empty() {
        log::warn!(
            "narration file {} is empty — skipping synthesis",
            config.tts.narration_file.display()
        );
        return Ok(());
    }

    let endpoints = load_endpoints(&config.tts.endpoints_file)?;
    let fetcher = Arc::new(HttpChunkFetcher::new(config.tts.timeout_secs));
    let dispatcher =
        SynthesisDispatcher::new(fetcher, endpoints).with_chunk_limit(config.tts.chunk_limit);

    dispatcher
        .synthesize_to_file(text, config.tts.voice, &config.tts.output_file)
        .await
        .with_context(|| {
            format!(
                "narration synthesis failed for {}",
                config.tts.narration_file.display()
            )
        })?;

    log::info!("narration saved to {}", config.tts.output_file.display());
    Ok(())
}
