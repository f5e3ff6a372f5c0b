//! Caption pipeline — drives one video from file to subtitle output.
//!
//! # Pipeline flow
//!
//! ```text
//! Video/<name>.mp4
//!   └─▶ Transcoder::extract_audio        → audio/<name>.wav (16 kHz mono)
//!         └─▶ decode_wav                 → AudioBuffer
//!               └─▶ ensure_sample_rate   → (redecoded on mismatch)
//!                     └─▶ RecognitionEngine::transcribe → segments
//!                           ├─▶ stt/<name>.json  (segment list, pretty JSON)
//!                           └─▶ allocate_entries + write_srt
//!                                 └─▶ stt/<name>.srt
//! ```
//!
//! [`CaptionPipeline::process_all`] scans the video directory and runs every
//! video through [`process_video`](CaptionPipeline::process_video); a failed
//! video is logged and skipped, it never aborts the scan.  A video whose
//! subtitle file already exists is skipped entirely, so reruns only pick up
//! new material.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::audio::{decode_wav, ensure_sample_rate, AudioError};
use crate::captions::{allocate_entries, write_srt, CaptionError};
use crate::config::AppConfig;
use crate::media::{DurationProbe, MediaError, Transcoder};
use crate::stt::{RecognitionEngine, TranscriptionError};

// ---------------------------------------------------------------------------
// PipelineError
// ---------------------------------------------------------------------------

/// A stage failure, wrapped with the file it happened on.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Scanning or creating the working directories failed.
    #[error("failed to scan {dir}: {source}")]
    Scan {
        dir: String,
        #[source]
        source: std::io::Error,
    },

    /// Audio extraction from the video failed.
    #[error("audio extraction failed for {video}: {source}")]
    Extract {
        video: String,
        #[source]
        source: MediaError,
    },

    /// WAV decoding or the sample-rate guard failed.
    #[error("audio decoding failed for {video}: {source}")]
    Audio {
        video: String,
        #[source]
        source: AudioError,
    },

    /// The recognition engine failed; no partial transcript is kept.
    #[error("transcription failed for {video}: {source}")]
    Transcribe {
        video: String,
        #[source]
        source: TranscriptionError,
    },

    /// Persisting the segment list failed.
    #[error("failed to save transcription for {video}: {reason}")]
    Persist { video: String, reason: String },

    /// Duration probing, timing allocation or SRT output failed.
    #[error("caption generation failed for {video}: {source}")]
    Captions {
        video: String,
        #[source]
        source: CaptionError,
    },
}

// ---------------------------------------------------------------------------
// CaptionPipeline
// ---------------------------------------------------------------------------

/// Orchestrates extraction, transcription and subtitle generation.
///
/// All collaborators come in explicitly; the pipeline reads no ambient state.
pub struct CaptionPipeline {
    engine: Arc<dyn RecognitionEngine>,
    transcoder: Arc<dyn Transcoder>,
    probe: Arc<dyn DurationProbe>,
    config: AppConfig,
}

impl CaptionPipeline {
    pub fn new(
        engine: Arc<dyn RecognitionEngine>,
        transcoder: Arc<dyn Transcoder>,
        probe: Arc<dyn DurationProbe>,
        config: AppConfig,
    ) -> Self {
        Self {
            engine,
            transcoder,
            probe,
            config,
        }
    }

    // -----------------------------------------------------------------------
    // Directory scan
    // -----------------------------------------------------------------------

    /// Process every video file in the configured video directory.
    ///
    /// Creates the working directories on first run.  Per-video failures are
    /// logged and skipped; only a failed directory scan is an error.
    pub fn process_all(&self) -> Result<(), PipelineError> {
        let paths = &self.config.paths;
        for dir in [&paths.video_dir, &paths.audio_dir, &paths.transcript_dir] {
            std::fs::create_dir_all(dir).map_err(|source| PipelineError::Scan {
                dir: dir.display().to_string(),
                source,
            })?;
        }

        let entries =
            std::fs::read_dir(&paths.video_dir).map_err(|source| PipelineError::Scan {
                dir: paths.video_dir.display().to_string(),
                source,
            })?;

        let mut videos: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| is_video_file(p))
            .collect();
        videos.sort();

        if videos.is_empty() {
            log::info!("no video files found in {}", paths.video_dir.display());
            return Ok(());
        }

        for video in &videos {
            if let Err(e) = self.process_video(video) {
                log::error!("error processing {}: {e}", video.display());
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Single video
    // -----------------------------------------------------------------------

    /// Run one video through the full caption pipeline.
    ///
    /// Skips videos whose subtitle file already exists.  On any failure the
    /// subtitle file for this video is not written at all.
    pub fn process_video(&self, video: &Path) -> Result<(), PipelineError> {
        let name = video
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .into_owned();
        let wav = self.config.paths.audio_dir.join(format!("{name}.wav"));
        let srt = self.config.paths.transcript_dir.join(format!("{name}.srt"));
        let json = self.config.paths.transcript_dir.join(format!("{name}.json"));

        if srt.exists() {
            log::info!("skipping {name} (already processed)");
            return Ok(());
        }

        log::info!("processing video: {}", video.display());
        let required_rate = self.config.stt.sample_rate;

        // ── 1. Extract audio ─────────────────────────────────────────────
        self.transcoder
            .extract_audio(video, &wav, required_rate, 1)
            .map_err(|source| PipelineError::Extract {
                video: video.display().to_string(),
                source,
            })?;

        // ── 2. Decode + rate guard ───────────────────────────────────────
        let wrap_audio = |source: AudioError| PipelineError::Audio {
            video: video.display().to_string(),
            source,
        };
        let buffer = decode_wav(&wav).map_err(wrap_audio)?;
        let (buffer, wav) =
            ensure_sample_rate(buffer, &wav, required_rate, self.transcoder.as_ref())
                .map_err(wrap_audio)?;

        // ── 3. Transcribe (drain all segments) ───────────────────────────
        let segments =
            self.engine
                .transcribe(&buffer)
                .map_err(|source| PipelineError::Transcribe {
                    video: video.display().to_string(),
                    source,
                })?;

        // ── 4. Persist the segment list ──────────────────────────────────
        let persist_err = |reason: String| PipelineError::Persist {
            video: video.display().to_string(),
            reason,
        };
        let pretty =
            serde_json::to_string_pretty(&segments).map_err(|e| persist_err(e.to_string()))?;
        std::fs::write(&json, pretty).map_err(|e| persist_err(e.to_string()))?;
        log::info!("saved {} segment(s) to {}", segments.len(), json.display());

        // ── 5. Allocate subtitle timing over the probed duration ─────────
        let wrap_captions = |source: CaptionError| PipelineError::Captions {
            video: video.display().to_string(),
            source,
        };
        let transcript: String = segments.iter().map(|s| s.text.as_str()).collect();
        let duration = self
            .probe
            .duration_secs(&wav)
            .map_err(|e| wrap_captions(CaptionError::Probe(e)))?;

        let entries = allocate_entries(
            transcript.trim(),
            duration,
            self.config.captions.words_per_block,
        )
        .map_err(wrap_captions)?;
        write_srt(&srt, &entries).map_err(wrap_captions)?;

        Ok(())
    }
}

/// Video files are selected by extension, case-insensitively.
fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            e == "mp4" || e == "mov" || e == "mkv"
        })
        .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stt::{MockRecognitionEngine, TranscriptionSegment};
    use std::sync::Mutex;
    use tempfile::tempdir;

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    /// Writes a silent mono WAV at the requested rate instead of calling
    /// ffmpeg, and records every extraction.
    struct WavWritingTranscoder {
        extractions: Mutex<Vec<PathBuf>>,
    }

    impl WavWritingTranscoder {
        fn new() -> Self {
            Self {
                extractions: Mutex::new(Vec::new()),
            }
        }
    }

    impl Transcoder for WavWritingTranscoder {
        fn extract_audio(
            &self,
            video: &Path,
            wav_out: &Path,
            sample_rate: u32,
            _channels: u16,
        ) -> Result<(), MediaError> {
            self.extractions.lock().unwrap().push(video.to_path_buf());
            let spec = hound::WavSpec {
                channels: 1,
                sample_rate,
                bits_per_sample: 16,
                sample_format: hound::SampleFormat::Int,
            };
            let mut writer = hound::WavWriter::create(wav_out, spec).expect("create wav");
            for _ in 0..sample_rate {
                writer.write_sample(0i16).expect("write sample");
            }
            writer.finalize().expect("finalize wav");
            Ok(())
        }

        fn resample(
            &self,
            _wav_in: &Path,
            _wav_out: &Path,
            _sample_rate: u32,
            _channels: u16,
        ) -> Result<(), MediaError> {
            unreachable!("extraction already produces the required rate");
        }
    }

    /// Fixed-duration probe.
    struct FixedProbe(f64);

    impl DurationProbe for FixedProbe {
        fn duration_secs(&self, _audio: &Path) -> Result<f64, MediaError> {
            Ok(self.0)
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn test_config(root: &Path) -> AppConfig {
        let mut config = AppConfig::default();
        config.paths.video_dir = root.join("Video");
        config.paths.audio_dir = root.join("audio");
        config.paths.transcript_dir = root.join("stt");
        config
    }

    fn segments() -> Vec<TranscriptionSegment> {
        vec![
            TranscriptionSegment::new(0, 2_000, " twelve words of transcript"),
            TranscriptionSegment::new(2_000, 4_000, " split across two segments"),
            TranscriptionSegment::new(4_000, 6_000, " for the allocator group"),
        ]
    }

    fn make_pipeline(
        root: &Path,
        engine: MockRecognitionEngine,
        duration: f64,
    ) -> (CaptionPipeline, Arc<WavWritingTranscoder>) {
        let config = test_config(root);
        for dir in [
            &config.paths.video_dir,
            &config.paths.audio_dir,
            &config.paths.transcript_dir,
        ] {
            std::fs::create_dir_all(dir).unwrap();
        }

        let transcoder = Arc::new(WavWritingTranscoder::new());
        let pipeline = CaptionPipeline::new(
            Arc::new(engine),
            Arc::clone(&transcoder) as Arc<dyn Transcoder>,
            Arc::new(FixedProbe(duration)),
            config,
        );
        (pipeline, transcoder)
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[test]
    fn process_video_writes_srt_and_segment_json() {
        let dir = tempdir().unwrap();
        let (pipeline, _) = make_pipeline(dir.path(), MockRecognitionEngine::ok(segments()), 12.0);

        let video = dir.path().join("Video/clip.mp4");
        std::fs::write(&video, b"fake video").unwrap();
        pipeline.process_video(&video).unwrap();

        let srt = std::fs::read_to_string(dir.path().join("stt/clip.srt")).unwrap();
        // 12 words / 6 per block = 2 entries over 12 s
        assert_eq!(srt.matches("-->").count(), 2);
        assert!(srt.contains("00:00:00,000 --> 00:00:06,000"));
        assert!(srt.contains("00:00:06,000 --> 00:00:12,000"));
        assert!(srt.starts_with("1\n"));

        let json = std::fs::read_to_string(dir.path().join("stt/clip.json")).unwrap();
        let back: Vec<TranscriptionSegment> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, segments());
    }

    #[test]
    fn engine_failure_leaves_no_subtitle_or_json() {
        let dir = tempdir().unwrap();
        let (pipeline, _) = make_pipeline(
            dir.path(),
            MockRecognitionEngine::failing_after(segments(), 1),
            12.0,
        );

        let video = dir.path().join("Video/bad.mp4");
        std::fs::write(&video, b"fake video").unwrap();
        let err = pipeline.process_video(&video).unwrap_err();

        assert!(matches!(err, PipelineError::Transcribe { .. }), "got {err:?}");
        assert!(!dir.path().join("stt/bad.srt").exists());
        assert!(!dir.path().join("stt/bad.json").exists());
    }

    #[test]
    fn already_processed_video_is_skipped() {
        let dir = tempdir().unwrap();
        let (pipeline, transcoder) =
            make_pipeline(dir.path(), MockRecognitionEngine::ok(segments()), 12.0);

        let video = dir.path().join("Video/done.mp4");
        std::fs::write(&video, b"fake video").unwrap();
        std::fs::write(dir.path().join("stt/done.srt"), "sentinel").unwrap();

        pipeline.process_video(&video).unwrap();

        // Nothing was extracted and the existing file is untouched.
        assert!(transcoder.extractions.lock().unwrap().is_empty());
        let kept = std::fs::read_to_string(dir.path().join("stt/done.srt")).unwrap();
        assert_eq!(kept, "sentinel");
    }

    #[test]
    fn empty_transcript_is_a_caption_error() {
        let dir = tempdir().unwrap();
        let (pipeline, _) = make_pipeline(dir.path(), MockRecognitionEngine::ok(vec![]), 5.0);

        let video = dir.path().join("Video/silent.mp4");
        std::fs::write(&video, b"fake video").unwrap();
        let err = pipeline.process_video(&video).unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Captions {
                source: CaptionError::EmptyTranscript,
                ..
            }
        ));
        assert!(!dir.path().join("stt/silent.srt").exists());
    }

    #[test]
    fn process_all_only_picks_video_extensions() {
        let dir = tempdir().unwrap();
        let (pipeline, transcoder) =
            make_pipeline(dir.path(), MockRecognitionEngine::ok(segments()), 12.0);

        std::fs::write(dir.path().join("Video/a.mp4"), b"v").unwrap();
        std::fs::write(dir.path().join("Video/b.MOV"), b"v").unwrap();
        std::fs::write(dir.path().join("Video/notes.txt"), b"t").unwrap();
        std::fs::write(dir.path().join("Video/archive.zip"), b"z").unwrap();

        pipeline.process_all().unwrap();

        let extracted = transcoder.extractions.lock().unwrap();
        assert_eq!(extracted.len(), 2);
    }

    #[test]
    fn process_all_continues_past_a_failing_video() {
        let dir = tempdir().unwrap();
        // Engine fails every run; both videos error but the scan succeeds.
        let (pipeline, transcoder) = make_pipeline(
            dir.path(),
            MockRecognitionEngine::failing_after(segments(), 0),
            12.0,
        );

        std::fs::write(dir.path().join("Video/a.mp4"), b"v").unwrap();
        std::fs::write(dir.path().join("Video/b.mp4"), b"v").unwrap();

        pipeline.process_all().unwrap();
        assert_eq!(transcoder.extractions.lock().unwrap().len(), 2);
    }

    // ---- is_video_file -----------------------------------------------------

    #[test]
    fn video_extensions_match_case_insensitively() {
        assert!(is_video_file(Path::new("a.mp4")));
        assert!(is_video_file(Path::new("b.MOV")));
        assert!(is_video_file(Path::new("c.Mkv")));
        assert!(!is_video_file(Path::new("d.wav")));
        assert!(!is_video_file(Path::new("noext")));
    }
}
