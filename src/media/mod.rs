//! External media tool boundary — ffmpeg / ffprobe behind narrow traits.
//!
//! The core pipeline consumes these as collaborators; nothing in here decodes
//! audio itself.

pub mod transcoder;

pub use transcoder::{
    DurationProbe, FfmpegTranscoder, FfprobeDurationProbe, MediaError, Transcoder,
};
