//! Subtitle generation — proportional timing allocation and SRT output.
//!
//! ```text
//! transcript text + audio duration
//!        │
//!        ▼
//! allocate_entries (blocks of N words, equal contiguous windows)
//!        │
//!        ▼
//! write_srt (render whole file, then one write)
//! ```

pub mod srt;
pub mod timing;

pub use srt::{render_srt, write_srt};
pub use timing::{
    allocate_entries, format_timestamp, CaptionError, SubtitleEntry, DEFAULT_WORDS_PER_BLOCK,
};
