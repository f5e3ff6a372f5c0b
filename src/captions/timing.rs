//! Subtitle timing allocation — evenly distribute transcript text over the
//! measured audio duration.
//!
//! The transcript arrives as one block of text without reliable per-word
//! timing, so entries are laid out proportionally: words are grouped into
//! fixed-size blocks and each block gets an equal share of the total
//! duration.  Windows are contiguous and cover `[0, duration]` exactly; the
//! last entry's end time comes from the same formula as every other entry, so
//! minor floating residue against the probed duration is accepted rather than
//! corrected.

use thiserror::Error;

/// Default number of words per subtitle block.
pub const DEFAULT_WORDS_PER_BLOCK: usize = 6;

// ---------------------------------------------------------------------------
// CaptionError
// ---------------------------------------------------------------------------

/// Errors from subtitle allocation and SRT writing.
#[derive(Debug, Error)]
pub enum CaptionError {
    /// The transcript contained no words — nothing to allocate.
    #[error("transcript is empty")]
    EmptyTranscript,

    /// Probing the audio duration failed.
    #[error("duration probe failed: {0}")]
    Probe(#[from] crate::media::MediaError),

    /// Writing the subtitle file failed.
    #[error("failed to write subtitle file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// SubtitleEntry
// ---------------------------------------------------------------------------

/// One subtitle block: a 1-based index, a time window and its text.
///
/// Within one file, entries partition the transcript with no gaps or
/// overlaps; entry `i+1` starts exactly where entry `i` ends.
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleEntry {
    /// 1-based sequential index, as required by the SRT format.
    pub index: usize,
    /// Window start, in seconds from the start of the audio.
    pub start_secs: f64,
    /// Window end, in seconds from the start of the audio.
    pub end_secs: f64,
    /// The words of this block, joined by single spaces.
    pub text: String,
}

// ---------------------------------------------------------------------------
// allocate_entries
// ---------------------------------------------------------------------------

/// Partition `text` into blocks of `words_per_block` words and assign each a
/// proportional window of `duration_secs`.
///
/// The number of blocks is `ceil(wordCount / blockSize)`; every window is
/// `duration / blocks` long; block `i` starts at `i * window`.  The last
/// block may hold fewer words.
///
/// # Errors
///
/// [`CaptionError::EmptyTranscript`] when `text` has no words.
pub fn allocate_entries(
    text: &str,
    duration_secs: f64,
    words_per_block: usize,
) -> Result<Vec<SubtitleEntry>, CaptionError> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return Err(CaptionError::EmptyTranscript);
    }

    let size = words_per_block.max(1);
    let blocks = words.len().div_ceil(size);
    let window = duration_secs / blocks as f64;

    let entries = words
        .chunks(size)
        .enumerate()
        .map(|(i, block)| {
            let start_secs = i as f64 * window;
            SubtitleEntry {
                index: i + 1,
                start_secs,
                end_secs: start_secs + window,
                text: block.join(" "),
            }
        })
        .collect();

    Ok(entries)
}

// ---------------------------------------------------------------------------
// format_timestamp
// ---------------------------------------------------------------------------

/// Render `seconds` as an SRT timestamp: `HH:MM:SS,mmm`, zero-padded.
///
/// The millisecond part is **truncated**, not rounded, from the fractional
/// part of the value.
pub fn format_timestamp(seconds: f64) -> String {
    let whole = seconds as u64;
    let hours = whole / 3600;
    let minutes = (whole % 3600) / 60;
    let secs = whole % 60;
    let millis = ((seconds - whole as f64) * 1000.0) as u64;

    format!("{hours:02}:{minutes:02}:{secs:02},{millis:03}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
