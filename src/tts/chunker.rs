//! Text chunking for synthesis dispatch.
//!
//! Endpoints reject long inputs, so text is split into chunks of at most
//! [`DEFAULT_CHUNK_LIMIT`] bytes, preferring to break after punctuation.  The
//! split is lossless: concatenating the chunks in order reproduces the input
//! byte for byte.

/// Default maximum chunk length, in bytes.
pub const DEFAULT_CHUNK_LIMIT: usize = 300;

/// Characters that terminate a punctuation run.
const PUNCTUATION: [char; 7] = ['.', ',', '!', '?', ':', ';', '-'];

// ---------------------------------------------------------------------------
// split_text
// ---------------------------------------------------------------------------

/// Split `text` into ordered chunks of at most `limit` bytes.
///
/// The text is first cut into punctuation-terminated runs (each run is the
/// shortest prefix ending at a punctuation character; the final run extends
/// to end-of-text).  Consecutive runs are then merged greedily while the
/// merged chunk stays within `limit`.
///
/// A single run longer than `limit` becomes its own oversized chunk — runs
/// are never split, so a pathological unpunctuated text yields one chunk per
/// run rather than broken words.  Chunk boundaries always fall after ASCII
/// punctuation, so byte lengths never cut a UTF-8 character.
pub fn split_text(text: &str, limit: usize) -> Vec<String> {
    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();

    for run in split_runs(text) {
        if current.len() + run.len() <= limit {
            current.push_str(run);
        } else {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            current.push_str(run);
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Cut `text` into maximal punctuation-terminated runs.
fn split_runs(text: &str) -> Vec<&str> {
    let mut runs = Vec::new();
    let mut start = 0;

    for (i, c) in text.char_indices() {
        if PUNCTUATION.contains(&c) {
            let end = i + c.len_utf8();
            runs.push(&text[start..end]);
            start = end;
        }
    }

    if start < text.len() {
        runs.push(&text[start..]);
    }
    runs
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
