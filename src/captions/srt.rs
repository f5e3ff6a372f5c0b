//! SRT rendering and file output.
//!
//! An SRT file is a sequence of blocks:
//!
//! ```text
//! 1
//! 00:00:00,000 --> 00:00:02,500
//! first subtitle text
//!
//! 2
//! …
//! ```
//!
//! The whole file is rendered in memory and written in one call, so a failed
//! run never leaves a truncated subtitle file behind.

use std::fmt::Write as _;
use std::path::Path;

use crate::captions::timing::{format_timestamp, CaptionError, SubtitleEntry};

// ---------------------------------------------------------------------------
// render_srt / write_srt
// ---------------------------------------------------------------------------

/// Render `entries` as the full text of an SRT file.
pub fn render_srt(entries: &[SubtitleEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        // write! to a String cannot fail.
        let _ = write!(
            out,
            "{}\n{} --> {}\n{}\n\n",
            entry.index,
            format_timestamp(entry.start_secs),
            format_timestamp(entry.end_secs),
            entry.text,
        );
    }
    out
}

/// Render `entries` and write them to `path`, overwriting any existing file.
pub fn write_srt(path: &Path, entries: &[SubtitleEntry]) -> Result<(), CaptionError> {
    let rendered = render_srt(entries);
    std::fs::write(path, rendered).map_err(|source| CaptionError::Io {
        path: path.display().to_string(),
        source,
    })?;

    log::info!("wrote {} subtitle entries to {}", entries.len(), path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::captions::timing::allocate_entries;
    use tempfile::tempdir;

    #[test]
    fn renders_blocks_in_srt_format() {
        let entries = vec![
            SubtitleEntry {
                index: 1,
                start_secs: 0.0,
                end_secs: 2.5,
                text: "hello world".into(),
            },
            SubtitleEntry {
                index: 2,
                start_secs: 2.5,
                end_secs: 5.0,
                text: "second block".into(),
            },
        ];

        let srt = render_srt(&entries);
        assert_eq!(
            srt,
            "1\n00:00:00,000 --> 00:00:02,500\nhello world\n\n\
             2\n00:00:02,500 --> 00:00:05,000\nsecond block\n\n"
        );
    }

    #[test]
    fn renders_empty_list_to_empty_string() {
        assert_eq!(render_srt(&[]), "");
    }

    #[test]
    fn writes_and_overwrites_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("subs.srt");

        let first = allocate_entries("one two three four five six seven", 7.0, 6).unwrap();
        write_srt(&path, &first).unwrap();
        let len_first = std::fs::metadata(&path).unwrap().len();

        // A rewrite with fewer entries must fully replace the file.
        let second = allocate_entries("one", 1.0, 6).unwrap();
        write_srt(&path, &second).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();

        assert!(contents.starts_with("1\n"));
        assert!(contents.len() < len_first as usize);
        assert_eq!(contents.matches("-->").count(), 1);
    }

    #[test]
    fn allocated_entries_render_with_expected_count() {
        // 12 words / 6 per block → 2 entries over 10 s
        let entries =
            allocate_entries("a b c d e f g h i j k l", 10.0, 6).unwrap();
        let srt = render_srt(&entries);
        assert_eq!(srt.matches("-->").count(), 2);
        assert!(srt.contains("00:00:05,000 --> 00:00:10,000"));
    }
}
