//! Writing transcripts to disk.

use observe_core::{Result, Transcript};
use std::path::Path;

/// Output format for a saved transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptFormat {
    /// Pretty-printed JSON
    Json,
    /// Human-readable Markdown
    Markdown,
}

impl TranscriptFormat {
    /// Picks the format from the file extension; anything but `.md` or
    /// `.markdown` is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("markdown") => {
                TranscriptFormat::Markdown
            }
            _ => TranscriptFormat::Json,
        }
    }
}

/// Writes `transcript` to `path`, creating parent directories.
pub fn write_transcript(path: &Path, transcript: &Transcript) -> Result<TranscriptFormat> {
    let format = TranscriptFormat::from_path(path);
    let body = match format {
        TranscriptFormat::Json => transcript.to_json_pretty()?,
        TranscriptFormat::Markdown => transcript.to_markdown(),
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, body)?;

    tracing::info!(path = %path.display(), format = ?format, "Transcript written");
    Ok(format)
}
