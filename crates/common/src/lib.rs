/// Common types shared by the ffchain crates
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Processing errors
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("Invalid graph: {0}")]
    InvalidGraph(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("FFmpeg error: {0}")]
    FFmpegError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for processing operations
pub type Result<T> = std::result::Result<T, ProcessingError>;

/// Stream type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamType {
    Video,
    Audio,
    Subtitle,
}

impl StreamType {
    /// Letter used in FFmpeg stream specifiers (`0:v`, `1:a`, `0:s`)
    #[must_use]
    pub fn specifier(self) -> &'static str {
        match self {
            StreamType::Video => "v",
            StreamType::Audio => "a",
            StreamType::Subtitle => "s",
        }
    }

    /// Map an ffprobe `codec_type` value to a stream type
    #[must_use]
    pub fn from_codec_type(codec_type: &str) -> Option<Self> {
        match codec_type {
            "video" => Some(StreamType::Video),
            "audio" => Some(StreamType::Audio),
            "subtitle" => Some(StreamType::Subtitle),
            _ => None,
        }
    }
}

impl fmt::Display for StreamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.specifier())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_type_specifier() {
        assert_eq!(StreamType::Video.specifier(), "v");
        assert_eq!(StreamType::Audio.specifier(), "a");
        assert_eq!(StreamType::Subtitle.to_string(), "s");
    }

    #[test]
    fn test_stream_type_from_codec_type() {
        assert_eq!(StreamType::from_codec_type("video"), Some(StreamType::Video));
        assert_eq!(StreamType::from_codec_type("audio"), Some(StreamType::Audio));
        assert_eq!(StreamType::from_codec_type("data"), None);
    }

    #[test]
    fn test_processing_error_display() {
        let err = ProcessingError::InvalidGraph("no output".to_string());
        assert_eq!(err.to_string(), "Invalid graph: no output");
    }
}
