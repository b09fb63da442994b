//! Media metadata via ffprobe
//!
//! Callers typically probe an input before building a graph, e.g. to pick
//! scale targets or to check that an audio stream exists.
//!
//! # Example
//! ```no_run
//! use ffchain_probe::{probe, ProbeConfig};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let metadata = probe(Path::new("video.mp4"), &ProbeConfig::default())?;
//!
//! println!("Duration: {}s", metadata.format.duration.unwrap_or(0.0));
//! if let Some(video) = metadata.first_video() {
//!     println!("Resolution: {}x{}", video.width.unwrap_or(0), video.height.unwrap_or(0));
//! }
//! # Ok(())
//! # }
//! ```

use ffchain_common::{ProcessingError, StreamType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::process::Command;
use thiserror::Error;
use tracing::debug;

/// Errors specific to probing
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("ffprobe execution failed: {0}")]
    FfprobeError(String),

    #[error("Failed to parse ffprobe output: {0}")]
    ParseError(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<ProbeError> for ProcessingError {
    fn from(err: ProbeError) -> Self {
        match err {
            ProbeError::FileNotFound(path) => ProcessingError::FileNotFound(path),
            ProbeError::IoError(e) => ProcessingError::IoError(e),
            other => ProcessingError::FFmpegError(other.to_string()),
        }
    }
}

/// Configuration for probing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// ffprobe executable
    pub program: String,
    /// Include per-stream information
    pub include_streams: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            program: "ffprobe".to_string(),
            include_streams: true,
        }
    }
}

/// Format-level metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatMetadata {
    /// Format name (e.g., "mov,mp4,m4a,3gp,3g2,mj2")
    pub format_name: Option<String>,
    /// Long format name (e.g., "QuickTime / MOV")
    pub format_long_name: Option<String>,
    /// Duration in seconds
    pub duration: Option<f64>,
    /// File size in bytes
    pub size: Option<u64>,
    /// Overall bitrate in bits/second
    pub bit_rate: Option<u64>,
    pub nb_streams: usize,
    /// Format-level tags (e.g., creation_time, title)
    pub tags: HashMap<String, String>,
}

/// One stream of the container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamMetadata {
    pub index: usize,
    /// `None` for data/attachment streams
    pub stream_type: Option<StreamType>,
    pub codec_name: Option<String>,
    pub codec_long_name: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Frames per second
    pub fps: Option<f64>,
    pub pix_fmt: Option<String>,
    /// Sample rate in Hz
    pub sample_rate: Option<u32>,
    pub channels: Option<u32>,
    pub channel_layout: Option<String>,
    pub bit_rate: Option<u64>,
    pub duration: Option<f64>,
}

/// Complete probe result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaMetadata {
    pub format: FormatMetadata,
    pub streams: Vec<StreamMetadata>,
}

impl MediaMetadata {
    /// Streams of one type, in container order
    pub fn streams_of(&self, stream_type: StreamType) -> impl Iterator<Item = &StreamMetadata> {
        self.streams
            .iter()
            .filter(move |s| s.stream_type == Some(stream_type))
    }

    #[must_use]
    pub fn first_video(&self) -> Option<&StreamMetadata> {
        self.streams_of(StreamType::Video).next()
    }

    #[must_use]
    pub fn first_audio(&self) -> Option<&StreamMetadata> {
        self.streams_of(StreamType::Audio).next()
    }
}

/// Probe a media file with ffprobe
///
/// # Errors
///
/// Returns errors if:
/// - the file does not exist (`ProbeError::FileNotFound`)
/// - ffprobe cannot be started or exits with a failure (`ProbeError::FfprobeError`)
/// - the JSON output cannot be parsed (`ProbeError::ParseError`)
pub fn probe(file_path: &Path, config: &ProbeConfig) -> Result<MediaMetadata, ProbeError> {
    if !file_path.exists() {
        return Err(ProbeError::FileNotFound(file_path.display().to_string()));
    }

    debug!("Probing {} with {}", file_path.display(), config.program);

    let mut cmd = Command::new(&config.program);
    cmd.args(["-v", "quiet", "-print_format", "json", "-show_format"]);
    if config.include_streams {
        cmd.arg("-show_streams");
    }
    cmd.arg(file_path);

    let output = cmd.output().map_err(|e| {
        ProbeError::FfprobeError(format!("Failed to execute {}: {}", config.program, e))
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ProbeError::FfprobeError(format!(
            "{} failed: {}",
            config.program, stderr
        )));
    }

    parse_probe_output(&String::from_utf8_lossy(&output.stdout))
}

/// Parse the JSON printed by `ffprobe -print_format json -show_format -show_streams`
pub fn parse_probe_output(json: &str) -> Result<MediaMetadata, ProbeError> {
    let raw: FfprobeOutput = serde_json::from_str(json)
        .map_err(|e| ProbeError::ParseError(format!("Failed to parse JSON: {}", e)))?;

    Ok(MediaMetadata {
        format: parse_format(&raw.format),
        streams: raw.streams.iter().map(parse_stream).collect(),
    })
}

// ────────── Raw ffprobe JSON ──────────

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    format_name: Option<String>,
    format_long_name: Option<String>,
    duration: Option<String>,
    size: Option<String>,
    bit_rate: Option<String>,
    nb_streams: Option<usize>,
    tags: Option<HashMap<String, String>>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    index: usize,
    codec_type: Option<String>,
    codec_name: Option<String>,
    codec_long_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    pix_fmt: Option<String>,
    sample_rate: Option<String>,
    channels: Option<u32>,
    channel_layout: Option<String>,
    bit_rate: Option<String>,
    duration: Option<String>,
}

fn parse_format(format: &FfprobeFormat) -> FormatMetadata {
    FormatMetadata {
        format_name: format.format_name.clone(),
        format_long_name: format.format_long_name.clone(),
        duration: parse_number(format.duration.as_deref()),
        size: parse_number(format.size.as_deref()),
        bit_rate: parse_number(format.bit_rate.as_deref()),
        nb_streams: format.nb_streams.unwrap_or(0),
        tags: format.tags.clone().unwrap_or_default(),
    }
}

fn parse_stream(stream: &FfprobeStream) -> StreamMetadata {
    StreamMetadata {
        index: stream.index,
        stream_type: stream
            .codec_type
            .as_deref()
            .and_then(StreamType::from_codec_type),
        codec_name: stream.codec_name.clone(),
        codec_long_name: stream.codec_long_name.clone(),
        width: stream.width,
        height: stream.height,
        fps: stream.r_frame_rate.as_deref().and_then(parse_frame_rate),
        pix_fmt: stream.pix_fmt.clone(),
        sample_rate: parse_number(stream.sample_rate.as_deref()),
        channels: stream.channels,
        channel_layout: stream.channel_layout.clone(),
        bit_rate: parse_number(stream.bit_rate.as_deref()),
        duration: parse_number(stream.duration.as_deref()),
    }
}

fn parse_number<T: std::str::FromStr>(value: Option<&str>) -> Option<T> {
    value.and_then(|v| v.parse().ok())
}

/// "30000/1001" or "25"; `0/0` yields `None`
fn parse_frame_rate(rate: &str) -> Option<f64> {
    match rate.split_once('/') {
        Some((num, den)) => {
            let num = num.parse::<f64>().ok()?;
            let den = den.parse::<f64>().ok()?;
            (den != 0.0).then(|| num / den)
        }
        None => rate.parse().ok(),
    }
}
