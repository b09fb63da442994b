//! Ready-made filter steps.
//!
//! Each helper only fills in a [`Filter`] or [`GlobalExpr`]; callers still chain
//! them with `output(...)` and pass them to the stream like any other step.

use crate::node::{Filter, GlobalExpr};
use std::fmt;

/// Direction of a fade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeDirection {
    In,
    Out,
}

impl fmt::Display for FadeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FadeDirection::In => f.write_str("in"),
            FadeDirection::Out => f.write_str("out"),
        }
    }
}

/// Resize video; `-1` for either side keeps the aspect ratio
pub fn scale(width: i32, height: i32) -> Filter {
    Filter::new("scale").param("w", width).param("h", height)
}

/// Cut a `width`x`height` window at (`x`, `y`)
pub fn crop(width: u32, height: u32, x: u32, y: u32) -> Filter {
    Filter::new("crop")
        .param("w", width)
        .param("h", height)
        .param("x", x)
        .param("y", y)
}

/// Rewrite video timestamps, e.g. `PTS-STARTPTS`
pub fn setpts(expr: &str) -> Filter {
    Filter::new("setpts").param("expr", expr)
}

/// Rewrite audio timestamps
pub fn asetpts(expr: &str) -> Filter {
    Filter::new("asetpts").param("expr", expr)
}

/// Video fade over `frames` frames starting at `start_frame`
pub fn fade(direction: FadeDirection, start_frame: u32, frames: u32) -> Filter {
    Filter::new("fade")
        .param("t", direction)
        .param("s", start_frame)
        .param("n", frames)
}

/// Audio fade of `duration` seconds starting at `start` seconds
pub fn afade(direction: FadeDirection, start: f64, duration: f64) -> Filter {
    Filter::new("afade")
        .param("t", direction)
        .param("st", start)
        .param("d", duration)
}

/// Keep video between `start` and `end` seconds
pub fn trim(start: f64, end: f64) -> Filter {
    Filter::new("trim").param("start", start).param("end", end)
}

/// Keep audio between `start` and `end` seconds
pub fn atrim(start: f64, end: f64) -> Filter {
    Filter::new("atrim").param("start", start).param("end", end)
}

/// Join `segments` segments, each with `video` video and `audio` audio streams.
///
/// Inputs are passed segment by segment (`[0:v][0:a][1:v][1:a]`); one generated
/// output is reserved per video and audio stream unless the caller adds its own.
pub fn concat(segments: usize, video: usize, audio: usize) -> GlobalExpr {
    GlobalExpr::new(format!("concat=n={segments}:v={video}:a={audio}"))
        .generated_outputs(video + audio)
}
