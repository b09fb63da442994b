//! FFmpeg filter graphs as linked nodes
//!
//! A [`Stream`] records inputs, filter steps, global statements, options and
//! outputs in the order they are created. Nodes are connected purely through
//! [`Label`]s. Running an output node compiles the whole stream into one
//! command line and executes it:
//! - no filter nodes: a plain conversion (`ffmpeg -y -i in out`)
//! - otherwise: one quoted `-filter_complex` expression plus a `-map` per output label
//!
//! # Example
//! ```no_run
//! use ffchain_graph::{filters, Stream};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut stream = Stream::new();
//! let input = stream.input("input.mp4")?;
//! let small = stream.filter([input], filters::scale(640, -1).output("small"))?;
//! let out = stream.output([small], "small.mp4")?;
//!
//! let output = stream.run(&out)?;
//! println!("{}", String::from_utf8_lossy(&output.combined()));
//! # Ok(())
//! # }
//! ```

pub mod compiler;
pub mod config;
pub mod error;
pub mod filters;
pub mod label;
pub mod node;
pub mod runner;
pub mod stream;

pub use config::FfmpegConfig;
pub use error::{GraphError, Result};
pub use label::{Label, LabelGenerator, Link};
pub use node::{
    Filter, FilterNode, GlobalExpr, GlobalNode, InputNode, Node, NodeKind, NodeRef, OptionFlag,
    OptionNode, OutputNode,
};
pub use runner::{ProcessOutput, ProcessRunner, ShellRunner};
pub use stream::Stream;

pub use ffchain_common::StreamType;
