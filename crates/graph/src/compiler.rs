//! Serializes a node sequence into a single FFmpeg command line.
//!
//! Two shapes are produced. Without any filter node the command is a direct
//! conversion:
//!
//! ```text
//! ffmpeg -y -i a.mp4  out.wav
//! ```
//!
//! Otherwise every filter and global node becomes a statement of one quoted
//! `-filter_complex` expression and each output label is selected with `-map`:
//!
//! ```text
//! ffmpeg -i a.mp4  -y -filter_complex "[0:v] scale=w=320:h=240 [v1]" -map "[v1]" out.mp4
//! ```
//!
//! Statements are `;`-separated and the final one is never terminated. The
//! last filter node is always emitted after the global nodes.

use crate::label::bracket_all;
use crate::node::{FilterNode, GlobalNode, InputNode, Node, OptionNode, OutputNode};

/// Nodes of a graph grouped by variant, each group in creation order
#[derive(Debug, Default)]
pub struct Partition<'a> {
    pub inputs: Vec<&'a InputNode>,
    pub options: Vec<&'a OptionNode>,
    pub filters: Vec<&'a FilterNode>,
    pub globals: Vec<&'a GlobalNode>,
    pub outputs: Vec<&'a OutputNode>,
}

impl Partition<'_> {
    /// Total number of nodes across all groups
    #[must_use]
    pub fn len(&self) -> usize {
        self.inputs.len()
            + self.options.len()
            + self.filters.len()
            + self.globals.len()
            + self.outputs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Split a node sequence by variant
#[must_use]
pub fn partition(nodes: &[Node]) -> Partition<'_> {
    let mut parts = Partition::default();

    for node in nodes {
        match node {
            Node::Input(input) => parts.inputs.push(input),
            Node::Option(option) => parts.options.push(option),
            Node::Filter(filter) => parts.filters.push(filter),
            Node::Global(global) => parts.globals.push(global),
            Node::Output(output) => parts.outputs.push(output),
        }
    }

    debug_assert_eq!(parts.len(), nodes.len());
    parts
}

/// Compile the whole graph into a command line for `program`
#[must_use]
pub fn compile(nodes: &[Node], program: &str) -> String {
    let parts = partition(nodes);

    let Some((last_filter, filters)) = parts.filters.split_last() else {
        return direct_command(&parts, program);
    };

    let mut cmd = String::from(program);

    for input in &parts.inputs {
        cmd.push_str(&format!(" -i {} ", input.name));
    }

    for option in &parts.options {
        cmd.push_str(&format!(" {} {}", option.tag, option.name));
    }

    cmd.push_str(" -y -filter_complex \"");
    for filter in filters {
        cmd.push_str(&filter_statement(filter));
    }

    for global in &parts.globals {
        cmd.push_str(&global_statement(global));
    }

    let last = filter_statement(last_filter);
    cmd.push_str(last.strip_suffix(';').unwrap_or(&last));
    cmd.push('"');

    // One map per input label, not deduplicated across outputs
    for output in &parts.outputs {
        for label in &output.inputs {
            cmd.push_str(&format!(" -map \"{}\"", label.bracketed()));
            cmd.push_str(&format!(" {} ", output.name));
        }
    }

    cmd
}

/// Pure conversion: inputs straight to outputs, no filter graph and no maps
fn direct_command(parts: &Partition<'_>, program: &str) -> String {
    let mut cmd = String::from(program);
    cmd.push_str(" -y");

    for input in &parts.inputs {
        cmd.push_str(&format!(" -i {} ", input.name));
    }

    for output in &parts.outputs {
        cmd.push_str(&format!(" {} ", output.name));
    }

    cmd
}

/// `k1=v1:k2=v2`
fn param_string(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join(":")
}

/// `[in] name=k=v:k=v [out];`
fn filter_statement(filter: &FilterNode) -> String {
    format!(
        "{} {}={} {};",
        bracket_all(&filter.inputs),
        filter.filter,
        param_string(&filter.params),
        filter.output.bracketed()
    )
}

/// `[in1][in2] args [out1][out2];`
fn global_statement(global: &GlobalNode) -> String {
    format!(
        "{} {} {};",
        bracket_all(&global.inputs),
        global.args,
        bracket_all(&global.outputs)
    )
}
