//! Node variants of a pipeline description and the argument builders used to create them

use crate::label::{Label, Link};
use ffchain_common::StreamType;
use serde::Serialize;
use std::fmt;

/// Variant of a node, carried by [`NodeRef`] so handles can be checked without a lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Input,
    Filter,
    Global,
    Option,
    Output,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Input => "input node",
            NodeKind::Filter => "filter node",
            NodeKind::Global => "global node",
            NodeKind::Option => "option node",
            NodeKind::Output => "output node",
        };
        f.write_str(name)
    }
}

/// Handle to a node owned by a `Stream`; only valid for the stream that created it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
    pub(crate) owner: u64,
    pub(crate) id: usize,
    pub(crate) kind: NodeKind,
}

impl NodeRef {
    /// Position of the node in its stream
    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Link to one stream type of this input node (e.g. `0:a`)
    #[must_use]
    pub fn stream(&self, stream: StreamType) -> Link {
        Link::stream(*self, stream)
    }
}

/// External input source, passed to the program with `-i`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputNode {
    pub name: String,
    /// 0-based position among the inputs of the stream
    pub index: usize,
}

impl InputNode {
    /// Label of the default (video) stream of this input
    #[must_use]
    pub fn label(&self) -> Label {
        Label::input_stream(self.index, StreamType::Video)
    }
}

/// One `name=k=v:k=v` step of the filter graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterNode {
    pub inputs: Vec<Label>,
    pub filter: String,
    /// Parameters in insertion order, never empty
    pub params: Vec<(String, String)>,
    pub output: Label,
}

/// Filter-graph statement with free-form syntax, e.g. `concat=n=2:v=1:a=1`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalNode {
    pub inputs: Vec<Label>,
    /// At least one label
    pub outputs: Vec<Label>,
    pub args: String,
}

/// Command-line flag outside of the filter graph, e.g. `-t 10`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionNode {
    pub tag: String,
    pub name: String,
    /// Bookkeeping only, never rendered
    pub outputs: Vec<Label>,
}

/// Destination file; each input label becomes one `-map`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputNode {
    pub name: String,
    pub inputs: Vec<Label>,
}

/// A node of the pipeline description
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Input(InputNode),
    Filter(FilterNode),
    Global(GlobalNode),
    Option(OptionNode),
    Output(OutputNode),
}

impl Node {
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Input(_) => NodeKind::Input,
            Node::Filter(_) => NodeKind::Filter,
            Node::Global(_) => NodeKind::Global,
            Node::Option(_) => NodeKind::Option,
            Node::Output(_) => NodeKind::Output,
        }
    }
}

/// Arguments of a filter step.
///
/// ```
/// use ffchain_graph::Filter;
///
/// let scale = Filter::new("scale").param("w", 320).param("h", 240).output("small");
/// assert_eq!(scale.name(), "scale");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub(crate) name: String,
    pub(crate) params: Vec<(String, String)>,
    pub(crate) inputs: Vec<Link>,
    pub(crate) output: Option<Label>,
}

impl Filter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            inputs: Vec::new(),
            output: None,
        }
    }

    /// Append a parameter; order is preserved in the rendered statement
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    /// Explicit inputs, used instead of the caller
    #[must_use]
    pub fn inputs<I, L>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Link>,
    {
        self.inputs = inputs.into_iter().map(Into::into).collect();
        self
    }

    /// Explicit output label; a generated one is used otherwise
    #[must_use]
    pub fn output(mut self, label: impl Into<Label>) -> Self {
        self.output = Some(label.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

/// Arguments of a global (free-form) filter-graph statement
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalExpr {
    pub(crate) args: String,
    pub(crate) inputs: Vec<Link>,
    pub(crate) outputs: Vec<Label>,
    pub(crate) generated_outputs: usize,
}

impl GlobalExpr {
    pub fn new(args: impl Into<String>) -> Self {
        Self {
            args: args.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            generated_outputs: 1,
        }
    }

    /// Number of labels generated when no output is given (at least one)
    #[must_use]
    pub fn generated_outputs(mut self, count: usize) -> Self {
        self.generated_outputs = count.max(1);
        self
    }

    /// Explicit inputs, used instead of the caller
    #[must_use]
    pub fn inputs<I, L>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Link>,
    {
        self.inputs = inputs.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn output(mut self, label: impl Into<Label>) -> Self {
        self.outputs.push(label.into());
        self
    }

    #[must_use]
    pub fn outputs<I, L>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        self.outputs.extend(labels.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn args(&self) -> &str {
        &self.args
    }
}

/// Arguments of an option node: `<tag> <value>`
#[derive(Debug, Clone, PartialEq)]
pub struct OptionFlag {
    pub(crate) tag: String,
    pub(crate) value: String,
    pub(crate) outputs: Vec<Link>,
}

impl OptionFlag {
    pub fn new(tag: impl Into<String>, value: impl ToString) -> Self {
        Self {
            tag: tag.into(),
            value: value.to_string(),
            outputs: Vec::new(),
        }
    }

    #[must_use]
    pub fn output(mut self, link: impl Into<Link>) -> Self {
        self.outputs.push(link.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_params_keep_order() {
        let filter = Filter::new("scale").param("w", 320).param("h", 240);
        assert_eq!(
            filter.params(),
            &[
                ("w".to_string(), "320".to_string()),
                ("h".to_string(), "240".to_string())
            ]
        );
        assert!(filter.output.is_none());
    }

    #[test]
    fn test_global_outputs_accumulate() {
        let expr = GlobalExpr::new("concat=n=2:v=1:a=1")
            .output("video")
            .outputs(["audio"]);
        assert_eq!(expr.outputs, vec![Label::new("video"), Label::new("audio")]);
    }

    #[test]
    fn test_input_default_label() {
        let input = InputNode {
            name: "a.mp4".to_string(),
            index: 2,
        };
        assert_eq!(input.label(), Label::new("2:v"));
    }

    #[test]
    fn test_node_kind_display() {
        assert_eq!(NodeKind::Output.to_string(), "output node");
        let node = Node::Option(OptionNode {
            tag: "-t".to_string(),
            name: "10".to_string(),
            outputs: Vec::new(),
        });
        assert_eq!(node.kind(), NodeKind::Option);
    }
}
