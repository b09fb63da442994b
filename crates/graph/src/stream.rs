//! Caller-owned graph registry and builder operations

use crate::compiler;
use crate::config::FfmpegConfig;
use crate::error::{GraphError, Result};
use crate::label::{Label, LabelGenerator, Link};
use crate::node::{
    Filter, FilterNode, GlobalExpr, GlobalNode, InputNode, Node, NodeKind, NodeRef, OptionFlag,
    OptionNode, OutputNode,
};
use crate::runner::{ProcessOutput, ProcessRunner, ShellRunner};
use ffchain_common::StreamType;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{info, trace, warn};

static NEXT_OWNER: AtomicU64 = AtomicU64::new(0);

fn next_owner() -> u64 {
    NEXT_OWNER.fetch_add(1, Ordering::Relaxed)
}

/// Ordered sequence of every node created since the last reset.
///
/// Builder calls append in call order and hand back a [`NodeRef`]; nodes only
/// know each other through labels. Running never modifies the stream.
///
/// ```
/// use ffchain_graph::{Filter, Stream};
///
/// let mut stream = Stream::new();
/// let input = stream.input("a.mp4")?;
/// let scaled = stream.filter([input], Filter::new("scale").param("w", 320).param("h", 240).output("v1"))?;
/// let out = stream.output([scaled], "out.mp4")?;
///
/// assert_eq!(
///     stream.command(&out)?,
///     "ffmpeg -i a.mp4  -y -filter_complex \"[0:v] scale=w=320:h=240 [v1]\" -map \"[v1]\" out.mp4 "
/// );
/// # Ok::<(), ffchain_graph::GraphError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Stream {
    /// Stamped into every handle; renewed on reset
    owner: u64,
    nodes: Vec<Node>,
    input_count: usize,
    labels: LabelGenerator,
    config: FfmpegConfig,
}

impl Stream {
    pub fn new() -> Self {
        Self::with_config(FfmpegConfig::default())
    }

    pub fn with_config(config: FfmpegConfig) -> Self {
        Self {
            owner: next_owner(),
            nodes: Vec::new(),
            input_count: 0,
            labels: LabelGenerator::new(),
            config,
        }
    }

    /// Stream whose generated labels are reproducible
    pub fn with_seed(seed: u64) -> Self {
        Self {
            labels: LabelGenerator::seeded(seed),
            ..Self::new()
        }
    }

    #[must_use]
    pub fn config(&self) -> &FfmpegConfig {
        &self.config
    }

    /// All nodes in creation order
    #[must_use]
    pub fn graph(&self) -> &[Node] {
        &self.nodes
    }

    #[must_use]
    pub fn get(&self, node: &NodeRef) -> Option<&Node> {
        if node.owner != self.owner {
            return None;
        }
        self.nodes.get(node.id).filter(|n| n.kind() == node.kind)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of input nodes created so far
    #[must_use]
    pub fn input_count(&self) -> usize {
        self.input_count
    }

    /// Forget every node; the next input gets index 0 again and older handles stop resolving
    pub fn reset(&mut self) {
        self.owner = next_owner();
        self.nodes.clear();
        self.input_count = 0;
    }

    fn add(&mut self, node: Node) -> NodeRef {
        let kind = node.kind();
        let id = self.nodes.len();
        if kind == NodeKind::Input {
            self.input_count += 1;
        }
        trace!("Adding {} #{}", kind, id);
        self.nodes.push(node);
        NodeRef {
            owner: self.owner,
            id,
            kind,
        }
    }

    /// Register an input file
    pub fn input(&mut self, name: impl Into<String>) -> Result<NodeRef> {
        let name = name.into();
        if name.is_empty() {
            return Err(GraphError::MissingArgument(
                "input requires a file name".to_string(),
            ));
        }

        let node = InputNode {
            name,
            index: self.input_count,
        };
        Ok(self.add(Node::Input(node)))
    }

    /// Add a filter step fed by `caller`, or by the filter's explicit inputs when set
    pub fn filter<I, L>(&mut self, caller: I, filter: Filter) -> Result<NodeRef>
    where
        I: IntoIterator<Item = L>,
        L: Into<Link>,
    {
        let caller = self.check_caller(caller, !filter.inputs.is_empty(), "filter")?;

        if filter.name.is_empty() {
            return Err(GraphError::MissingArgument(
                "filter requires a filter name".to_string(),
            ));
        }
        if filter.params.is_empty() {
            return Err(GraphError::MissingArgument(format!(
                "filter '{}' requires at least one parameter",
                filter.name
            )));
        }

        let sources = if filter.inputs.is_empty() {
            caller
        } else {
            filter.inputs
        };
        let inputs = self.resolve_all(&sources)?;
        let output = match filter.output {
            Some(label) => label,
            None => self.labels.generate(),
        };

        let node = FilterNode {
            inputs,
            filter: filter.name,
            params: filter.params,
            output,
        };
        Ok(self.add(Node::Filter(node)))
    }

    /// Add a destination mapping every label derived from `caller`
    pub fn output<I, L>(&mut self, caller: I, name: impl Into<String>) -> Result<NodeRef>
    where
        I: IntoIterator<Item = L>,
        L: Into<Link>,
    {
        let caller = self.check_caller(caller, false, "output")?;

        let name = name.into();
        if name.is_empty() {
            return Err(GraphError::MissingArgument(
                "output requires a file name".to_string(),
            ));
        }

        let inputs = self.resolve_all(&caller)?;
        Ok(self.add(Node::Output(OutputNode { name, inputs })))
    }

    /// Add a free-form filter-graph statement such as `concat`
    pub fn global<I, L>(&mut self, caller: I, expr: GlobalExpr) -> Result<NodeRef>
    where
        I: IntoIterator<Item = L>,
        L: Into<Link>,
    {
        let caller = self.check_caller(caller, !expr.inputs.is_empty(), "global")?;

        let sources = if expr.inputs.is_empty() {
            caller
        } else {
            expr.inputs
        };
        let inputs = self.resolve_all(&sources)?;

        let mut outputs = expr.outputs;
        if outputs.is_empty() {
            outputs = (0..expr.generated_outputs.max(1))
                .map(|_| self.labels.generate())
                .collect();
        }

        let node = GlobalNode {
            inputs,
            outputs,
            args: expr.args,
        };
        Ok(self.add(Node::Global(node)))
    }

    /// Add a command-line flag outside the filter graph
    pub fn option(&mut self, flag: OptionFlag) -> Result<NodeRef> {
        if flag.tag.is_empty() {
            return Err(GraphError::MissingArgument(
                "option requires a tag".to_string(),
            ));
        }

        let outputs = self.resolve_all(&flag.outputs)?;
        let node = OptionNode {
            tag: flag.tag,
            name: flag.value,
            outputs,
        };
        Ok(self.add(Node::Option(node)))
    }

    /// Derive the label a link refers to
    pub fn resolve(&self, link: &Link) -> Result<Label> {
        match link {
            Link::Label(label) => Ok(label.clone()),
            Link::Node(node) => match self.get(node) {
                Some(Node::Filter(filter)) => Ok(filter.output.clone()),
                Some(Node::Input(input)) => Ok(input.label()),
                Some(Node::Global(global)) => global.outputs.first().cloned().ok_or_else(|| {
                    GraphError::UnresolvedLabelSource("a global node without outputs".to_string())
                }),
                Some(other) => Err(GraphError::UnresolvedLabelSource(other.kind().to_string())),
                None => Err(GraphError::UnresolvedLabelSource(format!(
                    "unknown node #{}",
                    node.id
                ))),
            },
            Link::Stream { input, stream } => self.resolve_stream(input, *stream),
        }
    }

    fn resolve_stream(&self, input: &NodeRef, stream: StreamType) -> Result<Label> {
        match self.get(input) {
            Some(Node::Input(node)) => Ok(Label::input_stream(node.index, stream)),
            Some(other) => Err(GraphError::UnresolvedLabelSource(format!(
                "{} (stream selection needs an input node)",
                other.kind()
            ))),
            None => Err(GraphError::UnresolvedLabelSource(format!(
                "unknown node #{}",
                input.id
            ))),
        }
    }

    fn resolve_all(&self, links: &[Link]) -> Result<Vec<Label>> {
        links.iter().map(|link| self.resolve(link)).collect()
    }

    /// Collect the caller and make sure it is something a chain can start from
    fn check_caller<I, L>(
        &self,
        caller: I,
        has_explicit_inputs: bool,
        op: &str,
    ) -> Result<Vec<Link>>
    where
        I: IntoIterator<Item = L>,
        L: Into<Link>,
    {
        let links: Vec<Link> = caller.into_iter().map(Into::into).collect();

        if links.is_empty() && !has_explicit_inputs {
            return Err(GraphError::InvalidCallerType(format!(
                "{op} requires a filter, input, global or label caller"
            )));
        }

        for link in &links {
            let node = match link {
                Link::Label(_) => continue,
                Link::Node(node) | Link::Stream { input: node, .. } => node,
            };
            if self.get(node).is_none() {
                return Err(GraphError::InvalidCallerType(format!(
                    "{op} received node #{} which does not belong to this stream",
                    node.id
                )));
            }
            if link.node_kind() == Some(NodeKind::Output) {
                return Err(GraphError::InvalidCallerType(format!(
                    "{op} cannot be fed by an output node"
                )));
            }
        }

        Ok(links)
    }

    /// Compile the graph rooted at `root` without running it
    pub fn command(&self, root: &NodeRef) -> Result<String> {
        if !matches!(self.get(root), Some(Node::Output(_))) {
            return Err(GraphError::MissingOutputRoot);
        }
        Ok(compiler::compile(&self.nodes, &self.config.program))
    }

    /// Compile and run through a shell, see [`Stream::run_with`]
    pub fn run(&self, root: &NodeRef) -> Result<ProcessOutput> {
        self.run_with(root, &ShellRunner::from(&self.config))
    }

    /// Compile the graph, execute it with `runner` and wait for it to exit.
    ///
    /// A non-zero exit becomes [`GraphError::ExternalProcessFailure`] carrying
    /// both captured streams.
    pub fn run_with<R>(&self, root: &NodeRef, runner: &R) -> Result<ProcessOutput>
    where
        R: ProcessRunner + ?Sized,
    {
        let command = self.command(root)?;
        info!("Running {} ({} nodes)", self.config.program, self.nodes.len());

        let output = runner.execute(&command)?;

        if !output.success {
            warn!(
                "{} failed with status {:?}: {}",
                self.config.program,
                output.code,
                command
            );
            return Err(GraphError::ExternalProcessFailure {
                program: self.config.program.clone(),
                code: output.code,
                stdout: output.stdout_lossy(),
                stderr: output.stderr_lossy(),
            });
        }

        info!("{} finished", self.config.program);
        Ok(output)
    }
}

impl Default for Stream {
    fn default() -> Self {
        Self::new()
    }
}
