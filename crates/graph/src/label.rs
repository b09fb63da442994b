//! Labels connect the output of one node to the input of another.
//!
//! A label is plain text compared by value: two nodes that mention the same
//! label text refer to the same pad of the filter graph. Explicit labels come
//! from the caller, the rest are generated by [`LabelGenerator`].

use crate::node::{NodeKind, NodeRef};
use ffchain_common::StreamType;
use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Characters auto-generated labels are drawn from
const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Length of an auto-generated label
pub const LABEL_LENGTH: usize = 5;

/// Named connection point between nodes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Stream reference of an input node, e.g. `0:v`
    #[must_use]
    pub fn input_stream(index: usize, stream: StreamType) -> Self {
        Self(format!("{index}:{}", stream.specifier()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Label text as it appears inside a filter graph: `[text]`
    #[must_use]
    pub fn bracketed(&self) -> String {
        format!("[{}]", self.0)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Label {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Label {
    fn from(text: String) -> Self {
        Self(text)
    }
}

/// Concatenate bracketed labels: `[a][b]`
pub(crate) fn bracket_all(labels: &[Label]) -> String {
    labels.iter().map(Label::bracketed).collect()
}

/// Produces unique-looking labels of [`LABEL_LENGTH`] distinct letters
#[derive(Debug, Clone)]
pub struct LabelGenerator {
    rng: StdRng,
}

impl LabelGenerator {
    /// Generator seeded from the thread RNG
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Deterministic generator, for reproducible commands in tests
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draw a label; letters are sampled without replacement
    pub fn generate(&mut self) -> Label {
        let text: String = index::sample(&mut self.rng, ALPHABET.len(), LABEL_LENGTH)
            .iter()
            .map(|i| char::from(ALPHABET[i]))
            .collect();
        Label(text)
    }
}

impl Default for LabelGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Anything a builder call accepts as a caller or an input.
///
/// Resolved to a [`Label`] by `Stream::resolve`:
/// - `Label` is used as-is
/// - `Node` of a filter yields its output label, of an input yields `<index>:v`,
///   of a global yields its first output
/// - `Stream` selects a specific stream of an input node (`<index>:a`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Link {
    Label(Label),
    Node(NodeRef),
    Stream { input: NodeRef, stream: StreamType },
}

impl Link {
    /// Select one stream type of an input node
    #[must_use]
    pub fn stream(input: NodeRef, stream: StreamType) -> Self {
        Link::Stream { input, stream }
    }

    pub(crate) fn node_kind(&self) -> Option<NodeKind> {
        match self {
            Link::Label(_) => None,
            Link::Node(node) | Link::Stream { input: node, .. } => Some(node.kind()),
        }
    }
}

impl From<Label> for Link {
    fn from(label: Label) -> Self {
        Link::Label(label)
    }
}

impl From<&Label> for Link {
    fn from(label: &Label) -> Self {
        Link::Label(label.clone())
    }
}

impl From<&str> for Link {
    fn from(text: &str) -> Self {
        Link::Label(Label::new(text))
    }
}

impl From<String> for Link {
    fn from(text: String) -> Self {
        Link::Label(Label(text))
    }
}

impl From<NodeRef> for Link {
    fn from(node: NodeRef) -> Self {
        Link::Node(node)
    }
}

impl From<&NodeRef> for Link {
    fn from(node: &NodeRef) -> Self {
        Link::Node(*node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_bracketed() {
        assert_eq!(Label::new("v1").bracketed(), "[v1]");
        assert_eq!(
            bracket_all(&[Label::new("0:v"), Label::new("0:a")]),
            "[0:v][0:a]"
        );
    }

    #[test]
    fn test_input_stream_label() {
        assert_eq!(Label::input_stream(0, StreamType::Video).as_str(), "0:v");
        assert_eq!(Label::input_stream(3, StreamType::Audio).as_str(), "3:a");
    }

    #[test]
    fn test_generated_label_shape() {
        let mut generator = LabelGenerator::new();
        for _ in 0..100 {
            let label = generator.generate();
            assert_eq!(label.as_str().len(), LABEL_LENGTH);
            assert!(label.as_str().chars().all(|c| c.is_ascii_alphabetic()));

            let distinct: HashSet<char> = label.as_str().chars().collect();
            assert_eq!(distinct.len(), LABEL_LENGTH, "letters repeat in {label}");
        }
    }

    #[test]
    fn test_seeded_generator_is_reproducible() {
        let mut a = LabelGenerator::seeded(7);
        let mut b = LabelGenerator::seeded(7);
        for _ in 0..10 {
            assert_eq!(a.generate(), b.generate());
        }
    }

    #[test]
    fn test_link_from_text() {
        assert_eq!(Link::from("0:v"), Link::Label(Label::new("0:v")));
        assert_eq!(Link::from("0:v").node_kind(), None);
    }
}
