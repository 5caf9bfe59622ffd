//! Format trait and implementations for different article sources.
//!
//! This module defines the `Format` trait which abstracts over document formats by providing
//! the tree-sitter grammar, the query that finds headings, how a heading's level and title are
//! read from its child nodes, and what each block-level node contributes to a rendered body.

pub mod markdown;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// What a block-level syntax node means for the rendered body of a section.
pub enum NodeRole {
    /// A heading nested inside a section body.
    Heading,
    /// Running text.
    Paragraph,
    /// Container whose paragraphs are quoted.
    Quote,
    /// Container for one list entry.
    ListItem,
    /// Unordered list marker, drawn as a bullet.
    BulletMarker,
    /// Ordered list marker, drawn as written.
    OrderedMarker,
    /// Preformatted block whose lines are kept verbatim.
    Code,
    /// The text inside a [`NodeRole::Code`] block, without its fences.
    CodeContent,
    /// A horizontal rule.
    Rule,
    /// Syntax that is never shown, such as quote continuations and fence delimiters.
    Markup,
}

/// Tree-sitter description of where headings live in a document format.
pub trait Format {
    /// Grammar used to parse documents of this format.
    fn language(&self) -> tree_sitter::Language;
    /// Query capturing every heading node.
    fn heading_query(&self) -> &str;
    /// Heading level signalled by a marker child node kind, if it is one.
    fn heading_level(&self, marker_kind: &str) -> Option<usize>;
    /// Node kind of the heading child holding the title text.
    fn title_kind(&self) -> &str;
    /// Role of a block-level node kind; `None` for structure that only groups other nodes.
    fn node_role(&self, kind: &str) -> Option<NodeRole>;
}
