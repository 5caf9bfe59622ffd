//! Markdown format implementation using tree-sitter-md.
//!
//! This module provides tree-sitter queries for parsing markdown articles and extracting
//! section structure from ATX-style headings (# syntax), plus the block grammar's node kinds
//! needed to render section bodies.

use crate::formats::{Format, NodeRole};

/// Tree-sitter queries for ATX-style markdown headings (# syntax).
pub struct MarkdownFormat;

impl Format for MarkdownFormat {
    fn language(&self) -> tree_sitter::Language {
        tree_sitter_md::LANGUAGE.into()
    }

    fn heading_query(&self) -> &'static str {
        "(atx_heading) @heading"
    }

    fn heading_level(&self, marker_kind: &str) -> Option<usize> {
        match marker_kind {
            "atx_h1_marker" => Some(1),
            "atx_h2_marker" => Some(2),
            "atx_h3_marker" => Some(3),
            "atx_h4_marker" => Some(4),
            "atx_h5_marker" => Some(5),
            "atx_h6_marker" => Some(6),
            _ => None,
        }
    }

    fn title_kind(&self) -> &'static str {
        "inline"
    }

    fn node_role(&self, kind: &str) -> Option<NodeRole> {
        let role = match kind {
            "atx_heading" | "setext_heading" => NodeRole::Heading,
            "paragraph" => NodeRole::Paragraph,
            "block_quote" => NodeRole::Quote,
            "list_item" => NodeRole::ListItem,
            "list_marker_minus" | "list_marker_plus" | "list_marker_star" => {
                NodeRole::BulletMarker
            }
            "list_marker_dot" | "list_marker_parenthesis" => NodeRole::OrderedMarker,
            "fenced_code_block" | "indented_code_block" | "html_block" | "pipe_table" => {
                NodeRole::Code
            }
            "code_fence_content" => NodeRole::CodeContent,
            "thematic_break" => NodeRole::Rule,
            "block_continuation"
            | "block_quote_marker"
            | "fenced_code_block_delimiter"
            | "info_string"
            | "language"
            | "setext_h1_underline"
            | "setext_h2_underline"
            | "link_reference_definition" => NodeRole::Markup,
            _ => return None,
        };
        Some(role)
    }
}
