//! Discovery of article files and their conversion into navigable pages.
//!
//! Headings are located with the format's tree-sitter query rather than by scanning lines, so
//! fenced code containing `#` is never mistaken for a section. The first level-1 heading titles
//! the page, headings at the section level open sections, and anything deeper stays inside the
//! body of the section that contains it. Section bodies are read with the same grammar into
//! blocks, taking text from node byte ranges with continuation markup cut out.

use crate::config::Config;
use crate::error::InputError;
use crate::formats::{Format, NodeRole};
use crate::section::{Article, ArticleSection, BodyBlock, DisplayMeta, Section};
use std::collections::HashSet;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::{fs, io};
use streaming_iterator::StreamingIterator;
use tracing::{debug, warn};
use tree_sitter::{Node, Parser, Query, QueryCursor};

/// Heading located in a parsed document.
struct Heading {
    level: usize,
    title: String,
    start_byte: usize,
    end_byte: usize,
    line: usize,
}

/// Expands the given paths into article files, scanning directories recursively.
///
/// An empty path list scans the working directory. Hidden entries are skipped inside
/// directories, and the result is sorted and deduplicated.
///
/// # Errors
///
/// Returns an error if a path cannot be read.
pub fn find_documents(paths: Vec<PathBuf>, extensions: &[String]) -> io::Result<Vec<PathBuf>> {
    let roots = if paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        paths
    };

    let mut documents = Vec::new();
    for root in roots {
        if root.is_dir() {
            collect_dir(&root, extensions, &mut documents)?;
        } else if root.is_file() {
            documents.push(root);
        } else {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} does not exist", root.display()),
            ));
        }
    }

    documents.sort();
    documents.dedup();
    Ok(documents)
}

fn collect_dir(dir: &Path, extensions: &[String], out: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let hidden = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with('.'));
        if hidden {
            continue;
        }

        if path.is_dir() {
            collect_dir(&path, extensions, out)?;
        } else if has_extension(&path, extensions) {
            out.push(path);
        }
    }
    Ok(())
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|wanted| wanted == ext))
}

/// Reads and parses every document, skipping the ones that fail with a warning.
pub fn load_articles<F: Format>(documents: &[PathBuf], format: &F, cfg: &Config) -> Vec<Article> {
    documents
        .iter()
        .filter_map(
            |doc| match extract_article(doc, format, cfg.section_level, &cfg.palette) {
                Ok(article) => Some(article),
                Err(e) => {
                    warn!(path = %doc.display(), error = %e, "skipping document");
                    None
                }
            },
        )
        .collect()
}

/// Reads `path` and parses it into an article.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsing fails.
pub fn extract_article<F: Format>(
    path: &Path,
    format: &F,
    section_level: usize,
    palette: &[String],
) -> Result<Article, InputError> {
    let source = fs::read_to_string(path)?;
    parse_article(&source, path, format, section_level, palette)
}

/// Splits a document into a title, a preamble and sections at `section_level`.
///
/// # Errors
///
/// Returns an error if the grammar or query cannot be loaded, the document does not parse, or
/// it has no headings at `section_level`.
pub fn parse_article<F: Format>(
    source: &str,
    path: &Path,
    format: &F,
    section_level: usize,
    palette: &[String],
) -> Result<Article, InputError> {
    let mut parser = parser_for(format)?;
    let headings = find_headings(&mut parser, source, path, format)?;

    let title_heading = headings.iter().find(|h| h.level == 1);
    let title = title_heading.map_or_else(
        || {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().to_string())
                .unwrap_or_default()
        },
        |h| h.title.clone(),
    );

    let openers: Vec<usize> = headings
        .iter()
        .enumerate()
        .filter(|(_, h)| h.level == section_level)
        .map(|(i, _)| i)
        .collect();

    let Some(&first_opener) = openers.first() else {
        return Err(InputError::NoSections {
            path: path.to_path_buf(),
            level: section_level,
        });
    };

    let preamble_start = title_heading
        .filter(|h| h.start_byte < headings[first_opener].start_byte)
        .map_or(0, |h| h.end_byte);
    let preamble = source[preamble_start..headings[first_opener].start_byte]
        .trim()
        .to_string();

    let mut used_ids = HashSet::new();
    let mut sections = Vec::with_capacity(openers.len());

    for (position, &index) in openers.iter().enumerate() {
        let heading = &headings[index];
        let body_end = headings[index + 1..]
            .iter()
            .find(|h| h.level <= section_level)
            .map_or(source.len(), |h| h.start_byte);

        let (icon, label) = split_icon(&heading.title);
        let id = unique_id(&slugify(&label), &mut used_ids);
        let color = (!palette.is_empty()).then(|| palette[position % palette.len()].clone());

        let mut section = Section::new(id, label);
        if icon.is_some() || color.is_some() {
            section = section.with_meta(DisplayMeta { icon, color });
        }

        let body = source[heading.end_byte..body_end].trim().to_string();
        let blocks = body_blocks(&mut parser, &body, path, format)?;
        sections.push(ArticleSection {
            section,
            body,
            blocks,
            source_line: heading.line,
        });
    }

    debug!(path = %path.display(), sections = sections.len(), "parsed article");

    Ok(Article {
        path: path.to_path_buf(),
        title,
        preamble,
        sections,
    })
}

fn parser_for<F: Format>(format: &F) -> Result<Parser, InputError> {
    let mut parser = Parser::new();
    parser
        .set_language(&format.language())
        .map_err(|e| InputError::Grammar(e.to_string()))?;
    Ok(parser)
}

fn find_headings<F: Format>(
    parser: &mut Parser,
    source: &str,
    path: &Path,
    format: &F,
) -> Result<Vec<Heading>, InputError> {
    let tree = parser.parse(source, None).ok_or_else(|| InputError::Parse {
        path: path.to_path_buf(),
    })?;

    let query = Query::new(&format.language(), format.heading_query())
        .map_err(|e| InputError::Query(e.to_string()))?;
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, tree.root_node(), source.as_bytes());

    let mut headings = Vec::new();
    while let Some(m) = matches.next() {
        for capture in m.captures {
            if let Some(heading) = read_heading(capture.node, source, format) {
                headings.push(heading);
            }
        }
    }

    headings.sort_by_key(|h| h.start_byte);
    Ok(headings)
}

fn read_heading<F: Format>(node: Node, source: &str, format: &F) -> Option<Heading> {
    let mut level = None;
    let mut title = None;

    let mut walker = node.walk();
    for child in node.children(&mut walker) {
        if let Some(found) = format.heading_level(child.kind()) {
            level = Some(found);
        } else if child.kind() == format.title_kind() {
            title = child.utf8_text(source.as_bytes()).ok();
        }
    }

    Some(Heading {
        level: level?,
        title: title.unwrap_or_default().trim().to_string(),
        start_byte: node.start_byte(),
        end_byte: node.end_byte(),
        line: node.start_position().row,
    })
}

/// Parses section body text into renderable blocks.
///
/// # Errors
///
/// Returns an error if the grammar cannot be loaded or the text does not parse.
pub fn parse_blocks<F: Format>(
    source: &str,
    path: &Path,
    format: &F,
) -> Result<Vec<BodyBlock>, InputError> {
    let mut parser = parser_for(format)?;
    body_blocks(&mut parser, source, path, format)
}

fn body_blocks<F: Format>(
    parser: &mut Parser,
    source: &str,
    path: &Path,
    format: &F,
) -> Result<Vec<BodyBlock>, InputError> {
    let tree = parser.parse(source, None).ok_or_else(|| InputError::Parse {
        path: path.to_path_buf(),
    })?;
    let root = tree.root_node();

    let mut markup = Vec::new();
    collect_markup(root, format, &mut markup);
    markup.sort_by_key(|range| range.start);

    let mut walker = BlockWalker {
        source,
        format,
        markup: &markup,
        blocks: Vec::new(),
    };
    walker.visit(root, false, &mut None);
    Ok(walker.blocks)
}

fn collect_markup<F: Format>(node: Node, format: &F, out: &mut Vec<Range<usize>>) {
    if format.node_role(node.kind()) == Some(NodeRole::Markup) {
        out.push(node.byte_range());
        return;
    }
    let mut walker = node.walk();
    for child in node.children(&mut walker) {
        collect_markup(child, format, out);
    }
}

fn find_child<'t, F: Format>(node: Node<'t>, format: &F, wanted: &str) -> Option<Node<'t>> {
    let mut walker = node.walk();
    let children: Vec<Node<'t>> = node.children(&mut walker).collect();
    children.into_iter().find_map(|child| {
        if child.kind() == wanted {
            Some(child)
        } else if format.node_role(child.kind()) == Some(NodeRole::Markup) {
            None
        } else {
            find_child(child, format, wanted)
        }
    })
}

fn find_role<'t, F: Format>(node: Node<'t>, format: &F, role: NodeRole) -> Option<Node<'t>> {
    let mut walker = node.walk();
    let children: Vec<Node<'t>> = node.children(&mut walker).collect();
    children
        .into_iter()
        .find(|child| format.node_role(child.kind()) == Some(role))
}

/// Turns block-level nodes into [`BodyBlock`]s in document order.
struct BlockWalker<'a, F> {
    source: &'a str,
    format: &'a F,
    markup: &'a [Range<usize>],
    blocks: Vec<BodyBlock>,
}

impl<F: Format> BlockWalker<'_, F> {
    /// `marker` is the list marker still waiting for the first paragraph of its item.
    fn visit(&mut self, node: Node, quoted: bool, marker: &mut Option<String>) {
        match self.format.node_role(node.kind()) {
            Some(NodeRole::Heading) => {
                let text = find_child(node, self.format, self.format.title_kind())
                    .map(|title| collapse(&self.text(title.byte_range())))
                    .unwrap_or_default();
                self.blocks.push(BodyBlock::Heading(text));
            }
            Some(NodeRole::Paragraph) => {
                let text = collapse(&self.text(node.byte_range()));
                let block = match marker.take() {
                    Some(marker) => BodyBlock::ListItem { marker, text },
                    None if quoted => BodyBlock::Quote(text),
                    None => BodyBlock::Paragraph(text),
                };
                self.blocks.push(block);
            }
            Some(NodeRole::Quote) => self.visit_children(node, true, marker),
            Some(NodeRole::ListItem) => {
                let start = self.blocks.len();
                let mut item_marker = Some(self.list_marker(node));
                self.visit_children(node, quoted, &mut item_marker);
                // An item opening with something other than text still shows its marker.
                if let Some(marker) = item_marker {
                    self.blocks.insert(
                        start,
                        BodyBlock::ListItem {
                            marker,
                            text: String::new(),
                        },
                    );
                }
            }
            Some(NodeRole::Code) => {
                let text = match find_role(node, self.format, NodeRole::CodeContent) {
                    Some(content) => self.text(content.byte_range()),
                    None => dedent(&self.text(node.byte_range())),
                };
                self.blocks
                    .push(BodyBlock::Code(text.trim_end_matches('\n').to_string()));
            }
            Some(NodeRole::Rule) => self.blocks.push(BodyBlock::Rule),
            Some(
                NodeRole::Markup
                | NodeRole::BulletMarker
                | NodeRole::OrderedMarker
                | NodeRole::CodeContent,
            ) => {}
            None => self.visit_children(node, quoted, marker),
        }
    }

    fn visit_children(&mut self, node: Node, quoted: bool, marker: &mut Option<String>) {
        let mut walker = node.walk();
        let children: Vec<Node> = node.children(&mut walker).collect();
        for child in children {
            self.visit(child, quoted, marker);
        }
    }

    fn list_marker(&self, item: Node) -> String {
        let mut walker = item.walk();
        let children: Vec<Node> = item.children(&mut walker).collect();
        for child in children {
            match self.format.node_role(child.kind()) {
                Some(NodeRole::BulletMarker) => return "•".to_string(),
                Some(NodeRole::OrderedMarker) => {
                    return self.source[child.byte_range()].trim().to_string();
                }
                _ => {}
            }
        }
        "•".to_string()
    }

    /// Source text of `range` with every markup range cut out.
    fn text(&self, range: Range<usize>) -> String {
        let mut out = String::with_capacity(range.len());
        let mut cursor = range.start;
        for skip in self
            .markup
            .iter()
            .filter(|m| m.end > range.start && m.start < range.end)
        {
            if skip.start > cursor {
                out.push_str(&self.source[cursor..skip.start]);
            }
            cursor = cursor.max(skip.end);
        }
        if cursor < range.end {
            out.push_str(&self.source[cursor..range.end]);
        }
        out
    }
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Removes the indentation shared by every non-blank line.
fn dedent(text: &str) -> String {
    let indent = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);
    text.lines()
        .map(|line| line.get(indent..).unwrap_or_else(|| line.trim_start()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Splits a leading symbol token such as an emoji off a heading, returning `(icon, label)`.
#[must_use]
pub fn split_icon(title: &str) -> (Option<String>, String) {
    let trimmed = title.trim();
    if let Some((first, rest)) = trimmed.split_once(char::is_whitespace) {
        let rest = rest.trim_start();
        if !rest.is_empty() && !first.chars().any(char::is_alphanumeric) {
            return (Some(first.to_string()), rest.to_string());
        }
    }
    (None, trimmed.to_string())
}

/// Turns a heading into an anchor id: lowercase alphanumerics joined by single dashes.
#[must_use]
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut gap = false;

    for ch in title.chars() {
        if ch.is_alphanumeric() {
            if gap && !slug.is_empty() {
                slug.push('-');
            }
            gap = false;
            slug.extend(ch.to_lowercase());
        } else {
            gap = true;
        }
    }

    if slug.is_empty() {
        "section".to_string()
    } else {
        slug
    }
}

fn unique_id(slug: &str, used: &mut HashSet<String>) -> String {
    let mut candidate = slug.to_string();
    let mut n = 0;
    while used.contains(&candidate) {
        n += 1;
        candidate = format!("{slug}-{n}");
    }
    used.insert(candidate.clone());
    candidate
}

#[cfg(test)]
#[path = "tests/input.rs"]
mod tests;
