//! Section representation for long-form articles.
//!
//! A section is a named, addressable region of a page, typically corresponding to a heading in
//! markdown. The navigator only ever looks at a section's id; labels and display metadata are
//! carried along untouched for the render layer. Articles bundle the sections of one page with
//! the static text that fills them.

use crate::error::NavigatorError;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
/// Presentation-only attachment for a section, never interpreted by the navigator.
pub struct DisplayMeta {
    /// Symbol shown before the label in the topic navigation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Colour name understood by the render layer (e.g. `"cyan"` or `"#ffaa00"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// Immutable descriptor of one section on a page.
pub struct Section {
    /// Anchor identity of the section's region, unique within a page.
    pub id: String,
    /// Text shown for the section in the topic navigation.
    pub display_label: String,
    /// Optional icon and colour.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_meta: Option<DisplayMeta>,
}

impl Section {
    #[must_use]
    /// Creates a section without display metadata.
    pub fn new(id: impl Into<String>, display_label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_label: display_label.into(),
            display_meta: None,
        }
    }

    #[must_use]
    /// Attaches display metadata.
    pub fn with_meta(mut self, meta: DisplayMeta) -> Self {
        self.display_meta = Some(meta);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Ordered sections of one page: never empty, ids unique.
pub struct SectionList {
    sections: Vec<Section>,
}

impl SectionList {
    /// Validates and wraps the sections of a page.
    ///
    /// # Errors
    ///
    /// Returns [`NavigatorError::EmptySectionList`] for an empty list and
    /// [`NavigatorError::DuplicateSectionId`] naming the first id that appears twice.
    pub fn new(sections: Vec<Section>) -> Result<Self, NavigatorError> {
        if sections.is_empty() {
            return Err(NavigatorError::EmptySectionList);
        }

        let mut seen = HashSet::new();
        for section in &sections {
            if !seen.insert(section.id.as_str()) {
                return Err(NavigatorError::DuplicateSectionId {
                    id: section.id.clone(),
                });
            }
        }

        Ok(Self { sections })
    }

    #[must_use]
    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    #[must_use]
    /// Always false; a list is validated as non-empty on construction.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    #[must_use]
    /// The section at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    #[must_use]
    /// Position of the section with `id`.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.id == id)
    }

    #[must_use]
    /// Whether a section with `id` is part of the list.
    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Iterates the sections in page order.
    pub fn iter(&self) -> std::slice::Iter<'_, Section> {
        self.sections.iter()
    }

    #[must_use]
    /// Borrows the sections as a slice.
    pub fn as_slice(&self) -> &[Section] {
        &self.sections
    }
}

impl<'a> IntoIterator for &'a SectionList {
    type Item = &'a Section;
    type IntoIter = std::slice::Iter<'a, Section>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.iter()
    }
}

impl TryFrom<Vec<Section>> for SectionList {
    type Error = NavigatorError;

    fn try_from(sections: Vec<Section>) -> Result<Self, Self::Error> {
        Self::new(sections)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A block of section body text, as parsed from the article source.
pub enum BodyBlock {
    /// Running text with soft line breaks collapsed.
    Paragraph(String),
    /// A heading below the section level.
    Heading(String),
    /// A quoted paragraph, such as a cited verse.
    Quote(String),
    /// One list entry.
    ListItem {
        /// Marker to draw: a bullet, or the number as written.
        marker: String,
        /// Entry text.
        text: String,
    },
    /// Preformatted text, one string with its original line breaks.
    Code(String),
    /// A horizontal rule.
    Rule,
}

#[derive(Clone, Debug)]
/// One section of an article together with its static content.
pub struct ArticleSection {
    /// Descriptor handed to the navigator and the topic navigation.
    pub section: Section,
    /// Markdown body between this heading and the next one at the same or a higher level.
    pub body: String,
    /// The body parsed into renderable blocks.
    pub blocks: Vec<BodyBlock>,
    /// Zero-based line of the heading in the source file.
    pub source_line: usize,
}

#[derive(Clone, Debug)]
/// A topic page: a title, an optional lede, and its sections in reading order.
pub struct Article {
    /// File the article was read from.
    pub path: PathBuf,
    /// Page title shown in the header.
    pub title: String,
    /// Text between the title and the first section.
    pub preamble: String,
    /// Sections in reading order.
    pub sections: Vec<ArticleSection>,
}

impl Article {
    #[must_use]
    /// Section descriptors in page order, ready for navigator initialisation.
    pub fn descriptors(&self) -> Vec<Section> {
        self.sections.iter().map(|s| s.section.clone()).collect()
    }

    #[must_use]
    /// Serialisable outline of the page.
    pub fn outline(&self) -> PageOutline<'_> {
        PageOutline {
            path: &self.path,
            title: &self.title,
            sections: self.sections.iter().map(|s| &s.section).collect(),
        }
    }
}

#[derive(Serialize)]
/// The structure of one page as exposed by `--outline`.
pub struct PageOutline<'a> {
    /// Source file of the page.
    pub path: &'a Path,
    /// Page title.
    pub title: &'a str,
    /// Section descriptors in page order.
    pub sections: Vec<&'a Section>,
}

#[cfg(test)]
#[path = "tests/section.rs"]
mod tests;
