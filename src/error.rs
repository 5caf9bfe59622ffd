//! Error types for navigator configuration and article loading.
//!
//! Runtime navigation never fails: unknown ids and missing regions are tolerated. The only
//! errors are programmer mistakes caught when a navigator is set up, and I/O or parsing
//! problems while reading articles from disk.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
/// Rejected navigator configuration.
pub enum NavigatorError {
    /// A page must have at least one section to navigate.
    #[error("section list is empty")]
    EmptySectionList,
    /// Two sections on the same page share an id.
    #[error("duplicate section id '{id}'")]
    DuplicateSectionId {
        /// The repeated id.
        id: String,
    },
    /// The visibility threshold is not a fraction in `[0, 1]`.
    #[error("visibility threshold {threshold} is outside [0, 1]")]
    InvalidThreshold {
        /// The rejected threshold.
        threshold: f64,
    },
    /// The requested default section is not part of the list.
    #[error("default section '{id}' is not in the section list")]
    UnknownDefault {
        /// The rejected default id.
        id: String,
    },
}

#[derive(Error, Debug)]
/// Failure to turn a file on disk into an article.
pub enum InputError {
    /// Reading the file failed.
    #[error("io: {0}")]
    Io(#[from] io::Error),
    /// The tree-sitter grammar could not be loaded into the parser.
    #[error("grammar: {0}")]
    Grammar(String),
    /// The heading query did not compile against the grammar.
    #[error("query: {0}")]
    Query(String),
    /// The parser produced no tree for the document.
    #[error("could not parse '{}'", path.display())]
    Parse {
        /// Document that failed to parse.
        path: PathBuf,
    },
    /// The document has no headings at the section level.
    #[error("no level {level} headings in '{}'", path.display())]
    NoSections {
        /// Document without sections.
        path: PathBuf,
        /// Heading level that was searched for.
        level: usize,
    },
}

impl From<NavigatorError> for io::Error {
    fn from(err: NavigatorError) -> Self {
        Self::new(io::ErrorKind::InvalidInput, err)
    }
}

impl From<InputError> for io::Error {
    fn from(err: InputError) -> Self {
        match err {
            InputError::Io(e) => e,
            other => Self::new(io::ErrorKind::InvalidData, other),
        }
    }
}
