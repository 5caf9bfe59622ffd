//! spyglass: scroll-spy section navigation for long-form articles.
//!
//! Articles are markdown files split into sections at a chosen heading level. A
//! [`navigator::SectionNavigator`] keeps track of which section is active, fed by the
//! [`viewport::Viewport`] as the reader scrolls and updated immediately when they jump to a
//! section from the topic navigation.
#![allow(clippy::multiple_crate_versions)]

pub mod app_state;
pub mod config;
pub mod error;
pub mod formats;
pub mod input;
pub mod logging;
pub mod navigator;
pub mod section;
pub mod ui;
pub mod viewport;
