//! The core state machine bridging article pages, the viewport and the section navigator.
//!
//! A TUI needs a single source of truth that can be interrogated and mutated as the reader
//! scrolls and jumps around. The app state owns the loaded pages, the viewport the current page
//! is laid out in, and the navigator for that page. Opening a page always tears the previous
//! navigator down before a fresh one is initialised, so no active-section state leaks between
//! pages.

use crate::config::Config;
use crate::error::NavigatorError;
use crate::navigator::{NavigatorOptions, SectionNavigator};
use crate::section::Article;
use crate::viewport::Viewport;
use tracing::{debug, info};

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
/// Determines whether a page list exists and what quitting does.
pub enum FileMode {
    /// Single-page mode quits directly to shell.
    Single,
    /// Multi-page mode returns to the page list before quitting.
    Multi,
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
/// Determines which UI screen renders and how input is interpreted.
pub enum View {
    /// Lists the loaded pages.
    PageList,
    /// Shows one article with its topic navigation.
    Article,
}

/// Bridges pages, viewport and navigator, maintaining session state.
pub struct AppState {
    /// All loaded pages.
    pub pages: Vec<Article>,
    /// Selected page in the page list, and the open page in the article view.
    pub current_page_index: usize,
    /// Controls page list visibility and quit behaviour.
    pub file_mode: FileMode,
    /// Active UI screen determining input handling.
    pub current_view: View,
    /// Layout and scroll state of the open page.
    pub viewport: Viewport,
    /// Active-section state of the open page; `None` while no page is open.
    pub navigator: Option<SectionNavigator>,
    /// Entry in the topic navigation selected with the keyboard.
    pub nav_focus: usize,
    /// Status feedback displayed in the footer.
    pub message: Option<String>,
    /// Visibility threshold given to each navigator.
    pub threshold: f64,
    /// Maximum column width of article text.
    pub wrap_width: usize,
}

impl AppState {
    #[must_use]
    /// Initialises application state with the loaded pages and determines file mode.
    ///
    /// Single-page sessions skip the page list, while multi-page sessions start on it. No page
    /// is open until [`open_page`](Self::open_page) is called.
    pub fn new(pages: Vec<Article>, cfg: &Config) -> Self {
        let file_mode = if pages.len() == 1 {
            FileMode::Single
        } else {
            FileMode::Multi
        };

        Self {
            pages,
            current_page_index: 0,
            file_mode,
            current_view: View::PageList,
            viewport: Viewport::new(cfg.scroll_easing),
            navigator: None,
            nav_focus: 0,
            message: None,
            threshold: cfg.threshold,
            wrap_width: cfg.wrap_width,
        }
    }

    /// Mounts the page at `index`: tears down the previous navigator, lays the article out and
    /// initialises a navigator over its regions.
    ///
    /// # Errors
    ///
    /// Returns an error if the page's sections do not form a valid navigator configuration.
    pub fn open_page(&mut self, index: usize) -> Result<(), NavigatorError> {
        let Some(article) = self.pages.get(index) else {
            return Ok(());
        };

        if let Some(mut previous) = self.navigator.take() {
            previous.teardown(&mut self.viewport);
        }

        let width = match self.viewport.width() {
            0 => self.wrap_width,
            w => w.min(self.wrap_width),
        };
        self.viewport.layout(article, width);
        self.viewport.scroll_to_top();

        let navigator = SectionNavigator::initialize(
            article.descriptors(),
            NavigatorOptions::new(self.threshold),
            &mut self.viewport,
        )?;

        info!(page = %article.title, sections = article.sections.len(), "opened page");

        self.navigator = Some(navigator);
        self.current_page_index = index;
        self.current_view = View::Article;
        self.nav_focus = 0;
        self.message = None;
        self.sync_visibility();
        Ok(())
    }

    /// Unmounts the open page and returns to the page list.
    pub fn close_page(&mut self) {
        if let Some(mut navigator) = self.navigator.take() {
            navigator.teardown(&mut self.viewport);
        }
        self.current_view = View::PageList;
        self.message = None;
        debug!("closed page");
    }

    #[must_use]
    /// The page shown in the article view.
    pub fn current_page(&self) -> Option<&Article> {
        if self.current_view == View::Article {
            self.pages.get(self.current_page_index)
        } else {
            None
        }
    }

    #[must_use]
    /// Id of the active section of the open page.
    pub fn active_section_id(&self) -> Option<&str> {
        self.navigator.as_ref().map(SectionNavigator::active_id)
    }

    /// Re-lays the open page out for a new text width, capped at the configured wrap width.
    pub fn relayout(&mut self, width: usize) {
        let width = width.min(self.wrap_width).max(1);
        if self.current_view != View::Article || width == self.viewport.width() {
            return;
        }
        if let Some(article) = self.pages.get(self.current_page_index) {
            self.viewport.layout(article, width);
            self.sync_visibility();
        }
    }

    /// Updates the number of article rows on screen.
    pub fn set_viewport_height(&mut self, height: usize) {
        if height != self.viewport.height() {
            self.viewport.set_height(height);
            self.sync_visibility();
        }
    }

    /// Feeds pending visibility reports from the viewport to the navigator.
    pub fn sync_visibility(&mut self) {
        let events = self.viewport.poll_visibility();
        if let Some(navigator) = self.navigator.as_mut() {
            navigator.on_visibility_batch(&events);
        }
    }

    /// Advances scroll animation by one frame. Returns whether it is still running.
    pub fn tick(&mut self) -> bool {
        if !self.viewport.is_animating() {
            return false;
        }
        let animating = self.viewport.tick();
        self.sync_visibility();
        animating
    }

    /// Jumps to the section `id`, highlighting it at once.
    pub fn go_to_section(&mut self, id: &str) {
        if let Some(navigator) = self.navigator.as_mut() {
            navigator.go_to_section(id, &mut self.viewport);
            self.nav_focus = navigator.active_index();
        }
    }

    /// Jumps to the section after the active one.
    pub fn go_to_next_section(&mut self) {
        let next = self
            .navigator
            .as_ref()
            .and_then(SectionNavigator::next_section_id)
            .map(ToString::to_string);
        match next {
            Some(id) => self.go_to_section(&id),
            None => self.message = Some("Last section".to_string()),
        }
    }

    /// Jumps to the section before the active one.
    pub fn go_to_previous_section(&mut self) {
        let previous = self
            .navigator
            .as_ref()
            .and_then(SectionNavigator::previous_section_id)
            .map(ToString::to_string);
        match previous {
            Some(id) => self.go_to_section(&id),
            None => self.message = Some("First section".to_string()),
        }
    }

    /// Jumps to the `number`th section, counting from 1.
    pub fn go_to_section_number(&mut self, number: usize) {
        let id = self.navigator.as_ref().and_then(|navigator| {
            number
                .checked_sub(1)
                .and_then(|index| navigator.sections().get(index))
                .map(|section| section.id.clone())
        });
        match id {
            Some(id) => self.go_to_section(&id),
            None => self.message = Some(format!("No section {number}")),
        }
    }

    /// Moves keyboard focus in the topic navigation down one entry.
    pub fn focus_next(&mut self) {
        let count = self.section_count();
        if self.nav_focus + 1 < count {
            self.nav_focus += 1;
        }
    }

    /// Moves keyboard focus in the topic navigation up one entry.
    pub fn focus_previous(&mut self) {
        self.nav_focus = self.nav_focus.saturating_sub(1);
    }

    /// Jumps to the focused topic navigation entry.
    pub fn go_to_focused(&mut self) {
        self.go_to_section_number(self.nav_focus + 1);
    }

    #[must_use]
    /// Sections on the open page.
    pub fn section_count(&self) -> usize {
        self.navigator.as_ref().map_or(0, |n| n.sections().len())
    }

    /// Scrolls the article by `delta` lines.
    pub fn scroll_lines(&mut self, delta: isize) {
        self.viewport.scroll_by(delta);
        self.sync_visibility();
    }

    /// Scrolls the article down one screen.
    pub fn page_down(&mut self) {
        self.viewport.page_down();
        self.sync_visibility();
    }

    /// Scrolls the article up one screen.
    pub fn page_up(&mut self) {
        self.viewport.page_up();
        self.sync_visibility();
    }

    /// Scrolls to the start of the article.
    pub fn scroll_to_top(&mut self) {
        self.viewport.scroll_to_top();
        self.sync_visibility();
    }

    /// Scrolls to the end of the article.
    pub fn scroll_to_bottom(&mut self) {
        self.viewport.scroll_to_bottom();
        self.sync_visibility();
    }

    /// Moves the page list selection up.
    pub fn select_previous_page(&mut self) {
        self.current_page_index = self.current_page_index.saturating_sub(1);
    }

    /// Moves the page list selection down.
    pub fn select_next_page(&mut self) {
        if self.current_page_index + 1 < self.pages.len() {
            self.current_page_index += 1;
        }
    }
}

#[cfg(test)]
#[path = "tests/app_state.rs"]
mod tests;
