//! The terminal as a scrolling platform for articles.
//!
//! An article is laid out once per width into wrapped lines, and every section claims the
//! contiguous run of lines from its heading up to the next heading. Those runs are the regions
//! the navigator observes. Visibility is measured the way browsers measure intersection: the
//! share of a region's own lines that fall inside the viewport, so a region taller than the
//! screen can never reach a high threshold. Widths are counted in terminal cells, so a line is
//! never wider on screen than the layout assumed.
//!
//! Smooth scrolling is an eased animation towards a target offset, advanced by [`Viewport::tick`]
//! from the event loop. Nothing here knows which section is active; that belongs to the
//! navigator, which only sees the [`RegionTracker`] and [`Scroller`] seams.

use crate::navigator::{RegionTracker, ScrollBehavior, Scroller, VisibilityEvent};
use crate::section::{Article, BodyBlock};
use std::collections::HashMap;
use tracing::trace;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Role of a rendered line, used for styling.
pub enum LineKind {
    /// A section heading; the first line of a region.
    Heading,
    /// A heading nested inside a section body.
    Subheading,
    /// Quoted text, such as a cited verse.
    Quote,
    /// A bullet or numbered list item.
    ListItem,
    /// Plain paragraph text.
    Body,
    /// Preformatted text.
    Code,
    /// A horizontal rule.
    Rule,
    /// Vertical spacing.
    Blank,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// One wrapped line of the laid-out article.
pub struct RenderedLine {
    /// Text to draw, already wrapped and prefixed.
    pub text: String,
    /// How the line should be styled.
    pub kind: LineKind,
    /// Index of the section the line belongs to.
    pub section: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Addressable run of lines belonging to one section.
pub struct Region {
    /// Section id the region renders.
    pub id: String,
    /// First line (the heading).
    pub start: usize,
    /// One past the last line.
    pub end: usize,
}

impl Region {
    #[must_use]
    /// Number of lines in the region.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    /// Whether the region has no lines.
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

#[derive(Clone, Copy, Debug)]
struct Observation {
    threshold: f64,
    in_view: bool,
}

#[derive(Debug)]
/// Scroll position, layout and region observation for the article on screen.
pub struct Viewport {
    lines: Vec<RenderedLine>,
    regions: Vec<Region>,
    observations: HashMap<String, Observation>,
    offset: usize,
    height: usize,
    width: usize,
    target: Option<usize>,
    easing: f64,
}

impl Viewport {
    #[must_use]
    /// An empty viewport; `easing` is the share of the remaining distance each frame covers.
    pub fn new(easing: f64) -> Self {
        Self {
            lines: Vec::new(),
            regions: Vec::new(),
            observations: HashMap::new(),
            offset: 0,
            height: 0,
            width: 0,
            target: None,
            easing: easing.clamp(0.01, 1.0),
        }
    }

    /// Lays `article` out at `width` columns and rebuilds the section regions.
    ///
    /// Observations of ids that still have a region survive and keep their last reported state,
    /// so a re-layout only produces reports for regions that actually crossed.
    pub fn layout(&mut self, article: &Article, width: usize) {
        let width = width.max(1);
        self.lines.clear();
        self.regions.clear();

        for (index, section) in article.sections.iter().enumerate() {
            let start = self.lines.len();
            if index > 0 {
                self.push_blank(index);
            }
            let heading_line = self.lines.len();
            let icon = section
                .section
                .display_meta
                .as_ref()
                .and_then(|meta| meta.icon.as_deref());
            let heading = match icon {
                Some(icon) => format!("{icon} {}", section.section.display_label),
                None => section.section.display_label.clone(),
            };
            self.push_wrapped(&heading, width, ("", ""), LineKind::Heading, index);
            if !section.blocks.is_empty() {
                self.push_blank(index);
            }
            self.layout_blocks(&section.blocks, width, index);

            // The gap before a heading belongs to the previous region.
            if index > 0 {
                if let Some(previous) = self.regions.last_mut() {
                    previous.end = heading_line;
                }
                if let Some(blank) = self.lines.get_mut(start) {
                    blank.section = index - 1;
                }
            }
            self.regions.push(Region {
                id: section.section.id.clone(),
                start: heading_line,
                end: self.lines.len(),
            });
        }

        let regions = &self.regions;
        self.observations
            .retain(|id, _| regions.iter().any(|r| &r.id == id));

        self.width = width;
        self.clamp();
        trace!(lines = self.lines.len(), regions = self.regions.len(), "laid out article");
    }

    fn push_blank(&mut self, section: usize) {
        self.lines.push(RenderedLine {
            text: String::new(),
            kind: LineKind::Blank,
            section,
        });
    }

    fn layout_blocks(&mut self, blocks: &[BodyBlock], width: usize, section: usize) {
        let mut previous: Option<&BodyBlock> = None;
        for block in blocks {
            let tight = matches!(
                (previous, block),
                (Some(BodyBlock::ListItem { .. }), BodyBlock::ListItem { .. })
            );
            if previous.is_some() && !tight {
                self.push_blank(section);
            }
            previous = Some(block);

            match block {
                BodyBlock::Paragraph(text) => {
                    self.push_wrapped(text, width, ("", ""), LineKind::Body, section);
                }
                BodyBlock::Heading(text) => {
                    self.push_wrapped(text, width, ("", ""), LineKind::Subheading, section);
                }
                BodyBlock::Quote(text) => {
                    self.push_wrapped(text, width, ("│ ", "│ "), LineKind::Quote, section);
                }
                BodyBlock::ListItem { marker, text } => {
                    let first = format!("{marker} ");
                    let rest = " ".repeat(first.width());
                    self.push_wrapped(text, width, (&first, &rest), LineKind::ListItem, section);
                }
                BodyBlock::Code(text) => {
                    for line in text.split('\n') {
                        for piece in hard_wrap(&line.replace('\t', "    "), width) {
                            self.lines.push(RenderedLine {
                                text: piece,
                                kind: LineKind::Code,
                                section,
                            });
                        }
                    }
                }
                BodyBlock::Rule => self.lines.push(RenderedLine {
                    text: "─".repeat(width),
                    kind: LineKind::Rule,
                    section,
                }),
            }
        }
    }

    /// Wraps `text` to `width` cells, prefixing the first line and every continuation line.
    fn push_wrapped(
        &mut self,
        text: &str,
        width: usize,
        (first, rest): (&str, &str),
        kind: LineKind,
        section: usize,
    ) {
        let inner = width.saturating_sub(first.width().max(rest.width())).max(1);
        for (i, line) in wrap(text, inner).into_iter().enumerate() {
            let prefix = if i == 0 { first } else { rest };
            self.lines.push(RenderedLine {
                text: format!("{prefix}{line}"),
                kind,
                section,
            });
        }
    }

    /// Sets the number of visible rows, keeping the offset in range.
    pub fn set_height(&mut self, height: usize) {
        self.height = height;
        self.clamp();
    }

    #[must_use]
    /// Rows on screen.
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    /// Column width of the current layout.
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    /// First visible line.
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[must_use]
    /// Largest offset that still fills the screen.
    pub fn max_offset(&self) -> usize {
        self.lines.len().saturating_sub(self.height)
    }

    #[must_use]
    /// Every laid-out line.
    pub fn lines(&self) -> &[RenderedLine] {
        &self.lines
    }

    #[must_use]
    /// Lines currently on screen.
    pub fn visible_lines(&self) -> &[RenderedLine] {
        let end = (self.offset + self.height).min(self.lines.len());
        &self.lines[self.offset.min(end)..end]
    }

    #[must_use]
    /// Every section region in page order.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    #[must_use]
    /// The region rendering `id`.
    pub fn region(&self, id: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }

    #[must_use]
    /// Whether `id` is being observed.
    pub fn is_observed(&self, id: &str) -> bool {
        self.observations.contains_key(id)
    }

    #[must_use]
    /// Whether a smooth scroll is still underway.
    pub fn is_animating(&self) -> bool {
        self.target.is_some()
    }

    #[must_use]
    /// How far through the article the viewport is, 0 to 100.
    pub fn scroll_percent(&self) -> u16 {
        let max = self.max_offset();
        if max == 0 {
            return 100;
        }
        u16::try_from(self.offset * 100 / max).unwrap_or(100)
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    /// Share of `region` that lies inside the viewport.
    pub fn visible_ratio(&self, region: &Region) -> f64 {
        if region.is_empty() {
            return 0.0;
        }
        let top = region.start.max(self.offset);
        let bottom = region.end.min(self.offset + self.height);
        let visible = bottom.saturating_sub(top);
        visible as f64 / region.len() as f64
    }

    /// Reports every observed region whose in-view state changed since the last poll.
    ///
    /// A region is in view when some of it is on screen and its ratio reaches its threshold.
    /// Reports come in page order.
    pub fn poll_visibility(&mut self) -> Vec<VisibilityEvent> {
        let mut events = Vec::new();
        for region in &self.regions {
            let ratio = self.visible_ratio(region);
            let Some(observation) = self.observations.get_mut(&region.id) else {
                continue;
            };

            let in_view = ratio > 0.0 && ratio >= observation.threshold;
            if in_view != observation.in_view {
                observation.in_view = in_view;
                events.push(VisibilityEvent::new(region.id.clone(), in_view, ratio));
            }
        }
        events
    }

    /// Advances a smooth scroll by one frame. Returns whether it is still running.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub fn tick(&mut self) -> bool {
        let Some(target) = self.target else {
            return false;
        };

        let distance = target.abs_diff(self.offset);
        let step = ((distance as f64 * self.easing).ceil() as usize).clamp(1, distance.max(1));
        if target > self.offset {
            self.offset += step.min(distance);
        } else {
            self.offset -= step.min(distance);
        }

        if self.offset == target {
            self.target = None;
        }
        self.target.is_some()
    }

    /// Scrolls by `delta` lines, cancelling any animation.
    pub fn scroll_by(&mut self, delta: isize) {
        self.target = None;
        self.offset = self.offset.saturating_add_signed(delta);
        self.clamp();
    }

    /// Scrolls down one screen.
    pub fn page_down(&mut self) {
        self.scroll_by(isize::try_from(self.page_step()).unwrap_or(isize::MAX));
    }

    /// Scrolls up one screen.
    pub fn page_up(&mut self) {
        self.scroll_by(-isize::try_from(self.page_step()).unwrap_or(isize::MAX));
    }

    fn page_step(&self) -> usize {
        self.height.saturating_sub(2).max(1)
    }

    /// Jumps to the start of the article.
    pub fn scroll_to_top(&mut self) {
        self.target = None;
        self.offset = 0;
    }

    /// Jumps to the end of the article.
    pub fn scroll_to_bottom(&mut self) {
        self.target = None;
        self.offset = self.max_offset();
    }

    fn clamp(&mut self) {
        let max = self.max_offset();
        self.offset = self.offset.min(max);
        if let Some(target) = self.target {
            let target = target.min(max);
            self.target = (target != self.offset).then_some(target);
        }
    }
}

impl RegionTracker for Viewport {
    fn has_region(&self, id: &str) -> bool {
        self.region(id).is_some()
    }

    fn observe(&mut self, id: &str, threshold: f64) {
        if self.has_region(id) {
            self.observations.insert(
                id.to_string(),
                Observation {
                    threshold,
                    in_view: false,
                },
            );
        }
    }

    fn unobserve(&mut self, id: &str) {
        self.observations.remove(id);
    }
}

impl Scroller for Viewport {
    fn scroll_into_view(&mut self, id: &str, behavior: ScrollBehavior) {
        let Some(start) = self.region(id).map(|r| r.start) else {
            return;
        };
        let target = start.min(self.max_offset());

        match behavior {
            ScrollBehavior::Smooth => {
                self.target = (target != self.offset).then_some(target);
            }
            ScrollBehavior::Instant => {
                self.target = None;
                self.offset = target;
            }
        }
        trace!(id, target, ?behavior, "scroll into view");
    }
}

/// Greedy word wrap to `width` terminal cells, hard-splitting words that do not fit.
#[must_use]
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let word_width = word.width();
        let needed = if current.is_empty() {
            word_width
        } else {
            current_width + 1 + word_width
        };
        if needed <= width {
            if !current.is_empty() {
                current.push(' ');
                current_width += 1;
            }
            current.push_str(word);
            current_width += word_width;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }
        for ch in word.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if current_width + ch_width > width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push(ch);
            current_width += ch_width;
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Splits `line` into pieces of at most `width` cells, keeping its spacing.
fn hard_wrap(line: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for ch in line.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if current_width + ch_width > width && !current.is_empty() {
            pieces.push(std::mem::take(&mut current));
            current_width = 0;
        }
        current.push(ch);
        current_width += ch_width;
    }
    pieces.push(current);
    pieces
}

#[cfg(test)]
#[path = "tests/viewport.rs"]
mod tests;
