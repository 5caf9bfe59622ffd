//! The scroll-spy controller: a single source of truth for which section of a page is active.
//!
//! The navigator is driven from two directions. Passively, the viewport-tracking mechanism
//! reports regions crossing the visibility threshold and the last qualifying report wins.
//! Actively, a go-to-section command updates the active section immediately and only then asks
//! the platform to scroll, so the highlighted navigation entry never lags behind the user's
//! intent. Visibility reports fired while that scroll animates are applied like any other.
//!
//! The platform is reached through two seams, [`RegionTracker`] and [`Scroller`], so the same
//! controller runs against the terminal viewport and against test doubles.

use crate::error::NavigatorError;
use crate::section::{Section, SectionList};
use tracing::{debug, trace};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// How a scroll-into-view request should move the viewport.
pub enum ScrollBehavior {
    /// Animate towards the target over several frames.
    Smooth,
    /// Jump straight to the target.
    Instant,
}

#[derive(Clone, Debug, PartialEq)]
/// A tracked region crossing its visibility threshold.
pub struct VisibilityEvent {
    /// Id of the section whose region crossed.
    pub section_id: String,
    /// Whether the region is now considered in view.
    pub is_visible: bool,
    /// Fraction of the region inside the viewport.
    pub visible_ratio: f64,
}

impl VisibilityEvent {
    #[must_use]
    /// Builds an event for `section_id`.
    pub fn new(section_id: impl Into<String>, is_visible: bool, visible_ratio: f64) -> Self {
        Self {
            section_id: section_id.into(),
            is_visible,
            visible_ratio,
        }
    }
}

/// Render-tree lookup and viewport tracking, as seen by the navigator.
pub trait RegionTracker {
    /// Whether the region for `id` currently exists in the rendered output.
    fn has_region(&self, id: &str) -> bool;
    /// Starts reporting visibility crossings of the region for `id` at `threshold`.
    fn observe(&mut self, id: &str, threshold: f64);
    /// Stops reporting for the region of `id`.
    fn unobserve(&mut self, id: &str);
}

/// Fire-and-forget scroll primitive.
pub trait Scroller {
    /// Requests that the region for `id` be brought into view.
    fn scroll_into_view(&mut self, id: &str, behavior: ScrollBehavior);
}

#[derive(Clone, Debug, PartialEq)]
/// Settings applied when a navigator is initialised.
pub struct NavigatorOptions {
    /// Fraction of a region that must be visible before it counts as in view.
    pub threshold: f64,
    /// Section active before any event arrives; the first section when `None`.
    pub default_id: Option<String>,
}

impl NavigatorOptions {
    #[must_use]
    /// Options with the given threshold and the first section as default.
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            default_id: None,
        }
    }

    #[must_use]
    /// Starts on `id` instead of the first section.
    pub fn with_default(mut self, id: impl Into<String>) -> Self {
        self.default_id = Some(id.into());
        self
    }
}

#[derive(Debug)]
/// Active-section state for one page view.
///
/// The active section is stored as an index into the validated section list, so it can never
/// name a section that is not on the page.
pub struct SectionNavigator {
    sections: SectionList,
    threshold: f64,
    active: usize,
    observed: Vec<bool>,
    torn_down: bool,
}

/// Handle returned by [`SectionNavigator::initialize`].
pub type NavigatorHandle = SectionNavigator;

impl SectionNavigator {
    /// Validates the configuration and starts observing every region that already exists.
    ///
    /// Sections whose region is not rendered yet are skipped without error; they stay reachable
    /// through [`go_to_section`](Self::go_to_section).
    ///
    /// # Errors
    ///
    /// Returns a [`NavigatorError`] for an empty section list, duplicate ids, a threshold outside
    /// `[0, 1]`, or a default id that is not in the list.
    pub fn initialize<T: RegionTracker>(
        sections: Vec<Section>,
        options: NavigatorOptions,
        tracker: &mut T,
    ) -> Result<NavigatorHandle, NavigatorError> {
        let sections = SectionList::new(sections)?;
        let threshold = options.threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(NavigatorError::InvalidThreshold { threshold });
        }

        let active = match options.default_id {
            Some(id) => sections
                .position(&id)
                .ok_or(NavigatorError::UnknownDefault { id })?,
            None => 0,
        };

        let mut observed = vec![false; sections.len()];
        for (index, section) in sections.iter().enumerate() {
            if tracker.has_region(&section.id) {
                tracker.observe(&section.id, threshold);
                observed[index] = true;
            } else {
                debug!(id = %section.id, "no rendered region, skipping observation");
            }
        }

        debug!(
            sections = sections.len(),
            observed = observed.iter().filter(|o| **o).count(),
            threshold,
            "navigator initialised"
        );

        Ok(Self {
            sections,
            threshold,
            active,
            observed,
            torn_down: false,
        })
    }

    /// Applies one visibility report.
    ///
    /// A report counts when the region is visible at or above the threshold; the active section
    /// then becomes the reported one whatever it was before. Reports for unknown or unobserved
    /// sections, below-threshold reports and anything after teardown are dropped.
    pub fn on_visibility_changed(&mut self, event: &VisibilityEvent) {
        if self.torn_down {
            trace!(id = %event.section_id, "visibility after teardown ignored");
            return;
        }

        let crossed = event.is_visible && event.visible_ratio >= self.threshold;
        if !crossed {
            return;
        }

        match self.sections.position(&event.section_id) {
            Some(index) if self.observed[index] => {
                trace!(id = %event.section_id, ratio = event.visible_ratio, "section in view");
                self.active = index;
            }
            _ => trace!(id = %event.section_id, "visibility for untracked section ignored"),
        }
    }

    /// Applies reports in delivery order; the last qualifying one decides the active section.
    pub fn on_visibility_batch<'a, I>(&mut self, events: I)
    where
        I: IntoIterator<Item = &'a VisibilityEvent>,
    {
        for event in events {
            self.on_visibility_changed(event);
        }
    }

    /// Makes `id` active immediately, then requests a smooth scroll to its region.
    ///
    /// Unknown ids are ignored. The scroll is only requested when the region exists at call
    /// time, and its completion is never awaited.
    pub fn go_to_section<P: RegionTracker + Scroller>(&mut self, id: &str, platform: &mut P) {
        let Some(index) = self.sections.position(id) else {
            debug!(id, "navigation to unknown section ignored");
            return;
        };

        self.active = index;

        if platform.has_region(id) {
            platform.scroll_into_view(id, ScrollBehavior::Smooth);
        } else {
            debug!(id, "no rendered region to scroll to");
        }
    }

    /// Stops observing every region this navigator observed. Safe to call more than once.
    pub fn teardown<T: RegionTracker>(&mut self, tracker: &mut T) {
        for (section, observed) in self.sections.iter().zip(self.observed.iter_mut()) {
            if *observed {
                tracker.unobserve(&section.id);
                *observed = false;
            }
        }

        if !self.torn_down {
            debug!(sections = self.sections.len(), "navigator torn down");
        }
        self.torn_down = true;
    }

    #[must_use]
    /// Id of the active section.
    pub fn active_id(&self) -> &str {
        &self.sections.as_slice()[self.active].id
    }

    #[must_use]
    /// Position of the active section in the list.
    pub fn active_index(&self) -> usize {
        self.active
    }

    #[must_use]
    /// The sections this navigator was initialised with.
    pub fn sections(&self) -> &SectionList {
        &self.sections
    }

    #[must_use]
    /// The visibility threshold in use.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    #[must_use]
    /// Whether the region of `id` is currently observed.
    pub fn is_observing(&self, id: &str) -> bool {
        self.sections
            .position(id)
            .is_some_and(|index| self.observed[index])
    }

    #[must_use]
    /// Whether [`teardown`](Self::teardown) has run.
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    #[must_use]
    /// The section after the active one.
    pub fn next_section_id(&self) -> Option<&str> {
        self.sections
            .get(self.active + 1)
            .map(|section| section.id.as_str())
    }

    #[must_use]
    /// The section before the active one.
    pub fn previous_section_id(&self) -> Option<&str> {
        self.active
            .checked_sub(1)
            .and_then(|index| self.sections.get(index))
            .map(|section| section.id.as_str())
    }
}

#[cfg(test)]
#[path = "tests/navigator.rs"]
mod tests;
