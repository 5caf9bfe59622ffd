use super::{
    NavigatorOptions, RegionTracker, ScrollBehavior, Scroller, SectionNavigator, VisibilityEvent,
};
use crate::error::NavigatorError;
use crate::section::Section;
use std::collections::HashSet;

/// Records everything the navigator asks of the platform.
#[derive(Default)]
struct FakePage {
    regions: HashSet<String>,
    observing: Vec<(String, f64)>,
    unobserved: Vec<String>,
    scrolls: Vec<(String, ScrollBehavior)>,
}

impl FakePage {
    fn with_regions(ids: &[&str]) -> Self {
        Self {
            regions: ids.iter().map(ToString::to_string).collect(),
            ..Self::default()
        }
    }
}

impl RegionTracker for FakePage {
    fn has_region(&self, id: &str) -> bool {
        self.regions.contains(id)
    }

    fn observe(&mut self, id: &str, threshold: f64) {
        self.observing.push((id.to_string(), threshold));
    }

    fn unobserve(&mut self, id: &str) {
        self.observing.retain(|(observed, _)| observed != id);
        self.unobserved.push(id.to_string());
    }
}

impl Scroller for FakePage {
    fn scroll_into_view(&mut self, id: &str, behavior: ScrollBehavior) {
        self.scrolls.push((id.to_string(), behavior));
    }
}

const IDS: [&str; 4] = ["intro", "science", "quran", "reflection"];

fn topic_sections() -> Vec<Section> {
    vec![
        Section::new("intro", "Introduction"),
        Section::new("science", "The Science"),
        Section::new("quran", "The Verse"),
        Section::new("reflection", "Reflection"),
    ]
}

fn visible(id: &str, ratio: f64) -> VisibilityEvent {
    VisibilityEvent::new(id, true, ratio)
}

#[test]
fn test_initialize_defaults_to_first_section() {
    let mut page = FakePage::with_regions(&IDS);
    let nav =
        SectionNavigator::initialize(topic_sections(), NavigatorOptions::new(0.3), &mut page)
            .unwrap();

    assert_eq!(nav.active_id(), "intro");
    assert_eq!(nav.active_index(), 0);
    assert_eq!(page.observing.len(), 4);
    assert!(page.observing.iter().all(|(_, t)| (*t - 0.3).abs() < f64::EPSILON));
    assert!(page.scrolls.is_empty(), "initialise must not scroll");
}

#[test]
fn test_initialize_with_explicit_default() {
    let mut page = FakePage::with_regions(&IDS);
    let nav = SectionNavigator::initialize(
        topic_sections(),
        NavigatorOptions::new(0.3).with_default("quran"),
        &mut page,
    )
    .unwrap();

    assert_eq!(nav.active_id(), "quran");
}

#[test]
fn test_initialize_rejects_bad_configuration() {
    let mut page = FakePage::default();

    let empty = SectionNavigator::initialize(Vec::new(), NavigatorOptions::new(0.3), &mut page);
    assert_eq!(empty.unwrap_err(), NavigatorError::EmptySectionList);

    let mut duplicated = topic_sections();
    duplicated.push(Section::new("science", "Science, again"));
    let dup = SectionNavigator::initialize(duplicated, NavigatorOptions::new(0.3), &mut page);
    assert_eq!(
        dup.unwrap_err(),
        NavigatorError::DuplicateSectionId {
            id: "science".to_string()
        }
    );

    for threshold in [-0.1, 1.5, f64::NAN] {
        let bad =
            SectionNavigator::initialize(topic_sections(), NavigatorOptions::new(threshold), &mut page);
        assert!(
            matches!(bad, Err(NavigatorError::InvalidThreshold { .. })),
            "threshold {threshold} should be rejected"
        );
    }

    let unknown = SectionNavigator::initialize(
        topic_sections(),
        NavigatorOptions::new(0.3).with_default("footer"),
        &mut page,
    );
    assert_eq!(
        unknown.unwrap_err(),
        NavigatorError::UnknownDefault {
            id: "footer".to_string()
        }
    );

    assert!(page.observing.is_empty(), "rejected configs observe nothing");
}

#[test]
fn test_threshold_bounds_are_inclusive() {
    let mut page = FakePage::with_regions(&IDS);
    for threshold in [0.0, 1.0] {
        let nav = SectionNavigator::initialize(
            topic_sections(),
            NavigatorOptions::new(threshold),
            &mut page,
        );
        assert!(nav.is_ok());
    }
}

#[test]
fn test_missing_regions_are_skipped() {
    let mut page = FakePage::with_regions(&["intro", "quran"]);
    let mut nav =
        SectionNavigator::initialize(topic_sections(), NavigatorOptions::new(0.3), &mut page)
            .unwrap();

    assert!(nav.is_observing("intro"));
    assert!(!nav.is_observing("science"));
    assert_eq!(page.observing.len(), 2);

    // Never observed, so scrolling cannot activate it.
    nav.on_visibility_changed(&visible("science", 0.9));
    assert_eq!(nav.active_id(), "intro");

    // Once rendered it is still reachable by navigation.
    page.regions.insert("science".to_string());
    nav.go_to_section("science", &mut page);
    assert_eq!(nav.active_id(), "science");
    assert_eq!(
        page.scrolls,
        vec![("science".to_string(), ScrollBehavior::Smooth)]
    );
}

#[test]
fn test_visibility_transitions_from_any_section() {
    let mut page = FakePage::with_regions(&IDS);
    let mut nav =
        SectionNavigator::initialize(topic_sections(), NavigatorOptions::new(0.3), &mut page)
            .unwrap();

    for from in IDS {
        for to in IDS {
            nav.go_to_section(from, &mut page);
            nav.on_visibility_changed(&visible(to, 0.3));
            assert_eq!(nav.active_id(), to, "{from} -> {to}");
        }
    }
}

#[test]
fn test_sub_threshold_and_hidden_events_ignored() {
    let mut page = FakePage::with_regions(&IDS);
    let mut nav =
        SectionNavigator::initialize(topic_sections(), NavigatorOptions::new(0.3), &mut page)
            .unwrap();

    nav.on_visibility_changed(&visible("science", 0.2));
    assert_eq!(nav.active_id(), "intro");

    nav.on_visibility_changed(&VisibilityEvent::new("science", false, 0.8));
    assert_eq!(nav.active_id(), "intro");

    nav.on_visibility_changed(&visible("science", f64::NAN));
    assert_eq!(nav.active_id(), "intro");

    nav.on_visibility_changed(&visible("footer", 1.0));
    assert_eq!(nav.active_id(), "intro");
}

#[test]
fn test_last_event_in_batch_wins() {
    let mut page = FakePage::with_regions(&IDS);
    let mut nav =
        SectionNavigator::initialize(topic_sections(), NavigatorOptions::new(0.3), &mut page)
            .unwrap();

    let batch = [
        visible("reflection", 0.9),
        visible("science", 0.4),
        visible("quran", 0.1),
    ];
    nav.on_visibility_batch(&batch);

    // Delivery order decides, not section order or ratio.
    assert_eq!(nav.active_id(), "science");
}

#[test]
fn test_go_to_section_is_immediate() {
    let mut page = FakePage::with_regions(&IDS);
    let mut nav =
        SectionNavigator::initialize(topic_sections(), NavigatorOptions::new(0.3), &mut page)
            .unwrap();

    nav.go_to_section("reflection", &mut page);

    assert_eq!(nav.active_id(), "reflection");
    assert_eq!(
        page.scrolls,
        vec![("reflection".to_string(), ScrollBehavior::Smooth)]
    );
}

#[test]
fn test_go_to_unknown_section_is_noop() {
    let mut page = FakePage::with_regions(&IDS);
    let mut nav =
        SectionNavigator::initialize(topic_sections(), NavigatorOptions::new(0.3), &mut page)
            .unwrap();
    nav.on_visibility_changed(&visible("quran", 0.5));

    nav.go_to_section("nonexistent", &mut page);

    assert_eq!(nav.active_id(), "quran");
    assert!(page.scrolls.is_empty());
}

#[test]
fn test_teardown_stops_updates() {
    let mut page = FakePage::with_regions(&IDS);
    let mut nav =
        SectionNavigator::initialize(topic_sections(), NavigatorOptions::new(0.3), &mut page)
            .unwrap();

    nav.teardown(&mut page);

    assert!(nav.is_torn_down());
    assert!(page.observing.is_empty());
    assert_eq!(page.unobserved.len(), 4);

    nav.on_visibility_changed(&visible("reflection", 1.0));
    assert_eq!(nav.active_id(), "intro");
}

#[test]
fn test_teardown_only_releases_observed_regions() {
    let mut page = FakePage::with_regions(&["science"]);
    let mut nav =
        SectionNavigator::initialize(topic_sections(), NavigatorOptions::new(0.3), &mut page)
            .unwrap();

    nav.teardown(&mut page);
    nav.teardown(&mut page);

    assert_eq!(page.unobserved, vec!["science".to_string()]);
}

#[test]
fn test_reinitialize_after_teardown_starts_fresh() {
    let mut page = FakePage::with_regions(&IDS);
    let mut first =
        SectionNavigator::initialize(topic_sections(), NavigatorOptions::new(0.3), &mut page)
            .unwrap();
    first.on_visibility_changed(&visible("reflection", 0.6));
    first.teardown(&mut page);

    let second =
        SectionNavigator::initialize(topic_sections(), NavigatorOptions::new(0.3), &mut page)
            .unwrap();

    assert_eq!(second.active_id(), "intro");
    assert!(!second.is_torn_down());
    assert!(second.is_observing("reflection"));
    assert_eq!(page.observing.len(), 4);
}

#[test]
fn test_neighbour_ids() {
    let mut page = FakePage::with_regions(&IDS);
    let mut nav =
        SectionNavigator::initialize(topic_sections(), NavigatorOptions::new(0.3), &mut page)
            .unwrap();

    assert_eq!(nav.previous_section_id(), None);
    assert_eq!(nav.next_section_id(), Some("science"));

    nav.go_to_section("reflection", &mut page);
    assert_eq!(nav.previous_section_id(), Some("quran"));
    assert_eq!(nav.next_section_id(), None);
}

#[test]
fn test_scroll_through_overrides_navigation() {
    let mut page = FakePage::with_regions(&IDS);
    let mut nav =
        SectionNavigator::initialize(topic_sections(), NavigatorOptions::new(0.3), &mut page)
            .unwrap();
    assert_eq!(nav.active_id(), "intro");

    nav.on_visibility_changed(&visible("science", 0.35));
    assert_eq!(nav.active_id(), "science");

    nav.go_to_section("reflection", &mut page);
    assert_eq!(nav.active_id(), "reflection");

    // A section passed during the animated jump still takes over.
    nav.on_visibility_changed(&visible("quran", 0.5));
    assert_eq!(nav.active_id(), "quran");

    nav.teardown(&mut page);
    nav.on_visibility_changed(&visible("intro", 1.0));
    assert_eq!(nav.active_id(), "quran");
}
