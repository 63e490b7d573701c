//! Integration test: load two React DevTools exports into the before and
//! after slots and check aggregation, comparison, and every view.

use profdiff_core::compare::{
    RankQuery, SortKey, SummaryDelta, compare_components, compare_rerenders, rank,
    scheduling_counts,
};
use profdiff_core::model::{Session, Slot, SlotStatus};
use profdiff_core::svg::render_svg;
use profdiff_core::views::{ViewKind, ViewState, content_height, render_view};
use profdiff_protocol::{RenderCommand, Viewport};

const BEFORE: &[u8] = include_bytes!("fixtures/before.json");
const AFTER: &[u8] = include_bytes!("fixtures/after.json");

fn loaded() -> Session {
    let mut session = Session::default();
    session
        .load(Slot::Before, BEFORE, "before.json")
        .expect("failed to load before capture");
    session
        .load(Slot::After, AFTER, "after.json")
        .expect("failed to load after capture");
    session
}

fn texts(commands: &[RenderCommand]) -> Vec<&str> {
    commands.iter().filter_map(RenderCommand::text).collect()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn aggregates_the_before_capture() {
    let session = loaded();
    let before = session.before().expect("before slot is empty");

    assert_eq!(before.total_commits, 3);
    assert_eq!(before.total_renders, 14);
    assert!(close(before.total_duration, 30.0));
    assert!(close(before.average_commit_duration(), 10.0));
    assert_eq!(before.unique_components(), 4);

    let names: Vec<&str> = before.component_stats.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["App", "Header", "List", "Item"]);

    let item = before.component_stat("Item").expect("no Item stats");
    assert_eq!(item.render_count, 7);
    // Two Item instances mount in the first commit.
    assert_eq!(item.mounts, 2);
    assert_eq!(item.updates, 6);
    assert!(close(item.total_duration, 5.2));

    let app = before.rerender_cause("App").expect("no App causes");
    assert_eq!(app.total_rerenders, 2);
    assert_eq!((app.causes.mount, app.causes.hooks, app.causes.context), (1, 1, 1));

    let item = before.rerender_cause("Item").expect("no Item causes");
    assert_eq!(item.total_rerenders, 6);
    assert_eq!((item.causes.mount, item.causes.props), (2, 4));

    let header = before.rerender_cause("Header").expect("no Header causes");
    assert_eq!(header.causes.state, 1);

    let global = before.global_causes;
    assert_eq!(
        (global.mount, global.props, global.hooks, global.state, global.context),
        (5, 6, 1, 1, 1)
    );

    // The root has no ancestors, so it gets no path; the two Item
    // instances share one.
    assert!(before.paths_for("App").is_empty());
    assert_eq!(before.paths_for("Item"), ["App > List > Item"]);
    assert!(before.tree.is_clean());
}

#[test]
fn missing_timeline_duration_falls_back_to_commit_sum() {
    let session = loaded();
    let after = session.after().expect("after slot is empty");
    assert_eq!(after.total_commits, 2);
    assert_eq!(after.total_renders, 6);
    assert!(close(after.total_duration, 14.0));
    assert!(after.scheduling_events.is_empty());
}

#[test]
fn summary_between_captures() {
    let session = loaded();
    let (before, after) = session.pair().expect("both slots should be loaded");
    let summary = SummaryDelta::between(before, after);

    assert_eq!(summary.renders_avoided, 8);
    assert!(summary.renders.improved());
    assert!((summary.renders.percent - -57.142857).abs() < 1e-4);
    assert!((summary.duration.percent - -53.333333).abs() < 1e-4);
    assert!((summary.commits.percent - -33.333333).abs() < 1e-4);
}

#[test]
fn components_rank_by_improvement() {
    let session = loaded();
    let rows = compare_components(session.before(), session.after());
    let query = RankQuery {
        sort: SortKey::Improvement,
        ..RankQuery::default()
    };
    let ranked = rank(&rows, &query);
    let order: Vec<(&str, i64)> = ranked.iter().map(|r| (r.name.as_str(), r.diff)).collect();
    assert_eq!(
        order,
        [("Item", -5), ("App", -1), ("Header", -1), ("List", -1)]
    );

    let rerenders = compare_rerenders(session.before(), session.after());
    let item = rerenders
        .iter()
        .find(|r| r.name == "Item")
        .expect("no Item re-render row");
    assert_eq!((item.before.total, item.after.total), (6, 2));
    assert_eq!(item.after.causes.mount, 2);
}

#[test]
fn scheduling_sources_of_the_before_capture() {
    let session = loaded();
    let before = session.before().expect("before slot is empty");
    let counts = scheduling_counts(before, 500, 20);
    let pairs: Vec<(&str, usize)> = counts.iter().map(|c| (c.name.as_str(), c.count)).collect();
    assert_eq!(pairs, [("List", 2), ("Header", 1), ("Unknown", 1)]);
}

#[test]
fn every_view_renders_and_exports() {
    let session = loaded();
    let viewport = Viewport::new(1200.0, 2000.0);
    let state = ViewState::default();

    for kind in ViewKind::ALL {
        let commands = render_view(kind, &session, &viewport, &state);
        assert!(!commands.is_empty(), "{kind} rendered nothing");

        let height = content_height(&commands);
        assert!(height > 0.0, "{kind} has no content");

        let svg = render_svg(&commands, viewport.width, height, true);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
    }

    let comparison = render_view(ViewKind::Comparison, &session, &viewport, &state);
    let lines = texts(&comparison);
    assert!(lines.contains(&"-57.1%"));
    assert!(lines.contains(&"14 → 6"));
    assert!(lines.contains(&"30.0ms → 14.0ms"));
    assert!(lines.contains(&"8"));
    assert!(lines.contains(&"-71.4%"));

    let overview = render_view(ViewKind::Overview, &session, &viewport, &state);
    assert!(texts(&overview).contains(&"after.json vs before.json"));
}

#[test]
fn failed_reload_keeps_the_previous_capture() {
    let mut session = loaded();
    let err = session
        .load(Slot::After, br#"{"traceEvents": []}"#, "trace.json")
        .expect_err("a Chrome trace is not a DevTools export");
    assert!(err.to_string().contains("React DevTools"));

    assert_eq!(session.after().map(|p| p.total_renders), Some(6));
    assert!(matches!(
        session.status(Slot::After),
        SlotStatus::Failed { source, .. } if source == "trace.json"
    ));
    assert!(matches!(session.status(Slot::Before), SlotStatus::Loaded { .. }));
}

#[test]
fn single_capture_views() {
    let mut session = Session::default();
    session
        .load(Slot::Before, BEFORE, "before.json")
        .expect("failed to load before capture");
    let viewport = Viewport::new(1200.0, 2000.0);
    let state = ViewState::default();

    let components = render_view(ViewKind::Components, &session, &viewport, &state);
    let lines = texts(&components);
    assert!(lines.contains(&"Mount/Update"));
    assert!(lines.contains(&"2 / 6"));

    let comparison = render_view(ViewKind::Comparison, &session, &viewport, &state);
    assert!(texts(&comparison).iter().any(|t| t.starts_with("Load both")));

    session.clear(Slot::Before);
    assert!(!session.has_any());
    assert!(matches!(session.status(Slot::Before), SlotStatus::Empty));
}
