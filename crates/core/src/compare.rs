//! Before/after merge of two processed captures, plus the ranking used by
//! every table view.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{CauseCounts, ComponentPaths, ComponentStat, ProcessedCapture, RerenderCause};

/// Percentage change from `before` to `after`.
///
/// A zero baseline reports `+100%` when something appeared and `0%` when
/// both sides are empty, never infinity or NaN.
pub fn percent_change(before: f64, after: f64) -> f64 {
    if before > 0.0 {
        (after - before) / before * 100.0
    } else if after > 0.0 {
        100.0
    } else {
        0.0
    }
}

/// Relative change of `current` against `baseline`, or `None` when the
/// baseline is zero and no meaningful ratio exists.
pub fn relative_change(current: f64, baseline: f64) -> Option<f64> {
    (baseline != 0.0 && baseline.is_finite() && current.is_finite())
        .then(|| (current - baseline) / baseline * 100.0)
}

/// Ordering for table views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Highest render count (of either side) first.
    #[default]
    Renders,
    /// Longest duration (of either side) first.
    Duration,
    /// Biggest drop from before to after first.
    Improvement,
    /// Alphabetic.
    Name,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::Renders,
        SortKey::Duration,
        SortKey::Improvement,
        SortKey::Name,
    ];

    /// The key after this one, wrapping around. Used for cycling in the UI.
    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Renders => write!(f, "renders"),
            Self::Duration => write!(f, "duration"),
            Self::Improvement => write!(f, "improvement"),
            Self::Name => write!(f, "name"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown sort key {0:?} (expected renders, duration, improvement or name)")]
pub struct UnknownSortKey(pub String);

impl std::str::FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownSortKey(s.to_string()))
    }
}

/// Filter, order, and truncation applied to a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankQuery {
    /// Case-insensitive substring; empty matches everything.
    pub filter: String,
    pub sort: SortKey,
    /// Rows kept after sorting; `None` keeps all.
    pub limit: Option<usize>,
}

impl Default for RankQuery {
    fn default() -> Self {
        Self {
            filter: String::new(),
            sort: SortKey::Renders,
            limit: Some(100),
        }
    }
}

impl RankQuery {
    pub fn matches(&self, name: &str) -> bool {
        self.filter.is_empty() || name.to_lowercase().contains(&self.filter.to_lowercase())
    }
}

/// Anything that can appear as a row in a ranked table.
pub trait Ranked {
    fn name(&self) -> &str;
    /// Value ranked by [`SortKey::Renders`], larger first.
    fn render_weight(&self) -> f64;
    /// Value ranked by [`SortKey::Duration`], larger first.
    fn duration_weight(&self) -> f64;
    /// Signed after-minus-before change, smaller first. `None` for rows
    /// that describe a single capture; those fall back to name order.
    fn improvement(&self) -> Option<i64>;
}

impl<T: Ranked> Ranked for &T {
    fn name(&self) -> &str {
        (*self).name()
    }
    fn render_weight(&self) -> f64 {
        (*self).render_weight()
    }
    fn duration_weight(&self) -> f64 {
        (*self).duration_weight()
    }
    fn improvement(&self) -> Option<i64> {
        (*self).improvement()
    }
}

fn name_order(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Filter, sort, and truncate rows. Ties always fall back to name order so
/// output never depends on map iteration order.
pub fn rank<T: Ranked>(rows: impl IntoIterator<Item = T>, query: &RankQuery) -> Vec<T> {
    let mut rows: Vec<T> = rows.into_iter().filter(|r| query.matches(r.name())).collect();

    rows.sort_by(|a, b| {
        let primary = match query.sort {
            SortKey::Renders => b.render_weight().total_cmp(&a.render_weight()),
            SortKey::Duration => b.duration_weight().total_cmp(&a.duration_weight()),
            SortKey::Improvement => match (a.improvement(), b.improvement()) {
                (Some(x), Some(y)) => x.cmp(&y),
                _ => Ordering::Equal,
            },
            SortKey::Name => Ordering::Equal,
        };
        primary.then_with(|| name_order(a.name(), b.name()))
    });

    if let Some(limit) = query.limit {
        rows.truncate(limit);
    }
    rows
}

/// Rank one capture's component statistics. Without a second capture there
/// is no diff, so [`SortKey::Improvement`] orders by name.
pub fn rank_component_stats<'a>(
    stats: &'a [ComponentStat],
    query: &RankQuery,
) -> Vec<&'a ComponentStat> {
    rank(stats, query)
}

/// Rank one capture's re-render causes.
pub fn rank_rerender_causes<'a>(
    causes: &'a [RerenderCause],
    query: &RankQuery,
) -> Vec<&'a RerenderCause> {
    rank(causes, query)
}

/// Render count and duration of one component on one side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderSide {
    pub renders: u32,
    pub duration: f64,
}

/// One component measured in both captures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentComparison {
    pub name: String,
    pub before: RenderSide,
    pub after: RenderSide,
    /// `after.renders - before.renders`.
    pub diff: i64,
    pub percent_change: f64,
}

impl ComponentComparison {
    pub fn max_renders(&self) -> u32 {
        self.before.renders.max(self.after.renders)
    }

    pub fn max_duration(&self) -> f64 {
        self.before.duration.max(self.after.duration)
    }
}

impl Ranked for ComponentComparison {
    fn name(&self) -> &str {
        &self.name
    }
    fn render_weight(&self) -> f64 {
        f64::from(self.max_renders())
    }
    fn duration_weight(&self) -> f64 {
        self.max_duration()
    }
    fn improvement(&self) -> Option<i64> {
        Some(self.diff)
    }
}

/// Re-render count and causes of one component on one side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RerenderSide {
    pub total: u32,
    pub causes: CauseCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RerenderComparison {
    pub name: String,
    pub before: RerenderSide,
    pub after: RerenderSide,
    pub diff: i64,
    pub percent_change: f64,
}

impl RerenderComparison {
    pub fn max_rerenders(&self) -> u32 {
        self.before.total.max(self.after.total)
    }
}

impl Ranked for RerenderComparison {
    fn name(&self) -> &str {
        &self.name
    }
    fn render_weight(&self) -> f64 {
        f64::from(self.max_rerenders())
    }
    // Causes carry no timing; duration ranking uses the counts.
    fn duration_weight(&self) -> f64 {
        f64::from(self.max_rerenders())
    }
    fn improvement(&self) -> Option<i64> {
        Some(self.diff)
    }
}

impl Ranked for ComponentStat {
    fn name(&self) -> &str {
        &self.name
    }
    fn render_weight(&self) -> f64 {
        f64::from(self.render_count)
    }
    fn duration_weight(&self) -> f64 {
        self.total_duration
    }
    fn improvement(&self) -> Option<i64> {
        None
    }
}

impl Ranked for RerenderCause {
    fn name(&self) -> &str {
        &self.name
    }
    fn render_weight(&self) -> f64 {
        f64::from(self.total_rerenders)
    }
    fn duration_weight(&self) -> f64 {
        f64::from(self.total_rerenders)
    }
    fn improvement(&self) -> Option<i64> {
        None
    }
}

/// Union of names across both sides: before's order, then names only
/// present after.
fn union_names<'a>(
    before: impl Iterator<Item = &'a str>,
    after: impl Iterator<Item = &'a str>,
) -> Vec<&'a str> {
    let mut names: Vec<&str> = Vec::new();
    let mut seen = std::collections::HashSet::new();
    for name in before.chain(after) {
        if seen.insert(name) {
            names.push(name);
        }
    }
    names
}

fn render_sides(processed: Option<&ProcessedCapture>) -> HashMap<&str, RenderSide> {
    processed
        .map(|p| p.component_stats.as_slice())
        .unwrap_or_default()
        .iter()
        .map(|s| {
            (
                s.name.as_str(),
                RenderSide {
                    renders: s.render_count,
                    duration: s.total_duration,
                },
            )
        })
        .collect()
}

fn rerender_sides(processed: Option<&ProcessedCapture>) -> HashMap<&str, RerenderSide> {
    processed
        .map(|p| p.rerender_causes.as_slice())
        .unwrap_or_default()
        .iter()
        .map(|c| {
            (
                c.name.as_str(),
                RerenderSide {
                    total: c.total_rerenders,
                    causes: c.causes,
                },
            )
        })
        .collect()
}

/// Merge component statistics of both captures by name. Either side may be
/// missing; its counts read as zero.
pub fn compare_components(
    before: Option<&ProcessedCapture>,
    after: Option<&ProcessedCapture>,
) -> Vec<ComponentComparison> {
    let (before_map, after_map) = (render_sides(before), render_sides(after));

    let names = union_names(
        before.into_iter().flat_map(|p| p.component_stats.iter().map(|s| s.name.as_str())),
        after.into_iter().flat_map(|p| p.component_stats.iter().map(|s| s.name.as_str())),
    );

    names
        .into_iter()
        .map(|name| {
            let b = before_map.get(name).copied().unwrap_or_default();
            let a = after_map.get(name).copied().unwrap_or_default();
            ComponentComparison {
                name: name.to_string(),
                diff: i64::from(a.renders) - i64::from(b.renders),
                percent_change: percent_change(f64::from(b.renders), f64::from(a.renders)),
                before: b,
                after: a,
            }
        })
        .collect()
}

/// Merge re-render causes of both captures by name.
pub fn compare_rerenders(
    before: Option<&ProcessedCapture>,
    after: Option<&ProcessedCapture>,
) -> Vec<RerenderComparison> {
    let (before_map, after_map) = (rerender_sides(before), rerender_sides(after));

    let names = union_names(
        before.into_iter().flat_map(|p| p.rerender_causes.iter().map(|c| c.name.as_str())),
        after.into_iter().flat_map(|p| p.rerender_causes.iter().map(|c| c.name.as_str())),
    );

    names
        .into_iter()
        .map(|name| {
            let b = before_map.get(name).copied().unwrap_or_default();
            let a = after_map.get(name).copied().unwrap_or_default();
            RerenderComparison {
                name: name.to_string(),
                diff: i64::from(a.total) - i64::from(b.total),
                percent_change: percent_change(f64::from(b.total), f64::from(a.total)),
                before: b,
                after: a,
            }
        })
        .collect()
}

/// Tree paths per name, merged from both captures without duplicates.
pub fn merge_paths(
    before: Option<&ProcessedCapture>,
    after: Option<&ProcessedCapture>,
) -> Vec<ComponentPaths> {
    let mut merged: Vec<ComponentPaths> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for entry in [before, after]
        .into_iter()
        .flatten()
        .flat_map(|p| &p.component_paths)
    {
        let slot = *index.entry(entry.name.clone()).or_insert_with(|| {
            merged.push(ComponentPaths {
                name: entry.name.clone(),
                paths: Vec::new(),
            });
            merged.len() - 1
        });
        let target = &mut merged[slot].paths;
        for path in &entry.paths {
            if !target.contains(path) {
                target.push(path.clone());
            }
        }
    }

    merged
}

/// One scalar compared across captures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricDelta {
    pub before: f64,
    pub after: f64,
    pub diff: f64,
    pub percent: f64,
}

impl MetricDelta {
    pub fn new(before: f64, after: f64) -> Self {
        Self {
            before,
            after,
            diff: after - before,
            percent: percent_change(before, after),
        }
    }

    /// Lower is better for every metric the dashboard tracks.
    pub fn improved(&self) -> bool {
        self.diff < 0.0
    }
}

/// Headline numbers of a before/after comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryDelta {
    pub renders: MetricDelta,
    pub duration: MetricDelta,
    pub commits: MetricDelta,
    /// Renders that no longer happen; never negative.
    pub renders_avoided: usize,
}

impl SummaryDelta {
    pub fn between(before: &ProcessedCapture, after: &ProcessedCapture) -> Self {
        Self {
            renders: MetricDelta::new(before.total_renders as f64, after.total_renders as f64),
            duration: MetricDelta::new(before.total_duration, after.total_duration),
            commits: MetricDelta::new(before.total_commits as f64, after.total_commits as f64),
            renders_avoided: before.total_renders.saturating_sub(after.total_renders),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricUnit {
    Count,
    Milliseconds,
}

/// A headline card in the overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewMetric {
    pub label: &'static str,
    pub value: f64,
    pub unit: MetricUnit,
    /// Percent change against the baseline capture, when there is one and
    /// its value is non-zero.
    pub change: Option<f64>,
}

/// Headline metrics for `current`, each compared against `baseline`.
pub fn overview_metrics(
    current: &ProcessedCapture,
    baseline: Option<&ProcessedCapture>,
) -> Vec<OverviewMetric> {
    let metric = |label: &'static str, unit: MetricUnit, pick: fn(&ProcessedCapture) -> f64| {
        OverviewMetric {
            label,
            value: pick(current),
            unit,
            change: baseline.and_then(|b| relative_change(pick(current), pick(b))),
        }
    };

    vec![
        metric("Total Commits", MetricUnit::Count, |p| p.total_commits as f64),
        metric("Total Renders", MetricUnit::Count, |p| p.total_renders as f64),
        metric("Total Duration", MetricUnit::Milliseconds, |p| p.total_duration),
        metric("Unique Components", MetricUnit::Count, |p| {
            p.unique_components() as f64
        }),
        metric(
            "Avg Commit Duration",
            MetricUnit::Milliseconds,
            ProcessedCapture::average_commit_duration,
        ),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingCount {
    pub name: String,
    pub count: usize,
}

/// Count the first `window` scheduling events per component and keep the
/// `top` busiest components.
pub fn scheduling_counts(
    processed: &ProcessedCapture,
    window: usize,
    top: usize,
) -> Vec<SchedulingCount> {
    let mut counts: Vec<SchedulingCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for event in processed.scheduling_events.iter().take(window) {
        let name = event.name();
        let slot = *index.entry(name).or_insert_with(|| {
            counts.push(SchedulingCount {
                name: name.to_string(),
                count: 0,
            });
            counts.len() - 1
        });
        counts[slot].count += 1;
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| name_order(&a.name, &b.name)));
    counts.truncate(top);
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SchedulingEvent;

    fn stat(name: &str, renders: u32, duration: f64) -> ComponentStat {
        ComponentStat {
            render_count: renders,
            total_duration: duration,
            ..ComponentStat::new(name)
        }
    }

    fn cause(name: &str, total: u32, causes: CauseCounts) -> RerenderCause {
        RerenderCause {
            causes,
            total_rerenders: total,
            ..RerenderCause::new(name)
        }
    }

    fn processed(stats: Vec<ComponentStat>) -> ProcessedCapture {
        ProcessedCapture {
            component_stats: stats,
            ..ProcessedCapture::default()
        }
    }

    #[test]
    fn percent_change_guards_zero_baseline() {
        assert_eq!(percent_change(0.0, 5.0), 100.0);
        assert_eq!(percent_change(0.0, 0.0), 0.0);
        assert_eq!(percent_change(10.0, 5.0), -50.0);
        assert_eq!(percent_change(4.0, 6.0), 50.0);
    }

    #[test]
    fn relative_change_needs_a_baseline() {
        assert_eq!(relative_change(5.0, 0.0), None);
        assert_eq!(relative_change(5.0, 10.0), Some(-50.0));
    }

    #[test]
    fn merge_defaults_missing_side_to_zero() {
        let before = processed(vec![stat("List", 10, 20.0), stat("Gone", 3, 1.0)]);
        let after = processed(vec![stat("List", 4, 6.0), stat("New", 2, 0.5)]);

        let rows = compare_components(Some(&before), Some(&after));
        let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["List", "Gone", "New"]);

        assert_eq!(rows[0].diff, -6);
        assert_eq!(rows[0].percent_change, -60.0);
        assert_eq!(rows[1].after, RenderSide::default());
        assert_eq!(rows[1].percent_change, -100.0);
        assert_eq!(rows[2].before, RenderSide::default());
        assert_eq!(rows[2].percent_change, 100.0);
        assert_eq!(rows[2].max_renders(), 2);
    }

    #[test]
    fn merge_with_one_side_absent() {
        let after = processed(vec![stat("Only", 1, 1.0)]);
        let rows = compare_components(None, Some(&after));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].diff, 1);
        assert!(compare_components(None, None).is_empty());
    }

    #[test]
    fn rank_by_each_key() {
        let before = processed(vec![
            stat("alpha", 5, 1.0),
            stat("Beta", 1, 9.0),
            stat("gamma", 3, 3.0),
        ]);
        let after = processed(vec![
            stat("alpha", 1, 1.0),
            stat("Beta", 4, 9.0),
            stat("gamma", 3, 3.0),
        ]);
        let rows = compare_components(Some(&before), Some(&after));
        let order = |sort| -> Vec<String> {
            let query = RankQuery {
                sort,
                ..RankQuery::default()
            };
            rank(rows.iter(), &query).iter().map(|r| r.name.clone()).collect()
        };

        assert_eq!(order(SortKey::Renders), vec!["alpha", "Beta", "gamma"]);
        assert_eq!(order(SortKey::Duration), vec!["Beta", "gamma", "alpha"]);
        assert_eq!(order(SortKey::Improvement), vec!["alpha", "gamma", "Beta"]);
        assert_eq!(order(SortKey::Name), vec!["alpha", "Beta", "gamma"]);
    }

    #[test]
    fn ties_break_by_name() {
        let stats = vec![stat("Zed", 2, 1.0), stat("amy", 2, 1.0), stat("Bob", 2, 1.0)];
        let ranked = rank(stats.iter(), &RankQuery::default());
        let names: Vec<_> = ranked.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["amy", "Bob", "Zed"]);
    }

    #[test]
    fn filter_is_case_insensitive_and_limit_applies() {
        let stats: Vec<_> = (0..150).map(|i| stat(&format!("Row{i}"), i, 0.0)).collect();
        let query = RankQuery {
            filter: "row1".into(),
            ..RankQuery::default()
        };
        let ranked = rank(stats.iter(), &query);
        // Row1, Row10..Row19, Row100..Row149
        assert_eq!(ranked.len(), 61);
        assert_eq!(ranked[0].name, "Row149");

        let limited = rank(stats.iter(), &RankQuery::default());
        assert_eq!(limited.len(), 100);

        let unlimited = rank(
            stats.iter(),
            &RankQuery {
                limit: None,
                ..RankQuery::default()
            },
        );
        assert_eq!(unlimited.len(), 150);
    }

    #[test]
    fn single_capture_improvement_falls_back_to_name() {
        let stats = vec![stat("b", 9, 0.0), stat("a", 1, 0.0)];
        let query = RankQuery {
            sort: SortKey::Improvement,
            ..RankQuery::default()
        };
        let names: Vec<_> = rank_component_stats(&stats, &query)
            .iter()
            .map(|s| s.name.clone())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn rerender_merge() {
        let mount = CauseCounts {
            mount: 1,
            ..CauseCounts::default()
        };
        let before = ProcessedCapture {
            rerender_causes: vec![cause("Button", 4, mount)],
            ..ProcessedCapture::default()
        };
        let after = ProcessedCapture {
            rerender_causes: vec![cause("Button", 1, mount), cause("Modal", 2, mount)],
            ..ProcessedCapture::default()
        };
        let rows = compare_rerenders(Some(&before), Some(&after));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].diff, -3);
        assert_eq!(rows[0].percent_change, -75.0);
        assert_eq!(rows[1].before.total, 0);
        assert_eq!(rows[1].after.causes.mount, 1);

        let ranked = rank(rows.iter(), &RankQuery::default());
        assert_eq!(ranked[0].name, "Button");

        let single = rank_rerender_causes(&after.rerender_causes, &RankQuery::default());
        let names: Vec<_> = single.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Modal", "Button"]);
    }

    #[test]
    fn summary_delta() {
        let before = ProcessedCapture {
            total_renders: 10,
            total_duration: 50.0,
            total_commits: 4,
            ..ProcessedCapture::default()
        };
        let after = ProcessedCapture {
            total_renders: 12,
            total_duration: 25.0,
            total_commits: 4,
            ..ProcessedCapture::default()
        };
        let delta = SummaryDelta::between(&before, &after);
        assert_eq!(delta.renders.percent, 20.0);
        assert!(!delta.renders.improved());
        assert_eq!(delta.duration.percent, -50.0);
        assert!(delta.duration.improved());
        assert_eq!(delta.commits.percent, 0.0);
        assert_eq!(delta.renders_avoided, 0);
        assert_eq!(SummaryDelta::between(&after, &before).renders_avoided, 2);
    }

    #[test]
    fn merged_paths_dedupe_across_captures() {
        let before = ProcessedCapture {
            component_paths: vec![ComponentPaths {
                name: "Item".into(),
                paths: vec!["App > Item".into()],
            }],
            ..ProcessedCapture::default()
        };
        let after = ProcessedCapture {
            component_paths: vec![ComponentPaths {
                name: "Item".into(),
                paths: vec!["App > Item".into(), "App > List > Item".into()],
            }],
            ..ProcessedCapture::default()
        };
        let merged = merge_paths(Some(&before), Some(&after));
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].paths, vec!["App > Item", "App > List > Item"]);
    }

    #[test]
    fn overview_changes_only_with_nonzero_baseline() {
        let current = ProcessedCapture {
            total_commits: 5,
            total_duration: 10.0,
            ..ProcessedCapture::default()
        };
        let baseline = ProcessedCapture {
            total_commits: 10,
            ..ProcessedCapture::default()
        };
        let metrics = overview_metrics(&current, Some(&baseline));
        assert_eq!(metrics[0].label, "Total Commits");
        assert_eq!(metrics[0].change, Some(-50.0));
        assert_eq!(metrics[2].change, None);
        assert!((metrics[4].value - 2.0).abs() < f64::EPSILON);
        assert!(overview_metrics(&current, None).iter().all(|m| m.change.is_none()));
    }

    #[test]
    fn scheduling_counts_window_and_top() {
        let event = |name: Option<&str>| SchedulingEvent {
            component_name: name.map(str::to_string),
            kind: None,
            timestamp: None,
        };
        let mut events = vec![event(Some("A")), event(None), event(Some("B")), event(Some("B"))];
        events.push(event(Some("C")));
        let processed = ProcessedCapture {
            scheduling_events: events,
            ..ProcessedCapture::default()
        };

        let counts = scheduling_counts(&processed, 4, 2);
        assert_eq!(
            counts,
            vec![
                SchedulingCount {
                    name: "B".into(),
                    count: 2
                },
                SchedulingCount {
                    name: "A".into(),
                    count: 1
                },
            ]
        );
        let all = scheduling_counts(&processed, 500, 20);
        assert!(all.iter().any(|c| c.name == "Unknown"));
        assert_eq!(all.len(), 4);
    }

    #[test]
    fn sort_key_parsing_and_cycling() {
        assert_eq!("Duration".parse::<SortKey>().ok(), Some(SortKey::Duration));
        assert!("speed".parse::<SortKey>().is_err());
        assert_eq!(SortKey::Name.next(), SortKey::Renders);
        assert_eq!(SortKey::Renders.next(), SortKey::Duration);
    }
}
