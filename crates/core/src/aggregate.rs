//! One-pass aggregation of a raw capture into dashboard statistics.
//!
//! Everything is keyed by display name: the same component rendered at
//! several places in the tree folds into a single record.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::model::{
    Capture, CaptureRoot, CauseCounts, CommitSummary, ComponentInfo, ComponentMeasure,
    ComponentPaths, ComponentStat, ProcessedCapture, RerenderCause, TreeReport,
};

/// Tunables for [`aggregate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateOptions {
    /// Maximum number of nodes visited when walking from a component up to
    /// the root.
    pub max_path_depth: usize,
    /// Joins display names in a tree path.
    pub path_separator: String,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            max_path_depth: 15,
            path_separator: " > ".to_string(),
        }
    }
}

/// Aggregate a capture into per-component statistics.
///
/// Only the first root and the first timeline are read. An export without a
/// root (which the parser already rejects) aggregates to an empty result.
pub fn aggregate(capture: &Capture, options: &AggregateOptions) -> ProcessedCapture {
    let Some(root) = capture.root() else {
        return ProcessedCapture::default();
    };
    let timeline = capture.timeline();

    let components = component_map(root);
    let mut tree = TreeReport::default();
    let parents = parent_map(root, &mut tree);
    let component_paths = component_paths(root, &components, &parents, options, &mut tree);

    let measures = timeline
        .and_then(|t| t.component_measures.as_deref())
        .unwrap_or_default();

    let mut rerenders = Folder::default();
    let mut global_causes = CauseCounts::default();
    for commit in &root.commit_data {
        for (id, desc) in commit.change_descriptions.iter().flatten() {
            let name = resolve_name(&components, *id);
            let record = rerenders.entry(&name, RerenderCause::new);
            record.total_rerenders += 1;

            if desc.first_mount() {
                record.causes.mount += 1;
                global_causes.mount += 1;
                continue;
            }
            if desc.hooks_changed() {
                record.causes.hooks += 1;
                global_causes.hooks += 1;
            }
            if desc.props_changed() {
                record.causes.props += 1;
                global_causes.props += 1;
            }
            if desc.state_changed() {
                record.causes.state += 1;
                global_causes.state += 1;
            }
            if desc.context_changed() {
                record.causes.context += 1;
                global_causes.context += 1;
            }
        }
    }

    let rerender_causes = rerenders.into_items();
    let component_stats = component_stats(measures, &rerender_causes);

    let commits: Vec<CommitSummary> = root
        .commit_data
        .iter()
        .enumerate()
        .map(|(index, c)| CommitSummary {
            index,
            duration: c.duration,
            effect_duration: c.effect_duration,
            timestamp: c.timestamp,
        })
        .collect();

    // Zero counts as absent, like a falsy duration.
    let total_duration = timeline
        .and_then(|t| t.duration)
        .filter(|d| *d != 0.0 && !d.is_nan())
        .unwrap_or_else(|| commits.iter().map(|c| c.duration).sum());

    let scheduling_events = timeline
        .and_then(|t| t.scheduling_events.clone())
        .unwrap_or_default();

    if !tree.is_clean() {
        warn!(
            multi_parent = tree.multi_parent.len(),
            cycles = tree.cycles.len(),
            "component tree is not a proper tree"
        );
    }

    let processed = ProcessedCapture {
        components,
        component_stats,
        rerender_causes,
        global_causes,
        total_commits: commits.len(),
        commits,
        scheduling_events,
        component_paths,
        tree,
        total_duration,
        total_renders: measures.len(),
    };

    debug!(
        components = processed.components.len(),
        stats = processed.component_stats.len(),
        rerenders = processed.rerender_causes.len(),
        commits = processed.total_commits,
        renders = processed.total_renders,
        "aggregated capture"
    );

    processed
}

/// Insertion-ordered accumulator keyed by display name.
struct Folder<T> {
    index: HashMap<String, usize>,
    items: Vec<T>,
}

impl<T> Default for Folder<T> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            items: Vec::new(),
        }
    }
}

impl<T> Folder<T> {
    fn entry(&mut self, name: &str, make: impl FnOnce(&str) -> T) -> &mut T {
        let slot = match self.index.get(name) {
            Some(&slot) => slot,
            None => {
                self.items.push(make(name));
                self.index.insert(name.to_string(), self.items.len() - 1);
                self.items.len() - 1
            }
        };
        &mut self.items[slot]
    }

    fn into_items(self) -> Vec<T> {
        self.items
    }
}

fn component_map(root: &CaptureRoot) -> BTreeMap<u64, ComponentInfo> {
    root.snapshots
        .iter()
        .map(|(id, node)| {
            (
                *id,
                ComponentInfo {
                    id: *id,
                    display_name: node.display_name.clone(),
                    children: node.children.clone().unwrap_or_default(),
                },
            )
        })
        .collect()
}

/// Invert the children lists. Last writer wins when a child is claimed twice.
fn parent_map(root: &CaptureRoot, tree: &mut TreeReport) -> HashMap<u64, u64> {
    let mut parents = HashMap::new();
    for (id, node) in &root.snapshots {
        for &child in node.children.iter().flatten() {
            if let Some(previous) = parents.insert(child, *id)
                && previous != *id
                && !tree.multi_parent.contains(&child)
            {
                tree.multi_parent.push(child);
            }
        }
    }
    parents
}

fn named(components: &BTreeMap<u64, ComponentInfo>, id: u64) -> Option<&str> {
    components
        .get(&id)
        .and_then(|c| c.display_name.as_deref())
        .filter(|n| !n.is_empty())
}

fn resolve_name(components: &BTreeMap<u64, ComponentInfo>, id: u64) -> String {
    named(components, id).map_or_else(|| format!("Component#{id}"), str::to_string)
}

/// Display names from `id` up to the root, root first.
///
/// Nameless nodes still count toward `max_depth`. A repeated node ends the
/// walk and flags `id` as cyclic.
fn path_to_root(
    id: u64,
    components: &BTreeMap<u64, ComponentInfo>,
    parents: &HashMap<u64, u64>,
    max_depth: usize,
    tree: &mut TreeReport,
) -> Vec<String> {
    let mut path = Vec::new();
    let mut seen = HashSet::new();
    let mut current = Some(id);

    while let Some(node) = current {
        if seen.len() >= max_depth {
            break;
        }
        if !seen.insert(node) {
            if !tree.cycles.contains(&id) {
                tree.cycles.push(id);
            }
            break;
        }
        if let Some(name) = named(components, node) {
            path.push(name.to_string());
        }
        current = parents.get(&node).copied();
    }

    path.reverse();
    path
}

fn component_paths(
    root: &CaptureRoot,
    components: &BTreeMap<u64, ComponentInfo>,
    parents: &HashMap<u64, u64>,
    options: &AggregateOptions,
    tree: &mut TreeReport,
) -> Vec<ComponentPaths> {
    let mut paths: Folder<ComponentPaths> = Folder::default();

    for (id, _) in &root.snapshots {
        let Some(name) = named(components, *id) else {
            continue;
        };
        let path = path_to_root(*id, components, parents, options.max_path_depth, tree);
        if path.len() <= 1 {
            continue;
        }
        let joined = path.join(&options.path_separator);
        let entry = paths.entry(name, |n| ComponentPaths {
            name: n.to_string(),
            paths: Vec::new(),
        });
        if !entry.paths.contains(&joined) {
            entry.paths.push(joined);
        }
    }

    paths.into_items()
}

/// Fold timeline measures by name. Mounts are taken from the first-mount
/// change descriptions, not from effect measures.
fn component_stats(
    measures: &[ComponentMeasure],
    causes: &[RerenderCause],
) -> Vec<ComponentStat> {
    let mut stats: Folder<ComponentStat> = Folder::default();
    for measure in measures {
        let stat = stats.entry(measure.name(), ComponentStat::new);
        stat.render_count += 1;
        stat.total_duration += measure.duration;
        if measure.kind.is_update() {
            stat.updates += 1;
        }
    }
    let mounts: HashMap<&str, u32> = causes
        .iter()
        .map(|c| (c.name.as_str(), c.causes.mount))
        .collect();
    let mut stats = stats.into_items();
    for stat in &mut stats {
        stat.mounts = mounts.get(stat.name.as_str()).copied().unwrap_or(0);
    }
    stats
}
