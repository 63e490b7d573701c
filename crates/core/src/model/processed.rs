use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::capture::SchedulingEvent;

/// Static info about one component instance in the tree snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentInfo {
    pub id: u64,
    pub display_name: Option<String>,
    pub children: Vec<u64>,
}

/// Timeline statistics for every component sharing a display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentStat {
    pub name: String,
    pub render_count: u32,
    /// Summed measure duration in milliseconds.
    pub total_duration: f64,
    pub mounts: u32,
    pub updates: u32,
}

impl ComponentStat {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            render_count: 0,
            total_duration: 0.0,
            mounts: 0,
            updates: 0,
        }
    }
}

/// Tally of why components re-rendered.
///
/// `mount` never overlaps with the other four for a single change
/// description; the other four may all fire at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CauseCounts {
    pub hooks: u32,
    pub props: u32,
    pub state: u32,
    pub context: u32,
    pub mount: u32,
}

impl CauseCounts {
    /// `(label, count)` pairs in display order.
    pub fn labelled(&self) -> [(Cause, u32); 5] {
        [
            (Cause::Hooks, self.hooks),
            (Cause::Props, self.props),
            (Cause::State, self.state),
            (Cause::Context, self.context),
            (Cause::Mount, self.mount),
        ]
    }

    pub fn total(&self) -> u32 {
        self.hooks + self.props + self.state + self.context + self.mount
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cause {
    Hooks,
    Props,
    State,
    Context,
    Mount,
}

impl std::fmt::Display for Cause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hooks => write!(f, "Hooks"),
            Self::Props => write!(f, "Props"),
            Self::State => write!(f, "State"),
            Self::Context => write!(f, "Context"),
            Self::Mount => write!(f, "Mount"),
        }
    }
}

/// Re-render attribution for every component sharing a display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RerenderCause {
    pub name: String,
    pub causes: CauseCounts,
    pub total_rerenders: u32,
}

impl RerenderCause {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            causes: CauseCounts::default(),
            total_rerenders: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitSummary {
    pub index: usize,
    pub duration: f64,
    pub effect_duration: Option<f64>,
    pub timestamp: f64,
}

/// Every distinct root-to-node path a display name occurs at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentPaths {
    pub name: String,
    pub paths: Vec<String>,
}

/// Structural problems found while inverting the snapshot tree.
///
/// Neither is fatal: a child with two parents keeps the last one listed, and
/// a cyclic walk stops at the first repeated node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeReport {
    /// Child ids listed under more than one parent.
    pub multi_parent: Vec<u64>,
    /// Ids whose upward walk revisited a node.
    pub cycles: Vec<u64>,
}

impl TreeReport {
    pub fn is_clean(&self) -> bool {
        self.multi_parent.is_empty() && self.cycles.is_empty()
    }
}

/// Everything the dashboard shows about one capture.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessedCapture {
    pub components: BTreeMap<u64, ComponentInfo>,
    pub component_stats: Vec<ComponentStat>,
    pub rerender_causes: Vec<RerenderCause>,
    pub global_causes: CauseCounts,
    pub commits: Vec<CommitSummary>,
    pub scheduling_events: Vec<SchedulingEvent>,
    pub component_paths: Vec<ComponentPaths>,
    pub tree: TreeReport,
    /// Milliseconds.
    pub total_duration: f64,
    pub total_commits: usize,
    pub total_renders: usize,
}

impl ProcessedCapture {
    pub fn component_stat(&self, name: &str) -> Option<&ComponentStat> {
        self.component_stats.iter().find(|s| s.name == name)
    }

    pub fn rerender_cause(&self, name: &str) -> Option<&RerenderCause> {
        self.rerender_causes.iter().find(|c| c.name == name)
    }

    /// Tree paths recorded for `name`, empty when it only appears as a root.
    pub fn paths_for(&self, name: &str) -> &[String] {
        self.component_paths
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.paths.as_slice())
            .unwrap_or_default()
    }

    pub fn unique_components(&self) -> usize {
        self.component_stats.len()
    }

    pub fn average_commit_duration(&self) -> f64 {
        if self.total_commits == 0 {
            0.0
        } else {
            self.total_duration / self.total_commits as f64
        }
    }
}
