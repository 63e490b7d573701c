//! Raw React DevTools profiler export, as read from disk.
//!
//! Field names follow the export format exactly. Everything the aggregator
//! can live without is an `Option` or `#[serde(default)]` so that partial
//! exports degrade to empty values instead of failing to parse.

use serde::{Deserialize, Serialize};

/// One profiler export ("capture").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capture {
    #[serde(rename = "dataForRoots")]
    pub data_for_roots: Vec<CaptureRoot>,
    #[serde(default, rename = "timelineData")]
    pub timeline_data: Option<Vec<Timeline>>,
}

impl Capture {
    /// The root the dashboard analyses. Exports with several roots only have
    /// their first one considered.
    pub fn root(&self) -> Option<&CaptureRoot> {
        self.data_for_roots.first()
    }

    /// The first timeline, if the export was recorded with timeline data.
    pub fn timeline(&self) -> Option<&Timeline> {
        self.timeline_data.as_ref().and_then(|t| t.first())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureRoot {
    /// Component tree snapshot, `Map<id, SnapshotNode>` exported as tuples.
    #[serde(default)]
    pub snapshots: Vec<(u64, SnapshotNode)>,
    #[serde(default, rename = "commitData")]
    pub commit_data: Vec<Commit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotNode {
    #[serde(default, rename = "displayName")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub children: Option<Vec<u64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commit {
    #[serde(default)]
    pub duration: f64,
    #[serde(default, rename = "effectDuration")]
    pub effect_duration: Option<f64>,
    #[serde(default)]
    pub timestamp: f64,
    #[serde(default, rename = "changeDescriptions")]
    pub change_descriptions: Option<Vec<(u64, ChangeDescription)>>,
}

/// What changed for one component in one commit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeDescription {
    #[serde(default, rename = "isFirstMount")]
    pub is_first_mount: Option<bool>,
    #[serde(default, rename = "didHooksChange")]
    pub did_hooks_change: Option<bool>,
    /// Names of the props that changed.
    #[serde(default)]
    pub props: Option<Vec<String>>,
    /// Changed state keys; any non-null value counts as a state change.
    #[serde(default)]
    pub state: Option<serde_json::Value>,
    /// `true`, `false`, `null` or a list of changed context keys.
    #[serde(default)]
    pub context: Option<serde_json::Value>,
}

impl ChangeDescription {
    pub fn first_mount(&self) -> bool {
        self.is_first_mount.unwrap_or(false)
    }

    pub fn hooks_changed(&self) -> bool {
        self.did_hooks_change.unwrap_or(false)
    }

    pub fn props_changed(&self) -> bool {
        self.props.as_ref().is_some_and(|p| !p.is_empty())
    }

    pub fn state_changed(&self) -> bool {
        self.state.as_ref().is_some_and(|s| !s.is_null())
    }

    pub fn context_changed(&self) -> bool {
        self.context.as_ref().is_some_and(is_truthy)
    }
}

/// JavaScript truthiness, which is what the export's producers assume when
/// they write `context` as either a flag or a key list.
fn is_truthy(value: &serde_json::Value) -> bool {
    use serde_json::Value;
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default, rename = "componentMeasures")]
    pub component_measures: Option<Vec<ComponentMeasure>>,
    #[serde(default, rename = "schedulingEvents")]
    pub scheduling_events: Option<Vec<SchedulingEvent>>,
}

/// Label for timeline entries that carry no component name.
pub const UNKNOWN_COMPONENT: &str = "Unknown";

/// One component render or effect recorded on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentMeasure {
    #[serde(default, rename = "componentName")]
    pub component_name: Option<String>,
    #[serde(default)]
    pub duration: f64,
    #[serde(default, rename = "type")]
    pub kind: MeasureKind,
    #[serde(default)]
    pub timestamp: Option<f64>,
}

/// The `type` of a component measure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MeasureKind {
    Render,
    LayoutEffectMount,
    LayoutEffectUnmount,
    PassiveEffectMount,
    PassiveEffectUnmount,
    #[default]
    #[serde(other)]
    Other,
}

impl ComponentMeasure {
    pub fn name(&self) -> &str {
        named_or_unknown(self.component_name.as_deref())
    }
}

impl MeasureKind {
    pub fn is_update(&self) -> bool {
        matches!(self, Self::Render)
    }
}

/// A scheduling occurrence (state update, forced update, ...) attributed to
/// a component. Only the fields the dashboard reads are typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulingEvent {
    #[serde(default, rename = "componentName")]
    pub component_name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub timestamp: Option<f64>,
}

impl SchedulingEvent {
    pub fn name(&self) -> &str {
        named_or_unknown(self.component_name.as_deref())
    }
}

fn named_or_unknown(name: Option<&str>) -> &str {
    name.filter(|n| !n.is_empty()).unwrap_or(UNKNOWN_COMPONENT)
}
