use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::aggregate::{AggregateOptions, aggregate};
use crate::parsers::{ParseError, parse_capture};

use super::ProcessedCapture;

/// One of the two capture positions being compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Before,
    After,
}

impl Slot {
    pub const ALL: [Slot; 2] = [Slot::Before, Slot::After];

    fn index(self) -> usize {
        match self {
            Self::Before => 0,
            Self::After => 1,
        }
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Before => write!(f, "before"),
            Self::After => write!(f, "after"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown slot {0:?} (expected \"before\" or \"after\")")]
pub struct UnknownSlot(pub String);

impl std::str::FromStr for Slot {
    type Err = UnknownSlot;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "before" => Ok(Self::Before),
            "after" => Ok(Self::After),
            _ => Err(UnknownSlot(s.to_string())),
        }
    }
}

/// What the user last saw happen to a slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SlotStatus {
    Empty,
    Loaded { source: String },
    /// The last load failed. Whatever the slot held before is still there.
    Failed { source: String, message: String },
}

impl std::fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "no capture loaded"),
            Self::Loaded { source } => write!(f, "loaded: {source}"),
            Self::Failed { source, message } => write!(f, "error in {source}: {message}"),
        }
    }
}

/// An aggregated capture together with where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotEntry {
    pub source: String,
    pub processed: ProcessedCapture,
}

/// The before/after comparison state.
///
/// Each slot is replaced wholesale: a load parses and aggregates first and
/// only then swaps the new capture in, so a failed load never leaves a slot
/// half-updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    slots: [Option<SlotEntry>; 2],
    status: [SlotStatus; 2],
    options: AggregateOptions,
}

impl Session {
    /// Create a new empty session.
    pub fn new(options: AggregateOptions) -> Self {
        Self {
            slots: [None, None],
            status: [SlotStatus::Empty, SlotStatus::Empty],
            options,
        }
    }

    pub fn options(&self) -> &AggregateOptions {
        &self.options
    }

    /// Parse and aggregate `data` into `slot`.
    ///
    /// On failure the slot keeps its previous capture and only its status
    /// changes.
    pub fn load(
        &mut self,
        slot: Slot,
        data: &[u8],
        source: impl Into<String>,
    ) -> Result<&ProcessedCapture, ParseError> {
        let source = source.into();
        let capture = match parse_capture(data) {
            Ok(capture) => capture,
            Err(err) => {
                warn!(%slot, %source, error = %err, "failed to load capture");
                self.status[slot.index()] = SlotStatus::Failed {
                    source,
                    message: err.to_string(),
                };
                return Err(err);
            }
        };

        let processed = aggregate(&capture, &self.options);
        info!(
            %slot,
            %source,
            commits = processed.total_commits,
            renders = processed.total_renders,
            "loaded capture"
        );
        Ok(self.insert(slot, processed, source))
    }

    /// Put an already-aggregated capture into `slot`.
    pub fn insert(
        &mut self,
        slot: Slot,
        processed: ProcessedCapture,
        source: impl Into<String>,
    ) -> &ProcessedCapture {
        let source = source.into();
        self.status[slot.index()] = SlotStatus::Loaded {
            source: source.clone(),
        };
        let entry = self.slots[slot.index()].insert(SlotEntry { source, processed });
        &entry.processed
    }

    pub fn clear(&mut self, slot: Slot) {
        self.slots[slot.index()] = None;
        self.status[slot.index()] = SlotStatus::Empty;
    }

    pub fn get(&self, slot: Slot) -> Option<&ProcessedCapture> {
        self.slots[slot.index()].as_ref().map(|e| &e.processed)
    }

    pub fn entry(&self, slot: Slot) -> Option<&SlotEntry> {
        self.slots[slot.index()].as_ref()
    }

    pub fn status(&self, slot: Slot) -> &SlotStatus {
        &self.status[slot.index()]
    }

    pub fn before(&self) -> Option<&ProcessedCapture> {
        self.get(Slot::Before)
    }

    pub fn after(&self) -> Option<&ProcessedCapture> {
        self.get(Slot::After)
    }

    /// Both captures, when a comparison is possible.
    pub fn pair(&self) -> Option<(&ProcessedCapture, &ProcessedCapture)> {
        self.before().zip(self.after())
    }

    /// The capture single-capture views describe: "after" when loaded,
    /// otherwise "before".
    pub fn current(&self) -> Option<&ProcessedCapture> {
        self.after().or_else(|| self.before())
    }

    /// What `current` is measured against, if anything.
    pub fn baseline(&self) -> Option<&ProcessedCapture> {
        self.after().and(self.before())
    }

    pub fn has_any(&self) -> bool {
        self.slots.iter().any(Option::is_some)
    }

    pub fn has_both(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(AggregateOptions::default())
    }
}
