pub mod capture;
pub mod processed;
pub mod session;

pub use capture::{
    Capture, CaptureRoot, ChangeDescription, Commit, ComponentMeasure, MeasureKind,
    SchedulingEvent, SnapshotNode, Timeline, UNKNOWN_COMPONENT,
};
pub use processed::{
    Cause, CauseCounts, CommitSummary, ComponentInfo, ComponentPaths, ComponentStat,
    ProcessedCapture, RerenderCause, TreeReport,
};
pub use session::{Session, Slot, SlotEntry, SlotStatus, UnknownSlot};
