use serde::{Deserialize, Serialize};

/// Semantic color tokens resolved by the renderer's active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    Background,
    Surface,
    Border,

    TextPrimary,
    TextSecondary,
    TextMuted,

    // Tables
    TableRowEven,
    TableRowOdd,
    TableHeaderBackground,
    TableBorder,
    BarFill,

    // Metric cards
    CardBackground,
    CardBorder,

    // Before/after series
    BeforeSeries,
    AfterSeries,

    // Signed deltas: lower is better for every metric we compare.
    DiffImproved,
    DiffRegressed,
    DiffNeutral,

    // Re-render causes
    CauseHooks,
    CauseProps,
    CauseState,
    CauseContext,
    CauseMount,

    // Charts
    ChartGrid,
    ChartAxisText,
}
