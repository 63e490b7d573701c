//! Non-interactive output: JSON and text reports, and SVG export.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};
use profdiff_core::compare::{
    ComponentComparison, OverviewMetric, RerenderComparison, SummaryDelta, compare_components,
    compare_rerenders, overview_metrics, rank, rank_component_stats, rank_rerender_causes,
};
use profdiff_core::model::{
    CauseCounts, ComponentStat, RerenderCause, Session, Slot, TreeReport,
};
use profdiff_core::svg::render_svg;
use profdiff_core::views::format::{
    format_metric, format_ms, format_percent, format_signed, truncate,
};
use profdiff_core::views::{ViewKind, ViewState, content_height, render_view};
use profdiff_protocol::Viewport;
use serde::Serialize;
use tracing::info;

const NAME_WIDTH: usize = 32;

#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub captures: Vec<CaptureReport<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<SummaryDelta>,
    pub components: ComponentRows<'a>,
    pub rerenders: RerenderRows<'a>,
}

#[derive(Debug, Serialize)]
pub struct CaptureReport<'a> {
    pub slot: Slot,
    pub source: &'a str,
    pub metrics: Vec<OverviewMetric>,
    pub causes: CauseCounts,
    pub tree: &'a TreeReport,
}

/// Merged rows when both captures are loaded, otherwise the rows of the one
/// that is.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ComponentRows<'a> {
    Compared(Vec<ComponentComparison>),
    Single(Vec<&'a ComponentStat>),
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RerenderRows<'a> {
    Compared(Vec<RerenderComparison>),
    Single(Vec<&'a RerenderCause>),
}

impl<'a> Report<'a> {
    pub fn build(session: &'a Session, state: &ViewState) -> Self {
        let captures = Slot::ALL
            .into_iter()
            .filter_map(|slot| session.entry(slot).map(|entry| (slot, entry)))
            .map(|(slot, entry)| {
                let baseline = match slot {
                    Slot::After => session.before(),
                    Slot::Before => None,
                };
                CaptureReport {
                    slot,
                    source: &entry.source,
                    metrics: overview_metrics(&entry.processed, baseline),
                    causes: entry.processed.global_causes,
                    tree: &entry.processed.tree,
                }
            })
            .collect();

        let query = &state.query;
        let (summary, components, rerenders) = match (session.pair(), session.current()) {
            (Some((before, after)), _) => {
                let components = rank(compare_components(Some(before), Some(after)), query);
                let rerenders = rank(compare_rerenders(Some(before), Some(after)), query);
                (
                    Some(SummaryDelta::between(before, after)),
                    ComponentRows::Compared(components),
                    RerenderRows::Compared(rerenders),
                )
            }
            (None, Some(current)) => (
                None,
                ComponentRows::Single(rank_component_stats(&current.component_stats, query)),
                RerenderRows::Single(rank_rerender_causes(&current.rerender_causes, query)),
            ),
            (None, None) => (
                None,
                ComponentRows::Single(Vec::new()),
                RerenderRows::Single(Vec::new()),
            ),
        };

        Self {
            captures,
            summary,
            components,
            rerenders,
        }
    }

    pub fn write_json(&self, out: &mut impl Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut *out, self).context("failed to serialize report")?;
        writeln!(out)?;
        Ok(())
    }

    pub fn write_text(&self, out: &mut impl Write) -> Result<()> {
        for capture in &self.captures {
            writeln!(out, "{} ({})", capture.slot, capture.source)?;
            for metric in &capture.metrics {
                let value = format_metric(metric.value, metric.unit);
                match metric.change {
                    Some(change) => writeln!(
                        out,
                        "  {:<22}{value:>12}  {}",
                        metric.label,
                        format_percent(change, 1)
                    )?,
                    None => writeln!(out, "  {:<22}{value:>12}", metric.label)?,
                }
            }
            let causes = capture
                .causes
                .labelled()
                .iter()
                .map(|(cause, n)| format!("{cause} {n}"))
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(out, "  causes: {causes}")?;
            if !capture.tree.is_clean() {
                writeln!(
                    out,
                    "  tree anomalies: {} multi-parent, {} cyclic",
                    capture.tree.multi_parent.len(),
                    capture.tree.cycles.len()
                )?;
            }
            writeln!(out)?;
        }

        if let Some(summary) = &self.summary {
            writeln!(out, "comparison")?;
            for (label, delta, ms) in [
                ("renders", &summary.renders, false),
                ("duration", &summary.duration, true),
                ("commits", &summary.commits, false),
            ] {
                let (before, after) = if ms {
                    (format_ms(delta.before), format_ms(delta.after))
                } else {
                    (format!("{:.0}", delta.before), format!("{:.0}", delta.after))
                };
                writeln!(
                    out,
                    "  {label:<10}{before:>10} → {after:<10} {}",
                    format_percent(delta.percent, 1)
                )?;
            }
            writeln!(out, "  {:<10}{:>10}", "avoided", summary.renders_avoided)?;
            writeln!(out)?;
        }

        writeln!(out, "components")?;
        match &self.components {
            ComponentRows::Compared(rows) => {
                writeln!(
                    out,
                    "  {:<NAME_WIDTH$} {:>8} {:>8} {:>8} {:>9}",
                    "name", "before", "after", "diff", "change"
                )?;
                for row in rows {
                    writeln!(
                        out,
                        "  {:<NAME_WIDTH$} {:>8} {:>8} {:>8} {:>9}",
                        truncate(&row.name, NAME_WIDTH),
                        row.before.renders,
                        row.after.renders,
                        format_signed(row.diff),
                        format_percent(row.percent_change, 1)
                    )?;
                }
            }
            ComponentRows::Single(stats) => {
                writeln!(
                    out,
                    "  {:<NAME_WIDTH$} {:>8} {:>10} {:>8} {:>8}",
                    "name", "renders", "duration", "mounts", "updates"
                )?;
                for stat in stats {
                    writeln!(
                        out,
                        "  {:<NAME_WIDTH$} {:>8} {:>10} {:>8} {:>8}",
                        truncate(&stat.name, NAME_WIDTH),
                        stat.render_count,
                        format_ms(stat.total_duration),
                        stat.mounts,
                        stat.updates
                    )?;
                }
            }
        }
        writeln!(out)?;

        writeln!(out, "re-renders")?;
        match &self.rerenders {
            RerenderRows::Compared(rows) => {
                for row in rows {
                    writeln!(
                        out,
                        "  {:<NAME_WIDTH$} {:>8} {:>8} {:>8}",
                        truncate(&row.name, NAME_WIDTH),
                        row.before.total,
                        row.after.total,
                        format_signed(row.diff)
                    )?;
                }
            }
            RerenderRows::Single(causes) => {
                for cause in causes {
                    writeln!(
                        out,
                        "  {:<NAME_WIDTH$} {:>8}",
                        truncate(&cause.name, NAME_WIDTH),
                        cause.total_rerenders
                    )?;
                }
            }
        }
        Ok(())
    }
}

/// Render `kind` at full height and write it to `path` as SVG.
pub fn export_svg(
    path: &Path,
    kind: ViewKind,
    session: &Session,
    state: &ViewState,
    width: f64,
    dark: bool,
) -> Result<()> {
    if kind.needs_both() && !session.has_both() {
        bail!("the {kind} view needs both --before and --after");
    }
    // Tall enough that no row is culled.
    let viewport = Viewport::new(width, f64::from(u32::MAX));
    let commands = render_view(kind, session, &viewport, state);
    let height = (content_height(&commands) + 20.0).ceil();
    let svg = render_svg(&commands, width, height, dark);
    std::fs::write(path, svg)
        .with_context(|| format!("failed to write SVG: {}", path.display()))?;
    info!(view = %kind, path = %path.display(), commands = commands.len(), "exported SVG");
    Ok(())
}
