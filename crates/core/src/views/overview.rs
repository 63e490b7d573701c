use profdiff_protocol::{Point, Rect, RenderCommand, ThemeToken, Viewport};

use crate::compare::overview_metrics;
use crate::model::{ProcessedCapture, Session, Slot};

use super::format::{format_change, format_metric, format_ms};
use super::widgets::{
    CHAR_WIDTH, PADDING, ROW_HEIGHT, card, card_grid, cause_color, heading, snap, text,
};

const CARD_MIN_WIDTH: f64 = 176.0;
const CHART_ROWS: f64 = 8.0;
const GUTTER_CHARS: f64 = 9.0;
const GRID_LINES: usize = 4;

/// Headline cards, the commit-duration chart, and the global cause
/// breakdown for the current capture.
pub fn render_overview(session: &Session, viewport: &Viewport) -> Vec<RenderCommand> {
    let Some(current) = session.current() else {
        return Vec::new();
    };
    let baseline = session.baseline();

    let mut commands = Vec::with_capacity(64 + current.commits.len());
    commands.push(RenderCommand::BeginGroup {
        id: "overview".into(),
        label: Some("Overview".into()),
    });

    let mut y = 0.0;
    heading(&mut commands, y, "Overview");
    if let Some(line) = source_line(session) {
        text(&mut commands, PADDING + 12.0 * CHAR_WIDTH, y, line, ThemeToken::TextMuted);
    }
    y += ROW_HEIGHT;

    if !current.tree.is_clean() {
        let warning = format!(
            "Tree anomalies: {} node(s) with several parents, {} cyclic path(s)",
            current.tree.multi_parent.len(),
            current.tree.cycles.len()
        );
        text(&mut commands, PADDING, y, warning, ThemeToken::DiffRegressed);
        y += ROW_HEIGHT;
    }
    y += ROW_HEIGHT;

    let metrics = overview_metrics(current, baseline);
    let (rects, used) = card_grid(metrics.len(), viewport.width, y, CARD_MIN_WIDTH);
    for (metric, rect) in metrics.iter().zip(rects) {
        let detail = metric.change.map(|change| {
            let color = if change < 0.0 {
                ThemeToken::DiffImproved
            } else {
                ThemeToken::DiffRegressed
            };
            (format_change(change), color)
        });
        card(
            &mut commands,
            rect,
            metric.label,
            &format_metric(metric.value, metric.unit),
            ThemeToken::TextPrimary,
            detail,
        );
    }
    y += used;

    y = render_commit_chart(&mut commands, current, viewport, y);
    y += ROW_HEIGHT;
    render_cause_breakdown(&mut commands, current, viewport, y);

    commands.push(RenderCommand::EndGroup);
    commands
}

fn source_line(session: &Session) -> Option<String> {
    let name = |slot| session.entry(slot).map(|e| e.source.as_str());
    match (name(Slot::Before), name(Slot::After)) {
        (Some(before), Some(after)) => Some(format!("{after} vs {before}")),
        (None, Some(only)) | (Some(only), None) => Some(only.to_string()),
        (None, None) => None,
    }
}

/// One bar per commit. Returns the y below the chart.
fn render_commit_chart(
    commands: &mut Vec<RenderCommand>,
    processed: &ProcessedCapture,
    viewport: &Viewport,
    top: f64,
) -> f64 {
    heading(commands, top, "Commit durations");
    let chart_top = top + ROW_HEIGHT;
    let chart_h = CHART_ROWS * ROW_HEIGHT;
    let chart_x = PADDING + GUTTER_CHARS * CHAR_WIDTH;
    let chart_w = snap(viewport.width - chart_x - PADDING);
    let bottom = chart_top + chart_h;

    commands.push(RenderCommand::BeginGroup {
        id: "commit-durations".into(),
        label: Some("Commit durations".into()),
    });

    if processed.commits.is_empty() {
        text(commands, chart_x, chart_top, "No commits recorded", ThemeToken::TextMuted);
        commands.push(RenderCommand::EndGroup);
        return chart_top + ROW_HEIGHT;
    }

    let max = processed
        .commits
        .iter()
        .map(|c| c.duration)
        .fold(0.0, f64::max)
        .max(f64::EPSILON);

    for i in 0..=GRID_LINES {
        let fraction = i as f64 / GRID_LINES as f64;
        let gy = bottom - chart_h * fraction;
        commands.push(RenderCommand::DrawLine {
            from: Point::new(chart_x, gy),
            to: Point::new(chart_x + chart_w, gy),
            color: ThemeToken::ChartGrid,
            width: 1.0,
        });
        // The baseline label sits above the axis labels row.
        let label_row = if i == 0 { gy - ROW_HEIGHT } else { gy };
        text(
            commands,
            PADDING,
            label_row,
            format_ms(max * fraction),
            ThemeToken::ChartAxisText,
        );
    }

    let n = processed.commits.len();
    let slot_w = chart_w / n as f64;
    let bar_w = (slot_w * 0.8).max(1.0);
    for commit in &processed.commits {
        let h = chart_h * (commit.duration / max).clamp(0.0, 1.0);
        commands.push(RenderCommand::DrawRect {
            rect: Rect::new(chart_x + commit.index as f64 * slot_w, bottom - h, bar_w, h),
            color: ThemeToken::BarFill,
            border_color: None,
            label: Some(format!("#{} {}", commit.index + 1, format_ms(commit.duration))),
        });
    }

    // Label every k-th commit so labels never collide.
    let label_room = (chart_w / (6.0 * CHAR_WIDTH)).floor().max(1.0) as usize;
    let step = n.div_ceil(label_room).max(1);
    for i in (0..n).step_by(step) {
        text(
            commands,
            chart_x + i as f64 * slot_w,
            bottom,
            format!("#{}", i + 1),
            ThemeToken::ChartAxisText,
        );
    }

    commands.push(RenderCommand::EndGroup);
    bottom + ROW_HEIGHT
}

/// Stacked bar of the five causes plus a legend row per cause.
fn render_cause_breakdown(
    commands: &mut Vec<RenderCommand>,
    processed: &ProcessedCapture,
    viewport: &Viewport,
    top: f64,
) {
    heading(commands, top, "Re-render causes");
    commands.push(RenderCommand::BeginGroup {
        id: "rerender-causes".into(),
        label: Some("Re-render causes".into()),
    });

    let causes = processed.global_causes;
    let total = causes.total();
    let mut y = top + ROW_HEIGHT;
    if total == 0 {
        text(commands, PADDING, y, "No re-renders recorded", ThemeToken::TextMuted);
        commands.push(RenderCommand::EndGroup);
        return;
    }

    let bar_w = snap(viewport.width - 2.0 * PADDING);
    let mut x = PADDING;
    for (cause, count) in causes.labelled() {
        if count == 0 {
            continue;
        }
        let w = bar_w * f64::from(count) / f64::from(total);
        commands.push(RenderCommand::DrawRect {
            rect: Rect::new(x, y, w, ROW_HEIGHT),
            color: cause_color(cause),
            border_color: None,
            label: Some(format!("{cause}: {count}")),
        });
        x += w;
    }
    y += ROW_HEIGHT * 2.0;

    for (cause, count) in causes.labelled() {
        let share = f64::from(count) / f64::from(total) * 100.0;
        text(commands, PADDING, y, "■", cause_color(cause));
        text(
            commands,
            PADDING + 2.0 * CHAR_WIDTH,
            y,
            format!("{:<8} {count:>6}  {share:>5.1}%", cause.to_string()),
            ThemeToken::TextSecondary,
        );
        y += ROW_HEIGHT;
    }

    commands.push(RenderCommand::EndGroup);
}
