use profdiff_protocol::{Point, Rect, RenderCommand, ThemeToken, Viewport};

use crate::compare::scheduling_counts;
use crate::model::{CommitSummary, Session, Slot};

use super::ViewState;
use super::format::{format_ms, truncate};
use super::widgets::{
    CHAR_WIDTH, PADDING, ROW_HEIGHT, chars_fitting, col, heading, row_background, row_bar, snap,
    table_header, text,
};

const CHART_ROWS: f64 = 10.0;
const GUTTER_CHARS: f64 = 9.0;
const GRID_LINES: usize = 5;
const DOT: f64 = 3.0;

/// Commit duration against commit timestamp, one series per loaded capture,
/// followed by the busiest scheduling sources of the current capture.
pub fn render_timeline(
    session: &Session,
    viewport: &Viewport,
    state: &ViewState,
) -> Vec<RenderCommand> {
    let mut commands = Vec::new();
    commands.push(RenderCommand::BeginGroup {
        id: "timeline".into(),
        label: Some("Timeline".into()),
    });

    heading(&mut commands, 0.0, "Commit duration over time");
    let series: Vec<(Slot, &[CommitSummary])> = Slot::ALL
        .into_iter()
        .filter_map(|slot| session.get(slot).map(|p| (slot, p.commits.as_slice())))
        .collect();

    let mut y = ROW_HEIGHT;
    let mut x = PADDING;
    for &(slot, commits) in &series {
        let label = format!("{} ({} commits)", slot_title(slot), commits.len());
        text(&mut commands, x, y, "■", series_color(slot));
        let advance = (label.chars().count() + 5) as f64 * CHAR_WIDTH;
        text(&mut commands, x + 2.0 * CHAR_WIDTH, y, label, ThemeToken::TextSecondary);
        x += advance;
    }
    y += ROW_HEIGHT;

    y = render_chart(&mut commands, &series, viewport, y);
    y += ROW_HEIGHT;

    if let Some(current) = session.current() {
        heading(&mut commands, y, "Scheduling events");
        y += ROW_HEIGHT;

        let counts = scheduling_counts(current, state.scheduling_window, state.scheduling_top);
        let counted = current.scheduling_events.len().min(state.scheduling_window);
        text(
            &mut commands,
            PADDING,
            y,
            format!(
                "{counted} of {} events counted, top {} sources",
                current.scheduling_events.len(),
                counts.len()
            ),
            ThemeToken::TextMuted,
        );
        y += ROW_HEIGHT;

        if counts.is_empty() {
            let message = "No scheduling events recorded";
            text(&mut commands, PADDING, y, message, ThemeToken::TextMuted);
        } else {
            let w = viewport.width;
            let count_x = col(w, 0.45);
            let columns = [("Component", PADDING), ("Events", count_x)];
            table_header(&mut commands, y, w, &columns);
            y += ROW_HEIGHT;

            let max = counts.iter().map(|c| c.count).max().unwrap_or(1).max(1);
            let room = chars_fitting(count_x - PADDING).saturating_sub(1);
            for (i, entry) in counts.iter().enumerate() {
                if viewport.shows(y, ROW_HEIGHT) {
                    row_background(&mut commands, y, w, i);
                    let name = truncate(&entry.name, room);
                    text(&mut commands, PADDING, y, name, ThemeToken::TextPrimary);
                    let fraction = entry.count as f64 / max as f64;
                    row_bar(&mut commands, count_x, y, w * 0.3, fraction, ThemeToken::BarFill);
                    let count = entry.count.to_string();
                    text(&mut commands, count_x, y, count, ThemeToken::TextSecondary);
                }
                y += ROW_HEIGHT;
            }
        }
    }

    commands.push(RenderCommand::EndGroup);
    commands
}

fn slot_title(slot: Slot) -> &'static str {
    match slot {
        Slot::Before => "Before",
        Slot::After => "After",
    }
}

fn series_color(slot: Slot) -> ThemeToken {
    match slot {
        Slot::Before => ThemeToken::BeforeSeries,
        Slot::After => ThemeToken::AfterSeries,
    }
}

/// Line chart of every series on shared axes. Returns the y below it.
fn render_chart(
    commands: &mut Vec<RenderCommand>,
    series: &[(Slot, &[CommitSummary])],
    viewport: &Viewport,
    top: f64,
) -> f64 {
    let points = series.iter().flat_map(|(_, commits)| commits.iter());
    let (mut t0, mut t1, mut max) = (f64::INFINITY, f64::NEG_INFINITY, 0.0_f64);
    let mut any = false;
    for commit in points {
        any = true;
        t0 = t0.min(commit.timestamp);
        t1 = t1.max(commit.timestamp);
        max = max.max(commit.duration);
    }
    if !any {
        text(commands, PADDING, top, "No commits recorded", ThemeToken::TextMuted);
        return top + ROW_HEIGHT;
    }
    let max = max.max(f64::EPSILON);
    let span = t1 - t0;

    let chart_h = CHART_ROWS * ROW_HEIGHT;
    let chart_x = PADDING + GUTTER_CHARS * CHAR_WIDTH;
    let chart_w = snap(viewport.width - chart_x - PADDING);
    let bottom = top + chart_h;

    commands.push(RenderCommand::BeginGroup {
        id: "commit-timeline".into(),
        label: Some("Commit duration over time".into()),
    });

    for i in 0..=GRID_LINES {
        let fraction = i as f64 / GRID_LINES as f64;
        let gy = bottom - chart_h * fraction;
        commands.push(RenderCommand::DrawLine {
            from: Point::new(chart_x, gy),
            to: Point::new(chart_x + chart_w, gy),
            color: ThemeToken::ChartGrid,
            width: 1.0,
        });
        let label_row = if i == 0 { gy - ROW_HEIGHT } else { gy };
        let value = format_ms(max * fraction);
        text(commands, PADDING, label_row, value, ThemeToken::ChartAxisText);
    }

    let project = |commit: &CommitSummary| {
        let x = if span > 0.0 {
            chart_x + (commit.timestamp - t0) / span * chart_w
        } else {
            chart_x + chart_w / 2.0
        };
        Point::new(x, bottom - (commit.duration / max).clamp(0.0, 1.0) * chart_h)
    };

    for &(slot, commits) in series {
        let color = series_color(slot);
        let mut previous: Option<Point> = None;
        for commit in commits {
            let point = project(commit);
            if let Some(from) = previous {
                commands.push(RenderCommand::DrawLine {
                    from,
                    to: point,
                    color,
                    width: 1.5,
                });
            }
            commands.push(RenderCommand::DrawRect {
                rect: Rect::new(point.x - DOT / 2.0, point.y - DOT / 2.0, DOT, DOT),
                color,
                border_color: None,
                label: Some(format!(
                    "{} #{}: {} at {}",
                    slot_title(slot),
                    commit.index + 1,
                    format_ms(commit.duration),
                    format_ms(commit.timestamp)
                )),
            });
            previous = Some(point);
        }
    }

    text(commands, chart_x, bottom, format_ms(t0), ThemeToken::ChartAxisText);
    let end_label = format_ms(t1);
    let end_x = chart_x + chart_w - end_label.chars().count() as f64 * CHAR_WIDTH;
    if span > 0.0 {
        text(commands, end_x.max(chart_x), bottom, end_label, ThemeToken::ChartAxisText);
    }

    commands.push(RenderCommand::EndGroup);
    bottom + ROW_HEIGHT
}
