use profdiff_protocol::{RenderCommand, ThemeToken, Viewport};

use crate::compare::{compare_rerenders, rank, rank_rerender_causes};
use crate::model::{CauseCounts, Session};

use super::ViewState;
use super::format::{format_percent, format_signed, truncate};
use super::widgets::{
    CHAR_WIDTH, PADDING, Table, cause_color, chars_fitting, col, diff_color, row_background, text,
};

/// Re-render attribution per component, with one badge per cause.
pub fn render_rerenders(
    session: &Session,
    viewport: &Viewport,
    state: &ViewState,
) -> Vec<RenderCommand> {
    let mut table = Table::new(viewport, state);
    table.begin("rerenders", "Re-renders");
    let w = viewport.width;

    if let Some((before, after)) = session.pair() {
        let rows = compare_rerenders(Some(before), Some(after));
        let ranked = rank(&rows, &state.query);
        table.caption(ranked.len(), rows.len(), "components");

        let (before_x, after_x, diff_x) = (col(w, 0.28), col(w, 0.58), col(w, 0.86));
        table.header(&[
            ("Component", PADDING),
            ("Before", before_x),
            ("After", after_x),
            ("Diff", diff_x),
        ]);

        for row in &ranked {
            let (i, y) = table.next_row();
            let Some(cmds) = table.visible(y) else {
                continue;
            };
            row_background(cmds, y, w, i);
            name_cell(cmds, y, &row.name, before_x);
            for (x, next, side) in [(before_x, after_x, row.before), (after_x, diff_x, row.after)] {
                badges(cmds, x, y, next - x, side.total, &side.causes);
            }
            let diff = format!(
                "{} ({})",
                format_signed(row.diff),
                format_percent(row.percent_change, 0)
            );
            text(cmds, diff_x, y, diff, diff_color(row.diff as f64));
        }
        if ranked.is_empty() {
            table.no_matches("re-renders");
        }
    } else if let Some(current) = session.current() {
        let ranked = rank_rerender_causes(&current.rerender_causes, &state.query);
        table.caption(ranked.len(), current.rerender_causes.len(), "components");

        let (causes_x, total_x) = (col(w, 0.35), col(w, 0.86));
        table.header(&[
            ("Component", PADDING),
            ("Causes", causes_x),
            ("Total", total_x),
        ]);

        for cause in &ranked {
            let (i, y) = table.next_row();
            let Some(cmds) = table.visible(y) else {
                continue;
            };
            row_background(cmds, y, w, i);
            name_cell(cmds, y, &cause.name, causes_x);
            cause_badges(cmds, causes_x, y, total_x - causes_x, &cause.causes);
            let total = cause.total_rerenders.to_string();
            text(cmds, total_x, y, total, ThemeToken::TextPrimary);
        }
        if ranked.is_empty() {
            table.no_matches("re-renders");
        }
    }

    table.finish()
}

fn name_cell(commands: &mut Vec<RenderCommand>, y: f64, name: &str, next_col: f64) {
    let room = chars_fitting(next_col - PADDING).saturating_sub(1);
    text(commands, PADDING, y, truncate(name, room), ThemeToken::TextPrimary);
}

/// Re-render total followed by the cause badges.
fn badges(
    commands: &mut Vec<RenderCommand>,
    x: f64,
    y: f64,
    width: f64,
    total: u32,
    causes: &CauseCounts,
) {
    let total = total.to_string();
    let used = (total.chars().count() + 2) as f64 * CHAR_WIDTH;
    text(commands, x, y, total, ThemeToken::TextPrimary);
    cause_badges(commands, x + used, y, width - used, causes);
}

/// One `Cause n` badge per non-zero cause, in display order. Badges that do
/// not fit are folded into a trailing `…`.
fn cause_badges(
    commands: &mut Vec<RenderCommand>,
    x: f64,
    y: f64,
    width: f64,
    causes: &CauseCounts,
) {
    let mut cursor = x;
    let end = x + width - CHAR_WIDTH;
    let present: Vec<_> = causes.labelled().into_iter().filter(|(_, n)| *n > 0).collect();
    if present.is_empty() {
        text(commands, cursor, y, "-", ThemeToken::TextMuted);
        return;
    }
    for (cause, count) in present {
        let badge = format!("{cause} {count}");
        let badge_w = (badge.chars().count() + 1) as f64 * CHAR_WIDTH;
        if cursor + badge_w > end {
            text(commands, cursor, y, "…", ThemeToken::TextMuted);
            return;
        }
        text(commands, cursor, y, badge, cause_color(cause));
        cursor += badge_w;
    }
}
