use profdiff_protocol::{RenderCommand, ThemeToken, Viewport};

use crate::compare::{MetricDelta, RankQuery, SortKey, SummaryDelta, compare_components, rank};
use crate::model::Session;

use super::ViewState;
use super::format::{format_ms, format_percent, format_signed, truncate};
use super::widgets::{
    PADDING, Table, card, card_grid, chars_fitting, col, diff_color, placeholder,
    row_background, text,
};

const CARD_MIN_WIDTH: f64 = 200.0;

/// Headline deltas and the per-component table, biggest improvement first.
/// Needs both captures.
pub fn render_comparison(
    session: &Session,
    viewport: &Viewport,
    state: &ViewState,
) -> Vec<RenderCommand> {
    let Some((before, after)) = session.pair() else {
        return placeholder(
            "comparison",
            viewport,
            "Load both a before and an after capture to compare them.",
        );
    };

    // The comparison table always ranks by improvement; filter and limit
    // still apply.
    let query = RankQuery {
        sort: SortKey::Improvement,
        ..state.query.clone()
    };
    let state = ViewState {
        query,
        ..state.clone()
    };

    let mut table = Table::new(viewport, &state);
    table.begin("comparison", "Comparison");

    let summary = SummaryDelta::between(before, after);
    let count = |d: &MetricDelta| format!("{:.0} → {:.0}", d.before, d.after);
    let cards = [
        ("Render Change", &summary.renders, count(&summary.renders)),
        (
            "Duration Change",
            &summary.duration,
            format!(
                "{} → {}",
                format_ms(summary.duration.before),
                format_ms(summary.duration.after)
            ),
        ),
        ("Commit Change", &summary.commits, count(&summary.commits)),
    ];

    let mut cards_commands = Vec::new();
    let top = table.cursor();
    let (rects, used) = card_grid(cards.len() + 1, viewport.width, top, CARD_MIN_WIDTH);
    for ((label, delta, detail), rect) in cards.iter().zip(&rects) {
        card(
            &mut cards_commands,
            *rect,
            label,
            &format_percent(delta.percent, 1),
            diff_color(delta.diff),
            Some((detail.clone(), ThemeToken::TextMuted)),
        );
    }
    if let Some(rect) = rects.last() {
        let avoided = summary.renders_avoided;
        let color = if avoided > 0 {
            ThemeToken::DiffImproved
        } else {
            ThemeToken::DiffNeutral
        };
        card(
            &mut cards_commands,
            *rect,
            "Renders Avoided",
            &avoided.to_string(),
            color,
            Some(("fewer renders".to_string(), ThemeToken::TextMuted)),
        );
    }
    table.extend(cards_commands, used);

    let rows = compare_components(Some(before), Some(after));
    let ranked = rank(&rows, &state.query);
    table.caption(ranked.len(), rows.len(), "components");

    let w = viewport.width;
    let (before_x, after_x, diff_x, change_x) =
        (col(w, 0.45), col(w, 0.58), col(w, 0.71), col(w, 0.84));
    table.header(&[
        ("Component", PADDING),
        ("Before", before_x),
        ("After", after_x),
        ("Diff", diff_x),
        ("Change", change_x),
    ]);

    let room = chars_fitting(before_x - PADDING).saturating_sub(1);
    for row in &ranked {
        let (i, y) = table.next_row();
        let Some(cmds) = table.visible(y) else {
            continue;
        };
        row_background(cmds, y, w, i);
        text(cmds, PADDING, y, truncate(&row.name, room), ThemeToken::TextPrimary);
        for (x, renders) in [(before_x, row.before.renders), (after_x, row.after.renders)] {
            text(cmds, x, y, renders.to_string(), ThemeToken::TextSecondary);
        }
        text(cmds, diff_x, y, format_signed(row.diff), diff_color(row.diff as f64));
        let change = format_percent(row.percent_change, 1);
        text(cmds, change_x, y, change, diff_color(row.percent_change));
    }
    if ranked.is_empty() {
        table.no_matches("components");
    }

    table.finish()
}
