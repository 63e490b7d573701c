use std::collections::HashMap;

use profdiff_protocol::{RenderCommand, ThemeToken, Viewport};

use crate::compare::{compare_components, merge_paths, rank, rank_component_stats};
use crate::model::{ComponentPaths, Session};

use super::ViewState;
use super::format::{format_ms, format_percent, format_signed, truncate};
use super::widgets::{
    PADDING, Table, chars_fitting, col, diff_color, row_background, row_bar, text,
};

/// Component table: before/after side by side when both captures are
/// loaded, otherwise the single capture's statistics.
pub fn render_components(
    session: &Session,
    viewport: &Viewport,
    state: &ViewState,
) -> Vec<RenderCommand> {
    let mut table = Table::new(viewport, state);
    table.begin("components", "Components");

    if let Some((before, after)) = session.pair() {
        let rows = compare_components(Some(before), Some(after));
        let total = rows.len();
        let ranked = rank(&rows, &state.query);
        let paths = merge_paths(Some(before), Some(after));
        let paths = path_index(&paths);

        table.caption(ranked.len(), total, "components");
        let w = viewport.width;
        let (before_x, after_x, diff_x) = (col(w, 0.40), col(w, 0.60), col(w, 0.80));
        table.header(&[
            ("Component", PADDING),
            ("Before", before_x),
            ("After", after_x),
            ("Diff", diff_x),
        ]);

        let max = ranked.iter().map(|r| r.max_renders()).max().unwrap_or(0).max(1);
        let bar_w = w * 0.18;
        for row in &ranked {
            let shown = paths.get(row.name.as_str()).copied().unwrap_or_default();
            let (i, y) = table.next_row();
            if let Some(cmds) = table.visible(y) {
                row_background(cmds, y, w, i);
                name_cell(cmds, y, &row.name, before_x, shown, state.show_paths);
                for (x, side, color) in [
                    (before_x, row.before, ThemeToken::BeforeSeries),
                    (after_x, row.after, ThemeToken::AfterSeries),
                ] {
                    let fraction = f64::from(side.renders) / f64::from(max);
                    row_bar(cmds, x, y, bar_w, fraction, color);
                    let label = format!("{} ({})", side.renders, format_ms(side.duration));
                    text(cmds, x, y, label, ThemeToken::TextSecondary);
                }
                let diff = format!(
                    "{} ({})",
                    format_signed(row.diff),
                    format_percent(row.percent_change, 0)
                );
                text(cmds, diff_x, y, diff, diff_color(row.diff as f64));
            }
            if state.show_paths {
                table.paths(shown, state.path_limit);
            }
        }
        if ranked.is_empty() {
            table.no_matches("components");
        }
    } else if let Some(current) = session.current() {
        let ranked = rank_component_stats(&current.component_stats, &state.query);
        let paths = path_index(&current.component_paths);

        table.caption(ranked.len(), current.component_stats.len(), "components");
        let w = viewport.width;
        let (renders_x, duration_x, split_x) = (col(w, 0.45), col(w, 0.68), col(w, 0.84));
        table.header(&[
            ("Component", PADDING),
            ("Renders", renders_x),
            ("Duration", duration_x),
            ("Mount/Update", split_x),
        ]);

        let max = ranked.iter().map(|s| s.render_count).max().unwrap_or(0).max(1);
        let bar_w = w * 0.2;
        for stat in &ranked {
            let shown = paths.get(stat.name.as_str()).copied().unwrap_or_default();
            let (i, y) = table.next_row();
            if let Some(cmds) = table.visible(y) {
                row_background(cmds, y, w, i);
                name_cell(cmds, y, &stat.name, renders_x, shown, state.show_paths);
                let fraction = f64::from(stat.render_count) / f64::from(max);
                row_bar(cmds, renders_x, y, bar_w, fraction, ThemeToken::BarFill);
                let renders = stat.render_count.to_string();
                text(cmds, renders_x, y, renders, ThemeToken::TextSecondary);
                let duration = format_ms(stat.total_duration);
                text(cmds, duration_x, y, duration, ThemeToken::TextSecondary);
                let split = format!("{} / {}", stat.mounts, stat.updates);
                text(cmds, split_x, y, split, ThemeToken::TextMuted);
            }
            if state.show_paths {
                table.paths(shown, state.path_limit);
            }
        }
        if ranked.is_empty() {
            table.no_matches("components");
        }
    }

    table.finish()
}

fn path_index(paths: &[ComponentPaths]) -> HashMap<&str, &[String]> {
    paths
        .iter()
        .map(|p| (p.name.as_str(), p.paths.as_slice()))
        .collect()
}

/// Component name with a marker telling whether tree paths exist and are
/// expanded.
fn name_cell(
    commands: &mut Vec<RenderCommand>,
    y: f64,
    name: &str,
    next_col: f64,
    paths: &[String],
    expanded: bool,
) {
    let marker = match (paths.is_empty(), expanded) {
        (true, _) => "  ",
        (false, true) => "▾ ",
        (false, false) => "▸ ",
    };
    let room = chars_fitting(next_col - PADDING).saturating_sub(3);
    text(
        commands,
        PADDING,
        y,
        format!("{marker}{}", truncate(name, room)),
        ThemeToken::TextPrimary,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::{RankQuery, SortKey};
    use crate::model::{ComponentStat, ProcessedCapture};
    use crate::views::test_util::{session, texts};

    const VIEWPORT: Viewport = Viewport {
        x: 0.0,
        y: 0.0,
        width: 1000.0,
        height: 600.0,
        dpr: 1.0,
    };

    fn stat(name: &str, renders: u32, duration: f64) -> ComponentStat {
        ComponentStat {
            render_count: renders,
            total_duration: duration,
            ..ComponentStat::new(name)
        }
    }

    fn capture(stats: Vec<ComponentStat>, paths: Vec<(&str, Vec<&str>)>) -> ProcessedCapture {
        ProcessedCapture {
            component_stats: stats,
            component_paths: paths
                .into_iter()
                .map(|(name, paths)| ComponentPaths {
                    name: name.into(),
                    paths: paths.into_iter().map(String::from).collect(),
                })
                .collect(),
            ..ProcessedCapture::default()
        }
    }

    #[test]
    fn comparative_rows() {
        let before = capture(vec![stat("List", 4, 8.0), stat("Item", 10, 2.0)], vec![]);
        let after = capture(vec![stat("List", 5, 9.0)], vec![]);
        let session = session(Some(before), Some(after));
        let commands = render_components(&session, &VIEWPORT, &ViewState::default());
        let lines = texts(&commands);

        assert!(lines.contains(&"Before"));
        assert!(lines.contains(&"4 (8.0ms)"));
        assert!(lines.contains(&"5 (9.0ms)"));
        assert!(lines.contains(&"+1 (+25%)"));
        assert!(lines.contains(&"0 (0.0ms)"));
        assert!(lines.contains(&"-10 (-100%)"));
        assert!(lines.contains(&"2 components · sorted by renders"));

        let item = lines.iter().position(|t| t.ends_with("Item")).unwrap_or(usize::MAX);
        let list = lines.iter().position(|t| t.ends_with("List")).unwrap_or(usize::MAX);
        assert!(item < list, "Item has more renders and should come first");
    }

    #[test]
    fn single_capture_fallback() {
        let only = capture(vec![stat("Button", 3, 1.5)], vec![]);
        let session = session(None, Some(only));
        let commands = render_components(&session, &VIEWPORT, &ViewState::default());
        let lines = texts(&commands);
        assert!(lines.contains(&"Renders"));
        assert!(!lines.contains(&"Before"));
        assert!(lines.contains(&"1.5ms"));
        assert!(lines.contains(&"0 / 0"));
    }

    #[test]
    fn paths_are_capped_with_a_remainder_line() {
        let paths: Vec<String> = (0..7).map(|i| format!("App > P{i} > Item")).collect();
        let only = capture(
            vec![stat("Item", 1, 1.0)],
            vec![("Item", paths.iter().map(String::as_str).collect())],
        );
        let session = session(Some(only), None);
        let state = ViewState {
            show_paths: true,
            ..ViewState::default()
        };
        let commands = render_components(&session, &VIEWPORT, &state);
        let lines = texts(&commands);
        assert!(lines.contains(&"▾ Item"));
        assert!(lines.contains(&"App > P4 > Item"));
        assert!(!lines.contains(&"App > P5 > Item"));
        assert!(lines.contains(&"…and 2 more"));

        let hidden = render_components(&session, &VIEWPORT, &ViewState::default());
        let hidden = texts(&hidden);
        assert!(hidden.contains(&"▸ Item"));
        assert!(!hidden.contains(&"App > P0 > Item"));
    }

    #[test]
    fn comparative_paths_merge_both_sides() {
        let before = capture(vec![stat("Item", 1, 1.0)], vec![("Item", vec!["App > Item"])]);
        let after = capture(vec![stat("Item", 1, 1.0)], vec![("Item", vec!["App > List > Item"])]);
        let session = session(Some(before), Some(after));
        let state = ViewState {
            show_paths: true,
            ..ViewState::default()
        };
        let commands = render_components(&session, &VIEWPORT, &state);
        let lines = texts(&commands);
        assert!(lines.contains(&"App > Item"));
        assert!(lines.contains(&"App > List > Item"));
    }

    #[test]
    fn filter_and_empty_message() {
        let only = capture(vec![stat("Button", 3, 1.5), stat("Modal", 1, 1.0)], vec![]);
        let session = session(Some(only), None);
        let state = ViewState {
            query: RankQuery {
                filter: "zzz".into(),
                sort: SortKey::Name,
                limit: None,
            },
            ..ViewState::default()
        };
        let commands = render_components(&session, &VIEWPORT, &state);
        let lines = texts(&commands);
        assert!(lines.contains(&"No components match \"zzz\""));
        assert!(lines.contains(&"0 of 2 components · sorted by name · filter \"zzz\""));
    }

    #[test]
    fn rows_outside_the_viewport_are_skipped() {
        let stats: Vec<_> = (0..50).map(|i| stat(&format!("C{i:02}"), 50 - i, 0.0)).collect();
        let session = session(Some(capture(stats, vec![])), None);
        let viewport = Viewport {
            y: 400.0,
            ..Viewport::new(800.0, 100.0)
        };
        let commands = render_components(&session, &viewport, &ViewState::default());
        let lines = texts(&commands);
        assert!(!lines.iter().any(|t| t.ends_with("C00")));
        assert!(lines.iter().any(|t| t.ends_with("C20")));
        assert!(!lines.iter().any(|t| t.ends_with("C40")));
    }
}
