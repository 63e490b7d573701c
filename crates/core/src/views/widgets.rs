//! Drawing helpers shared by the dashboard views.
//!
//! Every view lays out in whole rows of [`ROW_HEIGHT`] and columns of
//! [`CHAR_WIDTH`] so that cell-based renderers can map commands onto a grid
//! without overlap.

use profdiff_protocol::{Point, Rect, RenderCommand, TextAlign, ThemeToken, Viewport};

use crate::model::Cause;

use super::ViewState;
use super::format::truncate;

pub const ROW_HEIGHT: f64 = 20.0;
pub const CHAR_WIDTH: f64 = 8.0;
pub const PADDING: f64 = 8.0;

const FONT_SIZE: f64 = 11.0;
const HEADING_FONT_SIZE: f64 = 13.0;
const VALUE_FONT_SIZE: f64 = 16.0;
const TEXT_BASELINE: f64 = 14.0;
const BAR_HEIGHT: f64 = 3.0;

pub(crate) fn text(
    commands: &mut Vec<RenderCommand>,
    x: f64,
    row_top: f64,
    text: impl Into<String>,
    color: ThemeToken,
) {
    commands.push(RenderCommand::DrawText {
        position: Point::new(x, row_top + TEXT_BASELINE),
        text: text.into(),
        color,
        font_size: FONT_SIZE,
        align: TextAlign::Left,
    });
}

pub(crate) fn heading(commands: &mut Vec<RenderCommand>, row_top: f64, title: &str) {
    commands.push(RenderCommand::DrawText {
        position: Point::new(PADDING, row_top + TEXT_BASELINE),
        text: title.to_string(),
        color: ThemeToken::TextPrimary,
        font_size: HEADING_FONT_SIZE,
        align: TextAlign::Left,
    });
}

/// Header band of a table. `columns` are `(title, x)` pairs.
pub(crate) fn table_header(
    commands: &mut Vec<RenderCommand>,
    row_top: f64,
    width: f64,
    columns: &[(&str, f64)],
) {
    commands.push(RenderCommand::DrawRect {
        rect: Rect::new(0.0, row_top, width, ROW_HEIGHT),
        color: ThemeToken::TableHeaderBackground,
        border_color: Some(ThemeToken::TableBorder),
        label: None,
    });
    for &(title, x) in columns {
        text(commands, x, row_top, title, ThemeToken::TextPrimary);
    }
}

pub(crate) fn row_background(
    commands: &mut Vec<RenderCommand>,
    row_top: f64,
    width: f64,
    i: usize,
) {
    let color = if i % 2 == 0 {
        ThemeToken::TableRowEven
    } else {
        ThemeToken::TableRowOdd
    };
    commands.push(RenderCommand::DrawRect {
        rect: Rect::new(0.0, row_top, width, ROW_HEIGHT),
        color,
        border_color: None,
        label: None,
    });
}

/// A thin bar along the bottom of a row, `fraction` of `max_width` long.
pub(crate) fn row_bar(
    commands: &mut Vec<RenderCommand>,
    x: f64,
    row_top: f64,
    max_width: f64,
    fraction: f64,
    color: ThemeToken,
) {
    let w = max_width * fraction.clamp(0.0, 1.0);
    if w <= 0.0 {
        return;
    }
    commands.push(RenderCommand::DrawRect {
        rect: Rect::new(x, row_top + ROW_HEIGHT - BAR_HEIGHT - 1.0, w, BAR_HEIGHT),
        color,
        border_color: None,
        label: None,
    });
}

/// A metric card three rows tall: label, value, and an optional detail line.
pub(crate) fn card(
    commands: &mut Vec<RenderCommand>,
    rect: Rect,
    label: &str,
    value: &str,
    value_color: ThemeToken,
    detail: Option<(String, ThemeToken)>,
) {
    commands.push(RenderCommand::BeginGroup {
        id: format!("card-{}", label.to_lowercase().replace(' ', "-")),
        label: Some(label.to_string()),
    });
    commands.push(RenderCommand::DrawRect {
        rect,
        color: ThemeToken::CardBackground,
        border_color: Some(ThemeToken::CardBorder),
        label: None,
    });
    let x = rect.x + PADDING;
    text(commands, x, rect.y, label, ThemeToken::TextMuted);
    commands.push(RenderCommand::DrawText {
        position: Point::new(x, rect.y + ROW_HEIGHT + TEXT_BASELINE),
        text: value.to_string(),
        color: value_color,
        font_size: VALUE_FONT_SIZE,
        align: TextAlign::Left,
    });
    if let Some((detail, color)) = detail {
        text(commands, x, rect.y + ROW_HEIGHT * 2.0, detail, color);
    }
    commands.push(RenderCommand::EndGroup);
}

pub const CARD_ROWS: f64 = 3.0;

/// Lay `count` cards out in a grid that fits `width`. Returns the rects and
/// the total height used.
pub(crate) fn card_grid(
    count: usize,
    width: f64,
    top: f64,
    min_card_width: f64,
) -> (Vec<Rect>, f64) {
    if count == 0 {
        return (Vec::new(), 0.0);
    }
    let usable = (width - PADDING).max(min_card_width);
    let per_row = ((usable / (min_card_width + PADDING)).floor() as usize).clamp(1, count);
    let card_w = snap(usable / per_row as f64 - PADDING);
    let card_h = ROW_HEIGHT * CARD_ROWS;

    let rects = (0..count)
        .map(|i| {
            let col = (i % per_row) as f64;
            let row = (i / per_row) as f64;
            Rect::new(
                PADDING + col * (card_w + PADDING),
                top + row * (card_h + ROW_HEIGHT),
                card_w,
                card_h,
            )
        })
        .collect();
    let rows = count.div_ceil(per_row) as f64;
    (rects, rows * (card_h + ROW_HEIGHT))
}

/// Round a width down to whole character columns.
pub(crate) fn snap(w: f64) -> f64 {
    ((w / CHAR_WIDTH).floor() * CHAR_WIDTH).max(CHAR_WIDTH)
}

/// Characters that fit between `x` and `x + w`.
pub(crate) fn chars_fitting(w: f64) -> usize {
    (w / CHAR_WIDTH).floor().max(0.0) as usize
}

/// Signed deltas: lower is better.
pub(crate) fn diff_color(diff: f64) -> ThemeToken {
    if diff < 0.0 {
        ThemeToken::DiffImproved
    } else if diff > 0.0 {
        ThemeToken::DiffRegressed
    } else {
        ThemeToken::DiffNeutral
    }
}

pub(crate) fn cause_color(cause: Cause) -> ThemeToken {
    match cause {
        Cause::Hooks => ThemeToken::CauseHooks,
        Cause::Props => ThemeToken::CauseProps,
        Cause::State => ThemeToken::CauseState,
        Cause::Context => ThemeToken::CauseContext,
        Cause::Mount => ThemeToken::CauseMount,
    }
}

/// A single centered-ish message for views that have nothing to show.
pub(crate) fn placeholder(
    id: &str,
    viewport: &Viewport,
    message: &str,
) -> Vec<RenderCommand> {
    let mut commands = vec![RenderCommand::BeginGroup {
        id: id.to_string(),
        label: None,
    }];
    let row_top = (viewport.height / 2.0 / ROW_HEIGHT).floor().max(0.0) * ROW_HEIGHT;
    text(&mut commands, PADDING, row_top, message, ThemeToken::TextMuted);
    commands.push(RenderCommand::EndGroup);
    commands
}

/// Column x snapped to the character grid.
pub(crate) fn col(width: f64, fraction: f64) -> f64 {
    (width * fraction / CHAR_WIDTH).floor() * CHAR_WIDTH
}

/// Row cursor shared by the table views: hands out row positions and drops
/// commands for rows outside the viewport.
pub(crate) struct Table<'a> {
    commands: Vec<RenderCommand>,
    viewport: &'a Viewport,
    state: &'a ViewState,
    y: f64,
    rows: usize,
}

impl<'a> Table<'a> {
    pub(crate) fn new(viewport: &'a Viewport, state: &'a ViewState) -> Self {
        Self {
            commands: Vec::new(),
            viewport,
            state,
            y: 0.0,
            rows: 0,
        }
    }

    pub(crate) fn begin(&mut self, id: &str, title: &str) {
        self.commands.push(RenderCommand::BeginGroup {
            id: id.to_string(),
            label: Some(title.to_string()),
        });
        heading(&mut self.commands, self.y, title);
        self.y += ROW_HEIGHT;
    }

    /// "shown of total" line with the active sort and filter.
    pub(crate) fn caption(&mut self, shown: usize, total: usize, noun: &str) {
        let query = &self.state.query;
        let mut line = if shown < total {
            format!("{shown} of {total} {noun}")
        } else {
            format!("{total} {noun}")
        };
        line.push_str(&format!(" · sorted by {}", query.sort));
        if !query.filter.is_empty() {
            line.push_str(&format!(" · filter \"{}\"", query.filter));
        }
        text(&mut self.commands, PADDING, self.y, line, ThemeToken::TextMuted);
        self.y += ROW_HEIGHT;
    }

    /// Top of the next row.
    pub(crate) fn cursor(&self) -> f64 {
        self.y
    }

    /// Append commands laid out from [`Self::cursor`] down, `height` tall.
    pub(crate) fn extend(&mut self, commands: Vec<RenderCommand>, height: f64) {
        self.commands.extend(commands);
        self.y += height;
    }

    pub(crate) fn header(&mut self, columns: &[(&str, f64)]) {
        table_header(&mut self.commands, self.y, self.viewport.width, columns);
        self.y += ROW_HEIGHT;
    }

    /// Reserve the next data row; returns its index and top.
    pub(crate) fn next_row(&mut self) -> (usize, f64) {
        let row = (self.rows, self.y);
        self.rows += 1;
        self.y += ROW_HEIGHT;
        row
    }

    /// The command list, if a row at `y` is inside the viewport.
    pub(crate) fn visible(&mut self, y: f64) -> Option<&mut Vec<RenderCommand>> {
        self.viewport
            .shows(y, ROW_HEIGHT)
            .then_some(&mut self.commands)
    }

    /// Indented tree paths under a row, capped at `limit`.
    pub(crate) fn paths(&mut self, paths: &[String], limit: usize) {
        let indent = PADDING + 4.0 * CHAR_WIDTH;
        let room = chars_fitting(self.viewport.width - indent - PADDING);
        for path in paths.iter().take(limit) {
            let y = self.y;
            self.y += ROW_HEIGHT;
            if let Some(cmds) = self.visible(y) {
                text(cmds, indent, y, truncate(path, room), ThemeToken::TextMuted);
            }
        }
        if paths.len() > limit {
            let y = self.y;
            self.y += ROW_HEIGHT;
            if let Some(cmds) = self.visible(y) {
                text(
                    cmds,
                    indent,
                    y,
                    format!("…and {} more", paths.len() - limit),
                    ThemeToken::TextMuted,
                );
            }
        }
    }

    pub(crate) fn no_matches(&mut self, noun: &str) {
        let message = if self.state.query.filter.is_empty() {
            format!("No {noun} recorded")
        } else {
            format!("No {noun} match \"{}\"", self.state.query.filter)
        };
        let y = self.y;
        self.y += ROW_HEIGHT;
        text(&mut self.commands, PADDING, y, message, ThemeToken::TextMuted);
    }

    pub(crate) fn finish(mut self) -> Vec<RenderCommand> {
        self.commands.push(RenderCommand::EndGroup);
        self.commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_grid_wraps() {
        let (rects, height) = card_grid(5, 800.0, 0.0, 180.0);
        assert_eq!(rects.len(), 5);
        // Four 180-wide cards fit in 800, the fifth wraps.
        assert!((rects[4].y - rects[0].y - ROW_HEIGHT * 4.0).abs() < f64::EPSILON);
        assert!((height - ROW_HEIGHT * 8.0).abs() < f64::EPSILON);
        assert!(rects.iter().all(|r| r.x + r.w <= 800.0));
    }

    #[test]
    fn narrow_grid_stacks() {
        let (rects, _) = card_grid(3, 100.0, 40.0, 180.0);
        assert!(rects.iter().all(|r| (r.x - PADDING).abs() < f64::EPSILON));
        assert!((rects[0].y - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_bar_is_skipped() {
        let mut commands = Vec::new();
        row_bar(&mut commands, 0.0, 0.0, 100.0, 0.0, ThemeToken::BarFill);
        assert!(commands.is_empty());
        row_bar(&mut commands, 0.0, 0.0, 100.0, 2.0, ThemeToken::BarFill);
        match &commands[0] {
            RenderCommand::DrawRect { rect, .. } => assert!((rect.w - 100.0).abs() < f64::EPSILON),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn diff_colors() {
        assert_eq!(diff_color(-1.0), ThemeToken::DiffImproved);
        assert_eq!(diff_color(1.0), ThemeToken::DiffRegressed);
        assert_eq!(diff_color(0.0), ThemeToken::DiffNeutral);
    }
}
