use std::io::stdout;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use profdiff_core::views::{CHAR_WIDTH, ROW_HEIGHT};
use profdiff_protocol::{Point, RenderCommand, TextAlign, ThemeToken, Viewport};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::App;

/// Distance from a row's top edge to its text baseline in view units.
const TEXT_BASELINE: f64 = 14.0;

pub fn theme_to_color(token: ThemeToken, dark: bool) -> Color {
    use ThemeToken as T;
    if dark {
        match token {
            T::Background | T::Surface | T::TableRowEven | T::CardBackground => Color::Black,
            T::TableRowOdd => Color::Rgb(24, 24, 24),
            T::TableHeaderBackground => Color::Rgb(40, 40, 40),
            T::Border | T::TableBorder | T::CardBorder | T::ChartGrid => Color::DarkGray,
            T::TextPrimary => Color::White,
            T::TextSecondary | T::ChartAxisText => Color::Gray,
            T::TextMuted => Color::DarkGray,
            T::BarFill => Color::Rgb(68, 138, 255),
            T::BeforeSeries => Color::Rgb(255, 152, 0),
            T::AfterSeries => Color::Rgb(79, 195, 247),
            T::DiffImproved => Color::Green,
            T::DiffRegressed => Color::Red,
            T::DiffNeutral => Color::Gray,
            T::CauseHooks => Color::Magenta,
            T::CauseProps => Color::Blue,
            T::CauseState => Color::Yellow,
            T::CauseContext => Color::Cyan,
            T::CauseMount => Color::Rgb(120, 144, 156),
        }
    } else {
        match token {
            T::Background | T::Surface | T::TableRowEven | T::CardBackground => Color::White,
            T::TableRowOdd => Color::Rgb(246, 247, 249),
            T::TableHeaderBackground => Color::Rgb(236, 238, 241),
            T::Border | T::TableBorder | T::CardBorder | T::ChartGrid => {
                Color::Rgb(200, 204, 210)
            }
            T::TextPrimary => Color::Black,
            T::TextSecondary | T::ChartAxisText => Color::Rgb(74, 74, 90),
            T::TextMuted => Color::Rgb(110, 110, 125),
            T::BarFill => Color::Rgb(69, 123, 157),
            T::BeforeSeries => Color::Rgb(230, 126, 34),
            T::AfterSeries => Color::Rgb(41, 128, 185),
            T::DiffImproved => Color::Rgb(39, 174, 96),
            T::DiffRegressed => Color::Rgb(230, 57, 70),
            T::DiffNeutral => Color::Rgb(108, 117, 125),
            T::CauseHooks => Color::Rgb(142, 68, 173),
            T::CauseProps => Color::Rgb(46, 134, 222),
            T::CauseState => Color::Rgb(243, 156, 18),
            T::CauseContext => Color::Rgb(22, 160, 133),
            T::CauseMount => Color::Rgb(127, 140, 141),
        }
    }
}

/// Maps view units onto the cells of `area`. Views lay out on a grid of
/// `CHAR_WIDTH` x `ROW_HEIGHT`, so one grid slot is one cell.
struct Grid {
    area: Rect,
    scroll: f64,
}

impl Grid {
    fn col(&self, x: f64) -> i64 {
        (x / CHAR_WIDTH).floor() as i64
    }

    fn row(&self, y: f64) -> i64 {
        ((y - self.scroll) / ROW_HEIGHT).floor() as i64
    }

    fn cell(&self, col: i64, row: i64) -> Option<(u16, u16)> {
        let inside = (0..i64::from(self.area.width)).contains(&col)
            && (0..i64::from(self.area.height)).contains(&row);
        inside.then(|| (self.area.x + col as u16, self.area.y + row as u16))
    }
}

/// Paint render commands onto `buf`.
///
/// Row-sized rects become cell backgrounds; thinner rects (bars, chart
/// dots) become block glyphs. Lines are plotted cell by cell.
pub fn draw_commands(
    buf: &mut Buffer,
    area: Rect,
    commands: &[RenderCommand],
    viewport: &Viewport,
    dark: bool,
) {
    let grid = Grid {
        area,
        scroll: viewport.y,
    };
    let background = theme_to_color(ThemeToken::Background, dark);
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            buf[(x, y)].set_char(' ').set_bg(background);
        }
    }

    for command in commands {
        match command {
            RenderCommand::DrawRect { rect, color, .. } => {
                let color = theme_to_color(*color, dark);
                let col0 = grid.col(rect.x);
                let col1 = grid.col(rect.x + rect.w - 0.01).max(col0);
                if rect.h >= ROW_HEIGHT / 2.0 {
                    let row0 = grid.row(rect.y);
                    let row1 = grid.row(rect.y + rect.h - 0.01).max(row0);
                    for row in row0..=row1 {
                        for col in col0..=col1 {
                            if let Some(pos) = grid.cell(col, row) {
                                buf[pos].set_bg(color);
                            }
                        }
                    }
                } else {
                    let glyph = if rect.w <= CHAR_WIDTH { '•' } else { '▂' };
                    let row = grid.row(rect.y + rect.h / 2.0);
                    for col in col0..=col1 {
                        if let Some(pos) = grid.cell(col, row) {
                            buf[pos].set_char(glyph).set_fg(color);
                        }
                    }
                }
            }
            RenderCommand::DrawText {
                position,
                text,
                color,
                align,
                ..
            } => {
                let width = text.chars().count() as i64;
                let col = match align {
                    TextAlign::Left => grid.col(position.x),
                    TextAlign::Center => grid.col(position.x) - width / 2,
                    TextAlign::Right => grid.col(position.x) - width,
                };
                let row = grid.row(position.y - TEXT_BASELINE);
                let fg = theme_to_color(*color, dark);
                for (i, ch) in text.chars().enumerate() {
                    if let Some(pos) = grid.cell(col + i as i64, row) {
                        buf[pos].set_char(ch).set_fg(fg);
                    }
                }
            }
            RenderCommand::DrawLine {
                from, to, color, ..
            } => draw_line(buf, &grid, *from, *to, theme_to_color(*color, dark)),
            RenderCommand::BeginGroup { .. } | RenderCommand::EndGroup => {}
        }
    }
}

fn draw_line(buf: &mut Buffer, grid: &Grid, from: Point, to: Point, color: Color) {
    let (c0, r0) = (grid.col(from.x), grid.row(from.y));
    let (c1, r1) = (grid.col(to.x), grid.row(to.y));
    let glyph = if r0 == r1 {
        '─'
    } else if c0 == c1 {
        '│'
    } else {
        '·'
    };
    let steps = (c1 - c0).abs().max((r1 - r0).abs()).max(1);
    for step in 0..=steps {
        let t = step as f64 / steps as f64;
        let col = c0 + ((c1 - c0) as f64 * t).round() as i64;
        let row = r0 + ((r1 - r0) as f64 * t).round() as i64;
        if let Some(pos) = grid.cell(col, row) {
            // Keep text that is already there.
            if buf[pos].symbol() == " " {
                buf[pos].set_char(glyph).set_fg(color);
            }
        }
    }
}

/// Run the dashboard until the user quits.
pub fn run(app: &mut App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    while !app.should_quit() {
        terminal.draw(|frame| {
            let area = frame.area();
            let content = Rect::new(0, 1, area.width, area.height.saturating_sub(2));
            let viewport = app.viewport(content.width, content.height);
            let commands = app.render(&viewport);
            app.set_content_rows(commands_rows(&commands));

            let header = Paragraph::new(tab_line(app)).style(chrome_style(app.dark()));
            frame.render_widget(header, Rect::new(0, 0, area.width, 1));

            draw_commands(frame.buffer_mut(), content, &commands, &viewport, app.dark());

            let footer = Paragraph::new(app.status_line()).style(chrome_style(app.dark()));
            let footer_y = area.height.saturating_sub(1);
            frame.render_widget(footer, Rect::new(0, footer_y, area.width, 1));
        })?;

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollDown => app.scroll_by(3),
                    MouseEventKind::ScrollUp => app.scroll_by(-3),
                    _ => {}
                },
                _ => {}
            }
        }
    }
    Ok(())
}

fn commands_rows(commands: &[RenderCommand]) -> usize {
    (profdiff_core::views::content_height(commands) / ROW_HEIGHT).ceil() as usize
}

fn chrome_style(dark: bool) -> Style {
    Style::default()
        .fg(theme_to_color(ThemeToken::TextPrimary, dark))
        .bg(theme_to_color(ThemeToken::TableHeaderBackground, dark))
}

fn tab_line(app: &App) -> Line<'static> {
    let mut spans = vec![Span::raw(" profdiff ")];
    for (i, (kind, active)) in app.tabs().into_iter().enumerate() {
        let label = format!(" {} {} ", i + 1, kind.title());
        let style = if active {
            Style::default()
                .fg(theme_to_color(ThemeToken::Background, app.dark()))
                .bg(theme_to_color(ThemeToken::BarFill, app.dark()))
        } else {
            Style::default()
        };
        spans.push(Span::styled(label, style));
    }
    Line::from(spans)
}
