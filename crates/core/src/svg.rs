//! SVG renderer: converts `RenderCommand` lists into standalone SVG strings.

use std::fmt::Write;

use profdiff_protocol::{RenderCommand, TextAlign, ThemeToken};

/// Rects taller than this are chart bars; their labels stay tooltips.
const INLINE_LABEL_MAX_HEIGHT: f64 = 24.0;

/// Render a list of commands as an SVG document string.
///
/// `width` and `height` define the SVG viewBox dimensions.
/// `dark` selects the color palette.
pub fn render_svg(commands: &[RenderCommand], width: f64, height: f64, dark: bool) -> String {
    let mut svg = String::with_capacity(commands.len() * 120);
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}" style="font-family:ui-monospace,Menlo,Consolas,monospace;font-size:11px">"#,
    );

    let bg = resolve_color(ThemeToken::Background, dark);
    let _ = write!(svg, r#"<rect width="{width}" height="{height}" fill="{bg}"/>"#);

    for cmd in commands {
        match cmd {
            RenderCommand::DrawRect {
                rect,
                color,
                border_color,
                label,
            } => {
                let fill = resolve_color(*color, dark);
                let _ = write!(
                    svg,
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{fill}" rx="1""#,
                    rect.x, rect.y, rect.w, rect.h,
                );
                if let Some(border) = border_color {
                    let _ = write!(svg, r#" stroke="{}""#, resolve_color(*border, dark));
                }
                svg.push('>');
                if let Some(label) = label {
                    let _ = write!(svg, "<title>{}</title>", escape_xml(label));
                }
                svg.push_str("</rect>");

                if let Some(label) = label
                    && rect.w > 30.0
                    && rect.h <= INLINE_LABEL_MAX_HEIGHT
                {
                    let text_color = resolve_color(ThemeToken::TextPrimary, dark);
                    let tx = rect.x + 3.0;
                    let ty = rect.y + rect.h * 0.75;
                    let max_chars = (rect.w / 7.0) as usize;
                    let text = if label.chars().count() > max_chars && max_chars > 2 {
                        let truncated: String = label.chars().take(max_chars - 1).collect();
                        format!("{truncated}…")
                    } else {
                        label.to_string()
                    };
                    let _ = write!(
                        svg,
                        r#"<text x="{tx}" y="{ty}" fill="{text_color}" style="pointer-events:none">{}</text>"#,
                        escape_xml(&text),
                    );
                }
            }
            RenderCommand::DrawLine {
                from,
                to,
                color,
                width: line_width,
            } => {
                let stroke = resolve_color(*color, dark);
                let _ = write!(
                    svg,
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{stroke}" stroke-width="{line_width}"/>"#,
                    from.x, from.y, to.x, to.y,
                );
            }
            RenderCommand::DrawText {
                text,
                position,
                color,
                font_size,
                align,
            } => {
                let fill = resolve_color(*color, dark);
                let anchor = match align {
                    TextAlign::Left => "start",
                    TextAlign::Center => "middle",
                    TextAlign::Right => "end",
                };
                let _ = write!(
                    svg,
                    r#"<text x="{}" y="{}" fill="{fill}" font-size="{font_size}" text-anchor="{anchor}">{}</text>"#,
                    position.x,
                    position.y,
                    escape_xml(text),
                );
            }
            RenderCommand::BeginGroup { id, .. } => {
                let _ = write!(svg, r#"<g id="{}">"#, escape_xml(id));
            }
            RenderCommand::EndGroup => svg.push_str("</g>"),
        }
    }

    svg.push_str("</svg>");
    svg
}

fn resolve_color(token: ThemeToken, dark: bool) -> &'static str {
    use ThemeToken as T;
    if dark {
        match token {
            T::Background => "#181818",
            T::Surface | T::CardBackground | T::TableRowEven => "#202020",
            T::TableRowOdd => "#262626",
            T::TableHeaderBackground => "#2e2e2e",
            T::Border | T::TableBorder | T::CardBorder | T::ChartGrid => "#3a3a3a",
            T::TextPrimary => "#ececec",
            T::TextSecondary | T::ChartAxisText => "#b0b0b0",
            T::TextMuted => "#8a8a8a",
            T::BarFill => "#448aff",
            T::BeforeSeries => "#ff9800",
            T::AfterSeries => "#4fc3f7",
            T::DiffImproved => "#66bb6a",
            T::DiffRegressed => "#ef5350",
            T::DiffNeutral => "#9e9e9e",
            T::CauseHooks => "#ab47bc",
            T::CauseProps => "#42a5f5",
            T::CauseState => "#ffa726",
            T::CauseContext => "#26a69a",
            T::CauseMount => "#78909c",
        }
    } else {
        match token {
            T::Background => "#ffffff",
            T::Surface | T::CardBackground | T::TableRowEven => "#ffffff",
            T::TableRowOdd => "#f6f7f9",
            T::TableHeaderBackground => "#eceef1",
            T::Border | T::TableBorder | T::CardBorder | T::ChartGrid => "#dee2e6",
            T::TextPrimary => "#1a1a2e",
            T::TextSecondary | T::ChartAxisText => "#4a4a5a",
            T::TextMuted => "#666677",
            T::BarFill => "#457b9d",
            T::BeforeSeries => "#e67e22",
            T::AfterSeries => "#2980b9",
            T::DiffImproved => "#27ae60",
            T::DiffRegressed => "#e63946",
            T::DiffNeutral => "#6c757d",
            T::CauseHooks => "#8e44ad",
            T::CauseProps => "#2e86de",
            T::CauseState => "#f39c12",
            T::CauseContext => "#16a085",
            T::CauseMount => "#7f8c8d",
        }
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
