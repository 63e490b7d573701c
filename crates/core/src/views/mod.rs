//! Dashboard views. Each turns the session into a list of render commands.

pub mod comparison;
pub mod components;
pub mod format;
pub mod overview;
pub mod rerenders;
pub mod timeline;
pub mod widgets;

use profdiff_protocol::{RenderCommand, Viewport};
use serde::{Deserialize, Serialize};

use crate::compare::{RankQuery, SortKey};
use crate::model::Session;

pub use widgets::{CHAR_WIDTH, ROW_HEIGHT};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    #[default]
    Overview,
    Components,
    Rerenders,
    Timeline,
    Comparison,
}

impl ViewKind {
    pub const ALL: [ViewKind; 5] = [
        ViewKind::Overview,
        ViewKind::Components,
        ViewKind::Rerenders,
        ViewKind::Timeline,
        ViewKind::Comparison,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Components => "Components",
            Self::Rerenders => "Re-renders",
            Self::Timeline => "Timeline",
            Self::Comparison => "Comparison",
        }
    }

    /// Whether the view needs both captures to show anything.
    pub fn needs_both(self) -> bool {
        matches!(self, Self::Comparison)
    }
}

impl std::fmt::Display for ViewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Overview => write!(f, "overview"),
            Self::Components => write!(f, "components"),
            Self::Rerenders => write!(f, "rerenders"),
            Self::Timeline => write!(f, "timeline"),
            Self::Comparison => write!(f, "comparison"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown view {0:?} (expected overview, components, rerenders, timeline or comparison)")]
pub struct UnknownView(pub String);

impl std::str::FromStr for ViewKind {
    type Err = UnknownView;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownView(s.to_string()))
    }
}

/// Display settings, as read from the `[display]` config section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayOptions {
    /// Rows per table; 0 shows every row.
    pub row_limit: usize,
    /// Tree paths listed per component before "…and N more".
    pub path_limit: usize,
    /// Scheduling events counted on the timeline tab.
    pub scheduling_window: usize,
    /// Components shown in the scheduling breakdown.
    pub scheduling_top: usize,
    pub sort: SortKey,
    pub show_paths: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            row_limit: 100,
            path_limit: 5,
            scheduling_window: 500,
            scheduling_top: 20,
            sort: SortKey::Renders,
            show_paths: false,
        }
    }
}

impl DisplayOptions {
    pub fn view_state(&self) -> ViewState {
        ViewState {
            query: RankQuery {
                filter: String::new(),
                sort: self.sort,
                limit: (self.row_limit > 0).then_some(self.row_limit),
            },
            show_paths: self.show_paths,
            path_limit: self.path_limit,
            scheduling_window: self.scheduling_window,
            scheduling_top: self.scheduling_top,
        }
    }
}

/// Interactive state a view is rendered with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub query: RankQuery,
    pub show_paths: bool,
    pub path_limit: usize,
    pub scheduling_window: usize,
    pub scheduling_top: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        DisplayOptions::default().view_state()
    }
}

/// Render one dashboard view of the session.
pub fn render_view(
    kind: ViewKind,
    session: &Session,
    viewport: &Viewport,
    state: &ViewState,
) -> Vec<RenderCommand> {
    if !session.has_any() {
        return widgets::placeholder(
            &kind.to_string(),
            viewport,
            "Load a before or after capture to begin.",
        );
    }
    match kind {
        ViewKind::Overview => overview::render_overview(session, viewport),
        ViewKind::Components => components::render_components(session, viewport, state),
        ViewKind::Rerenders => rerenders::render_rerenders(session, viewport, state),
        ViewKind::Timeline => timeline::render_timeline(session, viewport, state),
        ViewKind::Comparison => comparison::render_comparison(session, viewport, state),
    }
}

/// Bottom edge of the lowest rect or text baseline in `commands`.
pub fn content_height(commands: &[RenderCommand]) -> f64 {
    commands
        .iter()
        .map(|c| match c {
            RenderCommand::DrawRect { rect, .. } => rect.bottom(),
            RenderCommand::DrawText { position, .. } => position.y,
            RenderCommand::DrawLine { from, to, .. } => from.y.max(to.y),
            _ => 0.0,
        })
        .fold(0.0, f64::max)
}


#[cfg(test)]
mod tests {
    use super::test_util::*;
    use super::*;
    use crate::model::ProcessedCapture;

    #[test]
    fn view_kind_parsing() {
        assert_eq!("Rerenders".parse::<ViewKind>().ok(), Some(ViewKind::Rerenders));
        assert!("heatmap".parse::<ViewKind>().is_err());
        assert_eq!(ViewKind::Comparison.to_string(), "comparison");
    }

    #[test]
    fn zero_row_limit_is_unlimited() {
        let display = DisplayOptions {
            row_limit: 0,
            ..DisplayOptions::default()
        };
        assert_eq!(display.view_state().query.limit, None);
        assert_eq!(ViewState::default().query.limit, Some(100));
    }

    #[test]
    fn empty_session_renders_placeholder() {
        let session = Session::default();
        for kind in ViewKind::ALL {
            let viewport = Viewport::new(800.0, 600.0);
            let commands = render_view(kind, &session, &viewport, &ViewState::default());
            assert!(texts(&commands).iter().any(|t| t.contains("Load a before or after")));
        }
    }

    #[test]
    fn every_view_renders_with_one_capture() {
        let session = session(Some(ProcessedCapture::default()), None);
        for kind in ViewKind::ALL {
            let viewport = Viewport::new(800.0, 600.0);
            let commands = render_view(kind, &session, &viewport, &ViewState::default());
            assert!(!commands.is_empty(), "{kind} rendered nothing");
            assert!(content_height(&commands) >= 0.0);
        }
    }
}
