use profdiff_core::compare::{SortKey, SummaryDelta, UnknownSortKey};
use profdiff_core::model::{Session, Slot, SlotStatus, UnknownSlot};
use profdiff_core::parsers::ParseError;
use profdiff_core::views::{DisplayOptions, UnknownView, ViewKind, ViewState, render_view};
use profdiff_protocol::Viewport;
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, thiserror::Error)]
enum DashboardError {
    #[error(transparent)]
    Slot(#[from] UnknownSlot),
    #[error(transparent)]
    View(#[from] UnknownView),
    #[error(transparent)]
    Sort(#[from] UnknownSortKey),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

fn js(err: DashboardError) -> JsError {
    JsError::new(&err.to_string())
}

#[derive(Debug, Serialize)]
struct Status<'a> {
    before: &'a SlotStatus,
    after: &'a SlotStatus,
    has_both: bool,
}

/// Before/after session plus the interactive state of the web dashboard.
#[wasm_bindgen]
pub struct Dashboard {
    session: Session,
    state: ViewState,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl Dashboard {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            session: Session::default(),
            state: ViewState::default(),
        }
    }

    /// Replace display settings with a JSON `DisplayOptions` object. Missing
    /// fields take their defaults; the current filter is kept.
    pub fn configure(&mut self, display_json: &str) -> Result<(), JsError> {
        self.try_configure(display_json).map_err(js)
    }

    /// Parse an exported capture into `slot` ("before" or "after").
    pub fn load(&mut self, slot: &str, text: &str) -> Result<(), JsError> {
        self.try_load(slot, text).map_err(js)
    }

    pub fn clear(&mut self, slot: &str) -> Result<(), JsError> {
        let slot: Slot = slot.parse().map_err(|e| js(DashboardError::Slot(e)))?;
        self.session.clear(slot);
        Ok(())
    }

    /// Load state of both slots as JSON.
    pub fn status(&self) -> Result<String, JsError> {
        self.try_status().map_err(js)
    }

    /// The aggregated capture in `slot` as JSON, or `null`.
    pub fn processed(&self, slot: &str) -> Result<String, JsError> {
        self.try_processed(slot).map_err(js)
    }

    /// Headline deltas as JSON, or `null` unless both slots are loaded.
    pub fn summary(&self) -> Result<String, JsError> {
        let summary = self
            .session
            .pair()
            .map(|(before, after)| SummaryDelta::between(before, after));
        serde_json::to_string(&summary).map_err(|e| js(e.into()))
    }

    /// Render a view, returning render commands as JSON.
    pub fn render_view(
        &self,
        view: &str,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        dpr: f64,
    ) -> Result<String, JsError> {
        let viewport = Viewport {
            x,
            y,
            width,
            height,
            dpr,
        };
        self.try_render(view, &viewport).map_err(js)
    }

    pub fn set_filter(&mut self, filter: &str) {
        self.state.query.filter = filter.to_string();
    }

    pub fn set_sort(&mut self, sort: &str) -> Result<(), JsError> {
        self.state.query.sort = sort.parse().map_err(|e| js(DashboardError::Sort(e)))?;
        Ok(())
    }

    /// Flip tree-path expansion and return the new setting.
    pub fn toggle_paths(&mut self) -> bool {
        self.state.show_paths = !self.state.show_paths;
        self.state.show_paths
    }
}

impl Dashboard {
    fn try_configure(&mut self, display_json: &str) -> Result<(), DashboardError> {
        let display: DisplayOptions = serde_json::from_str(display_json)?;
        let filter = std::mem::take(&mut self.state.query.filter);
        self.state = display.view_state();
        self.state.query.filter = filter;
        Ok(())
    }

    fn try_load(&mut self, slot: &str, text: &str) -> Result<(), DashboardError> {
        let slot: Slot = slot.parse()?;
        self.session.load(slot, text.as_bytes(), format!("{slot}.json"))?;
        Ok(())
    }

    fn try_status(&self) -> Result<String, DashboardError> {
        let status = Status {
            before: self.session.status(Slot::Before),
            after: self.session.status(Slot::After),
            has_both: self.session.has_both(),
        };
        Ok(serde_json::to_string(&status)?)
    }

    fn try_processed(&self, slot: &str) -> Result<String, DashboardError> {
        let slot: Slot = slot.parse()?;
        Ok(serde_json::to_string(&self.session.get(slot))?)
    }

    fn try_render(&self, view: &str, viewport: &Viewport) -> Result<String, DashboardError> {
        let kind: ViewKind = view.parse()?;
        let commands = render_view(kind, &self.session, viewport, &self.state);
        Ok(serde_json::to_string(&commands)?)
    }
}
