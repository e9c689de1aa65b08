use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::brush::{BrushPhase, BrushRangeExtractor, GestureSource};
use crate::config::ChartConfig;
use crate::error::Result;
use crate::events::{ChartEvent, EventBus, EventKind, ListenerId};
use crate::hover::HoverTracker;
use crate::series::RawSeries;
use crate::state::ChartState;

/// Interactive chart controller.
///
/// Owns the caller's input, the current [`ChartState`] snapshot and the
/// interaction state (brush + hover). Pointer coordinates are local to the
/// plot area: `x` in `[0, width]`, `y` in `[0, height]`.
///
/// A rebuild either fully succeeds and replaces the snapshot, or fails and
/// leaves the previous snapshot and interaction state untouched.
pub struct SeriesChart {
    config: ChartConfig,
    input: Vec<RawSeries>,
    state: ChartState,
    bus: EventBus,
    brush: BrushRangeExtractor,
    hover: HoverTracker,
}

impl std::fmt::Debug for SeriesChart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeriesChart")
            .field("config", &self.config)
            .field("series", &self.input.len())
            .field("brush", &self.brush.phase())
            .field("hover", &self.hover.current())
            .field("listeners", &self.bus.len())
            .finish()
    }
}

impl SeriesChart {
    pub fn new(config: ChartConfig, input: Vec<RawSeries>) -> Result<Self> {
        let state = ChartState::build(&input, &config)?;
        let brush = BrushRangeExtractor::new(config.brush.clone());
        Ok(Self {
            config,
            input,
            state,
            bus: EventBus::new(),
            brush,
            hover: HoverTracker::default(),
        })
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn input(&self) -> &[RawSeries] {
        &self.input
    }

    pub fn state(&self) -> &ChartState {
        &self.state
    }

    pub fn brush(&self) -> &BrushRangeExtractor {
        &self.brush
    }

    pub fn hover(&self) -> &HoverTracker {
        &self.hover
    }

    pub fn events(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    pub fn subscribe<F>(&mut self, kind: EventKind, listener: F) -> ListenerId
    where
        F: FnMut(&ChartEvent) + Send + 'static,
    {
        self.bus.subscribe(kind, listener)
    }

    pub fn subscribe_all<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&ChartEvent) + Send + 'static,
    {
        self.bus.subscribe_all(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Replaces the input data and rebuilds.
    pub fn set_data(&mut self, input: Vec<RawSeries>) -> Result<()> {
        let state = ChartState::build(&input, &self.config).map_err(|err| {
            warn!(%err, "data update rejected; keeping previous chart state");
            err
        })?;
        self.input = input;
        self.install(state);
        Ok(())
    }

    /// Replaces the configuration. An unchanged configuration is a no-op.
    pub fn set_config(&mut self, config: ChartConfig) -> Result<()> {
        if config == self.config {
            return Ok(());
        }
        let state = ChartState::build(&self.input, &config).map_err(|err| {
            warn!(%err, "config update rejected; keeping previous chart state");
            err
        })?;
        self.brush = BrushRangeExtractor::new(config.brush.clone());
        self.config = config;
        self.install(state);
        Ok(())
    }

    fn install(&mut self, state: ChartState) {
        // Pixel selections and hovered buckets refer to the old scales.
        self.brush.clear();
        self.hover = HoverTracker::default();
        self.state = state;
        debug!(buckets = self.state.index.len(), "chart state replaced");
    }

    /// Starts a brush gesture. Returns whether the brush engaged.
    pub fn pointer_down(&mut self, x: f64, y: f64) -> bool {
        if !self.config.dimensions.contains(x, y) {
            return false;
        }
        let inv = self.state.inverter();
        self.brush.pointer_down(x, &inv)
    }

    /// Updates hover and, while dragging, the brush. Returns the number of
    /// events delivered.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> usize {
        if !(x.is_finite() && y.is_finite()) {
            return 0;
        }
        let inv = self.state.inverter();
        let mut delivered = 0;

        let hover = if self.config.dimensions.contains(x, y) {
            self.hover.on_move(x, &inv)
        } else {
            self.hover.leave()
        };
        if let Some(event) = hover {
            delivered += self.bus.emit(&event);
        }

        // Dragging keeps tracking outside the plot; the brush clamps.
        if self.brush.phase() == BrushPhase::Dragging {
            if let Some(event) = self.brush.pointer_move(x, &inv) {
                delivered += self.bus.emit(&event);
            }
        }
        delivered
    }

    /// Ends the brush gesture. Only a user release commits and emits `BrushEnd`.
    pub fn pointer_up(&mut self, x: f64, source: GestureSource) -> usize {
        if !x.is_finite() {
            return 0;
        }
        let inv = self.state.inverter();
        match self.brush.pointer_up(x, source, &inv) {
            Some(event) => self.bus.emit(&event),
            None => 0,
        }
    }

    pub fn pointer_leave(&mut self) -> usize {
        match self.hover.leave() {
            Some(event) => self.bus.emit(&event),
            None => 0,
        }
    }

    /// Clears the selection without emitting anything.
    pub fn clear_brush(&mut self) {
        self.brush.clear();
    }

    /// Moves the selection programmatically. Emits nothing, and a later
    /// release does not commit it.
    pub fn set_brush_px(&mut self, a: f64, b: f64) {
        if a.is_finite() && b.is_finite() {
            self.brush.set_selection_px(a, b);
        }
    }
}

pub type SeriesChartHandle = Arc<Mutex<SeriesChart>>;

pub fn series_chart(config: ChartConfig, input: Vec<RawSeries>) -> Result<SeriesChartHandle> {
    Ok(Arc::new(Mutex::new(SeriesChart::new(config, input)?)))
}
