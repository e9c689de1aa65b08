use tracing::trace;

use crate::config::BrushConfig;
use crate::events::{BrushExtentEvent, ChartEvent};
use crate::invert::CoordinateInverter;
use crate::key::KeyExtent;

/// Raw drag span along x, in plot pixels. Keys are resolved separately
/// against the current scales.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BrushX {
    active: bool,
    start_px: f64,
    cur_px: f64,
}

impl BrushX {
    pub fn begin(&mut self, x_px: f64) {
        self.active = true;
        self.start_px = x_px;
        self.cur_px = x_px;
    }

    pub fn update(&mut self, x_px: f64) {
        if self.active {
            self.cur_px = x_px;
        }
    }

    pub fn cancel(&mut self) {
        self.active = false;
    }

    pub fn range_px(&self) -> Option<(f64, f64)> {
        if !self.active {
            return None;
        }
        let (a, b) = (self.start_px, self.cur_px);
        Some(if a <= b { (a, b) } else { (b, a) })
    }

    pub fn take_final_px(&mut self) -> Option<(f64, f64)> {
        let r = self.range_px();
        self.active = false;
        r
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BrushPhase {
    Idle,
    Dragging,
    Committed,
}

/// Who moved the selection last.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GestureSource {
    #[default]
    User,
    Programmatic,
}

/// Brush interaction state machine.
///
/// - `Idle -> Dragging` on pointer-down inside the x range
/// - `Dragging`: each user move emits `BrushStart` (first non-empty selection)
///   or `BrushMove` with the inverted extent
/// - `Dragging -> Committed` on a user release with a non-empty selection;
///   the selection is re-snapped to the scale positions of the extent and
///   `BrushEnd` is emitted
/// - a release with an empty or programmatic selection returns to `Idle` silently
/// - `clear` returns to `Idle` without emitting anything
#[derive(Clone, Debug, PartialEq)]
pub struct BrushRangeExtractor {
    config: BrushConfig,
    phase: BrushPhase,
    brush: BrushX,
    last_source: GestureSource,
    started: bool,
    committed: Option<(KeyExtent, (f64, f64))>,
}

impl BrushRangeExtractor {
    pub fn new(config: BrushConfig) -> Self {
        Self {
            config,
            phase: BrushPhase::Idle,
            brush: BrushX::default(),
            last_source: GestureSource::User,
            started: false,
            committed: None,
        }
    }

    pub fn phase(&self) -> BrushPhase {
        self.phase
    }

    pub fn config(&self) -> &BrushConfig {
        &self.config
    }

    /// Current selection in pixels (live while dragging, snapped once committed).
    pub fn selection_px(&self) -> Option<(f64, f64)> {
        match self.phase {
            BrushPhase::Dragging => self.brush.range_px(),
            BrushPhase::Committed => self.committed.as_ref().map(|(_, px)| *px),
            BrushPhase::Idle => None,
        }
    }

    pub fn committed_extent(&self) -> Option<&KeyExtent> {
        match self.phase {
            BrushPhase::Committed => self.committed.as_ref().map(|(e, _)| e),
            _ => None,
        }
    }

    /// Starts a drag if `px` is inside the brushable x range.
    pub fn pointer_down(&mut self, px: f64, inv: &CoordinateInverter<'_>) -> bool {
        if !self.config.enabled || inv.invert(px).is_none() {
            return false;
        }
        self.transition(BrushPhase::Dragging);
        self.brush.begin(px);
        self.last_source = GestureSource::User;
        self.started = false;
        self.committed = None;
        true
    }

    pub fn pointer_move(&mut self, px: f64, inv: &CoordinateInverter<'_>) -> Option<ChartEvent> {
        if self.phase != BrushPhase::Dragging {
            return None;
        }
        self.brush.update(px);
        self.last_source = GestureSource::User;
        let sel = self.brush.range_px().filter(|s| self.wide_enough(*s))?;
        let event = self.extent_event(sel, inv)?;
        Some(if self.started {
            ChartEvent::BrushMove(event)
        } else {
            self.started = true;
            ChartEvent::BrushStart(event)
        })
    }

    /// Moves the selection without a user gesture; never emits.
    pub fn set_selection_px(&mut self, a: f64, b: f64) {
        if !self.config.enabled {
            return;
        }
        self.transition(BrushPhase::Dragging);
        self.brush.begin(a);
        self.brush.update(b);
        self.last_source = GestureSource::Programmatic;
        self.committed = None;
    }

    pub fn pointer_up(
        &mut self,
        px: f64,
        source: GestureSource,
        inv: &CoordinateInverter<'_>,
    ) -> Option<ChartEvent> {
        if self.phase != BrushPhase::Dragging {
            return None;
        }
        if source == GestureSource::User && self.last_source == GestureSource::User {
            self.brush.update(px);
        }
        let genuine = source == GestureSource::User && self.last_source == GestureSource::User;
        let sel = self.brush.take_final_px().filter(|s| self.wide_enough(*s));

        let committed = match (genuine, sel) {
            (true, Some(sel)) => self.extent_event(sel, inv).and_then(|e| {
                let a = inv.pixel_of(&e.extent.start)?;
                let b = inv.pixel_of(&e.extent.end)?;
                Some(BrushExtentEvent {
                    selection_px: if a <= b { (a, b) } else { (b, a) },
                    ..e
                })
            }),
            _ => None,
        };

        match committed {
            Some(event) => {
                self.committed = Some((event.extent.clone(), event.selection_px));
                self.transition(BrushPhase::Committed);
                Some(ChartEvent::BrushEnd(event))
            }
            None => {
                self.committed = None;
                self.transition(BrushPhase::Idle);
                None
            }
        }
    }

    /// Drops any selection. Emits nothing.
    pub fn clear(&mut self) {
        self.brush.cancel();
        self.committed = None;
        self.started = false;
        self.transition(BrushPhase::Idle);
    }

    fn transition(&mut self, to: BrushPhase) {
        if self.phase != to {
            trace!(from = ?self.phase, ?to, "brush transition");
            self.phase = to;
        }
    }

    fn wide_enough(&self, (a, b): (f64, f64)) -> bool {
        b - a >= self.config.min_selection_px.max(f64::MIN_POSITIVE)
    }

    fn extent_event(&self, sel: (f64, f64), inv: &CoordinateInverter<'_>) -> Option<BrushExtentEvent> {
        let start = inv.invert_clamped(sel.0)?;
        let end = inv.invert_clamped(sel.1)?;
        Some(BrushExtentEvent {
            extent: KeyExtent::new(start, end),
            selection_px: sel,
            config: self.config.clone(),
        })
    }
}
