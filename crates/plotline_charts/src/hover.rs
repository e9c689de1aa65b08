use crate::events::ChartEvent;
use crate::invert::CoordinateInverter;

/// Tracks which key bucket the pointer is over.
///
/// Emits `Hover` only when the resolved bucket changes and `HoverEnd` when a
/// hovered pointer stops resolving to any bucket.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HoverTracker {
    current: Option<usize>,
}

impl HoverTracker {
    /// Index of the hovered bucket, if any.
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn on_move(&mut self, px: f64, inv: &CoordinateInverter<'_>) -> Option<ChartEvent> {
        let Some(i) = inv.bucket_index_at(px) else {
            return self.leave();
        };
        if self.current == Some(i) {
            return None;
        }
        let bucket = inv.index().get(i)?.clone();
        self.current = Some(i);
        // Report the bucket's own position so the crosshair snaps to data.
        let pixel_x = inv.pixel_of(&bucket.key).unwrap_or(px);
        Some(ChartEvent::Hover { bucket, pixel_x })
    }

    pub fn leave(&mut self) -> Option<ChartEvent> {
        self.current.take().map(|_| ChartEvent::HoverEnd)
    }
}
