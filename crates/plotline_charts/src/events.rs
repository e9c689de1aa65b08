//! Typed chart events and the synchronous bus that delivers them.
//!
//! Delivery happens inline on the emitting call: listeners for the event's
//! kind run first, in subscription order, then catch-all listeners, also in
//! subscription order. A slow listener delays every listener after it and the
//! caller's current event-loop turn.

use std::fmt;

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::config::BrushConfig;
use crate::index::KeyBucket;
use crate::key::KeyExtent;

/// Payload of every brush event.
#[derive(Clone, Debug, PartialEq)]
pub struct BrushExtentEvent {
    /// Domain extent `[start, end]` of the selection.
    pub extent: KeyExtent,
    /// Selection in pixels, ordered.
    pub selection_px: (f64, f64),
    pub config: BrushConfig,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ChartEvent {
    /// The pointer resolved to a new key bucket, drawn at `pixel_x`.
    Hover { bucket: KeyBucket, pixel_x: f64 },
    /// The pointer left the plot or no longer resolves to a bucket.
    HoverEnd,
    BrushStart(BrushExtentEvent),
    BrushMove(BrushExtentEvent),
    BrushEnd(BrushExtentEvent),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Hover,
    HoverEnd,
    BrushStart,
    BrushMove,
    BrushEnd,
}

impl ChartEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Hover { .. } => EventKind::Hover,
            Self::HoverEnd => EventKind::HoverEnd,
            Self::BrushStart(_) => EventKind::BrushStart,
            Self::BrushMove(_) => EventKind::BrushMove,
            Self::BrushEnd(_) => EventKind::BrushEnd,
        }
    }

    pub fn brush(&self) -> Option<&BrushExtentEvent> {
        match self {
            Self::BrushStart(e) | Self::BrushMove(e) | Self::BrushEnd(e) => Some(e),
            _ => None,
        }
    }
}

/// Event listener function type
pub type Listener = Box<dyn FnMut(&ChartEvent) + Send>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Ordered, synchronous dispatcher for [`ChartEvent`]s.
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    by_kind: FxHashMap<EventKind, Vec<(ListenerId, Listener)>>,
    catch_all: Vec<(ListenerId, Listener)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc_id(&mut self) -> ListenerId {
        self.next_id += 1;
        ListenerId(self.next_id)
    }

    /// Register a listener for one event kind
    pub fn subscribe<F>(&mut self, kind: EventKind, listener: F) -> ListenerId
    where
        F: FnMut(&ChartEvent) + Send + 'static,
    {
        let id = self.alloc_id();
        self.by_kind
            .entry(kind)
            .or_default()
            .push((id, Box::new(listener)));
        id
    }

    /// Register a listener for every event
    pub fn subscribe_all<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&ChartEvent) + Send + 'static,
    {
        let id = self.alloc_id();
        self.catch_all.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.len();
        for list in self.by_kind.values_mut() {
            list.retain(|(lid, _)| *lid != id);
        }
        self.catch_all.retain(|(lid, _)| *lid != id);
        self.len() != before
    }

    pub fn len(&self) -> usize {
        self.by_kind.values().map(Vec::len).sum::<usize>() + self.catch_all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver `event` to its listeners; returns how many were called.
    pub fn emit(&mut self, event: &ChartEvent) -> usize {
        let mut delivered = 0;
        if let Some(list) = self.by_kind.get_mut(&event.kind()) {
            for (_, listener) in list.iter_mut() {
                listener(event);
                delivered += 1;
            }
        }
        for (_, listener) in self.catch_all.iter_mut() {
            listener(event);
            delivered += 1;
        }
        trace!(kind = ?event.kind(), delivered, "event emitted");
        delivered
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.len())
            .finish()
    }
}
