//! plotline_charts
//!
//! Headless core of an interactive series chart: turns heterogeneous series
//! input into a normalized, key-indexed model with scales and stack layouts,
//! and turns pointer input back into domain keys, hovers and brush extents.
//!
//! Rendering is left to the caller. Everything here is plain data plus a
//! synchronous event bus.

mod brush;
mod hover;

pub mod chart;
pub mod color;
pub mod config;
pub mod error;
pub mod events;
pub mod group;
pub mod index;
pub mod invert;
pub mod key;
pub mod normalize;
pub mod scale;
pub mod scales;
pub mod series;
pub mod stack;
pub mod state;

pub use brush::{BrushPhase, BrushRangeExtractor, BrushX, GestureSource};
pub use chart::{series_chart, SeriesChart, SeriesChartHandle};
pub use error::{ChartError, Result};
pub use hover::HoverTracker;
pub use state::ChartState;

/// Common imports for chart users.
pub mod prelude {
    pub use crate::brush::{BrushPhase, BrushRangeExtractor, GestureSource};
    pub use crate::chart::{series_chart, SeriesChart, SeriesChartHandle};
    pub use crate::color::ColorScale;
    pub use crate::config::{
        BrushConfig, CategorySort, ChartConfig, ChartOptions, ChartType, ColorConfig, ColorEntry,
        Dimensions, InvalidKeyPolicy, KeyType, NullPolicy,
    };
    pub use crate::error::{ChartError, Result};
    pub use crate::events::{BrushExtentEvent, ChartEvent, EventBus, EventKind, ListenerId};
    pub use crate::group::{Axis, AxisGroups};
    pub use crate::hover::HoverTracker;
    pub use crate::index::{KeyBucket, KeyIndex};
    pub use crate::invert::CoordinateInverter;
    pub use crate::key::{Key, KeyExtent};
    pub use crate::scale::{LinearScale, PointScale, XScale};
    pub use crate::scales::ScaleSet;
    pub use crate::series::{DataPoint, RawPoint, RawScalar, RawSeries, Series, SeriesInput};
    pub use crate::stack::{StackLayout, StackRow};
    pub use crate::state::ChartState;
}
