#![forbid(unsafe_code)]

//! Sprout public facade crate.
//!
//! Re-exports the types most hosts need from the internal crates and
//! offers a prelude. A host typically builds a [`PlotSession`] over its own
//! [`PlotStore`], feeds it pointer, touch and key events, and shows the
//! [`Notice`]s it produces.

// --- Core re-exports -------------------------------------------------------

pub use sprout_core::event::{
    InputFocus, KeyCode, KeyEvent, KeyEventKind, Modifiers, PointerEvent, PointerEventKind,
    TouchEvent, TouchEventKind, TouchId,
};
pub use sprout_core::{
    DimensionParseError, GestureConfig, LengthUnit, Point, Rect, TouchGesture,
    TouchGestureRecognizer, parse_dimensions,
};

// --- Layout re-exports -----------------------------------------------------

pub use sprout_layout::{
    CellRect, Footprint, GridDims, GridPlacementEngine, LayoutSchema, ObjectKind, ObjectMetadata,
    Occupancy, PlacementError, PlantingMethod, calculate_schema,
};

// --- Canvas re-exports -----------------------------------------------------

pub use sprout_canvas::{
    AddObjects, CanvasConfig, CanvasError, Commit, ConfigError, DeleteOutcome, Direction,
    KeyOutcome, MemoryStore, Notice, ObjectId, PlacedObject, Planting, PlantingId,
    PlantingRequest, Plot, PlotId, PlotSession, PlotStore, Result, Rotation, SeasonId, Severity,
    SizeSource, SpatialCanvas, StackOrder, StoreError, TouchOutcome, TouchRouter,
    ValidationError, Viewport,
};

// --- Tracing ---------------------------------------------------------------

/// Install a global JSON subscriber filtered by `RUST_LOG`, defaulting to
/// `info` for the `sprout.*` targets.
///
/// Fails if a global subscriber is already set.
#[cfg(feature = "tracing-json")]
pub fn init_tracing() -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
    use tracing_subscriber::EnvFilter;

    // Target directives match by prefix, so this covers every sprout.* target.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sprout=info"));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        AddObjects, CanvasConfig, CanvasError, Commit, DeleteOutcome, KeyCode, KeyEvent,
        KeyOutcome, LayoutSchema, ObjectId, ObjectKind, PlantingRequest, Plot, PlotId,
        PlotSession, PlotStore, Point, Result, SeasonId, Severity, SizeSource, SpatialCanvas,
        TouchEvent, TouchOutcome, TouchRouter,
    };

    pub use crate::{canvas, core, layout};
}

pub use sprout_canvas as canvas;
pub use sprout_core as core;
pub use sprout_layout as layout;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use super::{MemoryStore, Notice};

    #[tokio::test]
    async fn prelude_covers_a_basic_session() {
        let mut session = PlotSession::new(
            MemoryStore::new(),
            Plot::new(PlotId(1), 96.0, 192.0),
            SeasonId(1),
            CanvasConfig::default(),
        );
        let ids = session
            .add_objects(AddObjects::new(
                ObjectKind::RaisedBed,
                SizeSource::Dimensions("4x8".into()),
            ))
            .await
            .unwrap();
        let placed = session
            .place_planting(ids[0], PlantingRequest::new("Tomato", 24.0))
            .await
            .unwrap();
        assert_eq!((placed.span_cols, placed.span_rows), (2, 2));
        let notices: Vec<Notice> = session.drain_notices();
        assert!(notices.is_empty());
    }
}
