//! Netzplan-Editor Library.
//! Editing-Kern als Library exportiert für Tests und Wiederverwendung.

pub mod app;
pub mod core;
pub mod persist;
pub mod render;
pub mod shared;

pub use app::{
    ClickKind, Editor, EditorCommand, GeoHitTester, GridSnapper, HitTester, OpsButton, PointPart,
    Selection, SnapGrade, SnapService,
};
pub use core::{
    ClusterEngine, Document, LineDisplay, LineKind, MapLine, MapPoint, PointDir, PointKind,
    PointLink, PointLinkKind, SizeMetric, StationLabel, TextTag,
};
pub use core::{SpatialIndex, SpatialMatch};
pub use persist::{load_document, save_document};
pub use render::{
    AdsMode, LayerPainter, RenderDispatcher, RenderOptions, RenderScope, TracingPainter,
};
pub use shared::EditorOptions;
