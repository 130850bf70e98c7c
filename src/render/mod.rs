//! Render-Dispatch: Layer-Reihenfolge und Umfang, Rasterung extern.

pub mod dispatcher;
pub mod painter;
pub mod scope;

pub use dispatcher::RenderDispatcher;
pub use painter::{ClusterPass, LayerPainter, LinePass, TracingPainter, WatermarkPhase};
pub use scope::{AdsMode, RenderOptions, RenderScope};
