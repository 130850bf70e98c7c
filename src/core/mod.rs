//! Core-Domänentypen: Punkte, Linien, Dokument, Clustering, Spatial-Index.

pub mod cluster;
pub mod document;
pub mod geometry;
pub mod line;
pub mod point;
pub mod point_link;
pub mod spatial;
pub mod text_tag;

pub use cluster::{clinging, ClusterEngine, SizeMetric};
pub use document::{Document, DocumentConfig, MergeResult};
pub use line::{ColorPreset, LineDisplay, LineKind, MapLine};
pub use point::{MapPoint, PointDir, PointKind, StationLabel};
pub use point_link::{PointLink, PointLinkKind};
pub use spatial::{SpatialIndex, SpatialMatch};
pub use text_tag::{TextTag, TextTagStyle};
