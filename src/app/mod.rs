//! Application-Layer: Editor-Zustandsmaschine, Commands, Geometriedienste.

pub mod command;
pub mod editor;
mod ops_menu;
mod pointer;
pub mod services;
pub mod state;
mod structure;

pub use command::{ClickKind, EditorCommand, OpsButton};
pub use editor::{Editor, OpsHook, RerenderHook};
pub use services::{
    ExtendHit, GeoHitTester, GridSnapper, HitTester, LineHit, SnapGrade, SnapService,
};
pub use state::{DragState, EditingState, LinkBuilder, PointPart, Selection};
