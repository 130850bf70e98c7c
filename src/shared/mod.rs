//! Querschnitts-Bausteine: Optionen und Ereignis-Drosselung.

pub mod options;
pub mod timing;

pub use options::EditorOptions;
pub use timing::{RescaleGate, TimeSpanClock};
