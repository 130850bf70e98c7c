//! Punkt-Verbinder: visuelle Verknüpfungen abseits der Linientopologie.

use serde::{Deserialize, Serialize};

/// Darstellungsart eines Punkt-Verbinders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PointLinkKind {
    /// Breiter Verbinder
    #[default]
    Fat,
    /// Schmaler Verbinder
    Thin,
    /// Punktierte Darstellung
    Dot,
    /// Punktiert mit Abdeckung
    DotCover,
    /// Cluster-artige Umrandung
    Cluster,
}

/// Verbinder zwischen Punkten (Mengen-Semantik, Reihenfolge egal).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointLink {
    /// Beteiligte Punkt-IDs
    pub pts: Vec<u64>,
    /// Darstellungsart
    #[serde(default)]
    pub kind: PointLinkKind,
}

impl PointLink {
    /// Erstellt einen Verbinder über die gegebenen Punkte.
    pub fn new(pts: Vec<u64>, kind: PointLinkKind) -> Self {
        Self { pts, kind }
    }

    /// Ob die Punkt-ID beteiligt ist.
    pub fn touches(&self, pt_id: u64) -> bool {
        self.pts.contains(&pt_id)
    }
}
