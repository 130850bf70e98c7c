//! Kontrollpunkte: die Knoten des Netzplans.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Ausrichtung eines Punkts (bestimmt die Knick-Richtung anliegender Linien).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PointDir {
    /// Senkrecht/waagerecht ausgerichtet
    #[default]
    Vertical,
    /// Diagonal (45°) ausgerichtet
    Incline,
}

impl PointDir {
    /// Wechselt zwischen den beiden Ausrichtungen.
    pub fn toggled(self) -> Self {
        match self {
            PointDir::Vertical => PointDir::Incline,
            PointDir::Incline => PointDir::Vertical,
        }
    }
}

/// Art eines Punkts: reiner Geometrieknoten oder Station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PointKind {
    /// Geometrieknoten ohne Stationssymbol
    #[default]
    Plain,
    /// Station (nimmt am Clustering teil)
    Station,
}

impl PointKind {
    /// Wechselt zwischen Knoten und Station.
    pub fn toggled(self) -> Self {
        match self {
            PointKind::Plain => PointKind::Station,
            PointKind::Station => PointKind::Plain,
        }
    }
}

/// Stationsname samt Position relativ zum Punkt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationLabel {
    /// Haupttext
    pub text: String,
    /// Untertitel (z.B. Zweitsprache)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_text: Option<String>,
    /// Offset des Namensankers relativ zur Punktposition
    #[serde(default)]
    pub offset: Vec2,
    /// Schriftgrößen-Override; `None` = linienbestimmte Größe
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f32>,
}

impl StationLabel {
    /// Erstellt einen Namen ohne Untertitel am Standard-Offset.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sub_text: None,
            offset: Vec2::ZERO,
            size: None,
        }
    }
}

/// Einzelner Kontrollpunkt des Netzplans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapPoint {
    /// Dokumentweit eindeutige ID (monoton vergeben, nie wiederverwendet)
    pub id: u64,
    /// Position in Dokumentkoordinaten
    pub pos: Vec2,
    /// Ausrichtung
    #[serde(default)]
    pub dir: PointDir,
    /// Punktart
    #[serde(default)]
    pub kind: PointKind,
    /// Optionaler Stationsname
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<StationLabel>,
    /// Isolierte Stationen clustern nur bei exakter Koordinaten-Gleichheit
    #[serde(default)]
    pub isolated: bool,
}

impl MapPoint {
    /// Erstellt einen Punkt ohne Namen.
    pub fn new(id: u64, pos: Vec2, dir: PointDir, kind: PointKind) -> Self {
        Self {
            id,
            pos,
            dir,
            kind,
            label: None,
            isolated: false,
        }
    }

    /// Globale Position des Namensankers (Punktposition + Offset).
    pub fn label_anchor(&self) -> Option<Vec2> {
        self.label.as_ref().map(|l| self.pos + l.offset)
    }

    /// Ob der Punkt eine Station ist.
    pub fn is_station(&self) -> bool {
        self.kind == PointKind::Station
    }
}
