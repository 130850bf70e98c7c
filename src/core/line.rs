//! Linien: geordnete Punktfolgen mit Darstellungs-Attributen.

use serde::{Deserialize, Serialize};

/// Art einer Linie: Verkehrslinie oder Gelände-Hintergrundform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineKind {
    /// Verkehrslinie mit Stationen
    #[default]
    Common,
    /// Gelände-Form (Wasser, Grünfläche, …), ohne Stationen
    Terrain,
}

/// Farb-Voreinstellung für Gelände-Formen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorPreset {
    /// Keine Voreinstellung (freie Farbe)
    #[default]
    None,
    /// Stadtgebiet
    Area,
    /// Wasserfläche
    Water,
    /// Grünfläche
    Greenland,
    /// Insel
    Island,
}

/// Darstellungs-Attribute einer Linie.
///
/// Kindlinien besitzen zwar ein eigenes `display`-Feld (Serialisierung),
/// gelesen wird aber immer die Fassung der Elternlinie,
/// siehe [`crate::core::Document::effective_display`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineDisplay {
    /// Linienfarbe (RGBA)
    pub color: [f32; 4],
    /// Linienbreite in Welteinheiten
    #[serde(default = "default_line_width")]
    pub width: f32,
    /// Referenz auf einen Linienstil (externe Stil-Tabelle)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<u64>,
    /// Gruppen-Zugehörigkeit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<u64>,
    /// Zeichenreihenfolge innerhalb der Linienart
    #[serde(default)]
    pub z_index: i32,
    /// Gefüllte Darstellung (nur Gelände)
    #[serde(default)]
    pub is_filled: bool,
    /// Farb-Voreinstellung (nur Gelände)
    #[serde(default)]
    pub color_preset: ColorPreset,
    /// Größen-Override für Punkte entlang der Linie
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_size: Option<f32>,
    /// Größen-Override für Stationsnamen entlang der Linie
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_size: Option<f32>,
    /// Unterdrückt den Teppich-Pass dieser Linie
    #[serde(default)]
    pub remove_carpet: bool,
}

fn default_line_width() -> f32 {
    1.0
}

impl Default for LineDisplay {
    fn default() -> Self {
        Self {
            color: [0.0, 0.0, 0.0, 1.0],
            width: 1.0,
            style: None,
            group: None,
            z_index: 0,
            is_filled: false,
            color_preset: ColorPreset::None,
            point_size: None,
            label_size: None,
            remove_carpet: false,
        }
    }
}

/// Linie des Netzplans: geordnete Punktfolge plus Darstellung.
///
/// Invariante: mindestens 2 Punkte, keine zwei gleichen IDs direkt
/// hintereinander. Linien, die darunter fallen, werden vom Editor entfernt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapLine {
    /// Dokumentweit eindeutige ID
    pub id: u64,
    /// Geordnete Punkt-IDs
    pub pts: Vec<u64>,
    /// Anzeigename
    #[serde(default)]
    pub name: String,
    /// Untertitel
    #[serde(default)]
    pub name_sub: String,
    /// Linienart
    #[serde(default)]
    pub kind: LineKind,
    /// Elternlinie: Kind erbt deren Darstellung (eine Ebene tief)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<u64>,
    /// Darstellungs-Attribute (bei Kindlinien ungenutzt)
    #[serde(default)]
    pub display: LineDisplay,
}

impl MapLine {
    /// Erstellt eine Linie mit gegebener Punktfolge.
    pub fn new(id: u64, pts: Vec<u64>, kind: LineKind) -> Self {
        Self {
            id,
            pts,
            name: String::new(),
            name_sub: String::new(),
            kind,
            parent: None,
            display: LineDisplay::default(),
        }
    }

    /// Ob die Punkt-ID in der Linie vorkommt.
    pub fn contains_point(&self, pt_id: u64) -> bool {
        self.pts.contains(&pt_id)
    }

    /// Ob die Punkt-ID ein Endpunkt (Kopf oder Schwanz) der Linie ist.
    pub fn is_endpoint(&self, pt_id: u64) -> bool {
        self.pts.first() == Some(&pt_id) || self.pts.last() == Some(&pt_id)
    }

    /// Entfernt direkt aufeinanderfolgende gleiche Punkt-IDs.
    pub fn dedup_consecutive_points(&mut self) {
        self.pts.dedup();
    }
}
