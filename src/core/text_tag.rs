//! Freie Text-Tags, optional an eine Linie gebunden.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Stil-Optionen eines Text-Tags.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextTagStyle {
    /// Schriftgröße; `None` = global
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f32>,
    /// Textfarbe (RGBA); `None` = global
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<[f32; 4]>,
    /// Innenabstand
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<f32>,
    /// Umbruchbreite
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
}

/// Frei platzierbarer Text auf dem Netzplan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextTag {
    /// Dokumentweit eindeutige ID
    pub id: u64,
    /// Position in Dokumentkoordinaten
    pub pos: Vec2,
    /// Annotierte Linie (nicht-besitzende Rückreferenz)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub for_line: Option<u64>,
    /// Haupttext
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Untertitel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_sub: Option<String>,
    /// Stil-Optionen
    #[serde(default)]
    pub style: TextTagStyle,
}

impl TextTag {
    /// Erstellt einen leeren Tag an der Position.
    pub fn new(id: u64, pos: Vec2, for_line: Option<u64>) -> Self {
        Self {
            id,
            pos,
            for_line,
            text: None,
            text_sub: None,
            style: TextTagStyle::default(),
        }
    }
}
