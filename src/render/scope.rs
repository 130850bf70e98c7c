//! Render-Umfang und -Optionen eines Haupt-Durchlaufs.

/// Welche Teile des Dokuments sich seit dem letzten Durchlauf geändert haben.
///
/// `None` bedeutet jeweils "alle". Das ist ein eigenes Signal, kein leerer
/// Spezialfall: eine leere Liste heißt "nichts von dieser Sorte geändert".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderScope {
    /// Linien, deren Geometrie sich geändert hat; `None` = alle
    pub changed_lines: Option<Vec<u64>>,
    /// Punkte, deren Namensposition sich geändert hat; `None` = alle
    pub moved_labels: Option<Vec<u64>>,
}

impl RenderScope {
    /// Kompletter Neuaufbau aller Layer.
    pub fn everything() -> Self {
        Self {
            changed_lines: None,
            moved_labels: None,
        }
    }

    /// Begrenzter Umfang aus geänderten Linien und bewegten Namen.
    pub fn partial(changed_lines: Vec<u64>, moved_labels: Vec<u64>) -> Self {
        Self {
            changed_lines: Some(changed_lines),
            moved_labels: Some(moved_labels),
        }
    }

    /// Ob der Umfang "alles" bedeutet.
    pub fn is_everything(&self) -> bool {
        self.changed_lines.is_none() && self.moved_labels.is_none()
    }
}

/// Stufe der Werbe-Einblendung.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdsMode {
    /// Keine Einblendung
    #[default]
    No,
    /// Dezente Einblendung
    Less,
    /// Volle Einblendung
    More,
}

/// Optionen eines Haupt-Render-Durchlaufs.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Geänderte Teile seit dem letzten Durchlauf
    pub scope: RenderScope,
    /// Unterdrückt den "gerendert"-Hook (gegen rekursives Re-Rendern)
    pub suppress_rendered_callback: bool,
    /// Export-Durchlauf (füllt Hintergrund, Kern-Pass nicht hohl)
    pub for_export: bool,
    /// Beim Export: Hintergrundfüllung überspringen
    pub transparent_background: bool,
    /// Werbe-Einblendung
    pub with_ads: AdsMode,
    /// Wasserzeichen unabhängig vom Modus unterdrücken
    pub disable_watermark: bool,
}
