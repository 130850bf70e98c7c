//! Commands sind mutierende Schritte, die zentral ausgeführt werden.
//!
//! Das Operations-Menü liefert Buttons, deren `action` ein Command ist:
//! der Host reicht ihn unverändert an [`crate::app::Editor::handle_command`]
//! zurück. So bleibt das Menü reine Daten, ohne eingefangene Closures.

use glam::Vec2;

use crate::core::{LineKind, PointDir, PointKind, PointLinkKind};

/// Klassifizierter Klick, wie ihn der Host liefert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickKind {
    /// Einfacher Klick
    Plain,
    /// Rechtsklick
    Right,
    /// Rechtsklick mit gehaltener Modifier-Taste
    RightWithModifier,
}

impl ClickKind {
    /// Ob es sich um irgendeine Form von Rechtsklick handelt.
    pub fn is_right(self) -> bool {
        !matches!(self, ClickKind::Plain)
    }
}

/// Mutierende Editor-Operationen.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorCommand {
    /// Ausrichtung eines Punkts umschalten
    RotatePoint {
        /// Punkt-ID
        id: u64,
    },
    /// Punktart (Knoten ⇔ Station) umschalten; erzwingt ein Recluster
    TogglePointKind {
        /// Punkt-ID
        id: u64,
    },
    /// Isolations-Flag umschalten; erzwingt ein Recluster
    ToggleIsolated {
        /// Punkt-ID
        id: u64,
    },
    /// Den aktiven Punkt entfernen
    RemoveActivePoint,
    /// Bestehenden Punkt in eine Linie aufnehmen
    JoinLine {
        /// Punkt-ID
        pt: u64,
        /// Ziel-Linie
        line: u64,
        /// Einfüge-Index in der Punktfolge
        insert_at: usize,
    },
    /// Punkt aus einer Linie herauslösen
    LeaveLine {
        /// Punkt-ID
        pt: u64,
        /// Linien-ID
        line: u64,
    },
    /// Alle Verbinder des Punkts entfernen
    UnlinkPoint {
        /// Punkt-ID
        pt: u64,
    },
    /// Neuen Punkt an einer Linienstelle einfügen
    InsertPointOnLine {
        /// Linien-ID
        line: u64,
        /// Einfüge-Index in der Punktfolge
        insert_at: usize,
        /// Position des neuen Punkts
        pos: Vec2,
        /// Ausrichtung des neuen Punkts
        dir: PointDir,
        /// Knoten oder Station
        kind: PointKind,
    },
    /// Linie an einem Punkt in zwei Linien teilen
    SplitLineAt {
        /// Linien-ID
        line: u64,
        /// Teilungspunkt
        pt: u64,
    },
    /// Zwei Linien an ihrem gemeinsamen Endpunkt verbinden
    MergeLinesAt {
        /// Erste (überlebende) Linie
        line1: u64,
        /// Zweite Linie (wird aufgelöst)
        line2: u64,
        /// Gemeinsamer Endpunkt
        pt: u64,
    },
    /// Neue Linie nahe der Ansichtsmitte erstellen
    CreateLine {
        /// Linienart
        kind: LineKind,
        /// Gruppen-Zugehörigkeit
        group: Option<u64>,
        /// Elternlinie (nur Verkehrslinien)
        parent: Option<u64>,
    },
    /// Einzelnen Knoten nahe der Ansichtsmitte erstellen
    CreatePlainPoint,
    /// Text-Tag erstellen, optional an eine Linie gebunden
    CreateTextTag {
        /// Annotierte Linie
        for_line: Option<u64>,
    },
    /// Aktiven Text-Tag duplizieren
    DuplicateTextTag,
    /// Aktiven Text-Tag löschen
    DeleteActiveTextTag,
    /// Linie löschen, optional samt exklusiv zugehöriger Punkte
    DeleteLine {
        /// Linien-ID
        id: u64,
        /// Auch Punkte entfernen, die nur dieser Linie gehören
        del_with_sta: bool,
    },
    /// Verbinder-Erstellung starten
    StartPointLink {
        /// Darstellungsart
        kind: PointLinkKind,
    },
    /// Verbinder-Erstellung abbrechen
    AbortPointLink,
    /// Direkt aufeinanderfolgende Punkt-Wiederholungen auf allen Linien entfernen
    RemoveRepeatPoints,
    /// Geänderte Linien-Darstellung melden (vom Host nach einem
    /// Einstellungs-Edit); bei Größenänderung clustern die Stationen
    /// entlang der Linie neu
    LineInfoChanged {
        /// Linien-ID
        id: u64,
        /// Hat sich eine stationswirksame Größe geändert?
        sta_size_changed: bool,
    },
    /// Einstellungs-Oberfläche für eine Linie anfordern (Host-Belang)
    OpenLineSettings {
        /// Linien-ID
        id: u64,
    },
    /// Einstellungs-Oberfläche für einen Punkt anfordern (Host-Belang)
    OpenPointSettings {
        /// Punkt-ID
        id: u64,
    },
}

/// Button des Operations-Menüs.
#[derive(Debug, Clone, PartialEq)]
pub struct OpsButton {
    /// Beschriftung
    pub text: String,
    /// Untertitel
    pub text_sub: Option<String>,
    /// Farbfeld (z.B. Linienfarbe)
    pub color: Option<[f32; 4]>,
    /// Auszuführendes Command
    pub action: EditorCommand,
}

impl OpsButton {
    /// Erstellt einen Button ohne Untertitel und Farbe.
    pub fn plain(text: impl Into<String>, action: EditorCommand) -> Self {
        Self {
            text: text.into(),
            text_sub: None,
            color: None,
            action,
        }
    }
}
