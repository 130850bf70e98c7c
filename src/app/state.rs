//! Editor-Zustand: Auswahl, Drag-Lebenszyklus, Verbinder-Erstellung.

use glam::Vec2;

use crate::core::{PointDir, PointLink, PointLinkKind};

/// Welcher Teil eines Punkts gegriffen ist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointPart {
    /// Der Punktkörper
    Body,
    /// Der Stationsname
    Label,
}

/// Die aktive Auswahl: höchstens eine Entität zu jedem Zeitpunkt.
///
/// Die gegenseitige Ausschließlichkeit ist strukturell: keine drei einzeln
/// nullbaren Felder, deren Kombinationen niemand prüft.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection {
    /// Nichts ausgewählt
    None,
    /// Ein Punkt, mit gegriffenem Teil
    Point {
        /// Punkt-ID
        id: u64,
        /// Körper oder Name
        part: PointPart,
    },
    /// Eine Linie, samt Klickposition für Einfüge-Operationen
    Line {
        /// Linien-ID
        id: u64,
        /// Auf die Linie gelotete Klickposition
        cursor_pos: Vec2,
        /// Einfüge-Index für neue Punkte an dieser Stelle
        insert_at: usize,
        /// Richtungsvorschlag für eingefügte Punkte
        dir: PointDir,
    },
    /// Ein Text-Tag
    TextTag {
        /// Tag-ID
        id: u64,
    },
}

impl Selection {
    /// ID des ausgewählten Punkts, falls ein Punkt aktiv ist.
    pub fn point_id(&self) -> Option<u64> {
        match self {
            Selection::Point { id, .. } => Some(*id),
            _ => None,
        }
    }

    /// ID der ausgewählten Linie, falls eine Linie aktiv ist.
    pub fn line_id(&self) -> Option<u64> {
        match self {
            Selection::Line { id, .. } => Some(*id),
            _ => None,
        }
    }

    /// ID des ausgewählten Text-Tags, falls einer aktiv ist.
    pub fn text_tag_id(&self) -> Option<u64> {
        match self {
            Selection::TextTag { id } => Some(*id),
            _ => None,
        }
    }

    /// Ob überhaupt etwas ausgewählt ist.
    pub fn is_some(&self) -> bool {
        !matches!(self, Selection::None)
    }
}

/// Drag-Lebenszyklus. `moving_*` heißt "Geste läuft", `moved_*` heißt
/// "die Geste hat tatsächlich etwas verändert". So werden reine Klicks
/// von Drags unterschieden.
#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    /// Ein Punkt (Körper oder Name) wird gezogen
    pub moving_point: bool,
    /// Der Punkt wurde während der Geste verändert
    pub moved_point: bool,
    /// Ein Text-Tag wird gezogen
    pub moving_tag: bool,
    /// Der Tag wurde während der Geste verändert
    pub moved_tag: bool,
    /// Griff-Offset relativ zum Namensanker
    pub label_grab: Vec2,
    /// Griff-Offset relativ zur Tag-Position
    pub tag_grab: Vec2,
    /// Der Zeiger steht über der Verwerfen-Zone
    pub over_discard: bool,
    /// Ursprünglicher Endpunkt einer laufenden Verlängerungs-Geste
    pub extend_origin: Option<u64>,
}

impl Default for DragState {
    fn default() -> Self {
        Self {
            moving_point: false,
            moved_point: false,
            moving_tag: false,
            moved_tag: false,
            label_grab: Vec2::ZERO,
            tag_grab: Vec2::ZERO,
            over_discard: false,
            extend_origin: None,
        }
    }
}

impl DragState {
    /// Beendet die laufende Geste, behält aber die `moved_*`-Flags
    /// (der nächste Klick wertet sie aus).
    pub fn end_gesture(&mut self) {
        self.moving_point = false;
        self.moving_tag = false;
        self.label_grab = Vec2::ZERO;
        self.tag_grab = Vec2::ZERO;
    }
}

/// Editier-Zustand der Namens- und Tag-Texteingaben.
///
/// Die Eingabefelder selbst gehören dem Host; er meldet Beginn und
/// Änderungen hierher, damit der nächste Klick den Render-Umfang um die
/// betroffenen Namen erweitert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditingState {
    /// Ein Stationsname ist in Bearbeitung
    pub label_editing: bool,
    /// Der Stationsname wurde seit dem letzten Render geändert
    pub label_edited: bool,
    /// Ein Tag-Text ist in Bearbeitung
    pub tag_editing: bool,
    /// Der Tag-Text wurde seit dem letzten Render geändert
    pub tag_edited: bool,
}

impl EditingState {
    /// Beendet jede laufende Bearbeitung und verwirft die Änderungs-Flags.
    pub fn end_all(&mut self) {
        *self = Self::default();
    }
}

/// Zwei-Klick-Aufbau eines Punkt-Verbinders.
///
/// Solange aktiv, werden Klicks ausschließlich als Verbinder-Endpunkte
/// interpretiert.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkBuilder {
    /// Darstellungsart des entstehenden Verbinders
    pub kind: PointLinkKind,
    /// Erster angeklickter Punkt
    pub first: Option<u64>,
}

impl LinkBuilder {
    /// Startet den Aufbau eines Verbinders der gegebenen Art.
    pub fn new(kind: PointLinkKind) -> Self {
        Self { kind, first: None }
    }

    /// Meldet einen Punkt-Klick. Liefert den fertigen Verbinder, sobald
    /// zwei verschiedene Punkte gewählt wurden.
    pub fn click(&mut self, pt_id: u64) -> Option<PointLink> {
        match self.first {
            None => {
                self.first = Some(pt_id);
                None
            }
            Some(first) if first == pt_id => None,
            Some(first) => Some(PointLink::new(vec![first, pt_id], self.kind)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auswahl_kennt_ihre_art() {
        let sel = Selection::Point {
            id: 5,
            part: PointPart::Body,
        };
        assert_eq!(sel.point_id(), Some(5));
        assert_eq!(sel.line_id(), None);
        assert!(sel.is_some());
        assert!(!Selection::None.is_some());
    }

    #[test]
    fn link_builder_braucht_zwei_verschiedene_punkte() {
        let mut builder = LinkBuilder::new(PointLinkKind::Thin);
        assert!(builder.click(1).is_none());
        // Doppelklick auf denselben Punkt schließt nicht ab
        assert!(builder.click(1).is_none());
        let link = builder.click(2).expect("Verbinder muss entstehen");
        assert_eq!(link.pts, vec![1, 2]);
        assert_eq!(link.kind, PointLinkKind::Thin);
    }

    #[test]
    fn end_gesture_behaelt_moved_flags() {
        let mut drag = DragState::default();
        drag.moving_point = true;
        drag.moved_point = true;
        drag.end_gesture();
        assert!(!drag.moving_point);
        assert!(drag.moved_point);
    }
}
