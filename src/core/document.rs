//! Das zentrale Dokument: Punkte, Linien, Verbinder und Text-Tags
//! samt dokumentweiter ID-Vergabe.

use glam::Vec2;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{LineDisplay, MapLine, MapPoint, PointLink, StationLabel, TextTag};

/// Im Dokument eingebettete Anzeige-Einstellungen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Hintergrundfarbe des Canvas (RGBA)
    pub background_color: [f32; 4],
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            background_color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

/// Ergebnis einer Punkt-Verschmelzung.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeResult {
    /// Der überlebende Punkt
    pub kept: u64,
    /// Der aufgelöste Punkt (ID danach ungültig)
    pub removed: u64,
    /// Linien, deren Punktfolge sich geändert hat
    pub changed_lines: Vec<u64>,
}

/// Ein editierbares Netzplan-Dokument.
///
/// Alle IDs (Punkte, Linien, Tags) stammen aus einem gemeinsamen monotonen
/// Zähler: beim Laden auf `max(vorhandene IDs) + 1` gesetzt, bei jeder
/// Vergabe inkrementiert, nie wiederverwendet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Nächste zu vergebende ID
    next_id: u64,
    /// Punkt-Tabelle (Einfügereihenfolge = stabile Traversierung)
    pub points: IndexMap<u64, MapPoint>,
    /// Linien in Zeichenreihenfolge
    pub lines: Vec<MapLine>,
    /// Punkt-Verbinder
    #[serde(default)]
    pub point_links: Vec<PointLink>,
    /// Freie Text-Tags
    #[serde(default)]
    pub text_tags: Vec<TextTag>,
    /// Canvas-Abmessungen in Dokumentkoordinaten
    pub canvas_size: Vec2,
    /// Eingebettete Anzeige-Einstellungen
    #[serde(default)]
    pub config: DocumentConfig,
}

impl Document {
    /// Erstellt ein leeres Dokument mit gegebener Canvas-Größe.
    pub fn new(canvas_size: Vec2) -> Self {
        Self {
            next_id: 1,
            points: IndexMap::new(),
            lines: Vec::new(),
            point_links: Vec::new(),
            text_tags: Vec::new(),
            canvas_size,
            config: DocumentConfig::default(),
        }
    }

    /// Vergibt die nächste freie ID.
    pub fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Setzt den ID-Zähler auf `max(vorhandene IDs) + 1`.
    ///
    /// Wird nach dem Laden aufgerufen, damit Fremddokumente mit beliebigen
    /// Zählerständen nie doppelte IDs erzeugen.
    pub fn reseed_ids(&mut self) {
        let max_id = self
            .points
            .keys()
            .copied()
            .chain(self.lines.iter().map(|l| l.id))
            .chain(self.text_tags.iter().map(|t| t.id))
            .max()
            .unwrap_or(0);
        if self.next_id <= max_id {
            self.next_id = max_id + 1;
        }
    }

    // ── Zugriff ─────────────────────────────────────────────────────

    /// Punkt per ID.
    pub fn point(&self, id: u64) -> Option<&MapPoint> {
        self.points.get(&id)
    }

    /// Punkt per ID (mutabel).
    pub fn point_mut(&mut self, id: u64) -> Option<&mut MapPoint> {
        self.points.get_mut(&id)
    }

    /// Linie per ID.
    pub fn line(&self, id: u64) -> Option<&MapLine> {
        self.lines.iter().find(|l| l.id == id)
    }

    /// Linie per ID (mutabel).
    pub fn line_mut(&mut self, id: u64) -> Option<&mut MapLine> {
        self.lines.iter_mut().find(|l| l.id == id)
    }

    /// IDs aller Linien, die den Punkt enthalten.
    pub fn line_ids_by_point(&self, pt_id: u64) -> Vec<u64> {
        self.lines
            .iter()
            .filter(|l| l.contains_point(pt_id))
            .map(|l| l.id)
            .collect()
    }

    /// Anzahl der Linien, die den Punkt enthalten.
    pub fn line_membership_count(&self, pt_id: u64) -> usize {
        self.lines.iter().filter(|l| l.contains_point(pt_id)).count()
    }

    /// IDs aller Kindlinien einer Elternlinie.
    pub fn children_of(&self, line_id: u64) -> Vec<u64> {
        self.lines
            .iter()
            .filter(|l| l.parent == Some(line_id))
            .map(|l| l.id)
            .collect()
    }

    /// IDs aller Text-Tags, die die Linie annotieren.
    pub fn text_tag_ids_for_line(&self, line_id: u64) -> Vec<u64> {
        self.text_tags
            .iter()
            .filter(|t| t.for_line == Some(line_id))
            .map(|t| t.id)
            .collect()
    }

    /// Darstellungs-Attribute einer Linie, über die Elternlinie aufgelöst.
    ///
    /// Kindlinien speichern keine eigene gelesene Darstellung: sie verweisen
    /// auf die Elternlinie (eine Ebene tief). Dadurch kann nichts
    /// auseinanderlaufen; einen Abgleich-Pass gibt es nicht.
    pub fn effective_display(&self, line_id: u64) -> Option<&LineDisplay> {
        let line = self.line(line_id)?;
        match line.parent.and_then(|pid| self.line(pid)) {
            Some(parent) => Some(&parent.display),
            None => Some(&line.display),
        }
    }

    // ── Visuelle Größen ─────────────────────────────────────────────

    /// Von den anliegenden Linien bestimmte Punktgröße.
    ///
    /// Maximum über alle Linien durch den Punkt; Linien ohne Override
    /// tragen ihre Breite bei. Ohne Linienzugehörigkeit: 1.0.
    pub fn lines_decided_point_size(&self, pt_id: u64) -> f32 {
        self.lines
            .iter()
            .filter(|l| l.contains_point(pt_id))
            .filter_map(|l| self.effective_display(l.id))
            .map(|d| d.point_size.unwrap_or(d.width))
            .fold(None::<f32>, |acc, s| Some(acc.map_or(s, |a| a.max(s))))
            .unwrap_or(1.0)
    }

    /// Von den anliegenden Linien bestimmte Stationsnamen-Größe.
    pub fn lines_decided_label_size(&self, pt_id: u64) -> f32 {
        self.lines
            .iter()
            .filter(|l| l.contains_point(pt_id))
            .filter_map(|l| self.effective_display(l.id))
            .map(|d| d.label_size.unwrap_or(1.0))
            .fold(None::<f32>, |acc, s| Some(acc.map_or(s, |a| a.max(s))))
            .unwrap_or(1.0)
    }

    // ── Punkt-Mutationen ────────────────────────────────────────────

    /// Fügt einen Punkt in die Tabelle ein.
    pub fn add_point(&mut self, point: MapPoint) {
        self.points.insert(point.id, point);
    }

    /// Entfernt einen Punkt aus Tabelle und allen Linien-Punktfolgen.
    ///
    /// Verbinder, Cluster und das Aufräumen entarteter Linien sind Sache
    /// des Aufrufers.
    pub fn remove_point(&mut self, pt_id: u64) -> Option<MapPoint> {
        let removed = self.points.shift_remove(&pt_id);
        if removed.is_some() {
            for line in &mut self.lines {
                if line.contains_point(pt_id) {
                    line.pts.retain(|&p| p != pt_id);
                    line.dedup_consecutive_points();
                }
            }
        }
        removed
    }

    /// Erstellt einen neuen Punkt und fügt ihn an Index `at` in die Linie ein.
    pub fn splice_new_point_into_line(
        &mut self,
        line_id: u64,
        at: usize,
        pos: Vec2,
        dir: super::PointDir,
        kind: super::PointKind,
    ) -> Option<u64> {
        if self.line(line_id).is_none() {
            return None;
        }
        let id = self.alloc_id();
        let point = MapPoint::new(id, pos, dir, kind);
        self.points.insert(id, point);
        let line = self.line_mut(line_id)?;
        let at = at.min(line.pts.len());
        line.pts.insert(at, id);
        line.dedup_consecutive_points();
        Some(id)
    }

    /// Fügt einen bestehenden Punkt an Index `at` in eine Linie ein.
    pub fn insert_point_into_line(&mut self, pt_id: u64, line_id: u64, at: usize) -> bool {
        if !self.points.contains_key(&pt_id) {
            return false;
        }
        let Some(line) = self.line_mut(line_id) else {
            return false;
        };
        let at = at.min(line.pts.len());
        line.pts.insert(at, pt_id);
        line.dedup_consecutive_points();
        true
    }

    /// Entfernt alle Vorkommen des Punkts aus einer Linie.
    pub fn remove_point_from_line(&mut self, pt_id: u64, line_id: u64) -> bool {
        let Some(line) = self.line_mut(line_id) else {
            return false;
        };
        let before = line.pts.len();
        line.pts.retain(|&p| p != pt_id);
        line.dedup_consecutive_points();
        line.pts.len() < before
    }

    // ── Verschmelzen ────────────────────────────────────────────────

    /// Sucht den nächstliegenden anderen Punkt, der laut `clinging` am
    /// aktiven Punkt haftet.
    pub fn merge_candidate(
        &self,
        active_id: u64,
        clinging: &dyn Fn(&MapPoint, &MapPoint) -> bool,
    ) -> Option<u64> {
        let active = self.point(active_id)?;
        let mut best: Option<(u64, f32)> = None;
        for (&id, other) in &self.points {
            if id == active_id {
                continue;
            }
            if !clinging(active, other) {
                continue;
            }
            let d = super::geometry::dist_sq(active.pos, other.pos);
            if best.map_or(true, |(_, bd)| d < bd) {
                best = Some((id, d));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Verschmilzt `removed` in `kept`: Linienzugehörigkeiten und Verbinder
    /// werden umgeschrieben, der Name wandert mit, `removed` verschwindet.
    ///
    /// Aufrufer müssen damit rechnen, dass danach eine andere ID denselben
    /// Ort repräsentiert.
    pub fn merge_points(&mut self, kept: u64, removed: u64) -> Option<MergeResult> {
        if kept == removed || !self.points.contains_key(&kept) {
            return None;
        }
        let removed_pt = self.points.shift_remove(&removed)?;

        let mut changed_lines = Vec::new();
        for line in &mut self.lines {
            if !line.contains_point(removed) {
                continue;
            }
            for p in &mut line.pts {
                if *p == removed {
                    *p = kept;
                }
            }
            line.dedup_consecutive_points();
            changed_lines.push(line.id);
        }

        for link in &mut self.point_links {
            if link.touches(removed) {
                for p in &mut link.pts {
                    if *p == removed {
                        *p = kept;
                    }
                }
                link.pts.sort_unstable();
                link.pts.dedup();
            }
        }
        self.point_links.retain(|l| l.pts.len() >= 2);

        if let Some(label) = removed_pt.label {
            let kept_pos = self.point(kept).map(|p| p.pos);
            if let (Some(kept_pos), Some(kept_pt)) = (kept_pos, self.point_mut(kept)) {
                if kept_pt.label.is_none() {
                    let anchor = removed_pt.pos + label.offset;
                    kept_pt.label = Some(StationLabel {
                        offset: anchor - kept_pos,
                        ..label
                    });
                }
            }
        }

        log::debug!("Punkt {} in Punkt {} verschmolzen", removed, kept);
        Some(MergeResult {
            kept,
            removed,
            changed_lines,
        })
    }

    // ── Linien- und Tag-Mutationen ──────────────────────────────────

    /// Entfernt eine Linie ohne Kaskaden (Rohoperation).
    pub fn remove_line_raw(&mut self, line_id: u64) -> Option<MapLine> {
        let idx = self.lines.iter().position(|l| l.id == line_id)?;
        Some(self.lines.remove(idx))
    }

    /// Entfernt einen Text-Tag.
    pub fn remove_text_tag(&mut self, tag_id: u64) -> bool {
        let before = self.text_tags.len();
        self.text_tags.retain(|t| t.id != tag_id);
        self.text_tags.len() < before
    }

    /// Entfernt alle Verbinder, die den Punkt berühren.
    pub fn remove_point_links_by_point(&mut self, pt_id: u64) -> usize {
        let before = self.point_links.len();
        self.point_links.retain(|l| !l.touches(pt_id));
        before - self.point_links.len()
    }

    /// Ob mindestens ein Verbinder den Punkt berührt.
    pub fn has_point_links(&self, pt_id: u64) -> bool {
        self.point_links.iter().any(|l| l.touches(pt_id))
    }

    /// Stellt die Zeichenreihenfolge her: aufsteigender effektiver z-Index,
    /// Kindlinien direkt hinter ihrer Elternlinie.
    pub fn ensure_lines_ordered(&mut self) {
        let z_of: HashMap<u64, i32> = self
            .lines
            .iter()
            .map(|l| (l.id, l.display.z_index))
            .collect();
        self.lines.sort_by_key(|l| {
            let root = l.parent.unwrap_or(l.id);
            let z = l
                .parent
                .and_then(|p| z_of.get(&p))
                .or_else(|| z_of.get(&l.id))
                .copied()
                .unwrap_or(0);
            (z, root, l.parent.is_some(), l.id)
        });
    }

    /// Entfernt direkt aufeinanderfolgende gleiche Punkt-IDs auf allen Linien.
    pub fn remove_repeat_points_on_lines(&mut self) {
        for line in &mut self.lines {
            line.dedup_consecutive_points();
        }
    }

    // ── Statistik ───────────────────────────────────────────────────

    /// Anzahl der Stationen im Dokument.
    pub fn station_count(&self) -> usize {
        self.points.values().filter(|p| p.is_station()).count()
    }

    /// Anzahl eigenständiger Verkehrslinien (ohne Kindlinien).
    pub fn line_count(&self) -> usize {
        self.lines
            .iter()
            .filter(|l| l.kind == super::LineKind::Common && l.parent.is_none())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LineKind, PointDir, PointKind};

    fn doc_with_points(positions: &[(u64, f32, f32)]) -> Document {
        let mut doc = Document::new(Vec2::new(2000.0, 2000.0));
        for &(id, x, y) in positions {
            doc.add_point(MapPoint::new(
                id,
                Vec2::new(x, y),
                PointDir::Vertical,
                PointKind::Station,
            ));
        }
        doc.reseed_ids();
        doc
    }

    #[test]
    fn id_vergabe_ist_monoton() {
        let mut doc = Document::new(Vec2::new(100.0, 100.0));
        let a = doc.alloc_id();
        let b = doc.alloc_id();
        assert_eq!(b, a + 1);
    }

    #[test]
    fn reseed_springt_ueber_vorhandene_ids() {
        let mut doc = doc_with_points(&[(7, 0.0, 0.0)]);
        doc.lines.push(MapLine::new(12, vec![7, 7], LineKind::Common));
        doc.reseed_ids();
        assert_eq!(doc.alloc_id(), 13);
    }

    #[test]
    fn effective_display_folgt_der_elternlinie() {
        let mut doc = doc_with_points(&[(1, 0.0, 0.0), (2, 10.0, 0.0)]);
        let mut parent = MapLine::new(10, vec![1, 2], LineKind::Common);
        parent.display.width = 3.0;
        let mut child = MapLine::new(11, vec![1, 2], LineKind::Common);
        child.parent = Some(10);
        child.display.width = 99.0; // wird nie gelesen
        doc.lines.push(parent);
        doc.lines.push(child);

        assert_eq!(doc.effective_display(11).map(|d| d.width), Some(3.0));
        // Änderung am Parent wirkt sofort auf das Kind
        doc.line_mut(10).unwrap().display.width = 5.0;
        assert_eq!(doc.effective_display(11).map(|d| d.width), Some(5.0));
    }

    #[test]
    fn punktgroesse_nimmt_maximum_der_linien() {
        let mut doc = doc_with_points(&[(1, 0.0, 0.0), (2, 10.0, 0.0)]);
        let mut thin = MapLine::new(10, vec![1, 2], LineKind::Common);
        thin.display.width = 1.0;
        let mut wide = MapLine::new(11, vec![1, 2], LineKind::Common);
        wide.display.width = 4.0;
        doc.lines.push(thin);
        doc.lines.push(wide);

        assert_eq!(doc.lines_decided_point_size(1), 4.0);
        // Punkt ohne Linienzugehörigkeit: Default
        doc.add_point(MapPoint::new(
            99,
            Vec2::ZERO,
            PointDir::Vertical,
            PointKind::Station,
        ));
        assert_eq!(doc.lines_decided_point_size(99), 1.0);
    }

    #[test]
    fn remove_point_bereinigt_linien() {
        let mut doc = doc_with_points(&[(1, 0.0, 0.0), (2, 10.0, 0.0), (3, 20.0, 0.0)]);
        doc.lines.push(MapLine::new(10, vec![1, 2, 3], LineKind::Common));

        doc.remove_point(2);
        assert_eq!(doc.line(10).unwrap().pts, vec![1, 3]);
        assert!(doc.point(2).is_none());
    }

    #[test]
    fn merge_schreibt_linien_und_verbinder_um() {
        let mut doc = doc_with_points(&[(1, 0.0, 0.0), (2, 1.0, 0.0), (3, 50.0, 0.0)]);
        doc.lines.push(MapLine::new(10, vec![2, 3], LineKind::Common));
        doc.point_links
            .push(PointLink::new(vec![2, 3], Default::default()));

        let res = doc.merge_points(1, 2).expect("Merge muss gelingen");
        assert_eq!(res.kept, 1);
        assert_eq!(res.changed_lines, vec![10]);
        assert_eq!(doc.line(10).unwrap().pts, vec![1, 3]);
        assert!(doc.point(2).is_none());
        assert!(doc.point_links[0].touches(1));
    }

    #[test]
    fn merge_auf_unbekannte_id_ist_noop() {
        let mut doc = doc_with_points(&[(1, 0.0, 0.0)]);
        assert!(doc.merge_points(1, 99).is_none());
        assert!(doc.merge_points(99, 1).is_none());
        assert!(doc.merge_points(1, 1).is_none());
    }

    #[test]
    fn merge_uebernimmt_den_namen_wenn_frei() {
        let mut doc = doc_with_points(&[(1, 0.0, 0.0), (2, 4.0, 0.0)]);
        doc.point_mut(2).unwrap().label = Some(StationLabel {
            text: "Westkreuz".into(),
            sub_text: None,
            offset: Vec2::new(2.0, 2.0),
            size: None,
        });

        doc.merge_points(1, 2).expect("Merge muss gelingen");
        let label = doc.point(1).unwrap().label.as_ref().expect("Name wandert mit");
        assert_eq!(label.text, "Westkreuz");
        // Anker bleibt global an derselben Stelle: (4+2, 0+2) - (0,0)
        assert_eq!(label.offset, Vec2::new(6.0, 2.0));
    }

    #[test]
    fn linienordnung_haelt_kinder_hinter_eltern() {
        let mut doc = doc_with_points(&[(1, 0.0, 0.0), (2, 10.0, 0.0)]);
        let mut child = MapLine::new(11, vec![1, 2], LineKind::Common);
        child.parent = Some(10);
        let mut top = MapLine::new(20, vec![1, 2], LineKind::Common);
        top.display.z_index = 5;
        doc.lines.push(top);
        doc.lines.push(child);
        doc.lines.push(MapLine::new(10, vec![1, 2], LineKind::Common));

        doc.ensure_lines_ordered();
        let order: Vec<u64> = doc.lines.iter().map(|l| l.id).collect();
        assert_eq!(order, vec![10, 11, 20]);
    }
}
