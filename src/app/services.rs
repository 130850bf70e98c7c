//! Schnittstellen zu den Geometrie-Diensten: Hit-Testing und Snapping.
//!
//! Der Editor konsumiert beide über Traits; die Default-Implementierungen
//! arbeiten direkt auf dem Dokument (Spatial-Index für Punkt-Picks,
//! Segment-Projektion für Linien, Rechteck-Modelle für Namen und Tags).

use glam::Vec2;

use crate::core::geometry::{dist_sq, project_on_segment, segment_is_diagonal};
use crate::core::{Document, PointDir, SpatialIndex};
use crate::shared::EditorOptions;

/// Treffer auf einem Liniensegment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineHit {
    /// Getroffene Linie
    pub line_id: u64,
    /// Auf das Segment gelotete Klickposition
    pub aligned_pos: Vec2,
    /// Einfüge-Index für einen neuen Punkt an dieser Stelle
    pub insert_at: usize,
    /// Richtungsvorschlag für eingefügte Punkte
    pub dir: PointDir,
}

/// Treffer auf einem Linien-Verlängerungsgriff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtendHit {
    /// Linie, die verlängert wird
    pub line_id: u64,
    /// Einfüge-Index (0 = vor dem Kopf, Länge = hinter dem Schwanz)
    pub insert_at: usize,
    /// Position des Griffs (wird Startposition des neuen Punkts)
    pub handle_pos: Vec2,
    /// Ausrichtung des neuen Punkts
    pub dir: PointDir,
}

/// Güte eines Namens-Snaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapGrade {
    /// Nur die Richtung eingerastet
    Vague,
    /// Richtung und Standardabstand eingerastet
    Accurate,
}

/// Hit-Testing gegen das aktuelle Dokument.
pub trait HitTester {
    /// Aktualisiert interne Indizes nach Dokument-Mutationen.
    fn refresh(&mut self, _doc: &Document) {}

    /// Punktkörper unter der Position.
    fn on_point(&self, doc: &Document, opts: &EditorOptions, pos: Vec2) -> Option<u64>;

    /// Stationsname unter der Position (liefert die Punkt-ID des Besitzers).
    fn on_label(&self, doc: &Document, opts: &EditorOptions, pos: Vec2) -> Option<u64>;

    /// Liniensegmente unter der Position, nächstes zuerst.
    /// `exclude` filtert Linien heraus (z.B. die eigenen beim Beitreten).
    fn on_lines(
        &self,
        doc: &Document,
        opts: &EditorOptions,
        pos: Vec2,
        exclude: &[u64],
    ) -> Vec<LineHit>;

    /// Text-Tag unter der Position.
    fn on_text_tag(&self, doc: &Document, opts: &EditorOptions, pos: Vec2) -> Option<u64>;

    /// Verlängerungsgriff des ausgewählten Punkts unter der Position.
    fn on_extend_handle(
        &self,
        doc: &Document,
        opts: &EditorOptions,
        selected_pt: u64,
        pos: Vec2,
    ) -> Option<ExtendHit>;
}

/// Snapping von Positionen und Namens-Offsets.
pub trait SnapService {
    /// Positions-Snap eines Punkts (Achsen benachbarter Punkte, dann Grid).
    fn snap_point(
        &self,
        doc: &Document,
        opts: &EditorOptions,
        pt_id: u64,
        pos: Vec2,
    ) -> Option<Vec2>;

    /// Namens-Snap: rastet den Offset auf Oktanten-Richtungen ein.
    fn snap_label(
        &self,
        doc: &Document,
        opts: &EditorOptions,
        pt_id: u64,
        offset: Vec2,
    ) -> Option<(Vec2, SnapGrade)>;

    /// Grid-Snap einer freien Position.
    fn snap_grid(&self, opts: &EditorOptions, pos: Vec2) -> Option<Vec2>;
}

// ── Default: Hit-Testing ────────────────────────────────────────────

/// Rechteck eines Stationsnamens (vereinfachtes Text-Maß).
fn label_rect_contains(
    opts: &EditorOptions,
    anchor: Vec2,
    text: &str,
    has_sub: bool,
    pos: Vec2,
) -> bool {
    let chars = text.chars().count().max(1) as f32;
    let half_w = chars * opts.label_char_width * 0.5;
    let half_h = opts.label_line_height * if has_sub { 1.0 } else { 0.5 };
    (pos.x - anchor.x).abs() <= half_w && (pos.y - anchor.y).abs() <= half_h
}

/// Default-Hit-Tester über einem KD-Tree-Index.
#[derive(Debug, Default)]
pub struct GeoHitTester {
    index: SpatialIndex,
}

impl GeoHitTester {
    /// Erstellt einen Hit-Tester mit leerem Index.
    pub fn new() -> Self {
        Self {
            index: SpatialIndex::empty(),
        }
    }
}

impl HitTester for GeoHitTester {
    fn refresh(&mut self, doc: &Document) {
        self.index = SpatialIndex::from_points(&doc.points);
    }

    fn on_point(&self, doc: &Document, opts: &EditorOptions, pos: Vec2) -> Option<u64> {
        let nearest = self.index.nearest(pos)?;
        let radius = opts.point_hit_radius * doc.lines_decided_point_size(nearest.point_id);
        (nearest.distance <= radius).then_some(nearest.point_id)
    }

    fn on_label(&self, doc: &Document, opts: &EditorOptions, pos: Vec2) -> Option<u64> {
        for pt in doc.points.values() {
            let Some(label) = pt.label.as_ref() else {
                continue;
            };
            let anchor = pt.pos + label.offset;
            if label_rect_contains(opts, anchor, &label.text, label.sub_text.is_some(), pos) {
                return Some(pt.id);
            }
        }
        None
    }

    fn on_lines(
        &self,
        doc: &Document,
        opts: &EditorOptions,
        pos: Vec2,
        exclude: &[u64],
    ) -> Vec<LineHit> {
        let mut hits: Vec<(f32, LineHit)> = Vec::new();
        for line in &doc.lines {
            if exclude.contains(&line.id) {
                continue;
            }
            let width = doc
                .effective_display(line.id)
                .map(|d| d.width)
                .unwrap_or(1.0);
            let tolerance = opts.line_hit_tolerance + width * 0.5;
            let tolerance_sq = tolerance * tolerance;

            let mut best: Option<(f32, LineHit)> = None;
            for (i, pair) in line.pts.windows(2).enumerate() {
                let (Some(a), Some(b)) = (doc.point(pair[0]), doc.point(pair[1])) else {
                    continue;
                };
                let proj = project_on_segment(pos, a.pos, b.pos);
                if proj.dist_sq > tolerance_sq {
                    continue;
                }
                if best.map_or(true, |(d, _)| proj.dist_sq < d) {
                    best = Some((
                        proj.dist_sq,
                        LineHit {
                            line_id: line.id,
                            aligned_pos: proj.closest,
                            insert_at: i + 1,
                            dir: if segment_is_diagonal(a.pos, b.pos) {
                                PointDir::Incline
                            } else {
                                PointDir::Vertical
                            },
                        },
                    ));
                }
            }
            if let Some(hit) = best {
                hits.push(hit);
            }
        }
        hits.sort_by(|a, b| a.0.total_cmp(&b.0));
        hits.into_iter().map(|(_, h)| h).collect()
    }

    fn on_text_tag(&self, doc: &Document, opts: &EditorOptions, pos: Vec2) -> Option<u64> {
        for tag in &doc.text_tags {
            let text = tag.text.as_deref().unwrap_or(" ");
            if label_rect_contains(opts, tag.pos, text, tag.text_sub.is_some(), pos) {
                return Some(tag.id);
            }
        }
        None
    }

    fn on_extend_handle(
        &self,
        doc: &Document,
        opts: &EditorOptions,
        selected_pt: u64,
        pos: Vec2,
    ) -> Option<ExtendHit> {
        let pt = doc.point(selected_pt)?;
        let radius_sq = opts.extend_handle_radius * opts.extend_handle_radius;

        for line in &doc.lines {
            if line.pts.len() < 2 || !line.is_endpoint(selected_pt) {
                continue;
            }
            let at_head = line.pts.first() == Some(&selected_pt);
            let neighbor_id = if at_head {
                line.pts[1]
            } else {
                line.pts[line.pts.len() - 2]
            };
            let Some(neighbor) = doc.point(neighbor_id) else {
                continue;
            };
            let away = pt.pos - neighbor.pos;
            if away.length_squared() <= f32::EPSILON {
                continue;
            }
            let handle_pos = pt.pos + away.normalize() * opts.extend_handle_dist;
            if dist_sq(pos, handle_pos) <= radius_sq {
                return Some(ExtendHit {
                    line_id: line.id,
                    insert_at: if at_head { 0 } else { line.pts.len() },
                    handle_pos,
                    dir: pt.dir,
                });
            }
        }
        None
    }
}

// ── Default: Snapping ───────────────────────────────────────────────

/// Default-Snapper: Achsen benachbarter Punkte, Grid, Oktanten für Namen.
#[derive(Debug, Default)]
pub struct GridSnapper;

impl GridSnapper {
    /// Erstellt den Default-Snapper.
    pub fn new() -> Self {
        Self
    }
}

impl SnapService for GridSnapper {
    fn snap_point(
        &self,
        doc: &Document,
        opts: &EditorOptions,
        pt_id: u64,
        pos: Vec2,
    ) -> Option<Vec2> {
        let mut snapped = pos;
        let mut any_axis = false;
        let mut best_dx = opts.axis_snap_dist;
        let mut best_dy = opts.axis_snap_dist;
        for other in doc.points.values() {
            if other.id == pt_id {
                continue;
            }
            let dx = (other.pos.x - pos.x).abs();
            if dx <= best_dx {
                best_dx = dx;
                snapped.x = other.pos.x;
                any_axis = true;
            }
            let dy = (other.pos.y - pos.y).abs();
            if dy <= best_dy {
                best_dy = dy;
                snapped.y = other.pos.y;
                any_axis = true;
            }
        }
        if any_axis {
            return Some(snapped);
        }
        self.snap_grid(opts, pos)
    }

    fn snap_label(
        &self,
        _doc: &Document,
        opts: &EditorOptions,
        _pt_id: u64,
        offset: Vec2,
    ) -> Option<(Vec2, SnapGrade)> {
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return None;
        }
        // Nächste Oktanten-Richtung (45°-Raster)
        let angle = offset.y.atan2(offset.x);
        let step = std::f32::consts::FRAC_PI_4;
        let snapped_angle = (angle / step).round() * step;
        let direction = Vec2::new(snapped_angle.cos(), snapped_angle.sin());

        let directional = direction * radius;
        if dist_sq(offset, directional) > opts.axis_snap_dist * opts.axis_snap_dist {
            return None;
        }

        let standard_radius = opts.label_line_height;
        if (radius - standard_radius).abs() <= opts.grid_snap_dist {
            return Some((direction * standard_radius, SnapGrade::Accurate));
        }
        Some((directional, SnapGrade::Vague))
    }

    fn snap_grid(&self, opts: &EditorOptions, pos: Vec2) -> Option<Vec2> {
        if opts.grid_size <= 0.0 {
            return None;
        }
        let snapped = Vec2::new(
            (pos.x / opts.grid_size).round() * opts.grid_size,
            (pos.y / opts.grid_size).round() * opts.grid_size,
        );
        (dist_sq(pos, snapped) <= opts.grid_snap_dist * opts.grid_snap_dist).then_some(snapped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LineKind, MapLine, MapPoint, PointKind, StationLabel};

    fn doc_with_line() -> Document {
        let mut doc = Document::new(Vec2::new(1000.0, 1000.0));
        doc.add_point(MapPoint::new(
            1,
            Vec2::new(0.0, 0.0),
            PointDir::Vertical,
            PointKind::Station,
        ));
        doc.add_point(MapPoint::new(
            2,
            Vec2::new(100.0, 0.0),
            PointDir::Vertical,
            PointKind::Station,
        ));
        doc.lines.push(MapLine::new(10, vec![1, 2], LineKind::Common));
        doc
    }

    #[test]
    fn punkt_pick_beachtet_den_trefferradius() {
        let doc = doc_with_line();
        let opts = EditorOptions::default();
        let mut hit = GeoHitTester::new();
        hit.refresh(&doc);

        assert_eq!(hit.on_point(&doc, &opts, Vec2::new(3.0, 3.0)), Some(1));
        assert_eq!(hit.on_point(&doc, &opts, Vec2::new(50.0, 50.0)), None);
    }

    #[test]
    fn linien_pick_liefert_einfuegeindex_und_lotpunkt() {
        let doc = doc_with_line();
        let opts = EditorOptions::default();
        let hit = GeoHitTester::new();

        let hits = hit.on_lines(&doc, &opts, Vec2::new(50.0, 2.0), &[]);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].line_id, 10);
        assert_eq!(hits[0].insert_at, 1);
        assert_eq!(hits[0].aligned_pos, Vec2::new(50.0, 0.0));
        assert_eq!(hits[0].dir, PointDir::Vertical);

        assert!(hit
            .on_lines(&doc, &opts, Vec2::new(50.0, 2.0), &[10])
            .is_empty());
    }

    #[test]
    fn namens_pick_trifft_das_textrechteck() {
        let mut doc = doc_with_line();
        let opts = EditorOptions::default();
        doc.point_mut(1).unwrap().label = Some(StationLabel {
            text: "Mitte".into(),
            sub_text: None,
            offset: Vec2::new(0.0, -30.0),
            size: None,
        });
        let hit = GeoHitTester::new();

        assert_eq!(hit.on_label(&doc, &opts, Vec2::new(2.0, -28.0)), Some(1));
        assert_eq!(hit.on_label(&doc, &opts, Vec2::new(0.0, 0.0)), None);
    }

    #[test]
    fn verlaengerungsgriff_liegt_hinter_dem_endpunkt() {
        let doc = doc_with_line();
        let opts = EditorOptions::default();
        let hit = GeoHitTester::new();

        // Griff hinter Punkt 2: bei (140, 0)
        let ext = hit
            .on_extend_handle(&doc, &opts, 2, Vec2::new(138.0, 2.0))
            .expect("Griff erwartet");
        assert_eq!(ext.line_id, 10);
        assert_eq!(ext.insert_at, 2);
        assert_eq!(ext.handle_pos, Vec2::new(140.0, 0.0));

        // Griff vor Punkt 1: bei (-40, 0)
        let ext = hit
            .on_extend_handle(&doc, &opts, 1, Vec2::new(-40.0, 0.0))
            .expect("Griff erwartet");
        assert_eq!(ext.insert_at, 0);

        // Innenpunkte haben keinen Griff
        assert!(hit
            .on_extend_handle(&doc, &opts, 1, Vec2::new(500.0, 500.0))
            .is_none());
    }

    #[test]
    fn grid_snap_rastet_nur_in_reichweite() {
        let opts = EditorOptions::default();
        let snap = GridSnapper::new();

        assert_eq!(
            snap.snap_grid(&opts, Vec2::new(11.0, 19.0)),
            Some(Vec2::new(10.0, 20.0))
        );
        assert_eq!(snap.snap_grid(&opts, Vec2::new(15.0, 15.0)), None);
    }

    #[test]
    fn punkt_snap_zieht_auf_nachbar_achsen() {
        let doc = doc_with_line();
        let opts = EditorOptions::default();
        let snap = GridSnapper::new();

        // Nahe der Y-Achse von Punkt 2 (x=100)
        let snapped = snap
            .snap_point(&doc, &opts, 1, Vec2::new(98.0, 40.0))
            .expect("Snap erwartet");
        assert_eq!(snapped.x, 100.0);
    }

    #[test]
    fn namens_snap_unterscheidet_vage_und_exakt() {
        let doc = doc_with_line();
        let mut opts = EditorOptions::default();
        opts.label_line_height = 18.0;
        let snap = GridSnapper::new();

        // Fast exakt nach rechts, Standardabstand: exakter Snap
        let (offset, grade) = snap
            .snap_label(&doc, &opts, 1, Vec2::new(18.0, 1.0))
            .expect("Snap erwartet");
        assert_eq!(grade, SnapGrade::Accurate);
        assert_eq!(offset, Vec2::new(18.0, 0.0));

        // Richtung passt, Abstand nicht: vager Snap
        let (_, grade) = snap
            .snap_label(&doc, &opts, 1, Vec2::new(40.0, 1.0))
            .expect("Snap erwartet");
        assert_eq!(grade, SnapGrade::Vague);

        // Richtung weit daneben: kein Snap
        assert!(snap
            .snap_label(&doc, &opts, 1, Vec2::new(30.0, 12.0))
            .is_none());
    }
}
