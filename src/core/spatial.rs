//! Spatial-Index (KD-Tree) für schnelle Punkt-Abfragen beim Hit-Testing.

use glam::Vec2;
use indexmap::IndexMap;
use kiddo::{KdTree, SquaredEuclidean};

use crate::core::MapPoint;

/// Ergebnis einer Distanzabfrage gegen den Spatial-Index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialMatch {
    /// ID des gefundenen Punkts
    pub point_id: u64,
    /// Euklidische Distanz zum Suchpunkt
    pub distance: f32,
}

/// Read-only Spatial-Index über den Punkten eines Dokuments.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    tree: KdTree<f64, 2>,
    point_ids: Vec<u64>,
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::empty()
    }
}

impl SpatialIndex {
    /// Erstellt einen leeren Spatial-Index.
    pub fn empty() -> Self {
        Self {
            tree: (&Vec::<[f64; 2]>::new()).into(),
            point_ids: Vec::new(),
        }
    }

    /// Baut einen neuen Index aus der Punkt-Tabelle.
    pub fn from_points(points: &IndexMap<u64, MapPoint>) -> Self {
        let point_ids: Vec<u64> = points.keys().copied().collect();
        let entries: Vec<[f64; 2]> = point_ids
            .iter()
            .filter_map(|id| {
                points
                    .get(id)
                    .map(|pt| [pt.pos.x as f64, pt.pos.y as f64])
            })
            .collect();
        let tree: KdTree<f64, 2> = (&entries).into();

        Self { tree, point_ids }
    }

    /// Gibt die Anzahl indexierter Punkte zurück.
    pub fn len(&self) -> usize {
        self.point_ids.len()
    }

    /// Gibt `true` zurück, wenn keine Punkte im Index liegen.
    pub fn is_empty(&self) -> bool {
        self.point_ids.is_empty()
    }

    /// Findet den nächsten Punkt zur gegebenen Position.
    pub fn nearest(&self, query: Vec2) -> Option<SpatialMatch> {
        if self.is_empty() {
            return None;
        }

        let result = self
            .tree
            .nearest_one::<SquaredEuclidean>(&[query.x as f64, query.y as f64]);
        let point_id = *self.point_ids.get(result.item as usize)?;

        Some(SpatialMatch {
            point_id,
            distance: (result.distance as f32).sqrt(),
        })
    }

    /// Findet alle Punkte innerhalb eines Radius, nach Distanz sortiert.
    pub fn within_radius(&self, query: Vec2, radius: f32) -> Vec<SpatialMatch> {
        if self.is_empty() || radius.is_sign_negative() {
            return Vec::new();
        }

        let mut results = self
            .tree
            .within::<SquaredEuclidean>(&[query.x as f64, query.y as f64], (radius * radius) as f64)
            .into_iter()
            .filter_map(|entry| {
                let point_id = *self.point_ids.get(entry.item as usize)?;
                Some(SpatialMatch {
                    point_id,
                    distance: (entry.distance as f32).sqrt(),
                })
            })
            .collect::<Vec<_>>();

        results.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PointDir, PointKind};

    fn sample_points() -> IndexMap<u64, MapPoint> {
        let mut points = IndexMap::new();
        for (id, x, y) in [(1u64, 0.0f32, 0.0f32), (2, 10.0, 0.0), (3, 4.0, 3.0)] {
            points.insert(
                id,
                MapPoint::new(id, Vec2::new(x, y), PointDir::Vertical, PointKind::Plain),
            );
        }
        points
    }

    #[test]
    fn nearest_findet_den_erwarteten_punkt() {
        let index = SpatialIndex::from_points(&sample_points());
        let nearest = index.nearest(Vec2::new(3.9, 2.9)).expect("Treffer erwartet");

        assert_eq!(nearest.point_id, 3);
        assert!(nearest.distance < 0.2);
    }

    #[test]
    fn radius_abfrage_liefert_sortierte_treffer() {
        let index = SpatialIndex::from_points(&sample_points());
        let matches = index.within_radius(Vec2::new(0.0, 0.0), 6.0);

        let ids: Vec<u64> = matches.into_iter().map(|m| m.point_id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn leerer_index_liefert_nichts() {
        let index = SpatialIndex::empty();

        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
        assert!(index.nearest(Vec2::new(0.0, 0.0)).is_none());
    }
}
