//! Geometrie-Hilfsfunktionen: Distanzen, Rundung, Segment-Projektion.

use glam::Vec2;

/// Quadrierte euklidische Distanz zwischen zwei Punkten.
pub fn dist_sq(a: Vec2, b: Vec2) -> f32 {
    (a - b).length_squared()
}

/// Prüft `dist²(a, b) < limit_sq` ohne Wurzelziehen.
pub fn dist_sq_less_than(a: Vec2, b: Vec2, limit_sq: f32) -> bool {
    dist_sq(a, b) < limit_sq
}

/// Rundet eine Koordinate auf die gegebene Präzision (z.B. 0.01).
///
/// Wird nach jedem Snap angewendet, damit wiederholtes Ziehen keinen
/// Float-Drift akkumuliert.
pub fn round_coord(v: Vec2, precision: f32) -> Vec2 {
    if precision <= 0.0 {
        return v;
    }
    Vec2::new(
        (v.x / precision).round() * precision,
        (v.y / precision).round() * precision,
    )
}

/// Projektion eines Punkts auf ein Segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentProjection {
    /// Nächster Punkt auf dem Segment
    pub closest: Vec2,
    /// Quadrierte Distanz des Query-Punkts zum Segment
    pub dist_sq: f32,
    /// Parameter in [0, 1] entlang des Segments
    pub t: f32,
}

/// Projiziert `p` auf das Segment `a`–`b` (geklemmt auf die Endpunkte).
pub fn project_on_segment(p: Vec2, a: Vec2, b: Vec2) -> SegmentProjection {
    let ab = b - a;
    let len_sq = ab.length_squared();
    let t = if len_sq <= f32::EPSILON {
        0.0
    } else {
        ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0)
    };
    let closest = a + ab * t;
    SegmentProjection {
        closest,
        dist_sq: dist_sq(p, closest),
        t,
    }
}

/// Ob ein Segment eher diagonal (45°-artig) als achsparallel verläuft.
///
/// Dient als Richtungsvorschlag für Punkte, die auf dem Segment eingefügt
/// werden: diagonale Segmente bekommen geneigte Punkte.
pub fn segment_is_diagonal(a: Vec2, b: Vec2) -> bool {
    let d = b - a;
    let (ax, ay) = (d.x.abs(), d.y.abs());
    if ax <= f32::EPSILON && ay <= f32::EPSILON {
        return false;
    }
    let ratio = if ax > ay { ay / ax } else { ax / ay };
    ratio > 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn runden_auf_hundertstel() {
        let v = round_coord(Vec2::new(1.23456, -7.8912), 0.01);
        assert_relative_eq!(v.x, 1.23, epsilon = 1e-6);
        assert_relative_eq!(v.y, -7.89, epsilon = 1e-6);
    }

    #[test]
    fn runden_mit_nullpraezision_ist_noop() {
        let v = Vec2::new(1.2345, 6.789);
        assert_eq!(round_coord(v, 0.0), v);
    }

    #[test]
    fn projektion_liegt_auf_dem_segment() {
        let proj = project_on_segment(
            Vec2::new(5.0, 3.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
        );
        assert_relative_eq!(proj.closest.x, 5.0, epsilon = 1e-6);
        assert_relative_eq!(proj.closest.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(proj.dist_sq, 9.0, epsilon = 1e-5);
        assert_relative_eq!(proj.t, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn projektion_klemmt_auf_endpunkte() {
        let proj = project_on_segment(
            Vec2::new(-5.0, 0.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
        );
        assert_eq!(proj.closest, Vec2::new(0.0, 0.0));
        assert_eq!(proj.t, 0.0);
    }

    #[test]
    fn diagonal_erkennung() {
        assert!(segment_is_diagonal(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 9.0)
        ));
        assert!(!segment_is_diagonal(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 1.0)
        ));
        assert!(!segment_is_diagonal(Vec2::ZERO, Vec2::ZERO));
    }
}
