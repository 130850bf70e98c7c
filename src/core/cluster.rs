//! Inkrementelles Stations-Clustering.
//!
//! Hält einen symmetrischen Nachbarschaftsgraphen über allen Stationen
//! ("haften": Distanz unter größenskaliertem Schwellwert) und leitet daraus
//! die Umsteige-Cluster als Zusammenhangskomponenten ab. Punktmutationen
//! aktualisieren den Graphen lokal in O(Stationszahl); die Clusterliste wird
//! erst beim nächsten Lesen neu abgeleitet.

use glam::Vec2;
use std::collections::{HashMap, HashSet};

use super::geometry::{dist_sq, dist_sq_less_than};
use super::{Document, MapPoint, StationLabel};
use crate::shared::EditorOptions;

/// Welche visuelle Größe über ein Cluster maximiert wird.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeMetric {
    /// Punktradius
    PointSize,
    /// Schriftgröße des Stationsnamens
    LabelSize,
}

/// Haftungstest zwischen zwei Punkten.
///
/// Isolierte Punkte haften nur bei exakter Koordinaten-Gleichheit. Sonst wird
/// der Basisabstand mit der mittleren linienbestimmten Punktgröße skaliert
/// und die quadrierte Distanz gegen den um `10 × epsilon` aufgeweiteten
/// Schwellwert geprüft, nie exakt, damit Float-Jitter nicht entscheidet.
pub fn clinging(doc: &Document, opts: &EditorOptions, a: &MapPoint, b: &MapPoint) -> bool {
    if a.isolated || b.isolated {
        return a.pos == b.pos;
    }
    let size_a = doc.lines_decided_point_size(a.id);
    let size_b = doc.lines_decided_point_size(b.id);
    let dist_mut = (size_a + size_b) / 2.0;
    let cling_dist = opts.cling_point_dist * dist_mut;
    let limit_sq = (cling_dist + opts.number_cmp_epsilon * 10.0).powi(2);
    dist_sq_less_than(a.pos, b.pos, limit_sq)
}

/// Inkrementell gepflegte Cluster-Partition der Stationen.
#[derive(Debug, Default)]
pub struct ClusterEngine {
    /// Symmetrische Haftungs-Relation zwischen Stations-IDs
    neighbors: HashMap<u64, HashSet<u64>>,
    /// Ob der Graph schon einmal vollständig aufgebaut wurde
    neighbors_built: bool,
    /// Abgeleitete Cluster (jede Liste sortiert, Liste nach erstem Element)
    clusters: Vec<Vec<u64>>,
    /// Cluster müssen vor dem nächsten Lesen neu abgeleitet werden
    clusters_dirty: bool,
}

impl ClusterEngine {
    /// Erstellt eine leere Engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Aktuelle Cluster-Partition; baut den Graphen beim ersten Zugriff auf.
    pub fn clusters(&mut self, doc: &Document, opts: &EditorOptions) -> &[Vec<u64>] {
        if !self.neighbors_built {
            self.init_neighbors(doc, opts);
            self.neighbors_built = true;
            self.clusters_dirty = true;
        }
        if self.clusters_dirty {
            self.make_clusters_from_neighbors();
            self.clusters_dirty = false;
        }
        &self.clusters
    }

    /// Cluster, zu dem der Punkt gehört (Kopie der Mitglieds-IDs).
    pub fn cluster_of(&mut self, doc: &Document, opts: &EditorOptions, pt_id: u64) -> Option<Vec<u64>> {
        self.clusters(doc, opts)
            .iter()
            .find(|c| c.contains(&pt_id))
            .cloned()
    }

    /// Vollaufbau des Nachbarschaftsgraphen über alle Stations-Paare.
    ///
    /// Paare mit Achsenabstand über dem Vorfilter-Schwellwert werden ohne
    /// exakte Distanzrechnung übersprungen.
    fn init_neighbors(&mut self, doc: &Document, opts: &EditorOptions) {
        self.neighbors.clear();
        let stations: Vec<&MapPoint> = doc.points.values().filter(|p| p.is_station()).collect();
        let skip_thr = opts.cling_skip_check_dist();

        for i in 0..stations.len() {
            for j in (i + 1)..stations.len() {
                let a = stations[i];
                let b = stations[j];
                if (a.pos.x - b.pos.x).abs() > skip_thr {
                    continue;
                }
                if (a.pos.y - b.pos.y).abs() > skip_thr {
                    continue;
                }
                if clinging(doc, opts, a, b) {
                    self.neighbors.entry(a.id).or_default().insert(b.id);
                    self.neighbors.entry(b.id).or_default().insert(a.id);
                }
            }
        }
    }

    /// Leitet die Clusterliste als Zusammenhangskomponenten ab.
    ///
    /// Expansion über einen expliziten Stack statt Rekursion, damit lange
    /// Ketten haftender Stationen die Stacktiefe nicht sprengen.
    fn make_clusters_from_neighbors(&mut self) {
        self.clusters.clear();
        let mut used: HashSet<u64> = HashSet::new();

        let mut ids: Vec<u64> = self.neighbors.keys().copied().collect();
        ids.sort_unstable();

        for id in ids {
            if used.contains(&id) {
                continue;
            }
            let Some(neibs) = self.neighbors.get(&id) else {
                continue;
            };
            if neibs.is_empty() {
                continue;
            }

            let mut forming: HashSet<u64> = HashSet::new();
            let mut stack = vec![id];
            while let Some(current) = stack.pop() {
                let Some(current_neibs) = self.neighbors.get(&current) else {
                    continue;
                };
                for &neib in current_neibs {
                    if forming.insert(neib) {
                        stack.push(neib);
                    }
                }
            }

            if forming.is_empty() {
                continue;
            }
            used.extend(forming.iter().copied());
            let mut cluster: Vec<u64> = forming.into_iter().collect();
            cluster.sort_unstable();
            self.clusters.push(cluster);
        }

        self.clusters.sort_by_key(|c| c.first().copied());
    }

    /// Aktualisiert den Graphen nach Bewegung, Art- oder Isolations-Wechsel
    /// eines Punkts.
    ///
    /// Alte Kanten werden beidseitig entfernt; ist der Punkt weiterhin eine
    /// Station, wird er gegen alle anderen Stationen neu getestet. Kosten:
    /// O(Stationszahl), gebunden an Nutzeraktionen, nicht an Frames.
    pub fn update_because_of(&mut self, doc: &Document, opts: &EditorOptions, pt_id: u64) {
        if !self.neighbors_built {
            // Graph existiert noch nicht: der nächste Lesezugriff baut voll auf.
            return;
        }

        if let Some(old) = self.neighbors.get(&pt_id).cloned() {
            for neib in &old {
                if let Some(neib_neibs) = self.neighbors.get_mut(neib) {
                    neib_neibs.remove(&pt_id);
                }
            }
        }
        self.neighbors.insert(pt_id, HashSet::new());
        self.clusters_dirty = true;

        let Some(pt) = doc.point(pt_id) else {
            self.neighbors.remove(&pt_id);
            return;
        };
        if !pt.is_station() {
            return;
        }

        let mut new_neibs: HashSet<u64> = HashSet::new();
        for other in doc.points.values() {
            if !other.is_station() || other.id == pt_id {
                continue;
            }
            if clinging(doc, opts, pt, other) {
                new_neibs.insert(other.id);
                self.neighbors.entry(other.id).or_default().insert(pt_id);
            }
        }
        self.neighbors.insert(pt_id, new_neibs);
    }

    /// Entfernt einen gelöschten Punkt aus dem Graphen.
    pub fn remove_because_of(&mut self, pt_id: u64) {
        let Some(old) = self.neighbors.remove(&pt_id) else {
            return;
        };
        for neib in &old {
            if let Some(neib_neibs) = self.neighbors.get_mut(neib) {
                neib_neibs.remove(&pt_id);
            }
        }
        self.clusters_dirty = true;
    }

    /// Gibt beim Ziehen eines Stationsnamens dessen Besitz an ein näheres
    /// Cluster-Mitglied ab, sobald die Hysterese überschritten ist.
    ///
    /// Verhindert, dass ein Name visuell an seiner Station "nachschleift",
    /// wenn Stationen eines Clusters auseinanderrücken. Gibt den neuen
    /// Besitzer zurück, damit Aufrufer aktiven Editierzustand umhängen.
    pub fn try_transfer_label_within_cluster(
        &mut self,
        doc: &mut Document,
        opts: &EditorOptions,
        pt_id: u64,
    ) -> Option<u64> {
        let pt = doc.point(pt_id)?;
        let label = pt.label.clone()?;
        let pt_pos = pt.pos;

        let cluster = self.cluster_of(doc, opts, pt_id)?;

        let anchor: Vec2 = pt_pos + label.offset;
        let original_dist_sq = dist_sq(pt_pos, anchor);

        let mut min_dist_sq = f32::MAX;
        let mut closest: Option<u64> = None;
        for &member in &cluster {
            if member == pt_id {
                continue;
            }
            let Some(member_pt) = doc.point(member) else {
                continue;
            };
            let d = dist_sq(member_pt.pos, anchor);
            if d < min_dist_sq {
                min_dist_sq = d;
                closest = Some(member);
            }
        }

        let closest = closest?;
        if original_dist_sq - min_dist_sq <= opts.label_transfer_threshold_sq {
            return None;
        }

        let closest_pos = doc.point(closest)?.pos;
        let kept_size = doc
            .point(closest)
            .and_then(|p| p.label.as_ref())
            .and_then(|l| l.size);
        if let Some(target) = doc.point_mut(closest) {
            target.label = Some(StationLabel {
                text: label.text,
                sub_text: label.sub_text,
                offset: anchor - closest_pos,
                size: kept_size,
            });
        }
        if let Some(source) = doc.point_mut(pt_id) {
            source.label = None;
        }
        log::debug!("Stationsname von Punkt {} an Punkt {} übergeben", pt_id, closest);
        Some(closest)
    }

    /// Maximum einer visuellen Größe über alle Cluster-Mitglieder des Punkts.
    ///
    /// Ohne Cluster: der eigene Wert; unbekannte IDs liefern den
    /// Metrik-Default statt eines Fehlers.
    pub fn max_size_within_cluster(
        &mut self,
        doc: &Document,
        opts: &EditorOptions,
        pt_id: u64,
        metric: SizeMetric,
    ) -> f32 {
        let get = |id: u64| match metric {
            SizeMetric::PointSize => doc.lines_decided_point_size(id),
            SizeMetric::LabelSize => doc.lines_decided_label_size(id),
        };
        match self.cluster_of(doc, opts, pt_id) {
            None => get(pt_id),
            Some(cluster) => cluster
                .iter()
                .map(|&id| get(id))
                .fold(None::<f32>, |acc, s| Some(acc.map_or(s, |a| a.max(s))))
                .unwrap_or(1.0),
        }
    }

    /// Verwirft Graph und Cache (z.B. bei Dokumentwechsel).
    pub fn clear(&mut self) {
        self.neighbors.clear();
        self.neighbors_built = false;
        self.clusters.clear();
        self.clusters_dirty = false;
    }

    /// Prüft die Symmetrie-Invariante des Graphen (Testhilfe).
    #[cfg(test)]
    fn neighbors_are_symmetric(&self) -> bool {
        self.neighbors.iter().all(|(id, neibs)| {
            neibs.iter().all(|n| {
                self.neighbors
                    .get(n)
                    .map(|back| back.contains(id))
                    .unwrap_or(false)
            })
        })
    }
}
