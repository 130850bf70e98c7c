//! Zentrale Konfiguration für den Netzplan-Editor.
//!
//! `EditorOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use serde::{Deserialize, Serialize};

// ── Clustering ──────────────────────────────────────────────────────

/// Basis-Abstand (Welteinheiten), unter dem zwei Stationen aneinander "haften".
/// Wird pro Paar mit der mittleren visuellen Punktgröße skaliert.
pub const CLING_POINT_DIST: f32 = 20.0;
/// Vorfilter-Faktor: Paare mit Achsenabstand über `factor × cling_point_dist`
/// werden ohne exakte Distanzprüfung übersprungen.
pub const CLING_SKIP_CHECK_FACTOR: f32 = 2.5;
/// Epsilon für Fließkomma-Vergleiche; der Haftungs-Schwellwert wird um das
/// Zehnfache hiervon aufgeweitet, nie exakt verglichen.
pub const NUMBER_CMP_EPSILON: f32 = 1e-5;
/// Hysterese (quadrierte Distanz) für die Übergabe eines Stationsnamens an
/// ein näheres Cluster-Mitglied.
pub const LABEL_TRANSFER_THRESHOLD_SQ: f32 = 200.0;

// ── Platzierung neuer Geometrie ─────────────────────────────────────

/// Maximale Anzahl Ausweichversuche, bevor Überlappung akzeptiert wird.
pub const PLACEMENT_MAX_ATTEMPTS: u32 = 16;
/// Erster vertikaler Ausweich-Offset beim Freiraum-Suchen.
pub const PLACEMENT_PROBE_OFFSET: f32 = 20.0;
/// Zuwachs des Offsets nach jedem Vorzeichenwechsel.
pub const PLACEMENT_PROBE_STEP: f32 = 40.0;
/// Horizontale Streuung der beiden Startpunkte einer neuen Linie.
pub const NEW_LINE_POINT_SPREAD: f32 = 50.0;
/// Sicherheitsabstand zum Canvas-Rand beim Platzieren.
pub const CANVAS_MARGIN: f32 = 100.0;
/// Vertikaler Versatz beim Duplizieren eines Text-Tags.
pub const TAG_DUPLICATE_OFFSET: f32 = 120.0;

// ── Koordinaten & Snapping ──────────────────────────────────────────

/// Rundungs-Präzision für Koordinaten nach Snap (vermeidet Float-Drift).
pub const COORD_PRECISION: f32 = 0.01;
/// Rasterweite für Grid-Snap.
pub const GRID_SIZE: f32 = 10.0;
/// Maximale Distanz, bei der Grid-Snap noch greift.
pub const GRID_SNAP_DIST: f32 = 4.0;
/// Achsabstand, bei dem ein Punkt auf die X/Y-Achse eines anderen einrastet.
pub const AXIS_SNAP_DIST: f32 = 5.0;

// ── Hit-Testing ─────────────────────────────────────────────────────

/// Basis-Trefferradius eines Punktkörpers (skaliert mit der Punktgröße).
pub const POINT_HIT_RADIUS: f32 = 10.0;
/// Toleranz für Klicks auf Liniensegmente (zusätzlich zur halben Linienbreite).
pub const LINE_HIT_TOLERANCE: f32 = 6.0;
/// Geschätzte Zeichenbreite für Stationsnamen-Rechtecke.
pub const LABEL_CHAR_WIDTH: f32 = 9.0;
/// Zeilenhöhe für Stationsnamen-Rechtecke.
pub const LABEL_LINE_HEIGHT: f32 = 18.0;
/// Abstand des Linien-Verlängerungsgriffs vom Endpunkt.
pub const EXTEND_HANDLE_DIST: f32 = 40.0;
/// Trefferradius des Verlängerungsgriffs.
pub const EXTEND_HANDLE_RADIUS: f32 = 14.0;

// ── Rendering ───────────────────────────────────────────────────────

/// Hintergrundfarbe des Canvas (RGBA).
pub const BACKGROUND_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
/// Farbe neuer Verkehrslinien (RGBA: Rot).
pub const NEW_COMMON_LINE_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
/// Farbe neuer Gelände-Formen (RGBA: Schwarz).
pub const NEW_TERRAIN_LINE_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

// ── Ereignis-Drosselung ─────────────────────────────────────────────

/// Mindestintervall zwischen zwei Rescale-Benachrichtigungen.
pub const RESCALE_MIN_INTERVAL_MS: u64 = 50;

/// Alle zur Laufzeit änderbaren Editor-Optionen.
/// Wird als `netzplan_editor.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorOptions {
    // ── Clustering ──────────────────────────────────────────────
    /// Basis-Haftungsabstand zwischen Stationen
    pub cling_point_dist: f32,
    /// Vorfilter-Faktor für den Achsen-Kurzschlusstest
    pub cling_skip_check_factor: f32,
    /// Epsilon-Aufweitung des Haftungs-Schwellwerts
    pub number_cmp_epsilon: f32,
    /// Hysterese (quadriert) für Namens-Übergabe im Cluster
    pub label_transfer_threshold_sq: f32,

    // ── Platzierung ─────────────────────────────────────────────
    /// Maximale Ausweichversuche für neue Geometrie
    #[serde(default = "default_placement_max_attempts")]
    pub placement_max_attempts: u32,
    /// Erster vertikaler Ausweich-Offset
    #[serde(default = "default_placement_probe_offset")]
    pub placement_probe_offset: f32,
    /// Offset-Zuwachs pro Vorzeichenwechsel
    #[serde(default = "default_placement_probe_step")]
    pub placement_probe_step: f32,
    /// Horizontale Streuung neuer Linien-Startpunkte
    pub new_line_point_spread: f32,
    /// Rand-Sicherheitsabstand beim Platzieren
    pub canvas_margin: f32,
    /// Versatz beim Duplizieren von Text-Tags
    pub tag_duplicate_offset: f32,

    // ── Koordinaten & Snapping ──────────────────────────────────
    /// Rundungs-Präzision nach Snap
    pub coord_precision: f32,
    /// Rasterweite für Grid-Snap
    pub grid_size: f32,
    /// Greif-Distanz des Grid-Snaps
    pub grid_snap_dist: f32,
    /// Greif-Distanz des Achsen-Snaps
    pub axis_snap_dist: f32,

    // ── Hit-Testing ─────────────────────────────────────────────
    /// Basis-Trefferradius eines Punktkörpers
    pub point_hit_radius: f32,
    /// Klick-Toleranz auf Liniensegmenten
    pub line_hit_tolerance: f32,
    /// Zeichenbreite für Namens-Rechtecke
    pub label_char_width: f32,
    /// Zeilenhöhe für Namens-Rechtecke
    pub label_line_height: f32,
    /// Abstand des Verlängerungsgriffs vom Linienende
    pub extend_handle_dist: f32,
    /// Trefferradius des Verlängerungsgriffs
    pub extend_handle_radius: f32,

    // ── Rendering ───────────────────────────────────────────────
    /// Hintergrundfarbe des Canvas
    pub background_color: [f32; 4],
    /// Farbe neu erstellter Verkehrslinien
    pub new_common_line_color: [f32; 4],
    /// Farbe neu erstellter Gelände-Formen
    pub new_terrain_line_color: [f32; 4],

    // ── Ereignis-Drosselung ─────────────────────────────────────
    /// Mindestintervall zwischen Rescale-Benachrichtigungen (ms)
    pub rescale_min_interval_ms: u64,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            cling_point_dist: CLING_POINT_DIST,
            cling_skip_check_factor: CLING_SKIP_CHECK_FACTOR,
            number_cmp_epsilon: NUMBER_CMP_EPSILON,
            label_transfer_threshold_sq: LABEL_TRANSFER_THRESHOLD_SQ,

            placement_max_attempts: PLACEMENT_MAX_ATTEMPTS,
            placement_probe_offset: PLACEMENT_PROBE_OFFSET,
            placement_probe_step: PLACEMENT_PROBE_STEP,
            new_line_point_spread: NEW_LINE_POINT_SPREAD,
            canvas_margin: CANVAS_MARGIN,
            tag_duplicate_offset: TAG_DUPLICATE_OFFSET,

            coord_precision: COORD_PRECISION,
            grid_size: GRID_SIZE,
            grid_snap_dist: GRID_SNAP_DIST,
            axis_snap_dist: AXIS_SNAP_DIST,

            point_hit_radius: POINT_HIT_RADIUS,
            line_hit_tolerance: LINE_HIT_TOLERANCE,
            label_char_width: LABEL_CHAR_WIDTH,
            label_line_height: LABEL_LINE_HEIGHT,
            extend_handle_dist: EXTEND_HANDLE_DIST,
            extend_handle_radius: EXTEND_HANDLE_RADIUS,

            background_color: BACKGROUND_COLOR,
            new_common_line_color: NEW_COMMON_LINE_COLOR,
            new_terrain_line_color: NEW_TERRAIN_LINE_COLOR,

            rescale_min_interval_ms: RESCALE_MIN_INTERVAL_MS,
        }
    }
}

/// Serde-Default für `placement_max_attempts` (Abwärtskompatibilität).
fn default_placement_max_attempts() -> u32 {
    PLACEMENT_MAX_ATTEMPTS
}

/// Serde-Default für `placement_probe_offset`.
fn default_placement_probe_offset() -> f32 {
    PLACEMENT_PROBE_OFFSET
}

/// Serde-Default für `placement_probe_step`.
fn default_placement_probe_step() -> f32 {
    PLACEMENT_PROBE_STEP
}

impl EditorOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("netzplan_editor"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("netzplan_editor.toml")
    }

    /// Achsabstand, über dem der Haftungstest gar nicht erst gerechnet wird.
    pub fn cling_skip_check_dist(&self) -> f32 {
        self.cling_skip_check_factor * self.cling_point_dist
    }
}
