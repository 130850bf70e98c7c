//! Die Maler-Schnittstelle: ein Pass pro Layer, Rasterung extern.
//!
//! Der Dispatcher kennt nur Reihenfolge und Umfang der Pässe; wie eine Linie
//! oder ein Name tatsächlich auf die Fläche kommt, entscheidet die
//! `LayerPainter`-Implementierung des Hosts.

use crate::core::{Document, LineKind};

/// Phase des Wasserzeichen-Passes relativ zum Hauptinhalt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatermarkPhase {
    /// Vor allen Inhalts-Layern
    BeforeMain,
    /// Nach allen Inhalts-Layern
    AfterMain,
}

/// Unter-Pass der Linien-Layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinePass {
    /// Teppich (verbreiterter Untergrund)
    Carpet,
    /// Eigentlicher Linienkörper
    Body,
}

/// Unter-Pass der Cluster- und Verbinder-Layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterPass {
    /// Teppich
    Carpet,
    /// Körper
    Body,
    /// Kern (interaktiv hohl dargestellt)
    Core,
}

/// Stufe der Werbe-Einblendung, durchgereicht an den Maler.
pub use super::scope::AdsMode;

/// Ein Layer-Maler. Jeder Pass erhält den Umfang und kann selbst entscheiden,
/// nur betroffene Elemente oder alles neu zu zeichnen.
pub trait LayerPainter {
    /// Füllt die gesamte Fläche mit der Hintergrundfarbe.
    fn fill_background(&mut self, color: [f32; 4]);

    /// Zeichnet das Wasserzeichen der jeweiligen Phase.
    fn watermark(&mut self, phase: WatermarkPhase, for_export: bool);

    /// Zeichnet Linien einer Art; `changed` = betroffene Linien oder alle.
    fn lines(&mut self, doc: &Document, changed: Option<&[u64]>, kind: LineKind, pass: LinePass);

    /// Glättungs-Pass zwischen Gelände-Teppich und -Körper.
    fn terrain_smooth(&mut self, doc: &Document);

    /// Zeichnet alle Punktkörper.
    fn points(&mut self, doc: &Document, for_export: bool);

    /// Zeichnet die Cluster-Hüllen eines Unter-Passes.
    fn clusters(
        &mut self,
        doc: &Document,
        clusters: &[Vec<u64>],
        pass: ClusterPass,
        creating_link: bool,
        hollow_core: bool,
    );

    /// Zeichnet die Punkt-Verbinder eines Unter-Passes.
    fn point_links(&mut self, doc: &Document, pass: ClusterPass);

    /// Zeichnet Stationsnamen; `moved` = Punkte mit bewegtem Namen oder alle.
    fn station_labels(&mut self, doc: &Document, moved: Option<&[u64]>, for_export: bool);

    /// Zeichnet freie Text-Tags.
    fn text_tags(&mut self, doc: &Document);

    /// Zeichnet die Werbe-Einblendung.
    fn ads(&mut self, mode: AdsMode);
}

/// Maler, der jeden Pass nur ins Log schreibt.
///
/// Für Headless-Läufe und Diagnose: zeigt Reihenfolge und Umfang der Pässe,
/// ohne eine Zeichenfläche zu brauchen.
#[derive(Debug, Default)]
pub struct TracingPainter;

impl TracingPainter {
    /// Erstellt einen neuen Tracing-Maler.
    pub fn new() -> Self {
        Self
    }
}

fn scope_len(ids: Option<&[u64]>) -> String {
    match ids {
        None => "alle".to_string(),
        Some(ids) => format!("{}", ids.len()),
    }
}

impl LayerPainter for TracingPainter {
    fn fill_background(&mut self, color: [f32; 4]) {
        log::debug!("Pass: Hintergrund (Farbe {:?})", color);
    }

    fn watermark(&mut self, phase: WatermarkPhase, for_export: bool) {
        log::debug!("Pass: Wasserzeichen {:?} (Export: {})", phase, for_export);
    }

    fn lines(&mut self, _doc: &Document, changed: Option<&[u64]>, kind: LineKind, pass: LinePass) {
        log::debug!(
            "Pass: Linien {:?}/{:?} (geändert: {})",
            kind,
            pass,
            scope_len(changed)
        );
    }

    fn terrain_smooth(&mut self, _doc: &Document) {
        log::debug!("Pass: Gelände-Glättung");
    }

    fn points(&mut self, doc: &Document, _for_export: bool) {
        log::debug!("Pass: Punkte ({})", doc.points.len());
    }

    fn clusters(
        &mut self,
        _doc: &Document,
        clusters: &[Vec<u64>],
        pass: ClusterPass,
        _creating_link: bool,
        hollow_core: bool,
    ) {
        log::debug!(
            "Pass: Cluster {:?} ({} Cluster, hohl: {})",
            pass,
            clusters.len(),
            hollow_core
        );
    }

    fn point_links(&mut self, doc: &Document, pass: ClusterPass) {
        log::debug!("Pass: Verbinder {:?} ({})", pass, doc.point_links.len());
    }

    fn station_labels(&mut self, _doc: &Document, moved: Option<&[u64]>, _for_export: bool) {
        log::debug!("Pass: Stationsnamen (bewegt: {})", scope_len(moved));
    }

    fn text_tags(&mut self, doc: &Document) {
        log::debug!("Pass: Text-Tags ({})", doc.text_tags.len());
    }

    fn ads(&mut self, mode: AdsMode) {
        log::debug!("Pass: Werbung {:?}", mode);
    }
}
