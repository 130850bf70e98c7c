//! Haupt-Dispatcher: ruft die Layer-Pässe in fester Abhängigkeits-Reihenfolge auf.

use super::painter::{ClusterPass, LayerPainter, LinePass, WatermarkPhase};
use super::scope::{AdsMode, RenderOptions};
use crate::core::{ClusterEngine, Document, LineKind};
use crate::shared::{EditorOptions, TimeSpanClock};

/// Hook, der nach einem vollständigen Durchlauf feuert.
pub type RenderedCallback = Box<dyn FnMut()>;

/// Orchestriert einen Haupt-Render-Durchlauf über alle Layer.
///
/// Spätere Layer verdecken frühere oder bauen auf ihnen auf; die Reihenfolge
/// ist deshalb fix. Jeder Pass bekommt den Umfang durchgereicht und
/// entscheidet selbst, ob er nur Betroffenes oder alles neu zeichnet.
pub struct RenderDispatcher {
    painter: Box<dyn LayerPainter>,
    /// Feuert nach jedem nicht unterdrückten Durchlauf
    pub after_rendered: Option<RenderedCallback>,
    /// Besuchermodus: Wasserzeichen entfallen
    pub visitor_mode: bool,
    is_rendering: bool,
}

impl RenderDispatcher {
    /// Erstellt einen Dispatcher über dem gegebenen Maler.
    pub fn new(painter: Box<dyn LayerPainter>) -> Self {
        Self {
            painter,
            after_rendered: None,
            visitor_mode: false,
            is_rendering: false,
        }
    }

    /// Diagnose-Flag: läuft gerade ein Durchlauf?
    ///
    /// Der Kern ist single-threaded; ein `true` außerhalb von `render`
    /// bedeutet einen re-entranten Aufruf aus einem Pass heraus.
    pub fn is_rendering(&self) -> bool {
        self.is_rendering
    }

    /// Führt einen vollständigen Durchlauf aus.
    pub fn render(
        &mut self,
        doc: &Document,
        clusters: &mut ClusterEngine,
        cfg: &EditorOptions,
        creating_link: bool,
        options: &RenderOptions,
    ) {
        self.is_rendering = true;
        let mut clock = TimeSpanClock::new(log::log_enabled!(log::Level::Debug));
        let changed = options.scope.changed_lines.as_deref();
        let moved = options.scope.moved_labels.as_deref();

        if options.for_export && !options.transparent_background {
            self.painter.fill_background(doc.config.background_color);
        }
        if !self.visitor_mode && !options.disable_watermark {
            self.painter
                .watermark(WatermarkPhase::BeforeMain, options.for_export);
        }

        self.painter
            .lines(doc, changed, LineKind::Terrain, LinePass::Carpet);
        clock.tic("Gelände-Teppich");
        self.painter.terrain_smooth(doc);
        clock.tic("Gelände-Glättung");
        // Körper-Pass ohne Umfang: das Layout hat schon der Teppich-Pass erneuert
        self.painter
            .lines(doc, Some(&[]), LineKind::Terrain, LinePass::Body);
        clock.tic("Gelände-Körper");
        self.painter
            .lines(doc, changed, LineKind::Common, LinePass::Body);
        clock.tic("Linien");
        self.painter.points(doc, options.for_export);
        clock.tic("Punkte");

        let cluster_data = clusters.clusters(doc, cfg).to_vec();
        let hollow_core = !options.for_export;
        self.painter
            .clusters(doc, &cluster_data, ClusterPass::Carpet, creating_link, false);
        self.painter.point_links(doc, ClusterPass::Carpet);
        self.painter
            .clusters(doc, &cluster_data, ClusterPass::Body, creating_link, false);
        self.painter.point_links(doc, ClusterPass::Body);
        self.painter.clusters(
            doc,
            &cluster_data,
            ClusterPass::Core,
            creating_link,
            hollow_core,
        );
        self.painter.point_links(doc, ClusterPass::Core);
        clock.tic("Cluster");

        self.painter.station_labels(doc, moved, options.for_export);
        clock.tic("Stationsnamen");
        self.painter.text_tags(doc);
        clock.tic("Tags");

        if options.with_ads != AdsMode::No {
            self.painter.ads(options.with_ads);
        }
        if !self.visitor_mode && !options.disable_watermark {
            self.painter
                .watermark(WatermarkPhase::AfterMain, options.for_export);
        }

        self.is_rendering = false;
        if !options.suppress_rendered_callback {
            if let Some(cb) = self.after_rendered.as_mut() {
                cb();
            }
        }
    }
}
