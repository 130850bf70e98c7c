//! Der Editor: zentrale Zustandsmaschine über dem Dokument.
//!
//! Übersetzt klassifizierte Zeiger-Ereignisse und Commands in
//! Dokument-Mutationen, hält den Cluster-Graphen aktuell und meldet dem Host
//! für jede Mutation den minimalen Render-Umfang.

use glam::Vec2;

use super::command::{ClickKind, EditorCommand, OpsButton};
use super::services::{GeoHitTester, GridSnapper, HitTester, SnapService};
use super::state::{DragState, EditingState, LinkBuilder, Selection};
use super::{ops_menu, pointer, structure};
use crate::core::{ClusterEngine, Document};
use crate::render::{RenderDispatcher, RenderOptions, RenderScope};
use crate::shared::{EditorOptions, RescaleGate};

/// Hook für angefordertes Re-Rendern mit Umfang.
pub type RerenderHook = Box<dyn FnMut(&RenderScope)>;
/// Hook für den Inhalt des Operations-Menüs (geordnete Spalten).
pub type OpsHook = Box<dyn FnMut(&[Vec<OpsButton>])>;

/// Zentrale Zustandsmaschine des Netzplan-Editors.
pub struct Editor {
    /// Laufzeit-Optionen
    pub options: EditorOptions,
    /// Aktives Dokument; ohne Dokument sind alle Gesten No-ops
    pub doc: Option<Document>,
    /// Abgeleiteter Cluster-Zustand
    pub cluster: ClusterEngine,
    /// Aktive Auswahl
    pub selection: Selection,
    /// Drag-Lebenszyklus
    pub drag: DragState,
    /// Editier-Zustand der Texteingaben (vom Host gemeldet)
    pub editing: EditingState,
    /// Laufende Verbinder-Erstellung
    pub link_builder: Option<LinkBuilder>,
    /// Ansichtsmitte in Dokumentkoordinaten (vom Host gepflegt)
    pub view_center: Option<Vec2>,
    pub(crate) ops_visible: bool,
    pub(crate) hit: Box<dyn HitTester>,
    pub(crate) snap: Box<dyn SnapService>,
    pub(crate) rerender: Option<RerenderHook>,
    pub(crate) ops_changed: Option<OpsHook>,
    pub(crate) rescaled: Option<Box<dyn FnMut()>>,
    pub(crate) rescale_gate: RescaleGate,
}

impl Editor {
    /// Erstellt einen Editor mit den Default-Geometriediensten.
    pub fn new(options: EditorOptions) -> Self {
        Self::with_services(options, Box::new(GeoHitTester::new()), Box::new(GridSnapper::new()))
    }

    /// Erstellt einen Editor mit eigenen Geometriediensten.
    pub fn with_services(
        options: EditorOptions,
        hit: Box<dyn HitTester>,
        snap: Box<dyn SnapService>,
    ) -> Self {
        let rescale_gate = RescaleGate::new(options.rescale_min_interval_ms);
        Self {
            options,
            doc: None,
            cluster: ClusterEngine::new(),
            selection: Selection::None,
            drag: DragState::default(),
            editing: EditingState::default(),
            link_builder: None,
            view_center: None,
            ops_visible: false,
            hit,
            snap,
            rerender: None,
            ops_changed: None,
            rescaled: None,
            rescale_gate,
        }
    }

    /// Setzt das aktive Dokument und verwirft allen abgeleiteten Zustand.
    pub fn set_document(&mut self, doc: Document) {
        log::info!(
            "Dokument übernommen: {} Punkte, {} Linien",
            doc.points.len(),
            doc.lines.len()
        );
        self.doc = Some(doc);
        self.cluster.clear();
        self.selection = Selection::None;
        self.drag = DragState::default();
        self.editing = EditingState::default();
        self.link_builder = None;
    }

    /// Registriert den Re-Render-Hook des Hosts.
    pub fn set_rerender_hook(&mut self, hook: RerenderHook) {
        self.rerender = Some(hook);
    }

    /// Registriert den Operations-Menü-Hook des Hosts.
    pub fn set_ops_hook(&mut self, hook: OpsHook) {
        self.ops_changed = Some(hook);
    }

    /// Registriert den Hook für gedrosselte Rescale-Benachrichtigungen.
    pub fn set_rescaled_hook(&mut self, hook: Box<dyn FnMut()>) {
        self.rescaled = Some(hook);
    }

    /// Ob irgendetwas ausgewählt ist (Host-Gating).
    pub fn something_selected(&self) -> bool {
        self.selection.is_some()
    }

    /// Ob gerade ein Verbinder aufgebaut wird.
    pub fn is_creating_link(&self) -> bool {
        self.link_builder.is_some()
    }

    // ── Zeiger-Ereignisse ───────────────────────────────────────────

    /// Verarbeitet einen reinen Klick (kein Drag).
    pub fn handle_click(&mut self, pos: Vec2, kind: ClickKind) {
        pointer::pure_click(self, pos, kind);
    }

    /// Beginnt eine Drag-Geste.
    pub fn handle_drag_start(&mut self, pos: Vec2) {
        pointer::drag_start(self, pos);
    }

    /// Setzt eine laufende Drag-Geste fort.
    /// `over_discard`: der Zeiger steht über der Verwerfen-Zone des Hosts.
    pub fn handle_drag_move(&mut self, pos: Vec2, over_discard: bool) {
        pointer::drag_move(self, pos, over_discard);
    }

    /// Beendet die laufende Drag-Geste.
    pub fn handle_drag_end(&mut self) {
        pointer::drag_end(self);
    }

    /// Meldet eine View-Skalierung; gedrosselt auf das Mindestintervall.
    /// Gibt `true` zurück, wenn die Benachrichtigung durchgelassen wurde.
    pub fn notify_view_rescaled(&mut self) -> bool {
        self.clear_ops();
        if !self.rescale_gate.should_fire() {
            return false;
        }
        if let Some(cb) = self.rescaled.as_mut() {
            cb();
        }
        true
    }

    /// Meldet eine View-Verschiebung (klappt nur das Menü ein).
    pub fn notify_view_moved(&mut self) {
        self.clear_ops();
    }

    // ── Commands ────────────────────────────────────────────────────

    /// Führt ein mutierendes Command aus.
    /// Fehlende Entitäten und verfehlte Vorbedingungen sind stille No-ops.
    pub fn handle_command(&mut self, command: EditorCommand) -> anyhow::Result<()> {
        let Some(doc) = self.doc.as_ref() else {
            return Ok(());
        };
        // Commands kommen auch ohne vorausgehenden Klick (Host-Menüs):
        // der Hit-Index muss den aktuellen Dokumentstand sehen
        self.hit.refresh(doc);
        log::debug!("Command: {:?}", command);

        match command {
            EditorCommand::RotatePoint { id } => {
                if let Some(pt) = self.doc.as_mut().and_then(|d| d.point_mut(id)) {
                    pt.dir = pt.dir.toggled();
                    self.drag.moved_point = true;
                }
            }
            EditorCommand::TogglePointKind { id } => {
                let toggled = self
                    .doc
                    .as_mut()
                    .and_then(|d| d.point_mut(id))
                    .map(|pt| pt.kind = pt.kind.toggled())
                    .is_some();
                if toggled {
                    self.drag.moved_point = true;
                    self.recluster(id);
                }
            }
            EditorCommand::ToggleIsolated { id } => {
                let toggled = self
                    .doc
                    .as_mut()
                    .and_then(|d| d.point_mut(id))
                    .map(|pt| pt.isolated = !pt.isolated)
                    .is_some();
                if toggled {
                    self.drag.moved_point = true;
                    self.recluster(id);
                    self.fire_rerender(RenderScope::everything());
                }
            }
            EditorCommand::RemoveActivePoint => {
                let related = self
                    .selection
                    .point_id()
                    .map(|id| self.doc.as_ref().map(|d| d.line_ids_by_point(id)))
                    .flatten()
                    .unwrap_or_default();
                if self.selection.point_id().is_some() {
                    structure::del_active_point(self, false, false);
                    self.fire_rerender(RenderScope::partial(related, Vec::new()));
                }
            }
            EditorCommand::JoinLine {
                pt,
                line,
                insert_at,
            } => {
                let related = self
                    .doc
                    .as_ref()
                    .map(|d| d.line_ids_by_point(pt))
                    .unwrap_or_default();
                let joined = self
                    .doc
                    .as_mut()
                    .map(|d| d.insert_point_into_line(pt, line, insert_at))
                    .unwrap_or(false);
                if joined {
                    let mut lines = vec![line];
                    lines.extend(related);
                    self.fire_rerender(RenderScope::partial(lines, vec![pt]));
                    self.republish_point_ops(pt);
                }
            }
            EditorCommand::LeaveLine { pt, line } => {
                let related = self
                    .doc
                    .as_ref()
                    .map(|d| d.line_ids_by_point(pt))
                    .unwrap_or_default();
                let removed = self
                    .doc
                    .as_mut()
                    .map(|d| d.remove_point_from_line(pt, line))
                    .unwrap_or(false);
                if removed {
                    let mut lines = vec![line];
                    lines.extend(related);
                    self.fire_rerender(RenderScope::partial(lines, Vec::new()));
                    structure::pointless_line_scan(self);
                    self.republish_point_ops(pt);
                }
            }
            EditorCommand::UnlinkPoint { pt } => {
                let removed = self
                    .doc
                    .as_mut()
                    .map(|d| d.remove_point_links_by_point(pt))
                    .unwrap_or(0);
                if removed > 0 {
                    self.clear_ops();
                    self.fire_rerender(RenderScope::partial(Vec::new(), Vec::new()));
                }
            }
            EditorCommand::InsertPointOnLine {
                line,
                insert_at,
                pos,
                dir,
                kind,
            } => {
                structure::insert_point_on_line(self, line, insert_at, pos, dir, kind);
            }
            EditorCommand::SplitLineAt { line, pt } => {
                structure::split_line_at(self, line, pt);
            }
            EditorCommand::MergeLinesAt { line1, line2, pt } => {
                structure::merge_lines_at(self, line1, line2, pt);
            }
            EditorCommand::CreateLine {
                kind,
                group,
                parent,
            } => {
                structure::create_line(self, kind, group, parent);
            }
            EditorCommand::CreatePlainPoint => {
                structure::create_plain_point(self);
            }
            EditorCommand::CreateTextTag { for_line } => {
                structure::create_text_tag(self, for_line);
            }
            EditorCommand::DuplicateTextTag => {
                structure::duplicate_text_tag(self);
            }
            EditorCommand::DeleteActiveTextTag => {
                structure::delete_active_text_tag(self, true);
            }
            EditorCommand::DeleteLine { id, del_with_sta } => {
                structure::delete_line(self, id, false, del_with_sta);
            }
            EditorCommand::StartPointLink { kind } => {
                self.selection = Selection::None;
                self.clear_ops();
                self.link_builder = Some(LinkBuilder::new(kind));
                self.fire_rerender(RenderScope::everything());
            }
            EditorCommand::AbortPointLink => {
                if self.link_builder.take().is_some() {
                    self.fire_rerender(RenderScope::everything());
                }
            }
            EditorCommand::RemoveRepeatPoints => {
                if let Some(doc) = self.doc.as_mut() {
                    doc.remove_repeat_points_on_lines();
                }
                self.fire_rerender(RenderScope::everything());
            }
            EditorCommand::LineInfoChanged {
                id,
                sta_size_changed,
            } => {
                let Some(doc) = self.doc.as_ref() else {
                    return Ok(());
                };
                let Some(line) = doc.line(id) else {
                    return Ok(());
                };
                let own_pts = line.pts.clone();
                if sta_size_changed {
                    // Größenwirksame Änderung: die Haftreichweite aller
                    // Stationen entlang der Linie und ihrer Kinder ist neu
                    let mut affected = own_pts.clone();
                    for child_id in doc.children_of(id) {
                        if let Some(child) = doc.line(child_id) {
                            affected.extend(child.pts.iter().copied());
                        }
                    }
                    affected.sort_unstable();
                    affected.dedup();
                    for pt in affected {
                        self.recluster(pt);
                    }
                }
                self.fire_rerender(RenderScope::partial(Vec::new(), own_pts));
            }
            EditorCommand::OpenLineSettings { id } => {
                // Host-Belang: der Kern kennt keine Einstellungs-Oberfläche
                log::debug!("Einstellungen für Linie {} angefordert", id);
            }
            EditorCommand::OpenPointSettings { id } => {
                log::debug!("Einstellungen für Punkt {} angefordert", id);
            }
        }
        Ok(())
    }

    // ── Rendering-Anbindung ─────────────────────────────────────────

    /// Bequemer Voll-Durchlauf: reicht Dokument, Cluster und Link-Status an
    /// den Dispatcher durch.
    pub fn render_into(&mut self, dispatcher: &mut RenderDispatcher, options: &RenderOptions) {
        let creating_link = self.link_builder.is_some();
        let Some(doc) = self.doc.as_ref() else {
            return;
        };
        dispatcher.render(doc, &mut self.cluster, &self.options, creating_link, options);
    }

    pub(crate) fn fire_rerender(&mut self, scope: RenderScope) {
        if let Some(cb) = self.rerender.as_mut() {
            cb(&scope);
        }
    }

    // ── Cluster-Anbindung ───────────────────────────────────────────

    /// Aktuelle Cluster-Partition des Dokuments (leer ohne Dokument).
    pub fn clusters(&mut self) -> Vec<Vec<u64>> {
        let Some(doc) = self.doc.as_ref() else {
            return Vec::new();
        };
        self.cluster.clusters(doc, &self.options).to_vec()
    }

    pub(crate) fn recluster(&mut self, pt_id: u64) {
        let Editor {
            doc,
            options,
            cluster,
            ..
        } = self;
        if let Some(doc) = doc.as_ref() {
            cluster.update_because_of(doc, options, pt_id);
        }
    }

    // ── Operations-Menü ─────────────────────────────────────────────

    pub(crate) fn publish_ops(&mut self, columns: Vec<Vec<OpsButton>>) {
        self.ops_visible = !columns.is_empty();
        if let Some(cb) = self.ops_changed.as_mut() {
            cb(&columns);
        }
    }

    pub(crate) fn clear_ops(&mut self) {
        if self.ops_visible || self.ops_changed.is_some() {
            self.publish_ops(Vec::new());
        }
        self.ops_visible = false;
    }

    pub(crate) fn republish_point_ops(&mut self, pt_id: u64) {
        let columns = ops_menu::point_ops(self, pt_id);
        self.publish_ops(columns);
    }

    pub(crate) fn republish_line_ops(&mut self, line_id: u64) {
        let columns = ops_menu::line_ops(self, line_id);
        self.publish_ops(columns);
    }
}
