//! Zeiger-Verarbeitung: Klick-Präzedenz und Drag-Lebenszyklus.

use glam::Vec2;

use super::command::ClickKind;
use super::editor::Editor;
use super::state::{PointPart, Selection};
use super::structure;
use crate::core::geometry::round_coord;
use crate::core::{Document, MergeResult, PointKind};
use crate::render::RenderScope;
use crate::shared::EditorOptions;

/// Versucht, einen anderen Punkt in den aktiven zu verschmelzen.
///
/// Der ruhende Kandidat überlebt; der aktive Punkt geht in ihm auf. Der
/// Cluster-Graph verliert den aufgelösten Punkt sofort, das Update des
/// Überlebenden übernimmt der Aufrufer.
pub(crate) fn try_merge_active(ed: &mut Editor, active_id: u64) -> Option<MergeResult> {
    let Editor {
        doc,
        options,
        cluster,
        ..
    } = ed;
    let doc = doc.as_mut()?;
    let candidate = {
        let doc_ref: &Document = doc;
        let opts: &EditorOptions = options;
        doc_ref.merge_candidate(active_id, &|a, b| crate::core::clinging(doc_ref, opts, a, b))
    }?;
    let res = doc.merge_points(candidate, active_id)?;
    cluster.remove_because_of(res.removed);
    Some(res)
}

/// Reiner Klick: wertet zuerst die abgeschlossene Geste aus (Verschmelzen,
/// Render-Umfang, Recluster), dann die Treffer-Präzedenz
/// Name → Tag → Punkt → Linie → Leere.
pub(crate) fn pure_click(ed: &mut Editor, pos: Vec2, kind: ClickKind) {
    if ed.doc.is_none() {
        return;
    }
    let is_right_only = kind == ClickKind::Right;
    let is_right_ctrl = kind == ClickKind::RightWithModifier;
    let is_right = kind.is_right();

    if let Some(doc) = ed.doc.as_ref() {
        ed.hit.refresh(doc);
    }

    let mut changed_lines: Vec<u64> = Vec::new();
    let mut moved_labels: Vec<u64> = Vec::new();
    let mut merge_kept: Option<u64> = None;

    // Verschmelzung nur beim Klick auf den bereits selektierten Punkt
    // (ohne Modifier): haftende Stationen sollen als Cluster bestehen
    // bleiben, bis der Nutzer die Vereinigung ausdrücklich anstößt
    if let Some(active_id) = ed.selection.point_id() {
        let on_active = ed
            .doc
            .as_ref()
            .and_then(|doc| ed.hit.on_point(doc, &ed.options, pos))
            == Some(active_id);
        if !is_right && on_active {
            if let Some(res) = try_merge_active(ed, active_id) {
                changed_lines.extend(res.changed_lines.iter().copied());
                moved_labels.push(res.kept);
                moved_labels.push(res.removed);
                merge_kept = Some(res.kept);
            }
        }
    }
    if ed.editing.label_edited {
        if let Some(active_id) = ed.selection.point_id() {
            moved_labels.push(active_id);
        }
    }
    if ed.drag.moved_point {
        if let Some(active_id) = ed.selection.point_id() {
            if let Some(doc) = ed.doc.as_ref() {
                changed_lines.extend(doc.line_ids_by_point(active_id));
            }
            moved_labels.push(active_id);
        }
    }

    // Cluster nachziehen: nach Verschmelzung für den Überlebenden, sonst
    // für den bewegten Punkt
    if let Some(kept) = merge_kept {
        ed.recluster(kept);
        structure::pointless_line_scan(ed);
    } else if ed.drag.moved_point {
        if let Some(active_id) = ed.selection.point_id() {
            ed.recluster(active_id);
        }
    }

    if !is_right
        && (!changed_lines.is_empty()
            || !moved_labels.is_empty()
            || ed.drag.moved_tag
            || ed.editing.tag_edited)
    {
        ed.fire_rerender(RenderScope::partial(changed_lines, moved_labels));
    }

    // Treffer-Prüfungen auf frischem Stand
    if let Some(doc) = ed.doc.as_ref() {
        ed.hit.refresh(doc);
    }

    // Läuft eine Verbinder-Erstellung, zählen nur Punkt-Klicks
    if ed.link_builder.is_some() {
        let hit_pt = ed
            .doc
            .as_ref()
            .and_then(|doc| ed.hit.on_point(doc, &ed.options, pos));
        if let Some(pt_id) = hit_pt {
            let done = ed
                .link_builder
                .as_mut()
                .and_then(|builder| builder.click(pt_id));
            if let Some(link) = done {
                if let Some(doc) = ed.doc.as_mut() {
                    doc.point_links.push(link);
                }
                ed.link_builder = None;
                ed.fire_rerender(RenderScope::everything());
            }
        }
        return;
    }

    // Auswahl zurücksetzen; der Klick bestimmt sie neu
    let prev_point = ed.selection.point_id();
    ed.selection = Selection::None;
    ed.drag.moved_point = false;
    ed.drag.moved_tag = false;

    // 1. Stationsname
    let label_hit = ed
        .doc
        .as_ref()
        .and_then(|doc| ed.hit.on_label(doc, &ed.options, pos));
    if let Some(pt_id) = label_hit {
        ed.selection = Selection::Point {
            id: pt_id,
            part: PointPart::Label,
        };
        ed.editing.end_all();
        ed.editing.label_editing = true;
        ed.republish_point_ops(pt_id);
        return;
    }

    // 2. Text-Tag
    let tag_hit = ed
        .doc
        .as_ref()
        .and_then(|doc| ed.hit.on_text_tag(doc, &ed.options, pos));
    if let Some(tag_id) = tag_hit {
        ed.selection = Selection::TextTag { id: tag_id };
        ed.editing.end_all();
        ed.editing.tag_editing = true;
        ed.clear_ops();
        return;
    }

    // 3. Punktkörper
    let point_hit = ed
        .doc
        .as_ref()
        .and_then(|doc| ed.hit.on_point(doc, &ed.options, pos));
    if let Some(pt_id) = point_hit {
        ed.selection = Selection::Point {
            id: pt_id,
            part: PointPart::Body,
        };
        ed.editing.tag_editing = false;
        ed.editing.tag_edited = false;
        ed.editing.label_edited = false;
        if is_right_only {
            // Rechtsklick: Ausrichtung umschalten, ohne Menü
            if let Some(pt) = ed.doc.as_mut().and_then(|d| d.point_mut(pt_id)) {
                pt.dir = pt.dir.toggled();
            }
            ed.drag.moved_point = true;
        } else if is_right_ctrl {
            // Rechtsklick+Modifier: Punktart umschalten, Cluster nachziehen
            if let Some(pt) = ed.doc.as_mut().and_then(|d| d.point_mut(pt_id)) {
                pt.kind = pt.kind.toggled();
            }
            ed.drag.moved_point = true;
            ed.recluster(pt_id);
        } else if prev_point == Some(pt_id) && ed.ops_visible {
            // Zweiter Klick auf denselben Punkt klappt das Menü ein
            ed.clear_ops();
            ed.editing.label_editing = false;
        } else {
            ed.editing.label_editing = true;
            ed.republish_point_ops(pt_id);
        }
        return;
    }

    // 4. Linie
    let line_hit = ed
        .doc
        .as_ref()
        .and_then(|doc| ed.hit.on_lines(doc, &ed.options, pos, &[]).into_iter().next());
    if let Some(hit) = line_hit {
        ed.selection = Selection::Line {
            id: hit.line_id,
            cursor_pos: hit.aligned_pos,
            insert_at: hit.insert_at,
            dir: hit.dir,
        };
        ed.editing.end_all();
        ed.republish_line_ops(hit.line_id);
        return;
    }

    // 5. Leere Fläche
    ed.editing.end_all();
    ed.clear_ops();
}

/// Drag-Beginn: greift Name, Körper oder Tag der aktiven Auswahl, oder
/// startet eine Linien-Verlängerung am Griff.
pub(crate) fn drag_start(ed: &mut Editor, pos: Vec2) {
    if ed.doc.is_none() {
        return;
    }
    if let Some(doc) = ed.doc.as_ref() {
        ed.hit.refresh(doc);
    }

    if let Selection::Point { id, .. } = ed.selection {
        let label_hit = ed
            .doc
            .as_ref()
            .and_then(|doc| ed.hit.on_label(doc, &ed.options, pos));
        if label_hit == Some(id) {
            // Der Griff sitzt selten genau auf dem Namensanker
            let anchor = ed
                .doc
                .as_ref()
                .and_then(|d| d.point(id))
                .and_then(|p| p.label_anchor())
                .unwrap_or(pos);
            ed.selection = Selection::Point {
                id,
                part: PointPart::Label,
            };
            ed.drag.moving_point = true;
            ed.drag.label_grab = pos - anchor;
        } else {
            let body_hit = ed
                .doc
                .as_ref()
                .and_then(|doc| ed.hit.on_point(doc, &ed.options, pos));
            if body_hit == Some(id) {
                ed.selection = Selection::Point {
                    id,
                    part: PointPart::Body,
                };
                ed.drag.moving_point = true;
            }
        }
    }

    if let Selection::TextTag { id } = ed.selection {
        let tag_hit = ed
            .doc
            .as_ref()
            .and_then(|doc| ed.hit.on_text_tag(doc, &ed.options, pos));
        if tag_hit == Some(id) {
            let tag_pos = ed
                .doc
                .as_ref()
                .and_then(|d| d.text_tags.iter().find(|t| t.id == id))
                .map(|t| t.pos)
                .unwrap_or(pos);
            ed.drag.moving_tag = true;
            ed.drag.tag_grab = pos - tag_pos;
        }
    }

    // Linien-Verlängerung: neuer Punkt entsteht sofort beim Drag-Beginn
    let extend = ed.selection.point_id().and_then(|selected| {
        ed.doc
            .as_ref()
            .and_then(|doc| ed.hit.on_extend_handle(doc, &ed.options, selected, pos))
            .map(|hit| (selected, hit))
    });
    if let Some((origin, hit)) = extend {
        ed.drag.extend_origin = Some(origin);
        let new_id = ed.doc.as_mut().and_then(|doc| {
            doc.splice_new_point_into_line(
                hit.line_id,
                hit.insert_at,
                hit.handle_pos,
                hit.dir,
                PointKind::Station,
            )
        });
        if let Some(new_id) = new_id {
            ed.selection = Selection::Point {
                id: new_id,
                part: PointPart::Body,
            };
            ed.clear_ops();
            ed.editing.end_all();
            ed.editing.label_editing = true;
            ed.drag.moving_point = true;
            ed.drag.moved_point = true;
            // Der frische Punkt rastet sofort ein
            snap_and_round_point(ed, new_id);
        }
    } else {
        ed.drag.extend_origin = None;
    }
}

/// Drag-Fortschritt: Position bzw. Namens-/Tag-Offset nachführen,
/// inklusive Snap, Rundung und Namens-Übergabe im Cluster.
pub(crate) fn drag_move(ed: &mut Editor, pos: Vec2, over_discard: bool) {
    if ed.drag.moving_point {
        ed.clear_ops();
        ed.drag.over_discard = over_discard;
        let Selection::Point { id, part } = ed.selection else {
            return;
        };
        match part {
            PointPart::Body => {
                let precision = ed.options.coord_precision;
                let snapped = {
                    let Editor {
                        doc, options, snap, ..
                    } = ed;
                    let Some(doc) = doc.as_mut() else { return };
                    let Some(pt) = doc.point_mut(id) else { return };
                    pt.pos = pos;
                    snap.snap_point(doc, options, id, pos)
                };
                if let Some(doc) = ed.doc.as_mut() {
                    if let Some(pt) = doc.point_mut(id) {
                        if let Some(snapped) = snapped {
                            pt.pos = snapped;
                        }
                        pt.pos = round_coord(pt.pos, precision);
                    }
                }
                ed.drag.moved_point = true;
            }
            PointPart::Label => {
                // Vor dem Anwenden prüfen, ob der Name zu einem näheren
                // Cluster-Mitglied wechseln muss
                let mut target = id;
                let transferred = {
                    let Editor {
                        doc,
                        options,
                        cluster,
                        ..
                    } = ed;
                    doc.as_mut()
                        .and_then(|doc| cluster.try_transfer_label_within_cluster(doc, options, id))
                };
                if let Some(new_owner) = transferred {
                    target = new_owner;
                    ed.selection = Selection::Point {
                        id: new_owner,
                        part: PointPart::Label,
                    };
                }

                let grab = ed.drag.label_grab;
                let precision = ed.options.coord_precision;
                let snapped = {
                    let Editor {
                        doc, options, snap, ..
                    } = ed;
                    let Some(doc) = doc.as_mut() else { return };
                    let Some(pt) = doc.point_mut(target) else { return };
                    let Some(label) = pt.label.as_mut() else { return };
                    let anchor = pos - grab;
                    label.offset = anchor - pt.pos;
                    let offset = label.offset;
                    snap.snap_label(doc, options, target, offset)
                };
                if let Some(doc) = ed.doc.as_mut() {
                    if let Some(label) = doc.point_mut(target).and_then(|p| p.label.as_mut()) {
                        if let Some((offset, _grade)) = snapped {
                            label.offset = offset;
                        }
                        label.offset = round_coord(label.offset, precision);
                    }
                }
                ed.drag.moved_point = true;
            }
        }
    } else if ed.drag.moving_tag {
        ed.clear_ops();
        ed.drag.over_discard = over_discard;
        let Selection::TextTag { id } = ed.selection else {
            return;
        };
        let grab = ed.drag.tag_grab;
        let precision = ed.options.coord_precision;
        let mut target_pos = pos - grab;
        if let Some(snapped) = ed.snap.snap_grid(&ed.options, target_pos) {
            target_pos = snapped;
        }
        target_pos = round_coord(target_pos, precision);
        if let Some(tag) = ed
            .doc
            .as_mut()
            .and_then(|d| d.text_tags.iter_mut().find(|t| t.id == id))
        {
            tag.pos = target_pos;
            ed.drag.moved_tag = true;
        }
    }
}

/// Drag-Ende: Geste abschließen, Verlängerungs-Verschmelzung versuchen,
/// Verwerfen-Zone auswerten.
pub(crate) fn drag_end(ed: &mut Editor) {
    ed.drag.end_gesture();

    if let Some(origin) = ed.drag.extend_origin.take() {
        // Verschmelzung geht vom ursprünglichen Endpunkt aus: Verlängern
        // dient dem Wiederanschluss an eine bestehende Station
        ed.recluster(origin);
        if let Some(res) = try_merge_active(ed, origin) {
            ed.recluster(res.kept);
            ed.fire_rerender(RenderScope::partial(Vec::new(), Vec::new()));
        }
    }

    if ed.drag.over_discard {
        match ed.selection {
            Selection::TextTag { id } => {
                if let Some(doc) = ed.doc.as_mut() {
                    doc.remove_text_tag(id);
                }
                ed.selection = Selection::None;
            }
            Selection::Point {
                id,
                part: PointPart::Label,
            } => {
                if let Some(pt) = ed.doc.as_mut().and_then(|d| d.point_mut(id)) {
                    pt.label = None;
                }
                ed.selection = Selection::None;
            }
            Selection::Point {
                part: PointPart::Body,
                ..
            } => {
                structure::del_active_point(ed, false, false);
            }
            _ => {}
        }
        ed.fire_rerender(RenderScope::everything());
    }
    ed.drag.over_discard = false;
}

/// Snap + Rundung für einen frisch erzeugten Punkt.
fn snap_and_round_point(ed: &mut Editor, pt_id: u64) {
    let precision = ed.options.coord_precision;
    let snapped = {
        let Editor {
            doc, options, snap, ..
        } = ed;
        let Some(doc) = doc.as_ref() else { return };
        let Some(pt) = doc.point(pt_id) else { return };
        snap.snap_point(doc, options, pt_id, pt.pos)
    };
    if let Some(pt) = ed.doc.as_mut().and_then(|d| d.point_mut(pt_id)) {
        if let Some(snapped) = snapped {
            pt.pos = snapped;
        }
        pt.pos = round_coord(pt.pos, precision);
    }
}
