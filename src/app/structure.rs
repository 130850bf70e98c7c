//! Strukturelle Operationen: Linien teilen/verbinden/löschen, neue Geometrie
//! platzieren, entartete Linien aufräumen.

use glam::Vec2;

use super::editor::Editor;
use super::state::{PointPart, Selection};
use crate::core::{
    ColorPreset, LineKind, MapLine, MapPoint, PointDir, PointKind, TextTag,
};
use crate::render::RenderScope;

/// Entfernt den aktiven Punkt (oder nur dessen Namen, wenn gewünscht und
/// der Name gegriffen war) und räumt danach entartete Linien auf.
pub(crate) fn del_active_point(ed: &mut Editor, rerender_after: bool, only_label_if_label_selected: bool) {
    let Selection::Point { id, part } = ed.selection else {
        return;
    };
    ed.clear_ops();

    if only_label_if_label_selected && part == PointPart::Label {
        if let Some(pt) = ed.doc.as_mut().and_then(|d| d.point_mut(id)) {
            pt.label = None;
        }
    } else {
        if let Some(doc) = ed.doc.as_mut() {
            doc.remove_point(id);
            doc.remove_point_links_by_point(id);
        }
        ed.cluster.remove_because_of(id);
    }

    ed.selection = Selection::None;
    pointless_line_scan(ed);
    if rerender_after {
        ed.fire_rerender(RenderScope::everything());
    }
}

/// Löscht eine Linie mit allen Kaskaden.
///
/// `del_with_sta`: Punkte, die zum Löschzeitpunkt höchstens dieser Linie
/// gehören, werden mitsamt ihrer Verbinder entfernt. Text-Tags der Linie
/// verschwinden, Kindlinien verlieren ihre Eltern-Referenz.
pub(crate) fn delete_line(ed: &mut Editor, line_id: u64, suppress_render: bool, del_with_sta: bool) {
    if ed.doc.as_ref().and_then(|d| d.line(line_id)).is_none() {
        return;
    }

    if del_with_sta {
        let pts: Vec<u64> = ed
            .doc
            .as_ref()
            .and_then(|d| d.line(line_id))
            .map(|l| l.pts.clone())
            .unwrap_or_default();
        for pt in pts {
            let exclusive = ed
                .doc
                .as_ref()
                .map(|d| d.line_membership_count(pt) <= 1)
                .unwrap_or(false);
            if exclusive {
                if let Some(doc) = ed.doc.as_mut() {
                    doc.remove_point(pt);
                }
                ed.cluster.remove_because_of(pt);
            }
            if let Some(doc) = ed.doc.as_mut() {
                doc.remove_point_links_by_point(pt);
            }
        }
    }

    if let Some(doc) = ed.doc.as_mut() {
        doc.remove_line_raw(line_id);
        for tag_id in doc.text_tag_ids_for_line(line_id) {
            doc.remove_text_tag(tag_id);
        }
        for child_id in doc.children_of(line_id) {
            if let Some(child) = doc.line_mut(child_id) {
                child.parent = None;
            }
        }
    }
    log::debug!("Linie {} gelöscht (mit Punkten: {})", line_id, del_with_sta);

    if !suppress_render {
        ed.fire_rerender(RenderScope::everything());
    }
}

/// Entfernt alle Linien mit weniger als 2 Punkten.
///
/// Das Aufräumen kaskadiert über `delete_line`: exklusive Punkte, deren
/// Verbinder und die Eltern-Referenzen von Kindlinien.
pub(crate) fn pointless_line_scan(ed: &mut Editor) {
    let need_remove: Vec<u64> = ed
        .doc
        .as_ref()
        .map(|d| {
            d.lines
                .iter()
                .filter(|l| l.pts.len() < 2)
                .map(|l| l.id)
                .collect()
        })
        .unwrap_or_default();

    for line_id in &need_remove {
        delete_line(ed, *line_id, true, true);
    }
    if !need_remove.is_empty() {
        log::debug!("{} entartete Linie(n) entfernt", need_remove.len());
        ed.fire_rerender(RenderScope::partial(Vec::new(), Vec::new()));
    }
}

/// Fügt einen neuen Punkt an einer Linienstelle ein (Grid-Snap inklusive)
/// und macht ihn zur aktiven Auswahl.
pub(crate) fn insert_point_on_line(
    ed: &mut Editor,
    line_id: u64,
    insert_at: usize,
    pos: Vec2,
    dir: PointDir,
    kind: PointKind,
) {
    let pos = ed.snap.snap_grid(&ed.options, pos).unwrap_or(pos);
    let new_id = ed
        .doc
        .as_mut()
        .and_then(|doc| doc.splice_new_point_into_line(line_id, insert_at, pos, dir, kind));
    let Some(new_id) = new_id else {
        return;
    };
    ed.recluster(new_id);
    ed.fire_rerender(RenderScope::partial(vec![line_id], Vec::new()));
    ed.selection = Selection::Point {
        id: new_id,
        part: PointPart::Body,
    };
    ed.republish_point_ops(new_id);
}

/// Teilt eine Linie an einem Punkt: Präfix bleibt, Suffix wird neue Linie
/// mit kopierter Darstellung und Teilungs-Markierung im Namen.
///
/// Der Teilungspunkt gehört beiden Hälften: so bleibt er gemeinsamer
/// Endpunkt, und `merge_lines_at` an diesem Punkt stellt die ursprüngliche
/// Punktfolge wieder her.
pub(crate) fn split_line_at(ed: &mut Editor, line_id: u64, pt_id: u64) {
    let Some(doc) = ed.doc.as_mut() else {
        return;
    };
    let Some(split_idx) = doc
        .line(line_id)
        .and_then(|l| l.pts.iter().position(|&p| p == pt_id))
    else {
        return;
    };
    let new_id_reserve = doc.alloc_id();
    let Some(line) = doc.line_mut(line_id) else {
        return;
    };

    let back: Vec<u64> = line.pts[split_idx..].to_vec();
    line.pts.truncate(split_idx + 1);
    let mut copy = line.clone();
    copy.id = new_id_reserve;
    copy.pts = back;
    copy.name = format!("{} (geteilt)", copy.name);

    let insert_after = doc.lines.iter().position(|l| l.id == line_id).unwrap_or(0);
    doc.lines.insert(insert_after + 1, copy);

    ed.clear_ops();
    pointless_line_scan(ed);
    ed.fire_rerender(RenderScope::everything());
}

/// Verbindet zwei Linien an ihrem gemeinsamen Endpunkt.
///
/// Nur möglich, wenn der Punkt bei beiden tatsächlich Kopf oder Schwanz ist
/// (4 Paarungen); die zweite Linie wird passend umgedreht, ihre Kinder
/// wandern zur ersten, dann verschwindet sie ohne eigenes Re-Rendern.
pub(crate) fn merge_lines_at(ed: &mut Editor, line1_id: u64, line2_id: u64, pt_id: u64) {
    if line1_id == line2_id {
        return;
    }
    {
        let Some(doc) = ed.doc.as_mut() else {
            return;
        };
        let (Some(l1), Some(l2)) = (doc.line(line1_id), doc.line(line2_id)) else {
            return;
        };
        let (first1, last1) = (l1.pts.first().copied(), l1.pts.last().copied());
        let (first2, last2) = (l2.pts.first().copied(), l2.pts.last().copied());
        let mut pts2 = l2.pts.clone();
        let pts1 = l1.pts.clone();

        // Nicht nur Ende-an-Ende: der Anschluss muss genau dieser Punkt sein
        // (kombinierte Ringlinien haben sonst zwei Kandidaten)
        let merged: Vec<u64> = if first1 == first2 && Some(pt_id) == first1 {
            pts2.reverse();
            pts2.into_iter().chain(pts1.into_iter().skip(1)).collect()
        } else if last1 == first2 && Some(pt_id) == last1 {
            pts1.into_iter().chain(pts2.into_iter().skip(1)).collect()
        } else if last1 == last2 && Some(pt_id) == last1 {
            pts2.reverse();
            pts1.into_iter().chain(pts2.into_iter().skip(1)).collect()
        } else if first1 == last2 && Some(pt_id) == first1 {
            pts2.into_iter().chain(pts1.into_iter().skip(1)).collect()
        } else {
            return;
        };

        if let Some(l1) = doc.line_mut(line1_id) {
            l1.pts = merged;
        }
        for child_id in doc.children_of(line2_id) {
            if let Some(child) = doc.line_mut(child_id) {
                child.parent = Some(line1_id);
            }
        }
        doc.ensure_lines_ordered();
    }

    delete_line(ed, line2_id, true, false);
    ed.fire_rerender(RenderScope::everything());
}

/// Erstellt eine neue Linie mit zwei Stationen nahe der Ansichtsmitte.
pub(crate) fn create_line(ed: &mut Editor, kind: LineKind, group: Option<u64>, parent: Option<u64>) {
    let Some(center) = placement_center(ed) else {
        return;
    };
    let spread = ed.options.new_line_point_spread;
    let mut pt1_pos = center - Vec2::new(spread, 0.0);
    let mut pt2_pos = center + Vec2::new(spread, 0.0);
    ensure_space_for_new_point(ed, &mut pt1_pos);
    ensure_space_for_new_point(ed, &mut pt2_pos);

    let Some(doc) = ed.doc.as_mut() else {
        return;
    };
    let pt1_id = doc.alloc_id();
    let pt2_id = doc.alloc_id();
    doc.add_point(MapPoint::new(
        pt1_id,
        pt1_pos,
        PointDir::Vertical,
        PointKind::Station,
    ));
    doc.add_point(MapPoint::new(
        pt2_id,
        pt2_pos,
        PointDir::Vertical,
        PointKind::Station,
    ));

    let line_id = doc.alloc_id();
    let mut line = MapLine::new(line_id, vec![pt1_id, pt2_id], kind);
    line.display.group = group;
    match kind {
        LineKind::Common => {
            line.display.color = ed.options.new_common_line_color;
            line.parent = parent;
        }
        LineKind::Terrain => {
            line.display.color = ed.options.new_terrain_line_color;
            line.display.color_preset = ColorPreset::Water;
        }
    }
    doc.lines.push(line);
    doc.ensure_lines_ordered();
    log::info!("Neue {:?}-Linie {} erstellt", kind, line_id);

    ed.fire_rerender(RenderScope::partial(vec![line_id], vec![pt1_id, pt2_id]));
}

/// Erstellt einen einzelnen Knoten nahe der Ansichtsmitte.
pub(crate) fn create_plain_point(ed: &mut Editor) {
    let Some(center) = placement_center(ed) else {
        return;
    };
    let Some(doc) = ed.doc.as_mut() else {
        return;
    };
    let id = doc.alloc_id();
    doc.add_point(MapPoint::new(id, center, PointDir::Vertical, PointKind::Plain));
    ed.selection = Selection::Point {
        id,
        part: PointPart::Body,
    };
    ed.drag.moved_point = true;
}

/// Erstellt einen Text-Tag nahe der Ansichtsmitte, optional linien-gebunden.
pub(crate) fn create_text_tag(ed: &mut Editor, for_line: Option<u64>) {
    let Some(center) = placement_center(ed) else {
        return;
    };
    let Some(doc) = ed.doc.as_mut() else {
        return;
    };
    let id = doc.alloc_id();
    doc.text_tags.push(TextTag::new(id, center, for_line));
    ed.drag.moved_tag = true;
    ed.selection = Selection::TextTag { id };
}

/// Dupliziert den aktiven Text-Tag mit vertikalem Versatz.
pub(crate) fn duplicate_text_tag(ed: &mut Editor) {
    let Selection::TextTag { id } = ed.selection else {
        return;
    };
    let offset = ed.options.tag_duplicate_offset;
    let Some(doc) = ed.doc.as_mut() else {
        return;
    };
    let Some(original) = doc.text_tags.iter().find(|t| t.id == id).cloned() else {
        return;
    };
    let mut copy = original;
    copy.id = doc.alloc_id();
    copy.pos.y += offset;
    let new_id = copy.id;
    doc.text_tags.push(copy);
    ed.drag.moved_tag = true;
    ed.selection = Selection::TextTag { id: new_id };
}

/// Löscht den aktiven Text-Tag.
pub(crate) fn delete_active_text_tag(ed: &mut Editor, rerender_after: bool) {
    let Selection::TextTag { id } = ed.selection else {
        return;
    };
    if let Some(doc) = ed.doc.as_mut() {
        doc.remove_text_tag(id);
    }
    ed.selection = Selection::None;
    if rerender_after {
        ed.fire_rerender(RenderScope::everything());
    }
}

/// Ansichtsmitte für neue Geometrie, in den Canvas geklemmt.
fn placement_center(ed: &Editor) -> Option<Vec2> {
    let doc = ed.doc.as_ref()?;
    let mut center = ed.view_center.unwrap_or(doc.canvas_size * 0.5);
    ensure_coord_in_canvas(doc.canvas_size, ed.options.canvas_margin, &mut center);
    Some(center)
}

/// Klemmt eine Koordinate vom Canvas-Rand weg.
fn ensure_coord_in_canvas(canvas_size: Vec2, margin: f32, coord: &mut Vec2) {
    if coord.y >= canvas_size.y - margin {
        coord.y = canvas_size.y - margin;
    }
    if coord.x >= canvas_size.x - margin {
        coord.x = canvas_size.x - margin;
    }
}

/// Weicht mit alternierenden vertikalen Offsets aus, bis die Position frei
/// ist; nach einer begrenzten Zahl von Versuchen wird Überlappung
/// akzeptiert statt endlos zu suchen.
pub(crate) fn ensure_space_for_new_point(ed: &Editor, coord: &mut Vec2) {
    let Some(doc) = ed.doc.as_ref() else {
        return;
    };
    let original = *coord;
    let mut safety = ed.options.placement_max_attempts as i32;
    let mut offset = ed.options.placement_probe_offset;
    let mut offset_sgn = 1.0f32;

    loop {
        let mut ok = ed.hit.on_point(doc, &ed.options, *coord).is_none();
        if ok {
            ok = ed.hit.on_label(doc, &ed.options, *coord).is_none();
        }
        if ok {
            ok = ed.hit.on_lines(doc, &ed.options, *coord, &[]).is_empty();
        }
        if ok {
            break;
        }
        coord.y = original.y + offset * offset_sgn;
        offset_sgn *= -1.0;
        if offset_sgn > 0.0 {
            offset += ed.options.placement_probe_step;
        }
        safety -= 1;
        if safety <= 0 {
            log::warn!("Kein freier Platz gefunden, akzeptiere Überlappung");
            break;
        }
    }
}
