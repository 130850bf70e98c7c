//! Integrationstests für die Editor-Zustandsmaschine:
//! - Klick-Präzedenz und Punkt-Verschmelzung
//! - Drag-Lebenszyklus inkl. Verwerfen-Zone und Linien-Verlängerung
//! - Strukturelle Operationen (Teilen, Verbinden, Löschen mit Kaskaden)

use glam::Vec2;
use netzplan_editor::core::{MapLine, MapPoint, TextTag};
use netzplan_editor::{
    ClickKind, Document, Editor, EditorCommand, EditorOptions, LineKind, PointDir, PointKind,
    PointLinkKind, RenderScope, Selection, StationLabel,
};
use std::cell::RefCell;
use std::rc::Rc;

fn station(id: u64, x: f32, y: f32) -> MapPoint {
    MapPoint::new(id, Vec2::new(x, y), PointDir::Vertical, PointKind::Station)
}

/// Editor mit Dokument: Linie 10 über Punkt 1 (0,0) und Punkt 2 (100,0).
fn editor_with_line() -> Editor {
    let mut doc = Document::new(Vec2::new(2000.0, 2000.0));
    doc.add_point(station(1, 0.0, 0.0));
    doc.add_point(station(2, 100.0, 0.0));
    doc.lines.push(MapLine::new(10, vec![1, 2], LineKind::Common));
    doc.reseed_ids();

    let mut editor = Editor::new(EditorOptions::default());
    editor.set_document(doc);
    editor
}

/// Zeichnet alle Render-Anforderungen des Editors auf.
fn record_scopes(editor: &mut Editor) -> Rc<RefCell<Vec<RenderScope>>> {
    let scopes = Rc::new(RefCell::new(Vec::new()));
    let sink = scopes.clone();
    editor.set_rerender_hook(Box::new(move |scope| {
        sink.borrow_mut().push(scope.clone());
    }));
    scopes
}

// ─── Klick-Präzedenz ─────────────────────────────────────────────────────────

#[test]
fn klick_auf_punkt_selektiert_ihn() {
    let mut editor = editor_with_line();
    editor.handle_click(Vec2::new(1.0, 1.0), ClickKind::Plain);

    assert_eq!(editor.selection.point_id(), Some(1));
    assert!(editor.something_selected());
}

#[test]
fn klick_auf_leere_flaeche_hebt_die_auswahl_auf() {
    let mut editor = editor_with_line();
    editor.handle_click(Vec2::new(1.0, 1.0), ClickKind::Plain);
    editor.handle_click(Vec2::new(500.0, 500.0), ClickKind::Plain);

    assert_eq!(editor.selection, Selection::None);
    assert!(!editor.something_selected());
}

#[test]
fn stationsname_geht_vor_punktkoerper() {
    let mut editor = editor_with_line();
    // Name direkt über dem Punkt: der Klick muss den Namen treffen
    editor
        .doc
        .as_mut()
        .unwrap()
        .point_mut(1)
        .unwrap()
        .label = Some(StationLabel {
        text: "Zentrum".into(),
        sub_text: None,
        offset: Vec2::new(0.0, 2.0),
        size: None,
    });

    editor.handle_click(Vec2::new(1.0, 1.0), ClickKind::Plain);
    assert_eq!(
        editor.selection,
        Selection::Point {
            id: 1,
            part: netzplan_editor::PointPart::Label
        }
    );
}

#[test]
fn text_tag_geht_vor_linie() {
    let mut editor = editor_with_line();
    let mut tag = TextTag::new(30, Vec2::new(50.0, 0.0), None);
    tag.text = Some("Ringbahn".into());
    editor.doc.as_mut().unwrap().text_tags.push(tag);

    editor.handle_click(Vec2::new(50.0, 1.0), ClickKind::Plain);
    assert_eq!(editor.selection.text_tag_id(), Some(30));
}

#[test]
fn klick_auf_liniensegment_selektiert_die_linie() {
    let mut editor = editor_with_line();
    editor.handle_click(Vec2::new(50.0, 2.0), ClickKind::Plain);

    assert_eq!(editor.selection.line_id(), Some(10));
    let Selection::Line { insert_at, cursor_pos, .. } = editor.selection else {
        panic!("Linie muss ausgewählt sein");
    };
    assert_eq!(insert_at, 1);
    assert_eq!(cursor_pos, Vec2::new(50.0, 0.0));
}

// ─── Rechtsklick-Umschalter ──────────────────────────────────────────────────

#[test]
fn rechtsklick_schaltet_die_ausrichtung_um() {
    let mut editor = editor_with_line();
    editor.handle_click(Vec2::new(0.0, 0.0), ClickKind::Right);

    let pt = editor.doc.as_ref().unwrap().point(1).unwrap();
    assert_eq!(pt.dir, PointDir::Incline);
    assert!(editor.drag.moved_point);
}

#[test]
fn rechtsklick_mit_modifier_schaltet_die_punktart_um() {
    let mut editor = editor_with_line();
    editor.handle_click(Vec2::new(0.0, 0.0), ClickKind::RightWithModifier);

    let pt = editor.doc.as_ref().unwrap().point(1).unwrap();
    assert_eq!(pt.kind, PointKind::Plain);
}

// ─── Verschmelzen ────────────────────────────────────────────────────────────

#[test]
fn klick_auf_selektierten_punkt_verschmilzt_haftende_punkte() {
    let mut editor = editor_with_line();
    // Punkt 3 haftet an Punkt 1 (Abstand 5 < Haftungsabstand 20)
    editor.doc.as_mut().unwrap().add_point(station(3, 5.0, 0.0));

    editor.handle_click(Vec2::new(0.0, 0.0), ClickKind::Plain);
    assert_eq!(editor.selection.point_id(), Some(1));

    editor.handle_click(Vec2::new(0.0, 0.0), ClickKind::Plain);

    let doc = editor.doc.as_ref().unwrap();
    // Der ruhende Kandidat überlebt, der aktive Punkt geht in ihm auf
    assert!(doc.point(1).is_none());
    assert!(doc.point(3).is_some());
    assert_eq!(doc.line(10).unwrap().pts, vec![3, 2]);
}

#[test]
fn verschmelzen_ohne_haftenden_partner_ist_noop() {
    let mut editor = editor_with_line();
    let before = editor.doc.clone();

    editor.handle_click(Vec2::new(0.0, 0.0), ClickKind::Plain);
    editor.handle_click(Vec2::new(0.0, 0.0), ClickKind::Plain);

    assert_eq!(editor.doc, before);
}

// ─── Drag-Lebenszyklus ───────────────────────────────────────────────────────

#[test]
fn drag_verschiebt_den_punktkoerper_mit_rundung() {
    let mut editor = editor_with_line();
    editor.handle_click(Vec2::new(0.0, 0.0), ClickKind::Plain);
    editor.handle_drag_start(Vec2::new(0.0, 0.0));
    assert!(editor.drag.moving_point);

    // Ziel abseits von Grid- und Achsen-Snaps
    editor.handle_drag_move(Vec2::new(47.3333, 13.7777), false);
    editor.handle_drag_end();

    let pt = editor.doc.as_ref().unwrap().point(1).unwrap();
    assert!((pt.pos.x - 47.33).abs() < 1e-3, "x gerundet: {}", pt.pos.x);
    assert!((pt.pos.y - 13.78).abs() < 1e-3, "y gerundet: {}", pt.pos.y);
    assert!(editor.drag.moved_point);
    assert!(!editor.drag.moving_point);
}

#[test]
fn naechster_klick_nach_drag_meldet_den_umfang() {
    let mut editor = editor_with_line();
    let scopes = record_scopes(&mut editor);

    editor.handle_click(Vec2::new(0.0, 0.0), ClickKind::Plain);
    editor.handle_drag_start(Vec2::new(0.0, 0.0));
    editor.handle_drag_move(Vec2::new(47.3333, 13.7777), false);
    editor.handle_drag_end();
    editor.handle_click(Vec2::new(500.0, 500.0), ClickKind::Plain);

    let scopes = scopes.borrow();
    let scope = scopes.first().expect("Render-Anforderung erwartet");
    assert_eq!(scope.changed_lines.as_deref(), Some(&[10u64][..]));
    assert_eq!(scope.moved_labels.as_deref(), Some(&[1u64][..]));
}

#[test]
fn drag_in_die_verwerfen_zone_loescht_den_punkt() {
    let mut editor = editor_with_line();
    let scopes = record_scopes(&mut editor);

    editor.handle_click(Vec2::new(0.0, 0.0), ClickKind::Plain);
    editor.handle_drag_start(Vec2::new(0.0, 0.0));
    editor.handle_drag_move(Vec2::new(300.0, 300.0), true);
    editor.handle_drag_end();

    let doc = editor.doc.as_ref().unwrap();
    assert!(doc.point(1).is_none());
    // Linie 10 ist dadurch entartet und wurde mitsamt Punkt 2 aufgeräumt
    assert!(doc.line(10).is_none());
    assert!(doc.point(2).is_none());
    assert_eq!(editor.selection, Selection::None);
    assert!(scopes.borrow().iter().any(|s| s.is_everything()));
}

#[test]
fn drag_des_namens_in_die_verwerfen_zone_loescht_nur_den_namen() {
    let mut editor = editor_with_line();
    editor
        .doc
        .as_mut()
        .unwrap()
        .point_mut(1)
        .unwrap()
        .label = Some(StationLabel {
        text: "Nordpark".into(),
        sub_text: None,
        offset: Vec2::new(0.0, -30.0),
        size: None,
    });

    editor.handle_click(Vec2::new(0.0, -30.0), ClickKind::Plain);
    editor.handle_drag_start(Vec2::new(0.0, -30.0));
    editor.handle_drag_move(Vec2::new(300.0, 300.0), true);
    editor.handle_drag_end();

    let doc = editor.doc.as_ref().unwrap();
    let pt = doc.point(1).expect("Punkt bleibt erhalten");
    assert!(pt.label.is_none());
}

// ─── Namens-Übergabe im Cluster ──────────────────────────────────────────────

#[test]
fn namens_drag_wechselt_den_besitzer_im_cluster() {
    let mut editor = editor_with_line();
    // Punkt 3 haftet an Punkt 2 (Abstand 8 < 20); Name hängt an Punkt 2
    editor.doc.as_mut().unwrap().add_point(station(3, 108.0, 0.0));
    editor
        .doc
        .as_mut()
        .unwrap()
        .point_mut(2)
        .unwrap()
        .label = Some(StationLabel {
        text: "Messe".into(),
        sub_text: None,
        offset: Vec2::new(0.0, -30.0),
        size: None,
    });

    editor.handle_click(Vec2::new(100.0, -30.0), ClickKind::Plain);
    editor.handle_drag_start(Vec2::new(100.0, -30.0));
    // Erster Zug setzt den Offset weit Richtung Punkt 3, zweiter löst die
    // Übergabe aus (die Prüfung nutzt den Offset vor dem Anwenden)
    editor.handle_drag_move(Vec2::new(130.0, -6.0), false);
    editor.handle_drag_move(Vec2::new(130.0, -6.0), false);

    let doc = editor.doc.as_ref().unwrap();
    assert!(doc.point(2).unwrap().label.is_none());
    let label = doc.point(3).unwrap().label.as_ref().expect("Name wandert");
    assert_eq!(label.text, "Messe");
    assert_eq!(editor.selection.point_id(), Some(3));
}

// ─── Linien-Verlängerung ─────────────────────────────────────────────────────

#[test]
fn verlaengerungs_drag_erzeugt_den_punkt_sofort() {
    let mut editor = editor_with_line();
    editor.handle_click(Vec2::new(100.0, 0.0), ClickKind::Plain);
    assert_eq!(editor.selection.point_id(), Some(2));

    // Griff liegt bei (140, 0) hinter dem Endpunkt
    editor.handle_drag_start(Vec2::new(140.0, 0.0));

    let doc = editor.doc.as_ref().unwrap();
    let line = doc.line(10).unwrap();
    assert_eq!(line.pts.len(), 3);
    let new_id = *line.pts.last().unwrap();
    assert_ne!(new_id, 2);
    assert_eq!(editor.selection.point_id(), Some(new_id));
    assert!(editor.drag.moving_point);
    assert_eq!(editor.drag.extend_origin, Some(2));
}

#[test]
fn verlaengerung_verschmilzt_beim_loslassen_vom_urspruenglichen_endpunkt() {
    let mut editor = editor_with_line();
    // Station 4 haftet am Endpunkt 2 (Abstand 5 < 20)
    editor.doc.as_mut().unwrap().add_point(station(4, 95.0, 0.0));

    editor.handle_click(Vec2::new(100.0, 0.0), ClickKind::Plain);
    editor.handle_drag_start(Vec2::new(140.0, 0.0));
    editor.handle_drag_move(Vec2::new(200.0, 0.0), false);
    editor.handle_drag_end();

    let doc = editor.doc.as_ref().unwrap();
    // Endpunkt 2 ist im ruhenden Kandidaten 4 aufgegangen
    assert!(doc.point(2).is_none());
    assert!(doc.line(10).unwrap().pts.contains(&4));
    assert_eq!(editor.drag.extend_origin, None);
}

// ─── Strukturelle Operationen ────────────────────────────────────────────────

#[test]
fn einfuegen_und_loeschen_mit_stationen_raeumt_alles_ab() {
    let mut editor = editor_with_line();
    editor.doc.as_mut().unwrap().point_links.push(
        netzplan_editor::PointLink::new(vec![1, 2], PointLinkKind::Fat),
    );

    editor
        .handle_command(EditorCommand::InsertPointOnLine {
            line: 10,
            insert_at: 1,
            pos: Vec2::new(50.0, 0.0),
            dir: PointDir::Vertical,
            kind: PointKind::Station,
        })
        .unwrap();
    assert_eq!(editor.doc.as_ref().unwrap().line(10).unwrap().pts.len(), 3);

    editor
        .handle_command(EditorCommand::DeleteLine {
            id: 10,
            del_with_sta: true,
        })
        .unwrap();

    let doc = editor.doc.as_ref().unwrap();
    // Alle drei Punkte gehörten nur dieser Linie: restlos entfernt
    assert!(doc.points.is_empty());
    assert!(doc.point_links.is_empty());
    assert!(doc.lines.is_empty());
}

#[test]
fn linien_teilen_und_wieder_verbinden_ist_ein_kreislauf() {
    let mut doc = Document::new(Vec2::new(5000.0, 2000.0));
    for (id, x) in [(1u64, 0.0f32), (2, 100.0), (3, 200.0), (4, 300.0), (5, 400.0)] {
        doc.add_point(station(id, x, 0.0));
    }
    doc.lines.push(MapLine::new(10, vec![1, 2, 3, 4, 5], LineKind::Common));
    doc.reseed_ids();
    let mut editor = Editor::new(EditorOptions::default());
    editor.set_document(doc);

    editor
        .handle_command(EditorCommand::SplitLineAt { line: 10, pt: 3 })
        .unwrap();

    let doc = editor.doc.as_ref().unwrap();
    assert_eq!(doc.line(10).unwrap().pts, vec![1, 2, 3]);
    let new_line = doc
        .lines
        .iter()
        .find(|l| l.id != 10)
        .expect("Suffix-Linie erwartet");
    assert_eq!(new_line.pts, vec![3, 4, 5]);
    assert!(new_line.name.ends_with("(geteilt)"));
    let new_line_id = new_line.id;

    editor
        .handle_command(EditorCommand::MergeLinesAt {
            line1: 10,
            line2: new_line_id,
            pt: 3,
        })
        .unwrap();

    let doc = editor.doc.as_ref().unwrap();
    assert_eq!(doc.line(10).unwrap().pts, vec![1, 2, 3, 4, 5]);
    assert!(doc.line(new_line_id).is_none());
}

#[test]
fn linien_verbinden_dreht_die_zweite_linie_bei_kopf_an_kopf() {
    let mut doc = Document::new(Vec2::new(5000.0, 2000.0));
    for (id, x) in [(1u64, 0.0f32), (2, 100.0), (3, 200.0), (4, 300.0)] {
        doc.add_point(station(id, x, 0.0));
    }
    // Beide Linien beginnen am gemeinsamen Punkt 1
    doc.lines.push(MapLine::new(10, vec![1, 2], LineKind::Common));
    doc.lines.push(MapLine::new(11, vec![1, 3, 4], LineKind::Common));
    doc.reseed_ids();
    let mut editor = Editor::new(EditorOptions::default());
    editor.set_document(doc);

    editor
        .handle_command(EditorCommand::MergeLinesAt {
            line1: 10,
            line2: 11,
            pt: 1,
        })
        .unwrap();

    let doc = editor.doc.as_ref().unwrap();
    assert_eq!(doc.line(10).unwrap().pts, vec![4, 3, 1, 2]);
    assert!(doc.line(11).is_none());
}

#[test]
fn linien_verbinden_an_innenpunkt_ist_noop() {
    let mut doc = Document::new(Vec2::new(5000.0, 2000.0));
    for (id, x) in [(1u64, 0.0f32), (2, 100.0), (3, 200.0), (4, 300.0)] {
        doc.add_point(station(id, x, 0.0));
    }
    doc.lines.push(MapLine::new(10, vec![1, 2, 3], LineKind::Common));
    doc.lines.push(MapLine::new(11, vec![3, 4], LineKind::Common));
    doc.reseed_ids();
    let mut editor = Editor::new(EditorOptions::default());
    editor.set_document(doc);
    let before = editor.doc.clone();

    // Punkt 2 ist kein Endpunkt von Linie 10
    editor
        .handle_command(EditorCommand::MergeLinesAt {
            line1: 10,
            line2: 11,
            pt: 2,
        })
        .unwrap();

    assert_eq!(editor.doc, before);
}

#[test]
fn verbinden_uebertraegt_kindlinien_an_die_erste_linie() {
    let mut doc = Document::new(Vec2::new(5000.0, 2000.0));
    for (id, x) in [(1u64, 0.0f32), (2, 100.0), (3, 200.0)] {
        doc.add_point(station(id, x, 0.0));
    }
    doc.lines.push(MapLine::new(10, vec![1, 2], LineKind::Common));
    doc.lines.push(MapLine::new(11, vec![2, 3], LineKind::Common));
    let mut child = MapLine::new(12, vec![2, 3], LineKind::Common);
    child.parent = Some(11);
    doc.lines.push(child);
    doc.reseed_ids();
    let mut editor = Editor::new(EditorOptions::default());
    editor.set_document(doc);

    editor
        .handle_command(EditorCommand::MergeLinesAt {
            line1: 10,
            line2: 11,
            pt: 2,
        })
        .unwrap();

    let doc = editor.doc.as_ref().unwrap();
    assert_eq!(doc.line(12).unwrap().parent, Some(10));
}

#[test]
fn entartete_linie_wird_samt_tags_und_kindbezug_aufgeraeumt() {
    let mut editor = editor_with_line();
    {
        let doc = editor.doc.as_mut().unwrap();
        // Kindlinie mit eigenen Punkten, damit sie das Aufräumen überlebt
        doc.add_point(station(5, 0.0, 200.0));
        doc.add_point(station(6, 100.0, 200.0));
        let mut child = MapLine::new(11, vec![5, 6], LineKind::Common);
        child.parent = Some(10);
        doc.lines.push(child);
        let mut tag = TextTag::new(20, Vec2::new(50.0, 40.0), Some(10));
        tag.text = Some("Stammstrecke".into());
        doc.text_tags.push(tag);
        doc.reseed_ids();
    }

    // Punkt 1 verlässt Linie 10: nur noch 1 Punkt ⇒ Linie entartet
    editor
        .handle_command(EditorCommand::LeaveLine { pt: 1, line: 10 })
        .unwrap();

    let doc = editor.doc.as_ref().unwrap();
    assert!(doc.line(10).is_none());
    assert!(doc.text_tags.iter().all(|t| t.id != 20));
    assert_eq!(doc.line(11).unwrap().parent, None);
    // Punkt 2 gehörte nur der entarteten Linie und ist mit ihr verschwunden
    assert!(doc.point(2).is_none());
}

#[test]
fn neue_linie_entsteht_mit_zwei_stationen_nahe_der_ansichtsmitte() {
    let mut editor = editor_with_line();
    let scopes = record_scopes(&mut editor);
    editor.view_center = Some(Vec2::new(1000.0, 1000.0));

    editor
        .handle_command(EditorCommand::CreateLine {
            kind: LineKind::Common,
            group: None,
            parent: None,
        })
        .unwrap();

    let doc = editor.doc.as_ref().unwrap();
    assert_eq!(doc.lines.len(), 2);
    let new_line = doc.lines.iter().find(|l| l.id != 10).unwrap();
    assert_eq!(new_line.pts.len(), 2);
    let p1 = doc.point(new_line.pts[0]).unwrap();
    let p2 = doc.point(new_line.pts[1]).unwrap();
    assert_eq!(p1.kind, PointKind::Station);
    assert_eq!(p2.kind, PointKind::Station);
    assert_eq!(p2.pos.x - p1.pos.x, 100.0);

    let scopes = scopes.borrow();
    let scope = scopes.last().expect("Render-Anforderung erwartet");
    assert_eq!(scope.changed_lines.as_deref(), Some(&[new_line.id][..]));
}

#[test]
fn neue_punkte_weichen_belegten_positionen_aus() {
    let mut editor = editor_with_line();
    // Ansichtsmitte so, dass Punkt 1 der Linie genau auf einer der beiden
    // Startpositionen läge
    editor.view_center = Some(Vec2::new(50.0, 0.0));

    editor
        .handle_command(EditorCommand::CreateLine {
            kind: LineKind::Common,
            group: None,
            parent: None,
        })
        .unwrap();

    let doc = editor.doc.as_ref().unwrap();
    let new_line = doc.lines.iter().find(|l| l.id != 10).unwrap();
    let p1 = doc.point(new_line.pts[0]).unwrap();
    // (0,0) ist belegt: der Punkt ist vertikal ausgewichen
    assert_ne!(p1.pos, Vec2::new(0.0, 0.0));
}

// ─── Verbinder-Erstellung ────────────────────────────────────────────────────

#[test]
fn verbinder_entsteht_aus_zwei_punkt_klicks() {
    let mut editor = editor_with_line();
    let scopes = record_scopes(&mut editor);

    editor
        .handle_command(EditorCommand::StartPointLink {
            kind: PointLinkKind::Thin,
        })
        .unwrap();
    assert!(editor.is_creating_link());

    // Klicks abseits von Punkten werden im Link-Modus ignoriert
    editor.handle_click(Vec2::new(500.0, 500.0), ClickKind::Plain);
    assert!(editor.is_creating_link());

    editor.handle_click(Vec2::new(0.0, 0.0), ClickKind::Plain);
    editor.handle_click(Vec2::new(100.0, 0.0), ClickKind::Plain);

    let doc = editor.doc.as_ref().unwrap();
    assert_eq!(doc.point_links.len(), 1);
    assert_eq!(doc.point_links[0].pts, vec![1, 2]);
    assert!(!editor.is_creating_link());
    assert!(scopes.borrow().iter().any(|s| s.is_everything()));
}

// ─── Operations-Menü ─────────────────────────────────────────────────────────

#[test]
fn punkt_menu_enthaelt_grundoperationen_und_linienspalten() {
    let mut editor = editor_with_line();
    let columns: Rc<RefCell<Vec<Vec<netzplan_editor::OpsButton>>>> =
        Rc::new(RefCell::new(Vec::new()));
    let sink = columns.clone();
    editor.set_ops_hook(Box::new(move |cols| {
        *sink.borrow_mut() = cols.to_vec();
    }));

    editor.handle_click(Vec2::new(0.0, 0.0), ClickKind::Plain);

    let columns = columns.borrow();
    assert_eq!(columns.len(), 3);
    let texts: Vec<&str> = columns[0].iter().map(|b| b.text.as_str()).collect();
    assert_eq!(texts, vec!["Drehen", "Typ wechseln", "Isolieren", "Entfernen"]);
    // Punkt 1 liegt auf Linie 10: eine Verlassen-Option
    assert_eq!(columns[1].len(), 1);
    assert_eq!(columns[1][0].text, "Verlassen");
}

#[test]
fn menu_command_wirkt_auf_den_editor_zurueck() {
    let mut editor = editor_with_line();
    let columns: Rc<RefCell<Vec<Vec<netzplan_editor::OpsButton>>>> =
        Rc::new(RefCell::new(Vec::new()));
    let sink = columns.clone();
    editor.set_ops_hook(Box::new(move |cols| {
        *sink.borrow_mut() = cols.to_vec();
    }));

    editor.handle_click(Vec2::new(0.0, 0.0), ClickKind::Plain);
    let action = columns.borrow()[0][0].action.clone();
    editor.handle_command(action).unwrap();

    let pt = editor.doc.as_ref().unwrap().point(1).unwrap();
    assert_eq!(pt.dir, PointDir::Incline);
}

// ─── Texteingabe-Lebenszyklus ────────────────────────────────────────────────

#[test]
fn klick_auf_namen_startet_die_bearbeitung_leerklick_beendet_sie() {
    let mut editor = editor_with_line();
    editor
        .doc
        .as_mut()
        .unwrap()
        .point_mut(1)
        .unwrap()
        .label = Some(StationLabel {
        text: "Südstern".into(),
        sub_text: None,
        offset: Vec2::new(0.0, -30.0),
        size: None,
    });

    editor.handle_click(Vec2::new(0.0, -30.0), ClickKind::Plain);
    assert!(editor.editing.label_editing);

    editor.handle_click(Vec2::new(500.0, 500.0), ClickKind::Plain);
    assert!(!editor.editing.label_editing);
}

#[test]
fn gemeldete_namensaenderung_erweitert_den_naechsten_render_umfang() {
    let mut editor = editor_with_line();
    let scopes = record_scopes(&mut editor);

    editor.handle_click(Vec2::new(0.0, 0.0), ClickKind::Plain);
    // Host meldet: der Name von Punkt 1 wurde editiert
    editor.editing.label_edited = true;
    editor.handle_click(Vec2::new(500.0, 500.0), ClickKind::Plain);

    let scopes = scopes.borrow();
    let scope = scopes.first().expect("Render-Anforderung erwartet");
    assert_eq!(scope.moved_labels.as_deref(), Some(&[1u64][..]));
}

// ─── Ohne Dokument ───────────────────────────────────────────────────────────

#[test]
fn gesten_ohne_dokument_sind_stille_noops() {
    let mut editor = Editor::new(EditorOptions::default());
    editor.handle_click(Vec2::new(0.0, 0.0), ClickKind::Plain);
    editor.handle_drag_start(Vec2::new(0.0, 0.0));
    editor.handle_drag_move(Vec2::new(10.0, 10.0), false);
    editor.handle_drag_end();
    editor
        .handle_command(EditorCommand::CreatePlainPoint)
        .unwrap();

    assert!(editor.doc.is_none());
    assert_eq!(editor.selection, Selection::None);
}
