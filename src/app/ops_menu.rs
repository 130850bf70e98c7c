//! Befüllung des Operations-Menüs aus der aktuellen Auswahl.
//!
//! Buttons tragen Commands statt Closures; der Host zeigt die Spalten an und
//! reicht die Aktion des gedrückten Buttons an den Editor zurück.

use super::command::{EditorCommand, OpsButton};
use super::editor::Editor;
use super::state::Selection;
use crate::core::{LineKind, PointKind};

/// Menü-Spalten für einen ausgewählten Punkt:
/// Grundoperationen | Verlassen/Trennen | Beitreten.
pub(crate) fn point_ops(ed: &Editor, pt_id: u64) -> Vec<Vec<OpsButton>> {
    let Some(doc) = ed.doc.as_ref() else {
        return Vec::new();
    };
    if doc.point(pt_id).is_none() {
        return Vec::new();
    }
    let related = doc.line_ids_by_point(pt_id);
    let only_terrain = !related.is_empty()
        && related
            .iter()
            .all(|&lid| doc.line(lid).map(|l| l.kind) == Some(LineKind::Terrain));

    let mut first_col = vec![OpsButton::plain("Drehen", EditorCommand::RotatePoint { id: pt_id })];
    if only_terrain {
        // Gelände-Formen kennen keine Stationen: stattdessen Panel anbieten
        first_col.push(OpsButton {
            text: "Einstellungen".into(),
            text_sub: Some("Panel öffnen".into()),
            color: None,
            action: EditorCommand::OpenPointSettings { id: pt_id },
        });
    } else {
        first_col.push(OpsButton {
            text: "Typ wechseln".into(),
            text_sub: Some("Knoten/Station".into()),
            color: None,
            action: EditorCommand::TogglePointKind { id: pt_id },
        });
    }
    first_col.push(OpsButton {
        text: "Isolieren".into(),
        text_sub: Some("Clustern unterbinden".into()),
        color: None,
        action: EditorCommand::ToggleIsolated { id: pt_id },
    });
    first_col.push(OpsButton::plain("Entfernen", EditorCommand::RemoveActivePoint));

    let mut leave_col: Vec<OpsButton> = related
        .iter()
        .map(|&lid| OpsButton {
            text: "Verlassen".into(),
            text_sub: doc.line(lid).map(|l| l.name.clone()),
            color: doc.effective_display(lid).map(|d| d.color),
            action: EditorCommand::LeaveLine { pt: pt_id, line: lid },
        })
        .collect();
    if doc.has_point_links(pt_id) {
        leave_col.push(OpsButton::plain("Trennen", EditorCommand::UnlinkPoint { pt: pt_id }));
    }

    let pos = doc.point(pt_id).map(|p| p.pos).unwrap_or_default();
    let join_col: Vec<OpsButton> = ed
        .hit
        .on_lines(doc, &ed.options, pos, &related)
        .into_iter()
        .map(|hit| OpsButton {
            text: "Beitreten".into(),
            text_sub: doc.line(hit.line_id).map(|l| l.name.clone()),
            color: doc.effective_display(hit.line_id).map(|d| d.color),
            action: EditorCommand::JoinLine {
                pt: pt_id,
                line: hit.line_id,
                insert_at: hit.insert_at,
            },
        })
        .collect();

    vec![first_col, leave_col, join_col]
}

/// Menü-Spalten für eine ausgewählte Linie:
/// Einfügen | Einstellungen/Tag.
pub(crate) fn line_ops(ed: &Editor, line_id: u64) -> Vec<Vec<OpsButton>> {
    let Some(doc) = ed.doc.as_ref() else {
        return Vec::new();
    };
    let Some(line) = doc.line(line_id) else {
        return Vec::new();
    };
    let Selection::Line {
        cursor_pos,
        insert_at,
        dir,
        ..
    } = ed.selection
    else {
        return Vec::new();
    };

    let mut insert_col = Vec::new();
    if line.kind == LineKind::Common {
        insert_col.push(OpsButton {
            text: "Station".into(),
            text_sub: Some("Hier einfügen".into()),
            color: None,
            action: EditorCommand::InsertPointOnLine {
                line: line_id,
                insert_at,
                pos: cursor_pos,
                dir,
                kind: PointKind::Station,
            },
        });
    }
    insert_col.push(OpsButton {
        text: "Knoten".into(),
        text_sub: Some("Hier einfügen".into()),
        color: None,
        action: EditorCommand::InsertPointOnLine {
            line: line_id,
            insert_at,
            pos: cursor_pos,
            dir,
            kind: PointKind::Plain,
        },
    });

    let second_col = vec![
        OpsButton {
            text: "Einstellungen".into(),
            text_sub: Some("Seitenleiste öffnen".into()),
            color: None,
            action: EditorCommand::OpenLineSettings { id: line_id },
        },
        OpsButton {
            text: "Tag".into(),
            text_sub: Some("Erstellen".into()),
            color: None,
            action: EditorCommand::CreateTextTag {
                for_line: Some(line_id),
            },
        },
    ];

    vec![insert_col, second_col]
}
