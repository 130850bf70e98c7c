//! Dokument-Persistenz als JSON.
//!
//! Die gespeicherte Form ist Sache des Hosts; der Kern liest und schreibt
//! lediglich den Dokumentgraphen und repariert beim Laden, was der
//! Editor-Invariante widerspricht (ID-Zähler, Punkt-Wiederholungen).

use std::path::Path;

use anyhow::Context;

use crate::core::Document;

/// Parst ein Dokument aus einem JSON-String und normalisiert es.
pub fn document_from_json(json: &str) -> anyhow::Result<Document> {
    let mut doc: Document =
        serde_json::from_str(json).context("Dokument-JSON konnte nicht geparst werden")?;
    normalize(&mut doc);
    Ok(doc)
}

/// Serialisiert ein Dokument als JSON-String.
pub fn document_to_json(doc: &Document) -> anyhow::Result<String> {
    serde_json::to_string_pretty(doc).context("Dokument konnte nicht serialisiert werden")
}

/// Lädt ein Dokument aus einer Datei.
pub fn load_document(path: &Path) -> anyhow::Result<Document> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Datei nicht lesbar: {}", path.display()))?;
    let doc = document_from_json(&content)?;
    log::info!(
        "Dokument geladen: {} ({} Punkte, {} Linien, {} Tags)",
        path.display(),
        doc.points.len(),
        doc.lines.len(),
        doc.text_tags.len()
    );
    Ok(doc)
}

/// Speichert ein Dokument in eine Datei.
pub fn save_document(doc: &Document, path: &Path) -> anyhow::Result<()> {
    let content = document_to_json(doc)?;
    std::fs::write(path, content)
        .with_context(|| format!("Datei nicht schreibbar: {}", path.display()))?;
    log::info!("Dokument gespeichert nach: {}", path.display());
    Ok(())
}

/// Reparaturen nach dem Laden: ID-Zähler über alle vorhandenen IDs heben,
/// direkte Punkt-Wiederholungen auf Linien entfernen.
fn normalize(doc: &mut Document) {
    doc.reseed_ids();
    doc.remove_repeat_points_on_lines();
}
