//! Netzplan-Editor (Headless-Inspektor).
//!
//! Lädt ein Dokument, meldet Kennzahlen und führt einen vollständigen
//! Render-Durchlauf über den Tracing-Maler aus: zum Prüfen von Dokumenten
//! und Render-Umfang ohne Zeichenfläche.

use netzplan_editor::core::SizeMetric;
use netzplan_editor::{
    load_document, EditorOptions, RenderDispatcher, RenderOptions, TracingPainter,
};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Netzplan-Editor v{} startet...", env!("CARGO_PKG_VERSION"));

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("Aufruf: Netzplan-Editor <dokument.json>");
        std::process::exit(2);
    };

    let config_path = EditorOptions::config_path();
    let options = EditorOptions::load_from_file(&config_path);

    let doc = load_document(std::path::Path::new(&path))?;
    println!("Dokument: {}", path);
    println!("  Punkte:    {}", doc.points.len());
    println!("  Stationen: {}", doc.station_count());
    println!("  Linien:    {}", doc.line_count());
    println!("  Tags:      {}", doc.text_tags.len());

    let mut cluster = netzplan_editor::ClusterEngine::new();
    let clusters = cluster.clusters(&doc, &options).to_vec();
    println!("  Cluster:   {}", clusters.len());
    for c in &clusters {
        let max_size = c
            .first()
            .map(|&id| cluster.max_size_within_cluster(&doc, &options, id, SizeMetric::PointSize))
            .unwrap_or(1.0);
        println!("    {:?} (Punktgröße {:.1})", c, max_size);
    }

    let mut dispatcher = RenderDispatcher::new(Box::new(TracingPainter::new()));
    dispatcher.render(
        &doc,
        &mut cluster,
        &options,
        false,
        &RenderOptions::default(),
    );
    log::info!("Render-Durchlauf abgeschlossen");

    Ok(())
}
