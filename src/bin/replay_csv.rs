use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};

use gestoscopio::capture::{CaptureWindow, SensorSource};
use gestoscopio::classifier::GestureClassifier;
use gestoscopio::csv_loader::ReplaySource;
use gestoscopio::scheduler::SchedulerEvent;
use gestoscopio::types::FEATURE_COLUMNS;

struct ReplayOptions {
    dump_features: bool,
}

fn parse_args() -> Result<(PathBuf, PathBuf, PathBuf, ReplayOptions)> {
    let mut dump_features = false;
    let mut paths: Vec<PathBuf> = Vec::new();

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--dump-features" => dump_features = true,
            _ => paths.push(PathBuf::from(arg)),
        }
    }

    if paths.len() != 3 {
        bail!("Uso: replay_csv [--dump-features] <pesos.bin> <clases.json> <grabacion.csv>");
    }

    let csv_path = paths.pop().ok_or_else(|| anyhow!("falta la grabación"))?;
    let labels_path = paths.pop().ok_or_else(|| anyhow!("faltan las clases"))?;
    let weights_path = paths.pop().ok_or_else(|| anyhow!("faltan los pesos"))?;
    Ok((weights_path, labels_path, csv_path, ReplayOptions { dump_features }))
}

fn main() -> Result<()> {
    let (weights_path, labels_path, csv_path, opts) = parse_args()?;
    println!("🎞️  Reproduciendo grabación desde {:?}", csv_path);

    let classifier = GestureClassifier::new(&weights_path, &labels_path)?;
    let mut source = ReplaySource::from_csv(&csv_path)?;

    // Ventana con tiempo simulado: mismo planificador que la captura real,
    // sin esperar los 3 segundos de reloj
    let mut window = CaptureWindow::begin(Duration::ZERO);
    let mut now = Duration::ZERO;
    loop {
        match window.poll(now) {
            SchedulerEvent::Tick => window.ingest(source.read()),
            SchedulerEvent::Idle => now += Duration::from_millis(1),
            SchedulerEvent::WindowClosed => break,
        }
    }
    println!("ℹ️  {} muestras incorporadas", window.sample_count());

    let features = window.finalize_features()?;
    let prediction = classifier.predict(&features)?;

    println!(
        "\n🥇 Clase {} → etiqueta {}",
        prediction.class_index, prediction.label
    );
    println!("\nProbabilidades:");
    for (idx, (p, label)) in prediction
        .probabilities
        .iter()
        .zip(classifier.labels())
        .enumerate()
    {
        println!("  {:>2}. etiqueta {:<4} {:>7.2}%", idx, label, p * 100.0);
    }

    if opts.dump_features {
        println!("\n📊 13 características (orden exacto):");
        for (name, value) in FEATURE_COLUMNS.iter().zip(features.iter()) {
            println!("  {:<10} {:>12.6}", name, value);
        }
    }

    Ok(())
}
