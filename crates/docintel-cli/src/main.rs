// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docintel — analyse a scanned document image (or plain text) and print the
// document intelligence result as JSON on stdout.
//
// Entry point. Initialises logging on stderr, loads the engine
// configuration, builds the engine, and runs one document through it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use docintel_core::EngineConfig;
use docintel_engine::DocumentIntelligenceEngine;

/// Document classification, layout, table, and key-field analysis
#[derive(Parser, Debug)]
#[command(name = "docintel")]
#[command(version, about, long_about = None)]
struct Args {
    /// Document image to analyse, or a UTF-8 text file with --text
    input: PathBuf,

    /// Engine configuration (JSON); missing keys take their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Treat INPUT as already-extracted text
    #[arg(short, long)]
    text: bool,

    /// Print single-line JSON
    #[arg(long)]
    compact: bool,

    /// Directory holding the ocrs detection and recognition models
    #[cfg(feature = "ocr")]
    #[arg(short, long)]
    models: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    tracing::info!(input = %args.input.display(), "docintel starting");

    let config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => EngineConfig::default(),
    };

    let result = if args.text {
        let text = std::fs::read_to_string(&args.input)
            .with_context(|| format!("failed to read text from {}", args.input.display()))?;
        let engine = DocumentIntelligenceEngine::text_only(config);
        engine.process_text(&args.input.display().to_string(), &text)
    } else {
        build_engine(&args, config).process_document(&args.input)
    };

    let json = if args.compact {
        result.to_json_compact()?
    } else {
        result.to_json()?
    };
    println!("{json}");
    Ok(())
}

#[cfg(feature = "ocr")]
fn build_engine(args: &Args, config: EngineConfig) -> DocumentIntelligenceEngine {
    let Some(dir) = &args.models else {
        return DocumentIntelligenceEngine::with_default_capabilities(config);
    };
    match docintel_engine::OcrsRecognizer::from_model_dir(dir) {
        Ok(recognizer) => DocumentIntelligenceEngine::with_recognizer(config, Box::new(recognizer)),
        Err(err) => {
            tracing::warn!(error = %err, "OCR models unavailable; continuing without text recognition");
            DocumentIntelligenceEngine::new(config)
        }
    }
}

#[cfg(not(feature = "ocr"))]
fn build_engine(_args: &Args, config: EngineConfig) -> DocumentIntelligenceEngine {
    DocumentIntelligenceEngine::with_default_capabilities(config)
}
