// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document intelligence engine: runs layout extraction, classification,
// field extraction, and table detection over one document and assembles the
// result.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

use docintel_core::error::{DocIntelError, Result};
use docintel_core::{
    DocumentIntelligence, DocumentLayout, DocumentType, EngineConfig, ExtractedField, FieldName,
};
use image::DynamicImage;
use tracing::{debug, info, instrument};

use crate::classify::DocumentClassifier;
use crate::fields::FieldExtractor;
use crate::layout::build_layout;
use crate::pipeline::Assembly;
use crate::table::TableDetector;
use crate::vision::{Capabilities, WordRecognizer, load_image};

/// Stateless document analyser.
///
/// Pattern catalogs are compiled once in the constructor and only read
/// afterwards, so one engine can serve many threads. Calls into the word
/// recognizer are serialised by a mutex; everything else runs unlocked.
///
/// ```rust,no_run
/// use docintel_core::EngineConfig;
/// use docintel_engine::DocumentIntelligenceEngine;
///
/// let engine = DocumentIntelligenceEngine::new(EngineConfig::default());
/// let result = engine.process_document("scanned-invoice.png");
/// println!("{} ({:.0}%)", result.doc_type, result.type_confidence * 100.0);
/// ```
pub struct DocumentIntelligenceEngine {
    config: EngineConfig,
    capabilities: Capabilities,
    classifier: DocumentClassifier,
    extractor: FieldExtractor,
    table_detector: TableDetector,
    recognizer: Option<Mutex<Box<dyn WordRecognizer + Send>>>,
}

impl DocumentIntelligenceEngine {
    /// Engine with image decoding and table detection but no word recognizer:
    /// image layouts carry page size and tables, never text lines.
    pub fn new(config: EngineConfig) -> Self {
        Self::build(
            config,
            None,
            Capabilities {
                vision: true,
                text_recognition: false,
            },
        )
    }

    /// Engine that recognises words through `recognizer`.
    pub fn with_recognizer(config: EngineConfig, recognizer: Box<dyn WordRecognizer + Send>) -> Self {
        info!(recognizer = recognizer.name(), "Word recognizer attached");
        Self::build(
            config,
            Some(Mutex::new(recognizer)),
            Capabilities {
                vision: true,
                text_recognition: true,
            },
        )
    }

    /// Engine without any image capability. `process_document` yields an
    /// empty layout and no tables.
    pub fn text_only(config: EngineConfig) -> Self {
        Self::build(config, None, Capabilities::text_only())
    }

    /// Best engine this build supports: with the `ocr` feature, ocrs models
    /// from the default cache directory when present.
    pub fn with_default_capabilities(config: EngineConfig) -> Self {
        #[cfg(feature = "ocr")]
        {
            match crate::vision::OcrsRecognizer::with_defaults() {
                Ok(recognizer) => return Self::with_recognizer(config, Box::new(recognizer)),
                Err(err) => {
                    tracing::warn!(error = %err, "OCR models unavailable; continuing without text recognition");
                }
            }
        }
        Self::new(config)
    }

    fn build(
        config: EngineConfig,
        recognizer: Option<Mutex<Box<dyn WordRecognizer + Send>>>,
        capabilities: Capabilities,
    ) -> Self {
        let classifier = DocumentClassifier::new(config.unknown_threshold);
        let extractor =
            FieldExtractor::with_overrides(config.field_confidence, &config.field_pattern_overrides);
        let table_detector = TableDetector::new(config.tables.clone());
        debug!(?capabilities, "Engine constructed");
        Self {
            config,
            capabilities,
            classifier,
            extractor,
            table_detector,
            recognizer,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyse the image at `path`.
    ///
    /// Never fails: an unreadable file or a failing stage degrades to empty
    /// output for that stage, recorded in `metadata.warnings`.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn process_document(&self, path: impl AsRef<Path>) -> DocumentIntelligence {
        let started = Instant::now();
        let path = path.as_ref();
        info!("Processing document");

        let mut assembly = Assembly::new(path.display().to_string());

        let image = if self.capabilities.vision {
            match load_image(path) {
                Ok(image) => Some(image),
                Err(err) => {
                    assembly.warn(format!("cannot read document: {err}"));
                    None
                }
            }
        } else {
            assembly.warn(DocIntelError::VisionUnavailable.to_string());
            None
        };

        if image.is_some() && !self.capabilities.text_recognition {
            assembly.warn(DocIntelError::TextRecognitionUnavailable.to_string());
        }

        // Stage 1: layout and raw text.
        let layout = match &image {
            Some(image) => match self.extract_layout(image) {
                Ok(layout) => layout,
                Err(err) => {
                    assembly.warn(format!("layout extraction failed: {err}"));
                    DocumentLayout::with_page_size(image.width(), image.height())
                }
            },
            None => DocumentLayout::default(),
        };
        info!(lines = layout.line_count(), "Layout extracted");
        assembly.record_layout(layout);

        // Stages 2 and 3 read the same raw text independently.
        let (doc_type, confidence) = self.classify_text(assembly.raw_text());
        assembly.record_classification(doc_type, confidence);
        let fields = self.extract_fields(assembly.raw_text());
        assembly.record_fields(fields);

        // Stage 4: tables, from the image alone.
        let tables = image
            .as_ref()
            .map(|image| self.table_detector.detect(image))
            .unwrap_or_default();
        assembly.record_tables(tables);

        let result = assembly.complete(started.elapsed(), self.capabilities);
        info!(
            doc_type = %result.doc_type,
            confidence = result.type_confidence,
            fields = result.extracted_fields.len(),
            tables = result.layout.tables.len(),
            "Document processed"
        );
        result
    }

    /// Analyse already-extracted text. Layout stays empty and no tables are
    /// detected; `source` becomes the result's `file_path`.
    #[instrument(skip_all, fields(source = source, chars = text.len()))]
    pub fn process_text(&self, source: &str, text: &str) -> DocumentIntelligence {
        let started = Instant::now();
        let mut assembly = Assembly::new(source);
        assembly.record_layout_with_text(DocumentLayout::default(), text.to_string());

        let (doc_type, confidence) = self.classify_text(assembly.raw_text());
        assembly.record_classification(doc_type, confidence);
        let fields = self.extract_fields(assembly.raw_text());
        assembly.record_fields(fields);
        assembly.record_tables(Vec::new());

        let result = assembly.complete(started.elapsed(), self.capabilities);
        info!(doc_type = %result.doc_type, confidence = result.type_confidence, "Text processed");
        result
    }

    /// Classify raw text.
    pub fn classify_text(&self, text: &str) -> (DocumentType, f64) {
        self.classifier.classify(text)
    }

    /// Extract catalog fields from raw text.
    pub fn extract_fields(&self, text: &str) -> BTreeMap<FieldName, ExtractedField> {
        self.extractor.extract(text)
    }

    /// Page size from the image, lines from the recognizer when one is
    /// attached.
    fn extract_layout(&self, image: &DynamicImage) -> Result<DocumentLayout> {
        let (width, height) = (image.width(), image.height());
        let Some(recognizer) = &self.recognizer else {
            return Ok(DocumentLayout::with_page_size(width, height));
        };

        let words = {
            let recognizer = recognizer
                .lock()
                .map_err(|_| DocIntelError::OcrError("word recognizer lock poisoned".into()))?;
            recognizer.recognize_words(image)?
        };
        debug!(word_count = words.len(), "Words recognised");
        Ok(build_layout(words, width, height, self.config.line_threshold))
    }
}

impl Default for DocumentIntelligenceEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// Analyse one document with the default configuration.
pub fn analyze_document(path: impl AsRef<Path>) -> DocumentIntelligence {
    DocumentIntelligenceEngine::with_default_capabilities(EngineConfig::default()).process_document(path)
}

/// Value of a single catalog field in `text`, or `None` when `field_name`
/// is not a catalog field or does not match.
pub fn extract_field(text: &str, field_name: &str) -> Option<String> {
    let name: FieldName = field_name.parse().ok()?;
    FieldExtractor::default()
        .extract_one(text, name)
        .map(|field| field.value)
}
