// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Result assembly: the forward-only stage machine that collects each stage's
// output and freezes it into a `DocumentIntelligence`.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::Utc;
use docintel_core::{
    DocumentIntelligence, DocumentLayout, DocumentType, ExtractedField, FieldName,
    ProcessingMetadata, Table,
};
use tracing::{debug, warn};

use crate::vision::Capabilities;

/// Assembly progress. Stages only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineStage {
    NotStarted,
    LayoutExtracted,
    Classified,
    FieldsExtracted,
    TablesDetected,
    Complete,
}

/// Stage outputs gathered for one document.
///
/// Each `record_*` call stores one stage's value and advances to the next
/// stage. A failing stage still records (an empty value) so the assembly
/// always reaches `Complete`.
#[derive(Debug)]
pub struct Assembly {
    stage: PipelineStage,
    file_path: String,
    layout: DocumentLayout,
    raw_text: String,
    doc_type: DocumentType,
    type_confidence: f64,
    fields: BTreeMap<FieldName, ExtractedField>,
    warnings: Vec<String>,
}

impl Assembly {
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            stage: PipelineStage::NotStarted,
            file_path: file_path.into(),
            layout: DocumentLayout::default(),
            raw_text: String::new(),
            doc_type: DocumentType::Unknown,
            type_confidence: 0.0,
            fields: BTreeMap::new(),
            warnings: Vec::new(),
        }
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    /// Flattened text the classification and extraction stages read.
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Note a degraded stage. Logged and kept in the result metadata.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!(stage = ?self.stage, file = %self.file_path, "{message}");
        self.warnings.push(message);
    }

    /// Store the layout; raw text is its lines in reading order.
    pub fn record_layout(&mut self, layout: DocumentLayout) {
        let raw_text = layout.raw_text();
        self.record_layout_with_text(layout, raw_text);
    }

    /// Store a layout together with externally supplied raw text.
    pub fn record_layout_with_text(&mut self, layout: DocumentLayout, raw_text: String) {
        self.layout = layout;
        self.raw_text = raw_text;
        self.advance(PipelineStage::NotStarted, PipelineStage::LayoutExtracted);
    }

    pub fn record_classification(&mut self, doc_type: DocumentType, confidence: f64) {
        self.doc_type = doc_type;
        self.type_confidence = confidence.clamp(0.0, 1.0);
        self.advance(PipelineStage::LayoutExtracted, PipelineStage::Classified);
    }

    pub fn record_fields(&mut self, fields: BTreeMap<FieldName, ExtractedField>) {
        self.fields = fields;
        self.advance(PipelineStage::Classified, PipelineStage::FieldsExtracted);
    }

    pub fn record_tables(&mut self, tables: Vec<Table>) {
        self.layout.tables = tables;
        self.advance(PipelineStage::FieldsExtracted, PipelineStage::TablesDetected);
    }

    /// Freeze the assembly into the final result.
    pub fn complete(mut self, elapsed: Duration, capabilities: Capabilities) -> DocumentIntelligence {
        self.advance(PipelineStage::TablesDetected, PipelineStage::Complete);
        DocumentIntelligence {
            file_path: self.file_path,
            doc_type: self.doc_type,
            type_confidence: self.type_confidence,
            layout: self.layout,
            extracted_fields: self.fields,
            raw_text: self.raw_text,
            processing_time: elapsed.as_secs_f64(),
            metadata: ProcessingMetadata {
                vision_available: capabilities.vision,
                text_recognition_available: capabilities.text_recognition,
                timestamp: Utc::now(),
                warnings: self.warnings,
            },
        }
    }

    fn advance(&mut self, expected: PipelineStage, next: PipelineStage) {
        debug_assert_eq!(self.stage, expected, "stage recorded out of order");
        debug!(from = ?self.stage, to = ?next, "Pipeline stage");
        self.stage = next;
    }
}
