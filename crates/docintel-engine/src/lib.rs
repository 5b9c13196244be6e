// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docintel-engine — Document analysis for docintel.
//
// Groups recognised words into lines and page regions, detects ruled tables
// in the page image, classifies the document by keyword catalog, extracts
// key fields by regex, and assembles everything into one
// `DocumentIntelligence` result.

pub mod classify;
pub mod engine;
pub mod fields;
pub mod layout;
pub mod pipeline;
pub mod table;
pub mod vision;

// Re-export the primary structs so callers can use `docintel_engine::DocumentIntelligenceEngine` etc.
pub use classify::DocumentClassifier;
pub use engine::{DocumentIntelligenceEngine, analyze_document, extract_field};
pub use fields::FieldExtractor;
pub use layout::{LayoutSegmenter, LineGrouper, build_layout, group_words};
pub use pipeline::{Assembly, PipelineStage};
pub use table::{LineSegment, TableDetector};
pub use vision::{Capabilities, PrecomputedWords, WordRecognizer, load_image};

#[cfg(feature = "ocr")]
pub use vision::{OcrConfig, OcrsRecognizer};
