// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for docintel: recognised words, text lines, page layout,
// tables, extracted fields, and the assembled analysis result.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Axis-aligned box in image pixel coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// Smallest box containing both `self` and `other`.
    pub fn union(&self, other: &Self) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::new(x, y, right - x, bottom - y)
    }
}

/// Vertical band of the page a line was placed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Header,
    Body,
    Footer,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Body => "body",
            Self::Footer => "footer",
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single recognised token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    /// Recognition confidence in `0.0..=1.0`.
    pub confidence: f64,
    pub bbox: BoundingBox,
    /// Region tag, when the producer already knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Region>,
}

impl Word {
    /// Create a word. Confidence is clamped into `0.0..=1.0`.
    pub fn new(text: impl Into<String>, confidence: f64, bbox: BoundingBox) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            text: text.into(),
            confidence,
            bbox,
            position: None,
        }
    }

    pub fn with_position(mut self, position: Region) -> Self {
        self.position = Some(position);
        self
    }
}

/// A run of words sharing an approximate vertical position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    pub text: String,
    pub words: Vec<Word>,
    /// Mean of the word confidences; `0.0` for a line without words.
    pub confidence: f64,
    pub bbox: BoundingBox,
}

impl TextLine {
    /// Build a line from its words: texts joined by single spaces, mean
    /// confidence, union bounding box.
    pub fn from_words(words: Vec<Word>) -> Self {
        let text = words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let confidence = if words.is_empty() {
            0.0
        } else {
            words.iter().map(|w| w.confidence).sum::<f64>() / words.len() as f64
        };
        let bbox = words
            .iter()
            .map(|w| w.bbox)
            .reduce(|acc, b| acc.union(&b))
            .unwrap_or_default();
        Self {
            text,
            words,
            confidence,
            bbox,
        }
    }
}

/// A detected table. Only the grid geometry is known; cells stay empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub rows: usize,
    pub cols: usize,
    /// Row-major `rows x cols` grid of cell texts.
    pub cells: Vec<Vec<String>>,
    pub bbox: BoundingBox,
    pub confidence: f64,
}

impl Table {
    /// A table whose cells are all empty strings.
    pub fn empty_grid(rows: usize, cols: usize, bbox: BoundingBox, confidence: f64) -> Self {
        Self {
            rows,
            cols,
            cells: vec![vec![String::new(); cols]; rows],
            bbox,
            confidence,
        }
    }
}

/// Lines partitioned into header/body/footer, plus detected tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentLayout {
    pub header: Vec<TextLine>,
    pub body: Vec<TextLine>,
    pub footer: Vec<TextLine>,
    pub tables: Vec<Table>,
    /// Page width in pixels, 0 if unknown.
    pub page_width: u32,
    /// Page height in pixels, 0 if unknown.
    pub page_height: u32,
}

impl DocumentLayout {
    /// Empty layout for a page of known size.
    pub fn with_page_size(page_width: u32, page_height: u32) -> Self {
        Self {
            page_width,
            page_height,
            ..Default::default()
        }
    }

    /// Append a line to the given region.
    pub fn push(&mut self, region: Region, line: TextLine) {
        match region {
            Region::Header => self.header.push(line),
            Region::Body => self.body.push(line),
            Region::Footer => self.footer.push(line),
        }
    }

    /// All lines in reading order: header, body, footer.
    pub fn lines(&self) -> impl Iterator<Item = &TextLine> {
        self.header.iter().chain(&self.body).chain(&self.footer)
    }

    pub fn line_count(&self) -> usize {
        self.header.len() + self.body.len() + self.footer.len()
    }

    /// Line texts joined by newlines, in reading order.
    pub fn raw_text(&self) -> String {
        self.lines()
            .map(|line| line.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Business-document taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Invoice,
    Receipt,
    Contract,
    Form,
    Letter,
    Report,
    Unknown,
}

impl DocumentType {
    /// Every classifiable type, in catalog order. Excludes `Unknown`.
    pub const CLASSIFIED: [DocumentType; 6] = [
        Self::Invoice,
        Self::Receipt,
        Self::Contract,
        Self::Form,
        Self::Letter,
        Self::Report,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invoice => "invoice",
            Self::Receipt => "receipt",
            Self::Contract => "contract",
            Self::Form => "form",
            Self::Letter => "letter",
            Self::Report => "report",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Names of the extractable fields. Declaration order is catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    InvoiceNumber,
    InvoiceDate,
    DueDate,
    TotalAmount,
    Recipient,
    Sender,
    Phone,
    Email,
    Address,
    ZipCode,
}

impl FieldName {
    pub const ALL: [FieldName; 10] = [
        Self::InvoiceNumber,
        Self::InvoiceDate,
        Self::DueDate,
        Self::TotalAmount,
        Self::Recipient,
        Self::Sender,
        Self::Phone,
        Self::Email,
        Self::Address,
        Self::ZipCode,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvoiceNumber => "invoice_number",
            Self::InvoiceDate => "invoice_date",
            Self::DueDate => "due_date",
            Self::TotalAmount => "total_amount",
            Self::Recipient => "recipient",
            Self::Sender => "sender",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::Address => "address",
            Self::ZipCode => "zip_code",
        }
    }
}

impl std::fmt::Display for FieldName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldName {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| format!("unknown field name: {s}"))
    }
}

/// Where an extracted value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldSource {
    /// Pattern match over the flattened text.
    Regex,
    /// Reserved: taken directly from recognition output.
    Ocr,
    /// Reserved: inferred from page geometry.
    Layout,
}

/// A named value pulled out of the document text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedField {
    pub name: FieldName,
    pub value: String,
    pub confidence: f64,
    pub source: FieldSource,
}

/// Capability flags and warnings recorded alongside a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingMetadata {
    /// Image decoding and table detection were available.
    pub vision_available: bool,
    /// A word recognizer was configured.
    pub text_recognition_available: bool,
    /// When processing finished.
    pub timestamp: DateTime<Utc>,
    /// Stage failures that were degraded to empty output.
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// The complete analysis of one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentIntelligence {
    /// Path or caller-supplied identifier of the source.
    pub file_path: String,
    pub doc_type: DocumentType,
    /// Classification score of `doc_type`, in `0.0..=1.0`.
    pub type_confidence: f64,
    pub layout: DocumentLayout,
    pub extracted_fields: BTreeMap<FieldName, ExtractedField>,
    pub raw_text: String,
    /// Wall-clock processing time in seconds.
    pub processing_time: f64,
    pub metadata: ProcessingMetadata,
}

impl DocumentIntelligence {
    /// Value of an extracted field, if present.
    pub fn field_value(&self, name: FieldName) -> Option<&str> {
        self.extracted_fields.get(&name).map(|f| f.value.as_str())
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Single-line JSON.
    pub fn to_json_compact(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_result() -> DocumentIntelligence {
        let mut layout = DocumentLayout::with_page_size(1000, 1500);
        layout.push(
            Region::Header,
            TextLine::from_words(vec![Word::new("INVOICE", 0.95, BoundingBox::new(10, 20, 80, 18))]),
        );
        layout.tables.push(Table::empty_grid(2, 3, BoundingBox::new(0, 0, 1000, 1500), 0.7));

        let mut extracted_fields = BTreeMap::new();
        extracted_fields.insert(
            FieldName::Email,
            ExtractedField {
                name: FieldName::Email,
                value: "support@example.com".into(),
                confidence: 0.85,
                source: FieldSource::Regex,
            },
        );

        DocumentIntelligence {
            file_path: "scan.png".into(),
            doc_type: DocumentType::Invoice,
            type_confidence: 0.6,
            layout,
            extracted_fields,
            raw_text: "INVOICE".into(),
            processing_time: 0.012,
            metadata: ProcessingMetadata {
                vision_available: true,
                text_recognition_available: false,
                timestamp: Utc::now(),
                warnings: vec![],
            },
        }
    }

    #[test]
    fn union_takes_min_origin_and_max_extent() {
        let a = BoundingBox::new(10, 20, 30, 10);
        let b = BoundingBox::new(5, 25, 10, 40);
        let u = a.union(&b);
        assert_eq!(u, BoundingBox::new(5, 20, 35, 45));
        assert_eq!(u.right(), 40);
        assert_eq!(u.bottom(), 65);
    }

    #[test]
    fn word_confidence_is_clamped() {
        let bbox = BoundingBox::default();
        assert_eq!(Word::new("a", 1.7, bbox).confidence, 1.0);
        assert_eq!(Word::new("a", -0.3, bbox).confidence, 0.0);
        assert_eq!(Word::new("a", f64::NAN, bbox).confidence, 0.0);
    }

    #[test]
    fn line_from_words_joins_and_averages() {
        let line = TextLine::from_words(vec![
            Word::new("Amount", 0.9, BoundingBox::new(10, 100, 60, 20)),
            Word::new("Due", 0.7, BoundingBox::new(80, 102, 30, 20)),
        ]);
        assert_eq!(line.text, "Amount Due");
        assert!((line.confidence - 0.8).abs() < 1e-9);
        assert_eq!(line.bbox, BoundingBox::new(10, 100, 100, 22));
    }

    #[test]
    fn line_without_words_has_zero_confidence() {
        let line = TextLine::from_words(vec![]);
        assert_eq!(line.confidence, 0.0);
        assert_eq!(line.text, "");
        assert_eq!(line.bbox, BoundingBox::default());
    }

    #[test]
    fn empty_grid_has_requested_shape() {
        let table = Table::empty_grid(2, 3, BoundingBox::default(), 0.7);
        assert_eq!(table.cells.len(), 2);
        assert!(table.cells.iter().all(|row| row.len() == 3));
        assert!(table.cells.iter().flatten().all(String::is_empty));
    }

    #[test]
    fn raw_text_reads_header_body_footer() {
        let mut layout = DocumentLayout::default();
        layout.push(Region::Footer, TextLine::from_words(vec![Word::new("Footer", 1.0, BoundingBox::default())]));
        layout.push(Region::Header, TextLine::from_words(vec![Word::new("Header", 1.0, BoundingBox::default())]));
        layout.push(Region::Body, TextLine::from_words(vec![Word::new("Body", 1.0, BoundingBox::default())]));
        assert_eq!(layout.raw_text(), "Header\nBody\nFooter");
        assert_eq!(layout.line_count(), 3);
    }

    #[test]
    fn field_names_parse_from_catalog_keys() {
        for name in FieldName::ALL {
            assert_eq!(name.as_str().parse::<FieldName>(), Ok(name));
        }
        assert!("nonexistent_field".parse::<FieldName>().is_err());
    }

    #[test]
    fn serialized_shape_uses_catalog_names() {
        let value = serde_json::to_value(sample_result()).unwrap();
        assert_eq!(value["doc_type"], "invoice");
        assert_eq!(value["layout"]["page_width"], 1000);
        assert_eq!(value["layout"]["tables"][0]["rows"], 2);
        assert_eq!(value["extracted_fields"]["email"]["name"], "email");
        assert_eq!(value["extracted_fields"]["email"]["source"], "regex");
        assert!(value["metadata"]["timestamp"].is_string());
    }

    #[test]
    fn json_round_trip_preserves_result() {
        let original = sample_result();
        let restored = DocumentIntelligence::from_json(&original.to_json().unwrap()).unwrap();
        assert_eq!(restored.doc_type, original.doc_type);
        assert_eq!(restored.type_confidence, original.type_confidence);
        assert_eq!(restored.raw_text, original.raw_text);
        assert_eq!(restored.field_value(FieldName::Email), Some("support@example.com"));
        assert_eq!(restored, original);
    }

    #[test]
    fn json_round_trip_is_exact_for_measured_floats() {
        let mut original = sample_result();
        let line = TextLine::from_words(vec![
            Word::new("Amount", 0.91, BoundingBox::new(10, 700, 60, 18)),
            Word::new("Due:", 0.87, BoundingBox::new(75, 701, 40, 18)),
            Word::new("$1,500.00", 0.73, BoundingBox::new(120, 700, 90, 18)),
        ]);
        original.layout.push(Region::Body, line);

        for i in 0..2000 {
            original.processing_time = f64::from(i) * 1e-7 + 0.000123456789;
            let restored = DocumentIntelligence::from_json(&original.to_json().unwrap()).unwrap();
            assert_eq!(restored.processing_time.to_bits(), original.processing_time.to_bits());
            assert_eq!(
                restored.layout.body[0].confidence.to_bits(),
                original.layout.body[0].confidence.to_bits()
            );
        }
        original.processing_time = 0.000125256789;
        let compact = DocumentIntelligence::from_json(&original.to_json_compact().unwrap()).unwrap();
        assert_eq!(compact, original);
    }
}
