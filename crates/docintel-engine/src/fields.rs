// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Key field extraction: one pattern per catalog field, first match wins.

use std::collections::BTreeMap;

use docintel_core::error::{DocIntelError, Result};
use docintel_core::{ExtractedField, FieldName, FieldSource};
use regex::{Regex, RegexBuilder};
use tracing::{debug, warn};

/// Reference pattern for every catalog field. The value is capture group 1,
/// or the whole match for a pattern without groups.
const FIELD_PATTERNS: [(FieldName, &str); 10] = [
    (
        FieldName::InvoiceNumber,
        r"invoice\s*(?:number|no\.?|#)?\s*[:=]?\s*([A-Z0-9\-]+)",
    ),
    (FieldName::InvoiceDate, r"invoice\s*date\s*[:=]?\s*([\d/\-\.]+)"),
    (FieldName::DueDate, r"(?:due|payment)\s*date\s*[:=]?\s*([\d/\-\.]+)"),
    (
        FieldName::TotalAmount,
        r"(?:total|amount\s*due)\s*[:=]?\s*[^\d]*(\d+(?:[.,]\d+)*(?:[.,]\d{2})?)",
    ),
    (FieldName::Recipient, r"(?:to|bill\s*to|ship\s*to)\s*[:=]?\s*([A-Za-z\s]+)"),
    (FieldName::Sender, r"(?:from|company|seller)\s*[:=]?\s*([A-Za-z\s]+)"),
    (FieldName::Phone, r"(?:phone|tel)(?:ephone)?\s*[:=]?\s*([\d\-\(\)]+)"),
    (
        FieldName::Email,
        r"([A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,})",
    ),
    (FieldName::Address, r"(?:address|street)\s*[:=]?\s*([0-9\s\w\.,#]+)"),
    (
        FieldName::ZipCode,
        r"(?:zip|postal)\s*(?:code)?\s*[:=]?\s*(\d{5}(?:[-]?\d{4})?)",
    ),
];

/// Regex-driven extractor over the closed field catalog.
///
/// Matching runs on the lowercased text, so extracted values are lowercase.
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    patterns: Vec<(FieldName, Regex)>,
    confidence: f64,
}

impl FieldExtractor {
    /// Extractor over the reference catalog.
    pub fn new(confidence: f64) -> Self {
        Self::with_overrides(confidence, &BTreeMap::new())
    }

    /// Extractor whose catalog patterns are replaced by `overrides` where
    /// given. A pattern that fails to compile removes its field.
    pub fn with_overrides(confidence: f64, overrides: &BTreeMap<FieldName, String>) -> Self {
        let patterns = FIELD_PATTERNS
            .iter()
            .filter_map(|&(name, default)| {
                let source = overrides.get(&name).map(String::as_str).unwrap_or(default);
                match compile(name, source) {
                    Ok(re) => Some((name, re)),
                    Err(err) => {
                        warn!(field = %name, error = %err, "Field dropped from catalog");
                        None
                    }
                }
            })
            .collect();
        Self {
            patterns,
            confidence,
        }
    }

    /// Fields this extractor can produce, in catalog order.
    pub fn fields(&self) -> impl Iterator<Item = FieldName> + '_ {
        self.patterns.iter().map(|(name, _)| *name)
    }

    /// Extract every catalog field that matches. Fields without a match are
    /// absent from the map.
    pub fn extract(&self, text: &str) -> BTreeMap<FieldName, ExtractedField> {
        let lowered = text.to_lowercase();
        let fields: BTreeMap<_, _> = self
            .patterns
            .iter()
            .filter_map(|(name, re)| self.search(*name, re, &lowered))
            .map(|field| (field.name, field))
            .collect();
        debug!(count = fields.len(), "Fields extracted");
        fields
    }

    /// Extract a single field.
    pub fn extract_one(&self, text: &str, name: FieldName) -> Option<ExtractedField> {
        let (_, re) = self.patterns.iter().find(|(n, _)| *n == name)?;
        self.search(name, re, &text.to_lowercase())
    }

    fn search(&self, name: FieldName, re: &Regex, lowered: &str) -> Option<ExtractedField> {
        let caps = re.captures(lowered)?;
        let matched = if re.captures_len() > 1 {
            caps.get(1)
        } else {
            caps.get(0)
        };
        let Some(matched) = matched else {
            debug!(field = %name, "Value group did not participate; field omitted");
            return None;
        };
        Some(ExtractedField {
            name,
            value: matched.as_str().trim().to_string(),
            confidence: self.confidence,
            source: FieldSource::Regex,
        })
    }
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new(0.85)
    }
}

fn compile(name: FieldName, source: &str) -> Result<Regex> {
    RegexBuilder::new(source)
        .case_insensitive(true)
        .build()
        .map_err(|err| DocIntelError::InvalidPattern {
            name: name.to_string(),
            reason: err.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn value(fields: &BTreeMap<FieldName, ExtractedField>, name: FieldName) -> Option<&str> {
        fields.get(&name).map(|f| f.value.as_str())
    }

    #[test]
    fn catalog_covers_every_field() {
        let names: Vec<FieldName> = FieldExtractor::default().fields().collect();
        assert_eq!(names, FieldName::ALL);
    }

    #[test]
    fn email() {
        let fields = FieldExtractor::default().extract("Contact: support@example.com");
        assert_eq!(value(&fields, FieldName::Email), Some("support@example.com"));
        let field = &fields[&FieldName::Email];
        assert_eq!(field.confidence, 0.85);
        assert_eq!(field.source, FieldSource::Regex);
        assert_eq!(field.name, FieldName::Email);
    }

    #[test]
    fn invoice_number_is_lowercased() {
        let fields = FieldExtractor::default().extract("Invoice Number: INV-2025-001");
        assert_eq!(value(&fields, FieldName::InvoiceNumber), Some("inv-2025-001"));
    }

    #[test]
    fn phone_keeps_digits_and_parentheses() {
        let fields = FieldExtractor::default().extract("Phone: (555) 123-4567");
        assert_eq!(value(&fields, FieldName::Phone), Some("(555)"));
    }

    #[test]
    fn total_amount_skips_currency_symbol() {
        let fields = FieldExtractor::default().extract("Total Amount Due: $1234.56");
        assert_eq!(value(&fields, FieldName::TotalAmount), Some("1234.56"));
    }

    #[test]
    fn dates() {
        let fields = FieldExtractor::default().extract("Invoice Date: 01/15/2025\nDue Date: 2025-02-14");
        assert_eq!(value(&fields, FieldName::InvoiceDate), Some("01/15/2025"));
        assert_eq!(value(&fields, FieldName::DueDate), Some("2025-02-14"));
    }

    #[test]
    fn zip_code() {
        let fields = FieldExtractor::default().extract("Postal Code: 12345-6789");
        assert_eq!(value(&fields, FieldName::ZipCode), Some("12345-6789"));
    }

    #[test]
    fn several_fields_at_once() {
        let text = "
            Invoice Number: INV-2025-001
            Invoice Date: 01/15/2025
            Amount Due: $1,500.00
            Phone: (555) 123-4567
            Email: customer@example.com
        ";
        let fields = FieldExtractor::default().extract(text);
        assert!(fields.len() > 3, "only {} fields", fields.len());
        assert_eq!(value(&fields, FieldName::Email), Some("customer@example.com"));
        assert_eq!(value(&fields, FieldName::InvoiceDate), Some("01/15/2025"));
    }

    #[test]
    fn unmatched_fields_are_absent() {
        let fields = FieldExtractor::default().extract("nothing of interest");
        assert!(fields.is_empty(), "unexpected fields: {fields:?}");
    }

    #[test]
    fn extract_one_matches_full_extraction() {
        let extractor = FieldExtractor::default();
        let text = "Contact: support@example.com";
        assert_eq!(
            extractor.extract_one(text, FieldName::Email),
            extractor.extract(text).remove(&FieldName::Email)
        );
        assert_eq!(extractor.extract_one(text, FieldName::ZipCode), None);
    }

    #[test]
    fn override_replaces_catalog_pattern() {
        let mut overrides = BTreeMap::new();
        overrides.insert(FieldName::InvoiceNumber, r"ref\s*#\s*(\d+)".to_string());
        let extractor = FieldExtractor::with_overrides(0.85, &overrides);
        let fields = extractor.extract("Ref # 4411");
        assert_eq!(value(&fields, FieldName::InvoiceNumber), Some("4411"));
    }

    #[test]
    fn malformed_override_fails_closed() {
        let mut overrides = BTreeMap::new();
        overrides.insert(FieldName::Email, "([unclosed".to_string());
        let extractor = FieldExtractor::with_overrides(0.85, &overrides);
        assert!(!extractor.fields().any(|n| n == FieldName::Email));

        let fields = extractor.extract("Contact: support@example.com\nPhone: 555-0100");
        assert!(!fields.contains_key(&FieldName::Email));
        assert_eq!(value(&fields, FieldName::Phone), Some("555-0100"));
    }

    #[test]
    fn pattern_without_group_yields_whole_match() {
        let mut overrides = BTreeMap::new();
        overrides.insert(FieldName::ZipCode, r"\d{5}".to_string());
        let fields = FieldExtractor::with_overrides(0.85, &overrides).extract("ships to 90210 ");
        assert_eq!(value(&fields, FieldName::ZipCode), Some("90210"));
    }

    #[test]
    fn optional_group_that_did_not_match_is_omitted() {
        let mut overrides = BTreeMap::new();
        overrides.insert(FieldName::Phone, r"phone(?:\s*(\d+))?".to_string());
        let fields = FieldExtractor::with_overrides(0.85, &overrides).extract("phone unavailable");
        assert!(!fields.contains_key(&FieldName::Phone));
    }

    #[test]
    fn confidence_is_configurable() {
        let fields = FieldExtractor::new(0.5).extract("Contact: support@example.com");
        assert_eq!(fields[&FieldName::Email].confidence, 0.5);
    }
}
