// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document classification: scores text against a fixed per-type pattern
// catalog and picks the best-scoring type.

use docintel_core::DocumentType;
use regex::{Regex, RegexBuilder};
use tracing::{debug, warn};

/// Vocabulary distinctive to each document type, in catalog order.
///
/// Catalog order doubles as the tie-break: on equal scores the earlier type
/// wins.
const DOCUMENT_PATTERNS: &[(DocumentType, &[&str])] = &[
    (
        DocumentType::Invoice,
        &[
            r"invoice\s*(?:number|no\.?|#)?",
            r"amount\s*due",
            r"invoice\s*date",
            r"bill\s*to",
            r"from|seller",
        ],
    ),
    (
        DocumentType::Receipt,
        &[
            r"receipt\s*(?:number|no\.?|#)?",
            r"total|amount.*paid",
            r"transaction\s*(?:id|number)",
            r"item.*(?:qty|quantity|price)",
            r"thank.*you",
        ],
    ),
    (
        DocumentType::Contract,
        &[
            r"agreement|contract",
            r"party|parties",
            r"whereas",
            r"hereinafter",
            r"signature|signed",
            r"effective\s*date",
        ],
    ),
    (
        DocumentType::Form,
        &[
            r"form\s*(?:number|no\.?|#)?",
            r"please.*(?:complete|fill)",
            r"required.*field|field.*required",
            r"\[.*\]|__+",
            r"signature\s*(?:line|here)",
        ],
    ),
    (
        DocumentType::Letter,
        &[
            r"(?:dear|to)\s+",
            r"sincerely|regards|respectfully",
            r"(?:mr\.|ms\.|dr\.)",
            r"address:|date:",
        ],
    ),
    (
        DocumentType::Report,
        &[
            r"report\s*(?:number|no\.?|#)?",
            r"annual|quarterly|monthly|executive\s*summary",
            r"table\s*of\s*contents",
            r"findings|conclusions",
            r"prepared\s*by|date",
        ],
    ),
];

/// Compiled patterns for one document type.
#[derive(Debug, Clone)]
struct TypePatterns {
    doc_type: DocumentType,
    patterns: Vec<Regex>,
    /// Declared pattern count; a pattern that failed to compile still counts
    /// towards the denominator.
    total: usize,
}

/// Static pattern-scoring classifier.
///
/// `score(type)` is the fraction of that type's patterns found anywhere in the
/// lowercased text. Repeated matches of one pattern count once.
#[derive(Debug, Clone)]
pub struct DocumentClassifier {
    catalog: Vec<TypePatterns>,
    unknown_threshold: f64,
}

impl DocumentClassifier {
    /// Compile the reference catalog. Scores below `unknown_threshold` yield
    /// [`DocumentType::Unknown`].
    pub fn new(unknown_threshold: f64) -> Self {
        let catalog = DOCUMENT_PATTERNS
            .iter()
            .map(|(doc_type, sources)| TypePatterns {
                doc_type: *doc_type,
                patterns: sources
                    .iter()
                    .filter_map(|source| compile(*doc_type, source))
                    .collect(),
                total: sources.len(),
            })
            .collect();
        Self {
            catalog,
            unknown_threshold,
        }
    }

    /// Score every classifiable type, in catalog order.
    pub fn scores(&self, text: &str) -> Vec<(DocumentType, f64)> {
        let lowered = text.to_lowercase();
        self.catalog
            .iter()
            .map(|entry| {
                let matched = entry.patterns.iter().filter(|re| re.is_match(&lowered)).count();
                let score = if entry.total == 0 {
                    0.0
                } else {
                    matched as f64 / entry.total as f64
                };
                (entry.doc_type, score)
            })
            .collect()
    }

    /// Best-scoring type and its score.
    pub fn classify(&self, text: &str) -> (DocumentType, f64) {
        let scores = self.scores(text);
        let mut best: Option<(DocumentType, f64)> = None;
        for (doc_type, score) in scores {
            // Strictly greater: the first type in catalog order keeps a tie.
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((doc_type, score));
            }
        }

        let (doc_type, confidence) = best.unwrap_or((DocumentType::Unknown, 0.0));
        debug!(%doc_type, confidence, "Best classification score");
        if confidence < self.unknown_threshold {
            (DocumentType::Unknown, confidence)
        } else {
            (doc_type, confidence)
        }
    }
}

impl Default for DocumentClassifier {
    fn default() -> Self {
        Self::new(0.2)
    }
}

fn compile(doc_type: DocumentType, source: &str) -> Option<Regex> {
    match RegexBuilder::new(source).case_insensitive(true).build() {
        Ok(re) => Some(re),
        Err(err) => {
            warn!(%doc_type, pattern = source, error = %err, "Skipping classification pattern");
            None
        }
    }
}
