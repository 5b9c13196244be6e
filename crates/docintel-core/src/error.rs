// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for docintel.

use thiserror::Error;

/// Top-level error type for all docintel operations.
///
/// None of these escape `process_document`: the assembler turns them into
/// warnings and substitutes an empty stage output.
#[derive(Debug, Error)]
pub enum DocIntelError {
    // -- Vision errors --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("OCR failed: {0}")]
    OcrError(String),

    #[error("vision capability not available")]
    VisionUnavailable,

    #[error("text recognition not available; layout has no text lines")]
    TextRecognitionUnavailable,

    // -- Catalog errors --
    #[error("invalid pattern for {name}: {reason}")]
    InvalidPattern { name: String, reason: String },

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DocIntelError>;
