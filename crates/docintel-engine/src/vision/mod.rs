// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Vision capability: image loading, the word-recognition seam, and the
// capability descriptor the engine resolves at construction.

#[cfg(feature = "ocr")]
pub mod ocr;

use std::path::Path;

use docintel_core::Word;
use docintel_core::error::{DocIntelError, Result};
use image::DynamicImage;
use serde::Serialize;
use tracing::{info, instrument};

#[cfg(feature = "ocr")]
pub use ocr::{OcrConfig, OcrsRecognizer};

/// What the engine can do with an image, fixed when it is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    /// Images can be decoded and scanned for tables.
    pub vision: bool,
    /// A word recognizer is attached, so layout can carry text lines.
    pub text_recognition: bool,
}

impl Capabilities {
    /// Neither images nor recognition: only raw-text processing applies.
    pub fn text_only() -> Self {
        Self {
            vision: false,
            text_recognition: false,
        }
    }
}

/// External text recognition: turns a page image into positioned words.
///
/// Words are returned in detection order; they need not be sorted by
/// position.
pub trait WordRecognizer {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Recognise every word on the page.
    fn recognize_words(&self, image: &DynamicImage) -> Result<Vec<Word>>;
}

/// Replays a word stream recognised elsewhere, ignoring the image.
#[derive(Debug, Clone, Default)]
pub struct PrecomputedWords {
    words: Vec<Word>,
}

impl PrecomputedWords {
    pub fn new(words: Vec<Word>) -> Self {
        Self { words }
    }
}

impl WordRecognizer for PrecomputedWords {
    fn name(&self) -> &str {
        "precomputed"
    }

    fn recognize_words(&self, _image: &DynamicImage) -> Result<Vec<Word>> {
        Ok(self.words.clone())
    }
}

/// Decode an image file.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_image(path: impl AsRef<Path>) -> Result<DynamicImage> {
    let image = image::open(path.as_ref()).map_err(|err| {
        DocIntelError::ImageError(format!(
            "failed to open {}: {}",
            path.as_ref().display(),
            err
        ))
    })?;
    info!(
        width = image.width(),
        height = image.height(),
        "Image loaded"
    );
    Ok(image)
}
