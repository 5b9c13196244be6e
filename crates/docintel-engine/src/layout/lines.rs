// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Line grouping: assembles a word stream into text lines by vertical proximity.

use docintel_core::{TextLine, Word};

/// Streaming accumulator that turns words into lines.
///
/// A word continues the current line while its top edge is within
/// `threshold` pixels of the top edge of the *previous* word, so a line may
/// drift downwards word by word.
#[derive(Debug, Clone)]
pub struct LineGrouper {
    threshold: u32,
    words: Vec<Word>,
    reference_top: u32,
}

impl LineGrouper {
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold,
            words: Vec::new(),
            reference_top: 0,
        }
    }

    /// Feed the next word. Returns the completed line when this word starts a
    /// new one. Whitespace-only words are ignored.
    pub fn push(&mut self, word: Word) -> Option<TextLine> {
        if word.text.trim().is_empty() {
            return None;
        }

        let top = word.bbox.y;
        let completed = if !self.words.is_empty() && top.abs_diff(self.reference_top) > self.threshold
        {
            Some(self.take_line())
        } else {
            None
        };

        self.reference_top = top;
        self.words.push(word);
        completed
    }

    /// Finalize the line in progress, if any.
    pub fn finish(mut self) -> Option<TextLine> {
        if self.words.is_empty() {
            None
        } else {
            Some(self.take_line())
        }
    }

    fn take_line(&mut self) -> TextLine {
        TextLine::from_words(std::mem::take(&mut self.words))
    }
}

/// Group a whole word stream into lines.
pub fn group_words(words: impl IntoIterator<Item = Word>, threshold: u32) -> Vec<TextLine> {
    let mut grouper = LineGrouper::new(threshold);
    let mut lines: Vec<TextLine> = words.into_iter().filter_map(|w| grouper.push(w)).collect();
    lines.extend(grouper.finish());
    lines
}
