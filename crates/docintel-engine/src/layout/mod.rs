// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Layout reconstruction: grouping recognised words into text lines and
// placing those lines into header, body, and footer regions.

pub mod lines;
pub mod regions;

use docintel_core::{DocumentLayout, Word};
use tracing::debug;

pub use lines::{LineGrouper, group_words};
pub use regions::LayoutSegmenter;

/// Build a page layout from a word stream in detection order.
///
/// Lines are placed into their region as soon as they are finalized.
pub fn build_layout(
    words: impl IntoIterator<Item = Word>,
    page_width: u32,
    page_height: u32,
    line_threshold: u32,
) -> DocumentLayout {
    let mut layout = DocumentLayout::with_page_size(page_width, page_height);
    let segmenter = LayoutSegmenter::new(page_height);
    let mut grouper = LineGrouper::new(line_threshold);

    for word in words {
        if let Some(line) = grouper.push(word) {
            segmenter.place(&mut layout, line);
        }
    }
    if let Some(line) = grouper.finish() {
        segmenter.place(&mut layout, line);
    }

    debug!(
        header = layout.header.len(),
        body = layout.body.len(),
        footer = layout.footer.len(),
        "Layout built"
    );
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use docintel_core::BoundingBox;

    fn word(text: &str, y: u32) -> Word {
        Word::new(text, 0.9, BoundingBox::new(10, y, 40, 12))
    }

    #[test]
    fn lines_are_partitioned_by_page_thirds() {
        let words = vec![
            word("ACME", 50),
            word("Corp", 52),
            word("Line", 700),
            word("item", 701),
            word("Page", 1400),
            word("1", 1402),
        ];
        let layout = build_layout(words, 1000, 1500, 10);
        assert_eq!(layout.header.len(), 1);
        assert_eq!(layout.body.len(), 1);
        assert_eq!(layout.footer.len(), 1);
        assert_eq!(layout.raw_text(), "ACME Corp\nLine item\nPage 1");
    }

    #[test]
    fn unknown_page_height_puts_everything_in_body() {
        let words = vec![word("top", 5), word("middle", 500), word("bottom", 5000)];
        let layout = build_layout(words, 0, 0, 10);
        assert!(layout.header.is_empty());
        assert!(layout.footer.is_empty());
        assert_eq!(layout.body.len(), 3);
    }

    #[test]
    fn every_line_lands_in_exactly_one_region() {
        let words: Vec<Word> = (0..60).map(|i| word("w", i * 25)).collect();
        let layout = build_layout(words.clone(), 800, 1500, 10);
        let grouped = group_words(words, 10);
        assert_eq!(layout.line_count(), grouped.len());
        for line in &grouped {
            let hits = [&layout.header, &layout.body, &layout.footer]
                .iter()
                .filter(|region| {
                    region
                        .iter()
                        .any(|placed| placed.bbox == line.bbox && placed.text == line.text)
                })
                .count();
            assert_eq!(hits, 1, "line at y={} placed {hits} times", line.bbox.y);
        }
    }
}
