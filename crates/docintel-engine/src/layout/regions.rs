// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Positional layout segmentation: header, body, and footer by page thirds.

use docintel_core::{DocumentLayout, Region, TextLine};
use tracing::trace;

/// Assigns lines to a region from the top edge of their bounding box.
///
/// A page of unknown height (0) has a single region: every line is body.
#[derive(Debug, Clone, Copy)]
pub struct LayoutSegmenter {
    page_height: u32,
}

impl LayoutSegmenter {
    pub fn new(page_height: u32) -> Self {
        Self { page_height }
    }

    /// Region for a line: header above one third, footer below two thirds.
    pub fn region_for(&self, line: &TextLine) -> Region {
        if self.page_height == 0 {
            return Region::Body;
        }
        let top = f64::from(line.bbox.y);
        let height = f64::from(self.page_height);
        if top < height / 3.0 {
            Region::Header
        } else if top > height * 2.0 / 3.0 {
            Region::Footer
        } else {
            Region::Body
        }
    }

    /// Append `line` to its region of `layout` and return that region.
    /// Every word of the line is tagged with the region.
    pub fn place(&self, layout: &mut DocumentLayout, mut line: TextLine) -> Region {
        let region = self.region_for(&line);
        line.words = line
            .words
            .into_iter()
            .map(|word| word.with_position(region))
            .collect();
        trace!(region = %region, top = line.bbox.y, "Line placed");
        layout.push(region, line);
        region
    }
}
