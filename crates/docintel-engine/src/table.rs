// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Table detection: edge map, straight-line segments, and a ruling-count
// heuristic that reports at most one table grid per page.

use docintel_core::{BoundingBox, Table, TableDetectionConfig};
use image::{DynamicImage, GrayImage};
use imageproc::edges::canny;
use imageproc::hough::{LineDetectionOptions, PolarLine, detect_lines};
use tracing::{debug, info, instrument};

/// A straight edge segment between two pixel positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSegment {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl LineSegment {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn length(&self) -> f64 {
        let dx = f64::from(self.x2 - self.x1);
        let dy = f64::from(self.y2 - self.y1);
        (dx * dx + dy * dy).sqrt()
    }

    /// Axis the segment runs along, if its endpoints differ by less than
    /// `tolerance` pixels across that axis. Horizontal is checked first.
    pub fn orientation(&self, tolerance: u32) -> Option<Orientation> {
        if self.y1.abs_diff(self.y2) < tolerance {
            Some(Orientation::Horizontal)
        } else if self.x1.abs_diff(self.x2) < tolerance {
            Some(Orientation::Vertical)
        } else {
            None
        }
    }
}

/// Direction of an axis-aligned segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Count horizontal and vertical segments. Diagonal segments are dropped.
pub fn count_rulings(segments: &[LineSegment], tolerance: u32) -> (usize, usize) {
    segments
        .iter()
        .filter_map(|s| s.orientation(tolerance))
        .fold((0, 0), |(h, v), orientation| match orientation {
            Orientation::Horizontal => (h + 1, v),
            Orientation::Vertical => (h, v + 1),
        })
}

/// Turn a segment list into at most one table covering the whole page.
///
/// More than two rulings in each direction make a grid of
/// `(horizontal - 1) x (vertical - 1)` empty cells. Several physically
/// separate tables collapse into this one detection.
pub fn tables_from_segments(
    segments: &[LineSegment],
    config: &TableDetectionConfig,
    page_width: u32,
    page_height: u32,
) -> Vec<Table> {
    let (horizontal, vertical) = count_rulings(segments, config.axis_tolerance);
    debug!(horizontal, vertical, "Segments classified");

    if horizontal > 2 && vertical > 2 {
        let table = Table::empty_grid(
            horizontal - 1,
            vertical - 1,
            BoundingBox::new(0, 0, page_width, page_height),
            config.confidence,
        );
        info!(rows = table.rows, cols = table.cols, "Detected table");
        vec![table]
    } else {
        Vec::new()
    }
}

/// Geometric table detector over page rasters.
#[derive(Debug, Clone, Default)]
pub struct TableDetector {
    config: TableDetectionConfig,
}

impl TableDetector {
    pub fn new(config: TableDetectionConfig) -> Self {
        Self { config }
    }

    /// Detect tables in a page image. Returns zero or one table.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn detect(&self, image: &DynamicImage) -> Vec<Table> {
        let gray = image.to_luma8();
        let segments = self.detect_segments(&gray);
        tables_from_segments(&segments, &self.config, gray.width(), gray.height())
    }

    /// Canny edges, Hough lines, then the edge runs along each line.
    pub fn detect_segments(&self, gray: &GrayImage) -> Vec<LineSegment> {
        let (width, height) = gray.dimensions();
        if width < 3 || height < 3 {
            debug!(width, height, "Image too small for edge detection");
            return Vec::new();
        }

        let edges = canny(gray, self.config.canny_low, self.config.canny_high);
        let options = LineDetectionOptions {
            vote_threshold: self.config.vote_threshold,
            suppression_radius: self.config.suppression_radius,
        };
        let lines = detect_lines(&edges, options);
        debug!(line_count = lines.len(), "Hough lines detected");

        let segments: Vec<LineSegment> = lines
            .iter()
            .flat_map(|line| {
                trace_segments(
                    &edges,
                    line,
                    self.config.min_segment_length,
                    self.config.max_segment_gap,
                )
            })
            .collect();
        debug!(segment_count = segments.len(), "Line segments extracted");
        segments
    }
}

// -- Segment extraction -------------------------------------------------------

/// Walk a polar line across the edge map and collect its edge runs.
///
/// A `PolarLine` `(r, theta)` is the line `x * cos(theta) + y * sin(theta) = r`.
/// Lines closer to horizontal are stepped along x, the rest along y. A step
/// counts as a hit when the edge map is set on the line or one pixel either
/// side of it. Runs separated by more than `max_gap` missed steps are split;
/// runs shorter than `min_length` are dropped.
fn trace_segments(
    edges: &GrayImage,
    line: &PolarLine,
    min_length: u32,
    max_gap: u32,
) -> Vec<LineSegment> {
    let (width, height) = edges.dimensions();
    let theta = f64::from(line.angle_in_degrees).to_radians();
    let (sin, cos) = theta.sin_cos();
    let r = f64::from(line.r);
    let step_along_x = sin.abs() >= cos.abs();

    let points: Box<dyn Iterator<Item = (i32, i32)>> = if step_along_x {
        Box::new((0..width as i32).map(move |x| (x, ((r - f64::from(x) * cos) / sin).round() as i32)))
    } else {
        Box::new((0..height as i32).map(move |y| (((r - f64::from(y) * sin) / cos).round() as i32, y)))
    };

    let is_edge = |x: i32, y: i32| {
        x >= 0
            && y >= 0
            && (x as u32) < width
            && (y as u32) < height
            && edges.get_pixel(x as u32, y as u32).0[0] > 0
    };

    let mut segments = Vec::new();
    let mut run: Option<((i32, i32), (i32, i32))> = None;
    let mut gap = 0u32;

    let mut close = |run: &mut Option<((i32, i32), (i32, i32))>| {
        if let Some((start, end)) = run.take() {
            let segment = LineSegment::new(start.0, start.1, end.0, end.1);
            if segment.length() >= f64::from(min_length) {
                segments.push(segment);
            }
        }
    };

    for (x, y) in points {
        let hit = if step_along_x {
            (-1..=1).any(|dy| is_edge(x, y + dy))
        } else {
            (-1..=1).any(|dx| is_edge(x + dx, y))
        };

        if hit {
            run = Some(match run {
                Some((start, _)) => (start, (x, y)),
                None => ((x, y), (x, y)),
            });
            gap = 0;
        } else if run.is_some() {
            gap += 1;
            if gap > max_gap {
                close(&mut run);
                gap = 0;
            }
        }
    }
    close(&mut run);

    segments
}

// -- Tests --------------------------------------------------------------------
