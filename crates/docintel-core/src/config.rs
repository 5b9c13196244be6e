// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Engine configuration.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::FieldName;

/// Tunables for the document intelligence engine.
///
/// Every key is optional when loading from JSON; missing keys take the
/// defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum vertical distance (px) between consecutive word tops on one line.
    pub line_threshold: u32,
    /// Best classification score below which the document is `unknown`.
    pub unknown_threshold: f64,
    /// Confidence attached to every regex-extracted field.
    pub field_confidence: f64,
    /// Replacement patterns for catalog fields. A pattern that fails to
    /// compile removes the field from the catalog.
    pub field_pattern_overrides: BTreeMap<FieldName, String>,
    /// Table detection parameters.
    pub tables: TableDetectionConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            line_threshold: 10,
            unknown_threshold: 0.2,
            field_confidence: 0.85,
            field_pattern_overrides: BTreeMap::new(),
            tables: TableDetectionConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load a config from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&data)
    }

    /// Parse a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Parameters of the edge / straight-line table detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableDetectionConfig {
    /// Canny low hysteresis threshold.
    pub canny_low: f32,
    /// Canny high hysteresis threshold.
    pub canny_high: f32,
    /// Minimum Hough accumulator votes for a line.
    pub vote_threshold: u32,
    /// Non-maximum suppression radius in the Hough accumulator.
    pub suppression_radius: u32,
    /// Shortest edge run (px) kept as a segment.
    pub min_segment_length: u32,
    /// Longest run of missing edge pixels bridged inside one segment.
    pub max_segment_gap: u32,
    /// Endpoint delta (px) under which a segment counts as axis-aligned.
    pub axis_tolerance: u32,
    /// Confidence attached to a detected table.
    pub confidence: f64,
}

impl Default for TableDetectionConfig {
    fn default() -> Self {
        Self {
            canny_low: 50.0,
            canny_high: 150.0,
            vote_threshold: 100,
            suppression_radius: 8,
            min_segment_length: 50,
            max_segment_gap: 10,
            axis_tolerance: 5,
            confidence: 0.7,
        }
    }
}
