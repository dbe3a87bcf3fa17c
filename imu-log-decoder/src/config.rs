//! Decoder configuration types
//!
//! This module defines the small set of knobs the decoder library understands.
//! File locations, output layout and everything else about where logs live is
//! handled by the application layer.

use crate::types::{DecoderError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the decoder library
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Column labels for the GPS velocity channel
    #[serde(default)]
    pub velocity_labels: VelocityLabels,

    /// Externally supplied time zero (native clock); when set no sentence is
    /// consumed as the reference
    #[serde(default)]
    pub reference_time: Option<f64>,

    /// Split physical lines before every `$` so concatenated sentences decode separately
    #[serde(default)]
    pub split_concatenated: bool,

    /// Ignore blank lines instead of counting them as bad packets
    #[serde(default)]
    pub skip_blank_lines: bool,
}

/// Header used for the GPS velocity channel
///
/// The data is always written north first, east second.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VelocityLabels {
    /// `time,vel_east,vel_west` - the header existing tooling expects
    #[default]
    Legacy,
    /// `time,vel_north,vel_east` - matches the data
    NorthEast,
}

impl VelocityLabels {
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            VelocityLabels::Legacy => &["time", "vel_east", "vel_west"],
            VelocityLabels::NorthEast => &["time", "vel_north", "vel_east"],
        }
    }
}

impl DecoderConfig {
    /// Create a new decoder configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: choose the GPS velocity header
    pub fn with_velocity_labels(mut self, labels: VelocityLabels) -> Self {
        self.velocity_labels = labels;
        self
    }

    /// Builder method: use an external time zero
    pub fn with_reference_time(mut self, time_zero: f64) -> Self {
        self.reference_time = Some(time_zero);
        self
    }

    /// Builder method: split concatenated sentences
    pub fn with_split_concatenated(mut self, enabled: bool) -> Self {
        self.split_concatenated = enabled;
        self
    }

    /// Builder method: skip blank lines
    pub fn with_skip_blank_lines(mut self, enabled: bool) -> Self {
        self.skip_blank_lines = enabled;
        self
    }

    /// Check the configuration for values the decoder cannot work with
    pub fn validate(&self) -> Result<()> {
        if let Some(time_zero) = self.reference_time {
            if !time_zero.is_finite() {
                return Err(DecoderError::InvalidConfig(format!(
                    "reference_time must be finite, got {}",
                    time_zero
                )));
            }
        }
        Ok(())
    }
}
