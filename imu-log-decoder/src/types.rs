//! Core types for the IMU log decoder library
//!
//! This module defines the errors, sentence kinds, channel records and the run summary
//! that the decoder produces when processing a telemetry log. The decoder itself keeps
//! no state between runs - everything a run produces is described here.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for decoder operations
pub type Result<T> = std::result::Result<T, DecoderError>;

/// Run-level errors
///
/// These are the only errors that escape a decode run. Problems with individual
/// sentences are reported as [`PacketError`] and never abort the run.
#[derive(Debug, thiserror::Error)]
pub enum DecoderError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Invalid decoder configuration: {0}")]
    InvalidConfig(String),
}

/// Reasons a single line is counted as a bad packet
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PacketError {
    /// The `,*` separator is missing or the trailer is not a hex number
    #[error("Missing or malformed checksum trailer")]
    MalformedTrailer,

    #[error("Checksum mismatch: trailer says 0x{expected:02X}, body XORs to 0x{computed:02X}")]
    ChecksumMismatch { expected: u32, computed: u8 },

    #[error("Unrecognized sentence type: {0:?}")]
    UnrecognizedType(String),

    #[error("{kind} sentence has {found} data fields, needs at least {required}")]
    InsufficientFields {
        kind: SentenceKind,
        found: usize,
        required: usize,
    },

    #[error("Field {index} is not a finite number: {value:?}")]
    InvalidField { index: usize, value: String },
}

/// Sentence type, resolved once from the tag in field 0
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SentenceKind {
    /// `$PCHRG` - GPS position and Euler angles
    Position,
    /// `$PCHRR` - GPS velocity and angular rates
    Rate,
    /// `$PCHRS` - raw gyro/accelerometer/magnetometer reading
    Sensor,
    /// `$PCHRH` - health packet, carries nothing we decode
    Health,
    /// Any other tag, kept verbatim
    Unknown(String),
}

impl SentenceKind {
    /// Resolve a type tag (including the leading `$`)
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "$PCHRG" => SentenceKind::Position,
            "$PCHRR" => SentenceKind::Rate,
            "$PCHRS" => SentenceKind::Sensor,
            "$PCHRH" => SentenceKind::Health,
            other => SentenceKind::Unknown(other.to_string()),
        }
    }

    /// Minimum number of data fields (after the tag) needed to decode this kind
    pub fn min_data_fields(&self) -> usize {
        match self {
            SentenceKind::Position | SentenceKind::Rate => 7,
            SentenceKind::Sensor => 5,
            SentenceKind::Health | SentenceKind::Unknown(_) => 0,
        }
    }

    /// Index of the native timestamp field
    pub fn time_field(&self) -> usize {
        match self {
            SentenceKind::Sensor => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for SentenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentenceKind::Position => write!(f, "Position"),
            SentenceKind::Rate => write!(f, "Rate"),
            SentenceKind::Sensor => write!(f, "Sensor"),
            SentenceKind::Health => write!(f, "Health"),
            SentenceKind::Unknown(tag) => write!(f, "Unknown({})", tag),
        }
    }
}

/// Physical sensor selected by the id in field 1 of a Sensor sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorChannel {
    Gyroscope,
    Accelerometer,
    Magnetometer,
}

impl SensorChannel {
    /// Map a sensor id to its channel; ids other than 0, 1 and 2 are not routed anywhere
    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            0 => Some(SensorChannel::Gyroscope),
            1 => Some(SensorChannel::Accelerometer),
            2 => Some(SensorChannel::Magnetometer),
            _ => None,
        }
    }
}

/// A GPS fix record (`time,lat,long`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GpsFix {
    pub time: f64,
    pub lat: f64,
    pub long: f64,
}

/// A GPS velocity record, north component first
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GpsVelocity {
    pub time: f64,
    pub north: f64,
    pub east: f64,
}

/// Euler angles in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EulerAngles {
    pub time: f64,
    pub pitch: f64,
    pub roll: f64,
    pub yaw: f64,
}

/// Angular rates in degrees per second
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AngularRates {
    pub time: f64,
    pub pitch: f64,
    pub roll: f64,
    pub yaw: f64,
}

/// A three-axis reading from the gyroscope, accelerometer or magnetometer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisReading {
    pub time: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Packet accounting for one decode run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodeSummary {
    /// Every packet seen, good or bad
    pub total_packets: usize,
    /// Checksum failures, unrecognized tags and decode rejections
    pub bad_packets: usize,
    pub position_packets: usize,
    pub rate_packets: usize,
    pub sensor_packets: usize,
    pub health_packets: usize,
    /// Native timestamp that all channel times are relative to
    pub time_zero: Option<f64>,
    /// Percentage of good packets; `None` when the run saw no packets at all
    pub success_rate: Option<f64>,
}

impl DecodeSummary {
    /// Compute the success percentage for the given counters
    pub fn success_rate_of(total_packets: usize, bad_packets: usize) -> Option<f64> {
        if total_packets == 0 {
            return None;
        }
        Some(100.0 * (1.0 - bad_packets as f64 / total_packets as f64))
    }

    /// Packets that were neither bad nor consumed as the time reference
    pub fn decoded_packets(&self) -> usize {
        self.position_packets + self.rate_packets + self.sensor_packets + self.health_packets
    }
}

impl fmt::Display for DecodeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "processed {} packets, {} bad",
            self.total_packets, self.bad_packets
        )?;
        match self.success_rate {
            Some(rate) => write!(f, " ({:.2}% success)", rate),
            None => write!(f, " (n/a)"),
        }
    }
}
