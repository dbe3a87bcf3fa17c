//! Per-type packet decoders
//!
//! Maps the fields of a tokenized sentence to a typed [`Packet`]:
//!
//! | Tag      | Data fields | Layout                                                |
//! |----------|-------------|-------------------------------------------------------|
//! | `$PCHRG` | >= 7        | time, lat, long, alt, pitch, roll, yaw [, heading]    |
//! | `$PCHRR` | >= 7        | time, vel north, vel east, vel up, pitch, roll, yaw rate |
//! | `$PCHRS` | >= 5        | sensor id, time, x, y, z                              |
//! | `$PCHRH` | any         | not decoded                                           |
//!
//! Times are left in the sensor unit's native clock; [`crate::clock`] rebases them.

use crate::sentence::Sentence;
use crate::types::{PacketError, SensorChannel, SentenceKind};

/// Latitude the unit reports before it has a GPS fix
pub const NULL_ISLAND_LATITUDE: &str = "0.000000";

/// A decoded sentence
#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    /// GPS position and attitude
    Position {
        time: f64,
        /// `(lat, long)`, absent while the GPS has no fix
        fix: Option<(f64, f64)>,
        /// Pitch, roll and yaw angles
        angles: [f64; 3],
    },

    /// GPS velocity and angular rates
    Rate {
        time: f64,
        /// `(north, east)`
        velocity: (f64, f64),
        /// Pitch, roll and yaw rates
        rates: [f64; 3],
    },

    /// One raw sensor reading
    Sensor {
        time: f64,
        channel: SensorChannel,
        axes: [f64; 3],
    },

    /// A sensor sentence whose id does not map to a channel
    UnlistedSensor { id: i64 },

    /// Health packets produce no data
    Health,
}

impl Packet {
    /// Timestamp carried by this packet, if any
    pub fn time(&self) -> Option<f64> {
        match self {
            Packet::Position { time, .. }
            | Packet::Rate { time, .. }
            | Packet::Sensor { time, .. } => Some(*time),
            Packet::UnlistedSensor { .. } | Packet::Health => None,
        }
    }

    /// Same packet with `time_zero` subtracted from its timestamp
    pub fn rebased(mut self, time_zero: f64) -> Self {
        match &mut self {
            Packet::Position { time, .. }
            | Packet::Rate { time, .. }
            | Packet::Sensor { time, .. } => *time -= time_zero,
            Packet::UnlistedSensor { .. } | Packet::Health => {}
        }
        self
    }

    pub fn kind(&self) -> SentenceKind {
        match self {
            Packet::Position { .. } => SentenceKind::Position,
            Packet::Rate { .. } => SentenceKind::Rate,
            Packet::Sensor { .. } | Packet::UnlistedSensor { .. } => SentenceKind::Sensor,
            Packet::Health => SentenceKind::Health,
        }
    }
}

/// Decode a tokenized sentence according to its tag
pub fn decode(sentence: &Sentence<'_>) -> Result<Packet, PacketError> {
    match sentence.kind() {
        SentenceKind::Position => decode_position(sentence),
        SentenceKind::Rate => decode_rate(sentence),
        SentenceKind::Sensor => decode_sensor(sentence),
        SentenceKind::Health => Ok(Packet::Health),
        SentenceKind::Unknown(tag) => Err(PacketError::UnrecognizedType(tag.clone())),
    }
}

fn decode_position(sentence: &Sentence<'_>) -> Result<Packet, PacketError> {
    sentence.require(SentenceKind::Position.min_data_fields())?;

    let time = sentence.number(1)?;
    let fix = if sentence.field(2) == Some(NULL_ISLAND_LATITUDE) {
        None
    } else {
        Some((sentence.number(2)?, sentence.number(3)?))
    };
    let angles = triple(sentence, 5)?;

    Ok(Packet::Position { time, fix, angles })
}

fn decode_rate(sentence: &Sentence<'_>) -> Result<Packet, PacketError> {
    sentence.require(SentenceKind::Rate.min_data_fields())?;

    Ok(Packet::Rate {
        time: sentence.number(1)?,
        velocity: (sentence.number(2)?, sentence.number(3)?),
        rates: triple(sentence, 5)?,
    })
}

fn decode_sensor(sentence: &Sentence<'_>) -> Result<Packet, PacketError> {
    sentence.require(SentenceKind::Sensor.min_data_fields())?;

    let id = sentence.integer(1)?;
    let Some(channel) = SensorChannel::from_id(id) else {
        return Ok(Packet::UnlistedSensor { id });
    };

    Ok(Packet::Sensor {
        time: sentence.number(2)?,
        channel,
        axes: triple(sentence, 3)?,
    })
}

/// Three consecutive numeric fields starting at `first`
fn triple(sentence: &Sentence<'_>, first: usize) -> Result<[f64; 3], PacketError> {
    Ok([
        sentence.number(first)?,
        sentence.number(first + 1)?,
        sentence.number(first + 2)?,
    ])
}
