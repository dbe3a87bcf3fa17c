//! IMU Log Decoder Library
//!
//! A reusable library for demultiplexing the interleaved NMEA-style telemetry log of an
//! IMU/GPS sensor unit into separate, time-aligned channels.
//!
//! # Architecture
//!
//! This library is intentionally minimal and focused on decoding:
//! - Validates the XOR checksum trailer of every sentence
//! - Decodes `$PCHRG` (position), `$PCHRR` (rate), `$PCHRS` (sensor) and `$PCHRH` (health)
//! - Rebases the unit's native clock onto a single time zero shared by all channels
//! - Routes records into seven channel tables and counts corrupt packets
//!
//! The library does NOT:
//! - Locate, rename or move log files
//! - Rebase other (non-IMU) CSV logs
//! - Render maps or plots
//!
//! All of that belongs to the application layer (imu-log-cli).
//!
//! # Example Usage
//!
//! ```
//! use imu_log_decoder::{Channel, Decoder, DecoderConfig, VelocityLabels};
//!
//! let log = "\
//! $PCHRS,0,1000,0.1,0.2,0.3,*45
//! $PCHRS,0,1005,0.4,0.5,0.6,*47
//! garbage line
//! $PCHRG,1010,0.000000,0.0,0.0,1,2,3,*60
//! ";
//!
//! let config = DecoderConfig::new().with_velocity_labels(VelocityLabels::Legacy);
//! let decoder = Decoder::with_config(config).unwrap();
//! let output = decoder.decode_str(log);
//!
//! assert_eq!(output.summary.to_string(), "processed 4 packets, 1 bad (75.00% success)");
//! assert_eq!(output.channels.len_of(Channel::Angles), 1);
//! assert_eq!(output.channels.len_of(Channel::GpsFix), 0);
//!
//! let mut csv = Vec::new();
//! output.channels.write_csv(Channel::Gyroscope, &mut csv).unwrap();
//! assert_eq!(String::from_utf8(csv).unwrap(), "time,x_gyro,y_gyro,z_gyro\n5,0.4,0.5,0.6\n");
//! ```

// Public modules
pub mod channels;
pub mod checksum;
pub mod clock;
pub mod config;
pub mod decoder;
pub mod packets;
pub mod sentence;
pub mod types;

// Re-export main types for convenience
pub use channels::{Channel, ChannelAccumulator, ChannelRecord, ChannelTable, ChannelTables};
pub use clock::{ClockState, ClockSynchronizer};
pub use config::{DecoderConfig, VelocityLabels};
pub use decoder::{DecodeOutput, Decoder};
pub use packets::Packet;
pub use types::{
    AngularRates, AxisReading, DecodeSummary, DecoderError, EulerAngles, GpsFix, GpsVelocity,
    PacketError, Result, SensorChannel, SentenceKind,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
