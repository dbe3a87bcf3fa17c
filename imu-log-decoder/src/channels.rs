//! Output channels and packet accounting
//!
//! Decoded packets are routed into seven append-only tables, one per channel. Each table
//! keeps arrival order and renders as CSV with a fixed header. The accumulator also keeps
//! the running packet counters that end up in the [`DecodeSummary`].

use crate::config::VelocityLabels;
use crate::packets::Packet;
use crate::types::{
    AngularRates, AxisReading, DecodeSummary, EulerAngles, GpsFix, GpsVelocity, Result,
    SensorChannel,
};
use std::fmt;
use std::io;

/// The seven output channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    GpsFix,
    GpsVelocity,
    Angles,
    AngularRates,
    Gyroscope,
    Accelerometer,
    Magnetometer,
}

impl Channel {
    /// All channels in output order
    pub const ALL: [Channel; 7] = [
        Channel::GpsFix,
        Channel::GpsVelocity,
        Channel::Angles,
        Channel::AngularRates,
        Channel::Gyroscope,
        Channel::Accelerometer,
        Channel::Magnetometer,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Channel::GpsFix => "gps_fix",
            Channel::GpsVelocity => "gps_velocity",
            Channel::Angles => "angles",
            Channel::AngularRates => "angular_rates",
            Channel::Gyroscope => "gyroscope",
            Channel::Accelerometer => "accelerometer",
            Channel::Magnetometer => "magnetometer",
        }
    }

    /// File name the channel is conventionally saved under
    pub fn file_name(self) -> &'static str {
        match self {
            Channel::GpsFix => "gps.csv",
            Channel::GpsVelocity => "gps_velocity.csv",
            Channel::Angles => "angles.csv",
            Channel::AngularRates => "angular_rates.csv",
            Channel::Gyroscope => "gyroscope.csv",
            Channel::Accelerometer => "accelerometer.csv",
            Channel::Magnetometer => "magnetometer.csv",
        }
    }

    /// CSV header for this channel
    pub fn columns(self, velocity_labels: VelocityLabels) -> &'static [&'static str] {
        match self {
            Channel::GpsFix => &["time", "lat", "long"],
            Channel::GpsVelocity => velocity_labels.columns(),
            Channel::Angles => &["time", "pitch_angle", "roll_angle", "yaw_angle"],
            Channel::AngularRates => &["time", "pitch_rate", "roll_rate", "yaw_rate"],
            Channel::Gyroscope => &["time", "x_gyro", "y_gyro", "z_gyro"],
            Channel::Accelerometer => &["time", "x_accel", "y_accel", "z_accel"],
            Channel::Magnetometer => &[
                "time",
                "x_magnetometer",
                "y_magnetometer",
                "z_magnetometer",
            ],
        }
    }
}

impl From<SensorChannel> for Channel {
    fn from(sensor: SensorChannel) -> Self {
        match sensor {
            SensorChannel::Gyroscope => Channel::Gyroscope,
            SensorChannel::Accelerometer => Channel::Accelerometer,
            SensorChannel::Magnetometer => Channel::Magnetometer,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A record that can live in a channel table
pub trait ChannelRecord {
    /// Synchronized time in seconds
    fn time(&self) -> f64;

    /// Values after the time column, in header order
    fn values(&self) -> Vec<f64>;
}

impl ChannelRecord for GpsFix {
    fn time(&self) -> f64 {
        self.time
    }

    fn values(&self) -> Vec<f64> {
        vec![self.lat, self.long]
    }
}

impl ChannelRecord for GpsVelocity {
    fn time(&self) -> f64 {
        self.time
    }

    fn values(&self) -> Vec<f64> {
        vec![self.north, self.east]
    }
}

impl ChannelRecord for EulerAngles {
    fn time(&self) -> f64 {
        self.time
    }

    fn values(&self) -> Vec<f64> {
        vec![self.pitch, self.roll, self.yaw]
    }
}

impl ChannelRecord for AngularRates {
    fn time(&self) -> f64 {
        self.time
    }

    fn values(&self) -> Vec<f64> {
        vec![self.pitch, self.roll, self.yaw]
    }
}

impl ChannelRecord for AxisReading {
    fn time(&self) -> f64 {
        self.time
    }

    fn values(&self) -> Vec<f64> {
        vec![self.x, self.y, self.z]
    }
}

/// Append-only table of records for one channel
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelTable<R> {
    channel: Channel,
    columns: &'static [&'static str],
    records: Vec<R>,
}

impl<R: ChannelRecord> ChannelTable<R> {
    fn new(channel: Channel, velocity_labels: VelocityLabels) -> Self {
        Self {
            channel,
            columns: channel.columns(velocity_labels),
            records: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, record: R) {
        self.records.push(record);
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn columns(&self) -> &'static [&'static str] {
        self.columns
    }

    /// Records in arrival order
    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Data rows rendered as text, without the header
    pub fn rows(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        self.records.iter().map(|record| {
            let mut row = Vec::with_capacity(self.columns.len());
            row.push(format_time(record.time()));
            row.extend(record.values().into_iter().map(|v| v.to_string()));
            row
        })
    }

    /// Write the header and all rows as CSV
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<()> {
        log::debug!("Writing {} rows of {}", self.len(), self.channel());
        let mut csv_writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(writer);

        csv_writer.write_record(self.columns)?;
        for row in self.rows() {
            csv_writer.write_record(&row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Render the table as a CSV string
    pub fn to_csv_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

/// Render a synchronized time in its shortest round-trip form
///
/// The value is first snapped to the nearest nanosecond so that subtraction noise such as
/// `1000.1 - 1000.0 = 0.10000000000002274` prints as `0.1`.
fn format_time(time: f64) -> String {
    let snapped = (time * 1e9).round() / 1e9;
    if snapped == 0.0 {
        return "0".to_string();
    }
    snapped.to_string()
}

/// All seven channel tables of one decode run
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelTables {
    pub gps_fix: ChannelTable<GpsFix>,
    pub gps_velocity: ChannelTable<GpsVelocity>,
    pub angles: ChannelTable<EulerAngles>,
    pub angular_rates: ChannelTable<AngularRates>,
    pub gyroscope: ChannelTable<AxisReading>,
    pub accelerometer: ChannelTable<AxisReading>,
    pub magnetometer: ChannelTable<AxisReading>,
}

impl ChannelTables {
    pub fn new(velocity_labels: VelocityLabels) -> Self {
        Self {
            gps_fix: ChannelTable::new(Channel::GpsFix, velocity_labels),
            gps_velocity: ChannelTable::new(Channel::GpsVelocity, velocity_labels),
            angles: ChannelTable::new(Channel::Angles, velocity_labels),
            angular_rates: ChannelTable::new(Channel::AngularRates, velocity_labels),
            gyroscope: ChannelTable::new(Channel::Gyroscope, velocity_labels),
            accelerometer: ChannelTable::new(Channel::Accelerometer, velocity_labels),
            magnetometer: ChannelTable::new(Channel::Magnetometer, velocity_labels),
        }
    }

    /// Number of records in `channel`
    pub fn len_of(&self, channel: Channel) -> usize {
        match channel {
            Channel::GpsFix => self.gps_fix.len(),
            Channel::GpsVelocity => self.gps_velocity.len(),
            Channel::Angles => self.angles.len(),
            Channel::AngularRates => self.angular_rates.len(),
            Channel::Gyroscope => self.gyroscope.len(),
            Channel::Accelerometer => self.accelerometer.len(),
            Channel::Magnetometer => self.magnetometer.len(),
        }
    }

    /// Records across all channels
    pub fn record_count(&self) -> usize {
        Channel::ALL.iter().map(|&c| self.len_of(c)).sum()
    }

    /// Write one channel as CSV
    pub fn write_csv<W: io::Write>(&self, channel: Channel, writer: W) -> Result<()> {
        match channel {
            Channel::GpsFix => self.gps_fix.write_csv(writer),
            Channel::GpsVelocity => self.gps_velocity.write_csv(writer),
            Channel::Angles => self.angles.write_csv(writer),
            Channel::AngularRates => self.angular_rates.write_csv(writer),
            Channel::Gyroscope => self.gyroscope.write_csv(writer),
            Channel::Accelerometer => self.accelerometer.write_csv(writer),
            Channel::Magnetometer => self.magnetometer.write_csv(writer),
        }
    }

    fn sensor_table(&mut self, sensor: SensorChannel) -> &mut ChannelTable<AxisReading> {
        match sensor {
            SensorChannel::Gyroscope => &mut self.gyroscope,
            SensorChannel::Accelerometer => &mut self.accelerometer,
            SensorChannel::Magnetometer => &mut self.magnetometer,
        }
    }
}

/// Routes synchronized packets into channel tables and counts packets
#[derive(Debug, Clone)]
pub struct ChannelAccumulator {
    tables: ChannelTables,
    total_packets: usize,
    bad_packets: usize,
    position_packets: usize,
    rate_packets: usize,
    sensor_packets: usize,
    health_packets: usize,
}

impl ChannelAccumulator {
    pub fn new(velocity_labels: VelocityLabels) -> Self {
        Self {
            tables: ChannelTables::new(velocity_labels),
            total_packets: 0,
            bad_packets: 0,
            position_packets: 0,
            rate_packets: 0,
            sensor_packets: 0,
            health_packets: 0,
        }
    }

    /// Count a packet as seen; call once per packet before routing or rejecting it
    pub fn count_packet(&mut self) {
        self.total_packets += 1;
    }

    /// Count a packet as bad
    pub fn reject(&mut self) {
        self.bad_packets += 1;
    }

    /// Append the records carried by a synchronized packet
    pub fn accept(&mut self, packet: Packet) {
        log::trace!("Routing {:?}", packet);

        match packet {
            Packet::Position {
                time,
                fix,
                angles: [pitch, roll, yaw],
            } => {
                self.position_packets += 1;
                if let Some((lat, long)) = fix {
                    self.tables.gps_fix.push(GpsFix { time, lat, long });
                }
                self.tables.angles.push(EulerAngles {
                    time,
                    pitch,
                    roll,
                    yaw,
                });
            }
            Packet::Rate {
                time,
                velocity: (north, east),
                rates: [pitch, roll, yaw],
            } => {
                self.rate_packets += 1;
                self.tables
                    .gps_velocity
                    .push(GpsVelocity { time, north, east });
                self.tables.angular_rates.push(AngularRates {
                    time,
                    pitch,
                    roll,
                    yaw,
                });
            }
            Packet::Sensor {
                time,
                channel,
                axes: [x, y, z],
            } => {
                self.sensor_packets += 1;
                self.tables
                    .sensor_table(channel)
                    .push(AxisReading { time, x, y, z });
            }
            Packet::UnlistedSensor { id } => {
                self.sensor_packets += 1;
                log::trace!("Dropping reading from unlisted sensor id {}", id);
            }
            Packet::Health => {
                self.health_packets += 1;
            }
        }
    }

    pub fn tables(&self) -> &ChannelTables {
        &self.tables
    }

    pub fn total_packets(&self) -> usize {
        self.total_packets
    }

    pub fn bad_packets(&self) -> usize {
        self.bad_packets
    }

    /// Hand over the tables together with the finalized summary
    pub fn finish(self, time_zero: Option<f64>) -> (ChannelTables, DecodeSummary) {
        let summary = DecodeSummary {
            total_packets: self.total_packets,
            bad_packets: self.bad_packets,
            position_packets: self.position_packets,
            rate_packets: self.rate_packets,
            sensor_packets: self.sensor_packets,
            health_packets: self.health_packets,
            time_zero,
            success_rate: DecodeSummary::success_rate_of(self.total_packets, self.bad_packets),
        };
        (self.tables, summary)
    }
}
