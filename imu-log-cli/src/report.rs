//! Output generation
//!
//! Writes one CSV file per channel, the optional JSON summary, and the console report.

use anyhow::{Context, Result};
use imu_log_decoder::{Channel, ChannelTables, DecodeSummary};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Write every channel table into `dir`, returning the files written
pub fn write_channels(channels: &ChannelTables, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {:?}", dir))?;

    let mut written = Vec::with_capacity(Channel::ALL.len());
    for channel in Channel::ALL {
        let path = dir.join(channel.file_name());
        let file = File::create(&path)
            .with_context(|| format!("Failed to create {:?}", path))?;
        channels
            .write_csv(channel, BufWriter::new(file))
            .with_context(|| format!("Failed to write {} to {:?}", channel, path))?;

        log::info!("Saved {} --> {:?}", channel, path);
        written.push(path);
    }
    Ok(written)
}

/// Write the summary as pretty-printed JSON
pub fn write_summary_json(summary: &DecodeSummary, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, summary)
        .with_context(|| format!("Failed to write summary to {:?}", path))?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush summary to {:?}", path))?;
    Ok(())
}

/// Print the run summary and per-channel record counts
pub fn print_summary(summary: &DecodeSummary, channels: &ChannelTables) {
    println!("\nIMU packets:");
    println!("  Total:    {}", summary.total_packets);
    println!("  Corrupt:  {}", summary.bad_packets);
    println!("  Position: {}", summary.position_packets);
    println!("  Rate:     {}", summary.rate_packets);
    println!("  Sensor:   {}", summary.sensor_packets);
    println!("  Health:   {}", summary.health_packets);
    println!("  Decoded:  {}", summary.decoded_packets());
    match summary.success_rate {
        Some(rate) => println!("  Success:  {:.2}%", rate),
        None => println!("  Success:  n/a (no data)"),
    }

    println!("\nChannels:");
    for channel in Channel::ALL {
        println!("  {:<14} {}", channel.name(), channels.len_of(channel));
    }
}
