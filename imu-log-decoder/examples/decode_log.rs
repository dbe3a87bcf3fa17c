//! Standalone IMU log decoder tool
//!
//! Decodes a raw IMU/GPS telemetry log and prints the packet summary and the first
//! rows of every channel.
//!
//! Usage:
//!   decode_log <imu.csv> [--limit <rows>] [--split]
//!
//! Example:
//!   cargo run --example decode_log -- imu.csv --limit 5

use imu_log_decoder::{Channel, Decoder, DecoderConfig};
use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <imu.csv> [--limit <rows>] [--split]", args[0]);
        std::process::exit(1);
    }

    let log_path = PathBuf::from(&args[1]);
    let mut limit = 5usize;
    let mut split = false;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--limit" => {
                i += 1;
                if i < args.len() {
                    limit = args[i].parse()?;
                }
            }
            "--split" => split = true,
            other => eprintln!("Ignoring unknown argument: {}", other),
        }
        i += 1;
    }

    let config = DecoderConfig::new().with_split_concatenated(split);
    let decoder = Decoder::with_config(config)?;
    let output = decoder.decode_reader(BufReader::new(File::open(&log_path)?))?;

    println!("=== {} ===", log_path.display());
    println!("{}", output.summary);
    if let Some(time_zero) = output.summary.time_zero {
        println!("Time zero (native clock): {}", time_zero);
    }

    for channel in Channel::ALL {
        let count = output.channels.len_of(channel);
        println!("\n--- {} ({} records) ---", channel, count);

        let mut csv = Vec::new();
        output.channels.write_csv(channel, &mut csv)?;
        for line in String::from_utf8_lossy(&csv).lines().take(limit + 1) {
            println!("{}", line);
        }
        if count > limit {
            println!("... {} more", count - limit);
        }
    }

    Ok(())
}
