//! IMU Log CLI Application
//!
//! This is the command-line interface for the IMU/GPS log decoder.
//! It uses the imu-log-decoder library and adds:
//! - Configuration files (config.toml) with command-line overrides
//! - Loading a shared time zero from the other ride logs
//! - Writing one CSV per channel and an optional JSON summary

use anyhow::{Context, Result};
use clap::Parser;
use imu_log_decoder::{Decoder, VelocityLabels};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

mod config;
mod report;

use config::AppConfig;

/// IMU Log Decoder - Split an IMU/GPS telemetry log into separate channels
#[derive(Parser, Debug)]
#[command(name = "imu-log-cli")]
#[command(about = "Decode an interleaved IMU/GPS telemetry log into channel CSVs", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the raw IMU log to decode
    #[arg(short, long, value_name = "FILE")]
    log: Option<PathBuf>,

    /// Directory to write the channel CSVs to (default: current directory)
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// File holding the time zero shared with the other ride logs
    #[arg(long, value_name = "FILE")]
    time_zero_file: Option<PathBuf>,

    /// Write the decode summary as JSON to this file
    #[arg(long, value_name = "FILE")]
    summary_json: Option<PathBuf>,

    /// Split lines that contain several concatenated sentences
    #[arg(long)]
    split_concatenated: bool,

    /// Ignore blank lines instead of counting them as corrupt
    #[arg(long)]
    skip_blank_lines: bool,

    /// Label GPS velocity columns vel_north,vel_east instead of vel_east,vel_west
    #[arg(long)]
    north_east_labels: bool,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    /// Apply command-line overrides on top of the file configuration
    fn apply(&self, app: &mut AppConfig) {
        if let Some(log) = &self.log {
            app.input.log = Some(log.clone());
        }
        if let Some(path) = &self.time_zero_file {
            app.input.time_zero_file = Some(path.clone());
        }
        if let Some(dir) = &self.output_dir {
            app.output.dir = Some(dir.clone());
        }
        if let Some(path) = &self.summary_json {
            app.output.summary_json = Some(path.clone());
        }
        if self.split_concatenated {
            app.decoder.split_concatenated = true;
        }
        if self.skip_blank_lines {
            app.decoder.skip_blank_lines = true;
        }
        if self.north_east_labels {
            app.decoder.velocity_labels = VelocityLabels::NorthEast;
        }
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("IMU Log CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using decoder library v{}", imu_log_decoder::VERSION);

    let mut app = match &args.config {
        Some(config_path) => {
            log::info!("Loading configuration from: {:?}", config_path);
            config::load_config(config_path)?
        }
        None => AppConfig::default(),
    };
    args.apply(&mut app);

    let Some(log_path) = app.input.log.clone() else {
        println!("IMU Log Decoder - No input specified");
        println!("\nQuick Start:");
        println!("  imu-log-cli --log imu.csv --output-dir Processed_Data");
        println!("  imu-log-cli --log imu.csv --time-zero-file time_zero.txt");
        println!("\nWith a configuration file:");
        println!("  imu-log-cli --config config.toml");
        println!("\nUse --help for more options");
        return Ok(());
    };

    decode_mode(&mut app, &log_path, args.quiet)
}

/// Decode the log and write every channel
fn decode_mode(app: &mut AppConfig, log_path: &Path, quiet: bool) -> Result<()> {
    let now = chrono::Local::now();
    log::info!(
        "Data processed on {} at {}",
        now.format("%m/%d/%Y"),
        now.format("%H:%M:%S")
    );

    if let Some(path) = &app.input.time_zero_file {
        let time_zero = config::read_time_zero(path)?;
        log::info!("Using shared time zero {} from {:?}", time_zero, path);
        app.decoder.reference_time = Some(time_zero);
    }

    let decoder = Decoder::with_config(app.decoder.clone())?;

    log::info!("Decoding log file: {:?}", log_path);
    let file = File::open(log_path)
        .with_context(|| format!("Failed to open log file: {:?}", log_path))?;
    let output = decoder
        .decode_reader(BufReader::new(file))
        .with_context(|| format!("Failed to read log file: {:?}", log_path))?;

    match output.summary.success_rate {
        None => log::warn!("Log file {:?} contained no packets", log_path),
        Some(rate) if rate == 0.0 => log::warn!("Every packet in {:?} was corrupt", log_path),
        Some(_) => {}
    }

    let output_dir = app.output.dir.clone().unwrap_or_else(|| PathBuf::from("."));
    report::write_channels(&output.channels, &output_dir)?;

    if let Some(path) = &app.output.summary_json {
        report::write_summary_json(&output.summary, path)?;
        log::info!("Saved summary --> {:?}", path);
    }

    if !quiet {
        report::print_summary(&output.summary, &output.channels);
    }

    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
