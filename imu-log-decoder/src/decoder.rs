//! Main decoder API
//!
//! This module provides the primary interface for the decoder library. A [`Decoder`]
//! drives every line of a log through checksum validation, tokenization, packet
//! decoding, clock synchronization and channel routing, strictly in log order.

use crate::channels::{ChannelAccumulator, ChannelTables};
use crate::checksum::{self, SENTINEL};
use crate::clock::ClockSynchronizer;
use crate::config::DecoderConfig;
use crate::packets;
use crate::sentence::Sentence;
use crate::types::{DecodeSummary, PacketError, Result};
use std::io::BufRead;

/// The complete result of one decode run
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeOutput {
    pub channels: ChannelTables,
    pub summary: DecodeSummary,
}

/// The main decoder struct - entry point for all decoding operations
///
/// The decoder only holds its configuration; every call starts a fresh run, so decoding
/// the same input twice gives identical output.
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: DecoderConfig,
}

impl Decoder {
    /// Create a decoder with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder with a validated configuration
    pub fn with_config(config: DecoderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode a complete log held in memory
    ///
    /// # Example
    /// ```
    /// use imu_log_decoder::Decoder;
    ///
    /// let log = "$PCHRS,0,1000,0.1,0.2,0.3,*45\n$PCHRS,0,1005,0.4,0.5,0.6,*47\n";
    /// let output = Decoder::new().decode_str(log);
    ///
    /// assert_eq!(output.summary.total_packets, 2);
    /// assert_eq!(output.channels.gyroscope.records()[0].time, 5.0);
    /// ```
    pub fn decode_str(&self, text: &str) -> DecodeOutput {
        self.decode_lines(text.lines())
    }

    /// Decode a sequence of lines
    pub fn decode_lines<I, S>(&self, lines: I) -> DecodeOutput
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut run = DecodeRun::new(&self.config);
        for line in lines {
            run.feed(line.as_ref());
        }
        run.finish()
    }

    /// Decode everything a reader yields
    ///
    /// Bytes that are not valid UTF-8 are replaced, which makes the affected lines fail
    /// their checksum. Only a failing reader aborts the run.
    pub fn decode_reader<R: BufRead>(&self, reader: R) -> Result<DecodeOutput> {
        let mut run = DecodeRun::new(&self.config);
        for chunk in reader.split(b'\n') {
            let mut bytes = chunk?;
            if bytes.last() == Some(&b'\r') {
                bytes.pop();
            }
            run.feed(&String::from_utf8_lossy(&bytes));
        }
        Ok(run.finish())
    }
}

/// State threaded through a single decode run
struct DecodeRun<'a> {
    config: &'a DecoderConfig,
    clock: ClockSynchronizer,
    channels: ChannelAccumulator,
    line_number: usize,
}

impl<'a> DecodeRun<'a> {
    fn new(config: &'a DecoderConfig) -> Self {
        let clock = match config.reference_time {
            Some(time_zero) => ClockSynchronizer::with_reference(time_zero),
            None => ClockSynchronizer::new(),
        };

        log::info!(
            "Starting decode run (reference: {})",
            match config.reference_time {
                Some(time_zero) => time_zero.to_string(),
                None => "first valid sentence".to_string(),
            }
        );

        Self {
            config,
            clock,
            channels: ChannelAccumulator::new(config.velocity_labels),
            line_number: 0,
        }
    }

    /// Feed one physical line
    fn feed(&mut self, line: &str) {
        self.line_number += 1;

        if self.config.skip_blank_lines && line.trim().is_empty() {
            return;
        }

        if self.config.split_concatenated {
            for fragment in split_sentences(line) {
                self.handle(fragment);
            }
        } else {
            self.handle(line);
        }
    }

    /// Count one packet and either route it or reject it
    fn handle(&mut self, text: &str) {
        self.channels.count_packet();
        if let Err(e) = self.process(text) {
            log::debug!("Line {}: bad packet: {}", self.line_number, e);
            self.channels.reject();
        }
    }

    fn process(&mut self, text: &str) -> std::result::Result<(), PacketError> {
        let validated = checksum::verify(text)?;
        let sentence = Sentence::tokenize(validated);

        if !self.clock.is_established() {
            let raw_time = sentence.raw_time()?;
            self.clock.establish(raw_time);
            log::debug!(
                "Line {}: time zero established at {} from {}",
                self.line_number,
                raw_time,
                sentence.tag()
            );
            return Ok(());
        }

        let packet = packets::decode(&sentence)?;
        self.channels.accept(self.clock.synchronize(packet));
        Ok(())
    }

    fn finish(self) -> DecodeOutput {
        let (channels, summary) = self.channels.finish(self.clock.time_zero());
        log::info!(
            "Decode finished: {} ({} records)",
            summary,
            channels.record_count()
        );
        DecodeOutput { channels, summary }
    }
}

/// Split a physical line before every sentinel
///
/// Text ahead of the first sentinel is kept as its own fragment unless it is blank.
fn split_sentences(line: &str) -> Vec<&str> {
    let starts: Vec<usize> = line.match_indices(SENTINEL).map(|(i, _)| i).collect();

    let mut fragments = Vec::with_capacity(starts.len() + 1);
    let head = line[..starts.first().copied().unwrap_or(line.len())].trim();
    if !head.is_empty() || starts.is_empty() {
        fragments.push(head);
    }

    for (n, &start) in starts.iter().enumerate() {
        let end = starts.get(n + 1).copied().unwrap_or(line.len());
        fragments.push(line[start..end].trim());
    }
    fragments
}
