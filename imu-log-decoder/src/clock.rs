//! Clock-domain synchronization
//!
//! The sensor unit's clock has an arbitrary epoch, so every channel is expressed as time
//! elapsed since a single reference: the native timestamp of the first valid sentence
//! (or a reference supplied by the caller). Once established the reference never changes.

use crate::packets::Packet;

/// State of the synchronizer
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ClockState {
    /// No reference yet
    #[default]
    Unset,
    /// Reference taken; terminal for the run
    Established { time_zero: f64 },
}

/// Rebases native timestamps onto a zero reference
#[derive(Debug, Clone, Default)]
pub struct ClockSynchronizer {
    state: ClockState,
}

impl ClockSynchronizer {
    /// Create a synchronizer waiting for its reference
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a synchronizer that is already established at `time_zero`
    pub fn with_reference(time_zero: f64) -> Self {
        Self {
            state: ClockState::Established { time_zero },
        }
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_established(&self) -> bool {
        matches!(self.state, ClockState::Established { .. })
    }

    pub fn time_zero(&self) -> Option<f64> {
        match self.state {
            ClockState::Unset => None,
            ClockState::Established { time_zero } => Some(time_zero),
        }
    }

    /// Take `raw_time` as the reference
    ///
    /// Returns `false` and leaves the reference untouched if it was already set.
    pub fn establish(&mut self, raw_time: f64) -> bool {
        match self.state {
            ClockState::Unset => {
                self.state = ClockState::Established {
                    time_zero: raw_time,
                };
                true
            }
            ClockState::Established { .. } => false,
        }
    }

    /// Rebase the timestamp carried by `packet`
    ///
    /// Packets pass through unchanged while the clock is unset.
    pub fn synchronize(&self, packet: Packet) -> Packet {
        match self.state {
            ClockState::Unset => packet,
            ClockState::Established { time_zero } => packet.rebased(time_zero),
        }
    }
}
