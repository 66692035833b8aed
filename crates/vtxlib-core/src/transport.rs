//! Transport trait for amplifier communication.
//!
//! The [`Transport`] trait abstracts over the physical MIDI link to the
//! amplifier. Implementations exist for real MIDI ports (`vtxlib-transport`)
//! and for deterministic testing (`MockTransport` in `vtxlib-test-harness`).
//!
//! The protocol engine in `vtxlib-sysex` operates on a `Transport` rather
//! than directly on a MIDI port, so the same exchange logic runs against
//! hardware and against pre-scripted test frames.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::Result;

/// SysEx start-of-message marker (`F0`).
pub const SYSEX_START: u8 = 0xF0;

/// SysEx end-of-message marker (`F7`).
pub const SYSEX_END: u8 = 0xF7;

/// KORG's MIDI manufacturer ID. VOX amplifiers identify as KORG.
pub const MANUFACTURER_KORG: u8 = 0x42;

/// One complete System Exclusive message, stripped of its framing.
///
/// The `F0`/`F7` markers belong to the wire and are added/removed by the
/// transport; protocol code only ever sees the manufacturer ID and the
/// payload between them. Every payload byte is 7-bit clean (`< 0x80`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SysexFrame {
    /// Manufacturer ID byte following the `F0` marker.
    pub manufacturer: u8,
    /// Data bytes between the manufacturer ID and the `F7` terminator.
    pub payload: Vec<u8>,
}

impl SysexFrame {
    /// Create a frame addressed with KORG's manufacturer ID.
    pub fn korg(payload: Vec<u8>) -> Self {
        SysexFrame {
            manufacturer: MANUFACTURER_KORG,
            payload,
        }
    }

    /// `true` if this frame carries KORG's manufacturer ID.
    pub fn is_korg(&self) -> bool {
        self.manufacturer == MANUFACTURER_KORG
    }
}

/// Asynchronous SysEx-frame transport to the amplifier.
///
/// Implementations handle `F0`/`F7` framing, port buffering, and reassembly
/// of messages split across MIDI packets. Protocol-level concerns (message
/// prefixes, program records, exchange correlation) live above this trait.
#[async_trait]
pub trait Transport: Send {
    /// Send one SysEx message.
    ///
    /// The implementation wraps `payload` in `F0 <manufacturer> ... F7`
    /// and writes the complete message to the output port.
    async fn send(&mut self, manufacturer: u8, payload: &[u8]) -> Result<()>;

    /// Receive the next complete SysEx message.
    ///
    /// Waits up to `timeout` for a full frame to arrive; returns
    /// [`Error::Timeout`](crate::error::Error::Timeout) if none does.
    /// Non-SysEx MIDI traffic (clock, notes, CC) is discarded by the
    /// implementation and never surfaces here.
    async fn receive(&mut self, timeout: Duration) -> Result<SysexFrame>;

    /// Close the transport connection.
    ///
    /// After calling `close()`, subsequent `send()` and `receive()` calls
    /// should return [`Error::NotConnected`](crate::error::Error::NotConnected).
    async fn close(&mut self) -> Result<()>;

    /// Check whether the transport is currently connected.
    fn is_connected(&self) -> bool;
}
