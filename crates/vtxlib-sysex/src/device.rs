//! VtxAmp -- the high-level handle for a connected amplifier.
//!
//! This module ties the message codec ([`message`](crate::message))
//! and the response handlers ([`exchange`](crate::exchange)) to a
//! [`Transport`](vtxlib_core::transport::Transport) to produce a
//! working device backend. Every method maps to one request/response
//! exchange on the IO task; the device processes them strictly in
//! order.

use std::time::Duration;

use tokio::sync::broadcast;
use tracing::debug;

use vtxlib_core::error::Result;
use vtxlib_core::events::DeviceEvent;
use vtxlib_core::types::{
    DeviceMode, EffectSlot, EffectType, Program, ProgramSlot, WideDial,
};

use crate::exchange::{
    ExpectAck, ExpectCurrentProgram, ExpectMode, ExpectProgramData, Pair,
};
use crate::io::DeviceIo;
use crate::message::Message;

/// A connected VOX amplifier controlled over MIDI SysEx.
///
/// Constructed via [`VtxBuilder`](crate::builder::VtxBuilder). All
/// device communication goes through the
/// [`Transport`](vtxlib_core::transport::Transport) provided at build
/// time.
pub struct VtxAmp {
    io: DeviceIo,
    event_tx: broadcast::Sender<DeviceEvent>,
    command_timeout: Duration,
}

impl Drop for VtxAmp {
    fn drop(&mut self) {
        // Graceful: signal the IO loop to exit at the next select iteration.
        self.io.cancel.cancel();
        // Safety net: abort the task in case it's stuck in a transport read
        // that doesn't respect the cancellation token (e.g. a hung MIDI
        // driver).
        self.io.task.abort();
    }
}

impl VtxAmp {
    /// Create a new `VtxAmp` from its constituent parts.
    ///
    /// This is called by [`VtxBuilder`](crate::builder::VtxBuilder);
    /// callers should use the builder API instead.
    pub(crate) fn new(
        io: DeviceIo,
        event_tx: broadcast::Sender<DeviceEvent>,
        command_timeout: Duration,
    ) -> Self {
        VtxAmp {
            io,
            event_tx,
            command_timeout,
        }
    }

    /// Subscribe to unsolicited panel events (dial turns, effect
    /// toggles, program changes made on the amplifier itself).
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.event_tx.subscribe()
    }

    /// Read whether the amplifier is in preset or manual mode.
    pub async fn current_mode(&self) -> Result<DeviceMode> {
        debug!("reading device mode");
        self.io
            .exchange(
                &[Message::CurrentModeRequest],
                ExpectMode,
                self.command_timeout,
            )
            .await
    }

    /// Read the edit buffer: the program as currently heard, including
    /// unsaved tweaks.
    pub async fn current_program(&self) -> Result<Program> {
        debug!("reading edit buffer");
        self.io
            .exchange(
                &[Message::CurrentProgramRequest],
                ExpectCurrentProgram,
                self.command_timeout,
            )
            .await
    }

    /// Replace the edit buffer without touching the stored slots.
    pub async fn set_current_program(&self, program: Program) -> Result<()> {
        debug!(name = %program.name, "writing edit buffer");
        self.io
            .exchange(
                &[Message::CurrentProgramData(program)],
                ExpectAck,
                self.command_timeout,
            )
            .await
    }

    /// Read the program stored in `slot`.
    pub async fn program(&self, slot: ProgramSlot) -> Result<Program> {
        debug!(%slot, "reading stored program");
        self.io
            .exchange(
                &[Message::ProgramRequest(slot)],
                ExpectProgramData { slot },
                self.command_timeout,
            )
            .await
    }

    /// Store a program into `slot`, overwriting its previous contents.
    pub async fn store_program(&self, slot: ProgramSlot, program: Program) -> Result<()> {
        debug!(%slot, name = %program.name, "storing program");
        self.io
            .exchange(
                &[Message::ProgramData(slot, program)],
                ExpectAck,
                self.command_timeout,
            )
            .await
    }

    /// Make `slot` the active program, discarding unsaved edits.
    pub async fn select_program(&self, slot: ProgramSlot) -> Result<()> {
        debug!(%slot, "selecting program");
        self.io
            .exchange(
                &[Message::SelectProgram(slot)],
                ExpectAck,
                self.command_timeout,
            )
            .await
    }

    /// Turn one of the amp section dials in the edit buffer.
    pub async fn set_amp_dial(&self, dial: u8, value: WideDial) -> Result<()> {
        debug!(dial, value = value.value(), "turning amp dial");
        self.io
            .exchange(
                &[Message::AmpDialTurned { dial, value }],
                ExpectAck,
                self.command_timeout,
            )
            .await
    }

    /// Turn one of an effect section's dials in the edit buffer.
    pub async fn set_effect_dial(
        &self,
        slot: EffectSlot,
        dial: u8,
        value: WideDial,
    ) -> Result<()> {
        debug!(?slot, dial, value = value.value(), "turning effect dial");
        self.io
            .exchange(
                &[Message::EffectDialTurned { slot, dial, value }],
                ExpectAck,
                self.command_timeout,
            )
            .await
    }

    /// Switch an effect section on or off in the edit buffer.
    pub async fn set_effect_enabled(&self, slot: EffectSlot, enabled: bool) -> Result<()> {
        debug!(?slot, enabled, "toggling effect");
        self.io
            .exchange(
                &[Message::EffectEnabledChanged { slot, enabled }],
                ExpectAck,
                self.command_timeout,
            )
            .await
    }

    /// Change which effect occupies a section in the edit buffer.
    pub async fn set_effect_type(&self, effect: EffectType) -> Result<()> {
        debug!(?effect, "changing effect type");
        self.io
            .exchange(
                &[Message::EffectTypeChanged(effect)],
                ExpectAck,
                self.command_timeout,
            )
            .await
    }

    /// Read the device mode and edit buffer in a single exchange.
    pub async fn status(&self) -> Result<(DeviceMode, Program)> {
        debug!("reading device status");
        self.io
            .exchange(
                &[Message::CurrentModeRequest, Message::CurrentProgramRequest],
                Pair::new(ExpectMode, ExpectCurrentProgram),
                self.command_timeout,
            )
            .await
    }
}
