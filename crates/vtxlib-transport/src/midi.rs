//! MIDI port transport for amplifier communication.
//!
//! This module provides [`MidiTransport`], which implements the
//! [`Transport`] trait over a system MIDI port pair (input and output).
//! The VT-X presents as a USB-MIDI class device, so no driver beyond
//! the operating system's MIDI stack is needed.
//!
//! Incoming bytes are reassembled into complete SysEx frames on the
//! MIDI callback thread and handed to the async side through a channel;
//! non-SysEx traffic (clock, active sensing, note data) is discarded.
//!
//! # Example
//!
//! ```no_run
//! use vtxlib_transport::MidiTransport;
//! use vtxlib_core::transport::{MANUFACTURER_KORG, Transport};
//! use std::time::Duration;
//!
//! # async fn example() -> vtxlib_core::Result<()> {
//! // Connect to the first port whose name contains "VT-X".
//! let mut transport = MidiTransport::open("VT-X").await?;
//!
//! // Send a mode request payload; the transport adds the F0/F7 framing.
//! transport.send(MANUFACTURER_KORG, &[0x30, 0x00, 0x01, 0x34, 0x12]).await?;
//!
//! // Receive the response frame with a 1 second timeout.
//! let frame = transport.receive(Duration::from_secs(1)).await?;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use midir::{
    Ignore, MidiInput, MidiInputConnection, MidiInputPort, MidiOutput, MidiOutputConnection,
    MidiOutputPort,
};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, trace};

use vtxlib_core::error::{Error, Result};
use vtxlib_core::transport::{SYSEX_END, SYSEX_START, SysexFrame, Transport};

/// Client name registered with the system MIDI stack.
const CLIENT_NAME: &str = "vtxlib";

/// Reassembles SysEx frames from the raw byte chunks a MIDI backend
/// delivers.
///
/// Some backends hand over a complete SysEx message per callback,
/// others split large dumps across several. The assembler is agnostic:
/// it collects from `F0` to `F7`, drops real-time bytes interleaved
/// mid-frame, and abandons a frame cut short by another status byte.
#[derive(Debug, Default)]
struct FrameAssembler {
    buf: Vec<u8>,
    in_frame: bool,
}

impl FrameAssembler {
    fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of raw MIDI bytes; returns any frames completed.
    fn feed(&mut self, bytes: &[u8]) -> Vec<SysexFrame> {
        let mut frames = Vec::new();
        for &byte in bytes {
            match byte {
                SYSEX_START => {
                    self.buf.clear();
                    self.in_frame = true;
                }
                SYSEX_END if self.in_frame => {
                    self.in_frame = false;
                    if let Some((&manufacturer, payload)) = self.buf.split_first() {
                        frames.push(SysexFrame {
                            manufacturer,
                            payload: payload.to_vec(),
                        });
                    }
                    self.buf.clear();
                }
                // Real-time messages may be interleaved anywhere,
                // including inside a SysEx body.
                0xF8..=0xFF => {}
                b if b >= 0x80 => {
                    // Another status byte terminates an unfinished frame.
                    if self.in_frame {
                        self.in_frame = false;
                        self.buf.clear();
                    }
                }
                b => {
                    if self.in_frame {
                        self.buf.push(b);
                    }
                }
            }
        }
        frames
    }
}

/// A [`Transport`] over a system MIDI input/output port pair.
pub struct MidiTransport {
    /// Held for its side effect: dropping it closes the input stream.
    input: Option<MidiInputConnection<()>>,
    output: Option<MidiOutputConnection>,
    frames: mpsc::UnboundedReceiver<SysexFrame>,
}

impl MidiTransport {
    /// Open the first MIDI input and output ports whose names contain
    /// `port_name` (case-insensitive).
    pub async fn open(port_name: &str) -> Result<Self> {
        let mut midi_in = MidiInput::new(CLIENT_NAME)
            .map_err(|e| Error::Transport(format!("MIDI input init failed: {e}")))?;
        // midir filters SysEx out by default.
        midi_in.ignore(Ignore::None);
        let in_port = find_input_port(&midi_in, port_name)?;

        let midi_out = MidiOutput::new(CLIENT_NAME)
            .map_err(|e| Error::Transport(format!("MIDI output init failed: {e}")))?;
        let out_port = find_output_port(&midi_out, port_name)?;

        debug!(
            input = %midi_in.port_name(&in_port).unwrap_or_default(),
            output = %midi_out.port_name(&out_port).unwrap_or_default(),
            "opening MIDI ports"
        );

        let (frame_tx, frame_rx) = mpsc::unbounded_channel();
        let mut assembler = FrameAssembler::new();
        let input = midi_in
            .connect(
                &in_port,
                "vtxlib-in",
                move |_timestamp, bytes, _| {
                    for frame in assembler.feed(bytes) {
                        trace!(len = frame.payload.len(), "received SysEx frame");
                        let _ = frame_tx.send(frame);
                    }
                },
                (),
            )
            .map_err(|e| Error::Transport(format!("MIDI input connect failed: {e}")))?;

        let output = midi_out
            .connect(&out_port, "vtxlib-out")
            .map_err(|e| Error::Transport(format!("MIDI output connect failed: {e}")))?;

        Ok(MidiTransport {
            input: Some(input),
            output: Some(output),
            frames: frame_rx,
        })
    }
}

#[async_trait]
impl Transport for MidiTransport {
    async fn send(&mut self, manufacturer: u8, payload: &[u8]) -> Result<()> {
        let output = self.output.as_mut().ok_or(Error::NotConnected)?;

        if let Some(&bad) = payload.iter().find(|&&b| b >= 0x80) {
            return Err(Error::InvalidParameter(format!(
                "payload byte 0x{bad:02X} is not 7-bit clean"
            )));
        }

        let mut message = Vec::with_capacity(payload.len() + 3);
        message.push(SYSEX_START);
        message.push(manufacturer);
        message.extend_from_slice(payload);
        message.push(SYSEX_END);

        trace!(len = message.len(), "sending SysEx frame");
        output
            .send(&message)
            .map_err(|e| Error::Transport(format!("MIDI send failed: {e}")))
    }

    async fn receive(&mut self, timeout: Duration) -> Result<SysexFrame> {
        if self.output.is_none() {
            return Err(Error::NotConnected);
        }
        match tokio::time::timeout(timeout, self.frames.recv()).await {
            Ok(Some(frame)) => Ok(frame),
            Ok(None) => Err(Error::ConnectionLost),
            Err(_) => Err(Error::Timeout),
        }
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(input) = self.input.take() {
            input.close();
        }
        if let Some(output) = self.output.take() {
            output.close();
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.output.is_some()
    }
}

fn find_input_port(midi_in: &MidiInput, name: &str) -> Result<MidiInputPort> {
    let needle = name.to_lowercase();
    for port in midi_in.ports() {
        if let Ok(port_name) = midi_in.port_name(&port) {
            if port_name.to_lowercase().contains(&needle) {
                return Ok(port);
            }
        }
    }
    Err(Error::Transport(format!(
        "no MIDI input port matching {name:?}"
    )))
}

fn find_output_port(midi_out: &MidiOutput, name: &str) -> Result<MidiOutputPort> {
    let needle = name.to_lowercase();
    for port in midi_out.ports() {
        if let Ok(port_name) = midi_out.port_name(&port) {
            if port_name.to_lowercase().contains(&needle) {
                return Ok(port);
            }
        }
    }
    Err(Error::Transport(format!(
        "no MIDI output port matching {name:?}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vtxlib_core::transport::MANUFACTURER_KORG;

    #[test]
    fn assembler_extracts_a_complete_frame() {
        let mut asm = FrameAssembler::new();
        let frames = asm.feed(&[0xF0, 0x42, 0x30, 0x00, 0x01, 0x34, 0x23, 0xF7]);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].manufacturer, MANUFACTURER_KORG);
        assert_eq!(frames[0].payload, vec![0x30, 0x00, 0x01, 0x34, 0x23]);
    }

    #[test]
    fn assembler_handles_split_delivery() {
        let mut asm = FrameAssembler::new();
        assert!(asm.feed(&[0xF0, 0x42, 0x30]).is_empty());
        assert!(asm.feed(&[0x00, 0x01]).is_empty());
        let frames = asm.feed(&[0x34, 0x23, 0xF7]);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].payload, vec![0x30, 0x00, 0x01, 0x34, 0x23]);
    }

    #[test]
    fn assembler_ignores_non_sysex_traffic() {
        let mut asm = FrameAssembler::new();
        // Note-on, clock, then a frame.
        let frames = asm.feed(&[0x90, 0x40, 0x7F, 0xF8, 0xF0, 0x42, 0x23, 0xF7]);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].payload, vec![0x23]);
    }

    #[test]
    fn assembler_drops_realtime_bytes_inside_a_frame() {
        let mut asm = FrameAssembler::new();
        let frames = asm.feed(&[0xF0, 0x42, 0x30, 0xF8, 0x00, 0xFE, 0x01, 0xF7]);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].payload, vec![0x30, 0x00, 0x01]);
    }

    #[test]
    fn assembler_abandons_interrupted_frames() {
        let mut asm = FrameAssembler::new();
        // Frame cut off by a note-on, followed by a clean frame.
        let frames = asm.feed(&[0xF0, 0x42, 0x30, 0x90, 0x40, 0x7F, 0xF0, 0x42, 0x23, 0xF7]);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].payload, vec![0x23]);
    }

    #[test]
    fn assembler_yields_multiple_frames_from_one_chunk() {
        let mut asm = FrameAssembler::new();
        let frames = asm.feed(&[0xF0, 0x42, 0x01, 0xF7, 0xF0, 0x42, 0x02, 0xF7]);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].payload, vec![0x01]);
        assert_eq!(frames[1].payload, vec![0x02]);
    }

    #[test]
    fn assembler_drops_empty_frames() {
        let mut asm = FrameAssembler::new();
        // F0 immediately followed by F7: no manufacturer byte.
        assert!(asm.feed(&[0xF0, 0xF7]).is_empty());
    }
}
