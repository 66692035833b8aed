//! Transport implementations for vtxlib.
//!
//! This crate provides the concrete implementation of the
//! [`Transport`](vtxlib_core::Transport) trait from `vtxlib-core`:
//!
//! - [`MidiTransport`]: system MIDI ports, the VT-X's native USB
//!   connection
//!
//! # Example
//!
//! ```no_run
//! use vtxlib_transport::MidiTransport;
//! use vtxlib_core::transport::{MANUFACTURER_KORG, Transport};
//! use std::time::Duration;
//!
//! # async fn example() -> vtxlib_core::Result<()> {
//! // Connect to the amp's MIDI port.
//! let mut transport = MidiTransport::open("VT-X").await?;
//!
//! // Send a mode request payload.
//! transport.send(MANUFACTURER_KORG, &[0x30, 0x00, 0x01, 0x34, 0x12]).await?;
//!
//! // Receive the response frame.
//! let frame = transport.receive(Duration::from_secs(1)).await?;
//! # Ok(())
//! # }
//! ```

pub mod midi;

pub use midi::MidiTransport;
