//! VOX VT-X SysEx protocol backend for vtxlib.
//!
//! This crate implements the KORG System Exclusive dialect spoken by
//! the VOX VT-X series of modeling amplifiers. It provides:
//!
//! - **Message codec** ([`message`]) -- encode and decode the device's
//!   SysEx payloads: requests, dumps, parameter changes, and
//!   acknowledgements, dispatched by their function prefix.
//! - **Program codec** ([`program`]) -- the 62-byte file and 65-byte
//!   live program record layouts, including the chunked name region and
//!   the pedal-2 offset indicator.
//! - **Library files** ([`file`]) -- the offline program bank format
//!   used by editor software.
//! - **Response handlers** ([`exchange`]) -- resumable handlers that
//!   consume the device's replies to one exchange.
//! - **VtxAmp** ([`device`]) -- the high-level device handle that ties
//!   the codec to a [`Transport`](vtxlib_core::Transport).
//! - **VtxBuilder** ([`builder`]) -- fluent builder for constructing
//!   `VtxAmp` instances with configurable timeout and port settings.
//!
//! # Example
//!
//! ```
//! use vtxlib_sysex::message::Message;
//! use vtxlib_core::types::DeviceMode;
//!
//! // Build a "read mode" request payload.
//! let payload = Message::CurrentModeRequest.encode().unwrap();
//! assert_eq!(payload, vec![0x30, 0x00, 0x01, 0x34, 0x12]);
//!
//! // Simulate the device answering in manual mode.
//! let reply = Message::decode(&[0x30, 0x00, 0x01, 0x34, 0x42, 0x01]).unwrap();
//! assert!(matches!(reply, Message::CurrentModeResponse(DeviceMode::Manual)));
//! ```

pub mod builder;
pub mod device;
pub mod exchange;
pub mod file;
pub mod message;
pub mod program;

mod io;

pub use builder::VtxBuilder;
pub use device::VtxAmp;
