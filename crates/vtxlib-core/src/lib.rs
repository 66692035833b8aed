//! vtxlib-core: Core traits, types, and error definitions for vtxlib.
//!
//! This crate defines the transport-agnostic abstractions the protocol
//! engine is built on. Applications depend on these types without pulling
//! in the SysEx codec or a concrete MIDI backend.
//!
//! # Key types
//!
//! - [`Transport`] -- SysEx-frame communication channel
//! - [`Program`] -- a complete amplifier configuration
//! - [`DeviceEvent`] -- asynchronous state change notifications
//! - [`Error`] / [`Result`] -- error handling

pub mod cursor;
pub mod error;
pub mod events;
pub mod transport;
pub mod types;

// Re-export key types at crate root for ergonomic `use vtxlib_core::*`.
pub use cursor::{Cursor, Writer};
pub use error::{Error, Result};
pub use events::DeviceEvent;
pub use transport::{MANUFACTURER_KORG, SYSEX_END, SYSEX_START, SysexFrame, Transport};
pub use types::*;
