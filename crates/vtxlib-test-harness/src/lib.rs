//! vtxlib-test-harness: Test utilities and mock transports for vtxlib.
//!
//! This crate provides [`MockTransport`] for deterministic unit testing
//! of the protocol engine without requiring a MIDI port or real
//! amplifier hardware.

pub mod mock_midi;

pub use mock_midi::MockTransport;
