//! VtxBuilder -- fluent builder for constructing [`VtxAmp`] instances.
//!
//! Separates configuration from construction so that callers can set up
//! the MIDI port name, timeout values, and event channel capacity
//! before establishing the transport connection.
//!
//! # Example
//!
//! ```no_run
//! use vtxlib_sysex::builder::VtxBuilder;
//! use std::time::Duration;
//!
//! # async fn example() -> vtxlib_core::Result<()> {
//! let amp = VtxBuilder::new()
//!     .port_name("VT-X")
//!     .command_timeout(Duration::from_millis(300))
//!     .build()
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use tokio::sync::broadcast;

use vtxlib_core::error::{Error, Result};
use vtxlib_core::transport::Transport;

use crate::device::VtxAmp;
use crate::io::spawn_io_task;

/// Fluent builder for [`VtxAmp`].
///
/// All configuration has sensible defaults, so the simplest usage is:
///
/// ```ignore
/// let amp = VtxBuilder::new()
///     .port_name("VT-X")
///     .build()
///     .await?;
/// ```
pub struct VtxBuilder {
    port_name: Option<String>,
    command_timeout: Duration,
    event_capacity: usize,
}

impl VtxBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        VtxBuilder {
            port_name: None,
            command_timeout: Duration::from_millis(500),
            event_capacity: 16,
        }
    }

    /// Set the MIDI port name to connect to.
    ///
    /// Matched as a substring against the system's port list, so
    /// `"VT-X"` finds e.g. `"VOX VT-X:VOX VT-X MIDI 1"`.
    pub fn port_name(mut self, name: &str) -> Self {
        self.port_name = Some(name.to_string());
        self
    }

    /// Set the timeout for a single request/response exchange
    /// (default: 500ms).
    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Set the capacity of the panel event broadcast channel
    /// (default: 16). Slow subscribers lose the oldest events once the
    /// channel fills, e.g. during a fast knob sweep.
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Build a [`VtxAmp`] with a caller-provided transport.
    ///
    /// This is the primary entry point for testing (pass a
    /// `MockTransport` from `vtxlib-test-harness`) and for advanced
    /// use cases where the caller manages the transport lifecycle
    /// directly.
    pub async fn build_with_transport(self, transport: Box<dyn Transport>) -> Result<VtxAmp> {
        let (event_tx, _) = broadcast::channel(self.event_capacity);
        let io = spawn_io_task(transport, event_tx.clone());
        Ok(VtxAmp::new(io, event_tx, self.command_timeout))
    }

    /// Build a [`VtxAmp`] over a system MIDI port.
    ///
    /// Requires that [`port_name()`](Self::port_name) has been called.
    pub async fn build(self) -> Result<VtxAmp> {
        let port = self
            .port_name
            .as_deref()
            .ok_or_else(|| Error::InvalidParameter("port_name is required for build()".into()))?;

        let transport = vtxlib_transport::MidiTransport::open(port).await?;
        self.build_with_transport(Box::new(transport)).await
    }
}

impl Default for VtxBuilder {
    fn default() -> Self {
        Self::new()
    }
}
