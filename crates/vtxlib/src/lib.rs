//! # vtxlib -- VOX VT-X Amplifier Control
//!
//! `vtxlib` is an asynchronous Rust library for controlling VOX VT-X
//! series modeling guitar amplifiers over MIDI System Exclusive. It is
//! designed for patch editors, librarian tools, and live-performance
//! automation where reliable two-way communication with the amp is
//! essential.
//!
//! ## Quick Start
//!
//! Add `vtxlib` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! vtxlib = "0.1"
//! tokio = { version = "1", features = ["full"] }
//! ```
//!
//! Connect to an amp and read the active program:
//!
//! ```no_run
//! use vtxlib::VtxBuilder;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let amp = VtxBuilder::new()
//!         .port_name("VT-X")
//!         .build()
//!         .await?;
//!
//!     let program = amp.current_program().await?;
//!     println!("active program: {}", program.name);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! The library is organized as a workspace of focused crates:
//!
//! | Crate                 | Purpose                                       |
//! |-----------------------|-----------------------------------------------|
//! | `vtxlib-core`         | [`Transport`] trait, value types, errors      |
//! | `vtxlib-transport`    | MIDI port transport implementation            |
//! | `vtxlib-sysex`        | SysEx message codec, program records, [`VtxAmp`] |
//! | `vtxlib-test-harness` | Mock transport for hardware-free testing      |
//! | **`vtxlib`**          | This facade crate -- re-exports everything    |
//!
//! ## Event Subscription
//!
//! [`VtxAmp`] emits [`DeviceEvent`]s through a broadcast channel when
//! the amp reports a front-panel change the host did not initiate.
//! Subscribe to mirror knob turns, effect toggles, and program recalls
//! without polling:
//!
//! ```no_run
//! use vtxlib::{DeviceEvent, VtxAmp};
//! # async fn example(amp: &VtxAmp) {
//! let mut events = amp.subscribe();
//! loop {
//!     match events.recv().await {
//!         Ok(DeviceEvent::AmpDialTurned { dial, value }) => {
//!             println!("dial {dial}: {}", value.value());
//!         }
//!         Ok(event) => println!("{event:?}"),
//!         Err(_) => break,
//!     }
//! }
//! # }
//! ```
//!
//! ## Offline Library Files
//!
//! The [`file`] module reads and writes the program bank format used by
//! editor software, so patches can be archived and shared without the
//! amp connected.

pub use vtxlib_core::*;

pub use vtxlib_sysex::builder::VtxBuilder;
pub use vtxlib_sysex::device::VtxAmp;
pub use vtxlib_sysex::exchange;
pub use vtxlib_sysex::file;
pub use vtxlib_sysex::message;
pub use vtxlib_sysex::program;

pub use vtxlib_transport::MidiTransport;
