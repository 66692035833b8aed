//! Monitor front-panel activity.
//!
//! Demonstrates subscribing to the device event stream and printing all
//! events as they arrive. This is useful for building editor UIs that
//! mirror the physical amp, or for debugging device communication.
//!
//! Events include dial turns, effect toggles, effect type changes, and
//! program recalls made on the amplifier itself.
//!
//! # Requirements
//!
//! - A VOX VT-X connected via USB
//!
//! # Usage
//!
//! ```sh
//! cargo run -p vtxlib --example monitor_panel
//! ```

use std::time::Duration;

use vtxlib::{DeviceEvent, VtxBuilder};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let port_name = "VT-X";

    println!("Connecting to amp on {}...", port_name);

    let amp = VtxBuilder::new().port_name(port_name).build().await?;

    let mut events = amp.subscribe();
    println!("Subscribed to panel events. Monitoring for 60 seconds...");
    println!("(Turn a knob, toggle an effect, or recall a program to generate events)\n");

    let deadline = tokio::time::Instant::now() + Duration::from_secs(60);
    loop {
        let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
        if remaining.is_zero() {
            break;
        }
        match tokio::time::timeout(remaining, events.recv()).await {
            Ok(Ok(DeviceEvent::AmpDialTurned { dial, value })) => {
                println!("amp dial {dial}: {}", value.value());
            }
            Ok(Ok(DeviceEvent::EffectDialTurned { slot, dial, value })) => {
                println!("{slot:?} dial {dial}: {}", value.value());
            }
            Ok(Ok(DeviceEvent::EffectEnabledChanged { slot, enabled })) => {
                println!("{slot:?}: {}", if enabled { "on" } else { "off" });
            }
            Ok(Ok(DeviceEvent::EffectTypeChanged { effect })) => {
                println!("effect type: {effect:?}");
            }
            Ok(Ok(DeviceEvent::ProgramSlotChanged { slot })) => {
                println!("program recalled: {slot}");
            }
            Ok(Err(_)) => break,
            Err(_) => break,
        }
    }

    println!("Done.");
    Ok(())
}
