//! Basic amplifier control example.
//!
//! Demonstrates connecting to a VOX VT-X over MIDI, reading the device
//! mode and active program, and recalling a stored program slot.
//!
//! # Requirements
//!
//! - A VOX VT-X connected via USB
//! - The port name adjusted if your system reports the amp under a
//!   different name
//!
//! # Usage
//!
//! ```sh
//! cargo run -p vtxlib --example basic_control
//! ```

use std::time::Duration;

use vtxlib::{ProgramSlot, VtxBuilder};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Adjust this to match your system's MIDI port name.
    let port_name = "VT-X";

    println!("Connecting to amp on {}...", port_name);

    let amp = VtxBuilder::new()
        .port_name(port_name)
        .command_timeout(Duration::from_millis(300))
        .build()
        .await?;

    // Read mode and active program in one exchange.
    let (mode, program) = amp.status().await?;
    println!("Mode: {:?}", mode);
    println!("Active program: {}", program.name);
    println!("  amp model: {}", program.amp_model);
    println!("  gain: {}  volume: {}", program.gain, program.volume);

    // Dump all stored slots.
    for slot in ProgramSlot::ALL {
        let stored = amp.program(slot).await?;
        println!("{}: {}", slot, stored.name);
    }

    // Recall slot A1.
    amp.select_program(ProgramSlot::A1).await?;
    println!("Recalled A1");

    Ok(())
}
