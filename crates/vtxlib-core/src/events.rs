//! Asynchronous device event types.
//!
//! Events are emitted through a `tokio::sync::broadcast` channel when the
//! amplifier reports a front-panel change the host did not initiate: a knob
//! turned, an effect toggled, a program recalled. Editor UIs subscribe to
//! these to mirror the physical amp without polling.

use crate::types::{EffectSlot, EffectType, ProgramSlot, WideDial};

/// An unsolicited state change reported by the amplifier.
///
/// Delivered on a best-effort basis through a bounded broadcast channel;
/// slow consumers may miss events under heavy load (e.g. a knob sweep).
#[derive(Debug, Clone)]
pub enum DeviceEvent {
    /// An amplifier-section dial moved on the front panel.
    AmpDialTurned {
        /// Raw dial index within the amp section.
        dial: u8,
        /// New dial value.
        value: WideDial,
    },

    /// An effect-section dial moved on the front panel.
    EffectDialTurned {
        /// Which effect slot the dial belongs to.
        slot: EffectSlot,
        /// Raw dial index within the slot.
        dial: u8,
        /// New dial value.
        value: WideDial,
    },

    /// An effect slot was switched on or off.
    EffectEnabledChanged {
        /// Which effect slot toggled.
        slot: EffectSlot,
        /// `true` if the slot is now active.
        enabled: bool,
    },

    /// The effect type selected in a slot changed.
    EffectTypeChanged {
        /// The new slot-qualified effect type.
        effect: EffectType,
    },

    /// A different program slot was recalled on the amp.
    ProgramSlotChanged {
        /// The newly active slot.
        slot: ProgramSlot,
    },
}
