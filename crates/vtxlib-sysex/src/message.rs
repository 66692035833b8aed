//! SysEx message taxonomy and table-driven dispatch.
//!
//! Every payload the amplifier understands starts with the four-byte
//! device header, then a function prefix that selects the message type.
//! This module owns the closed [`Message`] enum, one serializer and one
//! parser per variant, and the dispatcher that tries every parser
//! against an inbound payload.
//!
//! # Payload format
//!
//! ```text
//! 30 00 01 34 <prefix> [<body>...]
//! ```
//!
//! The `F0 42 ... F7` SysEx framing and the KORG manufacturer byte are
//! the transport's concern; payloads here begin at the device header.
//! Every byte is 7-bit clean.

use bytes::{BufMut, BytesMut};

use vtxlib_core::cursor::Cursor;
use vtxlib_core::error::{Error, Result};
use vtxlib_core::events::DeviceEvent;
use vtxlib_core::types::{
    DeviceMode, EffectSlot, EffectType, Program, ProgramSlot, WideDial,
};

use crate::program;

/// Device header opening every payload: global channel byte followed by
/// the VT-X family identifier.
pub const DEVICE_HEADER: [u8; 4] = [0x30, 0x00, 0x01, 0x34];

/// Function prefix: request the edit buffer.
pub const FN_CURRENT_PROGRAM_REQUEST: u8 = 0x10;
/// Function prefix: edit buffer contents (either direction).
pub const FN_CURRENT_PROGRAM_DATA: u8 = 0x40;
/// Function prefix: request the operating mode.
pub const FN_CURRENT_MODE_REQUEST: u8 = 0x12;
/// Function prefix: operating mode report.
pub const FN_CURRENT_MODE_RESPONSE: u8 = 0x42;
/// Function prefix: request a stored program slot.
pub const FN_PROGRAM_REQUEST: u8 = 0x1C;
/// Function prefix: stored program contents (either direction).
pub const FN_PROGRAM_DATA: u8 = 0x4C;
/// Function prefix: recall a program slot.
pub const FN_SELECT_PROGRAM: u8 = 0x4E;
/// Function prefix: parameter change; the next byte selects the group.
pub const FN_PARAMETER_CHANGE: u8 = 0x41;
/// Function prefix: positive acknowledgement.
pub const FN_ACK: u8 = 0x23;
/// Function prefix: command rejected.
pub const FN_DEVICE_ERROR: u8 = 0x24;

/// Parameter-change group byte for the amplifier section.
pub const GROUP_AMP: u8 = 0x04;
/// Parameter-change group byte for effect enable toggles.
pub const GROUP_EFFECT_ENABLE: u8 = 0x02;
/// Parameter-change group byte for effect type selection.
pub const GROUP_EFFECT_TYPE: u8 = 0x03;

/// A protocol message, host-bound or amp-bound.
///
/// The taxonomy is closed: an inbound payload either maps to exactly one
/// variant or is rejected. Several variants travel in both directions
/// (the amp echoes parameter changes it makes on its own front panel).
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Ask the amp for its edit buffer.
    CurrentProgramRequest,
    /// The edit buffer, live layout.
    CurrentProgramData(Program),
    /// Ask the amp for its operating mode.
    CurrentModeRequest,
    /// The amp's operating mode.
    CurrentModeResponse(DeviceMode),
    /// Ask the amp for a stored program slot.
    ProgramRequest(ProgramSlot),
    /// A stored program slot's contents.
    ProgramData(ProgramSlot, Program),
    /// Recall a program slot.
    SelectProgram(ProgramSlot),
    /// An amplifier-section dial moved.
    AmpDialTurned {
        /// Dial index within the amp section.
        dial: u8,
        /// New dial value.
        value: WideDial,
    },
    /// An effect-section dial moved.
    EffectDialTurned {
        /// Which effect slot the dial belongs to.
        slot: EffectSlot,
        /// Dial index within the slot.
        dial: u8,
        /// New dial value.
        value: WideDial,
    },
    /// An effect slot was switched on or off.
    EffectEnabledChanged {
        /// Which slot toggled.
        slot: EffectSlot,
        /// `true` if the slot is now active.
        enabled: bool,
    },
    /// The effect type selected in a slot changed.
    EffectTypeChanged(EffectType),
    /// Positive acknowledgement of the previous command.
    Ack,
    /// The amp rejected the previous command.
    DeviceError {
        /// Error code byte from the device.
        code: u8,
    },
}

impl Message {
    /// Short name of this message kind, for logs and error reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Message::CurrentProgramRequest => "CurrentProgramRequest",
            Message::CurrentProgramData(_) => "CurrentProgramData",
            Message::CurrentModeRequest => "CurrentModeRequest",
            Message::CurrentModeResponse(_) => "CurrentModeResponse",
            Message::ProgramRequest(_) => "ProgramRequest",
            Message::ProgramData(_, _) => "ProgramData",
            Message::SelectProgram(_) => "SelectProgram",
            Message::AmpDialTurned { .. } => "AmpDialTurned",
            Message::EffectDialTurned { .. } => "EffectDialTurned",
            Message::EffectEnabledChanged { .. } => "EffectEnabledChanged",
            Message::EffectTypeChanged(_) => "EffectTypeChanged",
            Message::Ack => "Ack",
            Message::DeviceError { .. } => "DeviceError",
        }
    }

    /// Serialize this message into a SysEx payload (header included,
    /// framing excluded).
    ///
    /// Fails only when a carried value has no 7-bit-clean wire form
    /// (a dial index or wide dial outside the encodable range).
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = BytesMut::with_capacity(8);
        buf.put_slice(&DEVICE_HEADER);
        match self {
            Message::CurrentProgramRequest => {
                buf.put_u8(FN_CURRENT_PROGRAM_REQUEST);
            }
            Message::CurrentProgramData(p) => {
                buf.put_u8(FN_CURRENT_PROGRAM_DATA);
                buf.put_slice(&program::encode_live_program(p)?);
            }
            Message::CurrentModeRequest => {
                buf.put_u8(FN_CURRENT_MODE_REQUEST);
            }
            Message::CurrentModeResponse(mode) => {
                buf.put_u8(FN_CURRENT_MODE_RESPONSE);
                buf.put_u8(mode.wire());
            }
            Message::ProgramRequest(slot) => {
                buf.put_u8(FN_PROGRAM_REQUEST);
                buf.put_u8(slot.wire());
            }
            Message::ProgramData(slot, p) => {
                buf.put_u8(FN_PROGRAM_DATA);
                buf.put_u8(slot.wire());
                buf.put_slice(&program::encode_live_program(p)?);
            }
            Message::SelectProgram(slot) => {
                buf.put_u8(FN_SELECT_PROGRAM);
                buf.put_u8(slot.wire());
            }
            Message::AmpDialTurned { dial, value } => {
                check_dial_index(*dial)?;
                buf.put_u8(FN_PARAMETER_CHANGE);
                buf.put_u8(GROUP_AMP);
                buf.put_u8(*dial);
                buf.put_slice(&value.wire_bytes()?);
            }
            Message::EffectDialTurned { slot, dial, value } => {
                check_dial_index(*dial)?;
                buf.put_u8(FN_PARAMETER_CHANGE);
                buf.put_u8(slot.group());
                buf.put_u8(*dial);
                buf.put_slice(&value.wire_bytes()?);
            }
            Message::EffectEnabledChanged { slot, enabled } => {
                buf.put_u8(FN_PARAMETER_CHANGE);
                buf.put_u8(GROUP_EFFECT_ENABLE);
                buf.put_u8(slot.group());
                buf.put_u8(u8::from(*enabled));
            }
            Message::EffectTypeChanged(effect) => {
                buf.put_u8(FN_PARAMETER_CHANGE);
                buf.put_u8(GROUP_EFFECT_TYPE);
                buf.put_u8(effect.slot().group());
                buf.put_u8(effect.type_byte());
            }
            Message::Ack => {
                buf.put_u8(FN_ACK);
            }
            Message::DeviceError { code } => {
                if *code >= 0x80 {
                    return Err(Error::InvalidParameter(format!(
                        "error code 0x{code:02X} is not 7-bit clean"
                    )));
                }
                buf.put_u8(FN_DEVICE_ERROR);
                buf.put_u8(*code);
            }
        }
        Ok(buf.to_vec())
    }

    /// Decode one payload into exactly one message.
    ///
    /// Every parser in the taxonomy is tried against the payload with the
    /// cursor rewound between attempts. A parser that does not recognize
    /// the prefix passes; a parser that claims the prefix but finds a
    /// malformed body aborts dispatch with its error. Zero claimants is
    /// [`Error::UnrecognizedMessage`]; more than one is
    /// [`Error::AmbiguousMessage`] and is always reported, never resolved
    /// in favor of one parser.
    pub fn decode(payload: &[u8]) -> Result<Message> {
        dispatch(payload, PARSERS)
    }

    /// Map an unsolicited message to the event it announces, if any.
    ///
    /// Request/response traffic has no event form and returns `None`.
    pub fn event(&self) -> Option<DeviceEvent> {
        match self {
            Message::AmpDialTurned { dial, value } => Some(DeviceEvent::AmpDialTurned {
                dial: *dial,
                value: *value,
            }),
            Message::EffectDialTurned { slot, dial, value } => {
                Some(DeviceEvent::EffectDialTurned {
                    slot: *slot,
                    dial: *dial,
                    value: *value,
                })
            }
            Message::EffectEnabledChanged { slot, enabled } => {
                Some(DeviceEvent::EffectEnabledChanged {
                    slot: *slot,
                    enabled: *enabled,
                })
            }
            Message::EffectTypeChanged(effect) => {
                Some(DeviceEvent::EffectTypeChanged { effect: *effect })
            }
            Message::SelectProgram(slot) => Some(DeviceEvent::ProgramSlotChanged { slot: *slot }),
            _ => None,
        }
    }
}

/// Try every parser in `parsers` against the payload. See
/// [`Message::decode`] for the claim rules; taking the table as an
/// argument lets tests drive a deliberately overlapping one.
fn dispatch(payload: &[u8], parsers: &[MessageParser]) -> Result<Message> {
    let mut cursor = Cursor::new(payload);
    let mut matched: Option<Message> = None;
    let mut kinds: Vec<&'static str> = Vec::new();

    for parser in parsers {
        cursor.seek_to_start();
        match (parser.parse)(&mut cursor) {
            Ok(msg) => {
                if !cursor.is_empty() {
                    return Err(Error::InvalidMessage(format!(
                        "{} payload has {} trailing byte(s)",
                        parser.kind,
                        cursor.remaining()
                    )));
                }
                kinds.push(parser.kind);
                matched = Some(msg);
            }
            Err(Error::PrefixNotRecognized) => continue,
            Err(e) => return Err(e),
        }
    }

    if kinds.len() > 1 {
        return Err(Error::AmbiguousMessage { kinds });
    }
    match matched {
        Some(msg) => Ok(msg),
        None => Err(Error::UnrecognizedMessage),
    }
}

fn check_dial_index(dial: u8) -> Result<()> {
    if dial >= 0x80 {
        return Err(Error::InvalidParameter(format!(
            "dial index 0x{dial:02X} is not 7-bit clean"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Parsers
// ---------------------------------------------------------------------------

/// One entry in the dispatch table.
struct MessageParser {
    /// Kind name reported in ambiguity errors.
    kind: &'static str,
    /// Parser function. Returns [`Error::PrefixNotRecognized`] when the
    /// payload belongs to a different kind; any other error is fatal.
    parse: fn(&mut Cursor<'_>) -> Result<Message>,
}

/// The full taxonomy. Dispatch tries every entry; order carries no
/// precedence.
static PARSERS: &[MessageParser] = &[
    MessageParser {
        kind: "CurrentProgramRequest",
        parse: parse_current_program_request,
    },
    MessageParser {
        kind: "CurrentProgramData",
        parse: parse_current_program_data,
    },
    MessageParser {
        kind: "CurrentModeRequest",
        parse: parse_current_mode_request,
    },
    MessageParser {
        kind: "CurrentModeResponse",
        parse: parse_current_mode_response,
    },
    MessageParser {
        kind: "ProgramRequest",
        parse: parse_program_request,
    },
    MessageParser {
        kind: "ProgramData",
        parse: parse_program_data,
    },
    MessageParser {
        kind: "SelectProgram",
        parse: parse_select_program,
    },
    MessageParser {
        kind: "AmpDialTurned",
        parse: parse_amp_dial_turned,
    },
    MessageParser {
        kind: "EffectDialTurned",
        parse: parse_effect_dial_turned,
    },
    MessageParser {
        kind: "EffectEnabledChanged",
        parse: parse_effect_enabled_changed,
    },
    MessageParser {
        kind: "EffectTypeChanged",
        parse: parse_effect_type_changed,
    },
    MessageParser {
        kind: "Ack",
        parse: parse_ack,
    },
    MessageParser {
        kind: "DeviceError",
        parse: parse_device_error,
    },
];

/// Consume the device header and the given function prefix, or signal
/// that this payload belongs to another parser.
fn expect_prefix(cur: &mut Cursor<'_>, function: u8) -> Result<()> {
    let header = cur.next_bytes(4).map_err(|_| Error::PrefixNotRecognized)?;
    if header != DEVICE_HEADER {
        return Err(Error::PrefixNotRecognized);
    }
    match cur.next_byte() {
        Ok(b) if b == function => Ok(()),
        _ => Err(Error::PrefixNotRecognized),
    }
}

/// Like [`expect_prefix`] for the parameter-change family, where the
/// group byte after `0x41` is part of the prefix.
fn expect_parameter_prefix(cur: &mut Cursor<'_>, group: u8) -> Result<()> {
    expect_prefix(cur, FN_PARAMETER_CHANGE)?;
    match cur.next_byte() {
        Ok(b) if b == group => Ok(()),
        _ => Err(Error::PrefixNotRecognized),
    }
}

fn parse_current_program_request(cur: &mut Cursor<'_>) -> Result<Message> {
    expect_prefix(cur, FN_CURRENT_PROGRAM_REQUEST)?;
    Ok(Message::CurrentProgramRequest)
}

fn parse_current_program_data(cur: &mut Cursor<'_>) -> Result<Message> {
    expect_prefix(cur, FN_CURRENT_PROGRAM_DATA)?;
    let record = cur.next_bytes(program::LIVE_PROGRAM_LEN)?;
    Ok(Message::CurrentProgramData(program::decode_live_program(
        record,
    )?))
}

fn parse_current_mode_request(cur: &mut Cursor<'_>) -> Result<Message> {
    expect_prefix(cur, FN_CURRENT_MODE_REQUEST)?;
    Ok(Message::CurrentModeRequest)
}

fn parse_current_mode_response(cur: &mut Cursor<'_>) -> Result<Message> {
    expect_prefix(cur, FN_CURRENT_MODE_RESPONSE)?;
    let mode = DeviceMode::from_wire(cur.next_byte()?)?;
    Ok(Message::CurrentModeResponse(mode))
}

fn parse_program_request(cur: &mut Cursor<'_>) -> Result<Message> {
    expect_prefix(cur, FN_PROGRAM_REQUEST)?;
    let slot = ProgramSlot::from_wire(cur.next_byte()?)?;
    Ok(Message::ProgramRequest(slot))
}

fn parse_program_data(cur: &mut Cursor<'_>) -> Result<Message> {
    expect_prefix(cur, FN_PROGRAM_DATA)?;
    let slot = ProgramSlot::from_wire(cur.next_byte()?)?;
    let record = cur.next_bytes(program::LIVE_PROGRAM_LEN)?;
    Ok(Message::ProgramData(
        slot,
        program::decode_live_program(record)?,
    ))
}

fn parse_select_program(cur: &mut Cursor<'_>) -> Result<Message> {
    expect_prefix(cur, FN_SELECT_PROGRAM)?;
    let slot = ProgramSlot::from_wire(cur.next_byte()?)?;
    Ok(Message::SelectProgram(slot))
}

fn parse_amp_dial_turned(cur: &mut Cursor<'_>) -> Result<Message> {
    expect_parameter_prefix(cur, GROUP_AMP)?;
    let dial = cur.next_byte()?;
    let lo = cur.next_byte()?;
    let hi = cur.next_byte()?;
    Ok(Message::AmpDialTurned {
        dial,
        value: WideDial::from_wire(lo, hi),
    })
}

fn parse_effect_dial_turned(cur: &mut Cursor<'_>) -> Result<Message> {
    expect_prefix(cur, FN_PARAMETER_CHANGE)?;
    // The group byte doubles as the slot selector; a group this parser
    // does not own belongs to another parameter-change parser.
    let slot = match cur.next_byte() {
        Ok(b) => EffectSlot::from_group(b).map_err(|_| Error::PrefixNotRecognized)?,
        Err(_) => return Err(Error::PrefixNotRecognized),
    };
    let dial = cur.next_byte()?;
    let lo = cur.next_byte()?;
    let hi = cur.next_byte()?;
    Ok(Message::EffectDialTurned {
        slot,
        dial,
        value: WideDial::from_wire(lo, hi),
    })
}

fn parse_effect_enabled_changed(cur: &mut Cursor<'_>) -> Result<Message> {
    expect_parameter_prefix(cur, GROUP_EFFECT_ENABLE)?;
    let slot = EffectSlot::from_group(cur.next_byte()?)?;
    let enabled = match cur.next_byte()? {
        0x00 => false,
        0x01 => true,
        b => {
            return Err(Error::InvalidMessage(format!(
                "effect enable byte must be 00 or 01, got 0x{b:02X}"
            )));
        }
    };
    Ok(Message::EffectEnabledChanged { slot, enabled })
}

fn parse_effect_type_changed(cur: &mut Cursor<'_>) -> Result<Message> {
    expect_parameter_prefix(cur, GROUP_EFFECT_TYPE)?;
    let group = cur.next_byte()?;
    let type_byte = cur.next_byte()?;
    Ok(Message::EffectTypeChanged(EffectType::from_wire(
        group, type_byte,
    )?))
}

fn parse_ack(cur: &mut Cursor<'_>) -> Result<Message> {
    expect_prefix(cur, FN_ACK)?;
    Ok(Message::Ack)
}

fn parse_device_error(cur: &mut Cursor<'_>) -> Result<Message> {
    expect_prefix(cur, FN_DEVICE_ERROR)?;
    let code = cur.next_byte()?;
    Ok(Message::DeviceError { code })
}
