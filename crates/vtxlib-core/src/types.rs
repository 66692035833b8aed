//! Core types used throughout vtxlib.
//!
//! Every value that crosses the wire is represented here as a validated
//! type: constructors reject out-of-range input, wire conversions reject
//! unknown bytes, and a [`Program`] can only exist fully formed.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A continuous front-panel dial position.
///
/// The amp reports dials in the range 0..=100, displayed to the player
/// as 0.0--10.0 in 0.1 steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Dial(u8);

impl Dial {
    /// Maximum raw dial value (displayed as 10.0).
    pub const MAX: u8 = 100;

    /// Create a dial position from a raw value in 0..=100.
    pub fn new(value: u8) -> Result<Self> {
        if value > Self::MAX {
            return Err(Error::InvalidParameter(format!(
                "dial value {value} exceeds maximum {}",
                Self::MAX
            )));
        }
        Ok(Dial(value))
    }

    /// The raw value in 0..=100.
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Wire encoding (identical to the raw value, always 7-bit clean).
    pub fn wire(&self) -> u8 {
        self.0
    }

    /// Decode a dial byte from the wire.
    pub fn from_wire(byte: u8) -> Result<Self> {
        if byte > Self::MAX {
            return Err(Error::InvalidMessage(format!(
                "dial byte 0x{byte:02X} exceeds maximum {}",
                Self::MAX
            )));
        }
        Ok(Dial(byte))
    }
}

impl fmt::Display for Dial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

/// A high-resolution dial carried as two 7-bit bytes on the wire.
///
/// Used for time- and rate-valued effect parameters (delay time in
/// milliseconds, modulation speed in millihertz). The wire form is a
/// 14-bit little-endian split: low 7 bits first, then the high 7 bits.
///
/// Decoding is total over any two bytes via
/// `semantic = wire - floor(wire / 256) * 128`, which is why the
/// constructor accepts values up to [`WideDial::MAX`] even though only
/// values up to [`WideDial::WIRE_MAX`] can be written back as two
/// 7-bit-clean bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WideDial(u16);

impl WideDial {
    /// Largest value the decode formula can produce from any byte pair.
    pub const MAX: u16 = 32895;

    /// Largest value expressible as two 7-bit-clean wire bytes.
    pub const WIRE_MAX: u16 = 0x3FFF;

    /// Create a wide dial from a semantic value.
    pub fn new(value: u16) -> Result<Self> {
        if value > Self::MAX {
            return Err(Error::InvalidParameter(format!(
                "wide dial value {value} exceeds maximum {}",
                Self::MAX
            )));
        }
        Ok(WideDial(value))
    }

    /// The semantic value (milliseconds or millihertz).
    pub fn value(&self) -> u16 {
        self.0
    }

    /// Decode from two wire bytes, low byte first.
    ///
    /// Total over all inputs: `semantic = wire - floor(wire/256) * 128`,
    /// which for 7-bit-clean bytes reduces to `lo + 128 * hi`.
    pub fn from_wire(lo: u8, hi: u8) -> Self {
        let wire = u16::from_le_bytes([lo, hi]);
        WideDial(wire - (wire / 256) * 128)
    }

    /// Encode as two 7-bit-clean wire bytes, low byte first.
    ///
    /// Fails for values above [`WIRE_MAX`](Self::WIRE_MAX),
    /// which have no plain two-byte representation. The program codec
    /// reaches those values only through the pedal-2 offset marker.
    pub fn wire_bytes(&self) -> Result<[u8; 2]> {
        if self.0 > Self::WIRE_MAX {
            return Err(Error::InvalidParameter(format!(
                "wide dial value {} exceeds wire maximum {}",
                self.0,
                Self::WIRE_MAX
            )));
        }
        Ok([(self.0 & 0x7F) as u8, (self.0 >> 7) as u8])
    }
}

impl fmt::Display for WideDial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A program name: up to 16 printable ASCII characters.
///
/// Stored without padding; the wire form is exactly 16 bytes, padded
/// with trailing spaces. Trailing whitespace is therefore not
/// representable and is rejected at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProgramName(String);

impl ProgramName {
    /// Maximum name length in characters.
    pub const MAX_LEN: usize = 16;

    /// Encoded length on the wire.
    pub const WIRE_LEN: usize = 16;

    /// Create a program name, validating length and character set.
    pub fn new(name: &str) -> Result<Self> {
        if name.len() > Self::MAX_LEN {
            return Err(Error::InvalidParameter(format!(
                "program name '{name}' exceeds {} characters",
                Self::MAX_LEN
            )));
        }
        if !name.bytes().all(|b| (0x20..0x7F).contains(&b)) {
            return Err(Error::InvalidParameter(format!(
                "program name '{name}' contains non-printable or non-ASCII characters"
            )));
        }
        if name.ends_with(' ') {
            return Err(Error::InvalidParameter(format!(
                "program name '{name}' has trailing whitespace"
            )));
        }
        Ok(ProgramName(name.to_string()))
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Encode to the fixed 16-byte space-padded wire form.
    pub fn encode(&self) -> [u8; Self::WIRE_LEN] {
        let mut out = [b' '; Self::WIRE_LEN];
        out[..self.0.len()].copy_from_slice(self.0.as_bytes());
        out
    }

    /// Decode from the 16-byte wire form, trimming trailing padding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != Self::WIRE_LEN {
            return Err(Error::InvalidMessage(format!(
                "program name field is {} bytes, expected {}",
                bytes.len(),
                Self::WIRE_LEN
            )));
        }
        if !bytes.iter().all(|b| (0x20..0x7F).contains(b)) {
            return Err(Error::InvalidMessage(
                "program name contains non-printable bytes".into(),
            ));
        }
        let s = std::str::from_utf8(bytes)
            .map_err(|_| Error::InvalidMessage("program name is not valid ASCII".into()))?;
        Ok(ProgramName(s.trim_end_matches(' ').to_string()))
    }
}

impl fmt::Display for ProgramName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Amplifier circuit model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AmpModel {
    /// Blackface American clean.
    DeluxeCl,
    /// Tweed-era 4x10 combo.
    Tweed4x10,
    /// Boutique clean channel.
    BoutiqueCl,
    /// Boutique overdrive channel.
    BoutiqueOd,
    /// VOX AC30 normal channel.
    VoxAc30,
    /// VOX AC30 top boost channel.
    VoxAc30Tb,
    /// 1959 British plexi, treble channel.
    Brit1959Treble,
    /// British 800-series master volume head.
    Brit800,
    /// Modern British valve master.
    BritVm,
    /// Californian hot-rodded overdrive.
    SlOd,
    /// High-gain rectifier head.
    DoubleRec,
}

impl AmpModel {
    /// All models in wire order.
    pub const ALL: [AmpModel; 11] = [
        AmpModel::DeluxeCl,
        AmpModel::Tweed4x10,
        AmpModel::BoutiqueCl,
        AmpModel::BoutiqueOd,
        AmpModel::VoxAc30,
        AmpModel::VoxAc30Tb,
        AmpModel::Brit1959Treble,
        AmpModel::Brit800,
        AmpModel::BritVm,
        AmpModel::SlOd,
        AmpModel::DoubleRec,
    ];

    /// Decode an amp model byte.
    pub fn from_wire(value: u8) -> Result<Self> {
        match value {
            0x00 => Ok(AmpModel::DeluxeCl),
            0x01 => Ok(AmpModel::Tweed4x10),
            0x02 => Ok(AmpModel::BoutiqueCl),
            0x03 => Ok(AmpModel::BoutiqueOd),
            0x04 => Ok(AmpModel::VoxAc30),
            0x05 => Ok(AmpModel::VoxAc30Tb),
            0x06 => Ok(AmpModel::Brit1959Treble),
            0x07 => Ok(AmpModel::Brit800),
            0x08 => Ok(AmpModel::BritVm),
            0x09 => Ok(AmpModel::SlOd),
            0x0A => Ok(AmpModel::DoubleRec),
            _ => Err(Error::UnknownEnumValue {
                what: "amp model",
                value,
            }),
        }
    }

    /// The wire byte for this model.
    pub fn wire(&self) -> u8 {
        match self {
            AmpModel::DeluxeCl => 0x00,
            AmpModel::Tweed4x10 => 0x01,
            AmpModel::BoutiqueCl => 0x02,
            AmpModel::BoutiqueOd => 0x03,
            AmpModel::VoxAc30 => 0x04,
            AmpModel::VoxAc30Tb => 0x05,
            AmpModel::Brit1959Treble => 0x06,
            AmpModel::Brit800 => 0x07,
            AmpModel::BritVm => 0x08,
            AmpModel::SlOd => 0x09,
            AmpModel::DoubleRec => 0x0A,
        }
    }
}

impl fmt::Display for AmpModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AmpModel::DeluxeCl => "DELUXE CL",
            AmpModel::Tweed4x10 => "TWEED 4x10",
            AmpModel::BoutiqueCl => "BOUTIQUE CL",
            AmpModel::BoutiqueOd => "BOUTIQUE OD",
            AmpModel::VoxAc30 => "VOX AC30",
            AmpModel::VoxAc30Tb => "VOX AC30TB",
            AmpModel::Brit1959Treble => "BRIT 1959 TRBL",
            AmpModel::Brit800 => "BRIT 800",
            AmpModel::BritVm => "BRIT VM",
            AmpModel::SlOd => "SL-OD",
            AmpModel::DoubleRec => "DOUBLE REC",
        };
        write!(f, "{s}")
    }
}

/// Power amp operating class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AmpClass {
    /// Class A operation.
    A,
    /// Class AB operation.
    AB,
}

impl AmpClass {
    /// Decode an operating class byte.
    pub fn from_wire(value: u8) -> Result<Self> {
        match value {
            0x00 => Ok(AmpClass::A),
            0x01 => Ok(AmpClass::AB),
            _ => Err(Error::UnknownEnumValue {
                what: "amp class",
                value,
            }),
        }
    }

    /// The wire byte for this class.
    pub fn wire(&self) -> u8 {
        match self {
            AmpClass::A => 0x00,
            AmpClass::AB => 0x01,
        }
    }
}

impl fmt::Display for AmpClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmpClass::A => write!(f, "CLASS A"),
            AmpClass::AB => write!(f, "CLASS AB"),
        }
    }
}

/// Virtual power-tube bias setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TubeBias {
    /// Bias shift disabled.
    Off,
    /// Cold bias (earlier crossover distortion).
    Cold,
    /// Hot bias (more compression and sag).
    Hot,
}

impl TubeBias {
    /// Decode a tube bias byte.
    pub fn from_wire(value: u8) -> Result<Self> {
        match value {
            0x00 => Ok(TubeBias::Off),
            0x01 => Ok(TubeBias::Cold),
            0x02 => Ok(TubeBias::Hot),
            _ => Err(Error::UnknownEnumValue {
                what: "tube bias",
                value,
            }),
        }
    }

    /// The wire byte for this setting.
    pub fn wire(&self) -> u8 {
        match self {
            TubeBias::Off => 0x00,
            TubeBias::Cold => 0x01,
            TubeBias::Hot => 0x02,
        }
    }
}

impl fmt::Display for TubeBias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TubeBias::Off => "OFF",
            TubeBias::Cold => "COLD",
            TubeBias::Hot => "HOT",
        };
        write!(f, "{s}")
    }
}

/// Effect type in the pedal-1 slot (drive, compression, modulation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pedal1Type {
    Comp,
    Chorus,
    Overdrive,
    GoldDrive,
    TrebleBoost,
    RcTurbo,
    OrangeDist,
    FatDist,
    BritLead,
    MetalDist,
}

impl Pedal1Type {
    /// Decode a pedal-1 effect type byte.
    pub fn from_wire(value: u8) -> Result<Self> {
        match value {
            0x00 => Ok(Pedal1Type::Comp),
            0x01 => Ok(Pedal1Type::Chorus),
            0x02 => Ok(Pedal1Type::Overdrive),
            0x03 => Ok(Pedal1Type::GoldDrive),
            0x04 => Ok(Pedal1Type::TrebleBoost),
            0x05 => Ok(Pedal1Type::RcTurbo),
            0x06 => Ok(Pedal1Type::OrangeDist),
            0x07 => Ok(Pedal1Type::FatDist),
            0x08 => Ok(Pedal1Type::BritLead),
            0x09 => Ok(Pedal1Type::MetalDist),
            _ => Err(Error::UnknownEnumValue {
                what: "pedal-1 type",
                value,
            }),
        }
    }

    /// The wire byte for this effect type.
    pub fn wire(&self) -> u8 {
        match self {
            Pedal1Type::Comp => 0x00,
            Pedal1Type::Chorus => 0x01,
            Pedal1Type::Overdrive => 0x02,
            Pedal1Type::GoldDrive => 0x03,
            Pedal1Type::TrebleBoost => 0x04,
            Pedal1Type::RcTurbo => 0x05,
            Pedal1Type::OrangeDist => 0x06,
            Pedal1Type::FatDist => 0x07,
            Pedal1Type::BritLead => 0x08,
            Pedal1Type::MetalDist => 0x09,
        }
    }
}

/// Effect type in the pedal-2 slot (modulation and delay).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pedal2Type {
    Flanger,
    BlkPhaser,
    OrgPhaser,
    Tremolo,
    TapeEcho,
    SwDelay,
}

impl Pedal2Type {
    /// Decode a pedal-2 effect type byte.
    pub fn from_wire(value: u8) -> Result<Self> {
        match value {
            0x00 => Ok(Pedal2Type::Flanger),
            0x01 => Ok(Pedal2Type::BlkPhaser),
            0x02 => Ok(Pedal2Type::OrgPhaser),
            0x03 => Ok(Pedal2Type::Tremolo),
            0x04 => Ok(Pedal2Type::TapeEcho),
            0x05 => Ok(Pedal2Type::SwDelay),
            _ => Err(Error::UnknownEnumValue {
                what: "pedal-2 type",
                value,
            }),
        }
    }

    /// The wire byte for this effect type.
    pub fn wire(&self) -> u8 {
        match self {
            Pedal2Type::Flanger => 0x00,
            Pedal2Type::BlkPhaser => 0x01,
            Pedal2Type::OrgPhaser => 0x02,
            Pedal2Type::Tremolo => 0x03,
            Pedal2Type::TapeEcho => 0x04,
            Pedal2Type::SwDelay => 0x05,
        }
    }
}

/// Reverb algorithm in the reverb slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReverbType {
    Room,
    Spring,
    Hall,
    Plate,
}

impl ReverbType {
    /// Decode a reverb type byte.
    pub fn from_wire(value: u8) -> Result<Self> {
        match value {
            0x00 => Ok(ReverbType::Room),
            0x01 => Ok(ReverbType::Spring),
            0x02 => Ok(ReverbType::Hall),
            0x03 => Ok(ReverbType::Plate),
            _ => Err(Error::UnknownEnumValue {
                what: "reverb type",
                value,
            }),
        }
    }

    /// The wire byte for this reverb type.
    pub fn wire(&self) -> u8 {
        match self {
            ReverbType::Room => 0x00,
            ReverbType::Spring => 0x01,
            ReverbType::Hall => 0x02,
            ReverbType::Plate => 0x03,
        }
    }
}

/// One of the eight user program slots, banks A and B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProgramSlot {
    A1,
    A2,
    A3,
    A4,
    B1,
    B2,
    B3,
    B4,
}

impl ProgramSlot {
    /// All slots in wire order.
    pub const ALL: [ProgramSlot; 8] = [
        ProgramSlot::A1,
        ProgramSlot::A2,
        ProgramSlot::A3,
        ProgramSlot::A4,
        ProgramSlot::B1,
        ProgramSlot::B2,
        ProgramSlot::B3,
        ProgramSlot::B4,
    ];

    /// Decode a slot byte.
    pub fn from_wire(value: u8) -> Result<Self> {
        match value {
            0x00 => Ok(ProgramSlot::A1),
            0x01 => Ok(ProgramSlot::A2),
            0x02 => Ok(ProgramSlot::A3),
            0x03 => Ok(ProgramSlot::A4),
            0x04 => Ok(ProgramSlot::B1),
            0x05 => Ok(ProgramSlot::B2),
            0x06 => Ok(ProgramSlot::B3),
            0x07 => Ok(ProgramSlot::B4),
            _ => Err(Error::UnknownEnumValue {
                what: "program slot",
                value,
            }),
        }
    }

    /// The wire byte for this slot.
    pub fn wire(&self) -> u8 {
        match self {
            ProgramSlot::A1 => 0x00,
            ProgramSlot::A2 => 0x01,
            ProgramSlot::A3 => 0x02,
            ProgramSlot::A4 => 0x03,
            ProgramSlot::B1 => 0x04,
            ProgramSlot::B2 => 0x05,
            ProgramSlot::B3 => 0x06,
            ProgramSlot::B4 => 0x07,
        }
    }
}

impl fmt::Display for ProgramSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProgramSlot::A1 => "A1",
            ProgramSlot::A2 => "A2",
            ProgramSlot::A3 => "A3",
            ProgramSlot::A4 => "A4",
            ProgramSlot::B1 => "B1",
            ProgramSlot::B2 => "B2",
            ProgramSlot::B3 => "B3",
            ProgramSlot::B4 => "B4",
        };
        write!(f, "{s}")
    }
}

/// Error returned when a string cannot be parsed into a [`ProgramSlot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSlotError(String);

impl fmt::Display for ParseSlotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown program slot: '{}'. Expected A1-A4 or B1-B4", self.0)
    }
}

impl std::error::Error for ParseSlotError {}

impl FromStr for ProgramSlot {
    type Err = ParseSlotError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "A1" => Ok(ProgramSlot::A1),
            "A2" => Ok(ProgramSlot::A2),
            "A3" => Ok(ProgramSlot::A3),
            "A4" => Ok(ProgramSlot::A4),
            "B1" => Ok(ProgramSlot::B1),
            "B2" => Ok(ProgramSlot::B2),
            "B3" => Ok(ProgramSlot::B3),
            "B4" => Ok(ProgramSlot::B4),
            _ => Err(ParseSlotError(s.to_string())),
        }
    }
}

/// Front-panel operating mode of the amplifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceMode {
    /// A stored program slot is active.
    Preset,
    /// Manual mode: the physical knob positions are live.
    Manual,
}

impl DeviceMode {
    /// Decode a mode byte.
    pub fn from_wire(value: u8) -> Result<Self> {
        match value {
            0x00 => Ok(DeviceMode::Preset),
            0x01 => Ok(DeviceMode::Manual),
            _ => Err(Error::UnknownEnumValue {
                what: "device mode",
                value,
            }),
        }
    }

    /// The wire byte for this mode.
    pub fn wire(&self) -> u8 {
        match self {
            DeviceMode::Preset => 0x00,
            DeviceMode::Manual => 0x01,
        }
    }
}

impl fmt::Display for DeviceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceMode::Preset => write!(f, "PRESET"),
            DeviceMode::Manual => write!(f, "MANUAL"),
        }
    }
}

/// One of the three effect slots in the signal chain.
///
/// Each slot has a protocol group byte (used in dial-turned and
/// enable/type-change messages) and a bit position in the program
/// record's enable-flags byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectSlot {
    /// Drive/compression/modulation slot before the amp.
    Pedal1,
    /// Modulation/delay slot after the amp.
    Pedal2,
    /// Reverb slot at the end of the chain.
    Reverb,
}

impl EffectSlot {
    /// The protocol group byte identifying this slot.
    pub fn group(&self) -> u8 {
        match self {
            EffectSlot::Pedal1 => 0x05,
            EffectSlot::Pedal2 => 0x06,
            EffectSlot::Reverb => 0x08,
        }
    }

    /// Decode a slot group byte.
    pub fn from_group(value: u8) -> Result<Self> {
        match value {
            0x05 => Ok(EffectSlot::Pedal1),
            0x06 => Ok(EffectSlot::Pedal2),
            0x08 => Ok(EffectSlot::Reverb),
            _ => Err(Error::UnknownEnumValue {
                what: "effect slot group",
                value,
            }),
        }
    }

    /// This slot's bit in the program record's enable-flags byte.
    pub fn flag_bit(&self) -> u8 {
        match self {
            EffectSlot::Pedal1 => 0x01,
            EffectSlot::Pedal2 => 0x02,
            EffectSlot::Reverb => 0x04,
        }
    }
}

impl fmt::Display for EffectSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EffectSlot::Pedal1 => "PEDAL1",
            EffectSlot::Pedal2 => "PEDAL2",
            EffectSlot::Reverb => "REVERB",
        };
        write!(f, "{s}")
    }
}

/// A slot-qualified effect type selection.
///
/// Ties a type byte to the slot it belongs to, so a type-change message
/// can never apply a reverb algorithm to a pedal slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectType {
    Pedal1(Pedal1Type),
    Pedal2(Pedal2Type),
    Reverb(ReverbType),
}

impl EffectType {
    /// The slot this type selection applies to.
    pub fn slot(&self) -> EffectSlot {
        match self {
            EffectType::Pedal1(_) => EffectSlot::Pedal1,
            EffectType::Pedal2(_) => EffectSlot::Pedal2,
            EffectType::Reverb(_) => EffectSlot::Reverb,
        }
    }

    /// The type byte within the slot.
    pub fn type_byte(&self) -> u8 {
        match self {
            EffectType::Pedal1(t) => t.wire(),
            EffectType::Pedal2(t) => t.wire(),
            EffectType::Reverb(t) => t.wire(),
        }
    }

    /// Decode a slot group byte plus a type byte.
    pub fn from_wire(group: u8, type_byte: u8) -> Result<Self> {
        match EffectSlot::from_group(group)? {
            EffectSlot::Pedal1 => Ok(EffectType::Pedal1(Pedal1Type::from_wire(type_byte)?)),
            EffectSlot::Pedal2 => Ok(EffectType::Pedal2(Pedal2Type::from_wire(type_byte)?)),
            EffectSlot::Reverb => Ok(EffectType::Reverb(ReverbType::from_wire(type_byte)?)),
        }
    }
}

/// Pedal-1 slot settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pedal1 {
    /// Whether this slot is active.
    pub enabled: bool,
    /// Selected effect type.
    pub effect: Pedal1Type,
    /// Modulation/drive speed in millihertz.
    pub speed: WideDial,
    pub depth: Dial,
    pub manual: Dial,
    pub mix: Dial,
    pub blend: Dial,
    pub level: Dial,
}

/// Pedal-2 slot settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pedal2 {
    /// Whether this slot is active.
    pub enabled: bool,
    /// Selected effect type.
    pub effect: Pedal2Type,
    /// Delay time in milliseconds.
    pub time: WideDial,
    pub feedback: Dial,
    pub tone: Dial,
    pub mod_speed: Dial,
    pub mod_depth: Dial,
    pub level: Dial,
}

/// Reverb slot settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reverb {
    /// Whether this slot is active.
    pub enabled: bool,
    /// Selected reverb algorithm.
    pub effect: ReverbType,
    pub mix: Dial,
    pub time: Dial,
    pub pre_delay: Dial,
    pub low_damp: Dial,
    pub high_damp: Dial,
}

/// A complete amplifier configuration.
///
/// This is the unit of transfer for program upload/download and the
/// record stored in each of the eight user slots. A `Program` is only
/// ever constructed whole: decoding either wire layout produces a fully
/// validated value or an error, never a partially-applied state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    /// User-visible program name.
    pub name: ProgramName,
    /// Amplifier circuit model.
    pub amp_model: AmpModel,
    /// Power amp operating class.
    pub amp_class: AmpClass,
    /// Virtual power-tube bias.
    pub tube_bias: TubeBias,
    pub gain: Dial,
    pub treble: Dial,
    pub middle: Dial,
    pub bass: Dial,
    pub volume: Dial,
    pub presence: Dial,
    pub resonance: Dial,
    /// Noise-reduction sensitivity.
    pub nr_sense: Dial,
    /// Bright cap on the volume pot.
    pub bright_cap: bool,
    /// Low-frequency cut.
    pub low_cut: bool,
    /// Mid-frequency boost.
    pub mid_boost: bool,
    /// Pedal-1 effect slot.
    pub pedal1: Pedal1,
    /// Pedal-2 effect slot.
    pub pedal2: Pedal2,
    /// Reverb slot.
    pub reverb: Reverb,
}
