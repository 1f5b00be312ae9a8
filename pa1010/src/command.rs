//! Outgoing PMTK commands and their acknowledgements.
//!
//! Commands travel as `$<payload>[*<XOR checksum>]\r\n`. The checksum is the
//! XOR of every payload byte rendered as two uppercase hex digits.

use core::fmt::Write as _;

use crate::{
    constants::{
        MAX_COMMAND_LEN, MAX_OUTPUT_DIVISOR, MAX_PERIODIC_SECS, MAX_UPDATE_RATE_MS,
        MIN_PERIODIC_SECS, MIN_UPDATE_RATE_MS, NMEA_CHECKSUM_DELIMITER, NMEA_END_CHAR_1,
        NMEA_END_CHAR_2, NMEA_SYNC_CHAR, OUTPUT_FIELD_COUNT, PERIODIC_LONG_ACQUISITION_MS,
        PERIODIC_SHORT_ACQUISITION_MS, PMTK_ACK,
    },
    error::Error,
};

/// Encoded command ready for a single bus write.
pub type CommandBuffer = heapless::Vec<u8, MAX_COMMAND_LEN>;

type Payload = heapless::String<MAX_COMMAND_LEN>;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// NMEA XOR checksum calculator supporting both streaming and single-shot use
#[derive(Debug, Default, Clone, Copy)]
pub struct NmeaChecksum {
    value: u8,
}

impl NmeaChecksum {
    pub const fn new() -> Self {
        Self { value: 0 }
    }

    /// Update checksum with new bytes
    pub const fn update(&mut self, bytes: &[u8]) {
        let mut i = 0;
        while i < bytes.len() {
            self.update_byte(bytes[i]);
            i += 1;
        }
    }

    pub const fn update_byte(&mut self, byte: u8) {
        self.value ^= byte;
    }

    pub const fn result(self) -> u8 {
        self.value
    }

    /// The checksum as the two uppercase hex digits sent on the wire.
    pub const fn hex(self) -> [u8; 2] {
        [
            HEX_DIGITS[(self.value >> 4) as usize],
            HEX_DIGITS[(self.value & 0x0f) as usize],
        ]
    }

    pub const fn of(bytes: &[u8]) -> Self {
        let mut calc = Self::new();
        calc.update(bytes);
        calc
    }
}

/// Frame `payload` as a command: `$`, payload, optional `*XX` checksum, `\r\n`.
///
/// Typed commands always carry the checksum; [`crate::Receiver::send_raw`] is the
/// only way to send a payload without one.
pub fn encode(payload: &str, add_checksum: bool) -> Result<CommandBuffer, Error> {
    let payload = payload.as_bytes();
    let checksum_len = if add_checksum { 3 } else { 0 };
    let too_long = Error::CommandTooLong {
        len: payload.len() + checksum_len + 3,
        capacity: MAX_COMMAND_LEN,
    };

    let mut buf = CommandBuffer::new();
    buf.extend_from_slice(&[NMEA_SYNC_CHAR])
        .map_err(|_| too_long)?;
    buf.extend_from_slice(payload).map_err(|_| too_long)?;
    if add_checksum {
        let [hi, lo] = NmeaChecksum::of(payload).hex();
        buf.extend_from_slice(&[NMEA_CHECKSUM_DELIMITER, hi, lo])
            .map_err(|_| too_long)?;
    }
    buf.extend_from_slice(&[NMEA_END_CHAR_1, NMEA_END_CHAR_2])
        .map_err(|_| too_long)?;
    Ok(buf)
}

/// Convert a requested update interval to the `PMTK220` millisecond value,
/// clamping into the 0.1 s to 10 s range the receiver supports.
pub fn update_rate_ms(seconds_per_update: f32) -> u32 {
    // `as` saturates and maps NaN to zero, which the clamp then lifts to the minimum
    let ms = (seconds_per_update * 1000.0) as u32;
    ms.clamp(MIN_UPDATE_RATE_MS, MAX_UPDATE_RATE_MS)
}

/// Per-fix output divisors for the `PMTK314` sentence selection.
///
/// `0` disables a sentence, `n` emits it once every `n` fixes. Every sentence
/// the decoder does not understand stays disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SentenceOutput {
    pub rmc: u8,
    pub gga: u8,
}

impl SentenceOutput {
    /// RMC on every fix, GGA on every third.
    pub const CANONICAL: Self = Self { rmc: 1, gga: 3 };
    /// Both sentences on every fix.
    pub const EVERY_FIX: Self = Self { rmc: 1, gga: 1 };
}

impl Default for SentenceOutput {
    fn default() -> Self {
        Self::CANONICAL
    }
}

/// Periodic mode timings for `PMTK225,2`, all in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodicMode {
    pub short_acquisition: u32,
    pub short_sleep: u32,
    pub long_acquisition: u32,
    pub long_sleep: u32,
}

impl PeriodicMode {
    /// Timings for one navigation update every `seconds_per_update`, clamped to 15..=300 s.
    ///
    /// The upper bound keeps the receiver reachable: it cannot be woken early over the bus.
    pub fn from_seconds(seconds_per_update: u32) -> Self {
        let ms = seconds_per_update.clamp(MIN_PERIODIC_SECS, MAX_PERIODIC_SECS) * 1000;
        let short_sleep = ms - PERIODIC_SHORT_ACQUISITION_MS;
        Self {
            short_acquisition: PERIODIC_SHORT_ACQUISITION_MS,
            short_sleep,
            long_acquisition: PERIODIC_LONG_ACQUISITION_MS,
            long_sleep: short_sleep,
        }
    }
}

/// The PMTK command set this driver speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PmtkCommand {
    /// `PMTK103`, forget all aiding data and restart.
    ColdBoot,
    /// `PMTK220`, fix interval in milliseconds.
    SetUpdateRate { millis: u32 },
    /// `PMTK225,0`, resume normal continuous operation.
    SetNormalMode,
    /// `PMTK225,2,...`, sleep between fixes.
    SetPeriodicMode(PeriodicMode),
    /// `PMTK285`, pulse-per-second output (and with it the fix LED).
    SetPps { enabled: bool },
    /// `PMTK314`, which sentences are emitted.
    SetSentenceOutput(SentenceOutput),
}

impl PmtkCommand {
    /// Numeric command id echoed in `PMTK001` acknowledgements.
    pub const fn id(&self) -> u16 {
        match self {
            PmtkCommand::ColdBoot => 103,
            PmtkCommand::SetUpdateRate { .. } => 220,
            PmtkCommand::SetNormalMode | PmtkCommand::SetPeriodicMode(_) => 225,
            PmtkCommand::SetPps { .. } => 285,
            PmtkCommand::SetSentenceOutput(_) => 314,
        }
    }

    /// Render the payload text, without framing.
    pub fn payload(&self) -> Result<Payload, Error> {
        let mut out = Payload::new();
        self.write_payload(&mut out).map_err(|_| Error::CommandTooLong {
            len: out.len(),
            capacity: MAX_COMMAND_LEN,
        })?;
        Ok(out)
    }

    fn write_payload(&self, out: &mut Payload) -> core::fmt::Result {
        write!(out, "PMTK{}", self.id())?;
        match self {
            PmtkCommand::ColdBoot => Ok(()),
            PmtkCommand::SetUpdateRate { millis } => write!(out, ",{millis},0,0,0,0"),
            PmtkCommand::SetNormalMode => out.write_str(",0"),
            PmtkCommand::SetPeriodicMode(mode) => write!(
                out,
                ",2,{},{},{},{}",
                mode.short_acquisition, mode.short_sleep, mode.long_acquisition, mode.long_sleep
            ),
            PmtkCommand::SetPps { enabled: true } => out.write_str(",2,100"),
            PmtkCommand::SetPps { enabled: false } => out.write_str(",0,100"),
            PmtkCommand::SetSentenceOutput(output) => {
                let mut fields = [0u8; OUTPUT_FIELD_COUNT];
                fields[1] = output.rmc.min(MAX_OUTPUT_DIVISOR);
                fields[3] = output.gga.min(MAX_OUTPUT_DIVISOR);
                for field in fields {
                    write!(out, ",{field}")?;
                }
                Ok(())
            },
        }
    }

    /// Framed bytes ready to write to the receiver.
    pub fn to_bytes(&self) -> Result<CommandBuffer, Error> {
        encode(&self.payload()?, true)
    }
}

/// Result flag carried by a `PMTK001` acknowledgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckFlag {
    InvalidCommand,
    Unsupported,
    Failed,
    Succeeded,
}

impl AckFlag {
    fn from_digit(digit: &str) -> Option<Self> {
        match digit {
            "0" => Some(AckFlag::InvalidCommand),
            "1" => Some(AckFlag::Unsupported),
            "2" => Some(AckFlag::Failed),
            "3" => Some(AckFlag::Succeeded),
            _ => None,
        }
    }
}

/// Acknowledgement of a command: `$PMTK001,<command>,<flag>*CS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ack {
    pub command: u16,
    pub flag: AckFlag,
}

impl Ack {
    /// Parse an acknowledgement line, `None` for anything else.
    pub fn parse(sentence: &str) -> Option<Self> {
        let body = sentence.strip_prefix('$')?;
        let body = body.split('*').next().unwrap_or(body);
        let mut fields = body.split(',');
        if fields.next()? != PMTK_ACK {
            return None;
        }
        let command = fields.next()?.parse().ok()?;
        let flag = AckFlag::from_digit(fields.next()?)?;
        Some(Self { command, flag })
    }
}
