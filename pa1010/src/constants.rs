/// Default 7-bit bus address of the PA1010D receiver family.
pub const PA1010_I2C_ADDR: u8 = 0x10;
/// Register passed with every single-byte read. The receiver ignores it.
pub const PA1010_DATA_REGISTER: u8 = 0x00;

pub const NMEA_SYNC_CHAR: u8 = 0x24; // '$'
pub const NMEA_END_CHAR_1: u8 = 0x0d; // '\r' (<CR>)
pub const NMEA_END_CHAR_2: u8 = 0x0a; // '\n' (<LF>)
pub const NMEA_CHECKSUM_DELIMITER: u8 = 0x2a; // '*'
pub const NMEA_FIELD_SEPARATOR: char = ',';

/// Capacity of the sentence assembly buffer. A standard sentence is at most 82 bytes,
/// the rest leaves room for the stray newlines some firmware inserts.
pub const MAX_SENTENCE_LEN: usize = 128;
/// Capacity of an encoded outgoing command, the largest single write the receiver accepts.
pub const MAX_COMMAND_LEN: usize = 255;
/// Capacity of the latitude/longitude text fields of a fix.
pub const MAX_COORDINATE_LEN: usize = 16;

pub(crate) const TALKER_GNSS: &str = "GN";
pub(crate) const SENTENCE_GGA: &str = "GGA";
pub(crate) const SENTENCE_RMC: &str = "RMC";

/// Update rate bounds accepted by `PMTK220`, in milliseconds.
pub(crate) const MIN_UPDATE_RATE_MS: u32 = 100;
pub(crate) const MAX_UPDATE_RATE_MS: u32 = 10_000;

/// Periodic (sleep between fixes) mode bounds, in seconds.
pub(crate) const MIN_PERIODIC_SECS: u32 = 15;
pub(crate) const MAX_PERIODIC_SECS: u32 = 300;
pub(crate) const PERIODIC_SHORT_ACQUISITION_MS: u32 = 7_000;
pub(crate) const PERIODIC_LONG_ACQUISITION_MS: u32 = 30_000;

/// Highest per-fix divisor `PMTK314` accepts for a sentence.
pub(crate) const MAX_OUTPUT_DIVISOR: u8 = 5;
/// Number of divisor fields in a `PMTK314` payload.
pub(crate) const OUTPUT_FIELD_COUNT: usize = 20;

pub(crate) const PMTK_ACK: &str = "PMTK001";
pub(crate) const PMTK_SYSTEM_MESSAGE_STARTUP: &str = "$PMTK010,00";
