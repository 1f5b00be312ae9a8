//! # pa1010
//!
//! Driver for PA1010D-family GNSS receivers that stream NMEA text over I2C.
//!
//! The receiver is read one byte per bus transaction. Bytes are assembled into
//! `$...\r\n` sentences, the `GGA` and `RMC` sentences are decoded into a single
//! [`FixRecord`], and configuration goes back as `PMTK` commands.
//!
//! Encoding Commands
//! =================
//!
//! ```
//! use pa1010::{PmtkCommand, SentenceOutput};
//!
//! let bytes = PmtkCommand::SetNormalMode.to_bytes().unwrap();
//! assert_eq!(&bytes[..], b"$PMTK225,0*2B\r\n");
//!
//! let bytes = PmtkCommand::SetSentenceOutput(SentenceOutput::CANONICAL).to_bytes().unwrap();
//! assert!(bytes.starts_with(b"$PMTK314,0,1,0,3,"));
//! ```
//!
//! Decoding Sentences
//! ==================
//!
//! A [`Decoder`] applies sentences to a fix in place. Anything it does not
//! understand leaves the fix untouched.
//! ```
//! use pa1010::{Decoder, FixRecord, SentenceKind};
//!
//! let decoder = Decoder::default();
//! let mut fix = FixRecord::new();
//! let kind = decoder.decode(
//!     "$GNRMC,123519.00,A,4807.038,N,01131.000,E,022.4,084.4,230394,,*XX",
//!     &mut fix,
//! );
//! assert_eq!(kind, Some(SentenceKind::Rmc));
//! assert!(fix.is_valid);
//! assert_eq!(fix.latitude.as_str(), "4807.038");
//! ```
//!
//! Talking to the Receiver
//! =======================
//!
//! A [`Receiver`] runs over any [`Transport`]. [`I2cTransport`] adapts a
//! blocking `embedded-hal` bus:
//! ```ignore
//! let mut gps = Receiver::new(I2cTransport::new(i2c), StdClock::new(), ReceiverConfig::default());
//! gps.init()?;
//! loop {
//!     if gps.poll() {
//!         println!("{:?}", gps.fix());
//!     }
//! }
//! ```
//!
//! no_std Support
//! ==============
//!
//! Without the default `std` feature the crate allocates nothing: sentences,
//! commands and coordinate text live in fixed capacity `heapless` buffers. Supply
//! your own [`Clock`] and `embedded_hal::delay::DelayNs`.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "serde")]
extern crate serde;

pub use crate::{
    command::{
        encode, update_rate_ms, Ack, AckFlag, CommandBuffer, NmeaChecksum, PeriodicMode,
        PmtkCommand, SentenceOutput,
    },
    config::{ReceiverConfig, DEFAULT_CENTURY},
    constants::{MAX_COMMAND_LEN, MAX_SENTENCE_LEN, PA1010_I2C_ADDR},
    decoder::{parse_sentence, Decoder, Gga, NmeaSentence, Rmc, SentenceKind, UtcDate, UtcTime},
    error::{DecodeError, Error},
    fix::{CoordinateText, FixRecord, LatitudeHemisphere, LongitudeHemisphere},
    reader::{SentenceReader, SentenceText},
    session::Receiver,
    transport::{Clock, I2cTransport, Transport},
};

#[cfg(feature = "std")]
pub use crate::transport::StdClock;

mod command;
mod config;
mod constants;
mod decoder;
mod error;
mod fix;
mod reader;
mod session;
mod transport;
