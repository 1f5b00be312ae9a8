use crate::{
    command::SentenceOutput,
    constants::{PA1010_DATA_REGISTER, PA1010_I2C_ADDR},
};

/// Century added to the two digit year of RMC dates.
///
/// Fixed on purpose: dates from 2100 on come out wrong, and moving the offset
/// changes every reported date.
pub const DEFAULT_CENTURY: u16 = 2000;

/// Tunables of a [`crate::Receiver`] session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReceiverConfig {
    /// 7-bit bus address of the receiver.
    pub address: u8,
    /// Register sent with every single byte read.
    pub register: u8,
    /// Deadline for each sentence read while polling.
    pub poll_deadline_ms: u32,
    /// Extra time granted once a `$` has been seen, so a sentence that already
    /// started is not dropped by a deadline tuned for "no data yet".
    pub start_grace_ms: u32,
    /// Per-read deadline while waking the receiver or waiting for an acknowledgement.
    pub recovery_deadline_ms: u32,
    /// Pause before retrying the resume command, and after bus errors during recovery.
    pub recovery_delay_ms: u32,
    pub century: u16,
    /// Sentences the receiver is told to emit after initialization.
    pub output: SentenceOutput,
    /// Sentences inspected while waiting for an acknowledgement before giving up.
    pub ack_attempts: u16,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            address: PA1010_I2C_ADDR,
            register: PA1010_DATA_REGISTER,
            poll_deadline_ms: 50,
            start_grace_ms: 100,
            recovery_deadline_ms: 1_000,
            recovery_delay_ms: 100,
            century: DEFAULT_CENTURY,
            output: SentenceOutput::CANONICAL,
            ack_attempts: 10,
        }
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: ReceiverConfig =
            serde_json::from_str(r#"{ "address": 17, "output": { "rmc": 1, "gga": 1 } }"#)
                .unwrap();
        assert_eq!(config.address, 17);
        assert_eq!(config.output, SentenceOutput::EVERY_FIX);
        assert_eq!(config.poll_deadline_ms, 50);
        assert_eq!(config.century, DEFAULT_CENTURY);
    }
}
