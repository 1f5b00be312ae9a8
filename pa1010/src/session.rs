//! Receiver session: wake-up handshake, configuration and steady state polling.
//!
//! A session owns the bus, the clock and the [`FixRecord`]. It is not
//! re-entrant: call [`Receiver::poll`] from one execution context only.

use embedded_hal::delay::DelayNs;

use crate::{
    command::{update_rate_ms, Ack, AckFlag, PeriodicMode, PmtkCommand, SentenceOutput},
    config::ReceiverConfig,
    constants::PMTK_SYSTEM_MESSAGE_STARTUP,
    decoder::Decoder,
    error::Error,
    fix::FixRecord,
    reader::{SentenceReader, SentenceText},
    transport::{Clock, Transport},
};

pub struct Receiver<T, C> {
    bus: T,
    clock: C,
    config: ReceiverConfig,
    reader: SentenceReader,
    decoder: Decoder,
    fix: FixRecord,
}

impl<T: Transport, C: Clock> Receiver<T, C> {
    /// Create a session without touching the bus. See [`Receiver::init`].
    pub fn new(bus: T, clock: C, config: ReceiverConfig) -> Self {
        Self {
            bus,
            clock,
            reader: SentenceReader::from_config(&config),
            decoder: Decoder::new(config.century),
            config,
            fix: FixRecord::new(),
        }
    }

    pub fn fix(&self) -> &FixRecord {
        &self.fix
    }

    pub fn is_valid(&self) -> bool {
        self.fix.is_valid
    }

    pub fn config(&self) -> &ReceiverConfig {
        &self.config
    }

    pub fn bus(&self) -> &T {
        &self.bus
    }

    pub fn release(self) -> (T, C) {
        (self.bus, self.clock)
    }

    /// Drain every sentence already waiting on the bus through the decoder and
    /// return the resulting validity.
    ///
    /// Stops at the first timeout or bus failure, so the fix reflects the newest
    /// data rather than the oldest buffered sentence. Errors never clear the fix.
    pub fn poll(&mut self) -> bool {
        loop {
            match self.read_sentence(self.config.poll_deadline_ms) {
                Ok(sentence) => {
                    self.decoder.decode(&sentence, &mut self.fix);
                },
                Err(Error::MalformedSentence) => {
                    log::debug!("Dropping sentence that is not valid text");
                },
                Err(Error::Timeout) => break,
                Err(e) => {
                    log::debug!("Poll stopped: {e}");
                    break;
                },
            }
        }
        self.fix.is_valid
    }

    pub fn read_sentence(&mut self, deadline_ms: u32) -> Result<SentenceText, Error> {
        self.reader
            .read_sentence(&mut self.bus, &mut self.clock, deadline_ms)
    }

    pub fn send_command(&mut self, command: &PmtkCommand) -> Result<(), Error> {
        log::debug!("Sending {command:?}");
        let bytes = command.to_bytes()?;
        self.write(&bytes)
    }

    /// Send an arbitrary payload, framed and optionally checksummed.
    pub fn send_raw(&mut self, payload: &str, add_checksum: bool) -> Result<(), Error> {
        let bytes = crate::command::encode(payload, add_checksum)?;
        self.write(&bytes)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.bus.write(self.config.address, bytes).map_err(|e| {
            log::debug!("Bus write failed: {e:?}");
            Error::BusUnavailable
        })
    }

    /// Seconds between fixes, silently clamped to 0.1..=10 s.
    pub fn set_update_rate(&mut self, seconds_per_update: f32) -> Result<(), Error> {
        self.send_command(&PmtkCommand::SetUpdateRate {
            millis: update_rate_ms(seconds_per_update),
        })
    }

    /// Toggle the pulse-per-second output. Disabling it stops the fix LED blinking.
    pub fn set_pps(&mut self, enabled: bool) -> Result<(), Error> {
        self.send_command(&PmtkCommand::SetPps { enabled })
    }

    pub fn set_normal_mode(&mut self) -> Result<(), Error> {
        self.send_command(&PmtkCommand::SetNormalMode)
    }

    pub fn set_sentence_output(&mut self, output: SentenceOutput) -> Result<(), Error> {
        self.send_command(&PmtkCommand::SetSentenceOutput(output))
    }

    /// Restart forgetting all aiding data. The next fix takes minutes.
    pub fn cold_boot(&mut self) -> Result<(), Error> {
        self.send_command(&PmtkCommand::ColdBoot)
    }

    /// Sleep between navigation updates, one update every 15..=300 seconds.
    ///
    /// The receiver must acknowledge a 1 s update rate first; a timeout or bus
    /// failure while waiting is returned.
    pub fn set_periodic_mode(&mut self, seconds_per_update: u32) -> Result<(), Error> {
        let rate = PmtkCommand::SetUpdateRate { millis: 1_000 };
        self.send_command(&rate)?;
        self.wait_for_ack(rate.id())?;
        self.send_command(&PmtkCommand::SetPeriodicMode(PeriodicMode::from_seconds(
            seconds_per_update,
        )))
    }

    /// Wait for `$PMTK001,<command>,<flag>`. Other sentences seen meanwhile are decoded.
    pub fn wait_for_ack(&mut self, command: u16) -> Result<(), Error> {
        for _ in 0..self.config.ack_attempts {
            let sentence = match self.read_sentence(self.config.recovery_deadline_ms) {
                Ok(sentence) => sentence,
                Err(Error::MalformedSentence) => continue,
                Err(e) => return Err(e),
            };
            match Ack::parse(&sentence) {
                Some(Ack {
                    command: acked,
                    flag,
                }) if acked == command => {
                    return match flag {
                        AckFlag::Succeeded => Ok(()),
                        flag => Err(Error::CommandRejected { command, flag }),
                    };
                },
                Some(ack) => log::debug!("Expecting ack for {command}, got {ack:?}"),
                None => {
                    self.decoder.decode(&sentence, &mut self.fix);
                },
            }
        }
        log::debug!("Did not receive ack for command {command}");
        Err(Error::Timeout)
    }
}

impl<T: Transport, C: Clock + DelayNs> Receiver<T, C> {
    /// Bring the receiver to normal mode and restrict its output to RMC and GGA.
    ///
    /// A receiver left in standby does not answer on the bus. In that case this
    /// waits for it to wake up, with no upper bound: callers that cannot wait
    /// forever must impose their own timeout around this call.
    pub fn init(&mut self) -> Result<(), Error> {
        log::info!("Resuming normal operating mode");
        match self.set_normal_mode() {
            Ok(()) => {},
            Err(Error::BusUnavailable) => self.wake(),
            Err(e) => return Err(e),
        }
        log::info!("Restricting output to {:?}", self.config.output);
        self.set_sentence_output(self.config.output)
    }

    fn wake(&mut self) {
        log::warn!("Receiver not listening, waiting for it to wake up");
        loop {
            match self.read_sentence(self.config.recovery_deadline_ms) {
                Ok(sentence) if is_wake_sentence(&sentence) => {
                    self.clock.delay_ms(self.config.recovery_delay_ms);
                    match self.set_normal_mode() {
                        Ok(()) => {
                            log::info!("Receiver awake");
                            return;
                        },
                        Err(e) => {
                            log::debug!("Resume command failed: {e}");
                            self.clock.delay_ms(self.config.recovery_delay_ms);
                        },
                    }
                },
                Ok(_) | Err(Error::Timeout) | Err(Error::MalformedSentence) => {},
                Err(_) => self.clock.delay_ms(self.config.recovery_delay_ms),
            }
        }
    }
}

/// Startup notice or any receiver-originated position sentence.
fn is_wake_sentence(sentence: &str) -> bool {
    sentence.starts_with(PMTK_SYSTEM_MESSAGE_STARTUP) || sentence.starts_with("$G")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wake_sentences() {
        assert!(is_wake_sentence("$PMTK010,001*2E"));
        assert!(is_wake_sentence("$PMTK010,002*2D"));
        assert!(is_wake_sentence("$GNRMC,123519.00,V"));
        assert!(is_wake_sentence("$GPTXT,01,01,02,ANTSTATUS=OPEN*2B"));
        assert!(!is_wake_sentence("$PMTK001,220,3*30"));
        assert!(!is_wake_sentence("$PMTK011,MTKGPS*08"));
    }
}
