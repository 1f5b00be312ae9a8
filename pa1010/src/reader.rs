use crate::{
    config::ReceiverConfig,
    constants::{MAX_SENTENCE_LEN, NMEA_END_CHAR_1, NMEA_END_CHAR_2, NMEA_SYNC_CHAR},
    error::Error,
    transport::{Clock, Transport},
};

/// One sentence as received, `$` included, terminator and stray newlines removed.
pub type SentenceText = heapless::String<MAX_SENTENCE_LEN>;

/// Assembles sentences from the receiver's byte stream, one byte per bus read.
///
/// Bytes before a `$` are discarded, which also swallows the filler bytes the
/// receiver returns while it has nothing to send. A sentence ends at `\r\n`;
/// a bare `\n` inside a sentence is firmware noise and is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentenceReader {
    address: u8,
    register: u8,
    start_grace_ms: u32,
}

impl SentenceReader {
    pub const fn new(address: u8, register: u8, start_grace_ms: u32) -> Self {
        Self {
            address,
            register,
            start_grace_ms,
        }
    }

    pub const fn from_config(config: &ReceiverConfig) -> Self {
        Self::new(config.address, config.register, config.start_grace_ms)
    }

    /// Read bytes until a complete sentence is assembled or `deadline_ms` passes.
    ///
    /// Once the first `$` arrives the deadline is extended by the start grace
    /// period. A partial sentence is dropped on timeout. Bus failures surface as
    /// [`Error::BusUnavailable`], distinct from [`Error::Timeout`].
    pub fn read_sentence<T, C>(
        &self,
        bus: &mut T,
        clock: &mut C,
        deadline_ms: u32,
    ) -> Result<SentenceText, Error>
    where
        T: Transport,
        C: Clock,
    {
        let mut buf = heapless::Vec::<u8, MAX_SENTENCE_LEN>::new();
        let mut deadline = u64::from(deadline_ms);
        let mut extended = false;
        let start = clock.now_ms();

        while clock.now_ms().saturating_sub(start) < deadline {
            let byte = bus
                .read_byte(self.address, self.register)
                .map_err(|e| {
                    log::debug!("Bus read failed: {e:?}");
                    Error::BusUnavailable
                })?;

            if buf.is_empty() {
                if byte != NMEA_SYNC_CHAR {
                    continue;
                }
                if !extended {
                    deadline += u64::from(self.start_grace_ms);
                    extended = true;
                }
            }

            if buf.push(byte).is_err() {
                log::trace!("Sentence longer than {MAX_SENTENCE_LEN} bytes, resynchronizing");
                buf.clear();
                continue;
            }

            if buf.ends_with(&[NMEA_END_CHAR_1, NMEA_END_CHAR_2]) {
                return to_text(&buf);
            }
        }

        Err(Error::Timeout)
    }
}

fn to_text(raw: &[u8]) -> Result<SentenceText, Error> {
    if !raw.is_ascii() {
        return Err(Error::MalformedSentence);
    }
    let text = core::str::from_utf8(raw).map_err(|_| Error::MalformedSentence)?;
    let mut out = SentenceText::new();
    for c in text.trim().chars().filter(|c| *c != '\n') {
        out.push(c).map_err(|_| Error::MalformedSentence)?;
    }
    Ok(out)
}
