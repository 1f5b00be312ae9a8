use crate::command::AckFlag;

/// Errors surfaced by the reader, encoder and session.
///
/// `Timeout` and `BusUnavailable` are routine: `Receiver::poll` treats both as
/// "no more sentences right now" and keeps the last known fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("no complete sentence before the deadline")]
    Timeout,
    #[error("receiver bus unavailable")]
    BusUnavailable,
    #[error("framed sentence is not valid text")]
    MalformedSentence,
    #[error("command of {len} bytes does not fit in a {capacity} byte buffer")]
    CommandTooLong { len: usize, capacity: usize },
    #[error("command {command} rejected by receiver: {flag:?}")]
    CommandRejected { command: u16, flag: AckFlag },
}

/// Why a sentence did not decode into one of the two supported formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("not a supported sentence")]
    UnknownSentence,
    #[error("sentence {sentence} is missing field {field}")]
    MissingField {
        sentence: &'static str,
        field: &'static str,
    },
    #[error("invalid field {field} of sentence {sentence}")]
    InvalidField {
        sentence: &'static str,
        field: &'static str,
    },
}
