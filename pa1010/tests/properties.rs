mod common;

use common::{ManualClock, ScriptedBus};
use pa1010::{encode, Error, NmeaChecksum, SentenceReader};
use proptest::prelude::*;

/// Bytes that can never start a sentence.
fn garbage() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>().prop_filter("no start", |b| *b != b'$'), 0..40)
}

/// Printable sentence body, with the odd stray newline but no `\r` and no `$`.
fn body() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            9 => (0x20u8..0x7f).prop_filter("no start", |b| *b != b'$'),
            1 => Just(b'\n'),
        ],
        0..100,
    )
    .prop_map(|bytes| String::from_utf8(bytes).unwrap())
}

proptest! {
    #[test]
    fn complete_sentence_is_returned(prefix in garbage(), body in body(), suffix in garbage()) {
        let raw = format!("${body}\r\n");
        let mut clock = ManualClock::new();
        let mut bus = ScriptedBus::new(&clock)
            .bytes(&prefix)
            .bytes(raw.as_bytes())
            .bytes(&suffix);

        let sentence = SentenceReader::new(0x10, 0, 100)
            .read_sentence(&mut bus, &mut clock, 50)
            .unwrap();

        let expected = raw.trim().replace('\n', "");
        prop_assert_eq!(sentence.as_str(), expected.as_str());
        prop_assert_eq!(bus.pending(), suffix.len());
    }

    #[test]
    fn no_start_delimiter_times_out(noise in garbage()) {
        let mut clock = ManualClock::new();
        let mut bus = ScriptedBus::new(&clock).bytes(&noise);

        prop_assert_eq!(
            SentenceReader::new(0x10, 0, 100).read_sentence(&mut bus, &mut clock, 50),
            Err(Error::Timeout)
        );
    }

    #[test]
    fn unterminated_sentence_times_out(prefix in garbage(), body in body()) {
        let mut clock = ManualClock::new();
        let mut bus = ScriptedBus::new(&clock)
            .bytes(&prefix)
            .bytes(format!("${body}").as_bytes());

        prop_assert_eq!(
            SentenceReader::new(0x10, 0, 100).read_sentence(&mut bus, &mut clock, 50),
            Err(Error::Timeout)
        );
    }

    #[test]
    fn checksum_is_xor_of_payload(payload in "[ -~&&[^$*]]{0,200}") {
        let buf = encode(&payload, true).unwrap();
        let xor = payload.bytes().fold(0u8, |acc, b| acc ^ b);
        let hex = format!("{xor:02X}");

        prop_assert_eq!(buf[0], b'$');
        prop_assert_eq!(&buf[1..=payload.len()], payload.as_bytes());
        prop_assert_eq!(buf[payload.len() + 1], b'*');
        prop_assert_eq!(&buf[payload.len() + 2..payload.len() + 4], hex.as_bytes());
        prop_assert_eq!(&buf[payload.len() + 4..], b"\r\n");
        prop_assert_eq!(NmeaChecksum::of(payload.as_bytes()).result(), xor);
    }
}
