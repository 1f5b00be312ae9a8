mod common;

use common::{Idle, ManualClock, ScriptedBus, RMC_ACTIVE};
use pa1010::{Error, SentenceReader};

fn reader() -> SentenceReader {
    SentenceReader::new(0x10, 0, 100)
}

#[test]
fn reads_one_sentence() {
    let mut clock = ManualClock::new();
    let mut bus = ScriptedBus::new(&clock).sentence(RMC_ACTIVE).sentence("$GNGGA");

    let sentence = reader().read_sentence(&mut bus, &mut clock, 50).unwrap();
    assert_eq!(sentence.as_str(), RMC_ACTIVE);
    // the next sentence stays queued
    assert_eq!(bus.pending(), "$GNGGA\r\n".len());
}

#[test]
fn every_read_targets_register_zero() {
    let mut clock = ManualClock::new();
    let mut bus = ScriptedBus::new(&clock).sentence("$A");
    reader().read_sentence(&mut bus, &mut clock, 50).unwrap();
    assert!(bus.read_addresses.iter().all(|a| *a == (0x10, 0)));
    assert_eq!(bus.reads, 4);
}

#[test]
fn leading_garbage_and_filler_is_discarded() {
    let mut clock = ManualClock::new();
    let mut bus = ScriptedBus::new(&clock)
        .bytes(b"\n\n\n*12\r\nGNRMC,")
        .sentence("$GNGGA,1");

    let sentence = reader().read_sentence(&mut bus, &mut clock, 50).unwrap();
    assert_eq!(sentence.as_str(), "$GNGGA,1");
}

#[test]
fn embedded_newlines_are_removed() {
    let mut clock = ManualClock::new();
    let mut bus = ScriptedBus::new(&clock).bytes(b"$GNRMC,12\n35\n19\r\n");

    let sentence = reader().read_sentence(&mut bus, &mut clock, 50).unwrap();
    assert_eq!(sentence.as_str(), "$GNRMC,123519");
}

#[test]
fn filler_only_times_out() {
    let mut clock = ManualClock::new();
    let mut bus = ScriptedBus::new(&clock);

    assert_eq!(
        reader().read_sentence(&mut bus, &mut clock, 50),
        Err(Error::Timeout)
    );
    assert_eq!(bus.reads, 50);
}

#[test]
fn started_sentence_gets_grace_period() {
    let mut clock = ManualClock::new();
    // a `$` at 40 ms, then 100 more bytes: far past the 50 ms deadline
    let body = "X".repeat(98);
    let mut bus = ScriptedBus::new(&clock)
        .bytes(&[b'\n'; 39])
        .sentence(&format!("${body}"));

    let sentence = reader().read_sentence(&mut bus, &mut clock, 50).unwrap();
    assert_eq!(sentence.len(), 99);
    assert!(clock.now() > 50);
}

#[test]
fn grace_period_is_granted_once() {
    let mut clock = ManualClock::new();
    // first start runs into the size limit, the second never finishes
    let mut bus = ScriptedBus::new(&clock)
        .bytes(&[b'$'; 129])
        .bytes(&[b'x'; 500]);

    assert_eq!(
        reader().read_sentence(&mut bus, &mut clock, 50),
        Err(Error::Timeout)
    );
    assert_eq!(bus.reads, 150);
}

#[test]
fn partial_sentence_is_dropped_on_timeout() {
    let mut clock = ManualClock::new();
    let mut bus = ScriptedBus::new(&clock).bytes(b"$GNRMC,1235");

    assert_eq!(
        reader().read_sentence(&mut bus, &mut clock, 50),
        Err(Error::Timeout)
    );
    // nothing of the partial sentence leaks into the next read
    let mut bus = ScriptedBus::new(&clock).bytes(b"19\r\n").sentence("$B");
    assert_eq!(
        reader()
            .read_sentence(&mut bus, &mut clock, 50)
            .unwrap()
            .as_str(),
        "$B"
    );
}

#[test]
fn oversized_sentence_resynchronizes() {
    let mut clock = ManualClock::new();
    let noise = format!("${}", "N".repeat(200));
    let mut bus = ScriptedBus::new(&clock)
        .bytes(noise.as_bytes())
        .sentence("$GNGGA,ok");

    let sentence = reader().read_sentence(&mut bus, &mut clock, 500).unwrap();
    assert_eq!(sentence.as_str(), "$GNGGA,ok");
}

#[test]
fn bus_failure_is_not_a_timeout() {
    let mut clock = ManualClock::new();
    let mut bus = ScriptedBus::new(&clock).bytes(b"$GN").read_faults(1);

    assert_eq!(
        reader().read_sentence(&mut bus, &mut clock, 50),
        Err(Error::BusUnavailable)
    );

    let mut bus = ScriptedBus::new(&clock).idle(Idle::Fault);
    assert_eq!(
        reader().read_sentence(&mut bus, &mut clock, 50),
        Err(Error::BusUnavailable)
    );
    assert_eq!(bus.reads, 1);
}

#[test]
fn non_ascii_sentence_is_malformed() {
    let mut clock = ManualClock::new();
    let mut bus = ScriptedBus::new(&clock).bytes(b"$GN\xf0\x9f\r\n");

    assert_eq!(
        reader().read_sentence(&mut bus, &mut clock, 50),
        Err(Error::MalformedSentence)
    );
}
