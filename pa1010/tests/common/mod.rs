#![allow(dead_code)]

use std::{cell::Cell, collections::VecDeque, rc::Rc};

use embedded_hal::delay::DelayNs;
use pa1010::{Clock, Transport};

/// Millisecond clock shared between a test and the bus it drives.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn now(&self) -> u64 {
        self.now.get()
    }
}

impl Clock for ManualClock {
    fn now_ms(&mut self) -> u64 {
        self.now.get()
    }
}

impl DelayNs for ManualClock {
    fn delay_ns(&mut self, ns: u32) {
        self.advance(u64::from(ns).div_ceil(1_000_000));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusFault;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    Byte(u8),
    Fault,
}

/// What the bus answers once its script has run out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Idle {
    /// The receiver has nothing to say and pads with this byte.
    Filler(u8),
    /// The receiver does not answer at all.
    Fault,
}

/// Bus double: plays back a script of bytes and faults, records every write.
///
/// Each read advances the shared clock by `ms_per_read`, so read deadlines
/// expire after a predictable number of bytes.
pub struct ScriptedBus {
    clock: ManualClock,
    ms_per_read: u64,
    script: VecDeque<Event>,
    idle: Idle,
    write_faults: usize,
    pub writes: Vec<(u8, Vec<u8>)>,
    pub reads: usize,
    pub read_addresses: Vec<(u8, u8)>,
}

impl ScriptedBus {
    pub fn new(clock: &ManualClock) -> Self {
        Self {
            clock: clock.clone(),
            ms_per_read: 1,
            script: VecDeque::new(),
            idle: Idle::Filler(b'\n'),
            write_faults: 0,
            writes: Vec::new(),
            reads: 0,
            read_addresses: Vec::new(),
        }
    }

    pub fn ms_per_read(mut self, ms: u64) -> Self {
        self.ms_per_read = ms;
        self
    }

    pub fn idle(mut self, idle: Idle) -> Self {
        self.idle = idle;
        self
    }

    /// Queue raw bytes.
    pub fn bytes(mut self, bytes: &[u8]) -> Self {
        self.script.extend(bytes.iter().copied().map(Event::Byte));
        self
    }

    /// Queue a sentence followed by `\r\n`.
    pub fn sentence(self, text: &str) -> Self {
        self.bytes(text.as_bytes()).bytes(b"\r\n")
    }

    /// Queue `count` failing reads.
    pub fn read_faults(mut self, count: usize) -> Self {
        self.script.extend(std::iter::repeat(Event::Fault).take(count));
        self
    }

    /// The next `count` writes fail.
    pub fn write_faults(mut self, count: usize) -> Self {
        self.write_faults = count;
        self
    }

    pub fn pending(&self) -> usize {
        self.script.len()
    }

    /// Written payloads as text, address dropped.
    pub fn written(&self) -> Vec<String> {
        self.writes
            .iter()
            .map(|(_, bytes)| String::from_utf8_lossy(bytes).into_owned())
            .collect()
    }
}

impl Transport for ScriptedBus {
    type Error = BusFault;

    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        if self.write_faults > 0 {
            self.write_faults -= 1;
            return Err(BusFault);
        }
        self.writes.push((address, bytes.to_vec()));
        Ok(())
    }

    fn read_byte(&mut self, address: u8, register: u8) -> Result<u8, Self::Error> {
        self.reads += 1;
        self.read_addresses.push((address, register));
        self.clock.advance(self.ms_per_read);
        match self.script.pop_front() {
            Some(Event::Byte(b)) => Ok(b),
            Some(Event::Fault) => Err(BusFault),
            None => match self.idle {
                Idle::Filler(b) => Ok(b),
                Idle::Fault => Err(BusFault),
            },
        }
    }
}

pub const GGA: &str = "$GNGGA,123519.00,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*XX";
pub const RMC_ACTIVE: &str = "$GNRMC,123519.00,A,4807.038,N,01131.000,E,022.4,084.4,230394,,*XX";
pub const RMC_VOID: &str = "$GNRMC,123520.00,V,4807.038,N,01131.000,E,022.4,084.4,230394,,*XX";
