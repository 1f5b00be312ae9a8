use std::{
    io::{self, Read, Write},
    time::Duration,
};

use anyhow::{bail, Context, Result};
use serialport::{FlowControl, SerialPort};

/// Byte the receiver pads its stream with when it has nothing to send.
const IDLE_FILLER: u8 = b'\n';
/// Failed port operations in a row after which the port counts as gone.
const MAX_CONSECUTIVE_FAILURES: u32 = 10;

/// Counts port failures in a row; any success resets the count.
#[derive(Debug, Default)]
struct LinkHealth {
    consecutive_failures: u32,
    last_error: Option<io::ErrorKind>,
}

impl LinkHealth {
    fn record<T>(&mut self, result: io::Result<T>) -> io::Result<T> {
        match &result {
            Ok(_) => {
                self.consecutive_failures = 0;
                self.last_error = None;
            },
            Err(e) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                self.last_error = Some(e.kind());
            },
        }
        result
    }

    fn check(&self) -> Result<()> {
        match self.last_error {
            Some(kind) if self.consecutive_failures >= MAX_CONSECUTIVE_FAILURES => bail!(
                "Serial port failed {} times in a row, last error: {kind}",
                self.consecutive_failures
            ),
            _ => Ok(()),
        }
    }
}

/// Receiver behind a transparent serial bridge.
///
/// The bridge forwards writes and streams the receiver's output, so the bus
/// address and register are meaningless here.
pub struct SerialBus {
    port: Box<dyn SerialPort>,
    health: LinkHealth,
}

impl SerialBus {
    pub fn open(port: &str, baud: u32) -> Result<Self> {
        let builder = serialport::new(port, baud)
            .timeout(Duration::from_millis(10))
            .flow_control(FlowControl::None);
        log::debug!("{builder:?}");
        let port = builder
            .open()
            .with_context(|| format!("Failed to open port: {port}"))?;
        Ok(Self {
            port,
            health: LinkHealth::default(),
        })
    }

    /// Fails once the port has stopped working, e.g. the bridge was unplugged.
    pub fn ensure_connected(&self) -> Result<()> {
        self.health.check()
    }
}

impl pa1010::Transport for SerialBus {
    type Error = io::Error;

    fn write(&mut self, _address: u8, bytes: &[u8]) -> io::Result<()> {
        let result = self.port.write_all(bytes);
        self.health.record(result)
    }

    /// Timeouts read as idle filler, like an I2C read of a quiet receiver.
    fn read_byte(&mut self, _address: u8, _register: u8) -> io::Result<u8> {
        let mut byte = [0u8; 1];
        let result = match self.port.read(&mut byte) {
            Ok(1) => Ok(byte[0]),
            Ok(_) => Ok(IDLE_FILLER),
            Err(e) if e.kind() == io::ErrorKind::TimedOut => Ok(IDLE_FILLER),
            Err(e) => Err(e),
        };
        self.health.record(result)
    }
}
