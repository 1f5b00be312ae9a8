use std::path::Path;

use anyhow::{Context, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndOfCapture;

/// Plays back a captured byte stream. Writes are logged and dropped.
pub struct ReplayBus {
    data: Vec<u8>,
    pos: usize,
}

impl ReplayBus {
    pub fn open(path: &Path) -> Result<Self> {
        let data =
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Self::new(data))
    }

    pub fn new(data: Vec<u8>) -> Self {
        Self { data, pos: 0 }
    }

    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.data.len()
    }
}

impl pa1010::Transport for ReplayBus {
    type Error = EndOfCapture;

    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), EndOfCapture> {
        log::debug!(
            "Replay drops write to {address:#04x}: {:?}",
            String::from_utf8_lossy(bytes)
        );
        Ok(())
    }

    fn read_byte(&mut self, _address: u8, _register: u8) -> Result<u8, EndOfCapture> {
        let byte = *self.data.get(self.pos).ok_or(EndOfCapture)?;
        self.pos += 1;
        Ok(byte)
    }
}
