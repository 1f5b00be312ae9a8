//! Seams to the hardware: the byte-addressed bus and a monotonic clock.
//!
//! The driver never touches a peripheral directly. Anything that can write a
//! buffer to a device address and read back one byte can carry the receiver,
//! which is how the same session runs on an `embedded-hal` I2C bus, a serial
//! bridge on a host, or a scripted bus in tests.

use embedded_hal::i2c::I2c;

/// Byte-addressable request/response channel to the receiver.
pub trait Transport {
    type Error: core::fmt::Debug;

    /// Write a whole buffer to the device in one transaction.
    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Read a single byte from `register` of the device.
    fn read_byte(&mut self, address: u8, register: u8) -> Result<u8, Self::Error>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        (**self).write(address, bytes)
    }

    fn read_byte(&mut self, address: u8, register: u8) -> Result<u8, Self::Error> {
        (**self).read_byte(address, register)
    }
}

/// [`Transport`] over any blocking `embedded-hal` I2C bus.
///
/// Reads are a register write followed by a one byte read, which the receiver
/// answers with the next byte of its output stream (or a filler `\n` when idle).
pub struct I2cTransport<I> {
    i2c: I,
}

impl<I: I2c> I2cTransport<I> {
    pub fn new(i2c: I) -> Self {
        Self { i2c }
    }

    pub fn release(self) -> I {
        self.i2c
    }
}

impl<I: I2c> Transport for I2cTransport<I> {
    type Error = I::Error;

    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        self.i2c.write(address, bytes)
    }

    fn read_byte(&mut self, address: u8, register: u8) -> Result<u8, Self::Error> {
        let mut byte = [0u8; 1];
        self.i2c.write_read(address, &[register], &mut byte)?;
        Ok(byte[0])
    }
}

/// Monotonic millisecond time source used for read deadlines.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin. Must never go backwards.
    fn now_ms(&mut self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &mut C {
    fn now_ms(&mut self) -> u64 {
        (**self).now_ms()
    }
}

/// Host clock backed by [`std::time::Instant`], also usable as the session delay.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdClock {
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for StdClock {
    fn now_ms(&mut self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

#[cfg(feature = "std")]
impl embedded_hal::delay::DelayNs for StdClock {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(ns.into()));
    }
}
