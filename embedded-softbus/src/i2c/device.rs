use crate::i2c::{I2c, I2cController, I2cResult};

/// A device binding: a bus engine paired with one fixed address.
///
/// Re-exposes the transfer operations without repeating the address per
/// call. Holds no state beyond the two captured values, and the mutable
/// borrow keeps the engine exclusive to the binding for its lifetime.
pub struct Device<'a, T> {
    bus: &'a mut I2c<T>,
    addr: u16,
}

impl<'a, T: I2cController> Device<'a, T> {
    /// Binds `bus` to the device at `addr`.
    pub fn new(bus: &'a mut I2c<T>, addr: u16) -> Self {
        Self { bus, addr }
    }

    /// The bound address.
    pub fn address(&self) -> u16 {
        self.addr
    }

    /// Write-then-read transaction; see [`I2c::transact`].
    pub fn transact(&mut self, w: &[u8], r: &mut [u8]) -> I2cResult<(), T::BusError> {
        self.bus.transact(self.addr, w, r)
    }

    /// Addressed write.
    pub fn write(&mut self, w: &[u8]) -> I2cResult<(), T::BusError> {
        self.bus.transact(self.addr, w, &mut [])
    }

    /// Addressed read.
    pub fn read(&mut self, r: &mut [u8]) -> I2cResult<(), T::BusError> {
        self.bus.transact(self.addr, &[], r)
    }

    /// Writes a single byte to the device.
    pub fn write_byte(&mut self, byte: u8) -> I2cResult<(), T::BusError> {
        self.bus.transact(self.addr, &[byte], &mut [])
    }

    /// Reads a single byte from the device.
    pub fn read_byte(&mut self) -> I2cResult<u8, T::BusError> {
        let mut b = [0u8];
        self.bus.transact(self.addr, &[], &mut b)?;
        Ok(b[0])
    }

    /// See [`I2c::write_register`].
    pub fn write_register(&mut self, reg: u8, data: &[u8]) -> I2cResult<(), T::BusError> {
        self.bus.write_register(self.addr, reg, data)
    }

    /// See [`I2c::read_register`].
    pub fn read_register(&mut self, reg: u8, buf: &mut [u8]) -> I2cResult<(), T::BusError> {
        self.bus.read_register(self.addr, reg, buf)
    }
}
