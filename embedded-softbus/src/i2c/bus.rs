use crate::i2c::{
    BaudRateControl, I2cController, I2cError, I2cResult, MAX_7BIT_ADDR, MAX_10BIT_ADDR,
    MIN_7BIT_ADDR, MIN_10BIT_ADDR,
};

pub(crate) const MODE_WRITE: u8 = 0;
pub(crate) const MODE_READ: u8 = 1;

pub(crate) enum AddrKind {
    Seven,
    Ten,
}

/// Classifies `addr` into one of the two address spaces, rejecting the
/// reserved and out-of-range values before any bus activity.
pub(crate) fn addr_kind<E>(addr: u16) -> I2cResult<AddrKind, E> {
    match addr {
        MIN_7BIT_ADDR..=MAX_7BIT_ADDR => Ok(AddrKind::Seven),
        MIN_10BIT_ADDR..=MAX_10BIT_ADDR => Ok(AddrKind::Ten),
        _ => Err(I2cError::BadAddress),
    }
}

/// The I2C bus engine.
///
/// Wraps a bit-level controller with addressing, byte framing, and
/// transactions. Stateless between transactions; exactly one transaction may
/// be in flight per engine, which the `&mut` receivers enforce within one
/// thread of control and the caller must uphold across threads.
pub struct I2c<T> {
    pub(crate) ctrl: T,
}

impl<T> I2c<T> {
    /// Creates an engine over `controller`.
    pub fn new(controller: T) -> Self {
        Self { ctrl: controller }
    }

    /// Consumes the engine and hands the controller back.
    pub fn release(self) -> T {
        self.ctrl
    }
}

impl<T: I2cController> I2c<T> {
    /// One complete transaction against the device at `addr`: write `w`
    /// (when non-empty), read into `r` (when non-empty) after a repeated
    /// start, all bracketed by a single start/stop pair.
    ///
    /// This is the canonical entry point for device traffic. The bus is left
    /// idle on every exit path once the start condition has been driven.
    /// With both buffers empty the bus is not touched at all.
    ///
    /// # Errors
    /// [`I2cError::BadAddress`] before any bus activity for invalid
    /// addresses; [`I2cError::Nack`] when the device does not acknowledge.
    pub fn transact(&mut self, addr: u16, w: &[u8], r: &mut [u8]) -> I2cResult<(), T::BusError> {
        if w.is_empty() && r.is_empty() {
            return Ok(());
        }
        addr_kind::<T::BusError>(addr)?;
        self.ctrl.start()?;
        let res = self.exchange(addr, w, r);
        let stop = self.ctrl.stop().map_err(I2cError::Other);
        res.and(stop)
    }

    fn exchange(&mut self, addr: u16, w: &[u8], r: &mut [u8]) -> I2cResult<(), T::BusError> {
        if !w.is_empty() {
            self.write_address(addr, MODE_WRITE)?;
            self.write(w)?;
        }
        if !r.is_empty() {
            if !w.is_empty() {
                // repeated start between the write and read halves
                self.ctrl.start()?;
            }
            self.write_address(addr, MODE_READ)?;
            self.read(r)?;
        }
        Ok(())
    }

    /// Writes `data` to register `reg` of the device at `addr` in one
    /// addressed write transaction.
    pub fn write_register(&mut self, addr: u16, reg: u8, data: &[u8]) -> I2cResult<(), T::BusError> {
        addr_kind::<T::BusError>(addr)?;
        self.ctrl.start()?;
        let res = self.write_register_claimed(addr, reg, data);
        let stop = self.ctrl.stop().map_err(I2cError::Other);
        res.and(stop)
    }

    fn write_register_claimed(&mut self, addr: u16, reg: u8, data: &[u8]) -> I2cResult<(), T::BusError> {
        self.write_address(addr, MODE_WRITE)?;
        self.write_byte(reg)?;
        self.write(data)
    }

    /// Reads `buf.len()` bytes from register `reg` of the device at `addr`:
    /// the register pointer is written, then the data is read back after a
    /// repeated start.
    pub fn read_register(&mut self, addr: u16, reg: u8, buf: &mut [u8]) -> I2cResult<(), T::BusError> {
        self.transact(addr, &[reg], buf)
    }

    /// Sends the address phase for `addr` in the given mode.
    ///
    /// A 7-bit address goes out as `(addr << 1) | mode`. A 10-bit address
    /// goes out as the reserved pattern `0b11110_xx0` (xx = address bits
    /// 9:8, write flag) followed by the low address byte; read mode then
    /// drives a repeated start and retransmits the first byte with the read
    /// bit set, per the long-address protocol.
    pub(crate) fn write_address(&mut self, addr: u16, mode: u8) -> I2cResult<(), T::BusError> {
        match addr_kind::<T::BusError>(addr)? {
            AddrKind::Seven => self.write_byte((addr << 1) as u8 | mode),
            AddrKind::Ten => self.write_long_address(addr & 0x3ff, mode),
        }
    }

    fn write_long_address(&mut self, addr: u16, mode: u8) -> I2cResult<(), T::BusError> {
        let first = 0xf0 | (((addr >> 8) as u8) << 1);
        // the leading byte pair is always sent in write mode
        self.write_byte(first)?;
        self.write_byte(addr as u8)?;
        if mode == MODE_READ {
            self.ctrl.start()?;
            self.write_byte(first | MODE_READ)?;
        }
        Ok(())
    }

    /// Drives a start condition; a repeated start when one is already open.
    /// Diagnostics only: [`transact`](I2c::transact) brackets its own
    /// transactions and guarantees the matching stop.
    pub fn start(&mut self) -> I2cResult<(), T::BusError> {
        Ok(self.ctrl.start()?)
    }

    /// Drives a stop condition, leaving the bus idle.
    pub fn stop(&mut self) -> I2cResult<(), T::BusError> {
        Ok(self.ctrl.stop()?)
    }

    /// Writes a single byte, MSB first, and samples the acknowledge bit.
    /// No addressing or start/stop framing; diagnostics and address-phase
    /// building block.
    pub fn write_byte(&mut self, byte: u8) -> I2cResult<(), T::BusError> {
        for i in 0..8 {
            self.ctrl.write_bit((byte >> (7 - i)) & 1 == 1)?;
        }
        if self.ctrl.read_bit()? {
            return Err(I2cError::Nack);
        }
        Ok(())
    }

    /// Reads a single byte, MSB first, then drives the acknowledge bit:
    /// low (`nack == false`) to keep the device transmitting, high before
    /// the final stop. No addressing or start/stop framing.
    pub fn read_byte(&mut self, nack: bool) -> I2cResult<u8, T::BusError> {
        let mut byte = 0;
        for i in 0..8 {
            if self.ctrl.read_bit()? {
                byte |= 1 << (7 - i);
            }
        }
        self.ctrl.write_bit(nack)?;
        Ok(byte)
    }

    /// Writes directly to the bus without addressing, for diagnostics;
    /// [`transact`](I2c::transact) is the addressed entry point.
    pub fn write(&mut self, bytes: &[u8]) -> I2cResult<(), T::BusError> {
        for &b in bytes {
            self.write_byte(b)?;
        }
        Ok(())
    }

    /// Reads directly from the bus without addressing, not acknowledging
    /// the final byte.
    pub fn read(&mut self, bytes: &mut [u8]) -> I2cResult<(), T::BusError> {
        let n = bytes.len();
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = self.read_byte(i + 1 == n)?;
        }
        Ok(())
    }
}

impl<T: BaudRateControl> I2c<T> {
    /// Reconfigures the controller's bit timing for a new baud rate.
    pub fn set_baudrate(&mut self, baudrate: u32) {
        self.ctrl.set_baudrate(baudrate)
    }
}
