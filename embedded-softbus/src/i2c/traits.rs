/// Electrical bit-primitive operations of an I2C master.
///
/// Implementations own the clock and data lines and the timing between their
/// transitions; everything above this trait (addressing, byte framing,
/// transactions) is portable protocol logic in [`I2c`](crate::i2c::I2c).
pub trait I2cController {
    /// The error type returned by the underlying hardware.
    ///
    /// Covers wiring and timing faults such as an exceeded clock-stretch
    /// bound; protocol-level conditions (NACK, bad address) are reported by
    /// the engine, not the controller.
    type BusError;

    /// Drives a start condition.
    ///
    /// Calling this while a transaction is already open produces a valid
    /// repeated start, keeping the bus claimed between a write and a read.
    fn start(&mut self) -> Result<(), Self::BusError>;

    /// Drives a stop condition, leaving the bus idle.
    fn stop(&mut self) -> Result<(), Self::BusError>;

    /// Clocks one bit out to the bus.
    fn write_bit(&mut self, bit: bool) -> Result<(), Self::BusError>;

    /// Clocks one bit in from the bus.
    fn read_bit(&mut self) -> Result<bool, Self::BusError>;
}

/// Controllers whose bit timing derives from a target baud rate.
///
/// A statically-known capability: [`I2c::set_baudrate`](crate::i2c::I2c::set_baudrate)
/// exists only for engines whose controller implements this trait, so there is
/// no per-call probing for the feature.
pub trait BaudRateControl: I2cController {
    /// Recomputes the bit timing for `baudrate` bits per second.
    fn set_baudrate(&mut self, baudrate: u32);
}
