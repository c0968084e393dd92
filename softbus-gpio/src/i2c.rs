//! Software I2C master over two open-drain GPIO lines.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_softbus::i2c::{BaudRateControl, I2cController};

/// Errors of the bit-banged I2C controller.
#[derive(Debug, PartialEq, Eq)]
pub enum SoftI2cError<E> {
    /// GPIO errors.
    Pin(E),
    /// A device stretched the clock past the configured bound.
    ///
    /// Distinct from a NACK: the device answered, it just never let the
    /// clock rise again. Usually a stuck or wedged bus.
    ClockStretch,
}

/// Bit timing derived once from a target baud rate.
///
/// The controller idles for a quarter period between line transitions,
/// which yields the two-phase clock of the classic software masters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct I2cTiming {
    quarter_ns: u32,
}

impl I2cTiming {
    /// Derives the timing for `baudrate` bits per second.
    pub const fn from_baudrate(baudrate: u32) -> Self {
        Self {
            quarter_ns: 1_000_000_000 / baudrate / 4,
        }
    }

    /// A quarter of the bit period, in nanoseconds.
    pub const fn quarter_period_ns(&self) -> u32 {
        self.quarter_ns
    }
}

impl Default for I2cTiming {
    /// Standard-mode 100 kHz.
    fn default() -> Self {
        Self::from_baudrate(100_000)
    }
}

/// A software I2C master over two open-drain GPIO lines.
///
/// The controller releases SCL after driving it and busy-waits until the
/// line is actually observed high, so a device stretching the clock pauses
/// the master; the wait is bounded by the retry budget and reported as
/// [`SoftI2cError::ClockStretch`] when exceeded.
pub struct SoftI2c<SCL, SDA, D> {
    scl: SCL,
    sda: SDA,
    delay: D,
    timing: I2cTiming,
    retries: u32,
}

impl<SCL, SDA, D, E> SoftI2c<SCL, SDA, D>
where
    SCL: OutputPin<Error = E> + InputPin<Error = E>,
    SDA: OutputPin<Error = E> + InputPin<Error = E>,
    D: DelayNs,
{
    /// Creates a controller over the clock and data lines.
    pub fn new(scl: SCL, sda: SDA, delay: D, timing: I2cTiming) -> Self {
        Self {
            scl,
            sda,
            delay,
            timing,
            retries: 100,
        }
    }

    /// Sets the clock-stretch budget: how many quarter periods to wait for
    /// SCL to rise before giving up.
    pub fn with_stretch_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Hands the pins and delay back.
    pub fn release(self) -> (SCL, SDA, D) {
        (self.scl, self.sda, self.delay)
    }

    fn wait_qtr(&mut self) {
        self.delay.delay_ns(self.timing.quarter_ns);
    }

    fn wait_half(&mut self) {
        self.delay.delay_ns(self.timing.quarter_ns * 2);
    }

    /// Releases SCL and waits, bounded, for it to be observed high.
    fn clock_up(&mut self) -> Result<(), SoftI2cError<E>> {
        self.scl.set_high().map_err(SoftI2cError::Pin)?;
        let mut tries = 0;
        while self.scl.is_low().map_err(SoftI2cError::Pin)? {
            if tries >= self.retries {
                return Err(SoftI2cError::ClockStretch);
            }
            tries += 1;
            self.wait_qtr();
        }
        Ok(())
    }
}

impl<SCL, SDA, D, E> I2cController for SoftI2c<SCL, SDA, D>
where
    SCL: OutputPin<Error = E> + InputPin<Error = E>,
    SDA: OutputPin<Error = E> + InputPin<Error = E>,
    D: DelayNs,
{
    type BusError = SoftI2cError<E>;

    fn start(&mut self) -> Result<(), Self::BusError> {
        // doubles as a repeated start: raise the clock with SDA wherever
        // the previous bit left it, release SDA, then pull it low again
        self.clock_up()?;
        self.wait_half();
        self.sda.set_high().map_err(SoftI2cError::Pin)?;
        self.wait_half();
        self.wait_half();
        self.sda.set_low().map_err(SoftI2cError::Pin)?;
        self.wait_half();
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Self::BusError> {
        self.sda.set_low().map_err(SoftI2cError::Pin)?;
        self.scl.set_low().map_err(SoftI2cError::Pin)?;
        self.wait_half();
        self.clock_up()?;
        self.wait_half();
        self.sda.set_high().map_err(SoftI2cError::Pin)?;
        self.wait_half();
        Ok(())
    }

    fn write_bit(&mut self, bit: bool) -> Result<(), Self::BusError> {
        self.scl.set_low().map_err(SoftI2cError::Pin)?;
        if bit {
            self.sda.set_high().map_err(SoftI2cError::Pin)?;
        } else {
            self.sda.set_low().map_err(SoftI2cError::Pin)?;
        }
        self.wait_half();
        self.clock_up()?;
        self.wait_half();
        Ok(())
    }

    fn read_bit(&mut self) -> Result<bool, Self::BusError> {
        self.scl.set_low().map_err(SoftI2cError::Pin)?;
        self.wait_half();
        self.sda.set_high().map_err(SoftI2cError::Pin)?;
        self.clock_up()?;
        self.wait_qtr();
        let bit = self.sda.is_high().map_err(SoftI2cError::Pin)?;
        self.wait_qtr();
        Ok(bit)
    }
}

impl<SCL, SDA, D, E> BaudRateControl for SoftI2c<SCL, SDA, D>
where
    SCL: OutputPin<Error = E> + InputPin<Error = E>,
    SDA: OutputPin<Error = E> + InputPin<Error = E>,
    D: DelayNs,
{
    fn set_baudrate(&mut self, baudrate: u32) {
        self.timing = I2cTiming::from_baudrate(baudrate);
    }
}
