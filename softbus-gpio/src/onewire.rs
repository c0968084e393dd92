//! Software 1-Wire master over a single open-drain GPIO line.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_softbus::onewire::{OneWireController, OverdriveControl};

/// Slot and reset timings of one 1-Wire speed profile, in nanoseconds.
///
/// Field names follow the waveform segments of the recommended signaling
/// tables; [`standard`](OneWireTiming::standard) and
/// [`overdrive`](OneWireTiming::overdrive) carry the published values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OneWireTiming {
    /// Write-1 (and read-slot) low pulse (tW1L).
    pub t_w1l_ns: u32,
    /// Remainder of a write-1 slot after release, including recovery.
    pub t_w1r_ns: u32,
    /// Write-0 low pulse (tW0L).
    pub t_w0l_ns: u32,
    /// Write-0 recovery after release (tREC0).
    pub t_rec0_ns: u32,
    /// Release-to-sample delay of a read slot (tMSR).
    pub t_msr_ns: u32,
    /// Remainder of a read slot after the sample.
    pub t_rdr_ns: u32,
    /// Guard before driving the reset pulse.
    pub t_rstg_ns: u32,
    /// Reset low pulse (tRSTL).
    pub t_rstl_ns: u32,
    /// Release-to-sample delay of the presence pulse (tMSP).
    pub t_msp_ns: u32,
    /// Remainder of the presence cycle after the sample (tRSTH).
    pub t_rsth_ns: u32,
}

impl OneWireTiming {
    /// The standard-speed profile.
    pub const fn standard() -> Self {
        Self {
            t_w1l_ns: 6_000,
            t_w1r_ns: 64_000,
            t_w0l_ns: 60_000,
            t_rec0_ns: 10_000,
            t_msr_ns: 9_000,
            t_rdr_ns: 55_000,
            t_rstg_ns: 0,
            t_rstl_ns: 480_000,
            t_msp_ns: 70_000,
            t_rsth_ns: 410_000,
        }
    }

    /// The overdrive profile.
    pub const fn overdrive() -> Self {
        Self {
            t_w1l_ns: 1_000,
            t_w1r_ns: 7_500,
            t_w0l_ns: 7_500,
            t_rec0_ns: 2_500,
            t_msr_ns: 1_000,
            t_rdr_ns: 7_000,
            t_rstg_ns: 2_500,
            t_rstl_ns: 70_000,
            t_msp_ns: 8_500,
            t_rsth_ns: 40_000,
        }
    }
}

impl Default for OneWireTiming {
    fn default() -> Self {
        Self::standard()
    }
}

/// A software 1-Wire master over one open-drain GPIO line.
///
/// Owns the line plus a standard and an overdrive timing profile; slots are
/// fixed-duration, so no operation blocks indefinitely. The profile in
/// effect is selected through [`OverdriveControl`].
pub struct SoftOneWire<P, D> {
    pin: P,
    delay: D,
    standard: OneWireTiming,
    fast: OneWireTiming,
    overdrive: bool,
}

impl<P, D, E> SoftOneWire<P, D>
where
    P: OutputPin<Error = E> + InputPin<Error = E>,
    D: DelayNs,
{
    /// Creates a master on `pin` with the recommended timing profiles.
    pub fn new(pin: P, delay: D) -> Self {
        Self {
            pin,
            delay,
            standard: OneWireTiming::standard(),
            fast: OneWireTiming::overdrive(),
            overdrive: false,
        }
    }

    /// Replaces both timing profiles.
    pub fn with_timing(mut self, standard: OneWireTiming, overdrive: OneWireTiming) -> Self {
        self.standard = standard;
        self.fast = overdrive;
        self
    }

    /// Hands the pin and delay back.
    pub fn release(self) -> (P, D) {
        (self.pin, self.delay)
    }

    fn timing(&self) -> OneWireTiming {
        if self.overdrive { self.fast } else { self.standard }
    }
}

impl<P, D, E> OneWireController for SoftOneWire<P, D>
where
    P: OutputPin<Error = E> + InputPin<Error = E>,
    D: DelayNs,
{
    type BusError = E;

    fn reset(&mut self) -> Result<bool, E> {
        let t = self.timing();
        if t.t_rstg_ns > 0 {
            self.delay.delay_ns(t.t_rstg_ns);
        }
        self.pin.set_low()?;
        self.delay.delay_ns(t.t_rstl_ns);
        self.pin.set_high()?;
        self.delay.delay_ns(t.t_msp_ns);
        // a device holding the line low here is the presence pulse
        let presence = self.pin.is_low()?;
        self.delay.delay_ns(t.t_rsth_ns);
        Ok(presence)
    }

    fn write_bit(&mut self, bit: bool) -> Result<(), E> {
        let t = self.timing();
        self.pin.set_low()?;
        if bit {
            self.delay.delay_ns(t.t_w1l_ns);
            self.pin.set_high()?;
            self.delay.delay_ns(t.t_w1r_ns);
        } else {
            self.delay.delay_ns(t.t_w0l_ns);
            self.pin.set_high()?;
            self.delay.delay_ns(t.t_rec0_ns);
        }
        Ok(())
    }

    fn read_bit(&mut self) -> Result<bool, E> {
        let t = self.timing();
        self.pin.set_low()?;
        self.delay.delay_ns(t.t_w1l_ns);
        self.pin.set_high()?;
        self.delay.delay_ns(t.t_msr_ns);
        let bit = self.pin.is_high()?;
        self.delay.delay_ns(t.t_rdr_ns);
        Ok(bit)
    }

    fn overdrive(&self) -> bool {
        self.overdrive
    }
}

impl<P, D, E> OverdriveControl for SoftOneWire<P, D>
where
    P: OutputPin<Error = E> + InputPin<Error = E>,
    D: DelayNs,
{
    fn set_overdrive(&mut self, enable: bool) {
        self.overdrive = enable;
    }
}
