#![no_std]
#![deny(missing_docs)]

/*! # softbus-gpio
 *
 * Software (bit-banged) bus controllers over `embedded-hal` GPIO.
 *
 * [`SoftI2c`] and [`SoftOneWire`] implement the `embedded-softbus`
 * controller traits by driving open-drain lines directly: `set_low`
 * drives a line low, `set_high` releases it to the pull-up, and the input
 * side samples the actual line level. Timing comes from a
 * [`DelayNs`](embedded_hal::delay::DelayNs) implementation, so any busy-wait
 * or timer-backed delay source works.
 *
 * Pins must be configured open-drain (or emulated with an output/input
 * pair); pushing the lines high against another driver defeats the
 * wired-AND arbitration both protocols rely on.
 */

mod i2c;
mod onewire;

#[cfg(test)]
extern crate std;

pub use embedded_softbus::i2c::{I2c, I2cError};
pub use embedded_softbus::onewire::{OneWire, OneWireError};
pub use i2c::{I2cTiming, SoftI2c, SoftI2cError};
pub use onewire::{OneWireTiming, SoftOneWire};
