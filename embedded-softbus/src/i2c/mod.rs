//! I2C bus engine over a bit-level controller.
//!
//! [`I2c`] builds the protocol layer (7- and 10-bit addressing, MSB-first byte
//! framing with acknowledge handling, and start/stop-bracketed transactions)
//! on top of any [`I2cController`]. [`Device`] binds an engine to one fixed
//! address. The [`embedded_hal::i2c::I2c`] traits are implemented for the
//! engine so ecosystem device drivers can consume it directly.

mod bus;
mod compat;
mod device;
mod error;
mod traits;

pub use bus::I2c;
pub use device::Device;
pub use error::{I2cError, I2cResult};
pub use traits::{BaudRateControl, I2cController};

/// Lowest valid 7-bit device address; lower values are reserved by the
/// protocol (general call, CBUS, high-speed master codes).
pub const MIN_7BIT_ADDR: u16 = 0x08;

/// Highest valid 7-bit device address; 0x78..=0x7f are reserved.
pub const MAX_7BIT_ADDR: u16 = 0x77;

/// First encoded 10-bit address. A 10-bit device address `a` in `0..=0x3ff`
/// is carried as `MIN_10BIT_ADDR | a`.
pub const MIN_10BIT_ADDR: u16 = 0x7800;

/// Last encoded 10-bit address.
pub const MAX_10BIT_ADDR: u16 = 0x7bff;
