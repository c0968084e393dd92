//! 1-Wire bus engine over a bit-level controller.
//!
//! [`OneWire`] builds the LSB-first byte layer, ROM addressing, and the
//! device-discovery algorithm ([`Search`]) on top of any
//! [`OneWireController`]. [`Device`] binds an engine to one ROM address.

mod address;
mod bus;
mod crc;
mod device;
mod error;
mod search;
mod traits;

pub use address::Address;
pub use bus::OneWire;
pub use crc::Crc8;
pub use device::Device;
pub use error::{OneWireError, OneWireResult};
pub use search::{Search, SearchKind};
pub use traits::{OneWireController, OverdriveControl};

/// Command to read the ROM of the only device on the bus.
pub const READ_ROM_CMD: u8 = 0x33;

/// Command to match a specific ROM address (standard speed).
pub const MATCH_ROM_CMD: u8 = 0x55;

/// Command to address every device on the bus (standard speed).
pub const SKIP_ROM_CMD: u8 = 0xcc;

/// Match-ROM variant that also switches the matched device to overdrive
/// speed; devices already in overdrive stay there. A standard-speed reset
/// pulse returns every device to standard speed.
pub const MATCH_ROM_CMD_OD: u8 = 0x69;

/// Skip-ROM variant that switches all overdrive-capable devices to
/// overdrive speed.
pub const SKIP_ROM_CMD_OD: u8 = 0x3c;

/// Command to search for devices on the bus.
pub const SEARCH_CMD: u8 = 0xf0;

/// Command to search only for devices in an alarm state; same algorithm as
/// [`SEARCH_CMD`], the devices themselves filter who participates.
pub const ALARM_SEARCH_CMD: u8 = 0xec;
