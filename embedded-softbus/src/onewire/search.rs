use crate::onewire::{
    ALARM_SEARCH_CMD, Address, Crc8, OneWire, OneWireController, OneWireError, SEARCH_CMD,
};

/// Type of search performed by [`Search`].
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    /// Enumerate every device on the bus.
    Normal = SEARCH_CMD,
    /// Enumerate only devices in an alarm state; same algorithm, the
    /// devices themselves decide whether to participate.
    Alarm = ALARM_SEARCH_CMD,
}

/// Device-discovery state over one bus.
///
/// Implements the ROM search algorithm. At every bit position each
/// participating device drives its address bit and then the bit's
/// complement onto the shared open-drain line, and the engine resolves the
/// wired-AND of the answers:
///
/// * bits differ: all respondents agree; the agreed bit is written back
///   and the walk continues with the same set;
/// * both zero: a collision, the respondents disagree. The zero branch is
///   taken first; the one branch is revisited by a later pass that replays
///   the decided prefix after a fresh reset and search command;
/// * both one: nothing responded, reported as
///   [`NoDevicePresent`](OneWireError::NoDevicePresent), never a silent
///   empty result.
///
/// The traversal is depth-first, zero-branch-first: one bus reset per
/// discovered device, i.e. one more than the number of collision branch
/// points. [`next`](Search::next) walks to one leaf per call and returns
/// `None` once the final branch has been exhausted; results arrive in
/// traversal order, not numeric order.
pub struct Search<'a, T> {
    bus: &'a mut OneWire<T>,
    cmd: u8,
    last_device: bool,
    last_discrepancy: u8,
    family: u8,
    rom: [u8; 8],
}

impl<'a, T> Search<'a, T> {
    pub(crate) fn new(bus: &'a mut OneWire<T>, kind: SearchKind) -> Self {
        Self {
            bus,
            cmd: kind as u8,
            last_device: false,
            last_discrepancy: 0,
            family: 0,
            rom: [0; 8],
        }
    }

    /// Targets one family code: the first pass steers straight to the
    /// lowest address of that family, and the search ends at the first
    /// device outside it. Devices of that family form one contiguous run
    /// in traversal order, so nothing is skipped.
    pub(crate) fn with_family(bus: &'a mut OneWire<T>, kind: SearchKind, family: u8) -> Self {
        Self {
            bus,
            cmd: kind as u8,
            last_device: false,
            last_discrepancy: 64,
            family,
            rom: [family, 0, 0, 0, 0, 0, 0, 0],
        }
    }

    /// Resets the search state.
    fn reset(&mut self) {
        self.last_device = false;
        self.last_discrepancy = 0;
        self.rom = [0; 8];
    }
}

impl<T: OneWireController> Search<'_, T> {
    /// Walks to the next device on the bus.
    ///
    /// Returns `Ok(None)` once every branch has been exhausted; the state
    /// should then be dropped (or recycled via [`verify`](Search::verify)).
    ///
    /// # Errors
    /// [`NoDevicePresent`](OneWireError::NoDevicePresent) when the reset
    /// sees no presence pulse or a read-slot pair goes undriven;
    /// [`InvalidCrc`](OneWireError::InvalidCrc) with the offending address
    /// when a completed ROM fails its checksum, which is noise on that
    /// branch, not absence.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<Option<Address>, OneWireError<T::BusError>> {
        if self.last_device {
            return Ok(None);
        }
        if !self.bus.ctrl.reset()? {
            return Err(OneWireError::NoDevicePresent);
        }
        self.bus.write_byte(self.cmd)?;

        let mut id_bit_num: u8 = 1;
        let mut last_zero: u8 = 0;
        let mut idx: usize = 0;
        let mut rom_mask: u8 = 1;
        loop {
            let id_bit = self.bus.ctrl.read_bit()?;
            let complement_bit = self.bus.ctrl.read_bit()?;
            let set = if id_bit && complement_bit {
                // undriven slot pair: every respondent vanished mid-walk
                return Err(OneWireError::NoDevicePresent);
            } else if id_bit != complement_bit {
                // all respondents agree at this position
                id_bit
            } else {
                // collision: inside the decided prefix follow the stored
                // bit, at the marked position take the one branch this
                // pass, beyond it take the zero branch
                let dir = if id_bit_num < self.last_discrepancy {
                    self.rom[idx] & rom_mask > 0
                } else {
                    id_bit_num == self.last_discrepancy
                };
                if !dir {
                    last_zero = id_bit_num;
                }
                dir
            };
            if set {
                self.rom[idx] |= rom_mask;
            } else {
                self.rom[idx] &= !rom_mask;
            }
            // deselect the devices that disagree
            self.bus.ctrl.write_bit(set)?;

            id_bit_num += 1;
            rom_mask <<= 1;
            if rom_mask == 0 {
                idx += 1;
                rom_mask = 1;
            }
            if id_bit_num > 64 {
                break;
            }
        }

        self.last_discrepancy = last_zero;
        self.last_device = self.last_discrepancy == 0;
        if self.rom[0] == 0 {
            return Ok(None);
        }
        let addr = Address::from_bytes(self.rom);
        if !Crc8::validate(&self.rom) {
            return Err(OneWireError::InvalidCrc(addr));
        }
        if self.family != 0 && self.rom[0] != self.family {
            // walked past the family's contiguous run
            self.last_device = true;
            return Ok(None);
        }
        Ok(Some(addr))
    }

    /// Checks whether the device with the given ROM address is present.
    ///
    /// Recycles the search state: one pass is steered along `rom` in full,
    /// and the device is present exactly when that pass ends on `rom`.
    /// The state is reset afterwards, so a subsequent
    /// [`next`](Search::next) starts a fresh search.
    pub fn verify(&mut self, rom: Address) -> Result<bool, OneWireError<T::BusError>> {
        self.reset();
        self.rom = rom.to_bytes();
        self.last_discrepancy = 64;
        let res = self.next()?;
        self.reset();
        Ok(res == Some(rom))
    }
}
