use crate::onewire::{
    Address, MATCH_ROM_CMD, MATCH_ROM_CMD_OD, OneWireController, OneWireError, OneWireResult,
    OverdriveControl, READ_ROM_CMD, SKIP_ROM_CMD, SKIP_ROM_CMD_OD, Search, SearchKind,
};

/// The 1-Wire bus engine.
///
/// Wraps a bit-level controller with the LSB-first byte layer, ROM
/// addressing, and device discovery. Stateless between transactions; the
/// caller serializes transactions on one engine, and a transaction runs to
/// its terminal reset state before the bus may be abandoned.
pub struct OneWire<T> {
    pub(crate) ctrl: T,
}

impl<T> OneWire<T> {
    /// Creates an engine over `controller`.
    pub fn new(controller: T) -> Self {
        Self { ctrl: controller }
    }

    /// Consumes the engine and hands the controller back.
    pub fn release(self) -> T {
        self.ctrl
    }
}

impl<T: OneWireController> OneWire<T> {
    /// Resets the bus. `true` means at least one device drove a presence
    /// pulse.
    pub fn reset(&mut self) -> OneWireResult<bool, T::BusError> {
        Ok(self.ctrl.reset()?)
    }

    /// Generates one write slot. Diagnostics; byte-level operations cover
    /// normal traffic.
    pub fn write_bit(&mut self, bit: bool) -> OneWireResult<(), T::BusError> {
        Ok(self.ctrl.write_bit(bit)?)
    }

    /// Generates one read slot. Diagnostics.
    pub fn read_bit(&mut self) -> OneWireResult<bool, T::BusError> {
        Ok(self.ctrl.read_bit()?)
    }

    /// Writes a byte, least-significant bit first.
    pub fn write_byte(&mut self, byte: u8) -> OneWireResult<(), T::BusError> {
        let mut b = byte;
        for _ in 0..8 {
            self.ctrl.write_bit(b & 0x01 != 0)?;
            b >>= 1;
        }
        Ok(())
    }

    /// Reads a byte, least-significant bit first.
    pub fn read_byte(&mut self) -> OneWireResult<u8, T::BusError> {
        let mut b = 0u8;
        for _ in 0..8 {
            b >>= 1;
            if self.ctrl.read_bit()? {
                b |= 0x80;
            }
        }
        Ok(b)
    }

    /// Writes a buffer byte by byte.
    pub fn write(&mut self, bytes: &[u8]) -> OneWireResult<(), T::BusError> {
        for &b in bytes {
            self.write_byte(b)?;
        }
        Ok(())
    }

    /// Fills a buffer byte by byte.
    pub fn read(&mut self, bytes: &mut [u8]) -> OneWireResult<(), T::BusError> {
        for b in bytes.iter_mut() {
            *b = self.read_byte()?;
        }
        Ok(())
    }

    /// Reads the ROM address of the only device on the bus via Read-ROM.
    ///
    /// Valid only with a single device attached: with several, the
    /// wired-AND of their simultaneous responses fails the CRC check.
    ///
    /// # Errors
    /// [`OneWireError::NoDevicePresent`] without a presence pulse;
    /// [`OneWireError::InvalidCrc`] with the garbled address otherwise.
    pub fn read_rom(&mut self) -> OneWireResult<Address, T::BusError> {
        if !self.ctrl.reset()? {
            return Err(OneWireError::NoDevicePresent);
        }
        self.write_byte(READ_ROM_CMD)?;
        let mut rom = [0u8; 8];
        self.read(&mut rom)?;
        let addr = Address::from_bytes(rom);
        if !addr.is_valid() {
            return Err(OneWireError::InvalidCrc(addr));
        }
        Ok(addr)
    }

    /// One addressed transaction: reset and select, then write `w` and
    /// read `r`.
    pub fn tx(
        &mut self,
        rom: Option<Address>,
        w: &[u8],
        r: &mut [u8],
    ) -> OneWireResult<(), T::BusError> {
        self.address(rom)?;
        self.write(w)?;
        self.read(r)
    }

    /// Selects devices for the operations that follow: Match-ROM for a
    /// specific address, Skip-ROM (all devices) for `None`. The overdrive
    /// command variants are used while the controller times slots at
    /// overdrive speed.
    ///
    /// A read issued after a Skip-ROM on a multi-device bus returns the
    /// wired-AND of every response.
    pub fn address(&mut self, rom: Option<Address>) -> OneWireResult<(), T::BusError> {
        let cmd = match (rom.is_some(), self.ctrl.overdrive()) {
            (true, false) => MATCH_ROM_CMD,
            (true, true) => MATCH_ROM_CMD_OD,
            (false, false) => SKIP_ROM_CMD,
            (false, true) => SKIP_ROM_CMD_OD,
        };
        if !self.ctrl.reset()? {
            return Err(OneWireError::NoDevicePresent);
        }
        self.write_byte(cmd)?;
        if let Some(rom) = rom {
            for &b in rom.to_bytes().iter() {
                self.write_byte(b)?;
            }
        }
        Ok(())
    }

    /// Whether the bus currently runs at overdrive speed.
    pub fn overdrive(&self) -> bool {
        self.ctrl.overdrive()
    }

    /// Starts a device search of the given kind; drive it with
    /// [`Search::next`].
    pub fn search(&mut self, kind: SearchKind) -> Search<'_, T> {
        Search::new(self, kind)
    }

    /// Starts a search restricted to one family code.
    pub fn search_family(&mut self, kind: SearchKind, family: u8) -> Search<'_, T> {
        Search::with_family(self, kind, family)
    }
}

impl<T: OverdriveControl> OneWire<T> {
    /// Moves the bus and all overdrive-capable devices between speed
    /// profiles via the Overdrive-Skip ROM sequence.
    ///
    /// Entering overdrive issues the command at standard speed, retimes the
    /// controller, and confirms presence at the new speed. Leaving it
    /// retimes the controller first; the subsequent standard-speed reset
    /// returns every device to standard speed.
    pub fn set_overdrive(&mut self, enable: bool) -> OneWireResult<(), T::BusError> {
        if enable == self.ctrl.overdrive() {
            return Ok(());
        }
        if enable {
            if !self.ctrl.reset()? {
                return Err(OneWireError::NoDevicePresent);
            }
            self.write_byte(SKIP_ROM_CMD_OD)?;
            self.ctrl.set_overdrive(true);
            if !self.ctrl.reset()? {
                self.ctrl.set_overdrive(false);
                return Err(OneWireError::NoDevicePresent);
            }
        } else {
            self.ctrl.set_overdrive(false);
            self.ctrl.reset()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{valid_rom, SimOneWire};
    use std::vec;

    #[test]
    fn read_rom_returns_the_single_device() {
        let rom = valid_rom(0x28, 0x72a1);
        let mut bus = OneWire::new(SimOneWire::new(&[rom]));
        assert_eq!(bus.read_rom().unwrap(), Address::from(rom));
        let sim = bus.release();
        assert_eq!(sim.commands, vec![READ_ROM_CMD]);
        assert_eq!(sim.resets, 1);
    }

    #[test]
    fn read_rom_without_presence_is_no_device() {
        let mut bus = OneWire::new(SimOneWire::new(&[]));
        assert_eq!(bus.read_rom(), Err(OneWireError::NoDevicePresent));
    }

    #[test]
    fn read_rom_reports_garbled_multi_device_response() {
        // two devices answer at once; the wired-AND is not a valid ROM
        let roms = [valid_rom(0x28, 0x72a1), valid_rom(0x10, 0x0517)];
        let mut bus = OneWire::new(SimOneWire::new(&roms));
        let garbled = Address::from(roms[0] & roms[1]);
        assert_eq!(bus.read_rom(), Err(OneWireError::InvalidCrc(garbled)));
    }

    #[test]
    fn tx_match_rom_sends_all_eight_address_bytes() {
        let rom = valid_rom(0x28, 0x72a1);
        let mut bus = OneWire::new(SimOneWire::new(&[rom]));
        bus.tx(Some(Address::from(rom)), &[0x44], &mut []).unwrap();
        let sim = bus.release();
        assert_eq!(sim.commands, vec![MATCH_ROM_CMD]);
        assert_eq!(sim.matched, Some(rom));
        assert_eq!(sim.received, vec![0x44]);
    }

    #[test]
    fn tx_without_rom_skips_addressing() {
        let rom = valid_rom(0x28, 0x72a1);
        let mut sim = SimOneWire::new(&[rom]);
        sim.read_data.extend([0xaa, 0x02]);
        let mut bus = OneWire::new(sim);
        let mut rd = [0u8; 2];
        bus.tx(None, &[0xbe], &mut rd).unwrap();
        assert_eq!(rd, [0xaa, 0x02]);
        let sim = bus.release();
        assert_eq!(sim.commands, vec![SKIP_ROM_CMD]);
        assert_eq!(sim.received, vec![0xbe]);
    }

    #[test]
    fn byte_layer_is_lsb_first() {
        let mut sim = SimOneWire::new(&[valid_rom(0x28, 1)]);
        sim.read_data.extend([0xb4]);
        let mut bus = OneWire::new(sim);
        bus.reset().unwrap();
        bus.write_byte(SKIP_ROM_CMD).unwrap();
        // the sim reassembles command bytes LSB-first; a mismatch here
        // would have dispatched a different command
        assert_eq!(bus.read_byte().unwrap(), 0xb4);
        assert_eq!(bus.release().commands, vec![SKIP_ROM_CMD]);
    }
}
