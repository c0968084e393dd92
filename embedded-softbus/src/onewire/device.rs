use crate::onewire::{Address, OneWire, OneWireController, OneWireResult};

/// A device binding: a bus engine paired with one fixed ROM address.
///
/// Re-exposes the addressed transaction without repeating the ROM per call.
/// No new protocol behavior, no state beyond the two captured values.
pub struct Device<'a, T> {
    bus: &'a mut OneWire<T>,
    addr: Address,
}

impl<'a, T: OneWireController> Device<'a, T> {
    /// Binds `bus` to the device with `addr`.
    pub fn new(bus: &'a mut OneWire<T>, addr: Address) -> Self {
        Self { bus, addr }
    }

    /// The bound ROM address.
    pub fn address(&self) -> Address {
        self.addr
    }

    /// Addressed transaction; see [`OneWire::tx`].
    pub fn transact(&mut self, w: &[u8], r: &mut [u8]) -> OneWireResult<(), T::BusError> {
        self.bus.tx(Some(self.addr), w, r)
    }

    /// Addressed write.
    pub fn write(&mut self, w: &[u8]) -> OneWireResult<(), T::BusError> {
        self.bus.tx(Some(self.addr), w, &mut [])
    }

    /// Addressed read.
    pub fn read(&mut self, r: &mut [u8]) -> OneWireResult<(), T::BusError> {
        self.bus.tx(Some(self.addr), &[], r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{valid_rom, SimOneWire};
    use std::vec;

    #[test]
    fn binding_matches_its_rom_on_every_call() {
        let rom = valid_rom(0x28, 0x3141);
        let mut bus = OneWire::new(SimOneWire::new(&[rom]));
        let mut dev = Device::new(&mut bus, Address::from(rom));
        dev.write(&[0x4e, 0x50]).unwrap();
        let mut rd = [0u8];
        dev.transact(&[0xbe], &mut rd).unwrap();
        let sim = bus.release();
        assert_eq!(sim.matched, Some(rom));
        assert_eq!(sim.received, vec![0x4e, 0x50, 0xbe]);
        assert_eq!(sim.resets, 2);
    }
}
