/// Electrical bit-primitive operations of a 1-Wire master.
///
/// Implementations own the single data line and the slot timing; the
/// protocol layer above ([`OneWire`](crate::onewire::OneWire)) is portable.
pub trait OneWireController {
    /// The error type returned by the underlying hardware.
    type BusError;

    /// Drives a reset pulse and samples the presence pulse at the active
    /// speed profile. Returns `true` when at least one device answered.
    fn reset(&mut self) -> Result<bool, Self::BusError>;

    /// Generates one write time slot.
    fn write_bit(&mut self, bit: bool) -> Result<(), Self::BusError>;

    /// Generates one read time slot, sampling the line mid-slot.
    fn read_bit(&mut self) -> Result<bool, Self::BusError>;

    /// Whether slots are currently timed at overdrive speed.
    /// Standard-speed-only controllers report `false`.
    fn overdrive(&self) -> bool {
        false
    }
}

/// Controllers that can retime their slots between the standard and
/// overdrive profiles.
///
/// A statically-known capability:
/// [`OneWire::set_overdrive`](crate::onewire::OneWire::set_overdrive) exists
/// only for engines whose controller implements this trait. Switching the
/// controller does not by itself move the devices to the new speed; the
/// engine drives the Overdrive-Skip ROM sequence around it.
pub trait OverdriveControl: OneWireController {
    /// Selects the overdrive (`true`) or standard (`false`) timing profile.
    fn set_overdrive(&mut self, enable: bool);
}
