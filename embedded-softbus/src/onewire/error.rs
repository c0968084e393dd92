use crate::onewire::Address;

/// 1-Wire communication error type.
#[derive(Debug, PartialEq, Eq)]
pub enum OneWireError<E> {
    /// Encapsulates the error type from the underlying controller.
    Other(E),
    /// No device answered: the reset saw no presence pulse, or a search
    /// read-slot pair went completely undriven. Distinguishable from data
    /// and wiring faults; probing an empty bus lands here.
    NoDevicePresent,
    /// A ROM failed its embedded CRC check. Carries the offending address;
    /// this signals electrical noise, not absence, and is never corrected
    /// silently.
    InvalidCrc(Address),
}

impl<E> From<E> for OneWireError<E> {
    fn from(other: E) -> Self {
        Self::Other(other)
    }
}

/// Result type for 1-Wire operations.
pub type OneWireResult<T, E> = Result<T, OneWireError<E>>;
