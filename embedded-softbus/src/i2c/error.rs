/// I2C communication error type.
#[derive(Debug, PartialEq, Eq)]
pub enum I2cError<E> {
    /// Encapsulates the error type from the underlying controller.
    Other(E),
    /// The addressed device did not acknowledge an address or data byte.
    ///
    /// A NACK is a protocol-level answer ("no such device", "busy"), not a
    /// wiring fault, and callers routinely treat it as an expected outcome
    /// when probing.
    Nack,
    /// The address is outside both the 7-bit and the encoded 10-bit address
    /// spaces. Rejected before any bus activity.
    BadAddress,
}

impl<E> From<E> for I2cError<E> {
    fn from(other: E) -> Self {
        Self::Other(other)
    }
}

/// Result type for I2C operations.
pub type I2cResult<T, E> = Result<T, I2cError<E>>;
