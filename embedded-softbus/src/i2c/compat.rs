//! [`embedded_hal::i2c`] implementations for the bus engine, so ecosystem
//! device drivers can consume it without knowing about bit-level controllers.

use core::fmt::Debug;

use embedded_hal::i2c::{
    ErrorKind, ErrorType, NoAcknowledgeSource, Operation, SevenBitAddress, TenBitAddress,
};

use crate::i2c::bus::{addr_kind, MODE_READ, MODE_WRITE};
use crate::i2c::{I2c, I2cController, I2cError, I2cResult, MIN_10BIT_ADDR};

impl<E: Debug> embedded_hal::i2c::Error for I2cError<E> {
    fn kind(&self) -> ErrorKind {
        match self {
            I2cError::Nack => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Unknown),
            _ => ErrorKind::Other,
        }
    }
}

impl<T: I2cController> ErrorType for I2c<T>
where
    T::BusError: Debug,
{
    type Error = I2cError<T::BusError>;
}

impl<T: I2cController> embedded_hal::i2c::I2c<SevenBitAddress> for I2c<T>
where
    T::BusError: Debug,
{
    fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        run_transaction(self, address as u16, operations)
    }
}

impl<T: I2cController> embedded_hal::i2c::I2c<TenBitAddress> for I2c<T>
where
    T::BusError: Debug,
{
    fn transaction(
        &mut self,
        address: TenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if address > 0x3ff {
            return Err(I2cError::BadAddress);
        }
        run_transaction(self, MIN_10BIT_ADDR | address, operations)
    }
}

fn run_transaction<T: I2cController>(
    bus: &mut I2c<T>,
    addr: u16,
    operations: &mut [Operation<'_>],
) -> I2cResult<(), T::BusError> {
    if operations.is_empty() {
        return Ok(());
    }
    addr_kind::<T::BusError>(addr)?;
    bus.ctrl.start()?;
    let res = run_operations(bus, addr, operations);
    let stop = bus.ctrl.stop().map_err(I2cError::Other);
    res.and(stop)
}

/// Runs the operation list under the trait's framing contract: an address
/// phase on the first operation and on every direction change (behind a
/// repeated start), adjacent same-direction operations merged, and the
/// final byte of each read run not acknowledged.
fn run_operations<T: I2cController>(
    bus: &mut I2c<T>,
    addr: u16,
    operations: &mut [Operation<'_>],
) -> I2cResult<(), T::BusError> {
    let n = operations.len();
    let mut prev_is_read = None;
    for i in 0..n {
        let is_read = matches!(operations[i], Operation::Read(_));
        if prev_is_read != Some(is_read) {
            if prev_is_read.is_some() {
                bus.ctrl.start()?;
            }
            bus.write_address(addr, if is_read { MODE_READ } else { MODE_WRITE })?;
            prev_is_read = Some(is_read);
        }
        let run_ends = i + 1 == n || !matches!(operations[i + 1], Operation::Read(_));
        match &mut operations[i] {
            Operation::Read(buf) => {
                let len = buf.len();
                for (j, b) in buf.iter_mut().enumerate() {
                    *b = bus.read_byte(run_ends && j + 1 == len)?;
                }
            }
            Operation::Write(bytes) => bus.write(bytes)?,
        }
    }
    Ok(())
}
