#![no_std]
#![deny(missing_docs)]
//! # embedded-softbus
//! A no-std implementation of the I2C and 1-Wire bus protocols over bit-level controllers.
//!
//! This crate provides the portable protocol layers of two software-driven multi-drop
//! buses: the two-wire clocked I2C bus and the single-wire clock-less 1-Wire bus.
//! The timing-critical electrical work lives behind two small controller traits,
//! [`i2c::I2cController`] and [`onewire::OneWireController`], so that addressing,
//! byte framing, transactions, and device discovery stay independent of the pin
//! provider and testable against simulated buses.
//!
//! The `softbus-gpio` companion crate implements both traits by bit-banging
//! open-drain GPIO lines through the `embedded-hal` digital and delay traits;
//! any other bit-level transport can be substituted by implementing the traits.
//!
//! Both engines are synchronous and blocking. A bus engine owns its controller
//! exclusively, and exactly one transaction may be in flight per engine; callers
//! that share an engine across threads of control must serialize access
//! themselves, since interleaved bit sequences are electrically
//! indistinguishable from corruption.

pub mod i2c;
pub mod onewire;

#[cfg(test)]
extern crate std;

#[cfg(test)]
pub(crate) mod testutil;
