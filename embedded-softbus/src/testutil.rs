//! Simulated buses for exercising the protocol engines without hardware.
//!
//! Both simulators act as the device side of their bus: they decode the
//! engine's bit stream back into protocol events and answer the way wired
//! devices would, including the wired-AND behavior of shared open-drain
//! lines.

use core::convert::Infallible;

use std::collections::VecDeque;
use std::vec::Vec;

use crate::i2c::I2cController;
use crate::onewire::{
    ALARM_SEARCH_CMD, Crc8, MATCH_ROM_CMD, MATCH_ROM_CMD_OD, OneWireController, READ_ROM_CMD,
    SEARCH_CMD,
};

/// Builds a CRC-valid ROM for `family` and a 48-bit `serial`, in the
/// little-endian wire convention of [`Address`](crate::onewire::Address).
pub fn valid_rom(family: u8, serial: u64) -> u64 {
    let mut bytes = [0u8; 8];
    bytes[0] = family;
    bytes[1..7].copy_from_slice(&serial.to_le_bytes()[..6]);
    bytes[7] = Crc8::checksum(&bytes[..7]);
    u64::from_le_bytes(bytes)
}

/// One bus-level event observed by [`SimI2c`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Start,
    Stop,
    /// A byte the master wrote, and whether the device acknowledged it.
    Write { byte: u8, acked: bool },
    /// A byte the device supplied, and the master's acknowledge answer.
    Read { byte: u8, nack: bool },
}

/// A scripted I2C slave. Acknowledges everything unless `nack_all` is set,
/// serves read phases from `read_data` (0xff once exhausted, like a
/// released line), and logs every event.
#[derive(Debug, Default)]
pub struct SimI2c {
    pub events: Vec<Event>,
    pub read_data: VecDeque<u8>,
    pub nack_all: bool,
    reading: bool,
    addr_pending: bool,
    wbits: u8,
    wbyte: u8,
    ack_pending: Option<bool>,
    rbits: u8,
    rbyte: u8,
}

impl I2cController for SimI2c {
    type BusError = Infallible;

    fn start(&mut self) -> Result<(), Infallible> {
        self.events.push(Event::Start);
        self.addr_pending = true;
        self.reading = false;
        self.wbits = 0;
        self.wbyte = 0;
        self.rbits = 0;
        self.ack_pending = None;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Infallible> {
        self.events.push(Event::Stop);
        self.addr_pending = false;
        self.reading = false;
        self.wbits = 0;
        self.rbits = 0;
        self.ack_pending = None;
        Ok(())
    }

    fn write_bit(&mut self, bit: bool) -> Result<(), Infallible> {
        if self.reading && self.rbits == 8 {
            // master acknowledge closing a device byte
            self.events.push(Event::Read { byte: self.rbyte, nack: bit });
            self.rbits = 0;
            return Ok(());
        }
        self.wbyte = (self.wbyte << 1) | bit as u8;
        self.wbits += 1;
        if self.wbits == 8 {
            let byte = self.wbyte;
            let acked = !self.nack_all;
            self.events.push(Event::Write { byte, acked });
            self.ack_pending = Some(!acked);
            if self.addr_pending {
                self.addr_pending = false;
                if acked && byte & 1 == 1 {
                    self.reading = true;
                    self.rbits = 0;
                }
            }
            self.wbits = 0;
            self.wbyte = 0;
        }
        Ok(())
    }

    fn read_bit(&mut self) -> Result<bool, Infallible> {
        if let Some(ack) = self.ack_pending.take() {
            return Ok(ack);
        }
        assert!(self.reading, "read bit outside a read phase");
        if self.rbits == 0 {
            self.rbyte = self.read_data.pop_front().unwrap_or(0xff);
        }
        let bit = (self.rbyte >> (7 - self.rbits)) & 1 == 1;
        self.rbits += 1;
        Ok(bit)
    }
}

/// One simulated 1-Wire device.
#[derive(Debug, Clone)]
pub struct SimDevice {
    pub rom: u64,
    pub alarmed: bool,
}

enum OwState {
    Idle,
    Command { bits: u8, byte: u8 },
    Search { pos: u8, phase: u8, candidates: Vec<u64> },
    RomStream { pos: u8 },
    MatchRom { bits: u8, acc: u64 },
    Transparent { bits: u8, byte: u8, rbits: u8, rbyte: u8 },
}

/// A simulated multi-drop 1-Wire bus.
///
/// Answers presence after every reset while any device is attached,
/// participates in searches with wired-AND bit pairs, streams the wired-AND
/// of every ROM for Read-ROM, and records bytes written after a ROM
/// selection in `received`.
pub struct SimOneWire {
    pub devices: Vec<SimDevice>,
    pub resets: usize,
    /// Every command byte dispatched after a reset, in order.
    pub commands: Vec<u8>,
    /// The ROM selected by the most recent Match-ROM.
    pub matched: Option<u64>,
    /// Data bytes the master wrote after device selection.
    pub received: Vec<u8>,
    /// Data bytes served to master reads after device selection.
    pub read_data: VecDeque<u8>,
    state: OwState,
}

impl SimOneWire {
    pub fn new(roms: &[u64]) -> Self {
        Self::with_devices(
            roms.iter()
                .map(|&rom| SimDevice { rom, alarmed: false })
                .collect(),
        )
    }

    pub fn with_devices(devices: Vec<SimDevice>) -> Self {
        Self {
            devices,
            resets: 0,
            commands: Vec::new(),
            matched: None,
            received: Vec::new(),
            read_data: VecDeque::new(),
            state: OwState::Idle,
        }
    }

    fn dispatch(&self, cmd: u8) -> OwState {
        match cmd {
            SEARCH_CMD => OwState::Search {
                pos: 0,
                phase: 0,
                candidates: self.devices.iter().map(|d| d.rom).collect(),
            },
            ALARM_SEARCH_CMD => OwState::Search {
                pos: 0,
                phase: 0,
                candidates: self
                    .devices
                    .iter()
                    .filter(|d| d.alarmed)
                    .map(|d| d.rom)
                    .collect(),
            },
            READ_ROM_CMD => OwState::RomStream { pos: 0 },
            MATCH_ROM_CMD | MATCH_ROM_CMD_OD => OwState::MatchRom { bits: 0, acc: 0 },
            _ => OwState::Transparent { bits: 0, byte: 0, rbits: 0, rbyte: 0 },
        }
    }
}

impl OneWireController for SimOneWire {
    type BusError = Infallible;

    fn reset(&mut self) -> Result<bool, Infallible> {
        self.resets += 1;
        self.state = OwState::Command { bits: 0, byte: 0 };
        Ok(!self.devices.is_empty())
    }

    fn write_bit(&mut self, bit: bool) -> Result<(), Infallible> {
        let mut dispatched = None;
        let mut selected = None;
        match &mut self.state {
            OwState::Command { bits, byte } => {
                if bit {
                    *byte |= 1 << *bits;
                }
                *bits += 1;
                if *bits == 8 {
                    dispatched = Some(*byte);
                }
            }
            OwState::Search { pos, phase, candidates } => {
                assert_eq!(*phase, 2, "direction bit written before both reads");
                let p = *pos;
                candidates.retain(|rom| (rom >> p) & 1 == bit as u64);
                *pos += 1;
                *phase = 0;
            }
            OwState::MatchRom { bits, acc } => {
                if bit {
                    *acc |= 1u64 << *bits;
                }
                *bits += 1;
                if *bits == 64 {
                    selected = Some(*acc);
                }
            }
            OwState::Transparent { bits, byte, .. } => {
                if bit {
                    *byte |= 1 << *bits;
                }
                *bits += 1;
                if *bits == 8 {
                    self.received.push(*byte);
                    *bits = 0;
                    *byte = 0;
                }
            }
            OwState::Idle => panic!("bit written with the bus idle"),
            OwState::RomStream { .. } => panic!("write during Read-ROM response"),
        }
        if let Some(cmd) = dispatched {
            self.commands.push(cmd);
            self.state = self.dispatch(cmd);
        }
        if let Some(rom) = selected {
            self.matched = Some(rom);
            self.state = OwState::Transparent { bits: 0, byte: 0, rbits: 0, rbyte: 0 };
        }
        Ok(())
    }

    fn read_bit(&mut self) -> Result<bool, Infallible> {
        match &mut self.state {
            OwState::Search { pos, phase, candidates } => {
                let p = *pos;
                let bit = match *phase {
                    // released line reads high unless a participant pulls it low
                    0 => candidates.iter().all(|rom| (rom >> p) & 1 == 1),
                    1 => candidates.iter().all(|rom| (rom >> p) & 1 == 0),
                    _ => panic!("read after both search bits"),
                };
                *phase += 1;
                Ok(bit)
            }
            OwState::RomStream { pos } => {
                let p = *pos;
                *pos += 1;
                if p >= 64 {
                    return Ok(true);
                }
                // every device answers at once: wired-AND
                Ok(self.devices.iter().all(|d| (d.rom >> p) & 1 == 1))
            }
            OwState::Transparent { rbits, rbyte, .. } => {
                if *rbits == 0 {
                    *rbyte = self.read_data.pop_front().unwrap_or(0xff);
                }
                let bit = (*rbyte >> *rbits) & 1 == 1;
                *rbits += 1;
                if *rbits == 8 {
                    *rbits = 0;
                }
                Ok(bit)
            }
            _ => panic!("unexpected read slot"),
        }
    }
}
