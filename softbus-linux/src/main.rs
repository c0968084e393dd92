use clap::{Parser, Subcommand};
use embedded_softbus::i2c::{I2c, I2cError, MAX_7BIT_ADDR, MIN_7BIT_ADDR};
use embedded_softbus::onewire::{OneWire, SearchKind};
use linux_embedded_hal::gpio_cdev::{Chip, LineRequestFlags};
use linux_embedded_hal::{CdevPin, Delay};
use softbus_gpio::{I2cTiming, SoftI2c, SoftOneWire};

/// Scan and poke bit-banged buses on GPIO lines
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the GPIO character device (e.g., /dev/gpiochip0)
    #[arg(short, long, default_value = "/dev/gpiochip0")]
    chip: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Probe every 7-bit I2C address and report the devices that answer
    I2cScan {
        /// SCL line offset
        #[arg(long)]
        scl: u32,
        /// SDA line offset
        #[arg(long)]
        sda: u32,
        /// Bus clock in Hz
        #[arg(long, default_value_t = 100_000)]
        baudrate: u32,
    },
    /// Dump a register range from one I2C device
    I2cDump {
        /// SCL line offset
        #[arg(long)]
        scl: u32,
        /// SDA line offset
        #[arg(long)]
        sda: u32,
        /// Device address (decimal or 0x-prefixed hex)
        #[arg(value_parser = parse_addr)]
        addr: u16,
        /// First register
        #[arg(default_value_t = 0)]
        start: u8,
        /// Number of registers
        #[arg(default_value_t = 16)]
        count: u8,
    },
    /// Enumerate ROM addresses on a 1-Wire bus
    OnewireScan {
        /// Data line offset
        #[arg(long)]
        pin: u32,
        /// Search only devices in an alarm state
        #[arg(long)]
        alarm: bool,
    },
}

fn parse_addr(s: &str) -> Result<u16, String> {
    let (digits, radix) = match s.strip_prefix("0x") {
        Some(hex) => (hex, 16),
        None => (s, 10),
    };
    u16::from_str_radix(digits, radix).map_err(|e| e.to_string())
}

fn open_pin(chip: &str, offset: u32) -> CdevPin {
    let mut chip = Chip::new(chip).expect("failed to open GPIO chip");
    let line = chip.get_line(offset).expect("no such GPIO line");
    let handle = line
        .request(
            LineRequestFlags::OPEN_DRAIN | LineRequestFlags::OUTPUT,
            1,
            "softbus",
        )
        .expect("failed to request GPIO line");
    CdevPin::new(handle).expect("failed to wrap GPIO line")
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    match args.cmd {
        Command::I2cScan { scl, sda, baudrate } => {
            let ctrl = SoftI2c::new(
                open_pin(&args.chip, scl),
                open_pin(&args.chip, sda),
                Delay,
                I2cTiming::from_baudrate(baudrate),
            );
            let mut bus = I2c::new(ctrl);
            let mut found = 0u32;
            for addr in MIN_7BIT_ADDR..=MAX_7BIT_ADDR {
                let mut probe = [0u8; 1];
                match bus.transact(addr, &[], &mut probe) {
                    Ok(()) => {
                        log::info!("0x{addr:02x}: device");
                        found += 1;
                    }
                    Err(I2cError::Nack) => log::debug!("0x{addr:02x}: no answer"),
                    Err(e) => {
                        log::error!("0x{addr:02x}: bus fault: {e:?}");
                        return;
                    }
                }
            }
            log::info!("{found} devices found");
        }
        Command::I2cDump { scl, sda, addr, start, count } => {
            let ctrl = SoftI2c::new(
                open_pin(&args.chip, scl),
                open_pin(&args.chip, sda),
                Delay,
                I2cTiming::default(),
            );
            let mut bus = I2c::new(ctrl);
            let mut buf = vec![0u8; count as usize];
            bus.read_register(addr, start, &mut buf)
                .expect("register read failed");
            for (i, chunk) in buf.chunks(8).enumerate() {
                let reg = start as usize + i * 8;
                let line: Vec<String> = chunk.iter().map(|b| format!("{b:02x}")).collect();
                log::info!("0x{reg:02x}: {}", line.join(" "));
            }
        }
        Command::OnewireScan { pin, alarm } => {
            let mut bus = OneWire::new(SoftOneWire::new(open_pin(&args.chip, pin), Delay));
            let kind = if alarm { SearchKind::Alarm } else { SearchKind::Normal };
            let mut search = bus.search(kind);
            let mut found = 0u32;
            loop {
                match search.next() {
                    Ok(Some(rom)) => {
                        log::info!("{rom} (family 0x{:02x})", rom.family());
                        found += 1;
                    }
                    Ok(None) => break,
                    Err(e) => {
                        log::error!("search failed: {e:?}");
                        break;
                    }
                }
            }
            log::info!("{found} devices found");
        }
    }
}
