use clap::{Subcommand, ValueEnum};
use log::debug;
use std::{fmt, str::FromStr};
use wb_common::{memory, utils::strum::IntoEnumIterator, MapError, Region};
use wb_dma::{DmaCount, DmaTransfer};
use wb_spdif::{capture, sample, Channel, DataKind, SampleFlags, SampleWidth};
use wb_uart::{DivisorLatch, UartError, DEFAULT_CLOCK_HZ};

#[derive(thiserror::Error, Debug)]
pub enum CommandError {
    #[error("{0}")]
    Map(#[from] MapError),
    #[error("{0}")]
    Uart(#[from] UartError),
    #[error("unknown region '{0}', see the `regions` command")]
    UnknownRegion(String),
    #[error("error while formatting output: {0}")]
    Format(#[from] fmt::Error),
}

/// Parses a decimal or `0x` prefixed hexadecimal number which fits in `T`.
fn parse_number<T: TryFrom<u64>>(s: &str) -> Result<T, String> {
    let s = s.replace('_', "");
    let value = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse::<u64>(),
    }
    .map_err(|e| format!("invalid number '{s}': {e}"))?;
    T::try_from(value).map_err(|_| format!("{value:#x} is out of range"))
}

fn parse_width(s: &str) -> Result<SampleWidth, String> {
    let bits = parse_number::<u32>(s)?;
    SampleWidth::new(bits).ok_or_else(|| format!("unsupported sample width {bits}, expected 16 to 24"))
}

fn parse_region(name: &str) -> Result<Region, CommandError> {
    Region::from_str(name).map_err(|_| CommandError::UnknownRegion(name.to_string()))
}

#[derive(ValueEnum, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ChannelArg {
    A,
    B,
}

impl From<ChannelArg> for Channel {
    fn from(value: ChannelArg) -> Self {
        match value {
            ChannelArg::A => Channel::A,
            ChannelArg::B => Channel::B,
        }
    }
}

#[derive(ValueEnum, Debug, Copy, Clone, PartialEq, Eq)]
pub enum KindArg {
    /// Channel status bits.
    Status,
    /// User data bits.
    User,
}

impl From<KindArg> for DataKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Status => DataKind::ChannelStatus,
            KindArg::User => DataKind::UserData,
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List every region of the memory map.
    Regions,

    /// Find the region containing an address.
    Resolve {
        #[arg(value_parser = parse_number::<u32>)]
        address: u32,
    },

    /// Print the base address and size of a region.
    Region { name: String },

    /// Calculate the divisor latch value for a baud rate.
    Baud {
        #[arg(value_parser = parse_number::<u32>)]
        rate: u32,
        /// The UART clock in Hz.
        #[arg(short, long, default_value_t = DEFAULT_CLOCK_HZ, value_parser = parse_number::<u32>)]
        clock: u32,
    },

    /// Encode a DMA_READ/DMA_WRITE value.
    DmaAddress {
        #[arg(value_parser = parse_number::<u8>)]
        device: u8,
        #[arg(value_parser = parse_number::<u32>)]
        byte_address: u32,
        /// Check that the address lies within this region.
        #[arg(short, long)]
        region: Option<String>,
    },

    /// Decode a DMA_READ/DMA_WRITE value.
    DecodeDmaAddress {
        #[arg(value_parser = parse_number::<u32>)]
        value: u32,
    },

    /// Encode a DMA_COUNT value.
    DmaCount {
        #[arg(value_parser = parse_number::<u32>)]
        bytes: u32,
        /// Start the transfer.
        #[arg(short, long)]
        start: bool,
    },

    /// Decode a DMA_COUNT value.
    DecodeDmaCount {
        #[arg(value_parser = parse_number::<u32>)]
        value: u32,
    },

    /// Encode an SPDIF channel status/user data capture descriptor.
    Capture {
        #[arg(value_parser = parse_number::<u8>)]
        length: u8,
        #[arg(value_enum)]
        channel: ChannelArg,
        #[arg(value_enum)]
        kind: KindArg,
        #[arg(value_parser = parse_number::<u8>)]
        position: u8,
    },

    /// Decode an SPDIF capture descriptor.
    DecodeCapture {
        #[arg(value_parser = parse_number::<u16>)]
        value: u16,
    },

    /// Encode an SPDIF sample word.
    Sample {
        #[arg(value_parser = parse_number::<u32>)]
        data: u32,
        /// Sample width in bits, 16 to 24.
        #[arg(short, long, value_parser = parse_width)]
        width: SampleWidth,
        #[arg(long)]
        block_start: bool,
        #[arg(long)]
        valid: bool,
        #[arg(long)]
        user_data: bool,
        #[arg(long)]
        channel_status: bool,
        #[arg(long)]
        parity: bool,
    },

    /// Decode an SPDIF sample word.
    DecodeSample {
        #[arg(value_parser = parse_number::<u32>)]
        value: u32,
        /// Sample width in bits, 16 to 24.
        #[arg(short, long, value_parser = parse_width)]
        width: SampleWidth,
    },
}

/// Prints the parsed structure as well, when enabled.
fn debug_print(out: &mut impl fmt::Write, value: &impl fmt::Debug) -> fmt::Result {
    if cfg!(feature = "debug-print") {
        writeln!(out, "{value:#x?}")?;
    }
    Ok(())
}

impl Command {
    pub fn run(self, out: &mut impl fmt::Write) -> Result<(), CommandError> {
        debug!("running {self:?}");
        match self {
            Command::Regions => {
                for region in Region::iter() {
                    let (base, size) = region.bounds();
                    writeln!(out, "{base:#06x} {size:#06x} {}", region.name())?;
                }
            }

            Command::Resolve { address } => {
                let region = Region::from_address(address)?;
                let offset = region.distance_from_start(address);
                writeln!(out, "{} + {offset:#x}", region.name())?;
            }

            Command::Region { name } => {
                let (base, size) = memory::region_bounds(parse_region(&name)?);
                writeln!(out, "base {base:#06x} size {size:#x}")?;
            }

            Command::Baud { rate, clock } => {
                let divisor = wb_uart::divisor_for(rate, clock)?;
                let latch = DivisorLatch::from(divisor);
                writeln!(
                    out,
                    "divisor {divisor} (DIVMSB {:#04x}, DIVLSB {:#04x})",
                    latch.high, latch.low
                )?;
            }

            Command::DmaAddress {
                device,
                byte_address,
                region,
            } => {
                let transfer = DmaTransfer::new(device, byte_address);
                if let Some(name) = region {
                    let address = transfer.validate(parse_region(&name)?)?;
                    debug!("transfer starts at bus address {address:#x}");
                }
                writeln!(out, "{:#010x}", transfer.encode())?;
                debug_print(out, &transfer)?;
            }

            Command::DecodeDmaAddress { value } => {
                let transfer = wb_dma::decode_address(value);
                writeln!(
                    out,
                    "device {} word address {:#x} (byte address {:#x})",
                    transfer.device.get(),
                    transfer.word_address.get(),
                    transfer.byte_address()
                )?;
                debug_print(out, &transfer)?;
            }

            Command::DmaCount { bytes, start } => {
                let count = DmaCount::from_bytes(bytes, start);
                writeln!(out, "{:#010x}", count.encode())?;
                debug_print(out, &count)?;
            }

            Command::DecodeDmaCount { value } => {
                let count = wb_dma::decode_count(value);
                writeln!(
                    out,
                    "{} words ({:#x} bytes){}",
                    count.words,
                    count.byte_count(),
                    if count.start { ", start" } else { "" }
                )?;
                debug_print(out, &count)?;
            }

            Command::Capture {
                length,
                channel,
                kind,
                position,
            } => {
                let value = capture::encode(length, channel.into(), kind.into(), position);
                writeln!(out, "{value:#06x}")?;
                debug_print(out, &capture::decode(value))?;
            }

            Command::DecodeCapture { value } => {
                let decoded = capture::decode(value);
                writeln!(
                    out,
                    "{} bits of {:?} on channel {:?} from bit {}",
                    decoded.bit_length, decoded.kind, decoded.channel, decoded.bit_position
                )?;
                debug_print(out, &decoded)?;
            }

            Command::Sample {
                data,
                width,
                block_start,
                valid,
                user_data,
                channel_status,
                parity,
            } => {
                let flags = SampleFlags {
                    block_start,
                    valid,
                    user_data,
                    channel_status,
                    parity,
                };
                let value = sample::encode(data, width, flags);
                writeln!(out, "{value:#010x}")?;
                debug_print(out, &sample::decode(value, width))?;
            }

            Command::DecodeSample { value, width } => {
                let decoded = sample::decode(value, width);
                writeln!(out, "data {:#x}", decoded.data)?;
                debug_print(out, &decoded)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(command: Command) -> Result<String, CommandError> {
        let mut out = String::new();
        command.run(&mut out)?;
        Ok(out)
    }

    #[test]
    fn numbers() {
        assert_eq!(parse_number::<u32>("4096"), Ok(4096));
        assert_eq!(parse_number::<u32>("0x1_500"), Ok(0x1500));
        assert_eq!(parse_number::<u16>("0XFFFF"), Ok(0xFFFF));
        assert!(parse_number::<u8>("256").is_err());
        assert!(parse_number::<u32>("0xZZ").is_err());
        assert_eq!(parse_width("24"), Ok(SampleWidth::Bits24));
        assert!(parse_width("12").is_err());
    }

    #[test]
    fn resolve() {
        let out = run(Command::Resolve { address: 0x1508 }).unwrap();
        assert_eq!(out, "dma + 0x8\n");
        assert!(matches!(
            run(Command::Resolve { address: 0x1600 }),
            Err(CommandError::Map(MapError::NotMapped(0x1600)))
        ));
    }

    #[test]
    fn regions() {
        let out = run(Command::Regions).unwrap();
        assert_eq!(out.lines().count(), 17);
        assert!(out.starts_with("0x0000 0x1000 data-ram\n"));

        let out = run(Command::Region {
            name: "spdif-tx-low-buffer".to_string(),
        })
        .unwrap();
        assert_eq!(out, "base 0x3800 size 0x400\n");
        assert!(matches!(
            run(Command::Region {
                name: "rom".to_string()
            }),
            Err(CommandError::UnknownRegion(_))
        ));
    }

    #[test]
    fn baud() {
        let out = run(Command::Baud {
            rate: 300,
            clock: DEFAULT_CLOCK_HZ,
        })
        .unwrap();
        assert_eq!(out, "divisor 768 (DIVMSB 0x03, DIVLSB 0x00)\n");
        assert!(matches!(
            run(Command::Baud {
                rate: 115_201,
                clock: DEFAULT_CLOCK_HZ
            }),
            Err(CommandError::Uart(UartError::UnsupportedRate { baud: 115_201 }))
        ));
    }

    #[test]
    fn dma() {
        let out = run(Command::DmaAddress {
            device: 1,
            byte_address: 0x100,
            region: None,
        })
        .unwrap();
        assert!(out.starts_with("0x40000020\n"));

        assert!(matches!(
            run(Command::DmaAddress {
                device: 0,
                byte_address: 0x1000,
                region: Some("data-ram".to_string()),
            }),
            Err(CommandError::Map(MapError::OutsideRegion {
                address: 0x1000,
                region: Region::DataRam,
                found: Region::Lcd,
            }))
        ));
        assert!(matches!(
            run(Command::DmaAddress {
                device: 0,
                byte_address: 0x80,
                region: Some("lcd".to_string()),
            }),
            Err(CommandError::Map(MapError::NotMapped(0x1080)))
        ));

        let out = run(Command::DmaCount {
            bytes: 40_000,
            start: true,
        })
        .unwrap();
        assert!(out.starts_with("0x80001000\n"));

        let out = run(Command::DecodeDmaCount { value: 0x8000_0010 }).unwrap();
        assert!(out.starts_with("16 words (0x80 bytes), start\n"));
    }

    #[test]
    fn spdif() {
        let out = run(Command::Capture {
            length: 32,
            channel: ChannelArg::B,
            kind: KindArg::Status,
            position: 24,
        })
        .unwrap();
        assert!(out.starts_with("0x18e0\n"));

        let out = run(Command::DecodeCapture { value: 0x18E0 }).unwrap();
        assert!(out.starts_with("32 bits of ChannelStatus on channel B from bit 24\n"));

        let out = run(Command::Sample {
            data: 0x12_3456,
            width: SampleWidth::Bits16,
            block_start: false,
            valid: false,
            user_data: false,
            channel_status: false,
            parity: true,
        })
        .unwrap();
        assert!(out.starts_with("0x80003456\n"));
        if cfg!(feature = "debug-print") {
            assert!(out.contains("data: 0x3456"));
            assert!(out.contains("parity: true"));
        }

        let out = run(Command::DecodeSample {
            value: 0x8012_3456,
            width: SampleWidth::Bits20,
        })
        .unwrap();
        assert!(out.starts_with("data 0x23456\n"));
    }
}
