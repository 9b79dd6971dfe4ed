//! The 16550 compatible UART: baud rate divisors, and the layout of its registers.

pub use self::register::{
    DataBits, FifoControl, InterruptEnable, InterruptIdentification, InterruptKind, LineControl,
    LineStatus, ModemControl, ModemStatus, RxHighWater, DATA_OFFSET,
};
use wb_common::{log::debug, PhysicalAddress, Region};

pub mod register;

#[derive(thiserror::Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum UartError {
    #[error("Unsupported baud rate {baud}, rates must be between 1 and {}", MAX_BAUD)]
    UnsupportedRate { baud: u32 },
}

pub type UartResult<T> = Result<T, UartError>;

/// The fastest rate the UART supports.
pub const MAX_BAUD: u32 = 115_200;

/// The UART clock the standard divisors were derived from.
pub const DEFAULT_CLOCK_HZ: u32 = 3_686_400;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BaudEntry {
    pub baud: u32,
    pub divisor: u16,
}

impl BaudEntry {
    const fn new(baud: u32, divisor: u16) -> Self {
        Self { baud, divisor }
    }
}

/// The standard rates, sorted by baud. These divisors are used as-is, even for clocks they were not derived from.
pub const BAUD_TABLE: [BaudEntry; 10] = [
    BaudEntry::new(300, 768),
    BaudEntry::new(600, 384),
    BaudEntry::new(1200, 192),
    BaudEntry::new(2400, 96),
    BaudEntry::new(4800, 48),
    BaudEntry::new(9600, 24),
    BaudEntry::new(19200, 12),
    BaudEntry::new(38400, 6),
    BaudEntry::new(57600, 4),
    BaudEntry::new(115_200, 2),
];

/// Calculates the value of the divisor latches for the given baud rate.
///
/// Standard rates come straight from [`BAUD_TABLE`], anything else is derived from the clock
/// as `(clock_hz / 16) / baud`, truncated to 16 bits. That may well be zero for large rates on slow clocks.
///
/// # Errors
/// Returns [`UartError::UnsupportedRate`] for rates above [`MAX_BAUD`], or a rate of zero.
///
/// # Examples
/// ```
/// use wb_uart::{divisor_for, DEFAULT_CLOCK_HZ};
/// assert_eq!(divisor_for(9600, DEFAULT_CLOCK_HZ), Ok(24));
/// assert_eq!(divisor_for(14400, DEFAULT_CLOCK_HZ), Ok(16));
/// assert!(divisor_for(230_400, DEFAULT_CLOCK_HZ).is_err());
/// ```
pub fn divisor_for(baud: u32, clock_hz: u32) -> UartResult<u16> {
    if baud > MAX_BAUD || baud == 0 {
        return Err(UartError::UnsupportedRate { baud });
    }

    if let Ok(index) = BAUD_TABLE.binary_search_by_key(&baud, |entry| entry.baud) {
        return Ok(BAUD_TABLE[index].divisor);
    }

    let divisor = (clock_hz >> 4) / baud;
    debug!("no standard divisor for {baud} baud, derived {divisor:#x} from a {clock_hz} Hz clock");
    #[allow(clippy::cast_possible_truncation)]
    let divisor = (divisor & 0xFFFF) as u16;
    Ok(divisor)
}

/// The two divisor latches, accessible at offsets 0 and 1 while `LCR[7]` is set.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct DivisorLatch {
    pub low: u8,
    pub high: u8,
}

impl DivisorLatch {
    pub const LOW_OFFSET: usize = 0x0;
    pub const HIGH_OFFSET: usize = 0x1;

    /// Bus address of `DIVLSB`.
    #[must_use]
    pub const fn low_address() -> PhysicalAddress {
        Region::Uart.offset(Self::LOW_OFFSET)
    }

    /// Bus address of `DIVMSB`.
    #[must_use]
    pub const fn high_address() -> PhysicalAddress {
        Region::Uart.offset(Self::HIGH_OFFSET)
    }

    #[must_use]
    pub const fn divisor(self) -> u16 {
        u16::from_le_bytes([self.low, self.high])
    }
}

impl From<u16> for DivisorLatch {
    fn from(divisor: u16) -> Self {
        let [low, high] = divisor.to_le_bytes();
        Self { low, high }
    }
}

impl From<DivisorLatch> for u16 {
    fn from(latch: DivisorLatch) -> Self {
        latch.divisor()
    }
}
