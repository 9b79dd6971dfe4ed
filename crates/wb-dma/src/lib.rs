//! Codecs for the DMA controller's transfer descriptors.
//!
//! The controller moves data in 64-bit words, so every byte address or count given to it is shifted down by three.
//! Values that do not fit the registers are truncated (addresses, device ids) or saturated (counts), exactly like the
//! hardware would, rather than being rejected.

pub use self::register::{DmaCountRegister, DmaRead, DmaWrite};
use wb_common::{log::debug, MapError, PhysicalAddress, Region};

mod register;

/// Byte address >> 3 = 64-bit word address.
pub const WORD_SHIFT: u32 = 3;
/// The largest amount of words a single transfer can move.
pub const MAX_WORDS: u16 = 0x1000;
/// The largest amount of bytes a single transfer can move, larger counts saturate to this.
pub const MAX_BYTES: u32 = (MAX_WORDS as u32) << WORD_SHIFT;

/// A 2-bit device id, selecting one side of a transfer.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeviceId(u8);

impl DeviceId {
    pub const MASK: u8 = 0b11;

    /// Creates a device id, truncating it to two bits.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id & Self::MASK)
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

/// A 12-bit address of a 64-bit word.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WordAddress(u16);

impl WordAddress {
    pub const MASK: u16 = 0xFFF;

    /// Creates a word address, truncating it to 12 bits.
    #[must_use]
    pub const fn new(word: u16) -> Self {
        Self(word & Self::MASK)
    }

    /// The word containing the given byte address. Addresses past the 12-bit window wrap around.
    ///
    /// # Examples
    /// ```
    /// use wb_dma::WordAddress;
    /// assert_eq!(WordAddress::from_byte_address(0x18).get(), 3);
    /// assert_eq!(WordAddress::from_byte_address(0x8008).get(), 1);
    /// ```
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub const fn from_byte_address(byte_address: u32) -> Self {
        Self::new((byte_address >> WORD_SHIFT) as u16)
    }

    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }

    /// The byte address the word starts at.
    #[must_use]
    pub const fn byte_address(self) -> u32 {
        (self.0 as u32) << WORD_SHIFT
    }
}

/// One side of a transfer, as held by `DMA_READ` or `DMA_WRITE`.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct DmaTransfer {
    pub device: DeviceId,
    pub word_address: WordAddress,
}

impl DmaTransfer {
    #[must_use]
    pub const fn new(device: u8, byte_address: u32) -> Self {
        Self {
            device: DeviceId::new(device),
            word_address: WordAddress::from_byte_address(byte_address),
        }
    }

    /// The register value for `DMA_READ` or `DMA_WRITE`; both share this layout.
    #[must_use]
    pub fn encode(self) -> u32 {
        let mut register = DmaRead::default();
        register.set_device(self.device.get());
        register.set_word_address(self.word_address.get());
        register.into()
    }

    #[must_use]
    pub fn decode(value: u32) -> Self {
        let register = DmaRead::from(value);
        Self {
            device: DeviceId::new(register.device()),
            word_address: WordAddress::new(register.word_address()),
        }
    }

    /// The byte address this side of the transfer starts at, truncated to the word it lies in.
    #[must_use]
    pub const fn byte_address(self) -> u32 {
        self.word_address.byte_address()
    }

    /// Checks that the transfer starts inside `region`, treating the address as an offset from the start of it.
    /// Only meant for diagnostics; the encoders never call this.
    ///
    /// # Errors
    /// Returns [`MapError::OutsideRegion`] if the bus address falls in another region,
    /// or [`MapError::NotMapped`] if it falls in a gap of the memory map.
    pub fn validate(self, region: Region) -> Result<PhysicalAddress, MapError> {
        let address = region.offset(self.byte_address() as usize);
        if region.contains(address) {
            return Ok(address);
        }
        let found = Region::from_address(address)?;
        Err(MapError::OutsideRegion {
            address,
            region,
            found,
        })
    }
}

impl From<DmaRead> for DmaTransfer {
    fn from(value: DmaRead) -> Self {
        Self::decode(value.into())
    }
}

impl From<DmaWrite> for DmaTransfer {
    fn from(value: DmaWrite) -> Self {
        Self::decode(value.into())
    }
}

impl From<DmaTransfer> for DmaRead {
    fn from(value: DmaTransfer) -> Self {
        Self::from(value.encode())
    }
}

impl From<DmaTransfer> for DmaWrite {
    fn from(value: DmaTransfer) -> Self {
        Self::from(value.encode())
    }
}

/// The length of a transfer, as held by `DMA_COUNT`.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct DmaCount {
    /// Number of 64-bit words, at most [`MAX_WORDS`].
    pub words: u16,
    /// Whether writing this value starts the transfer.
    pub start: bool,
}

impl DmaCount {
    /// Converts a byte count to words, saturating anything above [`MAX_BYTES`] to [`MAX_WORDS`].
    ///
    /// # Examples
    /// ```
    /// use wb_dma::DmaCount;
    /// assert_eq!(DmaCount::from_bytes(64, false).words, 8);
    /// assert_eq!(DmaCount::from_bytes(u32::MAX, true).words, 4096);
    /// ```
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn from_bytes(byte_count: u32, start: bool) -> Self {
        let words = if byte_count > MAX_BYTES {
            debug!("DMA count of {byte_count:#x} bytes saturated to {MAX_WORDS:#x} words");
            MAX_WORDS
        } else {
            (byte_count >> WORD_SHIFT) as u16
        };
        Self { words, start }
    }

    /// The amount of bytes this count transfers.
    #[must_use]
    pub const fn byte_count(self) -> u32 {
        (self.words as u32) << WORD_SHIFT
    }

    #[must_use]
    pub fn encode(self) -> u32 {
        let mut register = DmaCountRegister::default();
        register.set_words(self.words.min(MAX_WORDS));
        register.set_start(self.start);
        register.into()
    }

    /// Parses a `DMA_COUNT` value. Counts the register can hold but the controller can not are clamped.
    #[must_use]
    pub fn decode(value: u32) -> Self {
        let register = DmaCountRegister::from(value);
        Self {
            words: register.words().min(MAX_WORDS),
            start: register.start(),
        }
    }
}

impl From<DmaCountRegister> for DmaCount {
    fn from(value: DmaCountRegister) -> Self {
        Self::decode(value.into())
    }
}

impl From<DmaCount> for DmaCountRegister {
    fn from(value: DmaCount) -> Self {
        Self::from(value.encode())
    }
}

/// Packs a device id and byte address into a `DMA_READ`/`DMA_WRITE` value.
///
/// # Examples
/// ```
/// assert_eq!(wb_dma::encode_address(1, 0x100), 0x4000_0020);
/// ```
#[must_use]
pub fn encode_address(device: u8, byte_address: u32) -> u32 {
    DmaTransfer::new(device, byte_address).encode()
}

#[must_use]
pub fn decode_address(value: u32) -> DmaTransfer {
    DmaTransfer::decode(value)
}

/// Packs a byte count into a `DMA_COUNT` value, optionally starting the transfer.
#[must_use]
pub fn encode_count(byte_count: u32, start: bool) -> u32 {
    DmaCount::from_bytes(byte_count, start).encode()
}

#[must_use]
pub fn decode_count(value: u32) -> DmaCount {
    DmaCount::decode(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wb_common::{Mmio, MmioExt, RegisterFile};

    #[test]
    fn address_layout() {
        assert_eq!(encode_address(0, 0), 0);
        assert_eq!(encode_address(3, 0x7FF8), 0xC000_0FFF);
        assert_eq!(encode_address(2, 0x0FFF), 0x8000_01FF);
        // Device ids and addresses are truncated, not rejected.
        assert_eq!(encode_address(7, 0x8000), 0xC000_0000);
        assert_eq!(encode_address(4, 0x10), 0x0000_0002);
    }

    #[test]
    fn address_round_trip() {
        let addresses = [0, 7, 8, 0x1234, 0x7FFF, 0x8000, 0xFFFF_FFFF, 0xDEAD_BEEF];
        for device in 0..=u8::MAX {
            for address in addresses {
                let transfer = decode_address(encode_address(device, address));
                assert_eq!(transfer.device.get(), device & 0x3);
                assert_eq!(
                    u32::from(transfer.word_address.get()),
                    (address >> 3) & 0xFFF
                );
            }
        }
    }

    #[test]
    fn decode_ignores_reserved_bits() {
        let transfer = decode_address(0x7FFF_F000);
        assert_eq!(transfer.device.get(), 1);
        assert_eq!(transfer.word_address.get(), 0);
    }

    #[test]
    fn count_saturation() {
        let count = decode_count(encode_count(32768, true));
        assert_eq!(count, DmaCount { words: 4096, start: true });

        let count = decode_count(encode_count(32769, true));
        assert_eq!(count.words, 4096);
        assert!(count.start);

        let count = decode_count(encode_count(32760, false));
        assert_eq!(count, DmaCount { words: 4095, start: false });

        assert_eq!(encode_count(32768, true), 0x8000_1000);
        assert_eq!(encode_count(u32::MAX, false), 0x0000_1000);
        assert_eq!(encode_count(7, false), 0);
    }

    #[test]
    fn count_decode_clamps() {
        assert_eq!(decode_count(0x0000_1FFF).words, MAX_WORDS);
        assert_eq!(decode_count(0x8000_0FFF).words, 0xFFF);
    }

    #[test]
    fn byte_conversions() {
        assert_eq!(DmaTransfer::new(1, 0x123).byte_address(), 0x120);
        assert_eq!(DmaCount::from_bytes(100, false).byte_count(), 96);
    }

    #[test]
    fn validate_against_region() {
        assert_eq!(
            DmaTransfer::new(0, 0x0FF8).validate(Region::DataRam),
            Ok(0x0FF8)
        );
        assert_eq!(
            DmaTransfer::new(1, 0x3F8).validate(Region::SpdifRxHighBuffer),
            Ok(0x2FF8)
        );
    }

    #[test]
    fn validate_reports_the_region_it_landed_in() {
        // Past the end of data RAM is the LCD.
        assert_eq!(
            DmaTransfer::new(0, 0x1000).validate(Region::DataRam),
            Err(MapError::OutsideRegion {
                address: 0x1000,
                region: Region::DataRam,
                found: Region::Lcd,
            })
        );
        assert_eq!(
            DmaTransfer::new(1, 0x400).validate(Region::SpdifRxHighBuffer),
            Err(MapError::OutsideRegion {
                address: 0x3000,
                region: Region::SpdifRxHighBuffer,
                found: Region::SpdifTxRegisters,
            })
        );
        assert_eq!(wb_common::memory::resolve(0x3000), Ok("spdif-tx-registers"));
    }

    #[test]
    fn validate_reports_gaps() {
        // The LCD is followed by a gap up to the UART.
        assert_eq!(
            DmaTransfer::new(0, 0x80).validate(Region::Lcd),
            Err(MapError::NotMapped(0x1080))
        );
        assert_eq!(wb_common::memory::resolve(0x1080), Err(MapError::NotMapped(0x1080)));
    }

    #[test]
    fn program_transfer() {
        let mut regs = RegisterFile::new();
        let source = DmaTransfer::new(0, 0x0200);
        let destination = DmaTransfer::new(2, 0x0000);
        let count = DmaCount::from_bytes(0x400, true);

        // The address registers have to be set up before the count starts the transfer.
        regs.write_register(DmaRead::from(source)).unwrap();
        regs.write_register(DmaWrite::from(destination)).unwrap();
        regs.write_register(DmaCountRegister::from(count)).unwrap();

        let writes: Vec<_> = regs.writes().collect();
        assert_eq!(
            writes,
            [(0x1500, 0x0000_0040), (0x1504, 0x8000_0000), (0x1508, 0x8000_0080)]
        );

        let read: DmaRead = regs.read_register().unwrap();
        assert_eq!(DmaTransfer::from(read), source);
        assert_eq!(decode_count(regs.read32(0x1508).unwrap()), count);
    }
}
