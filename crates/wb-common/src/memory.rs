use std::ops::Range;
use strum::{EnumCount, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

#[derive(thiserror::Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum MapError {
    #[error("The address {0:#x} is not mapped to any region.")]
    NotMapped(PhysicalAddress),
    #[error("The address {address:#x} lies in {}, not in {}.", .found.name(), .region.name())]
    OutsideRegion {
        address: PhysicalAddress,
        region: Region,
        found: Region,
    },
}

/// A byte address on the Wishbone bus.
pub type PhysicalAddress = u32;

/// The amount of bytes addressable on the bus, every region lies below this.
pub const BUS_LEN: usize = 0x4000;

/// Regions of the Wishbone bus memory map, one per slave (or buffer within a slave).
///
/// The map is a fixed table: regions never overlap, and the gaps between them are unmapped.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, EnumCount, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case")]
pub enum Region {
    /// Slave 0, 4k x 8.
    DataRam,
    /// Slave 1, a memory mapped 16x2 character LCD.
    Lcd,
    /// Slave 2, 16550 compatible.
    Uart,
    /// Slave 3, 8 x 32.
    Spi,
    /// Slave 4, interrupt controller.
    Pic,
    /// Slave 5, GPIO and the instruction base register.
    Gpio,
    /// Slave 6, 3 x 32.
    Dma,
    /// Slave 7, control and capture registers.
    SpdifRxRegisters,
    SpdifRxLowBuffer,
    SpdifRxHighBuffer,
    /// Slave 8, control registers.
    SpdifTxRegisters,
    SpdifTxUserDataLowBuffer,
    SpdifTxUserDataHighBuffer,
    SpdifTxChannelStatusLowBuffer,
    SpdifTxChannelStatusHighBuffer,
    SpdifTxLowBuffer,
    SpdifTxHighBuffer,
}

impl Region {
    /// Returns the region which contains the given address.
    ///
    /// # Errors
    /// Returns an error if the address lies in a gap between regions.
    #[inline]
    pub fn from_address(addr: PhysicalAddress) -> Result<Self, MapError> {
        Self::iter()
            .find(|region| region.contains(addr))
            .ok_or(MapError::NotMapped(addr))
    }

    /// The kebab-case name of this region, as accepted by [`std::str::FromStr`].
    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// The base address and size in bytes of this region.
    #[must_use]
    #[inline]
    pub const fn bounds(self) -> (PhysicalAddress, u32) {
        match self {
            Region::DataRam => (0x0000, 0x1000),
            Region::Lcd => (0x1000, 0x80),
            Region::Uart => (0x1100, 0x8),
            Region::Spi => (0x1200, 0x20),
            Region::Pic => (0x1300, 0x4),
            Region::Gpio => (0x1400, 0x3),
            Region::Dma => (0x1500, 0xC),
            Region::SpdifRxRegisters => (0x2000, 0x80),
            Region::SpdifRxLowBuffer => (0x2800, 0x400),
            Region::SpdifRxHighBuffer => (0x2C00, 0x400),
            Region::SpdifTxRegisters => (0x3000, 0x80),
            Region::SpdifTxUserDataLowBuffer => (0x3080, 0x30),
            Region::SpdifTxUserDataHighBuffer => (0x30B0, 0x30),
            Region::SpdifTxChannelStatusLowBuffer => (0x3100, 0x30),
            Region::SpdifTxChannelStatusHighBuffer => (0x3130, 0x30),
            Region::SpdifTxLowBuffer => (0x3800, 0x400),
            Region::SpdifTxHighBuffer => (0x3C00, 0x400),
        }
    }

    /// The range of addresses which this region occupies.
    #[must_use]
    #[inline]
    pub const fn range(self) -> Range<PhysicalAddress> {
        let (base, size) = self.bounds();
        base..(base + size)
    }

    /// The address this region starts at.
    #[must_use]
    #[inline]
    pub const fn start(self) -> PhysicalAddress {
        self.bounds().0
    }

    /// The address this region ends at.
    #[must_use]
    #[inline]
    pub const fn end(self) -> PhysicalAddress {
        self.range().end
    }

    /// The size of this region, in bytes.
    #[allow(clippy::len_without_is_empty)] // This is not a collection.
    #[must_use]
    #[inline]
    pub const fn len(self) -> usize {
        self.bounds().1 as usize
    }

    /// Returns whether the given address resides within this region.
    #[must_use]
    #[inline]
    pub const fn contains(self, addr: PhysicalAddress) -> bool {
        (addr >= self.start()) && (addr < self.end())
    }

    /// The address within this region which is `offset` bytes from the regions start.
    /// Saturates to [`PhysicalAddress::MAX`], which no region contains.
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    #[inline]
    pub const fn offset(self, offset: usize) -> PhysicalAddress {
        if offset > PhysicalAddress::MAX as usize {
            return PhysicalAddress::MAX;
        }
        self.start().saturating_add(offset as PhysicalAddress)
    }

    /// The amount of bytes from the start of this region to the given address.
    #[must_use]
    #[inline]
    pub const fn distance_from_start(self, addr: PhysicalAddress) -> usize {
        debug_assert!(self.contains(addr));
        (addr - self.start()) as usize
    }
}

impl TryFrom<PhysicalAddress> for Region {
    type Error = MapError;

    fn try_from(addr: PhysicalAddress) -> Result<Self, Self::Error> {
        Self::from_address(addr)
    }
}

/// Resolves an address to the name of the region containing it.
///
/// # Errors
/// Returns [`MapError::NotMapped`] if the address lies outside every region.
///
/// # Examples
/// ```
/// assert_eq!(wb_common::memory::resolve(0x1503), Ok("dma"));
/// assert!(wb_common::memory::resolve(0x1600).is_err());
/// ```
pub fn resolve(addr: PhysicalAddress) -> Result<&'static str, MapError> {
    Region::from_address(addr).map(Region::name)
}

/// The base address and size in bytes of the given region.
#[must_use]
pub const fn region_bounds(region: Region) -> (PhysicalAddress, u32) {
    region.bounds()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn resolve_region_edges() {
        assert_eq!(Region::from_address(0x0000), Ok(Region::DataRam));
        assert_eq!(Region::from_address(0x0FFF), Ok(Region::DataRam));
        assert_eq!(Region::from_address(0x1000), Ok(Region::Lcd));
        assert_eq!(Region::from_address(0x1107), Ok(Region::Uart));
        assert_eq!(Region::from_address(0x1402), Ok(Region::Gpio));
        assert_eq!(Region::from_address(0x150B), Ok(Region::Dma));
        assert_eq!(Region::from_address(0x2BFF), Ok(Region::SpdifRxLowBuffer));
        assert_eq!(Region::from_address(0x2C00), Ok(Region::SpdifRxHighBuffer));
        assert_eq!(
            Region::from_address(0x30B0),
            Ok(Region::SpdifTxUserDataHighBuffer)
        );
        assert_eq!(Region::from_address(0x3FFF), Ok(Region::SpdifTxHighBuffer));
    }

    #[test]
    fn resolve_gaps() {
        for addr in [0x1080, 0x1108, 0x1220, 0x1304, 0x1403, 0x150C, 0x2080, 0x3160, 0x4000] {
            assert_eq!(Region::from_address(addr), Err(MapError::NotMapped(addr)));
        }
    }

    #[test]
    fn regions_are_disjoint() {
        for a in Region::iter() {
            for b in Region::iter().filter(|b| *b != a) {
                assert!(
                    a.end() <= b.start() || b.end() <= a.start(),
                    "{a:?} overlaps {b:?}"
                );
            }
        }
    }

    #[test]
    fn regions_are_aligned() {
        for region in Region::iter() {
            let (base, size) = region.bounds();
            if size.is_power_of_two() {
                assert_eq!(base % size, 0, "{region:?} is not aligned to its size");
            }
            assert!(region.end() as usize <= BUS_LEN);
        }
    }

    #[test]
    fn names_round_trip() {
        assert_eq!(Region::COUNT, 17);
        for region in Region::iter() {
            assert_eq!(Region::from_str(region.name()), Ok(region));
        }
        assert_eq!(resolve(0x2044), Ok("spdif-rx-registers"));
        assert_eq!(region_bounds(Region::from_str("uart").unwrap()), (0x1100, 8));
    }

    #[test]
    fn offsets() {
        assert_eq!(Region::Dma.offset(0x8), 0x1508);
        assert_eq!(Region::SpdifRxRegisters.distance_from_start(0x2048), 0x48);
        assert_eq!(Region::SpdifTxLowBuffer.len(), 0x400);
    }

    #[test]
    fn large_offsets_saturate() {
        assert_eq!(Region::SpdifTxHighBuffer.offset(usize::MAX), PhysicalAddress::MAX);
        assert_eq!(Region::Dma.offset(0xFFFF_F000), PhysicalAddress::MAX);
        assert_eq!(
            Region::from_address(Region::Dma.offset(usize::MAX)),
            Err(MapError::NotMapped(PhysicalAddress::MAX))
        );
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            MapError::NotMapped(0x1600).to_string(),
            "The address 0x1600 is not mapped to any region."
        );
        let outside = MapError::OutsideRegion {
            address: 0x3000,
            region: Region::SpdifRxHighBuffer,
            found: Region::SpdifTxRegisters,
        };
        assert_eq!(
            outside.to_string(),
            "The address 0x3000 lies in spdif-tx-registers, not in spdif-rx-high-buffer."
        );
    }
}
