//! Access to memory-mapped registers, and an in-memory register file to test against.

use crate::{
    memory::{MapError, PhysicalAddress, Region, BUS_LEN},
    utils::boxed_array,
};
use log::trace;
use std::fmt;

/// Single, ordered, non-cached register reads and writes.
///
/// Implementations talking to real hardware are expected to perform exactly one bus access per call, in program order.
pub trait Mmio {
    type Error;

    fn read8(&mut self, address: PhysicalAddress) -> Result<u8, Self::Error>;
    fn read16(&mut self, address: PhysicalAddress) -> Result<u16, Self::Error>;
    fn read32(&mut self, address: PhysicalAddress) -> Result<u32, Self::Error>;

    fn write8(&mut self, address: PhysicalAddress, value: u8) -> Result<(), Self::Error>;
    fn write16(&mut self, address: PhysicalAddress, value: u16) -> Result<(), Self::Error>;
    fn write32(&mut self, address: PhysicalAddress, value: u32) -> Result<(), Self::Error>;
}

/// The width of a single bus access.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Width {
    Byte,
    Half,
    Word,
}

impl Width {
    #[must_use]
    pub const fn bytes(self) -> usize {
        match self {
            Width::Byte => 1,
            Width::Half => 2,
            Width::Word => 4,
        }
    }
}

/// An integer that can be transferred over the bus in a single access.
pub trait RegisterValue: Copy + fmt::Debug {
    const WIDTH: Width;

    /// Read a value of this width from the given address.
    ///
    /// # Errors
    /// Propagates the error of the underlying [`Mmio`] implementation.
    fn read_from<M: Mmio + ?Sized>(mmio: &mut M, address: PhysicalAddress) -> Result<Self, M::Error>;

    /// Write this value to the given address.
    ///
    /// # Errors
    /// Propagates the error of the underlying [`Mmio`] implementation.
    fn write_to<M: Mmio + ?Sized>(
        self,
        mmio: &mut M,
        address: PhysicalAddress,
    ) -> Result<(), M::Error>;
}

macro_rules! impl_register_value {
    ($ty:ty, $width:expr, $read:ident, $write:ident) => {
        impl RegisterValue for $ty {
            const WIDTH: Width = $width;

            #[inline]
            fn read_from<M: Mmio + ?Sized>(
                mmio: &mut M,
                address: PhysicalAddress,
            ) -> Result<Self, M::Error> {
                mmio.$read(address)
            }

            #[inline]
            fn write_to<M: Mmio + ?Sized>(
                self,
                mmio: &mut M,
                address: PhysicalAddress,
            ) -> Result<(), M::Error> {
                mmio.$write(address, self)
            }
        }
    };
}

impl_register_value!(u8, Width::Byte, read8, write8);
impl_register_value!(u16, Width::Half, read16, write16);
impl_register_value!(u32, Width::Word, read32, write32);

/// A typed register, living at a fixed offset within a region of the memory map.
pub trait Register: Copy + From<Self::Raw> + Into<Self::Raw> {
    type Raw: RegisterValue;

    /// The region of the memory map containing this register.
    const REGION: Region;
    /// The offset in bytes from the start of [`Self::REGION`].
    const OFFSET: usize;

    /// The absolute bus address of this register.
    #[must_use]
    fn address() -> PhysicalAddress {
        Self::REGION.offset(Self::OFFSET)
    }
}

/// Typed register access on top of any [`Mmio`] implementation.
pub trait MmioExt: Mmio {
    /// Reads and parses the register `R`.
    ///
    /// # Errors
    /// Propagates the error of the underlying [`Mmio`] implementation.
    fn read_register<R: Register>(&mut self) -> Result<R, Self::Error> {
        R::Raw::read_from(self, R::address()).map(R::from)
    }

    /// Writes the register `R`.
    ///
    /// # Errors
    /// Propagates the error of the underlying [`Mmio`] implementation.
    fn write_register<R: Register>(&mut self, register: R) -> Result<(), Self::Error> {
        let raw: R::Raw = register.into();
        raw.write_to(self, R::address())
    }

    /// Reads a register of type `R` at an explicit offset within its region, for indexed registers.
    ///
    /// # Errors
    /// Propagates the error of the underlying [`Mmio`] implementation.
    fn read_register_at<R: Register>(&mut self, offset: usize) -> Result<R, Self::Error> {
        R::Raw::read_from(self, R::REGION.offset(offset)).map(R::from)
    }

    /// Writes a register of type `R` at an explicit offset within its region, for indexed registers.
    ///
    /// # Errors
    /// Propagates the error of the underlying [`Mmio`] implementation.
    fn write_register_at<R: Register>(
        &mut self,
        offset: usize,
        register: R,
    ) -> Result<(), Self::Error> {
        let raw: R::Raw = register.into();
        raw.write_to(self, R::REGION.offset(offset))
    }
}

impl<M: Mmio + ?Sized> MmioExt for M {}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AccessKind {
    Read,
    Write,
}

/// A single access recorded by a [`RegisterFile`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Access {
    pub kind: AccessKind,
    pub address: PhysicalAddress,
    pub width: Width,
    pub value: u32,
}

/// An in-memory stand-in for the register file of the whole bus.
///
/// Backed by plain little-endian memory, so it has none of the side effects of the real peripherals.
/// Every access is checked against the memory map and recorded, in order.
pub struct RegisterFile {
    memory: Box<[u8; BUS_LEN]>,
    log: Vec<Access>,
}

impl RegisterFile {
    #[must_use]
    pub fn new() -> Self {
        Self {
            memory: boxed_array(),
            log: Vec::new(),
        }
    }

    /// All accesses made so far, oldest first.
    #[must_use]
    pub fn accesses(&self) -> &[Access] {
        &self.log
    }

    /// The addresses and values of all writes made so far, oldest first.
    pub fn writes(&self) -> impl Iterator<Item = (PhysicalAddress, u32)> + '_ {
        self.log
            .iter()
            .filter(|access| access.kind == AccessKind::Write)
            .map(|access| (access.address, access.value))
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    fn slice(&mut self, address: PhysicalAddress, width: Width) -> Result<&mut [u8], MapError> {
        let region = Region::from_address(address)?;
        let last = address + (width.bytes() as PhysicalAddress - 1);
        if !region.contains(last) {
            return Err(MapError::NotMapped(last));
        }
        let start = address as usize;
        Ok(&mut self.memory[start..start + width.bytes()])
    }

    fn load(&mut self, address: PhysicalAddress, width: Width) -> Result<u32, MapError> {
        let bytes = self.slice(address, width)?;
        let value = bytes
            .iter()
            .rev()
            .fold(0_u32, |acc, byte| (acc << 8) | u32::from(*byte));
        trace!("read {width:?} at {address:#x}: {value:#x}");
        self.log.push(Access {
            kind: AccessKind::Read,
            address,
            width,
            value,
        });
        Ok(value)
    }

    fn store(&mut self, address: PhysicalAddress, width: Width, value: u32) -> Result<(), MapError> {
        trace!("write {width:?} at {address:#x}: {value:#x}");
        let bytes = self.slice(address, width)?;
        bytes.copy_from_slice(&value.to_le_bytes()[..width.bytes()]);
        self.log.push(Access {
            kind: AccessKind::Write,
            address,
            width,
            value,
        });
        Ok(())
    }
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RegisterFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterFile")
            .field("accesses", &self.log.len())
            .finish_non_exhaustive()
    }
}

#[allow(clippy::cast_possible_truncation)] // `load` never returns more bits than the access width
impl Mmio for RegisterFile {
    type Error = MapError;

    fn read8(&mut self, address: PhysicalAddress) -> Result<u8, Self::Error> {
        self.load(address, Width::Byte).map(|value| value as u8)
    }

    fn read16(&mut self, address: PhysicalAddress) -> Result<u16, Self::Error> {
        self.load(address, Width::Half).map(|value| value as u16)
    }

    fn read32(&mut self, address: PhysicalAddress) -> Result<u32, Self::Error> {
        self.load(address, Width::Word)
    }

    fn write8(&mut self, address: PhysicalAddress, value: u8) -> Result<(), Self::Error> {
        self.store(address, Width::Byte, value.into())
    }

    fn write16(&mut self, address: PhysicalAddress, value: u16) -> Result<(), Self::Error> {
        self.store(address, Width::Half, value.into())
    }

    fn write32(&mut self, address: PhysicalAddress, value: u32) -> Result<(), Self::Error> {
        self.store(address, Width::Word, value)
    }
}
