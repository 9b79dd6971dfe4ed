//! Register definitions for the GPIO controller, Wishbone slave 5 (3 x 8), which also holds the instruction base.

use crate::per_line_register;
use wb_common::{utils::tartan_bitfield::bitfield, Region, Register};

bitfield! {
    /// Known as `GPIO_DIR`. Set for outputs, unset for inputs.
    pub struct Direction(u8) {
        [0..=7] pub lines: u8,
    }
}

per_line_register!(Direction);

impl Register for Direction {
    type Raw = u8;
    const REGION: Region = Region::Gpio;
    const OFFSET: usize = 0x0;
}

bitfield! {
    /// Known as `GPIO_LINE`. Reads the inputs, writes the outputs.
    pub struct Line(u8) {
        [0..=7] pub lines: u8,
    }
}

per_line_register!(Line);

impl Register for Line {
    type Raw = u8;
    const REGION: Region = Region::Gpio;
    const OFFSET: usize = 0x1;
}

/// The memory the processor core executes from.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum InstructionMemory {
    #[default]
    Imem,
    Bmem,
}

bitfield! {
    /// Known as `IBASE`. Any write to this register resets the processor core.
    pub struct InstructionBase(u8) {
        /// Set to run from BMEM, unset to run from IMEM.
        [7] pub boot_memory,
    }
}

impl InstructionBase {
    #[must_use]
    pub fn memory(self) -> InstructionMemory {
        if self.boot_memory() {
            InstructionMemory::Bmem
        } else {
            InstructionMemory::Imem
        }
    }

    #[must_use]
    pub fn new(memory: InstructionMemory) -> Self {
        let mut ibase = Self::default();
        ibase.set_boot_memory(memory == InstructionMemory::Bmem);
        ibase
    }
}

impl Register for InstructionBase {
    type Raw = u8;
    const REGION: Region = Region::Gpio;
    const OFFSET: usize = 0x2;
}

#[cfg(test)]
mod tests {
    use super::*;
    use wb_common::{Mmio, MmioExt, RegisterFile};

    #[test]
    fn instruction_base() {
        assert_eq!(u8::from(InstructionBase::new(InstructionMemory::Bmem)), 0x80);
        assert_eq!(u8::from(InstructionBase::new(InstructionMemory::Imem)), 0x00);
        assert_eq!(InstructionBase::from(0x80).memory(), InstructionMemory::Bmem);
    }

    #[test]
    fn registers() {
        let mut regs = RegisterFile::new();
        let mut direction = Direction::default();
        direction.set_line(7, true);
        direction.set_line(0, true);
        regs.write_register(direction).unwrap();
        regs.write_register(InstructionBase::new(InstructionMemory::Bmem)).unwrap();

        assert_eq!(regs.read8(0x1400), Ok(0x81));
        assert_eq!(regs.read8(0x1402), Ok(0x80));
        let line: Line = regs.read_register().unwrap();
        assert_eq!(line.lines(), 0);
    }
}
