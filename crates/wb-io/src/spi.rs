//! Register definitions for the SPI master, Wishbone slave 3 (8 x 32).

use wb_common::{utils::tartan_bitfield::bitfield, Region, Register};

/// The four data registers hold up to 128 bits: received data when read, data to transmit when written.
pub const DATA_REGISTERS: usize = 4;
/// Offset of the clock divider register.
pub const DIVIDER_OFFSET: usize = 0x14;
/// Offset of the slave select register.
pub const SLAVE_SELECT_OFFSET: usize = 0x18;

/// Offset of the data register `n`, only the low two bits of `n` are used.
#[must_use]
pub const fn data_offset(n: usize) -> usize {
    (n & 0x3) * 4
}

bitfield! {
    /// Known as `SPI_CTRL`.
    pub struct Control(u32) {
        /// Bits per transfer, zero meaning 128.
        [0..=6] pub char_len: u8,
        /// Set to start a transfer, reads as set while it is in progress.
        [8] pub go_busy,
        /// Latch received data on the falling edge.
        [9] pub rx_negedge,
        /// Change transmitted data on the falling edge.
        [10] pub tx_negedge,
        [11] pub lsb_first,
        [12] pub interrupt_enable,
        /// Drive the slave select lines automatically during transfers.
        [13] pub auto_slave_select,
    }
}

impl Control {
    pub const MAX_TRANSFER_BITS: u32 = 128;

    /// Bits per transfer, from 1 to 128.
    #[must_use]
    pub fn transfer_bits(self) -> u32 {
        match self.char_len() {
            0 => Self::MAX_TRANSFER_BITS,
            len => u32::from(len),
        }
    }

    /// Sets the bits per transfer. A count of 128 is stored as zero, larger counts are truncated to 7 bits.
    #[allow(clippy::cast_possible_truncation)]
    pub fn set_transfer_bits(&mut self, bits: u32) {
        self.set_char_len((bits & 0x7F) as u8);
    }
}

impl Register for Control {
    type Raw = u32;
    const REGION: Region = Region::Spi;
    const OFFSET: usize = 0x10;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_bits() {
        let mut control = Control::default();
        control.set_transfer_bits(8);
        assert_eq!(control.transfer_bits(), 8);
        control.set_transfer_bits(128);
        assert_eq!(control.char_len(), 0);
        assert_eq!(control.transfer_bits(), 128);
    }

    #[test]
    fn layout() {
        let mut control = Control::default();
        control.set_transfer_bits(32);
        control.set_go_busy(true);
        control.set_auto_slave_select(true);
        assert_eq!(u32::from(control), 0x2120);
        assert_eq!(Control::address(), 0x1210);
        assert_eq!(data_offset(3), 0xC);
        assert_eq!(data_offset(4), 0x0);
    }
}
