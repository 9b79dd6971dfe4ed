//! Register definitions for the SPDIF receiver.

use crate::SampleWidth;
use wb_common::{utils::tartan_bitfield::bitfield, Region, Register};

/// Offset of the read-only core version register.
pub const RX_VERSION_OFFSET: usize = 0x00;
/// Offset of the interrupt mask register, which shares the layout of [`RxInterrupt`].
pub const RX_INT_MASK_OFFSET: usize = 0x0C;
/// Offset of the first capture descriptor register.
pub const RX_CAPTURE_BASE: usize = 0x40;

macro_rules! rx_register {
    ($name:ident, $offset:expr) => {
        impl Register for $name {
            type Raw = u32;
            const REGION: Region = Region::SpdifRxRegisters;
            const OFFSET: usize = $offset;
        }
    };
}

bitfield! {
    /// Known as `SPDIF_RX_CONFIG`.
    pub struct RxConfig(u32) {
        [0] pub rx_enable,
        /// Store sample data in the sample buffers.
        [1] pub sample_data,
        [2] pub interrupt_enable,
        /// Which channel is stored: set for channel A, unset for channel B.
        [3] pub channel_a,
        /// Only store samples whose validity bit is set.
        [4] pub valid_only,
        /// Copy the validity bit into bit 28 of each sample.
        [16] pub validity_to_sample,
        /// Copy the user data bit into bit 29 of each sample.
        [17] pub user_data_to_sample,
        /// Copy the channel status bit into bit 30 of each sample.
        [18] pub channel_status_to_sample,
        /// Copy the parity bit into bit 31 of each sample.
        [19] pub parity_to_sample,
        [20..=23] pub mode: u8,
        /// Set bit 27 of the first sample of each block.
        [24] pub block_start_to_sample,
    }
}

impl RxConfig {
    /// The configured sample width, `None` if the mode field holds a reserved value.
    #[must_use]
    pub fn sample_width(self) -> Option<SampleWidth> {
        SampleWidth::from_mode(self.mode())
    }

    pub fn set_sample_width(&mut self, width: SampleWidth) {
        self.set_mode(width.mode());
    }
}

rx_register!(RxConfig, 0x04);

bitfield! {
    /// Known as `SPDIF_RX_STATUS`, read only. Decoded from the incoming channel status.
    pub struct RxStatus(u32) {
        /// Locked to the incoming SPDIF clock.
        [0] pub locked,
        /// Set for professional streams, unset for consumer streams.
        [1] pub professional,
        /// Set for audio, unset for data.
        [2] pub audio,
        [3..=5] pub emphasis: u8,
        /// Consumer streams only.
        [6] pub copy_permitted,
    }
}

rx_register!(RxStatus, 0x08);

bitfield! {
    /// Known as `SPDIF_RX_INT_STATUS`, write a one to clear a bit. `SPDIF_RX_INT_MASK` shares this layout.
    pub struct RxInterrupt(u32) {
        [0] pub lock,
        [1] pub low_buffer_full,
        [2] pub high_buffer_full,
        [3] pub parity_error_a,
        [4] pub parity_error_b,
        /// One bit per capture slot, set when the captured bits changed.
        [16..=23] pub capture_changed_bits: u8,
    }
}

impl RxInterrupt {
    /// Whether the data captured by slot `x` changed. Only the low three bits of `x` are used.
    #[must_use]
    pub fn capture_changed(self, x: usize) -> bool {
        self.capture_changed_bits() & (1 << (x & 0x7)) != 0
    }

    pub fn set_capture_changed(&mut self, x: usize, changed: bool) {
        let bit = 1 << (x & 0x7);
        let bits = self.capture_changed_bits();
        self.set_capture_changed_bits(if changed { bits | bit } else { bits & !bit });
    }
}

rx_register!(RxInterrupt, 0x10);

#[cfg(test)]
mod tests {
    use super::*;
    use wb_common::{Mmio, MmioExt, RegisterFile};

    #[test]
    fn config() {
        let mut config = RxConfig::default();
        config.set_rx_enable(true);
        config.set_sample_data(true);
        config.set_sample_width(SampleWidth::Bits24);
        config.set_block_start_to_sample(true);
        config.set_parity_to_sample(true);
        assert_eq!(u32::from(config), 0x0188_0003);
        assert_eq!(config.sample_width(), Some(SampleWidth::Bits24));

        assert_eq!(RxConfig::from(0x00F0_0000).sample_width(), None);
        assert_eq!(RxConfig::from(0x0050_0000).sample_width(), Some(SampleWidth::Bits21));
    }

    #[test]
    fn status() {
        let status = RxStatus::from(0x0000_0045);
        assert!(status.locked());
        assert!(!status.professional());
        assert!(status.audio());
        assert!(status.copy_permitted());
        assert_eq!(RxStatus::from(0x38).emphasis(), 0b111);
    }

    #[test]
    fn capture_interrupts() {
        let mut interrupt = RxInterrupt::default();
        interrupt.set_capture_changed(2, true);
        interrupt.set_capture_changed(7, true);
        assert_eq!(u32::from(interrupt), (1 << 18) | (1 << 23));
        assert!(interrupt.capture_changed(10));

        interrupt.set_capture_changed(2, false);
        assert!(!interrupt.capture_changed(2));
        assert!(interrupt.capture_changed(7));
    }

    #[test]
    fn registers() {
        let mut regs = RegisterFile::new();
        let mut config = RxConfig::default();
        config.set_sample_width(SampleWidth::Bits20);
        regs.write_register(config).unwrap();
        assert_eq!(regs.read32(0x2004), Ok(0x0040_0000));

        let mut mask = RxInterrupt::default();
        mask.set_low_buffer_full(true);
        regs.write_register_at(RX_INT_MASK_OFFSET, mask).unwrap();
        assert_eq!(regs.read32(0x200C), Ok(0b10));
        assert_eq!(RxInterrupt::address(), 0x2010);
    }
}
