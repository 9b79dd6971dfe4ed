//! Memory-mapped registers of the DMA controller, Wishbone slave 6 (3 x 32).

use std::fmt;
use wb_common::{
    utils::tartan_bitfield::{bitfield, bitfield_without_debug},
    Region, Register,
};

macro_rules! transfer_register {
    ($(#[$meta:meta])* $name:ident, $offset:expr) => {
        bitfield_without_debug! {
            $(#[$meta])*
            pub struct $name(u32) {
                /// Address of the transfer in 64-bit words.
                [0..=11] pub word_address: u16,
                /// The device on this side of the transfer.
                [30..=31] pub device: u8,
            }
        }

        impl Register for $name {
            type Raw = u32;
            const REGION: Region = Region::Dma;
            const OFFSET: usize = $offset;
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("<value>", &u32::from(*self))
                    .field("device", &self.device())
                    .field("byte_address", &(u32::from(self.word_address()) << 3))
                    .finish()
            }
        }
    };
}

transfer_register!(
    /// Known as `DMA_READ`, the source of a transfer.
    DmaRead,
    0x0
);

transfer_register!(
    /// Known as `DMA_WRITE`, the destination of a transfer.
    DmaWrite,
    0x4
);

bitfield! {
    /// Known as `DMA_COUNT`. Writing it with `start` set begins the transfer.
    pub struct DmaCountRegister(u32) {
        /// Number of 64-bit words to transfer. The full count of 4096 words needs bit 12.
        [0..=12] pub words: u16,
        [31] pub start,
    }
}

impl Register for DmaCountRegister {
    type Raw = u32;
    const REGION: Region = Region::Dma;
    const OFFSET: usize = 0x8;
}
