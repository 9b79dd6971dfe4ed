//! The SPDIF receiver (Wishbone slave 7) and transmitter (Wishbone slave 8).
//!
//! Besides the register layouts, this provides codecs for the two formats with some arithmetic to them:
//! the channel status/user data capture descriptors of the receiver, and the sample words of both sample buffers.

pub use self::{
    capture::{Channel, DataKind, SpdifCapture},
    sample::{SampleFlags, SpdifSample},
};
use strum::{EnumIter, FromRepr};
use wb_common::utils::low_mask;

pub mod capture;
pub mod rx;
pub mod sample;
pub mod tx;

/// The amount of bits of channel status or user data carried per block, per channel.
pub const BLOCK_BITS: u32 = 192;

/// The width of the sample data, configured through the 4-bit mode field of `RxConfig` and `TxConfig`.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, FromRepr, EnumIter)]
#[repr(u8)]
pub enum SampleWidth {
    #[default]
    Bits16 = 0,
    Bits17 = 1,
    Bits18 = 2,
    Bits19 = 3,
    Bits20 = 4,
    Bits21 = 5,
    Bits22 = 6,
    Bits23 = 7,
    Bits24 = 8,
}

impl SampleWidth {
    /// Returns the width for the given amount of bits, if it is one the hardware supports (16 to 24).
    ///
    /// # Examples
    /// ```
    /// use wb_spdif::SampleWidth;
    /// assert_eq!(SampleWidth::new(20), Some(SampleWidth::Bits20));
    /// assert_eq!(SampleWidth::new(32), None);
    /// ```
    #[must_use]
    pub fn new(bits: u32) -> Option<Self> {
        let mode = bits.checked_sub(16)?;
        Self::from_mode(u8::try_from(mode).ok()?)
    }

    /// Parses the value of a mode field, `None` for reserved modes.
    #[must_use]
    pub const fn from_mode(mode: u8) -> Option<Self> {
        Self::from_repr(mode)
    }

    /// The value of the mode field selecting this width.
    #[must_use]
    pub const fn mode(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn bits(self) -> u32 {
        16 + self as u32
    }

    /// A mask covering the data bits of a sample of this width.
    #[must_use]
    pub const fn mask(self) -> u32 {
        low_mask(self.bits())
    }
}
