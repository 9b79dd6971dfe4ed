//! Sample words, as found in the sample buffers of the receiver and transmitter.

use crate::{rx::RxConfig, SampleWidth};
use wb_common::utils::tartan_bitfield::bitfield;

bitfield! {
    /// Raw layout of a sample word. Bits 24 to 26 are unused.
    pub struct SampleWord(u32) {
        /// The bottom 16 bits of the sample data.
        [0..=15] pub data_low: u16,
        /// The top bits of the sample data, for samples wider than 16 bits.
        [16..=23] pub data_high: u8,
        /// The first sample of a block. Filled in by the receiver when `RxConfig::block_start_to_sample` is set.
        [27] pub block_start,
        /// Filled in by the receiver when `RxConfig::validity_to_sample` is set.
        [28] pub valid,
        /// Filled in by the receiver when `RxConfig::user_data_to_sample` is set.
        [29] pub user_data,
        /// Filled in by the receiver when `RxConfig::channel_status_to_sample` is set.
        [30] pub channel_status,
        /// Filled in by the receiver when `RxConfig::parity_to_sample` is set.
        [31] pub parity,
    }
}

/// The optional per-sample bits. Whether each is meaningful depends on the receiver configuration,
/// see [`SampleFlags::enabled_by`].
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SampleFlags {
    pub block_start: bool,
    pub valid: bool,
    pub user_data: bool,
    pub channel_status: bool,
    pub parity: bool,
}

impl SampleFlags {
    pub const NONE: Self = Self {
        block_start: false,
        valid: false,
        user_data: false,
        channel_status: false,
        parity: false,
    };

    pub const ALL: Self = Self {
        block_start: true,
        valid: true,
        user_data: true,
        channel_status: true,
        parity: true,
    };

    /// The flags the receiver fills in when configured with `config`. The others always read as zero.
    #[must_use]
    pub fn enabled_by(config: RxConfig) -> Self {
        Self {
            block_start: config.block_start_to_sample(),
            valid: config.validity_to_sample(),
            user_data: config.user_data_to_sample(),
            channel_status: config.channel_status_to_sample(),
            parity: config.parity_to_sample(),
        }
    }

    /// Only keeps the flags which are also set in `mask`.
    #[must_use]
    pub const fn masked_by(self, mask: Self) -> Self {
        Self {
            block_start: self.block_start && mask.block_start,
            valid: self.valid && mask.valid,
            user_data: self.user_data && mask.user_data,
            channel_status: self.channel_status && mask.channel_status,
            parity: self.parity && mask.parity,
        }
    }
}

/// A sample along with its flags.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SpdifSample {
    /// Right aligned sample data.
    pub data: u32,
    pub flags: SampleFlags,
}

impl SpdifSample {
    /// Packs the sample into a sample word, truncating the data to `width` bits.
    /// All five flags are written as given, regardless of the receiver configuration.
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn encode(self, width: SampleWidth) -> u32 {
        let data = self.data & width.mask();
        let mut word = SampleWord::default();
        word.set_data_low(data as u16);
        word.set_data_high((data >> 16) as u8);
        word.set_block_start(self.flags.block_start);
        word.set_valid(self.flags.valid);
        word.set_user_data(self.flags.user_data);
        word.set_channel_status(self.flags.channel_status);
        word.set_parity(self.flags.parity);
        word.into()
    }

    /// Unpacks a sample word holding data of `width` bits. All five flags are read unconditionally.
    #[must_use]
    pub fn decode(value: u32, width: SampleWidth) -> Self {
        let word = SampleWord::from(value);
        let data = (u32::from(word.data_high()) << 16) | u32::from(word.data_low());
        Self {
            data: data & width.mask(),
            flags: SampleFlags {
                block_start: word.block_start(),
                valid: word.valid(),
                user_data: word.user_data(),
                channel_status: word.channel_status(),
                parity: word.parity(),
            },
        }
    }
}

/// Packs sample data and flags into a sample word.
///
/// # Examples
/// ```
/// use wb_spdif::{sample, SampleFlags, SampleWidth};
/// let flags = SampleFlags { parity: true, ..SampleFlags::NONE };
/// assert_eq!(sample::encode(0x12_3456, SampleWidth::Bits24, flags), 0x8012_3456);
/// assert_eq!(sample::encode(0x12_3456, SampleWidth::Bits16, SampleFlags::NONE), 0x3456);
/// ```
#[must_use]
pub fn encode(data: u32, width: SampleWidth, flags: SampleFlags) -> u32 {
    SpdifSample { data, flags }.encode(width)
}

#[must_use]
pub fn decode(value: u32, width: SampleWidth) -> SpdifSample {
    SpdifSample::decode(value, width)
}
