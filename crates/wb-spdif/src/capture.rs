//! Channel status and user data capture, `SPDIF_RX_CH_ST_CAP(x)`.
//!
//! The receiver has eight capture slots. Each slot snapshots a run of bits out of the 192 bits of channel status
//! or user data of one channel, the first captured bit landing in bit 0 of the matching data register.

use crate::rx::RX_CAPTURE_BASE;
use wb_common::{utils::tartan_bitfield::bitfield, PhysicalAddress, Region, Register};

/// The amount of capture slots in the receiver.
pub const CAPTURE_SLOTS: usize = 8;

bitfield! {
    /// Raw layout of a capture descriptor register.
    pub struct CaptureDescriptor(u16) {
        /// Amount of bits to capture.
        [0..=5] pub bit_length: u8,
        /// Set for channel B, unset for channel A.
        [6] pub channel_b,
        /// Set for channel status, unset for user data.
        [7] pub channel_status,
        /// Position of the first captured bit within the block.
        [8..=15] pub bit_position: u8,
    }
}

impl Register for CaptureDescriptor {
    type Raw = u16;
    const REGION: Region = Region::SpdifRxRegisters;
    /// The first slot, see [`capture_register_offset`] for the others.
    const OFFSET: usize = RX_CAPTURE_BASE;
}

/// Offset of the descriptor register of capture slot `x` within the receiver's registers.
/// Only the low three bits of `x` are used.
#[must_use]
pub const fn capture_register_offset(x: usize) -> usize {
    RX_CAPTURE_BASE + ((x & 0x7) << 3)
}

/// Offset of the data register holding the bits captured by slot `x`.
#[must_use]
pub const fn capture_data_offset(x: usize) -> usize {
    capture_register_offset(x) + 4
}

/// Bus address of the descriptor register of capture slot `x`.
#[must_use]
pub const fn capture_register_address(x: usize) -> PhysicalAddress {
    Region::SpdifRxRegisters.offset(capture_register_offset(x))
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Channel {
    #[default]
    A,
    B,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DataKind {
    #[default]
    UserData,
    ChannelStatus,
}

/// What a capture slot snapshots.
///
/// Whether a `bit_length` of zero captures nothing or is reserved is not defined by the register layout,
/// so it is passed through unchanged.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SpdifCapture {
    /// 6 bits.
    pub bit_length: u8,
    pub channel: Channel,
    pub kind: DataKind,
    /// Index into the block, meaningful up to 191.
    pub bit_position: u8,
}

impl SpdifCapture {
    pub const BIT_LENGTH_MASK: u8 = 0x3F;

    /// Creates a capture descriptor, truncating the bit length to 6 bits.
    #[must_use]
    pub const fn new(bit_length: u8, channel: Channel, kind: DataKind, bit_position: u8) -> Self {
        Self {
            bit_length: bit_length & Self::BIT_LENGTH_MASK,
            channel,
            kind,
            bit_position,
        }
    }

    #[must_use]
    pub fn encode(self) -> u16 {
        let mut register = CaptureDescriptor::default();
        register.set_bit_length(self.bit_length & Self::BIT_LENGTH_MASK);
        register.set_channel_b(self.channel == Channel::B);
        register.set_channel_status(self.kind == DataKind::ChannelStatus);
        register.set_bit_position(self.bit_position);
        register.into()
    }

    #[must_use]
    pub fn decode(value: u16) -> Self {
        let register = CaptureDescriptor::from(value);
        Self {
            bit_length: register.bit_length(),
            channel: if register.channel_b() {
                Channel::B
            } else {
                Channel::A
            },
            kind: if register.channel_status() {
                DataKind::ChannelStatus
            } else {
                DataKind::UserData
            },
            bit_position: register.bit_position(),
        }
    }
}

impl From<CaptureDescriptor> for SpdifCapture {
    fn from(value: CaptureDescriptor) -> Self {
        Self::decode(value.into())
    }
}

impl From<SpdifCapture> for CaptureDescriptor {
    fn from(value: SpdifCapture) -> Self {
        Self::from(value.encode())
    }
}

/// Packs a capture descriptor.
///
/// # Examples
/// ```
/// use wb_spdif::{capture, Channel, DataKind};
/// assert_eq!(capture::encode(32, Channel::B, DataKind::ChannelStatus, 24), 0x18E0);
/// ```
#[must_use]
pub fn encode(bit_length: u8, channel: Channel, kind: DataKind, bit_position: u8) -> u16 {
    SpdifCapture::new(bit_length, channel, kind, bit_position).encode()
}

#[must_use]
pub fn decode(value: u16) -> SpdifCapture {
    SpdifCapture::decode(value)
}
