//! Register definitions for the SPDIF transmitter.

use crate::SampleWidth;
use wb_common::{utils::tartan_bitfield::bitfield, Region, Register};

/// Offset of the read-only core version register.
pub const TX_VERSION_OFFSET: usize = 0x00;
/// Offset of the interrupt mask register, which shares the layout of [`TxInterrupt`].
pub const TX_INT_MASK_OFFSET: usize = 0x0C;

macro_rules! tx_register {
    ($name:ident, $region:expr, $offset:expr) => {
        impl Register for $name {
            type Raw = u32;
            const REGION: Region = $region;
            const OFFSET: usize = $offset;
        }
    };
}

/// Where the transmitted channel status bits come from.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ChannelStatusSource {
    /// Both channels from [`TxChannelStatus`], consumer mode only.
    Register,
    /// Both channels from the low byte of the channel status buffer.
    BufferLow,
    /// Channel A from the low byte, channel B from the high byte of the channel status buffer.
    BufferHighLow,
    Reserved,
}

impl From<u8> for ChannelStatusSource {
    fn from(value: u8) -> Self {
        match value {
            0b00 => Self::Register,
            0b01 => Self::BufferLow,
            0b10 => Self::BufferHighLow,
            0b11 => Self::Reserved,
            _ => unreachable!(),
        }
    }
}

impl From<ChannelStatusSource> for u8 {
    fn from(value: ChannelStatusSource) -> Self {
        value as u8
    }
}

/// Where the transmitted user data bits come from.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UserDataSource {
    Zero,
    /// Both channels from the low byte of the user data buffer.
    BufferLow,
    /// Channel A from the low byte, channel B from the high byte of the user data buffer.
    BufferHighLow,
    Reserved,
}

impl From<u8> for UserDataSource {
    fn from(value: u8) -> Self {
        match value {
            0b00 => Self::Zero,
            0b01 => Self::BufferLow,
            0b10 => Self::BufferHighLow,
            0b11 => Self::Reserved,
            _ => unreachable!(),
        }
    }
}

impl From<UserDataSource> for u8 {
    fn from(value: UserDataSource) -> Self {
        value as u8
    }
}

bitfield! {
    /// Known as `SPDIF_TX_CONFIG`.
    pub struct TxConfig(u32) {
        [0] pub tx_enable,
        /// Set to transmit the sample data (validity bit cleared), unset to transmit none (validity bit set).
        [1] pub tx_data,
        [2] pub interrupt_enable,
        [4..=5] pub channel_status_source: u8 as ChannelStatusSource,
        [6..=7] pub user_data_source: u8 as UserDataSource,
        /// The transmit clock is the bus clock divided by `1 + ratio`.
        [8..=15] pub ratio: u8,
        [20..=23] pub mode: u8,
    }
}

impl TxConfig {
    /// The configured sample width, `None` if the mode field holds a reserved value.
    #[must_use]
    pub fn sample_width(self) -> Option<SampleWidth> {
        SampleWidth::from_mode(self.mode())
    }

    pub fn set_sample_width(&mut self, width: SampleWidth) {
        self.set_mode(width.mode());
    }

    /// The transmit clock resulting from the given bus clock.
    #[must_use]
    pub fn tx_clock(self, bus_clock_hz: u32) -> u32 {
        bus_clock_hz / (1 + u32::from(self.ratio()))
    }
}

tx_register!(TxConfig, Region::SpdifTxRegisters, 0x04);

/// The sample frequency announced in consumer channel status.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SampleRate {
    Hz44100,
    Hz48000,
    Hz32000,
    /// Sample rate converter.
    Converter,
}

impl From<u8> for SampleRate {
    fn from(value: u8) -> Self {
        match value {
            0b00 => Self::Hz44100,
            0b01 => Self::Hz48000,
            0b10 => Self::Hz32000,
            0b11 => Self::Converter,
            _ => unreachable!(),
        }
    }
}

impl From<SampleRate> for u8 {
    fn from(value: SampleRate) -> Self {
        value as u8
    }
}

bitfield! {
    /// Known as `SPDIF_TX_CH_STATUS`, used in consumer mode only. The category code is always zero.
    pub struct TxChannelStatus(u32) {
        /// Set for data, unset for audio.
        [0] pub data,
        [1] pub copy_permitted,
        /// 50/15us pre-emphasis.
        [2] pub pre_emphasis,
        /// Original or commercially released material.
        [3] pub generation_status,
        [6..=7] pub sample_rate: u8 as SampleRate,
    }
}

tx_register!(TxChannelStatus, Region::SpdifTxRegisters, 0x08);

bitfield! {
    /// Known as `SPDIF_TX_INT_STATUS`, write a one to clear a bit. `SPDIF_TX_INT_MASK` shares this layout.
    pub struct TxInterrupt(u32) {
        [1] pub low_buffer_empty,
        [2] pub high_buffer_empty,
        /// The low half of the channel status and user data buffers is empty.
        [3] pub low_channel_status_empty,
        /// The high half of the channel status and user data buffers is empty.
        [4] pub high_channel_status_empty,
    }
}

tx_register!(TxInterrupt, Region::SpdifTxRegisters, 0x10);

bitfield! {
    /// One entry of the user data buffers.
    pub struct TxUserData(u32) {
        [0..=7] pub channel_a: u8,
        [8..=15] pub channel_b: u8,
    }
}

tx_register!(TxUserData, Region::SpdifTxUserDataLowBuffer, 0x00);

bitfield! {
    /// One entry of the channel status buffers.
    pub struct TxChannelStatusBuffer(u32) {
        [0..=7] pub channel_a: u8,
        [8..=15] pub channel_b: u8,
    }
}

tx_register!(TxChannelStatusBuffer, Region::SpdifTxChannelStatusLowBuffer, 0x00);
