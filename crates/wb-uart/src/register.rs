//! Register definitions for the 16550 compatible UART, Wishbone slave 2 (8 x 8).
//!
//! Several registers share an offset, the one accessed depends on the direction of the access
//! and on [`LineControl::divisor_latch_access`].

use wb_common::{utils::tartan_bitfield::bitfield, Region, Register};

macro_rules! uart_register {
    ($name:ident, $offset:expr) => {
        impl Register for $name {
            type Raw = u8;
            const REGION: Region = Region::Uart;
            const OFFSET: usize = $offset;
        }
    };
}

/// Offset of the receive buffer (reads) and transmit holding register (writes).
pub const DATA_OFFSET: usize = 0x0;

bitfield! {
    /// Known as `IER`.
    pub struct InterruptEnable(u8) {
        [0] pub received_data_available,
        [1] pub transmit_holding_empty,
        [2] pub line_status,
        [3] pub modem_status,
    }
}

uart_register!(InterruptEnable, 0x1);

/// The source of a pending interrupt, in `IIR[3:1]`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InterruptKind {
    /// Priority 4.
    ModemStatus,
    /// Priority 3.
    TransmitHoldingEmpty,
    /// Priority 2.
    ReceivedDataAvailable,
    /// Priority 1.
    LineStatus,
    /// Priority 2.
    ReceiveTimeout,
    Reserved(u8),
}

impl From<u8> for InterruptKind {
    fn from(value: u8) -> Self {
        match value {
            0b000 => Self::ModemStatus,
            0b001 => Self::TransmitHoldingEmpty,
            0b010 => Self::ReceivedDataAvailable,
            0b011 => Self::LineStatus,
            0b110 => Self::ReceiveTimeout,
            other => Self::Reserved(other),
        }
    }
}

impl From<InterruptKind> for u8 {
    fn from(value: InterruptKind) -> Self {
        match value {
            InterruptKind::ModemStatus => 0b000,
            InterruptKind::TransmitHoldingEmpty => 0b001,
            InterruptKind::ReceivedDataAvailable => 0b010,
            InterruptKind::LineStatus => 0b011,
            InterruptKind::ReceiveTimeout => 0b110,
            InterruptKind::Reserved(other) => other,
        }
    }
}

bitfield! {
    /// Known as `IIR`, read only.
    pub struct InterruptIdentification(u8) {
        /// Active low.
        [0] pub not_pending,
        [1..=3] pub kind: u8 as InterruptKind,
    }
}

impl InterruptIdentification {
    #[must_use]
    pub fn pending(self) -> bool {
        !self.not_pending()
    }
}

uart_register!(InterruptIdentification, 0x2);

/// Fill level of the receive FIFO at which an interrupt is raised.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RxHighWater {
    One,
    Four,
    Eight,
    Fourteen,
}

impl RxHighWater {
    #[must_use]
    pub const fn bytes(self) -> usize {
        match self {
            Self::One => 1,
            Self::Four => 4,
            Self::Eight => 8,
            Self::Fourteen => 14,
        }
    }
}

impl From<u8> for RxHighWater {
    fn from(value: u8) -> Self {
        match value {
            0b00 => Self::One,
            0b01 => Self::Four,
            0b10 => Self::Eight,
            0b11 => Self::Fourteen,
            _ => unreachable!(),
        }
    }
}

impl From<RxHighWater> for u8 {
    fn from(value: RxHighWater) -> Self {
        value as u8
    }
}

bitfield! {
    /// Known as `FCR`, write only.
    pub struct FifoControl(u8) {
        /// Ignored, the FIFOs are always enabled.
        [0] pub enable,
        [1] pub clear_rx,
        [2] pub clear_tx,
        [6..=7] pub rx_high_water: u8 as RxHighWater,
    }
}

uart_register!(FifoControl, 0x2);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DataBits {
    Five,
    Six,
    Seven,
    Eight,
}

impl From<u8> for DataBits {
    fn from(value: u8) -> Self {
        match value {
            0b00 => Self::Five,
            0b01 => Self::Six,
            0b10 => Self::Seven,
            0b11 => Self::Eight,
            _ => unreachable!(),
        }
    }
}

impl From<DataBits> for u8 {
    fn from(value: DataBits) -> Self {
        value as u8
    }
}

bitfield! {
    /// Known as `LCR`.
    pub struct LineControl(u8) {
        [0..=1] pub data_bits: u8 as DataBits,
        /// Unset is one stop bit. Set is 1.5 stop bits for 5-bit data, two otherwise.
        [2] pub extra_stop_bit,
        [3] pub parity_enable,
        /// Even parity when set, odd otherwise. Only used if parity is enabled.
        [4] pub even_parity,
        [5] pub stick_parity,
        /// Forces a BREAK condition on the line.
        [6] pub set_break,
        /// Maps the divisor latches over the data and interrupt enable registers.
        [7] pub divisor_latch_access,
    }
}

uart_register!(LineControl, 0x3);

bitfield! {
    /// Known as `MCR`, write only. The modem signals are active low.
    pub struct ModemControl(u8) {
        [0] pub data_terminal_ready,
        [1] pub request_to_send,
        /// Drives RI in loopback mode.
        [2] pub out1,
        /// Drives DCD in loopback mode.
        [3] pub out2,
        [4] pub loopback,
    }
}

uart_register!(ModemControl, 0x4);

bitfield! {
    /// Known as `LSR`, read only.
    pub struct LineStatus(u8) {
        [0] pub data_ready,
        [1] pub overrun_error,
        /// Parity error in the character at the top of the receive FIFO.
        [2] pub parity_error,
        [3] pub framing_error,
        [4] pub break_interrupt,
        [5] pub tx_fifo_empty,
        [6] pub tx_empty,
        /// At least one parity error in the receive FIFO.
        [7] pub rx_fifo_error,
    }
}

uart_register!(LineStatus, 0x5);

bitfield! {
    /// Known as `MSR`, read only. The modem signals are active low.
    ///
    /// The SoC's C header defines `UART_MSR` as 0x1105, which is the address of `LSR`.
    /// The 16550 puts `MSR` at offset 0x6, which is the address used here.
    pub struct ModemStatus(u8) {
        [0] pub delta_clear_to_send,
        [1] pub delta_data_set_ready,
        [2] pub trailing_edge_ring_indicator,
        [3] pub delta_data_carrier_detect,
        [4] pub clear_to_send,
        [5] pub data_set_ready,
        [6] pub ring_indicator,
        [7] pub data_carrier_detect,
    }
}

uart_register!(ModemStatus, 0x6);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interrupt_identification() {
        let iir = InterruptIdentification::from(0x01);
        assert!(!iir.pending());

        let iir = InterruptIdentification::from(0x0C);
        assert!(iir.pending());
        assert_eq!(iir.kind(), InterruptKind::ReceiveTimeout);

        assert_eq!(InterruptIdentification::from(0x06).kind(), InterruptKind::LineStatus);
        assert_eq!(InterruptIdentification::from(0x0A).kind(), InterruptKind::Reserved(0b101));
    }

    #[test]
    fn fifo_control() {
        let mut fcr = FifoControl::default();
        fcr.set_clear_rx(true);
        fcr.set_rx_high_water(RxHighWater::Eight);
        assert_eq!(u8::from(fcr), 0x82);
        assert_eq!(FifoControl::from(0xC0).rx_high_water().bytes(), 14);
    }

    #[test]
    fn line_control() {
        let mut lcr = LineControl::default();
        lcr.set_data_bits(DataBits::Eight);
        lcr.set_parity_enable(true);
        lcr.set_even_parity(true);
        assert_eq!(u8::from(lcr), 0x1B);

        lcr.set_divisor_latch_access(true);
        assert_eq!(u8::from(lcr), 0x9B);
        assert_eq!(LineControl::from(0x02).data_bits(), DataBits::Seven);
    }

    #[test]
    fn offsets() {
        assert_eq!(InterruptEnable::address(), 0x1101);
        assert_eq!(InterruptIdentification::address(), 0x1102);
        assert_eq!(FifoControl::address(), 0x1102);
        assert_eq!(LineControl::address(), 0x1103);
        assert_eq!(LineStatus::address(), 0x1105);
        assert_eq!(ModemStatus::address(), 0x1106);
        assert_ne!(ModemStatus::address(), LineStatus::address());
    }
}
