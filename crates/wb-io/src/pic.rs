//! Register definitions for the interrupt controller, Wishbone slave 4 (4 x 8).
//! Every register holds one bit per interrupt line.

use crate::per_line_register;
use wb_common::{utils::tartan_bitfield::bitfield, Region, Register};

macro_rules! pic_register {
    ($(#[$meta:meta])* $name:ident, $offset:expr) => {
        bitfield! {
            $(#[$meta])*
            pub struct $name(u8) {
                [0..=7] pub lines: u8,
            }
        }

        per_line_register!($name);

        impl Register for $name {
            type Raw = u8;
            const REGION: Region = Region::Pic;
            const OFFSET: usize = $offset;
        }
    };
}

pic_register!(
    /// Known as `PIC_EDGEN`. Set for edge triggered lines, unset for level triggered.
    EdgeEnable,
    0x0
);

pic_register!(
    /// Known as `PIC_POL`. Set for active high or rising edge.
    Polarity,
    0x1
);

pic_register!(
    /// Known as `PIC_MASK`. Note that a set bit *disables* the line.
    Mask,
    0x2
);

pic_register!(
    /// Known as `PIC_PENDING`. Write a one to clear a bit.
    Pending,
    0x3
);

#[cfg(test)]
mod tests {
    use super::*;
    use wb_common::{Mmio, MmioExt, RegisterFile};

    #[test]
    fn lines() {
        let mut mask = Mask::from(0xFF);
        mask.set_line(3, false);
        assert_eq!(u8::from(mask), 0xF7);
        assert!(!mask.line(3));
        assert!(!mask.line(11));
        assert!(mask.line(12));
    }

    #[test]
    fn registers() {
        let mut regs = RegisterFile::new();
        let mut edge = EdgeEnable::default();
        edge.set_line(0, true);
        regs.write_register(edge).unwrap();
        regs.write_register(Mask::from(0xFE)).unwrap();
        assert_eq!(regs.read8(0x1300), Ok(0x01));
        assert_eq!(regs.read8(0x1302), Ok(0xFE));
        assert_eq!(Pending::address(), 0x1303);
        assert_eq!(Polarity::address(), 0x1301);
    }
}
