//! The simple slaves of the bus, whose registers are plain bit masks: the LCD, SPI master, PIC and GPIO.

pub mod gpio;
pub mod lcd;
pub mod pic;
pub mod spi;

/// Implements per-line access for a register holding one bit per line.
macro_rules! per_line_register {
    ($name:ident) => {
        impl $name {
            /// The bit of the given line, only the low three bits of `line` are used.
            #[must_use]
            pub fn line(self, line: usize) -> bool {
                self.lines() & (1 << (line & 0x7)) != 0
            }

            pub fn set_line(&mut self, line: usize, value: bool) {
                let bit = 1 << (line & 0x7);
                let lines = self.lines();
                self.set_lines(if value { lines | bit } else { lines & !bit });
            }
        }
    };
}

pub(crate) use per_line_register;
