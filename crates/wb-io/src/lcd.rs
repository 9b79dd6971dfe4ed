//! The memory mapped 16x2 character LCD, Wishbone slave 1 (128 x 8).
//!
//! Each byte is one character cell. Line 0 starts at offset 0x00, line 1 at 0x40.

use std::ops::RangeInclusive;
use wb_common::{PhysicalAddress, Region};

pub const LINES: usize = 2;
pub const COLUMNS: usize = 16;

const LINE_STARTS: [usize; LINES] = [0x00, 0x40];

/// The offsets of the cells of the given line.
#[must_use]
pub fn line_offsets(line: usize) -> Option<RangeInclusive<usize>> {
    let start = *LINE_STARTS.get(line)?;
    Some(start..=start + COLUMNS - 1)
}

/// The offset of a character cell, `None` if it lies outside the display.
///
/// # Examples
/// ```
/// assert_eq!(wb_io::lcd::cell_offset(1, 15), Some(0x4F));
/// assert_eq!(wb_io::lcd::cell_offset(0, 16), None);
/// ```
#[must_use]
pub fn cell_offset(line: usize, column: usize) -> Option<usize> {
    if column >= COLUMNS {
        return None;
    }
    LINE_STARTS.get(line).map(|start| start + column)
}

/// The bus address of a character cell.
#[must_use]
pub fn cell_address(line: usize, column: usize) -> Option<PhysicalAddress> {
    cell_offset(line, column).map(|offset| Region::Lcd.offset(offset))
}
