#![warn(clippy::all, clippy::pedantic)]
//! Shared pieces of the wbsoc register codecs: the bus memory map, and access to memory-mapped registers.

pub use log;

pub mod memory;
pub mod mmio;
pub mod utils;

pub use self::{
    memory::{MapError, PhysicalAddress, Region},
    mmio::{Mmio, MmioExt, Register, RegisterFile},
};
