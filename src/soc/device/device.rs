//! Anything the memory map can route byte accesses to. Offsets are relative
//! to the device; the bus subtracts the mapping base before calling in.
use std::ops::Range;

use super::{endianness::Endianness, error::DeviceResult};

pub trait Device: Send + Sync {
    /// Unique name on a bus, shown in memory map listings and fault reports.
    fn name(&self) -> &str;

    /// Addressable bytes, `0..size`.
    fn span(&self) -> Range<u64>;

    /// Byte order used when the bus assembles multi-byte words.
    fn endianness(&self) -> Endianness {
        Endianness::Little
    }

    fn read(&self, offset: u64, out: &mut [u8]) -> DeviceResult<()>;

    fn write(&self, offset: u64, data: &[u8]) -> DeviceResult<()>;
}
