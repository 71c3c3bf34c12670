//! DeviceBus owns the machine memory map: devices are registered at a base
//! address and every access is routed to the single device whose window
//! contains it. Accesses never straddle two devices.
use std::sync::{Arc, RwLock};

use crate::soc::device::{Device, DeviceError};
use crate::soc::device::endianness::MAX_WORD_BYTES;

use super::error::{BusError, BusResult};

#[derive(Clone)]
struct Mapping {
    bus_start: u64,
    bus_end: u64,
    device: Arc<dyn Device>,
}

impl Mapping {
    fn contains(&self, address: u64) -> bool {
        address >= self.bus_start && address < self.bus_end
    }

    fn overlaps(&self, start: u64, end: u64) -> bool {
        start < self.bus_end && self.bus_start < end
    }

    fn fault(&self, source: DeviceError) -> BusError {
        BusError::DeviceFault {
            device: self.device.name().to_string(),
            source,
        }
    }
}

#[derive(Default)]
pub struct DeviceBus {
    mappings: RwLock<Vec<Mapping>>,
}

impl DeviceBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `device` so that its offset 0 appears at `base`. Names must be
    /// unique and windows may not overlap.
    pub fn register_device(&self, device: Arc<dyn Device>, base: u64) -> BusResult<()> {
        let name = device.name().to_string();
        let size = device.span().end;
        if size == 0 {
            return Err(BusError::EmptyDevice { device: name });
        }
        let end = base
            .checked_add(size)
            .ok_or_else(|| BusError::WindowOverflow {
                device: name.clone(),
                base,
            })?;

        let mut mappings = self.mappings.write().map_err(|_| BusError::LockPoisoned)?;
        if mappings.iter().any(|m| m.device.name() == name) {
            return Err(BusError::NameInUse { device: name });
        }
        if let Some(other) = mappings.iter().find(|m| m.overlaps(base, end)) {
            return Err(BusError::WindowOverlap {
                device: name,
                other: other.device.name().to_string(),
            });
        }

        let pos = mappings.partition_point(|m| m.bus_start < base);
        mappings.insert(
            pos,
            Mapping {
                bus_start: base,
                bus_end: end,
                device,
            },
        );
        Ok(())
    }

    /// Names and windows of every registered device, ordered by base address.
    pub fn mappings(&self) -> BusResult<Vec<(String, u64, u64)>> {
        let mappings = self.mappings.read().map_err(|_| BusError::LockPoisoned)?;
        Ok(mappings
            .iter()
            .map(|m| (m.device.name().to_string(), m.bus_start, m.bus_end))
            .collect())
    }

    pub fn read(&self, address: u64, out: &mut [u8]) -> BusResult<()> {
        let mapping = self.resolve(address, out.len())?;
        mapping
            .device
            .read(address - mapping.bus_start, out)
            .map_err(|source| mapping.fault(source))
    }

    pub fn write(&self, address: u64, data: &[u8]) -> BusResult<()> {
        let mapping = self.resolve(address, data.len())?;
        mapping
            .device
            .write(address - mapping.bus_start, data)
            .map_err(|source| mapping.fault(source))
    }

    /// Reads a `width`-byte scalar using the owning device's byte order.
    pub fn read_word(&self, address: u64, width: usize) -> BusResult<u64> {
        check_width(width)?;
        let mapping = self.resolve(address, width)?;
        let mut buf = [0u8; MAX_WORD_BYTES];
        mapping
            .device
            .read(address - mapping.bus_start, &mut buf[..width])
            .map_err(|source| mapping.fault(source))?;
        Ok(mapping.device.endianness().decode_bytes(&buf[..width]))
    }

    pub fn write_word(&self, address: u64, width: usize, value: u64) -> BusResult<()> {
        check_width(width)?;
        let mapping = self.resolve(address, width)?;
        let bytes = mapping.device.endianness().encode_bytes(value, width);
        mapping
            .device
            .write(address - mapping.bus_start, &bytes[..width])
            .map_err(|source| mapping.fault(source))
    }

    fn resolve(&self, address: u64, len: usize) -> BusResult<Mapping> {
        let mappings = self.mappings.read().map_err(|_| BusError::LockPoisoned)?;
        let mapping = mappings
            .iter()
            .find(|m| m.contains(address))
            .ok_or(BusError::NotMapped { address })?;
        let fits = address
            .checked_add(len as u64)
            .is_some_and(|end| end <= mapping.bus_end);
        if !fits {
            return Err(BusError::Straddle {
                address,
                len,
                window_end: mapping.bus_end,
            });
        }
        Ok(mapping.clone())
    }
}

fn check_width(width: usize) -> BusResult<()> {
    match width {
        1 | 2 | 4 | 8 => Ok(()),
        bytes => Err(BusError::UnsupportedWidth { bytes }),
    }
}
