use std::{ops::Range, sync::RwLock};

use crate::soc::device::{Device, DeviceError, DeviceResult, Endianness};

/// Zero-initialised RAM. Reads take the shared lock, so monitor queries can
/// run alongside each other; image loads take it exclusively.
pub struct BasicMemory {
    label: String,
    cells: RwLock<Box<[u8]>>,
    capacity: u64,
    order: Endianness,
}

impl BasicMemory {
    pub fn new(name: impl Into<String>, size: usize, order: Endianness) -> Self {
        Self {
            label: name.into(),
            cells: RwLock::new(vec![0; size].into_boxed_slice()),
            capacity: size as u64,
            order,
        }
    }

    pub fn size(&self) -> u64 {
        self.capacity
    }

    fn window(&self, offset: u64, len: usize) -> DeviceResult<Range<usize>> {
        let capacity = self.capacity;
        offset
            .checked_add(len as u64)
            .filter(|end| *end <= capacity)
            .map(|end| offset as usize..end as usize)
            .ok_or(DeviceError::OutOfRange {
                offset,
                len: len as u64,
                capacity,
            })
    }
}

impl Device for BasicMemory {
    fn name(&self) -> &str {
        &self.label
    }

    fn span(&self) -> Range<u64> {
        0..self.capacity
    }

    fn endianness(&self) -> Endianness {
        self.order
    }

    fn read(&self, offset: u64, out: &mut [u8]) -> DeviceResult<()> {
        let range = self.window(offset, out.len())?;
        let cells = self.cells.read().map_err(|_| DeviceError::LockPoisoned)?;
        out.copy_from_slice(&cells[range]);
        Ok(())
    }

    fn write(&self, offset: u64, data: &[u8]) -> DeviceResult<()> {
        let range = self.window(offset, data.len())?;
        let mut cells = self.cells.write().map_err(|_| DeviceError::LockPoisoned)?;
        cells[range].copy_from_slice(data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn stores_are_visible_to_later_loads() {
        let ram = BasicMemory::new("pmem", 16, Endianness::Little);
        ram.write(4, &hex!("93 00 10 00")).expect("store");
        let mut word = [0u8; 4];
        ram.read(4, &mut word).expect("load");
        assert_eq!(word, hex!("93 00 10 00"));
        let mut untouched = [0xFFu8; 4];
        ram.read(0, &mut untouched).expect("load zeroes");
        assert_eq!(untouched, [0; 4]);
    }

    #[test]
    fn accesses_must_fit_inside_storage() {
        let ram = BasicMemory::new("pmem", 8, Endianness::Little);
        assert_eq!(ram.size(), 8);
        let mut word = [0u8; 4];
        assert_eq!(
            ram.read(6, &mut word),
            Err(DeviceError::OutOfRange {
                offset: 6,
                len: 4,
                capacity: 8
            })
        );
        assert!(ram.write(u64::MAX, &[1]).is_err(), "offset wrap is rejected");
        ram.read(4, &mut word).expect("last word fits");
    }
}
