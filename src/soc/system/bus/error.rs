use std::{error::Error, fmt};

use crate::soc::device::DeviceError;

pub type BusResult<T> = Result<T, BusError>;

#[derive(Debug)]
pub enum BusError {
    /// No device window contains `address`.
    NotMapped { address: u64 },
    /// The access starts inside a window but runs past `window_end`.
    Straddle { address: u64, len: usize, window_end: u64 },
    EmptyDevice { device: String },
    NameInUse { device: String },
    WindowOverflow { device: String, base: u64 },
    WindowOverlap { device: String, other: String },
    DeviceFault { device: String, source: DeviceError },
    UnsupportedWidth { bytes: usize },
    LockPoisoned,
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusError::NotMapped { address } => write!(f, "nothing is mapped at {address:#x}"),
            BusError::Straddle {
                address,
                len,
                window_end,
            } => write!(
                f,
                "{len}-byte access at {address:#x} runs past window end {window_end:#x}"
            ),
            BusError::EmptyDevice { device } => {
                write!(f, "device '{device}' has no addressable bytes")
            }
            BusError::NameInUse { device } => {
                write!(f, "a device named '{device}' is already mapped")
            }
            BusError::WindowOverflow { device, base } => {
                write!(f, "device '{device}' at {base:#x} wraps the address space")
            }
            BusError::WindowOverlap { device, other } => {
                write!(f, "device '{device}' would overlap '{other}'")
            }
            BusError::DeviceFault { device, source } => write!(f, "{device}: {source}"),
            BusError::UnsupportedWidth { bytes } => {
                write!(f, "word accesses are 1, 2, 4 or 8 bytes (got {bytes})")
            }
            BusError::LockPoisoned => write!(f, "memory map lock poisoned"),
        }
    }
}

impl Error for BusError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        if let BusError::DeviceFault { source, .. } = self {
            Some(source)
        } else {
            None
        }
    }
}
