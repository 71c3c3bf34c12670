use std::{error::Error, fmt};

pub type DeviceResult<T> = Result<T, DeviceError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// `len` bytes at `offset` do not fit in a device of `capacity` bytes.
    OutOfRange { offset: u64, len: u64, capacity: u64 },
    Unsupported(&'static str),
    LockPoisoned,
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::OutOfRange {
                offset,
                len,
                capacity,
            } => write!(
                f,
                "{len} bytes at offset {offset:#x} overrun {capacity:#x}-byte storage"
            ),
            DeviceError::Unsupported(op) => write!(f, "{op} is not supported"),
            DeviceError::LockPoisoned => write!(f, "storage lock poisoned"),
        }
    }
}

impl Error for DeviceError {}
