use std::{error::Error, fmt, io};

use crate::soc::core::CoreSpecBuildError;
use crate::soc::system::bus::BusError;

pub type MonitorResult<T> = Result<T, MonitorError>;

#[derive(Debug)]
pub enum MonitorError {
    Io(io::Error),
    Core(CoreSpecBuildError),
    Bus(BusError),
}

impl fmt::Display for MonitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorError::Io(err) => write!(f, "I/O error: {err}"),
            MonitorError::Core(err) => write!(f, "invalid register file: {err}"),
            MonitorError::Bus(err) => write!(f, "bus error: {err}"),
        }
    }
}

impl Error for MonitorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MonitorError::Io(err) => Some(err),
            MonitorError::Core(err) => Some(err),
            MonitorError::Bus(err) => Some(err),
        }
    }
}

impl From<io::Error> for MonitorError {
    fn from(value: io::Error) -> Self {
        MonitorError::Io(value)
    }
}

impl From<CoreSpecBuildError> for MonitorError {
    fn from(value: CoreSpecBuildError) -> Self {
        MonitorError::Core(value)
    }
}

impl From<BusError> for MonitorError {
    fn from(value: BusError) -> Self {
        MonitorError::Bus(value)
    }
}
