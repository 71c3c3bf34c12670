pub mod core;
pub mod device;
pub mod system;
