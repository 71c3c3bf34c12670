mod basic;

pub use basic::BasicMemory;
