//! Debugger monitor for a small emulated machine: a register file and
//! address space (`soc`) plus the console and expression evaluator that
//! inspect them (`monitor`).

pub mod monitor;
pub mod soc;
