#![allow(dead_code)]

use std::sync::Arc;

use nanemu_sdb::monitor::{CommandOutcome, Monitor, MonitorConfig};
use nanemu_sdb::soc::core::CoreSpec;

pub const MEM_BASE: u64 = 0x8000_0000;
pub const MEM_SIZE: usize = 0x1000;

/// RV32 register file with a 4 KiB RAM window at `MEM_BASE`.
pub fn monitor() -> Monitor {
    monitor_with(MonitorConfig {
        batch: true,
        ..MonitorConfig::default()
    })
}

pub fn monitor_with(config: MonitorConfig) -> Monitor {
    let spec = Arc::new(CoreSpec::riscv(32).expect("rv32 preset"));
    Monitor::with_ram(spec, MEM_BASE, MEM_SIZE, config).expect("construct monitor")
}

/// Executes one console line and returns what it printed.
pub fn exec(monitor: &mut Monitor, line: &str) -> String {
    let mut out = Vec::new();
    let outcome = monitor.execute(line, &mut out).expect("execute line");
    assert_eq!(outcome, CommandOutcome::Continue, "'{line}' should not quit");
    String::from_utf8(out).expect("utf8 output")
}
