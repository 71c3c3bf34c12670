//! Simple debugger console: owns the machine view (register file and bus),
//! dispatches commands, and evaluates expressions against that view.

pub mod command;
pub mod config;
pub mod error;
pub mod expr;
pub mod watchpoint;

use std::io::{BufRead, Write};
use std::sync::Arc;

use log::debug;

use crate::soc::core::{CoreSpec, CoreState};
use crate::soc::device::BasicMemory;
use crate::soc::system::bus::DeviceBus;

pub use command::{COMMANDS, Command, CommandOutcome};
pub use config::MonitorConfig;
pub use error::{MonitorError, MonitorResult};
pub use watchpoint::{Watchpoint, WatchpointError, WatchpointHit, WatchpointPool};

use expr::{Evaluator, ExprError, MachineResolver, Postfix};

pub struct Monitor {
    state: CoreState,
    bus: DeviceBus,
    evaluator: Evaluator,
    watchpoints: WatchpointPool,
    config: MonitorConfig,
}

impl Monitor {
    pub fn new(state: CoreState, bus: DeviceBus, config: MonitorConfig) -> Self {
        Self {
            state,
            bus,
            evaluator: Evaluator::new(config.expr),
            watchpoints: WatchpointPool::new(config.watchpoint_limit),
            config,
        }
    }

    /// Builds a monitor over a fresh register file and a single RAM window
    /// using the core's byte order.
    pub fn with_ram(
        spec: Arc<CoreSpec>,
        mem_base: u64,
        mem_size: usize,
        config: MonitorConfig,
    ) -> MonitorResult<Self> {
        let memory = BasicMemory::new("pmem", mem_size, spec.endianness());
        let bus = DeviceBus::new();
        bus.register_device(Arc::new(memory), mem_base)?;
        Ok(Self::new(CoreState::new(spec), bus, config))
    }

    pub fn state(&self) -> &CoreState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut CoreState {
        &mut self.state
    }

    pub fn bus(&self) -> &DeviceBus {
        &self.bus
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn watchpoints(&self) -> &WatchpointPool {
        &self.watchpoints
    }

    pub fn evaluate(&self, expr: &str) -> Result<i64, ExprError> {
        self.evaluator
            .evaluate(expr, &MachineResolver::new(&self.state, &self.bus))
    }

    pub fn evaluate_compiled(&self, compiled: &Postfix) -> Result<i64, ExprError> {
        self.evaluator
            .evaluate_compiled(compiled, &MachineResolver::new(&self.state, &self.bus))
    }

    /// Re-evaluates every watchpoint against the current machine state and
    /// returns the ones whose value changed.
    ///
    /// No console command modifies registers or memory, so the command loop
    /// never calls this. Whatever drives the machine (a CPU step loop, or a
    /// test poking `state_mut()` and `bus()`) calls it after each change and
    /// decides whether a hit stops execution.
    pub fn check_watchpoints(&mut self) -> Vec<WatchpointHit> {
        let resolver = MachineResolver::new(&self.state, &self.bus);
        self.watchpoints.check(&self.evaluator, &resolver)
    }

    /// Runs one console line. The first word selects the command and the
    /// remainder, if any, is handed over verbatim as its argument.
    pub fn execute(&mut self, line: &str, out: &mut dyn Write) -> MonitorResult<CommandOutcome> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(CommandOutcome::Continue);
        }
        let (name, args) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, Some(rest.trim()).filter(|r| !r.is_empty())),
            None => (line, None),
        };
        debug!("dispatch '{name}' args={args:?}");
        match command::find(name) {
            Some(cmd) => Ok(cmd.run(self, args, out)?),
            None => {
                writeln!(out, "Unknown command '{name}'")?;
                Ok(CommandOutcome::Continue)
            }
        }
    }

    /// Reads commands until end of input or `q`.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut out: W) -> MonitorResult<()> {
        let mut lines = input.lines();
        loop {
            if !self.config.batch {
                write!(out, "{}", self.config.prompt)?;
                out.flush()?;
            }
            let Some(line) = lines.next() else {
                break;
            };
            if self.execute(&line?, &mut out)? == CommandOutcome::Quit {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monitor() -> Monitor {
        let spec = Arc::new(CoreSpec::riscv(32).expect("rv32"));
        Monitor::with_ram(spec, 0x8000_0000, 0x1000, MonitorConfig::default()).expect("monitor")
    }

    fn run_line(monitor: &mut Monitor, line: &str) -> (CommandOutcome, String) {
        let mut out = Vec::new();
        let outcome = monitor.execute(line, &mut out).expect("execute");
        (outcome, String::from_utf8(out).expect("utf8"))
    }

    #[test]
    fn blank_lines_and_unknown_commands_continue() {
        let mut monitor = monitor();
        assert_eq!(run_line(&mut monitor, "   "), (CommandOutcome::Continue, String::new()));
        assert_eq!(
            run_line(&mut monitor, "frobnicate 1"),
            (CommandOutcome::Continue, "Unknown command 'frobnicate'\n".to_string())
        );
    }

    #[test]
    fn print_hands_the_rest_of_the_line_to_the_evaluator() {
        let mut monitor = monitor();
        monitor.state_mut().write_register("a0", 5).expect("a0");
        let (_, out) = run_line(&mut monitor, "p  $a0 * (2 + 1)");
        assert_eq!(out, "$a0 * (2 + 1) = 15 (0xf)\n");
    }

    #[test]
    fn quit_stops_the_loop() {
        let mut monitor = monitor();
        let input = b"p 1\nq\np 2\n";
        let mut out = Vec::new();
        monitor.run(&input[..], &mut out).expect("run");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("1 = 1 (0x1)"), "{text}");
        assert!(!text.contains("2 = 2"), "commands after q are ignored: {text}");
        assert_eq!(text.matches("(nemu) ").count(), 2);
    }
}
