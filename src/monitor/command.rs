//! Console command table. Each handler receives the argument string that
//! follows the command word (if any) and writes its report to `out`.

use std::io::{self, Write};

use log::warn;

use super::Monitor;
use super::config::SCAN_WORD_BYTES;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Continue,
    Quit,
}

type Handler = fn(&mut Monitor, Option<&str>, &mut dyn Write) -> io::Result<CommandOutcome>;

pub struct Command {
    pub name: &'static str,
    pub usage: &'static str,
    pub description: &'static str,
    handler: Handler,
}

impl Command {
    pub(super) fn run(
        &self,
        monitor: &mut Monitor,
        args: Option<&str>,
        out: &mut dyn Write,
    ) -> io::Result<CommandOutcome> {
        (self.handler)(monitor, args, out)
    }
}

pub const COMMANDS: &[Command] = &[
    Command {
        name: "help",
        usage: "help [CMD]",
        description: "Display information about all supported commands",
        handler: cmd_help,
    },
    Command {
        name: "q",
        usage: "q",
        description: "Exit the monitor",
        handler: cmd_quit,
    },
    Command {
        name: "p",
        usage: "p EXPR",
        description: "Evaluate an expression and print its value",
        handler: cmd_print,
    },
    Command {
        name: "x",
        usage: "x N EXPR",
        description: "Scan N words of memory starting at the address EXPR",
        handler: cmd_scan,
    },
    Command {
        name: "info",
        usage: "info r|w",
        description: "Print registers (r) or watchpoints (w)",
        handler: cmd_info,
    },
    Command {
        name: "w",
        usage: "w EXPR",
        description: "Watch an expression for value changes",
        handler: cmd_watch,
    },
    Command {
        name: "d",
        usage: "d N",
        description: "Delete watchpoint N",
        handler: cmd_delete,
    },
];

pub fn find(name: &str) -> Option<&'static Command> {
    COMMANDS.iter().find(|cmd| cmd.name == name)
}

fn usage(cmd: &str, out: &mut dyn Write) -> io::Result<CommandOutcome> {
    if let Some(command) = find(cmd) {
        writeln!(out, "Usage: {}", command.usage)?;
    }
    Ok(CommandOutcome::Continue)
}

fn cmd_help(
    _monitor: &mut Monitor,
    args: Option<&str>,
    out: &mut dyn Write,
) -> io::Result<CommandOutcome> {
    match args.and_then(|a| a.split_whitespace().next()) {
        None => {
            for cmd in COMMANDS {
                writeln!(out, "{} - {}", cmd.name, cmd.description)?;
            }
        }
        Some(name) => match find(name) {
            Some(cmd) => writeln!(out, "{} - {}", cmd.name, cmd.description)?,
            None => writeln!(out, "Unknown command '{name}'")?,
        },
    }
    Ok(CommandOutcome::Continue)
}

fn cmd_quit(
    _monitor: &mut Monitor,
    _args: Option<&str>,
    _out: &mut dyn Write,
) -> io::Result<CommandOutcome> {
    Ok(CommandOutcome::Quit)
}

fn cmd_print(
    monitor: &mut Monitor,
    args: Option<&str>,
    out: &mut dyn Write,
) -> io::Result<CommandOutcome> {
    let Some(expr) = args else {
        return usage("p", out);
    };
    match monitor.evaluate(expr) {
        Ok(value) => writeln!(out, "{expr} = {value} ({:#x})", value as u64)?,
        Err(err) => {
            warn!("p {expr}: {err}");
            writeln!(out, "{}", err.render(expr))?;
        }
    }
    Ok(CommandOutcome::Continue)
}

fn cmd_scan(
    monitor: &mut Monitor,
    args: Option<&str>,
    out: &mut dyn Write,
) -> io::Result<CommandOutcome> {
    let Some((count, expr)) = args.and_then(|a| a.split_once(char::is_whitespace)) else {
        return usage("x", out);
    };
    let Ok(count) = count.parse::<usize>() else {
        writeln!(out, "invalid word count '{count}'")?;
        return Ok(CommandOutcome::Continue);
    };
    let expr = expr.trim();
    let base = match monitor.evaluate(expr) {
        Ok(value) => value as u64,
        Err(err) => {
            warn!("x {expr}: {err}");
            writeln!(out, "{}", err.render(expr))?;
            return Ok(CommandOutcome::Continue);
        }
    };
    for idx in 0..count {
        let address = base.wrapping_add((idx * SCAN_WORD_BYTES) as u64);
        match monitor.bus.read_word(address, SCAN_WORD_BYTES) {
            Ok(word) => writeln!(out, "{address:#010x}: {word:#010x}")?,
            Err(err) => {
                writeln!(out, "cannot read memory at {address:#010x}: {err}")?;
                break;
            }
        }
    }
    Ok(CommandOutcome::Continue)
}

fn cmd_info(
    monitor: &mut Monitor,
    args: Option<&str>,
    out: &mut dyn Write,
) -> io::Result<CommandOutcome> {
    match args.map(str::trim) {
        Some("r") => {
            for (spec, value) in monitor.state.iter() {
                let digits = (spec.bit_len as usize).div_ceil(4);
                writeln!(out, "{:<6} 0x{value:0digits$x}  {value}", spec.name)?;
            }
        }
        Some("w") => {
            if monitor.watchpoints.is_empty() {
                writeln!(out, "No watchpoints.")?;
            }
            for wp in monitor.watchpoints.iter() {
                match wp.last_value() {
                    Some(value) => writeln!(out, "{:<4} {}  = {value}", wp.id(), wp.expr())?,
                    None => writeln!(out, "{:<4} {}  = <error>", wp.id(), wp.expr())?,
                }
            }
        }
        _ => return usage("info", out),
    }
    Ok(CommandOutcome::Continue)
}

fn cmd_watch(
    monitor: &mut Monitor,
    args: Option<&str>,
    out: &mut dyn Write,
) -> io::Result<CommandOutcome> {
    let Some(expr) = args else {
        return usage("w", out);
    };
    let compiled = match monitor.evaluator.compile(expr) {
        Ok(compiled) => compiled,
        Err(err) => {
            writeln!(out, "{}", err.render(expr))?;
            return Ok(CommandOutcome::Continue);
        }
    };
    let initial = monitor.evaluate_compiled(&compiled).ok();
    match monitor.watchpoints.add(expr, compiled, initial) {
        Ok(id) => writeln!(out, "Watchpoint {id}: {expr}")?,
        Err(err) => writeln!(out, "{err}")?,
    }
    Ok(CommandOutcome::Continue)
}

fn cmd_delete(
    monitor: &mut Monitor,
    args: Option<&str>,
    out: &mut dyn Write,
) -> io::Result<CommandOutcome> {
    let Some(Ok(id)) = args.map(|a| a.trim().parse::<usize>()) else {
        return usage("d", out);
    };
    match monitor.watchpoints.remove(id) {
        Ok(wp) => writeln!(out, "Deleted watchpoint {}: {}", wp.id(), wp.expr())?,
        Err(err) => writeln!(out, "{err}")?,
    }
    Ok(CommandOutcome::Continue)
}
