//! Interactive monitor for an emulated RISC-V style register file and RAM.
//!
//! ```bash
//! # Evaluate expressions against an image loaded at the default base
//! sdb --image build/dummy.bin
//!
//! # Scripted session, verbose lexer tracing
//! RUST_LOG=trace sdb --batch < commands.txt
//! ```

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use log::info;

use nanemu_sdb::monitor::{Monitor, MonitorConfig};
use nanemu_sdb::soc::core::CoreSpec;

#[derive(Parser, Debug)]
#[command(name = "sdb")]
#[command(version, about = "Simple debugger monitor", long_about = None)]
struct Cli {
    /// Read commands without printing a prompt
    #[arg(short, long)]
    batch: bool,

    /// Register width in bits
    #[arg(
        long,
        default_value = "32",
        value_parser = clap::builder::PossibleValuesParser::new(["32", "64"])
    )]
    xlen: String,

    /// Physical address where RAM is mapped
    #[arg(long, default_value = "0x80000000", value_parser = parse_number)]
    mem_base: u64,

    /// RAM size in bytes
    #[arg(long, default_value = "0x8000000", value_parser = parse_number)]
    mem_size: u64,

    /// Raw image copied to the start of RAM
    #[arg(short, long, value_name = "FILE")]
    image: Option<PathBuf>,
}

fn parse_number(text: &str) -> Result<u64, String> {
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.map_err(|err| format!("invalid number '{text}': {err}"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let xlen: u16 = cli.xlen.parse()?;
    let spec = Arc::new(CoreSpec::riscv(xlen)?);
    let config = MonitorConfig {
        batch: cli.batch,
        ..MonitorConfig::default()
    };
    let mem_size = usize::try_from(cli.mem_size)?;
    let mut monitor = Monitor::with_ram(spec, cli.mem_base, mem_size, config)?;

    if let Some(path) = &cli.image {
        let image = std::fs::read(path)?;
        monitor.bus().write(cli.mem_base, &image)?;
        info!(
            "loaded {} bytes from {} at {:#x}",
            image.len(),
            path.display(),
            cli.mem_base
        );
    }

    let stdin = io::stdin();
    monitor.run(stdin.lock(), io::stdout().lock())?;
    Ok(())
}
