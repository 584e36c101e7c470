use std::fs;
use std::io;
use std::ops::ControlFlow;
use std::path::PathBuf;

use anyhow::Context;
use chipvm_chip8::{disassemble, Chip8Config, Chip8Machine, SpritePolicy, PROGRAM_START};
use chipvm_core::{Machine, Oscillator};
use clap::{Parser, Subcommand};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::input::{InputAction, KeyboardInput};
use crate::terminal::TerminalGuard;

mod input;
mod terminal;

#[derive(Parser, Debug)]
#[command(version, about = "CHIP-8 interpreter", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a ROM, drawing the display to the terminal. Keys 1-4, Q-R, A-F
    /// and Z-V form the hex keypad; Esc or Ctrl-C quits.
    Run(RunArgs),
    /// Print a disassembly listing of a ROM.
    Disasm {
        #[arg(value_name = "ROM")]
        rom: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    #[arg(value_name = "ROM")]
    rom: PathBuf,

    /// Instructions per second; timers tick once per instruction.
    #[arg(long, default_value_t = 500)]
    hz: u64,

    /// Stop after this many instructions.
    #[arg(long, value_name = "N")]
    cycles: Option<u64>,

    /// Seed for the CXNN random source.
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    #[arg(long, value_enum, default_value_t = PolicyArg::Clip)]
    sprite_policy: PolicyArg,

    /// Hold a hex key (0-F) down for the whole run. May be repeated.
    #[arg(long = "key", value_name = "HEX", value_parser = parse_key)]
    keys: Vec<u8>,

    /// How long a key press stays down, since terminals rarely report releases.
    #[arg(long, value_name = "MS", default_value_t = 200)]
    key_hold_ms: u64,

    /// Stop on the first faulting instruction instead of skipping it.
    #[arg(long, default_value_t = false)]
    halt_on_error: bool,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum PolicyArg {
    Clip,
    Wrap,
    Reject,
}

impl From<PolicyArg> for SpritePolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Clip => SpritePolicy::Clip,
            PolicyArg::Wrap => SpritePolicy::Wrap,
            PolicyArg::Reject => SpritePolicy::Reject,
        }
    }
}

fn parse_key(raw: &str) -> Result<u8, String> {
    let digits = raw.trim_start_matches("0x").trim_start_matches("0X");
    match u8::from_str_radix(digits, 16) {
        Ok(key) if key < 0x10 => Ok(key),
        _ => Err(format!("'{raw}' is not a hex key between 0 and F")),
    }
}

fn run(args: RunArgs) -> anyhow::Result<()> {
    let mut config = Chip8Config::new().with_sprite_policy(args.sprite_policy.into());
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let mut machine = Chip8Machine::new(config);
    machine
        .load_file(&args.rom)
        .with_context(|| format!("failed to load ROM {}", args.rom.display()))?;

    let mut oscillator = Oscillator::new(args.hz).context("invalid --hz")?;
    let hold_cycles = (args.hz * args.key_hold_ms / 1000).max(1);
    let mut input = KeyboardInput::new(hold_cycles, &args.keys);
    tracing::info!(rom = %args.rom.display(), hz = args.hz, "running");

    let screen = TerminalGuard::enter().context("failed to set up terminal")?;
    let result = oscillator.run(|cycle| {
        if args.cycles.is_some_and(|limit| cycle > limit) {
            return ControlFlow::Break(Ok(()));
        }
        if screen.use_tty() {
            match input.poll(cycle) {
                Ok(InputAction::Continue) => {}
                Ok(InputAction::Quit) => return ControlFlow::Break(Ok(())),
                Err(err) => {
                    let err = anyhow::Error::new(err).context("failed to read keyboard");
                    return ControlFlow::Break(Err(err));
                }
            }
        }
        machine.set_keys(input.keys(cycle));

        match machine.step() {
            Ok(outcome) if outcome.redraw || outcome.clear => {
                if let Err(err) = screen.present(machine.display()) {
                    let err = anyhow::Error::new(err).context("failed to draw frame");
                    return ControlFlow::Break(Err(err));
                }
            }
            Ok(_) => {}
            Err(err) if args.halt_on_error => {
                return ControlFlow::Break(Err(
                    anyhow::Error::new(err).context(format!("halted on cycle {cycle}"))
                ));
            }
            Err(err) => {
                tracing::warn!(cycle, error = %err, "skipping faulted instruction");
                machine.skip();
            }
        }
        ControlFlow::Continue(())
    });
    drop(screen);

    tracing::info!(cycles = oscillator.cycles(), "stopped");
    result
}

fn disasm(rom: PathBuf) -> anyhow::Result<()> {
    let program =
        fs::read(&rom).with_context(|| format!("failed to read ROM {}", rom.display()))?;
    for (address, decoded) in disassemble(&program, PROGRAM_START) {
        match decoded {
            Ok(ins) => println!("0x{:04X}  {:04X}  {}", address, ins.opcode(), ins),
            Err(err) => println!("0x{:04X}  ????  ; {}", address, err),
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let stderr_format = tracing_subscriber::fmt::layer().with_writer(io::stderr);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_format)
        .init();

    match Cli::parse().command {
        Command::Run(args) => run(args),
        Command::Disasm { rom } => disasm(rom),
    }
}
