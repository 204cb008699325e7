use anyhow::Context;
use chip8_vm::{Config, EdgeMode, Emulator, Instruction};
use clap::Parser;

mod app;
mod beep;
mod keymap;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// ROM file to load
    #[clap(value_parser)]
    filename: String,

    /// Instructions executed per second
    #[clap(long, default_value_t = 500, value_parser = clap::value_parser!(u32).range(1..=1_000_000))]
    ips: u32,

    /// Size of each chip-8 pixel on screen
    #[clap(long, default_value_t = 10, value_parser)]
    zoom: usize,

    /// Wrap sprites around the screen edges instead of clipping them
    #[clap(long, action)]
    wrap: bool,

    /// Return from subroutines to the call instruction itself
    #[clap(long, action)]
    strict_return: bool,

    /// Seed for the random number generator
    #[clap(long, value_parser)]
    seed: Option<u64>,

    /// Print the program listing and exit
    #[clap(long, action)]
    disassemble: bool,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            edges: if self.wrap {
                EdgeMode::Wrap
            } else {
                EdgeMode::Clip
            },
            resume_after_call: !self.strict_return,
            seed: self.seed,
        }
    }
}

/// Print every word of the rom, decoded when possible.
fn disassemble(rom: &[u8]) {
    for (i, pair) in rom.chunks(2).enumerate() {
        let addr = chip8_vm::emulator::PROGRAM_START + i * 2;
        match pair {
            [a, b] => {
                let word = u16::from_be_bytes([*a, *b]);
                match Instruction::decode(word) {
                    Ok(instruction) => println!("{:#05X}: {:04X}  {}", addr, word, instruction),
                    Err(_) => println!("{:#05X}: {:04X}  DATA", addr, word),
                }
            }
            [a] => println!("{:#05X}: {:02X}    DATA", addr, a),
            _ => unreachable!(),
        }
    }
}

fn main() -> Result<(), anyhow::Error> {
    env_logger::init();

    // parse command-line arguments
    let cli = Cli::parse();

    let rom = std::fs::read(&cli.filename)
        .with_context(|| format!("error opening rom file: {}", &cli.filename))?;

    if cli.disassemble {
        disassemble(&rom);
        return Ok(());
    }

    let emu = Emulator::load_rom_with(&rom[..], cli.config()).context("error loading rom")?;

    let settings = app::Settings {
        title: format!("chip8-vm - {}", cli.filename),
        instructions_per_second: cli.ips,
        zoom: cli.zoom,
    };

    app::run(emu, &settings)?;
    Ok(())
}
