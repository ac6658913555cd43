use chip8_core::{Emulator, PIXEL_ON, WIDTH};
use clap::Parser;
use slog::{error, info, Logger};
use sloggers::terminal::{Destination, TerminalLoggerBuilder};
use sloggers::types::Severity;
use sloggers::Build;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

const DEFAULT_CYCLES: usize = 500;

/// Run a CHIP-8 ROM headless and print the final frame as text
#[derive(Parser, Debug)]
#[command(name = "chip8-run", version)]
struct Args {
    #[arg(help = "Path to the ROM file to run")]
    rom: PathBuf,

    #[arg(default_value_t = DEFAULT_CYCLES, help = "Number of cycles to execute")]
    cycles: usize,
}

fn build_logger() -> Logger {
    let mut builder = TerminalLoggerBuilder::new();
    builder.level(Severity::Info);
    builder.destination(Destination::Stderr);

    match builder.build() {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("unable to create logger: {}", e);
            process::exit(1);
        }
    }
}

/// Print the frame buffer as text, one line per row
fn print_frame(pixels: &[u32]) {
    for row in pixels.chunks(WIDTH) {
        let line: String = row
            .iter()
            .map(|&p| if p == PIXEL_ON { '#' } else { '.' })
            .collect();
        println!("{}", line);
    }
}

fn run(logger: &Logger, rom: &Path, cycles: usize) -> chip8_core::Result<()> {
    let program = fs::read(rom)?;

    let mut emulator = Emulator::new(Some(logger.clone()));
    emulator.load_program(&program)?;

    for _ in 0..cycles {
        emulator.cycle()?;
    }

    info!(logger, "finished"; "cycles" => cycles, "pc" => emulator.pc(), "sound" => emulator.is_sound_playing());
    print_frame(emulator.get_pixels());
    Ok(())
}

fn main() {
    let args = Args::parse();

    let logger = build_logger();
    if let Err(e) = run(&logger, &args.rom, args.cycles) {
        error!(logger, "emulation stopped"; "rom" => %args.rom.display(), "error" => %e);
        // flush the async drain before exiting
        drop(logger);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycles_default_when_omitted() {
        let args = Args::try_parse_from(&["chip8-run", "pong.ch8"]).unwrap();

        assert_eq!(args.rom, PathBuf::from("pong.ch8"));
        assert_eq!(args.cycles, DEFAULT_CYCLES);
    }

    #[test]
    fn cycles_are_parsed() {
        let args = Args::try_parse_from(&["chip8-run", "pong.ch8", "1200"]).unwrap();

        assert_eq!(args.cycles, 1200);
    }

    #[test]
    fn negative_cycles_are_rejected() {
        assert!(Args::try_parse_from(&["chip8-run", "pong.ch8", "-5"]).is_err());
    }

    #[test]
    fn missing_rom_is_rejected() {
        assert!(Args::try_parse_from(&["chip8-run"]).is_err());
    }

    #[test]
    fn help_is_not_taken_as_a_rom() {
        let err = Args::try_parse_from(&["chip8-run", "--help"]).unwrap_err();

        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
