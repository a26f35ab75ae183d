// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Cosmac: A chip-8 interpreter in Rust
//! Hello, world!

#[cfg(test)]
mod tests;
mod ui;

use cosmac::{
    error::{Error, Result},
    *,
};
use gumdrop::*;
use owo_colors::OwoColorize;
use std::{
    path::PathBuf,
    time::{Duration, Instant},
};
use ui::*;

pub fn main() -> Result<()> {
    let options = Arguments::parse_args_default_or_exit();
    let state = State::new(options)?;
    for result in state {
        if let Err(e) = result {
            eprintln!("{}", e.bold().red());
            break;
        }
    }
    Ok(())
}

/// Parses a window scale factor, which minifb only offers in powers of two
fn parse_scale(value: &str) -> std::result::Result<u8, String> {
    match value.parse::<u8>() {
        Ok(scale @ (1 | 2 | 4 | 8 | 16 | 32)) => Ok(scale),
        _ => Err(format!("scale must be one of 1, 2, 4, 8, 16, 32 (got {value})")),
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Options, Hash)]
struct Arguments {
    #[options(help = "Load a ROM to run on Cosmac.", required, free)]
    pub file: PathBuf,
    #[options(help = "Print this help message.")]
    help: bool,
    #[options(help = "Enable debug mode at startup.")]
    pub debug: bool,
    #[options(help = "Enable pause mode at startup.")]
    pub pause: bool,

    #[options(help = "Set the instructions-per-frame rate.", default = "10", meta = "IPF")]
    pub speed: usize,
    #[options(help = "Set the target framerate.", default = "60", meta = "FR")]
    pub frame_rate: u64,
    #[options(
        help = "Decay timers once per instruction (step), or at 60Hz (realtime).",
        meta = "TIMING"
    )]
    pub timing: Option<Timing>,

    #[options(
        help = "Set the window scale (1, 2, 4, 8, 16, 32).",
        default = "16",
        parse(try_from_str = "parse_scale"),
        meta = "X"
    )]
    pub scale: u8,
}

#[derive(Debug)]
struct State {
    pub speed: usize,
    pub rate: u64,
    pub cpu: CPU,
    pub ui: UI,
    pub ft: Instant,
}

impl State {
    fn new(options: Arguments) -> Result<Self> {
        let mut cpu = CPU::new(Flags {
            debug: options.debug,
            pause: options.pause,
            timing: options.timing.unwrap_or_default(),
            ..Default::default()
        });
        cpu.load_program(&options.file)?;
        Ok(State {
            speed: options.speed,
            rate: options.frame_rate.max(1),
            cpu,
            ui: UIBuilder::new(WIDTH, HEIGHT, &options.file)
                .scale(options.scale)
                .build()?,
            ft: Instant::now(),
        })
    }
    fn keys(&mut self) -> Result<bool> {
        self.ui.keys(&mut self.cpu)
    }
    fn frame(&mut self) -> Result<bool> {
        self.ui.frame(&mut self.cpu)
    }
    fn tick_cpu(&mut self) -> Result<()> {
        if !self.cpu.flags.pause {
            run_frame(&mut self.cpu, self.speed)?;
        }
        Ok(())
    }
    fn wait_for_next_frame(&mut self) {
        let rate = Duration::from_nanos(1_000_000_000 / self.rate + 1);
        std::thread::sleep(rate.saturating_sub(self.ft.elapsed()));
        self.ft += rate;
    }
}

/// Runs one frame's worth of steps.
///
/// Stack faults leave the CPU runnable, so they're reported and the frame carries on.
fn run_frame(cpu: &mut CPU, steps: usize) -> Result<()> {
    for _ in 0..steps {
        match cpu.step() {
            Err(e @ (Error::StackOverflow { .. } | Error::StackUnderflow { .. })) => {
                eprintln!("{}", e.yellow());
            }
            Err(e) => return Err(e),
            Ok(_) => (),
        }
    }
    Ok(())
}

impl Iterator for State {
    type Item = Result<()>;

    fn next(&mut self) -> Option<Self::Item> {
        self.wait_for_next_frame();
        match self.keys() {
            Ok(opt) if !opt => return None,
            Err(e) => return Some(Err(e)),
            _ => (),
        }
        if let Err(e) = self.tick_cpu() {
            return Some(Err(e));
        }
        match self.frame() {
            Ok(opt) if !opt => return None,
            Err(e) => return Some(Err(e)),
            _ => (),
        }
        Some(Ok(()))
    }
}
