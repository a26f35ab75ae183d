// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE.txt for details)

//! This crate implements a Chip-8 interpreter core: the fetch, decode and execute
//! loop of a COSMAC VIP style Chip-8, and nothing more.
//!
//! The host owns the pacing. It calls [CPU::step] as often as it likes, writes the
//! keypad between steps, and reads back the [Screen] and the sound timer.
//!
//! ```rust
//! use cosmac::*;
//! # fn main() -> Result<()> {
//! let mut cpu = CPU::default();
//! cpu.load_program_bytes(&[
//!     0x60, 0x05, // mov #05, v0
//!     0x70, 0x03, // add #03, v0
//! ])?;
//! cpu.step()?.step()?;
//! assert_eq!(8, cpu.v()[0]);
//! # Ok(())
//! # }
//! ```

pub mod cpu;
pub mod error;
pub mod screen;

pub use cpu::{
    flags::Flags,
    instruction::Insn,
    mem::{Mem, Region},
    timing::Timing,
    CPU,
};
pub use error::{Error, Result};
pub use screen::{Screen, HEIGHT, WIDTH};
