// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Decodes and runs instructions


pub mod behavior;
pub mod flags;
pub mod instruction;
pub mod mem;
pub mod timing;

use self::{
    flags::Flags,
    instruction::Insn,
    mem::{Mem, Region},
    timing::Timing,
};
use crate::{
    error::{Error, Result},
    screen::Screen,
};
use owo_colors::{OwoColorize, Style};
use rand::{rngs::StdRng, SeedableRng};
use std::{fmt::Debug, path::Path, time::Instant};

type Reg = usize;
type Adr = u16;
type Nib = u8;

/// Number of return addresses the call stack can hold
pub const STACK_DEPTH: usize = 16;

/// Represents the internal state of the CPU interpreter
#[derive(Clone)]
pub struct CPU {
    /// Flags that control how the CPU behaves, but which aren't inherent to the
    /// chip-8. Includes [Timing], debug and pause state.
    pub flags: Flags,
    // memory map info
    font: Adr,
    // memory
    mem: Mem,
    screen: Screen,
    stack: [Adr; STACK_DEPTH],
    sp: usize,
    // registers
    pc: Adr,
    i: Adr,
    v: [u8; 16],
    delay: u8,
    sound: u8,
    // I/O
    keys: [bool; 16],
    // Execution data
    cycle: usize,
    rng: StdRng,
    timer_epoch: Option<Instant>,
}

// public interface
impl CPU {
    /// Constructs a new CPU with the font loaded, the program counter at `0x200`,
    /// and its random number generator seeded from the OS.
    /// # Examples
    /// ```rust
    /// # use cosmac::*;
    /// let cpu = CPU::new(Flags {
    ///     timing: Timing::Realtime,
    ///     ..Default::default()
    /// });
    /// assert_eq!(0x200, cpu.pc());
    /// ```
    pub fn new(flags: Flags) -> Self {
        CPU {
            flags,
            font: Region::Charset.range().start as Adr,
            mem: Mem::new(),
            screen: Screen::new(),
            stack: [0; STACK_DEPTH],
            sp: 0,
            pc: Region::Program.range().start as Adr,
            i: 0,
            v: [0; 16],
            delay: 0,
            sound: 0,
            keys: [false; 16],
            cycle: 0,
            rng: StdRng::from_entropy(),
            timer_epoch: None,
        }
    }

    /// Loads a program from disk into the CPU's program space
    pub fn load_program(&mut self, rom: impl AsRef<Path>) -> Result<&mut Self> {
        self.load_program_bytes(&std::fs::read(rom)?)
    }

    /// Loads bytes into the CPU's program space, starting at `0x200`
    ///
    /// Anything previously in program space is cleared.
    /// If the program doesn't fit, returns [Error::ProgramTooLarge].
    /// # Examples
    /// ```rust
    /// # use cosmac::*;
    /// # fn main() -> Result<()> {
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(&[0x60, 0x05, 0x70, 0x03])?;
    /// cpu.step()?.step()?;
    /// assert_eq!(8, cpu.v()[0]);
    /// # Ok(())
    /// # }
    /// ```
    pub fn load_program_bytes(&mut self, rom: &[u8]) -> Result<&mut Self> {
        let program = Region::Program.range();
        if rom.len() > program.len() {
            return Err(Error::ProgramTooLarge {
                len: rom.len(),
                max: program.len(),
            });
        }
        self.mem.clear_region(Region::Program);
        self.mem.load_region(Region::Program, rom)?;
        Ok(self)
    }

    /// Reseeds the random number generator, making `rand` reproducible
    /// # Examples
    /// ```rust
    /// # use cosmac::*;
    /// # fn main() -> Result<()> {
    /// let (mut a, mut b) = (CPU::default(), CPU::default());
    /// for cpu in [&mut a, &mut b] {
    ///     cpu.seed(0xc0ffee).load_program_bytes(&[0xc0, 0xff])?.step()?;
    /// }
    /// assert_eq!(a.v(), b.v());
    /// # Ok(())
    /// # }
    /// ```
    pub fn seed(&mut self, seed: u64) -> &mut Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Presses a key, and reports whether the key's state changed.
    /// If key does not exist, returns [Error::InvalidKey].
    ///
    /// # Examples
    /// ```rust
    /// # use cosmac::*;
    /// let mut cpu = CPU::default();
    ///
    /// // press key `7`
    /// let did_press = cpu.press(0x7).unwrap();
    /// assert!(did_press);
    ///
    /// // press key `7` again, even though it's already pressed
    /// let did_press = cpu.press(0x7).unwrap();
    /// // it was already pressed, so nothing's changed.
    /// assert!(!did_press);
    /// ```
    pub fn press(&mut self, key: usize) -> Result<bool> {
        let keyref = self.keys.get_mut(key).ok_or(Error::InvalidKey { key })?;
        let changed = !*keyref;
        *keyref = true;
        Ok(changed)
    }

    /// Releases a key, and reports whether the key's state changed.
    /// If key is outside range `0..=0xF`, returns [Error::InvalidKey].
    ///
    /// # Examples
    /// ```rust
    /// # use cosmac::*;
    /// let mut cpu = CPU::default();
    /// // press key `7`
    /// cpu.press(0x7).unwrap();
    /// // release key `7`
    /// let changed = cpu.release(0x7).unwrap();
    /// assert!(changed); // key released
    /// // try releasing `7` again
    /// let changed = cpu.release(0x7).unwrap();
    /// assert!(!changed); // key was not held
    /// ```
    pub fn release(&mut self, key: usize) -> Result<bool> {
        let keyref = self.keys.get_mut(key).ok_or(Error::InvalidKey { key })?;
        let changed = *keyref;
        *keyref = false;
        Ok(changed)
    }

    /// Replaces the state of the whole keypad at once
    pub fn set_keys(&mut self, keys: [bool; 16]) {
        self.keys = keys;
    }

    /// Gets the state of the keypad
    pub fn keys(&self) -> &[bool; 16] {
        &self.keys
    }

    /// Sets a general purpose register in the CPU.
    /// If the register doesn't exist, returns [Error::InvalidRegister]
    /// # Examples
    /// ```rust
    /// # use cosmac::*;
    /// // Create a new CPU, and set v4 to 0x41
    /// let mut cpu = CPU::default();
    /// cpu.set_v(0x4, 0x41).unwrap();
    /// // Dump the CPU registers
    /// cpu.dump();
    /// ```
    pub fn set_v(&mut self, reg: Reg, value: u8) -> Result<()> {
        let gpr = self.v.get_mut(reg).ok_or(Error::InvalidRegister { reg })?;
        *gpr = value;
        Ok(())
    }

    /// Gets a slice of the entire general purpose registers
    /// # Examples
    /// ```rust
    /// # use cosmac::*;
    /// // Create a new CPU, and set v0 to 0x41
    /// let mut cpu = CPU::default();
    /// cpu.set_v(0x0, 0x41).unwrap();
    /// assert_eq!(
    ///     cpu.v(),
    ///     [0x41, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]
    /// )
    /// ```
    pub fn v(&self) -> &[u8] {
        self.v.as_slice()
    }

    /// Gets the program counter
    /// # Examples
    /// ```rust
    /// # use cosmac::*;
    /// let cpu = CPU::default();
    /// assert_eq!(0x200, cpu.pc());
    /// ```
    pub fn pc(&self) -> Adr {
        self.pc
    }

    /// Gets the I register
    /// # Examples
    /// ```rust
    /// # use cosmac::*;
    /// let cpu = CPU::default();
    /// assert_eq!(0, cpu.i());
    /// ```
    pub fn i(&self) -> Adr {
        self.i
    }

    /// Gets the stack pointer (the number of return addresses on the stack)
    pub fn sp(&self) -> usize {
        self.sp
    }

    /// Gets the value in the Sound Timer register.
    /// A tone should sound while this is nonzero.
    /// # Examples
    /// ```rust
    /// # use cosmac::*;
    /// let cpu = CPU::default();
    /// assert_eq!(0, cpu.sound());
    /// ```
    pub fn sound(&self) -> u8 {
        self.sound
    }

    /// Gets the value in the Delay Timer register
    /// # Examples
    /// ```rust
    /// # use cosmac::*;
    /// let cpu = CPU::default();
    /// assert_eq!(0, cpu.delay());
    /// ```
    pub fn delay(&self) -> u8 {
        self.delay
    }

    /// Gets the number of cycles the CPU has executed
    /// # Examples
    /// ```rust
    /// # use cosmac::*;
    /// let cpu = CPU::default();
    /// assert_eq!(0x0, cpu.cycle());
    /// ```
    pub fn cycle(&self) -> usize {
        self.cycle
    }

    /// Gets the CPU's memory
    pub fn mem(&self) -> &Mem {
        &self.mem
    }

    /// Gets the framebuffer, for presentation
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Soft resets the CPU, releasing keypause and
    /// reinitializing the program counter to 0x200
    /// # Examples
    /// ```rust
    /// # use cosmac::*;
    /// # fn main() -> Result<()> {
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(&[0x13, 0x40])?.step()?;
    /// cpu.flags.keypause = true;
    /// assert_eq!(0x340, cpu.pc());
    /// cpu.soft_reset();
    /// assert_eq!(0x200, cpu.pc());
    /// assert_eq!(false, cpu.flags.keypause);
    /// # Ok(())
    /// # }
    /// ```
    pub fn soft_reset(&mut self) {
        self.pc = Region::Program.range().start as Adr;
        self.flags.keypause = false;
    }

    /// Resets the emulator.
    ///
    /// Touches the keypause flag, stack, pc, registers, timers, keys,
    /// screen, and cycle count.
    ///
    /// Does not touch memory, or the other [Flags].
    pub fn reset(&mut self) {
        self.flags.keypause = false;
        // clear the stack
        self.stack = [0; STACK_DEPTH];
        self.sp = 0;
        // Reset the program counter
        self.pc = Region::Program.range().start as Adr;
        // Zero the registers
        self.i = 0;
        self.v = [0; 16];
        self.delay = 0;
        self.sound = 0;
        self.timer_epoch = None;
        // I/O
        self.keys = [false; 16];
        self.screen.clear();
        // Execution data
        self.cycle = 0;
    }

    /// Unpauses the emulator for a single step,
    /// even if cpu.flags.pause is set.
    ///
    /// Like with [CPU::step], this returns a stack fault if one occurred.
    /// # Examples
    /// ```rust
    /// # use cosmac::*;
    /// # fn main() -> Result<()> {
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(&[
    ///     0x00, 0xe0, // cls
    ///     0x12, 0x02, // jump 0x202 (pc)
    /// ])?;
    /// cpu.singlestep()?;
    /// assert_eq!(0x202, cpu.pc());
    /// assert_eq!(1, cpu.cycle());
    /// assert!(cpu.flags.pause);
    /// # Ok(())
    /// # }
    /// ```
    pub fn singlestep(&mut self) -> Result<&mut Self> {
        self.flags.pause = false;
        let result = self.step().map(|_| ());
        self.flags.pause = true;
        result?;
        Ok(self)
    }

    /// Runs `steps` steps, stopping early at the first stack fault
    /// # Examples
    /// ```rust
    /// # use cosmac::*;
    /// # fn main() -> Result<()> {
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(&[
    ///     0x00, 0xe0, // cls
    ///     0x12, 0x02, // jump 0x202 (pc)
    /// ])?;
    /// cpu.multistep(0x20)?;
    /// assert_eq!(0x202, cpu.pc());
    /// assert_eq!(0x20, cpu.cycle());
    /// # Ok(())
    /// # }
    /// ```
    pub fn multistep(&mut self, steps: usize) -> Result<&mut Self> {
        for _ in 0..steps {
            self.step()?;
        }
        Ok(self)
    }

    /// Executes a single instruction, then decays the timers.
    ///
    /// Instructions the decoder doesn't recognize are skipped over as no-ops.
    /// Does nothing while [Flags::pause] is set.
    ///
    /// Returns [Error::StackOverflow] or [Error::StackUnderflow] if a `call` or `ret`
    /// could not be carried out. In that case the instruction behaves as a no-op,
    /// so the error can be ignored and execution continued.
    /// # Examples
    /// ```rust
    /// # use cosmac::*;
    /// # fn main() -> Result<()> {
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(&[
    ///     0x00, 0xe0, // cls
    ///     0x12, 0x02, // jump 0x202 (pc)
    /// ])?;
    /// cpu.step()?;
    /// assert_eq!(0x202, cpu.pc());
    /// assert_eq!(1, cpu.cycle());
    /// # Ok(())
    /// # }
    /// ```
    /// Returns [Error::StackUnderflow] when returning from nowhere.
    /// ```rust
    /// # use cosmac::*;
    /// # fn main() -> Result<()> {
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(&[
    ///     0x00, 0xee, // ret
    /// ])?;
    /// cpu.step().expect_err("Should return Error::StackUnderflow { pc: 0x200 }");
    /// assert_eq!(0x202, cpu.pc());
    /// # Ok(())
    /// # }
    /// ```
    pub fn step(&mut self) -> Result<&mut Self> {
        // Do nothing if paused
        if self.flags.pause {
            // Paused time doesn't count toward the timers
            self.timer_epoch = None;
            return Ok(self);
        }
        self.cycle += 1;
        // fetch
        let pc = self.pc;
        let word = self.mem.read_word(pc);
        // decode
        let insn = Insn::decode(word);
        if self.flags.debug {
            self.trace(pc, word, insn);
        }
        // execute
        self.pc = pc.wrapping_add(2);
        let result = match insn {
            Some(insn) => self.execute(insn),
            None => Ok(()),
        };
        match self.flags.timing {
            Timing::PerStep => self.tick_timers(),
            Timing::Realtime => self.sync_timers(),
        }
        result?;
        Ok(self)
    }

    /// Decrements the delay and sound timers, if they're nonzero
    /// # Examples
    /// ```rust
    /// # use cosmac::*;
    /// # fn main() -> Result<()> {
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(&[
    ///     0x60, 0x02, // mov #02, v0
    ///     0xf0, 0x15, // mov v0, DT
    /// ])?;
    /// cpu.multistep(2)?;
    /// assert_eq!(1, cpu.delay());
    /// cpu.tick_timers();
    /// cpu.tick_timers();
    /// assert_eq!(0, cpu.delay());
    /// # Ok(())
    /// # }
    /// ```
    pub fn tick_timers(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }

    /// Dumps the current state of all CPU registers, and the cycle count
    /// # Examples
    /// ```rust
    /// # use cosmac::*;
    /// let cpu = CPU::default();
    /// cpu.dump();
    /// ```
    /// outputs
    /// ```text
    /// PC: 0200, SP: 00, I: 0000
    /// v0: 00 v1: 00 v2: 00 v3: 00
    /// v4: 00 v5: 00 v6: 00 v7: 00
    /// v8: 00 v9: 00 vA: 00 vB: 00
    /// vC: 00 vD: 00 vE: 00 vF: 00
    /// DLY: 0, SND: 0, CYC:      0
    /// ```
    pub fn dump(&self) {
        std::println!(
            "PC: {:04x}, SP: {:02x}, I: {:04x}\n{}DLY: {}, SND: {}, CYC: {:6}",
            self.pc,
            self.sp,
            self.i,
            self.v
                .into_iter()
                .enumerate()
                .map(|(i, gpr)| {
                    format!(
                        "v{i:X}: {gpr:02x} {}",
                        match i % 4 {
                            3 => "\n",
                            _ => "",
                        }
                    )
                })
                .collect::<String>(),
            self.delay,
            self.sound,
            self.cycle,
        );
    }
}

// internals
impl CPU {
    /// Prints the instruction about to execute
    fn trace(&self, pc: Adr, word: u16, insn: Option<Insn>) {
        let disassembly = match insn {
            Some(insn) => format!("{}", insn.style(Style::new().green())),
            None => format!("{}", format!("nop    {word:04x}").style(Style::new().bold().red())),
        };
        std::println!(
            "{:3} {:03x}: {:<36}",
            self.cycle.bright_black(),
            pc,
            disassembly
        );
    }

    /// Decays the timers at [timing::TIMER_HZ], based on the time elapsed since the last tick
    fn sync_timers(&mut self) {
        let now = Instant::now();
        let epoch = *self.timer_epoch.get_or_insert(now);
        let period = Timing::period();
        let ticks = now.saturating_duration_since(epoch).as_nanos() / period.as_nanos();
        if ticks == 0 {
            return;
        }
        let ticks = ticks.min(u8::MAX as u128) as u8;
        self.delay = self.delay.saturating_sub(ticks);
        self.sound = self.sound.saturating_sub(ticks);
        self.timer_epoch = Some(epoch + period * ticks as u32);
    }
}

/// Compares the architectural state, ignoring the random number generator and timer clock
impl PartialEq for CPU {
    fn eq(&self, other: &Self) -> bool {
        self.flags == other.flags
            && self.font == other.font
            && self.mem == other.mem
            && self.screen == other.screen
            && self.stack == other.stack
            && self.sp == other.sp
            && self.pc == other.pc
            && self.i == other.i
            && self.v == other.v
            && self.delay == other.delay
            && self.sound == other.sound
            && self.keys == other.keys
            && self.cycle == other.cycle
    }
}

impl Debug for CPU {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CPU")
            .field("flags", &self.flags)
            .field("font", &self.font)
            .field("stack", &&self.stack[..self.sp])
            .field("pc", &self.pc)
            .field("i", &self.i)
            .field("v", &self.v)
            .field("delay", &self.delay)
            .field("sound", &self.sound)
            .field("keys", &self.keys)
            .field("cycle", &self.cycle)
            .finish_non_exhaustive()
    }
}

impl Default for CPU {
    /// Constructs a new CPU with sane defaults
    ///
    /// | value  | default | description
    /// |--------|---------|------------
    /// | font   |`0x0050` | Location of font memory.
    /// | pc     |`0x0200` | Start location.
    /// | timing |`PerStep`| One timer tick per instruction.
    ///
    /// # Examples
    /// ```rust
    /// use cosmac::*;
    /// let mut cpu = CPU::default();
    /// ```
    fn default() -> Self {
        CPU::new(Flags::default())
    }
}
