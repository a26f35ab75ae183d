// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The Mem represents the CPU's memory
//!
//! Every access is wrapped into the 4 KiB address space, so no address
//! a program can compute will ever reach outside of it.

use crate::error::{Error, Result};
use owo_colors::{OwoColorize, Style};
use std::{
    fmt::{Display, Formatter},
    ops::Range,
};

/// Size of the address space, in bytes
pub const MEM_SIZE: usize = 0x1000;

/// The built-in hexadecimal font, 5 bytes per glyph
#[rustfmt::skip]
pub const CHARSET: [u8; 0x50] = [
    0xf0, 0x90, 0x90, 0x90, 0xf0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xf0, 0x10, 0xf0, 0x80, 0xf0, // 2
    0xf0, 0x10, 0xf0, 0x10, 0xf0, // 3
    0x90, 0x90, 0xf0, 0x10, 0x10, // 4
    0xf0, 0x80, 0xf0, 0x10, 0xf0, // 5
    0xf0, 0x80, 0xf0, 0x90, 0xf0, // 6
    0xf0, 0x10, 0x20, 0x40, 0x40, // 7
    0xf0, 0x90, 0xf0, 0x90, 0xf0, // 8
    0xf0, 0x90, 0xf0, 0x10, 0xf0, // 9
    0xf0, 0x90, 0xf0, 0x90, 0x90, // A
    0xe0, 0x90, 0xe0, 0x90, 0xe0, // B
    0xf0, 0x80, 0x80, 0x80, 0xf0, // C
    0xe0, 0x90, 0x90, 0x90, 0xe0, // D
    0xf0, 0x80, 0xf0, 0x80, 0xf0, // E
    0xf0, 0x80, 0xf0, 0x80, 0x80, // F
];

/// Represents a named region in memory
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Region {
    /// Character ROM (but writable!)
    Charset,
    /// Program memory
    Program,
}

impl Region {
    /// Gets the address range covered by this [Region]
    /// # Examples
    /// ```rust
    /// # use cosmac::*;
    /// assert_eq!(0x050..0x0a0, Region::Charset.range());
    /// assert_eq!(0x200..0x1000, Region::Program.range());
    /// ```
    pub const fn range(self) -> Range<usize> {
        match self {
            Region::Charset => 0x050..0x0a0,
            Region::Program => 0x200..MEM_SIZE,
        }
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Region::Charset => "Charset",
                Region::Program => "Program",
            }
        )
    }
}

/// The 4 KiB address space of the interpreter
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Mem {
    memory: Vec<u8>,
}

impl Mem {
    /// Constructs a new [Mem] with the font loaded into [Region::Charset]
    /// # Examples
    /// ```rust
    /// # use cosmac::*;
    /// let mem = Mem::new();
    /// assert_eq!(0xf0, mem.read(0x050));
    /// assert_eq!(0, mem.read(0x200));
    /// ```
    pub fn new() -> Self {
        let mut mem = Mem {
            memory: vec![0; MEM_SIZE],
        };
        mem.memory[Region::Charset.range()].copy_from_slice(&CHARSET);
        mem
    }

    /// Gets the length of the backing memory
    pub fn len(&self) -> usize {
        self.memory.len()
    }

    /// Because clippy is so kind:
    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }

    /// Reads the byte at `addr`, wrapped into the address space
    #[inline(always)]
    pub fn read(&self, addr: u16) -> u8 {
        self.memory[wrap(addr)]
    }

    /// Writes `data` to the byte at `addr`, wrapped into the address space
    #[inline(always)]
    pub fn write(&mut self, addr: u16, data: u8) {
        self.memory[wrap(addr)] = data;
    }

    /// Reads a big-endian word from `addr` and `addr + 1`, each wrapped
    /// # Examples
    /// ```rust
    /// # use cosmac::*;
    /// let mut mem = Mem::new();
    /// mem.write(0xfff, 0x12);
    /// mem.write(0x000, 0x34);
    /// assert_eq!(0x1234, mem.read_word(0xfff));
    /// ```
    #[inline(always)]
    pub fn read_word(&self, addr: u16) -> u16 {
        u16::from_be_bytes([self.read(addr), self.read(addr.wrapping_add(1))])
    }

    /// Gets a slice of a named [Region] of memory
    pub fn get_region(&self, name: Region) -> &[u8] {
        &self.memory[name.range()]
    }

    /// Gets a mutable slice of a named [Region] of memory
    pub fn get_region_mut(&mut self, name: Region) -> &mut [u8] {
        &mut self.memory[name.range()]
    }

    /// Fills a [Region] with zeroes
    pub fn clear_region(&mut self, name: Region) -> &mut Self {
        self.get_region_mut(name).fill(0);
        self
    }

    /// Copies `data` verbatim to the start of a named [Region]
    ///
    /// Returns [Error::ProgramTooLarge] if `data` is longer than the region,
    /// in which case memory is left untouched.
    /// # Examples
    /// ```rust
    /// # use cosmac::*;
    /// # fn main() -> Result<()> {
    /// let mut mem = Mem::new();
    /// mem.load_region(Region::Program, b"Hello, world!")?;
    /// assert_eq!(b'H', mem.read(0x200));
    /// assert!(mem.load_region(Region::Program, &[0; 0x1000]).is_err());
    /// # Ok(())
    /// # }
    /// ```
    pub fn load_region(&mut self, name: Region, data: &[u8]) -> Result<&mut Self> {
        let region = self.get_region_mut(name);
        if data.len() > region.len() {
            return Err(Error::ProgramTooLarge {
                len: data.len(),
                max: region.len(),
            });
        }
        region[..data.len()].copy_from_slice(data);
        Ok(self)
    }

    /// Creates a window into the Mem which implements Display
    pub fn window(&self, range: Range<usize>) -> MemWindow {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        MemWindow {
            base: start,
            mem: &self.memory[start..end],
        }
    }
}

impl Default for Mem {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for Mem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.window(0..self.len()))
    }
}

/// A hexdump view of part of a [Mem]
pub struct MemWindow<'a> {
    base: usize,
    mem: &'a [u8],
}

impl<'a> Display for MemWindow<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // Green phosphor style formatting, for taste
        let term: Style = Style::new().bold().green();
        for (index, byte) in self.mem.iter().enumerate() {
            let addr = self.base + index;
            if index == 0 || addr % 16 == 0 {
                write!(f, "{}{} ", format!("{addr:03x}").style(term), ":".style(term))?
            }
            write!(f, "{byte:02x}")?;
            write!(
                f,
                "{}",
                match addr % 16 {
                    0xf => "\n",
                    0x7 => "  ",
                    _ if addr % 2 == 1 => " ",
                    _ => "",
                }
            )?
        }
        Ok(())
    }
}

#[inline(always)]
fn wrap(addr: u16) -> usize {
    addr as usize % MEM_SIZE
}
