// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Error type for Cosmac

use thiserror::Error;

/// Result type, equivalent to [std::result::Result]<T, [enum@Error]>
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Cosmac.
#[derive(Debug, Error)]
pub enum Error {
    /// A `call` was issued with every stack frame in use. The call was not taken.
    #[error("stack overflow: call at {pc:03x} with a full stack")]
    StackOverflow {
        /// The address of the offending instruction
        pc: u16,
    },
    /// A `ret` was issued with an empty stack. The return was not taken.
    #[error("stack underflow: ret at {pc:03x} with an empty stack")]
    StackUnderflow {
        /// The address of the offending instruction
        pc: u16,
    },
    /// Tried to press a key that doesn't exist
    #[error("tried to press key {key:X} which does not exist")]
    InvalidKey {
        /// The offending key
        key: usize,
    },
    /// Tried to get/set an out-of-bounds register
    #[error("tried to access register v{reg:X} which does not exist")]
    InvalidRegister {
        /// The offending register
        reg: usize,
    },
    /// The program does not fit in program memory
    #[error("program of {len} bytes does not fit in {max} bytes of program memory")]
    ProgramTooLarge {
        /// Length of the rejected program
        len: usize,
        /// Size of program memory
        max: usize,
    },
    /// Tried to convert string into [Timing](crate::Timing), but it did not match.
    #[error("no suitable conversion of \"{timing}\" into Timing")]
    InvalidTiming {
        /// The string which failed to become a timing mode
        timing: String,
    },
    /// Error originated in [std::io]
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[cfg(feature = "minifb")]
    /// Error originated in [minifb]
    #[error(transparent)]
    MinifbError(#[from] minifb::Error),
}
