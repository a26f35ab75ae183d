//! Selects how the [super::CPU]'s timers decay

use crate::error::Error;
use std::{str::FromStr, time::Duration};

/// The rate at which the delay and sound timers count down in [Timing::Realtime]
pub const TIMER_HZ: u32 = 60;

/// Selects how the delay and sound timers decay
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Timing {
    /// Timers decrement once per executed instruction.
    ///
    /// This ties the timers to however often the host steps the CPU,
    /// so a fast host runs its timers fast.
    #[default]
    PerStep,
    /// Timers decrement at [TIMER_HZ], measured in wall-clock time between steps
    Realtime,
}

impl Timing {
    /// The wall-clock duration of a single timer tick in [Timing::Realtime]
    pub fn period() -> Duration {
        Duration::from_secs(1) / TIMER_HZ
    }
}

impl FromStr for Timing {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "step" | "per-step" | "perstep" => Ok(Timing::PerStep),
            "realtime" | "real-time" | "60hz" => Ok(Timing::Realtime),
            _ => Err(Error::InvalidTiming {
                timing: s.to_string(),
            }),
        }
    }
}
