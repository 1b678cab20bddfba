use chrono::{Local, Timelike};
use std::fmt::Debug;

/// Source of the local wall-clock hour, used to choose day/night icons.
pub trait Clock: Send + Sync + Debug {
    /// Hour of day in `0..24`.
    fn local_hour(&self) -> u32;

    fn is_daytime(&self) -> bool {
        is_daytime(self.local_hour())
    }
}

/// Reads the system local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn local_hour(&self) -> u32 {
        Local::now().hour()
    }
}

/// Always reports the same hour.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u32);

impl Clock for FixedClock {
    fn local_hour(&self) -> u32 {
        self.0
    }
}

/// Day is `[06:00, 18:00)` local time; no sunrise/sunset calculation.
pub fn is_daytime(hour: u32) -> bool {
    (6..18).contains(&hour)
}
