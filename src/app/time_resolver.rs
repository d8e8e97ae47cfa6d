//! Departure time resolution and arrival projection.
//!
//! Times are wall-clock `HH:MM` values without a date. Arrival projection
//! wraps hours modulo 24; day rollover is not tracked.

use std::fmt;
use std::str::FromStr;

/// A time of day with minute resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    pub const MIDNIGHT: ClockTime = ClockTime { hour: 0, minute: 0 };

    pub fn new(hour: u8, minute: u8) -> Result<Self, String> {
        if hour > 23 {
            return Err(format!("Invalid hour: {} (must be 0-23)", hour));
        }
        if minute > 59 {
            return Err(format!("Invalid minute: {} (must be 0-59)", minute));
        }
        Ok(ClockTime { hour, minute })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Projects the arrival after `duration_seconds`.
    ///
    /// The duration is rounded up to whole minutes, minutes overflow into
    /// hours and hours wrap modulo 24. Negative or non-finite durations
    /// count as zero.
    pub fn arrival_after(&self, duration_seconds: f64) -> ClockTime {
        const MINUTES_PER_DAY: f64 = 1440.0;

        let seconds = if duration_seconds.is_finite() {
            duration_seconds.max(0.0)
        } else {
            0.0
        };
        // Whole days drop out of a wall-clock arrival
        let duration_minutes = ((seconds / 60.0).ceil() % MINUTES_PER_DAY) as u64;

        let total_minutes = self.minute as u64 + duration_minutes;
        let added_hours = total_minutes / 60;
        let minute = (total_minutes % 60) as u8;
        let hour = ((self.hour as u64 + added_hours) % 24) as u8;

        ClockTime { hour, minute }
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for ClockTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (h, m) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| format!("Expected HH:MM, got '{}'", s))?;
        let hour: u8 = h
            .parse()
            .map_err(|_| format!("Invalid hour in '{}'", s))?;
        let minute: u8 = m
            .parse()
            .map_err(|_| format!("Invalid minute in '{}'", s))?;
        ClockTime::new(hour, minute)
    }
}

/// Source of the current wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> ClockTime;
}

/// Local wall clock, falling back to UTC when the local offset is unknown.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> ClockTime {
        let now = time::OffsetDateTime::now_local().unwrap_or_else(|_| {
            tracing::debug!("Local UTC offset unavailable, using UTC");
            time::OffsetDateTime::now_utc()
        });
        ClockTime {
            hour: now.hour(),
            minute: now.minute(),
        }
    }
}

/// Clock pinned to one time, for tests and replays.
pub struct FixedClock(pub ClockTime);

impl Clock for FixedClock {
    fn now(&self) -> ClockTime {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeMode {
    /// Depart now
    #[default]
    Auto,
    /// Depart at the user-entered time
    Manual,
}

impl FromStr for TimeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" | "now" => Ok(TimeMode::Auto),
            "manual" => Ok(TimeMode::Manual),
            _ => Err(format!("Invalid time mode: '{}'", s)),
        }
    }
}

pub struct TimeResolver {
    clock: Box<dyn Clock>,
    mode: TimeMode,
    manual_input: String,
    default_departure: ClockTime,
}

impl TimeResolver {
    pub fn new(clock: Box<dyn Clock>, default_departure: ClockTime) -> Self {
        TimeResolver {
            clock,
            mode: TimeMode::Auto,
            manual_input: String::new(),
            default_departure,
        }
    }

    pub fn mode(&self) -> TimeMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: TimeMode) {
        self.mode = mode;
    }

    pub fn set_manual_input(&mut self, input: impl Into<String>) {
        self.manual_input = input.into();
    }

    /// Effective departure for the next query.
    pub fn departure(&self) -> ClockTime {
        match self.mode {
            TimeMode::Auto => self.clock.now(),
            TimeMode::Manual => {
                let input = self.manual_input.trim();
                if input.is_empty() {
                    return self.default_departure;
                }
                input.parse().unwrap_or_else(|e| {
                    tracing::warn!(
                        "Unparseable manual departure '{}' ({}), using {}",
                        input,
                        e,
                        self.default_departure
                    );
                    self.default_departure
                })
            }
        }
    }

    pub fn reset(&mut self) {
        self.mode = TimeMode::Auto;
        self.manual_input.clear();
    }
}
