//! Temperature → fan duty mapping with hysteresis bands.
//!
//! Thresholds are in the raw units reported by the RF transceivers'
//! temperature channels (milli-degrees Celsius), matching the AXI fan
//! controller documentation.  Adjacent bands are separated by gaps; a
//! reading inside a gap keeps the previous duty, so a temperature hovering
//! around a boundary does not make the fan oscillate.
//!
//! ```text
//!  t:  ..5000 | gap | 20000..40000 | gap | 60000..70000 | gap | 80000..90000 | gap | 95000..
//! pwm:    0%  |  =  |     25%      |  =  |     50%      |  =  |     75%      |  =  |  100%
//! ```

use core::fmt;

pub const THRESH_OFF: i64 = 5_000;
pub const THRESH_QUARTER_LOW: i64 = 20_000;
pub const THRESH_QUARTER_HIGH: i64 = 40_000;
pub const THRESH_HALF_LOW: i64 = 60_000;
pub const THRESH_HALF_HIGH: i64 = 70_000;
pub const THRESH_THREE_QUARTER_LOW: i64 = 80_000;
pub const THRESH_THREE_QUARTER_HIGH: i64 = 90_000;
pub const THRESH_FULL: i64 = 95_000;

/// Raw `pwm1` value (0–255) as read from or written to the hwmon chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Pwm(pub u8);

impl Pwm {
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// The named level this value encodes, if any.
    pub const fn level(self) -> Option<DutyLevel> {
        DutyLevel::from_raw(self.0)
    }
}

impl fmt::Display for Pwm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level() {
            Some(level) => write!(f, "{} ({}%)", self.0, level.percent()),
            None => write!(f, "{}", self.0),
        }
    }
}

/// The fixed set of duty levels the daemon ever commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DutyLevel {
    Off = 0,
    Quarter = 64,
    Half = 128,
    ThreeQuarter = 191,
    Full = 255,
}

impl DutyLevel {
    pub const ALL: [Self; 5] = [
        Self::Off,
        Self::Quarter,
        Self::Half,
        Self::ThreeQuarter,
        Self::Full,
    ];

    /// Raw `pwm1` encoding.
    pub const fn raw(self) -> u8 {
        self as u8
    }

    pub const fn percent(self) -> u8 {
        match self {
            Self::Off => 0,
            Self::Quarter => 25,
            Self::Half => 50,
            Self::ThreeQuarter => 75,
            Self::Full => 100,
        }
    }

    pub const fn pwm(self) -> Pwm {
        Pwm(self.raw())
    }

    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Off),
            64 => Some(Self::Quarter),
            128 => Some(Self::Half),
            191 => Some(Self::ThreeQuarter),
            255 => Some(Self::Full),
            _ => None,
        }
    }
}

impl From<DutyLevel> for Pwm {
    fn from(level: DutyLevel) -> Self {
        level.pwm()
    }
}

/// The band `t` falls in, or `None` inside a hysteresis gap.
pub const fn band(t: i64) -> Option<DutyLevel> {
    if t <= THRESH_OFF {
        Some(DutyLevel::Off)
    } else if t >= THRESH_QUARTER_LOW && t <= THRESH_QUARTER_HIGH {
        Some(DutyLevel::Quarter)
    } else if t >= THRESH_HALF_LOW && t <= THRESH_HALF_HIGH {
        Some(DutyLevel::Half)
    } else if t >= THRESH_THREE_QUARTER_LOW && t <= THRESH_THREE_QUARTER_HIGH {
        Some(DutyLevel::ThreeQuarter)
    } else if t >= THRESH_FULL {
        Some(DutyLevel::Full)
    } else {
        None
    }
}

/// Duty to command for temperature `t` given the duty currently applied.
pub const fn map_temperature(t: i64, previous: Pwm) -> Pwm {
    match band(t) {
        Some(level) => level.pwm(),
        None => previous,
    }
}
