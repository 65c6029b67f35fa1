//! Conversion between calendar fields and seconds since the epoch.
//!
//! Decoding walks the non-leap [`DAYS_IN_MONTH`] table and then takes the leap day back out of
//! the remainder, but only when something remains. In a leap year, the days on which the walk ends
//! exactly at a month start (from March on) are therefore reported one day late: encoding
//! 2024-03-31 gives the right instant, yet decoding that instant gives the 1st of April.
//! [`is_leap_boundary`] tells these instants apart.

use core::fmt::{self, Display};

#[cfg(any(feature = "c", not(feature = "wasm")))]
use rtcal_proc::fn_attr;

#[cfg(feature = "py")]
use rtcal_proc::py_attr;

#[cfg(feature = "py")]
use pyo3::prelude::*;

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

use crate::{
    DAYS_IN_MONTH, Days, Dom, EPOCH_YEAR, EpochSeconds, Hour, MAX_YEAR, MINUTES_PER_HOUR,
    MONTH_START, MONTHS_PER_YEAR, Minute, Month, NON_LEAP_YEAR_DAYS, SECONDS_PER_DAY,
    SECONDS_PER_HOUR, SECONDS_PER_MINUTE, Second, Year, days_before_year, is_leap_year,
};

/// Names one field of a [`CalendarTime`] (for errors).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl Field {
    /// Every field in text order.
    pub const ALL: [Self; 6] = [
        Self::Year,
        Self::Month,
        Self::Day,
        Self::Hour,
        Self::Minute,
        Self::Second,
    ];
}

impl Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Second => "second",
        })
    }
}

/// Why a [`CalendarTime`] has no [`EpochSeconds`] equivalent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// The field is outside its range (years before [`EPOCH_YEAR`] included).
    OutOfRange(Field),
    /// The instant is past what [`EpochSeconds`] holds.
    Overflow,
}

impl Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange(field) => write!(f, "{} is out of range", field),
            Self::Overflow => f.write_str("instant does not fit in 32-bit epoch seconds"),
        }
    }
}

impl core::error::Error for EncodeError {}

/// Calendar fields of an instant, a transient form between seconds and text.
///
/// Nothing is checked on construction. Values made by [`CalendarTime::decode`] are always in
/// range; values made by hand or by [`crate::parse`] are checked only when encoded.
///
/// The derived ordering is chronological for valid values (fields are compared from year down).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "c", repr(C))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "wasm", wasm_bindgen)]
#[cfg_attr(feature = "py", pyclass(get_all, set_all))]
pub struct CalendarTime {
    /// Absolute year.
    pub year: Year,
    /// Month index, 0 to 11 (January is 0).
    pub month: Month,
    /// Day of month, 1 to 31.
    pub day: Dom,
    pub hour: Hour,
    pub minute: Minute,
    /// 0 to 60, 60 being a leap second.
    pub second: Second,
}

impl Default for CalendarTime {
    fn default() -> Self {
        Self::EPOCH
    }
}

impl CalendarTime {
    /// 1970-01-01T00:00:00.
    pub const EPOCH: Self = Self {
        year: EPOCH_YEAR,
        month: 0,
        day: 1,
        hour: 0,
        minute: 0,
        second: 0,
    };

    /// Check every field against its range without encoding.
    pub const fn validate(&self) -> Result<(), EncodeError> {
        let field = if self.year < EPOCH_YEAR {
            Field::Year
        } else if self.month as usize >= MONTHS_PER_YEAR {
            Field::Month
        } else if self.day < 1 || self.day > 31 {
            Field::Day
        } else if self.hour > 23 {
            Field::Hour
        } else if self.minute > 59 {
            Field::Minute
        } else if self.second > 60 {
            Field::Second
        } else if self.year > MAX_YEAR {
            return Err(EncodeError::Overflow);
        } else {
            return Ok(());
        };
        Err(EncodeError::OutOfRange(field))
    }

    /// Seconds since the epoch for these fields.
    ///
    /// A day past the end of a short month (like the 31st of April) simply runs into the next
    /// month, as does a leap second into the next minute.
    pub fn encode(&self) -> Result<EpochSeconds, EncodeError> {
        if let Err(e) = self.validate() {
            warn!("rejected calendar fields: {}", e);
            return Err(e);
        }

        let mut days = days_before_year(self.year)
            + MONTH_START[self.month as usize] as Days
            + (self.day - 1) as Days;
        if is_leap_year(self.year) && self.month > 1 {
            days += 1;
        }

        let seconds = days as u64 * SECONDS_PER_DAY as u64
            + self.hour as u64 * SECONDS_PER_HOUR as u64
            + self.minute as u64 * SECONDS_PER_MINUTE as u64
            + self.second as u64;

        EpochSeconds::try_from(seconds).map_err(|_| {
            warn!("{}-{}-{} is past the 32-bit epoch", self.year, self.month, self.day);
            EncodeError::Overflow
        })
    }
}

#[cfg_attr(feature = "wasm", wasm_bindgen)]
#[cfg_attr(feature = "py", py_attr(pymethods, new))]
impl CalendarTime {
    /// Bundle the fields as given, `month` is 0-based.
    #[cfg_attr(feature = "wasm", wasm_bindgen(constructor))]
    #[cfg_attr(not(feature = "wasm"), fn_attr(const))]
    pub fn new(
        year: Year,
        month: Month,
        day: Dom,
        hour: Hour,
        minute: Minute,
        second: Second,
    ) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }
}

#[cfg_attr(feature = "wasm", wasm_bindgen)]
#[cfg_attr(feature = "py", py_attr(pymethods, staticmethod))]
impl CalendarTime {
    /// Calendar fields of the given instant, see the module documentation for leap years.
    #[cfg_attr(feature = "wasm", wasm_bindgen(js_name = fromEpoch))]
    #[cfg_attr(not(feature = "wasm"), fn_attr(const))]
    pub fn decode(seconds: EpochSeconds) -> Self {
        let second = (seconds % SECONDS_PER_MINUTE) as Second;
        let minutes = seconds / SECONDS_PER_MINUTE;
        let minute = (minutes % MINUTES_PER_HOUR) as Minute;
        let hour = (seconds / SECONDS_PER_HOUR % 24) as Hour;

        let (year, mut days) = split_days(seconds / SECONDS_PER_DAY);

        let mut month = 0;
        while month < MONTHS_PER_YEAR - 1 && days >= DAYS_IN_MONTH[month] as Days {
            days -= DAYS_IN_MONTH[month] as Days;
            month += 1;
        }

        // leap day, skipped on the very first day the walk lands on
        if is_leap_year(year) && month > 1 && days > 0 {
            days -= 1;
        }

        Self {
            year,
            month: month as Month,
            day: days as Dom + 1,
            hour,
            minute,
            second,
        }
    }
}

#[cfg_attr(feature = "wasm", wasm_bindgen)]
#[cfg_attr(feature = "py", pymethods)]
impl CalendarTime {
    /// Is the year of this value leap.
    #[cfg_attr(not(feature = "wasm"), fn_attr(const))]
    pub fn is_leap_year(&self) -> bool {
        is_leap_year(self.year)
    }

    /// The month counted from 1, as written in text.
    #[cfg_attr(not(feature = "wasm"), fn_attr(const))]
    pub fn month_number(&self) -> u8 {
        self.month.wrapping_add(1)
    }

    /// Whether [`Self::encode`] would accept this value.
    #[cfg_attr(not(feature = "wasm"), fn_attr(const))]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Split days since the epoch into the year and the days passed in it.
///
/// 365 days a year overshoots by the leap days, so the guess steps back at most once in range.
const fn split_days(days: Days) -> (Year, Days) {
    let mut year = EPOCH_YEAR + days / NON_LEAP_YEAR_DAYS as Days;
    while days_before_year(year) > days {
        year -= 1;
    }
    (year, days - days_before_year(year))
}

/// Seconds since the epoch for the given fields (see [`CalendarTime::encode`]).
pub fn encode(time: &CalendarTime) -> Result<EpochSeconds, EncodeError> {
    time.encode()
}

/// Calendar fields of an instant (see [`CalendarTime::decode`]).
#[cfg_attr(feature = "wasm", wasm_bindgen)]
#[cfg_attr(feature = "py", pyfunction)]
#[cfg_attr(not(feature = "wasm"), fn_attr(const))]
pub fn decode(seconds: EpochSeconds) -> CalendarTime {
    CalendarTime::decode(seconds)
}

/// Does [`decode`] skip the leap day correction on this instant.
///
/// True for every second of the days of a leap year that start a month in the non-leap table from
/// March on (day 59, 90, ..., 334 of the year counting from 0). On these days
/// `encode(decode(s))` is one day (86400 seconds) after `s`, everywhere else it is `s`.
#[cfg_attr(feature = "wasm", wasm_bindgen(js_name = isLeapBoundary))]
#[cfg_attr(feature = "c", unsafe(no_mangle), fn_attr(extern "C"))]
#[cfg_attr(not(feature = "wasm"), fn_attr(const))]
pub fn is_leap_boundary(seconds: EpochSeconds) -> bool {
    let (year, days) = split_days(seconds / SECONDS_PER_DAY);
    if !is_leap_year(year) {
        return false;
    }

    let mut month = 2;
    while month < MONTHS_PER_YEAR {
        if MONTH_START[month] as Days == days {
            return true;
        }
        month += 1;
    }
    false
}
