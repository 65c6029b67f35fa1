#![doc = include_str!("../README.md")]
#![cfg_attr(not(any(test, feature = "std")), no_main, no_std)]
#![cfg_attr(feature = "py", allow(unsafe_op_in_unsafe_fn))] // pyo3 generated wrappers

#[macro_use]
#[path = "macro.rs"]
mod macros;

pub mod epoch;
#[cfg(feature = "ffi")]
pub mod ffi;
pub mod text;
pub mod traits;

pub use epoch::{CalendarTime, EncodeError, Field, decode, encode, is_leap_boundary};
pub use text::{FormatError, ParseError, TEXT_CAPACITY, TextBuffer, format, parse, try_parse};
pub use traits::{ByteSink, EpochClock, TransmitError, transmit};

#[cfg(any(feature = "c", not(feature = "wasm")))]
use rtcal_proc::fn_attr;

#[cfg(feature = "py")]
use pyo3::prelude::*;

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "py")]
#[pymodule]
fn rtcal(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(is_leap_year, m)?)?;
    m.add_function(wrap_pyfunction!(days_in_year, m)?)?;
    m.add_function(wrap_pyfunction!(epoch::decode, m)?)?;
    m.add_function(wrap_pyfunction!(text::parse, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::encode_checked, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::format_string, m)?)?;
    m.add_class::<CalendarTime>()?;
    Ok(())
}

#[cfg(all(not(test), not(feature = "std")))] // std brings its own
#[panic_handler]
fn panic_handler(_: &core::panic::PanicInfo) -> ! {
    loop {}
}

/// Counter for absolute years (2024 is 2024).
pub type Year = u32;

/// Index of a month in a year, January is 0.
pub type Month = u8;

/// Day of a month, starting from 1.
pub type Dom = u8;

/// Counter for consecutive days.
pub type Days = u32;

/// Hour of a day.
pub type Hour = u8;

/// Minute of an hour.
pub type Minute = u8;

/// Second of a minute (60 is accepted as a leap second on input).
pub type Second = u8;

/// Seconds elapsed since 1970-01-01T00:00:00.
pub type EpochSeconds = u32;

/// The year of the epoch, seconds are counted from its first instant.
pub const EPOCH_YEAR: Year = 1970;

/// The last year [`EpochSeconds`] can reach (it runs out on 2106-02-07T06:28:15).
pub const MAX_YEAR: Year = 2106;

/// Number of months in a year.
pub const MONTHS_PER_YEAR: usize = 12;

/// Number of days in a leap year.
pub const LEAP_YEAR_DAYS: u16 = 366;

/// Number of days in a non-leap year.
pub const NON_LEAP_YEAR_DAYS: u16 = 365;

pub const HOURS_PER_DAY: u32 = 24;
pub const MINUTES_PER_HOUR: u32 = 60;
pub const SECONDS_PER_MINUTE: u32 = 60;
pub const SECONDS_PER_HOUR: u32 = SECONDS_PER_MINUTE * MINUTES_PER_HOUR;
pub const SECONDS_PER_DAY: u32 = SECONDS_PER_HOUR * HOURS_PER_DAY;

/// Days of each month in a non-leap year.
///
/// The leap day is never part of this table, whoever walks it adds the 29th of February.
pub const DAYS_IN_MONTH: [u8; MONTHS_PER_YEAR] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// How many days of a non-leap year pass before each month starts (sums of [`DAYS_IN_MONTH`]).
pub const MONTH_START: [u16; MONTHS_PER_YEAR] =
    [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

/// Proleptic Gregorian rule: every 4th year is leap, except centuries not divisible by 400.
#[cfg_attr(feature = "wasm", wasm_bindgen)]
#[cfg_attr(feature = "c", unsafe(no_mangle), fn_attr(extern "C"))]
#[cfg_attr(feature = "py", pyfunction)]
#[cfg_attr(not(feature = "wasm"), fn_attr(const))]
pub fn is_leap_year(year: Year) -> bool {
    if year % 400 == 0 {
        true
    } else if year % 100 == 0 {
        false
    } else {
        year % 4 == 0
    }
}

/// The number of days in a given year.
#[cfg_attr(feature = "wasm", wasm_bindgen)]
#[cfg_attr(feature = "c", unsafe(no_mangle), fn_attr(extern "C"))]
#[cfg_attr(feature = "py", pyfunction)]
#[cfg_attr(not(feature = "wasm"), fn_attr(const))]
pub fn days_in_year(year: Year) -> u16 {
    if is_leap_year(year) {
        LEAP_YEAR_DAYS
    } else {
        NON_LEAP_YEAR_DAYS
    }
}

/// Days from the epoch to the first day of `year` (0 for [`EPOCH_YEAR`] and anything before it).
///
/// Same as adding [`days_in_year`] for every year from [`EPOCH_YEAR`] up to `year` but without the
/// loop. Saturates at [`Days::MAX`] for absurdly large years.
pub const fn days_before_year(year: Year) -> Days {
    /// Leap years in `1..=y`.
    const fn leaps_through(y: u64) -> u64 {
        y / 4 - y / 100 + y / 400
    }

    if year <= EPOCH_YEAR {
        return 0;
    }

    let days = (year - EPOCH_YEAR) as u64 * NON_LEAP_YEAR_DAYS as u64
        + leaps_through(year as u64 - 1)
        - leaps_through(EPOCH_YEAR as u64 - 1);

    if days > Days::MAX as u64 {
        Days::MAX
    } else {
        days as Days
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leap_years() {
        assert!(is_leap_year(2000));
        assert!(is_leap_year(2024));
        assert!(is_leap_year(1972));
        assert!(is_leap_year(2400));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
        assert!(!is_leap_year(2100));
        assert!(!is_leap_year(1970));
    }

    #[test]
    fn test_days_in_year_follows_leap() {
        for year in 1800..=2500 {
            assert_eq!(
                days_in_year(year) == 366,
                is_leap_year(year),
                "year {} has {} days",
                year,
                days_in_year(year)
            );
            assert!(matches!(days_in_year(year), 365 | 366));
        }
    }

    #[test]
    fn test_month_tables_agree() {
        let total: u16 = DAYS_IN_MONTH.iter().map(|&d| d as u16).sum();
        assert_eq!(total, NON_LEAP_YEAR_DAYS);

        let mut start = 0;
        for (month, &days) in DAYS_IN_MONTH.iter().enumerate() {
            assert_eq!(MONTH_START[month], start, "month index {}", month);
            start += days as u16;
        }
    }

    #[test]
    fn test_days_before_year_matches_walk() {
        let mut walked: Days = 0;
        for year in EPOCH_YEAR..=2500 {
            assert_eq!(days_before_year(year), walked, "year {}", year);
            walked += days_in_year(year) as Days;
        }
    }

    #[test]
    fn test_days_before_year_edges() {
        assert_eq!(days_before_year(0), 0);
        assert_eq!(days_before_year(1969), 0);
        assert_eq!(days_before_year(EPOCH_YEAR), 0);
        assert_eq!(days_before_year(1971), 365);
        assert_eq!(days_before_year(1973), 365 * 3 + 1);
        assert_eq!(days_before_year(2000), 10_957);
        assert_eq!(days_before_year(Year::MAX), Days::MAX);
    }

    // Since the library is `cdylib`, Rust doesn't test the snippets in the code, this is a manual
    // copy of the code mentioned in the readme.
    #[test]
    fn test_readme() {
        let time = parse("2024:03:10:12:30:30");
        assert_eq!(time, CalendarTime::new(2024, 2, 10, 12, 30, 30));

        let seconds = time.encode().unwrap();
        assert_eq!(seconds, 1_710_073_830);

        let mut buf = TextBuffer::new();
        assert_eq!(format(seconds, &mut buf), Ok("2024:03:10:12:30:30"));
    }
}
