//! The `YYYY:MM:DD:HH:MM:SS` text form of an instant.
//!
//! The month is 1-based in text and 0-based in [`CalendarTime`], every other field is written as
//! is. Output goes to a caller-owned [`TextBuffer`] and the returned `&str` borrows it, so a text
//! stays valid exactly until the next format into the same buffer.

use core::{
    fmt::{self, Debug, Display, Write},
    str::FromStr,
};

#[cfg(feature = "py")]
use pyo3::prelude::*;

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

use crate::{CalendarTime, Dom, EpochSeconds, Field, Hour, Minute, Month, Second};

/// Bytes a formatted text may take, terminator included.
pub const TEXT_CAPACITY: usize = 20;

/// Length of a text with a 4 digit year.
pub const TEXT_LEN: usize = 19;

/// Why [`format`] gave no text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FormatError {
    /// The text and its terminator would not fit in [`TEXT_CAPACITY`] bytes (5+ digit years).
    Overflow,
}

impl Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overflow => write!(f, "text does not fit in {} bytes", TEXT_CAPACITY),
        }
    }
}

impl core::error::Error for FormatError {}

/// Why [`try_parse`] rejected a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// The text ended before this field.
    MissingField(Field),
    /// The field is not a run of ASCII digits fitting its type, or is a 0 month.
    InvalidField(Field),
    /// Something follows the seconds.
    TrailingInput,
}

impl Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "missing {}", field),
            Self::InvalidField(field) => write!(f, "invalid {}", field),
            Self::TrailingInput => f.write_str("unexpected text after seconds"),
        }
    }
}

impl core::error::Error for ParseError {}

/// Fixed storage for one formatted text and its NUL terminator.
///
/// Writing through [`fmt::Write`] fails once the text would take the last byte, which is kept for
/// the terminator.
#[derive(Clone, PartialEq, Eq)]
pub struct TextBuffer {
    bytes: [u8; TEXT_CAPACITY],
    len: usize,
}

impl TextBuffer {
    pub const fn new() -> Self {
        Self {
            bytes: [0; TEXT_CAPACITY],
            len: 0,
        }
    }

    /// The text written so far.
    pub fn as_str(&self) -> &str {
        // only whole `str`s are ever copied in
        core::str::from_utf8(self.as_bytes()).unwrap_or_default()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// The text followed by its terminator, what a C caller or a serial line expects.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.bytes[..=self.len]
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.len = 0;
        self.bytes[0] = 0;
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TextBuffer").field(&self.as_str()).finish()
    }
}

impl Write for TextBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let end = self.len + s.len();
        if end >= TEXT_CAPACITY {
            return Err(fmt::Error);
        }
        self.bytes[self.len..end].copy_from_slice(s.as_bytes());
        self.bytes[end] = 0;
        self.len = end;
        Ok(())
    }
}

impl Display for CalendarTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}:{:02}:{:02}:{:02}:{:02}:{:02}",
            self.year,
            self.month as u16 + 1,
            self.day,
            self.hour,
            self.minute,
            self.second
        )
    }
}

impl FromStr for CalendarTime {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        try_parse(s)
    }
}

/// Write the text of an instant into `buf`.
pub fn format(seconds: EpochSeconds, buf: &mut TextBuffer) -> Result<&str, FormatError> {
    format_calendar(&CalendarTime::decode(seconds), buf)
}

/// Write the text of `time` into `buf`, fields are not checked.
///
/// On failure `buf` is left empty, never holding part of a text.
pub fn format_calendar<'b>(
    time: &CalendarTime,
    buf: &'b mut TextBuffer,
) -> Result<&'b str, FormatError> {
    buf.clear();
    if write!(buf, "{}", time).is_err() {
        buf.clear();
        warn!("year {} does not fit the {} byte text", time.year, TEXT_CAPACITY);
        return Err(FormatError::Overflow);
    }
    Ok(buf.as_str())
}

/// Read six `:` separated integers the way `scanf("%d:%d:%d:%d:%d:%d")` does.
struct Scanner<'a> {
    rest: &'a [u8],
}

impl Scanner<'_> {
    /// Skip whitespace and an optional `+`, then read digits (saturating).
    fn number(&mut self) -> Option<u32> {
        let mut rest = self.rest.trim_ascii_start();
        if let [b'+', tail @ ..] = rest {
            rest = tail;
        }

        let digits = rest.iter().take_while(|b| b.is_ascii_digit()).count();
        if digits == 0 {
            return None;
        }

        let value = rest[..digits].iter().fold(0u32, |acc, b| {
            acc.saturating_mul(10).saturating_add((b - b'0') as u32)
        });
        self.rest = &rest[digits..];
        Some(value)
    }

    fn literal(&mut self, byte: u8) -> bool {
        match self.rest {
            [b, tail @ ..] if *b == byte => {
                self.rest = tail;
                true
            }
            _ => false,
        }
    }
}

/// Read calendar fields from text without reporting anything.
///
/// Reading stops at the first thing that is not a field where one is expected, fields after it
/// stay 0, and whatever follows the seconds is ignored. Fields too large for their type saturate.
/// The month has one taken off, wrapping, so a missing or 0 month comes out as 255. Nothing is
/// range checked: [`CalendarTime::encode`] does that, or use [`try_parse`] to be told about
/// malformed text.
#[cfg_attr(feature = "wasm", wasm_bindgen)]
#[cfg_attr(feature = "py", pyfunction)]
pub fn parse(text: &str) -> CalendarTime {
    let mut values = [0u32; 6];
    let mut scanner = Scanner {
        rest: text.as_bytes(),
    };

    let mut read = 0;
    for (i, slot) in values.iter_mut().enumerate() {
        if i > 0 && !scanner.literal(b':') {
            break;
        }
        match scanner.number() {
            Some(v) => *slot = v,
            None => break,
        }
        read += 1;
    }
    if read < values.len() {
        trace!("timestamp text ended after {} fields", read);
    }

    let narrow = |v: u32| v.min(u8::MAX as u32) as u8;
    CalendarTime {
        year: values[0],
        month: narrow(values[1]).wrapping_sub(1),
        day: narrow(values[2]),
        hour: narrow(values[3]),
        minute: narrow(values[4]),
        second: narrow(values[5]),
    }
}

/// Read calendar fields from text, rejecting anything but six `:` separated digit runs.
///
/// The year may take any number of digits that fits, the other fields must fit a byte and the
/// month must not be 0. Ranges are still only checked by [`CalendarTime::encode`].
pub fn try_parse(text: &str) -> Result<CalendarTime, ParseError> {
    let result = parse_strict(text);
    if let Err(e) = &result {
        warn!("rejected timestamp text: {}", e);
    }
    result
}

fn parse_strict(text: &str) -> Result<CalendarTime, ParseError> {
    let mut parts = text.split(':');
    let mut values = [0u32; 6];

    for (&field, slot) in Field::ALL.iter().zip(values.iter_mut()) {
        let part = parts.next().ok_or(ParseError::MissingField(field))?;
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::InvalidField(field));
        }

        let limit = match field {
            Field::Year => u32::MAX,
            _ => u8::MAX as u32,
        };
        *slot = part
            .parse::<u32>()
            .ok()
            .filter(|&v| v <= limit)
            .ok_or(ParseError::InvalidField(field))?;
    }

    if parts.next().is_some() {
        return Err(ParseError::TrailingInput);
    }
    if values[1] == 0 {
        return Err(ParseError::InvalidField(Field::Month));
    }

    Ok(CalendarTime {
        year: values[0],
        month: values[1] as Month - 1,
        day: values[2] as Dom,
        hour: values[3] as Hour,
        minute: values[4] as Minute,
        second: values[5] as Second,
    })
}
