//! Holds the binding shapes of the operations that do not cross language boundaries as they are.
//!
//! `Result` and borrowed buffers do not translate to C, JS or Python, so here `encode` and
//! `format` report failure as an absent value (or `false`/`0` for C) instead. Everything else is
//! exported from its own module.

#[cfg(feature = "c")]
use core::ffi::{CStr, c_char};

#[cfg(feature = "py")]
use pyo3::prelude::*;

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

use crate::{CalendarTime, EpochSeconds};

#[cfg(feature = "c")]
use crate::text::{self, TextBuffer};

/// Seconds since the epoch or nothing if any field is out of range.
#[cfg_attr(feature = "wasm", wasm_bindgen(js_name = encode))]
#[cfg_attr(feature = "py", pyfunction(name = "encode"))]
pub fn encode_checked(time: &CalendarTime) -> Option<EpochSeconds> {
    time.encode().ok()
}

/// The text of an instant or nothing if it does not fit.
#[cfg(feature = "std")]
#[cfg_attr(feature = "wasm", wasm_bindgen(js_name = format))]
#[cfg_attr(feature = "py", pyfunction(name = "format"))]
pub fn format_string(seconds: EpochSeconds) -> Option<String> {
    let mut buf = crate::TextBuffer::new();
    crate::format(seconds, &mut buf).ok().map(String::from)
}

/// Write the seconds of `*time` to `*out` and return true, or return false leaving `*out` alone.
///
/// # Safety
/// `time` must point to a readable [`CalendarTime`] and `out` to a writable [`EpochSeconds`].
#[cfg(feature = "c")]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rtcal_encode(time: *const CalendarTime, out: *mut EpochSeconds) -> bool {
    let Some(time) = (unsafe { time.as_ref() }) else {
        return false;
    };
    if out.is_null() {
        return false;
    }
    match time.encode() {
        Ok(seconds) => {
            unsafe { out.write(seconds) };
            true
        }
        Err(_) => false,
    }
}

/// Calendar fields of an instant.
#[cfg(feature = "c")]
#[unsafe(no_mangle)]
pub extern "C" fn rtcal_decode(seconds: EpochSeconds) -> CalendarTime {
    CalendarTime::decode(seconds)
}

/// Write the NUL terminated text of an instant to `out` and return its length without the
/// terminator, or return 0 when it (or `capacity`) is too short.
///
/// # Safety
/// `out` must be writable for `capacity` bytes.
#[cfg(feature = "c")]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rtcal_format(seconds: EpochSeconds, out: *mut u8, capacity: usize) -> usize {
    let mut buf = TextBuffer::new();
    let len = match text::format(seconds, &mut buf) {
        Ok(text) => text.len(),
        Err(_) => return 0,
    };
    let bytes = buf.as_bytes_with_nul();
    if out.is_null() || capacity < bytes.len() {
        return 0;
    }
    unsafe { core::ptr::copy_nonoverlapping(bytes.as_ptr(), out, bytes.len()) };
    len
}

/// Read calendar fields from NUL terminated text (see [`crate::parse`]).
///
/// Text that is not UTF-8 reads as far as it is.
///
/// # Safety
/// `ptr` must be null or point to a NUL terminated string.
#[cfg(feature = "c")]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rtcal_parse(ptr: *const c_char) -> CalendarTime {
    if ptr.is_null() {
        return text::parse("");
    }
    let bytes = unsafe { CStr::from_ptr(ptr) }.to_bytes();
    let valid = match core::str::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => core::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or_default(),
    };
    text::parse(valid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_checked() {
        assert_eq!(
            encode_checked(&CalendarTime::new(2024, 2, 10, 12, 30, 30)),
            Some(1_710_073_830)
        );
        assert_eq!(encode_checked(&CalendarTime::new(2024, 12, 10, 12, 30, 30)), None);
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_format_string() {
        assert_eq!(format_string(0).as_deref(), Some("1970:01:01:00:00:00"));
    }

    #[cfg(feature = "c")]
    #[test]
    fn test_c_round_trip() {
        let mut out = [0xffu8; 32];
        let len = unsafe { rtcal_format(1_710_073_830, out.as_mut_ptr(), out.len()) };
        assert_eq!(len, 19);
        assert_eq!(&out[..20], b"2024:03:10:12:30:30\0");

        let time = unsafe { rtcal_parse(out.as_ptr().cast()) };
        assert_eq!(time, rtcal_decode(1_710_073_830));

        let mut seconds = 0;
        assert!(unsafe { rtcal_encode(&time, &mut seconds) });
        assert_eq!(seconds, 1_710_073_830);

        let mut short = [0u8; 19];
        assert_eq!(unsafe { rtcal_format(0, short.as_mut_ptr(), short.len()) }, 0);
        assert!(!unsafe { rtcal_encode(core::ptr::null(), &mut seconds) });
    }
}
