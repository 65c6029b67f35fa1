//! Holds traits for the outside collaborators and their implementation for Rust usage.

use core::fmt::{self, Display};

use crate::{CalendarTime, EpochSeconds, FormatError, TextBuffer, text};

/// A source of the current instant, like a real-time clock counter.
///
/// When the source can hold instants outside [`EpochSeconds`] it saturates: anything before the
/// epoch is the epoch and anything too far ahead is [`EpochSeconds::MAX`].
pub trait EpochClock {
    /// Seconds since the epoch, saturating.
    fn saturating_epoch_seconds(&self) -> EpochSeconds;

    /// Calendar fields of [`Self::saturating_epoch_seconds`].
    fn calendar(&self) -> CalendarTime {
        CalendarTime::decode(self.saturating_epoch_seconds())
    }

    /// Text of [`Self::saturating_epoch_seconds`] into the given buffer.
    fn format_into<'b>(&self, buf: &'b mut TextBuffer) -> Result<&'b str, FormatError> {
        text::format(self.saturating_epoch_seconds(), buf)
    }
}

impl EpochClock for EpochSeconds {
    fn saturating_epoch_seconds(&self) -> EpochSeconds {
        *self
    }
}

/// Time elapsed since the epoch.
impl EpochClock for core::time::Duration {
    fn saturating_epoch_seconds(&self) -> EpochSeconds {
        self.as_secs().min(EpochSeconds::MAX as u64) as EpochSeconds
    }
}

#[cfg(any(test, feature = "std"))]
impl EpochClock for std::time::SystemTime {
    fn saturating_epoch_seconds(&self) -> EpochSeconds {
        match self.duration_since(std::time::UNIX_EPOCH) {
            Ok(d) => d.saturating_epoch_seconds(),
            Err(_) => 0,
        }
    }
}

/// A byte oriented transmitter, like a UART data register.
pub trait ByteSink {
    type Error;

    /// Send one byte, returning once the sink can take another.
    fn send(&mut self, byte: u8) -> Result<(), Self::Error>;
}

/// Why [`transmit`] stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransmitError<E> {
    /// Nothing was sent, the text did not fit.
    Format(FormatError),
    /// The sink failed, some bytes may be sent already.
    Sink(E),
}

impl<E: Display> Display for TransmitError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Format(e) => Display::fmt(e, f),
            Self::Sink(e) => write!(f, "sink failed: {}", e),
        }
    }
}

impl<E: fmt::Debug + Display> core::error::Error for TransmitError<E> {}

impl<E> From<FormatError> for TransmitError<E> {
    fn from(value: FormatError) -> Self {
        Self::Format(value)
    }
}

/// Format an instant and send its text byte by byte, without the terminator.
///
/// The text lives on the stack for the duration of the call, so this is safe to call from an
/// interrupt handler that preempts another formatting.
pub fn transmit<S: ByteSink>(
    seconds: EpochSeconds,
    sink: &mut S,
) -> Result<usize, TransmitError<S::Error>> {
    let mut buf = TextBuffer::new();
    let text = text::format(seconds, &mut buf)?;
    for &byte in text.as_bytes() {
        sink.send(byte).map_err(TransmitError::Sink)?;
    }
    trace!("sent {} bytes", text.len());
    Ok(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    use core::time::Duration;

    /// Collects what is sent, failing once full.
    struct Wire {
        sent: std::vec::Vec<u8>,
        room: usize,
    }

    impl ByteSink for Wire {
        type Error = &'static str;

        fn send(&mut self, byte: u8) -> Result<(), Self::Error> {
            if self.sent.len() == self.room {
                return Err("line busy");
            }
            self.sent.push(byte);
            Ok(())
        }
    }

    #[test]
    fn test_duration_clock() {
        assert_eq!(Duration::from_secs(59).saturating_epoch_seconds(), 59);
        assert_eq!(Duration::from_millis(1_999).saturating_epoch_seconds(), 1);
        assert_eq!(
            Duration::from_secs(u64::MAX).saturating_epoch_seconds(),
            EpochSeconds::MAX
        );
        assert_eq!(
            Duration::from_secs(1_710_073_830).calendar(),
            CalendarTime::new(2024, 2, 10, 12, 30, 30)
        );
    }

    #[test]
    fn test_seconds_clock_format() {
        let mut buf = TextBuffer::new();
        assert_eq!(
            1_710_073_830u32.format_into(&mut buf),
            Ok("2024:03:10:12:30:30")
        );
    }

    #[test]
    fn test_system_time_clock() {
        use std::time::{SystemTime, UNIX_EPOCH};

        assert_eq!(UNIX_EPOCH.saturating_epoch_seconds(), 0);
        assert_eq!(
            (UNIX_EPOCH - Duration::from_secs(10)).saturating_epoch_seconds(),
            0
        );
        assert_eq!(
            (UNIX_EPOCH + Duration::from_secs(86_400)).saturating_epoch_seconds(),
            86_400
        );
        assert!(SystemTime::now().calendar().is_valid());
    }

    #[test]
    fn test_transmit() {
        let mut wire = Wire {
            sent: std::vec::Vec::new(),
            room: 64,
        };
        assert_eq!(transmit(1_710_073_830, &mut wire), Ok(19));
        assert_eq!(wire.sent, b"2024:03:10:12:30:30");
    }

    #[test]
    fn test_transmit_sink_error() {
        let mut wire = Wire {
            sent: std::vec::Vec::new(),
            room: 4,
        };
        assert_eq!(
            transmit(0, &mut wire),
            Err(TransmitError::Sink("line busy"))
        );
        assert_eq!(wire.sent, b"1970");
    }
}
