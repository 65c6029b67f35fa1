//! Private macros specific to this crate.
//!
//! The logging macros forward to `defmt` when the `defmt` feature is on and otherwise only borrow
//! their arguments so call sites compile the same way in both configurations. They are not usable
//! in `const fn`.

/// Log at trace level, see the module documentation.
macro_rules! trace {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::trace!($fmt $(, $arg)*);
        #[cfg(not(feature = "defmt"))]
        let _ = ($(&$arg,)*);
    }};
}

/// Log at warn level, see the module documentation.
macro_rules! warn {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::warn!($fmt $(, $arg)*);
        #[cfg(not(feature = "defmt"))]
        let _ = ($(&$arg,)*);
    }};
}
