//! Logging shims
//!
//! `defmt` on hardware, `tracing` on the host, nothing when neither feature
//! is enabled. Format strings stay within the subset both accept: `{}` and
//! `{:#x}`.

#![allow(unused_macros)]

macro_rules! log_at {
    ($level:ident, $s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::$level!($s $(, $x)*);
        #[cfg(all(feature = "tracing", not(feature = "defmt")))]
        ::tracing::$level!($s $(, $x)*);
        #[cfg(not(any(feature = "defmt", feature = "tracing")))]
        {
            let _ = ($( & $x, )*);
        }
    }};
}

macro_rules! trace {
    ($s:literal $(, $x:expr)* $(,)?) => {
        log_at!(trace, $s $(, $x)*)
    };
}

macro_rules! debug {
    ($s:literal $(, $x:expr)* $(,)?) => {
        log_at!(debug, $s $(, $x)*)
    };
}

macro_rules! info {
    ($s:literal $(, $x:expr)* $(,)?) => {
        log_at!(info, $s $(, $x)*)
    };
}

macro_rules! warn {
    ($s:literal $(, $x:expr)* $(,)?) => {
        log_at!(warn, $s $(, $x)*)
    };
}

macro_rules! error {
    ($s:literal $(, $x:expr)* $(,)?) => {
        log_at!(error, $s $(, $x)*)
    };
}
