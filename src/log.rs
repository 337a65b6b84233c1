#![allow(unused, reason = "logger")]

// Format strings passed here must stay within the common subset of `log` and
// `defmt`: plain `{}` placeholders over integers and `&str`.

macro_rules! debug {
    ($($tt:tt)*) => {
        #[cfg(feature = "log")]
        ::log::debug!($($tt)*);
        #[cfg(feature = "defmt")]
        ::defmt::debug!($($tt)*);
    };
}

macro_rules! warning {
    ($($tt:tt)*) => {
        #[cfg(feature = "log")]
        ::log::warn!($($tt)*);
        #[cfg(feature = "defmt")]
        ::defmt::warn!($($tt)*);
    };
}

pub(crate) use {debug, warning};
