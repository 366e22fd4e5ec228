// Every level forwards to whichever backends are enabled and expands to nothing otherwise.
macro_rules! log_at {
    ($level:ident, $($arg:tt)*) => {
        #[cfg(feature = "defmt")]
        defmt::$level!($($arg)*);

        #[cfg(feature = "log")]
        log::$level!($($arg)*);
    };
}

macro_rules! trace {
    ($($arg:tt)*) => {
        $crate::log::log_at!(trace, $($arg)*)
    };
}

macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::log::log_at!(debug, $($arg)*)
    };
}

macro_rules! warn_log {
    ($($arg:tt)*) => {
        $crate::log::log_at!(warn, $($arg)*)
    };
}

pub(crate) use {debug, log_at, trace, warn_log};
