//! Precondition reporting.
//!
//! Every drawing routine validates its arguments before touching the buffer. The checks only exist
//! when `debug_assertions` are enabled; release builds compile them out entirely, so callers are
//! responsible for passing valid arguments in production.
//!
//! A violated precondition is handed to the installed [AssertHandler]. The default handler panics
//! with a message describing the failed condition. A replacement handler may instead record the
//! violation and return, in which case the violating routine returns without modifying the image.
//!
//! Handlers are `'static` references to an [AssertReporter]. Plain functions and closures are
//! reporters; a struct implementing the trait carries its own state, which takes the place of a
//! separate user-data pointer.
//!
//! ```
//! use packed_bitmap::assertion::{self, Violation};
//!
//! fn ignore(_violation: &Violation) {}
//! static IGNORE: fn(&Violation) = ignore;
//!
//! let previous = assertion::hook_assert(&IGNORE);
//! // ... draw with out-of-range arguments without panicking ...
//! assertion::hook_assert(previous);
//! ```
use core::cell::Cell;

use critical_section::Mutex;
use thiserror::Error;

use crate::log::warn_log;

/// Smallest coordinate accepted by the drawing routines.
pub const COORD_MIN: i32 = -(1 << 11);
/// Largest coordinate accepted by the drawing routines.
pub const COORD_MAX: i32 = (1 << 11) - 1;
/// Largest circle radius.
pub const RADIUS_MAX: i32 = (1 << 13) - 1;
/// Largest ellipse radius along either axis.
pub const ELLIPSE_RADIUS_MAX: i32 = (1 << 10) - 1;

/// A violated precondition, with the source location that detected it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("Assertion failed: {message}\n- cond: {condition}\n- file: {file}, line: {line}\n- func: {module}")]
pub struct Violation {
    /// Human readable description, e.g. `ERROR: x < -2^11`.
    pub message: &'static str,
    /// The source text of the condition that failed.
    pub condition: &'static str,
    pub file: &'static str,
    /// Module path of the routine that detected the violation.
    pub module: &'static str,
    pub line: u32,
}

impl Violation {
    pub const fn new(
        message: &'static str,
        condition: &'static str,
        file: &'static str,
        module: &'static str,
        line: u32,
    ) -> Self {
        Self {
            message,
            condition,
            file,
            module,
            line,
        }
    }
}

/// Receives every violated precondition.
///
/// A reporter that returns lets the violating routine bail out without drawing. Reporters are
/// shared through a global, so any state they keep needs interior mutability.
pub trait AssertReporter: Sync {
    fn report(&self, violation: &Violation);
}

impl<F: Fn(&Violation) + Sync> AssertReporter for F {
    fn report(&self, violation: &Violation) {
        self(violation)
    }
}

/// The installed reporter together with whatever data it owns.
pub type AssertHandler = &'static dyn AssertReporter;

static DEFAULT_HANDLER: fn(&Violation) = default_handler;

static HANDLER: Mutex<Cell<AssertHandler>> =
    Mutex::new(Cell::new(&DEFAULT_HANDLER as AssertHandler));

/// The handler installed at start-up: panics with the formatted violation.
pub fn default_handler(violation: &Violation) {
    #[cfg(feature = "defmt")]
    defmt::panic!(
        "Assertion failed: {}\n- cond: {}\n- file: {}, line: {}\n- func: {}",
        violation.message,
        violation.condition,
        violation.file,
        violation.line,
        violation.module
    );
    #[cfg(not(feature = "defmt"))]
    panic!("{}", violation);
}

/// Installs `handler` and returns the previously installed one, so it can be restored later.
pub fn hook_assert(handler: AssertHandler) -> AssertHandler {
    critical_section::with(|cs| HANDLER.borrow(cs).replace(handler))
}

/// Returns the handler that is currently installed.
pub fn current_handler() -> AssertHandler {
    critical_section::with(|cs| HANDLER.borrow(cs).get())
}

/// Installs a handler for the lifetime of the returned guard.
///
/// The previous handler is restored when the guard is dropped.
#[must_use = "the handler is uninstalled as soon as the guard is dropped"]
pub fn scoped_hook(handler: AssertHandler) -> HookGuard {
    HookGuard {
        previous: hook_assert(handler),
    }
}

/// Restores the previously installed [AssertHandler] on drop. See [scoped_hook].
pub struct HookGuard {
    previous: AssertHandler,
}

impl Drop for HookGuard {
    fn drop(&mut self) {
        hook_assert(self.previous);
    }
}

/// Passes `violation` to the installed handler.
///
/// The handler is called outside of the critical section, so it may itself install handlers.
pub fn report(violation: &Violation) {
    current_handler().report(violation);
    warn_log!("precondition violated: {}", violation.message);
}

/// Reports a [Violation] and returns from the enclosing function when `$cond` is false.
///
/// The optional third argument is the value returned. Compiled out without `debug_assertions`.
macro_rules! check {
    ($cond:expr, $message:expr $(, $ret:expr)?) => {
        #[cfg(debug_assertions)]
        if !($cond) {
            $crate::assertion::report(&$crate::assertion::Violation::new(
                $message,
                stringify!($cond),
                file!(),
                module_path!(),
                line!(),
            ));
            return $($ret)?;
        }
    };
}

/// Checks that a coordinate argument lies in `COORD_MIN..=COORD_MAX`, naming it in the message.
macro_rules! check_coord {
    ($($coord:ident),+) => {
        $crate::assertion::check_coord!($($coord),+; ())
    };
    ($($coord:ident),+; $ret:expr) => {
        $(
            $crate::assertion::check!(
                $coord >= crate::assertion::COORD_MIN,
                concat!("ERROR: ", stringify!($coord), " < -2^11"),
                $ret
            );
            $crate::assertion::check!(
                $coord <= crate::assertion::COORD_MAX,
                concat!("ERROR: ", stringify!($coord), " > 2^11 - 1"),
                $ret
            );
        )+
    };
}

/// Checks that a color fits in the pixel depth of layout `$layout`.
macro_rules! check_color {
    ($layout:ty, $color:expr) => {
        $crate::assertion::check!(
            $color <= <$layout as $crate::layout::PixelLayout>::MAX_COLOR,
            "ERROR: color > 2^bpp - 1"
        );
    };
}

pub(crate) use {check, check_color, check_coord};
