#![deny(missing_docs)]
//! Shared logging utilities for the bookmarks workspace.
//!
//! This crate provides the `bm_*` logging macros used across the codebase,
//! a per-thread scope tag that the macros prefix to every message, and a
//! minimal test initializer for the global logger.

use std::cell::RefCell;

#[doc(hidden)]
pub use log as __log;

thread_local! {
    /// Thread-local scope tag, e.g. `user=8f1c`.
    static SCOPE: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Sets the scope tag for log lines emitted from the current thread.
/// The message loop sets this once the session resolves. Other threads,
/// including the engine thread and its runtime workers, log unscoped.
pub fn set_scope(scope: impl Into<String>) {
    let scope = scope.into();
    SCOPE.with(|v| *v.borrow_mut() = Some(scope));
}

/// Clears the scope tag for the current thread.
pub fn clear_scope() {
    SCOPE.with(|v| *v.borrow_mut() = None);
}

/// Returns the current scope tag formatted as a message prefix, or an empty
/// string when no scope is set.
#[doc(hidden)]
pub fn scope_prefix() -> String {
    SCOPE.with(|v| match v.borrow().as_deref() {
        Some(scope) => format!("[{scope}] "),
        None => String::new(),
    })
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! bm_trace {
    ($($arg:tt)*) => {{
        $crate::__log::trace!("{}{}", $crate::scope_prefix(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! bm_debug {
    ($($arg:tt)*) => {{
        $crate::__log::debug!("{}{}", $crate::scope_prefix(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! bm_info {
    ($($arg:tt)*) => {{
        $crate::__log::info!("{}{}", $crate::scope_prefix(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! bm_warn {
    ($($arg:tt)*) => {{
        $crate::__log::warn!("{}{}", $crate::scope_prefix(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! bm_error {
    ($($arg:tt)*) => {{
        $crate::__log::error!("{}{}", $crate::scope_prefix(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Another test may have installed the logger already.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
