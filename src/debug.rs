// Copyright 2025 The Pagetrie Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Logging Support
//!
//! Thin macro layer over the [`log`] crate. With the `logging` feature
//! disabled every macro still type-checks its arguments but emits nothing,
//! so call sites never need their own `cfg` guards.
//!
//! # Usage
//!
//! ```rust,ignore
//! log_trace!("level {} index {:#x}: new table {:#x}", level, index, frame);
//! log_warn!("frame arena exhausted ({} frames)", capacity);
//! ```
//!
//! The library never installs a logger; that is up to the host.

/// Log a trace message
#[cfg(feature = "logging")]
macro_rules! log_trace {
    ($($arg:tt)*) => {
        ::log::trace!($($arg)*)
    };
}

/// Log a trace message
#[cfg(not(feature = "logging"))]
macro_rules! log_trace {
    ($($arg:tt)*) => {{
        let _ = format_args!($($arg)*);
    }};
}

/// Log a debug message
#[cfg(feature = "logging")]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        ::log::debug!($($arg)*)
    };
}

/// Log a debug message
#[cfg(not(feature = "logging"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        let _ = format_args!($($arg)*);
    }};
}

/// Log a warning message
#[cfg(feature = "logging")]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        ::log::warn!($($arg)*)
    };
}

/// Log a warning message
#[cfg(not(feature = "logging"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        let _ = format_args!($($arg)*);
    }};
}
