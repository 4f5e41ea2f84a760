// Copyright 2025 The Pagetrie Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Page Table Error Codes
//!
//! The trie itself never fails: every walk is a bounded sequence of reads
//! and writes over frames it already owns. The only runtime failure comes
//! from the frame allocator running dry, which is passed straight through
//! to the caller. The remaining codes are produced by the checked
//! constructors in [`crate::layout`].

use core::fmt;

/// Page table errors
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VmError {
    /// The frame allocator has no frame left
    NoMemory = 2,

    /// Virtual address is not canonical (bits 63..57 do not extend bit 56)
    InvalidAddress = 3,

    /// Value does not fit in its bit field
    OutOfRange = 13,
}

impl VmError {
    /// Convert to raw status code
    pub const fn as_raw(self) -> i32 {
        self as i32
    }

    /// Short human readable description
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoMemory => "out of physical frames",
            Self::InvalidAddress => "non-canonical virtual address",
            Self::OutOfRange => "value out of range for its bit field",
        }
    }
}

impl fmt::Display for VmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result type for page table operations
pub type Result<T = ()> = core::result::Result<T, VmError>;
