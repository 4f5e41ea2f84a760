// Copyright 2025 The Pagetrie Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Page Table Entries
//!
//! Every slot of every trie node is a single 64-bit word:
//!
//! ```text
//!  63                                        12 11        1   0
//! +--------------------------------------------+-----------+---+
//! |              frame number (52)             | reserved  | V |
//! +--------------------------------------------+-----------+---+
//! ```
//!
//! For levels 1-4 the frame number names the next node; at level 5 it is
//! the PPN of the mapped page. Entries are only ever built through
//! [`PageTableEntry::new`] and [`PageTableEntry::invalid`], so the reserved
//! bits are zero by construction.

use bitflags::bitflags;

use crate::layout::{PhysFrameNumber, ENTRIES_PER_TABLE, PAGE_SIZE_SHIFT};

bitflags! {
    /// Page table entry flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PteFlags: u64 {
        /// Entry is present
        const VALID = 1 << 0;
    }
}

/// Bits 1..11, which must always be zero
pub const PTE_RESERVED_MASK: u64 = ((1 << PAGE_SIZE_SHIFT) - 1) & !PteFlags::VALID.bits();

/// A single trie node: one frame holding 512 entries
pub type PageTableNode = [PageTableEntry; ENTRIES_PER_TABLE];

/// An all-invalid node, the content of every freshly allocated frame
pub const EMPTY_NODE: PageTableNode = [PageTableEntry::invalid(); ENTRIES_PER_TABLE];

/// Page table entry
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageTableEntry(u64);

impl PageTableEntry {
    /// Create an invalid entry with a zero frame field
    pub const fn invalid() -> Self {
        Self(0)
    }

    /// Create a valid entry pointing at `frame`
    pub const fn new(frame: PhysFrameNumber) -> Self {
        Self((frame.as_u64() << PAGE_SIZE_SHIFT) | PteFlags::VALID.bits())
    }

    /// Wrap raw bits as read from memory
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Raw bits
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Check if this entry is present
    pub const fn is_valid(self) -> bool {
        self.0 & PteFlags::VALID.bits() != 0
    }

    /// Flag bits of this entry
    pub fn flags(self) -> PteFlags {
        PteFlags::from_bits_truncate(self.0)
    }

    /// Frame field. Meaningless when the entry is invalid.
    pub const fn frame(self) -> PhysFrameNumber {
        PhysFrameNumber::new_truncate(self.0 >> PAGE_SIZE_SHIFT)
    }

    /// Reserved bits (always zero for entries this crate writes)
    pub const fn reserved_bits(self) -> u64 {
        self.0 & PTE_RESERVED_MASK
    }
}
