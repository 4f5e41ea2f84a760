// Copyright 2025 The Pagetrie Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Address Layout
//!
//! Bit-level layout of the addresses and page numbers the trie works with.
//!
//! # Virtual Address
//!
//! ```text
//!  63        57 56                                  12 11        0
//! +------------+-------------------------------------+-----------+
//! |  sign ext  |          VPN (5 x 9 bits)           |  offset   |
//! +------------+-------------------------------------+-----------+
//! ```
//!
//! The VPN is split into five 9-bit indices, most significant first. Level 1
//! indexes the root node, level 5 indexes the leaf node.
//!
//! # Physical Address
//!
//! A physical address is `frame * PAGE_SIZE + offset`, where `frame` is a
//! 52-bit physical frame number. The packing is always done through
//! [`PhysAddr::from_frame`] and [`PhysAddr::frame`].

use crate::err::{Result, VmError};

/// Page size (4KB)
pub const PAGE_SIZE: usize = 4096;

/// Page size shift for quick division/multiplication
pub const PAGE_SIZE_SHIFT: u32 = 12;

/// Mask for the in-page offset
pub const PAGE_MASK: u64 = PAGE_SIZE as u64 - 1;

/// Number of entries per trie node
pub const ENTRIES_PER_TABLE: usize = 512;

/// Bits of VPN consumed per level
pub const LEVEL_BITS: u32 = 9;

/// Mask for a single level index (`0x1ff`)
pub const LEVEL_MASK: u64 = (1 << LEVEL_BITS) - 1;

/// Number of trie levels
pub const LEVELS: usize = 5;

/// Virtual page number width
pub const VPN_BITS: u32 = LEVEL_BITS * LEVELS as u32;

/// Mask for a 45-bit VPN
pub const VPN_MASK: u64 = (1 << VPN_BITS) - 1;

/// Physical frame number width
pub const PPN_BITS: u32 = 52;

/// Mask for a 52-bit frame number
pub const PPN_MASK: u64 = (1 << PPN_BITS) - 1;

/// Translated virtual address width (VPN + offset)
pub const VA_BITS: u32 = VPN_BITS + PAGE_SIZE_SHIFT;

/// Raw sentinel meaning "this VPN has no mapping".
///
/// Every legal PPN fits in 52 bits, so the all-ones word can never collide
/// with one.
pub const NO_MAPPING: u64 = u64::MAX;

/// ============================================================================
/// Physical Frames
/// ============================================================================

/// Physical frame number (52 bits)
///
/// Identifies both trie nodes and mapped pages. The trie refers to frames
/// only through these numbers; it never owns the memory behind them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PhysFrameNumber(u64);

/// A physical page number is just the frame number of a mapped page
pub type Ppn = PhysFrameNumber;

impl PhysFrameNumber {
    /// Create a frame number, rejecting values wider than 52 bits
    pub const fn new(raw: u64) -> Result<Self> {
        if raw > PPN_MASK {
            return Err(VmError::OutOfRange);
        }
        Ok(Self(raw))
    }

    /// Create a frame number, silently dropping bits above 52
    pub const fn new_truncate(raw: u64) -> Self {
        Self(raw & PPN_MASK)
    }

    /// Decode a raw PPN that may carry the [`NO_MAPPING`] sentinel.
    ///
    /// The sentinel is checked before truncation, so `NO_MAPPING` never
    /// turns into a real frame number.
    pub const fn from_raw(raw: u64) -> Option<Self> {
        if raw == NO_MAPPING {
            None
        } else {
            Some(Self::new_truncate(raw))
        }
    }

    /// Encode an optional PPN back into the raw sentinel convention
    pub const fn into_raw(mapping: Option<Self>) -> u64 {
        match mapping {
            Some(frame) => frame.0,
            None => NO_MAPPING,
        }
    }

    /// Raw frame number
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Physical address of the first byte of this frame
    pub const fn addr(self) -> PhysAddr {
        PhysAddr::from_frame(self, 0)
    }

    /// The frame `count` frames after this one
    pub const fn add(self, count: u64) -> Result<Self> {
        match self.0.checked_add(count) {
            Some(raw) => Self::new(raw),
            None => Err(VmError::OutOfRange),
        }
    }
}

/// Physical address
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PhysAddr(u64);

impl PhysAddr {
    /// Wrap a raw physical address
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// `frame * PAGE_SIZE + offset`
    ///
    /// # Panics
    ///
    /// Panics if `offset` does not lie within a page.
    pub const fn from_frame(frame: PhysFrameNumber, offset: u64) -> Self {
        assert!(offset <= PAGE_MASK, "offset does not fit in a page");
        Self(frame.0 * PAGE_SIZE as u64 + offset)
    }

    /// Frame containing this address
    pub const fn frame(self) -> PhysFrameNumber {
        PhysFrameNumber::new_truncate(self.0 / PAGE_SIZE as u64)
    }

    /// Offset of this address within its frame
    pub const fn page_offset(self) -> u64 {
        self.0 & PAGE_MASK
    }

    /// Check if the address starts a frame
    pub const fn is_page_aligned(self) -> bool {
        self.page_offset() == 0
    }

    /// Raw physical address
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

/// ============================================================================
/// Virtual Pages
/// ============================================================================

/// Virtual page number (45 bits)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Vpn(u64);

impl Vpn {
    /// Highest representable VPN
    pub const MAX: Vpn = Vpn(VPN_MASK);

    /// Create a VPN, rejecting values wider than 45 bits
    pub const fn new(raw: u64) -> Result<Self> {
        if raw > VPN_MASK {
            return Err(VmError::OutOfRange);
        }
        Ok(Self(raw))
    }

    /// Create a VPN, silently dropping bits above 45
    pub const fn new_truncate(raw: u64) -> Self {
        Self(raw & VPN_MASK)
    }

    /// Raw VPN
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Index into the node at `level` (1 = root, 5 = leaf)
    pub const fn index(self, level: usize) -> usize {
        level_index(self, level)
    }
}

/// Extract the 9-bit node index for `level` from `vpn`.
///
/// Level 1 takes VPN bits 44..36, level 5 takes bits 8..0.
///
/// # Panics
///
/// Panics if `level` is not in `1..=LEVELS`.
pub const fn level_index(vpn: Vpn, level: usize) -> usize {
    assert!(level >= 1 && level <= LEVELS, "page table level out of range");
    let shift = VPN_BITS - LEVEL_BITS * level as u32;
    ((vpn.0 >> shift) & LEVEL_MASK) as usize
}

/// Virtual address (57 translated bits, sign-extended to 64)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct VirtAddr(u64);

impl VirtAddr {
    /// Mask covering the translated bits 56..0
    const TRANSLATED_MASK: u64 = (1 << VA_BITS) - 1;

    /// Create a virtual address, rejecting non-canonical values
    pub const fn new(raw: u64) -> Result<Self> {
        let canonical = Self::new_truncate(raw);
        if canonical.0 != raw {
            return Err(VmError::InvalidAddress);
        }
        Ok(canonical)
    }

    /// Create a virtual address by sign-extending bit 56 over bits 63..57
    pub const fn new_truncate(raw: u64) -> Self {
        if raw & (1 << (VA_BITS - 1)) != 0 {
            Self(raw | !Self::TRANSLATED_MASK)
        } else {
            Self(raw & Self::TRANSLATED_MASK)
        }
    }

    /// Build the canonical address of `offset` within page `vpn`
    pub const fn from_parts(vpn: Vpn, offset: u64) -> Self {
        Self::new_truncate((vpn.0 << PAGE_SIZE_SHIFT) | (offset & PAGE_MASK))
    }

    /// Page number of this address
    pub const fn vpn(self) -> Vpn {
        Vpn::new_truncate(self.0 >> PAGE_SIZE_SHIFT)
    }

    /// Offset within the page
    pub const fn page_offset(self) -> u64 {
        self.0 & PAGE_MASK
    }

    /// Raw virtual address
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}
