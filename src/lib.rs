// Copyright 2025 The Pagetrie Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Pagetrie - Five-Level Radix Page Table
//!
//! Maps 45-bit virtual page numbers to 52-bit physical page numbers through a
//! trie of 512-entry nodes, each node occupying one 4KB physical frame.
//!
//! The trie never owns memory. Nodes are obtained from a [`FrameAllocator`]
//! and read or written through a [`PhysMap`]; both are supplied by the host.
//! [`FrameArena`] implements the pair on the heap for hosted use and tests.
//!
//! # Organization
//!
//! - [`layout`] - Address widths, frame numbers, level indexing
//! - [`pte`] - Page table entry encoding
//! - [`pmm`] - Frame allocator interface
//! - [`physmap`] - Physical memory access interface
//! - [`arena`] - Heap-backed frame arena
//! - [`page_table`] - Update and query
//! - [`walker`] - Read-only trie walk
//!
//! # Example
//!
//! ```
//! use pagetrie::{FrameArena, PageTable, Ppn, Vpn};
//!
//! let mut arena = FrameArena::default();
//! let pt = PageTable::create(&mut arena)?;
//!
//! let vpn = Vpn::new(0x1fff_ffff_ffff)?;
//! pt.map(&mut arena, vpn, Ppn::new(0xabcde)?)?;
//! assert_eq!(pt.query(&arena, vpn), Some(Ppn::new(0xabcde)?));
//!
//! pt.unmap(&mut arena, vpn);
//! assert_eq!(pt.query(&arena, vpn), None);
//! # Ok::<(), pagetrie::VmError>(())
//! ```

#![cfg_attr(not(test), no_std)]

extern crate alloc;

#[macro_use]
mod debug;

pub mod arena;
pub mod err;
pub mod layout;
pub mod page_table;
pub mod physmap;
pub mod pmm;
pub mod pte;
pub mod walker;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use arena::{ArenaConfig, FrameArena};
pub use err::{Result, VmError};
pub use layout::{
    level_index,
    PhysAddr,
    PhysFrameNumber,
    Ppn,
    VirtAddr,
    Vpn,
    LEVELS,
    NO_MAPPING,
    PAGE_SIZE,
};
pub use page_table::{page_table_query, page_table_update, PageTable};
pub use physmap::PhysMap;
pub use pmm::FrameAllocator;
pub use pte::{PageTableEntry, PageTableNode, PteFlags};
pub use walker::{walk, Walk};
