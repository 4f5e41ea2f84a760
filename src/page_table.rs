// Copyright 2025 The Pagetrie Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Five-Level Page Table
//!
//! A radix trie mapping 45-bit VPNs to 52-bit PPNs. Each node is one
//! physical frame of 512 entries; each level consumes 9 bits of the VPN.
//!
//! ```text
//! root (L1) → L2 → L3 → L4 → leaf (L5) → PPN
//! 512         512  512  512  512
//! 9 bits      9    9    9    9          = 45-bit VPN
//! ```
//!
//! # Ownership
//!
//! A page table is nothing more than its root frame number. [`PageTable`]
//! is a `Copy` handle around that number; the frames themselves belong to
//! whoever implements [`FrameAllocator`] and [`PhysMap`], and every
//! operation borrows that memory for its duration.
//!
//! # Reclamation
//!
//! Intermediate nodes are allocated on the first update that needs them and
//! are never freed, even once every mapping below them is gone. Unmapping
//! clears exactly one leaf entry.
//!
//! # Concurrency
//!
//! None. Callers serialize updates and queries against the same root.

use crate::err::Result;
use crate::layout::{level_index, PhysAddr, PhysFrameNumber, Ppn, VirtAddr, Vpn, LEVELS};
use crate::physmap::PhysMap;
use crate::pmm::FrameAllocator;
use crate::pte::PageTableEntry;
use crate::walker::walk;

/// Handle to a page table, identified by its root frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageTable {
    root: PhysFrameNumber,
}

impl PageTable {
    /// Wrap an existing root frame.
    ///
    /// The frame must hold a valid node: zero-filled for a fresh table or
    /// previously built by this module.
    pub const fn from_root(root: PhysFrameNumber) -> Self {
        Self { root }
    }

    /// Allocate a fresh, empty page table
    pub fn create<A: FrameAllocator + ?Sized>(alloc: &mut A) -> Result<Self> {
        let root = alloc.alloc_frame()?;
        log_debug!("page table: new root {:#x}", root.as_u64());
        Ok(Self { root })
    }

    /// Root frame number
    pub const fn root(&self) -> PhysFrameNumber {
        self.root
    }

    /// Set or destroy the mapping for `vpn`.
    ///
    /// With `Some(ppn)`, missing intermediate nodes are allocated on the
    /// way down and the leaf is pointed at `ppn`; afterwards
    /// [`query`](Self::query) returns `ppn`. Nodes that already exist are
    /// reused, so remapping a VPN never allocates.
    ///
    /// With `None`, the leaf entry for `vpn` is cleared. If the walk hits an
    /// invalid entry before the leaf there is nothing to destroy and the
    /// call returns without touching memory. Destroying never allocates and
    /// never clears an intermediate entry.
    ///
    /// The only possible error is the allocator's
    /// [`VmError::NoMemory`](crate::err::VmError::NoMemory). Nodes allocated
    /// before the failure stay linked into the trie.
    pub fn update<M>(&self, mem: &mut M, vpn: Vpn, ppn: Option<Ppn>) -> Result
    where
        M: FrameAllocator + PhysMap + ?Sized,
    {
        let mut table = self.root;

        for level in 1..LEVELS {
            let index = level_index(vpn, level);
            let entry = mem.table(table.addr())[index];

            table = if entry.is_valid() {
                entry.frame()
            } else if ppn.is_none() {
                log_debug!(
                    "unmap vpn {:#x}: no node at level {}, nothing to do",
                    vpn.as_u64(),
                    level
                );
                return Ok(());
            } else {
                let next = mem.alloc_frame()?;
                mem.table_mut(table.addr())[index] = PageTableEntry::new(next);
                log_trace!(
                    "level {} index {:#x}: new node {:#x}",
                    level,
                    index,
                    next.as_u64()
                );
                next
            };
        }

        let index = level_index(vpn, LEVELS);
        let leaf = match ppn {
            Some(ppn) => {
                log_debug!("map vpn {:#x} -> ppn {:#x}", vpn.as_u64(), ppn.as_u64());
                PageTableEntry::new(ppn)
            }
            None => {
                log_debug!("unmap vpn {:#x}", vpn.as_u64());
                PageTableEntry::invalid()
            }
        };
        mem.table_mut(table.addr())[index] = leaf;

        Ok(())
    }

    /// Map `vpn` to `ppn`
    pub fn map<M>(&self, mem: &mut M, vpn: Vpn, ppn: Ppn) -> Result
    where
        M: FrameAllocator + PhysMap + ?Sized,
    {
        self.update(mem, vpn, Some(ppn))
    }

    /// Destroy the mapping for `vpn`, if any.
    ///
    /// Only walks and writes existing nodes, so unlike [`map`](Self::map)
    /// it cannot fail.
    pub fn unmap<M: PhysMap + ?Sized>(&self, mem: &mut M, vpn: Vpn) {
        let mut table = self.root;

        for level in 1..LEVELS {
            let entry = mem.table(table.addr())[level_index(vpn, level)];
            if !entry.is_valid() {
                log_debug!(
                    "unmap vpn {:#x}: no node at level {}, nothing to do",
                    vpn.as_u64(),
                    level
                );
                return;
            }
            table = entry.frame();
        }

        log_debug!("unmap vpn {:#x}", vpn.as_u64());
        mem.table_mut(table.addr())[level_index(vpn, LEVELS)] = PageTableEntry::invalid();
    }

    /// PPN currently mapped to `vpn`, or `None`. Read-only.
    pub fn query<M: PhysMap + ?Sized>(&self, mem: &M, vpn: Vpn) -> Option<Ppn> {
        walk(mem, self.root, vpn).ppn()
    }

    /// Translate a full virtual address to a physical address.
    ///
    /// The page offset is carried over unchanged; the sign-extension bits
    /// play no part in the lookup.
    pub fn translate<M: PhysMap + ?Sized>(&self, mem: &M, vaddr: VirtAddr) -> Option<PhysAddr> {
        let ppn = self.query(mem, vaddr.vpn())?;
        Some(PhysAddr::from_frame(ppn, vaddr.page_offset()))
    }
}

/// ============================================================================
/// Raw Interface
/// ============================================================================

/// Update the table rooted at frame `pt`, using raw integers.
///
/// `ppn == NO_MAPPING` destroys the mapping. Otherwise `vpn` is truncated
/// to 45 bits and `ppn` to 52 bits; out-of-range inputs are not rejected.
///
/// [`NO_MAPPING`]: crate::layout::NO_MAPPING
pub fn page_table_update<M>(mem: &mut M, pt: u64, vpn: u64, ppn: u64) -> Result
where
    M: FrameAllocator + PhysMap + ?Sized,
{
    PageTable::from_root(PhysFrameNumber::new_truncate(pt)).update(
        mem,
        Vpn::new_truncate(vpn),
        Ppn::from_raw(ppn),
    )
}

/// Query the table rooted at frame `pt`, using raw integers.
///
/// Returns the mapped PPN, or [`NO_MAPPING`](crate::layout::NO_MAPPING).
pub fn page_table_query<M: PhysMap + ?Sized>(mem: &M, pt: u64, vpn: u64) -> u64 {
    let table = PageTable::from_root(PhysFrameNumber::new_truncate(pt));
    Ppn::into_raw(table.query(mem, Vpn::new_truncate(vpn)))
}
