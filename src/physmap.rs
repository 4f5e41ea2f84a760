// Copyright 2025 The Pagetrie Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Physical Memory Mapping
//!
//! The trie stores frame numbers, not pointers. To read or write a node it
//! asks the host to make the frame at a page-aligned physical address
//! addressable as an array of 512 entries. The returned view lives only as
//! long as the borrow of the mapper, so no reference into a frame outlives
//! a single step of a walk.

use crate::layout::PhysAddr;
use crate::pte::PageTableNode;

/// Maps physical frames into addressable memory
pub trait PhysMap {
    /// View the frame at `paddr` as a node.
    ///
    /// `paddr` is always page aligned and always names a frame that the
    /// frame allocator handed out (or the caller's root frame).
    fn table(&self, paddr: PhysAddr) -> &PageTableNode;

    /// Mutable view of the frame at `paddr`
    fn table_mut(&mut self, paddr: PhysAddr) -> &mut PageTableNode;
}

impl<M: PhysMap + ?Sized> PhysMap for &mut M {
    fn table(&self, paddr: PhysAddr) -> &PageTableNode {
        (**self).table(paddr)
    }

    fn table_mut(&mut self, paddr: PhysAddr) -> &mut PageTableNode {
        (**self).table_mut(paddr)
    }
}
