// Copyright 2025 The Pagetrie Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Physical Frame Allocation
//!
//! The trie grows by asking the host for fresh frames. Whatever implements
//! [`FrameAllocator`] must hand out a frame that is not in use anywhere
//! else and whose 512 entries are all zero. There is no free operation:
//! intermediate nodes, once allocated, stay allocated for the lifetime of
//! the table.

use crate::err::Result;
use crate::layout::PhysFrameNumber;

/// Source of zero-filled physical frames
pub trait FrameAllocator {
    /// Allocate a single zero-filled frame.
    ///
    /// Returns [`VmError::NoMemory`](crate::err::VmError::NoMemory) when no
    /// frame is left. Callers pass this on and do not retry.
    fn alloc_frame(&mut self) -> Result<PhysFrameNumber>;
}

impl<A: FrameAllocator + ?Sized> FrameAllocator for &mut A {
    fn alloc_frame(&mut self) -> Result<PhysFrameNumber> {
        (**self).alloc_frame()
    }
}
