// Copyright 2025 The Pagetrie Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Host Frame Arena
//!
//! An in-memory stand-in for physical memory. The arena owns a contiguous
//! run of frame numbers starting at [`ArenaConfig::base_frame`] and hands
//! them out bump-style, backing each with a zero-filled heap node the first
//! time it is allocated. Frames are never returned, which mirrors the
//! page table's own policy of never reclaiming intermediate nodes: the
//! number of allocated frames is therefore an exact record of how many
//! nodes the trie has ever created.
//!
//! The arena implements both collaborators the trie depends on:
//! [`FrameAllocator`] and [`PhysMap`].

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::err::{Result, VmError};
use crate::layout::{PhysAddr, PhysFrameNumber};
use crate::physmap::PhysMap;
use crate::pmm::FrameAllocator;
use crate::pte::{PageTableNode, EMPTY_NODE};

/// Default first frame number handed out by an arena
pub const DEFAULT_BASE_FRAME: u64 = 0x100;

/// Default number of frames in an arena (16MB)
pub const DEFAULT_CAPACITY: usize = 4096;

/// Frame arena configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Frame number of the first frame handed out
    pub base_frame: PhysFrameNumber,

    /// Maximum number of frames the arena will hand out
    pub capacity: usize,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            base_frame: PhysFrameNumber::new_truncate(DEFAULT_BASE_FRAME),
            capacity: DEFAULT_CAPACITY,
        }
    }
}

/// In-memory physical frame arena
#[derive(Clone, PartialEq, Eq)]
pub struct FrameArena {
    config: ArenaConfig,
    frames: Vec<Box<PageTableNode>>,
}

impl FrameArena {
    /// Create an arena.
    ///
    /// Fails with [`VmError::OutOfRange`] if the last frame of the arena
    /// would not fit in 52 bits.
    pub fn new(config: ArenaConfig) -> Result<Self> {
        if config.capacity > 0 {
            config.base_frame.add(config.capacity as u64 - 1)?;
        }

        log_debug!(
            "frame arena: {} frames from {:#x}",
            config.capacity,
            config.base_frame.as_u64()
        );

        Ok(Self {
            config,
            frames: Vec::new(),
        })
    }

    /// Create an arena of `capacity` frames at the default base frame
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::new(ArenaConfig {
            capacity,
            ..ArenaConfig::default()
        })
    }

    /// Configuration this arena was built with
    pub fn config(&self) -> ArenaConfig {
        self.config
    }

    /// Number of frames handed out so far
    pub fn allocated_frames(&self) -> usize {
        self.frames.len()
    }

    /// Number of frames still available
    pub fn remaining_frames(&self) -> usize {
        self.config.capacity - self.frames.len()
    }

    /// Check if `frame` has been handed out by this arena
    pub fn contains(&self, frame: PhysFrameNumber) -> bool {
        self.slot(frame).is_some()
    }

    /// Read-only view of an allocated frame, if any
    pub fn frame(&self, frame: PhysFrameNumber) -> Option<&PageTableNode> {
        self.slot(frame).map(|slot| &*self.frames[slot])
    }

    fn slot(&self, frame: PhysFrameNumber) -> Option<usize> {
        let offset = frame.as_u64().checked_sub(self.config.base_frame.as_u64())?;
        let slot = usize::try_from(offset).ok()?;
        (slot < self.frames.len()).then_some(slot)
    }

    /// Translate a physical address into a slot, enforcing the mapper's
    /// preconditions.
    fn checked_slot(&self, paddr: PhysAddr) -> usize {
        assert!(
            paddr.is_page_aligned(),
            "physical address {:#x} is not page aligned",
            paddr.as_u64()
        );
        match self.slot(paddr.frame()) {
            Some(slot) => slot,
            None => panic!(
                "frame {:#x} was never allocated from this arena",
                paddr.frame().as_u64()
            ),
        }
    }
}

impl Default for FrameArena {
    fn default() -> Self {
        Self {
            config: ArenaConfig::default(),
            frames: Vec::new(),
        }
    }
}

impl fmt::Debug for FrameArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameArena")
            .field("config", &self.config)
            .field("allocated", &self.frames.len())
            .finish()
    }
}

impl FrameAllocator for FrameArena {
    fn alloc_frame(&mut self) -> Result<PhysFrameNumber> {
        if self.frames.len() == self.config.capacity {
            log_warn!("frame arena exhausted ({} frames)", self.config.capacity);
            return Err(VmError::NoMemory);
        }

        let frame = self.config.base_frame.add(self.frames.len() as u64)?;
        self.frames.push(Box::new(EMPTY_NODE));
        Ok(frame)
    }
}

/// # Panics
///
/// Both methods panic on an unaligned address or on a frame the arena never
/// handed out. The trie only ever follows frames it allocated itself, so
/// either case means the caller passed a bogus root.
impl PhysMap for FrameArena {
    fn table(&self, paddr: PhysAddr) -> &PageTableNode {
        &self.frames[self.checked_slot(paddr)]
    }

    fn table_mut(&mut self, paddr: PhysAddr) -> &mut PageTableNode {
        let slot = self.checked_slot(paddr);
        &mut self.frames[slot]
    }
}
