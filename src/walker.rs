// Copyright 2025 The Pagetrie Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! VPN→PPN Walker
//!
//! Read-only descent through the trie. The walk stops at the first invalid
//! entry and reports where it stopped, which is what the query path needs
//! and what makes a missing mapping easy to diagnose.
//!
//! A walk never allocates and never writes: it touches at most one entry per
//! level, five reads in total.

use crate::layout::{level_index, PhysFrameNumber, Ppn, Vpn, LEVELS};
use crate::physmap::PhysMap;

/// Outcome of a trie walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    /// Leaf entry is valid
    Mapped {
        /// Physical page number stored in the leaf
        ppn: Ppn,
    },

    /// Entry is invalid
    NotPresent {
        /// Level of the invalid entry (1 = root, 5 = leaf)
        level: usize,
        /// Index of the invalid entry within its node
        index: usize,
    },
}

impl Walk {
    /// Check if the walk reached a valid leaf
    pub const fn is_mapped(&self) -> bool {
        matches!(self, Self::Mapped { .. })
    }

    /// Mapped PPN, if any
    pub const fn ppn(&self) -> Option<Ppn> {
        match self {
            Self::Mapped { ppn } => Some(*ppn),
            Self::NotPresent { .. } => None,
        }
    }
}

/// Walk the trie rooted at `root` for `vpn`
pub fn walk<M: PhysMap + ?Sized>(mem: &M, root: PhysFrameNumber, vpn: Vpn) -> Walk {
    let mut table = root;

    for level in 1..LEVELS {
        let index = level_index(vpn, level);
        let entry = mem.table(table.addr())[index];
        if !entry.is_valid() {
            return Walk::NotPresent { level, index };
        }
        table = entry.frame();
    }

    let index = level_index(vpn, LEVELS);
    let leaf = mem.table(table.addr())[index];
    if !leaf.is_valid() {
        return Walk::NotPresent {
            level: LEVELS,
            index,
        };
    }

    Walk::Mapped { ppn: leaf.frame() }
}
