// Copyright 2025 The Pagetrie Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Crate-Level Tests
//!
//! Behaviour of the trie as a whole, driven through the raw integer
//! interface and the typed handle against a [`FrameArena`](crate::FrameArena).

mod conformance;
