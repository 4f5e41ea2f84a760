// Copyright 2025 The Pagetrie Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Update/query behaviour across whole tables

use crate::arena::{ArenaConfig, FrameArena};
use crate::err::VmError;
use crate::layout::{PhysFrameNumber, Ppn, Vpn, ENTRIES_PER_TABLE, NO_MAPPING, PPN_MASK, VPN_MASK};
use crate::page_table::{page_table_query, page_table_update, PageTable};
use crate::physmap::PhysMap;
use crate::pmm::FrameAllocator;

/// Fresh arena with a zeroed root, returned as a raw frame number
fn fresh() -> (FrameArena, u64) {
    let mut arena = FrameArena::default();
    let root = arena.alloc_frame().unwrap();
    (arena, root.as_u64())
}

/// Every entry of every frame the arena handed out
fn all_entries(arena: &FrameArena) -> impl Iterator<Item = u64> + '_ {
    let base = arena.config().base_frame;
    (0..arena.allocated_frames()).flat_map(move |slot| {
        let frame = base.add(slot as u64).unwrap();
        arena.table(frame.addr()).iter().map(|pte| pte.bits())
    })
}

/// A spread of VPNs hitting both ends of every level index
const SAMPLE_VPNS: [u64; 8] = [
    0,
    1,
    0x1ff,
    0x200,
    0x1_0203_0405,
    0x0aaa_aaaa_aaaa,
    0x1555_5555_5555,
    VPN_MASK,
];

#[test]
fn test_round_trip() {
    let (mut arena, root) = fresh();
    for (i, &vpn) in SAMPLE_VPNS.iter().enumerate() {
        let ppn = 0x1000 + i as u64;
        page_table_update(&mut arena, root, vpn, ppn).unwrap();
        assert_eq!(page_table_query(&arena, root, vpn), ppn);
    }
}

#[test]
fn test_round_trip_extreme_ppns() {
    let (mut arena, root) = fresh();
    page_table_update(&mut arena, root, 10, 0).unwrap();
    page_table_update(&mut arena, root, 11, PPN_MASK).unwrap();
    assert_eq!(page_table_query(&arena, root, 10), 0);
    assert_eq!(page_table_query(&arena, root, 11), PPN_MASK);
}

#[test]
fn test_destroy_existing_and_missing() {
    let (mut arena, root) = fresh();
    page_table_update(&mut arena, root, 0x42, 0x99).unwrap();

    page_table_update(&mut arena, root, 0x42, NO_MAPPING).unwrap();
    assert_eq!(page_table_query(&arena, root, 0x42), NO_MAPPING);

    // Never mapped, in a subtree that was never built
    page_table_update(&mut arena, root, VPN_MASK, NO_MAPPING).unwrap();
    assert_eq!(page_table_query(&arena, root, VPN_MASK), NO_MAPPING);
}

#[test]
fn test_destroy_is_idempotent() {
    let (mut arena, root) = fresh();
    page_table_update(&mut arena, root, 0x1234, 0x5678).unwrap();
    page_table_update(&mut arena, root, 0x1235, 0x5679).unwrap();

    page_table_update(&mut arena, root, 0x1234, NO_MAPPING).unwrap();
    let once = arena.clone();
    page_table_update(&mut arena, root, 0x1234, NO_MAPPING).unwrap();
    assert_eq!(arena, once);
}

#[test]
fn test_destroy_missing_allocates_nothing() {
    let (mut arena, root) = fresh();
    page_table_update(&mut arena, root, 0, 1).unwrap();
    let before = arena.clone();

    // Shares levels 1-3 with VPN 0, then diverges
    page_table_update(&mut arena, root, 1 << 9, NO_MAPPING).unwrap();
    assert_eq!(arena, before);
}

#[test]
fn test_independence_with_shared_prefixes() {
    let (mut arena, root) = fresh();

    // Pairs that agree on the first 4, 3, 2, 1 and 0 level indices
    let pairs = [
        (0x0_0000_0000, 0x0_0000_0001),
        (0x0_0000_0000, 0x0_0000_0200),
        (0x0_0000_0000, 0x0_0004_0000),
        (0x0_0000_0000, 0x0_0800_0000),
        (0x0_0000_0000, 0x10_0000_0000),
    ];

    for (i, &(a, b)) in pairs.iter().enumerate() {
        let (ppn_a, ppn_b) = (0x100 + 2 * i as u64, 0x101 + 2 * i as u64);
        page_table_update(&mut arena, root, a, ppn_a).unwrap();
        page_table_update(&mut arena, root, b, ppn_b).unwrap();
        assert_eq!(page_table_query(&arena, root, a), ppn_a);
        assert_eq!(page_table_query(&arena, root, b), ppn_b);
    }
}

#[test]
fn test_shared_prefix_reuses_nodes() {
    let (mut arena, root) = fresh();
    page_table_update(&mut arena, root, 0, 1).unwrap();
    assert_eq!(arena.allocated_frames(), 5);

    // Same leaf node
    page_table_update(&mut arena, root, 1, 2).unwrap();
    assert_eq!(arena.allocated_frames(), 5);

    // Diverges at level 4: one new leaf node
    page_table_update(&mut arena, root, 1 << 9, 3).unwrap();
    assert_eq!(arena.allocated_frames(), 6);

    // Diverges at the root: a full new path below it
    page_table_update(&mut arena, root, 1 << 36, 4).unwrap();
    assert_eq!(arena.allocated_frames(), 10);
}

#[test]
fn test_overwrite() {
    let (mut arena, root) = fresh();
    page_table_update(&mut arena, root, 0xbeef, 0x111).unwrap();
    let frames = arena.allocated_frames();

    page_table_update(&mut arena, root, 0xbeef, 0x222).unwrap();
    assert_eq!(page_table_query(&arena, root, 0xbeef), 0x222);
    assert_eq!(arena.allocated_frames(), frames);
}

#[test]
fn test_fresh_table_is_empty() {
    let (arena, root) = fresh();
    for &vpn in &SAMPLE_VPNS {
        assert_eq!(page_table_query(&arena, root, vpn), NO_MAPPING);
    }
    for index in 0..ENTRIES_PER_TABLE as u64 {
        assert_eq!(page_table_query(&arena, root, index << 36), NO_MAPPING);
    }
}

#[test]
fn test_max_vpn_scenario() {
    let (mut arena, root) = fresh();
    page_table_update(&mut arena, root, 0x1FFF_FFFF_FFFF, 0xABCDE).unwrap();
    assert_eq!(page_table_query(&arena, root, 0x1FFF_FFFF_FFFF), 0xABCDE);
    assert_eq!(page_table_query(&arena, root, 0), NO_MAPPING);
}

#[test]
fn test_emptied_nodes_are_kept() {
    let (mut arena, root) = fresh();
    page_table_update(&mut arena, root, 0x7777, 0x8888).unwrap();
    page_table_update(&mut arena, root, 0x7777, NO_MAPPING).unwrap();

    // The path stays valid even though nothing is mapped below it
    let root_table = arena.table(PhysFrameNumber::new(root).unwrap().addr());
    assert_eq!(root_table.iter().filter(|pte| pte.is_valid()).count(), 1);
    assert_eq!(arena.allocated_frames(), 5);
    assert_eq!(all_entries(&arena).filter(|&bits| bits & 1 != 0).count(), 4);
}

#[test]
fn test_reserved_bits_stay_zero() {
    let (mut arena, root) = fresh();
    for (i, &vpn) in SAMPLE_VPNS.iter().enumerate() {
        page_table_update(&mut arena, root, vpn, PPN_MASK - i as u64).unwrap();
    }
    page_table_update(&mut arena, root, SAMPLE_VPNS[3], NO_MAPPING).unwrap();

    assert!(all_entries(&arena).all(|bits| bits & 0xffe == 0));
}

#[test]
fn test_out_of_memory_propagates() {
    let mut arena = FrameArena::with_capacity(4).unwrap();
    let pt = PageTable::create(&mut arena).unwrap();
    let vpn = Vpn::new(0x3_0000).unwrap();

    assert_eq!(
        pt.map(&mut arena, vpn, Ppn::new(1).unwrap()),
        Err(VmError::NoMemory)
    );
    assert_eq!(arena.allocated_frames(), 4);
    assert_eq!(arena.remaining_frames(), 0);
    assert_eq!(pt.query(&arena, vpn), None);

    // Destroy still works on a full arena
    pt.unmap(&mut arena, vpn);
    assert_eq!(
        page_table_update(&mut arena, pt.root().as_u64(), vpn.as_u64(), NO_MAPPING),
        Ok(())
    );
}

#[test]
fn test_nonzero_base_frame() {
    let config = ArenaConfig {
        base_frame: PhysFrameNumber::new(0xf_0000_0000).unwrap(),
        capacity: 64,
    };
    let mut arena = FrameArena::new(config).unwrap();
    let pt = PageTable::create(&mut arena).unwrap();
    assert_eq!(pt.root().as_u64(), 0xf_0000_0000);

    let vpn = Vpn::new(0x0123_4567_89ab).unwrap();
    let ppn = Ppn::new(0x0fed_cba9_8765).unwrap();
    pt.map(&mut arena, vpn, ppn).unwrap();
    assert_eq!(pt.query(&arena, vpn), Some(ppn));
}

#[test]
fn test_separate_roots_in_one_arena() {
    let mut arena = FrameArena::default();
    let a = PageTable::create(&mut arena).unwrap();
    let b = PageTable::create(&mut arena).unwrap();
    let vpn = Vpn::new(0x4242).unwrap();

    a.map(&mut arena, vpn, Ppn::new(0xa).unwrap()).unwrap();
    b.map(&mut arena, vpn, Ppn::new(0xb).unwrap()).unwrap();
    a.unmap(&mut arena, vpn);

    assert_eq!(a.query(&arena, vpn), None);
    assert_eq!(b.query(&arena, vpn), Some(Ppn::new(0xb).unwrap()));
}
