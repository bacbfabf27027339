use std::sync::LazyLock;

use crate::bitset::BitSet256;

//------------ ART base-index -------------------------------------------------
//
// Within one 8-bit stride, the 511 possible `(octet, pfx_len)` prefixes are
// mapped onto the integers `1..=255` so that "is an ancestor of" becomes a
// plain ancestor walk in a complete binary tree. This is the allotment
// routing table (ART) trick: it turns in-node longest-prefix-match into one
// bitset intersection against a precomputed mask.

/// Maps a `(octet, pfx_len)` pair, `pfx_len in 0..=8`, to its base-index in
/// `1..=255`. `pfx_len == 0` is the stride-local default route, always `1`.
#[inline]
pub fn pfx_to_idx(octet: u8, pfx_len: u8) -> u8 {
    if pfx_len == 0 {
        1
    } else {
        (1u16 << pfx_len) as u8 | (octet >> (8 - pfx_len))
    }
}

/// Maps a full octet to its "host index" in `256..=511`, used only to probe
/// the backtracking tables -- it is never a slot in a node's `prefixes`.
#[inline]
pub fn host_idx(octet: u8) -> u16 {
    256 + octet as u16
}

/// Inverse of `pfx_to_idx` for `idx in 1..=255`.
#[inline]
pub fn idx_to_pfx(idx: u8) -> (u8, u8) {
    if idx == 1 {
        return (0, 0);
    }
    let bits = 8 - idx.leading_zeros() as u8; // position of idx's highest set bit, 1-based
    let pfx_len = bits - 1;
    let octet = (idx & !(1u8 << pfx_len)) << (8 - pfx_len);
    (octet, pfx_len)
}

/// Absolute prefix length of base-index `idx` found at trie depth `depth`
/// (0-based octet count from the root).
#[inline]
pub fn pfx_len_of(depth: u8, idx: u8) -> u8 {
    depth * 8 + idx_to_pfx(idx).1
}

#[inline]
pub fn max_depth_and_last_bits(bits: u8) -> (u8, u8) {
    (bits / 8, bits % 8)
}

/// Whether a prefix of length `bits`, when it lands at trie depth `depth`
/// with a byte-aligned tail, should be stored as a `Fringe` rather than a
/// `Leaf` one level up.
#[inline]
pub fn is_fringe(depth: u8, bits: u8) -> bool {
    let (max_depth, last_bits) = max_depth_and_last_bits(bits);
    last_bits == 0 && max_depth > 0 && depth == max_depth - 1
}

const TABLE_LEN: usize = 512;

fn build_backtracking_bitset() -> Vec<BitSet256> {
    let mut table = vec![BitSet256::new(); TABLE_LEN];
    for host in 0u16..256 {
        // Walk every prefix length from 8 down to 0, marking each as an
        // ancestor of this host octet.
        let mut set = BitSet256::new();
        for pfx_len in (0..=8u8).rev() {
            let octet = host as u8;
            let idx = pfx_to_idx(octet, pfx_len);
            set.set(idx as u16);
        }
        table[256 + host as usize] = set;
    }
    for idx in 1u16..256 {
        let (octet, pfx_len) = idx_to_pfx(idx as u8);
        let mut set = BitSet256::new();
        for len in (0..=pfx_len).rev() {
            let ancestor = pfx_to_idx(octet, len);
            set.set(ancestor as u16);
        }
        table[idx as usize] = set;
    }
    table
}

fn build_idx_to_prefix_routes() -> Vec<BitSet256> {
    // For every base-index `idx`, the set of base-indexes that are
    // descendants of `idx` within the stride's prefix tree (the allotment).
    let mut table = vec![BitSet256::new(); 256];
    for idx in 1u16..256 {
        let (anc_octet, anc_len) = idx_to_pfx(idx as u8);
        let mut set = BitSet256::new();
        for other in 1u16..256 {
            let (octet, pfx_len) = idx_to_pfx(other as u8);
            let covers = anc_len == 0
                || (pfx_len >= anc_len && (octet >> (8 - anc_len)) == (anc_octet >> (8 - anc_len)));
            if covers {
                set.set(other);
            }
        }
        table[idx as usize] = set;
    }
    table
}

fn build_idx_to_fringe_routes() -> Vec<BitSet256> {
    // For every base-index `idx`, the set of child octets covered by the
    // subtree rooted at `idx`.
    let mut table = vec![BitSet256::new(); 256];
    for idx in 1u16..256 {
        let (octet, pfx_len) = idx_to_pfx(idx as u8);
        let mut set = BitSet256::new();
        if pfx_len == 0 {
            for o in 0u16..256 {
                set.set(o);
            }
        } else {
            let span = 1u16 << (8 - pfx_len);
            let base = (octet as u16 >> (8 - pfx_len)) << (8 - pfx_len);
            for o in base..(base + span) {
                set.set(o);
            }
        }
        table[idx as usize] = set;
    }
    table
}

/// `backtracking_bitset[i]` holds, for `i in 0..512`, the set of base-indexes
/// that are prefix-ancestors of `i` (`i` itself included for `i < 256`). For
/// `i >= 256` (`host_idx` space) it holds the ancestors of the full octet
/// `i - 256`. Generated once and cached for the life of the process.
pub static BACKTRACKING_BITSET: LazyLock<Vec<BitSet256>> = LazyLock::new(build_backtracking_bitset);

/// `idx_to_prefix_routes[idx]` holds the base-indexes allotted to (i.e.
/// covered by) base-index `idx`.
pub static IDX_TO_PREFIX_ROUTES: LazyLock<Vec<BitSet256>> = LazyLock::new(build_idx_to_prefix_routes);

/// `idx_to_fringe_routes[idx]` holds the child octets covered by the subtree
/// rooted at base-index `idx`.
pub static IDX_TO_FRINGE_ROUTES: LazyLock<Vec<BitSet256>> = LazyLock::new(build_idx_to_fringe_routes);
