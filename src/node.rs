use crate::base_index::{
    host_idx, is_fringe, max_depth_and_last_bits, pfx_len_of, pfx_to_idx, BACKTRACKING_BITSET,
    IDX_TO_FRINGE_ROUTES, IDX_TO_PREFIX_ROUTES,
};
use crate::prefix::{IPAddr, Prefix};
use crate::sparse::Sparse256;

//------------ Child ----------------------------------------------------------

/// A trie node's child slot: either another inner node, a path-compressed
/// leaf carrying its prefix explicitly, or a byte-aligned "fringe" terminal
/// whose prefix length is implicit from its position.
#[derive(Clone)]
pub enum Child<V> {
    Node(Box<Node<V>>),
    Leaf { prefix: Prefix, value: V },
    Fringe { value: V },
}

//------------ Node -----------------------------------------------------------

/// One level of the multibit trie, stride 8. `prefixes` holds stride-local
/// routes keyed by ART base-index; `children` holds the 0..=255 octet fan-out.
#[derive(Clone)]
pub struct Node<V> {
    prefixes: Sparse256<V>,
    children: Sparse256<Child<V>>,
}

impl<V> Default for Node<V> {
    fn default() -> Self {
        Self { prefixes: Sparse256::new(), children: Sparse256::new() }
    }
}

impl<V> Node<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty() && self.children.is_empty()
    }

    /// Recursive deep clone. Under this revision's deep-clone persistence
    /// policy (see DESIGN.md) this is identical to `clone_flat`; the two
    /// names are kept distinct so a future reference-counted sharing policy
    /// only has to change `clone_flat`.
    pub fn clone_rec(&self) -> Self
    where
        V: Clone,
    {
        self.clone()
    }

    /// Path-copy clone used by the `*_persist` table operations. See
    /// `clone_rec` above.
    pub fn clone_flat(&self) -> Self
    where
        V: Clone,
    {
        self.clone()
    }

    //--------- insert ---------------------------------------------------

    /// Insert `v` at `pfx`, assumed canonical. Returns `true` if this
    /// created a brand-new entry, `false` if it overwrote an existing one.
    pub fn insert_at_depth(&mut self, pfx: &Prefix, v: V, depth: u8) -> bool {
        enum Action {
            PlaceNew,
            Descend,
            OverwriteLeaf,
            OverwriteFringe,
            PromoteLeaf,
            PromoteFringe,
        }

        let (max_depth, last_bits) = max_depth_and_last_bits(pfx.bits);
        let octets = pfx.addr.as_octets();
        let mut cur = self;
        let mut d = depth;
        loop {
            if d == max_depth {
                let idx = pfx_to_idx(octets[d as usize], last_bits);
                return cur.prefixes.insert_at(idx, v);
            }
            let octet = octets[d as usize];
            let action = match cur.children.get(octet) {
                None => Action::PlaceNew,
                Some(Child::Node(_)) => Action::Descend,
                Some(Child::Leaf { prefix, .. }) => {
                    if *prefix == *pfx {
                        Action::OverwriteLeaf
                    } else {
                        Action::PromoteLeaf
                    }
                }
                Some(Child::Fringe { .. }) => {
                    if is_fringe(d, pfx.bits) {
                        Action::OverwriteFringe
                    } else {
                        Action::PromoteFringe
                    }
                }
            };
            match action {
                Action::PlaceNew => {
                    if is_fringe(d, pfx.bits) {
                        log::trace!("installing fringe at depth {d}");
                        cur.children.insert_at(octet, Child::Fringe { value: v });
                    } else {
                        cur.children.insert_at(octet, Child::Leaf { prefix: *pfx, value: v });
                    }
                    return true;
                }
                Action::OverwriteLeaf => {
                    if let Some(Child::Leaf { value, .. }) = cur.children.get_mut(octet) {
                        *value = v;
                    }
                    return false;
                }
                Action::OverwriteFringe => {
                    if let Some(Child::Fringe { value }) = cur.children.get_mut(octet) {
                        *value = v;
                    }
                    return false;
                }
                Action::PromoteLeaf => {
                    log::trace!("promoting leaf to node at depth {d}");
                    let displaced = cur.children.delete_at(octet).unwrap();
                    let mut new_node = Node::new();
                    if let Child::Leaf { prefix: old_pfx, value: old_v } = displaced {
                        new_node.insert_at_depth(&old_pfx, old_v, d + 1);
                    }
                    cur.children.insert_at(octet, Child::Node(Box::new(new_node)));
                }
                Action::PromoteFringe => {
                    log::trace!("promoting fringe to node at depth {d}");
                    let displaced = cur.children.delete_at(octet).unwrap();
                    let mut new_node = Node::new();
                    if let Child::Fringe { value: old_v } = displaced {
                        new_node.prefixes.insert_at(1, old_v);
                    }
                    cur.children.insert_at(octet, Child::Node(Box::new(new_node)));
                }
                Action::Descend => {}
            }
            match cur.children.get_mut(octet) {
                Some(Child::Node(n)) => {
                    cur = n.as_mut();
                    d += 1;
                }
                _ => unreachable!(),
            }
        }
    }

    //--------- exact get / delete ----------------------------------------

    pub fn get(&self, pfx: &Prefix) -> Option<&V> {
        let (max_depth, last_bits) = max_depth_and_last_bits(pfx.bits);
        let octets = pfx.addr.as_octets();
        let mut cur = self;
        let mut d = 0u8;
        loop {
            if d == max_depth {
                let idx = pfx_to_idx(octets[d as usize], last_bits);
                return cur.prefixes.get(idx);
            }
            match cur.children.get(octets[d as usize]) {
                None => return None,
                Some(Child::Node(n)) => {
                    cur = n;
                    d += 1;
                }
                Some(Child::Leaf { prefix, value }) => {
                    return if *prefix == *pfx { Some(value) } else { None };
                }
                Some(Child::Fringe { value }) => {
                    return if is_fringe(d, pfx.bits) { Some(value) } else { None };
                }
            }
        }
    }

    pub fn get_mut(&mut self, pfx: &Prefix) -> Option<&mut V> {
        let (max_depth, last_bits) = max_depth_and_last_bits(pfx.bits);
        let octets = pfx.addr.as_octets();
        let mut cur = self;
        let mut d = 0u8;
        loop {
            if d == max_depth {
                let idx = pfx_to_idx(octets[d as usize], last_bits);
                return cur.prefixes.get_mut(idx);
            }
            let octet = octets[d as usize];
            let is_node = matches!(cur.children.get(octet), Some(Child::Node(_)));
            if is_node {
                match cur.children.get_mut(octet) {
                    Some(Child::Node(n)) => {
                        cur = n.as_mut();
                        d += 1;
                        continue;
                    }
                    _ => unreachable!(),
                }
            }
            return match cur.children.get_mut(octet) {
                None => None,
                Some(Child::Leaf { prefix, value }) => {
                    if *prefix == *pfx {
                        Some(value)
                    } else {
                        None
                    }
                }
                Some(Child::Fringe { value }) => {
                    if is_fringe(d, pfx.bits) {
                        Some(value)
                    } else {
                        None
                    }
                }
                Some(Child::Node(_)) => unreachable!(),
            };
        }
    }

    pub fn delete(&mut self, pfx: &Prefix) -> Option<V> {
        let octets = pfx.addr.as_octets().to_vec();
        self.delete_rec(pfx, &octets, 0)
    }

    fn delete_rec(&mut self, pfx: &Prefix, octets: &[u8], depth: u8) -> Option<V> {
        let (max_depth, last_bits) = max_depth_and_last_bits(pfx.bits);
        if depth == max_depth {
            let idx = pfx_to_idx(octets[depth as usize], last_bits);
            return self.prefixes.delete_at(idx);
        }
        let octet = octets[depth as usize];
        let is_node = matches!(self.children.get(octet), Some(Child::Node(_)));
        if is_node {
            let removed = match self.children.get_mut(octet) {
                Some(Child::Node(n)) => n.delete_rec(pfx, octets, depth + 1),
                _ => unreachable!(),
            };
            if removed.is_some() {
                self.compress_child(octet, pfx, depth);
            }
            return removed;
        }
        match self.children.get(octet) {
            Some(Child::Leaf { prefix, .. }) if *prefix == *pfx => {
                match self.children.delete_at(octet) {
                    Some(Child::Leaf { value, .. }) => Some(value),
                    _ => unreachable!(),
                }
            }
            Some(Child::Fringe { .. }) if is_fringe(depth, pfx.bits) => {
                match self.children.delete_at(octet) {
                    Some(Child::Fringe { value }) => Some(value),
                    _ => unreachable!(),
                }
            }
            _ => None,
        }
    }

    /// After a successful delete inside the child node at `octet`, collapse
    /// it back into a `Leaf`/`Fringe` (or drop it) if it degenerated to a
    /// single entry. `pfx` is the prefix just deleted; the child shares its
    /// first `depth+1` octets with it, which is what makes reconstructing an
    /// absolute prefix from a bare base-index valid here.
    fn compress_child(&mut self, octet: u8, pfx: &Prefix, depth: u8) {
        enum Action {
            None,
            DropSlot,
            PullUpLeaf(u8),
            PullUpFringe(u8),
            PullUpPrefix(u8),
        }

        let action = match self.children.get(octet) {
            Some(Child::Node(n)) => {
                if n.is_empty() {
                    Action::DropSlot
                } else if n.prefixes.is_empty() && n.children.len() == 1 {
                    let (k, child) = n.children.iter().next().unwrap();
                    match child {
                        Child::Node(_) => Action::None,
                        Child::Leaf { .. } => Action::PullUpLeaf(k),
                        Child::Fringe { .. } => Action::PullUpFringe(k),
                    }
                } else if n.children.is_empty() && n.prefixes.len() == 1 {
                    let (idx, _) = n.prefixes.iter().next().unwrap();
                    Action::PullUpPrefix(idx)
                } else {
                    Action::None
                }
            }
            _ => Action::None,
        };

        match action {
            Action::None => {}
            Action::DropSlot => {
                log::trace!("dropping emptied node at depth {}", depth + 1);
                self.children.delete_at(octet);
            }
            Action::PullUpLeaf(k) => {
                // A `Leaf` carries its absolute prefix explicitly, so it can
                // move up a trie level verbatim.
                let pulled = match self.children.get_mut(octet) {
                    Some(Child::Node(n)) => n.children.delete_at(k),
                    _ => None,
                };
                if let Some(p) = pulled {
                    log::trace!("compressing single-child node at depth {}", depth + 1);
                    self.children.replace_at(octet, p);
                }
            }
            Action::PullUpFringe(k) => {
                // A `Fringe`'s prefix length is implicit from its depth, so
                // moving it up a level would silently shorten it by one
                // stride. Reconstruct it as an explicit `Leaf` instead.
                let pulled = match self.children.get_mut(octet) {
                    Some(Child::Node(n)) => n.children.delete_at(k),
                    _ => None,
                };
                if let Some(Child::Fringe { value }) = pulled {
                    log::trace!("compressing single-fringe node at depth {}", depth + 1);
                    let new_pfx = reconstruct_fringe_prefix(pfx, depth + 1, k);
                    self.children.replace_at(octet, Child::Leaf { prefix: new_pfx, value });
                }
            }
            Action::PullUpPrefix(idx) => {
                let value = match self.children.get_mut(octet) {
                    Some(Child::Node(n)) => n.prefixes.delete_at(idx),
                    _ => None,
                };
                if let Some(v) = value {
                    log::trace!("compressing single-prefix node at depth {}", depth + 1);
                    let new_pfx = reconstruct_prefix(pfx, depth + 1, idx);
                    self.children.replace_at(octet, Child::Leaf { prefix: new_pfx, value: v });
                }
            }
        }
    }

    //--------- address / prefix lookup -----------------------------------

    /// Longest-prefix match of a full address.
    pub fn lookup(&self, addr: &IPAddr) -> Option<(Prefix, &V)> {
        let octets = addr.as_octets();
        let mut stack: [Option<&Node<V>>; 16] = [None; 16];
        let mut cur = self;
        let mut depth = 0u8;
        loop {
            stack[depth as usize] = Some(cur);
            if depth as usize >= octets.len() {
                break;
            }
            let octet = octets[depth as usize];
            match cur.children.get(octet) {
                None => break,
                Some(Child::Fringe { value }) => {
                    let bits = (depth + 1) * 8;
                    return Some((Prefix::new(addr.masked(bits), bits), value));
                }
                Some(Child::Leaf { prefix, value }) => {
                    if prefix.contains_addr(addr) {
                        return Some((*prefix, value));
                    }
                    break;
                }
                Some(Child::Node(n)) => {
                    cur = n;
                    depth += 1;
                }
            }
        }
        let mut d = depth as i32;
        while d >= 0 {
            let n = stack[d as usize].unwrap();
            if !n.prefixes.is_empty() {
                let probe = host_idx(octets[d as usize]);
                if let Some(top) = n.prefixes.intersection_top(&BACKTRACKING_BITSET[probe as usize]) {
                    let idx = top as u8;
                    let bits = pfx_len_of(d as u8, idx);
                    let value = n.prefixes.must_get(idx);
                    return Some((Prefix::new(addr.masked(bits), bits), value));
                }
            }
            d -= 1;
        }
        None
    }

    /// Longest-prefix match bounded by `pfx.bits`: the result's length is
    /// never longer than the query's.
    pub fn lookup_prefix(&self, pfx: &Prefix) -> Option<(Prefix, &V)> {
        self.lookup_prefix_impl(pfx, false)
    }

    /// Same result as `lookup_prefix`, but always reconstructs the matched
    /// prefix from its base-index rather than taking the `Leaf`/`Fringe`
    /// forward-phase short-circuit. Slower; useful when callers want a
    /// uniform reconstruction path regardless of how the match was found.
    pub fn lookup_prefix_lpm(&self, pfx: &Prefix) -> Option<(Prefix, &V)> {
        self.lookup_prefix_impl(pfx, true)
    }

    fn lookup_prefix_impl(&self, pfx: &Prefix, always_reconstruct: bool) -> Option<(Prefix, &V)> {
        let (max_depth, last_bits) = max_depth_and_last_bits(pfx.bits);
        let octets = pfx.addr.as_octets();
        let mut stack: [Option<&Node<V>>; 16] = [None; 16];
        let mut cur = self;
        let mut depth = 0u8;
        loop {
            stack[depth as usize] = Some(cur);
            if depth == max_depth {
                break;
            }
            let octet = octets[depth as usize];
            match cur.children.get(octet) {
                None => break,
                Some(Child::Fringe { value }) => {
                    let bits = (depth + 1) * 8;
                    if bits <= pfx.bits {
                        if always_reconstruct {
                            let p = Prefix::new(pfx.addr.masked(bits), bits);
                            return Some((p, value));
                        }
                        return Some((Prefix::new(pfx.addr.masked(bits), bits), value));
                    }
                    break;
                }
                Some(Child::Leaf { prefix, value }) => {
                    if prefix.bits <= pfx.bits && prefix.contains_addr(&pfx.addr) {
                        if always_reconstruct {
                            let p = Prefix::new(pfx.addr.masked(prefix.bits), prefix.bits);
                            return Some((p, value));
                        }
                        return Some((*prefix, value));
                    }
                    break;
                }
                Some(Child::Node(n)) => {
                    cur = n;
                    depth += 1;
                }
            }
        }
        let mut d = depth as i32;
        while d >= 0 {
            let n = stack[d as usize].unwrap();
            if !n.prefixes.is_empty() {
                let probe: u16 = if (d as u8) == max_depth {
                    pfx_to_idx(octets[d as usize], last_bits) as u16
                } else {
                    host_idx(octets[d as usize])
                };
                if let Some(top) = n.prefixes.intersection_top(&BACKTRACKING_BITSET[probe as usize]) {
                    let idx = top as u8;
                    let bits = pfx_len_of(d as u8, idx);
                    let value = n.prefixes.must_get(idx);
                    return Some((Prefix::new(pfx.addr.masked(bits), bits), value));
                }
            }
            d -= 1;
        }
        None
    }

    //--------- overlap tests ----------------------------------------------

    fn overlaps_idx(&self, idx: u8) -> bool {
        if self.prefixes.intersects_any(&BACKTRACKING_BITSET[idx as usize]) {
            return true;
        }
        if IDX_TO_PREFIX_ROUTES[idx as usize].intersects_any(self.prefixes.bitset()) {
            return true;
        }
        IDX_TO_FRINGE_ROUTES[idx as usize].intersects_any(self.children.bitset())
    }

    /// Whether any stored prefix overlaps (contains or is contained by) `pfx`.
    pub fn overlaps_prefix_at_depth(&self, pfx: &Prefix, depth: u8) -> bool {
        let (max_depth, last_bits) = max_depth_and_last_bits(pfx.bits);
        let octets = pfx.addr.as_octets();
        if depth == max_depth {
            let idx = pfx_to_idx(octets[depth as usize], last_bits);
            return self.overlaps_idx(idx);
        }
        let octet = octets[depth as usize];
        if !self.prefixes.is_empty() && self.overlaps_idx_host(octets[depth as usize]) {
            return true;
        }
        match self.children.get(octet) {
            None => false,
            Some(Child::Fringe { .. }) => true,
            Some(Child::Leaf { prefix, .. }) => prefix.overlaps(pfx),
            Some(Child::Node(n)) => n.overlaps_prefix_at_depth(pfx, depth + 1),
        }
    }

    fn overlaps_idx_host(&self, octet: u8) -> bool {
        self.prefixes.intersects_any(&BACKTRACKING_BITSET[host_idx(octet) as usize])
    }

    /// Whether any prefix stored in `self` overlaps any prefix stored in `other`.
    pub fn overlaps(&self, other: &Node<V>) -> bool {
        self.overlaps_at_depth(other, 0)
    }

    fn overlaps_at_depth(&self, other: &Node<V>, depth: u8) -> bool {
        if self.prefixes.bitset().intersects_any(other.prefixes.bitset()) {
            return true;
        }
        for (idx, _) in self.prefixes.iter() {
            if other.overlaps_idx(idx) {
                return true;
            }
        }
        for (idx, _) in other.prefixes.iter() {
            if self.overlaps_idx(idx) {
                return true;
            }
        }
        for (octet, child) in self.children.iter() {
            if let Some(other_child) = other.children.get(octet) {
                if Self::overlaps_two_children(child, other_child, depth + 1) {
                    return true;
                }
            }
        }
        false
    }

    /// `depth` is the trie depth of the two children being compared (i.e.
    /// one past the node that holds them), needed so a `Leaf`'s absolute
    /// prefix is matched against the right octet when recursing into a
    /// `Node` on the other side.
    fn overlaps_two_children(a: &Child<V>, b: &Child<V>, depth: u8) -> bool {
        match (a, b) {
            (Child::Node(na), Child::Node(nb)) => na.overlaps_at_depth(nb, depth),
            (Child::Node(n), Child::Leaf { prefix, .. }) | (Child::Leaf { prefix, .. }, Child::Node(n)) => {
                n.overlaps_prefix_at_depth(prefix, depth)
            }
            (Child::Leaf { prefix: pa, .. }, Child::Leaf { prefix: pb, .. }) => pa.overlaps(pb),
            (Child::Fringe { .. }, _) | (_, Child::Fringe { .. }) => true,
        }
    }

    //--------- union --------------------------------------------------------

    /// Merge `other` into `self` in place, cloning payloads. Returns the
    /// number of keys present in both tries (duplicates, resolved in favor
    /// of `other`). `depth` is the trie depth of `self`/`other` themselves
    /// (0 at the root), so it can be threaded one level deeper into any
    /// node freshly created or descended into below.
    pub fn union_rec(&mut self, other: &Node<V>, depth: u8) -> u32
    where
        V: Clone,
    {
        let mut duplicates = 0u32;
        for (idx, v) in other.prefixes.iter() {
            if !self.prefixes.insert_at(idx, v.clone()) {
                duplicates += 1;
            }
        }
        for (octet, other_child) in other.children.iter() {
            duplicates += self.union_child(octet, other_child, depth);
        }
        duplicates
    }

    /// `depth` is the trie depth of the node holding these children (i.e.
    /// the same `self` as `union_rec`'s caller); children one level deeper
    /// are always reached with `depth + 1`.
    fn union_child(&mut self, octet: u8, other_child: &Child<V>, depth: u8) -> u32
    where
        V: Clone,
    {
        if self.children.get(octet).is_none() {
            self.children.insert_at(octet, other_child.clone());
            return 0;
        }
        match (self.children.get(octet), other_child) {
            (Some(Child::Node(_)), Child::Node(ob)) => {
                let ob = ob.as_ref().clone();
                match self.children.get_mut(octet) {
                    Some(Child::Node(n)) => n.union_rec(&ob, depth + 1),
                    _ => unreachable!(),
                }
            }
            (Some(Child::Node(_)), Child::Leaf { prefix, value }) => {
                let inserted = match self.children.get_mut(octet) {
                    Some(Child::Node(n)) => n.insert_at_depth(prefix, value.clone(), depth + 1),
                    _ => unreachable!(),
                };
                if inserted {
                    0
                } else {
                    1
                }
            }
            (Some(Child::Node(_)), Child::Fringe { value }) => {
                let created = match self.children.get_mut(octet) {
                    Some(Child::Node(n)) => n.prefixes.insert_at(1, value.clone()),
                    _ => unreachable!(),
                };
                if created {
                    0
                } else {
                    1
                }
            }
            (Some(Child::Leaf { prefix: sp, .. }), Child::Leaf { prefix: op, value: ov }) => {
                if *sp == *op {
                    if let Some(Child::Leaf { value, .. }) = self.children.get_mut(octet) {
                        *value = ov.clone();
                    }
                    1
                } else {
                    let mut new_node = Node::new();
                    if let Some(Child::Leaf { prefix, value }) = self.children.delete_at(octet) {
                        new_node.insert_at_depth(&prefix, value, depth + 1);
                    }
                    new_node.insert_at_depth(op, ov.clone(), depth + 1);
                    self.children.insert_at(octet, Child::Node(Box::new(new_node)));
                    0
                }
            }
            (Some(Child::Leaf { .. }), Child::Node(ob)) => {
                let ob = ob.as_ref().clone();
                let mut new_node = Node::new();
                if let Some(Child::Leaf { prefix, value }) = self.children.delete_at(octet) {
                    new_node.insert_at_depth(&prefix, value, depth + 1);
                }
                let dup = new_node.union_rec(&ob, depth + 1);
                self.children.insert_at(octet, Child::Node(Box::new(new_node)));
                dup
            }
            (Some(Child::Leaf { .. }), Child::Fringe { value }) => {
                let mut new_node = Node::new();
                if let Some(Child::Leaf { prefix, value }) = self.children.delete_at(octet) {
                    new_node.insert_at_depth(&prefix, value, depth + 1);
                }
                new_node.prefixes.insert_at(1, value.clone());
                self.children.insert_at(octet, Child::Node(Box::new(new_node)));
                0
            }
            (Some(Child::Fringe { .. }), Child::Fringe { value }) => {
                if let Some(Child::Fringe { value: v }) = self.children.get_mut(octet) {
                    *v = value.clone();
                }
                1
            }
            (Some(Child::Fringe { .. }), Child::Node(ob)) => {
                let ob = ob.as_ref().clone();
                let mut new_node = Node::new();
                if let Some(Child::Fringe { value }) = self.children.delete_at(octet) {
                    new_node.prefixes.insert_at(1, value);
                }
                let dup = new_node.union_rec(&ob, depth + 1);
                self.children.insert_at(octet, Child::Node(Box::new(new_node)));
                dup
            }
            (Some(Child::Fringe { .. }), Child::Leaf { prefix, value }) => {
                let mut new_node = Node::new();
                if let Some(Child::Fringe { value }) = self.children.delete_at(octet) {
                    new_node.prefixes.insert_at(1, value);
                }
                new_node.insert_at_depth(prefix, value.clone(), depth + 1);
                self.children.insert_at(octet, Child::Node(Box::new(new_node)));
                0
            }
            (None, _) => unreachable!("handled above"),
        }
    }
}

/// Rebuild an `IPAddr` of the same family as `origin`, sharing `origin`'s
/// octets except as overridden in `octets`.
fn rebuild_addr(origin: &IPAddr, octets: &[u8]) -> IPAddr {
    match origin {
        IPAddr::V4(_) => {
            let mut a = [0u8; 4];
            a.copy_from_slice(&octets[..4]);
            IPAddr::V4(a)
        }
        IPAddr::V6(_) => {
            let mut a = [0u8; 16];
            a.copy_from_slice(&octets[..16]);
            IPAddr::V6(a)
        }
    }
}

/// Rebuild an absolute `Prefix` from a base-index found at `node_depth`
/// within the same trie path as `origin` -- valid only because the node
/// holding `idx` was reached by walking `origin`'s own octets.
fn reconstruct_prefix(origin: &Prefix, node_depth: u8, idx: u8) -> Prefix {
    use crate::base_index::idx_to_pfx;
    let (octet_partial, pfx_len_in_stride) = idx_to_pfx(idx);
    let bits = node_depth * 8 + pfx_len_in_stride;
    let mut octets = origin.addr.as_octets().to_vec();
    octets[node_depth as usize] = octet_partial;
    let addr = rebuild_addr(&origin.addr, &octets);
    Prefix::new(addr, bits).masked()
}

/// Rebuild the absolute `Prefix` implied by a `Fringe` found at child key
/// `child_octet` of the node reached at `node_depth` within `origin`'s own
/// trie path -- valid for the same reason `reconstruct_prefix` is.
fn reconstruct_fringe_prefix(origin: &Prefix, node_depth: u8, child_octet: u8) -> Prefix {
    let bits = (node_depth + 1) * 8;
    let mut octets = origin.addr.as_octets().to_vec();
    octets[node_depth as usize] = child_octet;
    let addr = rebuild_addr(&origin.addr, &octets);
    Prefix::new(addr, bits).masked()
}
