use crate::node::Node;
use crate::prefix::{IPAddr, Prefix};

//------------ Table ------------------------------------------------------

/// A dual-stack routing table: independent v4 and v6 tries sharing one API.
/// Every method canonicalizes its input prefix before dispatching to the
/// matching root; `Node` itself trusts its caller to have already done so.
#[derive(Clone)]
pub struct Table<V> {
    root_v4: Node<V>,
    root_v6: Node<V>,
    size_v4: usize,
    size_v6: usize,
}

impl<V> Default for Table<V> {
    fn default() -> Self {
        Self { root_v4: Node::new(), root_v6: Node::new(), size_v4: 0, size_v6: 0 }
    }
}

impl<V> Table<V> {
    pub fn new() -> Self {
        Self::default()
    }

    fn root(&self, v4: bool) -> &Node<V> {
        if v4 {
            &self.root_v4
        } else {
            &self.root_v6
        }
    }

    fn root_mut(&mut self, v4: bool) -> &mut Node<V> {
        if v4 {
            &mut self.root_v4
        } else {
            &mut self.root_v6
        }
    }

    pub fn size(&self) -> usize {
        self.size_v4 + self.size_v6
    }

    pub fn size_v4(&self) -> usize {
        self.size_v4
    }

    pub fn size_v6(&self) -> usize {
        self.size_v6
    }

    /// Insert `v` at `pfx`. A no-op if `pfx` is not valid for its family.
    pub fn insert(&mut self, pfx: &Prefix, v: V) {
        if !pfx.is_valid() {
            return;
        }
        let canon = pfx.masked();
        let is_v4 = canon.addr.is_v4();
        let created = self.root_mut(is_v4).insert_at_depth(&canon, v, 0);
        if created {
            if is_v4 {
                self.size_v4 += 1;
            } else {
                self.size_v6 += 1;
            }
        }
    }

    pub fn get(&self, pfx: &Prefix) -> Option<&V> {
        if !pfx.is_valid() {
            return None;
        }
        let canon = pfx.masked();
        self.root(canon.addr.is_v4()).get(&canon)
    }

    pub fn get_mut(&mut self, pfx: &Prefix) -> Option<&mut V> {
        if !pfx.is_valid() {
            return None;
        }
        let canon = pfx.masked();
        let is_v4 = canon.addr.is_v4();
        self.root_mut(is_v4).get_mut(&canon)
    }

    pub fn delete(&mut self, pfx: &Prefix) -> Option<V> {
        self.get_and_delete(pfx)
    }

    pub fn get_and_delete(&mut self, pfx: &Prefix) -> Option<V> {
        if !pfx.is_valid() {
            return None;
        }
        let canon = pfx.masked();
        let is_v4 = canon.addr.is_v4();
        let removed = self.root_mut(is_v4).delete(&canon);
        if removed.is_some() {
            if is_v4 {
                self.size_v4 -= 1;
            } else {
                self.size_v6 -= 1;
            }
        }
        removed
    }

    /// Update the value at `pfx` via `f`, inserting `f(None)` if absent.
    /// Returns the newly written value, or `None` if `pfx` was invalid for
    /// its family.
    pub fn update(&mut self, pfx: &Prefix, f: impl FnOnce(Option<V>) -> V) -> Option<&V> {
        if !pfx.is_valid() {
            return None;
        }
        let new = match self.get_and_delete(pfx) {
            Some(old) => f(Some(old)),
            None => f(None),
        };
        self.insert(pfx, new);
        self.get(pfx)
    }

    pub fn lookup(&self, addr: &IPAddr) -> Option<(Prefix, &V)> {
        self.root(addr.is_v4()).lookup(addr)
    }

    pub fn lookup_prefix(&self, pfx: &Prefix) -> Option<(Prefix, &V)> {
        if !pfx.is_valid() {
            return None;
        }
        self.root(pfx.addr.is_v4()).lookup_prefix(&pfx.masked())
    }

    pub fn lookup_prefix_lpm(&self, pfx: &Prefix) -> Option<(Prefix, &V)> {
        if !pfx.is_valid() {
            return None;
        }
        self.root(pfx.addr.is_v4()).lookup_prefix_lpm(&pfx.masked())
    }

    pub fn overlaps_prefix(&self, pfx: &Prefix) -> bool {
        if !pfx.is_valid() {
            return false;
        }
        self.root(pfx.addr.is_v4()).overlaps_prefix_at_depth(&pfx.masked(), 0)
    }

    pub fn overlaps(&self, other: &Table<V>) -> bool {
        self.root_v4.overlaps(&other.root_v4) || self.root_v6.overlaps(&other.root_v6)
    }

    /// Merge `other`'s prefixes into `self`, cloning payloads. Duplicate
    /// keys resolve in favor of `other`.
    pub fn union_with(&mut self, other: &Table<V>)
    where
        V: Clone,
    {
        let dup_v4 = self.root_v4.union_rec(&other.root_v4, 0);
        let dup_v6 = self.root_v6.union_rec(&other.root_v6, 0);
        self.size_v4 = self.size_v4 + other.size_v4 - dup_v4 as usize;
        self.size_v6 = self.size_v6 + other.size_v6 - dup_v6 as usize;
        log::debug!(
            "union_with: merged {} v4 and {} v6 entries, {} duplicates",
            other.size_v4,
            other.size_v6,
            dup_v4 + dup_v6
        );
    }

    //--------- persistent (path-copy) variants --------------------------
    //
    // This revision's persistence policy (see DESIGN.md, Open Question A)
    // is a uniform deep clone: every `*_persist` call clones the whole
    // table up front and then mutates the independent copy with the
    // ordinary in-place operation above. Every node the operation touches
    // is, trivially, freshly allocated -- the clone is a superset of the
    // "affected path" the non-persistent contract requires.

    pub fn insert_persist(&self, pfx: &Prefix, v: V) -> Table<V>
    where
        V: Clone,
    {
        let mut next = self.clone();
        next.insert(pfx, v);
        next
    }

    pub fn delete_persist(&self, pfx: &Prefix) -> Table<V>
    where
        V: Clone,
    {
        let mut next = self.clone();
        next.delete(pfx);
        next
    }

    pub fn get_and_delete_persist(&self, pfx: &Prefix) -> Table<V>
    where
        V: Clone,
    {
        let mut next = self.clone();
        next.get_and_delete(pfx);
        next
    }

    pub fn update_persist(&self, pfx: &Prefix, f: impl FnOnce(Option<V>) -> V) -> Table<V>
    where
        V: Clone,
    {
        let mut next = self.clone();
        next.update(pfx, f);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v4(a: u8, b: u8, c: u8, d: u8) -> IPAddr {
        IPAddr::V4([a, b, c, d])
    }

    fn pfx(a: u8, b: u8, c: u8, d: u8, bits: u8) -> Prefix {
        Prefix::new(v4(a, b, c, d), bits)
    }

    #[test]
    fn insert_delete_round_trip() {
        let mut t: Table<u32> = Table::new();
        t.insert(&pfx(192, 168, 0, 1, 32), 1);
        assert_eq!(t.get(&pfx(192, 168, 0, 1, 32)), Some(&1));
        assert_eq!(t.size(), 1);
        assert_eq!(t.delete(&pfx(192, 168, 0, 1, 32)), Some(1));
        assert_eq!(t.size(), 0);
        assert_eq!(t.get(&pfx(192, 168, 0, 1, 32)), None);
    }

    #[test]
    fn non_canonical_insert_is_idempotent() {
        let mut a: Table<u32> = Table::new();
        let mut b: Table<u32> = Table::new();
        a.insert(&Prefix::new(v4(10, 1, 2, 3), 8), 1);
        b.insert(&Prefix::new(v4(10, 0, 0, 0), 8), 1);
        assert_eq!(a.get(&pfx(10, 0, 0, 0, 8)), b.get(&pfx(10, 0, 0, 0, 8)));
    }

    #[test]
    fn update_returns_new_value() {
        let mut t: Table<u32> = Table::new();
        assert_eq!(t.update(&pfx(10, 0, 0, 0, 8), |old| old.unwrap_or(0) + 1), Some(&1));
        assert_eq!(t.update(&pfx(10, 0, 0, 0, 8), |old| old.unwrap_or(0) + 1), Some(&2));
        assert_eq!(t.update(&pfx(1, 2, 3, 4, 33), |_| 0), None);
    }

    #[test]
    fn persist_isolates_receiver() {
        let a: Table<u32> = Table::new();
        let b = a.insert_persist(&pfx(10, 0, 0, 0, 8), 1);
        assert_eq!(a.get(&pfx(10, 0, 0, 0, 8)), None);
        assert_eq!(b.get(&pfx(10, 0, 0, 0, 8)), Some(&1));
    }

    #[test]
    fn overlaps_via_default_route() {
        let mut t: Table<u32> = Table::new();
        assert!(!t.overlaps_prefix(&pfx(0, 0, 0, 0, 0)));
        t.insert(&pfx(10, 0, 0, 0, 8), 1);
        assert!(t.overlaps_prefix(&pfx(0, 0, 0, 0, 0)));
    }

    #[test]
    fn size_tracks_v4_and_v6_independently() {
        let mut t: Table<u32> = Table::new();
        t.insert(&pfx(1, 2, 3, 4, 32), 1);
        t.insert(&Prefix::new(IPAddr::V6([0; 16]), 64), 2);
        assert_eq!(t.size_v4(), 1);
        assert_eq!(t.size_v6(), 1);
        assert_eq!(t.size(), 2);
    }
}
