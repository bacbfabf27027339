use crate::prefix::{IPAddr, Prefix};
use crate::table::Table;

//------------ Lite -------------------------------------------------------

/// An ACL-flavored view over `Table<()>`: prefixes carry no payload, so the
/// API is renamed to boolean membership tests instead of value lookups.
/// `update`/`get_and_delete` and their `_persist` counterparts are not
/// forwarded here -- there is no payload for them to operate on, so there
/// is nothing to call rather than a stub that could panic.
#[derive(Clone, Default)]
pub struct Lite {
    inner: Table<()>,
}

impl Lite {
    pub fn new() -> Self {
        Self { inner: Table::new() }
    }

    pub fn insert(&mut self, pfx: &Prefix) {
        self.inner.insert(pfx, ());
    }

    pub fn delete(&mut self, pfx: &Prefix) -> bool {
        self.inner.delete(pfx).is_some()
    }

    pub fn exists(&self, pfx: &Prefix) -> bool {
        self.inner.get(pfx).is_some()
    }

    pub fn contains(&self, addr: &IPAddr) -> bool {
        self.inner.lookup(addr).is_some()
    }

    pub fn contains_prefix(&self, pfx: &Prefix) -> bool {
        self.inner.lookup_prefix(pfx).is_some()
    }

    pub fn overlaps_prefix(&self, pfx: &Prefix) -> bool {
        self.inner.overlaps_prefix(pfx)
    }

    pub fn overlaps(&self, other: &Lite) -> bool {
        self.inner.overlaps(&other.inner)
    }

    pub fn union_with(&mut self, other: &Lite) {
        self.inner.union_with(&other.inner);
    }

    pub fn size(&self) -> usize {
        self.inner.size()
    }

    pub fn insert_persist(&self, pfx: &Prefix) -> Lite {
        Lite { inner: self.inner.insert_persist(pfx, ()) }
    }

    pub fn delete_persist(&self, pfx: &Prefix) -> Lite {
        Lite { inner: self.inner.delete_persist(pfx) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v4(a: u8, b: u8, c: u8, d: u8) -> IPAddr {
        IPAddr::V4([a, b, c, d])
    }

    #[test]
    fn exists_and_contains() {
        let mut l = Lite::new();
        l.insert(&Prefix::new(v4(10, 0, 0, 0), 8));
        assert!(l.exists(&Prefix::new(v4(10, 0, 0, 0), 8)));
        assert!(l.contains(&v4(10, 1, 2, 3)));
        assert!(!l.contains(&v4(11, 0, 0, 0)));
    }

    #[test]
    fn delete_reports_presence() {
        let mut l = Lite::new();
        let p = Prefix::new(v4(1, 2, 3, 4), 32);
        assert!(!l.delete(&p));
        l.insert(&p);
        assert!(l.delete(&p));
        assert_eq!(l.size(), 0);
    }
}
