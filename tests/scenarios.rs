use rotonda_store::{IPAddr, Prefix, Table};

mod common {
    use std::io::Write;

    pub fn init() {
        let _ = env_logger::builder()
            .format(|buf, record| writeln!(buf, "{}", record.args()))
            .is_test(true)
            .try_init();
    }
}

fn v4(a: u8, b: u8, c: u8, d: u8) -> IPAddr {
    IPAddr::V4([a, b, c, d])
}

fn pfx(a: u8, b: u8, c: u8, d: u8, bits: u8) -> Prefix {
    Prefix::new(v4(a, b, c, d), bits)
}

#[test]
fn s1_exact_and_lpm_miss() {
    common::init();
    let mut t: Table<u32> = Table::new();
    t.insert(&pfx(192, 168, 0, 1, 32), 1);

    let (p, v) = t.lookup(&v4(192, 168, 0, 1)).unwrap();
    assert_eq!(p.bits, 32);
    assert_eq!(*v, 1);
    assert!(t.lookup(&v4(192, 168, 0, 2)).is_none());
    assert_eq!(t.get(&pfx(192, 168, 0, 1, 32)), Some(&1));
}

#[test]
fn s2_path_explosion() {
    common::init();
    let mut t: Table<u32> = Table::new();
    t.insert(&pfx(192, 168, 0, 1, 32), 1);
    t.insert(&pfx(192, 168, 0, 2, 32), 2);
    t.insert(&pfx(192, 168, 0, 0, 26), 7);
    t.insert(&pfx(0, 0, 0, 0, 0), 6);

    assert_eq!(*t.lookup(&v4(192, 168, 0, 1)).unwrap().1, 1);
    assert_eq!(*t.lookup(&v4(192, 168, 0, 2)).unwrap().1, 2);
    assert_eq!(*t.lookup(&v4(192, 168, 0, 3)).unwrap().1, 7);
    assert_eq!(*t.lookup(&v4(192, 168, 0, 255)).unwrap().1, 6);
    assert_eq!(*t.lookup(&v4(10, 0, 0, 5)).unwrap().1, 6);
}

#[test]
fn s3_delete_returns_table_to_empty() {
    common::init();
    let mut t: Table<u32> = Table::new();
    t.insert(&pfx(10, 0, 0, 0, 8), 1);
    assert_eq!(t.size(), 1);
    assert_eq!(t.delete(&pfx(10, 0, 0, 0, 8)), Some(1));
    assert_eq!(t.size(), 0);
    assert!(t.lookup(&v4(10, 0, 0, 1)).is_none());
}

#[test]
fn s4_non_canonical_probe() {
    common::init();
    let mut t: Table<u32> = Table::new();
    t.insert(&pfx(10, 20, 30, 0, 24), 1);

    let hit = t.lookup_prefix(&Prefix::new(v4(10, 20, 30, 40), 25));
    assert_eq!(hit.map(|(p, v)| (p.bits, *v)), Some((24, 1)));

    assert!(t.lookup_prefix(&Prefix::new(v4(10, 20, 30, 40), 23)).is_none());
}

#[test]
fn s5_overlap_edges() {
    common::init();
    let mut t: Table<u32> = Table::new();
    assert!(!t.overlaps_prefix(&pfx(0, 0, 0, 0, 0)));

    t.insert(&pfx(10, 0, 0, 0, 9), 1);
    assert!(t.overlaps_prefix(&pfx(0, 0, 0, 0, 0)));
    assert!(t.overlaps_prefix(&pfx(10, 1, 2, 3, 32)));
    assert!(!t.overlaps_prefix(&pfx(11, 0, 0, 0, 8)));
}

#[test]
fn s6_persist_isolation() {
    common::init();
    let a: Table<u32> = Table::new();
    let v6_pfx = Prefix::new(
        IPAddr::V6([0x20, 0x01, 0x0d, 0xb8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
        32,
    );
    let b = a.insert_persist(&v6_pfx, 2);

    let mut a = a;
    a.insert(&v6_pfx, 99);

    assert_eq!(b.get(&v6_pfx), Some(&2));
    assert_eq!(a.get(&v6_pfx), Some(&99));
}
