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
fn overlap_is_symmetric_between_tables() {
    common::init();
    let mut a: Table<u32> = Table::new();
    let mut b: Table<u32> = Table::new();
    a.insert(&pfx(10, 0, 0, 0, 8), 1);
    b.insert(&pfx(10, 1, 0, 0, 16), 2);

    assert!(a.overlaps(&b));
    assert!(b.overlaps(&a));

    let mut c: Table<u32> = Table::new();
    c.insert(&pfx(11, 0, 0, 0, 8), 3);
    assert!(!a.overlaps(&c));
    assert!(!c.overlaps(&a));
}

#[test]
fn disjoint_tables_do_not_overlap() {
    common::init();
    let mut a: Table<u32> = Table::new();
    let mut b: Table<u32> = Table::new();
    a.insert(&pfx(192, 168, 0, 0, 24), 1);
    b.insert(&pfx(10, 0, 0, 0, 8), 2);
    assert!(!a.overlaps(&b));
}

#[test]
fn nested_leaves_overlap_at_any_depth() {
    common::init();
    let mut a: Table<u32> = Table::new();
    let mut b: Table<u32> = Table::new();
    a.insert(&pfx(1, 2, 3, 4, 32), 1);
    b.insert(&pfx(1, 2, 3, 0, 24), 2);
    assert!(a.overlaps(&b));
    assert!(b.overlaps(&a));
}
