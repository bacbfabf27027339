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
fn insert_persist_leaves_receiver_untouched() {
    common::init();
    let mut a: Table<u32> = Table::new();
    a.insert(&pfx(10, 0, 0, 0, 8), 1);

    let b = a.insert_persist(&pfx(192, 168, 0, 0, 16), 2);
    assert_eq!(a.get(&pfx(192, 168, 0, 0, 16)), None);
    assert_eq!(b.get(&pfx(192, 168, 0, 0, 16)), Some(&2));
    assert_eq!(b.get(&pfx(10, 0, 0, 0, 8)), Some(&1));
}

#[test]
fn delete_persist_leaves_receiver_untouched() {
    common::init();
    let mut a: Table<u32> = Table::new();
    a.insert(&pfx(10, 0, 0, 0, 8), 1);

    let b = a.delete_persist(&pfx(10, 0, 0, 0, 8));
    assert_eq!(a.get(&pfx(10, 0, 0, 0, 8)), Some(&1));
    assert_eq!(b.get(&pfx(10, 0, 0, 0, 8)), None);
}

#[test]
fn update_persist_matches_mutable_update() {
    common::init();
    let mut mutable: Table<u32> = Table::new();
    mutable.insert(&pfx(1, 1, 1, 0, 24), 5);
    mutable.update(&pfx(1, 1, 1, 0, 24), |old| old.unwrap_or(0) + 1);

    let persistent: Table<u32> = {
        let mut base: Table<u32> = Table::new();
        base.insert(&pfx(1, 1, 1, 0, 24), 5);
        base.update_persist(&pfx(1, 1, 1, 0, 24), |old| old.unwrap_or(0) + 1)
    };

    assert_eq!(mutable.get(&pfx(1, 1, 1, 0, 24)), persistent.get(&pfx(1, 1, 1, 0, 24)));
}

#[test]
fn chained_persist_calls_compose() {
    common::init();
    let a: Table<u32> = Table::new();
    let b = a.insert_persist(&pfx(10, 0, 0, 0, 8), 1);
    let c = b.insert_persist(&pfx(10, 0, 0, 0, 8), 2);

    assert_eq!(a.size(), 0);
    assert_eq!(b.get(&pfx(10, 0, 0, 0, 8)), Some(&1));
    assert_eq!(c.get(&pfx(10, 0, 0, 0, 8)), Some(&2));
}
