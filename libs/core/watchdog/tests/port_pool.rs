// [libs/core/watchdog/tests/port_pool.rs]
use aegis_core_watchdog::PortPool;

#[test]
fn acquire_hands_out_distinct_ports_until_exhausted() {
    let pool = PortPool::new(42382..=42384);
    let a = pool.acquire().unwrap();
    let b = pool.acquire().unwrap();
    let c = pool.acquire().unwrap();
    assert_ne!(a, b);
    assert_ne!(b, c);
    assert!(pool.acquire().is_err());
}

#[test]
fn released_port_becomes_available_again() {
    let pool = PortPool::new(42382..=42382);
    let port = pool.acquire().unwrap();
    assert!(pool.acquire().is_err());
    pool.release(port);
    assert_eq!(pool.acquire().unwrap(), port);
}
