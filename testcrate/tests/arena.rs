use indirect_chain::{utils::Arena, ChainError, Holder, Ptr};
use testcrate::P0;

fn check(a: &Arena<P0, u64>) {
    if let Err(e) = Arena::_check_invariants(a) {
        panic!("{e}");
    }
}

#[test]
fn arena_reuse_and_generations() {
    let mut a: Arena<P0, u64> = Arena::new();
    assert_eq!(a.gen().get(), 2);
    assert!(a.is_empty());
    let p0 = a.insert(0);
    let p1 = a.insert(1);
    let p2 = a.insert(2);
    check(&a);
    assert_eq!(a.len(), 3);
    assert_eq!(a.get(p1), Some(&1));

    assert_eq!(a.remove(p1), Some(1));
    assert_eq!(a.gen().get(), 3);
    assert_eq!(a.remove(p1), None);
    check(&a);
    assert!(!a.contains(p1));

    // the freed entry is reused with a newer generation
    let p3 = a.insert(3);
    assert_eq!(p3.inx(), p1.inx());
    assert_ne!(p3, p1);
    assert!(a.get(p1).is_none());
    assert_eq!(a.get(p3), Some(&3));
    assert_eq!(a.capacity(), 3);
    check(&a);

    *a.get_mut(p2).unwrap() = 20;
    let v: Vec<(P0, u64)> = a.iter().map(|(p, t)| (p, *t)).collect();
    assert_eq!(v, [(p0, 0), (p3, 3), (p2, 20)]);

    assert!(a.get(P0::invalid()).is_none());
    assert_eq!(a.remove(P0::invalid()), None);

    a.clear();
    check(&a);
    assert!(a.is_empty());
    assert!(!a.contains(p0));
    let p4 = a.insert(4);
    assert_eq!(p4.inx(), p0.inx());
    assert_ne!(p4, p0);
}

#[test]
fn arena_freelist() {
    let mut a: Arena<P0, u64> = Arena::new();
    let ptrs: Vec<P0> = (0..8).map(|i| a.insert(i)).collect();
    for p in ptrs.iter().step_by(2) {
        a.remove(*p).unwrap();
        check(&a);
    }
    assert_eq!(a.len(), 4);
    for i in 0..6 {
        a.insert(i);
        check(&a);
    }
    assert_eq!(a.len(), 10);
    assert_eq!(a.capacity(), 10);
}

#[test]
fn holder() {
    let mut h: Holder<P0> = Holder::default();
    assert!(h.is_empty());
    assert_eq!(h.get(), Err(ChainError::EmptyHolder));
    let mut a: Arena<P0, u64> = Arena::new();
    let p0 = a.insert(0);
    let p1 = a.insert(1);
    h.set(p0);
    assert_eq!(h.get(), Ok(p0));
    h.set(p1);
    assert_eq!(h.get(), Ok(p1));
    assert_eq!(Holder::new(p1), h);
}
