use std::collections::HashMap;

use indirect_chain::{Advancer, Chain, ChainError, Direction, NodeKind};
use rand_xoshiro::{
    rand_core::{RngCore, SeedableRng},
    Xoshiro128StarStar,
};
use testcrate::{payloads, P0};

macro_rules! next_inx {
    ($rng:ident, $len:expr) => {
        $rng.next_u32() as usize % $len
    };
}

#[test]
fn fuzz_chain() {
    let mut rng = Xoshiro128StarStar::seed_from_u64(0);

    // unique id for checking that the correct elements are returned
    let mut counter = 0u64;
    let mut new_t = || {
        counter += 1;
        counter
    };

    let mut a: Chain<P0, u64> = Chain::new();
    let initial = a.insert_initial();
    let terminal = a.insert_terminal();
    a.link(initial, terminal).unwrap();

    // the attached interior in order, and the orphans
    let mut list: Vec<u64> = vec![];
    let mut orphans: Vec<u64> = vec![];
    let mut b: HashMap<u64, P0> = HashMap::new();

    // the nodes on either side of position `i` of `list`
    let neighbors = |list: &[u64], b: &HashMap<u64, P0>, i: usize| {
        let prev = if i == 0 { initial } else { b[&list[i - 1]] };
        let next = if i == list.len() { terminal } else { b[&list[i]] };
        (prev, next)
    };

    let mut max_len = 0;
    for _ in 0..10_000 {
        if let Err(e) = Chain::_check_invariants(&a) {
            panic!("{e}");
        }
        assert_eq!(a.len(), 2 + list.len() + orphans.len());
        assert_eq!(a.holders_len(), 2 + 2 * (list.len() + orphans.len()));
        assert_eq!(payloads(&a, initial, Direction::Forward), list);
        let mut rev = list.clone();
        rev.reverse();
        assert_eq!(payloads(&a, terminal, Direction::Reverse), rev);
        for t in &list {
            assert!(a.is_attached(b[t]));
        }
        for t in &orphans {
            assert!(!a.is_attached(b[t]));
        }
        max_len = max_len.max(list.len());

        let len = list.len();
        match rng.next_u32() % 100 {
            0..=29 => {
                // insert a new node anywhere
                let t = new_t();
                let i = next_inx!(rng, len + 1);
                let (prev, next) = neighbors(&list, &b, i);
                let p = a.insert(t);
                a.link(prev, p).unwrap();
                a.link(p, next).unwrap();
                list.insert(i, t);
                b.insert(t, p);
            }
            30..=49 => {
                // unlink
                if len != 0 {
                    let t = list.remove(next_inx!(rng, len));
                    a.unlink(b[&t]).unwrap();
                    orphans.push(t);
                } else {
                    assert_eq!(a.unlink(initial), Err(ChainError::BoundaryNode));
                }
            }
            50..=59 => {
                // remove an orphan, attached nodes cannot be removed
                if !orphans.is_empty() {
                    let t = orphans.swap_remove(next_inx!(rng, orphans.len()));
                    let p = b.remove(&t).unwrap();
                    assert_eq!(a.remove(p), Ok(NodeKind::Interior(t)));
                    assert!(!a.contains(p));
                } else if len != 0 {
                    let t = list[next_inx!(rng, len)];
                    assert_eq!(a.remove(b[&t]), Err(ChainError::StillAttached));
                }
            }
            60..=69 => {
                // relink an orphan somewhere else
                if !orphans.is_empty() {
                    let t = orphans.swap_remove(next_inx!(rng, orphans.len()));
                    let i = next_inx!(rng, len + 1);
                    let (prev, next) = neighbors(&list, &b, i);
                    a.link(prev, b[&t]).unwrap();
                    a.link(b[&t], next).unwrap();
                    list.insert(i, t);
                }
            }
            70..=79 => {
                // unlink the anchor at a random point of a traversal, in either direction
                let reverse = (rng.next_u32() & 1) == 1;
                let (start, direction) = if reverse {
                    (terminal, Direction::Reverse)
                } else {
                    (initial, Direction::Forward)
                };
                let mut expected = list.clone();
                if reverse {
                    expected.reverse();
                }
                let mut yielded = vec![];
                let mut adv = a.advancer(start, direction);
                while let Some(p) = adv.advance(&a) {
                    let p = p.unwrap();
                    let t = *a[p].t().unwrap();
                    yielded.push(t);
                    if (rng.next_u32() % 16) == 0 {
                        a.unlink(p).unwrap();
                        list.retain(|x| *x != t);
                        orphans.push(t);
                    }
                }
                // removals of the anchor never change what is yielded
                assert_eq!(yielded, expected);
            }
            80..=89 => {
                // unlink a node ahead of the anchor during a traversal
                if len >= 2 {
                    let i = next_inx!(rng, len - 1);
                    let j = i + 1 + next_inx!(rng, len - 1 - i);
                    let skipped = list[j];
                    let mut expected = list.clone();
                    expected.remove(j);
                    let mut yielded = vec![];
                    let mut adv = a.advancer(initial, Direction::Forward);
                    while let Some(p) = adv.advance(&a) {
                        let p = p.unwrap();
                        yielded.push(*a[p].t().unwrap());
                        if yielded.len() == i + 1 {
                            a.unlink(b[&skipped]).unwrap();
                        }
                    }
                    assert_eq!(yielded, expected);
                    list.remove(j);
                    orphans.push(skipped);
                }
            }
            90..=98 => {
                // `unlink_by`
                let mut unlinked = vec![];
                let n = a
                    .unlink_by(initial, Direction::Forward, |_, t| {
                        if (rng.next_u32() % 32) == 0 {
                            unlinked.push(*t);
                            true
                        } else {
                            false
                        }
                    })
                    .unwrap();
                assert_eq!(n, unlinked.len());
                list.retain(|t| !unlinked.contains(t));
                orphans.extend_from_slice(&unlinked);
            }
            _ => {
                // freeing the orphans
                for t in orphans.drain(..) {
                    let p = b.remove(&t).unwrap();
                    assert_eq!(a.remove(p).map(NodeKind::into_t), Ok(Some(t)));
                }
            }
        }
    }
    // makes sure there is not some problem with the test harness itself
    assert!(max_len > 4);

    let len = list.len();
    assert_eq!(a.remove_chain(initial), Ok(len + 2));
    assert_eq!(a.len(), orphans.len());
    assert_eq!(a.holders_len(), 2 * orphans.len());
    for t in orphans {
        let p = b[&t];
        assert!(!a.is_attached(p));
        assert_eq!(a.remove(p).map(NodeKind::into_t), Ok(Some(t)));
    }
    assert!(a.is_empty());
    assert_eq!(a.holders_len(), 0);
    if let Err(e) = Chain::_check_invariants(&a) {
        panic!("{e}");
    }
}
