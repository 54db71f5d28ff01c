#![feature(test)]

extern crate test;

use indirect_chain::{Advancer, Direction};
use test::Bencher;
use testcrate::std_chain;

const N: u64 = 1 << 12;

#[bench]
fn build(bencher: &mut Bencher) {
    bencher.iter(|| std_chain(N))
}

#[bench]
fn traverse(bencher: &mut Bencher) {
    let s = std_chain(N);
    bencher.iter(|| {
        let mut sum = 0u64;
        let mut adv = s.chain.advancer(s.initial, Direction::Forward);
        while let Some(p) = adv.advance(&s.chain) {
            sum = sum.wrapping_add(*s.chain[p.unwrap()].t().unwrap());
        }
        sum
    })
}

#[bench]
fn unlink_during_traversal(bencher: &mut Bencher) {
    bencher.iter(|| {
        let mut s = std_chain(N);
        s.chain
            .unlink_by(s.initial, Direction::Forward, |_, t| (*t % 3) == 0)
            .unwrap()
    })
}
