use indirect_chain::{ptr_struct, Chain, Direction};

ptr_struct!(P0);

/// A chain `initial -> interior[0] -> ... -> interior[n - 1] -> terminal`
/// where the payload of `interior[i]` is `i`
pub struct StdChain {
    pub chain: Chain<P0, u64>,
    pub initial: P0,
    pub interior: Vec<P0>,
    pub terminal: P0,
}

pub fn std_chain(n: u64) -> StdChain {
    let mut chain = Chain::new();
    let initial = chain.insert_initial();
    let terminal = chain.insert_terminal();
    let mut interior = vec![];
    let mut prev = initial;
    for i in 0..n {
        let p = chain.insert(i);
        chain.link(prev, p).unwrap();
        interior.push(p);
        prev = p;
    }
    chain.link(prev, terminal).unwrap();
    StdChain {
        chain,
        initial,
        interior,
        terminal,
    }
}

/// Collects the `Ptr`s of a full traversal, panicking on traversal errors
pub fn ptrs(chain: &Chain<P0, u64>, start: P0, direction: Direction) -> Vec<P0> {
    chain
        .iter(start, direction)
        .map(|res| res.unwrap().0)
        .collect()
}

/// Collects the payloads of a full traversal, panicking on traversal errors
pub fn payloads(chain: &Chain<P0, u64>, start: P0, direction: Direction) -> Vec<u64> {
    chain
        .iter(start, direction)
        .map(|res| *res.unwrap().1.t().unwrap())
        .collect()
}
