//! Builds `initial -> data1! -> data2! -> data3! -> terminal`, removes
//! `data1!` while the traversal is anchored on it, then walks back from the
//! terminal. Set `RUST_LOG=info` to see the orphan lifecycle, or `debug` (or
//! `trace`) to also see the holder rewrites.

use indirect_chain::{Advancer, Chain, ChainError, Direction};
use testcrate::P0;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), ChainError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut chain: Chain<P0, &str> = Chain::new();
    let initial = chain.insert_initial();
    let data1 = chain.insert("data1!");
    let data2 = chain.insert("data2!");
    let data3 = chain.insert("data3!");
    let terminal = chain.insert_terminal();

    chain.link(initial, data1)?;
    chain.link(data1, data2)?;
    chain.link(data2, data3)?;
    chain.link(data3, terminal)?;

    println!("Forward iteration (delete data1):");
    let mut adv = chain.advancer(initial, Direction::Forward);
    while let Some(p) = adv.advance(&chain) {
        let p = p?;
        let data = chain.get(p).and_then(|node| node.t().copied()).unwrap_or("");
        if data == "data1!" {
            println!("  removing : {data}");
            chain.unlink(p)?;
            info!(?p, next = ?chain.next(p), "unlinked the anchor, traversal continues");
        } else {
            println!("  -  {data}");
        }
    }

    println!("\nReverse iteration (terminal -> link1):");
    for res in chain.iter(terminal, Direction::Reverse) {
        let (_, node) = res?;
        println!("  -  {}", node.t().copied().unwrap_or(""));
    }

    let data1 = chain.remove(data1)?;
    info!(?data1, len = chain.len(), "freed the orphan");
    Ok(())
}
