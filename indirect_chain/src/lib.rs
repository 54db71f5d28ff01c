#![deny(unsafe_code)]
// false positives
#![allow(clippy::while_let_on_iterator)]

mod advancer;
mod arena;
mod chain;
pub mod chain_iterators;
mod error;
mod holder;
mod node;
mod ptr;
pub use advancer::Advancer;
pub use chain::Chain;
pub use chain_iterators::{ChainAdvancer, IterChain};
pub use error::ChainError;
pub use holder::{Holder, PHolder};
pub use node::{Direction, Node, NodeKind, Sentinel};
pub use ptr::Ptr;

extern crate alloc;

/// Internals exposed for white box testing
#[doc(hidden)]
pub mod utils {
    pub use crate::arena::Arena;
}
