use thiserror::Error;

/// Errors returned by the operations on a `Chain` and its `Holder`s.
///
/// Every operation validates its preconditions before its first write, so
/// when one of these is returned the chain is left exactly as it was.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainError {
    /// A holder was read before anything was ever stored in it
    #[error("holder read before it was ever set")]
    EmptyHolder,
    /// The node is missing its forward or backward holder, which is always the
    /// case for sentinels and for nodes that were never linked on that side
    #[error("node is missing a forward or backward holder")]
    BoundaryNode,
    /// A `Ptr` that does not point to a live node of this chain, or a holder
    /// that was freed along with its node
    #[error("pointer does not refer to a live node")]
    InvalidNode,
    /// `Chain::remove` was called on a node that a live neighbor still links to
    #[error("node is still attached to a neighbor")]
    StillAttached,
}
