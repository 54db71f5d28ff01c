use alloc::vec::Vec;
use core::{borrow::Borrow, fmt, mem, ops::Index};

use tracing::debug;

use crate::{
    arena::Arena,
    chain_iterators::{ChainAdvancer, IterChain},
    holder::{Holder, PHolder},
    Advancer, ChainError, Direction, Node, NodeKind, Ptr, Sentinel,
};

/// A doubly linked chain where every interlink goes through a `Holder`.
///
/// `link(a, b)` does not store `b` in `a`, it stores a fresh `PHolder` whose
/// holder contains `b` (and likewise a separate holder containing `a` for the
/// backward direction of `b`). `unlink(b)` then rewrites the *contents* of the
/// neighbors' holders and leaves `b`'s own holders alone. Because a traversal
/// re-reads its anchor's holder on every step, a node can be unlinked in
/// `O(1)` while a traversal is suspended on it or anywhere else in the chain.
///
/// ```
/// use indirect_chain::{ptr_struct, Advancer, Chain, Direction};
///
/// ptr_struct!(P0);
/// let mut chain: Chain<P0, &str> = Chain::new();
///
/// // sentinels mark where traversal stops, they are never yielded
/// let initial = chain.insert_initial();
/// let a = chain.insert("A");
/// let b = chain.insert("B");
/// let c = chain.insert("C");
/// let terminal = chain.insert_terminal();
///
/// chain.link(initial, a).unwrap();
/// chain.link(a, b).unwrap();
/// chain.link(b, c).unwrap();
/// chain.link(c, terminal).unwrap();
///
/// // the advancer does not borrow `chain` between steps, so the loop body is
/// // free to unlink the node it was just given
/// let mut seen = vec![];
/// let mut adv = chain.advancer(initial, Direction::Forward);
/// while let Some(p) = adv.advance(&chain) {
///     let p = p.unwrap();
///     if p == a {
///         chain.unlink(p).unwrap();
///     }
///     seen.push(*chain.get(p).unwrap().t().unwrap());
/// }
/// assert_eq!(seen, ["A", "B", "C"]);
///
/// // `A` is gone from the chain but is still allocated as an orphan
/// let rest: Vec<&str> = chain
///     .iter(terminal, Direction::Reverse)
///     .map(|res| *res.unwrap().1.t().unwrap())
///     .collect();
/// assert_eq!(rest, ["C", "B"]);
/// assert!(!chain.is_attached(a));
/// assert_eq!(chain.remove(a).unwrap().into_t(), Some("A"));
/// ```
pub struct Chain<P: Ptr, T> {
    pub(crate) nodes: Arena<P, Node<T>>,
    pub(crate) holders: Arena<PHolder, Holder<P>>,
}

/// # Note
///
/// Every fallible function here checks all of its preconditions before its
/// first write, so an `Err` always means the chain was not touched.
///
/// The bidirectional invariant (the forward holder of `p` contains `s` if and
/// only if the backward holder of `s` contains `p`) holds for every attached
/// pair after every `link` and `unlink`, as long as callers `unlink` before
/// re-`link`ing an occupied side and never `unlink` an orphan (see
/// [Chain::unlink]).
impl<P: Ptr, T> Chain<P, T> {
    /// Used by tests
    #[doc(hidden)]
    pub fn _check_invariants(this: &Self) -> Result<(), &'static str> {
        Arena::_check_invariants(&this.nodes)?;
        Arena::_check_invariants(&this.holders)?;
        let mut n_holders = 0usize;
        for (_, node) in this.nodes.iter() {
            for ph in [node.forward, node.backward].into_iter().flatten() {
                if !this.holders.contains(ph) {
                    return Err("node has a freed holder")
                }
                n_holders += 1;
            }
        }
        if n_holders != this.holders.len() {
            return Err("holder is not owned by any node")
        }
        // only the pairs reachable from sentinels are attached, orphans are allowed to
        // name neighbors that no longer name them
        for (p, node) in this.nodes.iter() {
            match node.sentinel() {
                Some(Sentinel::Initial) => Self::check_walk(this, p, Direction::Forward)?,
                Some(Sentinel::Terminal) => Self::check_walk(this, p, Direction::Reverse)?,
                None => (),
            }
        }
        Ok(())
    }

    fn check_walk(this: &Self, start: P, direction: Direction) -> Result<(), &'static str> {
        let mut p = start;
        // bounded so that cyclic chains terminate
        for _ in 0..this.nodes.len() {
            let next = match this.step(p, direction) {
                Ok(next) => next,
                // dangling end
                Err(ChainError::BoundaryNode) => return Ok(()),
                Err(_) => return Err("holder names a removed node"),
            };
            let node = match this.nodes.get(next) {
                Some(node) => node,
                None => return Err("holder names a removed node"),
            };
            if this.step(next, direction.rev()) != Ok(p) {
                return Err("interlink does not correspond")
            }
            if node.sentinel() == Some(direction.terminating()) {
                return Ok(())
            }
            p = next;
        }
        Ok(())
    }

    pub fn new() -> Self {
        Self {
            nodes: Arena::new(),
            holders: Arena::new(),
        }
    }

    /// Returns the number of nodes in the chain arena, including sentinels and
    /// orphans that have not been removed
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns if there are no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the number of allocated holders, which is one per linked side
    /// of every node
    pub fn holders_len(&self) -> usize {
        self.holders.len()
    }

    /// Inserts an unlinked interior node carrying `t` and returns a `Ptr` to
    /// it
    pub fn insert(&mut self, t: T) -> P {
        self.nodes.insert(Node::new(NodeKind::Interior(t)))
    }

    /// Inserts an unlinked `Sentinel::Initial` node
    pub fn insert_initial(&mut self) -> P {
        self.nodes.insert(Node::new(NodeKind::Initial))
    }

    /// Inserts an unlinked `Sentinel::Terminal` node
    pub fn insert_terminal(&mut self) -> P {
        self.nodes.insert(Node::new(NodeKind::Terminal))
    }

    /// Returns if `p` is a valid `Ptr`
    pub fn contains(&self, p: P) -> bool {
        self.nodes.contains(p)
    }

    /// Returns a reference to the node pointed to by `p`. Returns `None` if
    /// `p` is invalid.
    #[must_use]
    pub fn get(&self, p: P) -> Option<&Node<T>> {
        self.nodes.get(p)
    }

    /// Returns a mutable reference to the payload of the node pointed to by
    /// `p`. Returns `None` if `p` is invalid or points to a sentinel. The
    /// interlinks are never handed out mutably.
    #[must_use]
    pub fn get_mut(&mut self, p: P) -> Option<&mut T> {
        self.nodes.get_mut(p).and_then(|node| node.kind.t_mut())
    }

    /// Returns the holder pointed to by `ph`. Returns `None` if it has been
    /// freed.
    #[must_use]
    pub fn holder(&self, ph: PHolder) -> Option<&Holder<P>> {
        self.holders.get(ph)
    }

    fn node(&self, p: P) -> Result<&Node<T>, ChainError> {
        self.nodes.get(p).ok_or(ChainError::InvalidNode)
    }

    fn read(&self, ph: PHolder) -> Result<P, ChainError> {
        self.holders
            .get(ph)
            .ok_or(ChainError::InvalidNode)
            .and_then(Holder::get)
    }

    /// Reads the neighbor of `p` through its holder in `direction`
    pub(crate) fn step(&self, p: P, direction: Direction) -> Result<P, ChainError> {
        let ph = self
            .node(p)?
            .holder_toward(direction)
            .ok_or(ChainError::BoundaryNode)?;
        self.read(ph)
    }

    /// Returns what the forward holder of `p` currently contains.
    ///
    /// # Errors
    ///
    /// `InvalidNode` if `p` is invalid, `BoundaryNode` if `p` has no forward
    /// holder
    pub fn next(&self, p: P) -> Result<P, ChainError> {
        self.step(p, Direction::Forward)
    }

    /// Returns what the backward holder of `p` currently contains.
    ///
    /// # Errors
    ///
    /// `InvalidNode` if `p` is invalid, `BoundaryNode` if `p` has no backward
    /// holder
    pub fn prev(&self, p: P) -> Result<P, ChainError> {
        self.step(p, Direction::Reverse)
    }

    /// Links `a` to `b` by giving `a` a new forward holder containing `b` and
    /// `b` a new backward holder containing `a`. The two holders are always
    /// distinct.
    ///
    /// If `a` already had a forward holder or `b` a backward holder, it is
    /// replaced and freed, so a `PHolder` to it captured from
    /// [Node::forward] or [Node::backward] is invalid afterwards. The holders
    /// of every other node, orphans included, are unaffected. Nothing is done to the neighbor the replaced holder
    /// used to name, so that neighbor is left with a stale interlink back to
    /// `a` (or `b`). Unlink first if that matters.
    ///
    /// # Errors
    ///
    /// `InvalidNode` if either `Ptr` is invalid
    pub fn link(&mut self, a: P, b: P) -> Result<(), ChainError> {
        if !(self.nodes.contains(a) && self.nodes.contains(b)) {
            return Err(ChainError::InvalidNode)
        }
        let forward = self.holders.insert(Holder::new(b));
        let backward = self.holders.insert(Holder::new(a));
        let old_forward = self
            .nodes
            .get_mut(a)
            .map(|node| mem::replace(&mut node.forward, Some(forward)))
            .ok_or(ChainError::InvalidNode)?;
        let old_backward = self
            .nodes
            .get_mut(b)
            .map(|node| mem::replace(&mut node.backward, Some(backward)))
            .ok_or(ChainError::InvalidNode)?;
        for ph in [old_forward, old_backward].into_iter().flatten() {
            // the replaced field was the only owner
            let _ = self.holders.remove(ph);
        }
        debug!(?a, ?b, ?forward, ?backward, "linked");
        Ok(())
    }

    /// Removes `p` from its chain in `O(1)` by rewriting the contents of its
    /// predecessor's forward holder to name its successor, and the contents of
    /// its successor's backward holder to name its predecessor.
    ///
    /// `p` itself stays allocated as an orphan and its own holders are left
    /// untouched, still naming the old neighbors. This is what lets a
    /// suspended traversal anchored on `p` continue to the old successor. Use
    /// [Chain::remove] to free the orphan afterwards.
    ///
    /// This is not idempotent. Calling `unlink` again on an orphan re-reads its
    /// stale neighbors and writes them back into the chain, which corrupts
    /// the chain if it changed since the first call. This is not detected.
    ///
    /// # Errors
    ///
    /// - `InvalidNode` if `p`, its neighbors, or their holders are not live
    /// - `BoundaryNode` if `p` is missing either holder (always the case for
    ///   sentinels), or a neighbor is missing the holder that names `p`
    /// - `EmptyHolder` if a holder involved was never set
    pub fn unlink(&mut self, p: P) -> Result<(), ChainError> {
        let node = self.node(p)?;
        let (Some(ph_back), Some(ph_fwd)) = (node.backward, node.forward) else {
            return Err(ChainError::BoundaryNode)
        };
        let pred = self.read(ph_back)?;
        let succ = self.read(ph_fwd)?;
        let pred_fwd = self.node(pred)?.forward.ok_or(ChainError::BoundaryNode)?;
        let succ_back = self.node(succ)?.backward.ok_or(ChainError::BoundaryNode)?;
        if !(self.holders.contains(pred_fwd) && self.holders.contains(succ_back)) {
            return Err(ChainError::InvalidNode)
        }
        // the interlink invariant is broken between these two writes
        if let Some(holder) = self.holders.get_mut(pred_fwd) {
            holder.set(succ);
        }
        if let Some(holder) = self.holders.get_mut(succ_back) {
            holder.set(pred);
        }
        debug!(?p, ?pred, ?succ, "unlinked");
        Ok(())
    }

    /// Returns if a live neighbor, as named by `p`'s own holders, still names
    /// `p` back. This is `false` for orphans, never linked nodes, and invalid
    /// `Ptr`s.
    pub fn is_attached(&self, p: P) -> bool {
        let named_by_pred = self
            .prev(p)
            .is_ok_and(|pred| self.next(pred) == Ok(p));
        let named_by_succ = self
            .next(p)
            .is_ok_and(|succ| self.prev(succ) == Ok(p));
        named_by_pred || named_by_succ
    }

    /// Frees the detached node `p` along with its own holders, and returns
    /// what the node was. `Ptr`s to `p` become invalid, so an advancer still
    /// anchored on `p` will yield `Err(InvalidNode)` on its next step.
    ///
    /// # Errors
    ///
    /// `InvalidNode` if `p` is invalid, `StillAttached` if a neighbor still
    /// names `p` (unlink it first)
    pub fn remove(&mut self, p: P) -> Result<NodeKind<T>, ChainError> {
        if !self.nodes.contains(p) {
            return Err(ChainError::InvalidNode)
        }
        if self.is_attached(p) {
            return Err(ChainError::StillAttached)
        }
        let node = self.nodes.remove(p).ok_or(ChainError::InvalidNode)?;
        for ph in [node.forward, node.backward].into_iter().flatten() {
            let _ = self.holders.remove(ph);
        }
        debug!(?p, "removed orphan");
        Ok(node.kind)
    }

    /// Frees every node reachable from `p` through forward and backward
    /// holders (including `p` and any sentinels), along with their holders.
    /// Cyclic chains are handled. Orphans that still name nodes of the chain
    /// are not reachable and are left alone. Returns the number of nodes
    /// freed.
    ///
    /// # Errors
    ///
    /// `InvalidNode` if `p` is invalid
    pub fn remove_chain(&mut self, p: P) -> Result<usize, ChainError> {
        if !self.nodes.contains(p) {
            return Err(ChainError::InvalidNode)
        }
        let mut ptrs = Vec::from([p]);
        let mut cyclic = false;
        let mut tmp = p;
        for _ in 0..self.nodes.len() {
            match self.next(tmp) {
                Ok(next) if next == p => {
                    cyclic = true;
                    break
                }
                Ok(next) if self.nodes.contains(next) => {
                    ptrs.push(next);
                    tmp = next;
                }
                _ => break,
            }
        }
        if !cyclic {
            let mut tmp = p;
            for _ in 0..self.nodes.len() {
                match self.prev(tmp) {
                    Ok(prev) if self.nodes.contains(prev) && !ptrs.contains(&prev) => {
                        ptrs.push(prev);
                        tmp = prev;
                    }
                    _ => break,
                }
            }
        }
        let mut len = 0;
        for p in ptrs {
            if let Some(node) = self.nodes.remove(p) {
                for ph in [node.forward, node.backward].into_iter().flatten() {
                    let _ = self.holders.remove(ph);
                }
                len += 1;
            }
        }
        debug!(?p, len, "removed chain");
        Ok(len)
    }

    /// Traverses from `start` in `direction`, calling `pred` on the payload
    /// of every yielded node and unlinking the node if `pred` returns `true`.
    /// Unlinked nodes become orphans. Returns the number of nodes unlinked.
    ///
    /// # Errors
    ///
    /// The first error yielded by the traversal or returned by `unlink`. Nodes
    /// unlinked before the error stay unlinked.
    pub fn unlink_by<F: FnMut(P, &mut T) -> bool>(
        &mut self,
        start: P,
        direction: Direction,
        mut pred: F,
    ) -> Result<usize, ChainError> {
        let mut adv = self.advancer(start, direction);
        let mut len = 0;
        while let Some(res) = adv.advance(self) {
            let p = res?;
            let unlink = match self.get_mut(p) {
                Some(t) => pred(p, t),
                None => false,
            };
            if unlink {
                self.unlink(p)?;
                len += 1;
            }
        }
        Ok(len)
    }

    /// Returns an advancer that lazily traverses from `start` (exclusive) in
    /// `direction`, see [ChainAdvancer]
    pub fn advancer(&self, start: P, direction: Direction) -> ChainAdvancer<P, T> {
        ChainAdvancer::new(start, direction)
    }

    /// Returns a borrowing iterator that traverses from `start` (exclusive)
    /// in `direction`, with the same stepping as [Chain::advancer]
    pub fn iter(&self, start: P, direction: Direction) -> IterChain<'_, P, T> {
        IterChain::new(self, start, direction)
    }

    /// Drops all nodes and holders and invalidates all pointers previously
    /// created from the chain
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.holders.clear();
    }
}

impl<P: Ptr, T, B: Borrow<P>> Index<B> for Chain<P, T> {
    type Output = Node<T>;

    fn index(&self, index: B) -> &Self::Output {
        self.get(*index.borrow())
            .expect("indexed chain with invalidated `Ptr`")
    }
}

impl<P: Ptr, T: fmt::Debug> fmt::Debug for Chain<P, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("nodes", &self.nodes)
            .field("holders", &self.holders)
            .finish()
    }
}

/// Implemented if `T: Clone`. `Ptr`s and `PHolder`s into the original are
/// valid for the corresponding entries of the clone.
impl<P: Ptr, T: Clone> Clone for Chain<P, T> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            holders: self.holders.clone(),
        }
    }
}

impl<P: Ptr, T> Default for Chain<P, T> {
    fn default() -> Self {
        Self::new()
    }
}
