//! Traversals for `Chain`

use core::marker::PhantomData;

use tracing::trace;

use crate::{Advancer, Chain, ChainError, Direction, Node, Ptr};

/// A lazy single pass traversal of a `Chain` that does not borrow it between
/// steps.
///
/// The only state is the anchor (the last yielded node, initially the start)
/// and the direction. Every `advance` reads the anchor's holder in the
/// direction of travel afresh and then moves the anchor to whatever that
/// holder currently contains. Nothing read is cached past one step, which is
/// what makes interleaved `unlink`s safe:
///
/// - unlinking the anchor itself passes through it, because `unlink` never
///   touches the holders of the node being unlinked
/// - unlinking a node ahead skips it, because by the time the anchor reaches
///   its former neighbor, that neighbor's holder has been rewritten
/// - unlinking anything behind the anchor has no effect
///
/// The start and the terminating sentinel (`Terminal` going forward, `Initial`
/// in reverse) are never yielded. A cyclic chain, or one missing the
/// terminating sentinel, can be advanced forever.
///
/// Errors are yielded once as `Some(Err(..))`, after which the advancer is
/// finished. They happen if the anchor was `remove`d (`InvalidNode`), if it has
/// no holder in the direction of travel (`BoundaryNode`), or if its holder
/// names a node that has been `remove`d (`InvalidNode`).
pub struct ChainAdvancer<P: Ptr, T> {
    anchor: Option<P>,
    direction: Direction,
    _boo: PhantomData<fn() -> T>,
}

impl<P: Ptr, T> ChainAdvancer<P, T> {
    pub(crate) fn new(start: P, direction: Direction) -> Self {
        Self {
            anchor: Some(start),
            direction,
            _boo: PhantomData,
        }
    }

    /// The last yielded node (or the start if nothing has been yielded yet).
    /// Returns `None` once the advancer is finished.
    pub fn anchor(&self) -> Option<P> {
        self.anchor
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

impl<P: Ptr, T> Advancer for ChainAdvancer<P, T> {
    type Collection = Chain<P, T>;
    type Item = Result<P, ChainError>;

    fn advance(&mut self, collection: &Self::Collection) -> Option<Self::Item> {
        let anchor = self.anchor?;
        let next = match collection.step(anchor, self.direction) {
            Ok(next) => next,
            Err(e) => {
                self.anchor = None;
                return Some(Err(e))
            }
        };
        let Some(node) = collection.get(next) else {
            self.anchor = None;
            return Some(Err(ChainError::InvalidNode))
        };
        if node.sentinel() == Some(self.direction.terminating()) {
            trace!(?anchor, sentinel = ?next, "traversal reached sentinel");
            self.anchor = None;
            None
        } else {
            trace!(?anchor, ?next, "advanced");
            self.anchor = Some(next);
            Some(Ok(next))
        }
    }
}

/// A borrowing iterator over the nodes of a traversal, see [ChainAdvancer]
/// for the stepping rules
pub struct IterChain<'a, P: Ptr, T> {
    chain: &'a Chain<P, T>,
    adv: ChainAdvancer<P, T>,
}

impl<'a, P: Ptr, T> IterChain<'a, P, T> {
    pub(crate) fn new(chain: &'a Chain<P, T>, start: P, direction: Direction) -> Self {
        Self {
            chain,
            adv: ChainAdvancer::new(start, direction),
        }
    }
}

impl<'a, P: Ptr, T> Iterator for IterChain<'a, P, T> {
    type Item = Result<(P, &'a Node<T>), ChainError>;

    fn next(&mut self) -> Option<Self::Item> {
        let chain = self.chain;
        self.adv.advance(chain).map(|res| {
            res.and_then(|p| {
                chain
                    .get(p)
                    .map(|node| (p, node))
                    .ok_or(ChainError::InvalidNode)
            })
        })
    }
}
