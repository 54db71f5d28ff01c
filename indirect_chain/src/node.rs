use core::fmt;

use crate::holder::PHolder;

/// The two boundary roles a node can have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sentinel {
    /// Start of a chain, reverse traversal ends when it is reached
    Initial,
    /// End of a chain, forward traversal ends when it is reached
    Terminal,
}

/// What a node is. Sentinels carry no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind<T> {
    Initial,
    Terminal,
    Interior(T),
}

impl<T> NodeKind<T> {
    pub fn sentinel(&self) -> Option<Sentinel> {
        match self {
            NodeKind::Initial => Some(Sentinel::Initial),
            NodeKind::Terminal => Some(Sentinel::Terminal),
            NodeKind::Interior(_) => None,
        }
    }

    /// Returns the payload, `None` for sentinels
    pub fn t(&self) -> Option<&T> {
        match self {
            NodeKind::Interior(t) => Some(t),
            _ => None,
        }
    }

    pub fn t_mut(&mut self) -> Option<&mut T> {
        match self {
            NodeKind::Interior(t) => Some(t),
            _ => None,
        }
    }

    /// Consumes `self` and returns the payload, `None` for sentinels
    pub fn into_t(self) -> Option<T> {
        match self {
            NodeKind::Interior(t) => Some(t),
            _ => None,
        }
    }
}

/// Which holder a traversal follows
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Follow `forward` holders, stop at a `Sentinel::Terminal`
    #[default]
    Forward,
    /// Follow `backward` holders, stop at a `Sentinel::Initial`
    Reverse,
}

impl Direction {
    /// The sentinel role that ends a traversal in this direction
    pub fn terminating(self) -> Sentinel {
        match self {
            Direction::Forward => Sentinel::Terminal,
            Direction::Reverse => Sentinel::Initial,
        }
    }

    pub fn rev(self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }
}

/// A node in a `Chain`. The interlinks are private and only readable through
/// methods, the `Chain` is the only thing that can rewrite them.
///
/// Note that `forward` and `backward` are `PHolder`s and not `P`s, the
/// neighbor is whatever the holder currently contains (see `Chain::next` and
/// `Chain::prev` for the one-hop reads).
#[derive(Clone, PartialEq, Eq)]
pub struct Node<T> {
    pub(crate) forward: Option<PHolder>,
    pub(crate) backward: Option<PHolder>,
    pub(crate) kind: NodeKind<T>,
}

impl<T> Node<T> {
    pub(crate) fn new(kind: NodeKind<T>) -> Self {
        Self {
            forward: None,
            backward: None,
            kind,
        }
    }

    /// The holder naming the next node, absent until `self` is linked as a
    /// source
    pub fn forward(&self) -> Option<PHolder> {
        self.forward
    }

    /// The holder naming the previous node, absent until `self` is linked as
    /// a target
    pub fn backward(&self) -> Option<PHolder> {
        self.backward
    }

    /// The holder followed when traversing in `direction`
    pub fn holder_toward(&self, direction: Direction) -> Option<PHolder> {
        match direction {
            Direction::Forward => self.forward,
            Direction::Reverse => self.backward,
        }
    }

    pub fn kind(&self) -> &NodeKind<T> {
        &self.kind
    }

    pub fn sentinel(&self) -> Option<Sentinel> {
        self.kind.sentinel()
    }

    pub fn is_sentinel(&self) -> bool {
        self.sentinel().is_some()
    }

    /// Returns the payload, `None` for sentinels
    pub fn t(&self) -> Option<&T> {
        self.kind.t()
    }
}

impl<T: fmt::Debug> fmt::Debug for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?}, {:?}) {:?}", self.backward, self.forward, self.kind)
    }
}
