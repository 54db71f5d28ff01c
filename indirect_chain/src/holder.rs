use crate::{ChainError, Ptr};

crate::ptr_struct!(
    PHolder doc = "Addresses a `Holder` in the holder arena of a `Chain`. A `PHolder` is stable \
                   for the whole life of the holder, only the contents of the holder change."
);

/// A single slot mutable reference cell.
///
/// Nodes do not point at their neighbors directly, they own a `PHolder` to
/// one of these, and the holder names the neighbor. `set` rewrites what the
/// holder names without changing the holder itself, so anything that reads
/// through the same `PHolder` later observes the new neighbor.
///
/// ```
/// use indirect_chain::{ptr_struct, ChainError, Holder, Ptr};
///
/// ptr_struct!(P0);
/// let mut h: Holder<P0> = Holder::default();
/// assert_eq!(h.get(), Err(ChainError::EmptyHolder));
/// h.set(P0::invalid());
/// assert_eq!(h.get(), Ok(P0::invalid()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Holder<P: Ptr> {
    node: Option<P>,
}

impl<P: Ptr> Holder<P> {
    /// Creates a holder already containing `p`
    pub fn new(p: P) -> Self {
        Self { node: Some(p) }
    }

    /// Returns the currently held `Ptr`.
    ///
    /// # Errors
    ///
    /// `ChainError::EmptyHolder` if nothing was ever set
    pub fn get(&self) -> Result<P, ChainError> {
        self.node.ok_or(ChainError::EmptyHolder)
    }

    /// Overwrites the held `Ptr`
    pub fn set(&mut self, p: P) {
        self.node = Some(p);
    }

    pub fn is_empty(&self) -> bool {
        self.node.is_none()
    }
}

impl<P: Ptr> Default for Holder<P> {
    fn default() -> Self {
        Self { node: None }
    }
}
