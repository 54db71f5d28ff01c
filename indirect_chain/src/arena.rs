use alloc::vec::Vec;
use core::{
    fmt,
    marker::PhantomData,
    mem,
    num::{NonZeroU64, NonZeroUsize},
};

use InternalEntry::*;

use crate::Ptr;

/// Internal entry for an `Arena`.
#[derive(Clone)]
pub(crate) enum InternalEntry<T> {
    /// A free entry with no `T`. The index points to the next free entry,
    /// except if it points to the self entry in which case it is the last free
    /// entry.
    Free(NonZeroUsize),
    /// An entry allocated for a `(generation, T)` pair in the arena.
    Allocated(NonZeroU64, T),
}

/// The generational slab that both the nodes and the holders of a `Chain`
/// live in. Entries never move, so a `P` stays a stable address of its entry
/// until the entry is removed, after which the generation check rejects it.
///
/// This is the plain storage layer, it knows nothing about interlinks.
pub struct Arena<P: Ptr, T> {
    len: usize,
    // entry `inx` lives at `m[inx - 1]`
    m: Vec<InternalEntry<T>>,
    freelist_root: Option<NonZeroUsize>,
    gen: NonZeroU64,
    _boo: PhantomData<fn() -> P>,
}

/// # Note
///
/// A `Ptr` is logically invalid if it points to a `T` that has been removed.
/// Because the arena generation is incremented on every removal and new
/// entries take the current generation, a `Ptr` to a removed `T` is always
/// detected even if its index has been reused.
///
/// # Overflow
///
/// If `Arena::gen()` is `u64::MAX` and a removal occurs, a panic occurs.
impl<P: Ptr, T> Arena<P, T> {
    /// Used by tests
    #[doc(hidden)]
    pub fn _check_invariants(this: &Self) -> Result<(), &'static str> {
        if this.gen.get() < 2 {
            return Err("bad generation")
        }
        let n_allocated = this
            .m
            .iter()
            .filter(|entry| matches!(entry, Allocated(..)))
            .count();
        let n_free = this.m.len() - n_allocated;
        if this.len != n_allocated {
            return Err("len != n_allocated")
        }
        // checking freelist integrity
        let mut freelist_len = 0usize;
        if let Some(root) = this.freelist_root {
            let mut tmp_inx = root;
            for i in 0.. {
                if let Some(Free(inx)) = this.m_get(tmp_inx) {
                    freelist_len += 1;
                    if *inx == tmp_inx {
                        // last one
                        break
                    }
                    tmp_inx = *inx;
                } else {
                    return Err("bad freelist node")
                }
                if i > this.m.len() {
                    return Err("endless loop")
                }
            }
        }
        if freelist_len != n_free {
            return Err("freelist discontinuous")
        }
        Ok(())
    }

    /// Creates a new arena of type `T`, which are pointed to by `P`s. The arena
    /// will not allocate until elements are inserted.
    pub fn new() -> Self {
        Self {
            len: 0,
            m: Vec::new(),
            freelist_root: None,
            gen: NonZeroU64::MIN.saturating_add(1),
            _boo: PhantomData,
        }
    }

    /// Returns the number of `T` in the arena
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns if the arena is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of entries, allocated or free
    pub fn capacity(&self) -> usize {
        self.m.len()
    }

    /// Return the arena generation counter, which is equal to the number of
    /// invalidation operations performed on this arena plus 2
    #[inline]
    pub fn gen(&self) -> NonZeroU64 {
        self.gen
    }

    #[inline]
    fn inc_gen(&mut self) {
        self.gen = match self.gen.checked_add(1) {
            Some(gen) => gen,
            None => panic!("generation overflow"),
        };
    }

    #[must_use]
    #[inline]
    fn m_get(&self, inx: NonZeroUsize) -> Option<&InternalEntry<T>> {
        self.m.get(inx.get() - 1)
    }

    #[must_use]
    #[inline]
    fn m_get_mut(&mut self, inx: NonZeroUsize) -> Option<&mut InternalEntry<T>> {
        self.m.get_mut(inx.get() - 1)
    }

    /// Inserts `t` into the arena and returns a `Ptr` to it. Free entries are
    /// reused before the arena grows.
    pub fn insert(&mut self, t: T) -> P {
        let gen = self.gen;
        if let Some(inx) = self.freelist_root {
            let next = match self.m_get_mut(inx) {
                Some(entry) => match mem::replace(entry, Allocated(gen, t)) {
                    Free(next) => next,
                    Allocated(..) => unreachable!("freelist root points to an allocated entry"),
                },
                None => unreachable!("freelist root out of bounds"),
            };
            self.freelist_root = if next == inx { None } else { Some(next) };
            self.len += 1;
            P::_from_raw(inx, gen)
        } else {
            self.m.push(Allocated(gen, t));
            self.len += 1;
            match NonZeroUsize::new(self.m.len()) {
                Some(inx) => P::_from_raw(inx, gen),
                None => unreachable!(),
            }
        }
    }

    /// Returns if `p` is a valid `Ptr`
    pub fn contains(&self, p: P) -> bool {
        self.get(p).is_some()
    }

    /// Returns a reference to a `T` pointed to by `p`. Returns `None` if `p` is
    /// invalid.
    #[must_use]
    pub fn get(&self, p: P) -> Option<&T> {
        match self.m_get(p.inx()) {
            Some(Allocated(gen, t)) if *gen == p.gen() => Some(t),
            _ => None,
        }
    }

    /// Returns a mutable reference to a `T` pointed to by `p`. Returns `None`
    /// if `p` is invalid.
    #[must_use]
    pub fn get_mut(&mut self, p: P) -> Option<&mut T> {
        match self.m_get_mut(p.inx()) {
            Some(Allocated(gen, t)) if *gen == p.gen() => Some(t),
            _ => None,
        }
    }

    /// Removes the `T` pointed to by `p`, returns the `T`, and invalidates old
    /// `Ptr`s to the `T`. Does no invalidation and returns `None` if `p` is
    /// invalid.
    #[must_use]
    pub fn remove(&mut self, p: P) -> Option<T> {
        if !self.contains(p) {
            return None
        }
        // points to previous root, or to itself if the freelist was empty
        let freelist_ptr = self.freelist_root.unwrap_or(p.inx());
        let old = mem::replace(self.m_get_mut(p.inx())?, Free(freelist_ptr));
        self.freelist_root = Some(p.inx());
        self.len -= 1;
        self.inc_gen();
        match old {
            Allocated(_, t) => Some(t),
            Free(_) => unreachable!(),
        }
    }

    /// Drops all `T` from the arena and invalidates all pointers previously
    /// created from it. This has no effect on allocated capacity.
    pub fn clear(&mut self) {
        self.m.clear();
        self.freelist_root = None;
        self.len = 0;
        self.inc_gen();
    }

    /// Iterates over all valid `(P, &T)` pairs in index order
    pub fn iter(&self) -> impl Iterator<Item = (P, &T)> {
        self.m.iter().enumerate().filter_map(|(i, entry)| match entry {
            Allocated(gen, t) => NonZeroUsize::new(i + 1).map(|inx| (P::_from_raw(inx, *gen), t)),
            Free(_) => None,
        })
    }
}

impl<P: Ptr, T> Default for Arena<P, T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Implemented if `T: Clone`. `P`s to an original `T` are valid for the
/// corresponding `T` in the clone.
impl<P: Ptr, T: Clone> Clone for Arena<P, T> {
    fn clone(&self) -> Self {
        Self {
            len: self.len,
            m: self.m.clone(),
            freelist_root: self.freelist_root,
            gen: self.gen,
            _boo: PhantomData,
        }
    }
}

impl<P: Ptr, T: fmt::Debug> fmt::Debug for Arena<P, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
