use core::{
    fmt::Debug,
    hash::Hash,
    num::{NonZeroU64, NonZeroUsize},
    panic::{RefUnwindSafe, UnwindSafe},
};

/// A trait for the `Copy` handles used to address entries of the arenas
/// backing a `Chain`.
///
/// Users should never have to manually implement this, use the `ptr_struct`
/// macro for automatically implementing types implementing this trait.
///
/// A `Ptr` is an index plus a generation. The arenas start at generation 2
/// and bump their generation on every removal, so that a `Ptr` to an entry
/// that has been freed is detected as invalid even if the same index has since
/// been reused. The `PartialEq`/`Eq` implementation should differentiate
/// between pointers at the same index but different generation. `Default`
/// should use the `invalid` function.
pub trait Ptr:
    Debug
    + Hash
    + Clone
    + Copy
    + PartialEq
    + Eq
    + PartialOrd
    + Ord
    + Send
    + Sync
    + Unpin
    + RefUnwindSafe
    + UnwindSafe
{
    /// Returns a new `Ptr` with a generation of 1. Because arenas start with
    /// generation 2, this is guaranteed invalid.
    fn invalid() -> Self;

    /// Returns the raw index. This can be useful when getting a unique id for
    /// every entry, but do not rely on it after the entry is removed.
    fn inx(self) -> NonZeroUsize;

    /// Returns the generation of this `Ptr`.
    fn gen(self) -> NonZeroU64;

    /// Do not use this unless you are manually managing internal details
    fn _from_raw(inx: NonZeroUsize, gen: NonZeroU64) -> Self;
}

/// Convenience macro for quickly making new structs that implement `Ptr`.
/// The struct name can be followed by a comma separated list of attributes,
/// and a single macro can declare multiple structs with semicolon separators.
///
/// ```
/// use indirect_chain::{ptr_struct, Chain, Ptr};
///
/// // create struct `PNode` implementing `Ptr` and having a doc comment
/// ptr_struct!(PNode doc="A node of the event chain");
/// let _: Chain<PNode, String>;
///
/// ptr_struct!(P0; P1);
/// assert_eq!(P0::invalid().gen().get(), 1);
/// ```
#[macro_export]
macro_rules! ptr_struct {
    ($($struct_name:ident $($attributes:meta),*);*) => {
        $(
            $(#[$attributes])*
            #[derive(
                core::hash::Hash,
                core::clone::Clone,
                core::marker::Copy,
                core::cmp::PartialEq,
                core::cmp::Eq,
                core::cmp::PartialOrd,
                core::cmp::Ord
            )]
            pub struct $struct_name {
                // note: in this order `PartialOrd` will order primarily off of `_internal_inx`
                #[doc(hidden)]
                _internal_inx: core::num::NonZeroUsize,
                #[doc(hidden)]
                _internal_gen: core::num::NonZeroU64,
            }

            impl $crate::Ptr for $struct_name {
                #[inline]
                fn invalid() -> Self {
                    Self {
                        _internal_inx: core::num::NonZeroUsize::MAX,
                        _internal_gen: core::num::NonZeroU64::MIN,
                    }
                }

                #[inline]
                fn inx(self) -> core::num::NonZeroUsize {
                    self._internal_inx
                }

                #[inline]
                fn gen(self) -> core::num::NonZeroU64 {
                    self._internal_gen
                }

                #[inline]
                #[doc(hidden)]
                fn _from_raw(
                    _internal_inx: core::num::NonZeroUsize,
                    _internal_gen: core::num::NonZeroU64,
                ) -> Self {
                    Self {
                        _internal_inx,
                        _internal_gen,
                    }
                }
            }

            impl core::default::Default for $struct_name {
                #[inline]
                fn default() -> Self {
                    $crate::Ptr::invalid()
                }
            }

            // This is manually implemented so that it is inline and has no newlines, which
            // makes the `Debug` implementation on `Chain` look much nicer.
            impl core::fmt::Debug for $struct_name {
                fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                    f.write_fmt(format_args!(
                        "{}[{:?}]({:?})",
                        stringify!($struct_name),
                        $crate::Ptr::inx(*self),
                        $crate::Ptr::gen(*self),
                    ))
                }
            }

            impl core::fmt::Display for $struct_name {
                fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                    core::fmt::Debug::fmt(self, f)
                }
            }
        )*
    };
}
