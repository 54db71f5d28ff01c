/// A different kind of iterator that does not borrow the collection.
///
/// Rust's `Iterator`s hold a borrow of their collection for their whole life,
/// which rules out mutating the collection between steps. An `Advancer`
/// instead takes the collection as an argument on every step, so the loop body
/// can take `&mut` in between:
///
/// ```text
/// let mut adv = chain.advancer(initial, Direction::Forward);
/// while let Some(p) = adv.advance(&chain) {
///     let p = p?;
///     ... chain.get(p) ...
///     ... chain.get_mut(p) ...
///     // unlinking the node just yielded is fine, the advancer continues
///     // through the orphan's own forward holder
///     ... chain.unlink(p) ...
///     // unlinking a node further ahead is fine too, the advancer will
///     // simply never reach it
///     ... chain.unlink(any_p) ...
/// }
/// ```
///
/// # Note
///
/// Check the documentation of each advancer for exactly what mutations it
/// tolerates. It is _not_ guaranteed that `advance` will continue returning
/// `None`s after the first time a `None` is returned.
pub trait Advancer {
    type Collection;
    type Item;

    fn advance(&mut self, collection: &Self::Collection) -> Option<Self::Item>;
}
