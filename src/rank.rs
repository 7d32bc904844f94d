/// A zero-based position in the sorted order of a multiset.
///
/// Wrapping the position in a newtype keeps rank indexing visually distinct
/// from anything resembling key lookup.
///
/// # Examples
///
/// ```
/// use rankset::{OrderedMultiset, Rank};
///
/// let mut set = OrderedMultiset::new(|a: &i64, b: &i64| a <= b, i64::MAX);
/// set.insert(30);
/// set.insert(10);
/// set.insert(20);
///
/// assert_eq!(set[Rank(0)], 10);
/// assert_eq!(set[Rank(2)], 30);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Rank(pub usize);
