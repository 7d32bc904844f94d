use core::fmt;
use core::iter::FusedIterator;

use smallvec::SmallVec;

use crate::NotFoundError;
use crate::raw::{Handle, RawMultiset};

mod order_statistic;

/// An ordered multiset backed by a size-augmented red-black tree.
///
/// Equal elements (under the comparator) are both legal and kept, ordered
/// stably by insertion into the structural position the comparator's tie
/// rule dictates. Every operation listed on this type runs in O(log n)
/// unless stated otherwise.
///
/// # Comparator contract
///
/// The comparator `op(a, b)` means "`a` is not greater than `b`" and must be
/// a total preorder: reflexive, transitive, and such that mutual
/// incomparability makes two elements interchangeable for ordering purposes.
/// An irreflexive "strictly less" predicate also satisfies the contract.
/// Supplying an inconsistent comparator is a precondition violation that is
/// *not* detected at runtime: the tree stays structurally valid and never
/// crashes, but its iteration order is unspecified.
///
/// # The sentinel value
///
/// Construction takes a *sentinel value* that must never compare equal to
/// any inserted element; callers choose it outside the valid value domain
/// (for example `i64::MAX` for scores, or `(usize::MAX, "")` for pairs).
/// Queries for elements that may not exist ([`min`](Self::min),
/// [`max`](Self::max), [`prev_element`](Self::prev_element),
/// [`next_element`](Self::next_element)) echo a reference to that value back
/// instead of returning an `Option`, so chained range scans need no
/// per-call presence checks. Contract-violating calls are handled
/// differently: [`kth_element`](Self::kth_element) and [`Rank`](crate::Rank)
/// indexing panic on out-of-range positions, and [`remove`](Self::remove)
/// of an absent element returns a typed [`NotFoundError`].
///
/// # Examples
///
/// ```
/// use rankset::OrderedMultiset;
///
/// let mut set = OrderedMultiset::new(|a: &i64, b: &i64| a <= b, 1 << 60);
///
/// for x in [5, 3, 1, 2, 4] {
///     set.insert(x);
/// }
///
/// assert_eq!(set.len(), 5);
/// assert_eq!(*set.min(), 1);
/// assert_eq!(*set.max(), 5);
/// assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 2, 3, 4, 5]);
///
/// for x in [1, 4, 2, 5, 3] {
///     set.remove(&x).unwrap();
/// }
///
/// // Empty again: min and max echo the sentinel.
/// assert!(set.is_empty());
/// assert_eq!(*set.min(), 1 << 60);
/// assert_eq!(*set.max(), 1 << 60);
/// ```
#[derive(Clone)]
pub struct OrderedMultiset<T, F> {
    raw: RawMultiset<T>,
    op: F,
}

impl<T, F: Fn(&T, &T) -> bool> OrderedMultiset<T, F> {
    /// Creates an empty multiset from a comparator and a sentinel value.
    ///
    /// See the type-level documentation for the comparator and sentinel
    /// contracts.
    ///
    /// # Examples
    ///
    /// ```
    /// use rankset::OrderedMultiset;
    ///
    /// let set = OrderedMultiset::new(|a: &i64, b: &i64| a <= b, -1);
    /// assert!(set.is_empty());
    /// assert_eq!(*set.nil_value(), -1);
    /// ```
    pub fn new(op: F, nil_value: T) -> Self {
        Self {
            raw: RawMultiset::new(nil_value),
            op,
        }
    }

    /// Creates an empty multiset with node storage for at least `capacity`
    /// elements.
    pub fn with_capacity(op: F, nil_value: T, capacity: usize) -> Self {
        Self {
            raw: RawMultiset::with_capacity(nil_value, capacity),
            op,
        }
    }

    /// Returns the number of elements the multiset can hold without
    /// reallocating its node storage.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Returns the number of elements, duplicates included.
    ///
    /// # Complexity
    ///
    /// O(1) - the count is maintained incrementally, never recomputed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns true if the multiset contains no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.len() == 0
    }

    /// Returns the sentinel value supplied at construction, in O(1).
    #[must_use]
    pub fn nil_value(&self) -> &T {
        self.raw.nil_value()
    }

    /// Drops every element, keeping the comparator and sentinel value.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Inserts `value`, keeping any equal elements already present.
    ///
    /// # Examples
    ///
    /// ```
    /// use rankset::OrderedMultiset;
    ///
    /// let mut set = OrderedMultiset::new(|a: &i64, b: &i64| a <= b, -1);
    /// set.insert(2);
    /// set.insert(2);
    /// assert_eq!(set.len(), 2);
    /// ```
    pub fn insert(&mut self, value: T) {
        self.raw.insert(value, &self.op);
    }

    /// Removes one occurrence of an element equivalent to `value` and
    /// returns it.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] if no equivalent element is present;
    /// removing an absent element is treated as caller misuse, never a
    /// silent no-op.
    ///
    /// # Examples
    ///
    /// ```
    /// use rankset::{NotFoundError, OrderedMultiset};
    ///
    /// let mut set = OrderedMultiset::new(|a: &i64, b: &i64| a <= b, -1);
    /// set.insert(2);
    ///
    /// assert_eq!(set.remove(&2), Ok(2));
    /// assert_eq!(set.remove(&2), Err(NotFoundError));
    /// ```
    pub fn remove(&mut self, value: &T) -> Result<T, NotFoundError> {
        self.raw.remove(value, &self.op).ok_or(NotFoundError)
    }

    /// Returns true if some element equivalent to `value` is present.
    ///
    /// # Examples
    ///
    /// ```
    /// use rankset::OrderedMultiset;
    ///
    /// let mut set = OrderedMultiset::new(|a: &i64, b: &i64| a <= b, -1);
    /// set.insert(2);
    /// assert!(set.contains(&2));
    /// assert!(!set.contains(&3));
    /// ```
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.raw.contains(value, &self.op)
    }

    /// Returns the smallest element, or the sentinel value when empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use rankset::OrderedMultiset;
    ///
    /// let mut set = OrderedMultiset::new(|a: &i64, b: &i64| a <= b, -1);
    /// assert_eq!(*set.min(), -1);
    /// set.insert(2);
    /// assert_eq!(*set.min(), 2);
    /// ```
    #[must_use]
    pub fn min(&self) -> &T {
        self.raw.min()
    }

    /// Returns the largest element, or the sentinel value when empty.
    #[must_use]
    pub fn max(&self) -> &T {
        self.raw.max()
    }

    /// Returns an iterator over the elements in ascending order, duplicates
    /// included, each yielded once per occurrence.
    ///
    /// The traversal keeps its own explicit work stack; it never recurses,
    /// so even adversarially tall trees cannot exhaust the call stack.
    /// Takes worst-case logarithmic and amortized constant time per element.
    ///
    /// # Examples
    ///
    /// ```
    /// use rankset::OrderedMultiset;
    ///
    /// let mut set = OrderedMultiset::new(|a: &i64, b: &i64| a <= b, -1);
    /// for x in [3, 1, 2, 1] {
    ///     set.insert(x);
    /// }
    ///
    /// assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 1, 2, 3]);
    /// ```
    #[must_use = "iterators are lazy and do nothing unless consumed"]
    pub fn iter(&self) -> Iter<'_, T> {
        let mut iter = Iter {
            raw: &self.raw,
            stack: SmallVec::new(),
            remaining: self.raw.len(),
        };
        iter.push_left_spine(self.raw.root());
        iter
    }
}

impl<T: fmt::Debug, F> fmt::Debug for OrderedMultiset<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut iter = Iter {
            raw: &self.raw,
            stack: SmallVec::new(),
            remaining: self.raw.len(),
        };
        iter.push_left_spine(self.raw.root());
        f.debug_set().entries(iter).finish()
    }
}

impl<T, F: Fn(&T, &T) -> bool> Extend<T> for OrderedMultiset<T, F> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a, T, F: Fn(&T, &T) -> bool> IntoIterator for &'a OrderedMultiset<T, F> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

/// An iterator over the elements of an `OrderedMultiset` in ascending order.
///
/// This `struct` is created by the [`iter`] method on [`OrderedMultiset`].
/// See its documentation for more.
///
/// [`iter`]: OrderedMultiset::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T: 'a> {
    raw: &'a RawMultiset<T>,
    // A red-black tree over at most Handle::MAX (< 2^32) elements is at most
    // 64 levels tall, so the work stack never spills to the heap.
    stack: SmallVec<[Handle; 64]>,
    remaining: usize,
}

impl<T> Iter<'_, T> {
    fn push_left_spine(&mut self, from: Handle) {
        let mut cur = from;
        while !cur.is_nil() {
            self.stack.push(cur);
            cur = self.raw.left(cur);
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let h = self.stack.pop()?;
        self.remaining -= 1;
        self.push_left_spine(self.raw.right(h));
        Some(self.raw.value(h))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            raw: self.raw,
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
