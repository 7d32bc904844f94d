use core::ops::Index;

use super::OrderedMultiset;
use crate::Rank;

impl<T, F: Fn(&T, &T) -> bool> OrderedMultiset<T, F> {
    /// Returns the `k`-th smallest element, **1-indexed**, counting
    /// duplicates individually.
    ///
    /// Unlike the empty-set queries, an out-of-range `k` is a contract
    /// violation, not an absence: there is no sentinel echo here.
    ///
    /// # Panics
    ///
    /// Panics if `k` is outside `[1, len]`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use rankset::OrderedMultiset;
    ///
    /// let mut set = OrderedMultiset::new(|a: &i64, b: &i64| a <= b, -1);
    /// for x in [30, 10, 20, 10] {
    ///     set.insert(x);
    /// }
    ///
    /// assert_eq!(*set.kth_element(1), 10);
    /// assert_eq!(*set.kth_element(2), 10);
    /// assert_eq!(*set.kth_element(4), 30);
    /// ```
    #[must_use]
    pub fn kth_element(&self, k: usize) -> &T {
        self.raw.kth_element(k)
    }

    /// Counts the elements strictly smaller than `value` (its rank).
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use rankset::OrderedMultiset;
    ///
    /// let mut set = OrderedMultiset::new(|a: &i64, b: &i64| a <= b, -1);
    /// for x in [10, 20, 20, 30] {
    ///     set.insert(x);
    /// }
    ///
    /// assert_eq!(set.count_less_than(&20), 1);
    /// assert_eq!(set.count_less_than(&31), 4);
    /// assert_eq!(set.count_less_than(&10), 0);
    /// ```
    #[must_use]
    pub fn count_less_than(&self, value: &T) -> usize {
        self.raw.count_less_than(value, &self.op)
    }

    /// Counts the elements in the half-open range `[lo, hi)`.
    ///
    /// An empty or inverted range (`!op(lo, hi)`) counts zero elements.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use rankset::OrderedMultiset;
    ///
    /// let mut set = OrderedMultiset::new(|a: &i64, b: &i64| a <= b, -1);
    /// for x in [10, 20, 20, 30] {
    ///     set.insert(x);
    /// }
    ///
    /// assert_eq!(set.count_range(&10, &30), 3);
    /// assert_eq!(set.count_range(&30, &10), 0);
    /// ```
    #[must_use]
    pub fn count_range(&self, lo: &T, hi: &T) -> usize {
        self.raw.count_range(lo, hi, &self.op)
    }

    /// Returns the largest element smaller than `value`, or the sentinel
    /// value if there is none.
    ///
    /// The predecessor is found *by value*; `value` itself need not be a
    /// member.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use rankset::OrderedMultiset;
    ///
    /// let mut set = OrderedMultiset::new(|a: &i64, b: &i64| a <= b, -1);
    /// for x in [10, 20, 30] {
    ///     set.insert(x);
    /// }
    ///
    /// assert_eq!(*set.prev_element(&25), 20);
    /// assert_eq!(*set.prev_element(&10), -1); // nothing smaller: sentinel
    /// ```
    #[must_use]
    pub fn prev_element(&self, value: &T) -> &T {
        self.raw.prev_element(value, &self.op)
    }

    /// Returns the smallest element larger than `value`, or the sentinel
    /// value if there is none.
    ///
    /// The successor is found *by value*; `value` itself need not be a
    /// member.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use rankset::OrderedMultiset;
    ///
    /// let mut set = OrderedMultiset::new(|a: &i64, b: &i64| a <= b, -1);
    /// for x in [10, 20, 30] {
    ///     set.insert(x);
    /// }
    ///
    /// assert_eq!(*set.next_element(&25), 30);
    /// assert_eq!(*set.next_element(&30), -1); // nothing larger: sentinel
    /// ```
    #[must_use]
    pub fn next_element(&self, value: &T) -> &T {
        self.raw.next_element(value, &self.op)
    }
}

/// Indexes into the multiset by zero-based rank.
///
/// # Panics
///
/// Panics if `rank` is outside `[0, len)`.
///
/// # Examples
///
/// ```
/// use rankset::{OrderedMultiset, Rank};
///
/// let mut set = OrderedMultiset::new(|a: &i64, b: &i64| a <= b, -1);
/// for x in [30, 10, 20] {
///     set.insert(x);
/// }
///
/// assert_eq!(set[Rank(1)], 20);
/// ```
impl<T, F: Fn(&T, &T) -> bool> Index<Rank> for OrderedMultiset<T, F> {
    type Output = T;

    fn index(&self, rank: Rank) -> &T {
        assert!(
            rank.0 < self.len(),
            "`OrderedMultiset[Rank]` - rank ({}) out of range `[0, {})`!",
            rank.0,
            self.len()
        );
        self.raw.kth_element(rank.0 + 1)
    }
}
