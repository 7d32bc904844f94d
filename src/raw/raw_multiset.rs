use super::arena::Arena;
use super::handle::Handle;
use super::node::{Color, Node};
use super::size::Size;

/// The core red-black tree implementation backing `OrderedMultiset`.
///
/// The comparator is not stored here; every ordered operation receives it as
/// a parameter, meaning "not greater" as described on the public type. The
/// tree keeps two augmentations in lock-step with the structure: per-node
/// subtree sizes (updated proactively on the descent of every mutation and
/// recomputed inside rotations) and a live element count.
pub(crate) struct RawMultiset<T> {
    /// Arena storing all tree nodes; slot 0 is the sentinel.
    nodes: Arena<Node<T>>,
    /// Handle to the root node; the sentinel when the tree is empty.
    root: Handle,
    /// Total number of elements, maintained incrementally.
    len: usize,
}

impl<T> RawMultiset<T> {
    /// Creates an empty tree whose sentinel slot holds `nil_value`.
    pub(crate) fn new(nil_value: T) -> Self {
        Self::with_capacity(nil_value, 0)
    }

    /// Creates an empty tree with room for `capacity` elements.
    pub(crate) fn with_capacity(nil_value: T, capacity: usize) -> Self {
        // The sentinel occupies one slot on top of the requested capacity.
        let mut nodes = Arena::with_capacity(capacity + 1);
        let nil = nodes.alloc(Node::nil(nil_value));
        debug_assert!(nil.is_nil());
        Self {
            nodes,
            root: Handle::NIL,
            len: 0,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity().saturating_sub(1)
    }

    /// Drops every element, keeping the sentinel value and its slot.
    pub(crate) fn clear(&mut self) {
        let mut nil = self.nodes.take(Handle::NIL);
        nil.parent = Handle::NIL;
        nil.left = Handle::NIL;
        nil.right = Handle::NIL;
        self.nodes.clear();
        let handle = self.nodes.alloc(nil);
        debug_assert!(handle.is_nil());
        self.root = Handle::NIL;
        self.len = 0;
    }

    pub(crate) fn root(&self) -> Handle {
        self.root
    }

    pub(crate) fn value(&self, handle: Handle) -> &T {
        &self.nodes.get(handle).value
    }

    /// The caller-supplied out-of-domain value stored in the sentinel slot.
    pub(crate) fn nil_value(&self) -> &T {
        self.value(Handle::NIL)
    }

    #[inline]
    fn node(&self, handle: Handle) -> &Node<T> {
        self.nodes.get(handle)
    }

    #[inline]
    fn node_mut(&mut self, handle: Handle) -> &mut Node<T> {
        self.nodes.get_mut(handle)
    }

    #[inline]
    pub(crate) fn left(&self, handle: Handle) -> Handle {
        self.node(handle).left
    }

    #[inline]
    pub(crate) fn right(&self, handle: Handle) -> Handle {
        self.node(handle).right
    }

    #[inline]
    fn parent(&self, handle: Handle) -> Handle {
        self.node(handle).parent
    }

    #[inline]
    fn is_red(&self, handle: Handle) -> bool {
        self.node(handle).color == Color::Red
    }

    #[inline]
    fn set_color(&mut self, handle: Handle, color: Color) {
        self.node_mut(handle).color = color;
    }

    #[inline]
    fn size_of(&self, handle: Handle) -> usize {
        self.node(handle).size.to_usize()
    }
}

impl<T> RawMultiset<T> {
    /// Finds some node equivalent to `x` under the comparator, or the
    /// sentinel if none exists.
    ///
    /// Equivalence is `op(x, v) == op(v, x)`: both true for a reflexive
    /// ("not greater") comparator, both false for an irreflexive one, so
    /// either style of total preorder works.
    fn find(&self, x: &T, op: &impl Fn(&T, &T) -> bool) -> Handle {
        let mut cur = self.root;
        while !cur.is_nil() {
            let v = self.value(cur);
            let le = op(x, v);
            if le == op(v, x) {
                break;
            }
            cur = if le { self.left(cur) } else { self.right(cur) };
        }
        cur
    }

    pub(crate) fn contains(&self, x: &T, op: &impl Fn(&T, &T) -> bool) -> bool {
        !self.find(x, op).is_nil()
    }

    /// The smallest element, or the sentinel value when empty.
    pub(crate) fn min(&self) -> &T {
        let mut cur = self.root;
        while !self.left(cur).is_nil() {
            cur = self.left(cur);
        }
        self.value(cur)
    }

    /// The largest element, or the sentinel value when empty.
    pub(crate) fn max(&self) -> &T {
        let mut cur = self.root;
        while !self.right(cur).is_nil() {
            cur = self.right(cur);
        }
        self.value(cur)
    }

    /// The `k`-th smallest element, 1-indexed.
    ///
    /// # Panics
    ///
    /// Panics if `k` is outside `[1, len]`.
    pub(crate) fn kth_element(&self, k: usize) -> &T {
        assert!(
            1 <= k && k <= self.len,
            "`RawMultiset::kth_element()` - `k` ({k}) out of range `[1, {}]`!",
            self.len
        );
        let mut k = k;
        let mut cur = self.root;
        loop {
            // Rank of `cur` within its own subtree.
            let rank = self.size_of(self.left(cur)) + 1;
            if k == rank {
                return self.value(cur);
            } else if k < rank {
                cur = self.left(cur);
            } else {
                k -= rank;
                cur = self.right(cur);
            }
        }
    }

    /// Counts elements strictly smaller than `x`.
    pub(crate) fn count_less_than(&self, x: &T, op: &impl Fn(&T, &T) -> bool) -> usize {
        let mut count = 0;
        let mut cur = self.root;
        while !cur.is_nil() {
            if op(x, self.value(cur)) {
                cur = self.left(cur);
            } else {
                // Everything we leave behind on a right turn is smaller.
                count += 1 + self.size_of(self.left(cur));
                cur = self.right(cur);
            }
        }
        count
    }

    /// Counts elements in the half-open range `[lo, hi)`.
    pub(crate) fn count_range(&self, lo: &T, hi: &T, op: &impl Fn(&T, &T) -> bool) -> usize {
        if !op(lo, hi) {
            return 0;
        }
        self.count_less_than(hi, op) - self.count_less_than(lo, op)
    }

    /// The largest element smaller than `x`, or the sentinel value.
    pub(crate) fn prev_element(&self, x: &T, op: &impl Fn(&T, &T) -> bool) -> &T {
        let mut best = Handle::NIL;
        let mut cur = self.root;
        while !cur.is_nil() {
            if op(x, self.value(cur)) {
                cur = self.left(cur);
            } else {
                best = cur;
                cur = self.right(cur);
            }
        }
        self.value(best)
    }

    /// The smallest element larger than `x`, or the sentinel value.
    pub(crate) fn next_element(&self, x: &T, op: &impl Fn(&T, &T) -> bool) -> &T {
        let mut best = Handle::NIL;
        let mut cur = self.root;
        while !cur.is_nil() {
            if op(self.value(cur), x) {
                cur = self.right(cur);
            } else {
                best = cur;
                cur = self.left(cur);
            }
        }
        self.value(best)
    }
}

impl<T> RawMultiset<T> {
    /// Inserts `value`, keeping duplicates. Equivalent elements land on the
    /// side the comparator's tie rule dictates, stably in insertion order.
    pub(crate) fn insert(&mut self, value: T, op: &impl Fn(&T, &T) -> bool) {
        self.len += 1;

        // Descend to the insertion parent, bumping every visited subtree
        // size for the node about to be linked below it.
        let mut parent = Handle::NIL;
        let mut goes_right = false;
        let mut cur = self.root;
        while !cur.is_nil() {
            parent = cur;
            goes_right = op(&self.node(cur).value, &value);
            let n = self.node_mut(cur);
            n.size = Size::from_usize(n.size.to_usize() + 1);
            cur = if goes_right { n.right } else { n.left };
        }

        let z = self.nodes.alloc(Node::new(value, parent));
        if parent.is_nil() {
            self.root = z;
        } else if goes_right {
            self.node_mut(parent).right = z;
        } else {
            self.node_mut(parent).left = z;
        }

        self.fix_up_insert(z);
    }

    /// Removes one occurrence of `x`, returning its value, or `None` if no
    /// equivalent element is present.
    pub(crate) fn remove(&mut self, x: &T, op: &impl Fn(&T, &T) -> bool) -> Option<T> {
        let z = self.find(x, op);
        if z.is_nil() {
            return None;
        }
        self.len -= 1;

        // `q` takes the physically removed node's place; `removed_color` is
        // the color that leaves the tree at that position.
        let mut removed_color = self.node(z).color;
        let q;

        if self.left(z).is_nil() {
            q = self.right(z);
            self.decrement_sizes_from(z);
            self.transplant(z, q);
        } else if self.right(z).is_nil() {
            q = self.left(z);
            self.decrement_sizes_from(z);
            self.transplant(z, q);
        } else {
            // Two children: splice out the in-order successor and move it
            // into `z`'s structural position, carrying `z`'s color and
            // (already decremented) subtree size.
            let mut y = self.right(z);
            while !self.left(y).is_nil() {
                y = self.left(y);
            }
            self.decrement_sizes_from(y);

            removed_color = self.node(y).color;
            q = self.right(y);
            if self.parent(y) == z {
                // `q` may be the sentinel; the fix-up needs its parent link.
                self.node_mut(q).parent = y;
            } else {
                self.transplant(y, q);
                let zr = self.right(z);
                self.node_mut(y).right = zr;
                self.node_mut(zr).parent = y;
            }
            self.transplant(z, y);
            let zl = self.left(z);
            self.node_mut(y).left = zl;
            self.node_mut(zl).parent = y;

            let n = self.node(z);
            let (color, size) = (n.color, n.size);
            let y_node = self.node_mut(y);
            y_node.color = color;
            y_node.size = size;
        }

        if removed_color == Color::Black {
            self.fix_up_delete(q);
        }

        Some(self.nodes.take(z).value)
    }

    /// Walks the ancestor chain from `from` to the root, decrementing every
    /// subtree size. Runs before rebalancing, mirroring insertion's
    /// proactive bump.
    fn decrement_sizes_from(&mut self, from: Handle) {
        let mut cur = from;
        while !cur.is_nil() {
            let n = self.node_mut(cur);
            n.size = Size::from_usize(n.size.to_usize() - 1);
            cur = n.parent;
        }
    }

    /// Replaces the subtree rooted at `u` with the one rooted at `v`.
    /// Unconditionally rewrites `v`'s parent link; when `v` is the sentinel
    /// that link is the scratch space the delete fix-up climbs from.
    fn transplant(&mut self, u: Handle, v: Handle) {
        let up = self.parent(u);
        if up.is_nil() {
            self.root = v;
        } else if self.left(up) == u {
            self.node_mut(up).left = v;
        } else {
            self.node_mut(up).right = v;
        }
        self.node_mut(v).parent = up;
    }

    /// Left rotation around `x`. Sizes are the one augmentation-aware step:
    /// the node moving up inherits the old subtree total, the node moving
    /// down recomputes from its new children.
    fn rotate_left(&mut self, x: Handle) {
        let y = self.right(x);
        let yl = self.left(y);
        self.node_mut(x).right = yl;
        if !yl.is_nil() {
            self.node_mut(yl).parent = x;
        }
        let xp = self.parent(x);
        self.node_mut(y).parent = xp;
        if xp.is_nil() {
            self.root = y;
        } else if self.left(xp) == x {
            self.node_mut(xp).left = y;
        } else {
            self.node_mut(xp).right = y;
        }
        self.node_mut(y).left = x;
        self.node_mut(x).parent = y;

        let total = self.node(x).size;
        self.node_mut(y).size = total;
        let recomputed = Size::from_usize(1 + self.size_of(self.left(x)) + self.size_of(self.right(x)));
        self.node_mut(x).size = recomputed;
    }

    /// Mirror image of [`Self::rotate_left`].
    fn rotate_right(&mut self, x: Handle) {
        let y = self.left(x);
        let yr = self.right(y);
        self.node_mut(x).left = yr;
        if !yr.is_nil() {
            self.node_mut(yr).parent = x;
        }
        let xp = self.parent(x);
        self.node_mut(y).parent = xp;
        if xp.is_nil() {
            self.root = y;
        } else if self.right(xp) == x {
            self.node_mut(xp).right = y;
        } else {
            self.node_mut(xp).left = y;
        }
        self.node_mut(y).right = x;
        self.node_mut(x).parent = y;

        let total = self.node(x).size;
        self.node_mut(y).size = total;
        let recomputed = Size::from_usize(1 + self.size_of(self.left(x)) + self.size_of(self.right(x)));
        self.node_mut(x).size = recomputed;
    }

    /// Restores the coloring invariants after linking the red node `z`.
    fn fix_up_insert(&mut self, mut z: Handle) {
        while self.is_red(self.parent(z)) {
            let zp = self.parent(z);
            let zpp = self.parent(zp);
            if zp == self.left(zpp) {
                let uncle = self.right(zpp);
                if self.is_red(uncle) {
                    self.set_color(zp, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(zpp, Color::Red);
                    z = zpp;
                } else {
                    if z == self.right(zp) {
                        z = zp;
                        self.rotate_left(z);
                    }
                    let zp = self.parent(z);
                    let zpp = self.parent(zp);
                    self.set_color(zp, Color::Black);
                    self.set_color(zpp, Color::Red);
                    self.rotate_right(zpp);
                }
            } else {
                let uncle = self.left(zpp);
                if self.is_red(uncle) {
                    self.set_color(zp, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(zpp, Color::Red);
                    z = zpp;
                } else {
                    if z == self.left(zp) {
                        z = zp;
                        self.rotate_right(z);
                    }
                    let zp = self.parent(z);
                    let zpp = self.parent(zp);
                    self.set_color(zp, Color::Black);
                    self.set_color(zpp, Color::Red);
                    self.rotate_left(zpp);
                }
            }
        }
        let root = self.root;
        self.set_color(root, Color::Black);
    }

    /// Restores the coloring invariants after physically removing a black
    /// node; climbs from `x`, the node that took its place (possibly the
    /// sentinel, whose parent link was set by the caller).
    fn fix_up_delete(&mut self, mut x: Handle) {
        while x != self.root && !self.is_red(x) {
            let xp = self.parent(x);
            if x == self.left(xp) {
                let mut w = self.right(xp);
                if self.is_red(w) {
                    self.set_color(w, Color::Black);
                    self.set_color(xp, Color::Red);
                    self.rotate_left(xp);
                    w = self.right(xp);
                }
                if !self.is_red(self.left(w)) && !self.is_red(self.right(w)) {
                    // Both nephews black: push the extra blackness up.
                    self.set_color(w, Color::Red);
                    x = xp;
                } else {
                    if !self.is_red(self.right(w)) {
                        let wl = self.left(w);
                        self.set_color(wl, Color::Black);
                        self.set_color(w, Color::Red);
                        self.rotate_right(w);
                        w = self.right(xp);
                    }
                    let parent_color = self.node(xp).color;
                    self.set_color(w, parent_color);
                    self.set_color(xp, Color::Black);
                    let wr = self.right(w);
                    self.set_color(wr, Color::Black);
                    self.rotate_left(xp);
                    x = self.root;
                }
            } else {
                let mut w = self.left(xp);
                if self.is_red(w) {
                    self.set_color(w, Color::Black);
                    self.set_color(xp, Color::Red);
                    self.rotate_right(xp);
                    w = self.left(xp);
                }
                if !self.is_red(self.left(w)) && !self.is_red(self.right(w)) {
                    self.set_color(w, Color::Red);
                    x = xp;
                } else {
                    if !self.is_red(self.left(w)) {
                        let wr = self.right(w);
                        self.set_color(wr, Color::Black);
                        self.set_color(w, Color::Red);
                        self.rotate_left(w);
                        w = self.left(xp);
                    }
                    let parent_color = self.node(xp).color;
                    self.set_color(w, parent_color);
                    self.set_color(xp, Color::Black);
                    let wl = self.left(w);
                    self.set_color(wl, Color::Black);
                    self.rotate_right(xp);
                    x = self.root;
                }
            }
        }
        self.set_color(x, Color::Black);
    }
}

impl<T: Clone> Clone for RawMultiset<T> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            root: self.root,
            len: self.len,
        }
    }
}

#[cfg(test)]
impl<T> RawMultiset<T> {
    /// Asserts the red-black and augmentation invariants over the whole
    /// tree: sentinel black with size zero, root black, no red-red edge,
    /// equal black-height on every path, exact subtree sizes, consistent
    /// parent links, and `len` equal to the root's subtree size.
    pub(crate) fn check_invariants(&self) {
        assert_eq!(self.node(Handle::NIL).color, Color::Black, "sentinel must be black");
        assert_eq!(self.node(Handle::NIL).size, Size::ZERO, "sentinel size must be zero");
        assert_eq!(self.node(self.root).color, Color::Black, "root must be black");
        let (_, size) = self.check_subtree(self.root, Handle::NIL);
        assert_eq!(size, self.len, "len must equal the root subtree size");
    }

    fn check_subtree(&self, h: Handle, expected_parent: Handle) -> (usize, usize) {
        if h.is_nil() {
            return (1, 0);
        }
        let n = self.node(h);
        assert_eq!(n.parent, expected_parent, "inconsistent parent link");
        if n.color == Color::Red {
            assert!(!self.is_red(n.left), "red node with red left child");
            assert!(!self.is_red(n.right), "red node with red right child");
        }
        let (left_black, left_size) = self.check_subtree(n.left, h);
        let (right_black, right_size) = self.check_subtree(n.right, h);
        assert_eq!(left_black, right_black, "black-height mismatch");
        let size = 1 + left_size + right_size;
        assert_eq!(n.size.to_usize(), size, "stale subtree size");
        (left_black + usize::from(n.color == Color::Black), size)
    }

    /// Collects the elements in symmetric order, for cross-checking.
    pub(crate) fn in_order(&self) -> alloc::vec::Vec<&T> {
        let mut out = alloc::vec::Vec::with_capacity(self.len);
        let mut stack = alloc::vec::Vec::new();
        let mut cur = self.root;
        while !cur.is_nil() || !stack.is_empty() {
            while !cur.is_nil() {
                stack.push(cur);
                cur = self.left(cur);
            }
            let h = stack.pop().unwrap();
            out.push(self.value(h));
            cur = self.right(h);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    fn le(a: &i64, b: &i64) -> bool {
        a <= b
    }

    #[test]
    fn empty_tree() {
        let tree: RawMultiset<i64> = RawMultiset::new(i64::MAX);
        tree.check_invariants();
        assert_eq!(tree.len(), 0);
        assert_eq!(*tree.min(), i64::MAX);
        assert_eq!(*tree.max(), i64::MAX);
        assert!(!tree.contains(&0, &le));
    }

    #[test]
    fn ascending_inserts_stay_balanced() {
        let mut tree = RawMultiset::new(i64::MAX);
        for x in 0..512 {
            tree.insert(x, &le);
            tree.check_invariants();
        }
        assert_eq!(tree.len(), 512);
        assert_eq!(*tree.min(), 0);
        assert_eq!(*tree.max(), 511);
        for k in 1..=512 {
            assert_eq!(*tree.kth_element(k), (k - 1) as i64);
        }
    }

    #[test]
    fn duplicate_heavy_workload() {
        let mut tree = RawMultiset::new(i64::MAX);
        for _ in 0..256 {
            tree.insert(7, &le);
            tree.check_invariants();
        }
        assert_eq!(tree.len(), 256);
        assert!(tree.in_order().iter().all(|&&x| x == 7));
        for _ in 0..256 {
            assert_eq!(tree.remove(&7, &le), Some(7));
            tree.check_invariants();
        }
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.remove(&7, &le), None);
    }

    #[test]
    fn strict_comparator_works_too() {
        // An irreflexive "<" is an equally valid driver; equivalence is
        // detected by `op(x, v) == op(v, x)` either way.
        let lt = |a: &i64, b: &i64| a < b;
        let mut tree = RawMultiset::new(-1);
        for x in [5, 3, 1, 2, 4, 3, 3] {
            tree.insert(x, &lt);
            tree.check_invariants();
        }
        let elements: Vec<i64> = tree.in_order().into_iter().copied().collect();
        assert_eq!(elements, [1, 2, 3, 3, 3, 4, 5]);
        assert_eq!(tree.remove(&3, &lt), Some(3));
        assert!(tree.contains(&3, &lt));
        tree.check_invariants();
    }

    #[test]
    fn clear_keeps_the_sentinel() {
        let mut tree = RawMultiset::new(-1);
        for x in 0..32 {
            tree.insert(x, &le);
        }
        tree.clear();
        tree.check_invariants();
        assert_eq!(tree.len(), 0);
        assert_eq!(*tree.nil_value(), -1);
        tree.insert(5, &le);
        tree.check_invariants();
        assert_eq!(*tree.min(), 5);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Random insert/remove mixes preserve every structural invariant
        /// and agree with a sorted reference vector at every step.
        #[test]
        fn random_ops_preserve_invariants(ops in prop::collection::vec((any::<bool>(), -64i64..64), 0..400)) {
            let mut tree = RawMultiset::new(i64::MAX);
            let mut model: Vec<i64> = Vec::new();

            for (is_insert, x) in ops {
                if is_insert {
                    tree.insert(x, &le);
                    let at = model.partition_point(|&m| m <= x);
                    model.insert(at, x);
                } else {
                    let removed = tree.remove(&x, &le);
                    match model.iter().position(|&m| m == x) {
                        Some(at) => {
                            model.remove(at);
                            prop_assert_eq!(removed, Some(x));
                        }
                        None => prop_assert_eq!(removed, None),
                    }
                }
                tree.check_invariants();
                prop_assert_eq!(tree.len(), model.len());
                let elements: Vec<i64> = tree.in_order().into_iter().copied().collect();
                prop_assert_eq!(elements, model.clone());
            }
        }

        /// `count_less_than` and `kth_element` agree with a sorted model.
        #[test]
        fn rank_queries_match_model(mut values in prop::collection::vec(-64i64..64, 1..200), probe in -70i64..70) {
            let mut tree = RawMultiset::new(i64::MAX);
            for &x in &values {
                tree.insert(x, &le);
            }
            values.sort_unstable();

            prop_assert_eq!(tree.count_less_than(&probe, &le), values.partition_point(|&m| m < probe));
            for (i, &x) in values.iter().enumerate() {
                prop_assert_eq!(*tree.kth_element(i + 1), x);
            }
        }
    }
}
