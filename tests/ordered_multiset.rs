use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rankset::{NotFoundError, OrderedMultiset, Rank};

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

const SENTINEL: i64 = i64::MAX;

fn le(a: &i64, b: &i64) -> bool {
    a <= b
}

fn new_set() -> OrderedMultiset<i64, fn(&i64, &i64) -> bool> {
    OrderedMultiset::new(le, SENTINEL)
}

/// An independently maintained sorted reference structure.
#[derive(Default)]
struct Model {
    sorted: Vec<i64>,
}

impl Model {
    fn insert(&mut self, x: i64) {
        let at = self.sorted.partition_point(|&m| m <= x);
        self.sorted.insert(at, x);
    }

    fn remove(&mut self, x: i64) -> bool {
        match self.sorted.binary_search(&x) {
            Ok(at) => {
                self.sorted.remove(at);
                true
            }
            Err(_) => false,
        }
    }

    fn count_less_than(&self, x: i64) -> usize {
        self.sorted.partition_point(|&m| m < x)
    }
}

/// Generates values in a range narrow enough to force duplicates.
fn value_strategy() -> impl Strategy<Value = i64> {
    -200i64..200i64
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum SetOp {
    Insert(i64),
    Remove(i64),
    Contains(i64),
    Min,
    Max,
    Kth(usize),
    CountLessThan(i64),
    CountRange(i64, i64),
    Prev(i64),
    Next(i64),
}

fn set_op_strategy() -> impl Strategy<Value = SetOp> {
    prop_oneof![
        6 => value_strategy().prop_map(SetOp::Insert),
        4 => value_strategy().prop_map(SetOp::Remove),
        2 => value_strategy().prop_map(SetOp::Contains),
        1 => Just(SetOp::Min),
        1 => Just(SetOp::Max),
        1 => any::<usize>().prop_map(SetOp::Kth),
        2 => value_strategy().prop_map(SetOp::CountLessThan),
        2 => (value_strategy(), value_strategy()).prop_map(|(lo, hi)| SetOp::CountRange(lo, hi)),
        1 => value_strategy().prop_map(SetOp::Prev),
        1 => value_strategy().prop_map(SetOp::Next),
    ]
}

// ─── Randomized model-based cross-checks ─────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays a random operation sequence on both the multiset and a sorted
    /// reference vector and asserts identical results at every step.
    #[test]
    fn ops_match_sorted_reference(ops in proptest::collection::vec(set_op_strategy(), TEST_SIZE)) {
        let mut set = new_set();
        let mut model = Model::default();

        for op in &ops {
            match *op {
                SetOp::Insert(x) => {
                    set.insert(x);
                    model.insert(x);
                }
                SetOp::Remove(x) => {
                    let expected = if model.remove(x) { Ok(x) } else { Err(NotFoundError) };
                    prop_assert_eq!(set.remove(&x), expected, "remove({})", x);
                }
                SetOp::Contains(x) => {
                    prop_assert_eq!(set.contains(&x), model.sorted.binary_search(&x).is_ok(), "contains({})", x);
                }
                SetOp::Min => {
                    let expected = model.sorted.first().copied().unwrap_or(SENTINEL);
                    prop_assert_eq!(*set.min(), expected, "min()");
                }
                SetOp::Max => {
                    let expected = model.sorted.last().copied().unwrap_or(SENTINEL);
                    prop_assert_eq!(*set.max(), expected, "max()");
                }
                SetOp::Kth(k) => {
                    if model.sorted.is_empty() {
                        continue;
                    }
                    let k = 1 + k % model.sorted.len();
                    prop_assert_eq!(*set.kth_element(k), model.sorted[k - 1], "kth_element({})", k);
                }
                SetOp::CountLessThan(x) => {
                    prop_assert_eq!(set.count_less_than(&x), model.count_less_than(x), "count_less_than({})", x);
                }
                SetOp::CountRange(lo, hi) => {
                    let expected = if lo <= hi {
                        model.count_less_than(hi) - model.count_less_than(lo)
                    } else {
                        0
                    };
                    prop_assert_eq!(set.count_range(&lo, &hi), expected, "count_range({}, {})", lo, hi);
                }
                SetOp::Prev(x) => {
                    let at = model.count_less_than(x);
                    let expected = if at == 0 { SENTINEL } else { model.sorted[at - 1] };
                    prop_assert_eq!(*set.prev_element(&x), expected, "prev_element({})", x);
                }
                SetOp::Next(x) => {
                    let at = model.sorted.partition_point(|&m| m <= x);
                    let expected = model.sorted.get(at).copied().unwrap_or(SENTINEL);
                    prop_assert_eq!(*set.next_element(&x), expected, "next_element({})", x);
                }
            }

            prop_assert_eq!(set.len(), model.sorted.len());
            prop_assert_eq!(set.is_empty(), model.sorted.is_empty());
        }

        // Iteration yields the reference content: ascending, duplicates kept.
        let elements: Vec<i64> = set.iter().copied().collect();
        prop_assert_eq!(elements, model.sorted);
    }

    /// Iterating after any insert sequence yields a non-decreasing sequence
    /// whose length matches `len()`.
    #[test]
    fn iteration_is_sorted_and_exact(values in proptest::collection::vec(value_strategy(), 0..TEST_SIZE)) {
        let mut set = new_set();
        for &x in &values {
            set.insert(x);
        }

        let elements: Vec<i64> = set.iter().copied().collect();
        prop_assert_eq!(elements.len(), set.len());
        prop_assert!(elements.windows(2).all(|w| w[0] <= w[1]));
    }

    /// Rank/kth duality: for every k,
    /// `count_less_than(kth(k)) < k <= count_less_than(kth(k)) + multiplicity`.
    #[test]
    fn rank_kth_duality(values in proptest::collection::vec(value_strategy(), 1..500)) {
        let mut set = new_set();
        for &x in &values {
            set.insert(x);
        }

        for k in 1..=set.len() {
            let x = *set.kth_element(k);
            let below = set.count_less_than(&x);
            let multiplicity = set.count_range(&x, &(x + 1));
            prop_assert!(below < k && k <= below + multiplicity, "k = {}, x = {}", k, x);
        }
    }

    /// Range additivity: `count_range(a, c) == count_range(a, b) + count_range(b, c)`
    /// whenever `a <= b <= c`.
    #[test]
    fn range_additivity(values in proptest::collection::vec(value_strategy(), 0..500),
                        mut bounds in proptest::array::uniform3(value_strategy())) {
        let mut set = new_set();
        for &x in &values {
            set.insert(x);
        }

        bounds.sort_unstable();
        let [a, b, c] = bounds;
        prop_assert_eq!(set.count_range(&a, &c), set.count_range(&a, &b) + set.count_range(&b, &c));
    }

    /// Inserting then removing any element restores the prior multiset.
    #[test]
    fn insert_remove_inverse(values in proptest::collection::vec(value_strategy(), 0..500), x in value_strategy()) {
        let mut set = new_set();
        for &v in &values {
            set.insert(v);
        }
        let before: Vec<i64> = set.iter().copied().collect();

        set.insert(x);
        assert_eq!(set.remove(&x), Ok(x));

        let after: Vec<i64> = set.iter().copied().collect();
        prop_assert_eq!(before, after);
    }
}

// ─── Concrete scenarios ──────────────────────────────────────────────────────

#[test]
fn basic_example() {
    let mut set = OrderedMultiset::new(|a: &i64, b: &i64| a <= b, 1 << 60);

    for x in [5, 3, 1, 2, 4] {
        set.insert(x);
    }

    assert_eq!(set.len(), 5);
    assert_eq!(*set.max(), 5);
    assert_eq!(*set.min(), 1);
    assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 2, 3, 4, 5]);

    for x in [1, 4, 2, 5, 3] {
        set.remove(&x).unwrap();
    }

    assert!(set.is_empty());
    assert_eq!(*set.min(), 1 << 60);
    assert_eq!(*set.max(), 1 << 60);
}

#[test]
fn remove_absent_element_is_an_error() {
    let mut set = OrderedMultiset::new(|a: &(u32, char), b: &(u32, char)| a <= b, (u32::MAX, '\0'));

    for (i, letter) in ('a'..='z').enumerate() {
        set.insert((i as u32, letter));
    }
    assert_eq!(set.len(), 26);

    for (i, letter) in ('a'..='z').enumerate() {
        assert_eq!(set.remove(&(i as u32, letter)), Ok((i as u32, letter)));
    }

    assert!(set.is_empty());
    assert_eq!(set.remove(&(0, '?')), Err(NotFoundError));
}

#[test]
fn duplicate_heavy_workload() {
    let n = 5_000;
    let mut set = new_set();

    for _ in 0..n {
        set.insert(42);
    }
    assert_eq!(set.len(), n);
    assert_eq!(set.iter().filter(|&&x| x == 42).count(), n);

    for _ in 0..n {
        set.remove(&42).unwrap();
    }
    assert!(set.is_empty());
}

#[test]
fn large_shuffled_workload() {
    // Deterministic LCG shuffle, large enough to exercise deep fix-ups.
    let n = 50_000usize;
    let mut order: Vec<i64> = (0..n as i64).collect();
    let mut state = 0x2545_F491_4F6C_DD1Du64;
    for i in (1..n).rev() {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        order.swap(i, (state % (i as u64 + 1)) as usize);
    }

    let mut set = new_set();
    for &x in &order {
        set.insert(x);
    }
    assert!(set.iter().copied().eq(0..n as i64));

    for &x in &order {
        set.remove(&x).unwrap();
    }
    assert!(set.is_empty());
}

// ─── Contract violations ─────────────────────────────────────────────────────

#[test]
#[should_panic(expected = "out of range")]
fn kth_element_zero_panics() {
    let mut set = new_set();
    set.insert(1);
    let _ = set.kth_element(0);
}

#[test]
#[should_panic(expected = "out of range")]
fn kth_element_past_len_panics() {
    let mut set = new_set();
    set.insert(1);
    let _ = set.kth_element(2);
}

#[test]
#[should_panic(expected = "out of range")]
fn rank_index_out_of_bounds_panics() {
    let set = new_set();
    let _ = set[Rank(0)];
}

// ─── API surface details ─────────────────────────────────────────────────────

#[test]
fn rank_indexing() {
    let mut set = new_set();
    set.extend([30, 10, 20, 10]);

    assert_eq!(set[Rank(0)], 10);
    assert_eq!(set[Rank(1)], 10);
    assert_eq!(set[Rank(3)], 30);
}

#[test]
fn iterator_is_exact_and_fused() {
    let mut set = new_set();
    set.extend([2, 1, 3]);

    let mut iter = set.iter();
    assert_eq!(iter.len(), 3);
    assert_eq!(iter.next(), Some(&1));
    assert_eq!(iter.len(), 2);
    assert_eq!(iter.size_hint(), (2, Some(2)));

    assert_eq!(iter.next(), Some(&2));
    assert_eq!(iter.next(), Some(&3));
    assert_eq!(iter.next(), None);
    assert_eq!(iter.next(), None);
    assert_eq!(iter.len(), 0);
}

#[test]
fn clear_and_reuse() {
    let mut set = new_set();
    set.extend([1, 2, 3]);
    set.clear();

    assert!(set.is_empty());
    assert_eq!(*set.min(), SENTINEL);

    set.insert(9);
    assert_eq!(*set.min(), 9);
    assert_eq!(set.len(), 1);
}

#[test]
fn clone_is_independent() {
    let mut set = new_set();
    set.extend([1, 2, 3]);

    let mut copy = set.clone();
    copy.insert(4);

    assert_eq!(set.len(), 3);
    assert_eq!(copy.len(), 4);
    assert_eq!(copy.iter().copied().collect::<Vec<_>>(), [1, 2, 3, 4]);
}

#[test]
fn custom_comparator_orders_by_second_field() {
    // Order pairs by their second component only; the first component is
    // payload and ties between equal seconds keep insertion order.
    let mut set = OrderedMultiset::new(|a: &(u32, i64), b: &(u32, i64)| a.1 <= b.1, (0, i64::MAX));

    set.insert((1, 30));
    set.insert((2, 10));
    set.insert((3, 20));
    set.insert((4, 10));

    let order: Vec<u32> = set.iter().map(|&(id, _)| id).collect();
    assert_eq!(order, [2, 4, 3, 1]);
    assert_eq!(set.count_less_than(&(0, 20)), 2);
}
