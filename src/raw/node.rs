use super::handle::Handle;
use super::size::Size;

/// Node color for red-black balancing.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Black,
    Red,
}

/// A red-black tree node augmented with its subtree element count.
///
/// All three links are plain arena handles; a link to [`Handle::NIL`] means
/// "no node". Because the sentinel is itself a live arena slot, the
/// structural algorithms never branch on a missing link.
#[derive(Clone)]
pub(crate) struct Node<T> {
    pub(crate) value: T,
    pub(crate) parent: Handle,
    pub(crate) left: Handle,
    pub(crate) right: Handle,
    pub(crate) color: Color,
    /// Count of real nodes in the subtree rooted here, inclusive.
    pub(crate) size: Size,
}

impl<T> Node<T> {
    /// A freshly inserted node: red, leaf-linked to the sentinel.
    pub(crate) const fn new(value: T, parent: Handle) -> Self {
        Self {
            value,
            parent,
            left: Handle::NIL,
            right: Handle::NIL,
            color: Color::Red,
            size: Size::ONE,
        }
    }

    /// The sentinel node. Black with size zero; its value slot holds the
    /// caller-supplied out-of-domain value and is never compared against
    /// real elements.
    pub(crate) const fn nil(nil_value: T) -> Self {
        Self {
            value: nil_value,
            parent: Handle::NIL,
            left: Handle::NIL,
            right: Handle::NIL,
            color: Color::Black,
            size: Size::ZERO,
        }
    }
}
