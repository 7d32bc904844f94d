use core::num::NonZero;

#[cfg(test)]
type RawHandle = u16;
#[cfg(not(test))]
type RawHandle = u32;

/// An arena index with a niche, so `Option<Handle>` costs nothing extra.
///
/// Slot 0 of the node arena is reserved for the sentinel, making
/// [`Handle::NIL`] an ordinary, dereferenceable handle. Every link in the
/// tree is therefore always valid; "no child" is a link to the sentinel.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Handle(NonZero<RawHandle>);

impl Handle {
    pub(crate) const MAX: usize = (RawHandle::MAX - 1) as usize;

    /// The handle of the reserved sentinel slot.
    pub(crate) const NIL: Self = Self::from_index(0);

    #[inline]
    pub(crate) const fn from_index(index: usize) -> Self {
        assert!(index <= Self::MAX, "`Handle::from_index()` - `index` > `Handle::MAX`!");
        // SAFETY: `index + 1` cannot be zero and cannot overflow.
        #[allow(clippy::cast_possible_truncation)]
        Self(NonZero::new((index + 1) as RawHandle).unwrap())
    }

    #[inline]
    pub(crate) const fn to_index(self) -> usize {
        (self.0.get() - 1) as usize
    }

    /// Returns true if this handle refers to the sentinel.
    #[inline]
    pub(crate) const fn is_nil(self) -> bool {
        self.0.get() == 1
    }
}
