use core::fmt;

/// Error returned by [`remove`](crate::OrderedMultiset::remove) when no
/// equivalent element is present.
///
/// Removing an absent element is caller misuse rather than a normal-path
/// miss, so the error is deliberately must-handle instead of a silent no-op.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NotFoundError;

impl fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("no equivalent element in the multiset")
    }
}

impl core::error::Error for NotFoundError {}
