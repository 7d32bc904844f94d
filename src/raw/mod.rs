mod arena;
mod handle;
mod node;
mod raw_multiset;
mod size;

pub(crate) use handle::Handle;
pub(crate) use raw_multiset::RawMultiset;
