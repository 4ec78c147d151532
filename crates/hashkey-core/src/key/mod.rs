//! Retrieval key allocation.

pub mod allocator;
