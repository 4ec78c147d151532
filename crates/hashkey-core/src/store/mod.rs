//! Storage for completed digests.

pub mod result;
