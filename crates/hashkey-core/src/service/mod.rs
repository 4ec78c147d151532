//! Services (use cases).
//!
//! Services depend on traits (ports) -- never on concrete infrastructure
//! implementations.

pub mod digest;
pub mod hash;
