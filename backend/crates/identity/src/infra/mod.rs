//! Infrastructure Layer
//!
//! User store adapters.

pub mod memory;
