//! Cache backend implementations

#[cfg(feature = "memory")]
pub mod memory;

#[cfg(feature = "redis-backend")]
pub mod redis;

#[cfg(feature = "memory")]
pub use memory::*;

#[cfg(feature = "redis-backend")]
pub use redis::*;
