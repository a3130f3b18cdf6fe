//! Spoon Engine Core
//!
//! Contains the fundamental simulation substrate:
//! - Entity Component System (ECS)
//! - World configuration
//! - Frame time tracking

pub mod config;
pub mod ecs;
pub mod time;

pub use config::{ConfigError, WorldConfig};
pub use ecs::{Entity, Signature, System, World, WorldError};

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
