//! Entity handle with generational index
//!
//! Entities are lightweight handles (8 bytes) that identify a slot in the
//! world's entity table. The generation counter prevents a handle from
//! silently aliasing whatever entity later reuses the same slot.

use std::fmt;

/// Entity handle (generation-indexed for safety)
///
/// Format: [32-bit index | 32-bit generation]
/// - Index: Slot in the entity table, `1..=capacity`. Index 0 is never handed out.
/// - Generation: Incremented every time the slot is destroyed
///
/// Example:
/// ```ignore
/// let entity = world.create_entity()?;
/// world.destroy_entity(entity)?;
/// // entity handle is now stale (generation mismatch once the slot is reused)
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity {
    index: u32,
    generation: u32,
}

impl Entity {
    /// The reserved "no entity" handle.
    pub const INVALID: Entity = Entity {
        index: 0,
        generation: 0,
    };

    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    #[inline]
    pub fn index(&self) -> u32 {
        self.index
    }

    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Whether this handle could refer to an entity at all. Says nothing about liveness.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.index != 0
    }

    /// Serialize to 64-bit integer (for save files and editor selection)
    pub fn to_bits(&self) -> u64 {
        ((self.generation as u64) << 32) | (self.index as u64)
    }

    /// Deserialize from 64-bit integer
    pub fn from_bits(bits: u64) -> Self {
        Self {
            index: bits as u32,
            generation: (bits >> 32) as u32,
        }
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_round_trip_keeps_generation() {
        let entity = Entity::new(42, 7);
        let restored = Entity::from_bits(entity.to_bits());
        assert_eq!(restored, entity);
        assert_eq!(restored.generation(), 7);
        assert_eq!(entity.to_string(), "42v7");
    }

    #[test]
    fn default_handle_is_invalid() {
        assert!(!Entity::default().is_valid());
        assert!(Entity::new(1, 0).is_valid());
    }
}
