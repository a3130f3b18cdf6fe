use crate::ecs::{Entity, Signature, WorldError};
use std::collections::VecDeque;

/// Allocates entity handles from a fixed pool and stores each entity's signature.
///
/// Indices run from `1` to `capacity` inclusive; index 0 stays reserved for
/// [`Entity::INVALID`]. Freed indices go to the back of a FIFO queue, so a slot
/// is reused as late as possible.
pub struct EntityRegistry {
    capacity: u32,
    available: VecDeque<u32>,
    slots: Vec<EntitySlot>,
    living: u32,
}

#[derive(Clone, Copy, Default)]
struct EntitySlot {
    generation: u32,
    alive: bool,
    signature: Signature,
}

impl EntityRegistry {
    pub fn new(capacity: u32) -> Self {
        Self {
            capacity,
            available: (1..=capacity).collect(),
            slots: vec![EntitySlot::default(); capacity as usize + 1],
            living: 0,
        }
    }

    /// Hand out the next free index with an empty signature.
    pub fn create(&mut self) -> Result<Entity, WorldError> {
        if self.living >= self.capacity {
            return Err(WorldError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        let index = self
            .available
            .pop_front()
            .ok_or(WorldError::CapacityExceeded {
                capacity: self.capacity,
            })?;

        let slot = &mut self.slots[index as usize];
        slot.alive = true;
        slot.signature.reset();
        self.living += 1;

        Ok(Entity::new(index, slot.generation))
    }

    /// Return an entity's index to the pool.
    ///
    /// Nothing is touched unless the handle refers to the live occupant of its slot.
    pub fn destroy(&mut self, entity: Entity) -> Result<(), WorldError> {
        let slot = self.slot_mut(entity)?;
        if !slot.alive {
            return Err(WorldError::DoubleDestroy { entity });
        }
        if slot.generation != entity.generation() {
            return Err(WorldError::StaleEntity { entity });
        }

        slot.alive = false;
        slot.signature.reset();
        slot.generation = slot.generation.wrapping_add(1);
        self.available.push_back(entity.index());
        self.living -= 1;
        Ok(())
    }

    pub fn signature(&self, entity: Entity) -> Result<Signature, WorldError> {
        self.validate(entity)?;
        Ok(self.slots[entity.index() as usize].signature)
    }

    pub fn set_signature(&mut self, entity: Entity, signature: Signature) -> Result<(), WorldError> {
        self.validate(entity)?;
        self.slots[entity.index() as usize].signature = signature;
        Ok(())
    }

    /// Check that `entity` is in range and is the live occupant of its slot.
    pub fn validate(&self, entity: Entity) -> Result<(), WorldError> {
        self.check_range(entity)?;
        let slot = &self.slots[entity.index() as usize];
        if slot.alive && slot.generation == entity.generation() {
            Ok(())
        } else {
            Err(WorldError::StaleEntity { entity })
        }
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.validate(entity).is_ok()
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn living_count(&self) -> u32 {
        self.living
    }

    /// Living entities with their signatures, in index order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, Signature)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, slot)| slot.alive)
            .map(|(index, slot)| (Entity::new(index as u32, slot.generation), slot.signature))
    }

    fn check_range(&self, entity: Entity) -> Result<(), WorldError> {
        if entity.index() == 0 || entity.index() > self.capacity {
            return Err(WorldError::OutOfRange {
                index: entity.index(),
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    fn slot_mut(&mut self, entity: Entity) -> Result<&mut EntitySlot, WorldError> {
        self.check_range(entity)?;
        Ok(&mut self.slots[entity.index() as usize])
    }
}
