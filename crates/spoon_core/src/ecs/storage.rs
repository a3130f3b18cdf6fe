// storage.rs - Dense per-type component storage
//
// Each registered component type owns one ComponentStore. Values live in a
// gap-free array; removal swap-removes so iteration stays dense. Only
// entity-keyed lookups are stable across removals, never raw indices.

use crate::ecs::{Entity, WorldError};
use std::any::{type_name, Any};

/// Dense, capacity-bounded storage for one component type.
///
/// Backed by three parallel structures:
/// - `values`: the packed component values
/// - `entities`: dense index -> owning entity
/// - `sparse`: entity index -> dense index
///
/// All three are allocated up front for `capacity` entities, so inserting
/// never reallocates while the world is running.
pub struct ComponentStore<T> {
    values: Vec<T>,
    entities: Vec<Entity>,
    sparse: Vec<Option<u32>>,
    capacity: u32,
}

impl<T: 'static> ComponentStore<T> {
    pub(crate) fn new(capacity: u32) -> Self {
        Self {
            values: Vec::with_capacity(capacity as usize),
            entities: Vec::with_capacity(capacity as usize),
            sparse: vec![None; capacity as usize + 1],
            capacity,
        }
    }

    /// Attach `value` to `entity`.
    ///
    /// An existing value is overwritten in place and returned. Only the world
    /// calls this, since the entity's signature has to change alongside.
    pub(crate) fn insert(&mut self, entity: Entity, value: T) -> Result<Option<T>, WorldError> {
        let index = entity.index();
        if index == 0 || index > self.capacity {
            return Err(WorldError::OutOfRange {
                index,
                capacity: self.capacity,
            });
        }
        if let Some(dense) = self.dense_index(entity) {
            return Ok(Some(std::mem::replace(&mut self.values[dense], value)));
        }

        let dense = self.values.len();
        if dense >= self.capacity as usize {
            return Err(WorldError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        debug_assert!(
            self.sparse[index as usize].is_none(),
            "slot {index} still holds a previous generation"
        );

        self.values.push(value);
        self.entities.push(entity);
        self.sparse[index as usize] = Some(dense as u32);
        Ok(None)
    }

    /// Detach and return the value for `entity`, filling the hole with the last element.
    pub(crate) fn remove(&mut self, entity: Entity) -> Option<T> {
        let removed = self.dense_index(entity)?;

        let value = self.values.swap_remove(removed);
        self.entities.swap_remove(removed);
        self.sparse[entity.index() as usize] = None;

        // The former last element now sits at `removed`.
        if let Some(moved) = self.entities.get(removed) {
            self.sparse[moved.index() as usize] = Some(removed as u32);
        }
        Some(value)
    }

    pub fn get(&self, entity: Entity) -> Result<&T, WorldError> {
        match self.dense_index(entity) {
            Some(dense) => Ok(&self.values[dense]),
            None => Err(Self::not_found(entity)),
        }
    }

    pub fn get_mut(&mut self, entity: Entity) -> Result<&mut T, WorldError> {
        match self.dense_index(entity) {
            Some(dense) => Ok(&mut self.values[dense]),
            None => Err(Self::not_found(entity)),
        }
    }

    #[inline]
    pub fn has(&self, entity: Entity) -> bool {
        self.dense_index(entity).is_some()
    }

    /// Owning entities in dense order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Packed values in dense order.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.entities.iter().copied().zip(self.values.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.entities.iter().copied().zip(self.values.iter_mut())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    fn dense_index(&self, entity: Entity) -> Option<usize> {
        let dense = (*self.sparse.get(entity.index() as usize)?)? as usize;
        (self.entities[dense] == entity).then_some(dense)
    }

    fn not_found(entity: Entity) -> WorldError {
        WorldError::ComponentNotFound {
            entity,
            component: type_name::<T>(),
        }
    }
}

/// Type-erased view of a [`ComponentStore`].
///
/// The world only needs `entity_destroyed` generically; typed access goes
/// through a downcast at the call site.
pub trait ErasedStore: Any {
    /// Drop the entity's value if it has one. Returns whether anything was removed.
    fn entity_destroyed(&mut self, entity: Entity) -> bool;

    fn len(&self) -> usize;

    fn component_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: 'static> ErasedStore for ComponentStore<T> {
    fn entity_destroyed(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_some()
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn component_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
