// component.rs - Component type registration and per-type stores
//
// Components are identified by small sequential slots handed out in
// registration order. A slot doubles as the component's bit in a Signature.

use crate::ecs::{ComponentSlot, ComponentStore, Entity, ErasedStore, WorldError, MAX_COMPONENTS};
use std::any::{type_name, TypeId};
use std::collections::HashMap;

/// Marker for types that can be attached to entities.
///
/// Any `'static` type qualifies; registration with the world is what makes it
/// usable.
pub trait Component: 'static {}

impl<T: 'static> Component for T {}

/// Registration record for one component type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentInfo {
    pub slot: ComponentSlot,
    pub name: &'static str,
    pub type_id: TypeId,
}

/// Component type registry plus the store for every registered type.
///
/// Stores are kept in a `Vec` indexed by slot so that iteration (for example
/// purging a destroyed entity) always happens in registration order.
pub struct Components {
    capacity: u32,
    lookup: HashMap<TypeId, ComponentSlot>,
    infos: Vec<ComponentInfo>,
    stores: Vec<Box<dyn ErasedStore>>,
}

impl Components {
    /// Every store created by this registry holds up to `capacity` entities.
    pub fn new(capacity: u32) -> Self {
        Self {
            capacity,
            lookup: HashMap::new(),
            infos: Vec::new(),
            stores: Vec::new(),
        }
    }

    /// Register `T`, returning its slot. Registering again returns the same slot.
    pub fn register<T: Component>(&mut self) -> Result<ComponentSlot, WorldError> {
        let type_id = TypeId::of::<T>();
        if let Some(&slot) = self.lookup.get(&type_id) {
            return Ok(slot);
        }
        if self.infos.len() >= MAX_COMPONENTS {
            return Err(WorldError::TooManyComponentTypes {
                limit: MAX_COMPONENTS,
                type_name: type_name::<T>(),
            });
        }

        let slot = self.infos.len() as ComponentSlot;
        self.lookup.insert(type_id, slot);
        self.infos.push(ComponentInfo {
            slot,
            name: type_name::<T>(),
            type_id,
        });
        self.stores
            .push(Box::new(ComponentStore::<T>::new(self.capacity)));

        tracing::debug!(component = type_name::<T>(), slot, "registered component type");
        Ok(slot)
    }

    pub fn slot_of<T: Component>(&self) -> Result<ComponentSlot, WorldError> {
        self.lookup
            .get(&TypeId::of::<T>())
            .copied()
            .ok_or(WorldError::UnregisteredType {
                type_name: type_name::<T>(),
            })
    }

    pub fn is_registered<T: Component>(&self) -> bool {
        self.lookup.contains_key(&TypeId::of::<T>())
    }

    pub fn store<T: Component>(&self) -> Result<&ComponentStore<T>, WorldError> {
        let slot = self.slot_of::<T>()?;
        self.stores[slot as usize]
            .as_any()
            .downcast_ref::<ComponentStore<T>>()
            .ok_or(WorldError::UnregisteredType {
                type_name: type_name::<T>(),
            })
    }

    /// Structural access to a store; the world pairs every insert and
    /// remove with a signature update, so this stays crate-private.
    pub(crate) fn store_mut<T: Component>(&mut self) -> Result<&mut ComponentStore<T>, WorldError> {
        let slot = self.slot_of::<T>()?;
        self.stores[slot as usize]
            .as_any_mut()
            .downcast_mut::<ComponentStore<T>>()
            .ok_or(WorldError::UnregisteredType {
                type_name: type_name::<T>(),
            })
    }

    pub fn get<T: Component>(&self, entity: Entity) -> Result<&T, WorldError> {
        self.store::<T>()?.get(entity)
    }

    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Result<&mut T, WorldError> {
        self.store_mut::<T>()?.get_mut(entity)
    }

    /// False for unregistered types as well as for missing components.
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.store::<T>().is_ok_and(|store| store.has(entity))
    }

    /// Purge `entity` from every store, in registration order.
    pub fn entity_destroyed(&mut self, entity: Entity) {
        for store in &mut self.stores {
            if store.entity_destroyed(entity) {
                tracing::trace!(%entity, component = store.component_name(), "purged component");
            }
        }
    }

    pub fn infos(&self) -> &[ComponentInfo] {
        &self.infos
    }

    /// Number of registered component types.
    pub fn len(&self) -> usize {
        self.infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }
}
