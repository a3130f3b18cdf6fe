// world.rs - ECS World facade
//
// Composes the entity registry, the component stores and the system registry.
// Every structural change runs store -> signature -> membership before
// returning, and validates up front so a failed call changes nothing.

use crate::config::{ConfigError, WorldConfig};
use crate::ecs::{
    Component, ComponentSlot, Components, Entity, EntityRegistry, Renderer, Signature, System,
    SystemHandle, SystemRegistry, WorldError,
};
use spoon_metrics::SystemProfiler;
use std::collections::BTreeSet;

/// The main ECS world containing all entities, components and systems.
pub struct World {
    entities: EntityRegistry,
    components: Components,
    systems: SystemRegistry,
}

impl World {
    /// Create a world with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(WorldConfig::default().capacity)
    }

    /// Create a world that holds at most `capacity` live entities.
    ///
    /// All per-entity tables are allocated here; nothing grows afterwards.
    pub fn with_capacity(capacity: u32) -> Self {
        tracing::debug!(capacity, "creating world");
        Self {
            entities: EntityRegistry::new(capacity),
            components: Components::new(capacity),
            systems: SystemRegistry::new(),
        }
    }

    pub fn from_config(config: &WorldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_capacity(config.capacity))
    }

    // ------------------------------------------------------------------
    // Entities
    // ------------------------------------------------------------------

    pub fn create_entity(&mut self) -> Result<Entity, WorldError> {
        let entity = self.entities.create()?;
        // An empty signature still satisfies systems that require nothing.
        self.systems
            .entity_signature_changed(entity, Signature::EMPTY);
        tracing::trace!(%entity, "created entity");
        Ok(entity)
    }

    /// Destroy `entity`, dropping all of its components.
    ///
    /// Destroying an entity twice yields `DoubleDestroy`; a handle whose slot
    /// has since been reused yields `StaleEntity`.
    pub fn destroy_entity(&mut self, entity: Entity) -> Result<(), WorldError> {
        self.entities.destroy(entity)?;
        self.components.entity_destroyed(entity);
        self.systems.entity_destroyed(entity);
        tracing::trace!(%entity, "destroyed entity");
        Ok(())
    }

    /// Destroy every living entity.
    pub fn clear(&mut self) {
        let living: Vec<Entity> = self.entities.iter().map(|(entity, _)| entity).collect();
        let count = living.len();
        for entity in living {
            self.components.entity_destroyed(entity);
            self.systems.entity_destroyed(entity);
            if let Err(err) = self.entities.destroy(entity) {
                tracing::warn!(%entity, %err, "failed to destroy entity during clear");
            }
        }
        tracing::debug!(count, "cleared world");
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Living entities in index order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.iter().map(|(entity, _)| entity)
    }

    pub fn living_count(&self) -> u32 {
        self.entities.living_count()
    }

    pub fn capacity(&self) -> u32 {
        self.entities.capacity()
    }

    pub fn signature(&self, entity: Entity) -> Result<Signature, WorldError> {
        self.entities.signature(entity)
    }

    // ------------------------------------------------------------------
    // Components
    // ------------------------------------------------------------------

    /// Register component type `T`. Idempotent; returns the type's slot.
    pub fn register_component<T: Component>(&mut self) -> Result<ComponentSlot, WorldError> {
        self.components.register::<T>()
    }

    /// Slot of a registered component type, for building signatures.
    ///
    /// # Panics
    /// If `T` was never registered.
    pub fn component_slot<T: Component>(&self) -> ComponentSlot {
        self.components
            .slot_of::<T>()
            .unwrap_or_else(|err| panic!("{err}"))
    }

    /// Attach `component` to `entity`, returning the value it replaced.
    ///
    /// # Panics
    /// If `T` was never registered.
    pub fn add_component<T: Component>(
        &mut self,
        entity: Entity,
        component: T,
    ) -> Result<Option<T>, WorldError> {
        let slot = self.component_slot::<T>();
        let mut signature = self.entities.signature(entity)?;

        let previous = self.components.store_mut::<T>()?.insert(entity, component)?;
        signature.set(slot);
        self.entities.set_signature(entity, signature)?;
        self.systems.entity_signature_changed(entity, signature);

        Ok(previous)
    }

    /// Detach `T` from `entity`. Returns `None` if it had no such component.
    ///
    /// # Panics
    /// If `T` was never registered.
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Result<Option<T>, WorldError> {
        let slot = self.component_slot::<T>();
        let mut signature = self.entities.signature(entity)?;

        let Some(removed) = self.components.store_mut::<T>()?.remove(entity) else {
            return Ok(None);
        };
        signature.clear(slot);
        self.entities.set_signature(entity, signature)?;
        self.systems.entity_signature_changed(entity, signature);

        Ok(Some(removed))
    }

    /// # Panics
    /// If `T` was never registered.
    pub fn get_component<T: Component>(&self, entity: Entity) -> Result<&T, WorldError> {
        self.component_slot::<T>();
        self.entities.validate(entity)?;
        self.components.get::<T>(entity)
    }

    /// # Panics
    /// If `T` was never registered.
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Result<&mut T, WorldError> {
        self.component_slot::<T>();
        self.entities.validate(entity)?;
        self.components.get_mut::<T>(entity)
    }

    /// Whether `entity` is alive and currently holds a `T`.
    ///
    /// Never fails: an unregistered type or a dead handle is simply `false`.
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity) && self.components.has::<T>(entity)
    }

    pub fn components(&self) -> &Components {
        &self.components
    }

    // ------------------------------------------------------------------
    // Systems
    // ------------------------------------------------------------------

    /// Register system `S`, constructing it with `Default`. Idempotent.
    pub fn register_system<S: System + Default>(&mut self) -> SystemHandle<S> {
        self.systems.register(S::default, self.entities.iter())
    }

    /// Register a pre-built system. If `S` is already registered, `system` is
    /// dropped and the existing instance is returned.
    pub fn register_system_with<S: System>(&mut self, system: S) -> SystemHandle<S> {
        self.systems.register(move || system, self.entities.iter())
    }

    /// Set the component combination `S` requires and rebuild its membership.
    ///
    /// # Panics
    /// If `S` was never registered.
    pub fn set_system_signature<S: System>(&mut self, signature: Signature) {
        if let Err(err) = self
            .systems
            .set_signature::<S, _>(signature, self.entities.iter())
        {
            panic!("{err}");
        }
    }

    /// Current members of `S`, if registered.
    pub fn system_entities<S: System>(&self) -> Option<&BTreeSet<Entity>> {
        self.systems.entities_of::<S>()
    }

    pub fn systems(&self) -> &SystemRegistry {
        &self.systems
    }

    pub fn profiler(&self) -> &SystemProfiler {
        self.systems.profiler()
    }

    // ------------------------------------------------------------------
    // Frame dispatch
    // ------------------------------------------------------------------

    pub fn update(&mut self, delta_time: f32) {
        self.systems.update_systems(&mut self.components, delta_time);
    }

    pub fn render(&mut self, renderer: &mut dyn Renderer) {
        self.systems.render_systems(&self.components, renderer);
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{RenderContext, SystemContext};

    #[derive(Clone, Copy, Debug, PartialEq)]
    struct Position {
        x: i32,
        y: i32,
    }

    #[derive(Clone, Copy, Debug, PartialEq)]
    struct Velocity {
        x: i32,
        y: i32,
    }

    #[derive(Clone, Copy, Debug, PartialEq)]
    struct Health {
        value: i32,
    }

    #[derive(Default)]
    struct Movement;

    impl System for Movement {
        fn update(&mut self, mut ctx: SystemContext<'_>, _delta_time: f32) {
            for entity in ctx.entities() {
                let Ok(vel) = ctx.get::<Velocity>(entity).copied() else {
                    continue;
                };
                if let Ok(pos) = ctx.get_mut::<Position>(entity) {
                    pos.x += vel.x;
                    pos.y += vel.y;
                }
            }
        }
    }

    #[derive(Default)]
    struct Draw {
        frames: u32,
    }

    impl System for Draw {
        fn render(&mut self, ctx: RenderContext<'_>, renderer: &mut dyn Renderer) {
            self.frames += 1;
            for _ in ctx.entities() {
                renderer.draw_indexed(36);
            }
        }
    }

    #[derive(Default)]
    struct CountingRenderer {
        draws: u32,
        indices: u32,
    }

    impl Renderer for CountingRenderer {
        fn draw_indexed(&mut self, index_count: u32) {
            self.draws += 1;
            self.indices += index_count;
        }
    }

    fn world_with_components(capacity: u32) -> World {
        let mut world = World::with_capacity(capacity);
        world.register_component::<Position>().unwrap();
        world.register_component::<Velocity>().unwrap();
        world.register_component::<Health>().unwrap();
        world
    }

    #[test]
    fn add_then_get_and_remove() {
        let mut world = world_with_components(8);
        let e = world.create_entity().unwrap();

        world.add_component(e, Position { x: 1, y: 2 }).unwrap();
        assert!(world.has_component::<Position>(e));
        assert_eq!(world.get_component::<Position>(e), Ok(&Position { x: 1, y: 2 }));

        assert_eq!(
            world.remove_component::<Position>(e),
            Ok(Some(Position { x: 1, y: 2 }))
        );
        assert!(!world.has_component::<Position>(e));
        assert!(matches!(
            world.get_component::<Position>(e),
            Err(WorldError::ComponentNotFound { .. })
        ));
        assert!(!world.signature(e).unwrap().contains(world.component_slot::<Position>()));
    }

    #[test]
    fn duplicate_add_overwrites() {
        let mut world = world_with_components(4);
        let e = world.create_entity().unwrap();

        assert_eq!(world.add_component(e, Health { value: 10 }), Ok(None));
        assert_eq!(
            world.add_component(e, Health { value: 25 }),
            Ok(Some(Health { value: 10 }))
        );
        assert_eq!(world.get_component::<Health>(e), Ok(&Health { value: 25 }));
    }

    #[test]
    fn swap_remove_keeps_other_entities_values() {
        let mut world = world_with_components(8);
        let entities: Vec<Entity> = (0..5).map(|_| world.create_entity().unwrap()).collect();
        for (i, &e) in entities.iter().enumerate() {
            world.add_component(e, Health { value: i as i32 * 10 }).unwrap();
        }

        world.remove_component::<Health>(entities[2]).unwrap();

        for (i, &e) in entities.iter().enumerate() {
            if i == 2 {
                assert!(!world.has_component::<Health>(e));
            } else {
                assert_eq!(
                    world.get_component::<Health>(e),
                    Ok(&Health { value: i as i32 * 10 })
                );
            }
        }
    }

    #[test]
    fn capacity_boundary_scenario() {
        let mut world = World::with_capacity(4);
        let e: Vec<Entity> = (0..4).map(|_| world.create_entity().unwrap()).collect();

        assert_eq!(
            world.create_entity(),
            Err(WorldError::CapacityExceeded { capacity: 4 })
        );

        world.destroy_entity(e[1]).unwrap();
        let e5 = world.create_entity().unwrap();
        assert_eq!(e5.index(), e[1].index());
        assert_eq!(world.living_count(), 4);
    }

    #[test]
    fn destroy_purges_components_and_membership() {
        let mut world = world_with_components(8);
        world.register_system::<Movement>();
        let required = Signature::new()
            .with(world.component_slot::<Position>())
            .with(world.component_slot::<Velocity>());
        world.set_system_signature::<Movement>(required);

        let e = world.create_entity().unwrap();
        world.add_component(e, Position { x: 0, y: 0 }).unwrap();
        world.add_component(e, Velocity { x: 1, y: 1 }).unwrap();
        assert!(world.system_entities::<Movement>().unwrap().contains(&e));

        world.destroy_entity(e).unwrap();
        assert!(world.system_entities::<Movement>().unwrap().is_empty());
        assert!(!world.has_component::<Position>(e));
        assert!(matches!(
            world.get_component::<Velocity>(e),
            Err(WorldError::StaleEntity { .. })
        ));
        assert!(world.components().store::<Position>().unwrap().is_empty());
        assert_eq!(
            world.destroy_entity(e),
            Err(WorldError::DoubleDestroy { entity: e })
        );
    }

    #[test]
    fn stale_handle_cannot_touch_new_occupant() {
        let mut world = world_with_components(1);
        let old = world.create_entity().unwrap();
        world.destroy_entity(old).unwrap();
        let new = world.create_entity().unwrap();
        world.add_component(new, Health { value: 1 }).unwrap();

        assert_eq!(
            world.add_component(old, Health { value: 99 }),
            Err(WorldError::StaleEntity { entity: old })
        );
        assert!(!world.has_component::<Health>(old));
        assert_eq!(world.get_component::<Health>(new), Ok(&Health { value: 1 }));
    }

    #[test]
    fn update_and_render_dispatch_to_members() {
        let mut world = world_with_components(8);
        world.register_system::<Movement>();
        let draw = world.register_system::<Draw>();
        world.set_system_signature::<Movement>(
            [
                world.component_slot::<Position>(),
                world.component_slot::<Velocity>(),
            ]
            .into_iter()
            .collect(),
        );
        world.set_system_signature::<Draw>(Signature::new().with(world.component_slot::<Position>()));

        let moving = world.create_entity().unwrap();
        world.add_component(moving, Position { x: 0, y: 0 }).unwrap();
        world.add_component(moving, Velocity { x: 2, y: -1 }).unwrap();
        let still = world.create_entity().unwrap();
        world.add_component(still, Position { x: 5, y: 5 }).unwrap();

        world.update(0.016);
        world.update(0.016);
        assert_eq!(world.get_component::<Position>(moving), Ok(&Position { x: 4, y: -2 }));
        assert_eq!(world.get_component::<Position>(still), Ok(&Position { x: 5, y: 5 }));

        let mut renderer = CountingRenderer::default();
        world.render(&mut renderer);
        assert_eq!(renderer.draws, 2);
        assert_eq!(renderer.indices, 72);
        assert_eq!(draw.borrow().frames, 1);
    }

    #[test]
    fn late_signature_picks_up_existing_entities() {
        let mut world = world_with_components(8);
        let e = world.create_entity().unwrap();
        world.add_component(e, Health { value: 3 }).unwrap();

        world.register_system::<Draw>();
        world.set_system_signature::<Draw>(Signature::new().with(world.component_slot::<Health>()));
        assert!(world.system_entities::<Draw>().unwrap().contains(&e));
    }

    #[test]
    fn clear_destroys_everything() {
        let mut world = world_with_components(8);
        world.register_system::<Draw>();
        for _ in 0..3 {
            let e = world.create_entity().unwrap();
            world.add_component(e, Health { value: 1 }).unwrap();
        }

        world.clear();
        assert_eq!(world.living_count(), 0);
        assert_eq!(world.entities().count(), 0);
        assert!(world.system_entities::<Draw>().unwrap().is_empty());
        assert!(world.components().store::<Health>().unwrap().is_empty());
    }

    #[derive(Default)]
    struct Regen;

    impl System for Regen {
        fn update(&mut self, mut ctx: SystemContext<'_>, _delta_time: f32) {
            for entity in ctx.entities() {
                if let Ok(health) = ctx.get_mut::<Health>(entity) {
                    health.value += 1;
                }
                // Asking for a component the member lacks must not attach one.
                assert!(ctx.get_mut::<Velocity>(entity).is_err());
            }
        }
    }

    #[test]
    fn systems_change_values_but_not_structure() {
        let mut world = world_with_components(4);
        world.register_system::<Regen>();
        world.register_system::<Movement>();
        let health = world.component_slot::<Health>();
        world.set_system_signature::<Regen>(Signature::new().with(health));
        world.set_system_signature::<Movement>(
            Signature::new()
                .with(world.component_slot::<Position>())
                .with(world.component_slot::<Velocity>()),
        );

        let e = world.create_entity().unwrap();
        world.add_component(e, Health { value: 1 }).unwrap();
        world.add_component(e, Position { x: 0, y: 0 }).unwrap();
        let before = world.signature(e).unwrap();

        world.update(0.016);
        world.update(0.016);

        assert_eq!(world.get_component::<Health>(e), Ok(&Health { value: 3 }));
        assert_eq!(world.signature(e).unwrap(), before);
        assert!(!world.has_component::<Velocity>(e));
        assert!(world.system_entities::<Regen>().unwrap().contains(&e));
        assert!(world.system_entities::<Movement>().unwrap().is_empty());
        assert_eq!(world.components().store::<Health>().unwrap().len(), 1);
        assert!(world.components().store::<Velocity>().unwrap().is_empty());
    }

    #[test]
    fn out_of_range_handles_are_rejected_without_side_effects() {
        let mut world = world_with_components(3);
        let live = world.create_entity().unwrap();
        let zero = Entity::from_bits(0);
        let beyond = Entity::from_bits(4);

        assert_eq!(
            world.add_component(zero, Health { value: 1 }),
            Err(WorldError::OutOfRange { index: 0, capacity: 3 })
        );
        assert_eq!(
            world.add_component(beyond, Health { value: 1 }),
            Err(WorldError::OutOfRange { index: 4, capacity: 3 })
        );
        assert_eq!(
            world.destroy_entity(beyond),
            Err(WorldError::OutOfRange { index: 4, capacity: 3 })
        );
        assert_eq!(
            world.remove_component::<Health>(zero),
            Err(WorldError::OutOfRange { index: 0, capacity: 3 })
        );

        assert_eq!(world.living_count(), 1);
        assert!(world.is_alive(live));
        assert!(world.components().store::<Health>().unwrap().is_empty());
    }

    #[test]
    fn has_component_is_false_for_unregistered_types() {
        struct Unregistered;

        let mut world = world_with_components(2);
        let e = world.create_entity().unwrap();
        assert!(!world.has_component::<Unregistered>(e));
        assert!(!world.has_component::<Unregistered>(Entity::INVALID));
    }

    #[test]
    #[should_panic(expected = "is not registered")]
    fn unregistered_component_panics() {
        let mut world = World::with_capacity(2);
        let e = world.create_entity().unwrap();
        let _ = world.add_component(e, Health { value: 1 });
    }

    #[test]
    #[should_panic(expected = "is not registered")]
    fn unregistered_system_signature_panics() {
        let mut world = World::with_capacity(2);
        world.set_system_signature::<Movement>(Signature::EMPTY);
    }
}
