use crate::ecs::{Component, Components, Entity, WorldError};
use std::collections::BTreeSet;

/// Drawing surface handed to the render pass.
///
/// The ECS never draws anything itself; a backend implements this and each
/// system decides what to submit for its entities.
pub trait Renderer {
    fn clear(&mut self) {}

    fn draw_indexed(&mut self, index_count: u32);

    fn present(&mut self) {}
}

/// Behaviour that runs once per frame over the entities matching its signature.
///
/// Both hooks default to doing nothing, so a system only implements the
/// passes it takes part in.
pub trait System: 'static {
    fn update(&mut self, _ctx: SystemContext<'_>, _delta_time: f32) {}

    fn render(&mut self, _ctx: RenderContext<'_>, _renderer: &mut dyn Renderer) {}
}

/// What a system sees during `update`: its own members plus mutable component access.
///
/// Values can be changed through [`get_mut`](Self::get_mut), but nothing here
/// adds or removes a component, so signatures and membership cannot shift
/// under a running system.
///
/// ```compile_fail
/// use spoon_core::ecs::{System, SystemContext};
///
/// struct Rewire;
///
/// impl System for Rewire {
///     fn update(&mut self, mut ctx: SystemContext<'_>, _delta_time: f32) {
///         let e = ctx.entities().next().unwrap();
///         ctx.components_mut().store_mut::<u32>().unwrap().insert(e, 7);
///     }
/// }
/// ```
pub struct SystemContext<'a> {
    entities: &'a BTreeSet<Entity>,
    components: &'a mut Components,
}

impl<'a> SystemContext<'a> {
    pub(crate) fn new(entities: &'a BTreeSet<Entity>, components: &'a mut Components) -> Self {
        Self {
            entities,
            components,
        }
    }

    /// Member entities in ascending handle order.
    ///
    /// The iterator borrows the membership set, not the context, so
    /// `get_mut` can be called while walking it.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + 'a {
        self.entities.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains(&entity)
    }

    pub fn get<T: Component>(&self, entity: Entity) -> Result<&T, WorldError> {
        self.components.get::<T>(entity)
    }

    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Result<&mut T, WorldError> {
        self.components.get_mut::<T>(entity)
    }

    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.components.has::<T>(entity)
    }

    /// Read access to every store, for lookups outside the system's own members.
    pub fn components(&self) -> &Components {
        &*self.components
    }
}

/// Read-only counterpart of [`SystemContext`] used by the render pass.
pub struct RenderContext<'a> {
    entities: &'a BTreeSet<Entity>,
    components: &'a Components,
}

impl<'a> RenderContext<'a> {
    pub(crate) fn new(entities: &'a BTreeSet<Entity>, components: &'a Components) -> Self {
        Self {
            entities,
            components,
        }
    }

    pub fn entities(&self) -> impl Iterator<Item = Entity> + 'a {
        self.entities.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get<T: Component>(&self, entity: Entity) -> Result<&T, WorldError> {
        self.components.get::<T>(entity)
    }

    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.components.has::<T>(entity)
    }

    pub fn components(&self) -> &Components {
        self.components
    }
}
