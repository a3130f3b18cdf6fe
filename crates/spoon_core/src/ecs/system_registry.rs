use crate::ecs::{
    Components, Entity, RenderContext, Renderer, Signature, System, SystemContext, SystemHandle,
    WorldError,
};
use spoon_metrics::SystemProfiler;
use std::any::{type_name, Any, TypeId};
use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

/// Owns every system instance, its required signature and its live membership set.
///
/// Systems are stored in registration order and dispatched in that order every
/// frame. Membership is recomputed from scratch for an entity whenever its
/// signature changes; the cost is one superset test per registered system.
pub struct SystemRegistry {
    systems: Vec<RegisteredSystem>,
    lookup: HashMap<TypeId, usize>,
    profiler: SystemProfiler,
}

struct RegisteredSystem {
    name: &'static str,
    render_label: String,
    signature: Signature,
    entities: BTreeSet<Entity>,
    system: Rc<RefCell<dyn System>>,
    handle: Rc<dyn Any>,
}

impl SystemRegistry {
    pub fn new() -> Self {
        Self {
            systems: Vec::new(),
            lookup: HashMap::new(),
            profiler: SystemProfiler::new(),
        }
    }

    /// Register the system built by `make`, or return the existing instance.
    ///
    /// A new system starts with an empty signature, which every entity in
    /// `living` satisfies.
    pub fn register<S, F, I>(&mut self, make: F, living: I) -> SystemHandle<S>
    where
        S: System,
        F: FnOnce() -> S,
        I: IntoIterator<Item = (Entity, Signature)>,
    {
        if let Some(existing) = self.existing::<S>() {
            tracing::debug!(system = type_name::<S>(), "system already registered");
            return existing;
        }

        let typed = Rc::new(RefCell::new(make()));
        let system: Rc<RefCell<dyn System>> = typed.clone();
        let handle: Rc<dyn Any> = typed.clone();
        let name = type_name::<S>();

        let mut registered = RegisteredSystem {
            name,
            render_label: format!("{name}::render"),
            signature: Signature::EMPTY,
            entities: BTreeSet::new(),
            system,
            handle,
        };
        registered.recompute(living);

        self.lookup.insert(TypeId::of::<S>(), self.systems.len());
        self.systems.push(registered);
        tracing::info!(system = name, order = self.systems.len() - 1, "registered system");

        SystemHandle::from_rc(typed)
    }

    /// Replace the required signature of `S` and rebuild its membership from `living`.
    pub fn set_signature<S, I>(&mut self, signature: Signature, living: I) -> Result<(), WorldError>
    where
        S: System,
        I: IntoIterator<Item = (Entity, Signature)>,
    {
        let index = self.index_of::<S>()?;
        let registered = &mut self.systems[index];
        registered.signature = signature;
        registered.recompute(living);

        tracing::debug!(
            system = registered.name,
            ?signature,
            members = registered.entities.len(),
            "system signature changed"
        );
        Ok(())
    }

    /// Re-test `entity` against every system's signature.
    pub fn entity_signature_changed(&mut self, entity: Entity, signature: Signature) {
        for registered in &mut self.systems {
            if signature.contains_all(&registered.signature) {
                registered.entities.insert(entity);
            } else {
                registered.entities.remove(&entity);
            }
        }
    }

    pub fn entity_destroyed(&mut self, entity: Entity) {
        for registered in &mut self.systems {
            registered.entities.remove(&entity);
        }
    }

    /// Run `System::update` for every system, in registration order.
    pub fn update_systems(&mut self, components: &mut Components, delta_time: f32) {
        let Self {
            systems, profiler, ..
        } = self;

        for registered in systems.iter() {
            let Ok(mut system) = registered.system.try_borrow_mut() else {
                tracing::warn!(system = registered.name, "system is borrowed elsewhere, skipping update");
                continue;
            };
            let ctx = SystemContext::new(&registered.entities, components);
            profiler.time_system(registered.name, || system.update(ctx, delta_time));
        }
    }

    /// Run `System::render` for every system, in registration order.
    pub fn render_systems(&mut self, components: &Components, renderer: &mut dyn Renderer) {
        let Self {
            systems, profiler, ..
        } = self;

        for registered in systems.iter() {
            let Ok(mut system) = registered.system.try_borrow_mut() else {
                tracing::warn!(system = registered.name, "system is borrowed elsewhere, skipping render");
                continue;
            };
            let ctx = RenderContext::new(&registered.entities, components);
            profiler.time_system(&registered.render_label, || {
                system.render(ctx, &mut *renderer)
            });
        }
    }

    /// Current members of `S`, if registered.
    pub fn entities_of<S: System>(&self) -> Option<&BTreeSet<Entity>> {
        let index = *self.lookup.get(&TypeId::of::<S>())?;
        Some(&self.systems[index].entities)
    }

    pub fn signature_of<S: System>(&self) -> Option<Signature> {
        let index = *self.lookup.get(&TypeId::of::<S>())?;
        Some(self.systems[index].signature)
    }

    pub fn contains<S: System>(&self) -> bool {
        self.lookup.contains_key(&TypeId::of::<S>())
    }

    /// System type names in dispatch order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.systems.iter().map(|registered| registered.name)
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    pub fn profiler(&self) -> &SystemProfiler {
        &self.profiler
    }

    pub fn profiler_mut(&mut self) -> &mut SystemProfiler {
        &mut self.profiler
    }

    fn index_of<S: System>(&self) -> Result<usize, WorldError> {
        self.lookup
            .get(&TypeId::of::<S>())
            .copied()
            .ok_or(WorldError::SystemNotRegistered {
                type_name: type_name::<S>(),
            })
    }

    fn existing<S: System>(&self) -> Option<SystemHandle<S>> {
        let index = *self.lookup.get(&TypeId::of::<S>())?;
        let typed = Rc::clone(&self.systems[index].handle)
            .downcast::<RefCell<S>>()
            .ok()?;
        Some(SystemHandle::from_rc(typed))
    }
}

impl RegisteredSystem {
    fn recompute<I>(&mut self, living: I)
    where
        I: IntoIterator<Item = (Entity, Signature)>,
    {
        let required = self.signature;
        self.entities.clear();
        self.entities.extend(
            living
                .into_iter()
                .filter(|(_, signature)| signature.contains_all(&required))
                .map(|(entity, _)| entity),
        );
    }
}

impl Default for SystemRegistry {
    fn default() -> Self {
        Self::new()
    }
}
