//! Entity Component System core types.
//!
//! Entities are generational handles drawn from a fixed pool. Each component
//! type gets a slot and a dense store; an entity's signature records which
//! slots it fills. Systems declare a required signature and the world keeps
//! their membership sets in step with every structural change.

mod component;
mod entity;
mod entity_registry;
mod error;
mod signature;
mod storage;
mod system;
mod system_handle;
mod system_registry;
mod world;

pub use component::{Component, ComponentInfo, Components};
pub use entity::Entity;
pub use entity_registry::EntityRegistry;
pub use error::WorldError;
pub use signature::{ComponentSlot, Signature, MAX_COMPONENTS};
pub use storage::{ComponentStore, ErasedStore};
pub use system::{RenderContext, Renderer, System, SystemContext};
pub use system_handle::SystemHandle;
pub use system_registry::SystemRegistry;
pub use world::World;
