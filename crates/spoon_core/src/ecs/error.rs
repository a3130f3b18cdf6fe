use crate::ecs::Entity;
use thiserror::Error;

/// Errors reported by the world and its registries.
///
/// `UnregisteredType` and `SystemNotRegistered` are programmer errors; the
/// world turns them into panics instead of handing them to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorldError {
    #[error("entity capacity of {capacity} exhausted")]
    CapacityExceeded { capacity: u32 },

    #[error("entity index {index} is outside the valid range 1..={capacity}")]
    OutOfRange { index: u32, capacity: u32 },

    #[error("component type '{type_name}' is not registered")]
    UnregisteredType { type_name: &'static str },

    #[error("entity {entity} has no '{component}' component")]
    ComponentNotFound {
        entity: Entity,
        component: &'static str,
    },

    #[error("entity {entity} has already been destroyed")]
    DoubleDestroy { entity: Entity },

    #[error("entity {entity} is stale or not alive")]
    StaleEntity { entity: Entity },

    #[error("cannot register '{type_name}': limit of {limit} component types reached")]
    TooManyComponentTypes {
        limit: usize,
        type_name: &'static str,
    },

    #[error("system '{type_name}' is not registered")]
    SystemNotRegistered { type_name: &'static str },
}
