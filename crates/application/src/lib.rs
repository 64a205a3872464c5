//! Application services and ports.

#![forbid(unsafe_code)]

mod entity_ports;
mod entity_state;
mod entity_store;
pub mod entity_views;
pub mod form_builder;
mod operation;
pub mod relation_mapping;

pub use entity_ports::{
    EntityGateway, ListQuery, Page, PageRequest, SortDirection, SortSpec, UserDirectory,
};
pub use entity_state::{EntityState, LifecycleEvent};
pub use entity_store::{EntityStore, Settled};
pub use operation::{OperationKind, OperationPhase};
