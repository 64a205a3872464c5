//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_entity_gateway;
mod in_memory_user_directory;
mod rest_client;
mod rest_entity_gateway;
mod rest_user_directory;

pub use in_memory_entity_gateway::InMemoryEntityGateway;
pub use in_memory_user_directory::InMemoryUserDirectory;
pub use rest_client::{RestClient, TOTAL_COUNT_HEADER};
pub use rest_entity_gateway::RestEntityGateway;
pub use rest_user_directory::RestUserDirectory;
