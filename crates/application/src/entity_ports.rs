mod gateway;
mod query;

pub use gateway::{EntityGateway, UserDirectory};
pub use query::{ListQuery, Page, PageRequest, SortDirection, SortSpec};
