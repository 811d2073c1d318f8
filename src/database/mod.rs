pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod query_builder;
pub mod repository;
pub mod seed;

pub use manager::DatabaseManager;
pub use memory::MemoryPersonRepository;
pub use models::{Person, PersonId, PersonUpdate};
pub use postgres::PgPersonRepository;
pub use query_builder::SearchFilter;
pub use repository::{PersonRepository, RepositoryError};
