//! SQLite storage for saved calculations.

pub mod factory;
pub mod repository;

pub use factory::SqliteRepositoryFactory;
pub use repository::SqliteHistoryRepository;
