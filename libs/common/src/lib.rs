//! Common library for the account services
//!
//! This crate provides the document collection capability the services are
//! built on: the `DocumentCollection` trait, an in-memory backend, a
//! PostgreSQL JSONB backend with connection pooling, and the shared error
//! type.
//!
//! ```rust,no_run
//! use common::database::{DatabaseConfig, PgCollection, health_check, init_pool};
//! use common::DocumentCollection;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env()?;
//!     let pool = init_pool(&config).await?;
//!     let is_healthy = health_check(&pool).await?;
//!     println!("Database health check: {}", is_healthy);
//!
//!     let users = PgCollection::open(pool, "users", &["email"]).await?;
//!     println!("Opened collection {}", users.name());
//!     Ok(())
//! }
//! ```

pub mod database;
pub mod error;
pub mod memory;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryCollection;
pub use store::{
    DeleteResult, Document, DocumentCollection, FieldAssignment, Filter, WriteConcern,
};
