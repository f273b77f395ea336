//! Document persistence for the saga services.
//!
//! Each service stores its own entity as a JSON document keyed by
//! `(kind, id)`. Nothing here is shared between services: every service is
//! handed its own repository.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod repository;

pub use error::{Result, StoreError};
pub use memory::InMemoryRepository;
pub use postgres::PostgresRepository;
pub use repository::{Document, Page, Repository, SharedRepository};
