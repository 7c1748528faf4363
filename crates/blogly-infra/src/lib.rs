//! # Blogly Infrastructure
//!
//! Concrete implementations of the ports defined in `blogly-core`.
//! Persistence goes through SeaORM against PostgreSQL (or SQLite with the `sqlite` feature).

pub mod database;

pub use database::{
    DatabaseConfig, DbPostRepository, DbTagRepository, DbUserRepository, connect,
};
