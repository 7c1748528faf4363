//! Database connection management and repositories.

mod connection;
mod repo;
mod repo_base;

pub mod entity;

pub use connection::{DatabaseConfig, connect};
pub use repo::{DbPostRepository, DbTagRepository, DbUserRepository};
pub use repo_base::DbBaseRepository;

#[cfg(test)]
mod tests;
